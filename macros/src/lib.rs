mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the
/// original function with the suffix `_docs`. The first doc-comment line
/// becomes the operation summary, the rest the description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Derives `CreateXInput` and `UpdateXInput` structs for a wire model.
///
/// Fields marked `#[serde(skip_deserializing)]` or `#[serde(skip)]` are
/// read-only and excluded from both. Update fields are optional; fields
/// that are already `Option<T>` are not wrapped a second time.
///
/// `#[model(create)]` or `#[model(update)]` restricts which structs are
/// generated; the bare attribute generates both.
#[proc_macro_attribute]
pub fn model(args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(args, input)
}
