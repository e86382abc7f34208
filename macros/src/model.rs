use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelInputReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), ModelFieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs)]
struct ModelFieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

/// Whether the outermost type is `Option<..>`, so update inputs do not
/// end up as `Option<Option<..>>`.
fn is_option(ty: &syn::Type) -> bool {
	let syn::Type::Path(path) = ty else {
		return false;
	};

	path.path
		.segments
		.last()
		.is_some_and(|segment| segment.ident == "Option")
}

fn is_read_only(attrs: &[syn::Attribute]) -> bool {
	attrs.iter().any(|attr| {
		let Meta::List(ref list) = attr.meta else {
			return false;
		};

		if !list.path.is_ident("serde") {
			return false;
		}

		list.tokens.to_token_stream().into_iter().any(|token| {
			matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
		})
	})
}

pub fn from_input(
	args: proc_macro::TokenStream,
	input: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let (mut create, mut update) = if args.is_empty() {
		(true, true)
	} else {
		(false, false)
	};

	for arg in &args {
		let ast::NestedMeta::Meta(Meta::Path(path)) = arg else {
			return syn::Error::new_spanned(arg, "expected `create` or `update`")
				.into_compile_error()
				.into();
		};

		if path.is_ident("create") {
			create = true;
		} else if path.is_ident("update") {
			update = true;
		} else {
			return syn::Error::new_spanned(path, "expected `create` or `update`")
				.into_compile_error()
				.into();
		}
	}

	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let receiver = match ModelInputReceiver::from_derive_input(&input) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let ident = &receiver.ident;
	let vis = &input.vis;
	let generics = &receiver.generics;
	let attrs = &receiver.attrs;

	let fields = receiver.data.take_struct().expect("expected struct");
	let fields = fields
		.iter()
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;

			if is_read_only(&field.attrs) {
				return None;
			}

			Some((&field.attrs, ident, &field.ty, &field.vis))
		})
		.collect::<Vec<_>>();

	let create_struct = create.then(|| {
		let ident = format_ident!("Create{}Input", ident);
		let fields = fields.iter().map(|(attrs, ident, ty, vis)| {
			quote! {
				#(#attrs)*
				#vis #ident: #ty,
			}
		});

		quote! {
			#(#attrs)*
			#vis struct #ident #generics {
				#(#fields)*
			}
		}
	});

	let update_struct = update.then(|| {
		let ident = format_ident!("Update{}Input", ident);
		let fields = fields.iter().map(|(attrs, ident, ty, vis)| {
			let ty = if is_option(ty) {
				quote!(#ty)
			} else {
				quote!(Option<#ty>)
			};

			quote! {
				#(#attrs)*
				#vis #ident: #ty,
			}
		});

		quote! {
			#(#attrs)*
			#vis struct #ident #generics {
				#(#fields)*
			}
		}
	});

	quote! {
		#input

		#create_struct

		#update_struct
	}
	.into()
}
