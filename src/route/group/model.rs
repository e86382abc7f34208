pub use crate::route::model::{IdInput, Paginate};

use schemars::JsonSchema;
use serde::Serialize;
use sqlx::FromRow;

/// A curated collection of posts. Groups are managed out of band; the
/// API only ever reads them.
#[derive(Debug, Serialize, FromRow, JsonSchema)]
pub struct Group {
	/// The unique identifier of the group.
	pub id: i64,
	/// The display title of the group.
	pub title: String,
	/// The unique URL-friendly name of the group.
	pub slug: String,
	/// A short description of what belongs in the group.
	pub description: String,
}
