pub use crate::route::model::Paginate;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A single post, written by a user and optionally filed under a group.
///
/// The author is set server-side from the acting identity and never
/// changes after creation.
#[model]
#[derive(Debug, Deserialize, Serialize, FromRow, JsonSchema, Validate)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: i64,
	/// The content of the post.
	#[validate(length(min = 1, max = 4096))]
	pub text: String,
	/// The publication time of the post.
	#[serde(skip_deserializing)]
	pub published_at: chrono::DateTime<chrono::Utc>,
	/// The username of the author.
	#[serde(skip_deserializing)]
	pub author: String,
	/// An optional reference to an image attachment.
	#[validate(length(min = 1, max = 512))]
	pub image: Option<String>,
	/// The group the post is filed under, if any.
	pub group: Option<i64>,
}

/// The path parameter of a single post.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PostPath {
	/// The unique identifier of the post.
	pub post_id: i64,
}

/// Equality filters applied to the post list.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PostFilter {
	/// Only posts written by this username.
	#[validate(length(min = 1, max = 150))]
	pub author: Option<String>,
	/// Only posts filed under this group.
	pub group: Option<i64>,
}
