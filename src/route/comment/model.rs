pub use crate::route::model::Paginate;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A single comment, always scoped to its parent post.
#[model]
#[derive(Debug, Deserialize, Serialize, FromRow, JsonSchema, Validate)]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: i64,
	/// The username of the author.
	#[serde(skip_deserializing)]
	pub author: String,
	/// The post the comment belongs to.
	#[serde(skip_deserializing)]
	pub post: i64,
	/// The content of the comment.
	#[validate(length(min = 1, max = 2048))]
	pub text: String,
	/// The creation time of the comment.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// The parent post, taken from the route prefix.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PostScope {
	pub post_id: i64,
}

/// A comment addressed within its parent post's scope.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct CommentPath {
	pub post_id: i64,
	pub id: i64,
}

#[cfg(test)]
mod test {
	use super::{CreateCommentInput, UpdateCommentInput};

	#[test]
	fn test_create_input_only_accepts_text() {
		let input = serde_json::from_value::<CreateCommentInput>(serde_json::json!({
			"text": "nice post",
		}))
		.unwrap();

		assert_eq!(input.text, "nice post");
	}

	#[test]
	fn test_update_input_text_is_optional() {
		let input = serde_json::from_value::<UpdateCommentInput>(serde_json::json!({})).unwrap();

		assert!(input.text.is_none());
	}
}
