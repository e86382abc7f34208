pub use crate::route::model::{IdInput, Paginate};

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A directed subscription from the acting identity to another user.
///
/// Follows are created and deleted, never updated.
#[model(create)]
#[derive(Debug, Deserialize, Serialize, FromRow, JsonSchema, Validate)]
pub struct Follow {
	/// The username of the follower. Always the acting identity.
	#[serde(skip_deserializing)]
	pub user: String,
	/// The username being followed.
	#[validate(length(min = 1, max = 150))]
	pub following: String,
}

/// Text filter applied to the follow list.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct FollowFilter {
	/// A case-insensitive substring match on the followee username.
	#[validate(length(min = 1, max = 150))]
	pub search: Option<String>,
}

/// Escapes `ILIKE` pattern metacharacters so user input only ever
/// matches literally.
pub(crate) fn escape_like(input: &str) -> String {
	let mut out = String::with_capacity(input.len());

	for c in input.chars() {
		if matches!(c, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(c);
	}

	out
}

#[cfg(test)]
mod test {
	use super::escape_like;

	#[test]
	fn test_escape_like_passes_plain_text() {
		assert_eq!(escape_like("alice"), "alice");
	}

	#[test]
	fn test_escape_like_escapes_metacharacters() {
		assert_eq!(escape_like("100%"), "100\\%");
		assert_eq!(escape_like("a_b"), "a\\_b");
		assert_eq!(escape_like("back\\slash"), "back\\\\slash");
	}
}
