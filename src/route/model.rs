use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn ten() -> i64 {
	10
}

/// A limit/offset window over a list response.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct Paginate {
	/// The maximum number of items to return.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "ten")]
	pub limit: i64,
	/// The number of items to skip before the window starts.
	#[validate(range(min = 0))]
	#[serde(default)]
	pub offset: i64,
}

impl Paginate {
	pub fn limit(&self) -> i64 {
		self.limit
	}

	pub fn offset(&self) -> i64 {
		self.offset
	}
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: i64,
}

#[cfg(test)]
mod test {
	use validator::Validate;

	use super::Paginate;

	#[test]
	fn test_paginate_defaults() {
		let paginate: Paginate = serde_json::from_str("{}").unwrap();

		assert_eq!(paginate.limit(), 10);
		assert_eq!(paginate.offset(), 0);
	}

	#[test]
	fn test_paginate_bounds() {
		let paginate = Paginate {
			limit: 0,
			offset: 0,
		};

		assert!(paginate.validate().is_err());

		let paginate = Paginate {
			limit: 101,
			offset: 0,
		};

		assert!(paginate.validate().is_err());

		let paginate = Paginate {
			limit: 100,
			offset: 40,
		};

		assert!(paginate.validate().is_ok());
	}

	#[test]
	fn test_paginate_rejects_negative_offset() {
		let paginate = Paginate {
			limit: 10,
			offset: -1,
		};

		assert!(paginate.validate().is_err());
	}
}
