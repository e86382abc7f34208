use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("group_not_found")]
	UnknownGroup(i64),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(get_groups, get_groups_docs))
		.api_route("/:id", get_with(get_group, get_group_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownGroup(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let Self::UnknownGroup(group) = self;

		error::Message::new("group_not_found")
			.content("The group you requested does not exist.")
			.detail("group", group)
			.into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_groups_are_readable_anonymously(pool: Database) {
		let cats = create_group(&pool, "cats").await;
		create_group(&pool, "dogs").await;

		let anonymous = app(pool);

		let groups = anonymous.get("/groups").await.json::<serde_json::Value>();

		assert_eq!(groups.as_array().unwrap().len(), 2);

		let group = anonymous
			.get(&format!("/groups/{cats}"))
			.await
			.json::<serde_json::Value>();

		assert_eq!(group["slug"], "cats");
	}

	#[sqlx::test]
	async fn test_unknown_group_is_not_found(pool: Database) {
		let anonymous = app(pool);

		assert_eq!(anonymous.get("/groups/999").await.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_no_write_routes_are_exposed(pool: Database) {
		let server = app(pool);

		register(&server, "alice").await;

		let response = server
			.post("/groups")
			.json(&json!({ "title": "Cats", "slug": "cats", "description": "" }))
			.await;

		assert_eq!(response.status_code(), 405);
	}
}
