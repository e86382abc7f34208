use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("comment_not_found")]
	UnknownComment(i64),
	#[error("post_not_found")]
	UnknownPost(i64),
	#[error("not_comment_author")]
	NotAuthor,
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_comments, get_comments_docs)
				.post_with(create_comment, create_comment_docs),
		)
		.api_route(
			"/:id",
			get_with(get_comment, get_comment_docs)
				.put_with(update_comment, update_comment_docs)
				.patch_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownComment(..) | Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::NotAuthor => StatusCode::FORBIDDEN,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());

		match self {
			Self::UnknownComment(comment) => message
				.content("The comment you requested does not exist under this post.")
				.detail("comment", comment)
				.into_vec(),
			Self::UnknownPost(post) => message
				.content("The post you requested does not exist.")
				.detail("post", post)
				.into_vec(),
			Self::NotAuthor => message
				.content("Only the author of a comment can modify it.")
				.into_vec(),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_comment_round_trip(pool: Database) {
		let server = app(pool);

		register(&server, "alice").await;

		let post = create_post(&server, "a post").await;

		let response = server
			.post(&format!("/posts/{post}/comments"))
			.json(&json!({ "text": "first!" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let comment = response.json::<serde_json::Value>();

		assert_eq!(comment["author"], "alice");
		assert_eq!(comment["post"], post);

		let comments = server
			.get(&format!("/posts/{post}/comments"))
			.await
			.json::<serde_json::Value>();

		assert_eq!(comments.as_array().unwrap().len(), 1);
		assert_eq!(comments[0]["text"], "first!");
	}

	#[sqlx::test]
	async fn test_anonymous_cannot_comment(pool: Database) {
		let author = app(pool.clone());

		register(&author, "alice").await;

		let post = create_post(&author, "a post").await;

		let anonymous = app(pool);
		let response = anonymous
			.post(&format!("/posts/{post}/comments"))
			.json(&json!({ "text": "nope" }))
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_comments_are_scoped_to_their_post(pool: Database) {
		let server = app(pool);

		register(&server, "alice").await;

		let first = create_post(&server, "first").await;
		let second = create_post(&server, "second").await;

		let comment = server
			.post(&format!("/posts/{first}/comments"))
			.json(&json!({ "text": "on the first post" }))
			.await
			.json::<serde_json::Value>()["id"]
			.as_i64()
			.unwrap();

		// Visible through its own post's scope, invisible through another's.
		let comments = server
			.get(&format!("/posts/{second}/comments"))
			.await
			.json::<serde_json::Value>();

		assert_eq!(comments.as_array().unwrap().len(), 0);

		let response = server
			.get(&format!("/posts/{second}/comments/{comment}"))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = server
			.get(&format!("/posts/{first}/comments/{comment}"))
			.await;

		assert_eq!(response.status_code(), 200);
	}

	#[sqlx::test]
	async fn test_unknown_parent_post(pool: Database) {
		let server = app(pool);

		register(&server, "alice").await;

		let response = server
			.post("/posts/999/comments")
			.json(&json!({ "text": "into the void" }))
			.await;

		assert_eq!(response.status_code(), 404);

		assert_eq!(server.get("/posts/999/comments").await.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_only_author_can_modify(pool: Database) {
		let alice = app(pool.clone());
		let mallory = app(pool.clone());

		register(&alice, "alice").await;
		register(&mallory, "mallory").await;

		let post = create_post(&alice, "a post").await;

		let comment = alice
			.post(&format!("/posts/{post}/comments"))
			.json(&json!({ "text": "mine" }))
			.await
			.json::<serde_json::Value>()["id"]
			.as_i64()
			.unwrap();

		let response = mallory
			.put(&format!("/posts/{post}/comments/{comment}"))
			.json(&json!({ "text": "stolen" }))
			.await;

		assert_eq!(response.status_code(), 403);

		let response = mallory
			.delete(&format!("/posts/{post}/comments/{comment}"))
			.await;

		assert_eq!(response.status_code(), 403);

		let body = alice
			.get(&format!("/posts/{post}/comments/{comment}"))
			.await
			.json::<serde_json::Value>();

		assert_eq!(body["text"], "mine");
	}
}
