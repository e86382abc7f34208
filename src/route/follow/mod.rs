use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("self_follow")]
	SelfFollow,
	#[error("already_following")]
	AlreadyFollowing,
	#[error("user_not_found")]
	UnknownUser(String),
	#[error("follow_not_found")]
	UnknownFollow(i64),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_follows, get_follows_docs).post_with(create_follow, create_follow_docs),
		)
		.api_route(
			"/:id",
			get_with(get_follow, get_follow_docs).delete_with(delete_follow, delete_follow_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::SelfFollow | Self::AlreadyFollowing | Self::UnknownUser(..) => {
				StatusCode::BAD_REQUEST
			}
			Self::UnknownFollow(..) => StatusCode::NOT_FOUND,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());

		match self {
			Self::SelfFollow => message.content("You cannot follow yourself.").into_vec(),
			Self::AlreadyFollowing => message
				.content("You are already following this user.")
				.into_vec(),
			Self::UnknownUser(username) => message
				.content("The user you tried to follow does not exist.")
				.detail("following", username)
				.into_vec(),
			Self::UnknownFollow(follow) => message
				.content("The follow you requested does not exist.")
				.detail("follow", follow)
				.into_vec(),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_follow_flow(pool: Database) {
		let alice = app(pool.clone());
		let bob = app(pool);

		register(&alice, "alice").await;
		register(&bob, "bob").await;

		let response = alice
			.post("/follow")
			.json(&json!({ "following": "bob" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let body = response.json::<serde_json::Value>();

		assert_eq!(body["user"], "alice");
		assert_eq!(body["following"], "bob");

		// Following the same user twice is rejected.
		let response = alice
			.post("/follow")
			.json(&json!({ "following": "bob" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert!(response
			.json::<serde_json::Value>()["errors"][0]["content"]
			.as_str()
			.unwrap()
			.contains("already following"));

		// As is following yourself.
		let response = alice
			.post("/follow")
			.json(&json!({ "following": "alice" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert!(response
			.json::<serde_json::Value>()["errors"][0]["content"]
			.as_str()
			.unwrap()
			.contains("cannot follow yourself"));
	}

	#[sqlx::test]
	async fn test_concurrent_duplicates_store_one_row(pool: Database) {
		let first = app(pool.clone());
		let second = app(pool.clone());
		let bob = app(pool.clone());

		register(&first, "alice").await;
		register(&bob, "bob").await;

		// A second session for the same account.
		let response = second
			.post("/auth/login")
			.json(&json!({
				"email": "alice@example.com",
				"password": "correct horse battery staple",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let body = json!({ "following": "bob" });
		let (a, b) = tokio::join!(
			async { first.post("/follow").json(&body).await },
			async { second.post("/follow").json(&body).await },
		);

		// Exactly one of the two racing requests wins.
		assert_eq!(
			[a.status_code(), b.status_code()]
				.iter()
				.filter(|&&status| status == 201)
				.count(),
			1
		);

		let count = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM follow")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(count, 1);
	}

	#[sqlx::test]
	async fn test_unknown_followee(pool: Database) {
		let server = app(pool);

		register(&server, "alice").await;

		let response = server
			.post("/follow")
			.json(&json!({ "following": "nobody" }))
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["code"],
			"user_not_found"
		);
	}

	#[sqlx::test]
	async fn test_every_operation_requires_authentication(pool: Database) {
		let anonymous = app(pool);

		assert_eq!(anonymous.get("/follow").await.status_code(), 401);
		assert_eq!(
			anonymous
				.post("/follow")
				.json(&json!({ "following": "bob" }))
				.await
				.status_code(),
			401
		);
	}

	#[sqlx::test]
	async fn test_list_is_scoped_and_searchable(pool: Database) {
		let alice = app(pool.clone());
		let bob = app(pool.clone());
		let carol = app(pool);

		register(&alice, "alice").await;
		register(&bob, "bob").await;
		register(&carol, "carol").await;

		for followee in ["bob", "carol"] {
			let response = alice
				.post("/follow")
				.json(&json!({ "following": followee }))
				.await;

			assert_eq!(response.status_code(), 201);
		}

		let response = bob
			.post("/follow")
			.json(&json!({ "following": "carol" }))
			.await;

		assert_eq!(response.status_code(), 201);

		// Only the acting identity's follows are listed.
		let follows = alice.get("/follow").await.json::<serde_json::Value>();

		assert_eq!(follows.as_array().unwrap().len(), 2);

		// Case-insensitive substring match on the followee username.
		let follows = alice
			.get("/follow?search=ARO")
			.await
			.json::<serde_json::Value>();

		assert_eq!(follows.as_array().unwrap().len(), 1);
		assert_eq!(follows[0]["following"], "carol");

		// Pattern metacharacters only match literally.
		let follows = alice
			.get("/follow?search=%25")
			.await
			.json::<serde_json::Value>();

		assert_eq!(follows.as_array().unwrap().len(), 0);
	}

	#[sqlx::test]
	async fn test_unfollow(pool: Database) {
		let alice = app(pool.clone());
		let bob = app(pool.clone());

		register(&alice, "alice").await;
		register(&bob, "bob").await;

		let response = alice
			.post("/follow")
			.json(&json!({ "following": "bob" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let id = sqlx::query_scalar::<_, i64>("SELECT id FROM follow")
			.fetch_one(&pool)
			.await
			.unwrap();

		// Another user cannot touch the record through their own scope.
		assert_eq!(bob.get(&format!("/follow/{id}")).await.status_code(), 404);
		assert_eq!(
			bob.delete(&format!("/follow/{id}")).await.status_code(),
			404
		);

		assert_eq!(
			alice.delete(&format!("/follow/{id}")).await.status_code(),
			204
		);

		let follows = alice.get("/follow").await.json::<serde_json::Value>();

		assert_eq!(follows.as_array().unwrap().len(), 0);
	}
}
