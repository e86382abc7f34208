use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not
/// contain sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid_credentials")]
	InvalidCredentials,
	#[error("password_hash")]
	Argon(#[from] argon2::Error),
	#[error("no_credentials")]
	NoCredentials,
	#[error("invalid_session")]
	InvalidSession,
	#[error("invalid_token")]
	InvalidToken,
	#[error("username_taken")]
	UsernameTaken,
	#[error("email_taken")]
	EmailTaken,
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/login", post_with(login, login_docs))
		.api_route("/logout", get_with(logout, logout_docs))
		.api_route("/register", post_with(register, register_docs))
		.api_route("/me", get_with(get_me, get_me_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidCredentials
			| Self::NoCredentials
			| Self::InvalidSession
			| Self::InvalidToken => StatusCode::UNAUTHORIZED,
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let content = match self {
			Self::InvalidCredentials => "Invalid email or password.",
			Self::Argon(..) => "Failed to verify the password.",
			Self::NoCredentials => "This endpoint requires authentication.",
			Self::InvalidSession => "The session has expired or does not exist.",
			Self::InvalidToken => "The bearer token is malformed or does not exist.",
			Self::UsernameTaken => "This username is already taken.",
			Self::EmailTaken => "This email is already registered.",
		};

		error::Message::new(self.to_string())
			.content(content)
			.into_vec()
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_signup_flow(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/auth/register")
			.json(&json!({
				"email": "john@smith.com",
				"username": "john",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		assert!(response
			.header("set-cookie")
			.to_str()
			.unwrap()
			.contains("session="));

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let response = app.get("/auth/me").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["username"], "john");
	}

	#[sqlx::test]
	async fn test_bearer_token_resolves_identity(pool: Database) {
		let server = app(pool.clone());

		register(&server, "ringo").await;

		let response = server
			.post("/auth/login")
			.json(&json!({
				"email": "ringo@example.com",
				"password": "correct horse battery staple",
			}))
			.await;

		let token = response.json::<serde_json::Value>()["token"]
			.as_str()
			.unwrap()
			.to_owned();

		// A fresh server with no cookie jar, authenticating by header only.
		let anonymous = app(pool);
		let response = anonymous
			.get("/auth/me")
			.add_header(
				axum::http::header::AUTHORIZATION,
				axum::http::HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
			)
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["username"], "ringo");
	}

	#[sqlx::test]
	async fn test_duplicate_username_conflicts(pool: Database) {
		let app = app(pool);

		register(&app, "paul").await;

		let response = app
			.post("/auth/register")
			.json(&json!({
				"email": "other@example.com",
				"username": "paul",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 409);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["code"],
			"username_taken"
		);
	}

	#[sqlx::test]
	async fn test_logout_invalidates_session(pool: Database) {
		let app = app(pool);

		register(&app, "george").await;

		assert_eq!(app.get("/auth/logout").await.status_code(), 204);
		assert_eq!(app.get("/auth/me").await.status_code(), 401);
	}
}
