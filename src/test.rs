pub use serde_json::json;

pub use crate::Database;

use axum_test::{TestServer, TestServerConfig};

/// Builds a test server over the full router with its own cookie jar.
///
/// Servers sharing a pool act as independent clients against the same
/// store, which is how multi-user scenarios are exercised.
pub fn app(pool: Database) -> TestServer {
	let state = crate::State {
		database: pool,
		hasher: argon2::Argon2::default(),
	};

	TestServer::new_with_config(
		crate::router(state),
		TestServerConfig {
			save_cookies: true,
			..TestServerConfig::default()
		},
	)
	.unwrap()
}

/// Registers a user, leaving the session cookie in the server's jar.
/// The email and password are derived from the username.
pub async fn register(server: &TestServer, username: &str) {
	let response = server
		.post("/auth/register")
		.json(&json!({
			"email": format!("{username}@example.com"),
			"username": username,
			"password": "correct horse battery staple",
		}))
		.await;

	assert_eq!(response.status_code(), 200);
}

/// Creates a post as the server's authenticated user, returning its id.
pub async fn create_post(server: &TestServer, text: &str) -> i64 {
	let response = server.post("/posts").json(&json!({ "text": text })).await;

	assert_eq!(response.status_code(), 201);

	response.json::<serde_json::Value>()["id"].as_i64().unwrap()
}

/// Inserts a group directly into the store, returning its id. Groups
/// have no write routes, so tests seed them at the database level.
pub async fn create_group(pool: &Database, slug: &str) -> i64 {
	sqlx::query_scalar::<_, i64>(
		r#"INSERT INTO "group" (title, slug, description) VALUES ($1, $2, $3) RETURNING id"#,
	)
	.bind(slug.to_uppercase())
	.bind(slug)
	.bind(format!("Posts about {slug}"))
	.fetch_one(pool)
	.await
	.unwrap()
}
