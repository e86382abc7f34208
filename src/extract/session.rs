use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{
	error::Error,
	openapi::{SECURITY_SCHEME_SESSION, SECURITY_SCHEME_TOKEN},
	route::auth,
	session, Database,
};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// The acting identity, resolved from the request credentials.
///
/// The session id is accepted either from the `session` cookie or as an
/// `Authorization: Bearer <token>` header; both resolve through the
/// session table. Routes open to anonymous access simply omit this
/// extractor.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: auth::model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let session_id = if let Some(token) = parts.headers.get(header::AUTHORIZATION) {
			let token = token.to_str().map_err(|_| auth::Error::InvalidToken)?;

			let token = token
				.strip_prefix(AUTHORIZATION_PREFIX)
				.ok_or(auth::Error::InvalidToken)?;

			Uuid::parse_str(token).map_err(|_| auth::Error::InvalidToken)?
		} else {
			let cookies = parts
				.headers
				.get_all(header::COOKIE)
				.into_iter()
				.filter_map(|value| value.to_str().ok());

			let cookie = cookies
				.flat_map(cookie::Cookie::split_parse)
				.filter_map(Result::ok)
				.find(|cookie| cookie.name() == session::COOKIE_NAME)
				.ok_or(auth::Error::NoCredentials)?;

			Uuid::parse_str(cookie.value()).map_err(|_| auth::Error::InvalidSession)?
		};

		let database = Database::from_ref(state);
		let user = sqlx::query_as::<_, auth::model::User>(
			r#"
				SELECT * FROM "user" WHERE id = (
					SELECT user_id FROM session WHERE id = $1
				)
			"#,
		)
		.bind(session_id)
		.fetch_optional(&database)
		.await?;

		let user = user.ok_or(auth::Error::InvalidSession)?;

		Ok(Self {
			id: session_id,
			user,
		})
	}
}

impl OperationInput for Session {
	/// Adds the session cookie and bearer token security requirements to
	/// the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([
			[(SECURITY_SCHEME_SESSION.to_string(), Vec::new())]
				.into_iter()
				.collect(),
			[(SECURITY_SCHEME_TOKEN.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		]);
	}
}
