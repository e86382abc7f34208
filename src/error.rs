use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::route::{auth, comment, follow, group, post};

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error entry sent to the client.
///
/// `code` is a stable machine-readable identifier; `content` is the
/// human-readable description. `field` points at the offending input field
/// for validation errors.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'m> {
	pub code: Cow<'m, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<Cow<'m, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'m, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl<'m> Message<'m> {
	pub fn new(code: impl Into<Cow<'m, str>>) -> Self {
		Self {
			code: code.into(),
			content: None,
			field: None,
			details: None,
		}
	}

	pub fn content(mut self, content: impl Into<Cow<'m, str>>) -> Self {
		self.content = Some(content.into());
		self
	}

	pub fn field(mut self, field: impl Into<Cow<'m, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'m> {
	pub success: bool,
	pub errors: Vec<Message<'m>>,
}

/// The response shape of a route-level error: a status code and one or
/// more messages. The crate-level [`Error`] dispatches on this.
pub trait ErrorShape: Sized {
	fn status(&self) -> StatusCode;
	fn into_errors(self) -> Vec<Message<'static>>;

	fn into_response(self) -> Response<Body> {
		(
			self.status(),
			Json(ErrorResponse {
				success: false,
				errors: self.into_errors(),
			}),
		)
			.into_response()
	}
}

/// Error type for the application.
///
/// The `Display` output is not sent to the client, so it can contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("rate limit error: {0}")]
	RateLimit(#[from] tower_governor::GovernorError),
	#[error("auth error: {0}")]
	Auth(#[from] auth::Error),
	#[error("post error: {0}")]
	Post(#[from] post::Error),
	#[error("comment error: {0}")]
	Comment(#[from] comment::Error),
	#[error("group error: {0}")]
	Group(#[from] group::Error),
	#[error("follow error: {0}")]
	Follow(#[from] follow::Error),
}

impl aide::OperationOutput for Error {
	type Inner = Self;
}

fn validation_errors(errors: validator::ValidationErrors) -> Vec<Message<'static>> {
	errors
		.field_errors()
		.into_iter()
		.flat_map(|(field, errors)| {
			errors
				.iter()
				.map(|error| {
					let message = Message::new(error.code.to_string()).field(field.to_string());

					match &error.message {
						Some(content) => message.content(content.to_string()),
						None => message.content(format!("{field} is invalid")),
					}
				})
				.collect::<Vec<_>>()
		})
		.collect()
}

fn bad_request(code: &'static str, content: String) -> Response<Body> {
	(
		StatusCode::BAD_REQUEST,
		Json(ErrorResponse {
			success: false,
			errors: Message::new(code).content(content).into_vec(),
		}),
	)
		.into_response()
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::Validation(errors) => (
				StatusCode::BAD_REQUEST,
				Json(ErrorResponse {
					success: false,
					errors: validation_errors(errors),
				}),
			)
				.into_response(),
			Self::Json(error) => bad_request("invalid_json", error.to_string()),
			Self::Query(error) => bad_request("invalid_query", error.to_string()),
			Self::Path(error) => bad_request("invalid_path", error.to_string()),
			Self::Database(error) => {
				tracing::error!(%error, "database error");

				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Json(ErrorResponse {
						success: false,
						errors: Vec::new(),
					}),
				)
					.into_response()
			}
			Self::RateLimit(error) => match error {
				tower_governor::GovernorError::TooManyRequests { wait_time, .. } => (
					StatusCode::TOO_MANY_REQUESTS,
					Json(ErrorResponse {
						success: false,
						errors: Message::new("too_many_requests")
							.content("You are sending requests too quickly.")
							.detail("retry_after_seconds", wait_time)
							.into_vec(),
					}),
				)
					.into_response(),
				error => {
					tracing::error!(%error, "rate limiter error");

					(
						StatusCode::INTERNAL_SERVER_ERROR,
						Json(ErrorResponse {
							success: false,
							errors: Vec::new(),
						}),
					)
						.into_response()
				}
			},
			Self::Auth(error) => ErrorShape::into_response(error),
			Self::Post(error) => ErrorShape::into_response(error),
			Self::Comment(error) => ErrorShape::into_response(error),
			Self::Group(error) => ErrorShape::into_response(error),
			Self::Follow(error) => ErrorShape::into_response(error),
		}
	}
}
