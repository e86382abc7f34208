use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";
pub const SECURITY_SCHEME_TOKEN: &str = "Token";

pub mod tag {
	pub const AUTH: &str = "Auth";
	pub const POST: &str = "Post";
	pub const GROUP: &str = "Group";
	pub const COMMENT: &str = "Comment";
	pub const FOLLOW: &str = "Follow";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Quill Open API")
		.summary("A social-blogging backend")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::AUTH.into(),
			description: Some("User authentication".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::GROUP.into(),
			description: Some("Read-only post groups".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comments, scoped to their parent post".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::FOLLOW.into(),
			description: Some("Follow subscriptions of the authenticated user".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A user session cookie".into()),
				extensions: Default::default(),
			},
		)
		.security_scheme(
			SECURITY_SCHEME_TOKEN,
			SecurityScheme::Http {
				scheme: "bearer".into(),
				bearer_format: Some("uuid".into()),
				description: Some("A session token".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::ErrorResponse>, _>(|res| {
			res.example(error::ErrorResponse {
				success: false,
				errors: error::Message::new("error_code")
					.content("A human-readable message.")
					.into_vec(),
			})
		})
}
