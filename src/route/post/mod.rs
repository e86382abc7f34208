use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("post_not_found")]
	UnknownPost(i64),
	#[error("not_post_author")]
	NotAuthor,
	#[error("group_not_found")]
	UnknownGroup(i64),
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:post_id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.patch_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
		.nest("/:post_id/comments", super::comment::routes())
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::NotAuthor => StatusCode::FORBIDDEN,
			Self::UnknownGroup(..) => StatusCode::BAD_REQUEST,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());

		match self {
			Self::UnknownPost(post) => message
				.content("The post you requested does not exist.")
				.detail("post", post)
				.into_vec(),
			Self::NotAuthor => message
				.content("Only the author of a post can modify it.")
				.into_vec(),
			Self::UnknownGroup(group) => message
				.content("Group with this ID does not exist")
				.detail("group", group)
				.into_vec(),
		}
	}
}
