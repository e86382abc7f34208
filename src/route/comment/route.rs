use axum::{extract::State, http::StatusCode};
use macros::route;

use crate::{
	extract::{Json, Path, Query, Session},
	openapi::tag,
	Database,
};

use super::{model, Error};

const SELECT_COMMENT: &str = r#"
	SELECT c.id, u.username AS author, c.post_id AS post, c.text, c.created_at
	FROM comment c
	JOIN "user" u ON u.id = c.author_id
"#;

/// Ensures the parent post of the scope exists.
async fn resolve_post(database: &Database, post: i64) -> Result<(), crate::Error> {
	let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM post WHERE id = $1)")
		.bind(post)
		.fetch_one(database)
		.await?;

	if !exists {
		return Err(Error::UnknownPost(post).into());
	}

	Ok(())
}

/// List comments
/// Returns the comments of the parent post, oldest first.
#[route(tag = tag::COMMENT)]
pub async fn get_comments(
	State(database): State<Database>,
	Path(scope): Path<model::PostScope>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Vec<model::Comment>>, crate::Error> {
	resolve_post(&database, scope.post_id).await?;

	let comments = sqlx::query_as::<_, model::Comment>(&format!(
		r#"
			{SELECT_COMMENT}
			WHERE c.post_id = $1
			ORDER BY c.created_at, c.id
			LIMIT $2 OFFSET $3
		"#
	))
	.bind(scope.post_id)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(comments))
}

/// Get single comment
/// Returns a single comment of the parent post. A comment stored under a
/// different post is not visible through this scope.
#[route(tag = tag::COMMENT)]
pub async fn get_comment(
	State(database): State<Database>,
	Path(path): Path<model::CommentPath>,
) -> Result<Json<model::Comment>, crate::Error> {
	let comment = sqlx::query_as::<_, model::Comment>(&format!(
		"{SELECT_COMMENT} WHERE c.post_id = $1 AND c.id = $2"
	))
	.bind(path.post_id)
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownComment(path.id))?))
}

/// Create comment
/// Creates a new comment under the parent post, authored by the acting
/// identity.
#[route(tag = tag::COMMENT, response(status = 201, description = "The created comment.", shape = "Json<model::Comment>"))]
pub async fn create_comment(
	State(database): State<Database>,
	session: Session,
	Path(scope): Path<model::PostScope>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<(StatusCode, Json<model::Comment>), crate::Error> {
	resolve_post(&database, scope.post_id).await?;

	let (id, created_at) = sqlx::query_as::<_, (i64, chrono::DateTime<chrono::Utc>)>(
		r#"
			INSERT INTO comment (post_id, author_id, text)
			VALUES ($1, $2, $3)
			RETURNING id, created_at
		"#,
	)
	.bind(scope.post_id)
	.bind(session.user.id)
	.bind(&input.text)
	.fetch_one(&database)
	.await?;

	Ok((
		StatusCode::CREATED,
		Json(model::Comment {
			id,
			author: session.user.username,
			post: scope.post_id,
			text: input.text,
			created_at,
		}),
	))
}

/// Update comment
/// Updates an existing comment of the parent post. Only the author may
/// do this.
#[route(tag = tag::COMMENT)]
pub async fn update_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::CommentPath>,
	Json(input): Json<model::UpdateCommentInput>,
) -> Result<Json<model::Comment>, crate::Error> {
	authorize(&database, &path, &session).await?;

	let (text, created_at) = sqlx::query_as::<_, (String, chrono::DateTime<chrono::Utc>)>(
		r#"
			UPDATE comment
			SET text = COALESCE($1, text)
			WHERE id = $2
			RETURNING text, created_at
		"#,
	)
	.bind(input.text)
	.bind(path.id)
	.fetch_one(&database)
	.await?;

	Ok(Json(model::Comment {
		id: path.id,
		author: session.user.username,
		post: path.post_id,
		text,
		created_at,
	}))
}

/// Delete comment
/// Deletes an existing comment of the parent post. Only the author may
/// do this.
#[route(tag = tag::COMMENT, response(status = 204, description = "The comment was deleted."))]
pub async fn delete_comment(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::CommentPath>,
) -> Result<StatusCode, crate::Error> {
	authorize(&database, &path, &session).await?;

	sqlx::query("DELETE FROM comment WHERE id = $1")
		.bind(path.id)
		.execute(&database)
		.await?;

	Ok(StatusCode::NO_CONTENT)
}

/// A comment outside the parent post's scope is a 404; one written by
/// another author is a 403.
async fn authorize(
	database: &Database,
	path: &model::CommentPath,
	session: &Session,
) -> Result<(), crate::Error> {
	let author = sqlx::query_scalar::<_, uuid::Uuid>(
		"SELECT author_id FROM comment WHERE id = $1 AND post_id = $2",
	)
	.bind(path.id)
	.bind(path.post_id)
	.fetch_optional(database)
	.await?
	.ok_or(Error::UnknownComment(path.id))?;

	if author != session.user.id {
		return Err(Error::NotAuthor.into());
	}

	Ok(())
}
