use axum::{extract::State, http::StatusCode};
use macros::route;

use crate::{
	extract::{Json, Path, Query, Session},
	openapi::tag,
	Database,
};

use super::{model, Error};

const SELECT_POST: &str = r#"
	SELECT p.id, p.text, p.published_at, u.username AS author, p.image, p.group_id AS "group"
	FROM post p
	JOIN "user" u ON u.id = p.author_id
"#;

/// Get all posts
/// Returns a paginated response of posts, newest first. Supports equality
/// filters on the author username and the group id.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
	Query(paginate): Query<model::Paginate>,
	Query(filter): Query<model::PostFilter>,
) -> Result<Json<Vec<model::Post>>, crate::Error> {
	let posts = sqlx::query_as::<_, model::Post>(&format!(
		r#"
			{SELECT_POST}
			WHERE ($1::text IS NULL OR u.username = $1)
			  AND ($2::bigint IS NULL OR p.group_id = $2)
			ORDER BY p.published_at DESC, p.id DESC
			LIMIT $3 OFFSET $4
		"#
	))
	.bind(filter.author)
	.bind(filter.group)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(posts))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
) -> Result<Json<model::Post>, crate::Error> {
	let post = sqlx::query_as::<_, model::Post>(&format!("{SELECT_POST} WHERE p.id = $1"))
		.bind(path.post_id)
		.fetch_optional(&database)
		.await?;

	Ok(Json(post.ok_or(Error::UnknownPost(path.post_id))?))
}

/// Create post
/// Creates a new post authored by the acting identity. The referenced
/// group must exist.
#[route(tag = tag::POST, response(status = 201, description = "The created post.", shape = "Json<model::Post>"))]
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreatePostInput>,
) -> Result<(StatusCode, Json<model::Post>), crate::Error> {
	let (id, published_at) = sqlx::query_as::<_, (i64, chrono::DateTime<chrono::Utc>)>(
		r#"
			INSERT INTO post (author_id, text, image, group_id)
			VALUES ($1, $2, $3, $4)
			RETURNING id, published_at
		"#,
	)
	.bind(session.user.id)
	.bind(&input.text)
	.bind(&input.image)
	.bind(input.group)
	.fetch_one(&database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) if d.constraint() == Some("post_group_id_fkey") => {
			Error::UnknownGroup(input.group.unwrap_or_default()).into()
		}
		e => crate::Error::Database(e),
	})?;

	Ok((
		StatusCode::CREATED,
		Json(model::Post {
			id,
			text: input.text,
			published_at,
			author: session.user.username,
			image: input.image,
			group: input.group,
		}),
	))
}

/// Update post
/// Updates an existing post. Only the author may do this; the author
/// itself is immutable. Fields left out of the payload are unchanged.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::PostPath>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::Post>, crate::Error> {
	authorize(&database, path.post_id, &session).await?;

	let (text, published_at, image, group) = sqlx::query_as::<_, (
		String,
		chrono::DateTime<chrono::Utc>,
		Option<String>,
		Option<i64>,
	)>(
		r#"
			UPDATE post
			SET text = COALESCE($1, text),
			    image = COALESCE($2, image),
			    group_id = COALESCE($3, group_id)
			WHERE id = $4
			RETURNING text, published_at, image, group_id
		"#,
	)
	.bind(input.text)
	.bind(input.image)
	.bind(input.group)
	.bind(path.post_id)
	.fetch_one(&database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) if d.constraint() == Some("post_group_id_fkey") => {
			Error::UnknownGroup(input.group.unwrap_or_default()).into()
		}
		e => crate::Error::Database(e),
	})?;

	Ok(Json(model::Post {
		id: path.post_id,
		text,
		published_at,
		author: session.user.username,
		image,
		group,
	}))
}

/// Delete post
/// Deletes an existing post. Only the author may do this.
#[route(tag = tag::POST, response(status = 204, description = "The post was deleted."))]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::PostPath>,
) -> Result<StatusCode, crate::Error> {
	authorize(&database, path.post_id, &session).await?;

	sqlx::query("DELETE FROM post WHERE id = $1")
		.bind(path.post_id)
		.execute(&database)
		.await?;

	Ok(StatusCode::NO_CONTENT)
}

/// An unknown post is a 404; an existing post by another author is a 403.
async fn authorize(database: &Database, post: i64, session: &Session) -> Result<(), crate::Error> {
	let author = sqlx::query_scalar::<_, uuid::Uuid>("SELECT author_id FROM post WHERE id = $1")
		.bind(post)
		.fetch_optional(database)
		.await?
		.ok_or(Error::UnknownPost(post))?;

	if author != session.user.id {
		return Err(Error::NotAuthor.into());
	}

	Ok(())
}
