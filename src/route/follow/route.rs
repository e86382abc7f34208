use axum::{extract::State, http::StatusCode};
use macros::route;

use crate::{
	extract::{Json, Path, Query, Session},
	openapi::tag,
	Database,
};

use super::{
	model::{self, escape_like},
	Error,
};

/// List follows
/// Returns the follows of the acting identity, newest first. Supports a
/// case-insensitive substring search on the followee username.
#[route(tag = tag::FOLLOW)]
pub async fn get_follows(
	State(database): State<Database>,
	session: Session,
	Query(paginate): Query<model::Paginate>,
	Query(filter): Query<model::FollowFilter>,
) -> Result<Json<Vec<model::Follow>>, crate::Error> {
	let pattern = filter
		.search
		.as_deref()
		.map_or_else(|| "%".to_owned(), |search| format!("%{}%", escape_like(search)));

	let follows = sqlx::query_as::<_, model::Follow>(
		r#"
			SELECT u1.username AS "user", u2.username AS following
			FROM follow f
			JOIN "user" u1 ON u1.id = f.user_id
			JOIN "user" u2 ON u2.id = f.following_id
			WHERE f.user_id = $1 AND u2.username ILIKE $2
			ORDER BY f.created_at DESC, f.id DESC
			LIMIT $3 OFFSET $4
		"#,
	)
	.bind(session.user.id)
	.bind(pattern)
	.bind(paginate.limit())
	.bind(paginate.offset())
	.fetch_all(&database)
	.await?;

	Ok(Json(follows))
}

/// Get single follow
/// Returns a single follow of the acting identity by its unique id.
#[route(tag = tag::FOLLOW)]
pub async fn get_follow(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Follow>, crate::Error> {
	let follow = sqlx::query_as::<_, model::Follow>(
		r#"
			SELECT u1.username AS "user", u2.username AS following
			FROM follow f
			JOIN "user" u1 ON u1.id = f.user_id
			JOIN "user" u2 ON u2.id = f.following_id
			WHERE f.id = $1 AND f.user_id = $2
		"#,
	)
	.bind(path.id)
	.bind(session.user.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(follow.ok_or(Error::UnknownFollow(path.id))?))
}

/// Follow a user
/// Subscribes the acting identity to another user by username. The
/// self-follow and duplicate checks are enforced by store constraints,
/// so concurrent duplicate requests cannot race them.
#[route(tag = tag::FOLLOW, response(status = 201, description = "The created follow.", shape = "Json<model::Follow>"))]
pub async fn create_follow(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::CreateFollowInput>,
) -> Result<(StatusCode, Json<model::Follow>), crate::Error> {
	let following =
		sqlx::query_as::<_, (uuid::Uuid, String)>(
			r#"SELECT id, username FROM "user" WHERE username = $1"#,
		)
		.bind(&input.following)
		.fetch_optional(&database)
		.await?;

	let Some((following_id, following)) = following else {
		return Err(Error::UnknownUser(input.following).into());
	};

	sqlx::query("INSERT INTO follow (user_id, following_id) VALUES ($1, $2)")
		.bind(session.user.id)
		.bind(following_id)
		.execute(&database)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref d) if d.constraint() == Some("follow_pair_key") => {
				Error::AlreadyFollowing.into()
			}
			sqlx::Error::Database(ref d) if d.constraint() == Some("follow_self_check") => {
				Error::SelfFollow.into()
			}
			e => crate::Error::Database(e),
		})?;

	Ok((
		StatusCode::CREATED,
		Json(model::Follow {
			user: session.user.username,
			following,
		}),
	))
}

/// Unfollow a user
/// Deletes a follow of the acting identity by its unique id.
#[route(tag = tag::FOLLOW, response(status = 204, description = "The follow was deleted."))]
pub async fn delete_follow(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<StatusCode, crate::Error> {
	let status = sqlx::query("DELETE FROM follow WHERE id = $1 AND user_id = $2")
		.bind(path.id)
		.bind(session.user.id)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownFollow(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT)
}
