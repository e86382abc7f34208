#![warn(clippy::pedantic)]

mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod session;
#[cfg(test)]
mod test;

use std::{net::SocketAddr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use argon2::Argon2;
use axum::{extract::Request, Extension, Router, ServiceExt};
use tower::Layer;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	normalize_path::NormalizePathLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use error::Error;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the database connection pool and the password hash configuration.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
}

/// Builds the application router and its OpenAPI document.
///
/// Transport-level middleware (rate limiting, tracing, compression) is
/// applied in [`main`] so the test server can drive the bare router.
pub fn router(state: State) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/auth", route::auth::routes())
		.nest("/posts", route::post::routes())
		.nest("/groups", route::group::routes())
		.nest("/follow", route::follow::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.with_state(state)
}

#[tokio::main]
async fn main() {
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(tracing_subscriber::fmt::layer().with_ansi(true))
		.init();

	dotenvy::dotenv().ok();

	let database = Database::connect(
		&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
	)
	.await
	.expect("failed to connect to database");

	sqlx::migrate!()
		.run(&database)
		.await
		.expect("failed to run migrations");

	let state = State {
		database,
		hasher: Argon2::default(),
	};

	let governor = ratelimit::default();

	ratelimit::cleanup_old_limits(&[&governor]);

	let app = router(state)
		.layer(GovernorLayer { config: governor })
		.layer(TraceLayer::new_for_http())
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.layer(PropagateRequestIdLayer::x_request_id())
		.layer(CorsLayer::permissive())
		.layer(CompressionLayer::new());

	// Resource routes are also reachable with a trailing slash.
	let app = NormalizePathLayer::trim_trailing_slash().layer(app);

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(
		listener,
		ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
	)
	.await
	.unwrap();
}
