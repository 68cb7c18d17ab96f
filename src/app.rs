//! Router construction: every route and layer is wired here from an explicit `AppState`.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, Request, Response},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::Span;

use crate::middleware::security_headers::security_headers;
use crate::routes;
use crate::AppState;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.frontend_url)?;
    let environment = state.config.environment;

    let auth_routes = Router::new()
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/check-auth", get(routes::auth::check_auth))
        .route("/auth/users", get(routes::auth::list_users));

    let workout_routes = Router::new()
        .route("/workouts", post(routes::workouts::create))
        .route(
            "/workouts/user/{user_id}",
            get(routes::workouts::list_by_user),
        )
        .route(
            "/workouts/category/{category}/user/{user_id}",
            get(routes::workouts::list_by_category),
        )
        .route(
            "/workouts/dashboard/stats/{user_id}",
            get(routes::dashboard::stats),
        )
        .route(
            "/workouts/{workout_id}",
            get(routes::workouts::get_by_id)
                .put(routes::workouts::update)
                .delete(routes::workouts::delete),
        )
        .route(
            "/workouts/{workout_id}/complete",
            patch(routes::workouts::complete),
        );

    let goal_routes = Router::new()
        .route(
            "/goals",
            get(routes::goals::list_mine).post(routes::goals::create),
        )
        .route("/goals/user/{user_id}", get(routes::goals::list_for_user))
        .route(
            "/goals/{id}",
            get(routes::goals::get_by_id)
                .put(routes::goals::update)
                .delete(routes::goals::delete),
        );

    let router = Router::new()
        .route("/health/live", get(routes::health::live))
        .route("/health/ready", get(routes::health::ready))
        .nest("/api/v1", auth_routes)
        .nest("/api", workout_routes.merge(goal_routes))
        .layer(middleware::from_fn_with_state(environment, security_headers))
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri(),
                        status = tracing::field::Empty,
                    )
                })
                .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
                    let status = res.status();
                    span.record("status", tracing::field::display(status));
                    let latency_ms = latency.as_millis();
                    if status.is_server_error() {
                        tracing::error!(%status, latency_ms, "response");
                    } else {
                        tracing::info!(%status, latency_ms, "response");
                    }
                }),
        )
        .layer(cors)
        .with_state(state);

    Ok(router)
}

/// CORS for the single configured frontend origin, with credentials so the
/// session cookie is sent cross-origin.
fn cors_layer(frontend_url: &str) -> anyhow::Result<CorsLayer> {
    let origin = frontend_url.trim_end_matches('/').parse::<HeaderValue>()?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600)))
}
