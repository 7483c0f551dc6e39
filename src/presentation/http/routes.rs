// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{auth, follows, likes, pastries},
    middleware::auth_rate_limit_layer,
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Upper bound for a multipart listing request (payload plus all images).
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

fn auth_routes() -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh_token))
        .route("/logout", post(auth::logout))
        .route_layer(auth_rate_limit_layer())
        .route("/me", get(auth::profile))
}

fn pastry_routes() -> Router {
    Router::new()
        .route(
            "/",
            get(pastries::search_pastries).post(pastries::create_pastry),
        )
        .route(
            "/{id}",
            get(pastries::get_pastry).patch(pastries::update_pastry),
        )
        .route("/{id}/similar", get(pastries::similar_pastries))
        .route(
            "/{id}/likes",
            post(likes::create_like).delete(likes::delete_like),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

fn user_routes() -> Router {
    Router::new()
        .route(
            "/follows/unfollow-from-you/{id}",
            delete(follows::unfollow_from_you),
        )
        .route(
            "/follows/{id}",
            post(follows::follow).delete(follows::unfollow),
        )
}

pub fn build_router(state: HttpState, allowed_origins: &[String]) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/pastries", pastry_routes())
        .nest("/users", user_routes());

    Router::new()
        .merge(openapi::docs_router())
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(allowed_origins))
        .layer(Extension(state))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    security([]),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
