// src/presentation/http/controllers/follows.rs
use crate::domain::user::UserId;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, extract::Path, http::StatusCode};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/users/follows/{id}",
    params(("id" = Uuid, Path, description = "User to follow")),
    responses(
        (status = 201, description = "Now following"),
        (status = 403, description = "Cannot follow yourself", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "Already following", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Follows"
)]
pub async fn follow(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<Uuid>,
) -> HttpResult<StatusCode> {
    state
        .services
        .follows
        .follow(&user, UserId::new(id))
        .await
        .into_http()?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/follows/{id}",
    params(("id" = Uuid, Path, description = "User to stop following")),
    responses(
        (status = 204, description = "Unfollowed"),
        (status = 403, description = "Cannot unfollow yourself", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "Not following", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Follows"
)]
pub async fn unfollow(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<Uuid>,
) -> HttpResult<StatusCode> {
    state
        .services
        .follows
        .unfollow(&user, UserId::new(id))
        .await
        .into_http()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Removes a follower of the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/users/follows/unfollow-from-you/{id}",
    params(("id" = Uuid, Path, description = "Follower to remove")),
    responses(
        (status = 204, description = "Follower removed"),
        (status = 403, description = "Cannot remove yourself", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "User does not follow you", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Follows"
)]
pub async fn unfollow_from_you(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<Uuid>,
) -> HttpResult<StatusCode> {
    state
        .services
        .follows
        .unfollow_from_you(&user, UserId::new(id))
        .await
        .into_http()?;
    Ok(StatusCode::NO_CONTENT)
}
