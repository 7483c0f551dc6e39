// src/presentation/http/controllers/likes.rs
use crate::domain::pastry::PastryId;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, extract::Path, http::StatusCode};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/v1/pastries/{id}/likes",
    params(("id" = Uuid, Path, description = "Pastry id")),
    responses(
        (status = 201, description = "Pastry liked"),
        (status = 403, description = "Owners cannot like their own pastry", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Pastry not found", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "Already liked", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Likes"
)]
pub async fn create_like(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<Uuid>,
) -> HttpResult<StatusCode> {
    state
        .services
        .likes
        .create_like(&user, PastryId::new(id))
        .await
        .into_http()?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/api/v1/pastries/{id}/likes",
    params(("id" = Uuid, Path, description = "Pastry id")),
    responses(
        (status = 204, description = "Like removed"),
        (status = 404, description = "Pastry not found", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "Pastry was not liked", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Likes"
)]
pub async fn delete_like(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<Uuid>,
) -> HttpResult<StatusCode> {
    state
        .services
        .likes
        .delete_like(&user, PastryId::new(id))
        .await
        .into_http()?;
    Ok(StatusCode::NO_CONTENT)
}
