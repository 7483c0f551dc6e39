// src/presentation/http/controllers/auth.rs
use crate::application::{
    commands::users::{LoginUserCommand, LogoutCommand, RefreshTokenCommand, RegisterUserCommand},
    dto::{AuthTokenDto, UserDto, UserProfileDto},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: AuthTokenDto,
    pub user: UserDto,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 400, description = "Invalid input", body = crate::presentation::http::error::ErrorResponse),
        (status = 409, description = "Email or username taken", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "Auth"
)]
pub async fn register(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RegisterRequest>,
) -> HttpResult<(StatusCode, Json<UserDto>)> {
    let command = RegisterUserCommand {
        email: payload.email,
        username: payload.username,
        password: payload.password,
        password_confirmation: payload.password_confirmation,
        phone: payload.phone,
    };

    state
        .services
        .user_commands
        .register(command)
        .await
        .into_http()
        .map(|user| (StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair and user", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "Auth"
)]
pub async fn login(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<LoginRequest>,
) -> HttpResult<Json<LoginResponse>> {
    let command = LoginUserCommand {
        email: payload.email,
        password: payload.password,
    };

    let result = state
        .services
        .user_commands
        .login(command)
        .await
        .into_http()?;

    Ok(Json(LoginResponse {
        token: result.token,
        user: result.user,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Rotated token pair", body = AuthTokenDto),
        (status = 401, description = "Refresh token invalid, expired or already used", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "Auth"
)]
pub async fn refresh_token(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> HttpResult<Json<AuthTokenDto>> {
    state
        .services
        .user_commands
        .refresh_token(RefreshTokenCommand {
            token: payload.refresh_token,
        })
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    request_body = RefreshTokenRequest,
    responses(
        (status = 204, description = "Refresh token revoked"),
    ),
    security([]),
    tag = "Auth"
)]
pub async fn logout(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> HttpResult<StatusCode> {
    state
        .services
        .user_commands
        .logout(LogoutCommand {
            refresh_token: payload.refresh_token,
        })
        .await
        .into_http()?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Profile of the caller", body = UserProfileDto),
        (status = 401, description = "Missing or invalid token", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Auth"
)]
pub async fn profile(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
) -> HttpResult<Json<UserProfileDto>> {
    state
        .services
        .user_queries
        .profile(&user)
        .await
        .into_http()
        .map(Json)
}
