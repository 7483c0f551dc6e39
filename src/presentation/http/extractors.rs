// src/presentation/http/extractors.rs
use crate::{
    application::{dto::AuthenticatedUser, error::ApplicationError},
    presentation::http::state::HttpState,
};
use axum::{Extension, extract::FromRequestParts, http::request::Parts};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};

use super::error::HttpError;

/// Caller identity; rejects with 401 when no valid bearer token is present.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedUser);

/// Optional caller identity. A missing header yields `None`; a header carrying
/// an invalid token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<AuthenticatedUser>);

impl MaybeAuthenticated {
    pub fn as_ref(&self) -> Option<&AuthenticatedUser> {
        self.0.as_ref()
    }
}

async fn app_state<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<HttpState, HttpError> {
    let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
        .await
        .map_err(|_| {
            HttpError::from_error(ApplicationError::infrastructure(
                "application state missing",
            ))
        })?;
    Ok(app_state)
}

async fn resolve(state: &HttpState, bearer: &Authorization<Bearer>) -> Result<AuthenticatedUser, HttpError> {
    state
        .services
        .authenticate(bearer.token())
        .await
        .map_err(HttpError::from_error)
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = app_state(parts, state).await?;

        let header = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| {
                HttpError::from_error(ApplicationError::unauthorized(
                    "missing Authorization header",
                ))
            })?;

        resolve(&app_state, &header).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for MaybeAuthenticated
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = app_state(parts, state).await?;

        match parts.headers.typed_get::<Authorization<Bearer>>() {
            Some(header) => resolve(&app_state, &header).await.map(|user| Self(Some(user))),
            None => Ok(Self(None)),
        }
    }
}
