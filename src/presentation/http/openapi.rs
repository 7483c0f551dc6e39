// src/presentation/http/openapi.rs
use axum::{Router, response::Redirect, routing::get};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, env};
use utoipa::openapi::{
    Components,
    security::{Http, HttpAuthScheme, SecurityScheme},
    server::Server,
};
use utoipa::{Modify, OpenApi, ToSchema};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::auth::register,
        crate::presentation::http::controllers::auth::login,
        crate::presentation::http::controllers::auth::refresh_token,
        crate::presentation::http::controllers::auth::logout,
        crate::presentation::http::controllers::auth::profile,
        crate::presentation::http::controllers::pastries::search_pastries,
        crate::presentation::http::controllers::pastries::create_pastry,
        crate::presentation::http::controllers::pastries::get_pastry,
        crate::presentation::http::controllers::pastries::update_pastry,
        crate::presentation::http::controllers::pastries::similar_pastries,
        crate::presentation::http::controllers::likes::create_like,
        crate::presentation::http::controllers::likes::delete_like,
        crate::presentation::http::controllers::follows::follow,
        crate::presentation::http::controllers::follows::unfollow,
        crate::presentation::http::controllers::follows::unfollow_from_you,
        super::routes::health
    ),
    components(
        schemas(
            StatusResponse,
            crate::presentation::http::error::ErrorResponse,
            crate::presentation::http::controllers::auth::RegisterRequest,
            crate::presentation::http::controllers::auth::LoginRequest,
            crate::presentation::http::controllers::auth::LoginResponse,
            crate::presentation::http::controllers::auth::RefreshTokenRequest,
            crate::presentation::http::controllers::pastries::LocationRequest,
            crate::presentation::http::controllers::pastries::CreatePastryRequest,
            crate::presentation::http::controllers::pastries::UpdatePastryRequest,
            crate::presentation::http::controllers::pastries::PastryForm,
            crate::application::dto::UserDto,
            crate::application::dto::UserProfileDto,
            crate::application::dto::AuthTokenDto,
            crate::application::dto::MediaDto,
            crate::application::dto::GeolocationDto,
            crate::application::dto::PastryDto,
            crate::application::dto::OwnerPastryDto,
            crate::application::dto::PublicPastryDto,
            crate::application::dto::PastryView,
            crate::domain::pastry::Category
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and token rotation"),
        (name = "Pastries", description = "Listing discovery and management"),
        (name = "Likes", description = "Likes on listings"),
        (name = "Follows", description = "Follow relationships between users"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    security(("bearerAuth" = [])),
    info(
        title = "Pastry Market API",
        description = "Pastry marketplace backend",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

/// Public base URLs from `PUBLIC_API_URLS` (comma separated), falling back
/// to `PUBLIC_API_URL`, always ending with the local development server.
fn public_servers() -> Vec<String> {
    let mut urls: Vec<String> = env::var("PUBLIC_API_URLS")
        .ok()
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(|segment| segment.trim_end_matches('/').to_string())
                .collect()
        })
        .unwrap_or_default();

    if urls.is_empty() {
        if let Ok(url) = env::var("PUBLIC_API_URL") {
            let sanitized = url.trim().trim_end_matches('/').to_string();
            if !sanitized.is_empty() {
                urls.push(sanitized);
            }
        }
    }

    urls.push("http://localhost:8080".to_string());

    let mut seen = HashSet::new();
    urls.retain(|url| seen.insert(url.clone()));
    urls
}

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        let mut http = Http::new(HttpAuthScheme::Bearer);
        http.bearer_format = Some("Biscuit".into());
        components.add_security_scheme("bearerAuth", SecurityScheme::Http(http));

        openapi.servers = Some(public_servers().into_iter().map(Server::new).collect());
    }
}

pub fn docs_router() -> Router {
    let openapi = ApiDoc::openapi();
    let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi.clone());
    let redoc = Redoc::with_url("/redoc", openapi);
    Router::new()
        .merge(swagger)
        .merge(redoc)
        .route("/", get(|| async { Redirect::permanent("/docs") }))
}
