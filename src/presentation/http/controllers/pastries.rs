// src/presentation/http/controllers/pastries.rs
use crate::application::{
    commands::pastries::{CreatePastryCommand, LocationInput, UpdatePastryCommand},
    dto::{CursorPage, OwnerPastryDto, PastryView, PublicPastryDto},
    ports::media_storage::MediaUpload,
    queries::pastries::{GetPastryByIdQuery, SearchPastriesQuery, SimilarPastriesQuery},
};
use crate::domain::pastry::PastryId;
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{Authenticated, MaybeAuthenticated};
use crate::presentation::http::search_params::parse_search_criteria;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Multipart, Path, RawQuery, multipart::MultipartError},
    http::StatusCode,
};
use serde::{Deserialize, de::DeserializeOwned};
use utoipa::ToSchema;
use uuid::Uuid;

const PAYLOAD_FIELD: &str = "payload";
const MEDIA_FIELD: &str = "media";

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct LocationRequest {
    pub lat: f64,
    pub lng: f64,
}

impl From<LocationRequest> for LocationInput {
    fn from(value: LocationRequest) -> Self {
        Self {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

/// JSON carried in the `payload` part of a create request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePastryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub unit: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub contact_phone: String,
    #[serde(default)]
    pub geolocation: Option<LocationRequest>,
}

/// JSON carried in the `payload` part of an update request. Absent fields
/// are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePastryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub unit: Option<String>,
    pub categories: Option<Vec<String>>,
    pub contact_phone: Option<String>,
    pub geolocation: Option<LocationRequest>,
    #[serde(default)]
    pub removed_media: Vec<Uuid>,
}

/// Multipart layout shared by create and update.
#[derive(Debug, ToSchema)]
pub struct PastryForm {
    /// JSON document (`CreatePastryRequest` or `UpdatePastryRequest`).
    pub payload: String,
    /// Image files, repeatable.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub media: Vec<Vec<u8>>,
}

struct ParsedForm<T> {
    payload: Option<T>,
    media: Vec<MediaUpload>,
}

fn multipart_error(err: MultipartError) -> HttpError {
    HttpError::with_status(err.status(), err.body_text())
}

async fn read_form<T: DeserializeOwned>(mut multipart: Multipart) -> HttpResult<ParsedForm<T>> {
    let mut payload = None;
    let mut media = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            PAYLOAD_FIELD => {
                let text = field.text().await.map_err(multipart_error)?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|err| HttpError::bad_request(format!("invalid payload: {err}")))?;
                payload = Some(parsed);
            }
            MEDIA_FIELD | "media[]" => {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                media.push(MediaUpload {
                    original_name,
                    content_type,
                    bytes,
                });
            }
            other => {
                tracing::debug!(field = other, "ignoring unknown multipart field");
            }
        }
    }

    Ok(ParsedForm { payload, media })
}

#[utoipa::path(
    get,
    path = "/api/v1/pastries",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring match on the name"),
        ("categories[]" = Option<Vec<String>>, Query, description = "Any of these categories"),
        ("price[min]" = Option<f64>, Query, description = "Inclusive lower price bound"),
        ("price[max]" = Option<f64>, Query, description = "Inclusive upper price bound"),
        ("geolocation[lat]" = Option<f64>, Query, description = "Search centre latitude"),
        ("geolocation[lng]" = Option<f64>, Query, description = "Search centre longitude"),
        ("geolocation[radius]" = Option<f64>, Query, description = "Radius in kilometres"),
        ("orderBy" = Option<String>, Query, description = "price, createdAt or popularity"),
        ("order" = Option<String>, Query, description = "asc or desc"),
        ("pagination[cursor]" = Option<Uuid>, Query, description = "Id of the last item of the previous page"),
        ("pagination[limit]" = Option<u32>, Query, description = "Page size, 10 to 100"),
    ),
    responses(
        (status = 200, description = "One page of listings", body = CursorPage<PublicPastryDto>),
        (status = 400, description = "Invalid search parameters", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([], ("bearerAuth" = [])),
    tag = "Pastries"
)]
pub async fn search_pastries(
    Extension(state): Extension<HttpState>,
    actor: MaybeAuthenticated,
    RawQuery(raw): RawQuery,
) -> HttpResult<Json<CursorPage<PublicPastryDto>>> {
    let criteria = parse_search_criteria(raw.as_deref())?;
    state
        .services
        .pastry_queries
        .search(actor.as_ref(), SearchPastriesQuery { criteria })
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/v1/pastries/{id}",
    params(("id" = Uuid, Path, description = "Pastry id")),
    responses(
        (status = 200, description = "Owner or public view of the listing", body = PastryView),
        (status = 404, description = "Pastry not found", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([], ("bearerAuth" = [])),
    tag = "Pastries"
)]
pub async fn get_pastry(
    Extension(state): Extension<HttpState>,
    actor: MaybeAuthenticated,
    Path(id): Path<Uuid>,
) -> HttpResult<Json<PastryView>> {
    state
        .services
        .pastry_queries
        .find_by_id(
            actor.as_ref(),
            GetPastryByIdQuery {
                id: PastryId::new(id),
            },
        )
        .await
        .into_http()?
        .map(Json)
        .ok_or_else(|| HttpError::not_found("pastry not found"))
}

#[utoipa::path(
    get,
    path = "/api/v1/pastries/{id}/similar",
    params(
        ("id" = Uuid, Path, description = "Reference pastry id"),
        ("categories[]" = Option<Vec<String>>, Query, description = "Any of these categories"),
        ("price[min]" = Option<f64>, Query, description = "Inclusive lower price bound"),
        ("price[max]" = Option<f64>, Query, description = "Inclusive upper price bound"),
        ("pagination[cursor]" = Option<Uuid>, Query, description = "Id of the last item of the previous page"),
        ("pagination[limit]" = Option<u32>, Query, description = "Page size, 10 to 100"),
    ),
    responses(
        (status = 200, description = "Listings related to the reference", body = CursorPage<PublicPastryDto>),
        (status = 400, description = "Invalid search parameters", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Reference pastry not found", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([], ("bearerAuth" = [])),
    tag = "Pastries"
)]
pub async fn similar_pastries(
    Extension(state): Extension<HttpState>,
    actor: MaybeAuthenticated,
    Path(id): Path<Uuid>,
    RawQuery(raw): RawQuery,
) -> HttpResult<Json<CursorPage<PublicPastryDto>>> {
    let criteria = parse_search_criteria(raw.as_deref())?;
    state
        .services
        .pastry_queries
        .similar(
            actor.as_ref(),
            SimilarPastriesQuery {
                id: PastryId::new(id),
                criteria,
            },
        )
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/pastries",
    request_body(content = PastryForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Listing created", body = OwnerPastryDto),
        (status = 400, description = "Invalid payload or media", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Pastries"
)]
pub async fn create_pastry(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    multipart: Multipart,
) -> HttpResult<(StatusCode, Json<OwnerPastryDto>)> {
    let form = read_form::<CreatePastryRequest>(multipart).await?;
    let payload = form
        .payload
        .ok_or_else(|| HttpError::bad_request("missing payload field"))?;

    let command = CreatePastryCommand {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        unit: payload.unit,
        categories: payload.categories,
        contact_phone: payload.contact_phone,
        geolocation: payload.geolocation.map(Into::into),
        media: form.media,
    };

    state
        .services
        .pastry_commands
        .create(&user, command)
        .await
        .into_http()
        .map(|pastry| (StatusCode::CREATED, Json(pastry)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/pastries/{id}",
    params(("id" = Uuid, Path, description = "Pastry id")),
    request_body(content = PastryForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Listing updated", body = OwnerPastryDto),
        (status = 400, description = "Invalid payload or media", body = crate::presentation::http::error::ErrorResponse),
        (status = 403, description = "Caller does not own the listing", body = crate::presentation::http::error::ErrorResponse),
        (status = 404, description = "Pastry or media not found", body = crate::presentation::http::error::ErrorResponse),
    ),
    tag = "Pastries"
)]
pub async fn update_pastry(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> HttpResult<Json<OwnerPastryDto>> {
    let form = read_form::<UpdatePastryRequest>(multipart).await?;
    let payload = form.payload.unwrap_or_default();

    let command = UpdatePastryCommand {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        unit: payload.unit,
        categories: payload.categories,
        contact_phone: payload.contact_phone,
        geolocation: payload.geolocation.map(Into::into),
        removed_media: payload.removed_media,
        media: form.media,
    };

    state
        .services
        .pastry_commands
        .update(&user, PastryId::new(id), command)
        .await
        .into_http()
        .map(Json)
}
