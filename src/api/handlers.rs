use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::links::{AdminContext, AllocationError, Allocator, LinkAdmin};
use crate::models::timestamp::{parse_rfc3339, to_rfc3339};
use crate::models::{CreateUrlRequest, CreateUrlResponse, LinkResponse, UpdateUrlRequest};

pub struct AppState {
    pub allocator: Allocator,
    pub admin: LinkAdmin,
    pub base_url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Parse an optional RFC 3339 expiry; blank strings mean "no expiry".
fn parse_expiry(value: Option<&str>) -> Result<Option<i64>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_rfc3339(raw).map(Some).map_err(|_| {
            api_error(
                StatusCode::BAD_REQUEST,
                "expiresAt must be an RFC 3339 timestamp",
            )
        }),
    }
}

fn allocation_error(err: AllocationError) -> ApiError {
    match err {
        AllocationError::InvalidDestination(_) | AllocationError::InvalidSlugFormat => {
            api_error(StatusCode::BAD_REQUEST, err.to_string())
        }
        AllocationError::SlugConflict => api_error(StatusCode::CONFLICT, "Slug already exists"),
        AllocationError::AllocationExhausted { attempts } => {
            tracing::warn!(attempts, "slug generation exhausted its attempt budget");
            api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "Failed to generate unique slug",
            )
        }
        AllocationError::Storage(e) => {
            tracing::error!(error = %e, "failed to create link");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

/// Create a new short link
pub async fn create_url(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<Json<CreateUrlResponse>, ApiError> {
    if payload.url.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "URL is required"));
    }

    let expires_at = parse_expiry(payload.expires_at.as_deref())?;
    let custom_slug = payload
        .custom_slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let record = state
        .allocator
        .allocate(custom_slug, &payload.url, expires_at)
        .await
        .map_err(allocation_error)?;

    tracing::info!(slug = %record.slug, id = record.id, "created link");

    Ok(Json(CreateUrlResponse {
        success: true,
        short_url: format!("{}/{}", state.base_url, record.slug),
        expires_at: record.expires_at.and_then(to_rfc3339),
        slug: record.slug,
        original_url: record.original_url,
    }))
}

/// List every link, newest first
pub async fn list_urls(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AdminContext>,
) -> Result<Json<Vec<LinkResponse>>, ApiError> {
    let links = state.admin.list_all(&ctx).await.map_err(|e| {
        tracing::error!(error = %e, "failed to list links");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    })?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Overwrite a link's expiry
pub async fn update_url(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AdminContext>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let expires_at = parse_expiry(payload.expires_at.as_deref())?;

    state
        .admin
        .update_expiry(&ctx, id, expires_at)
        .await
        .map_err(|e| {
            tracing::error!(id, error = %e, "failed to update link expiry");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        })?;

    tracing::info!(id, ?expires_at, "updated link expiry");
    Ok(Json(SuccessResponse { success: true }))
}

/// Delete a link
pub async fn delete_url(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AdminContext>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.admin.delete(&ctx, id).await.map_err(|e| {
        tracing::error!(id, error = %e, "failed to delete link");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    })?;

    tracing::info!(id, "deleted link");
    Ok(Json(SuccessResponse { success: true }))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "OK" }))
}
