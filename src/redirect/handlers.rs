use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;

use crate::config::RedirectMode;
use crate::links::{Outcome, Resolver};
use crate::models::timestamp;

pub struct RedirectState {
    pub resolver: Resolver,
    pub redirect_status: RedirectMode,
}

impl RedirectMode {
    pub fn status_code(self) -> StatusCode {
        match self {
            RedirectMode::Permanent => StatusCode::MOVED_PERMANENTLY,
            RedirectMode::Found => StatusCode::FOUND,
        }
    }
}

/// Redirect to the destination stored under `slug`
pub async fn redirect_url(
    State(state): State<Arc<RedirectState>>,
    Path(slug): Path<String>,
) -> Response {
    let started = Instant::now();
    let outcome = state.resolver.resolve(&slug, timestamp::now()).await;

    let response = match outcome {
        Ok(Outcome::Redirect(destination)) => (
            state.redirect_status.status_code(),
            [(header::LOCATION, destination)],
        )
            .into_response(),
        Ok(Outcome::NotFound) => (StatusCode::NOT_FOUND, "URL not found").into_response(),
        Ok(Outcome::Expired) => (StatusCode::GONE, "URL has expired").into_response(),
        Err(err) => {
            tracing::error!(slug = %slug, error = %err, "failed to resolve slug");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    };

    tracing::debug!(
        slug = %slug,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "resolved slug"
    );

    response
}
