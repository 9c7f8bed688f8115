use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::handlers::ErrorResponse;
use crate::config::AuthConfig;
use crate::links::AdminContext;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Decides whether a request may use the admin endpoints.
pub struct AuthService {
    enabled: bool,
    api_keys: Arc<Vec<String>>,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            enabled: config.enabled,
            api_keys: Arc::new(config.api_keys.clone()),
        }
    }

    pub fn validate_key(&self, key: Option<&str>) -> bool {
        if !self.enabled {
            return true;
        }

        match key {
            Some(key) if !key.is_empty() => self.api_keys.iter().any(|k| k == key),
            _ => false,
        }
    }

    /// Grants an [`AdminContext`] when the request carries a valid key.
    pub fn authorize(&self, headers: &HeaderMap) -> Option<AdminContext> {
        self.validate_key(extract_key(headers).as_deref())
            .then(AdminContext::granted)
    }
}

fn extract_key(headers: &HeaderMap) -> Option<String> {
    if let Some(key) = headers.get(API_KEY_HEADER).and_then(|h| h.to_str().ok()) {
        return Some(key.trim().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

pub async fn auth_middleware(
    auth_service: Arc<AuthService>,
    mut request: Request,
    next: Next,
) -> Response {
    match auth_service.authorize(request.headers()) {
        Some(ctx) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "rejected admin request");
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Unauthorized".to_string(),
                }),
            )
                .into_response()
        }
    }
}
