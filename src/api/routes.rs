use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::auth::{auth_middleware, AuthService};
use crate::links::{Allocator, LinkAdmin};

use super::handlers::{create_url, delete_url, health_check, list_urls, update_url, AppState};

pub fn create_api_router(
    allocator: Allocator,
    admin: LinkAdmin,
    auth_service: Arc<AuthService>,
    base_url: String,
) -> Router {
    let state = Arc::new(AppState {
        allocator,
        admin,
        base_url,
    });

    let admin_routes = Router::new()
        .route("/api/admin/urls", get(list_urls))
        .route("/api/admin/urls/{id}", patch(update_url).delete(delete_url))
        .route_layer(middleware::from_fn(move |req, next| {
            let auth = Arc::clone(&auth_service);
            auth_middleware(auth, req, next)
        }))
        .with_state(Arc::clone(&state));

    Router::new()
        .route("/health", get(health_check))
        .route("/shorten", post(create_url))
        .with_state(state)
        .merge(admin_routes)
}
