use axum::{routing::get, Router};
use std::sync::Arc;

use crate::config::RedirectMode;
use crate::links::Resolver;

use super::handlers::{redirect_url, RedirectState};

pub fn create_redirect_router(resolver: Resolver, redirect_status: RedirectMode) -> Router {
    let state = Arc::new(RedirectState {
        resolver,
        redirect_status,
    });

    Router::new()
        .route("/{slug}", get(redirect_url))
        .with_state(state)
}
