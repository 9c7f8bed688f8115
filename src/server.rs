//! Router assembly and server lifecycle.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::api;
use crate::auth::AuthService;
use crate::config::Config;
use crate::links::{Allocator, LinkAdmin, Resolver};
use crate::redirect;
use crate::storage::{self, Storage};

/// Build the full application router on top of an initialized store.
pub fn create_app(storage: Arc<dyn Storage>, config: &Config) -> Router {
    let allocator = Allocator::new(
        Arc::clone(&storage),
        config.slugs.length,
        config.slugs.max_attempts,
    );
    let admin = LinkAdmin::new(Arc::clone(&storage));
    let resolver = Resolver::new(storage);
    let auth_service = Arc::new(AuthService::new(&config.auth));

    let app = api::create_api_router(allocator, admin, auth_service, config.base_url.clone())
        .merge(redirect::create_redirect_router(
            resolver,
            config.redirect_status,
        ));

    let app = match &config.frontend.static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => app,
    };

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

pub async fn run(config: Config) -> Result<()> {
    info!(
        "Using {:?} storage: {}",
        config.database.backend, config.database.url
    );
    let storage = storage::connect(&config.database).await?;

    info!("Initializing database...");
    storage.init().await?;
    info!("Database initialized successfully");

    if config.auth.enabled {
        info!(
            "🔐 Admin endpoints require an API key ({} configured)",
            config.auth.api_keys.len()
        );
    } else {
        info!("🔓 Authentication is disabled - all admin requests are allowed");
    }

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("🎨 Serving frontend from directory: {}", static_dir);
    }

    let app = create_app(storage, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);
    info!("   - Short links served as {}/<slug>", config.base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
