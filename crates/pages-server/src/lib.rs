//! Landing pages HTTP Server
//!
//! Axum-based server providing the authoring REST API, server-rendered
//! public pages under `/lp/{slug}`, and the static WASM frontend.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod state;
pub mod upload;
pub mod views;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use crate::config::ServerConfig;
pub use crate::state::AppState;

use crate::handlers::{
    create_page, current_session, generate_palette, get_page, health_check, improve_text,
    list_pages, send_contact, serve_asset,
};
use crate::views::{public_contact, public_page};

/// Full application router
pub fn build_router(state: AppState, static_dir: &str, max_upload_bytes: usize) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))

        // Authoring API
        .route("/api/session", get(current_session))
        .route(
            "/api/pages",
            get(list_pages).post(create_page).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/description/improve", post(improve_text))
        .route("/api/palette/generate", get(generate_palette))

        // Public pages
        .route("/api/pages/{slug}", get(get_page))
        .route("/api/pages/{slug}/contact", post(send_contact))
        .route("/lp/{slug}", get(public_page))
        .route("/lp/{slug}/contact", post(public_contact))

        // Stored objects (memory backend)
        .route("/assets/{*key}", get(serve_asset))

        // Static files (WASM frontend)
        .fallback_service(ServeDir::new(static_dir))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
