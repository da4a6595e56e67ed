//! Landing pages server binary

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pages_server::{AppState, ServerConfig, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    tracing::info!("✓ Backend: {}", state.backend);
    tracing::info!("  Asset base: {}", state.resolver.asset_base().as_str());
    if state.local_assets.is_some() && config.dev_session.is_none() {
        tracing::warn!("⚠ No dev session configured - authoring API will answer 401");
        tracing::warn!("  Set DEV_ACCESS_TOKEN and DEV_USER_ID in .env");
    }

    let app = build_router(state, &config.static_dir, config.max_upload_bytes);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 pages server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                    - Health check");
    tracing::info!("  GET  /api/session               - Current user");
    tracing::info!("  GET  /api/pages                 - List your pages");
    tracing::info!("  POST /api/pages                 - Create a page (multipart)");
    tracing::info!("  GET  /api/pages/{{slug}}          - Public page data");
    tracing::info!("  POST /api/pages/{{slug}}/contact  - Contact the owner");
    tracing::info!("  POST /api/description/improve   - Improve a description");
    tracing::info!("  GET  /api/palette/generate      - Generate a palette");
    tracing::info!("  GET  /lp/{{slug}}                 - Public page");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
