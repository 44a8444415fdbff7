mod analysis;
mod config;
mod db;
mod errors;
mod feedback;
mod render;
mod routes;
mod state;
mod ui;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::client::HttpAnalysisFunction;
use crate::config::Config;
use crate::db::create_pool;
use crate::feedback::store::PgFeedbackStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::ui::clipboard::SystemClipboard;
use crate::ui::session::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillMatch v{}", env!("CARGO_PKG_VERSION"));

    // Feedback store (PostgreSQL, migrations applied on connect)
    let db = create_pool(&config.database_url).await?;

    // Remote analysis function
    let analyzer = HttpAnalysisFunction::new(
        &config.analysis_function_url,
        &config.analysis_function_name,
        config.analysis_function_key.clone(),
    )?;
    info!("Analysis function endpoint: {}", analyzer.endpoint());

    if config.feedback_read_token.is_none() {
        info!("FEEDBACK_READ_TOKEN not set; feedback reads are disabled");
    }

    let sessions = Arc::new(SessionStore::new());
    SessionStore::spawn_sweeper(Arc::clone(&sessions), config.session_idle_ttl);
    info!(
        "Idle sessions expire after {}s",
        config.session_idle_ttl.as_secs()
    );

    let state = AppState {
        config: config.clone(),
        analyzer: Arc::new(analyzer),
        clipboard: Arc::new(SystemClipboard::default()),
        feedback: Arc::new(PgFeedbackStore::new(db)),
        sessions,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
