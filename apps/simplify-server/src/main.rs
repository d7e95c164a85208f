//! LumenLex Simplification Server
//!
//! Turns uploaded contracts (`.pdf` / `.docx`) into simplified, structured
//! documents with the Gemini API, then lets clients refine them one
//! instruction at a time. Provides REST API endpoints for:
//!
//! - Session upload, inspection and deletion
//! - Initial simplification, section edits and whole-document edits
//! - HTML / PDF / JSON downloads of the current revision
//!
//! Each session is edited by one request at a time; a concurrent edit on a
//! busy session is answered with `409 EDIT_IN_PROGRESS`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use render_engine::TypstRenderer;
use simplify_core::{GeminiClient, GeminiConfig, Simplifier, SimplifierOptions, SourceContextPolicy};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod state;

use api::{
    handle_create_session, handle_delete_session, handle_download, handle_edit_document,
    handle_edit_section, handle_get_session, handle_get_source, handle_health,
    handle_regenerate_artifacts, handle_simplify,
};
use state::AppState;

/// Uploads arrive base64-encoded inside JSON
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Command-line arguments for the simplification server
#[derive(Parser, Debug)]
#[command(name = "simplify-server")]
#[command(about = "LumenLex server for contract simplification and iterative editing")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Rewrite call timeout in milliseconds
    #[arg(long, default_value = "120000")]
    timeout_ms: u64,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Gemini model (overrides LUMENLEX_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// When to send the original text with whole-document edits: never, heuristic, always
    #[arg(long, default_value = "heuristic")]
    source_context: SourceContextPolicy,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Routes and middleware shared by the binary and the tests
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Sessions
        .route("/api/sessions", post(handle_create_session))
        .route(
            "/api/sessions/:id",
            get(handle_get_session).delete(handle_delete_session),
        )
        .route("/api/sessions/:id/source", get(handle_get_source))
        // Simplification and edits
        .route("/api/sessions/:id/simplify", post(handle_simplify))
        .route(
            "/api/sessions/:id/sections/:index/edit",
            post(handle_edit_section),
        )
        .route("/api/sessions/:id/edit", post(handle_edit_document))
        // Artifacts
        .route("/api/sessions/:id/artifacts", post(handle_regenerate_artifacts))
        .route("/api/sessions/:id/download/:format", get(handle_download))
        // Apply middleware
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting simplification server on {}:{}", args.host, args.port);

    let mut config =
        GeminiConfig::from_env()?.with_request_timeout(Duration::from_millis(args.timeout_ms));
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    let model = config.model.clone();
    let client = GeminiClient::new(config)?;

    let simplifier = Simplifier::new(Arc::new(client), Arc::new(TypstRenderer::new()))
        .with_options(SimplifierOptions {
            call_timeout: Some(Duration::from_millis(args.timeout_ms)),
            source_context: args.source_context,
        });

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limit: {}", args.rate_limit))?,
    );

    let app = build_router(AppState::new(simplifier)).layer(GovernorLayer {
        config: governor_conf,
    });

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Model: {}", model);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Rewrite timeout: {}ms", args.timeout_ms);
    info!("Source context policy: {}", args.source_context);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
