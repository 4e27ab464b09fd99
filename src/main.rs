use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use document_analyzer::{config::Config, create_router, utils::init_logger, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        server = ?config.server,
        llm = ?config.llm,
        upload = ?config.upload,
        "Configuration loaded"
    );

    if config.llm.google_api_key.is_empty() {
        warn!("GEMINI_API_KEY is not set; analyses will come back as API errors");
    }

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid HOST '{}': {}", config.server.host, e))?;
    let addr = SocketAddr::new(host, config.server.port);

    // Create shared state
    let state = AppState::from_config(config)?;
    state.uploads.ensure_dir().await?;
    info!(
        upload_dir = %state.uploads.root().display(),
        models = ?state.completion.candidate_models(),
        "Service initialised"
    );

    let app = create_router(state);

    // Start server
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
