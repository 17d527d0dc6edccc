use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use oxidized_charts::{config::Config, create_router, llm::create_adapter, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    oxidized_charts::utils::init_logger();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    if config.llm.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; analysis and chart generation will return fallback messages");
    }

    let llm = create_adapter(&config.llm)
        .map_err(|e| anyhow::anyhow!("Failed to create LLM adapter: {}", e))?;

    // Create shared state
    let state = AppState::new(config.clone(), llm);
    state.storage.ensure_dirs().await?;
    info!(
        uploads = %state.storage.upload_dir().display(),
        charts = %state.storage.charts_dir().display(),
        "Storage directories ready"
    );

    let app = create_router(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("Server listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
