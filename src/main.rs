use anyhow::Context;
use paperswap::quote::JupiterQuoteSource;
use paperswap::{api, config::Config, db::init_db, QuoteSource, Repository, TradeEngine};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("loading configuration")?;
    let port = config.port;

    let pool = init_db(&config.database_path)
        .await
        .context("initializing database")?;

    let repo = Arc::new(Repository::new(pool));
    let quotes: Arc<dyn QuoteSource> = Arc::new(JupiterQuoteSource::new(
        config.quote_api_url.clone(),
        Duration::from_millis(config.quote_timeout_ms),
        config.slippage_bps,
    ));
    let engine = Arc::new(TradeEngine::new(repo.clone(), quotes));

    let app = api::create_router(api::AppState::new(engine, repo));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
