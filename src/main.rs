use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vane::config::Config;
use vane::execution::{SimulatedExecutor, TracingPresenter, WeightedCoinFlip};
use vane::services::Engine;
use vane::sources::PlatformWs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vane=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    config.trading.validate()?;
    info!(
        "Starting Vane for {} (auto trading {})",
        config.asset,
        if config.trading.enabled { "on" } else { "off" }
    );

    let (events_tx, events_rx) = Engine::channel();

    let engine = Engine::new(
        config.trading.clone(),
        Arc::new(SimulatedExecutor::default()),
        Arc::new(WeightedCoinFlip::default()),
        Arc::new(TracingPresenter),
        events_tx.clone(),
    )
    .with_execution_timeout(Duration::from_secs(config.execution_timeout_secs));

    let source = PlatformWs::new(config.ws_url.clone(), config.asset.clone(), events_tx);
    tokio::spawn(async move {
        if let Err(e) = source.connect().await {
            tracing::error!("Quote feed terminated: {}", e);
        }
    });

    engine.run(events_rx).await;

    Ok(())
}
