//! Storefront State Service

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_state::config::Config;
use storefront_state::events::EventPublisher;
use storefront_state::http::{router, AppState};
use storefront_state::storage::{FileStorage, MemoryStorage, Storage};
use storefront_state::{SeedData, Store};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage: Arc<dyn Storage> = match &config.storage_dir {
        Some(dir) => Arc::new(FileStorage::open(dir)?),
        None => Arc::new(MemoryStorage::default()),
    };
    let store = Store::new(SeedData::demo(), storage, config.settings());
    let publisher = EventPublisher::connect(config.nats_url.as_deref()).await;
    let app = router(AppState::new(store, publisher));

    let addr = config.socket_addr();
    tracing::info!("Storefront state service listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
