use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use camwarden::supervisor::{CameraRegistry, JsonFileStore, spawn_retention_task};

const RETENTION_SWEEP_PERIOD: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cameras.json".to_string());
    log::info!("camwarden starting with config '{}'", config_path);

    let store = Arc::new(JsonFileStore::new(PathBuf::from(config_path)));
    let registry = Arc::new(CameraRegistry::new(store));
    registry.initialize().await?;
    log::info!(
        "supervising {} camera(s)",
        registry.list_cameras().await.len()
    );

    let retention = spawn_retention_task(Arc::clone(&registry), RETENTION_SWEEP_PERIOD);

    tokio::signal::ctrl_c().await?;
    log::info!("shutdown requested");

    retention.abort();
    registry.shutdown().await?;
    Ok(())
}
