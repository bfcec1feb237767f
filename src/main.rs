//! panel-sync - Basis panel inventory to Supabase
//!
//! One-shot synchronization: fetches panel devices from the Basis production
//! inventory API and uploads serials not yet present in the Supabase panels
//! table. Intended to run under an external scheduler, one instance at a time.

mod basis;
mod config;
mod error;
mod store;
mod sync;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::basis::{BasisClient, PANEL_TYPE_ID};
use crate::store::SupabaseStore;
use crate::sync::PanelSyncer;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_timer(
            tracing_subscriber::fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()),
        ))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panel_sync=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("Fatal error in main process: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    tracing::info!("Starting panel data upload process");

    // Validated before any network activity
    let config = config::Config::load()?;

    let source = BasisClient::new(config.basis_api_token.clone());
    let panels = source.get_devices(PANEL_TYPE_ID).await?;
    tracing::info!("Found {} panels in production", panels.len());

    let store = SupabaseStore::new(&config);
    let syncer = PanelSyncer::new(store);
    syncer.upload_panels(&panels).await;

    tracing::info!("Panel data upload process completed successfully");
    Ok(())
}
