use std::sync::Arc;

use anyhow::Context;
use common::logger::init_logger;
use market::StargazeClient;
use tokio::io::BufReader;
use watcher::{
    commands::register_commands,
    config::{AppConfig, CollectionsFile},
    console::{ConsoleFloorFlow, ConsoleSurface, StdoutInteraction},
    presence::LogPresence,
    supervisor::FloorWatcher,
    time::HumanTime,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env();
    init_logger("floorwatch", cfg.json_logs);

    tracing::info!("Starting floor watcher...");

    let collections = CollectionsFile::load(&cfg.collections_path).with_context(|| {
        format!(
            "failed to load collections from {}",
            cfg.collections_path.display()
        )
    })?;

    let client = StargazeClient::new(cfg.stargaze_api_url.clone(), cfg.fetch_timeout)
        .context("failed to build stargaze client")?;

    let mut watcher = FloorWatcher::new(collections, Arc::new(client), Arc::new(LogPresence));

    let mut surface = ConsoleSurface::new();
    register_commands(
        &mut surface,
        watcher.state(),
        Arc::new(HumanTime),
        Arc::new(ConsoleFloorFlow),
    );

    watcher.begin_watching()?;
    tracing::info!(
        collections = ?watcher.tracked(),
        commands = ?surface.command_names(),
        "floor watcher running; type a command name or Ctrl-C to exit"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let interaction = StdoutInteraction;
    tokio::select! {
        res = surface.serve(stdin, &interaction) => {
            if let Err(e) = res {
                tracing::error!(error = ?e, "console input failed");
            }
            // stdin closed: keep refreshing until asked to stop
            tokio::signal::ctrl_c().await?;
        }
        res = tokio::signal::ctrl_c() => res?,
    }

    tracing::info!("Shutdown signal received");
    watcher.shutdown(cfg.shutdown_grace).await;

    Ok(())
}
