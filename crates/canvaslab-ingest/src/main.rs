use anyhow::Context;
use canvaslab_ingest::cli::{Cli, Command};
use canvaslab_ingest::{IngestConfig, StoreStats, server};
use canvaslab_logging::SubscriberBuilder;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = IngestConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Serve(args) => {
            config.apply_serve_args(&args);

            // Keep the guard alive so file output flushes on exit
            let _log_guard = SubscriberBuilder::new()
                .with_config(config.logging.clone())
                .init();

            let store = config
                .storage
                .open()
                .context("failed to open event store")?;
            info!(backend = ?config.storage.backend, "Store ready");

            server::serve(&config.server, store).await?;
        }

        Command::Stats { db } => {
            let path = db.unwrap_or(config.storage.path);
            let stats = StoreStats::read_db(&path)
                .await
                .with_context(|| format!("failed to read stats from {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
