use anyhow::Context;
use brain_cards::category_manager::CategoryManager;
use brain_cards::cli::Cli;
use brain_cards::logging::init_logging;
use brain_cards::server;
use brain_cards::storage::JsonStorage;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let config = cli.to_config().context("invalid configuration")?;
    tracing::debug!(?config, "configuration loaded");

    let storage = JsonStorage::from_config(&config);
    storage
        .ensure_exists()
        .await
        .with_context(|| format!("cannot prepare {}", storage.path().display()))?;

    let manager = Arc::new(CategoryManager::new(Arc::new(storage)));

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;

    server::run(listener, manager).await?;
    Ok(())
}
