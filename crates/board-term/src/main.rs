//! Terminal view layer for the task board
//!
//! Reads one JSON event per line on stdin and answers each with a board
//! snapshot on stdout. Logs go to stderr.

mod events;

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::events::EventLoop;
use taskboard_core::kanban::TaskStore;
use taskboard_core::storage::FileStorage;
use taskboard_core::StoreConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "board_term=info,taskboard_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = StoreConfig::from_env();
    tracing::info!(
        "Using data directory {:?}, key '{}', load policy {:?}",
        config.data_dir,
        config.storage_key,
        config.load_policy
    );

    let storage = FileStorage::new(config.data_dir.clone());
    let store = TaskStore::initialize(storage, &config).await;
    let mut event_loop = EventLoop::new(store);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    event_loop.run(stdin, &mut stdout).await?;

    tracing::info!("Input closed, exiting");
    Ok(())
}
