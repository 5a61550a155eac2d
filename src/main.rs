use std::io;

use anyhow::Context;
use parts_inventory::{Config, InventoryStore, logging, shell::Shell};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = Config::from_env()?;
    let store = InventoryStore::open(&config)
        .await
        .with_context(|| format!("failed to open inventory at {}", config.database_url))?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let outcome = Shell::new(&store).run(stdin.lock(), &mut stdout).await;

    // Close the store even if the terminal went away
    store.close().await;

    outcome.context("failed to read commands")
}
