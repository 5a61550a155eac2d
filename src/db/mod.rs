use std::str::FromStr;

use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::config::Config;

pub mod inventory_store;
pub mod inventory_table;

pub use inventory_store::InventoryStore;
pub use inventory_table::InventoryTable;

pub type DbPool = Pool<Sqlite>;

/// Initialize the database connection pool
pub async fn init_db_pool(config: &Config) -> Result<DbPool, sqlx::Error> {
    // Create the database file if it doesn't exist
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        // an in-memory database lives only as long as its connection
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}

/// Set up the database schema
async fn setup_database(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(&InventoryTable::create_table())
        .execute(pool)
        .await?;

    // Restart numbering at 1 if the table was emptied in an earlier session
    let count: (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*) FROM {}",
        InventoryTable::TABLE_NAME
    ))
    .fetch_one(pool)
    .await?;

    if count.0 == 0 {
        sqlx::query(&InventoryTable::reset_sequence())
            .execute(pool)
            .await?;
        tracing::debug!("inventory is empty, part numbering reset");
    }

    Ok(())
}
