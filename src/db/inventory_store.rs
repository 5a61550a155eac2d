use crate::{
    config::Config,
    db::{DbPool, InventoryTable, init_db_pool},
    error::{InventoryError, Result},
    models::part::{
        Direction, Part, PartInput, StockedPart, parse_delta, parse_part_number,
    },
};

/// Inventory store for database operations.
///
/// Every mutation runs in its own transaction; a failed call leaves the
/// table untouched.
pub struct InventoryStore {
    pool: DbPool,
}

impl InventoryStore {
    /// Create a new InventoryStore with the provided database pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open the database described by `config`, creating file and schema as needed
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = init_db_pool(config).await?;
        tracing::info!(database = %config.database_url, "inventory store opened");
        Ok(Self::new(pool))
    }

    /// Close the pool; the store is consumed
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("inventory store closed");
    }

    /// Add a new part and return its freshly assigned part number
    pub async fn add(&self, input: &PartInput) -> Result<i64> {
        let fields = input.validate()?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&format!(
            "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            InventoryTable::TABLE_NAME,
            InventoryTable::COLUMN_PART_NAME,
            InventoryTable::COLUMN_DESCRIPTION,
            InventoryTable::COLUMN_ORIGIN_PART_NUMBER,
            InventoryTable::COLUMN_VENDOR_PART_NUMBER,
            InventoryTable::COLUMN_COST,
            InventoryTable::COLUMN_QUANTITY,
            InventoryTable::COLUMN_MIN_ON_HAND,
            InventoryTable::COLUMN_LOCATION,
        ))
        .bind(&fields.part_name)
        .bind(&fields.description)
        .bind(&fields.origin_part_number)
        .bind(&fields.vendor_part_number)
        .bind(fields.cost)
        .bind(fields.quantity)
        .bind(fields.min_on_hand)
        .bind(&fields.location)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        let part_number = result.last_insert_rowid();
        tracing::info!(part_number, part_name = %fields.part_name, "part added");
        Ok(part_number)
    }

    /// Move stock in or out and return the new quantity
    pub async fn adjust_quantity(
        &self,
        part_number: i64,
        delta: i64,
        direction: Direction,
    ) -> Result<i64> {
        if delta <= 0 {
            return Err(InventoryError::validation(
                "delta",
                "must be a positive integer",
            ));
        }

        let mut tx = self.pool.begin().await?;
        let current: i64 = sqlx::query_scalar(&format!(
            "SELECT {} FROM {} WHERE {} = ?",
            InventoryTable::COLUMN_QUANTITY,
            InventoryTable::TABLE_NAME,
            InventoryTable::COLUMN_PART_NUMBER,
        ))
        .bind(part_number)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(InventoryError::NotFound(part_number))?;

        let new_quantity = match direction {
            Direction::In => current
                .checked_add(delta)
                .ok_or_else(|| InventoryError::validation("delta", "quantity would overflow"))?,
            Direction::Out if current < delta => {
                tracing::warn!(part_number, requested = delta, available = current, "insufficient stock");
                return Err(InventoryError::InsufficientStock {
                    part_number,
                    available: current,
                    requested: delta,
                });
            }
            Direction::Out => current - delta,
        };

        sqlx::query(&format!(
            "UPDATE {} SET {} = ? WHERE {} = ?",
            InventoryTable::TABLE_NAME,
            InventoryTable::COLUMN_QUANTITY,
            InventoryTable::COLUMN_PART_NUMBER,
        ))
        .bind(new_quantity)
        .bind(part_number)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(part_number, %direction, delta, new_quantity, "quantity adjusted");
        Ok(new_quantity)
    }

    /// Scan in/out from raw text, as typed or read by a barcode scanner
    pub async fn scan(
        &self,
        part_number: &str,
        quantity: &str,
        direction: Direction,
    ) -> Result<i64> {
        let delta = parse_delta("quantity", quantity)?;
        let part_number = parse_part_number(part_number)?;
        self.adjust_quantity(part_number, delta, direction).await
    }

    /// Replace every mutable field of a part
    pub async fn update(&self, part_number: i64, input: &PartInput) -> Result<()> {
        let fields = input.validate()?;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&format!(
            "UPDATE {} SET {} = ?, {} = ?, {} = ?, {} = ?, {} = ?, {} = ?, {} = ?, {} = ? WHERE {} = ?",
            InventoryTable::TABLE_NAME,
            InventoryTable::COLUMN_PART_NAME,
            InventoryTable::COLUMN_DESCRIPTION,
            InventoryTable::COLUMN_ORIGIN_PART_NUMBER,
            InventoryTable::COLUMN_VENDOR_PART_NUMBER,
            InventoryTable::COLUMN_COST,
            InventoryTable::COLUMN_QUANTITY,
            InventoryTable::COLUMN_MIN_ON_HAND,
            InventoryTable::COLUMN_LOCATION,
            InventoryTable::COLUMN_PART_NUMBER,
        ))
        .bind(&fields.part_name)
        .bind(&fields.description)
        .bind(&fields.origin_part_number)
        .bind(&fields.vendor_part_number)
        .bind(fields.cost)
        .bind(fields.quantity)
        .bind(fields.min_on_hand)
        .bind(&fields.location)
        .bind(part_number)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(InventoryError::NotFound(part_number));
        }
        tx.commit().await?;

        tracing::info!(part_number, "part updated");
        Ok(())
    }

    /// Delete a part by part number
    pub async fn remove(&self, part_number: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE {} = ?",
            InventoryTable::TABLE_NAME,
            InventoryTable::COLUMN_PART_NUMBER,
        ))
        .bind(part_number)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(InventoryError::NotFound(part_number));
        }
        tx.commit().await?;

        tracing::info!(part_number, "part removed");
        Ok(())
    }

    /// Get a part by part number
    pub async fn get(&self, part_number: i64) -> Result<Part> {
        let part = sqlx::query_as::<_, Part>(&format!(
            "SELECT {} FROM {} WHERE {} = ?",
            InventoryTable::columns(),
            InventoryTable::TABLE_NAME,
            InventoryTable::COLUMN_PART_NUMBER,
        ))
        .bind(part_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(InventoryError::NotFound(part_number))?;

        Ok(part)
    }

    /// Get a list of all parts in insertion order
    pub async fn list(&self) -> Result<Vec<StockedPart>> {
        Ok(self
            .fetch_all_parts()
            .await?
            .into_iter()
            .map(StockedPart::from)
            .collect())
    }

    /// Parts where any column contains `term`, ignoring case
    pub async fn search(&self, term: &str) -> Result<Vec<StockedPart>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(InventoryError::validation("term", "please enter a search term"));
        }

        let parts: Vec<StockedPart> = self
            .fetch_all_parts()
            .await?
            .into_iter()
            .filter(|part| part.matches(term))
            .map(StockedPart::from)
            .collect();

        tracing::debug!(term, hits = parts.len(), "search finished");
        Ok(parts)
    }

    /// Parts whose quantity is under their minimum on hand
    pub async fn list_below_minimum(&self) -> Result<Vec<StockedPart>> {
        let parts = sqlx::query_as::<_, Part>(&format!(
            "SELECT {} FROM {} WHERE {} < {} ORDER BY {}",
            InventoryTable::columns(),
            InventoryTable::TABLE_NAME,
            InventoryTable::COLUMN_QUANTITY,
            InventoryTable::COLUMN_MIN_ON_HAND,
            InventoryTable::COLUMN_PART_NUMBER,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(parts.into_iter().map(StockedPart::from).collect())
    }

    async fn fetch_all_parts(&self) -> Result<Vec<Part>> {
        let parts = sqlx::query_as::<_, Part>(&format!(
            "SELECT {} FROM {} ORDER BY {}",
            InventoryTable::columns(),
            InventoryTable::TABLE_NAME,
            InventoryTable::COLUMN_PART_NUMBER,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(parts)
    }
}
