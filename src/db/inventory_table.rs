/// Provides constants and utilities for working with
/// the "inventory" database table.
pub struct InventoryTable;

impl InventoryTable {
    /// The name of the database table
    pub const TABLE_NAME: &'static str = "inventory";

    /// The column name for the system-assigned part number.
    pub const COLUMN_PART_NUMBER: &'static str = "part_number";

    /// The column name for the display name of the part.
    pub const COLUMN_PART_NAME: &'static str = "part_name";

    /// The column name for the free-text description.
    pub const COLUMN_DESCRIPTION: &'static str = "description";

    /// The column name for the manufacturer's part number.
    pub const COLUMN_ORIGIN_PART_NUMBER: &'static str = "origin_part_number";

    /// The column name for the supplier's catalogue number.
    pub const COLUMN_VENDOR_PART_NUMBER: &'static str = "vendor_part_number";

    /// The column name for the unit cost.
    pub const COLUMN_COST: &'static str = "cost";

    /// The column name for the quantity on hand.
    pub const COLUMN_QUANTITY: &'static str = "quantity";

    /// The column name for the minimum quantity that should be on hand.
    pub const COLUMN_MIN_ON_HAND: &'static str = "min_on_hand";

    /// The column name for the storage location.
    pub const COLUMN_LOCATION: &'static str = "location";

    /// SQL statement for creating the inventory table with the defined schema.
    pub fn create_table() -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                {} INTEGER PRIMARY KEY AUTOINCREMENT,
                {} TEXT NOT NULL CHECK (length(trim({})) > 0),
                {} TEXT,
                {} TEXT,
                {} TEXT,
                {} REAL NOT NULL DEFAULT 0.0 CHECK ({} >= 0),
                {} INTEGER NOT NULL CHECK ({} >= 0),
                {} INTEGER NOT NULL CHECK ({} >= 0),
                {} TEXT
            )",
            Self::TABLE_NAME,
            Self::COLUMN_PART_NUMBER,
            Self::COLUMN_PART_NAME, Self::COLUMN_PART_NAME,
            Self::COLUMN_DESCRIPTION,
            Self::COLUMN_ORIGIN_PART_NUMBER,
            Self::COLUMN_VENDOR_PART_NUMBER,
            Self::COLUMN_COST, Self::COLUMN_COST,
            Self::COLUMN_QUANTITY, Self::COLUMN_QUANTITY,
            Self::COLUMN_MIN_ON_HAND, Self::COLUMN_MIN_ON_HAND,
            Self::COLUMN_LOCATION,
        )
    }

    /// Column list in storage order, for SELECT statements.
    pub fn columns() -> String {
        [
            Self::COLUMN_PART_NUMBER,
            Self::COLUMN_PART_NAME,
            Self::COLUMN_DESCRIPTION,
            Self::COLUMN_ORIGIN_PART_NUMBER,
            Self::COLUMN_VENDOR_PART_NUMBER,
            Self::COLUMN_COST,
            Self::COLUMN_QUANTITY,
            Self::COLUMN_MIN_ON_HAND,
            Self::COLUMN_LOCATION,
        ]
        .join(", ")
    }

    /// SQL statement that restarts part numbering at 1.
    ///
    /// Only valid while the table is empty.
    pub fn reset_sequence() -> String {
        format!(
            "DELETE FROM sqlite_sequence WHERE name = '{}'",
            Self::TABLE_NAME
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_mentions_every_column() {
        let sql = InventoryTable::create_table();
        for column in InventoryTable::columns().split(", ") {
            assert!(sql.contains(column), "missing column {column}");
        }
        assert!(sql.contains("AUTOINCREMENT"));
    }
}
