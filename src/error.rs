use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Item with part number '{0}' not found in inventory")]
    NotFound(i64),

    #[error(
        "Insufficient stock for part number '{part_number}': requested {requested}, available quantity: {available}"
    )]
    InsufficientStock {
        part_number: i64,
        available: i64,
        requested: i64,
    },

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl InventoryError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the failed call can simply be retried with corrected input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
