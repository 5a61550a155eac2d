//! Parts inventory ledger over a single local SQLite table.
//!
//! [`InventoryStore`] holds every business rule: validation of raw form
//! text, scan-in/scan-out adjustments, and the stock-level queries. Front
//! ends such as [`shell::Shell`] only collect input and render results.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod shell;


pub use config::{Config, ConfigError};
pub use db::InventoryStore;
pub use error::{InventoryError, Result};
pub use models::{Direction, Part, PartFields, PartInput, StockStatus, StockedPart};
