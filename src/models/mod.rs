pub mod part;

pub use part::{Direction, Part, PartFields, PartInput, StockStatus, StockedPart};
