use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{InventoryError, Result};

/// Database part model, one row of the `inventory` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Part {
    pub part_number: i64,
    pub part_name: String,
    pub description: Option<String>,
    pub origin_part_number: Option<String>,
    pub vendor_part_number: Option<String>,
    pub cost: f64,
    pub quantity: i64,
    pub min_on_hand: i64,
    pub location: Option<String>,
}

impl Part {
    pub fn status(&self) -> StockStatus {
        StockStatus::classify(self.quantity, self.min_on_hand)
    }

    pub fn is_below_minimum(&self) -> bool {
        self.quantity < self.min_on_hand
    }

    /// Mutable fields of the row, without the part number
    pub fn fields(&self) -> PartFields {
        PartFields {
            part_name: self.part_name.clone(),
            description: self.description.clone(),
            origin_part_number: self.origin_part_number.clone(),
            vendor_part_number: self.vendor_part_number.clone(),
            cost: self.cost,
            quantity: self.quantity,
            min_on_hand: self.min_on_hand,
            location: self.location.clone(),
        }
    }

    /// Case-insensitive substring match against every column, numbers included.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        let numeric = [
            self.part_number.to_string(),
            cost_text(self.cost),
            self.quantity.to_string(),
            self.min_on_hand.to_string(),
        ];
        let text = [
            Some(self.part_name.as_str()),
            self.description.as_deref(),
            self.origin_part_number.as_deref(),
            self.vendor_part_number.as_deref(),
            self.location.as_deref(),
        ];

        numeric.iter().any(|value| value.contains(&needle))
            || text
                .into_iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// Textual form of a cost, always with a fractional part ("0.0", "12.5").
pub fn cost_text(cost: f64) -> String {
    format!("{cost:?}")
}

/// Derived stock level of a part; never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Normal,
    BelowMinimum,
    OutOfStock,
}

impl StockStatus {
    pub fn classify(quantity: i64, min_on_hand: i64) -> Self {
        if quantity == 0 {
            Self::OutOfStock
        } else if quantity < min_on_hand {
            Self::BelowMinimum
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Normal => "normal",
            StockStatus::BelowMinimum => "below_minimum",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A part annotated with its stock status, as returned by the listing queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockedPart {
    #[serde(flatten)]
    pub part: Part,
    pub status: StockStatus,
}

impl From<Part> for StockedPart {
    fn from(part: Part) -> Self {
        let status = part.status();
        Self { part, status }
    }
}

/// Direction of a stock adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Scan in: parts arrive, quantity grows
    In,
    /// Scan out: parts leave, quantity shrinks
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => f.write_str("in"),
            Direction::Out => f.write_str("out"),
        }
    }
}

impl FromStr for Direction {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(InventoryError::validation(
                "direction",
                format!("expected 'in' or 'out', got '{other}'"),
            )),
        }
    }
}

/// Raw text of a part form, exactly as entered.
///
/// The store parses and validates it; callers never convert numbers themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartInput {
    pub part_name: String,
    pub description: String,
    pub origin_part_number: String,
    pub vendor_part_number: String,
    pub cost: String,
    pub quantity: String,
    pub min_on_hand: String,
    pub location: String,
}

impl PartInput {
    /// Form with only the required fields filled in
    pub fn new(
        part_name: impl Into<String>,
        quantity: impl Into<String>,
        min_on_hand: impl Into<String>,
    ) -> Self {
        Self {
            part_name: part_name.into(),
            quantity: quantity.into(),
            min_on_hand: min_on_hand.into(),
            ..Self::default()
        }
    }

    /// Set one field by its column name.
    pub fn assign(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        let slot = match field.trim() {
            "part_name" => &mut self.part_name,
            "description" => &mut self.description,
            "origin_part_number" => &mut self.origin_part_number,
            "vendor_part_number" => &mut self.vendor_part_number,
            "cost" => &mut self.cost,
            "quantity" => &mut self.quantity,
            "min_on_hand" => &mut self.min_on_hand,
            "location" => &mut self.location,
            other => {
                return Err(InventoryError::validation(
                    "field",
                    format!("unknown field '{other}'"),
                ));
            }
        };
        *slot = value.into();
        Ok(())
    }

    /// Parse the form into typed fields.
    ///
    /// Required fields are checked before any number is parsed, so a form
    /// missing its name reports the name even if the quantity is garbage too.
    pub fn validate(&self) -> Result<PartFields> {
        let part_name = self.part_name.trim();
        if part_name.is_empty() {
            return Err(InventoryError::validation("part_name", "is required"));
        }
        if self.quantity.trim().is_empty() {
            return Err(InventoryError::validation("quantity", "is required"));
        }
        if self.min_on_hand.trim().is_empty() {
            return Err(InventoryError::validation("min_on_hand", "is required"));
        }

        Ok(PartFields {
            part_name: part_name.to_string(),
            description: optional_text(&self.description),
            origin_part_number: optional_text(&self.origin_part_number),
            vendor_part_number: optional_text(&self.vendor_part_number),
            cost: parse_cost(&self.cost)?,
            quantity: parse_count("quantity", &self.quantity)?,
            min_on_hand: parse_count("min_on_hand", &self.min_on_hand)?,
            location: optional_text(&self.location),
        })
    }
}

impl From<&Part> for PartInput {
    fn from(part: &Part) -> Self {
        Self {
            part_name: part.part_name.clone(),
            description: part.description.clone().unwrap_or_default(),
            origin_part_number: part.origin_part_number.clone().unwrap_or_default(),
            vendor_part_number: part.vendor_part_number.clone().unwrap_or_default(),
            cost: cost_text(part.cost),
            quantity: part.quantity.to_string(),
            min_on_hand: part.min_on_hand.to_string(),
            location: part.location.clone().unwrap_or_default(),
        }
    }
}

/// Validated mutable fields of a part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartFields {
    pub part_name: String,
    pub description: Option<String>,
    pub origin_part_number: Option<String>,
    pub vendor_part_number: Option<String>,
    pub cost: f64,
    pub quantity: i64,
    pub min_on_hand: i64,
    pub location: Option<String>,
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_cost(raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let cost: f64 = raw
        .parse()
        .map_err(|_| InventoryError::validation("cost", format!("'{raw}' is not a number")))?;
    if !cost.is_finite() {
        return Err(InventoryError::validation("cost", "must be a finite number"));
    }
    if cost < 0.0 {
        return Err(InventoryError::validation("cost", "must not be negative"));
    }
    Ok(cost)
}

fn parse_count(field: &'static str, raw: &str) -> Result<i64> {
    let raw = raw.trim();
    let value: i64 = raw
        .parse()
        .map_err(|_| InventoryError::validation(field, format!("'{raw}' is not an integer")))?;
    if value < 0 {
        return Err(InventoryError::validation(field, "must not be negative"));
    }
    Ok(value)
}

/// Parse a scanned or typed part number.
pub fn parse_part_number(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(InventoryError::validation(
            "part_number",
            "no part number detected",
        ));
    }
    raw.parse().map_err(|_| {
        InventoryError::validation("part_number", format!("'{raw}' must be an integer"))
    })
}

/// Parse an adjustment amount, which must be a positive integer.
pub fn parse_delta(field: &'static str, raw: &str) -> Result<i64> {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(InventoryError::validation(
            field,
            format!("'{raw}' is not a positive integer"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: InventoryError) -> &'static str {
        match err {
            InventoryError::Validation { field, .. } => field,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(StockStatus::classify(10, 5), StockStatus::Normal);
        assert_eq!(StockStatus::classify(5, 5), StockStatus::Normal);
        assert_eq!(StockStatus::classify(2, 5), StockStatus::BelowMinimum);
        assert_eq!(StockStatus::classify(0, 5), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(0, 0), StockStatus::OutOfStock);
    }

    #[test]
    fn test_validate_trims_and_defaults() {
        let mut input = PartInput::new("  Hex bolt ", " 10", "5 ");
        input.location = "   ".to_string();
        input.vendor_part_number = " 91290A115 ".to_string();

        let fields = input.validate().unwrap();
        assert_eq!(fields.part_name, "Hex bolt");
        assert_eq!(fields.quantity, 10);
        assert_eq!(fields.min_on_hand, 5);
        assert_eq!(fields.cost, 0.0);
        assert_eq!(fields.location, None);
        assert_eq!(fields.vendor_part_number.as_deref(), Some("91290A115"));
    }

    #[test]
    fn test_validate_required_fields() {
        assert_eq!(field_of(PartInput::new("", "5", "1").validate().unwrap_err()), "part_name");
        assert_eq!(field_of(PartInput::new("Nut", " ", "1").validate().unwrap_err()), "quantity");
        assert_eq!(field_of(PartInput::new("Nut", "5", "").validate().unwrap_err()), "min_on_hand");
        // a missing name wins over an unparsable quantity
        assert_eq!(field_of(PartInput::new(" ", "abc", "1").validate().unwrap_err()), "part_name");
    }

    #[test]
    fn test_validate_numbers() {
        assert_eq!(field_of(PartInput::new("Nut", "1.5", "1").validate().unwrap_err()), "quantity");
        assert_eq!(field_of(PartInput::new("Nut", "-1", "1").validate().unwrap_err()), "quantity");
        assert_eq!(field_of(PartInput::new("Nut", "1", "x").validate().unwrap_err()), "min_on_hand");

        let mut input = PartInput::new("Nut", "1", "1");
        input.cost = "cheap".to_string();
        assert_eq!(field_of(input.validate().unwrap_err()), "cost");
        input.cost = "-0.5".to_string();
        assert_eq!(field_of(input.validate().unwrap_err()), "cost");
        input.cost = "inf".to_string();
        assert_eq!(field_of(input.validate().unwrap_err()), "cost");
        input.cost = "0.25".to_string();
        assert_eq!(input.validate().unwrap().cost, 0.25);
    }

    #[test]
    fn test_assign_unknown_field() {
        let mut input = PartInput::default();
        input.assign("location", "Bin 4").unwrap();
        assert_eq!(input.location, "Bin 4");
        assert_eq!(field_of(input.assign("colour", "red").unwrap_err()), "field");
    }

    #[test]
    fn test_parse_part_number_and_delta() {
        assert_eq!(parse_part_number(" 42 ").unwrap(), 42);
        assert_eq!(field_of(parse_part_number("").unwrap_err()), "part_number");
        assert_eq!(field_of(parse_part_number("A-12").unwrap_err()), "part_number");

        assert_eq!(parse_delta("quantity", "3").unwrap(), 3);
        assert!(parse_delta("quantity", "0").is_err());
        assert!(parse_delta("quantity", "-2").is_err());
        assert!(parse_delta("quantity", "").is_err());
    }

    #[test]
    fn test_matches_every_column() {
        let part = Part {
            part_number: 17,
            part_name: "Socket Head Screw".to_string(),
            description: Some("M6 x 20".to_string()),
            origin_part_number: None,
            vendor_part_number: Some("91290A115".to_string()),
            cost: 12.5,
            quantity: 40,
            min_on_hand: 8,
            location: Some("Drawer B".to_string()),
        };

        assert!(part.matches("socket"));
        assert!(part.matches("DRAWER"));
        assert!(part.matches("a115"));
        assert!(part.matches("12.5"));
        assert!(part.matches("17"));
        assert!(!part.matches("washer"));
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("IN".parse::<Direction>().unwrap(), Direction::In);
        assert_eq!(" out".parse::<Direction>().unwrap(), Direction::Out);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_input_from_part_round_trips() {
        let fields = PartInput::new("Washer", "3", "10").validate().unwrap();
        let part = Part {
            part_number: 1,
            part_name: fields.part_name.clone(),
            description: None,
            origin_part_number: None,
            vendor_part_number: None,
            cost: fields.cost,
            quantity: fields.quantity,
            min_on_hand: fields.min_on_hand,
            location: None,
        };
        assert_eq!(PartInput::from(&part).validate().unwrap(), fields);
    }
}
