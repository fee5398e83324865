//! Core types for the cart ledger library
//!
//! This module defines the line item stored in a cart, the error type shared by
//! every component, and the wire format used when a ledger is persisted.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Timestamp type used throughout the ledger
pub type Timestamp = DateTime<Utc>;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Largest accepted price, in whole currency units
pub const MAX_PRICE_UNITS: u64 = 1_000_000_000;

/// One purchased product instance
///
/// Serialized as `{"name": .., "price": .., "timestamp": ..}` where `price` is a
/// JSON number and `timestamp` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item label shown in the summary
    pub name: String,
    /// Non-negative price in the store's currency unit
    #[serde(with = "price_format")]
    pub price: Decimal,
    /// Moment the item was appended
    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub added_at: Timestamp,
}

impl LineItem {
    /// Build a validated line item
    ///
    /// The timestamp is truncated to millisecond precision so that an item
    /// survives a trip through the persisted form unchanged.
    pub fn new(name: impl Into<String>, price: Decimal, added_at: Timestamp) -> Result<Self> {
        let item = Self {
            name: name.into(),
            price,
            added_at: added_at.trunc_subsecs(3),
        };
        item.validate()?;
        Ok(item)
    }

    /// Check the item invariants
    ///
    /// The name must be non-blank. The price must be non-negative, at most
    /// [`MAX_PRICE_UNITS`], and exactly representable in the persisted form
    /// (about 15 significant digits).
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::InvalidItem("item name is empty".to_string()));
        }
        if self.price < Decimal::ZERO {
            return Err(LedgerError::InvalidItem(format!(
                "price for '{}' is negative: {}",
                self.name, self.price
            )));
        }
        if self.price > Decimal::from(MAX_PRICE_UNITS) {
            return Err(LedgerError::InvalidItem(format!(
                "price for '{}' exceeds {}: {}",
                self.name, MAX_PRICE_UNITS, self.price
            )));
        }
        if !price_format::round_trips(self.price) {
            return Err(LedgerError::InvalidItem(format!(
                "price for '{}' has too many digits to store: {}",
                self.name, self.price
            )));
        }
        Ok(())
    }
}

/// Errors that can occur in the ledger, its store, or outbound delivery
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Failed to deserialize cart: {0}")]
    Deserialization(String),

    #[error("Failed to serialize cart: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Prices travel as plain JSON numbers.
///
/// Both directions go through decimal text: writing parses the decimal's text
/// as an `f64` (correctly rounded), reading takes the shortest rendering of the
/// `f64`. A stored `6.99` therefore comes back as exactly `6.99`.
mod price_format {
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn to_wire(price: Decimal) -> Option<f64> {
        let value = f64::from_str(&price.normalize().to_string()).ok()?;
        value.is_finite().then_some(value)
    }

    pub fn from_wire(value: f64) -> Option<Decimal> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_str(&value.to_string()).ok()
    }

    /// True when `price` is read back unchanged after being written
    pub fn round_trips(price: Decimal) -> bool {
        to_wire(price).and_then(from_wire) == Some(price)
    }

    pub fn serialize<S>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = to_wire(*price)
            .ok_or_else(|| S::Error::custom(format!("price {} is not representable", price)))?;
        serializer.serialize_f64(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        from_wire(value)
            .ok_or_else(|| D::Error::custom(format!("price {} is out of range", value)))
    }
}
