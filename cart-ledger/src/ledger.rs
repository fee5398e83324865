//! The cart ledger
//!
//! An ordered list of line items with a derived total. The ledger itself never
//! touches storage: it only knows how to render itself to and from the
//! persisted string form. Persisting after each mutation is the job of
//! [`CartSession`](crate::session::CartSession).

use crate::types::{LedgerError, LineItem, Result, Timestamp};
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};

/// Message rendered in place of a summary when the cart is empty
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty. Add some delicious items! 😋";

/// Currency symbol used by [`CartLedger::summary_text`]
pub const DEFAULT_CURRENCY: &str = "$";

/// Ordered collection of line items
///
/// Duplicates are allowed; two appends of the same name and price are two
/// distinct entries. The total is always recomputed from the items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLedger {
    items: Vec<LineItem>,
}

impl CartLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item stamped with the current time
    pub fn append(&mut self, name: impl Into<String>, price: Decimal) -> Result<LineItem> {
        self.append_at(name, price, Utc::now())
    }

    /// Append an item stamped with `now`
    ///
    /// The stored timestamp never goes backwards: if `now` precedes the last
    /// item's timestamp, the last timestamp is reused.
    pub fn append_at(
        &mut self,
        name: impl Into<String>,
        price: Decimal,
        now: Timestamp,
    ) -> Result<LineItem> {
        let added_at = match self.items.last() {
            Some(last) if last.added_at > now => last.added_at,
            _ => now,
        };

        let item = LineItem::new(name, price, added_at)?;
        log::debug!("Appending '{}' for {} ({} items)", item.name, item.price, self.items.len() + 1);
        self.items.push(item.clone());
        Ok(item)
    }

    /// Remove every item
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            log::debug!("Clearing {} items", self.items.len());
        }
        self.items.clear();
    }

    /// Sum of all item prices (zero for an empty ledger)
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.price).sum()
    }

    /// Items in insertion order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Human-readable summary using `$` and the default empty cart message
    ///
    /// ```
    /// use cart_ledger::CartLedger;
    ///
    /// let mut ledger = CartLedger::new();
    /// ledger.append("Burger", "5.50".parse().unwrap()).unwrap();
    /// ledger.append("Soda", "1.25".parse().unwrap()).unwrap();
    ///
    /// assert_eq!(
    ///     ledger.summary_text(),
    ///     "Burger ($5.50)\nSoda ($1.25)\n\nTotal: $6.75"
    /// );
    /// ```
    pub fn summary_text(&self) -> String {
        self.render_summary(DEFAULT_CURRENCY, EMPTY_CART_MESSAGE)
    }

    /// Summary with a custom currency symbol and empty cart message
    pub fn render_summary(&self, currency: &str, empty_message: &str) -> String {
        if self.items.is_empty() {
            return empty_message.to_string();
        }

        format!(
            "{}\n\nTotal: {}",
            self.item_lines(currency),
            format_amount(currency, self.total())
        )
    }

    /// One `name ($price)` line per item, joined by newlines
    pub fn item_lines(&self, currency: &str) -> String {
        self.items
            .iter()
            .map(|item| format!("{} ({})", item.name, format_amount(currency, item.price)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the persisted form: a JSON array of `{name, price, timestamp}`
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Load a ledger from its persisted form, falling back to an empty ledger
    ///
    /// Malformed JSON, a non-array payload, or any item with a blank name or
    /// negative price all yield an empty ledger. The failure is logged and
    /// never returned to the caller.
    pub fn deserialize(text: &str) -> Self {
        match Self::try_deserialize(text) {
            Ok(ledger) => ledger,
            Err(e) => {
                log::warn!("Discarding stored cart: {}", e);
                Self::new()
            }
        }
    }

    /// Load a ledger from an optional stored value; absence is an empty ledger
    pub fn from_stored(text: Option<&str>) -> Self {
        match text {
            Some(text) => Self::deserialize(text),
            None => Self::new(),
        }
    }

    /// Strict variant of [`CartLedger::deserialize`]
    ///
    /// A stored `null` is accepted as an empty ledger.
    pub fn try_deserialize(text: &str) -> Result<Self> {
        let items: Option<Vec<LineItem>> = serde_json::from_str(text)
            .map_err(|e| LedgerError::Deserialization(e.to_string()))?;
        let items = items.unwrap_or_default();

        for (index, item) in items.iter().enumerate() {
            item.validate()
                .map_err(|e| LedgerError::Deserialization(format!("item {}: {}", index, e)))?;
        }

        Ok(Self { items })
    }
}

/// Render an amount behind the currency symbol, rounded half away from zero
/// to two decimal places
pub fn format_amount(currency: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", currency, rounded)
}
