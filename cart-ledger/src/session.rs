//! Cart session: one ledger bound to its persisted store
//!
//! Every mutation goes through [`CartSession`], which applies the change to the
//! in-memory ledger and then writes the serialized ledger back to the store.
//! Callers never have to remember a separate save step.
//!
//! Store failures are not returned from mutations. They are logged and exposed
//! through [`CartSession::needs_save`] so the front end can show a fallback
//! message; the next mutation or [`CartSession::flush`] retries the write.

use crate::config::LedgerConfig;
use crate::ledger::{format_amount, CartLedger};
use crate::store::CartStore;
use crate::types::{LineItem, Result, Timestamp};
use chrono::Utc;
use rust_decimal::Decimal;

/// Source of the current time for new line items
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Toast text shown after an item is added
pub fn notification_for(item: &LineItem) -> String {
    format!("{} added to cart!", item.name)
}

/// Application context owning one ledger and its store
pub struct CartSession<S: CartStore, C: Clock = SystemClock> {
    ledger: CartLedger,
    store: S,
    clock: C,
    config: LedgerConfig,
    needs_save: bool,
}

impl<S: CartStore> CartSession<S, SystemClock> {
    /// Open a session on `store` using the wall clock
    pub fn open(store: S, config: LedgerConfig) -> Self {
        Self::open_with_clock(store, SystemClock, config)
    }
}

impl<S: CartStore, C: Clock> CartSession<S, C> {
    /// Open a session, loading whatever cart is stored under the configured key
    ///
    /// A read failure or a corrupt payload starts the session with an empty
    /// cart.
    pub fn open_with_clock(store: S, clock: C, config: LedgerConfig) -> Self {
        let ledger = match store.load(&config.storage_key) {
            Ok(stored) => CartLedger::from_stored(stored.as_deref()),
            Err(e) => {
                log::warn!("Could not read stored cart '{}': {}", config.storage_key, e);
                CartLedger::new()
            }
        };

        log::info!(
            "Opened cart '{}' with {} items",
            config.storage_key,
            ledger.len()
        );

        Self {
            ledger,
            store,
            clock,
            config,
            needs_save: false,
        }
    }

    /// Append an item and persist the cart
    pub fn add_item(&mut self, name: impl Into<String>, price: Decimal) -> Result<LineItem> {
        let now = self.clock.now();
        let item = self.ledger.append_at(name, price, now)?;
        self.persist();
        Ok(item)
    }

    /// Empty the cart and overwrite the stored form
    pub fn clear(&mut self) {
        self.ledger.clear();
        log::info!("Cleared cart '{}'", self.config.storage_key);
        self.persist();
    }

    /// Retry a failed save; returns true when the stored form is current
    pub fn flush(&mut self) -> bool {
        if self.needs_save {
            self.persist();
        }
        !self.needs_save
    }

    /// True when the last write to the store failed
    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    pub fn total(&self) -> Decimal {
        self.ledger.total()
    }

    /// Total formatted with the configured currency symbol
    pub fn total_text(&self) -> String {
        format_amount(&self.config.currency_symbol, self.ledger.total())
    }

    pub fn item_count(&self) -> usize {
        self.ledger.len()
    }

    /// Summary rendered with the configured currency and empty message
    pub fn summary_text(&self) -> String {
        self.ledger
            .render_summary(&self.config.currency_symbol, &self.config.empty_message)
    }

    pub fn ledger(&self) -> &CartLedger {
        &self.ledger
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        let result = self
            .ledger
            .serialize()
            .and_then(|payload| self.store.save(&self.config.storage_key, &payload));

        match result {
            Ok(()) => self.needs_save = false,
            Err(e) => {
                log::warn!("Failed to save cart '{}': {}", self.config.storage_key, e);
                self.needs_save = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::LedgerError;
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn clock(ms: i64) -> FixedClock {
        FixedClock(Utc.timestamp_millis_opt(ms).unwrap())
    }

    /// Store whose writes always fail
    struct ReadOnlyStore(MemoryStore);

    impl CartStore for ReadOnlyStore {
        fn load(&self, key: &str) -> Result<Option<String>> {
            self.0.load(key)
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(LedgerError::Storage("quota exceeded".to_string()))
        }
    }

    /// Store whose reads always fail
    struct UnreadableStore;

    impl CartStore for UnreadableStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Err(LedgerError::Storage("access denied".to_string()))
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let mut session =
            CartSession::open_with_clock(MemoryStore::new(), clock(1_000), LedgerConfig::new());

        session.add_item("Burger", dec("5.50")).unwrap();
        assert_eq!(
            session.store().get("tastybites-cart"),
            Some(r#"[{"name":"Burger","price":5.5,"timestamp":1000}]"#)
        );

        session.clear();
        assert_eq!(session.store().get("tastybites-cart"), Some("[]"));
        assert!(!session.needs_save());
    }

    #[test]
    fn test_fresh_session_is_empty() {
        let session = CartSession::open(MemoryStore::new(), LedgerConfig::new());
        assert_eq!(session.item_count(), 0);
        assert_eq!(session.total(), Decimal::ZERO);
        assert_eq!(session.summary_text(), crate::ledger::EMPTY_CART_MESSAGE);
    }

    #[test]
    fn test_corrupted_store_opens_empty() {
        let store = MemoryStore::with_entry("tastybites-cart", "{{{ definitely not json");
        let mut session = CartSession::open(store, LedgerConfig::new());
        assert_eq!(session.item_count(), 0);

        session.add_item("Soda", dec("1.25")).unwrap();
        assert_eq!(session.total(), dec("1.25"));
    }

    #[test]
    fn test_unreadable_store_opens_empty() {
        let session = CartSession::open(UnreadableStore, LedgerConfig::new());
        assert_eq!(session.item_count(), 0);
    }

    #[test]
    fn test_save_failure_keeps_item_and_flags() {
        let mut session = CartSession::open(ReadOnlyStore(MemoryStore::new()), LedgerConfig::new());

        let item = session.add_item("Wrap", dec("4.25")).unwrap();
        assert_eq!(item.name, "Wrap");
        assert_eq!(session.item_count(), 1);
        assert!(session.needs_save());
        assert!(!session.flush());
    }

    #[test]
    fn test_invalid_item_does_not_touch_store() {
        let mut session = CartSession::open(MemoryStore::new(), LedgerConfig::new());
        let result = session.add_item("Tip", dec("-1"));

        assert!(matches!(result, Err(LedgerError::InvalidItem(_))));
        assert_eq!(session.store().get("tastybites-cart"), None);
    }

    #[test]
    fn test_custom_key_and_currency() {
        let config = LedgerConfig::new()
            .with_storage_key("bistro")
            .with_currency_symbol("€");
        let mut session = CartSession::open(MemoryStore::new(), config);
        session.add_item("Quiche", dec("8")).unwrap();

        assert!(session.store().get("bistro").is_some());
        assert_eq!(session.total_text(), "€8.00");
        assert_eq!(session.summary_text(), "Quiche (€8.00)\n\nTotal: €8.00");
    }

    #[test]
    fn test_notification_text() {
        let mut session = CartSession::open(MemoryStore::new(), LedgerConfig::new());
        let item = session.add_item("Club Sandwich", dec("6")).unwrap();
        assert_eq!(notification_for(&item), "Club Sandwich added to cart!");
    }
}
