//! Cart Ledger Library
//!
//! The non-presentational logic behind a set of small storefront and portfolio
//! sites: a shopping cart persisted to a string-keyed store, the order message
//! built from it, contact form validation, and animated stat counters.
//!
//! # Architecture
//!
//! - [`CartLedger`] is a plain value: ordered line items, a derived total, and
//!   a JSON persisted form. It never performs I/O.
//! - [`CartSession`] owns one ledger plus a [`CartStore`] and persists after
//!   every mutation.
//! - [`Messenger`] is the seam to whatever delivers orders and contact
//!   messages (chat link, e-mail relay). Delivery problems never touch the
//!   cart.
//!
//! The library does NOT:
//! - Wire up any UI or handle user events
//! - Talk to a network service
//! - Prompt for confirmation before clearing
//!
//! # Example Usage
//!
//! ```
//! use cart_ledger::{CartSession, LedgerConfig, MemoryStore};
//!
//! let mut session = CartSession::open(MemoryStore::new(), LedgerConfig::new());
//! session.add_item("Burger", "5.50".parse().unwrap()).unwrap();
//! session.add_item("Soda", "1.25".parse().unwrap()).unwrap();
//!
//! assert_eq!(session.total_text(), "$6.75");
//! assert!(session.summary_text().ends_with("Total: $6.75"));
//! ```

// Public modules
pub mod config;
pub mod contact;
pub mod counter;
pub mod ledger;
pub mod order;
pub mod session;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use config::LedgerConfig;
pub use contact::{submit_contact, ContactForm, FieldError, FieldKind, FieldStatus, FormField, SubmitOutcome};
pub use counter::{BoardState, CounterBoard, StatCounter};
pub use ledger::{CartLedger, EMPTY_CART_MESSAGE};
pub use order::{chat_link, dispatch_order, DispatchOutcome, Messenger, OrderMessage, OutboundPayload};
pub use session::{notification_for, CartSession, Clock, FixedClock, SystemClock};
pub use store::{CartStore, FileStore, MemoryStore};
pub use types::{LedgerError, LineItem, Result, Timestamp, MAX_PRICE_UNITS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh session over an empty store has nothing in it
        let session = CartSession::open(MemoryStore::new(), LedgerConfig::new());
        assert_eq!(session.item_count(), 0);
        assert_eq!(session.summary_text(), EMPTY_CART_MESSAGE);
    }
}
