//! Ledger configuration types
//!
//! Storefront-specific text and identifiers live here so the ledger, the
//! session and the order composer stay free of hard-coded branding.

use serde::{Deserialize, Serialize};

/// Configuration shared by the session, summary rendering and order dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Key under which the serialized cart is stored
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Symbol printed in front of every amount
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Text shown instead of a summary when the cart has no items
    #[serde(default = "default_empty_message")]
    pub empty_message: String,

    /// First line of an outbound order message
    #[serde(default = "default_order_header")]
    pub order_header: String,

    /// Last line of an outbound order message
    #[serde(default = "default_order_footer")]
    pub order_footer: String,

    /// Phone number the chat link is addressed to (digits only)
    #[serde(default = "default_chat_number")]
    pub chat_number: String,
}

fn default_storage_key() -> String {
    "tastybites-cart".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_empty_message() -> String {
    crate::ledger::EMPTY_CART_MESSAGE.to_string()
}

fn default_order_header() -> String {
    "🍽️ TastyBites Order".to_string()
}

fn default_order_footer() -> String {
    "📱 Please confirm your order details.".to_string()
}

fn default_chat_number() -> String {
    "923001234567".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            currency_symbol: default_currency_symbol(),
            empty_message: default_empty_message(),
            order_header: default_order_header(),
            order_footer: default_order_footer(),
            chat_number: default_chat_number(),
        }
    }
}

impl LedgerConfig {
    /// Create a configuration with the default storefront settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the storage key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Builder method: set the currency symbol
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Builder method: set the empty cart message
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Builder method: set the order header and footer lines
    pub fn with_order_frame(mut self, header: impl Into<String>, footer: impl Into<String>) -> Self {
        self.order_header = header.into();
        self.order_footer = footer.into();
        self
    }

    /// Builder method: set the chat number orders are sent to
    pub fn with_chat_number(mut self, number: impl Into<String>) -> Self {
        self.chat_number = number.into();
        self
    }
}
