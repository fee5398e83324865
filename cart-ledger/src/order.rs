//! Order composition and hand-off to an outbound messenger
//!
//! The order page never submitted anything itself: it rendered the cart into a
//! text message and opened a chat link carrying that text. The same split is
//! kept here. [`OrderMessage`] builds the text, a [`Messenger`] delivers it.

use crate::config::LedgerConfig;
use crate::ledger::{format_amount, CartLedger};
use crate::session::{CartSession, Clock};
use crate::store::CartStore;
use crate::types::Result;

/// Text handed to an outbound messenger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundPayload {
    /// Short label for the message (used by e-mail relays as the subject)
    pub subject: String,
    /// Full message text
    pub body: String,
}

/// External collaborator that delivers a payload (chat link, e-mail relay...)
///
/// Whether delivery succeeded is reported back, but the ledger is never
/// affected by it.
pub trait Messenger {
    fn send(&mut self, payload: &OutboundPayload) -> Result<()>;
}

/// Branded order text rendered from a non-empty cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMessage {
    pub text: String,
    pub item_count: usize,
}

impl OrderMessage {
    /// Compose the order message, `None` when the cart is empty
    pub fn compose(ledger: &CartLedger, config: &LedgerConfig) -> Option<Self> {
        if ledger.is_empty() {
            return None;
        }

        let text = format!(
            "{}\n\n{}\n\n💰 Total: {}\n\n{}",
            config.order_header,
            ledger.item_lines(&config.currency_symbol),
            format_amount(&config.currency_symbol, ledger.total()),
            config.order_footer
        );

        Some(Self {
            text,
            item_count: ledger.len(),
        })
    }

    /// Chat link carrying this message to `number`
    pub fn chat_link(&self, number: &str) -> String {
        chat_link(number, &self.text)
    }

    pub fn into_payload(self) -> OutboundPayload {
        OutboundPayload {
            subject: format!("Order ({} items)", self.item_count),
            body: self.text,
        }
    }
}

/// Result of trying to send the current cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing to send; the messenger was not called
    EmptyCart,
    /// The messenger accepted the order
    Sent,
    /// The messenger reported a failure
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent)
    }
}

/// Send the session's cart through `messenger`
///
/// The cart is left as it is whatever the outcome.
pub fn dispatch_order<S, C, M>(session: &CartSession<S, C>, messenger: &mut M) -> DispatchOutcome
where
    S: CartStore,
    C: Clock,
    M: Messenger + ?Sized,
{
    let Some(order) = OrderMessage::compose(session.ledger(), session.config()) else {
        log::info!("Order not sent: cart is empty");
        return DispatchOutcome::EmptyCart;
    };

    let item_count = order.item_count;
    match messenger.send(&order.into_payload()) {
        Ok(()) => {
            log::info!("Order with {} items handed off", item_count);
            DispatchOutcome::Sent
        }
        Err(e) => {
            log::warn!("Order hand-off failed: {}", e);
            DispatchOutcome::Failed(e.to_string())
        }
    }
}

/// `https://wa.me/<number>?text=<message>` with the message percent-encoded
pub fn chat_link(number: &str, text: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{}?text={}", digits, encode_uri_component(text))
}

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
pub fn encode_uri_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::LedgerError;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[derive(Default)]
    struct RecordingMessenger {
        sent: Vec<OutboundPayload>,
        fail: bool,
    }

    impl Messenger for RecordingMessenger {
        fn send(&mut self, payload: &OutboundPayload) -> Result<()> {
            if self.fail {
                return Err(LedgerError::Delivery("relay offline".to_string()));
            }
            self.sent.push(payload.clone());
            Ok(())
        }
    }

    #[test]
    fn test_compose_order_text() {
        let mut ledger = CartLedger::new();
        ledger.append("Burger", dec("5.50")).unwrap();
        ledger.append("Soda", dec("1.25")).unwrap();

        let order = OrderMessage::compose(&ledger, &LedgerConfig::new()).unwrap();
        assert_eq!(
            order.text,
            "🍽️ TastyBites Order\n\nBurger ($5.50)\nSoda ($1.25)\n\n💰 Total: $6.75\n\n📱 Please confirm your order details."
        );
        assert_eq!(order.item_count, 2);
    }

    #[test]
    fn test_empty_cart_has_no_order() {
        assert!(OrderMessage::compose(&CartLedger::new(), &LedgerConfig::new()).is_none());
    }

    #[test]
    fn test_dispatch_empty_cart_skips_messenger() {
        let session = CartSession::open(MemoryStore::new(), LedgerConfig::new());
        let mut messenger = RecordingMessenger::default();

        assert_eq!(dispatch_order(&session, &mut messenger), DispatchOutcome::EmptyCart);
        assert!(messenger.sent.is_empty());
    }

    #[test]
    fn test_dispatch_sends_and_keeps_cart() {
        let mut session = CartSession::open(MemoryStore::new(), LedgerConfig::new());
        session.add_item("Biryani", dec("9.00")).unwrap();
        let mut messenger = RecordingMessenger::default();

        let outcome = dispatch_order(&session, &mut messenger);
        assert!(outcome.is_sent());
        assert_eq!(messenger.sent.len(), 1);
        assert_eq!(messenger.sent[0].subject, "Order (1 items)");
        assert!(messenger.sent[0].body.contains("Biryani ($9.00)"));
        assert_eq!(session.item_count(), 1);
    }

    #[test]
    fn test_dispatch_failure_is_reported() {
        let mut session = CartSession::open(MemoryStore::new(), LedgerConfig::new());
        session.add_item("Naan", dec("0.75")).unwrap();
        let mut messenger = RecordingMessenger {
            fail: true,
            ..Default::default()
        };

        match dispatch_order(&session, &mut messenger) {
            DispatchOutcome::Failed(reason) => assert!(reason.contains("relay offline")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(session.item_count(), 1);
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("Soda ($1.25)"), "Soda%20(%241.25)");
        assert_eq!(encode_uri_component("a\nb"), "a%0Ab");
        assert_eq!(encode_uri_component("it's ok!"), "it's%20ok!");
        assert_eq!(encode_uri_component("💰"), "%F0%9F%92%B0");
        assert_eq!(encode_uri_component("a&b=c?d/e"), "a%26b%3Dc%3Fd%2Fe");
    }

    #[test]
    fn test_chat_link() {
        assert_eq!(
            chat_link("+92 300 1234567", "Hi there"),
            "https://wa.me/923001234567?text=Hi%20there"
        );
    }
}
