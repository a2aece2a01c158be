use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::TonAddress;
use crate::chat;
use crate::payload;

/// One outbound transfer inside a broadcast request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Recipient address, friendly form.
    pub address: String,
    /// Attached value in nanoton, as a decimal string per the bridge
    /// wire format.
    pub amount: String,
    /// Base64 bag-of-cells payload.
    pub payload: String,
}

/// The transaction request handed to the wallet bridge for signing and
/// broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionRequest {
    /// Unix seconds after which the request must not be signed.
    pub valid_until: u64,
    pub messages: Vec<OutboundMessage>,
}

/// Errors from wallet-session operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletError {
    /// No wallet session is established.
    NotConnected,
    /// The wallet bridge is missing from the page.
    BridgeUnavailable(String),
    /// The bridge reported a failure (user rejection, network, ...).
    SendFailed(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "no wallet connected"),
            Self::BridgeUnavailable(msg) => write!(f, "wallet bridge unavailable: {msg}"),
            Self::SendFailed(msg) => write!(f, "broadcast failed: {msg}"),
        }
    }
}

/// Abstraction over the external wallet bridge session. The UI receives
/// an implementation by injection; the bridge owns connection and
/// reconnection semantics entirely.
#[allow(async_fn_in_trait)]
pub trait WalletSession {
    /// Address of the connected account, if any.
    fn account(&self) -> Option<TonAddress>;

    /// Sign and broadcast a transaction through the connected wallet.
    async fn send_transaction(&self, request: &SendTransactionRequest)
        -> Result<(), WalletError>;
}

/// Validate a composer draft for sending. Blank and whitespace-only
/// drafts are not sendable and must never reach the broadcast call.
pub fn sendable_text(draft: &str) -> Option<&str> {
    let text = draft.trim();
    (!text.is_empty()).then_some(text)
}

/// Build the broadcast request carrying one chat message: fixed
/// recipient and value, comment payload wrapping the text, validity
/// window counted from `now_unix`.
pub fn comment_transfer(recipient: &str, text: &str, now_unix: u64) -> SendTransactionRequest {
    SendTransactionRequest {
        valid_until: now_unix + chat::TRANSFER_TTL_SECS,
        messages: vec![OutboundMessage {
            address: recipient.to_string(),
            amount: chat::MESSAGE_AMOUNT_NANOTON.to_string(),
            payload: payload::encode_comment_base64(text),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_bridge_wire_shape() {
        let request = comment_transfer(chat::CHAT_ACCOUNT, "hi", 1_700_000_000);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""validUntil":1700000360"#));
        assert!(json.contains(r#""amount":"20000000""#));
        assert!(!json.contains("valid_until"));
    }

    #[test]
    fn transfer_wraps_comment_payload() {
        let request = comment_transfer(chat::CHAT_ACCOUNT, "hello", 0);
        assert_eq!(request.valid_until, chat::TRANSFER_TTL_SECS);
        assert_eq!(request.messages.len(), 1);
        let msg = &request.messages[0];
        assert_eq!(msg.address, chat::CHAT_ACCOUNT);
        assert_eq!(msg.payload, payload::encode_comment_base64("hello"));
    }

    #[test]
    fn blank_drafts_are_not_sendable() {
        assert_eq!(sendable_text(""), None);
        assert_eq!(sendable_text("   "), None);
        assert_eq!(sendable_text("\n\t"), None);
        assert_eq!(sendable_text("  hi  "), Some("hi"));
    }

    #[test]
    fn request_roundtrips_through_json() {
        let request = comment_transfer(chat::CHAT_ACCOUNT, "round", 42);
        let json = serde_json::to_string(&request).unwrap();
        let back: SendTransactionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
