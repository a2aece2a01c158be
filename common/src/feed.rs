use chrono::DateTime;
use serde::Deserialize;

use crate::address::TonAddress;

/// One page of an account's transaction history as returned by the
/// indexing API. Every field of interest is optional so a single
/// malformed entry can never fail the page parse; unknown fields are
/// ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TransactionsPage {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub in_msg: Option<InboundMessage>,
    /// Confirmation time, unix seconds.
    #[serde(default)]
    pub utime: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub source: Option<MessageSource>,
    #[serde(default)]
    pub decoded_body: Option<DecodedBody>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessageSource {
    /// Raw-form source address.
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DecodedBody {
    #[serde(default)]
    pub text: Option<String>,
}

/// The display-ready form of one inbound chat message. Immutable once
/// built; the feed is replaced wholesale on every fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRecord {
    /// Normalized (non-bounceable friendly) sender address.
    pub sender: String,
    pub text: String,
    /// Unix seconds.
    pub timestamp: u64,
}

impl ChatRecord {
    /// Whether this record was sent by `address` (the connected wallet).
    /// With no session there is no match.
    pub fn is_from(&self, address: Option<&str>) -> bool {
        address == Some(self.sender.as_str())
    }
}

/// Decode a history page into chat records, in API order.
///
/// A transaction missing its source address, text body, or confirmation
/// time is dropped, as is one whose address fails structural validation.
/// Decoding never fails as a whole.
pub fn decode_page(page: &TransactionsPage) -> Vec<ChatRecord> {
    let mut records = Vec::with_capacity(page.transactions.len());
    for tx in &page.transactions {
        let Some(in_msg) = &tx.in_msg else { continue };
        let raw = in_msg.source.as_ref().and_then(|s| s.address.as_deref());
        let text = in_msg.decoded_body.as_ref().and_then(|b| b.text.as_deref());
        let (Some(raw), Some(text), Some(utime)) = (raw, text, tx.utime) else {
            continue;
        };
        let Ok(sender) = TonAddress::parse(raw) else {
            continue;
        };
        records.push(ChatRecord {
            sender: sender.to_string(),
            text: text.to_string(),
            timestamp: utime,
        });
    }
    records
}

/// Parse a raw history response body and decode it in one step.
pub fn decode_history(json: &str) -> Result<Vec<ChatRecord>, serde_json::Error> {
    let page: TransactionsPage = serde_json::from_str(json)?;
    Ok(decode_page(&page))
}

/// Render a record timestamp for the bubble header.
pub fn format_timestamp(secs: u64) -> String {
    DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format("%d %b %Y %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}
