/// The on-chain account every chat message is addressed to.
pub const CHAT_ACCOUNT: &str = "UQDYwb2h6aeCti27KZyLbS5cccpH5RM1pBB3omRkPUJRqFBy";

/// Value attached to each message transaction, in nanoton.
pub const MESSAGE_AMOUNT_NANOTON: u64 = 20_000_000;

/// Seconds a broadcast request stays valid for signing.
pub const TRANSFER_TTL_SECS: u64 = 360;

/// Seconds to wait after a send before refreshing the feed, a heuristic
/// allowance for on-chain confirmation and indexing.
pub const REFRESH_AFTER_SEND_SECS: u64 = 120;

/// Indexing API base, overridden at compile-time via TONCHAT_API_BASE.
pub fn api_base() -> String {
    option_env!("TONCHAT_API_BASE")
        .unwrap_or("https://tonapi.io")
        .to_string()
}

/// Chat account address, overridden at compile-time via TONCHAT_ACCOUNT.
pub fn chat_account() -> String {
    option_env!("TONCHAT_ACCOUNT")
        .unwrap_or(CHAT_ACCOUNT)
        .to_string()
}

/// Public URL the app is served from, overridden via TONCHAT_APP_URL.
/// The wallet bridge fetches the dapp manifest relative to this.
pub fn app_url() -> String {
    option_env!("TONCHAT_APP_URL")
        .unwrap_or("https://tonchat.app")
        .to_string()
}

/// URL of the TonConnect dapp manifest.
pub fn tonconnect_manifest_url() -> String {
    format!("{}/assets/tonconnect-manifest.json", app_url())
}

/// Transaction-history endpoint for an account.
pub fn history_endpoint(account: &str) -> String {
    format!("{}/v2/blockchain/accounts/{}/transactions", api_base(), account)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_endpoint_shape() {
        let url = history_endpoint("UQabc");
        assert!(url.starts_with("https://"));
        assert!(url.ends_with("/v2/blockchain/accounts/UQabc/transactions"));
    }

    #[test]
    fn chat_account_is_parseable() {
        assert!(crate::address::TonAddress::parse(&chat_account()).is_ok());
    }
}
