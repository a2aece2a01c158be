//! The feed synchronizer: a coroutine that owns the displayed feed,
//! performs full resynchronizations against the indexing API, and
//! broadcasts composed messages through the injected wallet session.

use std::future::Future;
use std::pin::Pin;

use dioxus::prelude::*;
use futures::future::Fuse;
use futures::{FutureExt, StreamExt};

use tonchat_common::chat;
use tonchat_common::feed::{self, ChatRecord};
use tonchat_common::wallet::{self, WalletSession};

use super::feed_client;
use super::tonconnect::TonConnectBridge;

fn clog(msg: &str) {
    #[cfg(target_family = "wasm")]
    web_sys::console::log_1(&msg.into());
    #[cfg(not(target_family = "wasm"))]
    let _ = msg;
}

/// The displayed feed: decoded records in API order, replaced wholesale
/// by every successful sync. The view reverses for display.
#[derive(Clone, Debug, Default)]
pub struct FeedState {
    pub records: Vec<ChatRecord>,
}

pub fn use_feed_state() -> Signal<FeedState> {
    use_context::<Signal<FeedState>>()
}

/// Composer state. The draft survives a failed broadcast so the user
/// can retry, and clears once the wallet accepts the transaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComposerState {
    pub draft: String,
}

pub fn use_composer_state() -> Signal<ComposerState> {
    use_context::<Signal<ComposerState>>()
}

/// Actions the UI sends to the synchronizer.
#[derive(Debug, Clone)]
pub enum SyncAction {
    /// Fetch the history page and replace the feed.
    Refresh,
    /// Broadcast a message, then schedule one deferred refresh.
    Send { text: String },
}

/// Handle for sending actions to the synchronizer coroutine.
pub fn use_sync_action() -> Coroutine<SyncAction> {
    use_coroutine_handle::<SyncAction>()
}

/// Start the synchronizer and trigger the initial resynchronization.
pub fn use_sync_coroutine() {
    let feed = use_feed_state();
    let composer = use_composer_state();
    let bridge = use_context::<TonConnectBridge>();

    let sync = use_coroutine(move |rx: UnboundedReceiver<SyncAction>| {
        sync_loop(rx, feed, composer, bridge.clone())
    });

    use_effect(move || {
        sync.send(SyncAction::Refresh);
    });
}

enum Wake {
    Action(Option<SyncAction>),
    DeferredRefresh,
}

type Deferred = Fuse<Pin<Box<dyn Future<Output = ()>>>>;

async fn sync_loop(
    mut rx: UnboundedReceiver<SyncAction>,
    feed: Signal<FeedState>,
    composer: Signal<ComposerState>,
    bridge: TonConnectBridge,
) {
    // At most one deferred post-send refresh is ever pending: a new
    // send replaces it, and coroutine teardown drops it.
    let mut deferred: Option<Deferred> = None;

    loop {
        let wake = match deferred.as_mut() {
            Some(mut timer) => futures::select! {
                action = rx.next() => Wake::Action(action),
                _ = timer => Wake::DeferredRefresh,
            },
            None => Wake::Action(rx.next().await),
        };

        match wake {
            Wake::DeferredRefresh => {
                deferred = None;
                refresh(feed).await;
            }
            Wake::Action(None) => break,
            Wake::Action(Some(SyncAction::Refresh)) => refresh(feed).await,
            Wake::Action(Some(SyncAction::Send { text })) => {
                if send_message(&bridge, composer, &text).await {
                    let sleep: Pin<Box<dyn Future<Output = ()>>> =
                        Box::pin(sleep_secs(chat::REFRESH_AFTER_SEND_SECS));
                    deferred = Some(sleep.fuse());
                }
            }
        }
    }
}

/// One full resynchronization: fetch, decode, replace. On failure the
/// stale feed stays up and the failure goes to the console.
async fn refresh(mut feed: Signal<FeedState>) {
    match feed_client::fetch_history(&chat::chat_account()).await {
        Ok(page) => {
            let records = feed::decode_page(&page);
            tracing::debug!("feed refreshed: {} records", records.len());
            feed.write().records = records;
        }
        Err(err) => {
            clog(&format!("[CHAT] Feed refresh failed: {err}"));
            tracing::warn!("feed refresh failed: {err}");
        }
    }
}

/// Broadcast one message. Returns true when the wallet accepted it and
/// the deferred refresh should be scheduled.
async fn send_message(
    bridge: &TonConnectBridge,
    mut composer: Signal<ComposerState>,
    text: &str,
) -> bool {
    let Some(text) = wallet::sendable_text(text) else {
        return false;
    };
    if bridge.account().is_none() {
        clog("[CHAT] Send ignored: no wallet session");
        return false;
    }

    let request = wallet::comment_transfer(&chat::chat_account(), text, unix_now());
    match bridge.send_transaction(&request).await {
        Ok(()) => {
            composer.write().draft.clear();
            true
        }
        Err(err) => {
            // Draft left intact for a manual retry.
            clog(&format!("[CHAT] Broadcast failed: {err}"));
            tracing::warn!("broadcast failed: {err}");
            false
        }
    }
}

async fn sleep_secs(secs: u64) {
    #[cfg(target_family = "wasm")]
    gloo_timers::future::TimeoutFuture::new((secs * 1000) as u32).await;
    #[cfg(not(target_family = "wasm"))]
    let _ = secs;
}

fn unix_now() -> u64 {
    #[cfg(target_family = "wasm")]
    {
        (js_sys::Date::now() / 1000.0) as u64
    }
    #[cfg(not(target_family = "wasm"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
