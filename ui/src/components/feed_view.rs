use dioxus::prelude::*;

use tonchat_common::feed::format_timestamp;
use tonchat_common::wallet::sendable_text;

use super::session::use_session_state;
use super::sync::{use_composer_state, use_feed_state, use_sync_action, SyncAction};

/// The message feed. Records arrive in API order; display reverses
/// them, with the newest message ending up next to the composer.
#[component]
pub fn FeedView() -> Element {
    let feed = use_feed_state();
    let session = use_session_state();

    let records = feed.read().records.clone();
    let my_address = session.read().address.clone();

    // Keep the view pinned to the latest message after each sync.
    use_effect(move || {
        let _count = feed.read().records.len();
        scroll_feed_to_end();
    });

    rsx! {
        section { class: "chat-feed",
            if records.is_empty() {
                p { class: "feed-empty", "No messages yet." }
            } else {
                for (i, record) in records.iter().rev().enumerate() {
                    {
                        let is_self = record.is_from(my_address.as_deref());
                        let stamp = format_timestamp(record.timestamp);
                        rsx! {
                            div {
                                key: "{i}",
                                class: if is_self { "bubble-row self" } else { "bubble-row" },
                                article {
                                    class: if is_self { "bubble bubble-self" } else { "bubble" },
                                    div { class: "bubble-time", "{stamp}" }
                                    if !is_self {
                                        div { class: "bubble-sender", "From: {record.sender}" }
                                    }
                                    div { class: "bubble-text", "{record.text}" }
                                }
                            }
                        }
                    }
                }
            }
            div { id: "feed-end" }
        }
    }
}

/// Message composer. Send is disabled for blank drafts and while no
/// wallet is connected; the draft clears only once the wallet accepts
/// the broadcast.
#[component]
pub fn Composer() -> Element {
    let mut composer = use_composer_state();
    let session = use_session_state();
    let sync = use_sync_action();

    let draft = composer.read().draft.clone();
    let connected = session.read().connected();
    let can_send = connected && sendable_text(&draft).is_some();

    rsx! {
        footer { class: "chat-composer",
            input {
                r#type: "text",
                class: "composer-input",
                placeholder: "Write a message...",
                value: "{draft}",
                oninput: move |evt| composer.write().draft = evt.value(),
                onkeypress: move |evt: KeyboardEvent| {
                    if evt.key() == Key::Enter {
                        let draft = composer.read().draft.clone();
                        if let Some(text) = sendable_text(&draft) {
                            sync.send(SyncAction::Send { text: text.to_string() });
                        }
                    }
                },
            }
            button {
                class: "composer-send",
                disabled: !can_send,
                onclick: move |_| {
                    let draft = composer.read().draft.clone();
                    if let Some(text) = sendable_text(&draft) {
                        sync.send(SyncAction::Send { text: text.to_string() });
                    }
                },
                "Send"
            }
        }
    }
}

fn scroll_feed_to_end() {
    #[cfg(target_family = "wasm")]
    if let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("feed-end"))
    {
        el.scroll_into_view();
    }
}
