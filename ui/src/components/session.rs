use std::rc::Rc;

use dioxus::prelude::*;

use tonchat_common::address::TonAddress;

use super::tonconnect::{StatusSubscription, TonConnectBridge};

fn clog(msg: &str) {
    #[cfg(target_family = "wasm")]
    web_sys::console::log_1(&msg.into());
    #[cfg(not(target_family = "wasm"))]
    let _ = msg;
}

/// Wallet-session state shared across components: the connected
/// account's normalized address, or `None` while disconnected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub address: Option<String>,
}

impl SessionState {
    pub fn connected(&self) -> bool {
        self.address.is_some()
    }
}

pub fn use_session_state() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Track the wallet session for the component's lifetime: attach to the
/// bridge's status stream and mirror the normalized account address
/// into [`SessionState`].
///
/// The bridge bootstrap script loads asynchronously, so attachment
/// polls until the bridge object appears. Both the polling task and
/// the subscription guard die with the scope, detaching the callback.
pub fn use_session_tracking() {
    let mut session = use_session_state();
    let bridge = use_context::<TonConnectBridge>();
    let mut subscription = use_signal(|| None::<Rc<StatusSubscription>>);

    use_future(move || {
        let bridge = bridge.clone();
        async move {
            for _ in 0..100u32 {
                let attached = bridge.subscribe_status(move |raw| {
                    // An unparseable own address is treated as disconnected.
                    let address = raw
                        .as_deref()
                        .and_then(|raw| TonAddress::parse(raw).ok())
                        .map(|addr| addr.to_string());
                    match &address {
                        Some(addr) => clog(&format!("[WALLET] Connected: {addr}")),
                        None => clog("[WALLET] Disconnected"),
                    }
                    session.write().address = address;
                });
                if let Some(sub) = attached {
                    subscription.set(Some(Rc::new(sub)));
                    return;
                }
                sleep_ms(200).await;
            }
            clog("[WALLET] Bridge never appeared; session tracking disabled");
        }
    });
}

async fn sleep_ms(ms: u32) {
    #[cfg(target_family = "wasm")]
    gloo_timers::future::TimeoutFuture::new(ms).await;
    #[cfg(not(target_family = "wasm"))]
    let _ = ms;
}
