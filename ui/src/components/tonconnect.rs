//! Bridge to the TonConnect UI object the bootstrap script in
//! `assets/tonconnect-init.js` installs on `window`. The bridge owns
//! the wallet session entirely — connection, reconnection, signing —
//! and this module only drives it.

use tonchat_common::address::TonAddress;
use tonchat_common::wallet::{SendTransactionRequest, WalletError, WalletSession};

/// Injected wallet-session handle. Cheap to clone; all session state
/// lives in the external bridge object.
#[derive(Clone, Debug, Default)]
pub struct TonConnectBridge;

/// Live connect-status subscription. Dropping it detaches the callback
/// from the bridge, so holding it in a hook ties the subscription to
/// the component's lifetime.
pub struct StatusSubscription {
    #[cfg(target_family = "wasm")]
    unsubscribe: Option<js_sys::Function>,
    #[cfg(target_family = "wasm")]
    _callback: wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>,
}

impl Drop for StatusSubscription {
    fn drop(&mut self) {
        #[cfg(target_family = "wasm")]
        if let Some(unsubscribe) = self.unsubscribe.take() {
            let _ = unsubscribe.call0(&wasm_bindgen::JsValue::NULL);
        }
    }
}

impl TonConnectBridge {
    /// Subscribe to connect-status changes. The callback receives the
    /// connected account's raw address, or `None` on disconnect, and
    /// also fires once with the current state. Returns `None` when the
    /// bridge is missing from the page.
    pub fn subscribe_status(
        &self,
        callback: impl FnMut(Option<String>) + 'static,
    ) -> Option<StatusSubscription> {
        #[cfg(target_family = "wasm")]
        {
            wasm::subscribe_status(callback)
        }
        #[cfg(not(target_family = "wasm"))]
        {
            let _ = callback;
            None
        }
    }
}

impl WalletSession for TonConnectBridge {
    fn account(&self) -> Option<TonAddress> {
        #[cfg(target_family = "wasm")]
        {
            let raw = wasm::raw_account_address()?;
            TonAddress::parse(&raw).ok()
        }
        #[cfg(not(target_family = "wasm"))]
        {
            None
        }
    }

    async fn send_transaction(
        &self,
        request: &SendTransactionRequest,
    ) -> Result<(), WalletError> {
        #[cfg(target_family = "wasm")]
        {
            wasm::send_transaction(request).await
        }
        #[cfg(not(target_family = "wasm"))]
        {
            let _ = request;
            Err(WalletError::BridgeUnavailable(
                "wallet bridge only available in WASM".to_string(),
            ))
        }
    }
}

#[cfg(target_family = "wasm")]
mod wasm {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    use tonchat_common::wallet::{SendTransactionRequest, WalletError};

    use super::StatusSubscription;

    fn clog(msg: &str) {
        web_sys::console::log_1(&msg.into());
    }

    /// The `window.tonConnectUI` object, if the bootstrap script ran.
    fn bridge_object() -> Result<JsValue, WalletError> {
        let window = web_sys::window()
            .ok_or_else(|| WalletError::BridgeUnavailable("no window".to_string()))?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str("tonConnectUI"))
            .map_err(|_| WalletError::BridgeUnavailable("tonConnectUI missing".to_string()))?;
        if value.is_undefined() || value.is_null() {
            return Err(WalletError::BridgeUnavailable(
                "tonConnectUI not initialized".to_string(),
            ));
        }
        Ok(value)
    }

    fn get(target: &JsValue, key: &str) -> Option<JsValue> {
        js_sys::Reflect::get(target, &JsValue::from_str(key))
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
    }

    /// Raw address of the connected account, read off the bridge.
    pub fn raw_account_address() -> Option<String> {
        let bridge = bridge_object().ok()?;
        get(&bridge, "account")
            .and_then(|account| get(&account, "address"))
            .and_then(|address| address.as_string())
    }

    pub fn subscribe_status(
        mut callback: impl FnMut(Option<String>) + 'static,
    ) -> Option<StatusSubscription> {
        let bridge = match bridge_object() {
            Ok(bridge) => bridge,
            Err(err) => {
                clog(&format!("[WALLET] Status subscription unavailable: {err}"));
                return None;
            }
        };

        let closure = Closure::wrap(Box::new(move |wallet: JsValue| {
            let address = (!wallet.is_undefined() && !wallet.is_null())
                .then(|| get(&wallet, "account"))
                .flatten()
                .and_then(|account| get(&account, "address"))
                .and_then(|address| address.as_string());
            callback(address);
        }) as Box<dyn FnMut(JsValue)>);

        let method: js_sys::Function = get(&bridge, "onStatusChange")?.dyn_into().ok()?;
        // onStatusChange returns the matching unsubscribe function.
        let unsubscribe = method
            .call1(&bridge, closure.as_ref().unchecked_ref())
            .ok()
            .and_then(|ret| ret.dyn_into::<js_sys::Function>().ok());

        Some(StatusSubscription {
            unsubscribe,
            _callback: closure,
        })
    }

    pub async fn send_transaction(request: &SendTransactionRequest) -> Result<(), WalletError> {
        let bridge = bridge_object()?;
        let method: js_sys::Function = get(&bridge, "sendTransaction")
            .ok_or_else(|| {
                WalletError::BridgeUnavailable("sendTransaction missing".to_string())
            })?
            .dyn_into()
            .map_err(|_| {
                WalletError::BridgeUnavailable("sendTransaction is not callable".to_string())
            })?;

        let arg = serde_wasm_bindgen::to_value(request)
            .map_err(|e| WalletError::SendFailed(format!("serialize request: {e}")))?;

        let promise: js_sys::Promise = method
            .call1(&bridge, &arg)
            .map_err(|e| WalletError::SendFailed(format!("{e:?}")))?
            .dyn_into()
            .map_err(|_| {
                WalletError::SendFailed("sendTransaction did not return a promise".to_string())
            })?;

        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| WalletError::SendFailed(format!("{e:?}")))
    }
}
