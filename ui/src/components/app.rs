use dioxus::prelude::*;

use super::feed_view::{Composer, FeedView};
use super::session::{use_session_tracking, SessionState};
use super::sync::{use_sync_coroutine, ComposerState, FeedState};
use super::tonconnect::TonConnectBridge;

#[component]
pub fn App() -> Element {
    // Injected wallet-session handle; bridge state lives outside the app.
    use_context_provider(TonConnectBridge::default);
    use_context_provider(|| Signal::new(SessionState::default()));
    use_context_provider(|| Signal::new(FeedState::default()));
    use_context_provider(|| Signal::new(ComposerState::default()));
    use_session_tracking();
    use_sync_coroutine();

    rsx! {
        document::Link { rel: "manifest", href: "/assets/manifest.json" }
        document::Link { rel: "stylesheet", href: "/assets/styles.css" }
        document::Script { src: "https://unpkg.com/@tonconnect/ui@2/dist/tonconnect-ui.min.js" }
        document::Script { src: "/assets/tonconnect-init.js" }

        div { class: "chat-app",
            header { class: "app-header",
                div { class: "header-brand",
                    img { class: "app-logo", src: "/assets/logo.png", alt: "Logo" }
                    h1 { "TON Chat" }
                }
                // The bridge renders its connect button into this node.
                div { id: "ton-connect" }
            }
            main { class: "chat-main",
                FeedView {}
                Composer {}
            }
        }
    }
}
