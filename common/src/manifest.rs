use serde::{Deserialize, Serialize};

use crate::chat;

/// Installable web-app manifest, the source of `ui/assets/manifest.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Dapp manifest the wallet bridge fetches before connecting, the
/// source of `ui/assets/tonconnect-manifest.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DappManifest {
    pub url: String,
    pub name: String,
    pub icon_url: String,
}

/// The manifest the app ships.
pub fn web_manifest() -> WebManifest {
    WebManifest {
        name: "TON Chat".to_string(),
        short_name: "TON Chat".to_string(),
        description: "Global on-chain chat".to_string(),
        start_url: "/".to_string(),
        display: "standalone".to_string(),
        background_color: "#ffffff".to_string(),
        theme_color: "#ffffff".to_string(),
        icons: vec![
            ManifestIcon {
                src: "/assets/icon-192x192.png".to_string(),
                sizes: "192x192".to_string(),
                mime_type: "image/png".to_string(),
            },
            ManifestIcon {
                src: "/assets/icon-512x512.png".to_string(),
                sizes: "512x512".to_string(),
                mime_type: "image/png".to_string(),
            },
        ],
    }
}

/// The dapp manifest the app ships.
pub fn dapp_manifest() -> DappManifest {
    DappManifest {
        url: chat::app_url(),
        name: "TON Chat".to_string(),
        icon_url: format!("{}/icon-192x192.png", chat::app_url()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_manifest_serializes_standard_keys() {
        let json = serde_json::to_string(&web_manifest()).unwrap();
        assert!(json.contains(r#""short_name":"TON Chat""#));
        assert!(json.contains(r#""start_url":"/""#));
        assert!(json.contains(r#""type":"image/png""#));
        assert_eq!(web_manifest().icons.len(), 2);
    }

    #[test]
    fn dapp_manifest_uses_camel_case() {
        let json = serde_json::to_string(&dapp_manifest()).unwrap();
        assert!(json.contains(r#""iconUrl""#));
        assert!(!json.contains("icon_url"));
        assert!(dapp_manifest().url.starts_with("https://"));
    }
}
