//! WASM HTTP client for the transaction-history endpoint.

use tonchat_common::chat;
use tonchat_common::feed::TransactionsPage;

/// GET one page of the chat account's transaction history.
pub async fn fetch_history(account: &str) -> Result<TransactionsPage, String> {
    let body = get_json(&chat::history_endpoint(account)).await?;
    serde_json::from_str(&body).map_err(|e| format!("Parse history response: {}", e))
}

#[cfg(target_family = "wasm")]
async fn get_json(url: &str) -> Result<String, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let opts = web_sys::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web_sys::RequestMode::Cors);

    let request = web_sys::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| format!("Failed to create request: {:?}", e))?;

    let window = web_sys::window().ok_or("No window")?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;

    let resp: web_sys::Response = resp_value
        .dyn_into()
        .map_err(|_| "Response is not a Response object".to_string())?;

    let text = JsFuture::from(
        resp.text()
            .map_err(|e| format!("Failed to get text: {:?}", e))?,
    )
    .await
    .map_err(|e| format!("Failed to read body: {:?}", e))?;

    let text_str = text
        .as_string()
        .ok_or("Response body is not a string".to_string())?;

    let status = resp.status();
    if status >= 400 {
        return Err(format!("HTTP {} from {}: {}", status, url, text_str));
    }

    Ok(text_str)
}

// Non-WASM stub for type checking
#[cfg(not(target_family = "wasm"))]
async fn get_json(_url: &str) -> Result<String, String> {
    Err("History client only available in WASM".to_string())
}
