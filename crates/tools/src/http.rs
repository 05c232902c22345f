//! Shared HTTP plumbing for the remote adapters.
//!
//! Every remote adapter issues a GET with query parameters and expects a
//! JSON body back. Status codes and transport failures are mapped onto
//! [`ToolError::RemoteError`] here so the adapters only deal with payloads.

use concierge_core::error::ToolError;
use serde_json::Value;
use tracing::{debug, warn};

const MAX_ERROR_BODY: usize = 200;

/// Build the HTTP client shared by all remote adapters.
///
/// No client-level timeout: each adapter is bounded by `ToolAdapter::invoke`.
pub fn shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("concierge/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// GET `url` with `params` and decode the JSON body.
pub(crate) async fn get_json(
    client: &reqwest::Client,
    tool_name: &str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<Value, ToolError> {
    debug!(tool = tool_name, url, "Sending request");

    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| remote(tool_name, None, format!("request failed: {e}")))?;

    let status = response.status().as_u16();

    match status {
        200..=299 => {}
        404 => return Err(remote(tool_name, Some(404), "not found".into())),
        401 | 403 => {
            return Err(remote(
                tool_name,
                Some(status),
                "authentication failed (check the API key)".into(),
            ));
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            warn!(tool = tool_name, status, "Remote service returned an error");
            return Err(remote(tool_name, Some(status), truncate(&body, MAX_ERROR_BODY)));
        }
    }

    response
        .json::<Value>()
        .await
        .map_err(|_| remote(tool_name, Some(status), "invalid response".into()))
}

fn remote(tool_name: &str, status: Option<u16>, message: String) -> ToolError {
    ToolError::RemoteError {
        tool_name: tool_name.to_string(),
        status,
        message,
    }
}

/// Shorten `text` to at most `max` characters, appending "..." when cut.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Read a required string parameter.
pub(crate) fn required_str<'a>(parameters: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    parameters[key]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidInput(format!("Missing '{key}' argument")))
}
