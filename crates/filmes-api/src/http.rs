//! Shared GET + JSON decode used by both clients.

use anyhow::Context;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::UpstreamError;

/// Sends a GET request and decodes the JSON body into `T`.
///
/// `error_message` extracts a provider-specific message from a failed
/// response body; the raw body is used when it returns `None`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http_client: &Client,
    url: Url,
    query: &[(&str, String)],
    error_message: fn(&str) -> Option<String>,
) -> Result<T, UpstreamError> {
    let request = http_client
        .get(url)
        .query(query)
        .build()
        .context("failed to build request")
        .map_err(UpstreamError::Unavailable)?;

    let response = http_client
        .execute(request)
        .await
        .context("request failed")
        .map_err(UpstreamError::Unavailable)?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("failed to read response body")
        .map_err(UpstreamError::Unavailable)?;

    if !status.is_success() {
        let message = error_message(&body).unwrap_or(body);
        return Err(UpstreamError::Status { status, message });
    }

    serde_json::from_str(&body)
        .context("failed to decode JSON response")
        .map_err(UpstreamError::Malformed)
}
