//! Integration tests for the hashbatch server.
//!
//! These tests require a running hashbatch server at `127.0.0.1:6060`.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p hashbatch-integration -- --ignored
//! ```

use std::sync::Once;

use anyhow::Context;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL of the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("HASHBATCH_ENDPOINT_URL").unwrap_or_else(|_| "http://127.0.0.1:6060".to_owned())
}

/// URL of the hashing endpoint.
#[must_use]
pub fn hash_url() -> String {
    let path = std::env::var("ENDPOINT_PATH").unwrap_or_else(|_| "/foo".to_owned());
    format!("{}{path}", endpoint_url())
}

/// Create an HTTP client for the server.
#[must_use]
pub fn client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// POST a raw body to the hashing endpoint, returning status and body bytes.
pub async fn post_raw(
    client: &reqwest::Client,
    body: impl Into<reqwest::Body>,
) -> anyhow::Result<(reqwest::StatusCode, Vec<u8>)> {
    let resp = client
        .post(hash_url())
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .context("request to hashbatch server failed")?;
    let status = resp.status();
    let bytes = resp.bytes().await.context("failed to read response body")?;
    tracing::debug!(%status, len = bytes.len(), "received response");
    Ok((status, bytes.to_vec()))
}

/// Build a JSON batch from `(str_a, str_b)` pairs.
#[must_use]
pub fn batch_json(items: &[(String, String)]) -> String {
    let items: Vec<serde_json::Value> = items
        .iter()
        .map(|(a, b)| serde_json::json!({ "str_a": a, "str_b": b }))
        .collect();
    serde_json::Value::Array(items).to_string()
}

mod test_error;
mod test_hash;
mod test_health;
