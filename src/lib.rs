#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod client;
pub mod config;
pub mod error;
pub(crate) mod serde_helpers;
pub mod session;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use client::Client;
pub use config::Config;
pub use error::{Error, Kind, Operation};
pub use session::{Credentials, Session};

pub type Result<T> = std::result::Result<T, Error>;

/// Sends `request` and decodes a successful body as `Response`.
///
/// `path` is what failures report; callers pass it with secrets removed.
/// An empty success body decodes as JSON `null`.
pub(crate) async fn request<Response: DeserializeOwned>(
    client: &ReqwestClient,
    mut request: Request,
    headers: Option<HeaderMap>,
    path: &str,
) -> Result<Response> {
    let method = request.method().clone();

    if let Some(h) = headers {
        for (name, value) in &h {
            if !request.headers().contains_key(name) {
                request.headers_mut().insert(name, value.clone());
            }
        }
    }

    let response = client.execute(request).await?;
    let status_code = response.status();
    let bytes = response.bytes().await?;

    if !status_code.is_success() {
        let message = backend_message(&bytes);

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            message = ?message,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path.to_owned(), message));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(status = %status_code, method = %method, path = %path, "API request succeeded");

    let json_value = success_body(&bytes);

    serde_helpers::deserialize_with_warnings(json_value)
}

/// Parses a success body as JSON, handing non-JSON bodies back as a string.
fn success_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice::<Value>(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Extracts the `message` field from a JSON error body.
///
/// Blank or falsy values (`""`, `false`, `0`, `null`) count as absent.
fn backend_message(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<Value>(body).ok()?;
    match value.get("message")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON) => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
