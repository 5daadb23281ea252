use std::time::Duration;

use bon::Builder;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use crate::Result;
use crate::error::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Settings shared by every request a [`Client`](crate::Client) issues.
///
/// Fixed once the client is built.
#[non_exhaustive]
#[derive(Builder, Clone, Debug)]
pub struct Config {
    #[builder(default = default_base_url())]
    pub base_url: Url,
    /// Whole-request deadline; exceeding it fails the call.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    #[builder(default = default_headers())]
    pub default_headers: HeaderMap,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Default configuration pointed at another backend.
    pub fn from_base_url(base_url: &str) -> Result<Self> {
        let config = Self::builder().base_url(Url::parse(base_url)?).build();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.cannot_be_a_base() {
            return Err(Error::validation(format!(
                "base url `{}` cannot carry a path",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::validation("timeout must be greater than zero"));
        }
        Ok(())
    }
}

#[expect(
    clippy::unwrap_used,
    reason = "DEFAULT_BASE_URL is a valid absolute URL"
)]
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap()
}

pub(crate) fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}
