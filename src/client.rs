use reqwest::Client as ReqwestClient;
use reqwest::Method;
use secrecy::ExposeSecret as _;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::Result;
use crate::config::Config;
use crate::error::{Error, Operation};
use crate::session::{Credentials, Session};

const TOKEN_PATH: &str = "/auth/token";
const SEARCH_PATH: &str = "/patent/search/{apikey}/{token}";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

/// Client for the patent search backend.
///
/// Every call sends exactly one request. Nothing is retried, cached, or
/// deduplicated, and clones share one connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    config: Config,
    client: ReqwestClient,
}

impl Client {
    /// Creates a client with its own HTTP client built from `config`.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .default_headers(config.default_headers.clone())
            .build()?;

        Ok(Self { config, client })
    }

    /// Creates a client on top of a caller-built HTTP client.
    ///
    /// The configured timeout and default headers are still applied per request.
    pub fn with_client(config: Config, client: ReqwestClient) -> Result<Self> {
        config.validate()?;

        Ok(Self { config, client })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Exchanges a client id and secret for a token via `POST /auth/token`.
    ///
    /// The response body is returned as-is; decode into `serde_json::Value` to keep
    /// it opaque.
    pub async fn generate_token<R: DeserializeOwned>(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<R> {
        let body = TokenRequest {
            client_id,
            client_secret,
        };

        self.post(Operation::GenerateToken, &["auth", "token"], TOKEN_PATH, &body)
            .await
    }

    /// Runs a patent query via `POST /patent/search/{apikey}/{token}`.
    ///
    /// `query` is sent unvalidated as the JSON body.
    pub async fn search_patents<Q, R>(&self, credentials: &Credentials, query: &Q) -> Result<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let segments = [
            "patent",
            "search",
            credentials.api_key().expose_secret(),
            credentials.token().expose_secret(),
        ];

        self.post(Operation::SearchPatents, &segments, SEARCH_PATH, query)
            .await
            .map_err(Error::without_url)
    }

    /// Like [`Client::search_patents`], taking one snapshot of the session's credentials.
    ///
    /// Fails without sending anything if the API key or token is missing.
    pub async fn search_patents_in_session<Q, R>(&self, session: &Session, query: &Q) -> Result<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let credentials = session.credentials()?;
        self.search_patents(&credentials, query).await
    }

    async fn post<B, R>(
        &self,
        operation: Operation,
        segments: &[&str],
        path: &str,
        body: &B,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(segments, path, body)
            .await
            .map_err(|e| e.during(operation))
    }

    async fn send<B, R>(&self, segments: &[&str], path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self
            .client
            .request(Method::POST, self.endpoint(segments)?)
            .timeout(self.config.timeout)
            .json(body)
            .build()?;

        crate::request::<R>(
            &self.client,
            request,
            Some(self.config.default_headers.clone()),
            path,
        )
        .await
    }

    /// Appends `segments` to the base URL path, percent-encoding each one.
    ///
    /// `.` and `..` are rejected since URL normalization would drop them.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if segments.iter().any(|s| matches!(*s, "." | "..")) {
            return Err(Error::validation(
                "path segments cannot be `.` or `..`",
            ));
        }

        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::validation(format!(
                    "base url `{}` cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }
}
