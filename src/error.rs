use std::error::Error as StdError;
use std::fmt;

use reqwest::{Method, StatusCode};

/// Message returned when a search is attempted without an API key or token.
pub const MISSING_CREDENTIALS: &str =
    "apikey or token missing, please enter information and fetch a token first";

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Required credentials were absent; no request was sent.
    Precondition,
    /// The backend answered with a non-success status.
    Status,
    /// Connection failure, timeout, or a body that could not be read or decoded.
    Transport,
    /// Invalid local input such as a malformed base URL.
    Validation,
    /// Anything else.
    Internal,
}

/// The façade operation a failure belongs to.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    GenerateToken,
    SearchPatents,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::GenerateToken => f.write_str("token generation"),
            Operation::SearchPatents => f.write_str("patent search"),
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    operation: Option<Operation>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            operation: None,
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    /// The human-readable failure description, identical to the `Display` output.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether the request was abandoned because the client timeout elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.downcast_ref::<reqwest::Error>()
            .is_some_and(reqwest::Error::is_timeout)
    }

    /// Tags the error with the operation that produced it.
    #[must_use]
    pub(crate) fn during(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Drops the request URL from a transport cause so path-borne secrets are not displayed.
    #[must_use]
    pub(crate) fn without_url(mut self) -> Self {
        self.source = self
            .source
            .map(|source| match source.downcast::<reqwest::Error>() {
                Ok(e) => Box::new((*e).without_url()) as Box<dyn StdError + Send + Sync>,
                Err(other) => other,
            });
        self
    }

    pub fn precondition<S: Into<String>>(reason: S) -> Self {
        Precondition {
            reason: reason.into(),
        }
        .into()
    }

    #[must_use]
    pub fn missing_credentials() -> Self {
        Self::precondition(MISSING_CREDENTIALS)
    }

    pub fn validation<S: Into<String>>(reason: S) -> Self {
        Validation {
            reason: reason.into(),
        }
        .into()
    }

    pub fn status(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: Option<String>,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            message,
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = self.operation {
            write!(f, "{operation} failed: ")?;
        }

        match &self.source {
            Some(src) => write!(f, "{src}"),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// A non-success response from the backend.
#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    /// Path relative to the base URL, with credential segments left as placeholders.
    pub path: String,
    /// The `message` field of the response body, when the body carried one.
    pub message: Option<String>,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => write!(
                f,
                "Request failed with status code {}",
                self.status_code.as_u16()
            ),
        }
    }
}

impl StdError for Status {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Precondition {
    pub reason: String,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl StdError for Precondition {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

impl From<Status> for Error {
    fn from(err: Status) -> Self {
        Error::with_source(Kind::Status, err)
    }
}

impl From<Precondition> for Error {
    fn from(err: Precondition) -> Self {
        Error::with_source(Kind::Precondition, err)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Error::with_source(Kind::Internal, e)
        } else {
            Error::with_source(Kind::Transport, e)
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::with_source(Kind::Internal, e)
        } else {
            Error::with_source(Kind::Transport, e)
        }
    }
}

#[cfg(feature = "tracing")]
impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Error::with_source(Kind::Transport, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_prefers_backend_message() {
        let err = Error::status(
            StatusCode::UNAUTHORIZED,
            Method::POST,
            "/auth/token".to_owned(),
            Some("invalid credentials".to_owned()),
        )
        .during(Operation::GenerateToken);

        assert_eq!(err.kind(), Kind::Status);
        assert_eq!(err.operation(), Some(Operation::GenerateToken));
        assert_eq!(err.message(), "token generation failed: invalid credentials");

        let status = err.downcast_ref::<Status>().expect("status source");
        assert_eq!(status.status_code, StatusCode::UNAUTHORIZED);
        assert_eq!(status.path, "/auth/token");
    }

    #[test]
    fn status_without_message_reports_code() {
        let err = Error::status(
            StatusCode::INTERNAL_SERVER_ERROR,
            Method::POST,
            "/patent/search/{apikey}/{token}".to_owned(),
            None,
        )
        .during(Operation::SearchPatents);

        assert_eq!(
            err.to_string(),
            "patent search failed: Request failed with status code 500"
        );
    }

    #[test]
    fn precondition_has_no_prefix() {
        let err = Error::missing_credentials();

        assert_eq!(err.kind(), Kind::Precondition);
        assert_eq!(err.operation(), None);
        assert_eq!(err.to_string(), MISSING_CREDENTIALS);
        assert!(!err.is_timeout(), "precondition is not a timeout");
    }

    #[test]
    fn source_chain_exposes_cause() {
        let err = Error::validation("timeout must be greater than zero");

        let source = StdError::source(&err).expect("validation source");
        assert_eq!(source.to_string(), "invalid: timeout must be greater than zero");
        assert!(err.downcast_ref::<Validation>().is_some(), "downcasts to Validation");
    }
}
