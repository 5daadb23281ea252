//! Credentials needed by patent search.
//!
//! [`Credentials`] is an immutable snapshot that is checked when it is made, so
//! the values validated are exactly the values sent. [`Session`] is a small
//! shared store the application writes to (for example after a successful
//! token request) and the client only reads from.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret as _, SecretString};

use crate::Result;
use crate::error::Error;

/// Session key holding the API key.
pub const API_KEY: &str = "apikey";
/// Session key holding the token.
pub const TOKEN: &str = "token";

/// A validated API key and token pair.
#[derive(Clone)]
pub struct Credentials {
    api_key: SecretString,
    token: SecretString,
}

impl Credentials {
    /// Fails with the missing-credentials precondition if either value is empty.
    pub fn new<K: Into<String>, T: Into<String>>(api_key: K, token: T) -> Result<Self> {
        let api_key = api_key.into();
        let token = token.into();
        if api_key.is_empty() || token.is_empty() {
            return Err(Error::missing_credentials());
        }

        Ok(Self {
            api_key: api_key.into(),
            token: token.into(),
        })
    }

    #[must_use]
    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Shared string store keyed like browser session storage.
///
/// Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct Session {
    values: Arc<RwLock<HashMap<String, SecretString>>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<SecretString> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        values.get(key).cloned()
    }

    pub fn set<K: Into<String>, V: Into<String>>(&self, key: K, value: V) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.into(), SecretString::from(value.into()));
    }

    pub fn remove(&self, key: &str) -> Option<SecretString> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.remove(key)
    }

    pub fn clear(&self) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.clear();
    }

    pub fn set_api_key<V: Into<String>>(&self, api_key: V) {
        self.set(API_KEY, api_key);
    }

    pub fn set_token<V: Into<String>>(&self, token: V) {
        self.set(TOKEN, token);
    }

    /// Reads both values under one lock and validates that snapshot.
    pub fn credentials(&self) -> Result<Credentials> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let (Some(api_key), Some(token)) = (values.get(API_KEY), values.get(TOKEN)) else {
            return Err(Error::missing_credentials());
        };

        Credentials::new(api_key.expose_secret(), token.expose_secret())
    }
}
