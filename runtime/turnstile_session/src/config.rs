//! Configuration for login sessions.
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use securecookie::{CookieKeys, KeyError, SecureCookie};

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Configure how sessions are stored on the client-side.
pub struct SessionConfig {
    /// The attributes of the session cookie.
    #[serde(default)]
    pub cookie: SessionCookieConfig,
    /// How sessions are protected.
    #[serde(default)]
    pub codec: SessionCodecConfig,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Configure the cookie used to store session information on the client-side.
pub struct SessionCookieConfig {
    /// The name of the cookie used to store the session.
    ///
    /// By default, the name is set to `session`.
    #[serde(default = "default_session_cookie_name")]
    pub name: String,
    /// Set the `Path` attribute on the session cookie.
    ///
    /// By default, the attribute is set to `/`.
    #[serde(default = "default_session_cookie_path")]
    pub path: Option<String>,
    /// Set the `Secure` attribute on the session cookie.
    ///
    /// Default is `false`, so that sessions work over plain HTTP.
    #[serde(default)]
    pub secure: bool,
    /// Set the `HttpOnly` attribute on the session cookie.
    ///
    /// Default is `false`.
    #[serde(default)]
    pub http_only: bool,
}

impl Default for SessionCookieConfig {
    fn default() -> Self {
        Self {
            name: default_session_cookie_name(),
            path: default_session_cookie_path(),
            secure: false,
            http_only: false,
        }
    }
}

fn default_session_cookie_name() -> String {
    "session".to_string()
}

fn default_session_cookie_path() -> Option<String> {
    Some("/".to_string())
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// Configure the codec that signs and encrypts the session cookie.
pub struct SessionCodecConfig {
    /// Session cookies older than this are rejected.
    ///
    /// The cookie itself carries no `Max-Age`: this window is enforced server-side,
    /// when the cookie is decoded.
    /// By default, it's set to 30 days. A zero duration disables the check.
    #[serde(default = "default_max_age")]
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,
    /// Fixed keys for the codec.
    ///
    /// If missing, a fresh pair of random keys is generated on startup:
    /// sessions won't survive a restart and won't be recognised by other instances.
    #[serde(default)]
    pub keys: Option<SessionKeysConfig>,
}

impl Default for SessionCodecConfig {
    fn default() -> Self {
        Self {
            max_age: default_max_age(),
            keys: None,
        }
    }
}

fn default_max_age() -> Duration {
    SecureCookie::DEFAULT_MAX_AGE
}

impl SessionCodecConfig {
    /// Build the codec described by this configuration.
    pub fn codec(&self) -> Result<SecureCookie, InvalidSessionKeys> {
        let keys = match &self.keys {
            Some(keys) => keys.cookie_keys()?,
            None => CookieKeys::generate(),
        };
        Ok(SecureCookie::new(&keys)?.max_age(self.max_age))
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Hex-encoded keys for the session codec.
pub struct SessionKeysConfig {
    /// The HMAC key, at least 64 bytes once decoded.
    pub hash_key: SecretString,
    /// The AES key: 16, 24 or 32 bytes once decoded.
    ///
    /// Without it, session cookies are signed but not encrypted.
    #[serde(default)]
    pub block_key: Option<SecretString>,
}

impl SessionKeysConfig {
    /// Decode and validate the configured keys.
    pub fn cookie_keys(&self) -> Result<CookieKeys, InvalidSessionKeys> {
        let hash_key = hex::decode(self.hash_key.expose_secret().trim())
            .map_err(|_| InvalidSessionKeys::NotHex { key: "hash_key" })?;
        let block_key = self
            .block_key
            .as_ref()
            .map(|k| hex::decode(k.expose_secret().trim()))
            .transpose()
            .map_err(|_| InvalidSessionKeys::NotHex { key: "block_key" })?;
        Ok(CookieKeys::new(hash_key, block_key)?)
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The configured session keys can't be used.
pub enum InvalidSessionKeys {
    #[error("`{key}` is not a valid hex-encoded string")]
    NotHex { key: &'static str },
    #[error(transparent)]
    InvalidKey(#[from] KeyError),
}
