use biscotti::{RequestCookies, ResponseCookie};
use securecookie::{EncodeError, SecureCookie};
use tracing_log_error::fields::{ERROR_MESSAGE, error_message};

use crate::config::{InvalidSessionKeys, SessionConfig, SessionCookieConfig};
use crate::{Identity, Username};

/// What gets stored, encrypted, in the session cookie.
#[derive(serde::Serialize, serde::Deserialize)]
struct SessionPayload<'a> {
    #[serde(default)]
    name: std::borrow::Cow<'a, str>,
}

/// Establish, read and clear login sessions.
///
/// The manager holds the codec keys and the cookie attributes.
/// It's immutable after construction: build it once at startup and share it
/// across requests.
#[derive(Debug, Clone)]
pub struct SessionManager {
    codec: SecureCookie,
    cookie: SessionCookieConfig,
}

impl SessionManager {
    /// Build a manager out of a pre-configured codec.
    pub fn new(codec: SecureCookie, cookie: SessionCookieConfig) -> Self {
        Self { codec, cookie }
    }

    /// Build a manager according to the provided configuration.
    ///
    /// Random keys are generated if none were configured.
    pub fn from_config(config: &SessionConfig) -> Result<Self, InvalidSessionKeys> {
        Ok(Self::new(config.codec.codec()?, config.cookie.clone()))
    }

    /// Start a session for `username`.
    ///
    /// It returns the cookie that must be sent back to the client.
    /// If encoding fails, no cookie is produced and the session doesn't start.
    pub fn establish(&self, username: &Username) -> Result<CookieDirective, EncodeError> {
        let payload = SessionPayload {
            name: username.as_str().into(),
        };
        let token = self.codec.encode(&self.cookie.name, &payload)?;
        let cookie = self.response_cookie(token);
        Ok(CookieDirective::Set(cookie))
    }

    /// Determine who sent the request.
    ///
    /// A missing cookie and an invalid cookie look exactly the same to the caller:
    /// both result in [`Identity::Anonymous`].
    pub fn identity_of(&self, cookies: &RequestCookies<'_>) -> Identity {
        match cookies.get(&self.cookie.name) {
            Some(cookie) => self.identity_from_token(cookie.value()),
            None => Identity::Anonymous,
        }
    }

    /// Determine who owns a raw session cookie value.
    pub fn identity_from_token(&self, token: &str) -> Identity {
        match self.codec.decode::<SessionPayload<'static>>(&self.cookie.name, token) {
            Ok(payload) => match Username::parse(payload.name) {
                Ok(username) => Identity::Authenticated(username),
                Err(_) => Identity::Anonymous,
            },
            Err(e) => {
                // Stale and forged cookies are business as usual.
                tracing::event!(
                    tracing::Level::TRACE,
                    { ERROR_MESSAGE } = error_message(&e),
                    "Ignoring an invalid session cookie"
                );
                Identity::Anonymous
            }
        }
    }

    /// End the current session, if there is one.
    ///
    /// It always succeeds, even if the client never had a session.
    pub fn clear(&self) -> CookieDirective {
        let cookie = self
            .response_cookie(String::new())
            .set_max_age(jiff::SignedDuration::from_secs(-1));
        CookieDirective::Clear(cookie)
    }

    fn response_cookie(&self, value: String) -> ResponseCookie<'static> {
        let mut cookie = ResponseCookie::new(self.cookie.name.clone(), value);
        if let Some(path) = &self.cookie.path {
            cookie = cookie.set_path(path.clone());
        }
        if self.cookie.secure {
            cookie = cookie.set_secure(true);
        }
        if self.cookie.http_only {
            cookie = cookie.set_http_only(true);
        }
        cookie
    }
}

/// An instruction for the client, to be attached to the outgoing response.
#[derive(Debug)]
#[must_use]
pub enum CookieDirective {
    /// Store the session cookie. It carries no `Max-Age`:
    /// it lives as long as the browser session.
    Set(ResponseCookie<'static>),
    /// Delete the session cookie, via an empty value with a negative `Max-Age`.
    Clear(ResponseCookie<'static>),
}

impl CookieDirective {
    pub fn is_clear(&self) -> bool {
        matches!(self, CookieDirective::Clear(_))
    }

    pub fn cookie(&self) -> &ResponseCookie<'static> {
        match self {
            CookieDirective::Set(c) | CookieDirective::Clear(c) => c,
        }
    }

    pub fn into_cookie(self) -> ResponseCookie<'static> {
        match self {
            CookieDirective::Set(c) | CookieDirective::Clear(c) => c,
        }
    }
}
