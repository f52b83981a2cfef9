//! Stateless login sessions, stored client-side in an authenticated cookie.
//!
//! # Overview
//!
//! A session is either [`Identity::Anonymous`] or [`Identity::Authenticated`].
//! There is no server-side store: the username travels in a cookie that's
//! encrypted and signed with [`securecookie`], so it can't be forged without
//! the server keys.
//!
//! [`SessionManager`] exposes the three operations you need:
//!
//! - [`SessionManager::establish`] mints a cookie for a freshly authenticated user;
//! - [`SessionManager::identity_of`] reads the identity out of the request cookies;
//! - [`SessionManager::clear`] builds a cookie that tells the client to drop its session.
//!
//! A cookie that's missing, malformed, expired or forged is treated exactly like
//! no cookie at all: the caller gets [`Identity::Anonymous`] back and nothing else.
pub mod config;
mod identity;
mod manager;

pub use config::{
    InvalidSessionKeys, SessionCodecConfig, SessionConfig, SessionCookieConfig, SessionKeysConfig,
};
pub use identity::{Credentials, EmptyUsername, Identity, Username};
pub use manager::{CookieDirective, SessionManager};
