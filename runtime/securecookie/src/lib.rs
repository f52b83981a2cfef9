//! Authenticated, optionally encrypted, cookie values.
//!
//! A [`SecureCookie`] turns any serializable value into an opaque, URL-safe token
//! and back again. Every token carries:
//!
//! - the creation timestamp, checked against a freshness window on decode;
//! - the payload, encrypted with AES-GCM if a block key was provided;
//! - an HMAC-SHA256 tag over the cookie name, the timestamp and the payload.
//!
//! The cookie name is part of the authenticated context: a token minted for
//! `session` won't decode as `preferences`, even if both are set by the same server.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use securecookie::{CookieKeys, SecureCookie};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let codec = SecureCookie::new(&CookieKeys::generate())?;
//!
//! let payload = HashMap::from([("name".to_string(), "alice".to_string())]);
//! let token = codec.encode("session", &payload)?;
//!
//! let decoded: HashMap<String, String> = codec.decode("session", &token)?;
//! assert_eq!(decoded["name"], "alice");
//!
//! // The token is bound to the name it was encoded under.
//! assert!(codec.decode::<HashMap<String, String>>("other", &token).is_err());
//! # Ok(())
//! # }
//! ```
mod codec;
pub mod errors;
mod keys;

pub use codec::SecureCookie;
pub use errors::{DecodeError, EncodeError, KeyError};
pub use keys::{CookieKeys, generate_random_key};
