//! Telemetry utilities.
use std::fmt::Formatter;

use http::HeaderValue;
use uuid::Uuid;

/// A unique identifier generated for each incoming request.
///
/// It is a UUID v7: identifiers generated later sort after earlier ones.
/// It's meant to be attached to the request's root span and echoed back to the client,
/// to correlate logs with a specific request.
#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ServerRequestId(Uuid);

impl ServerRequestId {
    /// Generate a new request identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Access the underlying UUID.
    pub fn inner(&self) -> Uuid {
        self.0
    }

    /// The hyphenated representation of the identifier, as a header value.
    pub fn header_value(&self) -> HeaderValue {
        let mut buffer = Uuid::encode_buffer();
        let hyphenated = self.0.hyphenated().encode_lower(&mut buffer);
        // Hex digits and hyphens are always valid header characters.
        HeaderValue::from_str(hyphenated).unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

impl From<Uuid> for ServerRequestId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ServerRequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.0)
    }
}
