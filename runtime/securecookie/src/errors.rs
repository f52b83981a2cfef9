//! The errors that can occur when building or using a [`SecureCookie`](crate::SecureCookie).

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The keys passed to [`CookieKeys::new`](crate::CookieKeys::new) are unusable.
pub enum KeyError {
    #[error("The hash key must be at least {min} bytes long, but it's {actual} bytes long")]
    HashKeyTooShort { actual: usize, min: usize },
    #[error(
        "The block key must be 16, 24 or 32 bytes long (AES-128, AES-192 or AES-256), \
        but it's {0} bytes long"
    )]
    InvalidBlockKeyLength(usize),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Something went wrong while encoding a value.
///
/// Encoding failures are internal errors: they are never caused by
/// the data sent by the client.
pub enum EncodeError {
    #[error("Failed to serialize the cookie payload")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to encrypt the cookie payload")]
    Encrypt,
    #[error("The encoded value is {actual} bytes long, exceeding the limit of {max} bytes")]
    ValueTooLong { actual: usize, max: usize },
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The token can't be trusted or doesn't hold the expected payload.
///
/// Decoding failures are expected: stale cookies, cookies minted by
/// another server and tampered values all end up here.
pub enum DecodeError {
    #[error("The token is {actual} bytes long, exceeding the limit of {max} bytes")]
    ValueTooLong { actual: usize, max: usize },
    #[error("The token is not valid base64")]
    InvalidBase64,
    #[error("The token is not made of a timestamp, a value and a MAC")]
    Malformed,
    #[error("The MAC does not match the cookie name and value")]
    InvalidMac,
    #[error("The timestamp is not a valid unix timestamp")]
    InvalidTimestamp,
    #[error("The token has expired")]
    Expired,
    #[error("The token is too recent")]
    TooNew,
    #[error("Failed to decrypt the cookie payload")]
    Decrypt,
    #[error("Failed to deserialize the cookie payload")]
    Deserialize(#[source] serde_json::Error),
}
