use std::time::Duration;

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::Sha256;

use crate::{CookieKeys, DecodeError, EncodeError, KeyError};

type HmacSha256 = Hmac<Sha256>;
type Aes192Gcm = AesGcm<Aes192, U12>;

const NONCE_LENGTH: usize = 12;
const SEPARATOR: u8 = b'|';

/// Encodes and decodes authenticated cookie values.
///
/// Token layout, before the outer base64 encoding:
///
/// ```text
/// <unix timestamp>|<base64(nonce + ciphertext)>|<HMAC-SHA256(name|timestamp|value)>
/// ```
///
/// Decoding verifies the MAC, in constant time, before looking at anything else
/// in the token. The timestamp is then checked against the freshness window and,
/// only at that point, the payload is decrypted and deserialized.
///
/// A [`SecureCookie`] holds no mutable state: share it freely across threads.
#[derive(Clone)]
pub struct SecureCookie {
    mac: HmacSha256,
    cipher: Option<BlockCipher>,
    max_age: Duration,
    min_age: Duration,
    max_length: usize,
}

impl SecureCookie {
    /// Tokens older than 30 days are rejected by default.
    pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(86400 * 30);
    /// Browsers are only required to store 4096 bytes per cookie.
    pub const DEFAULT_MAX_LENGTH: usize = 4096;

    /// Build a new codec from the given keys.
    pub fn new(keys: &CookieKeys) -> Result<Self, KeyError> {
        let mac = <HmacSha256 as Mac>::new_from_slice(keys.hash_key()).map_err(|_| {
            KeyError::HashKeyTooShort {
                actual: keys.hash_key().len(),
                min: CookieKeys::MIN_HASH_KEY_LENGTH,
            }
        })?;
        let cipher = keys.block_key().map(BlockCipher::new).transpose()?;
        Ok(Self {
            mac,
            cipher,
            max_age: Self::DEFAULT_MAX_AGE,
            min_age: Duration::ZERO,
            max_length: Self::DEFAULT_MAX_LENGTH,
        })
    }

    /// Reject tokens older than `max_age` on decode.
    ///
    /// A zero duration disables the check.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Reject tokens younger than `min_age` on decode.
    ///
    /// A zero duration, the default, disables the check.
    pub fn min_age(mut self, min_age: Duration) -> Self {
        self.min_age = min_age;
        self
    }

    /// Cap the length of encoded tokens.
    ///
    /// A limit of zero disables the check.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Serialize, encrypt and authenticate `value` under the logical cookie `name`.
    pub fn encode<T>(&self, name: &str, value: &T) -> Result<String, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        self.encode_at(name, value, jiff::Timestamp::now().as_second())
    }

    /// Authenticate, decrypt and deserialize a token produced by [`SecureCookie::encode`]
    /// under the same `name`.
    pub fn decode<T>(&self, name: &str, token: &str) -> Result<T, DecodeError>
    where
        T: DeserializeOwned,
    {
        self.decode_at(name, token, jiff::Timestamp::now().as_second())
    }

    fn encode_at<T>(&self, name: &str, value: &T, now: i64) -> Result<String, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        let plaintext = serde_json::to_vec(value).map_err(EncodeError::Serialize)?;
        let sealed = match &self.cipher {
            Some(cipher) => cipher.seal(name.as_bytes(), &plaintext)?,
            None => plaintext,
        };
        let value = URL_SAFE_NO_PAD.encode(sealed);
        let timestamp = now.to_string();
        let tag = self.sign(name, timestamp.as_bytes(), value.as_bytes());

        let mut raw = Vec::with_capacity(timestamp.len() + value.len() + tag.len() + 2);
        raw.extend_from_slice(timestamp.as_bytes());
        raw.push(SEPARATOR);
        raw.extend_from_slice(value.as_bytes());
        raw.push(SEPARATOR);
        raw.extend_from_slice(&tag);
        let token = URL_SAFE_NO_PAD.encode(raw);

        if self.max_length != 0 && token.len() > self.max_length {
            return Err(EncodeError::ValueTooLong {
                actual: token.len(),
                max: self.max_length,
            });
        }
        Ok(token)
    }

    fn decode_at<T>(&self, name: &str, token: &str, now: i64) -> Result<T, DecodeError>
    where
        T: DeserializeOwned,
    {
        if self.max_length != 0 && token.len() > self.max_length {
            return Err(DecodeError::ValueTooLong {
                actual: token.len(),
                max: self.max_length,
            });
        }
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| DecodeError::InvalidBase64)?;

        // The MAC is binary, it may contain the separator.
        let mut parts = raw.splitn(3, |b| *b == SEPARATOR);
        let (Some(timestamp), Some(value), Some(tag)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(DecodeError::Malformed);
        };

        self.verify(name, timestamp, value, tag)?;

        let timestamp: i64 = std::str::from_utf8(timestamp)
            .ok()
            .and_then(|t| t.parse().ok())
            .ok_or(DecodeError::InvalidTimestamp)?;
        if !self.min_age.is_zero() && timestamp > now.saturating_sub(seconds(self.min_age)) {
            return Err(DecodeError::TooNew);
        }
        if !self.max_age.is_zero() && timestamp < now.saturating_sub(seconds(self.max_age)) {
            return Err(DecodeError::Expired);
        }

        let sealed = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|_| DecodeError::InvalidBase64)?;
        let plaintext = match &self.cipher {
            Some(cipher) => cipher.open(name.as_bytes(), &sealed)?,
            None => sealed,
        };
        serde_json::from_slice(&plaintext).map_err(DecodeError::Deserialize)
    }

    fn authenticator(&self, name: &str, timestamp: &[u8], value: &[u8]) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(name.as_bytes());
        mac.update(&[SEPARATOR]);
        mac.update(timestamp);
        mac.update(&[SEPARATOR]);
        mac.update(value);
        mac
    }

    fn sign(&self, name: &str, timestamp: &[u8], value: &[u8]) -> Vec<u8> {
        self.authenticator(name, timestamp, value)
            .finalize()
            .into_bytes()
            .to_vec()
    }

    fn verify(
        &self,
        name: &str,
        timestamp: &[u8],
        value: &[u8],
        tag: &[u8],
    ) -> Result<(), DecodeError> {
        self.authenticator(name, timestamp, value)
            .verify_slice(tag)
            .map_err(|_| DecodeError::InvalidMac)
    }
}

impl std::fmt::Debug for SecureCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureCookie")
            .field("encrypted", &self.cipher.is_some())
            .field("max_age", &self.max_age)
            .field("min_age", &self.min_age)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

fn seconds(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}

/// AES-GCM, keyed according to the length of the block key.
#[derive(Clone)]
enum BlockCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl BlockCipher {
    fn new(key: &[u8]) -> Result<Self, KeyError> {
        let invalid = |_| KeyError::InvalidBlockKeyLength(key.len());
        let cipher = match key.len() {
            16 => Self::Aes128(Aes128Gcm::new_from_slice(key).map_err(invalid)?),
            24 => Self::Aes192(Aes192Gcm::new_from_slice(key).map_err(invalid)?),
            32 => Self::Aes256(Aes256Gcm::new_from_slice(key).map_err(invalid)?),
            n => return Err(KeyError::InvalidBlockKeyLength(n)),
        };
        Ok(cipher)
    }

    /// Encrypt `msg` with a fresh random nonce, returning `nonce + ciphertext`.
    fn seal(&self, aad: &[u8], msg: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce);
        let ciphertext = match self {
            Self::Aes128(c) => seal_with(c, &nonce, aad, msg),
            Self::Aes192(c) => seal_with(c, &nonce, aad, msg),
            Self::Aes256(c) => seal_with(c, &nonce, aad, msg),
        }
        .map_err(|_| EncodeError::Encrypt)?;

        let mut sealed = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn open(&self, aad: &[u8], sealed: &[u8]) -> Result<Vec<u8>, DecodeError> {
        if sealed.len() < NONCE_LENGTH {
            return Err(DecodeError::Decrypt);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LENGTH);
        match self {
            Self::Aes128(c) => open_with(c, nonce, aad, ciphertext),
            Self::Aes192(c) => open_with(c, nonce, aad, ciphertext),
            Self::Aes256(c) => open_with(c, nonce, aad, ciphertext),
        }
        .map_err(|_| DecodeError::Decrypt)
    }
}

fn seal_with<C>(cipher: &C, nonce: &[u8], aad: &[u8], msg: &[u8]) -> Result<Vec<u8>, aes_gcm::Error>
where
    C: Aead + AeadCore<NonceSize = U12>,
{
    cipher.encrypt(
        aes_gcm::aead::generic_array::GenericArray::from_slice(nonce),
        Payload { msg, aad },
    )
}

fn open_with<C>(cipher: &C, nonce: &[u8], aad: &[u8], msg: &[u8]) -> Result<Vec<u8>, aes_gcm::Error>
where
    C: Aead + AeadCore<NonceSize = U12>,
{
    cipher.decrypt(
        aes_gcm::aead::generic_array::GenericArray::from_slice(nonce),
        Payload { msg, aad },
    )
}
