use aes_gcm::aead::OsRng;
use aes_gcm::aead::rand_core::RngCore;
use secrecy::{ExposeSecret, SecretSlice};

use crate::KeyError;

/// The key material used by a [`SecureCookie`](crate::SecureCookie).
///
/// - The hash key authenticates tokens with HMAC-SHA256. It must be at least
///   [`CookieKeys::MIN_HASH_KEY_LENGTH`] bytes long.
/// - The block key, if present, encrypts payloads with AES-GCM.
///   Its length picks the AES variant: 16, 24 or 32 bytes.
///
/// Keys are never printed, not even in `Debug` output.
#[derive(Debug)]
pub struct CookieKeys {
    hash_key: SecretSlice<u8>,
    block_key: Option<SecretSlice<u8>>,
}

impl CookieKeys {
    /// The minimum length, in bytes, of a hash key.
    pub const MIN_HASH_KEY_LENGTH: usize = 64;

    /// Build a new set of keys, validating their lengths.
    pub fn new(hash_key: Vec<u8>, block_key: Option<Vec<u8>>) -> Result<Self, KeyError> {
        if hash_key.len() < Self::MIN_HASH_KEY_LENGTH {
            return Err(KeyError::HashKeyTooShort {
                actual: hash_key.len(),
                min: Self::MIN_HASH_KEY_LENGTH,
            });
        }
        if let Some(block_key) = &block_key {
            if !matches!(block_key.len(), 16 | 24 | 32) {
                return Err(KeyError::InvalidBlockKeyLength(block_key.len()));
            }
        }
        Ok(Self {
            hash_key: hash_key.into(),
            block_key: block_key.map(Into::into),
        })
    }

    /// Generate a random 64-byte hash key and a random 32-byte block key (AES-256).
    pub fn generate() -> Self {
        Self {
            hash_key: generate_random_key(Self::MIN_HASH_KEY_LENGTH).into(),
            block_key: Some(generate_random_key(32).into()),
        }
    }

    pub(crate) fn hash_key(&self) -> &[u8] {
        self.hash_key.expose_secret()
    }

    pub(crate) fn block_key(&self) -> Option<&[u8]> {
        self.block_key.as_ref().map(|k| k.expose_secret())
    }
}

/// Fill a buffer of `length` bytes using the operating system's CSPRNG.
pub fn generate_random_key(length: usize) -> Vec<u8> {
    let mut key = vec![0u8; length];
    OsRng.fill_bytes(&mut key);
    key
}
