//! AES-256-CBC sealing of opaque byte payloads with a server-held key.
//!
//! Every [`Cipher::encrypt`] call draws a fresh random 16-byte iv; the iv is
//! returned alongside the ciphertext and must be handed back to
//! [`Cipher::decrypt`]. The key is loaded once at startup via
//! [`EncryptionKey::from_env`] and never mutated afterwards.

use std::fmt;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::Rng;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Environment variable holding the encryption key.
pub const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// CBC iv length (one AES block) in bytes.
pub const IV_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Startup failure while loading the encryption key. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("{ENCRYPTION_KEY_ENV} is not set")]
    Missing,

    #[error("{ENCRYPTION_KEY_ENV} is too short: need {KEY_LEN} bytes (or {} hex chars), got {actual}", KEY_LEN * 2)]
    TooShort { actual: usize },

    #[error("{ENCRYPTION_KEY_ENV} has invalid length: need exactly {KEY_LEN} bytes (or {} hex chars), got {actual}", KEY_LEN * 2)]
    InvalidLength { actual: usize },
}

/// Per-call decryption failure: the stored bytes are corrupted or tampered.
///
/// Distinct from "not found"; retrying with the same bytes will fail again.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid iv length: expected {IV_LEN} bytes, got {actual}")]
    InvalidIvLength { actual: usize },

    #[error("invalid hex encoding in {field}")]
    InvalidEncoding { field: &'static str },

    #[error("invalid ciphertext padding")]
    InvalidPadding,

    #[error("decrypted payload is malformed: {0}")]
    MalformedPayload(String),
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A 256-bit symmetric key. `Debug` never prints the key bytes.
#[derive(Clone)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// Load the key from [`ENCRYPTION_KEY_ENV`].
    pub fn from_env() -> Result<Self, KeyError> {
        let raw = std::env::var(ENCRYPTION_KEY_ENV).map_err(|_| KeyError::Missing)?;
        Self::parse(&raw)
    }

    /// Parse a key from either 64 hex characters or exactly 32 raw bytes.
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        if raw.is_empty() {
            return Err(KeyError::Missing);
        }

        if raw.len() == KEY_LEN * 2 {
            if let Ok(bytes) = hex::decode(raw) {
                let mut key = [0u8; KEY_LEN];
                key.copy_from_slice(&bytes);
                return Ok(Self(key));
            }
        }

        let bytes = raw.as_bytes();
        if bytes.len() < KEY_LEN {
            return Err(KeyError::TooShort {
                actual: bytes.len(),
            });
        }
        if bytes.len() != KEY_LEN {
            return Err(KeyError::InvalidLength {
                actual: bytes.len(),
            });
        }

        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate a random key (tests and local tooling).
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        rand::rng().fill(&mut key);
        Self(key)
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Sealed payload
// ---------------------------------------------------------------------------

/// Ciphertext paired with the iv it was produced under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub iv: [u8; IV_LEN],
}

impl Sealed {
    pub fn ciphertext_hex(&self) -> String {
        hex::encode(&self.ciphertext)
    }

    pub fn iv_hex(&self) -> String {
        hex::encode(self.iv)
    }
}

// ---------------------------------------------------------------------------
// Cipher
// ---------------------------------------------------------------------------

/// Symmetric cipher bound to the process-wide key.
#[derive(Debug, Clone)]
pub struct Cipher {
    key: EncryptionKey,
}

impl Cipher {
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` under a fresh random iv.
    pub fn encrypt(&self, plaintext: &[u8]) -> Sealed {
        let mut iv = [0u8; IV_LEN];
        rand::rng().fill(&mut iv);

        let ciphertext = Aes256CbcEnc::new(
            GenericArray::from_slice(&self.key.0),
            GenericArray::from_slice(&iv),
        )
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        Sealed { ciphertext, iv }
    }

    /// Decrypt `ciphertext` produced under `iv`.
    pub fn decrypt(&self, ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if iv.len() != IV_LEN {
            return Err(CryptoError::InvalidIvLength { actual: iv.len() });
        }

        Aes256CbcDec::new(
            GenericArray::from_slice(&self.key.0),
            GenericArray::from_slice(iv),
        )
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::InvalidPadding)
    }

    /// Decrypt the hex-encoded `encryptedData` / `iv` pair as stored on a record.
    pub fn decrypt_hex(&self, encrypted_data: &str, iv: &str) -> Result<Vec<u8>, CryptoError> {
        let iv = hex::decode(iv).map_err(|_| CryptoError::InvalidEncoding { field: "iv" })?;
        let ciphertext = hex::decode(encrypted_data).map_err(|_| CryptoError::InvalidEncoding {
            field: "encryptedData",
        })?;
        self.decrypt(&ciphertext, &iv)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
