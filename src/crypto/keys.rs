//! Key derivation helpers using HKDF-SHA256.
//!
//! The configured encryption secret is arbitrary text of at least 32
//! bytes.  HKDF (RFC 5869) turns it into a uniform 256-bit AES key,
//! bound to a context string so the same secret used elsewhere yields
//! an unrelated key.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Length of the derived AES key (256 bits).
pub const KEY_LEN: usize = 32;

/// Fixed extraction salt for the configured secret.
const HKDF_SALT: &[u8] = b"credvault-hkdf-salt-v1";

/// Context string binding the derived key to credential encryption.
const ENCRYPTION_INFO: &[u8] = b"credvault-credential-encryption";

/// Derive the credential encryption key from the configured secret.
pub fn derive_encryption_key(secret: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), secret);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(ENCRYPTION_INFO, &mut okm)
        .map_err(|e| VaultError::EncryptionFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A wrapper around a 32-byte key that automatically zeroes its memory
/// when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Derive a `MasterKey` from the configured secret.
    pub fn derive_from_secret(secret: &[u8]) -> Result<Self> {
        let mut bytes = derive_encryption_key(secret)?;
        let key = Self::new(bytes);
        bytes.zeroize();
        Ok(key)
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}
