//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! `SecretCipher` wraps these primitives for credential strings.  What it
//! stores is text: `v1:<base64 of the byte buffer above>`.  The `v1` tag
//! names the key generation the value was sealed under.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use zeroize::Zeroize;

use super::keys::MasterKey;
use crate::config::EncryptionKey;
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Key-version prefix written in front of every stored ciphertext.
const KEY_VERSION_PREFIX: &str = "v1:";

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Expects the first 12 bytes to be the nonce, followed by the ciphertext
/// and tag.  A wrong key or any tampering fails the tag check.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    if ciphertext_with_nonce.len() < NONCE_LEN + TAG_LEN {
        return Err(VaultError::DecryptionFailed);
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::DecryptionFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)
}

/// The vault's encryption engine: seals credential strings for storage
/// and opens them again under the process-wide key.
///
/// Built once at startup from a validated `EncryptionKey` and shared
/// read-only for the life of the process.
pub struct SecretCipher {
    key: MasterKey,
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl SecretCipher {
    /// Derive the AES key from the configured secret.
    pub fn new(key: &EncryptionKey) -> Result<Self> {
        Ok(Self {
            key: MasterKey::derive_from_secret(key.expose().as_bytes())?,
        })
    }

    /// Encrypt a plaintext secret into its at-rest text form.
    pub fn seal(&self, plaintext: &str) -> Result<String> {
        let bytes = encrypt(self.key.as_bytes(), plaintext.as_bytes())?;
        Ok(format!("{KEY_VERSION_PREFIX}{}", BASE64.encode(bytes)))
    }

    /// Decrypt an at-rest value back into the plaintext secret.
    ///
    /// Anything that is not a well-formed `v1` value sealed under this
    /// key is a `DecryptionFailed`, never an empty or partial string.
    pub fn open(&self, stored: &str) -> Result<String> {
        let encoded = stored
            .strip_prefix(KEY_VERSION_PREFIX)
            .ok_or(VaultError::DecryptionFailed)?;
        let bytes = BASE64
            .decode(encoded)
            .map_err(|_| VaultError::DecryptionFailed)?;
        let plaintext = decrypt(self.key.as_bytes(), &bytes)?;

        // On error, zeroize the bytes inside the error before discarding.
        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            VaultError::DecryptionFailed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher(secret: &str) -> SecretCipher {
        SecretCipher::new(&EncryptionKey::new(secret).unwrap()).unwrap()
    }

    #[test]
    fn seal_open_roundtrip() {
        let c = cipher("0123456789abcdef0123456789abcdef");
        let sealed = c.seal("sk-123").unwrap();
        assert!(sealed.starts_with("v1:"));
        assert!(!sealed.contains("sk-123"));
        assert_eq!(c.open(&sealed).unwrap(), "sk-123");
    }

    #[test]
    fn empty_and_unicode_plaintexts_roundtrip() {
        let c = cipher("0123456789abcdef0123456789abcdef");
        for p in ["", "ключ-🔑", "a\nb\tc"] {
            assert_eq!(c.open(&c.seal(p).unwrap()).unwrap(), p);
        }
    }

    #[test]
    fn open_rejects_missing_version_prefix() {
        let c = cipher("0123456789abcdef0123456789abcdef");
        let sealed = c.seal("sk-123").unwrap();
        let stripped = sealed.trim_start_matches("v1:");
        assert!(matches!(c.open(stripped), Err(VaultError::DecryptionFailed)));
        assert!(matches!(
            c.open(&format!("v2:{stripped}")),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn open_rejects_invalid_base64() {
        let c = cipher("0123456789abcdef0123456789abcdef");
        assert!(matches!(
            c.open("v1:not base64!!"),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn open_rejects_any_flipped_bit() {
        let c = cipher("0123456789abcdef0123456789abcdef");
        let sealed = c.seal("sk_live_abc").unwrap();
        let bytes = BASE64.decode(sealed.trim_start_matches("v1:")).unwrap();

        // Nonce, ciphertext body and tag.
        for idx in [0, NONCE_LEN + 2, bytes.len() - 1] {
            let mut tampered = bytes.clone();
            tampered[idx] ^= 0x01;
            let reencoded = format!("{KEY_VERSION_PREFIX}{}", BASE64.encode(&tampered));
            assert!(
                matches!(c.open(&reencoded), Err(VaultError::DecryptionFailed)),
                "flip at byte {idx} should fail"
            );
        }
    }

    #[test]
    fn debug_output_redacts_key() {
        let c = cipher("0123456789abcdef0123456789abcdef");
        let dbg = format!("{c:?}");
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("0123456789abcdef"));
    }
}
