//! The process-wide encryption secret.
//!
//! Read once at startup from `CREDVAULT_ENCRYPTION_KEY` and validated
//! eagerly.  A missing or short secret is fatal; there is no fallback.

use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Environment variable holding the encryption secret.
pub const ENCRYPTION_KEY_VAR: &str = "CREDVAULT_ENCRYPTION_KEY";

/// Minimum accepted secret length in bytes.
pub const MIN_KEY_LEN: usize = 32;

/// A validated encryption secret, wiped from memory on drop.
pub struct EncryptionKey {
    secret: Zeroizing<String>,
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl EncryptionKey {
    /// Validate a secret supplied directly.
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = Zeroizing::new(secret.into());

        if secret.is_empty() {
            return Err(VaultError::MissingEncryptionKey(format!(
                "{ENCRYPTION_KEY_VAR} is empty"
            )));
        }
        if secret.len() < MIN_KEY_LEN {
            return Err(VaultError::ConfigError(format!(
                "{ENCRYPTION_KEY_VAR} must be at least {MIN_KEY_LEN} bytes (got {})",
                secret.len()
            )));
        }

        Ok(Self { secret })
    }

    /// Read and validate the secret from `CREDVAULT_ENCRYPTION_KEY`.
    pub fn from_env() -> Result<Self> {
        match std::env::var(ENCRYPTION_KEY_VAR) {
            Ok(value) => Self::new(value),
            Err(std::env::VarError::NotPresent) => Err(VaultError::MissingEncryptionKey(
                format!("set {ENCRYPTION_KEY_VAR} to a secret of at least {MIN_KEY_LEN} bytes"),
            )),
            Err(std::env::VarError::NotUnicode(_)) => Err(VaultError::ConfigError(format!(
                "{ENCRYPTION_KEY_VAR} is not valid UTF-8"
            ))),
        }
    }

    /// The raw secret, for key derivation only.
    pub fn expose(&self) -> &str {
        &self.secret
    }
}
