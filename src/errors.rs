use thiserror::Error;

/// All errors that can occur in CredVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Vault errors ---
    #[error("Credential '{0}' not found")]
    NotFound(String),

    #[error("An active credential already exists for {provider}/{environment} (id {existing_id})")]
    Conflict {
        provider: String,
        environment: String,
        existing_id: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong encryption key or corrupted ciphertext")]
    DecryptionFailed,

    // --- Config errors ---
    #[error("Encryption key missing: {0}")]
    MissingEncryptionKey(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Audit error: {0}")]
    AuditError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl VaultError {
    /// Errors the caller caused and can fix, as opposed to internal failures.
    pub fn is_client_facing(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Conflict { .. } | Self::Validation(_)
        )
    }

    /// Process exit code used by the CLI for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Conflict { .. } => 3,
            Self::NotFound(_) => 4,
            Self::DecryptionFailed => 5,
            _ => 1,
        }
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(e: rusqlite::Error) -> Self {
        VaultError::Storage(e.to_string())
    }
}

/// Convenience type alias for CredVault results.
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_and_not_found_are_client_facing() {
        let conflict = VaultError::Conflict {
            provider: "OPENAI".into(),
            environment: "production".into(),
            existing_id: "abc".into(),
        };
        assert!(conflict.is_client_facing());
        assert!(VaultError::NotFound("abc".into()).is_client_facing());
        assert!(!VaultError::DecryptionFailed.is_client_facing());
        assert!(!VaultError::Storage("disk full".into()).is_client_facing());
    }

    #[test]
    fn exit_codes_distinguish_failure_kinds() {
        assert_eq!(VaultError::NotFound("x".into()).exit_code(), 4);
        assert_eq!(VaultError::DecryptionFailed.exit_code(), 5);
        assert_eq!(VaultError::CommandFailed("x".into()).exit_code(), 1);
    }
}
