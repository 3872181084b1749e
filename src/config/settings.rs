use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::vault::record::DEFAULT_ENVIRONMENT;

/// Project-level configuration, loaded from `.credvault.toml`.
///
/// Every field has a sensible default so CredVault works out-of-the-box
/// without any config file at all.  The encryption secret is deliberately
/// not part of this file; see `EncryptionKey`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Credential database, relative to the project root.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Audit database, relative to the project root.
    #[serde(default = "default_audit_path")]
    pub audit_path: String,

    /// Environment assigned to credentials created without one.
    #[serde(default = "default_environment")]
    pub default_environment: String,

    /// Page size used by `list` when none is given.
    #[serde(default = "default_page_limit")]
    pub default_page_limit: u32,

    /// Largest page size `list` accepts.
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: u32,

    /// Trailing window, in days, counted as "recently used" by `stats`.
    #[serde(default = "default_recent_usage_days")]
    pub recent_usage_days: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_database_path() -> String {
    ".credvault/credentials.db".to_string()
}

fn default_audit_path() -> String {
    ".credvault/audit.db".to_string()
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_page_limit() -> u32 {
    20
}

fn default_max_page_limit() -> u32 {
    100
}

/// Upper bound for `recent_usage_days` (100 years).
const MAX_RECENT_USAGE_DAYS: u32 = 36_500;

fn default_recent_usage_days() -> u32 {
    30
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            audit_path: default_audit_path(),
            default_environment: default_environment(),
            default_page_limit: default_page_limit(),
            max_page_limit: default_max_page_limit(),
            recent_usage_days: default_recent_usage_days(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".credvault.toml";

    /// Load settings from `<project_dir>/.credvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed or holds nonsensical
    /// values, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would make the vault misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.default_environment.trim().is_empty() {
            return Err(VaultError::ConfigError(
                "default_environment cannot be empty".into(),
            ));
        }
        if self.default_page_limit == 0 || self.max_page_limit == 0 {
            return Err(VaultError::ConfigError(
                "page limits must be at least 1".into(),
            ));
        }
        if self.default_page_limit > self.max_page_limit {
            return Err(VaultError::ConfigError(format!(
                "default_page_limit ({}) exceeds max_page_limit ({})",
                self.default_page_limit, self.max_page_limit
            )));
        }
        if self.recent_usage_days == 0 || self.recent_usage_days > MAX_RECENT_USAGE_DAYS {
            return Err(VaultError::ConfigError(format!(
                "recent_usage_days must be between 1 and {MAX_RECENT_USAGE_DAYS}"
            )));
        }
        Ok(())
    }

    /// Full path to the credential database.
    pub fn database_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.database_path)
    }

    /// Full path to the audit database.
    pub fn audit_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.audit_path)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
