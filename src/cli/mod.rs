//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{EncryptionKey, Settings};
use crate::crypto::SecretCipher;
use crate::errors::{Result, VaultError};
use crate::vault::{CredentialVault, Provider, SqliteStore};

/// CredVault CLI: encrypted store for third-party service credentials.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Encrypted vault for third-party API credentials",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Credential database (default: from .credvault.toml)
    #[arg(long, global = true, env = "CREDVAULT_DB")]
    pub db: Option<String>,

    /// Identity recorded as creator and in the audit log
    #[arg(long, global = true, env = "CREDVAULT_ACTOR")]
    pub actor: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a new credential
    Create {
        /// Human label for the credential
        #[arg(long)]
        name: String,
        /// Provider tag (see `credvault providers`)
        #[arg(long, value_parser = parse_provider)]
        provider: Provider,
        /// Environment scope (default: production)
        #[arg(short, long)]
        environment: Option<String>,
        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
        /// Create the credential inactive
        #[arg(long)]
        inactive: bool,
        /// Secret value (omit for stdin or interactive prompt)
        #[arg(long)]
        secret: Option<String>,
    },

    /// List credentials (secrets masked)
    List {
        #[arg(long, value_parser = parse_provider)]
        provider: Option<Provider>,
        #[arg(short, long)]
        environment: Option<String>,
        /// Filter by active flag (true/false)
        #[arg(long)]
        active: Option<bool>,
        /// Case-insensitive search over name and description
        #[arg(short, long)]
        search: Option<String>,
        /// Page number, starting at 1
        #[arg(long)]
        page: Option<u32>,
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show credential counts
    Stats,

    /// Show one credential
    Get {
        /// Credential id
        id: String,
        /// Include the decrypted secret
        #[arg(long)]
        reveal: bool,
    },

    /// Edit a credential or rotate its secret
    Update {
        /// Credential id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_provider)]
        provider: Option<Provider>,
        #[arg(short, long)]
        environment: Option<String>,
        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,
        /// New secret value
        #[arg(long)]
        secret: Option<String>,
        /// Set the active flag (true/false)
        #[arg(long)]
        active: Option<bool>,
    },

    /// Flip a credential between active and inactive
    Toggle {
        /// Credential id
        id: String,
    },

    /// Permanently delete a credential
    Delete {
        /// Credential id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Print the active secret for a provider, counting the use
    Consume {
        #[arg(value_parser = parse_provider)]
        provider: Provider,
        /// Environment scope (default: production)
        #[arg(short, long)]
        environment: Option<String>,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// List supported provider tags
    Providers,
}

fn parse_provider(s: &str) -> std::result::Result<Provider, String> {
    s.parse().map_err(|e: VaultError| e.to_string())
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load project settings from the current directory.
pub fn settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Credential database path: `--db` if given, otherwise from settings.
pub fn database_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.db {
        Some(db) => Ok(cwd.join(db)),
        None => Ok(Settings::load(&cwd)?.database_path(&cwd)),
    }
}

/// Audit database path, from settings.
pub fn audit_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(Settings::load(&cwd)?.audit_path(&cwd))
}

/// Open the vault: validate the encryption key first, then the database.
///
/// A missing or weak key fails here, before any credential is touched.
pub fn open_vault(cli: &Cli) -> Result<CredentialVault<SqliteStore>> {
    let key = EncryptionKey::from_env()?;
    let cipher = SecretCipher::new(&key)?;
    let settings = settings()?;
    let store = SqliteStore::open(&database_path(cli)?)?;
    Ok(CredentialVault::new(store, cipher, settings))
}

/// Resolve a secret value from one of three sources: the `--secret`
/// flag, piped stdin, or an interactive hidden prompt.
pub fn read_secret(inline: Option<&str>, prompt: &str) -> Result<Zeroizing<String>> {
    if let Some(v) = inline {
        output::warning("Secret provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end().len();
        buf.truncate(trimmed);
        return Ok(buf);
    }

    dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
}

/// Print a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| VaultError::SerializationError(e.to_string()))?;
    println!("{text}");
    Ok(())
}
