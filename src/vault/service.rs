//! High-level vault operations.
//!
//! `CredentialVault` combines a `CredentialStore` with the `SecretCipher`
//! so callers can work with simple method calls like
//! `vault.consume(Provider::Stripe, "production")`.
//!
//! Every read returns a `MaskedCredential` except `reveal` (and
//! `get_one` with `reveal = true`) and `consume`.  Only `consume`
//! touches usage accounting.

use chrono::Duration;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::query::{ListFilter, Page, Pagination, Stats};
use super::record::{
    self, CredentialPatch, CredentialRecord, CredentialView, MaskedCredential, NewCredential,
    Provider, RevealedCredential,
};
use super::store::CredentialStore;
use crate::config::Settings;
use crate::crypto::SecretCipher;
use crate::errors::{Result, VaultError};

/// The credential vault.
pub struct CredentialVault<S> {
    store: S,
    cipher: SecretCipher,
    settings: Settings,
}

impl<S: CredentialStore> CredentialVault<S> {
    /// Build a vault over `store`, sealing secrets with `cipher`.
    pub fn new(store: S, cipher: SecretCipher, settings: Settings) -> Self {
        Self {
            store,
            cipher,
            settings,
        }
    }

    /// Build a vault with default settings.
    pub fn with_default_settings(store: S, cipher: SecretCipher) -> Self {
        Self::new(store, cipher, Settings::default())
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Create a credential.  Fails with `Conflict` if it would be active
    /// while another active credential holds the same provider/environment.
    pub fn create(&self, request: NewCredential) -> Result<MaskedCredential> {
        let name = record::validate_name(&request.name)?;
        let environment = match request.environment.as_deref() {
            Some(env) => record::validate_environment(env)?,
            None => self.settings.default_environment.clone(),
        };
        let description = match request.description.as_deref() {
            Some(d) => record::validate_description(d)?,
            None => None,
        };
        record::validate_secret(&request.secret)?;

        let now = record::now();
        let credential = CredentialRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            provider: request.provider,
            environment,
            encrypted_secret: self.cipher.seal(&request.secret)?,
            description,
            is_active: request.is_active.unwrap_or(true),
            usage_count: 0,
            last_used_at: None,
            created_by: request.created_by,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&credential).map_err(|e| {
            log_conflict(&e);
            e
        })?;

        info!(
            id = %credential.id,
            provider = %credential.provider,
            environment = %credential.environment,
            active = credential.is_active,
            "credential created"
        );
        Ok(credential.masked())
    }

    /// Apply a partial update.  A new secret is encrypted before it is
    /// written; if the result is active, the pair check applies.
    pub fn update(&self, id: &str, patch: CredentialPatch) -> Result<MaskedCredential> {
        let name = patch.name.as_deref().map(record::validate_name).transpose()?;
        let environment = patch
            .environment
            .as_deref()
            .map(record::validate_environment)
            .transpose()?;
        let description = patch
            .description
            .as_deref()
            .map(record::validate_description)
            .transpose()?;
        let encrypted_secret = match patch.secret.as_deref() {
            Some(secret) => {
                record::validate_secret(secret)?;
                Some(self.cipher.seal(secret)?)
            }
            None => None,
        };

        let now = record::now();
        let updated = self
            .store
            .modify(id, &mut |current| {
                if let Some(ref name) = name {
                    current.name = name.clone();
                }
                if let Some(provider) = patch.provider {
                    current.provider = provider;
                }
                if let Some(ref environment) = environment {
                    current.environment = environment.clone();
                }
                if let Some(ref description) = description {
                    current.description = description.clone();
                }
                if let Some(ref sealed) = encrypted_secret {
                    current.encrypted_secret = sealed.clone();
                }
                if let Some(is_active) = patch.is_active {
                    current.is_active = is_active;
                }
                current.updated_at = now;
                Ok(())
            })
            .map_err(|e| {
                log_conflict(&e);
                e
            })?;

        info!(
            id = %updated.id,
            rotated = encrypted_secret.is_some(),
            active = updated.is_active,
            "credential updated"
        );
        Ok(updated.masked())
    }

    /// Flip `is_active`.  Turning a credential on is guarded like create.
    pub fn toggle_active(&self, id: &str) -> Result<MaskedCredential> {
        let now = record::now();
        let toggled = self
            .store
            .modify(id, &mut |current| {
                current.is_active = !current.is_active;
                current.updated_at = now;
                Ok(())
            })
            .map_err(|e| {
                log_conflict(&e);
                e
            })?;

        info!(id = %toggled.id, active = toggled.is_active, "credential toggled");
        Ok(toggled.masked())
    }

    /// Permanently remove a credential.
    pub fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete(id)? {
            return Err(VaultError::NotFound(id.to_string()));
        }
        info!(id = %id, "credential deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// One page of masked credentials.
    pub fn list(
        &self,
        filter: &ListFilter,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<MaskedCredential>> {
        let pagination = Pagination::resolve(
            page,
            limit,
            self.settings.default_page_limit,
            self.settings.max_page_limit,
        )?;
        let filter = match filter.environment.as_deref() {
            Some(env) => ListFilter {
                environment: Some(record::validate_environment(env)?),
                ..filter.clone()
            },
            None => filter.clone(),
        };
        let (records, total) = self.store.list(&filter, &pagination)?;
        debug!(total, page = pagination.page, "credentials listed");

        let items = records.iter().map(CredentialRecord::masked).collect();
        Ok(Page::new(items, pagination, total))
    }

    /// Totals, active count, recent use and a per-provider breakdown.
    pub fn stats(&self) -> Result<Stats> {
        let days = self.settings.recent_usage_days;
        let since = Duration::try_days(i64::from(days))
            .and_then(|window| record::now().checked_sub_signed(window))
            .ok_or_else(|| {
                VaultError::ConfigError(format!("recent_usage_days ({days}) is out of range"))
            })?;
        self.store.stats(since)
    }

    /// The masked projection of one credential.
    pub fn get(&self, id: &str) -> Result<MaskedCredential> {
        Ok(self.fetch(id)?.masked())
    }

    /// One credential with its decrypted secret, for administrative
    /// inspection.  Does not count as a use.
    pub fn reveal(&self, id: &str) -> Result<RevealedCredential> {
        let credential = self.fetch(id)?;
        let plaintext = self.open_secret(&credential)?;
        debug!(id = %id, "credential revealed");
        Ok(credential.revealed(plaintext))
    }

    /// Masked unless `reveal` is set.
    pub fn get_one(&self, id: &str, reveal: bool) -> Result<CredentialView> {
        if reveal {
            self.reveal(id).map(CredentialView::Revealed)
        } else {
            self.get(id).map(CredentialView::Masked)
        }
    }

    // ------------------------------------------------------------------
    // Consumption
    // ------------------------------------------------------------------

    /// The active secret for `provider`/`environment`, counting the use.
    ///
    /// `environment` is trimmed the same way `create` trims it.  Returns
    /// `None` when no active credential exists.  A stored secret
    /// that cannot be decrypted is an error and is not counted.
    pub fn consume(&self, provider: Provider, environment: &str) -> Result<Option<Zeroizing<String>>> {
        let environment = record::validate_environment(environment)?;
        let environment = environment.as_str();
        let mut plaintext: Option<Zeroizing<String>> = None;

        let used = self
            .store
            .record_use(provider, environment, record::now(), &mut |credential| {
                plaintext = Some(Zeroizing::new(self.open_secret(credential)?));
                Ok(())
            })?;

        match used {
            Some(credential) => {
                debug!(
                    id = %credential.id,
                    provider = %provider,
                    environment = %environment,
                    usage_count = credential.usage_count,
                    "credential consumed"
                );
                Ok(plaintext)
            }
            None => {
                debug!(provider = %provider, environment = %environment, "no active credential");
                Ok(None)
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn fetch(&self, id: &str) -> Result<CredentialRecord> {
        self.store
            .get(id)?
            .ok_or_else(|| VaultError::NotFound(id.to_string()))
    }

    fn open_secret(&self, credential: &CredentialRecord) -> Result<String> {
        self.cipher.open(&credential.encrypted_secret).map_err(|e| {
            warn!(id = %credential.id, "stored secret could not be decrypted");
            e
        })
    }
}

fn log_conflict(e: &VaultError) {
    if let VaultError::Conflict {
        provider,
        environment,
        existing_id,
    } = e
    {
        warn!(
            provider = %provider,
            environment = %environment,
            existing_id = %existing_id,
            "active credential already exists for pair"
        );
    }
}
