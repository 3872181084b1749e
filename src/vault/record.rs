//! Credential records and the projections handed to callers.
//!
//! `CredentialRecord` is what the store persists: the secret is only ever
//! present as ciphertext.  Callers never see a `CredentialRecord`; they get
//! either a `MaskedCredential`, whose secret field is the `MaskedSecret`
//! sentinel type, or a `RevealedCredential`, which can only be built inside
//! the crate after a successful decryption.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::errors::{Result, VaultError};

/// Sentinel shown in place of every secret on masked read paths.
pub const MASKED_SENTINEL: &str = "********";

/// Environment assigned when a create request omits one.
pub const DEFAULT_ENVIRONMENT: &str = "production";

const MAX_NAME_LEN: usize = 100;
const MAX_ENVIRONMENT_LEN: usize = 64;
const MAX_DESCRIPTION_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// External service a credential authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "OPENAI")]
    OpenAi,
    #[serde(rename = "ANTHROPIC")]
    Anthropic,
    #[serde(rename = "GOOGLE_MAPS")]
    GoogleMaps,
    #[serde(rename = "STRIPE")]
    Stripe,
    #[serde(rename = "SENDGRID")]
    SendGrid,
    #[serde(rename = "TWILIO")]
    Twilio,
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "GITHUB")]
    GitHub,
    #[serde(rename = "SLACK")]
    Slack,
}

impl Provider {
    /// Every supported provider, in display order.
    pub const ALL: [Provider; 9] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::GoogleMaps,
        Provider::Stripe,
        Provider::SendGrid,
        Provider::Twilio,
        Provider::Aws,
        Provider::GitHub,
        Provider::Slack,
    ];

    /// The stored and displayed tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI",
            Provider::Anthropic => "ANTHROPIC",
            Provider::GoogleMaps => "GOOGLE_MAPS",
            Provider::Stripe => "STRIPE",
            Provider::SendGrid => "SENDGRID",
            Provider::Twilio => "TWILIO",
            Provider::Aws => "AWS",
            Provider::GitHub => "GITHUB",
            Provider::Slack => "SLACK",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = VaultError;

    /// Accepts the tag in any case, with `-` in place of `_`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = Provider::ALL.iter().map(|p| p.as_str()).collect();
                VaultError::Validation(format!(
                    "unknown provider '{s}' — expected one of {}",
                    known.join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Stored record
// ---------------------------------------------------------------------------

/// A credential as persisted by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    pub id: String,
    pub name: String,
    pub provider: Provider,
    pub environment: String,
    /// `v1:` ciphertext produced by `SecretCipher::seal`.
    pub encrypted_secret: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub usage_count: u64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Everything about the record except the secret.
    pub fn metadata(&self) -> CredentialMetadata {
        CredentialMetadata {
            id: self.id.clone(),
            name: self.name.clone(),
            provider: self.provider,
            environment: self.environment.clone(),
            description: self.description.clone(),
            is_active: self.is_active,
            usage_count: self.usage_count,
            last_used_at: self.last_used_at,
            created_by: self.created_by.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// The masked projection.
    pub fn masked(&self) -> MaskedCredential {
        MaskedCredential {
            metadata: self.metadata(),
            secret: MaskedSecret,
        }
    }

    pub(crate) fn revealed(&self, plaintext: String) -> RevealedCredential {
        RevealedCredential {
            metadata: self.metadata(),
            secret: plaintext,
        }
    }
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Non-secret fields shared by both projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialMetadata {
    pub id: String,
    pub name: String,
    pub provider: Provider,
    pub environment: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub usage_count: u64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stand-in for a secret.  Carries no data, so it cannot leak any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskedSecret;

impl MaskedSecret {
    pub fn as_str(&self) -> &'static str {
        MASKED_SENTINEL
    }
}

impl fmt::Display for MaskedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASKED_SENTINEL)
    }
}

impl Serialize for MaskedSecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(MASKED_SENTINEL)
    }
}

/// A credential with its secret replaced by the sentinel.
///
/// Serialized with `"secretState": "masked"` so a reader of the JSON never
/// has to compare `secret` against the sentinel to know which it holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "secretState", rename = "masked")]
pub struct MaskedCredential {
    #[serde(flatten)]
    pub metadata: CredentialMetadata,
    pub secret: MaskedSecret,
}

/// A credential carrying its decrypted secret.  Serialized with
/// `"secretState": "revealed"`.
#[derive(Clone, Serialize)]
#[serde(tag = "secretState", rename = "revealed")]
pub struct RevealedCredential {
    #[serde(flatten)]
    pub metadata: CredentialMetadata,
    secret: String,
}

impl RevealedCredential {
    /// The plaintext secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for RevealedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealedCredential")
            .field("metadata", &self.metadata)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Drop for RevealedCredential {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.secret);
    }
}

/// Result of a single-record read: masked unless reveal was requested.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CredentialView {
    Masked(MaskedCredential),
    Revealed(RevealedCredential),
}

impl CredentialView {
    pub fn metadata(&self) -> &CredentialMetadata {
        match self {
            CredentialView::Masked(m) => &m.metadata,
            CredentialView::Revealed(r) => &r.metadata,
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A create request.
#[derive(Clone)]
pub struct NewCredential {
    pub name: String,
    pub provider: Provider,
    pub secret: String,
    pub environment: Option<String>,
    pub description: Option<String>,
    /// Defaults to `true` when omitted.
    pub is_active: Option<bool>,
    pub created_by: Option<String>,
}

impl NewCredential {
    /// Minimal request: name, provider and secret; everything else defaulted.
    pub fn new(name: impl Into<String>, provider: Provider, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider,
            secret: secret.into(),
            environment: None,
            description: None,
            is_active: None,
            created_by: None,
        }
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn created_by(mut self, actor: impl Into<String>) -> Self {
        self.created_by = Some(actor.into());
        self
    }
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// A partial update.  `None` leaves the field unchanged; an empty
/// description clears it.
#[derive(Clone, Default)]
pub struct CredentialPatch {
    pub name: Option<String>,
    pub provider: Option<Provider>,
    pub environment: Option<String>,
    pub description: Option<String>,
    pub secret: Option<String>,
    pub is_active: Option<bool>,
}

impl CredentialPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.provider.is_none()
            && self.environment.is_none()
            && self.description.is_none()
            && self.secret.is_none()
            && self.is_active.is_none()
    }
}

impl fmt::Debug for CredentialPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPatch")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("environment", &self.environment)
            .field("rotates_secret", &self.secret.is_some())
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// Current time at the precision the store keeps (microseconds).
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

pub(crate) fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(VaultError::Validation("name cannot be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(VaultError::Validation(format!(
            "name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

pub(crate) fn validate_environment(environment: &str) -> Result<String> {
    let environment = environment.trim();
    if environment.is_empty() {
        return Err(VaultError::Validation("environment cannot be empty".into()));
    }
    if environment.chars().count() > MAX_ENVIRONMENT_LEN {
        return Err(VaultError::Validation(format!(
            "environment cannot exceed {MAX_ENVIRONMENT_LEN} characters"
        )));
    }
    Ok(environment.to_string())
}

/// Empty descriptions normalize to `None`.
pub(crate) fn validate_description(description: &str) -> Result<Option<String>> {
    let description = description.trim();
    if description.is_empty() {
        return Ok(None);
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(VaultError::Validation(format!(
            "description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(Some(description.to_string()))
}

pub(crate) fn validate_secret(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(VaultError::Validation("secret cannot be empty".into()));
    }
    Ok(())
}
