//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - Credential records and their masked/revealed projections (`record`)
//! - List filters, pagination and stats (`query`)
//! - The `CredentialStore` trait and its SQLite backend (`store`)
//! - `CredentialVault`, the operations callers use (`service`)

pub mod query;
pub mod record;
pub mod service;
pub mod store;

// Re-export the most commonly used items.
pub use query::{ListFilter, Page, Pagination, Stats};
pub use record::{
    CredentialMetadata, CredentialPatch, CredentialRecord, CredentialView, MaskedCredential,
    MaskedSecret, NewCredential, Provider, RevealedCredential, MASKED_SENTINEL,
};
pub use service::CredentialVault;
pub use store::{CredentialStore, SqliteStore};
