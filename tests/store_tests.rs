//! Concurrency tests for the SQLite credential store.
//!
//! Each thread opens its own connection to the same database file, the
//! way separate CLI processes would.

use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

use credvault::config::EncryptionKey;
use credvault::crypto::SecretCipher;
use credvault::errors::VaultError;
use credvault::vault::{CredentialVault, ListFilter, NewCredential, Provider, SqliteStore};
use tempfile::TempDir;

const TEST_SECRET: &str = "store-tests-secret-0123456789abcdef";

fn open_vault(path: &Path) -> CredentialVault<SqliteStore> {
    let cipher = SecretCipher::new(&EncryptionKey::new(TEST_SECRET).unwrap()).unwrap();
    CredentialVault::with_default_settings(SqliteStore::open(path).unwrap(), cipher)
}

#[test]
fn concurrent_creates_for_one_pair_admit_exactly_one() {
    const WRITERS: usize = 8;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.db");
    // Create the schema up front.
    drop(open_vault(&path));

    let barrier = Arc::new(Barrier::new(WRITERS));
    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let vault = open_vault(&path);
                barrier.wait();
                vault.create(NewCredential::new(
                    format!("writer {i}"),
                    Provider::OpenAi,
                    format!("sk-{i}"),
                ))
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(VaultError::Conflict { .. })))
        .count();
    assert_eq!(successes, 1, "results: {results:?}");
    assert_eq!(conflicts, WRITERS - 1, "results: {results:?}");

    let vault = open_vault(&path);
    let active = vault
        .list(
            &ListFilter::default().provider(Provider::OpenAi).active(true),
            None,
            None,
        )
        .unwrap();
    assert_eq!(active.total, 1);
}

#[test]
fn concurrent_consumes_are_all_counted() {
    const READERS: usize = 6;
    const USES_EACH: u64 = 5;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credentials.db");
    let id = open_vault(&path)
        .create(NewCredential::new("Shared", Provider::Stripe, "sk_live_shared"))
        .unwrap()
        .metadata
        .id;

    let barrier = Arc::new(Barrier::new(READERS));
    let handles: Vec<_> = (0..READERS)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let vault = open_vault(&path);
                barrier.wait();
                for _ in 0..USES_EACH {
                    let secret = vault.consume(Provider::Stripe, "production").unwrap();
                    assert_eq!(secret.as_deref().map(String::as_str), Some("sk_live_shared"));
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let m = open_vault(&path).get(&id).unwrap().metadata;
    assert_eq!(m.usage_count, READERS as u64 * USES_EACH);
    assert!(m.last_used_at.is_some());
}

#[test]
fn shared_store_across_threads() {
    let vault = Arc::new(CredentialVault::with_default_settings(
        SqliteStore::open_in_memory().unwrap(),
        SecretCipher::new(&EncryptionKey::new(TEST_SECRET).unwrap()).unwrap(),
    ));

    let handles: Vec<_> = Provider::ALL
        .into_iter()
        .map(|provider| {
            let vault = Arc::clone(&vault);
            thread::spawn(move || {
                vault
                    .create(NewCredential::new(provider.as_str(), provider, "secret"))
                    .unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let stats = vault.stats().unwrap();
    assert_eq!(stats.total, Provider::ALL.len() as u64);
    assert_eq!(stats.active, Provider::ALL.len() as u64);
}
