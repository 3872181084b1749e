//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - The `SecretCipher` engine that seals credential strings (`encryption`)
//! - HKDF-based derivation of the AES key from the configured secret (`keys`)

pub mod encryption;
pub mod keys;

pub use encryption::{decrypt, encrypt, SecretCipher};
pub use keys::{derive_encryption_key, MasterKey};
