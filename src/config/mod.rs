//! Configuration: project settings and the encryption secret.

pub mod key;
pub mod settings;

pub use key::{EncryptionKey, ENCRYPTION_KEY_VAR};
pub use settings::Settings;
