//! Credential store provider implementations

pub mod memory;
pub mod pem_directory;

pub use memory::{InMemoryCredentialStore, StoredCertificate};
pub use pem_directory::PemDirectoryStore;

use crate::{config::StoreConfig, CredentialStore, Result};
use tracing::info;

/// Build the provider selected by `config`.
///
/// # Errors
///
/// Returns a [`crate::StoreError`] when the provider cannot be initialised.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn CredentialStore>> {
    match config {
        StoreConfig::PemDirectory(pem_config) => {
            info!("Opening PEM directory store: {}", pem_config.path.display());
            Ok(Box::new(PemDirectoryStore::new(pem_config.clone())?))
        }
        StoreConfig::Memory => {
            info!("Opening in-memory store");
            Ok(Box::new(InMemoryCredentialStore::new()))
        }
    }
}
