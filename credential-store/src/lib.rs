//! # Credential Store
//!
//! The seam between certutil and whatever holds the certificates.
//!
//! A store answers two questions: which certificate-bearing records have a
//! subject containing a given substring, and "remove this one". Everything
//! else (deduplication, expiry handling, retention) lives in the retention
//! engine and only ever talks to a store through [`CredentialStore`].
//!
//! ## Providers:
//! - In-memory (tests, dry runs)
//! - PEM directory (a folder of `.pem` / `.crt` / `.cer` files with optional
//!   sibling `.key` / `.pub` key files)
//!
//! ## Example
//!
//! ```rust
//! use credential_store::{CredentialStore, InMemoryCredentialStore, StoredCertificate};
//!
//! let store = InMemoryCredentialStore::new();
//! store.insert("a", StoredCertificate::new("CN=build-agent", ["build-agent"], 700_000_000.0));
//!
//! let records = store.query("build").unwrap();
//! assert_eq!(records.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod providers;

pub use config::*;
pub use error::*;
pub use providers::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for credential store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unix timestamp of 2001-01-01T00:00:00Z, the origin of every not-after value
pub const REFERENCE_EPOCH_UNIX_OFFSET: i64 = 978_307_200;

/// Opaque identity token for one stored credential.
///
/// Two records are the same credential exactly when their handles are equal;
/// nothing about the certificate content takes part in that comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordHandle(String);

impl RecordHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordHandle {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for RecordHandle {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Underlying representation of the validity not-after attribute.
///
/// Platforms hand this value over either as a number or as its textual form;
/// interpretation is left to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

/// Key references attached to an identity-class record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyMaterial {
    pub private_key: bool,
    pub public_key: bool,
}

impl KeyMaterial {
    /// Key material for a bare certificate
    pub const NONE: Self = Self {
        private_key: false,
        public_key: false,
    };

    pub fn is_identity(&self) -> bool {
        self.private_key || self.public_key
    }
}

/// An unprocessed entry as returned by a store query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Store-owned identity token
    pub handle: RecordHandle,

    /// Full subject distinguished name as the store renders it
    pub subject: String,

    /// Common Name attribute values, `None` when the attribute is missing
    pub common_names: Option<Vec<String>>,

    /// Validity not-after, seconds since 2001-01-01T00:00:00Z
    pub not_after: Option<AttributeValue>,

    /// Associated private/public key references
    pub keys: KeyMaterial,
}

/// What a delete call actually removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub certificate: bool,
    pub private_key: bool,
    pub public_key: bool,
}

impl Removal {
    /// True when the certificate and every requested key were removed
    pub fn is_complete(&self, requested: &KeyMaterial) -> bool {
        self.certificate
            && (!requested.private_key || self.private_key)
            && (!requested.public_key || self.public_key)
    }
}

/// Query and delete capability of an external credential store.
pub trait CredentialStore: Send + Sync {
    /// Return every entry whose subject contains `subject_contains`.
    ///
    /// Matching semantics are store-defined. Zero matches is an empty vector.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be reached or read.
    fn query(&self, subject_contains: &str) -> Result<Vec<RawRecord>>;

    /// Remove one certificate and the key material named by `keys`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the certificate itself could not be
    /// removed. Key removal failures are reported through [`Removal`].
    fn delete(&self, handle: &RecordHandle, keys: &KeyMaterial) -> Result<Removal>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for &T {
    fn query(&self, subject_contains: &str) -> Result<Vec<RawRecord>> {
        (**self).query(subject_contains)
    }

    fn delete(&self, handle: &RecordHandle, keys: &KeyMaterial) -> Result<Removal> {
        (**self).delete(handle, keys)
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for Box<T> {
    fn query(&self, subject_contains: &str) -> Result<Vec<RawRecord>> {
        (**self).query(subject_contains)
    }

    fn delete(&self, handle: &RecordHandle, keys: &KeyMaterial) -> Result<Removal> {
        (**self).delete(handle, keys)
    }
}
