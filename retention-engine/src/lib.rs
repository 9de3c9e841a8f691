//! Certificate retention engine for certutil
//!
//! Turns the raw records a credential store returns for a subject query into
//! retention decisions:
//! - Deduplication by store handle
//! - Normalization into [`CertificateRecord`] (records without a usable CN or
//!   expiration are dropped silently)
//! - Ordering by expiration, most-future first, stable on ties
//! - Expired/valid classification against a clock
//! - Keep/delete partitioning under two policies
//!
//! # Policies
//!
//! - **KeepNewestOnly**: keep the record that expires last, delete the rest
//! - **DeleteExpiredOnly**: delete exactly the expired records, possibly all of them
//!
//! # Example
//!
//! ```rust
//! use credential_store::{InMemoryCredentialStore, StoredCertificate};
//! use retention_engine::{FixedClock, RetentionEngine};
//!
//! let store = InMemoryCredentialStore::new();
//! store.insert("a", StoredCertificate::new("CN=test", ["test"], 100.0));
//! store.insert("b", StoredCertificate::new("CN=test", ["test"], 200.0));
//! store.insert("c", StoredCertificate::new("CN=test", ["test"], 50.0));
//!
//! let engine = RetentionEngine::with_clock(&store, FixedClock::new(150.0));
//!
//! let plan = engine.verify("test");
//! assert_eq!(plan.delete_set().len(), 2);
//! assert_eq!(engine.count_expired("test"), 2);
//! ```

pub mod classify;
pub mod dedup;
pub mod engine;
pub mod ordering;
pub mod record;
pub mod retention;
pub mod time;

pub use classify::*;
pub use dedup::deduplicate;
pub use engine::*;
pub use ordering::sort_by_expiration_desc;
pub use record::*;
pub use retention::*;
