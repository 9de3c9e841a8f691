//! In-memory credential store for testing and development

use crate::{
    AttributeValue, CredentialStore, KeyMaterial, RawRecord, RecordHandle, Removal, Result,
    StoreError,
};
use parking_lot::RwLock;
use tracing::debug;

/// A certificate as held by the in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCertificate {
    pub subject: String,
    pub common_names: Option<Vec<String>>,
    pub not_after: Option<AttributeValue>,
    pub keys: KeyMaterial,
}

impl StoredCertificate {
    pub fn new<I, S>(subject: impl Into<String>, common_names: I, not_after: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            common_names: Some(common_names.into_iter().map(Into::into).collect()),
            not_after: Some(AttributeValue::Number(not_after)),
            keys: KeyMaterial::NONE,
        }
    }

    pub fn with_keys(mut self, keys: KeyMaterial) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_not_after(mut self, not_after: Option<AttributeValue>) -> Self {
        self.not_after = not_after;
        self
    }

    pub fn with_common_names(mut self, common_names: Option<Vec<String>>) -> Self {
        self.common_names = common_names;
        self
    }
}

/// Insertion-ordered store; queries return entries in the order they were added.
pub struct InMemoryCredentialStore {
    entries: RwLock<Vec<(RecordHandle, StoredCertificate)>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Insert or replace the certificate held under `handle`
    pub fn insert(&self, handle: impl Into<RecordHandle>, certificate: StoredCertificate) {
        let handle = handle.into();
        let mut entries = self.entries.write();
        if let Some(slot) = entries.iter_mut().find(|(h, _)| *h == handle) {
            slot.1 = certificate;
        } else {
            entries.push((handle, certificate));
        }
    }

    pub fn contains(&self, handle: &RecordHandle) -> bool {
        self.entries.read().iter().any(|(h, _)| h == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn query(&self, subject_contains: &str) -> Result<Vec<RawRecord>> {
        let records: Vec<RawRecord> = self
            .entries
            .read()
            .iter()
            .filter(|(_, certificate)| certificate.subject.contains(subject_contains))
            .map(|(handle, certificate)| RawRecord {
                handle: handle.clone(),
                subject: certificate.subject.clone(),
                common_names: certificate.common_names.clone(),
                not_after: certificate.not_after.clone(),
                keys: certificate.keys,
            })
            .collect();

        debug!("In-memory query '{}' matched {} entries", subject_contains, records.len());
        Ok(records)
    }

    fn delete(&self, handle: &RecordHandle, keys: &KeyMaterial) -> Result<Removal> {
        let mut entries = self.entries.write();
        let position = entries
            .iter()
            .position(|(h, _)| h == handle)
            .ok_or_else(|| StoreError::NotFound(handle.to_string()))?;
        let (_, removed) = entries.remove(position);

        Ok(Removal {
            certificate: true,
            private_key: keys.private_key && removed.keys.private_key,
            public_key: keys.public_key && removed.keys.public_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> KeyMaterial {
        KeyMaterial {
            private_key: true,
            public_key: true,
        }
    }

    #[test]
    fn test_query_matches_subject_substring() {
        let store = InMemoryCredentialStore::new();
        store.insert("a", StoredCertificate::new("CN=test-client,O=Acme", ["test-client"], 100.0));
        store.insert("b", StoredCertificate::new("CN=other,O=Acme", ["other"], 200.0));

        let records = store.query("test").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].handle, RecordHandle::new("a"));

        assert_eq!(store.query("Acme").unwrap().len(), 2);
        assert!(store.query("nothing").unwrap().is_empty());
    }

    #[test]
    fn test_query_is_case_sensitive() {
        let store = InMemoryCredentialStore::new();
        store.insert("a", StoredCertificate::new("CN=Test", ["Test"], 100.0));

        assert!(store.query("test").unwrap().is_empty());
        assert_eq!(store.query("Test").unwrap().len(), 1);
    }

    #[test]
    fn test_insert_replaces_existing_handle() {
        let store = InMemoryCredentialStore::new();
        store.insert("a", StoredCertificate::new("CN=one", ["one"], 1.0));
        store.insert("a", StoredCertificate::new("CN=two", ["two"], 2.0));

        assert_eq!(store.len(), 1);
        let records = store.query("CN=").unwrap();
        assert_eq!(records[0].subject, "CN=two");
    }

    #[test]
    fn test_delete_reports_key_removal() {
        let store = InMemoryCredentialStore::new();
        store.insert(
            "id",
            StoredCertificate::new("CN=identity", ["identity"], 5.0).with_keys(identity()),
        );

        let removal = store.delete(&RecordHandle::new("id"), &identity()).unwrap();
        assert!(removal.is_complete(&identity()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_unknown_handle_is_not_found() {
        let store = InMemoryCredentialStore::new();
        let result = store.delete(&RecordHandle::new("missing"), &KeyMaterial::NONE);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
