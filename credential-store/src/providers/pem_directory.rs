//! PEM directory credential store
//!
//! Every `CERTIFICATE` block in a file with one of the configured extensions is
//! one record. A file holding exactly one certificate next to `<stem>.key`
//! and/or `<stem>.pub` is an identity: deleting it removes those key files too.
//! Key files are only owned when no other certificate file shares the stem
//! (`svc.pem` and `svc.crt` never claim `svc.key`).
//!
//! Handles have the form `<path>#<sha256 of the DER>`, so removing one block of
//! a bundle leaves the handles of the remaining blocks valid.

use crate::config::PemDirectoryConfig;
use crate::{
    AttributeValue, CredentialStore, KeyMaterial, RawRecord, RecordHandle, Removal, Result,
    StoreError, REFERENCE_EPOCH_UNIX_OFFSET,
};
use anyhow::Context;
use itertools::Itertools;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use x509_parser::certificate::X509Certificate;
use x509_parser::prelude::FromDer;

const CERTIFICATE_TAG: &str = "CERTIFICATE";

pub struct PemDirectoryStore {
    config: PemDirectoryConfig,
}

/// Fields pulled out of one parsed certificate
struct ExtractedCertificate {
    subject: String,
    common_names: Option<Vec<String>>,
    not_after: Option<AttributeValue>,
}

impl PemDirectoryStore {
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] when no certificate extension is configured.
    pub fn new(config: PemDirectoryConfig) -> Result<Self> {
        if config.certificate_extensions.is_empty() {
            return Err(StoreError::Configuration(
                "at least one certificate file extension is required".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Certificate files in the store directory, ordered by file name
    fn certificate_files(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.config.path).map_err(|e| {
            StoreError::Unavailable(format!("{}: {}", self.config.path.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && self.is_certificate_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn is_certificate_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.config
                    .certificate_extensions
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(ext))
            })
    }

    fn sibling_keys(&self, path: &Path) -> KeyMaterial {
        KeyMaterial {
            private_key: sibling(path, &self.config.private_key_extension).is_file(),
            public_key: sibling(path, &self.config.public_key_extension).is_file(),
        }
    }

    /// Whether `path` is the only certificate file with its stem
    fn owns_keys(&self, path: &Path) -> Result<bool> {
        let stems = stem_counts(&self.certificate_files()?);
        Ok(path
            .file_stem()
            .is_some_and(|stem| stems.get(stem).copied().unwrap_or(0) <= 1))
    }

    fn read_file(
        &self,
        path: &Path,
        subject_contains: &str,
        stems: &HashMap<OsString, usize>,
    ) -> Result<Vec<RawRecord>> {
        let contents = fs::read(path)?;
        let blocks: Vec<::pem::Pem> = ::pem::parse_many(&contents)?
            .into_iter()
            .filter(|block| block.tag() == CERTIFICATE_TAG)
            .collect();

        let shared_stem = path
            .file_stem()
            .is_some_and(|stem| stems.get(stem).copied().unwrap_or(0) > 1);
        let keys = if blocks.len() == 1 && !shared_stem {
            self.sibling_keys(path)
        } else {
            KeyMaterial::NONE
        };

        let mut records = Vec::new();
        for block in &blocks {
            let Some(extracted) = extract(block.contents()) else {
                debug!("Skipping unparseable certificate block in {}", path.display());
                continue;
            };
            if !extracted.subject.contains(subject_contains) {
                continue;
            }
            let Some(handle) = handle_for(path, block.contents()) else {
                debug!("Skipping certificate in non UTF-8 path {}", path.display());
                continue;
            };
            records.push(RawRecord {
                handle,
                subject: extracted.subject,
                common_names: extracted.common_names,
                not_after: extracted.not_after,
                keys,
            });
        }
        Ok(records)
    }

    fn remove_sibling(&self, path: &Path, extension: &str) -> bool {
        let key_path = sibling(path, extension);
        match fs::remove_file(&key_path) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove key file {}: {}", key_path.display(), e);
                false
            }
        }
    }
}

/// Parse a DER certificate and pull out subject, CN values and not-after
#[allow(clippy::cast_precision_loss)]
fn extract(der: &[u8]) -> Option<ExtractedCertificate> {
    let (_rem, cert) = X509Certificate::from_der(der).ok()?;

    let common_names: Vec<String> = cert
        .subject()
        .iter_common_name()
        .filter_map(|attr| attr.as_str().ok())
        .map(ToString::to_string)
        .collect();

    let not_after = cert.validity().not_after.timestamp() - REFERENCE_EPOCH_UNIX_OFFSET;

    Some(ExtractedCertificate {
        subject: cert.subject().to_string(),
        common_names: if common_names.is_empty() {
            None
        } else {
            Some(common_names)
        },
        not_after: Some(AttributeValue::Number(not_after as f64)),
    })
}

fn sibling(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

fn fingerprint(der: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(der);
    hex::encode(hasher.finalize())
}

/// `None` for paths that cannot round-trip through a string handle
fn handle_for(path: &Path, der: &[u8]) -> Option<RecordHandle> {
    let path = path.to_str()?;
    Some(RecordHandle::new(format!("{}#{}", path, fingerprint(der))))
}

fn stem_counts(files: &[PathBuf]) -> HashMap<OsString, usize> {
    files
        .iter()
        .filter_map(|path| path.file_stem())
        .map(ToOwned::to_owned)
        .counts()
}

fn split_handle(handle: &RecordHandle) -> Result<(PathBuf, &str)> {
    handle
        .as_str()
        .rsplit_once('#')
        .map(|(path, digest)| (PathBuf::from(path), digest))
        .ok_or_else(|| StoreError::NotFound(format!("malformed handle: {handle}")))
}

impl CredentialStore for PemDirectoryStore {
    fn query(&self, subject_contains: &str) -> Result<Vec<RawRecord>> {
        let files = self.certificate_files()?;
        let stems = stem_counts(&files);

        let mut records = Vec::new();
        for path in files {
            match self.read_file(&path, subject_contains, &stems) {
                Ok(mut found) => records.append(&mut found),
                Err(e) => debug!("Skipping {}: {}", path.display(), e),
            }
        }

        debug!(
            "PEM directory query '{}' matched {} certificates in {}",
            subject_contains,
            records.len(),
            self.config.path.display()
        );
        Ok(records)
    }

    fn delete(&self, handle: &RecordHandle, keys: &KeyMaterial) -> Result<Removal> {
        let (path, digest) = split_handle(handle)?;
        let contents = fs::read(&path).map_err(|_| StoreError::NotFound(handle.to_string()))?;
        let blocks = ::pem::parse_many(&contents)?;

        let before = blocks.len();
        let remaining: Vec<::pem::Pem> = blocks
            .into_iter()
            .filter(|block| {
                !(block.tag() == CERTIFICATE_TAG && fingerprint(block.contents()) == digest)
            })
            .collect();
        if remaining.len() == before {
            return Err(StoreError::NotFound(handle.to_string()));
        }

        // Counted while this file is still on disk
        let owns_keys = self.owns_keys(&path)?;

        if remaining.is_empty() {
            fs::remove_file(&path)
                .with_context(|| format!("removing {}", path.display()))?;
        } else {
            fs::write(&path, ::pem::encode_many(&remaining))
                .with_context(|| format!("rewriting {}", path.display()))?;
        }

        let mut removal = Removal {
            certificate: true,
            ..Removal::default()
        };
        if keys.is_identity() && !owns_keys {
            warn!(
                "Keeping key files of {}: another certificate file shares its name",
                path.display()
            );
            return Ok(removal);
        }
        if keys.private_key {
            removal.private_key = self.remove_sibling(&path, &self.config.private_key_extension);
        }
        if keys.public_key {
            removal.public_key = self.remove_sibling(&path, &self.config.public_key_extension);
        }
        Ok(removal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_handle_uses_last_separator() {
        let handle = RecordHandle::new("/tmp/a#b/cert.pem#abcdef");
        let (path, digest) = split_handle(&handle).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/a#b/cert.pem"));
        assert_eq!(digest, "abcdef");
    }

    #[test]
    fn test_malformed_handle_is_not_found() {
        let handle = RecordHandle::new("no-separator");
        let result = split_handle(&handle);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_rejects_empty_extension_list() {
        let mut config = PemDirectoryConfig::new("/tmp");
        config.certificate_extensions.clear();
        assert!(matches!(
            PemDirectoryStore::new(config),
            Err(StoreError::Configuration(_))
        ));
    }

    #[test]
    fn test_stem_counts_group_extensions() {
        let files = [
            PathBuf::from("/certs/svc.pem"),
            PathBuf::from("/certs/svc.crt"),
            PathBuf::from("/certs/web.pem"),
        ];
        let stems = stem_counts(&files);
        assert_eq!(stems.get(&OsString::from("svc")), Some(&2));
        assert_eq!(stems.get(&OsString::from("web")), Some(&1));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_has_no_handle() {
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(std::ffi::OsStr::from_bytes(b"/certs/\xff.pem"));
        assert!(handle_for(path, b"der").is_none());
        assert!(handle_for(Path::new("/certs/ok.pem"), b"der").is_some());
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert!(extract(b"not a certificate").is_none());
    }
}
