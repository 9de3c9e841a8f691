//! Configuration for credential store providers

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Active store provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StoreConfig {
    PemDirectory(PemDirectoryConfig),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PemDirectoryConfig {
    /// Directory holding the certificate files
    pub path: PathBuf,

    /// File extensions scanned for certificates
    #[serde(default = "default_certificate_extensions")]
    pub certificate_extensions: Vec<String>,

    /// Extension of a sibling private key file
    #[serde(default = "default_private_key_extension")]
    pub private_key_extension: String,

    /// Extension of a sibling public key file
    #[serde(default = "default_public_key_extension")]
    pub public_key_extension: String,
}

impl PemDirectoryConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            certificate_extensions: default_certificate_extensions(),
            private_key_extension: default_private_key_extension(),
            public_key_extension: default_public_key_extension(),
        }
    }
}

fn default_certificate_extensions() -> Vec<String> {
    vec!["pem".to_string(), "crt".to_string(), "cer".to_string()]
}

fn default_private_key_extension() -> String {
    "key".to_string()
}

fn default_public_key_extension() -> String {
    "pub".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pem_directory_defaults_fill_in() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"type": "pem-directory", "path": "/var/lib/certs"}"#).unwrap();

        match config {
            StoreConfig::PemDirectory(pem) => {
                assert_eq!(pem.path, PathBuf::from("/var/lib/certs"));
                assert_eq!(pem.certificate_extensions, vec!["pem", "crt", "cer"]);
                assert_eq!(pem.private_key_extension, "key");
                assert_eq!(pem.public_key_extension, "pub");
            }
            StoreConfig::Memory => panic!("expected pem-directory"),
        }
    }

    #[test]
    fn test_memory_variant() {
        let config: StoreConfig = serde_json::from_str(r#"{"type": "memory"}"#).unwrap();
        assert_eq!(config, StoreConfig::Memory);
    }
}
