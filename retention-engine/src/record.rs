//! Normalized certificate records

use credential_store::{AttributeValue, KeyMaterial, RawRecord, RecordHandle};
use serde::Serialize;

/// Separator used to flatten multi-valued Common Name attributes
pub const COMMON_NAME_SEPARATOR: &str = ",CN=";

/// One certificate (or identity) the engine can reason about.
///
/// Only built through [`normalize`], so `common_name` is never empty and
/// `not_after` is always a finite, non-zero number of seconds since
/// 2001-01-01T00:00:00Z.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateRecord {
    identity: RecordHandle,
    common_name: String,
    not_after: f64,
    keys: KeyMaterial,
}

impl CertificateRecord {
    /// Store handle used for deletion
    pub fn identity(&self) -> &RecordHandle {
        &self.identity
    }

    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    pub fn not_after(&self) -> f64 {
        self.not_after
    }

    pub fn keys(&self) -> &KeyMaterial {
        &self.keys
    }

    pub fn has_private_key(&self) -> bool {
        self.keys.private_key
    }

    pub fn has_public_key(&self) -> bool {
        self.keys.public_key
    }
}

/// Convert a raw store record into a [`CertificateRecord`].
///
/// Returns `None` when the Common Name is missing or empty, when the
/// not-after attribute is missing, not a finite number, or exactly `0`.
pub fn normalize(raw: &RawRecord) -> Option<CertificateRecord> {
    let common_name = raw
        .common_names
        .as_ref()
        .filter(|names| !names.is_empty())
        .map(|names| names.join(COMMON_NAME_SEPARATOR))
        .filter(|joined| !joined.is_empty())?;

    let not_after = parse_not_after(raw.not_after.as_ref()?)?;
    if not_after == 0.0 {
        return None;
    }

    Some(CertificateRecord {
        identity: raw.handle.clone(),
        common_name,
        not_after,
        keys: raw.keys,
    })
}

fn parse_not_after(value: &AttributeValue) -> Option<f64> {
    let parsed = match value {
        AttributeValue::Number(number) => *number,
        AttributeValue::Text(text) => text.trim().parse::<f64>().ok()?,
    };
    parsed.is_finite().then_some(parsed)
}
