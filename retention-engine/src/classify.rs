//! Expired/valid classification against a clock

use crate::record::CertificateRecord;
use crate::time;
use serde::{Deserialize, Serialize};

/// Source of "now", in seconds since 2001-01-01T00:00:00Z
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        time::to_reference_seconds(chrono::Utc::now())
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(f64);

impl FixedClock {
    pub fn new(now: f64) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Expired,
    Valid,
}

/// A record expires strictly after its not-after instant; `now == not_after` is still valid.
pub fn classify(record: &CertificateRecord, now: f64) -> Classification {
    if now > record.not_after() {
        Classification::Expired
    } else {
        Classification::Valid
    }
}

pub fn is_expired(record: &CertificateRecord, now: f64) -> bool {
    classify(record, now) == Classification::Expired
}

/// Keep only the expired records, preserving input order
pub fn filter_expired(records: Vec<CertificateRecord>, now: f64) -> Vec<CertificateRecord> {
    records
        .into_iter()
        .filter(|record| is_expired(record, now))
        .collect()
}
