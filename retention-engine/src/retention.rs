//! Keep/delete partitioning of an ordered working set

use crate::classify::is_expired;
use crate::record::CertificateRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetentionPolicy {
    /// Keep the first (latest-expiring) record, delete every other one
    KeepNewestOnly,
    /// Delete exactly the expired records
    DeleteExpiredOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disposition {
    Keep,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRecord {
    pub record: CertificateRecord,
    pub disposition: Disposition,
}

/// Every record of the working set, in order, tagged keep or delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetentionPlan {
    policy: RetentionPolicy,
    entries: Vec<PlannedRecord>,
}

impl RetentionPlan {
    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    pub fn entries(&self) -> &[PlannedRecord] {
        &self.entries
    }

    pub fn keep_set(&self) -> Vec<&CertificateRecord> {
        self.with_disposition(Disposition::Keep)
    }

    pub fn delete_set(&self) -> Vec<&CertificateRecord> {
        self.with_disposition(Disposition::Delete)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with_disposition(&self, disposition: Disposition) -> Vec<&CertificateRecord> {
        self.entries
            .iter()
            .filter(|entry| entry.disposition == disposition)
            .map(|entry| &entry.record)
            .collect()
    }
}

/// Partition `records` under `policy`.
///
/// `records` must already be ordered by expiration, most-future first.
pub fn select(records: Vec<CertificateRecord>, policy: RetentionPolicy, now: f64) -> RetentionPlan {
    let entries = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let delete = match policy {
                RetentionPolicy::KeepNewestOnly => index > 0,
                RetentionPolicy::DeleteExpiredOnly => is_expired(&record, now),
            };
            PlannedRecord {
                record,
                disposition: if delete {
                    Disposition::Delete
                } else {
                    Disposition::Keep
                },
            }
        })
        .collect();

    RetentionPlan { policy, entries }
}
