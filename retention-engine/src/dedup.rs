//! Handle-based deduplication of raw store records

use credential_store::RawRecord;
use itertools::Itertools;

/// Collapse records that refer to the same stored credential.
///
/// Equality is store-handle equality only; two distinct credentials with
/// identical content both survive. The first occurrence of each handle is kept.
pub fn deduplicate(records: Vec<RawRecord>) -> Vec<RawRecord> {
    records
        .into_iter()
        .unique_by(|record| record.handle.clone())
        .collect()
}
