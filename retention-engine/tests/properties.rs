//! Property tests for the retention pipeline

use credential_store::{AttributeValue, KeyMaterial, RawRecord, RecordHandle};
use proptest::prelude::*;
use retention_engine::*;
use std::collections::HashSet;

fn raw(handle: u8, not_after: f64) -> RawRecord {
    RawRecord {
        handle: RecordHandle::new(format!("h{handle}")),
        subject: "CN=prop".to_string(),
        common_names: Some(vec!["prop".to_string()]),
        not_after: Some(AttributeValue::Number(not_after)),
        keys: KeyMaterial::NONE,
    }
}

fn expiration() -> impl Strategy<Value = f64> {
    // Small integer set so ties are common; zero would be dropped by normalization
    (1_i32..20).prop_map(|n| f64::from(n) * 100.0)
}

fn raw_records() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec((0_u8..16, expiration()), 0..24)
        .prop_map(|pairs| pairs.into_iter().map(|(h, t)| raw(h, t)).collect())
}

/// Distinct, normalized records in discovery order
fn records() -> impl Strategy<Value = Vec<CertificateRecord>> {
    raw_records().prop_map(|raw| deduplicate(raw).iter().filter_map(normalize).collect())
}

proptest! {
    #[test]
    fn prop_dedup_is_idempotent_and_never_grows(raw in raw_records()) {
        let once = deduplicate(raw.clone());
        prop_assert!(once.len() <= raw.len());

        let handles: HashSet<_> = once.iter().map(|r| r.handle.clone()).collect();
        prop_assert_eq!(handles.len(), once.len());

        let twice = deduplicate(once.clone());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_sort_is_descending_and_stable(records in records()) {
        let discovery: Vec<RecordHandle> =
            records.iter().map(|r| r.identity().clone()).collect();
        let sorted = sort_by_expiration_desc(records);

        for pair in sorted.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            prop_assert!(first.not_after() >= second.not_after());
            if first.not_after() == second.not_after() {
                let first_at = discovery.iter().position(|h| h == first.identity());
                let second_at = discovery.iter().position(|h| h == second.identity());
                prop_assert!(first_at < second_at);
            }
        }
    }

    #[test]
    fn prop_keep_newest_deletes_all_but_one(records in records(), now in expiration()) {
        let n = records.len();
        let plan = select(sort_by_expiration_desc(records), RetentionPolicy::KeepNewestOnly, now);

        prop_assert_eq!(plan.delete_set().len(), n.saturating_sub(1));
        prop_assert_eq!(plan.keep_set().len(), n.min(1));
        if let (Some(kept), Some(first)) = (plan.keep_set().first(), plan.entries().first()) {
            prop_assert_eq!(kept.identity(), first.record.identity());
        }
    }

    #[test]
    fn prop_delete_expired_deletes_exactly_the_expired(records in records(), now in expiration()) {
        let sorted = sort_by_expiration_desc(records);
        let expired: Vec<RecordHandle> = filter_expired(sorted.clone(), now)
            .iter()
            .map(|r| r.identity().clone())
            .collect();
        let plan = select(sorted, RetentionPolicy::DeleteExpiredOnly, now);

        let deleted: Vec<RecordHandle> =
            plan.delete_set().iter().map(|r| r.identity().clone()).collect();
        prop_assert_eq!(deleted, expired);
        prop_assert!(plan.keep_set().iter().all(|r| r.not_after() >= now));
    }
}
