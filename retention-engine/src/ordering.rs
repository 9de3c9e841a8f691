use crate::record::CertificateRecord;

/// Stable sort by `not_after`, most-future expiration first.
pub fn sort_by_expiration_desc(mut records: Vec<CertificateRecord>) -> Vec<CertificateRecord> {
    records.sort_by(|a, b| b.not_after().total_cmp(&a.not_after()));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::normalize;
    use credential_store::{AttributeValue, KeyMaterial, RawRecord, RecordHandle};

    fn record(handle: &str, not_after: f64) -> CertificateRecord {
        normalize(&RawRecord {
            handle: RecordHandle::new(handle),
            subject: "CN=test".to_string(),
            common_names: Some(vec!["test".to_string()]),
            not_after: Some(AttributeValue::Number(not_after)),
            keys: KeyMaterial::NONE,
        })
        .unwrap()
    }

    #[test]
    fn test_descending_order() {
        let sorted = sort_by_expiration_desc(vec![
            record("a", 100.0),
            record("b", 200.0),
            record("c", 50.0),
        ]);
        let expirations: Vec<f64> = sorted.iter().map(CertificateRecord::not_after).collect();
        assert_eq!(expirations, vec![200.0, 100.0, 50.0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let sorted = sort_by_expiration_desc(vec![
            record("first", 10.0),
            record("newest", 20.0),
            record("second", 10.0),
            record("third", 10.0),
        ]);
        let handles: Vec<&str> = sorted.iter().map(|r| r.identity().as_str()).collect();
        assert_eq!(handles, vec!["newest", "first", "second", "third"]);
    }

    #[test]
    fn test_negative_instants_before_epoch() {
        let sorted = sort_by_expiration_desc(vec![record("old", -5.0), record("new", 5.0)]);
        assert_eq!(sorted[0].identity().as_str(), "new");
    }
}
