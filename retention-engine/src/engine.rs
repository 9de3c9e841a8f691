use crate::classify::{filter_expired, Clock, SystemClock};
use crate::dedup::deduplicate;
use crate::ordering::sort_by_expiration_desc;
use crate::record::{normalize, CertificateRecord};
use crate::retention::{select, RetentionPlan, RetentionPolicy};
use credential_store::{CredentialStore, Removal, StoreError};
use tracing::{debug, info, instrument, warn};

/// Deduplicated, normalized records for one query, plus what happened on the way.
#[derive(Debug)]
pub struct WorkingSet {
    pub records: Vec<CertificateRecord>,
    /// Raw records returned by the store
    pub matched: usize,
    /// Raw records collapsed as duplicate handles
    pub duplicates: usize,
    /// Distinct records without a usable CN or expiration
    pub dropped: usize,
    /// Store failure that was turned into an empty result
    pub store_error: Option<StoreError>,
}

#[derive(Debug)]
pub struct DeletionOutcome {
    pub record: CertificateRecord,
    pub result: Result<Removal, StoreError>,
}

impl DeletionOutcome {
    /// Certificate and every requested key removed
    pub fn is_complete(&self) -> bool {
        self.result
            .as_ref()
            .is_ok_and(|removal| removal.is_complete(self.record.keys()))
    }
}

/// Per-record results of one best-effort deletion batch, in issue order.
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub outcomes: Vec<DeletionOutcome>,
}

impl DeletionReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn deleted(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }

    /// Every certificate and key in the batch was removed
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(DeletionOutcome::is_complete)
    }
}

#[derive(Debug)]
pub struct DeletionRun {
    pub plan: RetentionPlan,
    pub report: DeletionReport,
}

/// Retention operations over one credential store.
///
/// Each call is an independent pipeline: query, deduplicate, normalize,
/// order, classify or select, and for the deleting operations a sequential
/// batch of store deletions. Store failures never surface as errors; they
/// produce an empty working set and are only visible in logs and
/// [`WorkingSet::store_error`].
pub struct RetentionEngine<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: CredentialStore> RetentionEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CredentialStore, C: Clock> RetentionEngine<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Query, deduplicate and normalize, in discovery order
    fn gather(&self, query: &str) -> WorkingSet {
        let (raw, store_error) = match self.store.query(query) {
            Ok(raw) => (raw, None),
            Err(e) => {
                warn!("Credential store query '{}' failed: {}", query, e);
                (Vec::new(), Some(e))
            }
        };

        let matched = raw.len();
        let distinct = deduplicate(raw);
        let duplicates = matched - distinct.len();
        let records: Vec<CertificateRecord> = distinct.iter().filter_map(normalize).collect();
        let dropped = distinct.len() - records.len();

        debug!(
            query,
            matched, duplicates, dropped,
            kept = records.len(),
            "Built working set"
        );

        WorkingSet {
            records,
            matched,
            duplicates,
            dropped,
            store_error,
        }
    }

    /// The working set ordered by expiration, most-future first
    pub fn working_set(&self, query: &str) -> WorkingSet {
        let mut set = self.gather(query);
        set.records = sort_by_expiration_desc(set.records);
        set
    }

    #[instrument(skip(self))]
    pub fn list(&self, query: &str) -> Vec<CertificateRecord> {
        self.working_set(query).records
    }

    #[instrument(skip(self))]
    pub fn list_expired(&self, query: &str) -> Vec<CertificateRecord> {
        filter_expired(self.list(query), self.clock.now())
    }

    /// Dry run of [`Self::delete`]
    #[instrument(skip(self))]
    pub fn verify(&self, query: &str) -> RetentionPlan {
        self.plan(query, RetentionPolicy::KeepNewestOnly)
    }

    pub fn plan(&self, query: &str, policy: RetentionPolicy) -> RetentionPlan {
        select(self.list(query), policy, self.clock.now())
    }

    /// Delete every matching record except the one that expires last
    #[instrument(skip(self))]
    pub fn delete(&self, query: &str) -> DeletionRun {
        self.prune(query, RetentionPolicy::KeepNewestOnly)
    }

    /// Delete every matching record that has expired
    #[instrument(skip(self))]
    pub fn delete_expired(&self, query: &str) -> DeletionRun {
        self.prune(query, RetentionPolicy::DeleteExpiredOnly)
    }

    #[instrument(skip(self))]
    pub fn count(&self, query: &str) -> usize {
        self.gather(query).records.len()
    }

    #[instrument(skip(self))]
    pub fn count_expired(&self, query: &str) -> usize {
        self.list_expired(query).len()
    }

    fn prune(&self, query: &str, policy: RetentionPolicy) -> DeletionRun {
        let plan = self.plan(query, policy);
        let report = self.apply(&plan);
        DeletionRun { plan, report }
    }

    /// Issue one delete per delete-set member of `plan`, in plan order.
    ///
    /// A failure never stops the batch. Callers that need to show a plan
    /// before acting on it build it with [`Self::verify`] or [`Self::plan`]
    /// and hand it here.
    pub fn apply(&self, plan: &RetentionPlan) -> DeletionReport {
        let outcomes: Vec<DeletionOutcome> = plan
            .delete_set()
            .into_iter()
            .map(|record| {
                let result = self.store.delete(record.identity(), record.keys());
                match &result {
                    Ok(removal) if removal.is_complete(record.keys()) => {
                        info!("Deleted CN={} ({})", record.common_name(), record.identity());
                    }
                    Ok(removal) => warn!(
                        "Partially deleted CN={} ({}): {:?}",
                        record.common_name(),
                        record.identity(),
                        removal
                    ),
                    Err(e) => warn!(
                        "Failed to delete CN={} ({}): {}",
                        record.common_name(),
                        record.identity(),
                        e
                    ),
                }
                DeletionOutcome {
                    record: record.clone(),
                    result,
                }
            })
            .collect();

        DeletionReport { outcomes }
    }
}
