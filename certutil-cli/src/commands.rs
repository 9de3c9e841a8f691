//! Executes one operation and renders its line-oriented report

use crate::cli::Command;
use crate::error::Result;
use credential_store::CredentialStore;
use retention_engine::{
    time::format_expiration, CertificateRecord, Clock, DeletionReport, Disposition,
    RetentionEngine, RetentionPlan, RetentionPolicy,
};
use std::io::Write;
use tracing::{info, warn};

/// `CN=<cn>, Expiration: <date>`
pub fn describe(record: &CertificateRecord) -> String {
    format!(
        "CN={}, Expiration: {}",
        record.common_name(),
        format_expiration(record.not_after())
    )
}

/// Run `command` against `engine`, writing the report to `out`.
///
/// Store failures and failed deletions are logged, never returned.
///
/// # Errors
///
/// Only a failure to write `out` is an error.
pub fn execute<S, C, W>(command: &Command, engine: &RetentionEngine<S, C>, out: &mut W) -> Result<()>
where
    S: CredentialStore,
    C: Clock,
    W: Write,
{
    let name = command.name();
    match command {
        Command::List { .. } => write_records(out, &engine.list(name))?,
        Command::ListExp { .. } => write_records(out, &engine.list_expired(name))?,
        Command::Verify { .. } => write_plan(out, &engine.verify(name), "Keep", "Delete")?,
        Command::Delete { .. } => {
            let plan = engine.verify(name);
            write_plan(out, &plan, "Keeping", "Deleting")?;
            out.flush()?;
            summarize(name, &engine.apply(&plan));
        }
        Command::DeleteExp { .. } => {
            let plan = engine.plan(name, RetentionPolicy::DeleteExpiredOnly);
            for record in plan.delete_set() {
                writeln!(out, "{} -> Deleting", describe(record))?;
            }
            out.flush()?;
            summarize(name, &engine.apply(&plan));
        }
        Command::Count { .. } => writeln!(
            out,
            "Total amount of certificates having '{}' in CN: {}",
            name,
            engine.count(name)
        )?,
        Command::CountExp { .. } => writeln!(
            out,
            "Total amount of expired certificates having '{}' in CN: {}",
            name,
            engine.count_expired(name)
        )?,
    }
    out.flush()?;
    Ok(())
}

fn write_records<W: Write>(out: &mut W, records: &[CertificateRecord]) -> Result<()> {
    for record in records {
        writeln!(out, "{}", describe(record))?;
    }
    Ok(())
}

fn write_plan<W: Write>(out: &mut W, plan: &RetentionPlan, keep: &str, delete: &str) -> Result<()> {
    for entry in plan.entries() {
        let verdict = match entry.disposition {
            Disposition::Keep => keep,
            Disposition::Delete => delete,
        };
        writeln!(out, "{} -> {}", describe(&entry.record), verdict)?;
    }
    Ok(())
}

fn summarize(name: &str, report: &DeletionReport) {
    if report.is_clean() {
        info!("Deleted {} certificate(s) matching '{}'", report.attempted(), name);
    } else {
        warn!(
            "Deleted {} of {} certificate(s) matching '{}' ({} failed, some keys may remain)",
            report.deleted().count(),
            report.attempted(),
            name,
            report.failed().count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credential_store::{InMemoryCredentialStore, StoredCertificate};
    use retention_engine::FixedClock;

    fn run(command: Command, store: &InMemoryCredentialStore) -> Vec<String> {
        let engine = RetentionEngine::with_clock(store, FixedClock::new(150.0));
        let mut out = Vec::new();
        execute(&command, &engine, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn example() -> InMemoryCredentialStore {
        let store = InMemoryCredentialStore::new();
        store.insert("a", StoredCertificate::new("CN=test", ["test"], 100.0));
        store.insert("b", StoredCertificate::new("CN=test", ["test"], 200.0));
        store.insert("c", StoredCertificate::new("CN=test", ["test"], 50.0));
        store
    }

    fn line(not_after: f64) -> String {
        format!("CN=test, Expiration: {}", format_expiration(not_after))
    }

    #[test]
    fn test_verify_lines() {
        let lines = run(Command::Verify { name: "test".into() }, &example());
        assert_eq!(
            lines,
            vec![
                format!("{} -> Keep", line(200.0)),
                format!("{} -> Delete", line(100.0)),
                format!("{} -> Delete", line(50.0)),
            ]
        );
    }

    #[test]
    fn test_count_lines() {
        let store = example();
        assert_eq!(
            run(Command::Count { name: "test".into() }, &store),
            vec!["Total amount of certificates having 'test' in CN: 3"]
        );
        assert_eq!(
            run(Command::CountExp { name: "test".into() }, &store),
            vec!["Total amount of expired certificates having 'test' in CN: 2"]
        );
    }

    #[test]
    fn test_empty_listing_prints_nothing() {
        let store = InMemoryCredentialStore::new();
        assert!(run(Command::List { name: "test".into() }, &store).is_empty());
        assert!(run(Command::Verify { name: "test".into() }, &store).is_empty());
    }
}
