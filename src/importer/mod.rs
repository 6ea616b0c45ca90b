//! First-launch population of the collection from reference files.
//!
//! Each resource is decoded as a whole before anything is inserted, and its
//! inserts run inside a savepoint, so a resource contributes either all of its
//! coins or none. Failures are logged and recorded in the [`ImportReport`];
//! nothing here aborts the run.

mod resources;

use anyhow::Context;
use log::{error, info, warn};
use rusqlite::Connection;
use thiserror::Error;

use crate::db::{count_coins, insert_coin, CoinFilter};
use crate::models::{Coin, ImportEntry};

pub use resources::{BundledResources, DirectoryResources, ResourceError, ResourceSource};

/// Reference sets imported on first launch, in import order.
pub const REFERENCE_SETS: &[&str] = &["national_parks", "american_women"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("resource `{name}` does not match the expected entry shape: {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to store coins from `{name}`: {source:#}")]
    Store {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// What happened to one resource during a preload.
#[derive(Debug)]
pub struct ResourceOutcome {
    pub name: String,
    pub result: Result<usize, ImportError>,
}

/// Summary of a whole preload run.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub resources: Vec<ResourceOutcome>,
    pub committed: bool,
    pub commit_error: Option<String>,
}

impl ImportReport {
    /// Coins that made it into the store. Zero when the commit failed.
    pub fn inserted(&self) -> usize {
        if !self.committed {
            return 0;
        }
        self.resources
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.resources.iter().filter(|outcome| outcome.result.is_err())
    }
}

/// Result of the startup initialization phase.
#[derive(Debug)]
pub enum SeedOutcome {
    AlreadyPopulated,
    Seeded(ImportReport),
    ProbeFailed(anyhow::Error),
}

/// Strictly decode a JSON array of import entries. Any shape mismatch fails
/// the whole array.
pub fn decode_entries(bytes: &[u8]) -> Result<Vec<ImportEntry>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Resolve, decode and insert one resource. Returns the number of coins
/// inserted. The caller owns the surrounding transaction and its commit.
pub fn import_resource(
    conn: &Connection,
    source: &dyn ResourceSource,
    name: &str,
) -> Result<usize, ImportError> {
    let bytes = source.load(name)?;
    let entries = decode_entries(&bytes).map_err(|source| ImportError::Decode {
        name: name.to_string(),
        source,
    })?;

    insert_entries(conn, entries).map_err(|source| ImportError::Store {
        name: name.to_string(),
        source,
    })
}

fn insert_entries(conn: &Connection, entries: Vec<ImportEntry>) -> anyhow::Result<usize> {
    conn.execute_batch("SAVEPOINT import_resource")
        .context("failed to open import savepoint")?;

    let mut inserted = 0;
    for entry in entries {
        if let Err(err) = insert_coin(conn, &Coin::from_entry(entry)) {
            conn.execute_batch("ROLLBACK TO import_resource; RELEASE import_resource")
                .context("failed to roll back import savepoint")?;
            return Err(err);
        }
        inserted += 1;
    }

    conn.execute_batch("RELEASE import_resource")
        .context("failed to release import savepoint")?;
    Ok(inserted)
}

/// Import every named resource inside one transaction and commit once at the
/// end. A failing resource is logged and skipped; a failing commit is logged
/// and not retried.
pub fn preload(conn: &Connection, source: &dyn ResourceSource, names: &[&str]) -> ImportReport {
    let mut report = ImportReport::default();

    let tx = match conn.unchecked_transaction() {
        Ok(tx) => tx,
        Err(err) => {
            error!("event=import_commit status=error stage=begin error={err}");
            report.commit_error = Some(err.to_string());
            return report;
        }
    };

    for name in names {
        let result = import_resource(&tx, source, name);
        match &result {
            Ok(inserted) => {
                info!("event=import_resource status=ok resource={name} inserted={inserted}")
            }
            Err(ImportError::Decode { source, .. }) => warn!(
                "event=import_resource status=error kind=decode resource={name} line={} column={} error={source}",
                source.line(),
                source.column()
            ),
            Err(err) => warn!("event=import_resource status=error resource={name} error={err}"),
        }
        report.resources.push(ResourceOutcome {
            name: name.to_string(),
            result,
        });
    }

    match tx.commit() {
        Ok(()) => {
            report.committed = true;
            info!(
                "event=import_commit status=ok inserted={} failed_resources={}",
                report.inserted(),
                report.failures().count()
            );
        }
        Err(err) => {
            error!("event=import_commit status=error error={err}");
            report.commit_error = Some(err.to_string());
        }
    }

    report
}

/// Run the reference import when, and only when, the store holds no coins.
/// The probe is a bounded count so a large collection is never scanned.
pub fn seed_if_empty(conn: &Connection, source: &dyn ResourceSource) -> SeedOutcome {
    match count_coins(conn, CoinFilter::All, Some(1)) {
        Ok(0) => {
            info!("event=seed_probe status=ok populated=false");
            SeedOutcome::Seeded(preload(conn, source, REFERENCE_SETS))
        }
        Ok(_) => {
            info!("event=seed_probe status=ok populated=true");
            SeedOutcome::AlreadyPopulated
        }
        Err(err) => {
            error!("event=seed_probe status=error error={err:#}");
            SeedOutcome::ProbeFailed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_missing_and_null_mint_marks() {
        let entries = decode_entries(
            br#"[
                {"name": "Hot Springs", "series": "America the Beautiful", "year": 2010, "mintMark": "P"},
                {"name": "Yosemite", "series": "America the Beautiful", "year": 2010, "mintMark": null},
                {"name": "Mount Hood", "series": "America the Beautiful", "year": 2010}
            ]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].mint_mark.as_deref(), Some("P"));
        assert_eq!(entries[1].mint_mark, None);
        assert_eq!(entries[2].mint_mark, None);
    }

    #[test]
    fn decode_rejects_the_whole_array_on_one_bad_entry() {
        let err = decode_entries(
            br#"[
                {"name": "Glacier", "series": "America the Beautiful", "year": 2011},
                {"series": "America the Beautiful", "year": 2011}
            ]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("name"));

        assert!(decode_entries(br#"{"name": "not an array"}"#).is_err());
        assert!(decode_entries(
            br#"[{"name": "Denali", "series": "America the Beautiful", "year": "2012"}]"#
        )
        .is_err());
    }

    #[test]
    fn report_counts_only_committed_successes() {
        let mut report = ImportReport::default();
        report.resources.push(ResourceOutcome {
            name: "a".into(),
            result: Ok(4),
        });
        report.resources.push(ResourceOutcome {
            name: "b".into(),
            result: Err(ImportError::Resource(ResourceError::NotFound { name: "b".into() })),
        });

        assert_eq!(report.inserted(), 0);
        report.committed = true;
        assert_eq!(report.inserted(), 4);
        assert_eq!(report.failures().count(), 1);
    }
}
