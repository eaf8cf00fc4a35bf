//! The material price store: in-memory records plus their persisted blob.

use crate::backend::{BlobBackend, FileBackend};
use crate::ingest::{ImportOutcome, ImportStats, Ingestor};
use crate::record::{MaterialRecord, YearMonth};
use crate::snapshot;
use crate::source::{self, Row};
use matprice_core::config::StorageConfig;
use matprice_core::{Error, ErrorCode, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// How the store came up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum LoadStatus {
    /// No blob existed yet
    Fresh,
    /// Blob loaded with this many records
    Loaded(usize),
    /// Blob unreadable or corrupt; started empty
    Recovered(String),
}

/// Outcome of the best-effort write to the shared copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum MirrorStatus {
    Disabled,
    Written,
    Failed(String),
}

/// Outcome of a successful primary save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub bytes: usize,
    pub mirror: MirrorStatus,
}

/// Summary figures for the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub records: usize,
    /// Distinct (name, specification) pairs
    pub materials: usize,
    pub earliest: Option<YearMonth>,
    pub latest: Option<YearMonth>,
}

/// Ordered collection of material price records.
pub struct Store {
    records: Vec<MaterialRecord>,
    primary: Box<dyn BlobBackend>,
    mirror: Option<Box<dyn BlobBackend>>,
    load_status: LoadStatus,
}

impl Store {
    /// Open a store on `primary`, loading whatever it holds.
    ///
    /// Never fails: a missing blob gives an empty store, and an unreadable
    /// or corrupt one is logged and replaced by an empty store.
    pub fn open(primary: impl BlobBackend + 'static) -> Self {
        let (records, load_status) = load(&primary);
        Self {
            records,
            primary: Box::new(primary),
            mirror: None,
            load_status,
        }
    }

    /// Also write every save to a shared copy, best effort.
    #[must_use]
    pub fn with_mirror(mut self, mirror: impl BlobBackend + 'static) -> Self {
        self.mirror = Some(Box::new(mirror));
        self
    }

    /// Open the file-backed store described by the configuration.
    pub fn from_config(storage: &StorageConfig) -> Self {
        let store = Self::open(FileBackend::new(&storage.data_file));
        match &storage.shared_file {
            Some(shared) => store.with_mirror(FileBackend::new(shared)),
            None => store,
        }
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn records(&self) -> &[MaterialRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Rewrite the primary blob, then the shared copy if configured.
    pub fn save(&mut self) -> Result<SaveReport> {
        let blob = snapshot::encode(&self.records)?;
        if let Err(err) = self.primary.write(&blob) {
            return Err(Error::new(
                ErrorCode::StorageError,
                format!("Could not save records to {}: {}", self.primary.describe(), err.message),
            )
            .with_source(err));
        }

        let mirror = match self.mirror.as_mut() {
            None => MirrorStatus::Disabled,
            Some(mirror) => match mirror.write(&blob) {
                Ok(()) => MirrorStatus::Written,
                Err(err) => {
                    tracing::warn!(shared = %mirror.describe(), error = %err, "Shared copy not updated");
                    MirrorStatus::Failed(err.message)
                }
            },
        };

        tracing::debug!(records = self.records.len(), bytes = blob.len(), "Store saved");
        Ok(SaveReport {
            bytes: blob.len(),
            mirror,
        })
    }

    /// Import a spreadsheet or delimited text file.
    ///
    /// Source errors and save failures come back as a failed outcome; the
    /// store is unchanged in both cases.
    pub fn import(&mut self, path: impl AsRef<Path>) -> ImportOutcome {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Importing price records");

        let rows = match source::read_rows(path) {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Import source rejected");
                return ImportOutcome::failed(&err, None);
            }
        };

        match self.import_rows(rows) {
            Ok(stats) => ImportOutcome::succeeded(stats),
            Err((err, stats)) => ImportOutcome::failed(&err, Some(stats)),
        }
    }

    /// Validate, deduplicate and append already-read rows, then save.
    ///
    /// On a failed save the appended rows are dropped again and the error is
    /// returned together with the counters of the attempted import.
    pub fn import_rows<I>(&mut self, rows: I) -> std::result::Result<ImportStats, (matprice_core::Error, ImportStats)>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut ingestor =
            Ingestor::new(&self.records).with_import_date(chrono::Local::now().date_naive());
        for row in rows {
            ingestor.push(&row);
        }
        let (accepted, stats) = ingestor.finish();

        if !accepted.is_empty() {
            let before = self.records.len();
            self.records.extend(accepted);
            if let Err(err) = self.save() {
                self.records.truncate(before);
                tracing::error!(error = %err, "Import rolled back");
                return Err((err, stats));
            }
        }

        tracing::info!(
            imported = stats.imported_count,
            duplicates = stats.duplicate_count,
            invalid_price = stats.invalid_price_count,
            invalid_date = stats.invalid_date_count,
            skipped = stats.skipped_count,
            total = stats.total_rows,
            "Import finished"
        );
        Ok(stats)
    }

    /// Remove every record and persist the empty store.
    ///
    /// If the save fails the previous records are kept.
    pub fn delete_all(&mut self) -> Result<SaveReport> {
        let previous = std::mem::take(&mut self.records);
        match self.save() {
            Ok(report) => {
                tracing::info!(removed = previous.len(), "All records deleted");
                Ok(report)
            }
            Err(err) => {
                self.records = previous;
                Err(err)
            }
        }
    }

    pub fn stats(&self) -> StoreStats {
        let materials: HashSet<(&str, &str)> = self
            .records
            .iter()
            .map(|r| (r.material_name(), r.specification()))
            .collect();

        StoreStats {
            records: self.records.len(),
            materials: materials.len(),
            earliest: self.records.iter().map(MaterialRecord::year_month).min().cloned(),
            latest: self.records.iter().map(MaterialRecord::year_month).max().cloned(),
        }
    }
}

fn load(backend: &dyn BlobBackend) -> (Vec<MaterialRecord>, LoadStatus) {
    let loaded = backend
        .read()
        .and_then(|blob| blob.map(|bytes| snapshot::decode(&bytes)).transpose());

    match loaded {
        Ok(None) => {
            tracing::info!(source = %backend.describe(), "No saved records, starting empty");
            (Vec::new(), LoadStatus::Fresh)
        }
        Ok(Some(records)) => {
            tracing::info!(source = %backend.describe(), records = records.len(), "Records loaded");
            let count = records.len();
            (records, LoadStatus::Loaded(count))
        }
        Err(err) => {
            tracing::warn!(source = %backend.describe(), error = %err, "Saved records unreadable, starting empty");
            (Vec::new(), LoadStatus::Recovered(err.to_string()))
        }
    }
}
