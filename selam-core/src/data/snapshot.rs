//! Immutable table snapshots and the explicit snapshot cache.
//!
//! A `Snapshot` is built once and never mutated. Readers hold it through an
//! `Arc`; a reload produces a fresh `Arc` and leaves existing readers on the
//! snapshot they already have.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::loader::{load_tables, LoadReport, LoadedTables};
use super::sources::DataSources;
use crate::domain::{ForecastTable, ImpactTable, ObservationTable};

/// The three tables for one session.
#[derive(Debug)]
pub struct Snapshot {
    observations: ObservationTable,
    forecasts: ForecastTable,
    impacts: ImpactTable,
    report: LoadReport,
    fingerprint: String,
    loaded_at: NaiveDateTime,
}

impl Snapshot {
    /// Read all sources from disk.
    pub fn load(sources: &DataSources) -> Self {
        let fingerprint = sources.fingerprint();
        let tables = load_tables(sources);
        Self::from_loaded(tables, fingerprint)
    }

    /// Build a snapshot from tables already in memory.
    ///
    /// The fingerprint is a BLAKE3 hash over the serialized rows.
    pub fn from_tables(observations: ObservationTable, forecasts: ForecastTable, impacts: ImpactTable) -> Self {
        let mut hasher = blake3::Hasher::new();
        hash_rows(&mut hasher, observations.rows());
        hash_rows(&mut hasher, forecasts.rows());
        hash_rows(&mut hasher, impacts.rows());
        let fingerprint = hasher.finalize().to_hex().to_string();

        Self::from_loaded(
            LoadedTables {
                observations,
                forecasts,
                impacts,
                report: LoadReport::default(),
            },
            fingerprint,
        )
    }

    fn from_loaded(tables: LoadedTables, fingerprint: String) -> Self {
        Self {
            observations: tables.observations,
            forecasts: tables.forecasts,
            impacts: tables.impacts,
            report: tables.report,
            fingerprint,
            loaded_at: chrono::Local::now().naive_local(),
        }
    }

    pub fn observations(&self) -> &ObservationTable {
        &self.observations
    }

    pub fn forecasts(&self) -> &ForecastTable {
        &self.forecasts
    }

    pub fn impacts(&self) -> &ImpactTable {
        &self.impacts
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn loaded_at(&self) -> NaiveDateTime {
        self.loaded_at
    }

    /// False when the observation table is empty; pages then show a no-data state.
    pub fn has_primary_data(&self) -> bool {
        !self.observations.is_empty()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::from_tables(ObservationTable::default(), ForecastTable::default(), ImpactTable::default())
    }
}

fn hash_rows<T: serde::Serialize>(hasher: &mut blake3::Hasher, rows: &[T]) {
    // Serialization of plain derive types into a Vec cannot fail.
    if let Ok(bytes) = serde_json::to_vec(rows) {
        hasher.update(&bytes);
    }
    hasher.update(b"|");
}

/// How `SnapshotCache::get` treats an existing snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Reuse the memoized snapshot; load only on first use.
    Cached,
    /// Rebuild only if the source files' fingerprint changed.
    IfChanged,
    /// Always rebuild.
    Reload,
}

/// Memoizes one snapshot per source set.
#[derive(Debug)]
pub struct SnapshotCache {
    sources: DataSources,
    current: Option<Arc<Snapshot>>,
}

impl SnapshotCache {
    pub fn new(sources: DataSources) -> Self {
        Self {
            sources,
            current: None,
        }
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    /// The memoized snapshot, if one has been loaded.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.clone()
    }

    pub fn get(&mut self, mode: LoadMode) -> Arc<Snapshot> {
        match (&self.current, mode) {
            (Some(snapshot), LoadMode::Cached) => return Arc::clone(snapshot),
            (Some(snapshot), LoadMode::IfChanged) => {
                if snapshot.fingerprint() == self.sources.fingerprint() {
                    debug!("sources unchanged; reusing snapshot");
                    return Arc::clone(snapshot);
                }
            }
            _ => {}
        }

        let snapshot = Arc::new(Snapshot::load(&self.sources));
        info!(
            observations = snapshot.observations().len(),
            forecasts = snapshot.forecasts().len(),
            impacts = snapshot.impacts().len(),
            fingerprint = %&snapshot.fingerprint()[..12],
            "snapshot loaded"
        );
        self.current = Some(Arc::clone(&snapshot));
        snapshot
    }
}
