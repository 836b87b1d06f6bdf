//! Table loading with the degraded-empty fallback policy.
//!
//! 1. Observation source unreadable → every table is empty (the primary
//!    source gates the whole load)
//! 2. Forecast or impact source unreadable → that table alone is empty
//! 3. Malformed cells → `None` / `NaN`, the row is kept
//! 4. Invalid UTF-8 → replacement characters, the row is kept
//!
//! Failures never escape as `Err`. They are recorded in the `LoadReport`
//! and logged at `warn`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ByteRecord, StringRecord};
use serde::Serialize;
use tracing::{debug, warn};

use super::parse::{parse_date, parse_f64, parse_year};
use super::sources::{DataSources, SourceError, SourceKind};
use crate::domain::{
    ForecastPoint, ForecastTable, ImpactRecord, ImpactTable, Observation, ObservationTable,
    RecordType, Scenario,
};

/// Outcome of a load, one entry per degraded source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub issues: Vec<SourceError>,
    /// True when the observation source failed and the other two were skipped.
    pub short_circuited: bool,
    /// Rows dropped because the CSV reader could not split them into fields.
    pub skipped_rows: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && !self.short_circuited && self.skipped_rows == 0
    }

    pub fn issue(&self, kind: SourceKind) -> Option<&SourceError> {
        self.issues.iter().find(|e| e.kind() == kind)
    }

    /// Short summary per source for status lines.
    pub fn summary(&self) -> Vec<SourceStatus> {
        SourceKind::ALL
            .iter()
            .map(|&kind| {
                let skipped = self.short_circuited && kind != SourceKind::Observations;
                let message = match self.issue(kind) {
                    Some(err) => Some(err.to_string()),
                    None if skipped => Some(format!("{kind} source skipped: observation source unavailable")),
                    None => None,
                };
                SourceStatus {
                    kind,
                    loaded: message.is_none(),
                    message,
                }
            })
            .collect()
    }
}

/// Per-source status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatus {
    pub kind: SourceKind,
    pub loaded: bool,
    pub message: Option<String>,
}

/// The three tables plus the report describing how they were obtained.
#[derive(Debug, Clone, Default)]
pub struct LoadedTables {
    pub observations: ObservationTable,
    pub forecasts: ForecastTable,
    pub impacts: ImpactTable,
    pub report: LoadReport,
}

/// Load all three tables from disk.
pub fn load_tables(sources: &DataSources) -> LoadedTables {
    let mut report = LoadReport::default();

    let observations = match open_and_read(SourceKind::Observations, &sources.observations, &mut report)
        .and_then(|csv| observations_from(&csv))
    {
        Ok(rows) => ObservationTable::new(rows),
        Err(err) => {
            warn!(error = %err, "primary source unavailable; forecasts and impacts skipped");
            report.issues.push(err);
            report.short_circuited = true;
            return LoadedTables {
                report,
                ..LoadedTables::default()
            };
        }
    };

    let forecasts = match open_and_read(SourceKind::Forecasts, &sources.forecasts, &mut report)
        .and_then(|csv| forecasts_from(&csv))
    {
        Ok(rows) => ForecastTable::new(rows),
        Err(err) => {
            warn!(error = %err, "forecast table left empty");
            report.issues.push(err);
            ForecastTable::default()
        }
    };

    let impacts = match open_and_read(SourceKind::Impacts, &sources.impacts, &mut report)
        .and_then(|csv| impacts_from(&csv))
    {
        Ok(table) => table,
        Err(err) => {
            warn!(error = %err, "impact table left empty");
            report.issues.push(err);
            ImpactTable::default()
        }
    };

    debug!(
        observations = observations.len(),
        forecasts = forecasts.len(),
        impacts = impacts.len(),
        skipped_rows = report.skipped_rows,
        "tables loaded"
    );

    LoadedTables {
        observations,
        forecasts,
        impacts,
        report,
    }
}

fn open_and_read(kind: SourceKind, path: &Path, report: &mut LoadReport) -> Result<CsvTable, SourceError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SourceError::MissingSource {
            kind,
            path: path.to_path_buf(),
        },
        _ => SourceError::Unreadable {
            kind,
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;
    let table = CsvTable::read(kind, path, file)?;
    report.skipped_rows += table.skipped;
    Ok(table)
}

/// Header-indexed CSV contents.
pub(crate) struct CsvTable {
    kind: SourceKind,
    path: std::path::PathBuf,
    headers: HashMap<String, usize>,
    records: Vec<StringRecord>,
    skipped: usize,
}

impl CsvTable {
    pub(crate) fn read<R: Read>(kind: SourceKind, path: &Path, reader: R) -> Result<Self, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| SourceError::Unreadable {
                kind,
                path: path.to_path_buf(),
                reason: format!("bad header row: {e}"),
            })?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim_start_matches('\u{feff}').to_string(), i))
            .collect();

        let mut records = Vec::new();
        let mut skipped = 0;
        for result in rdr.byte_records() {
            match result {
                Ok(record) => records.push(decode_lossy(kind, record)),
                Err(e) => {
                    warn!(source = %kind, error = %e, "skipping undecodable row");
                    skipped += 1;
                }
            }
        }

        Ok(Self {
            kind,
            path: path.to_path_buf(),
            headers,
            records,
            skipped,
        })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.get(name).copied()
    }

    fn require(&self, name: &str) -> Result<usize, SourceError> {
        self.column(name).ok_or_else(|| SourceError::MissingColumn {
            kind: self.kind,
            path: self.path.clone(),
            column: name.to_string(),
        })
    }
}

/// Invalid UTF-8 sequences become U+FFFD so the row survives.
fn decode_lossy(kind: SourceKind, record: ByteRecord) -> StringRecord {
    match StringRecord::from_byte_record(record) {
        Ok(record) => record,
        Err(e) => {
            debug!(source = %kind, error = %e, "replacing invalid UTF-8 in row");
            e.into_byte_record().iter().map(String::from_utf8_lossy).collect()
        }
    }
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

pub(crate) fn observations_from(csv: &CsvTable) -> Result<Vec<Observation>, SourceError> {
    let code = csv.require("indicator_code")?;
    let date = csv.require("observation_date")?;
    let value = csv.require("value_numeric")?;
    let record_type = csv.require("record_type")?;

    Ok(csv
        .records
        .iter()
        .map(|r| {
            Observation::new(
                cell(r, code),
                parse_date(cell(r, date)),
                parse_f64(cell(r, value)),
                RecordType::parse(cell(r, record_type)),
            )
        })
        .collect())
}

pub(crate) fn forecasts_from(csv: &CsvTable) -> Result<Vec<ForecastPoint>, SourceError> {
    let indicator = csv.require("Indicator")?;
    let year = csv.require("Year")?;
    let value = csv.require("Value")?;
    let scenario = csv.require("Scenario")?;

    Ok(csv
        .records
        .iter()
        .map(|r| ForecastPoint {
            indicator: cell(r, indicator).to_string(),
            year: parse_year(cell(r, year)),
            scenario: Scenario::parse(cell(r, scenario)),
            value: parse_f64(cell(r, value)),
        })
        .collect())
}

pub(crate) fn impacts_from(csv: &CsvTable) -> Result<ImpactTable, SourceError> {
    let category = csv.require("category")?;
    let text = csv.require("original_text")?;
    let related = csv.require("related_indicator")?;
    let impact = csv.require("estimated_impact")?;
    let date = csv.column("observation_date");

    let rows = csv
        .records
        .iter()
        .map(|r| {
            ImpactRecord::new(
                cell(r, category),
                date.and_then(|i| parse_date(cell(r, i))),
                cell(r, text),
                cell(r, related),
                parse_f64(cell(r, impact)),
            )
        })
        .collect();

    Ok(ImpactTable::new(rows, date.is_some()))
}
