//! Data loading and snapshot caching

pub mod loader;
pub mod parse;
pub mod snapshot;
pub mod sources;

pub use loader::{load_tables, LoadReport, LoadedTables, SourceStatus};
pub use snapshot::{LoadMode, Snapshot, SnapshotCache};
pub use sources::{DataSources, SourceError, SourceKind};
