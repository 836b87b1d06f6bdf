//! Selam Core: indicator tables, loader, snapshot cache, query engine, page models.
//!
//! This crate is everything the dashboards need except drawing:
//! - Domain tables for observations, forecasts and event impacts
//! - Degraded-empty CSV loading with an explicit snapshot cache
//! - Pure indicator queries over an immutable snapshot
//! - Page models for the five dashboard views

pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod query;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, Page, PageState};
pub use data::{DataSources, LoadMode, Snapshot, SnapshotCache};
pub use query::{IndicatorService, QueryError};
