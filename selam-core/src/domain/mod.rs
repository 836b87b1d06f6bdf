//! Domain types for the indicator tables.

pub mod forecast;
pub mod impact;
pub mod observation;

pub use forecast::{ForecastPoint, ForecastTable, Scenario};
pub use impact::{ImpactRecord, ImpactTable};
pub use observation::{Observation, ObservationTable, RecordType};

/// Indicator codes the dashboard pages refer to by name.
pub mod codes {
    /// Account ownership rate (Access).
    pub const ACC_OWNERSHIP: &str = "ACC_OWNERSHIP";
    /// Digital payment usage rate (Usage).
    pub const USG_DIGITAL_PAYMENT: &str = "USG_DIGITAL_PAYMENT";
    /// Mobile money account ownership rate.
    pub const ACC_MM_ACCOUNT: &str = "ACC_MM_ACCOUNT";
    /// Interoperable P2P transaction count.
    pub const USG_P2P_COUNT: &str = "USG_P2P_COUNT";
}
