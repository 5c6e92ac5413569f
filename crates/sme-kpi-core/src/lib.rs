pub mod coerce;
pub mod error;
pub mod kpi;
pub mod normalize;
pub mod pipeline;
pub mod recommend;
pub mod report;
pub mod score;
pub mod stats;
pub mod summary;
pub mod types;

pub use error::KpiError;
pub use types::*;

/// Standard result type for all pipeline operations
pub type KpiResult<T> = Result<T, KpiError>;
