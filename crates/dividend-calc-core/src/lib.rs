pub mod decimal;
pub mod error;
pub mod format;
pub mod time_value;
pub mod types;

#[cfg(feature = "drip")]
pub mod drip;

#[cfg(feature = "planning")]
pub mod planning;

#[cfg(feature = "report")]
pub mod report;

pub use error::CalcError;
pub use types::*;

/// Standard result type for all calculator operations
pub type CalcResult<T> = Result<T, CalcError>;
