//! Settlement error types.

use thiserror::Error;

use crate::settlement::period::SettlementPeriod;

/// Errors that abort a settlement run before any account is touched.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// The period has already been settled; a second run is refused.
    #[error("Period {0} has already been settled")]
    PeriodAlreadySettled(SettlementPeriod),

    /// The carryover expiry date could not be derived for the period.
    #[error("Cannot derive carryover expiry for period {0}")]
    InvalidExpiry(SettlementPeriod),
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PeriodAlreadySettled(_) => "ALREADY_FINALIZED",
            Self::InvalidExpiry(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::PeriodAlreadySettled(_) => 409,
            Self::InvalidExpiry(_) => 500,
        }
    }
}
