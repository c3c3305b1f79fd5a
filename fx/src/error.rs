//! FX engine error types.

use fxwallet_common::CurrencyCode;
use thiserror::Error;

/// Errors that can occur in the FX engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FxError {
    /// The rate document could not be obtained from its source.
    #[error("Failed to load rates from {source_name}: {reason}")]
    RateLoadFailed { source_name: String, reason: String },

    /// The rate document is not a non-empty mapping of code to positive number.
    #[error("Invalid rate data: {0}")]
    InvalidRateData(String),

    /// No rate for the requested currency.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(CurrencyCode),

    /// The converted amount does not fit the decimal range.
    #[error("Conversion from {from} to {to} overflowed")]
    ConversionOverflow { from: CurrencyCode, to: CurrencyCode },
}

impl FxError {
    /// Whether the error makes the session unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FxError::RateLoadFailed { .. } | FxError::InvalidRateData(_)
        )
    }

    /// Get a stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::RateLoadFailed { .. } => "RATE_LOAD_FAILED",
            FxError::InvalidRateData(_) => "INVALID_RATE_DATA",
            FxError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            FxError::ConversionOverflow { .. } => "CONVERSION_OVERFLOW",
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
