//! Ledger error types.

use fxwallet_common::CurrencyCode;
use fxwallet_fx::FxError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by [`crate::LedgerStore`] operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Source and target currency are the same.
    #[error("Cannot convert {0} to itself")]
    SameCurrency(CurrencyCode),

    /// Amount is not a finite number greater than zero.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Wallet holds less than the requested amount.
    #[error("Insufficient balance in {currency}: required {required}, available {available}")]
    InsufficientBalance {
        currency: CurrencyCode,
        required: Decimal,
        available: Decimal,
    },

    /// No rate for one of the request's currencies.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(CurrencyCode),

    /// Crediting the target would exceed the decimal range.
    #[error("Balance in {0} would exceed the supported range")]
    BalanceOverflow(CurrencyCode),

    /// Profile name is empty after trimming.
    #[error("User name cannot be empty")]
    InvalidUserName,

    /// Other conversion engine failure.
    #[error(transparent)]
    Fx(FxError),

    /// Persistence collaborator failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl LedgerError {
    /// Whether the user can fix the request and try again.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            LedgerError::SameCurrency(_)
                | LedgerError::InvalidAmount(_)
                | LedgerError::InsufficientBalance { .. }
                | LedgerError::UnknownCurrency(_)
                | LedgerError::BalanceOverflow(_)
                | LedgerError::InvalidUserName
        )
    }

    /// Get a stable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::SameCurrency(_) => "SAME_CURRENCY",
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LedgerError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            LedgerError::BalanceOverflow(_) => "BALANCE_OVERFLOW",
            LedgerError::InvalidUserName => "INVALID_USER_NAME",
            LedgerError::Fx(e) => e.error_code(),
            LedgerError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<FxError> for LedgerError {
    fn from(e: FxError) -> Self {
        match e {
            FxError::UnknownCurrency(code) => LedgerError::UnknownCurrency(code),
            other => LedgerError::Fx(other),
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_currency_passes_through() {
        let err: LedgerError = FxError::UnknownCurrency(CurrencyCode::btc()).into();
        assert!(matches!(err, LedgerError::UnknownCurrency(ref c) if *c == CurrencyCode::btc()));
        assert!(err.is_user_correctable());
        assert_eq!(err.error_code(), "UNKNOWN_CURRENCY");
    }

    #[test]
    fn test_fatal_fx_errors_wrap() {
        let err: LedgerError = FxError::InvalidRateData("empty".to_string()).into();
        assert!(!err.is_user_correctable());
        assert_eq!(err.error_code(), "INVALID_RATE_DATA");
    }
}
