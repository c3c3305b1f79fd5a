//! User-facing text. The core crates never produce any.

use fxwallet_common::CurrencyCode;
use fxwallet_ledger::{HistoryRecord, LedgerError};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places in history tables.
const HISTORY_PLACES: u32 = 4;

/// Format an amount with a fixed number of decimal places.
pub fn fixed(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", places as usize, rounded)
}

/// Format an amount the way balances are shown for its currency.
pub fn amount(value: Decimal, code: &CurrencyCode) -> String {
    fixed(value, code.kind().display_places())
}

/// Line announcing a completed conversion.
pub fn conversion_line(record: &HistoryRecord) -> String {
    let outcome = if record.applied_to_wallet {
        "Applied to wallet."
    } else {
        "Simulation only."
    };
    format!(
        "{} {} = {} {}. {}",
        record.amount_from.normalize(),
        record.from_code,
        amount(record.amount_to, &record.to_code),
        record.to_code,
        outcome
    )
}

/// One history table row.
pub fn history_row(record: &HistoryRecord) -> String {
    format!(
        "{:<20} {:<5} {:<5} {:>18} {:>18} {}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.from_code,
        record.to_code,
        fixed(record.amount_from, HISTORY_PLACES),
        fixed(record.amount_to, HISTORY_PLACES),
        if record.applied_to_wallet { "Yes" } else { "No" }
    )
}

pub fn welcome(user_name: &str) -> String {
    if user_name.is_empty() {
        "Save your name to personalize your experience.".to_string()
    } else {
        format!(
            "Welcome, {}. Your data is saved on this device.",
            user_name
        )
    }
}

/// Message shown for a request the user can correct.
pub fn user_message(error: &LedgerError) -> String {
    match error {
        LedgerError::SameCurrency(_) => "Source and target currencies must differ.".to_string(),
        LedgerError::InvalidAmount(_) => "Enter a valid amount greater than zero.".to_string(),
        LedgerError::InsufficientBalance {
            currency,
            available,
            ..
        } => format!(
            "Insufficient balance in {} (available {}).",
            currency,
            amount(*available, currency)
        ),
        LedgerError::UnknownCurrency(code) => format!("Currency {} is not available.", code),
        LedgerError::BalanceOverflow(code) => {
            format!("The resulting {} balance is too large to hold.", code)
        }
        LedgerError::InvalidUserName => "Enter a valid name.".to_string(),
        other => format!("Conversion error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fixed_places() {
        assert_eq!(fixed(dec!(1000), 2), "1000.00");
        assert_eq!(fixed(dec!(0.0000158), 6), "0.000016");
        assert_eq!(fixed(dec!(2.345), 2), "2.35");
    }

    #[test]
    fn test_amount_by_kind() {
        assert_eq!(amount(dec!(0.01), &CurrencyCode::btc()), "0.010000");
        assert_eq!(amount(dec!(900), &CurrencyCode::usd()), "900.00");
    }

    #[test]
    fn test_conversion_line() {
        let record = HistoryRecord::new(
            CurrencyCode::usd(),
            CurrencyCode::ars(),
            dec!(100),
            dec!(100000),
            true,
        );
        assert_eq!(
            conversion_line(&record),
            "100 USD = 100000.00 ARS. Applied to wallet."
        );
    }

    #[test]
    fn test_welcome() {
        assert_eq!(welcome(""), "Save your name to personalize your experience.");
        assert!(welcome("Ana").starts_with("Welcome, Ana."));
    }

    #[test]
    fn test_user_messages() {
        let err = LedgerError::InsufficientBalance {
            currency: CurrencyCode::usd(),
            required: dec!(10),
            available: dec!(5),
        };
        assert_eq!(user_message(&err), "Insufficient balance in USD (available 5.00).");
        assert_eq!(
            user_message(&LedgerError::SameCurrency(CurrencyCode::usd())),
            "Source and target currencies must differ."
        );
        assert_eq!(
            user_message(&LedgerError::BalanceOverflow(CurrencyCode::ars())),
            "The resulting ARS balance is too large to hold."
        );
    }
}
