//! Conversion history records and filters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use fxwallet_common::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One completed conversion request. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// When the conversion was executed.
    pub timestamp: DateTime<Utc>,
    pub from_code: CurrencyCode,
    pub to_code: CurrencyCode,
    /// Amount given, in `from_code`.
    pub amount_from: Decimal,
    /// Amount obtained, in `to_code`, unrounded.
    pub amount_to: Decimal,
    /// Whether the conversion moved wallet balances.
    pub applied_to_wallet: bool,
}

impl HistoryRecord {
    pub fn new(
        from_code: CurrencyCode,
        to_code: CurrencyCode,
        amount_from: Decimal,
        amount_to: Decimal,
        applied_to_wallet: bool,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            from_code,
            to_code,
            amount_from,
            amount_to,
            applied_to_wallet,
        }
    }

    /// Whether either leg is a crypto-asset.
    pub fn involves_crypto(&self) -> bool {
        self.from_code.is_crypto() || self.to_code.is_crypto()
    }
}

/// Selects which history records to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    /// Neither leg is crypto.
    FiatOnly,
    /// At least one leg is crypto.
    CryptoOnly,
}

impl HistoryFilter {
    pub fn matches(&self, record: &HistoryRecord) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::FiatOnly => !record.involves_crypto(),
            HistoryFilter::CryptoOnly => record.involves_crypto(),
        }
    }
}

impl FromStr for HistoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(HistoryFilter::All),
            "fiat" => Ok(HistoryFilter::FiatOnly),
            "crypto" => Ok(HistoryFilter::CryptoOnly),
            other => Err(format!(
                "unknown history filter {:?}, expected all, fiat or crypto",
                other
            )),
        }
    }
}

impl fmt::Display for HistoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryFilter::All => write!(f, "all"),
            HistoryFilter::FiatOnly => write!(f, "fiat"),
            HistoryFilter::CryptoOnly => write!(f, "crypto"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(from: CurrencyCode, to: CurrencyCode) -> HistoryRecord {
        HistoryRecord::new(from, to, dec!(100), dec!(1), false)
    }

    #[test]
    fn test_filters() {
        let fiat = record(CurrencyCode::usd(), CurrencyCode::ars());
        let to_crypto = record(CurrencyCode::usd(), CurrencyCode::btc());
        let from_crypto = record(CurrencyCode::eth(), CurrencyCode::eur());

        assert!(HistoryFilter::All.matches(&fiat));
        assert!(HistoryFilter::All.matches(&to_crypto));

        assert!(HistoryFilter::FiatOnly.matches(&fiat));
        assert!(!HistoryFilter::FiatOnly.matches(&to_crypto));
        assert!(!HistoryFilter::FiatOnly.matches(&from_crypto));

        assert!(!HistoryFilter::CryptoOnly.matches(&fiat));
        assert!(HistoryFilter::CryptoOnly.matches(&to_crypto));
        assert!(HistoryFilter::CryptoOnly.matches(&from_crypto));
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<HistoryFilter>(), Ok(HistoryFilter::All));
        assert_eq!("Fiat".parse::<HistoryFilter>(), Ok(HistoryFilter::FiatOnly));
        assert_eq!(" crypto ".parse::<HistoryFilter>(), Ok(HistoryFilter::CryptoOnly));
        assert!("stocks".parse::<HistoryFilter>().is_err());
        assert_eq!(HistoryFilter::CryptoOnly.to_string(), "crypto");
    }

    #[test]
    fn test_record_serialization() {
        let record = HistoryRecord::new(
            CurrencyCode::usd(),
            CurrencyCode::ars(),
            dec!(100),
            dec!(100000),
            true,
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fromCode"], "USD");
        assert_eq!(json["toCode"], "ARS");
        assert_eq!(json["amountFrom"], "100");
        assert_eq!(json["amountTo"], "100000");
        assert_eq!(json["appliedToWallet"], true);

        let back: HistoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
