//! Command handlers.
//!
//! Each handler renders its output as text and reports whether the ledger
//! changed, so the caller knows when to persist.

use std::fmt::Write as _;
use std::str::FromStr;

use fxwallet_common::{Currency, CurrencyCode};
use fxwallet_ledger::{HistoryFilter, LedgerError, LedgerResult, LedgerStore};
use rust_decimal::Decimal;

use crate::format;

/// Rendered result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    /// Whether state must be written back to storage.
    pub mutated: bool,
}

impl Outcome {
    fn read(output: String) -> Self {
        Self {
            output,
            mutated: false,
        }
    }

    fn write(output: String) -> Self {
        Self {
            output,
            mutated: true,
        }
    }
}

/// Parse a user-entered amount. Accepts plain and scientific notation.
pub fn parse_amount(raw: &str) -> LedgerResult<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| LedgerError::InvalidAmount(raw.to_string()))
}

pub fn currencies(ledger: &LedgerStore) -> Outcome {
    let mut out = String::new();
    let rates = ledger.engine().rates();
    for (code, rate) in rates.iter() {
        let currency = Currency::from_code(code.clone());
        let _ = writeln!(
            out,
            "{:<28} {:<7} {}",
            currency.to_string(),
            currency.kind,
            rate.normalize()
        );
    }
    Outcome::read(out)
}

pub fn balances(ledger: &LedgerStore) -> Outcome {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format::welcome(ledger.user_name()));
    for currency in ledger.currencies() {
        let value = ledger.balance(&currency.code);
        let _ = writeln!(
            out,
            "{:<5} {:>20}",
            currency.code,
            format::amount(value, &currency.code)
        );
    }
    Outcome::read(out)
}

pub fn convert(
    ledger: &mut LedgerStore,
    from: &CurrencyCode,
    to: &CurrencyCode,
    amount: &str,
    apply: bool,
) -> LedgerResult<Outcome> {
    let amount = parse_amount(amount)?;
    let record = ledger.request_conversion(from, to, amount, apply)?;
    let mut out = format::conversion_line(&record);
    out.push('\n');
    // The conversion already happened; a quote that cannot be computed is left out.
    if let Ok(rate) = ledger.engine().quote(from, to) {
        let _ = writeln!(out, "1 {} = {} {}", from, format::fixed(rate, 6), to);
    }
    Ok(Outcome::write(out))
}

pub fn history(ledger: &LedgerStore, filter: HistoryFilter) -> Outcome {
    let mut out = String::new();
    let mut rows = ledger.list_history(filter).peekable();
    if rows.peek().is_none() {
        out.push_str("No conversions yet.\n");
        return Outcome::read(out);
    }
    let _ = writeln!(
        out,
        "{:<20} {:<5} {:<5} {:>18} {:>18} Applied",
        "Date", "From", "To", "Amount", "Result"
    );
    for record in rows {
        let _ = writeln!(out, "{}", format::history_row(record));
    }
    Outcome::read(out)
}

pub fn profile(ledger: &mut LedgerStore, name: Option<&str>) -> LedgerResult<Outcome> {
    match name {
        Some(name) => {
            ledger.set_user_name(name)?;
            let mut out = format::welcome(ledger.user_name());
            out.push('\n');
            Ok(Outcome::write(out))
        }
        None => {
            let mut out = format::welcome(ledger.user_name());
            out.push('\n');
            Ok(Outcome::read(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxwallet_fx::{ConversionEngine, RateTable};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn ledger() -> LedgerStore {
        let rates = RateTable::from_rates([
            (CurrencyCode::usd(), dec!(1)),
            (CurrencyCode::eur(), dec!(0.92)),
            (CurrencyCode::ars(), dec!(1000)),
            (CurrencyCode::btc(), dec!(0.0000158)),
        ])
        .unwrap();
        LedgerStore::with_defaults(ConversionEngine::new(Arc::new(rates)))
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").unwrap(), dec!(100));
        assert_eq!(parse_amount(" 2.5 ").unwrap(), dec!(2.5));
        assert_eq!(parse_amount("1e2").unwrap(), dec!(100));
        assert!(matches!(
            parse_amount("abc"),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_convert_applied() {
        let mut ledger = ledger();
        let outcome = convert(
            &mut ledger,
            &CurrencyCode::usd(),
            &CurrencyCode::ars(),
            "100",
            true,
        )
        .unwrap();

        assert!(outcome.mutated);
        assert_eq!(
            outcome.output,
            "100 USD = 100000.00 ARS. Applied to wallet.\n1 USD = 1000.000000 ARS\n"
        );
        assert_eq!(ledger.balance(&CurrencyCode::usd()), dec!(900));
    }

    #[test]
    fn test_convert_persists_when_quote_overflows() {
        let rates = RateTable::from_rates([
            (CurrencyCode::usd(), dec!(0.0000000000000000000000000001)),
            (CurrencyCode::ars(), dec!(10000000000000000000000000000)),
        ])
        .unwrap();
        let engine = ConversionEngine::new(Arc::new(rates));
        let mut ledger = LedgerStore::new(engine);
        assert!(ledger
            .engine()
            .quote(&CurrencyCode::usd(), &CurrencyCode::ars())
            .is_err());

        let outcome = convert(
            &mut ledger,
            &CurrencyCode::usd(),
            &CurrencyCode::ars(),
            "0.0000000000000000000000000001",
            false,
        )
        .unwrap();

        assert!(outcome.mutated);
        assert_eq!(outcome.output.lines().count(), 1);
        assert_eq!(ledger.history_len(), 1);
    }

    #[test]
    fn test_convert_rejects_bad_amount() {
        let mut ledger = ledger();
        let err = convert(
            &mut ledger,
            &CurrencyCode::usd(),
            &CurrencyCode::ars(),
            "-5",
            false,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(ledger.history_len(), 0);
    }

    #[test]
    fn test_history_empty_and_filtered() {
        let mut ledger = ledger();
        assert_eq!(
            history(&ledger, HistoryFilter::All).output,
            "No conversions yet.\n"
        );

        convert(&mut ledger, &CurrencyCode::usd(), &CurrencyCode::btc(), "10", false).unwrap();
        assert_eq!(
            history(&ledger, HistoryFilter::FiatOnly).output,
            "No conversions yet.\n"
        );
        let crypto = history(&ledger, HistoryFilter::CryptoOnly).output;
        assert_eq!(crypto.lines().count(), 2);
        assert!(crypto.contains("10.0000"));
    }

    #[test]
    fn test_profile() {
        let mut ledger = ledger();
        let shown = profile(&mut ledger, None).unwrap();
        assert!(!shown.mutated);

        let saved = profile(&mut ledger, Some("  Ana ")).unwrap();
        assert!(saved.mutated);
        assert!(saved.output.starts_with("Welcome, Ana."));

        assert!(matches!(
            profile(&mut ledger, Some("   ")),
            Err(LedgerError::InvalidUserName)
        ));
        assert_eq!(ledger.user_name(), "Ana");
    }

    #[test]
    fn test_currencies_show_rates() {
        let ledger = ledger();
        let out = currencies(&ledger).output;
        assert_eq!(out.lines().count(), 4);
        assert!(out.contains("BTC - Bitcoin"));
        assert!(out.contains("0.0000158"));
    }

    #[test]
    fn test_balances_lists_seeded() {
        let ledger = ledger();
        let out = balances(&ledger).output;
        assert!(out.contains("USD"));
        assert!(out.contains("1000.00"));
        assert!(out.contains("0.010000"));
        // BRL is seeded but has no rate in this table.
        assert!(!out.contains("BRL"));
    }
}
