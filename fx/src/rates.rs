//! USD-denominated rate table.

use std::collections::BTreeMap;
use std::str::FromStr;

use fxwallet_common::{Currency, CurrencyCode};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::{FxError, FxResult};
use crate::source::RateSource;

/// Immutable table of rates, each expressed as units of the currency per 1 USD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl RateTable {
    /// Build a table from in-memory rates.
    ///
    /// Fails with [`FxError::InvalidRateData`] when the input is empty, a code
    /// appears twice, or a rate is not strictly positive.
    pub fn from_rates<I>(rates: I) -> FxResult<Self>
    where
        I: IntoIterator<Item = (CurrencyCode, Decimal)>,
    {
        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            if rate <= Decimal::ZERO {
                return Err(FxError::InvalidRateData(format!(
                    "rate for {} must be positive, got {}",
                    code, rate
                )));
            }
            if table.insert(code.clone(), rate).is_some() {
                return Err(FxError::InvalidRateData(format!(
                    "duplicate rate for {}",
                    code
                )));
            }
        }

        if table.is_empty() {
            return Err(FxError::InvalidRateData("rate table is empty".to_string()));
        }

        Ok(Self { rates: table })
    }

    /// Parse a rate document of the form `{"rates": {"USD": 1, "ARS": 1000}}`.
    ///
    /// Other top-level keys are ignored.
    pub fn from_document(document: &str) -> FxResult<Self> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| FxError::InvalidRateData(format!("not valid JSON: {}", e)))?;

        let rates = value
            .get("rates")
            .and_then(Value::as_object)
            .ok_or_else(|| FxError::InvalidRateData("missing `rates` mapping".to_string()))?;

        let parsed = rates
            .iter()
            .map(|(key, raw)| {
                let code = CurrencyCode::parse(key).map_err(|e| {
                    FxError::InvalidRateData(format!("bad currency code {:?}: {}", key, e))
                })?;
                let rate = parse_rate(&code, raw)?;
                Ok((code, rate))
            })
            .collect::<FxResult<Vec<_>>>()?;

        Self::from_rates(parsed)
    }

    /// Load the table from a rate source.
    ///
    /// This is a one-shot startup step: errors are fatal and never retried.
    #[instrument(skip(source), fields(source = source.name()))]
    pub async fn load(source: &dyn RateSource) -> FxResult<Self> {
        let document = source.fetch().await?;
        let table = Self::from_document(&document)?;

        info!(currencies = table.len(), "Rate table loaded");

        Ok(table)
    }

    /// Rate for a code.
    pub fn lookup(&self, code: &CurrencyCode) -> FxResult<Decimal> {
        let rate = self
            .rates
            .get(code)
            .copied()
            .ok_or_else(|| FxError::UnknownCurrency(code.clone()))?;

        debug!(code = %code, rate = %rate, "Rate lookup");
        Ok(rate)
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    /// Currency metadata for every code in the table, in code order.
    pub fn currencies(&self) -> Vec<Currency> {
        self.rates
            .keys()
            .cloned()
            .map(Currency::from_code)
            .collect()
    }

    /// Iterate over `(code, rate)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &Decimal)> {
        self.rates.iter()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

fn parse_rate(code: &CurrencyCode, raw: &Value) -> FxResult<Decimal> {
    let number = match raw {
        Value::Number(number) => number,
        other => {
            return Err(FxError::InvalidRateData(format!(
                "rate for {} is not a number: {}",
                code, other
            )))
        }
    };

    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| {
            FxError::InvalidRateData(format!("rate for {} is out of range: {}", code, text))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticRateSource;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    #[test]
    fn test_from_document() {
        let table = RateTable::from_document(
            r#"{"base": "USD", "rates": {"USD": 1, "ARS": 1000, "BTC": 0.0000158}}"#,
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup(&CurrencyCode::usd()).unwrap(), dec!(1));
        assert_eq!(table.lookup(&CurrencyCode::ars()).unwrap(), dec!(1000));
        assert_eq!(table.lookup(&CurrencyCode::btc()).unwrap(), dec!(0.0000158));
    }

    #[test]
    fn test_lowercase_keys_normalized() {
        let table = RateTable::from_document(r#"{"rates": {"eur": 0.92}}"#).unwrap();
        assert_eq!(table.lookup(&CurrencyCode::eur()).unwrap(), dec!(0.92));
    }

    #[test]
    fn test_lookup_unknown() {
        let table = RateTable::from_rates([(CurrencyCode::usd(), dec!(1))]).unwrap();
        let result = table.lookup(&code("XYZ"));
        assert_eq!(result, Err(FxError::UnknownCurrency(code("XYZ"))));
    }

    #[test]
    fn test_invalid_documents() {
        let cases = [
            "not json",
            r#"{"base": "USD"}"#,
            r#"{"rates": []}"#,
            r#"{"rates": {}}"#,
            r#"{"rates": {"USD": "1"}}"#,
            r#"{"rates": {"USD": 0}}"#,
            r#"{"rates": {"USD": -3.5}}"#,
            r#"{"rates": {"US D": 1}}"#,
            r#"{"rates": {"usd": 1, "USD": 1}}"#,
            r#"{"rates": {"USD": 1e300}}"#,
        ];

        for doc in cases {
            let result = RateTable::from_document(doc);
            assert!(
                matches!(result, Err(FxError::InvalidRateData(_))),
                "expected InvalidRateData for {}",
                doc
            );
        }
    }

    #[test]
    fn test_currencies_listing() {
        let table = RateTable::from_rates([
            (CurrencyCode::usd(), dec!(1)),
            (CurrencyCode::btc(), dec!(0.00002)),
            (CurrencyCode::ars(), dec!(1000)),
        ])
        .unwrap();

        let listed: Vec<String> = table
            .currencies()
            .into_iter()
            .map(|c| c.code.to_string())
            .collect();
        assert_eq!(listed, vec!["ARS", "BTC", "USD"]);
        assert!(table.currencies()[1].is_crypto());
    }

    #[tokio::test]
    async fn test_load_from_source() {
        let source = StaticRateSource::new("static", r#"{"rates": {"USD": 1, "EUR": 0.92}}"#);
        let table = RateTable::load(&source).await.unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.contains(&CurrencyCode::eur()));
    }

    #[tokio::test]
    async fn test_load_keeps_validation_error() {
        let source = StaticRateSource::new("static", r#"{"rates": {}}"#);
        let result = RateTable::load(&source).await;
        assert!(matches!(result, Err(FxError::InvalidRateData(_))));
    }
}
