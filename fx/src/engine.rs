//! USD-pivot conversion engine.

use std::sync::Arc;

use fxwallet_common::{Currency, CurrencyCode};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use crate::error::{FxError, FxResult};
use crate::rates::RateTable;

/// Stateless conversion over a shared, immutable rate table.
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    rates: Arc<RateTable>,
}

impl ConversionEngine {
    pub fn new(rates: Arc<RateTable>) -> Self {
        Self { rates }
    }

    /// The rate table this engine converts with.
    pub fn rates(&self) -> &Arc<RateTable> {
        &self.rates
    }

    /// Currencies available for conversion.
    pub fn currencies(&self) -> Vec<Currency> {
        self.rates.currencies()
    }

    /// Convert `amount` of `from` into `to` through USD.
    ///
    /// Computes `amount / rate(from) * rate(to)` with no rounding. Same-currency
    /// requests are not rejected here.
    #[instrument(skip(self), fields(from = %from, to = %to, amount = %amount))]
    pub fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> FxResult<Decimal> {
        let rate_from = self.rates.lookup(from)?;
        let rate_to = self.rates.lookup(to)?;

        let in_usd = amount
            .checked_div(rate_from)
            .ok_or_else(|| overflow(from, to))?;
        let result = in_usd
            .checked_mul(rate_to)
            .ok_or_else(|| overflow(from, to))?;

        debug!(in_usd = %in_usd, result = %result, "Converted");

        Ok(result)
    }

    /// Units of `to` obtained for one unit of `from`.
    pub fn quote(&self, from: &CurrencyCode, to: &CurrencyCode) -> FxResult<Decimal> {
        self.convert(Decimal::ONE, from, to)
    }
}

fn overflow(from: &CurrencyCode, to: &CurrencyCode) -> FxError {
    FxError::ConversionOverflow {
        from: from.clone(),
        to: to.clone(),
    }
}
