//! Wallet balances per currency.

use std::collections::BTreeMap;

use fxwallet_common::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Non-negative balances keyed by currency. Absent entries read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<CurrencyCode, Decimal>);

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balances a fresh wallet starts with.
    pub fn seeded() -> Self {
        let seed = [
            ("USD", Decimal::new(1000, 0)),
            ("EUR", Decimal::new(500, 0)),
            ("ARS", Decimal::new(250000, 0)),
            ("BRL", Decimal::new(2000, 0)),
            ("CLP", Decimal::new(100000, 0)),
            ("UYU", Decimal::new(15000, 0)),
            ("BTC", Decimal::new(1, 2)),
            ("ETH", Decimal::new(4, 1)),
            ("USDT", Decimal::new(300, 0)),
            ("USDC", Decimal::new(150, 0)),
        ];

        Self(
            seed.into_iter()
                .filter_map(|(code, amount)| Some((CurrencyCode::parse(code).ok()?, amount)))
                .collect(),
        )
    }

    /// Balance for a code, zero when absent.
    pub fn get(&self, code: &CurrencyCode) -> Decimal {
        self.0.get(code).copied().unwrap_or(Decimal::ZERO)
    }

    /// Check if the wallet can cover `amount` of `code`.
    pub fn has_sufficient_funds(&self, code: &CurrencyCode, amount: Decimal) -> bool {
        self.get(code) >= amount
    }

    /// Move `debit` out of `from` and `credit` into `to`.
    ///
    /// Callers check funds first; the debit never drives a balance negative.
    /// Both legs are computed before either is written, so a failed credit
    /// leaves every balance as it was.
    pub(crate) fn transfer(
        &mut self,
        from: &CurrencyCode,
        debit: Decimal,
        to: &CurrencyCode,
        credit: Decimal,
    ) -> LedgerResult<()> {
        debug_assert!(self.has_sufficient_funds(from, debit));
        debug_assert!(from != to);
        let debited = self
            .get(from)
            .checked_sub(debit)
            .ok_or_else(|| LedgerError::BalanceOverflow(from.clone()))?;
        let credited = self
            .get(to)
            .checked_add(credit)
            .ok_or_else(|| LedgerError::BalanceOverflow(to.clone()))?;

        self.0.insert(from.clone(), debited);
        self.0.insert(to.clone(), credited);
        Ok(())
    }

    /// First entry holding a negative amount, if any.
    pub fn first_negative(&self) -> Option<(&CurrencyCode, &Decimal)> {
        self.0.iter().find(|(_, amount)| **amount < Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(CurrencyCode, Decimal)> for Balances {
    fn from_iter<I: IntoIterator<Item = (CurrencyCode, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
