//! Ledger store: validated conversions, wallet balances and history.

use std::collections::VecDeque;
use std::sync::Arc;

use fxwallet_common::{Currency, CurrencyCode};
use fxwallet_fx::ConversionEngine;
use parking_lot::Mutex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::balance::Balances;
use crate::error::{LedgerError, LedgerResult};
use crate::history::{HistoryFilter, HistoryRecord};
use crate::snapshot::{LedgerSnapshot, LoadReport};
use crate::storage::{Storage, STORAGE_KEY};

/// Ledger shared across threads. All operations run behind the one lock.
pub type SharedLedger = Arc<Mutex<LedgerStore>>;

/// A conversion the caller wants executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: Decimal,
    pub apply_to_wallet: bool,
}

impl ConversionRequest {
    /// Simulated conversion that leaves balances alone.
    pub fn new(from: CurrencyCode, to: CurrencyCode, amount: Decimal) -> Self {
        Self {
            from,
            to,
            amount,
            apply_to_wallet: false,
        }
    }

    /// Move wallet balances when the conversion completes.
    pub fn applied(mut self) -> Self {
        self.apply_to_wallet = true;
        self
    }
}

/// Convert a float amount, rejecting NaN, infinities and non-positive values.
pub fn amount_from_f64(value: f64) -> LedgerResult<Decimal> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LedgerError::InvalidAmount(value.to_string()));
    }
    Decimal::from_f64(value).ok_or_else(|| LedgerError::InvalidAmount(value.to_string()))
}

/// Owns the wallet balances, the conversion history and the session profile.
///
/// Every operation validates before it mutates, so a failed call leaves the
/// store exactly as it was.
#[derive(Debug)]
pub struct LedgerStore {
    engine: ConversionEngine,
    balances: Balances,
    history: VecDeque<HistoryRecord>,
    user_name: String,
}

impl LedgerStore {
    /// Create an empty ledger.
    pub fn new(engine: ConversionEngine) -> Self {
        Self::with_balances(engine, Balances::new())
    }

    /// Create a ledger holding the default starting balances.
    pub fn with_defaults(engine: ConversionEngine) -> Self {
        Self::with_balances(engine, Balances::seeded())
    }

    pub fn with_balances(engine: ConversionEngine, balances: Balances) -> Self {
        Self {
            engine,
            balances,
            history: VecDeque::new(),
            user_name: String::new(),
        }
    }

    /// Wrap the ledger for use from several threads.
    pub fn into_shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }

    /// Validate and execute a conversion, returning the new history record.
    ///
    /// Checks, in order: distinct currencies, a positive amount, and when
    /// `apply_to_wallet` is set, enough funds in `from`.
    #[instrument(skip(self))]
    pub fn request_conversion(
        &mut self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
        apply_to_wallet: bool,
    ) -> LedgerResult<HistoryRecord> {
        if from == to {
            return Err(LedgerError::SameCurrency(from.clone()));
        }

        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount.to_string()));
        }

        if apply_to_wallet && !self.balances.has_sufficient_funds(from, amount) {
            return Err(LedgerError::InsufficientBalance {
                currency: from.clone(),
                required: amount,
                available: self.balances.get(from),
            });
        }

        let result = self.engine.convert(amount, from, to)?;

        if apply_to_wallet {
            self.balances.transfer(from, amount, to, result)?;
        }

        let record = HistoryRecord::new(from.clone(), to.clone(), amount, result, apply_to_wallet);
        self.history.push_front(record.clone());

        info!(
            from = %from,
            to = %to,
            amount = %amount,
            result = %result,
            applied = apply_to_wallet,
            "Conversion completed"
        );

        Ok(record)
    }

    /// Execute a [`ConversionRequest`].
    pub fn execute(&mut self, request: &ConversionRequest) -> LedgerResult<HistoryRecord> {
        self.request_conversion(
            &request.from,
            &request.to,
            request.amount,
            request.apply_to_wallet,
        )
    }

    /// History records matching `filter`, newest first.
    pub fn list_history(
        &self,
        filter: HistoryFilter,
    ) -> impl Iterator<Item = &HistoryRecord> + '_ {
        self.history.iter().filter(move |record| filter.matches(record))
    }

    /// Most recent record, if any.
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.history.front()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Balance for a code, zero when absent.
    pub fn balance(&self, code: &CurrencyCode) -> Decimal {
        self.balances.get(code)
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    /// Currencies offered for conversion.
    pub fn currencies(&self) -> Vec<Currency> {
        self.engine.currencies()
    }

    pub fn engine(&self) -> &ConversionEngine {
        &self.engine
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Set the profile name. Surrounding whitespace is trimmed.
    pub fn set_user_name(&mut self, name: &str) -> LedgerResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidUserName);
        }
        self.user_name = name.to_string();
        info!(user_name = %self.user_name, "Profile name set");
        Ok(())
    }

    /// Copy of the persistable state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balances: self.balances.clone(),
            history: self.history.clone(),
            user_name: self.user_name.clone(),
        }
    }

    /// Serialize `{balances, history, userName}`.
    pub fn dump_state(&self) -> String {
        self.snapshot().encode()
    }

    /// Replace the state with a stored blob.
    ///
    /// Never fails: malformed fields fall back to empty defaults one by one and
    /// are listed in the returned report.
    #[instrument(skip_all, fields(bytes = blob.len()))]
    pub fn load_state(&mut self, blob: &str) -> LoadReport {
        let (snapshot, report) = LedgerSnapshot::decode(blob);

        for field in &report.corrupt {
            warn!(
                field = field.field_name(),
                reason = field.reason(),
                "PersistenceReadCorrupt: falling back to default"
            );
        }

        self.balances = snapshot.balances;
        self.history = snapshot.history;
        self.user_name = snapshot.user_name;

        info!(
            balances = self.balances.len(),
            history = self.history.len(),
            "Ledger state loaded"
        );

        report
    }

    /// Load the stored state if there is one.
    ///
    /// Returns `None` and keeps the current state when the key is absent.
    pub fn restore_from(&mut self, storage: &dyn Storage) -> LedgerResult<Option<LoadReport>> {
        match storage.get(STORAGE_KEY)? {
            Some(blob) => Ok(Some(self.load_state(&blob))),
            None => {
                info!("No stored state, keeping defaults");
                Ok(None)
            }
        }
    }

    /// Write the current state to storage.
    pub fn persist_to(&self, storage: &dyn Storage) -> LedgerResult<()> {
        storage.set(STORAGE_KEY, &self.dump_state())?;
        Ok(())
    }
}
