//! FxWallet Ledger
//!
//! Wallet balances, conversion history and session profile, with fail-soft
//! persistence through an injected key-value store.

pub mod balance;
pub mod error;
pub mod history;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use balance::Balances;
pub use error::{LedgerError, LedgerResult};
pub use history::{HistoryFilter, HistoryRecord};
pub use snapshot::{CorruptField, LedgerSnapshot, LoadReport};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult, STORAGE_KEY};
pub use store::{amount_from_f64, ConversionRequest, LedgerStore, SharedLedger};
