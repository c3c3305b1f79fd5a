//! FxWallet Common Types
//!
//! Currency codes, their fiat/crypto classification and display metadata,
//! shared by the FX engine, the ledger and the front end.

pub mod currency;
pub mod error;

pub use currency::*;
pub use error::*;
