//! FxWallet FX Engine
//!
//! Rate table and USD-pivot conversion for FxWallet.
//!
//! # Features
//!
//! - Rate document parsing and validation
//! - Pluggable rate sources loaded once at startup
//! - Pure, unrounded pivot conversion
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fxwallet_fx::{ConversionEngine, FileRateSource, RateTable};
//!
//! let rates = RateTable::load(&FileRateSource::new("data/rates.json")).await?;
//! let engine = ConversionEngine::new(Arc::new(rates));
//!
//! let ars = engine.convert(dec!(100), &CurrencyCode::usd(), &CurrencyCode::ars())?;
//! ```

pub mod engine;
pub mod error;
pub mod rates;
pub mod source;

pub use engine::ConversionEngine;
pub use error::{FxError, FxResult};
pub use rates::RateTable;
pub use source::{FileRateSource, RateSource, StaticRateSource};
