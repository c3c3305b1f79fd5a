//! Error types shared across FxWallet crates.

use thiserror::Error;

/// A currency code failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyCodeError {
    /// Empty or whitespace-only code.
    #[error("Currency code cannot be empty")]
    Empty,

    /// Code contains something other than ASCII letters and digits.
    #[error("Invalid character {character:?} in currency code {code:?}")]
    InvalidCharacter { code: String, character: char },
}
