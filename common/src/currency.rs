//! Currency identifiers and metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CurrencyCodeError;

/// Codes classified as crypto-assets. Everything else is treated as fiat.
pub const CRYPTO_CODES: [&str; 4] = ["BTC", "ETH", "USDT", "USDC"];

/// Currency code such as `USD` or `BTC`, always stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a code, normalizing it to upper-case.
    pub fn parse(code: impl AsRef<str>) -> Result<Self, CurrencyCodeError> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(CurrencyCodeError::Empty);
        }
        if let Some(c) = code.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(CurrencyCodeError::InvalidCharacter {
                code: code.to_string(),
                character: c,
            });
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Kind of asset this code denotes.
    pub fn kind(&self) -> CurrencyKind {
        CurrencyKind::classify(self)
    }

    /// Whether the code denotes a crypto-asset.
    pub fn is_crypto(&self) -> bool {
        self.kind() == CurrencyKind::Crypto
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    pub fn ars() -> Self {
        Self("ARS".to_string())
    }

    pub fn btc() -> Self {
        Self("BTC".to_string())
    }

    pub fn eth() -> Self {
        Self("ETH".to_string())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether a currency is government-issued or a crypto-asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

impl CurrencyKind {
    /// Classify a code. Depends on the code alone, so codes missing from the
    /// current rate table still classify.
    pub fn classify(code: &CurrencyCode) -> Self {
        if CRYPTO_CODES.contains(&code.as_str()) {
            CurrencyKind::Crypto
        } else {
            CurrencyKind::Fiat
        }
    }

    /// Decimal places the front end uses when showing a balance.
    pub fn display_places(&self) -> u32 {
        match self {
            CurrencyKind::Fiat => 2,
            CurrencyKind::Crypto => 6,
        }
    }
}

impl fmt::Display for CurrencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyKind::Fiat => write!(f, "Fiat"),
            CurrencyKind::Crypto => write!(f, "Crypto"),
        }
    }
}

/// A listed currency with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: CurrencyCode,
    pub display_name: String,
    pub kind: CurrencyKind,
}

impl Currency {
    /// Build metadata for a code from the built-in catalog.
    pub fn from_code(code: CurrencyCode) -> Self {
        let display_name = display_name(&code).to_string();
        let kind = code.kind();
        Self {
            code,
            display_name,
            kind,
        }
    }

    pub fn is_crypto(&self) -> bool {
        self.kind == CurrencyKind::Crypto
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code, self.display_name)
    }
}

/// Human readable name for a code; unknown codes fall back to the code.
pub fn display_name(code: &CurrencyCode) -> &str {
    match code.as_str() {
        "USD" => "US Dollar",
        "EUR" => "Euro",
        "ARS" => "Argentine Peso",
        "BRL" => "Brazilian Real",
        "CLP" => "Chilean Peso",
        "UYU" => "Uruguayan Peso",
        "BTC" => "Bitcoin",
        "ETH" => "Ethereum",
        "USDT" => "Tether",
        "USDC" => "USD Coin",
        other => other,
    }
}
