//! Front end configuration.

use std::path::PathBuf;

/// Main wallet configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Rate document read at startup.
    pub rates_path: PathBuf,
    /// Directory holding the persisted ledger.
    pub state_dir: PathBuf,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit logs as JSON lines.
    pub json_logs: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            rates_path: PathBuf::from("data/rates.json"),
            state_dir: PathBuf::from(".fxwallet"),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl WalletConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("FXWALLET_RATES_PATH") {
            config.rates_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("FXWALLET_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(json) = lookup("FXWALLET_JSON_LOGS") {
            config.json_logs = matches!(json.as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.rates_path.as_os_str().is_empty() {
            return Err("Rates path cannot be empty".to_string());
        }

        if self.state_dir.as_os_str().is_empty() {
            return Err("State directory cannot be empty".to_string());
        }

        if self.log_level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}
