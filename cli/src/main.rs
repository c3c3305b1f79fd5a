//! FxWallet command line front end.
//!
//! Loads rates and the stored ledger, runs one command, and persists the
//! ledger when the command changed it.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fxwallet_common::CurrencyCode;
use fxwallet_fx::{ConversionEngine, FileRateSource, RateTable};
use fxwallet_ledger::{FileStorage, HistoryFilter, LedgerError, LedgerStore};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod format;

use commands::Outcome;
use config::WalletConfig;

/// FxWallet CLI
#[derive(Parser, Debug)]
#[command(name = "fxwallet")]
#[command(about = "Multi-currency wallet with fiat and crypto conversions")]
struct Args {
    /// Rate document to load
    #[arg(long, global = true)]
    rates: Option<PathBuf>,

    /// Directory holding the persisted ledger
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported currencies
    Currencies,
    /// Show wallet balances
    Balances,
    /// Convert an amount between two currencies
    Convert {
        from: CurrencyCode,
        to: CurrencyCode,
        amount: String,
        /// Move funds in the wallet instead of only simulating
        #[arg(long)]
        apply: bool,
    },
    /// List past conversions, newest first
    History {
        #[arg(long, default_value = "all")]
        filter: HistoryFilter,
    },
    /// Show or set the profile name
    Profile { name: Option<String> },
}

fn init_logging(config: &WalletConfig) {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn dispatch(ledger: &mut LedgerStore, command: Command) -> Result<Outcome, LedgerError> {
    match command {
        Command::Currencies => Ok(commands::currencies(ledger)),
        Command::Balances => Ok(commands::balances(ledger)),
        Command::Convert {
            from,
            to,
            amount,
            apply,
        } => commands::convert(ledger, &from, &to, &amount, apply),
        Command::History { filter } => Ok(commands::history(ledger, filter)),
        Command::Profile { name } => commands::profile(ledger, name.as_deref()),
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let mut config = WalletConfig::from_env();
    if let Some(rates) = args.rates {
        config.rates_path = rates;
    }
    if let Some(dir) = args.state_dir {
        config.state_dir = dir;
    }
    config.json_logs |= args.json_logs;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    init_logging(&config);

    info!(rates = %config.rates_path.display(), "Starting FxWallet");

    let rates = RateTable::load(&FileRateSource::new(&config.rates_path))
        .await
        .with_context(|| format!("loading rates from {}", config.rates_path.display()))?;
    let engine = ConversionEngine::new(Arc::new(rates));

    let storage = FileStorage::new(&config.state_dir);
    let mut ledger = LedgerStore::with_defaults(engine);
    ledger
        .restore_from(&storage)
        .context("reading stored ledger")?;

    match dispatch(&mut ledger, args.command) {
        Ok(outcome) => {
            print!("{}", outcome.output);
            if outcome.mutated {
                ledger
                    .persist_to(&storage)
                    .context("saving ledger state")?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_user_correctable() => {
            warn!(code = e.error_code(), "Request rejected: {}", e);
            eprintln!("{}", format::user_message(&e));
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    run(args).await
}
