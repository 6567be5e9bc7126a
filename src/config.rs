use crate::domain::settlement::{ExecutionMode, SimulatedSettlement};
use crate::logging::LogFormat;
use clap::Parser;
use clap::builder::BoolishValueParser;
use std::path::PathBuf;

/// Command line and environment configuration for the `paygate` binary.
///
/// Environment variables are read once here; the workflow only ever sees the
/// resulting [`ExecutionMode`].
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Input checkouts CSV file
    pub input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Settle with a fixed delay and outcome instead of random draws
    #[arg(long, env = "TEST_MODE")]
    pub deterministic: bool,

    /// Force every settlement to succeed (true) or be declined (false)
    #[arg(long, env = "TEST_PAYMENT_SUCCESS", value_parser = BoolishValueParser::new())]
    pub payment_success: Option<bool>,

    /// Force the settlement delay, in milliseconds
    #[arg(long, env = "TEST_PROCESSING_DELAY")]
    pub processing_delay_ms: Option<u64>,

    /// Seed for the settlement RNG, for reproducible runs
    #[arg(long, env = "PAYGATE_SEED")]
    pub seed: Option<u64>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn execution_mode(&self) -> ExecutionMode {
        ExecutionMode {
            deterministic: self.deterministic,
            success_override: self.payment_success,
            delay_override_ms: self.processing_delay_ms,
        }
    }

    pub fn settlement(&self) -> SimulatedSettlement {
        match self.seed {
            Some(seed) => SimulatedSettlement::seeded(self.execution_mode(), seed),
            None => SimulatedSettlement::new(self.execution_mode()),
        }
    }
}
