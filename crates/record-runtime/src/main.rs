//! Record Runtime: dispatch one ledger invocation from the command line.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use record_runtime::{init_logging, run, RuntimeConfig};

/// Record Runtime: test assignment and grading ledger
#[derive(Parser, Debug)]
#[command(name = "record-runtime")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ledger file (overrides RECORD_DATA_FILE)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Log filter directive (overrides RECORD_LOG_LEVEL / RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON logs (overrides RECORD_JSON_LOGS)
    #[arg(long)]
    json_logs: bool,

    /// Operation name, e.g. initLedger or deliveryItem
    function: String,

    /// Positional operation arguments
    args: Vec<String>,
}

impl Cli {
    fn into_config(self) -> Result<(RuntimeConfig, String, Vec<String>)> {
        let mut config = RuntimeConfig::from_env().context("Invalid runtime configuration")?;
        if let Some(path) = self.data_file {
            config.data_file = path;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.json_logs {
            config.json_logs = true;
        }
        Ok((config, self.function, self.args))
    }
}

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<ExitCode> {
    let (config, function, args) = Cli::parse().into_config()?;
    init_logging(&config)?;

    let response = run(&config, &function, &args)?;
    if !response.is_ok() {
        eprintln!("{}", response.message);
        return Ok(ExitCode::FAILURE);
    }

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&response.payload)
        .context("Failed to write payload")?;
    if !response.payload.is_empty() {
        writeln!(stdout).context("Failed to write payload")?;
    }
    Ok(ExitCode::SUCCESS)
}
