//! Horde command-line tool.
//!
//! Decodes METAR and TAF weather reports, fetches them from the NOAA feed,
//! and operates on virtual filesystems backed by memory, a host directory
//! or an `SQLite` database.
//!
//! # Examples
//!
//! ```bash
//! # Decode an observation
//! horde metar KBOS 011154Z 27010KT 10SM FEW050 22/12 A3012
//!
//! # Latest forecast in US units, as JSON
//! horde fetch KBOS --taf --units standard --format json
//!
//! # Store a file in an SQLite-backed filesystem
//! horde vfs --backend sql --root ~/horde.sqlite put /notes/todo.txt todo.txt -p
//! ```

use clap::Parser;
use colored::Colorize;
use horde_cli::cli::Cli;
use horde_cli::runner::{Settings, execute_command, exit_code_for, init_logging};
use horde_core::cli::ExitCode;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            exit_code_for(&e)
        }
    };

    // Exit with appropriate code
    std::process::exit(exit_code.as_i32());
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = Settings::resolve(cli.format.as_deref(), cli.units.as_deref(), cli.config)?;

    init_logging(cli.verbose, &settings.config.general.log_level)?;

    execute_command(cli.command, &settings).await
}
