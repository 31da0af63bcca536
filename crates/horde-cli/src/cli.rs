//! Command-line argument definitions.

use crate::actions::{ConfigAction, VfsAction};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Horde tools: aviation weather decoding and virtual filesystems.
#[derive(Parser, Debug)]
#[command(name = "horde")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty) [default: from config]
    #[arg(long = "format", global = true)]
    pub format: Option<String>,

    /// Unit system (metric, standard) [default: from config]
    #[arg(long = "units", global = true)]
    pub units: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long = "config", global = true, env = "HORDE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a METAR or SPECI observation.
    ///
    /// The report may be split across several arguments. Pass `-` to read
    /// it from stdin.
    ///
    /// # Examples
    ///
    /// ```bash
    /// horde metar KJFK 011151Z 31012KT 10SM FEW250 M02/M12 A3021
    /// curl -s https://tgftp.nws.noaa.gov/data/observations/metar/stations/EDDF.TXT | horde metar -
    /// ```
    Metar {
        /// Report text, or '-' for stdin
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        report: Vec<String>,

        /// Print every decoded field instead of the summary
        #[arg(long)]
        full: bool,
    },

    /// Decode a TAF terminal forecast.
    Taf {
        /// Report text, or '-' for stdin
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        report: Vec<String>,

        /// Print every decoded field instead of the summary
        #[arg(long)]
        full: bool,
    },

    /// Download and decode the latest report for a station.
    ///
    /// # Examples
    ///
    /// ```bash
    /// horde fetch EGLL
    /// horde fetch KBOS --taf --units standard
    /// ```
    Fetch {
        /// ICAO station identifier
        station: String,

        /// Fetch the forecast instead of the observation
        #[arg(long)]
        taf: bool,

        /// Print every decoded field instead of the summary
        #[arg(long)]
        full: bool,
    },

    /// Operate on a virtual filesystem.
    ///
    /// Backend, root and quota default to the `[vfs]` configuration section.
    ///
    /// # Examples
    ///
    /// ```bash
    /// horde vfs --backend file --root /tmp/vfs put /notes/todo.txt todo.txt --parents
    /// horde vfs --backend sql --root /tmp/vfs.sqlite ls / --recursive
    /// ```
    Vfs {
        /// Storage backend (memory, file, sql)
        #[arg(long)]
        backend: Option<String>,

        /// Host directory (file) or database file (sql)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Quota in bytes
        #[arg(long)]
        quota: Option<u64>,

        /// Operation to perform
        #[command(subcommand)]
        action: VfsAction,
    },

    /// Manage the configuration file.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_metar_words() {
        let cli = Cli::parse_from(["horde", "metar", "EDDF", "011150Z", "24012KT"]);
        if let Commands::Metar { report, full } = cli.command {
            assert_eq!(report, vec!["EDDF", "011150Z", "24012KT"]);
            assert!(!full);
        } else {
            panic!("Expected Metar command");
        }
    }

    #[test]
    fn test_cli_parsing_stdin_marker() {
        let cli = Cli::parse_from(["horde", "taf", "-"]);
        assert!(matches!(cli.command, Commands::Taf { ref report, .. } if report == &["-"]));
    }

    #[test]
    fn test_cli_parsing_fetch() {
        let cli = Cli::parse_from(["horde", "fetch", "kbos", "--taf"]);
        if let Commands::Fetch { station, taf, .. } = cli.command {
            assert_eq!(station, "kbos");
            assert!(taf);
        } else {
            panic!("Expected Fetch command");
        }
    }

    #[test]
    fn test_cli_parsing_vfs() {
        let cli = Cli::parse_from([
            "horde", "vfs", "--backend", "sql", "--root", "/tmp/db", "--quota", "1024", "ls", "/docs",
            "-r",
        ]);
        if let Commands::Vfs {
            backend,
            root,
            quota,
            action,
        } = cli.command
        {
            assert_eq!(backend.as_deref(), Some("sql"));
            assert_eq!(root, Some(PathBuf::from("/tmp/db")));
            assert_eq!(quota, Some(1024));
            assert!(matches!(action, VfsAction::Ls { recursive: true, .. }));
        } else {
            panic!("Expected Vfs command");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "horde", "config", "show", "--verbose", "--format", "json", "--units", "standard",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.format.as_deref(), Some("json"));
        assert_eq!(cli.units.as_deref(), Some("standard"));
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn test_cli_format_defaults_to_config() {
        let cli = Cli::parse_from(["horde", "config", "path"]);
        assert!(cli.format.is_none());
        assert!(cli.units.is_none());
    }

    #[test]
    fn test_cli_parsing_completions_zsh() {
        let cli = Cli::parse_from(["horde", "completions", "zsh"]);
        if let Commands::Completions { shell } = cli.command {
            assert_eq!(shell, Shell::Zsh);
        } else {
            panic!("Expected Completions command");
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
