//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use horde_core::cli::ExitCode;
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::{Arg, Command};
/// use clap_complete::Shell;
/// use horde_cli::commands::completions::generate_completions;
///
/// let mut cmd = Command::new("horde").subcommand(Command::new("metar"));
/// let mut script = Vec::new();
/// generate_completions(Shell::Bash, &mut cmd, &mut script);
///
/// assert!(String::from_utf8(script).unwrap().contains("metar"));
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    info!("Generating {} completions", shell);
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Errors
///
/// Never fails; the `Result` keeps the signature in line with the other
/// commands.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    generate_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::CommandFactory;

    fn script(shell: Shell) -> String {
        let mut cmd = Cli::command();
        let mut out = Vec::new();
        generate_completions(shell, &mut cmd, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_generate_completions_bash() {
        let script = script(Shell::Bash);
        assert!(script.contains("horde"));
        assert!(script.contains("fetch"));
    }

    #[test]
    fn test_generate_completions_zsh() {
        assert!(script(Shell::Zsh).contains("#compdef horde"));
    }

    #[test]
    fn test_generate_completions_fish() {
        assert!(script(Shell::Fish).contains("complete -c horde"));
    }

    #[test]
    fn test_generate_completions_powershell() {
        assert!(!script(Shell::PowerShell).is_empty());
    }
}
