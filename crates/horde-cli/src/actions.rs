//! Action type definitions for CLI commands.
//!
//! Defines the nested subcommand enums used by `vfs` and `config`.

use clap::Subcommand;
use std::path::PathBuf;

/// Virtual filesystem operations.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum VfsAction {
    /// List a folder
    Ls {
        /// Folder to list
        #[arg(default_value = "/")]
        path: String,

        /// Descend into subfolders
        #[arg(short, long)]
        recursive: bool,

        /// Include names starting with '.'
        #[arg(short, long)]
        all: bool,

        /// Show folders only
        #[arg(short = 'd', long)]
        folders_only: bool,

        /// Skip names matching this regular expression
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Print a file to stdout
    Cat {
        /// File to print
        path: String,
    },

    /// Store a host file, or stdin, at a virtual path
    Put {
        /// Destination path
        path: String,

        /// Host file to read ('-' or absent for stdin)
        source: Option<PathBuf>,

        /// Create missing parent folders
        #[arg(short, long)]
        parents: bool,
    },

    /// Create a folder
    Mkdir {
        /// Folder to create
        path: String,

        /// Create missing parent folders, no error if it exists
        #[arg(short, long)]
        parents: bool,
    },

    /// Delete a file or folder
    Rm {
        /// Path to delete
        path: String,

        /// Delete folders with their contents
        #[arg(short, long)]
        recursive: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Move or rename a file or folder
    Mv {
        /// Current path
        from: String,
        /// New path
        to: String,
    },

    /// Copy a file or folder
    Cp {
        /// Source path
        from: String,
        /// Destination path
        to: String,
    },

    /// Show the size of a file or the total size of a folder
    Du {
        /// File or folder
        #[arg(default_value = "/")]
        path: String,
    },

    /// Delete files in a folder that were not modified recently
    Gc {
        /// Folder to clean
        path: String,

        /// Age in hours above which files are deleted
        #[arg(long, default_value_t = 24)]
        older_than_hours: u32,
    },
}

/// Configuration management actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Get a single value
    Get {
        /// Configuration key (e.g. weather.units)
        key: String,
    },

    /// Set a single value
    Set {
        /// Configuration key (e.g. weather.units)
        key: String,
        /// New value ('none' clears optional values)
        value: String,
    },

    /// Print the configuration file location
    Path,
}
