//! Virtual filesystem command.
//!
//! Opens the backend selected by flags or the `[vfs]` configuration
//! section, optionally under a byte quota, and performs one operation on it.
//!
//! The memory backend lives only for the duration of the command, which
//! makes it useful for trying out options but not for keeping data.

use super::common::print_output;
use crate::actions::VfsAction;
use crate::runner::Settings;
use anyhow::{Context, Result, bail};
use chrono::{Duration, SecondsFormat, Utc};
use colored::Colorize;
use dialoguer::Confirm;
use horde_core::VfsConfig;
use horde_core::cli::ExitCode;
use horde_core::config::VfsBackendKind;
use horde_vfs::{
    EntryKind, FileVfs, ListOptions, MemoryVfs, QuotaLimit, QuotaMetric, QuotaVfs, SqlVfs, Vfs,
    VfsEntry, VfsError, VfsPath,
};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Backend selection from the command line. Unset fields fall back to the
/// configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendOptions {
    /// Backend name (memory, file, sql)
    pub backend: Option<String>,
    /// Host directory or database file
    pub root: Option<PathBuf>,
    /// Quota in bytes
    pub quota: Option<u64>,
}

/// Opens the selected backend, wrapped in a quota when one is set.
///
/// # Errors
///
/// Returns an error if the backend name is unknown, a file or SQL backend
/// has no root, the quota is zero, or the storage cannot be opened.
///
/// # Examples
///
/// ```
/// use horde_cli::commands::vfs::{BackendOptions, open_backend};
/// use horde_core::VfsConfig;
/// use horde_vfs::VfsPath;
///
/// let options = BackendOptions {
///     backend: Some("memory".to_string()),
///     ..BackendOptions::default()
/// };
/// let mut vfs = open_backend(&options, &VfsConfig::default()).unwrap();
/// vfs.write(&VfsPath::new("/a").unwrap(), b"x").unwrap();
/// ```
pub fn open_backend(options: &BackendOptions, config: &VfsConfig) -> Result<Box<dyn Vfs>> {
    let kind = match &options.backend {
        Some(name) => name.parse::<VfsBackendKind>()?,
        None => config.backend,
    };
    let root = options.root.as_ref().or(config.root.as_ref());
    let quota = options.quota.or(config.quota_bytes);

    let backend: Box<dyn Vfs> = match (kind, root) {
        (VfsBackendKind::Memory, _) => {
            warn!("Using the memory backend; contents are discarded when the command exits");
            Box::new(MemoryVfs::new())
        }
        (VfsBackendKind::File, Some(root)) => Box::new(
            FileVfs::new(root)
                .with_context(|| format!("failed to open directory {}", root.display()))?,
        ),
        (VfsBackendKind::Sql, Some(root)) => Box::new(
            SqlVfs::open(root)
                .with_context(|| format!("failed to open database {}", root.display()))?,
        ),
        (kind, None) => bail!("the {kind} backend needs --root or vfs.root"),
    };
    debug!(backend = %kind, root = ?root, quota = ?quota, "Opened filesystem");

    match quota {
        Some(bytes) => {
            let limit = QuotaLimit::new(bytes, QuotaMetric::Bytes)?;
            Ok(Box::new(QuotaVfs::new(backend, limit)))
        }
        None => Ok(backend),
    }
}

/// One listed entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntryRow {
    /// Full path
    pub path: String,
    /// `file` or `folder`
    pub kind: &'static str,
    /// Size in bytes
    pub size: u64,
    /// Modification time, RFC 3339
    pub modified: String,
}

impl From<&VfsEntry> for EntryRow {
    fn from(entry: &VfsEntry) -> Self {
        Self {
            path: entry.path.to_string(),
            kind: kind_name(entry.kind),
            size: entry.size,
            modified: entry.modified.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Result of `ls`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Listing {
    /// Listed folder
    pub path: String,
    /// Number of entries
    pub count: usize,
    /// Entries sorted by path
    pub entries: Vec<EntryRow>,
}

/// Result of a modifying operation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OperationResult {
    /// Whether the operation completed
    pub success: bool,
    /// Human-readable message
    pub message: String,
    /// Affected path
    pub path: String,
}

impl OperationResult {
    fn done(path: &VfsPath, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            path: path.to_string(),
        }
    }
}

/// Result of `du`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiskUsage {
    /// Measured path
    pub path: String,
    /// `file` or `folder`
    pub kind: &'static str,
    /// Total bytes
    pub bytes: u64,
}

/// Result of `gc`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GcResult {
    /// Cleaned folder
    pub path: String,
    /// Files deleted
    pub deleted: usize,
    /// Files modified before this time were deleted
    pub cutoff: String,
}

/// What an operation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Folder listing
    Listing(Listing),
    /// Raw file contents
    Content(Vec<u8>),
    /// Modifying operation
    Done(OperationResult),
    /// Size report
    Usage(DiskUsage),
    /// Cleanup report
    Gc(GcResult),
}

const fn kind_name(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "file",
        EntryKind::Folder => "folder",
    }
}

fn read_source(source: Option<&Path>) -> Result<Vec<u8>> {
    match source {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut data = Vec::new();
            io::stdin()
                .read_to_end(&mut data)
                .context("failed to read stdin")?;
            Ok(data)
        }
    }
}

/// Performs `action` on `vfs`.
///
/// Recursive deletion is not confirmed here; [`run`] asks before calling.
///
/// # Errors
///
/// Returns an error for invalid paths or patterns and any error the
/// backend reports.
pub fn apply(vfs: &mut dyn Vfs, action: VfsAction) -> Result<Outcome> {
    match action {
        VfsAction::Ls {
            path,
            recursive,
            all,
            folders_only,
            exclude,
        } => {
            let path = VfsPath::new(&path)?;
            let mut options = ListOptions::new();
            if recursive {
                options = options.recursive();
            }
            if all {
                options = options.with_dotfiles();
            }
            if folders_only {
                options = options.folders_only();
            }
            if let Some(pattern) = exclude {
                let regex = Regex::new(&pattern)
                    .with_context(|| format!("invalid exclude pattern '{pattern}'"))?;
                options = options.exclude(regex);
            }

            let entries: Vec<EntryRow> = vfs
                .list_folder(&path, &options)?
                .iter()
                .map(EntryRow::from)
                .collect();
            Ok(Outcome::Listing(Listing {
                path: path.to_string(),
                count: entries.len(),
                entries,
            }))
        }
        VfsAction::Cat { path } => Ok(Outcome::Content(vfs.read(&VfsPath::new(&path)?)?)),
        VfsAction::Put {
            path,
            source,
            parents,
        } => {
            let path = VfsPath::new(&path)?;
            let data = read_source(source.as_deref())?;
            if parents {
                vfs.write_autocreate(&path, &data)?;
            } else {
                vfs.write(&path, &data)?;
            }
            info!(path = %path, bytes = data.len(), "Stored file");
            Ok(Outcome::Done(OperationResult::done(
                &path,
                format!("Stored {} bytes", data.len()),
            )))
        }
        VfsAction::Mkdir { path, parents } => {
            let path = VfsPath::new(&path)?;
            if parents {
                vfs.autocreate_path(&path)?;
            } else {
                vfs.create_folder(&path)?;
            }
            Ok(Outcome::Done(OperationResult::done(&path, "Folder created")))
        }
        VfsAction::Rm {
            path, recursive, ..
        } => {
            let path = VfsPath::new(&path)?;
            let entry = vfs
                .entry(&path)?
                .ok_or_else(|| VfsError::NotFound {
                    path: path.to_string(),
                })?;
            if entry.is_folder() {
                vfs.delete_folder(&path, recursive)?;
            } else {
                vfs.delete_file(&path)?;
            }
            info!(path = %path, "Deleted");
            Ok(Outcome::Done(OperationResult::done(&path, "Deleted")))
        }
        VfsAction::Mv { from, to } => {
            let (from, to) = (VfsPath::new(&from)?, VfsPath::new(&to)?);
            vfs.move_entry(&from, &to)?;
            Ok(Outcome::Done(OperationResult::done(&to, format!("Moved from {from}"))))
        }
        VfsAction::Cp { from, to } => {
            let (from, to) = (VfsPath::new(&from)?, VfsPath::new(&to)?);
            vfs.copy(&from, &to)?;
            Ok(Outcome::Done(OperationResult::done(&to, format!("Copied from {from}"))))
        }
        VfsAction::Du { path } => {
            let path = VfsPath::new(&path)?;
            let entry = vfs
                .entry(&path)?
                .ok_or_else(|| VfsError::NotFound {
                    path: path.to_string(),
                })?;
            let bytes = if entry.is_folder() {
                vfs.folder_size(&path)?
            } else {
                entry.size
            };
            Ok(Outcome::Usage(DiskUsage {
                path: path.to_string(),
                kind: kind_name(entry.kind),
                bytes,
            }))
        }
        VfsAction::Gc {
            path,
            older_than_hours,
        } => {
            let path = VfsPath::new(&path)?;
            let cutoff = Duration::try_hours(i64::from(older_than_hours))
                .and_then(|age| Utc::now().checked_sub_signed(age))
                .ok_or_else(|| {
                    horde_core::Error::InvalidArgument(format!(
                        "--older-than-hours {older_than_hours} reaches past the earliest representable time"
                    ))
                })?;
            let deleted = vfs.gc(&path, cutoff)?;
            Ok(Outcome::Gc(GcResult {
                path: path.to_string(),
                deleted,
                cutoff: cutoff.to_rfc3339_opts(SecondsFormat::Secs, true),
            }))
        }
    }
}

/// Runs the vfs command.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened or the operation fails.
pub fn run(options: &BackendOptions, action: VfsAction, settings: &Settings) -> Result<ExitCode> {
    let mut vfs = open_backend(options, &settings.config.vfs)?;

    if let VfsAction::Rm {
        path,
        recursive: true,
        yes: false,
    } = &action
    {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete '{path}' and everything in it?"))
            .default(false)
            .interact()
            .context("failed to read confirmation")?;

        if !confirmed {
            println!("{}", "Cancelled.".yellow());
            return Ok(ExitCode::SUCCESS);
        }
    }

    match apply(vfs.as_mut(), action)? {
        Outcome::Content(data) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data).context("failed to write to stdout")?;
            stdout.flush().context("failed to write to stdout")?;
        }
        Outcome::Listing(listing) => print_output(&listing, settings.format)?,
        Outcome::Done(result) => print_output(&result, settings.format)?,
        Outcome::Usage(usage) => print_output(&usage, settings.format)?,
        Outcome::Gc(result) => print_output(&result, settings.format)?,
    }

    Ok(ExitCode::SUCCESS)
}
