//! Host directory backend.
//!
//! Every virtual path maps below a root directory on the host. Writes go to
//! a hidden temporary sibling first and are renamed into place, so readers
//! never observe a partially written file.

use crate::backend::{Vfs, check_rename, require_folder};
use crate::types::{ListOptions, Result, VfsEntry, VfsError, VfsPath};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A virtual filesystem stored in a host directory.
///
/// # Examples
///
/// ```no_run
/// use horde_vfs::{FileVfs, Vfs, VfsPath};
///
/// let mut vfs = FileVfs::new("/var/lib/horde/vfs").unwrap();
/// vfs.write_autocreate(&VfsPath::new("/users/alice/avatar.png").unwrap(), &[0x89, 0x50]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileVfs {
    root: PathBuf,
}

impl FileVfs {
    /// Opens a filesystem rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::Io` if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| VfsError::Io {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Host directory backing the virtual root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host location of a virtual path.
    #[must_use]
    pub fn host_path(&self, path: &VfsPath) -> PathBuf {
        let mut host = self.root.clone();
        host.extend(path.components());
        host
    }
}

fn io_error(path: &VfsPath, source: io::Error) -> VfsError {
    if source.kind() == io::ErrorKind::NotFound {
        VfsError::not_found(path)
    } else {
        VfsError::Io {
            path: path.to_string(),
            source,
        }
    }
}

fn describe(path: VfsPath, metadata: &fs::Metadata) -> VfsEntry {
    let modified = metadata
        .modified()
        .map_or_else(|_| DateTime::<Utc>::default(), DateTime::<Utc>::from);
    if metadata.is_dir() {
        VfsEntry::folder(path, modified)
    } else {
        VfsEntry::file(path, metadata.len(), modified)
    }
}

/// Writes to a temporary sibling, syncs it and renames it over `target`.
fn write_atomic(target: &Path, data: &[u8]) -> io::Result<()> {
    let name = target.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let temp = target.with_file_name(format!(".{name}.{}.tmp", std::process::id()));

    let result = fs::File::create(&temp).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    let result = result.and_then(|()| fs::rename(&temp, target));
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

impl Vfs for FileVfs {
    fn read(&self, path: &VfsPath) -> Result<Vec<u8>> {
        let host = self.host_path(path);
        if host.is_dir() {
            return Err(VfsError::expected_file(path));
        }
        fs::read(&host).map_err(|err| io_error(path, err))
    }

    fn write(&mut self, path: &VfsPath, data: &[u8]) -> Result<()> {
        let parent = path.parent().ok_or_else(|| VfsError::expected_file(path))?;
        require_folder(&*self, &parent)?;

        let host = self.host_path(path);
        if host.is_dir() {
            return Err(VfsError::expected_file(path));
        }
        debug!(%path, bytes = data.len(), host = %host.display(), "file write");
        write_atomic(&host, data).map_err(|source| VfsError::Io {
            path: path.to_string(),
            source,
        })
    }

    fn delete_file(&mut self, path: &VfsPath) -> Result<()> {
        match self.entry(path)? {
            Some(entry) if entry.is_file() => {
                fs::remove_file(self.host_path(path)).map_err(|err| io_error(path, err))
            }
            Some(_) => Err(VfsError::expected_file(path)),
            None => Err(VfsError::not_found(path)),
        }
    }

    fn create_folder(&mut self, path: &VfsPath) -> Result<()> {
        if self.exists(path)? {
            return Err(VfsError::already_exists(path));
        }
        if let Some(parent) = path.parent() {
            require_folder(&*self, &parent)?;
        }
        fs::create_dir(self.host_path(path)).map_err(|err| io_error(path, err))
    }

    fn delete_folder(&mut self, path: &VfsPath, recursive: bool) -> Result<()> {
        if path.is_root() {
            return Err(VfsError::invalid(path));
        }
        require_folder(&*self, path)?;

        let host = self.host_path(path);
        if recursive {
            return fs::remove_dir_all(&host).map_err(|err| io_error(path, err));
        }
        let mut children = fs::read_dir(&host).map_err(|err| io_error(path, err))?;
        if children.next().is_some() {
            return Err(VfsError::FolderNotEmpty {
                path: path.to_string(),
            });
        }
        fs::remove_dir(&host).map_err(|err| io_error(path, err))
    }

    fn rename(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        check_rename(&*self, from, to)?;
        fs::rename(self.host_path(from), self.host_path(to)).map_err(|err| io_error(from, err))
    }

    fn list_folder(&self, path: &VfsPath, options: &ListOptions) -> Result<Vec<VfsEntry>> {
        require_folder(self, path)?;

        let host = self.host_path(path);
        let depth = if options.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(&host).min_depth(1).max_depth(depth).into_iter();

        let mut listing = Vec::new();
        for item in walker.filter_entry(|item| {
            item.depth() == 0 || item.file_name().to_str().is_some_and(|name| options.admits_name(name))
        }) {
            let item = item.map_err(|err| io_error(path, err.into()))?;
            let Some(relative) = item.path().strip_prefix(&host).ok().and_then(Path::to_str) else {
                warn!(host = %item.path().display(), "skipping entry with a non UTF-8 name");
                continue;
            };
            let metadata = item.metadata().map_err(|err| io_error(path, err.into()))?;
            let entry = describe(path.join(relative)?, &metadata);
            if options.accepts(&entry) {
                listing.push(entry);
            }
        }

        listing.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(listing)
    }

    fn entry(&self, path: &VfsPath) -> Result<Option<VfsEntry>> {
        match fs::metadata(self.host_path(path)) {
            Ok(metadata) => Ok(Some(describe(path.clone(), &metadata))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(path, err)),
        }
    }
}
