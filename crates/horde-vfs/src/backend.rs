//! The contract every storage backend implements.
//!
//! Backends provide eight primitives. Everything else (existence checks,
//! ranged reads, folder auto-creation, copies, garbage collection) is built
//! on those primitives here, so it behaves the same on every backend.
//!
//! # Examples
//!
//! ```
//! use horde_vfs::{MemoryVfs, Vfs, VfsPath};
//!
//! let mut vfs = MemoryVfs::new();
//! let path = VfsPath::new("/prefs/user/signature.txt").unwrap();
//!
//! vfs.write_autocreate(&path, b"-- \nsent from Horde").unwrap();
//!
//! assert!(vfs.is_folder(&VfsPath::new("/prefs/user").unwrap()).unwrap());
//! assert_eq!(vfs.read_range(&path, 4, 4).unwrap(), b"sent");
//! ```

use crate::types::{ListOptions, Result, VfsEntry, VfsError, VfsPath};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::debug;

/// A virtual filesystem backend.
///
/// Write operations take `&mut self`; backends are `Send` so they can be
/// handed to another thread, and can be boxed as `dyn Vfs`.
pub trait Vfs: fmt::Debug + Send {
    /// Reads the whole content of a file.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing exists at `path`, `IsAFolder` for folders.
    fn read(&self, path: &VfsPath) -> Result<Vec<u8>>;

    /// Creates or replaces a file. The parent folder must already exist.
    ///
    /// # Errors
    ///
    /// `NotFound` if the parent is missing, `NotAFolder` if the parent is a
    /// file, `IsAFolder` if `path` is a folder.
    fn write(&mut self, path: &VfsPath, data: &[u8]) -> Result<()>;

    /// Deletes a file.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing exists at `path`, `IsAFolder` for folders.
    fn delete_file(&mut self, path: &VfsPath) -> Result<()>;

    /// Creates a folder. The parent folder must already exist.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if anything exists at `path`, `NotFound` or
    /// `NotAFolder` for a bad parent.
    fn create_folder(&mut self, path: &VfsPath) -> Result<()>;

    /// Deletes a folder, and its contents when `recursive` is set.
    ///
    /// # Errors
    ///
    /// `FolderNotEmpty` for a non-recursive delete of a folder with children,
    /// `NotAFolder` for files, `InvalidPath` for the root.
    fn delete_folder(&mut self, path: &VfsPath, recursive: bool) -> Result<()>;

    /// Renames a file or folder. The destination must not exist and its
    /// parent must be a folder.
    ///
    /// # Errors
    ///
    /// `NotFound` if `from` is missing, `AlreadyExists` if `to` exists,
    /// `InvalidPath` when moving the root or moving a folder into itself.
    fn rename(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()>;

    /// Lists a folder, sorted by path.
    ///
    /// # Errors
    ///
    /// `NotFound` if the folder is missing, `NotAFolder` for files.
    fn list_folder(&self, path: &VfsPath, options: &ListOptions) -> Result<Vec<VfsEntry>>;

    /// Describes whatever exists at `path`.
    ///
    /// # Errors
    ///
    /// Only storage failures; a missing path is `Ok(None)`.
    fn entry(&self, path: &VfsPath) -> Result<Option<VfsEntry>>;

    /// Returns `true` if a file or folder exists at `path`.
    ///
    /// # Errors
    ///
    /// Storage failures only.
    fn exists(&self, path: &VfsPath) -> Result<bool> {
        Ok(self.entry(path)?.is_some())
    }

    /// Returns `true` if a folder exists at `path`.
    ///
    /// # Errors
    ///
    /// Storage failures only.
    fn is_folder(&self, path: &VfsPath) -> Result<bool> {
        Ok(self.entry(path)?.is_some_and(|entry| entry.is_folder()))
    }

    /// Size of a file in bytes.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing exists at `path`, `IsAFolder` for folders.
    fn size(&self, path: &VfsPath) -> Result<u64> {
        match self.entry(path)? {
            Some(entry) if entry.is_file() => Ok(entry.size),
            Some(_) => Err(VfsError::expected_file(path)),
            None => Err(VfsError::not_found(path)),
        }
    }

    /// Reads up to `len` bytes starting at `offset`.
    ///
    /// Reading past the end returns the available bytes, possibly none.
    ///
    /// # Errors
    ///
    /// Same as [`Vfs::read`].
    fn read_range(&self, path: &VfsPath, offset: u64, len: usize) -> Result<Vec<u8>> {
        let data = self.read(path)?;
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(data.len());
        let end = start.saturating_add(len).min(data.len());
        Ok(data[start..end].to_vec())
    }

    /// Creates `path` and every missing folder above it.
    ///
    /// # Errors
    ///
    /// `NotAFolder` if a file sits anywhere on the way.
    fn autocreate_path(&mut self, path: &VfsPath) -> Result<()> {
        for folder in path.prefixes() {
            match self.entry(&folder)? {
                Some(entry) if entry.is_folder() => {}
                Some(_) => return Err(VfsError::not_a_folder(&folder)),
                None => {
                    debug!(path = %folder, "auto-creating folder");
                    self.create_folder(&folder)?;
                }
            }
        }
        Ok(())
    }

    /// Writes a file, creating missing parent folders first.
    ///
    /// # Errors
    ///
    /// Same as [`Vfs::autocreate_path`] and [`Vfs::write`].
    fn write_autocreate(&mut self, path: &VfsPath, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.autocreate_path(&parent)?;
        }
        self.write(path, data)
    }

    /// Copies a file, or a folder with everything below it.
    ///
    /// # Errors
    ///
    /// `NotFound` if `from` is missing, `AlreadyExists` if `to` exists,
    /// `InvalidPath` when copying a folder into itself.
    fn copy(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        let source = self.entry(from)?.ok_or_else(|| VfsError::not_found(from))?;
        if self.exists(to)? {
            return Err(VfsError::already_exists(to));
        }

        if source.is_file() {
            let data = self.read(from)?;
            return self.write(to, &data);
        }

        if to.starts_with(from) {
            return Err(VfsError::invalid(to));
        }
        let children = self.list_folder(from, &ListOptions::everything())?;
        self.create_folder(to)?;
        for child in children {
            let target = child.path.rebase(from, to)?;
            if child.is_folder() {
                self.create_folder(&target)?;
            } else {
                let data = self.read(&child.path)?;
                self.write(&target, &data)?;
            }
        }
        debug!(%from, %to, "copied folder");
        Ok(())
    }

    /// Moves a file or folder. Same as [`Vfs::rename`].
    ///
    /// # Errors
    ///
    /// Same as [`Vfs::rename`].
    fn move_entry(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        self.rename(from, to)
    }

    /// Deletes everything inside a folder, keeping the folder itself.
    ///
    /// # Errors
    ///
    /// Same as [`Vfs::list_folder`].
    fn empty_folder(&mut self, path: &VfsPath) -> Result<()> {
        for child in self.list_folder(path, &ListOptions::new().with_dotfiles())? {
            if child.is_folder() {
                self.delete_folder(&child.path, true)?;
            } else {
                self.delete_file(&child.path)?;
            }
        }
        Ok(())
    }

    /// Total size in bytes of every file below a folder.
    ///
    /// # Errors
    ///
    /// Same as [`Vfs::list_folder`].
    fn folder_size(&self, path: &VfsPath) -> Result<u64> {
        Ok(self
            .list_folder(path, &ListOptions::everything())?
            .iter()
            .filter(|entry| entry.is_file())
            .map(|entry| entry.size)
            .sum())
    }

    /// Deletes the files directly inside `path` that were last modified
    /// before `older_than`. Returns the number of deleted files.
    ///
    /// # Errors
    ///
    /// Same as [`Vfs::list_folder`].
    fn gc(&mut self, path: &VfsPath, older_than: DateTime<Utc>) -> Result<usize> {
        let stale: Vec<VfsPath> = self
            .list_folder(path, &ListOptions::new().with_dotfiles())?
            .into_iter()
            .filter(|entry| entry.is_file() && entry.modified < older_than)
            .map(|entry| entry.path)
            .collect();

        for file in &stale {
            self.delete_file(file)?;
        }
        debug!(%path, deleted = stale.len(), "garbage collected");
        Ok(stale.len())
    }
}

impl<V: Vfs + ?Sized> Vfs for Box<V> {
    fn read(&self, path: &VfsPath) -> Result<Vec<u8>> {
        (**self).read(path)
    }

    fn write(&mut self, path: &VfsPath, data: &[u8]) -> Result<()> {
        (**self).write(path, data)
    }

    fn delete_file(&mut self, path: &VfsPath) -> Result<()> {
        (**self).delete_file(path)
    }

    fn create_folder(&mut self, path: &VfsPath) -> Result<()> {
        (**self).create_folder(path)
    }

    fn delete_folder(&mut self, path: &VfsPath, recursive: bool) -> Result<()> {
        (**self).delete_folder(path, recursive)
    }

    fn rename(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        (**self).rename(from, to)
    }

    fn list_folder(&self, path: &VfsPath, options: &ListOptions) -> Result<Vec<VfsEntry>> {
        (**self).list_folder(path, options)
    }

    fn entry(&self, path: &VfsPath) -> Result<Option<VfsEntry>> {
        (**self).entry(path)
    }
}

/// Runs a listing over a backend that can enumerate direct children.
///
/// Folders rejected by the name filters are not descended into.
pub(crate) fn list_with<F>(path: &VfsPath, options: &ListOptions, mut children: F) -> Result<Vec<VfsEntry>>
where
    F: FnMut(&VfsPath) -> Result<Vec<VfsEntry>>,
{
    let mut listing = Vec::new();
    let mut pending = vec![path.clone()];

    while let Some(folder) = pending.pop() {
        for child in children(&folder)? {
            if !options.admits_name(&child.name) {
                continue;
            }
            if options.recursive && child.is_folder() {
                pending.push(child.path.clone());
            }
            if options.accepts(&child) {
                listing.push(child);
            }
        }
    }

    listing.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(listing)
}

/// Checks the common preconditions of a rename before a backend touches
/// storage, returning the entry being moved.
pub(crate) fn check_rename<V: Vfs + ?Sized>(vfs: &V, from: &VfsPath, to: &VfsPath) -> Result<VfsEntry> {
    if from.is_root() || to.is_root() {
        return Err(VfsError::invalid(from));
    }
    let source = vfs.entry(from)?.ok_or_else(|| VfsError::not_found(from))?;
    if vfs.exists(to)? {
        return Err(VfsError::already_exists(to));
    }
    if source.is_folder() && to.starts_with(from) {
        return Err(VfsError::invalid(to));
    }
    if let Some(parent) = to.parent() {
        require_folder(vfs, &parent)?;
    }
    Ok(source)
}

/// Fails unless a folder exists at `path`.
pub(crate) fn require_folder<V: Vfs + ?Sized>(vfs: &V, path: &VfsPath) -> Result<()> {
    match vfs.entry(path)? {
        Some(entry) if entry.is_folder() => Ok(()),
        Some(_) => Err(VfsError::not_a_folder(path)),
        None => Err(VfsError::not_found(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryVfs;
    use chrono::Duration;

    fn path(s: &str) -> VfsPath {
        VfsPath::new(s).unwrap()
    }

    #[test]
    fn test_read_range_clamps_to_content() {
        let mut vfs = MemoryVfs::new();
        vfs.write(&path("/f"), b"0123456789").unwrap();

        assert_eq!(vfs.read_range(&path("/f"), 2, 3).unwrap(), b"234");
        assert_eq!(vfs.read_range(&path("/f"), 8, 10).unwrap(), b"89");
        assert!(vfs.read_range(&path("/f"), 20, 1).unwrap().is_empty());
    }

    #[test]
    fn test_autocreate_stops_at_file() {
        let mut vfs = MemoryVfs::new();
        vfs.write(&path("/blocker"), b"x").unwrap();

        let err = vfs.autocreate_path(&path("/blocker/inner")).unwrap_err();
        assert!(err.is_not_a_folder());
    }

    #[test]
    fn test_size_of_folder_is_error() {
        let mut vfs = MemoryVfs::new();
        vfs.create_folder(&path("/dir")).unwrap();

        assert!(vfs.size(&path("/dir")).unwrap_err().is_a_folder());
        assert!(vfs.size(&path("/none")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_copy_folder_into_itself_rejected() {
        let mut vfs = MemoryVfs::new();
        vfs.write_autocreate(&path("/a/file"), b"x").unwrap();

        let err = vfs.copy(&path("/a"), &path("/a/b")).unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_gc_only_touches_direct_files() {
        let mut vfs = MemoryVfs::new();
        vfs.write_autocreate(&path("/tmp/old"), b"1").unwrap();
        vfs.write_autocreate(&path("/tmp/nested/old"), b"2").unwrap();

        let deleted = vfs.gc(&path("/tmp"), Utc::now() + Duration::hours(1)).unwrap();
        assert_eq!(deleted, 1);
        assert!(!vfs.exists(&path("/tmp/old")).unwrap());
        assert!(vfs.exists(&path("/tmp/nested/old")).unwrap());
    }

    #[test]
    fn test_gc_keeps_recent_files() {
        let mut vfs = MemoryVfs::new();
        vfs.write(&path("/fresh"), b"1").unwrap();

        let deleted = vfs.gc(&VfsPath::root(), Utc::now() - Duration::hours(1)).unwrap();
        assert_eq!(deleted, 0);
    }

    #[test]
    fn test_boxed_backend_uses_provided_operations() {
        let mut vfs: Box<dyn Vfs> = Box::new(MemoryVfs::new());
        vfs.write_autocreate(&path("/x/y"), b"abc").unwrap();
        assert_eq!(vfs.folder_size(&VfsPath::root()).unwrap(), 3);
    }
}
