//! Builder pattern for seeding virtual filesystems.
//!
//! Provides a fluent API for describing files and folders up front and then
//! either building a [`MemoryVfs`] from them or writing them into any other
//! backend.
//!
//! # Examples
//!
//! ```
//! use horde_vfs::{Vfs, VfsBuilder, VfsPath};
//!
//! let vfs = VfsBuilder::new()
//!     .add_file("/templates/welcome.txt", "Welcome to Horde")
//!     .add_folder("/attachments")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(vfs.file_count(), 1);
//! assert!(vfs.is_folder(&VfsPath::new("/attachments").unwrap()).unwrap());
//! ```

use crate::backend::Vfs;
use crate::backends::MemoryVfs;
use crate::types::{Result, VfsError, VfsPath};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Builder for seeding a virtual filesystem.
///
/// Invalid paths do not interrupt the chain. They are collected and the
/// first one is reported by [`VfsBuilder::build`] or
/// [`VfsBuilder::populate`]. Missing parent folders are created
/// automatically.
///
/// # Examples
///
/// ## Building an in-memory filesystem
///
/// ```
/// use horde_vfs::{Vfs, VfsBuilder, VfsPath};
///
/// let vfs = VfsBuilder::new()
///     .add_file("/a/b/c.txt", "deep")
///     .build()
///     .unwrap();
///
/// assert_eq!(vfs.read(&VfsPath::new("/a/b/c.txt").unwrap()).unwrap(), b"deep");
/// # Ok::<(), horde_vfs::VfsError>(())
/// ```
///
/// ## Seeding another backend
///
/// ```
/// use horde_vfs::{SqlVfs, Vfs, VfsBuilder, VfsPath};
///
/// let mut vfs = SqlVfs::open_in_memory().unwrap();
/// VfsBuilder::new()
///     .add_file("/config/prefs.ini", "[general]")
///     .populate(&mut vfs)
///     .unwrap();
///
/// assert!(vfs.exists(&VfsPath::new("/config/prefs.ini").unwrap()).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct VfsBuilder {
    entries: BTreeMap<VfsPath, Option<Vec<u8>>>,
    errors: Vec<VfsError>,
}

impl VfsBuilder {
    /// Creates an empty builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_vfs::VfsBuilder;
    ///
    /// let vfs = VfsBuilder::new().build().unwrap();
    /// assert_eq!(vfs.file_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file. A later file at the same path replaces the earlier one.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_vfs::VfsBuilder;
    ///
    /// let result = VfsBuilder::new()
    ///     .add_file("relative/path", "content")
    ///     .build();
    ///
    /// assert!(result.unwrap_err().is_invalid_path());
    /// ```
    #[must_use]
    pub fn add_file(mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> Self {
        match VfsPath::new(path) {
            Ok(path) => {
                self.entries.insert(path, Some(content.into()));
            }
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Adds multiple files at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_vfs::VfsBuilder;
    ///
    /// let files = vec![
    ///     ("/one.txt", "1"),
    ///     ("/two.txt", "2"),
    /// ];
    ///
    /// let vfs = VfsBuilder::new()
    ///     .add_files(files)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(vfs.file_count(), 2);
    /// # Ok::<(), horde_vfs::VfsError>(())
    /// ```
    #[must_use]
    pub fn add_files<P, C>(self, files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<Path>,
        C: Into<Vec<u8>>,
    {
        files
            .into_iter()
            .fold(self, |builder, (path, content)| builder.add_file(path, content))
    }

    /// Adds an empty folder.
    #[must_use]
    pub fn add_folder(mut self, path: impl AsRef<Path>) -> Self {
        match VfsPath::new(path) {
            Ok(path) => {
                self.entries.entry(path).or_insert(None);
            }
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Number of files added so far.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_vfs::VfsBuilder;
    ///
    /// let mut builder = VfsBuilder::new();
    /// assert_eq!(builder.file_count(), 0);
    ///
    /// builder = builder.add_file("/test.txt", "").add_folder("/empty");
    /// assert_eq!(builder.file_count(), 1);
    /// ```
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries.values().filter(|content| content.is_some()).count()
    }

    /// Writes every entry into `vfs`, creating parent folders as needed.
    ///
    /// # Errors
    ///
    /// Returns the first collected path error, otherwise the first error the
    /// backend reports.
    pub fn populate<V: Vfs + ?Sized>(self, vfs: &mut V) -> Result<()> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        for (path, content) in &self.entries {
            match content {
                Some(data) => vfs.write_autocreate(path, data)?,
                None => vfs.autocreate_path(path)?,
            }
        }
        debug!(entries = self.entries.len(), "populated filesystem");
        Ok(())
    }

    /// Consumes the builder and returns an in-memory filesystem.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while adding entries, if any.
    pub fn build(self) -> Result<MemoryVfs> {
        let mut vfs = MemoryVfs::new();
        self.populate(&mut vfs)?;
        Ok(vfs)
    }
}
