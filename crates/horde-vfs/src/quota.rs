//! Size limits on top of any backend.
//!
//! [`QuotaVfs`] wraps another [`Vfs`] and rejects writes that would push the
//! total size of files below its quota root past a [`QuotaLimit`]. Copies go
//! through `write`, so they are checked the same way.
//!
//! # Examples
//!
//! ```
//! use horde_vfs::{MemoryVfs, QuotaLimit, QuotaMetric, QuotaVfs, Vfs, VfsPath};
//!
//! let limit = QuotaLimit::new(1, QuotaMetric::Kilobytes).unwrap();
//! let mut vfs = QuotaVfs::new(MemoryVfs::new(), limit);
//!
//! vfs.write(&VfsPath::new("/small").unwrap(), &[0; 1000]).unwrap();
//! let err = vfs.write(&VfsPath::new("/large").unwrap(), &[0; 100]).unwrap_err();
//!
//! assert!(err.is_quota_exceeded());
//! assert_eq!(vfs.remaining().unwrap(), 24);
//! ```

use crate::backend::Vfs;
use crate::types::{ListOptions, Result, VfsEntry, VfsError, VfsPath};
use std::fmt;
use tracing::{debug, warn};

/// Unit a quota amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaMetric {
    /// Bytes
    Bytes,
    /// 1024 bytes
    Kilobytes,
    /// 1024 kilobytes
    Megabytes,
    /// 1024 megabytes
    Gigabytes,
}

impl QuotaMetric {
    /// Number of bytes in one unit.
    #[must_use]
    pub const fn factor(self) -> u64 {
        match self {
            Self::Bytes => 1,
            Self::Kilobytes => 1 << 10,
            Self::Megabytes => 1 << 20,
            Self::Gigabytes => 1 << 30,
        }
    }
}

/// A quota size in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuotaLimit(u64);

impl QuotaLimit {
    /// Converts `amount` units into a byte limit.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::InvalidQuota` for a zero amount or one that
    /// overflows a byte count.
    pub fn new(amount: u64, metric: QuotaMetric) -> Result<Self> {
        if amount == 0 {
            return Err(VfsError::InvalidQuota {
                reason: "quota must be greater than zero".to_string(),
            });
        }
        amount
            .checked_mul(metric.factor())
            .map(Self)
            .ok_or_else(|| VfsError::InvalidQuota {
                reason: format!("{amount} {metric:?} does not fit in a byte count"),
            })
    }

    /// Limit in bytes.
    #[must_use]
    pub const fn bytes(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QuotaLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

/// A backend decorator enforcing a [`QuotaLimit`].
#[derive(Debug)]
pub struct QuotaVfs<V> {
    inner: V,
    limit: QuotaLimit,
    root: VfsPath,
}

impl<V: Vfs> QuotaVfs<V> {
    /// Enforces `limit` on everything below `/`.
    #[must_use]
    pub fn new(inner: V, limit: QuotaLimit) -> Self {
        Self {
            inner,
            limit,
            root: VfsPath::root(),
        }
    }

    /// Restricts the quota to files below `root`.
    #[must_use]
    pub fn with_root(mut self, root: VfsPath) -> Self {
        self.root = root;
        self
    }

    /// Configured limit.
    #[must_use]
    pub const fn limit(&self) -> QuotaLimit {
        self.limit
    }

    /// Folder the quota applies to.
    #[must_use]
    pub const fn root(&self) -> &VfsPath {
        &self.root
    }

    /// The wrapped backend.
    #[must_use]
    pub const fn inner(&self) -> &V {
        &self.inner
    }

    /// Unwraps the decorated backend.
    pub fn into_inner(self) -> V {
        self.inner
    }

    /// Bytes currently used below the quota root.
    ///
    /// # Errors
    ///
    /// Storage failures of the wrapped backend.
    pub fn usage(&self) -> Result<u64> {
        if !self.inner.is_folder(&self.root)? {
            return Ok(0);
        }
        self.inner.folder_size(&self.root)
    }

    /// Bytes still available below the quota root.
    ///
    /// # Errors
    ///
    /// Storage failures of the wrapped backend.
    pub fn remaining(&self) -> Result<u64> {
        Ok(self.limit.bytes().saturating_sub(self.usage()?))
    }

    fn ensure_room(&self, released: u64, added: u64) -> Result<()> {
        let required = self.usage()?.saturating_sub(released).saturating_add(added);
        if required > self.limit.bytes() {
            warn!(limit = self.limit.bytes(), required, root = %self.root, "quota exceeded");
            return Err(VfsError::QuotaExceeded {
                limit: self.limit.bytes(),
                required,
            });
        }
        Ok(())
    }

    fn footprint(&self, path: &VfsPath) -> Result<u64> {
        match self.inner.entry(path)? {
            Some(entry) if entry.is_folder() => self.inner.folder_size(path),
            Some(entry) => Ok(entry.size),
            None => Ok(0),
        }
    }
}

impl<V: Vfs> Vfs for QuotaVfs<V> {
    fn read(&self, path: &VfsPath) -> Result<Vec<u8>> {
        self.inner.read(path)
    }

    fn write(&mut self, path: &VfsPath, data: &[u8]) -> Result<()> {
        if path.starts_with(&self.root) {
            let replaced = match self.inner.entry(path)? {
                Some(entry) if entry.is_file() => entry.size,
                _ => 0,
            };
            self.ensure_room(replaced, data.len() as u64)?;
        }
        self.inner.write(path, data)
    }

    fn delete_file(&mut self, path: &VfsPath) -> Result<()> {
        self.inner.delete_file(path)
    }

    fn create_folder(&mut self, path: &VfsPath) -> Result<()> {
        self.inner.create_folder(path)
    }

    fn delete_folder(&mut self, path: &VfsPath, recursive: bool) -> Result<()> {
        self.inner.delete_folder(path, recursive)
    }

    fn rename(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        if to.starts_with(&self.root) && !from.starts_with(&self.root) {
            let incoming = self.footprint(from)?;
            debug!(%from, %to, incoming, "rename into quota root");
            self.ensure_room(0, incoming)?;
        }
        self.inner.rename(from, to)
    }

    fn list_folder(&self, path: &VfsPath, options: &ListOptions) -> Result<Vec<VfsEntry>> {
        self.inner.list_folder(path, options)
    }

    fn entry(&self, path: &VfsPath) -> Result<Option<VfsEntry>> {
        self.inner.entry(path)
    }
}
