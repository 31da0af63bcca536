//! Core types for the virtual filesystem.
//!
//! Paths are strongly typed: a [`VfsPath`] is always absolute, uses `/` as
//! separator and never contains `..`. Every backend reports entries as
//! [`VfsEntry`] values and fails with [`VfsError`].
//!
//! # Examples
//!
//! ```
//! use horde_vfs::VfsPath;
//!
//! let path = VfsPath::new("/documents//reports/2024.txt/").unwrap();
//!
//! assert_eq!(path.as_str(), "/documents/reports/2024.txt");
//! assert_eq!(path.name(), "2024.txt");
//! assert_eq!(path.parent().unwrap().as_str(), "/documents/reports");
//! ```

use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during VFS operations.
///
/// All error variants include contextual information and implement
/// `is_xxx()` methods for easy error classification.
///
/// # Examples
///
/// ```
/// use horde_vfs::VfsError;
///
/// let error = VfsError::NotFound {
///     path: "/missing.txt".to_string(),
/// };
///
/// assert!(error.is_not_found());
/// ```
#[derive(Error, Debug)]
pub enum VfsError {
    /// Nothing exists at the specified path
    #[error("Not found: {path}")]
    NotFound {
        /// The path that was not found
        path: String,
    },

    /// Path exists but is a file where a folder was required
    #[error("Not a folder: {path}")]
    NotAFolder {
        /// The path that is not a folder
        path: String,
    },

    /// Path exists but is a folder where a file was required
    #[error("Is a folder: {path}")]
    IsAFolder {
        /// The path that is a folder
        path: String,
    },

    /// Destination of a create, rename or copy already exists
    #[error("Already exists: {path}")]
    AlreadyExists {
        /// The occupied path
        path: String,
    },

    /// Non-recursive delete of a folder that still has children
    #[error("Folder not empty: {path}")]
    FolderNotEmpty {
        /// The folder that still has children
        path: String,
    },

    /// Path is invalid or malformed, or the operation cannot apply to it
    #[error("Invalid path: {path}")]
    InvalidPath {
        /// The invalid path
        path: String,
    },

    /// Path is not absolute (must start with '/')
    #[error("Path must be absolute: {path}")]
    PathNotAbsolute {
        /// The relative path
        path: String,
    },

    /// Path contains invalid components (e.g., '..')
    #[error("Path contains invalid components: {path}")]
    InvalidPathComponent {
        /// The path with invalid components
        path: String,
    },

    /// A write would push usage under the quota root past the limit
    #[error("Quota exceeded: {required} bytes required, limit is {limit} bytes")]
    QuotaExceeded {
        /// Configured limit in bytes
        limit: u64,
        /// Usage in bytes the rejected operation would have produced
        required: u64,
    },

    /// Host filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Virtual path the operation was working on
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// SQL storage failure
    #[error("Database error: {source}")]
    Database {
        /// Underlying database error
        #[from]
        source: rusqlite::Error,
    },

    /// Quota limit cannot be represented
    #[error("Invalid quota: {reason}")]
    InvalidQuota {
        /// Why the quota was rejected
        reason: String,
    },
}

impl VfsError {
    /// Returns `true` if nothing exists at the path.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_vfs::VfsError;
    ///
    /// let error = VfsError::NotFound {
    ///     path: "/test.txt".to_string(),
    /// };
    ///
    /// assert!(error.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a not-a-folder error.
    #[must_use]
    pub const fn is_not_a_folder(&self) -> bool {
        matches!(self, Self::NotAFolder { .. })
    }

    /// Returns `true` if this is an is-a-folder error.
    #[must_use]
    pub const fn is_a_folder(&self) -> bool {
        matches!(self, Self::IsAFolder { .. })
    }

    /// Returns `true` if the destination was already occupied.
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns `true` if a folder could not be removed because it has children.
    #[must_use]
    pub const fn is_folder_not_empty(&self) -> bool {
        matches!(self, Self::FolderNotEmpty { .. })
    }

    /// Returns `true` if this is any kind of path validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_vfs::VfsError;
    ///
    /// let error = VfsError::PathNotAbsolute {
    ///     path: "relative/path".to_string(),
    /// };
    ///
    /// assert!(error.is_invalid_path());
    /// ```
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. }
                | Self::PathNotAbsolute { .. }
                | Self::InvalidPathComponent { .. }
        )
    }

    /// Returns `true` if a quota limit was hit.
    #[must_use]
    pub const fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Returns `true` if the failure came from the storage layer rather than
    /// from the request itself.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Database { .. })
    }

    pub(crate) fn not_found(path: &VfsPath) -> Self {
        Self::NotFound {
            path: path.to_string(),
        }
    }

    pub(crate) fn not_a_folder(path: &VfsPath) -> Self {
        Self::NotAFolder {
            path: path.to_string(),
        }
    }

    pub(crate) fn expected_file(path: &VfsPath) -> Self {
        Self::IsAFolder {
            path: path.to_string(),
        }
    }

    pub(crate) fn already_exists(path: &VfsPath) -> Self {
        Self::AlreadyExists {
            path: path.to_string(),
        }
    }

    pub(crate) fn invalid(path: &VfsPath) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
        }
    }
}

/// Type alias for Results using `VfsError`.
pub type Result<T> = std::result::Result<T, VfsError>;

/// A validated virtual filesystem path.
///
/// Paths must be absolute (start with '/') and must not contain parent
/// directory references ('..'). Backslashes are accepted as separators,
/// `.` components, repeated separators and trailing separators are dropped.
///
/// # Examples
///
/// ```
/// use horde_vfs::VfsPath;
///
/// let path = VfsPath::new("/mail/inbox").unwrap();
/// assert_eq!(path.as_str(), "/mail/inbox");
///
/// assert!(VfsPath::new("relative").is_err());
/// assert!(VfsPath::new("/mail/../etc").is_err());
/// assert!(VfsPath::new("/").unwrap().is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VfsPath(String);

impl VfsPath {
    /// Creates a new VFS path after validation and normalisation.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::InvalidPath` if the path is empty or not UTF-8,
    /// `VfsError::PathNotAbsolute` if it does not start with '/', and
    /// `VfsError::InvalidPathComponent` if any component is `..`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = path.to_str().ok_or_else(|| VfsError::InvalidPath {
            path: path.display().to_string(),
        })?;
        let unified = raw.replace('\\', "/");

        if unified.is_empty() {
            return Err(VfsError::InvalidPath { path: unified });
        }
        if !unified.starts_with('/') {
            return Err(VfsError::PathNotAbsolute { path: unified });
        }

        let mut normalized = String::with_capacity(unified.len());
        for component in unified.split('/').filter(|c| !c.is_empty() && *c != ".") {
            if component == ".." {
                return Err(VfsError::InvalidPathComponent { path: unified });
            }
            normalized.push('/');
            normalized.push_str(component);
        }
        if normalized.is_empty() {
            normalized.push('/');
        }

        Ok(Self(normalized))
    }

    /// The root folder `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path as a `Path`.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Returns `true` for `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the parent folder, or `None` for the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use horde_vfs::VfsPath;
    ///
    /// let path = VfsPath::new("/a/b").unwrap();
    /// assert_eq!(path.parent().unwrap().as_str(), "/a");
    /// assert!(VfsPath::new("/a").unwrap().parent().unwrap().is_root());
    /// assert!(VfsPath::root().parent().is_none());
    /// ```
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// Final component, empty for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Appends a relative path below this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is not a valid path, for example when
    /// `child` contains `..`.
    pub fn join(&self, child: impl AsRef<str>) -> Result<Self> {
        Self::new(format!("{}/{}", self.0, child.as_ref()))
    }

    /// Returns `true` if `base` equals this path or is one of its ancestors.
    ///
    /// Comparison is per component, so `/ab` does not start with `/a`.
    #[must_use]
    pub fn starts_with(&self, base: &Self) -> bool {
        base.is_root()
            || self.0 == base.0
            || (self.0.starts_with(&base.0) && self.0.as_bytes().get(base.0.len()) == Some(&b'/'))
    }

    /// Path of `self` relative to `base`, without a leading slash.
    ///
    /// Returns an empty string when both are equal and `None` when `base`
    /// is not an ancestor.
    #[must_use]
    pub fn strip_prefix(&self, base: &Self) -> Option<&str> {
        if !self.starts_with(base) {
            return None;
        }
        let rest = if base.is_root() {
            &self.0[1..]
        } else {
            &self.0[base.0.len()..]
        };
        Some(rest.trim_start_matches('/'))
    }

    /// Moves this path from below `from` to below `to`.
    pub(crate) fn rebase(&self, from: &Self, to: &Self) -> Result<Self> {
        match self.strip_prefix(from) {
            Some("") => Ok(to.clone()),
            Some(rest) => to.join(rest),
            None => Err(VfsError::invalid(self)),
        }
    }

    /// Iterates over the path components, root excluded.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|c| !c.is_empty())
    }

    /// Iterates over every ancestor folder below the root followed by the
    /// path itself, outermost first.
    pub(crate) fn prefixes(&self) -> impl Iterator<Item = Self> + '_ {
        self.0
            .match_indices('/')
            .skip(1)
            .map(|(idx, _)| Self(self.0[..idx].to_string()))
            .chain((!self.is_root()).then(|| self.clone()))
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<Path> for VfsPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl FromStr for VfsPath {
    type Err = VfsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file with contents
    File,
    /// Folder that may contain other entries
    Folder,
}

/// Metadata about a file or folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsEntry {
    /// Full path of the entry
    pub path: VfsPath,
    /// Final path component
    pub name: String,
    /// File or folder
    pub kind: EntryKind,
    /// Content length in bytes, zero for folders
    pub size: u64,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

impl VfsEntry {
    /// Describes a file.
    #[must_use]
    pub fn file(path: VfsPath, size: u64, modified: DateTime<Utc>) -> Self {
        Self {
            name: path.name().to_string(),
            path,
            kind: EntryKind::File,
            size,
            modified,
        }
    }

    /// Describes a folder.
    #[must_use]
    pub fn folder(path: VfsPath, modified: DateTime<Utc>) -> Self {
        Self {
            name: path.name().to_string(),
            path,
            kind: EntryKind::Folder,
            size: 0,
            modified,
        }
    }

    /// Returns `true` for files.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Returns `true` for folders.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// Filters applied by `list_folder`.
///
/// Name filters (dotfiles, `exclude`) also stop a recursive listing from
/// descending into the filtered folder. `folders_only` only affects what is
/// returned.
///
/// # Examples
///
/// ```
/// use horde_vfs::ListOptions;
/// use regex::Regex;
///
/// let options = ListOptions::new()
///     .recursive()
///     .exclude(Regex::new(r"\.bak$").unwrap());
///
/// assert!(options.admits_name("notes.txt"));
/// assert!(!options.admits_name("notes.txt.bak"));
/// assert!(!options.admits_name(".hidden"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Entries whose name matches are skipped
    pub exclude: Option<Regex>,
    /// Include names starting with '.'
    pub include_dotfiles: bool,
    /// Return folders only
    pub folders_only: bool,
    /// Descend into subfolders
    pub recursive: bool,
}

impl ListOptions {
    /// Direct children, dotfiles hidden, no exclusion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry below a folder, dotfiles included.
    #[must_use]
    pub fn everything() -> Self {
        Self {
            include_dotfiles: true,
            recursive: true,
            ..Self::default()
        }
    }

    /// Skips names matching `pattern`.
    #[must_use]
    pub fn exclude(mut self, pattern: Regex) -> Self {
        self.exclude = Some(pattern);
        self
    }

    /// Includes names starting with '.'.
    #[must_use]
    pub const fn with_dotfiles(mut self) -> Self {
        self.include_dotfiles = true;
        self
    }

    /// Returns folders only.
    #[must_use]
    pub const fn folders_only(mut self) -> Self {
        self.folders_only = true;
        self
    }

    /// Descends into subfolders.
    #[must_use]
    pub const fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Returns `true` if an entry with this name passes the name filters.
    #[must_use]
    pub fn admits_name(&self, name: &str) -> bool {
        if !self.include_dotfiles && name.starts_with('.') {
            return false;
        }
        self.exclude.as_ref().is_none_or(|pattern| !pattern.is_match(name))
    }

    /// Returns `true` if the entry belongs in the listing.
    #[must_use]
    pub fn accepts(&self, entry: &VfsEntry) -> bool {
        self.admits_name(&entry.name) && (!self.folders_only || entry.is_folder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vfs_path_normalizes_separators() {
        let path = VfsPath::new("//a///b/./c/").unwrap();
        assert_eq!(path.as_str(), "/a/b/c");

        let windows = VfsPath::new("\\a\\b").unwrap();
        assert_eq!(windows.as_str(), "/a/b");
    }

    #[test]
    fn test_vfs_path_root() {
        let root = VfsPath::new("///").unwrap();
        assert!(root.is_root());
        assert_eq!(root, VfsPath::root());
        assert_eq!(root.name(), "");
        assert_eq!(root.components().count(), 0);
    }

    #[test]
    fn test_vfs_path_rejects_invalid() {
        assert!(matches!(VfsPath::new(""), Err(VfsError::InvalidPath { .. })));
        assert!(matches!(VfsPath::new("a/b"), Err(VfsError::PathNotAbsolute { .. })));
        assert!(matches!(
            VfsPath::new("/a/../b"),
            Err(VfsError::InvalidPathComponent { .. })
        ));
    }

    #[test]
    fn test_vfs_path_allows_dots_inside_names() {
        let path = VfsPath::new("/archive/..hidden..").unwrap();
        assert_eq!(path.name(), "..hidden..");
    }

    #[test]
    fn test_vfs_path_join() {
        let base = VfsPath::new("/a").unwrap();
        assert_eq!(base.join("b/c").unwrap().as_str(), "/a/b/c");
        assert_eq!(VfsPath::root().join("x").unwrap().as_str(), "/x");
        assert!(base.join("../x").is_err());
    }

    #[test]
    fn test_vfs_path_starts_with_is_per_component() {
        let a = VfsPath::new("/a").unwrap();
        let ab = VfsPath::new("/ab").unwrap();
        let a_b = VfsPath::new("/a/b").unwrap();

        assert!(a_b.starts_with(&a));
        assert!(a.starts_with(&a));
        assert!(!ab.starts_with(&a));
        assert!(ab.starts_with(&VfsPath::root()));
    }

    #[test]
    fn test_vfs_path_strip_prefix_and_rebase() {
        let from = VfsPath::new("/old").unwrap();
        let to = VfsPath::new("/new/place").unwrap();
        let child = VfsPath::new("/old/x/y").unwrap();

        assert_eq!(child.strip_prefix(&from), Some("x/y"));
        assert_eq!(from.strip_prefix(&from), Some(""));
        assert_eq!(child.strip_prefix(&VfsPath::root()), Some("old/x/y"));
        assert_eq!(child.rebase(&from, &to).unwrap().as_str(), "/new/place/x/y");
        assert_eq!(from.rebase(&from, &to).unwrap(), to);
    }

    #[test]
    fn test_vfs_path_prefixes() {
        let path = VfsPath::new("/a/b/c").unwrap();
        let prefixes: Vec<String> = path.prefixes().map(|p| p.to_string()).collect();
        assert_eq!(prefixes, vec!["/a", "/a/b", "/a/b/c"]);
        assert_eq!(VfsPath::root().prefixes().count(), 0);
    }

    #[test]
    fn test_entry_constructors() {
        let modified = DateTime::<Utc>::default();
        let file = VfsEntry::file(VfsPath::new("/f.txt").unwrap(), 4, modified);
        assert!(file.is_file());
        assert_eq!(file.name, "f.txt");

        let folder = VfsEntry::folder(VfsPath::new("/dir").unwrap(), modified);
        assert!(folder.is_folder());
        assert_eq!(folder.size, 0);
    }

    #[test]
    fn test_list_options_filters() {
        let modified = DateTime::<Utc>::default();
        let file = VfsEntry::file(VfsPath::new("/a.txt").unwrap(), 1, modified);
        let folder = VfsEntry::folder(VfsPath::new("/dir").unwrap(), modified);

        let folders = ListOptions::new().folders_only();
        assert!(!folders.accepts(&file));
        assert!(folders.accepts(&folder));

        assert!(ListOptions::new().with_dotfiles().admits_name(".profile"));
    }

    #[test]
    fn test_error_predicates() {
        let quota = VfsError::QuotaExceeded {
            limit: 10,
            required: 11,
        };
        assert!(quota.is_quota_exceeded());
        assert!(!quota.is_not_found());

        let io = VfsError::Io {
            path: "/x".to_string(),
            source: std::io::Error::other("disk"),
        };
        assert!(io.is_storage_error());
        assert!(io.to_string().contains("/x"));
    }

    #[test]
    fn test_error_display() {
        let error = VfsError::FolderNotEmpty {
            path: "/dir".to_string(),
        };
        assert_eq!(error.to_string(), "Folder not empty: /dir");
    }
}
