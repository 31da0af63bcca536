//! In-memory backend.
//!
//! Entries live in an ordered map keyed by path, so listings come out
//! sorted without extra work. The root folder is implicit.

use crate::backend::{Vfs, check_rename, list_with, require_folder};
use crate::types::{ListOptions, Result, VfsEntry, VfsError, VfsPath};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone)]
enum Node {
    File { data: Vec<u8>, modified: DateTime<Utc> },
    Folder { modified: DateTime<Utc> },
}

impl Node {
    fn describe(&self, path: &VfsPath) -> VfsEntry {
        match self {
            Self::File { data, modified } => VfsEntry::file(path.clone(), data.len() as u64, *modified),
            Self::Folder { modified } => VfsEntry::folder(path.clone(), *modified),
        }
    }
}

/// A virtual filesystem held entirely in memory.
///
/// # Examples
///
/// ```
/// use horde_vfs::{ListOptions, MemoryVfs, Vfs, VfsPath};
///
/// let mut vfs = MemoryVfs::new();
/// vfs.create_folder(&VfsPath::new("/notes").unwrap()).unwrap();
/// vfs.write(&VfsPath::new("/notes/todo.txt").unwrap(), b"call home").unwrap();
///
/// let listing = vfs.list_folder(&VfsPath::new("/notes").unwrap(), &ListOptions::new()).unwrap();
/// assert_eq!(listing[0].name, "todo.txt");
/// assert_eq!(vfs.file_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryVfs {
    nodes: BTreeMap<VfsPath, Node>,
    created: DateTime<Utc>,
}

impl MemoryVfs {
    /// Creates an empty filesystem containing only the root folder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            created: Utc::now(),
        }
    }

    /// Number of files, folders excluded.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.nodes.values().filter(|node| matches!(node, Node::File { .. })).count()
    }

    /// Every stored path in sorted order, folders included.
    #[must_use]
    pub fn all_paths(&self) -> Vec<&VfsPath> {
        self.nodes.keys().collect()
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    fn descendants(&self, path: &VfsPath) -> Vec<VfsPath> {
        self.nodes
            .keys()
            .filter(|key| *key != path && key.starts_with(path))
            .cloned()
            .collect()
    }
}

impl Default for MemoryVfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vfs for MemoryVfs {
    fn read(&self, path: &VfsPath) -> Result<Vec<u8>> {
        match self.nodes.get(path) {
            Some(Node::File { data, .. }) => Ok(data.clone()),
            Some(Node::Folder { .. }) => Err(VfsError::expected_file(path)),
            None if path.is_root() => Err(VfsError::expected_file(path)),
            None => Err(VfsError::not_found(path)),
        }
    }

    fn write(&mut self, path: &VfsPath, data: &[u8]) -> Result<()> {
        let parent = path.parent().ok_or_else(|| VfsError::expected_file(path))?;
        require_folder(&*self, &parent)?;
        if let Some(Node::Folder { .. }) = self.nodes.get(path) {
            return Err(VfsError::expected_file(path));
        }

        debug!(%path, bytes = data.len(), "memory write");
        self.nodes.insert(
            path.clone(),
            Node::File {
                data: data.to_vec(),
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    fn delete_file(&mut self, path: &VfsPath) -> Result<()> {
        match self.nodes.get(path) {
            Some(Node::File { .. }) => {
                self.nodes.remove(path);
                Ok(())
            }
            Some(Node::Folder { .. }) => Err(VfsError::expected_file(path)),
            None if path.is_root() => Err(VfsError::expected_file(path)),
            None => Err(VfsError::not_found(path)),
        }
    }

    fn create_folder(&mut self, path: &VfsPath) -> Result<()> {
        if path.is_root() || self.nodes.contains_key(path) {
            return Err(VfsError::already_exists(path));
        }
        if let Some(parent) = path.parent() {
            require_folder(&*self, &parent)?;
        }
        self.nodes.insert(path.clone(), Node::Folder { modified: Utc::now() });
        Ok(())
    }

    fn delete_folder(&mut self, path: &VfsPath, recursive: bool) -> Result<()> {
        if path.is_root() {
            return Err(VfsError::invalid(path));
        }
        require_folder(&*self, path)?;

        let descendants = self.descendants(path);
        if !recursive && !descendants.is_empty() {
            return Err(VfsError::FolderNotEmpty {
                path: path.to_string(),
            });
        }
        for key in &descendants {
            self.nodes.remove(key);
        }
        self.nodes.remove(path);
        debug!(%path, removed = descendants.len(), "memory folder deleted");
        Ok(())
    }

    fn rename(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        check_rename(&*self, from, to)?;

        let mut moved = self.descendants(from);
        moved.push(from.clone());
        let mut rebased = Vec::with_capacity(moved.len());
        for key in moved {
            let target = key.rebase(from, to)?;
            if let Some(node) = self.nodes.remove(&key) {
                rebased.push((target, node));
            }
        }
        self.nodes.extend(rebased);
        Ok(())
    }

    fn list_folder(&self, path: &VfsPath, options: &ListOptions) -> Result<Vec<VfsEntry>> {
        list_with(path, options, |folder| {
            require_folder(self, folder)?;
            Ok(self
                .nodes
                .iter()
                .filter(|(key, _)| key.parent().as_ref() == Some(folder))
                .map(|(key, node)| node.describe(key))
                .collect())
        })
    }

    fn entry(&self, path: &VfsPath) -> Result<Option<VfsEntry>> {
        if path.is_root() {
            return Ok(Some(VfsEntry::folder(VfsPath::root(), self.created)));
        }
        Ok(self.nodes.get(path).map(|node| node.describe(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> VfsPath {
        VfsPath::new(s).unwrap()
    }

    #[test]
    fn test_new_vfs_is_empty() {
        let vfs = MemoryVfs::new();
        assert_eq!(vfs.file_count(), 0);
        assert!(vfs.all_paths().is_empty());
        assert!(vfs.is_folder(&VfsPath::root()).unwrap());
    }

    #[test]
    fn test_write_requires_parent() {
        let mut vfs = MemoryVfs::new();
        let err = vfs.write(&path("/missing/file"), b"x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_write_replaces_content() {
        let mut vfs = MemoryVfs::new();
        vfs.write(&path("/f"), b"one").unwrap();
        vfs.write(&path("/f"), b"three").unwrap();

        assert_eq!(vfs.read(&path("/f")).unwrap(), b"three");
        assert_eq!(vfs.file_count(), 1);
    }

    #[test]
    fn test_root_cannot_be_written_or_deleted() {
        let mut vfs = MemoryVfs::new();
        assert!(vfs.write(&VfsPath::root(), b"x").unwrap_err().is_a_folder());
        assert!(vfs.delete_folder(&VfsPath::root(), true).unwrap_err().is_invalid_path());
        assert!(vfs.create_folder(&VfsPath::root()).unwrap_err().is_already_exists());
    }

    #[test]
    fn test_rename_folder_moves_children() {
        let mut vfs = MemoryVfs::new();
        vfs.write_autocreate(&path("/a/b/c.txt"), b"c").unwrap();
        vfs.write_autocreate(&path("/ab/keep.txt"), b"k").unwrap();

        vfs.rename(&path("/a"), &path("/z")).unwrap();

        assert_eq!(vfs.read(&path("/z/b/c.txt")).unwrap(), b"c");
        assert!(!vfs.exists(&path("/a")).unwrap());
        assert!(vfs.exists(&path("/ab/keep.txt")).unwrap());
    }

    #[test]
    fn test_clear() {
        let mut vfs = MemoryVfs::new();
        vfs.write(&path("/f"), b"x").unwrap();
        vfs.clear();
        assert_eq!(vfs.file_count(), 0);
    }

    #[test]
    fn test_vfs_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<MemoryVfs>();
    }
}
