//! SQLite backend.
//!
//! One row per file or folder in the `horde_vfs` table. A row is addressed by
//! its parent folder (`vfs_path`, stored without the leading slash, empty for
//! the root) and its own name (`vfs_name`). The root folder has no row.

use crate::backend::{Vfs, check_rename, list_with, require_folder};
use crate::types::{ListOptions, Result, VfsEntry, VfsError, VfsPath};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS horde_vfs (
    vfs_id INTEGER PRIMARY KEY AUTOINCREMENT,
    vfs_type INTEGER NOT NULL,
    vfs_path TEXT NOT NULL,
    vfs_name TEXT NOT NULL,
    vfs_modified INTEGER NOT NULL,
    vfs_owner TEXT,
    vfs_data BLOB
);

CREATE UNIQUE INDEX IF NOT EXISTS horde_vfs_path_name ON horde_vfs(vfs_path, vfs_name);
";

const TYPE_FILE: i64 = 1;
const TYPE_FOLDER: i64 = 2;

/// `vfs_path` value addressing the children of `folder`.
fn folder_key(folder: &VfsPath) -> &str {
    folder.as_str().trim_start_matches('/')
}

/// `(vfs_path, vfs_name)` of the row describing `path`.
fn row_key(path: &VfsPath) -> (String, &str) {
    let parent = path.parent().unwrap_or_else(VfsPath::root);
    (folder_key(&parent).to_string(), path.name())
}

/// Length in characters plus one, as SQLite `substr` counts characters.
fn prefix_len(key: &str) -> i64 {
    i64::try_from(key.chars().count()).unwrap_or(i64::MAX - 1) + 1
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn describe(path: VfsPath, kind: i64, modified: i64, size: Option<i64>) -> VfsEntry {
    if kind == TYPE_FOLDER {
        VfsEntry::folder(path, timestamp(modified))
    } else {
        VfsEntry::file(path, size.unwrap_or(0) as u64, timestamp(modified))
    }
}

/// A virtual filesystem stored in a SQLite database.
///
/// # Examples
///
/// ```
/// use horde_vfs::{SqlVfs, Vfs, VfsPath};
///
/// let mut vfs = SqlVfs::open_in_memory().unwrap().with_owner("alice");
/// vfs.write_autocreate(&VfsPath::new("/identities/default").unwrap(), b"Alice").unwrap();
///
/// assert_eq!(vfs.read(&VfsPath::new("/identities/default").unwrap()).unwrap(), b"Alice");
/// ```
#[derive(Debug)]
pub struct SqlVfs {
    conn: Connection,
    owner: Option<String>,
}

impl SqlVfs {
    /// Opens or creates a database file.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::Database` if the file cannot be opened or the
    /// schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, owner: None })
    }

    /// Creates a database that lives only as long as this value.
    ///
    /// # Errors
    ///
    /// Returns `VfsError::Database` if SQLite cannot be initialised.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, owner: None })
    }

    /// Records `owner` on every row this instance creates.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Owner recorded on new rows.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    fn insert(&self, path: &VfsPath, kind: i64, data: Option<&[u8]>) -> Result<()> {
        let (parent, name) = row_key(path);
        self.conn.execute(
            "INSERT INTO horde_vfs (vfs_type, vfs_path, vfs_name, vfs_modified, vfs_owner, vfs_data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![kind, parent, name, Utc::now().timestamp(), self.owner, data],
        )?;
        Ok(())
    }

    fn has_children(&self, folder: &VfsPath) -> Result<bool> {
        let found = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM horde_vfs WHERE vfs_path = ?1)",
            params![folder_key(folder)],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn children(&self, folder: &VfsPath) -> Result<Vec<VfsEntry>> {
        require_folder(self, folder)?;

        let mut stmt = self.conn.prepare(
            "SELECT vfs_type, vfs_name, vfs_modified, length(vfs_data)
             FROM horde_vfs WHERE vfs_path = ?1",
        )?;
        let rows = stmt
            .query_map(params![folder_key(folder)], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<i64>>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(kind, name, modified, size)| Ok(describe(folder.join(&name)?, kind, modified, size)))
            .collect()
    }
}

impl Vfs for SqlVfs {
    fn read(&self, path: &VfsPath) -> Result<Vec<u8>> {
        if path.is_root() {
            return Err(VfsError::expected_file(path));
        }
        let (parent, name) = row_key(path);
        let row = self
            .conn
            .query_row(
                "SELECT vfs_type, vfs_data FROM horde_vfs WHERE vfs_path = ?1 AND vfs_name = ?2",
                params![parent, name],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<Vec<u8>>>(1)?)),
            )
            .optional()?;

        match row {
            Some((TYPE_FOLDER, _)) => Err(VfsError::expected_file(path)),
            Some((_, data)) => Ok(data.unwrap_or_default()),
            None => Err(VfsError::not_found(path)),
        }
    }

    fn write(&mut self, path: &VfsPath, data: &[u8]) -> Result<()> {
        let parent = path.parent().ok_or_else(|| VfsError::expected_file(path))?;
        require_folder(&*self, &parent)?;

        match self.entry(path)? {
            Some(entry) if entry.is_folder() => Err(VfsError::expected_file(path)),
            Some(_) => {
                let (parent, name) = row_key(path);
                self.conn.execute(
                    "UPDATE horde_vfs SET vfs_data = ?1, vfs_modified = ?2
                     WHERE vfs_path = ?3 AND vfs_name = ?4",
                    params![data, Utc::now().timestamp(), parent, name],
                )?;
                debug!(%path, bytes = data.len(), "sql update");
                Ok(())
            }
            None => {
                self.insert(path, TYPE_FILE, Some(data))?;
                debug!(%path, bytes = data.len(), "sql insert");
                Ok(())
            }
        }
    }

    fn delete_file(&mut self, path: &VfsPath) -> Result<()> {
        match self.entry(path)? {
            Some(entry) if entry.is_file() => {
                let (parent, name) = row_key(path);
                self.conn.execute(
                    "DELETE FROM horde_vfs WHERE vfs_path = ?1 AND vfs_name = ?2",
                    params![parent, name],
                )?;
                Ok(())
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
        self.insert(path, TYPE_FOLDER, None)
    }

    fn delete_folder(&mut self, path: &VfsPath, recursive: bool) -> Result<()> {
        if path.is_root() {
            return Err(VfsError::invalid(path));
        }
        require_folder(&*self, path)?;
        if !recursive && self.has_children(path)? {
            return Err(VfsError::FolderNotEmpty {
                path: path.to_string(),
            });
        }

        let key = folder_key(path);
        let (parent, name) = row_key(path);
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM horde_vfs WHERE vfs_path = ?1 OR substr(vfs_path, 1, ?2) = ?3",
            params![key, prefix_len(key), format!("{key}/")],
        )?;
        tx.execute(
            "DELETE FROM horde_vfs WHERE vfs_path = ?1 AND vfs_name = ?2",
            params![parent, name],
        )?;
        tx.commit()?;
        debug!(%path, removed, "sql folder deleted");
        Ok(())
    }

    fn rename(&mut self, from: &VfsPath, to: &VfsPath) -> Result<()> {
        let source = check_rename(&*self, from, to)?;

        let (old_parent, old_name) = row_key(from);
        let (new_parent, new_name) = row_key(to);
        let old_key = folder_key(from);
        let new_key = folder_key(to);

        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE horde_vfs SET vfs_path = ?1, vfs_name = ?2 WHERE vfs_path = ?3 AND vfs_name = ?4",
            params![new_parent, new_name, old_parent, old_name],
        )?;
        if source.is_folder() {
            let moved = tx.execute(
                "UPDATE horde_vfs SET vfs_path = ?1 || substr(vfs_path, ?2)
                 WHERE vfs_path = ?3 OR substr(vfs_path, 1, ?2) = ?4",
                params![new_key, prefix_len(old_key), old_key, format!("{old_key}/")],
            )?;
            debug!(%from, %to, moved, "sql folder children rewritten");
        }
        tx.commit()?;
        Ok(())
    }

    fn list_folder(&self, path: &VfsPath, options: &ListOptions) -> Result<Vec<VfsEntry>> {
        list_with(path, options, |folder| self.children(folder))
    }

    fn entry(&self, path: &VfsPath) -> Result<Option<VfsEntry>> {
        if path.is_root() {
            return Ok(Some(VfsEntry::folder(VfsPath::root(), DateTime::default())));
        }
        let (parent, name) = row_key(path);
        let row = self
            .conn
            .query_row(
                "SELECT vfs_type, vfs_modified, length(vfs_data)
                 FROM horde_vfs WHERE vfs_path = ?1 AND vfs_name = ?2",
                params![parent, name],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                    ))
                },
            )
            .optional()?;
        Ok(row.map(|(kind, modified, size)| describe(path.clone(), kind, modified, size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn path(s: &str) -> VfsPath {
        VfsPath::new(s).unwrap()
    }

    fn rows(vfs: &SqlVfs) -> Vec<(String, String)> {
        let mut stmt = vfs
            .conn
            .prepare("SELECT vfs_path, vfs_name FROM horde_vfs ORDER BY vfs_path, vfs_name")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn test_row_layout() {
        let mut vfs = SqlVfs::open_in_memory().unwrap();
        vfs.write_autocreate(&path("/a/b/file.txt"), b"x").unwrap();

        assert_eq!(
            rows(&vfs),
            vec![
                (String::new(), "a".to_string()),
                ("a".to_string(), "b".to_string()),
                ("a/b".to_string(), "file.txt".to_string()),
            ]
        );
    }

    #[test]
    fn test_folder_rename_rewrites_child_paths() {
        let mut vfs = SqlVfs::open_in_memory().unwrap();
        vfs.write_autocreate(&path("/a/b/file.txt"), b"x").unwrap();
        vfs.write_autocreate(&path("/ab/other.txt"), b"y").unwrap();

        vfs.rename(&path("/a"), &path("/c")).unwrap();

        assert_eq!(
            rows(&vfs),
            vec![
                (String::new(), "ab".to_string()),
                (String::new(), "c".to_string()),
                ("ab".to_string(), "other.txt".to_string()),
                ("c".to_string(), "b".to_string()),
                ("c/b".to_string(), "file.txt".to_string()),
            ]
        );
        assert_eq!(vfs.read(&path("/c/b/file.txt")).unwrap(), b"x");
    }

    #[test]
    fn test_recursive_delete_leaves_siblings() {
        let mut vfs = SqlVfs::open_in_memory().unwrap();
        vfs.write_autocreate(&path("/a/b/file.txt"), b"x").unwrap();
        vfs.write_autocreate(&path("/ab/other.txt"), b"y").unwrap();

        vfs.delete_folder(&path("/a"), true).unwrap();

        assert_eq!(
            rows(&vfs),
            vec![
                (String::new(), "ab".to_string()),
                ("ab".to_string(), "other.txt".to_string()),
            ]
        );
    }

    #[test]
    fn test_owner_recorded() {
        let mut vfs = SqlVfs::open_in_memory().unwrap().with_owner("bob");
        vfs.write(&path("/f"), b"x").unwrap();

        let owner: String = vfs
            .conn
            .query_row("SELECT vfs_owner FROM horde_vfs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(owner, "bob");
        assert_eq!(vfs.owner(), Some("bob"));
    }

    #[test]
    fn test_data_persists_across_connections() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("vfs.sqlite");
        {
            let mut vfs = SqlVfs::open(&db).unwrap();
            vfs.write(&path("/kept"), b"persisted").unwrap();
        }
        let vfs = SqlVfs::open(&db).unwrap();
        assert_eq!(vfs.read(&path("/kept")).unwrap(), b"persisted");
    }

    #[test]
    fn test_empty_file_reads_empty() {
        let mut vfs = SqlVfs::open_in_memory().unwrap();
        vfs.write(&path("/empty"), b"").unwrap();
        assert!(vfs.read(&path("/empty")).unwrap().is_empty());
        assert_eq!(vfs.size(&path("/empty")).unwrap(), 0);
    }
}
