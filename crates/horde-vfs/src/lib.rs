//! Virtual filesystem with interchangeable storage backends.
//!
//! The [`Vfs`] trait is the adapter contract: each backend implements a
//! handful of primitives (read, write, delete, create folder, rename, list,
//! describe) and inherits the higher-level operations built on them.
//!
//! Backends:
//!
//! * [`MemoryVfs`] keeps everything in memory.
//! * [`FileVfs`] maps paths below a host directory.
//! * [`SqlVfs`] stores rows in a SQLite `horde_vfs` table.
//!
//! [`QuotaVfs`] wraps any of them with a size limit, and [`VfsBuilder`] seeds
//! them with initial content.
//!
//! # Examples
//!
//! ```
//! use horde_vfs::{ListOptions, SqlVfs, Vfs, VfsPath};
//!
//! let mut vfs = SqlVfs::open_in_memory().unwrap();
//! let inbox = VfsPath::new("/mail/inbox").unwrap();
//!
//! vfs.autocreate_path(&inbox).unwrap();
//! vfs.write(&inbox.join("1.eml").unwrap(), b"Subject: hi").unwrap();
//! vfs.copy(&inbox, &VfsPath::new("/mail/archive").unwrap()).unwrap();
//!
//! let all = vfs.list_folder(&VfsPath::new("/mail").unwrap(), &ListOptions::new().recursive()).unwrap();
//! assert_eq!(all.len(), 4);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod backend;
pub mod backends;
pub mod builder;
pub mod quota;
pub mod types;

pub use backend::Vfs;
pub use backends::{FileVfs, MemoryVfs, SqlVfs};
pub use builder::VfsBuilder;
pub use quota::{QuotaLimit, QuotaMetric, QuotaVfs};
pub use types::{EntryKind, ListOptions, Result, VfsEntry, VfsError, VfsPath};
