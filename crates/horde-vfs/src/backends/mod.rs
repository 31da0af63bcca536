//! Storage backends implementing [`Vfs`](crate::Vfs).

mod file;
mod memory;
mod sql;

pub use file::FileVfs;
pub use memory::MemoryVfs;
pub use sql::SqlVfs;
