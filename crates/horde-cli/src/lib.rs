//! Horde CLI library.
//!
//! Exposes the argument definitions, command implementations and output
//! formatters of the `horde` binary so they can be tested.

#![deny(unsafe_code)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unused_async)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod formatters;
pub mod runner;

// Re-export action types for convenience
pub use actions::{ConfigAction, VfsAction};
pub use cli::{Cli, Commands};
