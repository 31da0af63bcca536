//! Command implementations for the Horde CLI.
//!
//! Each command module parses its arguments, runs the operation against the
//! weather or filesystem libraries, and prints the result in the requested
//! output format.

pub mod common;
pub mod completions;
pub mod config;
pub mod fetch;
pub mod metar;
pub mod taf;
pub mod vfs;
