//! Core types, errors and configuration for the Horde Rust tools.
//!
//! This crate provides the foundational pieces shared by the weather decoder,
//! the virtual filesystem and the `horde` command-line tool.
//!
//! # Architecture
//!
//! The core consists of:
//! - Error hierarchy with contextual information
//! - CLI value types (`OutputFormat`, `ExitCode`)
//! - Configuration model persisted as TOML

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;

pub mod cli;
pub mod config;

pub use config::{GeneralConfig, HordeConfig, VfsBackendKind, VfsConfig, WeatherConfig};
pub use error::{Error, Result};
