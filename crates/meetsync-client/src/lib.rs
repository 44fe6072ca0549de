//! CLI, configuration and the sync run
//!
//! This crate provides the `meetsync` command-line interface.

pub mod cli;
pub mod config;
pub mod error;
pub mod sync;

pub use cli::Cli;
pub use config::SyncConfig;
pub use error::{ClientError, ClientResult};
pub use sync::SyncSummary;
