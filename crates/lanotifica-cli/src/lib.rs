//! CLI and startup for the LAN notification relay.
//!
//! This crate provides the `lanotifica` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
