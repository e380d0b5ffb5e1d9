//! Window watcher CLI library.
//!
//! This crate provides the CLI interface and the platform window sources.

mod cli;
pub mod commands;
mod config;
pub mod logging;
pub mod platform;

pub use cli::{Cli, Commands};
pub use config::{Config, Overrides};
