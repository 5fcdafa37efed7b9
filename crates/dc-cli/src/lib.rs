//! Daycare tracker CLI library.
//!
//! This crate provides the CLI interface for the daycare tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{ChildAction, ChildAddArgs, ChildUpdateArgs, Cli, Commands};
pub use config::Config;
