//! Clipscope CLI library.
//!
//! Opens data export archives and renders engagement reports built by
//! `cs-core`.

pub mod archive;
pub mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, SourceArgs};
pub use config::Config;
