//! CLI subcommand implementations.

pub mod daily;
pub mod members;
pub mod recent;
pub mod sessions;
pub mod summary;
mod util;
