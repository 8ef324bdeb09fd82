//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use cs_core::StreamKind;

/// Engagement analytics for short-video data exports.
///
/// Reads the "Watch History" and "Like List" logs of a data export archive
/// and reports activity, conversion, daily trends and viewing sessions.
#[derive(Debug, Parser)]
#[command(name = "clipscope", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the members of an export archive.
    Members {
        /// Path to the export ZIP archive.
        archive: PathBuf,
    },

    /// Show headline engagement metrics.
    Summary {
        #[command(flatten)]
        source: SourceArgs,

        /// Inactivity gap in minutes that starts a new session.
        #[arg(long, allow_negative_numbers = true)]
        gap_minutes: Option<i64>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show watch and like counts per day.
    Daily {
        #[command(flatten)]
        source: SourceArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show viewing sessions, most recent first.
    Sessions {
        #[command(flatten)]
        source: SourceArgs,

        /// Inactivity gap in minutes that starts a new session.
        #[arg(long, allow_negative_numbers = true)]
        gap_minutes: Option<i64>,

        /// Maximum number of sessions to show.
        #[arg(long)]
        limit: Option<usize>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the most recently watched or liked clips.
    Recent {
        #[command(flatten)]
        source: SourceArgs,

        /// Which stream to list (watch or like).
        #[arg(long, default_value = "watch")]
        stream: StreamKind,

        /// Maximum number of clips to show.
        #[arg(long)]
        limit: Option<usize>,

        /// Fetch title, author and thumbnail for each clip.
        #[arg(long)]
        thumbnails: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Where events come from, and which dates to keep.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Path to the export ZIP archive.
    pub archive: PathBuf,

    /// Archive member holding the watch history (default: guessed by name).
    #[arg(long)]
    pub watch: Option<String>,

    /// Archive member holding the like list (default: guessed by name).
    #[arg(long)]
    pub likes: Option<String>,

    /// First day to include, YYYY-MM-DD (UTC).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day to include, YYYY-MM-DD (UTC, inclusive).
    #[arg(long)]
    pub end: Option<NaiveDate>,
}
