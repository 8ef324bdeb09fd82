//! Core domain logic for clipscope.
//!
//! This crate contains the pure, I/O-free engine:
//! - Extraction: pairing `Date:`/`Link:` fields of export logs into events
//! - Collections: deduplicated, time-ordered event streams
//! - Sessionization: splitting a stream at inactivity gaps
//! - Metrics: counts, active days, conversion, daily and session rollups
//!
//! Every function is deterministic over its inputs and holds no state, so
//! callers may cache results keyed on input content.

mod collection;
pub mod event;
pub mod extract;
pub mod filter;
pub mod metrics;
pub mod session;
pub mod types;

pub use collection::{EventCollection, build_collection, collection_from_texts};
pub use event::InteractionEvent;
pub use extract::{ExtractStats, extract_events, extract_with_stats};
pub use filter::filter_by_date;
pub use metrics::{
    DailyCount, EngagementSummary, SessionRow, active_day_count, conversion_rate, daily_rollup,
    session_rollup, total_count,
};
pub use session::{Session, Sessionization, sessionize};
pub use types::{GapThreshold, ResourceId, StreamKind, ValidationError};
