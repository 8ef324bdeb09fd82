//! Engagement metrics and rollups over event collections.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::collection::EventCollection;
use crate::session::{Session, Sessionization, sessionize};
use crate::types::GapThreshold;

/// Number of events in the collection.
pub fn total_count(collection: &EventCollection) -> usize {
    collection.len()
}

/// Number of distinct UTC calendar dates with at least one event.
pub fn active_day_count(collection: &EventCollection) -> usize {
    collection
        .iter()
        .map(crate::event::InteractionEvent::date)
        .collect::<HashSet<_>>()
        .len()
}

/// Fraction of `from`'s resource ids that also appear in `to`.
///
/// Returns `0.0` when `from` has no resource ids.
#[allow(clippy::cast_precision_loss)]
pub fn conversion_rate(from: &EventCollection, to: &EventCollection) -> f64 {
    let from_ids = from.resource_ids();
    if from_ids.is_empty() {
        return 0.0;
    }
    let to_ids = to.resource_ids();
    let converted = from_ids.intersection(&to_ids).count();
    converted as f64 / from_ids.len() as f64
}

/// Event count for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// One row per date present in the collection, ordered by date.
pub fn daily_rollup(collection: &EventCollection) -> Vec<DailyCount> {
    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for event in collection {
        *by_day.entry(event.date()).or_insert(0) += 1;
    }
    by_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// Display row for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRow {
    pub session_id: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub event_count: usize,
    pub duration_secs: i64,
}

impl From<&Session> for SessionRow {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.session_id,
            start: session.start,
            end: session.end,
            event_count: session.event_count,
            duration_secs: session.duration.num_seconds(),
        }
    }
}

/// Session rows, most recent first, optionally capped to `limit` rows.
pub fn session_rollup(sessionization: &Sessionization, limit: Option<usize>) -> Vec<SessionRow> {
    sessionization
        .sessions
        .iter()
        .rev()
        .take(limit.unwrap_or(usize::MAX))
        .map(SessionRow::from)
        .collect()
}

/// Headline KPIs for a watch stream and a like stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementSummary {
    pub watch_count: usize,
    pub like_count: usize,
    pub watch_active_days: usize,
    pub like_active_days: usize,
    /// Share of watched clips that were also liked, in `[0, 1]`.
    pub conversion_rate: f64,
    pub gap_minutes: i64,
    pub session_count: usize,
    pub mean_events_per_session: f64,
    pub mean_session_secs: f64,
    pub longest_session_secs: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_activity: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl EngagementSummary {
    /// Computes all KPIs. Sessions are derived from the watch stream.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(watches: &EventCollection, likes: &EventCollection, gap: GapThreshold) -> Self {
        let sessions = sessionize(watches, gap);
        let session_count = sessions.len();

        let (mean_events_per_session, mean_session_secs) = if session_count == 0 {
            (0.0, 0.0)
        } else {
            let total_secs: i64 = sessions
                .sessions
                .iter()
                .map(|s| s.duration.num_seconds())
                .sum();
            (
                watches.len() as f64 / session_count as f64,
                total_secs as f64 / session_count as f64,
            )
        };
        let longest_session_secs = sessions
            .sessions
            .iter()
            .map(|s| s.duration)
            .max()
            .unwrap_or_else(Duration::zero)
            .num_seconds();

        let first_activity = [watches.first_timestamp(), likes.first_timestamp()]
            .into_iter()
            .flatten()
            .min();
        let last_activity = [watches.last_timestamp(), likes.last_timestamp()]
            .into_iter()
            .flatten()
            .max();

        Self {
            watch_count: total_count(watches),
            like_count: total_count(likes),
            watch_active_days: active_day_count(watches),
            like_active_days: active_day_count(likes),
            conversion_rate: conversion_rate(watches, likes),
            gap_minutes: gap.duration().num_minutes(),
            session_count,
            mean_events_per_session,
            mean_session_secs,
            longest_session_secs,
            first_activity,
            last_activity,
        }
    }
}
