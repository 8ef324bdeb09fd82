//! Event collections: validated, deduplicated, time-ordered event streams.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde::Serialize;

use crate::event::InteractionEvent;
use crate::extract::extract_events;
use crate::types::ResourceId;

/// An ordered, deduplicated set of events representing one behavioral stream.
///
/// Events are sorted ascending by timestamp (stable on extraction order) and
/// hold at most one event per distinct `source_url`. Collections are never
/// mutated; filters derive new collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventCollection {
    events: Vec<InteractionEvent>,
}

impl EventCollection {
    /// An explicitly empty collection. "No data" is a valid state, not an error.
    #[must_use]
    pub const fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Wraps events already known to be sorted and deduplicated.
    pub(crate) const fn from_sorted(events: Vec<InteractionEvent>) -> Self {
        Self { events }
    }

    /// Keeps the most recent event per `source_url`.
    ///
    /// On equal timestamps the earliest-extracted event wins. Input order does
    /// not matter; the result is sorted ascending by timestamp.
    #[must_use]
    pub fn dedup_most_recent(mut events: Vec<InteractionEvent>) -> Vec<InteractionEvent> {
        events.sort_by_key(|e| e.timestamp);

        let mut latest: HashMap<&str, usize> = HashMap::with_capacity(events.len());
        for (idx, event) in events.iter().enumerate() {
            latest
                .entry(event.source_url.as_str())
                .and_modify(|kept| {
                    if event.timestamp > events[*kept].timestamp {
                        *kept = idx;
                    }
                })
                .or_insert(idx);
        }
        let keep: HashSet<usize> = latest.into_values().collect();

        let before = events.len();
        let deduped: Vec<InteractionEvent> = events
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| keep.contains(idx))
            .map(|(_, event)| event)
            .collect();

        if deduped.len() < before {
            tracing::debug!(
                removed = before - deduped.len(),
                "collapsed repeated URLs to their most recent event"
            );
        }
        deduped
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in ascending timestamp order.
    pub fn events(&self) -> &[InteractionEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InteractionEvent> {
        self.events.iter()
    }

    /// Distinct resource ids among the events, ignoring events without one.
    pub fn resource_ids(&self) -> HashSet<&ResourceId> {
        self.events
            .iter()
            .filter_map(|e| e.resource_id.as_ref())
            .collect()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.events.first().map(|e| e.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.events.last().map(|e| e.timestamp)
    }

    /// First and last UTC calendar dates covered, inclusive.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.events.first()?.date(), self.events.last()?.date()))
    }

    /// The `limit` most recent events, newest first.
    pub fn most_recent(&self, limit: usize) -> Vec<&InteractionEvent> {
        self.events.iter().rev().take(limit).collect()
    }

    /// Derives a new collection holding the events that satisfy `keep`.
    #[must_use]
    pub fn retain_copy<F>(&self, keep: F) -> Self
    where
        F: Fn(&InteractionEvent) -> bool,
    {
        Self::from_sorted(self.events.iter().filter(|e| keep(e)).cloned().collect())
    }
}

impl<'a> IntoIterator for &'a EventCollection {
    type Item = &'a InteractionEvent;
    type IntoIter = std::slice::Iter<'a, InteractionEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Builds a collection from extracted events: sorts and deduplicates.
pub fn build_collection(events: Vec<InteractionEvent>) -> EventCollection {
    if events.is_empty() {
        return EventCollection::empty();
    }
    EventCollection::from_sorted(EventCollection::dedup_most_recent(events))
}

/// Extracts every text blob and builds one collection from all of them.
///
/// Blobs are extracted in parallel; events are concatenated in input order
/// before sorting, so ties resolve the same way as a sequential pass.
pub fn collection_from_texts(texts: &[&str]) -> EventCollection {
    let events: Vec<InteractionEvent> = texts
        .par_iter()
        .map(|text| extract_events(text))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();
    tracing::debug!(blobs = texts.len(), events = events.len(), "extracted events");
    build_collection(events)
}
