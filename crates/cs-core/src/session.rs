//! Gap-based session segmentation.
//!
//! # Algorithm
//!
//! 1. Order events ascending by timestamp (stable on collection order)
//! 2. The first event opens session 1
//! 3. Each following event opens a new session when the gap to its
//!    predecessor is strictly greater than the threshold, otherwise it
//!    extends the current session

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::collection::EventCollection;
use crate::types::GapThreshold;

/// A maximal run of events with no internal gap above the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// 1-based, assigned in chronological order.
    pub session_id: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub event_count: usize,
    /// `end - start`; zero for a single-event session.
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
}

impl Session {
    fn open(session_id: u32, at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            start: at,
            end: at,
            event_count: 1,
            duration: Duration::zero(),
        }
    }

    fn extend(&mut self, at: DateTime<Utc>) {
        self.end = at;
        self.event_count += 1;
        self.duration = self.end - self.start;
    }
}

fn serialize_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i64(duration.num_seconds())
}

/// Sessions for one collection plus the per-event session assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sessionization {
    /// Sessions ordered by start.
    pub sessions: Vec<Session>,
    /// `assignments[i]` is the session id of the collection's i-th event.
    pub assignments: Vec<u32>,
}

impl Sessionization {
    /// Session id of the collection's `index`-th event.
    pub fn session_of(&self, index: usize) -> Option<u32> {
        self.assignments.get(index).copied()
    }

    /// Looks up a session by id.
    pub fn session(&self, session_id: u32) -> Option<&Session> {
        let idx = usize::try_from(session_id).ok()?.checked_sub(1)?;
        self.sessions.get(idx)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Partitions a collection into sessions separated by gaps above `gap`.
pub fn sessionize(collection: &EventCollection, gap: GapThreshold) -> Sessionization {
    let events = collection.events();
    let mut order: Vec<usize> = (0..events.len()).collect();
    order.sort_by_key(|&i| events[i].timestamp);

    let mut sessions: Vec<Session> = Vec::new();
    let mut assignments = vec![0_u32; events.len()];
    let mut previous: Option<DateTime<Utc>> = None;

    for idx in order {
        let at = events[idx].timestamp;
        match (previous, sessions.last_mut()) {
            (Some(prev), Some(current)) if at - prev <= gap.duration() => current.extend(at),
            _ => {
                let next_id = u32::try_from(sessions.len() + 1).unwrap_or(u32::MAX);
                sessions.push(Session::open(next_id, at));
            }
        }
        // Every branch above leaves a session at the end.
        if let Some(current) = sessions.last() {
            assignments[idx] = current.session_id;
        }
        previous = Some(at);
    }

    tracing::debug!(
        events = events.len(),
        sessions = sessions.len(),
        %gap,
        "sessionized events"
    );

    Sessionization {
        sessions,
        assignments,
    }
}
