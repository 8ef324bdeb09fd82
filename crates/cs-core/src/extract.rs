//! Event extraction from plain-text export logs.
//!
//! Export logs are loosely structured: each record carries a
//! `Date: <datetime> UTC` field and a `Link: <url>` field. The two fields are
//! located independently and paired by occurrence order, so the i-th date is
//! attributed to the i-th link.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

use crate::event::InteractionEvent;
use crate::types::ResourceId;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Date:\s*(.+?)\s*UTC").unwrap());

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Link:\s*(https?://\S+)").unwrap());

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/video/(\d+)").unwrap());

/// Date/time layouts seen in exports, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%b %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
    "%b %d, %Y %I:%M:%S %p",
    "%B %d, %Y %I:%M:%S %p",
    "%b %d, %Y %H:%M",
    "%d %b %Y %H:%M:%S",
];

/// Counters describing one extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// `Date:` fields found.
    pub dates: usize,
    /// `Link:` fields found.
    pub links: usize,
    /// Date/link pairs formed, `min(dates, links)`.
    pub paired: usize,
    /// Pairs dropped because the timestamp did not parse.
    pub dropped: usize,
}

/// Extracts interaction events from raw log text.
///
/// Never fails: malformed records are dropped and an empty or fully
/// malformed text yields an empty vector.
pub fn extract_events(text: &str) -> Vec<InteractionEvent> {
    extract_with_stats(text).0
}

/// Like [`extract_events`], also returning counters for diagnostics.
pub fn extract_with_stats(text: &str) -> (Vec<InteractionEvent>, ExtractStats) {
    let dates: Vec<&str> = DATE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    let links: Vec<&str> = LINK_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let events: Vec<InteractionEvent> = dates
        .iter()
        .zip(&links)
        .filter_map(|(date, link)| InteractionEvent::from_raw(date, link))
        .collect();

    let paired = dates.len().min(links.len());
    let stats = ExtractStats {
        dates: dates.len(),
        links: links.len(),
        paired,
        dropped: paired - events.len(),
    };

    if stats.dates != stats.links {
        tracing::debug!(
            dates = stats.dates,
            links = stats.links,
            "date and link counts differ, surplus records discarded"
        );
    }
    if stats.dropped > 0 {
        tracing::debug!(dropped = stats.dropped, "dropped records with unparseable timestamps");
    }

    (events, stats)
}

/// Parses the date text of a `Date: ... UTC` field into a UTC instant.
///
/// The text is interpreted as UTC wall-clock time. Returns `None` if no known
/// layout matches.
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(naive) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(naive.and_utc());
    }

    // A bare date means midnight.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Returns the digit run following `/video/` in a URL, if any.
pub fn resource_id_from_url(url: &str) -> Option<ResourceId> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| ResourceId::new(m.as_str()).ok())
}
