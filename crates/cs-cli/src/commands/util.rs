//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use cs_core::{EventCollection, StreamKind, collection_from_texts, filter_by_date};

use crate::archive::Archive;
use crate::cli::SourceArgs;

/// Watch and like collections loaded from an archive, already date-filtered.
#[derive(Debug)]
pub struct Streams {
    pub watches: EventCollection,
    pub likes: EventCollection,
}

impl Streams {
    pub const fn get(&self, kind: StreamKind) -> &EventCollection {
        match kind {
            StreamKind::Watch => &self.watches,
            StreamKind::Like => &self.likes,
        }
    }
}

/// Opens the archive named by `source` and builds both event collections.
pub fn load_streams(source: &SourceArgs) -> Result<Streams> {
    let mut archive = Archive::open(&source.archive)?;

    let watches = load_stream(&mut archive, StreamKind::Watch, source.watch.as_deref())?;
    let likes = load_stream(&mut archive, StreamKind::Like, source.likes.as_deref())?;

    Ok(Streams {
        watches: filter_open_range(&watches, source.start, source.end),
        likes: filter_open_range(&likes, source.start, source.end),
    })
}

/// Date filter where a missing bound extends to the edge of the collection.
pub fn filter_open_range(
    collection: &EventCollection,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> EventCollection {
    if start.is_none() && end.is_none() {
        return collection.clone();
    }
    let Some((first, last)) = collection.date_span() else {
        return collection.clone();
    };
    filter_by_date(
        collection,
        Some(start.unwrap_or(first)),
        Some(end.unwrap_or(last)),
    )
}

/// Builds one stream's collection.
///
/// An explicitly named member must exist. When no member is named and none
/// can be guessed, the stream is empty.
fn load_stream(
    archive: &mut Archive,
    kind: StreamKind,
    member: Option<&str>,
) -> Result<EventCollection> {
    let member = match member {
        Some(name) => name.to_string(),
        None => {
            let Some(name) = archive.guess_member(kind)? else {
                tracing::warn!(stream = %kind, "no archive member found, treating stream as empty");
                return Ok(EventCollection::empty());
            };
            name
        }
    };

    let text = archive
        .read_text(&member)
        .with_context(|| format!("failed to load {kind} stream"))?;
    let collection = collection_from_texts(&[text.as_str()]);
    tracing::debug!(stream = %kind, %member, events = collection.len(), "loaded stream");
    Ok(collection)
}

/// Formats seconds as a duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if >= 1 minute, "Xs" otherwise.
/// Negative durations are treated as 0s.
pub fn format_duration(secs: i64) -> String {
    if secs < 0 {
        return "0s".to_string();
    }
    if secs < 60 {
        return format!("{secs}s");
    }
    let total_minutes = secs / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Formats an instant as `YYYY-MM-DD HH:MM` (UTC).
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Generates a 10-character bar for `value` relative to `max`.
/// Non-zero values below 5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn progress_bar(value: usize, max: usize) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(-5), "0s");
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(60), "1m");
        assert_eq!(format_duration(3599), "59m");
        assert_eq!(format_duration(3600), "1h 0m");
        assert_eq!(format_duration(5 * 3600 + 7 * 60 + 30), "5h 7m");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 0), "░░░░░░░░░░");
        assert_eq!(progress_bar(0, 10), "░░░░░░░░░░");
        assert_eq!(progress_bar(1, 100), "█░░░░░░░░░");
        assert_eq!(progress_bar(5, 10), "█████░░░░░");
        assert_eq!(progress_bar(10, 10), "██████████");
        assert_eq!(progress_bar(20, 10), "██████████");
    }

    fn collection() -> EventCollection {
        cs_core::build_collection(
            [(1, 111), (2, 222), (3, 333)]
                .into_iter()
                .map(|(day, id)| {
                    cs_core::InteractionEvent::new(
                        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
                        format!("https://x.com/@u/video/{id}"),
                    )
                    .unwrap()
                })
                .collect(),
        )
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_filter_open_range_start_only() {
        let filtered = filter_open_range(&collection(), Some(date(2)), None);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.date_span(), Some((date(2), date(3))));
    }

    #[test]
    fn test_filter_open_range_end_only() {
        let filtered = filter_open_range(&collection(), None, Some(date(1)));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.date_span(), Some((date(1), date(1))));
    }

    #[test]
    fn test_filter_open_range_bound_outside_span() {
        assert!(filter_open_range(&collection(), Some(date(4)), None).is_empty());
        let before = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert!(filter_open_range(&collection(), None, Some(before)).is_empty());
        assert_eq!(filter_open_range(&collection(), None, None).len(), 3);
        assert!(filter_open_range(&EventCollection::empty(), Some(date(1)), None).is_empty());
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 59).unwrap();
        assert_eq!(format_timestamp(ts), "2024-03-09 07:05");
    }
}
