//! Interaction events extracted from export logs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::{parse_utc_timestamp, resource_id_from_url};
use crate::types::ResourceId;

/// A single timestamped interaction (watch or like) with a clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// When the interaction happened, normalized to UTC.
    pub timestamp: DateTime<Utc>,
    /// The clip URL as it appeared in the export.
    pub source_url: String,
    /// Numeric clip identifier parsed from `source_url`, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<ResourceId>,
}

impl InteractionEvent {
    /// Builds an event from an already-parsed timestamp and a URL.
    ///
    /// Returns `None` if the URL is empty. The resource id is derived from
    /// the URL.
    pub fn new(timestamp: DateTime<Utc>, source_url: impl Into<String>) -> Option<Self> {
        let source_url = source_url.into();
        if source_url.trim().is_empty() {
            return None;
        }
        let resource_id = resource_id_from_url(&source_url);
        Some(Self {
            timestamp,
            source_url,
            resource_id,
        })
    }

    /// Builds an event from the raw date text and URL found in a log.
    ///
    /// Returns `None` when the timestamp does not parse or the URL is empty.
    pub fn from_raw(raw_timestamp: &str, source_url: &str) -> Option<Self> {
        let timestamp = parse_utc_timestamp(raw_timestamp)?;
        Self::new(timestamp, source_url)
    }

    /// The UTC calendar date of this event.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_from_raw_extracts_resource_id() {
        let event =
            InteractionEvent::from_raw("2024-01-01 12:00:00", "https://x.com/@u/video/111")
                .unwrap();
        assert_eq!(
            event.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(event.resource_id.as_ref().map(ResourceId::as_str), Some("111"));
    }

    #[test]
    fn test_from_raw_without_video_segment_has_no_resource_id() {
        let event =
            InteractionEvent::from_raw("2024-01-01 12:00:00", "https://x.com/@u/photo/5").unwrap();
        assert!(event.resource_id.is_none());
    }

    #[test]
    fn test_from_raw_rejects_unparseable_timestamp() {
        assert!(InteractionEvent::from_raw("yesterday-ish", "https://x.com/video/1").is_none());
    }

    #[test]
    fn test_new_rejects_empty_url() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(InteractionEvent::new(ts, "").is_none());
        assert!(InteractionEvent::new(ts, "   ").is_none());
    }

    #[test]
    fn test_date_truncates_to_utc_day() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap();
        let event = InteractionEvent::new(ts, "https://x.com/video/1").unwrap();
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn test_serialization_skips_missing_resource_id() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let event = InteractionEvent::new(ts, "https://x.com/live").unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp":"2024-01-01T00:00:00Z","source_url":"https://x.com/live"}"#
        );
    }
}
