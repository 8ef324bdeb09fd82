//! Core type definitions with validation.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The session gap threshold was zero or negative.
    #[error("gap threshold must be positive, got {seconds}s")]
    NonPositiveGap { seconds: i64 },

    /// The session gap threshold does not fit in a duration.
    #[error("gap threshold out of range: {minutes} minutes")]
    GapOutOfRange { minutes: i64 },

    /// A resource identifier was empty or contained non-digit characters.
    #[error("invalid resource id: {value:?}")]
    InvalidResourceId { value: String },

    /// Unknown stream name.
    #[error("unknown stream: {value} (expected \"watch\" or \"like\")")]
    UnknownStream { value: String },
}

/// A validated resource identifier.
///
/// The numeric segment following `/video/` in a clip URL. Used to join
/// watch events to like events.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidResourceId { value: id });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResourceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Maximum inactivity allowed between two events of the same session.
///
/// Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GapThreshold(Duration);

impl GapThreshold {
    /// Default threshold: 30 minutes.
    pub const DEFAULT_MINUTES: i64 = 30;

    /// Creates a threshold after validation.
    pub fn new(gap: Duration) -> Result<Self, ValidationError> {
        if gap <= Duration::zero() {
            return Err(ValidationError::NonPositiveGap {
                seconds: gap.num_seconds(),
            });
        }
        Ok(Self(gap))
    }

    /// Creates a threshold from a number of minutes.
    pub fn from_minutes(minutes: i64) -> Result<Self, ValidationError> {
        let gap =
            Duration::try_minutes(minutes).ok_or(ValidationError::GapOutOfRange { minutes })?;
        Self::new(gap)
    }

    /// Returns the inner duration.
    #[must_use]
    pub const fn duration(self) -> Duration {
        self.0
    }
}

impl Default for GapThreshold {
    fn default() -> Self {
        Self(Duration::minutes(Self::DEFAULT_MINUTES))
    }
}

impl fmt::Display for GapThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0.num_minutes())
    }
}

/// Which behavioral stream an event collection represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Clips that appeared in the watch history.
    Watch,
    /// Clips in the like list.
    Like,
}

impl StreamKind {
    /// All stream kinds, in display order.
    pub const ALL: [Self; 2] = [Self::Watch, Self::Like];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Watch => "watch",
            Self::Like => "like",
        }
    }

    /// Substring that identifies this stream's member in a data export.
    #[must_use]
    pub const fn export_member_hint(&self) -> &'static str {
        match self {
            Self::Watch => "watch history",
            Self::Like => "like list",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StreamKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watch" | "watches" | "watched" => Ok(Self::Watch),
            "like" | "likes" | "liked" => Ok(Self::Like),
            _ => Err(ValidationError::UnknownStream {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_rejects_empty_and_non_digits() {
        assert!(ResourceId::new("").is_err());
        assert!(ResourceId::new("12a4").is_err());
        assert!(ResourceId::new(" 123").is_err());
        assert!(ResourceId::new("7301234567890").is_ok());
    }

    #[test]
    fn test_resource_id_serde_roundtrip() {
        let id = ResourceId::new("111").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"111\"");
        let parsed: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_resource_id_serde_rejects_invalid() {
        let result: Result<ResourceId, _> = serde_json::from_str("\"abc\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_gap_threshold_rejects_zero_and_negative() {
        assert_eq!(
            GapThreshold::new(Duration::zero()),
            Err(ValidationError::NonPositiveGap { seconds: 0 })
        );
        assert!(GapThreshold::from_minutes(-5).is_err());
        assert!(GapThreshold::new(Duration::seconds(1)).is_ok());
    }

    #[test]
    fn test_gap_threshold_default_is_thirty_minutes() {
        assert_eq!(GapThreshold::default().duration(), Duration::minutes(30));
        assert_eq!(GapThreshold::default().to_string(), "30m");
    }

    #[test]
    fn test_gap_threshold_from_minutes_overflow_is_error() {
        assert_eq!(
            GapThreshold::from_minutes(i64::MAX),
            Err(ValidationError::GapOutOfRange { minutes: i64::MAX })
        );
    }

    #[test]
    fn test_stream_kind_from_str() {
        assert_eq!("watch".parse::<StreamKind>().unwrap(), StreamKind::Watch);
        assert_eq!("liked".parse::<StreamKind>().unwrap(), StreamKind::Like);
        let err = "shares".parse::<StreamKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown stream: shares (expected \"watch\" or \"like\")"
        );
    }

    #[test]
    fn test_stream_kind_roundtrip_all_variants() {
        for kind in StreamKind::ALL {
            let parsed: StreamKind = kind.to_string().parse().expect("should parse");
            assert_eq!(parsed, kind);
        }
    }
}
