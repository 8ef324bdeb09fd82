//! Calendar-date range filtering.

use chrono::NaiveDate;

use crate::collection::EventCollection;

/// Restricts a collection to events whose UTC date lies in `[start, end]`.
///
/// - Either bound missing: the collection is returned unchanged.
/// - `start > end`: no event can match, an empty collection is returned.
/// - Both bounds are inclusive, at day granularity.
pub fn filter_by_date(
    collection: &EventCollection,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> EventCollection {
    let (Some(start), Some(end)) = (start, end) else {
        return collection.clone();
    };
    if collection.is_empty() {
        return collection.clone();
    }
    if start > end {
        tracing::debug!(%start, %end, "inverted date range, nothing matches");
        return EventCollection::empty();
    }

    let filtered = collection.retain_copy(|e| (start..=end).contains(&e.date()));
    tracing::debug!(
        %start,
        %end,
        kept = filtered.len(),
        total = collection.len(),
        "filtered by date"
    );
    filtered
}
