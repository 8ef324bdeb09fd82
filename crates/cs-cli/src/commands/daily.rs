//! Daily command: watch and like counts per calendar day.

use std::collections::BTreeMap;
use std::fmt::Write;

use anyhow::Result;
use chrono::NaiveDate;
use cs_core::{EventCollection, daily_rollup};
use serde::Serialize;

use super::util::{load_streams, progress_bar};
use crate::cli::SourceArgs;

/// One day of activity across both streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub watched: usize,
    pub liked: usize,
}

/// Runs the daily command.
pub fn run(source: &SourceArgs, json: bool) -> Result<()> {
    let streams = load_streams(source)?;
    let rows = join_daily(&streams.watches, &streams.likes);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", format_daily(&rows));
    }
    Ok(())
}

/// Outer-joins the per-day rollups of both streams, ordered by date.
pub fn join_daily(watches: &EventCollection, likes: &EventCollection) -> Vec<DayRow> {
    let mut days: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for row in daily_rollup(watches) {
        days.entry(row.date).or_default().0 = row.count;
    }
    for row in daily_rollup(likes) {
        days.entry(row.date).or_default().1 = row.count;
    }
    days.into_iter()
        .map(|(date, (watched, liked))| DayRow {
            date,
            watched,
            liked,
        })
        .collect()
}

/// Formats the per-day table with a bar scaled to the busiest day.
pub fn format_daily(rows: &[DayRow]) -> String {
    let mut output = String::new();

    if rows.is_empty() {
        writeln!(output, "No events found in range.").unwrap();
        return output;
    }

    let max_watched = rows.iter().map(|r| r.watched).max().unwrap_or(0);

    writeln!(output, "DATE        WATCHED  LIKED").unwrap();
    for row in rows {
        writeln!(
            output,
            "{}  {:>7}  {:>5}  {}",
            row.date,
            row.watched,
            row.liked,
            progress_bar(row.watched, max_watched)
        )
        .unwrap();
    }

    let total_watched: usize = rows.iter().map(|r| r.watched).sum();
    let total_liked: usize = rows.iter().map(|r| r.liked).sum();
    writeln!(output, "──────────────────────────").unwrap();
    writeln!(output, "TOTAL       {total_watched:>7}  {total_liked:>5}").unwrap();

    output
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use cs_core::{InteractionEvent, build_collection};
    use insta::assert_snapshot;

    use super::*;

    fn event(day: u32, id: u32) -> InteractionEvent {
        InteractionEvent::new(
            Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            format!("https://x.com/@u/video/{id}"),
        )
        .unwrap()
    }

    #[test]
    fn test_join_daily_outer_joins_dates() {
        let watches = build_collection(vec![event(1, 1), event(1, 2), event(3, 3)]);
        let likes = build_collection(vec![event(2, 1), event(3, 3)]);

        let rows = join_daily(&watches, &likes);

        let date = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        assert_eq!(
            rows,
            vec![
                DayRow {
                    date: date(1),
                    watched: 2,
                    liked: 0
                },
                DayRow {
                    date: date(2),
                    watched: 0,
                    liked: 1
                },
                DayRow {
                    date: date(3),
                    watched: 1,
                    liked: 1
                },
            ]
        );
    }

    #[test]
    fn test_format_daily() {
        let date = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let rows = vec![
            DayRow {
                date: date(1),
                watched: 10,
                liked: 2,
            },
            DayRow {
                date: date(2),
                watched: 0,
                liked: 1,
            },
            DayRow {
                date: date(3),
                watched: 5,
                liked: 0,
            },
        ];
        let output = format_daily(&rows);
        assert_snapshot!(output, @r"
        DATE        WATCHED  LIKED
        2024-01-01       10      2  ██████████
        2024-01-02        0      1  ░░░░░░░░░░
        2024-01-03        5      0  █████░░░░░
        ──────────────────────────
        TOTAL            15      3
        ");
    }

    #[test]
    fn test_format_daily_empty() {
        assert_eq!(format_daily(&[]), "No events found in range.\n");
    }
}
