//! Sessions command: viewing sessions derived from the watch history.

use std::fmt::Write;

use anyhow::Result;
use cs_core::{GapThreshold, SessionRow, session_rollup, sessionize};

use super::util::{format_duration, format_timestamp, load_streams};
use crate::cli::SourceArgs;

/// Runs the sessions command.
pub fn run(source: &SourceArgs, gap: GapThreshold, limit: usize, json: bool) -> Result<()> {
    let streams = load_streams(source)?;
    let sessionization = sessionize(&streams.watches, gap);
    let rows = session_rollup(&sessionization, Some(limit));

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", format_sessions(&rows, gap, sessionization.len()));
    }
    Ok(())
}

/// Formats session rows; `total` is the session count before capping.
pub fn format_sessions(rows: &[SessionRow], gap: GapThreshold, total: usize) -> String {
    let mut output = String::new();

    writeln!(output, "SESSIONS (gap {gap}, most recent first)").unwrap();
    if total == 0 {
        writeln!(output).unwrap();
        writeln!(output, "No sessions in range.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:>5}  {:<16}  {:<16}  {:>5}  {}",
        "ID", "START", "END", "CLIPS", "LENGTH"
    )
    .unwrap();
    for row in rows {
        writeln!(
            output,
            "{:>5}  {:<16}  {:<16}  {:>5}  {}",
            row.session_id,
            format_timestamp(row.start),
            format_timestamp(row.end),
            row.event_count,
            format_duration(row.duration_secs)
        )
        .unwrap();
    }

    let remaining = total.saturating_sub(rows.len());
    if remaining > 0 {
        writeln!(output, "  ... and {remaining} more").unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;

    use super::*;

    fn row(session_id: u32, start_min: u32, end_min: u32, event_count: usize) -> SessionRow {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 20, start_min, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 20, end_min, 0).unwrap();
        SessionRow {
            session_id,
            start,
            end,
            event_count,
            duration_secs: (end - start).num_seconds(),
        }
    }

    #[test]
    fn test_format_sessions() {
        let rows = vec![row(12, 40, 59, 31), row(11, 5, 5, 1)];
        let output = format_sessions(&rows, GapThreshold::default(), 12);
        assert_snapshot!(output, @r"
        SESSIONS (gap 30m, most recent first)
           ID  START             END               CLIPS  LENGTH
           12  2024-01-01 20:40  2024-01-01 20:59     31  19m
           11  2024-01-01 20:05  2024-01-01 20:05      1  0s
          ... and 10 more
        ");
    }

    #[test]
    fn test_format_sessions_zero_limit_reports_hidden_sessions() {
        let output = format_sessions(&[], GapThreshold::default(), 4);
        assert_snapshot!(output, @r"
        SESSIONS (gap 30m, most recent first)
           ID  START             END               CLIPS  LENGTH
          ... and 4 more
        ");
    }

    #[test]
    fn test_format_sessions_empty() {
        let output = format_sessions(&[], GapThreshold::from_minutes(5).unwrap(), 0);
        assert_snapshot!(output, @r"
        SESSIONS (gap 5m, most recent first)

        No sessions in range.
        ");
    }
}
