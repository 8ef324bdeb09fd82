//! Summary command: headline engagement metrics.

use std::fmt::Write;

use anyhow::Result;
use cs_core::{EngagementSummary, GapThreshold};

use super::util::{format_duration, format_timestamp, load_streams};
use crate::cli::SourceArgs;

/// Runs the summary command.
pub fn run(source: &SourceArgs, gap: GapThreshold, json: bool) -> Result<()> {
    let streams = load_streams(source)?;
    let summary = EngagementSummary::compute(&streams.watches, &streams.likes, gap);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_summary(&summary));
    }
    Ok(())
}

/// Formats the human-readable summary.
#[allow(clippy::cast_possible_truncation)]
pub fn format_summary(summary: &EngagementSummary) -> String {
    let mut output = String::new();

    writeln!(output, "ENGAGEMENT SUMMARY").unwrap();
    writeln!(output, "──────────────────").unwrap();

    if summary.watch_count == 0 && summary.like_count == 0 {
        writeln!(output).unwrap();
        writeln!(output, "No events found in range.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: Run 'clipscope members <archive>' to check member names."
        )
        .unwrap();
        return output;
    }

    writeln!(
        output,
        "Watched:        {} clips on {} days",
        summary.watch_count, summary.watch_active_days
    )
    .unwrap();
    writeln!(
        output,
        "Liked:          {} clips on {} days",
        summary.like_count, summary.like_active_days
    )
    .unwrap();
    writeln!(
        output,
        "Conversion:     {:.1}% of watched clips liked",
        summary.conversion_rate * 100.0
    )
    .unwrap();

    writeln!(output).unwrap();
    writeln!(output, "SESSIONS (gap {}m)", summary.gap_minutes).unwrap();
    writeln!(output, "──────────────────").unwrap();
    writeln!(output, "Sessions:       {}", summary.session_count).unwrap();
    writeln!(
        output,
        "Clips/session:  {:.1}",
        summary.mean_events_per_session
    )
    .unwrap();
    writeln!(
        output,
        "Avg length:     {}",
        format_duration(summary.mean_session_secs.round() as i64)
    )
    .unwrap();
    writeln!(
        output,
        "Longest:        {}",
        format_duration(summary.longest_session_secs)
    )
    .unwrap();

    if let (Some(first), Some(last)) = (summary.first_activity, summary.last_activity) {
        writeln!(output).unwrap();
        writeln!(
            output,
            "Activity:       {} to {} UTC",
            format_timestamp(first),
            format_timestamp(last)
        )
        .unwrap();
    }

    output
}
