//! Recent command: most recent clips of a stream, optionally with metadata.

use std::fmt::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cs_core::{EventCollection, InteractionEvent, StreamKind};
use cs_oembed::ClipMeta;
use serde::Serialize;

use super::util::{format_timestamp, load_streams};
use crate::Config;
use crate::cli::SourceArgs;

/// One listed clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentClip {
    pub timestamp: DateTime<Utc>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(flatten)]
    pub meta: ClipMeta,
    /// Placeholder cover hue (0-359) for clips without a thumbnail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_hue: Option<u16>,
}

impl RecentClip {
    fn new(event: &InteractionEvent, meta: Option<ClipMeta>) -> Self {
        let meta = meta.unwrap_or_default();
        let resource_id = event.resource_id.as_ref().map(ToString::to_string);
        let cover_hue = meta
            .thumbnail_url
            .is_none()
            .then(|| placeholder_hue(resource_id.as_deref().unwrap_or(event.source_url.as_str())));
        Self {
            timestamp: event.timestamp,
            url: event.source_url.clone(),
            resource_id,
            meta,
            cover_hue,
        }
    }
}

/// Options for the recent command.
#[derive(Debug, Clone, Copy)]
pub struct RecentOptions {
    pub stream: StreamKind,
    pub limit: usize,
    pub thumbnails: bool,
    pub json: bool,
}

/// Runs the recent command.
pub fn run(source: &SourceArgs, config: &Config, options: RecentOptions) -> Result<()> {
    let streams = load_streams(source)?;
    let clips = recent_clips(streams.get(options.stream), options.limit, |urls| {
        if options.thumbnails {
            fetch_metadata(config, urls)
        } else {
            Ok(vec![None; urls.len()])
        }
    })?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&clips)?);
    } else {
        print!(
            "{}",
            format_recent(options.stream, &clips, options.thumbnails)
        );
    }
    Ok(())
}

/// Lists the `limit` most recent clips, newest first, enriched by `lookup`.
///
/// `lookup` receives the clip URLs and returns metadata aligned with them.
pub fn recent_clips<F>(
    collection: &EventCollection,
    limit: usize,
    lookup: F,
) -> Result<Vec<RecentClip>>
where
    F: FnOnce(&[String]) -> Result<Vec<Option<ClipMeta>>>,
{
    let events = collection.most_recent(limit);
    let urls: Vec<String> = events.iter().map(|e| e.source_url.clone()).collect();
    let metas = lookup(&urls)?;

    Ok(events
        .into_iter()
        .zip(metas.into_iter().chain(std::iter::repeat(None)))
        .map(|(event, meta)| RecentClip::new(event, meta))
        .collect())
}

/// Fetches oEmbed metadata for all URLs on a short-lived runtime.
fn fetch_metadata(config: &Config, urls: &[String]) -> Result<Vec<Option<ClipMeta>>> {
    if urls.is_empty() {
        return Ok(Vec::new());
    }
    let client = cs_oembed::Client::new(
        &config.oembed_endpoint,
        Duration::from_secs(config.oembed_timeout_secs),
    )
    .context("failed to create metadata client")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let metas = runtime.block_on(client.lookup_all(urls));

    let found = metas.iter().filter(|m| m.is_some()).count();
    tracing::debug!(requested = urls.len(), found, "fetched clip metadata");
    Ok(metas)
}

/// Deterministic hue for a placeholder cover: sum of character codes mod 360.
pub fn placeholder_hue(seed: &str) -> u16 {
    let sum = seed.chars().fold(0_u32, |acc, c| (acc + u32::from(c)) % 360);
    u16::try_from(sum).unwrap_or(0)
}

/// Formats the clip list. With `covers`, each clip gets a second line naming
/// its thumbnail, or its placeholder hue when none was found.
pub fn format_recent(stream: StreamKind, clips: &[RecentClip], covers: bool) -> String {
    let mut output = String::new();

    let heading = match stream {
        StreamKind::Watch => "RECENTLY WATCHED",
        StreamKind::Like => "RECENTLY LIKED",
    };
    writeln!(output, "{heading}").unwrap();

    if clips.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No clips found in range.").unwrap();
        return output;
    }

    for clip in clips {
        write!(output, "{} UTC  {}", format_timestamp(clip.timestamp), clip.url).unwrap();
        match (&clip.meta.title, &clip.meta.author) {
            (Some(title), Some(author)) => write!(output, "  {title} · {author}").unwrap(),
            (Some(title), None) => write!(output, "  {title}").unwrap(),
            (None, Some(author)) => write!(output, "  · {author}").unwrap(),
            (None, None) => {}
        }
        writeln!(output).unwrap();

        if covers {
            match (&clip.meta.thumbnail_url, clip.cover_hue) {
                (Some(url), _) => writeln!(output, "    thumbnail: {url}").unwrap(),
                (None, Some(hue)) => writeln!(output, "    cover: hue {hue}").unwrap(),
                (None, None) => {}
            }
        }
    }

    output
}
