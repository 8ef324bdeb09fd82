//! oEmbed metadata lookups for clip URLs.
//!
//! Provides optional enrichment for clip listings:
//! - Thumbnail URL, title and author for a single clip
//! - Concurrent batch lookups where one failure never affects the others
//!
//! Nothing in the analytics core depends on this crate.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default lookup endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.tiktok.com/oembed";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
const USER_AGENT: &str = "Mozilla/5.0";
const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// oEmbed client errors.
#[derive(Debug, Error)]
pub enum OembedError {
    /// The configured endpoint is not an http(s) URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint {
        endpoint: String,
        reason: &'static str,
    },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("lookup returned status {status}")]
    Status { status: u16 },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Display metadata for one clip. Every field is optional upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// oEmbed lookup client.
///
/// # Thread Safety
///
/// The client is cheap to clone; clones share the underlying HTTP connection
/// pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Url,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for `endpoint` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute http(s) URL, or if
    /// the HTTP client fails to build.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, OembedError> {
        let endpoint = parse_endpoint(endpoint)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(OembedError::ClientBuild)?;

        Ok(Self { http, endpoint })
    }

    /// Creates a client for the default endpoint and timeout.
    pub fn with_defaults() -> Result<Self, OembedError> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }

    /// Endpoint this client queries.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Looks up metadata for a single clip URL.
    pub async fn lookup(&self, clip_url: &str) -> Result<ClipMeta, OembedError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("url", clip_url)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OembedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_meta(&body)
    }

    /// Looks up many clip URLs concurrently.
    ///
    /// The result is aligned with `clip_urls`. A failed lookup yields `None`
    /// for that entry only.
    pub async fn lookup_all(&self, clip_urls: &[String]) -> Vec<Option<ClipMeta>> {
        let mut results: Vec<Option<ClipMeta>> = vec![None; clip_urls.len()];
        let permits = Arc::new(Semaphore::new(MAX_CONCURRENT_LOOKUPS));
        let mut tasks = JoinSet::new();

        for (idx, url) in clip_urls.iter().enumerate() {
            let client = self.clone();
            let url = url.clone();
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                (idx, client.lookup(&url).await, url)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, Ok(meta), _)) => results[idx] = Some(meta),
                Ok((_, Err(err), url)) => {
                    tracing::debug!(%url, error = %err, "metadata lookup failed");
                }
                Err(err) => tracing::debug!(error = %err, "metadata lookup task failed"),
            }
        }

        results
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, OembedError> {
    let invalid = |reason| OembedError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    let url = Url::parse(endpoint).map_err(|_| invalid("not an absolute URL"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(invalid("scheme must be http or https")),
    }
}

fn parse_meta(body: &str) -> Result<ClipMeta, OembedError> {
    #[derive(Deserialize)]
    struct Payload {
        thumbnail_url: Option<String>,
        title: Option<String>,
        author_name: Option<String>,
    }

    let payload: Payload =
        serde_json::from_str(body).map_err(|err| OembedError::InvalidResponse(err.to_string()))?;
    Ok(ClipMeta {
        thumbnail_url: non_blank(payload.thumbnail_url),
        title: non_blank(payload.title),
        author: non_blank(payload.author_name),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_accepts_default_endpoint() {
        let client = Client::with_defaults().unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_client_rejects_relative_endpoint() {
        assert!(matches!(
            Client::new("/oembed", DEFAULT_TIMEOUT),
            Err(OembedError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_client_rejects_non_http_endpoint() {
        let err = Client::new("ftp://example.com/oembed", DEFAULT_TIMEOUT).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid endpoint \"ftp://example.com/oembed\": scheme must be http or https"
        );
    }

    #[test]
    fn test_client_debug_shows_endpoint() {
        let client = Client::with_defaults().unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("tiktok.com/oembed"));
    }

    #[test]
    fn test_parse_meta_maps_author_name() {
        let body = r#"{
            "version": "1.0",
            "type": "video",
            "title": "cat does a thing",
            "author_name": "someone",
            "thumbnail_url": "https://cdn.example.com/t.jpg",
            "thumbnail_width": 720
        }"#;
        let meta = parse_meta(body).unwrap();
        assert_eq!(
            meta,
            ClipMeta {
                thumbnail_url: Some("https://cdn.example.com/t.jpg".to_string()),
                title: Some("cat does a thing".to_string()),
                author: Some("someone".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_meta_tolerates_missing_and_blank_fields() {
        let meta = parse_meta(r#"{"title":"  ","author_name":null}"#).unwrap();
        assert_eq!(meta, ClipMeta::default());
    }

    #[test]
    fn test_parse_meta_rejects_invalid_json() {
        let err = parse_meta("<html>blocked</html>").unwrap_err();
        assert!(matches!(err, OembedError::InvalidResponse(_)));
    }

    #[test]
    fn test_clip_meta_serialization_skips_missing() {
        let meta = ClipMeta {
            title: Some("t".to_string()),
            ..ClipMeta::default()
        };
        assert_eq!(serde_json::to_string(&meta).unwrap(), r#"{"title":"t"}"#);
    }

    #[tokio::test]
    async fn test_lookup_all_of_nothing_is_empty() {
        let client = Client::with_defaults().unwrap();
        assert!(client.lookup_all(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_all_isolates_failures() {
        // Nothing listens on the discard port; every lookup fails fast.
        let client = Client::new("http://127.0.0.1:9/oembed", Duration::from_secs(2)).unwrap();
        let urls = vec![
            "https://x.com/@u/video/1".to_string(),
            "https://x.com/@u/video/2".to_string(),
        ];
        assert_eq!(client.lookup_all(&urls).await, vec![None, None]);
    }
}
