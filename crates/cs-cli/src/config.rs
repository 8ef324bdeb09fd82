//! Configuration loading and management.

use std::path::{Path, PathBuf};

use cs_core::{GapThreshold, ValidationError};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Inactivity gap, in minutes, that separates two sessions.
    pub gap_minutes: i64,

    /// Session rows shown by `sessions` when `--limit` is not given.
    pub session_rows: usize,

    /// Clips shown by `recent` when `--limit` is not given.
    pub recent_limit: usize,

    /// oEmbed endpoint used by `recent --thumbnails`.
    pub oembed_endpoint: String,

    /// Per-lookup timeout for oEmbed requests.
    pub oembed_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gap_minutes: GapThreshold::DEFAULT_MINUTES,
            session_rows: 20,
            recent_limit: 12,
            oembed_endpoint: cs_oembed::DEFAULT_ENDPOINT.to_string(),
            oembed_timeout_secs: cs_oembed::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CLIPSCOPE_*)
        figment = figment.merge(Env::prefixed("CLIPSCOPE_"));

        figment.extract()
    }

    /// Session gap, preferring an explicit override over the configured value.
    pub fn gap_threshold(
        &self,
        override_minutes: Option<i64>,
    ) -> Result<GapThreshold, ValidationError> {
        GapThreshold::from_minutes(override_minutes.unwrap_or(self.gap_minutes))
    }
}

/// Returns the platform-specific config directory for clipscope.
///
/// On Linux: `~/.config/clipscope`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("clipscope"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_clipscope() {
        if let Some(path) = dirs_config_path() {
            assert_eq!(path.file_name().unwrap(), "clipscope");
        }
    }

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.gap_minutes, 30);
        assert_eq!(config.session_rows, 20);
        assert_eq!(config.recent_limit, 12);
        assert_eq!(config.oembed_endpoint, "https://www.tiktok.com/oembed");
        assert_eq!(config.oembed_timeout_secs, 8);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "gap_minutes = 45\nrecent_limit = 4").unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert_eq!(config.gap_minutes, 45);
        assert_eq!(config.recent_limit, 4);
        assert_eq!(config.session_rows, 20);
    }

    #[test]
    fn test_gap_threshold_prefers_override() {
        let config = Config::default();
        assert_eq!(
            config.gap_threshold(Some(10)).unwrap(),
            GapThreshold::from_minutes(10).unwrap()
        );
        assert_eq!(config.gap_threshold(None).unwrap(), GapThreshold::default());
        assert!(config.gap_threshold(Some(0)).is_err());
    }
}
