//! Client configuration.
//!
//! Settings come from, in order of precedence:
//! 1. Command-line flags and their environment variables
//!    (`MEETUP_GROUP_URLNAME`, `MEETUP_API_KEY`, `MEETUP_TIME_FRAME`, ...)
//! 2. An optional `config.toml` given with `--config`
//! 3. Built-in defaults
//!
//! The result is a [`SyncConfig`] value; nothing downstream reads the
//! environment.

use std::path::Path;

use meetsync_core::{TimeWindow, TracingConfig, TracingOutputFormat};
use meetsync_providers::MeetupConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{ClientError, ClientResult};

/// Environment variable holding the group urlname.
pub const GROUP_URLNAME_VAR: &str = "MEETUP_GROUP_URLNAME";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "MEETUP_API_KEY";

// ---------------------------------------------------------------------------
// FileConfig (config.toml)
// ---------------------------------------------------------------------------

/// Contents of the optional configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Meetup group urlname.
    pub group_urlname: Option<String>,

    /// Meetup API key.
    pub api_key: Option<String>,

    /// Time window for past events.
    pub time_frame: Option<TimeWindow>,

    /// Debug mode.
    pub debug: bool,

    /// Log output format name.
    pub log_format: Option<String>,

    /// API endpoint settings.
    #[serde(default)]
    pub api: ApiSettings,
}

/// API endpoint overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the v2 API (events).
    pub v2_base: Option<String>,

    /// Base URL of the v3 API (attendance).
    pub v3_base: Option<String>,
}

impl FileConfig {
    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}

// ---------------------------------------------------------------------------
// SyncConfig
// ---------------------------------------------------------------------------

/// Fully resolved settings for one sync run.
#[derive(Clone)]
pub struct SyncConfig {
    pub group_urlname: String,
    pub api_key: String,
    pub time_window: TimeWindow,
    pub v2_base: Option<String>,
    pub v3_base: Option<String>,
    pub debug: bool,
    pub log_format: Option<TracingOutputFormat>,
}

impl SyncConfig {
    /// Resolves the configuration from parsed CLI arguments, reading the
    /// `--config` file if one was given.
    pub fn resolve(cli: &Cli) -> ClientResult<Self> {
        let file = match cli.config {
            Some(ref path) => FileConfig::load_from(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    /// Merges CLI/env values over file values.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ConfigurationMissing`] if the group urlname or
    /// API key is absent or blank in both sources.
    pub fn merge(cli: &Cli, file: FileConfig) -> ClientResult<Self> {
        let group_urlname = non_blank(cli.group_urlname.clone())
            .or_else(|| non_blank(file.group_urlname))
            .ok_or(ClientError::ConfigurationMissing(GROUP_URLNAME_VAR))?;

        let api_key = non_blank(cli.api_key.clone())
            .or_else(|| non_blank(file.api_key))
            .ok_or(ClientError::ConfigurationMissing(API_KEY_VAR))?;

        let log_format = match (cli.log_format, file.log_format) {
            (Some(format), _) => Some(format),
            (None, Some(name)) => Some(
                name.parse::<TracingOutputFormat>()
                    .map_err(|e| ClientError::Config(e.to_string()))?,
            ),
            (None, None) => None,
        };

        Ok(Self {
            group_urlname,
            api_key,
            time_window: cli
                .time_frame
                .clone()
                .or(file.time_frame)
                .unwrap_or_default(),
            v2_base: non_blank(file.api.v2_base),
            v3_base: non_blank(file.api.v3_base),
            debug: cli.debug || file.debug,
            log_format,
        })
    }

    /// Builds the Meetup client configuration.
    pub fn meetup_config(&self) -> ClientResult<MeetupConfig> {
        let mut config = MeetupConfig::new(&self.group_urlname, &self.api_key)?;
        if let Some(ref base) = self.v2_base {
            config = config.with_v2_base(base);
        }
        if let Some(ref base) = self.v3_base {
            config = config.with_v3_base(base);
        }
        Ok(config)
    }

    /// Builds the tracing configuration.
    pub fn tracing_config(&self) -> TracingConfig {
        let config = if self.debug {
            TracingConfig::cli_debug()
        } else {
            TracingConfig::default()
        };
        match self.log_format {
            Some(format) => config.with_format(format),
            None => config,
        }
    }
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("group_urlname", &self.group_urlname)
            .field("api_key", &"<redacted>")
            .field("time_window", &self.time_window.as_str())
            .field("v2_base", &self.v2_base)
            .field("v3_base", &self.v3_base)
            .field("debug", &self.debug)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing::Level;

    fn cli(group: Option<&str>, key: Option<&str>) -> Cli {
        Cli {
            group_urlname: group.map(String::from),
            api_key: key.map(String::from),
            ..Cli::default()
        }
    }

    #[test]
    fn defaults_time_window() {
        let config = SyncConfig::merge(
            &cli(Some("OpenTwinCities"), Some("secret")),
            FileConfig::default(),
        )
        .unwrap();

        assert_eq!(config.group_urlname, "OpenTwinCities");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.time_window.as_str(), "-1w,");
        assert!(!config.debug);
        assert!(config.log_format.is_none());
    }

    #[test]
    fn missing_group_fails_fast() {
        let err = SyncConfig::merge(&cli(None, Some("secret")), FileConfig::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ClientError::ConfigurationMissing(GROUP_URLNAME_VAR)
        ));
    }

    #[test]
    fn blank_key_is_missing() {
        let err = SyncConfig::merge(&cli(Some("OpenTwinCities"), Some("  ")), FileConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::ConfigurationMissing(API_KEY_VAR)));
    }

    #[test]
    fn cli_overrides_file() {
        let file = FileConfig {
            group_urlname: Some("FromFile".to_string()),
            api_key: Some("file-key".to_string()),
            time_frame: Some(TimeWindow::parse("-1m,").unwrap()),
            log_format: Some("compact".to_string()),
            ..FileConfig::default()
        };
        let mut args = cli(Some("FromCli"), None);
        args.log_format = Some(TracingOutputFormat::Json);

        let config = SyncConfig::merge(&args, file).unwrap();
        assert_eq!(config.group_urlname, "FromCli");
        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.time_window.as_str(), "-1m,");
        assert_eq!(config.log_format, Some(TracingOutputFormat::Json));
    }

    #[test]
    fn invalid_log_format_in_file() {
        let file = FileConfig {
            log_format: Some("xml".to_string()),
            ..FileConfig::default()
        };
        let err = SyncConfig::merge(&cli(Some("g"), Some("k")), file)
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
group_urlname = "OpenTwinCities"
api_key = "secret"
time_frame = "-2w,"
debug = true

[api]
v2_base = "http://localhost:9000"
"#
        )
        .unwrap();

        let args = Cli {
            config: Some(file.path().to_path_buf()),
            ..Cli::default()
        };
        let config = SyncConfig::resolve(&args).unwrap();

        assert_eq!(config.group_urlname, "OpenTwinCities");
        assert_eq!(config.time_window.as_str(), "-2w,");
        assert!(config.debug);

        let meetup = config.meetup_config().unwrap();
        assert_eq!(meetup.events_url(), "http://localhost:9000/2/events");
        assert_eq!(meetup.v3_base, MeetupConfig::DEFAULT_BASE);
    }

    #[test]
    fn invalid_time_frame_in_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"time_frame = "last week""#).unwrap();

        let err = FileConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn tracing_follows_debug_and_format() {
        let mut config =
            SyncConfig::merge(&cli(Some("g"), Some("k")), FileConfig::default()).unwrap();
        assert_eq!(config.tracing_config().default_level, Level::INFO);

        config.debug = true;
        config.log_format = Some(TracingOutputFormat::Json);
        let tracing = config.tracing_config();
        assert_eq!(tracing.default_level, Level::DEBUG);
        assert_eq!(tracing.output_format, TracingOutputFormat::Json);
    }

    #[test]
    fn debug_redacts_key() {
        let config =
            SyncConfig::merge(&cli(Some("g"), Some("super-secret")), FileConfig::default())
                .unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
