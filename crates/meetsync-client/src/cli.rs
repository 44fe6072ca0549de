//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;
use meetsync_core::{TimeWindow, TracingOutputFormat};

/// meetsync - Pull past Meetup events and their attendance lists
#[derive(Debug, Default, Parser)]
#[command(name = "meetsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "MEETSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log output format: pretty, compact or json
    #[arg(long, env = "MEETSYNC_LOG_FORMAT")]
    pub log_format: Option<TracingOutputFormat>,

    /// Meetup group urlname, e.g. OpenTwinCities
    #[arg(long = "group", env = "MEETUP_GROUP_URLNAME")]
    pub group_urlname: Option<String>,

    /// Meetup API key
    #[arg(long, env = "MEETUP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Time window in Meetup's `<beginning>,<end>` format [default: -1w,]
    #[arg(long, env = "MEETUP_TIME_FRAME", allow_hyphen_values = true)]
    pub time_frame: Option<TimeWindow>,
}
