use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Incrementally mirror a local directory tree onto an Android device.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Local directory to mirror
    pub source: PathBuf,
    /// Existing directory on the device that receives the mirror
    pub destination: String,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Print what would be pushed without touching the device
    #[clap(long, short = 'n')]
    pub dry_run: bool,

    /// Also re-push files that are newer locally than on the device
    #[clap(long, short)]
    pub update: bool,
}
