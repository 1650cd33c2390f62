use std::path::PathBuf;

use clap::Parser;

/// Command line of the leaps binary.
#[derive(Debug, Parser)]
#[command(name = "leaps", disable_version_flag = true)]
pub struct Cli {
    /// Display version info
    #[arg(short = 'v', long = "version-info")]
    pub version: bool,

    /// Path to a configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Leaps service mode, supports: curator
    #[arg(short = 'm', long = "mode", default_value = "curator")]
    pub mode: String,
}
