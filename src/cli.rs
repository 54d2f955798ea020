use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments of the daemon.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "soundrelay")]
#[command(about = "Reports PulseAudio devices and volume changes to a REST API")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Base server URL, e.g. http://localhost:5027
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Configuration file [default: $XDG_CONFIG_HOME/soundrelay/config.toml]
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only log device events, without contacting the API
    #[arg(long)]
    pub log_only: bool,

    /// Print version information
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

/// Text printed for `--version`
pub fn version_line() -> String {
    format!("soundrelay {}", env!("CARGO_PKG_VERSION"))
}
