pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "logbook")]
#[command(about = "Zero-knowledge share links for your flight logbook")]
pub struct Args {
    /// Share service to talk to
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    pub remote: Url,

    /// Path to the config file (defaults to ~/.logbook/config.toml)
    #[arg(long = "config", global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
