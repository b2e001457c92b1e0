//! CLI argument parsing with clap.

use clap::Parser;

use crate::config::Config;

/// Placeholder image server - size, colors and format encoded in the URL.
#[derive(Parser, Debug)]
#[command(name = "placeholder", version, about)]
pub struct Cli {
    /// Listening address (default from config, else ::1).
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Server port (default from config, else 5000).
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Seconds to wait for the renderer before giving up.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Answer renderer failures with 502 instead of an empty image.
    #[arg(long)]
    pub strict: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Turn on debugging output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref listen) = self.listen {
            config.server.listen.clone_from(listen);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.renderer.timeout_secs = timeout;
        }
        if self.strict {
            config.renderer.strict = true;
        }
    }
}
