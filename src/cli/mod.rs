// CLI module for shellproxy

use clap::Parser;

/// shellproxy - offline-first caching proxy for a single-page media app
#[derive(Parser, Debug)]
#[command(name = "shellproxy", version, about, long_about = None)]
pub struct Args {
    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub show_config: bool,
}
