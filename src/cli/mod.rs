//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "scoutline",
    version,
    about = "Faceted filter engine for creator discovery",
    long_about = "Scoutline interprets free-text creator searches into structured filters, \
                  merges section patches into filter states and reports active filters."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/scoutline/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Profile to apply on top of the config (e.g., "lenient")
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interpret a free-text query into filters
    Parse {
        /// Query text, e.g. "100k followers gaming sur YouTube"
        query: String,

        /// Show the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count active filters of a filter state file
    Count {
        /// Filter state JSON file
        #[arg(short, long, value_name = "FILE")]
        state: PathBuf,

        /// Free-text query to include in the count
        #[arg(short, long, default_value = "")]
        query: String,

        /// Show the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge a patch into one section and print the new state
    Merge {
        /// Filter state JSON file (starts from an empty state when omitted)
        #[arg(short, long, value_name = "FILE")]
        state: Option<PathBuf>,

        /// Section to patch (creator, audience, content, performance, growth, sponsoring)
        #[arg(long)]
        section: String,

        /// Patch as a JSON object; null values clear fields
        #[arg(long)]
        patch: String,
    },

    /// Report inverted ranges in a filter state file
    Validate {
        /// Filter state JSON file
        #[arg(short, long, value_name = "FILE")]
        state: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration and rule table
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print the default configuration path
    Path,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
