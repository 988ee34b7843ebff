use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `linkscrub` - strip tracking parameters from links in chat messages.
#[derive(Parser, Debug)]
#[command(name = "linkscrub")]
#[command(version)]
#[command(about = "Detects tracker parameters in links and reposts messages without them.", long_about = None)]
pub struct Cli {
    /// Directory holding config.json and trackers.json (default: ~/.linkscrub)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read messages from stdin and repost them without trackers
    Run,

    /// Sanitize a single message and print the repost notice, if any
    Scrub {
        /// Message text
        text: String,

        /// Author to mention in the notice
        #[arg(long, value_name = "NAME")]
        author: Option<String>,
    },

    /// Show current behavior settings
    Settings,

    /// Inspect or edit tracker parameters
    Trackers {
        #[command(subcommand)]
        trackers_command: TrackersCommands,
    },

    /// Mention the author when reposting
    SetMention {
        /// true/false, on/off, yes/no, 1/0
        value: String,
    },

    /// Only process messages that contain a link
    SetRequireLinks {
        /// true/false, on/off, yes/no, 1/0
        value: String,
    },

    /// Replace the link detection pattern
    SetRegex {
        pattern: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TrackersCommands {
    /// List tracker parameters by provider
    List,
    /// Add a tracker parameter to a provider
    Add { provider: String, tracker: String },
    /// Remove a tracker parameter from a provider
    Remove { provider: String, tracker: String },
}
