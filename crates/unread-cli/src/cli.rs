use clap::{Parser, Subcommand};
use unread_kernel::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(
    name = "unread",
    about = "Unread: per-user read-state tracking for forum topics and replies",
    version
)]
pub struct Cli {
    /// Acting user ID (0 = anonymous, nothing is tracked)
    #[arg(long, global = true, default_value_t = 0)]
    pub user: u64,

    /// Path to the TOML config
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override the user metadata JSONL path
    #[arg(long, global = true)]
    pub meta: Option<String>,

    /// Override the forum posts JSONL path
    #[arg(long, global = true)]
    pub forum: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log debug events to stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a topic: visit every reply in order and record progress
    Read {
        /// Topic ID
        topic: u64,
    },

    /// List topics with their unread classification
    Topics,

    /// Print the link to the first unread reply of a topic
    FirstUnread {
        /// Topic ID
        topic: u64,
    },

    /// Forget all read progress for the user
    MarkUnread,

    /// Mark every known topic read up to its newest reply
    MarkRead,

    /// Record that the user created a topic (its opening post counts as read)
    NewTopic {
        /// Topic ID
        topic: u64,
    },

    /// Decode a persisted read-map string
    Decode {
        /// Encoded map, e.g. "|5:3|7:2"
        encoded: String,
    },
}
