use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::compose::Platform;
use crate::engine::SortKey;
use crate::generate::DEFAULT_MODEL;

#[derive(Parser, Debug)]
#[command(name = "weeklog")]
#[command(version, about = "A personal activity log with AI-assisted post drafting")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the log database
    #[arg(long, global = true, default_value = "db.json")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty log database
    Init,

    /// Log a new accomplishment
    Add {
        /// Entry title
        title: String,

        /// What you did
        #[arg(long, short = 'd', default_value = "")]
        description: String,

        /// Display-only image URL
        #[arg(long)]
        image_url: Option<String>,

        /// Tags (repeatable; comma-separated values are split)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show entries for the current week (or an explicit range), one page at a time
    List {
        /// Case-insensitive title search
        #[arg(long, default_value = "")]
        search: String,

        /// Keep only entries carrying this exact tag
        #[arg(long)]
        tag: Option<String>,

        /// Range start (YYYY-MM-DD); requires --to
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Range end (YYYY-MM-DD); requires --from
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,

        /// Sort key: date (most recent first) or title
        #[arg(long, default_value = "date")]
        sort: SortKey,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// List the whole store, ignoring the time window
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single entry by ID prefix
    Get {
        /// Entry ID (UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace an entry's title, description, image URL, and tags
    Update {
        /// Entry ID (UUID or unique prefix)
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// New image URL (empty string clears it)
        #[arg(long)]
        image_url: Option<String>,

        /// Replacement tags (repeatable; omit to keep current tags)
        #[arg(long = "tag", short = 't')]
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry ID (UUID or unique prefix)
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Per-day contribution counts
    Heatmap {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draft a social post from this week's entries
    Post {
        /// Target platform: linkedin or twitter
        #[arg(long, default_value = "linkedin")]
        platform: Platform,

        /// Tone directive
        #[arg(long, default_value = "professional")]
        tone: String,

        /// Length directive
        #[arg(long, default_value = "medium")]
        length: String,

        /// Emoji density, 0-100
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u8).range(0..=100))]
        emoji: u8,

        /// End the post with a call to action
        #[arg(long)]
        cta: bool,

        /// Refine instead of drafting fresh; reads the prior post from stdin
        #[arg(long, value_name = "INSTRUCTION")]
        refine: Option<String>,

        /// Print the prompt without calling the API
        #[arg(long)]
        show_prompt: bool,

        /// Model name
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the HTTP server
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:3000")]
        listen: String,

        /// Model name for the /generate proxy
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },
}
