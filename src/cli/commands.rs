//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quiet Thoughts feed CLI
#[derive(Parser, Debug)]
#[command(name = "quiet-thoughts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through the feed
    Feed {
        /// Maximum pages to load (default: until exhausted)
        #[arg(long)]
        pages: Option<usize>,

        /// Override the configured page size
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show one post by id or `/post/{id}` path
    Post {
        /// Post id or detail path
        id: String,
    },

    /// Fetch every post without pagination
    All,

    /// Like a post
    Like {
        /// Post id
        id: String,
    },

    /// Remove a like
    Unlike {
        /// Post id
        id: String,
    },

    /// List liked posts and local tallies
    Likes,

    /// Show the anonymous visitor id
    Whoami,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
