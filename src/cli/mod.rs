//! CLI module
//!
//! Command-line interface over the feed and the local like state.
//!
//! # Commands
//!
//! - `feed` - Page through the feed until exhausted or `--pages` pages
//! - `post` - Show one post and its detail metadata
//! - `all` - Fetch every post without pagination
//! - `like` / `unlike` - Change local like state
//! - `likes` - List liked posts and tallies
//! - `whoami` - Show the anonymous visitor id

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
