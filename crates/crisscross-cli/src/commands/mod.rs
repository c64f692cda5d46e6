//! CLI command definitions and handlers.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

pub mod completions;
pub mod init;
pub mod stats;
pub mod sync;
pub mod utils;

/// Crisscross - keep two branches merged into each other.
#[derive(Parser)]
#[command(name = "crisscross")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress informational output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the current branch and TARGET into each other and push both.
    ///
    /// Both branches are first brought up to date with the remote. The run
    /// stops at the first conflict and leaves it in place for you to
    /// resolve.
    Sync {
        /// Branch to sync the current branch with.
        target: String,

        /// Stage all changes and commit with this message first.
        #[arg(short, long)]
        message: Option<String>,

        /// Print the steps without running them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a default config to the repository's git directory.
    Init,

    /// Show lines added and deleted per author.
    Stats {
        /// Only report this author.
        #[arg(short, long)]
        author: Option<String>,

        /// Count commits on all branches.
        #[arg(long)]
        all_branches: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
