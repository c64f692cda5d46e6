//! Crisscross CLI - keep two branches merged into each other.

use clap::Parser;

mod commands;
mod logging;
mod output;

use commands::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    output::set_quiet(cli.quiet);

    let result = match cli.command {
        Commands::Sync {
            target,
            message,
            dry_run,
        } => commands::sync::run(&target, message.as_deref(), dry_run),
        Commands::Init => commands::init::run(),
        Commands::Stats {
            author,
            all_branches,
            json,
        } => commands::stats::run(author.as_deref(), all_branches, json),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
