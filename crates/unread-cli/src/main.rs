//! Unread CLI: the `unread` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use support::Env;

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.verbose);
    let env = Env::from_cli(&cli);

    match cli.command {
        Commands::Read { topic } => commands::read::run(&env, topic),

        Commands::Topics => commands::topics::run(&env),

        Commands::FirstUnread { topic } => commands::first_unread::run(&env, topic),

        Commands::MarkUnread => commands::mark::run_unread(&env),

        Commands::MarkRead => commands::mark::run_read(&env),

        Commands::NewTopic { topic } => commands::new_topic::run(&env, topic),

        Commands::Decode { encoded } => commands::decode::run(&env, &encoded),
    }
}
