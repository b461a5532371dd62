// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! ChatAPI CLI - chat with OpenAI or Perplexity from your terminal
//!
//! Entry point for the `chatapi` binary.

use clap::Parser;

use chatapi::cli::commands;
use chatapi::cli::{Cli, Commands, ConfigCommand, ProviderCommand};
use chatapi::config::chatapi_home;
use chatapi::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // Practical debug toggle: `-v` enables chat diagnostics without requiring
    // users to know target names up front. `RUST_LOG` still takes precedence.
    if cli.verbose > 0 {
        let directive = if cli.verbose > 1 {
            "chatapi=trace"
        } else {
            "chatapi=debug"
        };
        if let Ok(parsed) = directive.parse() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let home = cli.home.unwrap_or_else(chatapi_home);

    match cli.command {
        Some(Commands::Chat(args)) => commands::chat(&home, args.message).await,
        Some(Commands::Provider(args)) => match args.command {
            ProviderCommand::Show => commands::provider_show(&home),
            ProviderCommand::Set { name } => commands::provider_set(&home, &name),
        },
        Some(Commands::Config(args)) => match args.command {
            ConfigCommand::Show => commands::config_show(&home),
            ConfigCommand::Set { key, value } => commands::config_set(&home, &key, &value),
        },
        Some(Commands::History) => commands::history_show(&home),
        Some(Commands::Clear) => commands::history_clear(&home),
        // No subcommand drops straight into the interactive loop
        None => commands::chat(&home, None).await,
    }
}
