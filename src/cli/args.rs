// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ChatAPI - command-line chat client for OpenAI and Perplexity
#[derive(Parser, Debug)]
#[command(name = "chatapi")]
#[command(version, about = "Command-line chat client for OpenAI and Perplexity")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Home directory for config, key, and history files
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the configured provider (default when no command given)
    Chat(ChatArgs),

    /// Manage the AI provider
    Provider(ProviderArgs),

    /// Manage configuration settings
    Config(ConfigArgs),

    /// Show conversation history
    History,

    /// Clear conversation history
    Clear,
}

/// Arguments for the chat subcommand
#[derive(clap::Args, Debug, Default)]
pub struct ChatArgs {
    /// Message to send; omit to start the interactive REPL
    pub message: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ProviderArgs {
    #[command(subcommand)]
    pub command: ProviderCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProviderCommand {
    /// Show the current provider
    Show,

    /// Set the provider (openai or perplexity)
    Set {
        /// Provider name
        name: String,
    },
}

#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the current configuration (keys masked)
    Show,

    /// Set a configuration value
    Set {
        /// Setting name (provider, model, temperature, max_tokens, ...)
        key: String,
        /// New value
        value: String,
    },
}
