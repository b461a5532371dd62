// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Command handlers behind the CLI surface
//!
//! Each handler owns the load-act-report cycle for one subcommand. Chat
//! failures after validation or retry exhaustion are printed, not
//! propagated; only setup problems such as a missing credential abort the
//! process.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::chat::ChatSession;
use crate::config::validation::validate_settings;
use crate::config::{ConfigStore, Settings};
use crate::error::{ChatApiError, Result};
use crate::history::{HistoryStore, Turn};
use crate::llm::factory::ProviderFactory;
use crate::llm::provider::Provider;
use crate::security::validation::{
    parse_max_tokens, parse_temperature, validate_api_key, validate_model,
};

const HISTORY_FILE: &str = "history.json";

/// How many turns the history views print
const HISTORY_VIEW: usize = 10;

fn history_path(home: &Path) -> PathBuf {
    home.join(HISTORY_FILE)
}

/// Print audit findings without blocking startup.
fn report_audit(settings: &Settings) {
    let findings = validate_settings(settings);
    if findings.is_empty() {
        return;
    }
    for finding in &findings {
        eprintln!("Warning: {finding}");
    }
    eprintln!("Run 'chatapi config set KEY VALUE' to fix your configuration.");
}

/// Run the chat subcommand: single-shot when a message is given, the
/// interactive loop otherwise.
pub async fn chat(home: &Path, message: Option<String>) -> Result<()> {
    let store = ConfigStore::with_dir(home);
    let settings = store.load()?;
    report_audit(&settings);

    let provider = ProviderFactory::create(&settings)?;
    let history = HistoryStore::load(history_path(home), settings.save_history);
    let mut session = ChatSession::new(settings.clone(), provider, history);

    match message {
        Some(message) => send_and_print(&mut session, &settings, &message).await,
        None => repl(&mut session, &settings).await,
    }
}

/// Send one message and print the outcome.
///
/// Validation rejections and exhausted retries come back as text on the
/// terminal; the process still exits cleanly so scripted callers can tell
/// "the provider was down" from "chatapi is misconfigured".
async fn send_and_print(
    session: &mut ChatSession,
    settings: &Settings,
    message: &str,
) -> Result<()> {
    match session.send(message).await {
        Ok(reply) => {
            println!("{}", reply.content);
            if settings.show_tokens {
                if let Some(usage) = &reply.usage {
                    println!("Tokens used: {}", usage.total_tokens);
                }
            }
            Ok(())
        }
        Err(ChatApiError::Validation(e)) => {
            eprintln!("Input validation error: {e}");
            Ok(())
        }
        Err(e @ ChatApiError::ProviderExhausted { .. }) => {
            println!("{e}");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Interactive chat loop on stdin.
async fn repl(session: &mut ChatSession, settings: &Settings) -> Result<()> {
    let provider = settings.resolved_provider();
    println!("ChatAPI CLI - {}", provider.display_name());
    println!("Type your message and press Enter. Type 'quit', 'exit', or 'q' to exit.");
    println!("Type 'help' for available commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!("\nGoodbye!");
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye!");
                break;
            }
            "help" => print_help(),
            "clear" => {
                session.clear_history();
                println!("Conversation history cleared.");
            }
            "history" => print_turns(session.history().recent(HISTORY_VIEW)),
            "config" => print_settings(settings),
            _ => {
                debug!("dispatching interactive message");
                println!("\nAssistant:");
                send_and_print(session, settings, input).await?;
            }
        }
    }
    Ok(())
}

fn print_help() {
    println!("Available commands:");
    println!("  help          Show this help message");
    println!("  quit/exit/q   Exit the program");
    println!("  clear         Clear conversation history");
    println!("  history       Show conversation history");
    println!("  config        Show current configuration");
    println!();
    println!("Anything else is sent to your configured AI provider.");
}

fn print_turns(turns: &[Turn]) {
    if turns.is_empty() {
        println!("No conversation history.");
        return;
    }
    for turn in turns {
        let preview = if turn.content.chars().count() > 100 {
            let cut: String = turn.content.chars().take(100).collect();
            format!("{cut}...")
        } else {
            turn.content.clone()
        };
        println!(
            "[{}] {}: {}",
            turn.timestamp.format("%H:%M:%S"),
            turn.role,
            preview
        );
    }
}

fn mask_key(value: &str) -> String {
    if value.is_empty() {
        "Not set".to_string()
    } else {
        let head: String = value.chars().take(10).collect();
        format!("{head}...")
    }
}

fn print_settings(settings: &Settings) {
    println!("provider: {}", settings.provider);
    println!("openai_api_key: {}", mask_key(&settings.openai_api_key));
    println!(
        "perplexity_api_key: {}",
        mask_key(&settings.perplexity_api_key)
    );
    println!("model: {}", settings.model);
    println!("temperature: {}", settings.temperature);
    println!("max_tokens: {}", settings.max_tokens);
    println!("system_prompt: {}", settings.system_prompt);
    println!("save_history: {}", settings.save_history);
    println!("show_tokens: {}", settings.show_tokens);
}

pub fn provider_show(home: &Path) -> Result<()> {
    let settings = ConfigStore::with_dir(home).load()?;
    println!(
        "Current provider: {}",
        settings.resolved_provider().display_name()
    );
    Ok(())
}

pub fn provider_set(home: &Path, name: &str) -> Result<()> {
    let provider: Provider = name.to_lowercase().parse()?;

    let store = ConfigStore::with_dir(home);
    let mut settings = store.load()?;
    settings.provider = provider.as_str().to_string();
    store.save(&settings)?;

    println!("Provider set to {}", provider.display_name());
    println!("Existing conversation history stays in the request window; run 'chatapi clear' to start fresh.");
    Ok(())
}

pub fn config_show(home: &Path) -> Result<()> {
    let settings = ConfigStore::with_dir(home).load()?;
    print_settings(&settings);
    Ok(())
}

/// Set one configuration value, parsing and checking it first so a typo
/// never lands in the config file.
pub fn config_set(home: &Path, key: &str, value: &str) -> Result<()> {
    let store = ConfigStore::with_dir(home);
    let mut settings = store.load()?;

    match key {
        "provider" => {
            let provider: Provider = value.to_lowercase().parse()?;
            settings.provider = provider.as_str().to_string();
        }
        "openai_api_key" => {
            if !validate_api_key(value, Provider::Openai) {
                return Err(ChatApiError::Config(
                    "Invalid OpenAI API key format".to_string(),
                ));
            }
            settings.openai_api_key = value.trim().to_string();
        }
        "perplexity_api_key" => {
            if !validate_api_key(value, Provider::Perplexity) {
                return Err(ChatApiError::Config(
                    "Invalid Perplexity API key format".to_string(),
                ));
            }
            settings.perplexity_api_key = value.trim().to_string();
        }
        "model" => {
            let provider = settings.resolved_provider();
            if !validate_model(value, provider) {
                return Err(ChatApiError::Config(format!(
                    "Invalid model '{}' for provider '{}'",
                    value,
                    provider.as_str()
                )));
            }
            settings.model = value.to_string();
        }
        "temperature" => {
            settings.temperature = parse_temperature(value)?;
        }
        "max_tokens" => {
            settings.max_tokens = parse_max_tokens(value)?;
        }
        "system_prompt" => {
            settings.system_prompt = value.to_string();
        }
        "save_history" => {
            settings.save_history = parse_bool(key, value)?;
        }
        "show_tokens" => {
            settings.show_tokens = parse_bool(key, value)?;
        }
        _ => {
            return Err(ChatApiError::Config(format!("Unknown setting '{key}'")));
        }
    }

    store.save(&settings)?;

    let shown = if key.ends_with("_api_key") {
        mask_key(value)
    } else {
        value.to_string()
    };
    println!("Set {key} = {shown}");
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| ChatApiError::Config(format!("{key} must be 'true' or 'false'")))
}

pub fn history_show(home: &Path) -> Result<()> {
    let history = HistoryStore::load(history_path(home), true);
    print_turns(history.recent(HISTORY_VIEW));
    Ok(())
}

pub fn history_clear(home: &Path) -> Result<()> {
    let mut history = HistoryStore::load(history_path(home), true);
    history.clear();
    println!("Conversation history cleared.");
    Ok(())
}
