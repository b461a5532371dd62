// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! End-to-end tests for config persistence, key sealing, and the audit.

use std::fs;

use tempfile::TempDir;

use chatapi::config::validation::validate_settings;
use chatapi::config::{ConfigStore, Settings};
use chatapi::security::SecretStore;

fn openai_key() -> String {
    format!("sk-{}", "a".repeat(48))
}

fn perplexity_key() -> String {
    format!("pplx-{}", "b".repeat(40))
}

#[test]
fn first_run_writes_defaults_and_key_material_stays_private() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::with_dir(dir.path());

    let settings = store.load().unwrap();
    assert_eq!(settings.model, "gpt-3.5-turbo");
    assert!((settings.temperature - 0.7).abs() < f64::EPSILON);
    assert_eq!(settings.max_tokens, 1000);
    assert!(settings.save_history);

    let raw = fs::read_to_string(store.config_path()).unwrap();
    assert!(raw.contains("provider"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(store.config_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn api_keys_never_hit_disk_in_plaintext() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::with_dir(dir.path());

    let mut settings = Settings::default();
    settings.openai_api_key = openai_key();
    settings.perplexity_api_key = perplexity_key();
    store.save(&settings).unwrap();

    let raw = fs::read_to_string(store.config_path()).unwrap();
    assert!(!raw.contains(&openai_key()));
    assert!(!raw.contains(&perplexity_key()));
    assert_eq!(raw.matches("encrypted:").count(), 2);

    // And they come back intact
    let loaded = store.load().unwrap();
    assert_eq!(loaded.openai_api_key, openai_key());
    assert_eq!(loaded.perplexity_api_key, perplexity_key());
}

#[test]
fn encryption_key_file_appears_on_first_seal_only() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::with_dir(dir.path());
    let key_path = dir.path().join(".encryption_key");

    // Nothing to seal: no key material needed
    store.save(&Settings::default()).unwrap();
    assert!(!key_path.exists());

    let mut settings = Settings::default();
    settings.openai_api_key = openai_key();
    store.save(&settings).unwrap();
    assert!(key_path.exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&key_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn losing_the_encryption_key_degrades_to_audit_finding() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::with_dir(dir.path());

    let mut settings = Settings::default();
    settings.openai_api_key = openai_key();
    store.save(&settings).unwrap();

    // Simulate a lost key file: seal again under a fresh key
    fs::remove_file(dir.path().join(".encryption_key")).unwrap();
    let rogue = SecretStore::new(dir.path().join(".encryption_key"));
    rogue.encrypt("prime the new key").unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.openai_api_key, "");

    let findings = validate_settings(&loaded);
    assert!(findings.iter().any(|f| f == "OpenAI API key not set"));
}

#[test]
fn audit_reports_key_missing_for_selected_provider_only() {
    let mut settings = Settings::default();
    settings.provider = "perplexity".to_string();
    settings.openai_api_key = String::new();
    settings.perplexity_api_key = String::new();

    let findings = validate_settings(&settings);
    assert_eq!(findings, vec!["Perplexity API key not set".to_string()]);
}

#[test]
fn audit_flags_malformed_key_and_bad_sampling_values() {
    let mut settings = Settings::default();
    settings.openai_api_key = "sk-short".to_string();
    settings.temperature = 9.0;
    settings.max_tokens = 0;

    let findings = validate_settings(&settings);
    assert!(findings.contains(&"Invalid OpenAI API key format".to_string()));
    assert!(findings.contains(&"Temperature must be between 0.0 and 2.0".to_string()));
    assert!(findings.contains(&"Max tokens must be between 1 and 100000".to_string()));
}

#[test]
fn provider_switch_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let store = ConfigStore::with_dir(dir.path());

    let mut settings = store.load().unwrap();
    settings.provider = "perplexity".to_string();
    settings.model = "llama-3.1-sonar-small-128k-online".to_string();
    store.save(&settings).unwrap();

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.provider, "perplexity");
    assert_eq!(reloaded.model, "llama-3.1-sonar-small-128k-online");
    assert!(validate_settings(&reloaded)
        .iter()
        .all(|f| !f.contains("Invalid model")));
}

#[test]
fn hand_edited_config_with_missing_fields_loads_with_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "provider = \"openai\"\nmodel = \"gpt-4\"\n",
    )
    .unwrap();

    let store = ConfigStore::with_dir(dir.path());
    let settings = store.load().unwrap();
    assert_eq!(settings.model, "gpt-4");
    assert_eq!(settings.max_tokens, 1000);
    assert_eq!(settings.system_prompt, "You are a helpful assistant.");
}
