// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! Config persistence with at-rest key encryption
//!
//! Loading decrypts sealed API keys into memory; saving seals any plaintext
//! keys before the document touches disk. A key that fails to decrypt is
//! replaced by the empty string and logged, never fatal, so startup always
//! proceeds to the audit.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::settings::Settings;
use crate::error::Result;
use crate::security::secrets::SecretStore;
use crate::utils::{atomic_write, restrict_dir_permissions, restrict_file_permissions};

const CONFIG_FILE: &str = "config.toml";
const KEY_FILE: &str = ".encryption_key";

const KNOWN_KEYS: &[&str] = &[
    "provider",
    "openai_api_key",
    "perplexity_api_key",
    "model",
    "temperature",
    "max_tokens",
    "system_prompt",
    "save_history",
    "show_tokens",
];

/// Resolve the application home directory.
///
/// `CHATAPI_HOME` overrides the default of `~/.chatapi-cli`.
pub fn chatapi_home() -> PathBuf {
    if let Ok(dir) = env::var("CHATAPI_HOME") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".chatapi-cli"))
        .unwrap_or_else(|| PathBuf::from(".chatapi-cli"))
}

/// Loads and saves the config document under a single directory.
pub struct ConfigStore {
    config_path: PathBuf,
    secrets: SecretStore,
}

impl ConfigStore {
    /// Store rooted at the default home directory
    pub fn new() -> Self {
        Self::with_dir(chatapi_home())
    }

    /// Store rooted at an explicit directory
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            config_path: dir.join(CONFIG_FILE),
            secrets: SecretStore::new(dir.join(KEY_FILE)),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the settings, synthesizing and persisting defaults on first run.
    pub fn load(&self) -> Result<Settings> {
        if !self.config_path.exists() {
            let settings = Settings::first_run();
            self.save(&settings)?;
            info!(path = %self.config_path.display(), "created default config");
            return Ok(settings);
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let document: toml::Value = toml::from_str(&contents)?;
        if let Some(table) = document.as_table() {
            for key in table.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    warn!(key = %key, "ignoring unknown config key");
                }
            }
        }

        let mut settings: Settings = document.try_into()?;
        settings.openai_api_key = self.unseal("OpenAI", settings.openai_api_key);
        settings.perplexity_api_key = self.unseal("Perplexity", settings.perplexity_api_key);
        Ok(settings)
    }

    /// Persist the settings, sealing any plaintext API keys.
    ///
    /// The caller's in-memory settings are left untouched; encryption
    /// happens on a copy.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let mut on_disk = settings.clone();
        on_disk.openai_api_key = self.seal(on_disk.openai_api_key)?;
        on_disk.perplexity_api_key = self.seal(on_disk.perplexity_api_key)?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
            restrict_dir_permissions(parent)?;
        }

        let contents = toml::to_string_pretty(&on_disk)?;
        atomic_write(&self.config_path, contents.as_bytes())?;
        restrict_file_permissions(&self.config_path)?;
        Ok(())
    }

    /// Seal a key for storage. Empty values and values that already carry
    /// the ciphertext tag pass through unchanged, so saving is idempotent.
    fn seal(&self, value: String) -> Result<String> {
        if value.is_empty() || SecretStore::is_encrypted(&value) {
            return Ok(value);
        }
        Ok(self.secrets.encrypt(&value)?)
    }

    /// Decrypt a stored key. Plaintext values pass through for backward
    /// compatibility; an undecryptable value becomes the empty string.
    fn unseal(&self, label: &str, value: String) -> String {
        if !SecretStore::is_encrypted(&value) {
            return value;
        }
        match self.secrets.decrypt(&value) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                error!(provider = label, %e, "failed to decrypt stored API key");
                String::new()
            }
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
