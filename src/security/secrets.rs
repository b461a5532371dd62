// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 ChatAPI CLI Developers

//! At-rest encryption for stored API keys.
//!
//! Keys written to the config file are sealed with XChaCha20-Poly1305 under a
//! per-installation key kept next to the config. Stored ciphertexts carry the
//! `encrypted:` prefix so plaintext and sealed values can coexist in the same
//! file. Decryption happens only in memory; plaintext keys are never written
//! back to disk.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use thiserror::Error;
use tracing::debug;

use crate::utils::{restrict_dir_permissions, restrict_file_permissions};

/// Prefix marking a config value as sealed.
pub const CIPHERTEXT_PREFIX: &str = "encrypted:";

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;

/// Errors from the secret store.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encryption key file is malformed")]
    MalformedKeyFile,

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed")]
    DecryptionFailed,
}

/// Lifecycle of the per-installation encryption key plus seal/unseal.
///
/// The key file is created lazily on first use, so a run that never touches
/// an encrypted value never creates it.
pub struct SecretStore {
    key_path: PathBuf,
}

impl SecretStore {
    pub fn new(key_path: PathBuf) -> Self {
        Self { key_path }
    }

    /// Whether a stored value is sealed.
    pub fn is_encrypted(value: &str) -> bool {
        value.starts_with(CIPHERTEXT_PREFIX)
    }

    /// Seal a plaintext secret into its storable form.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, SecretError> {
        let key = self.load_or_create_key()?;
        let cipher = XChaCha20Poly1305::new(&key);

        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| SecretError::EncryptionFailed)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(format!("{}{}", CIPHERTEXT_PREFIX, BASE64.encode(sealed)))
    }

    /// Unseal a stored value back to plaintext.
    ///
    /// Fails if the value was sealed under a different key or has been
    /// tampered with.
    pub fn decrypt(&self, stored: &str) -> Result<String, SecretError> {
        let encoded = stored.strip_prefix(CIPHERTEXT_PREFIX).unwrap_or(stored);

        let sealed = BASE64
            .decode(encoded)
            .map_err(|_| SecretError::DecryptionFailed)?;
        if sealed.len() <= NONCE_LEN {
            return Err(SecretError::DecryptionFailed);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);

        let key = self.load_or_create_key()?;
        let cipher = XChaCha20Poly1305::new(&key);
        let plaintext = cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| SecretError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| SecretError::DecryptionFailed)
    }

    fn load_or_create_key(&self) -> Result<Key, SecretError> {
        if let Some(key) = self.read_key()? {
            return Ok(key);
        }

        let key = XChaCha20Poly1305::generate_key(&mut OsRng);
        if let Some(parent) = self.key_path.parent() {
            fs::create_dir_all(parent)?;
            restrict_dir_permissions(parent)?;
        }

        // O_CREAT|O_EXCL so concurrent first runs agree on a single key. The
        // loser of the race reads back the winner's file.
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.key_path)
        {
            Ok(mut file) => {
                file.write_all(BASE64.encode(key).as_bytes())?;
                file.sync_all()?;
                restrict_file_permissions(&self.key_path)?;
                debug!(path = %self.key_path.display(), "created encryption key file");
                Ok(key)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                self.read_key()?.ok_or(SecretError::MalformedKeyFile)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read_key(&self) -> Result<Option<Key>, SecretError> {
        let encoded = match fs::read_to_string(&self.key_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|_| SecretError::MalformedKeyFile)?;
        if bytes.len() != KEY_LEN {
            return Err(SecretError::MalformedKeyFile);
        }
        Ok(Some(*Key::from_slice(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SecretStore {
        SecretStore::new(dir.path().join("encryption.key"))
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let sealed = store.encrypt("sk-secret").unwrap();
        assert!(sealed.starts_with(CIPHERTEXT_PREFIX));
        assert!(!sealed.contains("sk-secret"));

        assert_eq!(store.decrypt(&sealed).unwrap(), "sk-secret");
    }

    #[test]
    fn test_encrypt_is_nondeterministic() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let a = store.encrypt("same").unwrap();
        let b = store.encrypt("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_file_created_lazily() {
        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join("encryption.key");
        let store = SecretStore::new(key_path.clone());

        assert!(!key_path.exists());
        store.encrypt("x").unwrap();
        assert!(key_path.exists());
    }

    #[test]
    fn test_key_reused_across_instances() {
        let dir = TempDir::new().unwrap();
        let sealed = store_in(&dir).encrypt("persistent").unwrap();

        let second = store_in(&dir);
        assert_eq!(second.decrypt(&sealed).unwrap(), "persistent");
    }

    #[test]
    fn test_decrypt_with_wrong_key_fails() {
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();

        let sealed = store_in(&dir_a).encrypt("secret").unwrap();
        let result = store_in(&dir_b).decrypt(&sealed);
        assert!(matches!(result, Err(SecretError::DecryptionFailed)));
    }

    #[test]
    fn test_decrypt_garbage_fails() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.decrypt("encrypted:not-base64!!!").is_err());
        assert!(store.decrypt("encrypted:YWJj").is_err());
    }

    #[test]
    fn test_malformed_key_file() {
        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join("encryption.key");
        fs::write(&key_path, "not a key").unwrap();

        let store = SecretStore::new(key_path);
        assert!(matches!(
            store.encrypt("x"),
            Err(SecretError::MalformedKeyFile)
        ));
    }

    #[test]
    fn test_is_encrypted() {
        assert!(SecretStore::is_encrypted("encrypted:abc"));
        assert!(!SecretStore::is_encrypted("sk-plaintext"));
        assert!(!SecretStore::is_encrypted(""));
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let key_path = dir.path().join("keys").join("encryption.key");
        let store = SecretStore::new(key_path.clone());
        store.encrypt("x").unwrap();

        let mode = fs::metadata(&key_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let dir_mode = fs::metadata(key_path.parent().unwrap())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(dir_mode & 0o777, 0o700);
    }
}
