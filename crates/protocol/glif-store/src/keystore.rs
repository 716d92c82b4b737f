//! Encrypted keystore for EVM signing keys.
//!
//! Each key lives in its own JSON file named after its lowercase address.
//! Private keys are encrypted at rest using AES-256-GCM with a key derived
//! from the passphrase using Argon2id. An empty passphrase is allowed and
//! is what `wallet migrate` uses for the request key.

use std::fmt;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use glif_types::EthAddress;
use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};

/// Nonce length for AES-GCM.
const NONCE_LEN: usize = 12;

/// A secp256k1 private key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(SecretKey);

impl PrivateKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(SecretKey::new(&mut OsRng))
    }

    /// Parse 32 bytes of hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);
        let bytes = hex::decode(digits)
            .map_err(|e| StoreError::invalid_data(format!("private key is not hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        SecretKey::from_slice(bytes)
            .map(Self)
            .map_err(|e| StoreError::invalid_data(format!("invalid private key: {}", e)))
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.secret_bytes()
    }

    /// EVM address of this key.
    pub fn address(&self) -> EthAddress {
        let secp = Secp256k1::signing_only();
        let public = PublicKey::from_secret_key(&secp, &self.0);
        EthAddress::from_uncompressed_pubkey(&public.serialize_uncompressed())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey").field(&self.address()).finish()
    }
}

/// Stored key format.
#[derive(Serialize, Deserialize)]
struct StoredKey {
    /// Address of the key, checksummed.
    address: String,
    /// Argon2 salt (base64 encoded).
    salt: String,
    /// AES-GCM nonce (base64 encoded).
    nonce: String,
    /// Encrypted private key (base64 encoded).
    ciphertext: String,
}

/// Directory of passphrase-encrypted keys.
#[derive(Debug, Clone)]
pub struct KeyStore {
    dir: PathBuf,
}

impl KeyStore {
    /// Open the keystore, creating the directory if it doesn't exist.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, addr: &EthAddress) -> PathBuf {
        self.dir
            .join(format!("{}.json", addr.to_lower_hex().trim_start_matches("0x")))
    }

    /// Check if a key for `addr` exists.
    pub fn contains(&self, addr: &EthAddress) -> bool {
        self.key_path(addr).exists()
    }

    /// Addresses of all stored keys, sorted.
    pub fn accounts(&self) -> Result<Vec<EthAddress>> {
        let mut accounts = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(addr) = format!("0x{}", stem).parse::<EthAddress>() {
                accounts.push(addr);
            }
        }
        accounts.sort();
        Ok(accounts)
    }

    /// Encrypt `key` with `passphrase` and store it.
    ///
    /// Returns the address of the imported key.
    pub fn import(&self, key: &PrivateKey, passphrase: &str) -> Result<EthAddress> {
        let address = key.address();
        if self.contains(&address) {
            return Err(StoreError::KeyExists(address.to_checksum()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let encryption_key = derive_key(passphrase, &salt)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::Rng::fill(&mut OsRng, &mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(&encryption_key)
            .map_err(|e| StoreError::encryption(format!("Cipher init failed: {}", e)))?;
        let ciphertext = cipher
            .encrypt(nonce, key.to_bytes().as_ref())
            .map_err(|e| StoreError::encryption(format!("Encryption failed: {}", e)))?;

        let stored = StoredKey {
            address: address.to_checksum(),
            salt: salt.to_string(),
            nonce: STANDARD.encode(nonce_bytes),
            ciphertext: STANDARD.encode(&ciphertext),
        };

        let json = serde_json::to_string_pretty(&stored)?;
        let mut file = File::create(self.key_path(&address))?;
        file.write_all(json.as_bytes())?;

        debug!(address = %address, "Imported key into keystore");
        Ok(address)
    }

    /// Decrypt the key for `addr` with `passphrase`.
    pub fn unlock(&self, addr: &EthAddress, passphrase: &str) -> Result<PrivateKey> {
        let path = self.key_path(addr);
        if !path.exists() {
            return Err(StoreError::KeyNotFound(addr.to_checksum()));
        }

        let mut file = File::open(&path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let stored: StoredKey = serde_json::from_str(&contents)?;

        let salt = SaltString::from_b64(&stored.salt)
            .map_err(|e| StoreError::encryption(format!("Invalid salt: {}", e)))?;
        let encryption_key = derive_key(passphrase, &salt)?;

        let nonce_bytes = base64_decode(&stored.nonce)?;
        if nonce_bytes.len() != NONCE_LEN {
            return Err(StoreError::invalid_data("Invalid nonce length"));
        }
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = base64_decode(&stored.ciphertext)?;

        let cipher = Aes256Gcm::new_from_slice(&encryption_key)
            .map_err(|e| StoreError::encryption(format!("Cipher init failed: {}", e)))?;
        let plaintext = cipher
            .decrypt(nonce, ciphertext.as_ref())
            .map_err(|_| StoreError::encryption("Decryption failed - wrong passphrase?"))?;

        let key = PrivateKey::from_slice(&plaintext)?;
        if key.address() != *addr {
            return Err(StoreError::invalid_data("Stored key does not match its address"));
        }
        Ok(key)
    }

    /// Check whether `passphrase` unlocks `addr` without returning the key.
    pub fn can_unlock(&self, addr: &EthAddress, passphrase: &str) -> bool {
        self.unlock(addr, passphrase).is_ok()
    }
}

/// Derive a 32-byte AES key from the passphrase using Argon2id.
fn derive_key(passphrase: &str, salt: &SaltString) -> Result<[u8; 32]> {
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(passphrase.as_bytes(), salt)
        .map_err(|e| StoreError::encryption(format!("Key derivation failed: {}", e)))?;

    let hash_bytes = password_hash
        .hash
        .ok_or_else(|| StoreError::encryption("Failed to extract hash bytes"))?;
    let key_bytes = hash_bytes.as_bytes();
    if key_bytes.len() < 32 {
        return Err(StoreError::encryption("Derived key too short"));
    }
    let mut encryption_key = [0u8; 32];
    encryption_key.copy_from_slice(&key_bytes[..32]);
    Ok(encryption_key)
}

fn base64_decode(s: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(s)
        .map_err(|e| StoreError::invalid_data(format!("Invalid base64: {}", e)))
}
