//! Settings file for hybridcrypt
//!
//! A flat JSON object naming the six file paths, plus optional key-size,
//! modulus and padding preferences. Missing path keys are an error, never
//! defaulted.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::paths::HybridPaths;
use crate::crypto::{KeySize, PaddingMode};
use crate::error::{HybridError, HybridResult};
use crate::storage::save_bytes;

/// User settings for hybridcrypt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Symmetric key size in bits (128, 192 or 256)
    #[serde(default)]
    pub key_size: KeySize,

    /// RSA modulus size for new key pairs
    #[serde(default = "default_modulus_bits")]
    pub modulus_bits: usize,

    /// Padding scheme for payload encryption
    #[serde(default)]
    pub padding: PaddingMode,

    /// File locations
    #[serde(flatten)]
    pub paths: HybridPaths,
}

fn default_modulus_bits() -> usize {
    2048
}

impl Settings {
    /// Settings with default preferences for the given paths
    pub fn new(paths: HybridPaths) -> Self {
        Self {
            key_size: KeySize::default(),
            modulus_bits: default_modulus_bits(),
            padding: PaddingMode::default(),
            paths,
        }
    }

    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> HybridResult<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                HybridError::Config(format!("Settings file not found: {}", path.display()))
            }
            _ => HybridError::Io(format!("Failed to read settings file: {}", e)),
        })?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            HybridError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        settings.paths.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> HybridResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| HybridError::Config(format!("Failed to serialize settings: {}", e)))?;

        save_bytes(path, contents.as_bytes())
    }
}
