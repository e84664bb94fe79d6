//! File locations used by the hybrid operations
//!
//! Every operation works on a fixed set of six files. `HybridPaths` carries
//! them fully resolved; relative paths are resolved by the OS against the
//! current working directory, as with any command-line tool.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HybridError, HybridResult};

/// Default file names written by `init`
pub const DEFAULT_SYMMETRIC_KEY: &str = "symmetric.key";
pub const DEFAULT_PUBLIC_KEY: &str = "public.pem";
pub const DEFAULT_PRIVATE_KEY: &str = "private.pem";
pub const DEFAULT_TEXT: &str = "plain.txt";
pub const DEFAULT_ENCRYPTED: &str = "encrypted.bin";
pub const DEFAULT_DECRYPTED: &str = "decrypted.txt";

/// The six files a key triple and its payloads live in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridPaths {
    /// Wrapped (RSA-encrypted) data key
    pub symmetric_key: PathBuf,

    /// SPKI PEM public key
    #[serde(alias = "public_path")]
    pub public_key: PathBuf,

    /// PKCS#8 PEM private key
    #[serde(alias = "private_path")]
    pub private_key: PathBuf,

    /// Plaintext input for `encrypt`
    #[serde(alias = "plaintext")]
    pub text: PathBuf,

    /// Ciphertext output of `encrypt`, input of `decrypt`
    pub encrypted_file: PathBuf,

    /// Plaintext output of `decrypt`
    pub decrypted_file: PathBuf,
}

impl HybridPaths {
    /// Default file names placed under `base_dir`
    pub fn with_base_dir(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref();
        Self {
            symmetric_key: base_dir.join(DEFAULT_SYMMETRIC_KEY),
            public_key: base_dir.join(DEFAULT_PUBLIC_KEY),
            private_key: base_dir.join(DEFAULT_PRIVATE_KEY),
            text: base_dir.join(DEFAULT_TEXT),
            encrypted_file: base_dir.join(DEFAULT_ENCRYPTED),
            decrypted_file: base_dir.join(DEFAULT_DECRYPTED),
        }
    }

    /// All paths with their configuration key names
    pub fn entries(&self) -> [(&'static str, &Path); 6] {
        [
            ("symmetric_key", &self.symmetric_key),
            ("public_key", &self.public_key),
            ("private_key", &self.private_key),
            ("text", &self.text),
            ("encrypted_file", &self.encrypted_file),
            ("decrypted_file", &self.decrypted_file),
        ]
    }

    /// Reject empty paths, which serde would otherwise accept
    pub fn validate(&self) -> HybridResult<()> {
        for (name, path) in self.entries() {
            if path.as_os_str().is_empty() {
                return Err(HybridError::Config(format!("`{}` must not be empty", name)));
            }
        }
        Ok(())
    }
}
