//! Custom error types for hybridcrypt
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions. Errors raised while unwrapping keys carry
//! no detail about which check failed.

use std::path::Path;

use thiserror::Error;

/// The main error type for hybridcrypt operations
#[derive(Error, Debug)]
pub enum HybridError {
    /// A size or parameter outside the accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Symmetric key size not in {128, 192, 256}
    #[error("Invalid key size: {0} bits (choose 128, 192 or 256)")]
    InvalidKeySize(u32),

    /// Input buffer is structurally unusable (e.g. too short)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Key file does not exist
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Key file exists but could not be parsed
    #[error("Malformed key in {path}: {reason}")]
    MalformedKey { path: String, reason: String },

    /// Data exceeds the OAEP plaintext bound for the modulus
    #[error("Payload too large to wrap: {len} bytes (maximum {max})")]
    PayloadTooLarge { len: usize, max: usize },

    /// Symmetric unpadding failed (wrong key, corrupted data or size mismatch)
    #[error("Padding error: invalid key or corrupted data")]
    Padding,

    /// Asymmetric unwrap failed
    #[error("Decryption failed")]
    Decryption,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HybridError {
    /// Create a "key not found" error for a path
    pub fn key_not_found(path: impl AsRef<Path>) -> Self {
        Self::KeyNotFound(path.as_ref().display().to_string())
    }

    /// Create a "malformed key" error for a path
    pub fn malformed_key(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this is a "key not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }

    /// Check if this error came from a failed decryption (either layer)
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::Padding | Self::Decryption)
    }
}

impl From<std::io::Error> for HybridError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for hybridcrypt operations
pub type HybridResult<T> = Result<T, HybridError>;
