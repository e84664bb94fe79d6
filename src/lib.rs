//! hybridcrypt - Hybrid envelope encryption
//!
//! Payloads are encrypted with a random Camellia data key in CBC mode. The
//! data key is never stored in the clear: it is wrapped with RSA-OAEP under
//! a long-term key pair, and unwrapped with the private key whenever a
//! payload is encrypted or decrypted.
//!
//! CBC provides confidentiality only. There is no MAC, so a modified
//! ciphertext is not reliably detected; it either fails to unpad or
//! decrypts to garbage.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `crypto`: Symmetric (Camellia-CBC) and asymmetric (RSA-OAEP) engines
//! - `storage`: PEM key files and atomic raw-byte file I/O
//! - `services`: The hybrid service composing engines and storage
//! - `config`: Settings file and resolved file paths
//! - `error`: Custom error types
//! - `cli`: Command handlers for the `hybridcrypt` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use hybridcrypt::config::HybridPaths;
//! use hybridcrypt::crypto::KeySize;
//! use hybridcrypt::services::HybridService;
//!
//! let paths = HybridPaths::with_base_dir("keys");
//! let service = HybridService::new(KeySize::Bits256);
//! service.generate_keys(&paths)?;
//! service.encrypt(&paths)?;
//! service.decrypt(&paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod services;
pub mod storage;

pub use error::{HybridError, HybridResult};
