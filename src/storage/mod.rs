//! Storage layer for hybridcrypt
//!
//! Persists RSA keys as PEM and everything else (wrapped data keys,
//! plaintext, ciphertext) as raw bytes with atomic writes and automatic
//! directory creation.

pub mod file_io;
pub mod keys;

pub use file_io::{load_bytes, save_bytes};
pub use keys::{
    load_private_key, load_public_key, save_key_pair, save_private_key, save_public_key,
};
