//! Cryptographic engines for hybridcrypt
//!
//! Provides Camellia-CBC payload encryption with random data keys, and
//! RSA-OAEP wrapping of those data keys under a long-term key pair.

pub mod asymmetric;
pub mod symmetric;

pub use asymmetric::{max_wrap_len, AsymmetricEngine, AsymmetricKeyPair};
pub use symmetric::{generate_key, KeySize, PaddingMode, SymmetricEngine, SymmetricKey};
