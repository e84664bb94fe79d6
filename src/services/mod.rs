//! Service layer for hybridcrypt
//!
//! The service layer composes the crypto engines with the storage layer,
//! fixing the order in which keys are loaded, unwrapped and used.

pub mod hybrid;

pub use hybrid::{HybridService, DEFAULT_MODULUS_BITS};
