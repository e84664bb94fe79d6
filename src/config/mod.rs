//! Configuration module for hybridcrypt
//!
//! This module provides configuration management including:
//! - The six resolved file paths an operation works on
//! - Settings file persistence (JSON)

pub mod paths;
pub mod settings;

pub use paths::HybridPaths;
pub use settings::Settings;
