//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod config;
pub mod crypt;

pub use config::{handle_init_command, handle_show_config};
pub use crypt::{handle_crypt_command, CryptCommand};
