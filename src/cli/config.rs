//! Settings CLI commands
//!
//! Creates a starter settings file and shows the resolved configuration.

use std::path::Path;

use crate::config::{HybridPaths, Settings};
use crate::error::{HybridError, HybridResult};

/// Write a settings file naming default files under `dir`
pub fn handle_init_command(config_path: &Path, dir: &Path, force: bool) -> HybridResult<()> {
    if config_path.exists() && !force {
        return Err(HybridError::Config(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )));
    }

    let settings = Settings::new(HybridPaths::with_base_dir(dir));
    settings.save(config_path)?;

    println!("Wrote settings to {}", config_path.display());
    println!();
    println!("Put the text to encrypt in {}", settings.paths.text.display());
    println!("then run 'hybridcrypt generate-keys' and 'hybridcrypt encrypt'.");
    Ok(())
}

/// Print the resolved settings
pub fn handle_show_config(config_path: &Path, settings: &Settings) -> HybridResult<()> {
    println!("hybridcrypt Configuration");
    println!("=========================");
    println!("Settings file:  {}", config_path.display());
    println!();
    println!("Key size:       {} bits", settings.key_size);
    println!("RSA modulus:    {} bits", settings.modulus_bits);
    println!("Padding:        {}", settings.padding);
    println!();
    println!("Files:");
    for (name, path) in settings.paths.entries() {
        println!("  {:<15} {}", name, path.display());
    }
    Ok(())
}
