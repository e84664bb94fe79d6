use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hybridcrypt::cli::{handle_crypt_command, handle_init_command, handle_show_config, CryptCommand};
use hybridcrypt::config::Settings;
use hybridcrypt::crypto::{KeySize, PaddingMode};
use hybridcrypt::services::HybridService;

#[derive(Parser)]
#[command(
    name = "hybridcrypt",
    version,
    about = "Hybrid envelope encryption with RSA-wrapped data keys",
    long_about = "hybridcrypt encrypts files with a random Camellia data key and keeps \
                  that key on disk only in RSA-OAEP wrapped form. File locations come \
                  from a JSON settings file; run 'hybridcrypt init' to create one."
)]
struct Cli {
    /// Path to the JSON settings file
    #[arg(
        short,
        long,
        global = true,
        env = "HYBRIDCRYPT_CONFIG",
        default_value = "settings.json"
    )]
    config: PathBuf,

    /// Override the symmetric key size (128, 192 or 256)
    #[arg(short, long, global = true)]
    key_size: Option<KeySize>,

    /// Override the payload padding scheme
    #[arg(long, global = true, value_enum)]
    padding: Option<PaddingMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a settings file with default file names
    Init {
        /// Directory the key and data files will live in
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the resolved settings
    Config,

    #[command(flatten)]
    Crypt(CryptCommand),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "hybridcrypt=warn".into()),
        )
        .init();

    let Cli {
        config,
        key_size,
        padding,
        command,
    } = Cli::parse();

    match command {
        Commands::Init { dir, force } => handle_init_command(&config, &dir, force)?,
        Commands::Config => {
            let settings = load_settings(&config, key_size, padding)?;
            handle_show_config(&config, &settings)?;
        }
        Commands::Crypt(cmd) => {
            let settings = load_settings(&config, key_size, padding)?;
            let service = HybridService::from_settings(&settings)?;
            handle_crypt_command(&service, &settings.paths, cmd)?;
        }
    }

    Ok(())
}

/// Load the settings file and apply command-line overrides
fn load_settings(
    config: &Path,
    key_size: Option<KeySize>,
    padding: Option<PaddingMode>,
) -> Result<Settings> {
    let mut settings = Settings::load(config)?;
    if let Some(key_size) = key_size {
        settings.key_size = key_size;
    }
    if let Some(padding) = padding {
        settings.padding = padding;
    }
    Ok(settings)
}
