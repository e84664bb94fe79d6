//! Key generation and payload CLI commands
//!
//! Thin wrappers around [`HybridService`] that report which files were
//! read and written.

use clap::Subcommand;

use crate::config::HybridPaths;
use crate::error::{HybridError, HybridResult};
use crate::services::HybridService;

/// Commands that run the hybrid operations
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptCommand {
    /// Generate an RSA key pair and a wrapped data key
    #[command(alias = "keygen")]
    GenerateKeys,

    /// Encrypt the plaintext file with the wrapped data key
    Encrypt,

    /// Decrypt the encrypted file with the wrapped data key
    Decrypt,

    /// Generate keys, encrypt, then decrypt
    Run,
}

/// Handle a key generation or payload command
pub fn handle_crypt_command(
    service: &HybridService,
    paths: &HybridPaths,
    cmd: CryptCommand,
) -> HybridResult<()> {
    match cmd {
        CryptCommand::GenerateKeys => generate_keys(service, paths),
        CryptCommand::Encrypt => encrypt(service, paths),
        CryptCommand::Decrypt => decrypt(service, paths),
        CryptCommand::Run => {
            generate_keys(service, paths)?;
            encrypt(service, paths)?;
            decrypt(service, paths)?;
            println!("Encryption and decryption have been completed.");
            Ok(())
        }
    }
}

fn generate_keys(service: &HybridService, paths: &HybridPaths) -> HybridResult<()> {
    println!(
        "Generating {}-bit RSA key pair and {}-bit data key...",
        service.modulus_bits(),
        service.key_size()
    );
    service.generate_keys(paths)?;

    println!("Private key:   {}", paths.private_key.display());
    println!("Public key:    {}", paths.public_key.display());
    println!("Wrapped key:   {}", paths.symmetric_key.display());
    println!();
    println!("The private key is stored unencrypted. Keep it out of shared locations.");
    Ok(())
}

fn encrypt(service: &HybridService, paths: &HybridPaths) -> HybridResult<()> {
    service.encrypt(paths).map_err(with_hint)?;
    println!(
        "Encrypted {} -> {}",
        paths.text.display(),
        paths.encrypted_file.display()
    );
    Ok(())
}

fn decrypt(service: &HybridService, paths: &HybridPaths) -> HybridResult<()> {
    service.decrypt(paths).map_err(with_hint)?;
    println!(
        "Decrypted {} -> {}",
        paths.encrypted_file.display(),
        paths.decrypted_file.display()
    );
    Ok(())
}

/// Point at the usual causes when a key or payload fails to decrypt
fn with_hint(err: HybridError) -> HybridError {
    if err.is_decryption_failure() {
        eprintln!(
            "Hint: the key files may not belong together, or the payload was \
             encrypted with a different --key-size or --padding."
        );
    }
    err
}
