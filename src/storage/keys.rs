//! PEM persistence for RSA keys
//!
//! Private keys are written as unencrypted PKCS#8 (`BEGIN PRIVATE KEY`),
//! public keys as SubjectPublicKeyInfo (`BEGIN PUBLIC KEY`). Loading also
//! accepts the PKCS#1 `RSA PRIVATE KEY` / `RSA PUBLIC KEY` forms.
//!
//! There is no passphrase protection: anyone who can read the private key
//! file can unwrap every data key. On Unix the file is created owner-only.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::AsymmetricKeyPair;
use crate::error::{HybridError, HybridResult};

use super::file_io::write_atomic;

/// Permissions for private key files (rw-------)
const PRIVATE_KEY_MODE: u32 = 0o600;

/// Write the private and public halves of `pair` to their own files
pub fn save_key_pair<P, Q>(private_path: P, public_path: Q, pair: &AsymmetricKeyPair) -> HybridResult<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    save_private_key(private_path, &pair.private_key)?;
    save_public_key(public_path, &pair.public_key)
}

/// Write a private key as unencrypted PKCS#8 PEM
pub fn save_private_key<P: AsRef<Path>>(path: P, key: &RsaPrivateKey) -> HybridResult<()> {
    let path = path.as_ref();
    let pem = key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| HybridError::malformed_key(path, format!("encoding failed: {}", e)))?;

    write_atomic(path, pem.as_bytes(), Some(PRIVATE_KEY_MODE))?;
    debug!(path = %path.display(), "saved private key");
    Ok(())
}

/// Write a public key as SubjectPublicKeyInfo PEM
pub fn save_public_key<P: AsRef<Path>>(path: P, key: &RsaPublicKey) -> HybridResult<()> {
    let path = path.as_ref();
    let pem = key
        .to_public_key_pem(LineEnding::LF)
        .map_err(|e| HybridError::malformed_key(path, format!("encoding failed: {}", e)))?;

    write_atomic(path, pem.as_bytes(), None)?;
    debug!(path = %path.display(), "saved public key");
    Ok(())
}

/// Load a private key from a PKCS#8 or PKCS#1 PEM file
pub fn load_private_key<P: AsRef<Path>>(path: P) -> HybridResult<RsaPrivateKey> {
    let path = path.as_ref();
    let pem = Zeroizing::new(read_pem(path)?);

    if let Ok(key) = RsaPrivateKey::from_pkcs8_pem(&pem) {
        return Ok(key);
    }
    RsaPrivateKey::from_pkcs1_pem(&pem)
        .map_err(|_| HybridError::malformed_key(path, "not a PEM-encoded RSA private key"))
}

/// Load a public key from an SPKI or PKCS#1 PEM file
pub fn load_public_key<P: AsRef<Path>>(path: P) -> HybridResult<RsaPublicKey> {
    let path = path.as_ref();
    let pem = read_pem(path)?;

    if let Ok(key) = RsaPublicKey::from_public_key_pem(&pem) {
        return Ok(key);
    }
    RsaPublicKey::from_pkcs1_pem(&pem)
        .map_err(|_| HybridError::malformed_key(path, "not a PEM-encoded RSA public key"))
}

fn read_pem(path: &Path) -> HybridResult<String> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => HybridError::key_not_found(path),
        _ => HybridError::Io(format!("Failed to read {}: {}", path.display(), e)),
    })?;

    String::from_utf8(bytes).map_err(|_| HybridError::malformed_key(path, "file is not valid UTF-8"))
}
