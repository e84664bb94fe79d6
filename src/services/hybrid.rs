//! Hybrid envelope encryption service
//!
//! Composes the symmetric engine, the asymmetric engine and the storage
//! layer into the three user-facing operations. A fresh data key is wrapped
//! under the RSA public key at key-generation time; every later encrypt or
//! decrypt unwraps it with the private key and uses it for the payload.
//!
//! The key size is fixed when the service is built and must match the one
//! the key triple was generated with.

use rsa::RsaPrivateKey;
use tracing::{debug, info};

use crate::config::{HybridPaths, Settings};
use crate::crypto::{
    AsymmetricEngine, KeySize, PaddingMode, SymmetricEngine, SymmetricKey,
};
use crate::crypto::asymmetric::{MAX_MODULUS_BITS, MIN_MODULUS_BITS};
use crate::error::{HybridError, HybridResult};
use crate::storage::{load_bytes, load_private_key, save_bytes, save_key_pair};

/// Default RSA modulus for new key pairs
pub const DEFAULT_MODULUS_BITS: usize = 2048;

/// Service for generating key triples and encrypting/decrypting payloads
#[derive(Debug, Clone)]
pub struct HybridService {
    key_size: KeySize,
    modulus_bits: usize,
    symmetric: SymmetricEngine,
    asymmetric: AsymmetricEngine,
}

impl HybridService {
    /// Create a service with block-size padding and a 2048-bit modulus
    pub fn new(key_size: KeySize) -> Self {
        Self {
            key_size,
            modulus_bits: DEFAULT_MODULUS_BITS,
            symmetric: SymmetricEngine::default(),
            asymmetric: AsymmetricEngine::new(),
        }
    }

    /// Create a service from loaded settings
    pub fn from_settings(settings: &Settings) -> HybridResult<Self> {
        Self::new(settings.key_size)
            .with_padding(settings.padding)
            .with_modulus_bits(settings.modulus_bits)
    }

    /// Use a different padding scheme for payloads
    pub fn with_padding(mut self, padding: PaddingMode) -> Self {
        self.symmetric = SymmetricEngine::new(padding);
        self
    }

    /// Use a different RSA modulus size for `generate_keys`
    pub fn with_modulus_bits(mut self, modulus_bits: usize) -> HybridResult<Self> {
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&modulus_bits) {
            return Err(HybridError::InvalidParameter(format!(
                "RSA modulus must be between {} and {} bits, got {}",
                MIN_MODULUS_BITS, MAX_MODULUS_BITS, modulus_bits
            )));
        }
        self.modulus_bits = modulus_bits;
        Ok(self)
    }

    pub fn key_size(&self) -> KeySize {
        self.key_size
    }

    pub fn modulus_bits(&self) -> usize {
        self.modulus_bits
    }

    pub fn padding(&self) -> PaddingMode {
        self.symmetric.padding()
    }

    /// Generate a key pair and a wrapped data key, and write all three
    ///
    /// Everything is generated and wrapped before the first write. The
    /// writes themselves are not transactional: if the second or third
    /// fails, the files already written stay behind.
    pub fn generate_keys(&self, paths: &HybridPaths) -> HybridResult<()> {
        info!(
            key_size = self.key_size.bits(),
            modulus_bits = self.modulus_bits,
            "generating key triple"
        );

        let data_key = self.symmetric.generate_key(self.key_size.bits())?;
        let key_pair = self.asymmetric.generate_key_pair(self.modulus_bits)?;
        let wrapped = self
            .asymmetric
            .wrap_key(data_key.as_bytes(), &key_pair.public_key)?;
        drop(data_key);

        save_key_pair(&paths.private_key, &paths.public_key, &key_pair)?;
        save_bytes(&paths.symmetric_key, &wrapped)?;

        info!(
            private_key = %paths.private_key.display(),
            public_key = %paths.public_key.display(),
            symmetric_key = %paths.symmetric_key.display(),
            "key triple written"
        );
        Ok(())
    }

    /// Encrypt `paths.text` into `paths.encrypted_file`
    pub fn encrypt(&self, paths: &HybridPaths) -> HybridResult<()> {
        let data_key = self.unwrap_data_key(paths)?;

        let plaintext = load_bytes(&paths.text)?;
        let blob = self
            .symmetric
            .encrypt(&plaintext, &data_key, self.key_size.bits())?;
        save_bytes(&paths.encrypted_file, &blob)?;

        info!(
            input = %paths.text.display(),
            output = %paths.encrypted_file.display(),
            bytes = blob.len(),
            "payload encrypted"
        );
        Ok(())
    }

    /// Decrypt `paths.encrypted_file` into `paths.decrypted_file`
    pub fn decrypt(&self, paths: &HybridPaths) -> HybridResult<()> {
        let data_key = self.unwrap_data_key(paths)?;

        let blob = load_bytes(&paths.encrypted_file)?;
        let plaintext = self
            .symmetric
            .decrypt(&blob, &data_key, self.key_size.bits())?;
        save_bytes(&paths.decrypted_file, &plaintext)?;

        info!(
            input = %paths.encrypted_file.display(),
            output = %paths.decrypted_file.display(),
            bytes = plaintext.len(),
            "payload decrypted"
        );
        Ok(())
    }

    /// Load the wrapped data key and private key, then unwrap
    fn unwrap_data_key(&self, paths: &HybridPaths) -> HybridResult<SymmetricKey> {
        let wrapped = load_bytes(&paths.symmetric_key)?;
        let private_key: RsaPrivateKey = load_private_key(&paths.private_key)?;
        let data_key = self.asymmetric.unwrap_key(&private_key, &wrapped)?;

        debug!(key_len = data_key.len(), "unwrapped data key");
        Ok(data_key)
    }
}
