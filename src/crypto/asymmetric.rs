//! RSA-OAEP key wrapping
//!
//! The long-term RSA key pair only ever encrypts short data keys. Wrapping
//! uses OAEP with SHA-256 for both the label hash and MGF1, and no label.

use std::fmt;
use std::path::Path;

use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::{HybridError, HybridResult};
use crate::storage::keys::load_private_key;

use super::symmetric::SymmetricKey;

/// Fixed RSA public exponent
pub const PUBLIC_EXPONENT: u64 = 65_537;

/// Smallest modulus accepted for new key pairs
pub const MIN_MODULUS_BITS: usize = 2048;

/// Largest modulus the key loader accepts
pub const MAX_MODULUS_BITS: usize = 4096;

/// SHA-256 output length, used in the OAEP bound
const OAEP_HASH_LEN: usize = 32;

/// An RSA key pair
#[derive(Clone)]
pub struct AsymmetricKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

impl AsymmetricKeyPair {
    /// Modulus length in bits
    pub fn modulus_bits(&self) -> usize {
        self.public_key.n().bits()
    }
}

impl From<RsaPrivateKey> for AsymmetricKeyPair {
    fn from(private_key: RsaPrivateKey) -> Self {
        Self {
            public_key: private_key.to_public_key(),
            private_key,
        }
    }
}

// Private key stays out of Debug output
impl fmt::Debug for AsymmetricKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsymmetricKeyPair")
            .field("modulus_bits", &self.modulus_bits())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Largest payload OAEP-SHA256 can carry under this public key
pub fn max_wrap_len(public_key: &RsaPublicKey) -> usize {
    public_key.size().saturating_sub(2 * OAEP_HASH_LEN + 2)
}

/// RSA key generation and OAEP wrap/unwrap
#[derive(Debug, Clone, Copy, Default)]
pub struct AsymmetricEngine;

impl AsymmetricEngine {
    pub fn new() -> Self {
        Self
    }

    /// Generate a key pair with e = 65537
    pub fn generate_key_pair(&self, modulus_bits: usize) -> HybridResult<AsymmetricKeyPair> {
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&modulus_bits) {
            return Err(HybridError::InvalidParameter(format!(
                "RSA modulus must be between {} and {} bits, got {}",
                MIN_MODULUS_BITS, MAX_MODULUS_BITS, modulus_bits
            )));
        }

        let exponent = BigUint::from(PUBLIC_EXPONENT);
        let private_key = RsaPrivateKey::new_with_exp(&mut OsRng, modulus_bits, &exponent)
            .map_err(|e| HybridError::InvalidParameter(format!("RSA key generation failed: {}", e)))?;

        Ok(AsymmetricKeyPair::from(private_key))
    }

    /// Encrypt a short buffer (a data key) under `public_key`
    pub fn wrap_key(&self, data: &[u8], public_key: &RsaPublicKey) -> HybridResult<Vec<u8>> {
        let max = max_wrap_len(public_key);
        if data.len() > max {
            return Err(HybridError::PayloadTooLarge {
                len: data.len(),
                max,
            });
        }

        public_key
            .encrypt(&mut OsRng, Oaep::new::<Sha256>(), data)
            .map_err(|e| HybridError::InvalidParameter(format!("RSA-OAEP encryption failed: {}", e)))
    }

    /// Decrypt a wrapped data key
    ///
    /// The private-key operation is blinded. Every failure maps to the same
    /// [`HybridError::Decryption`].
    pub fn unwrap_key(&self, private_key: &RsaPrivateKey, wrapped: &[u8]) -> HybridResult<SymmetricKey> {
        private_key
            .decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), wrapped)
            .map(SymmetricKey::from_bytes)
            .map_err(|_| HybridError::Decryption)
    }

    /// Load the private key from `path`, then unwrap
    pub fn unwrap_key_from_file<P: AsRef<Path>>(
        &self,
        path: P,
        wrapped: &[u8],
    ) -> HybridResult<SymmetricKey> {
        let private_key = load_private_key(path)?;
        self.unwrap_key(&private_key, wrapped)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::OnceLock;

    /// One 2048-bit key pair shared by every test in the crate
    pub(crate) fn shared_key_pair() -> &'static AsymmetricKeyPair {
        static PAIR: OnceLock<AsymmetricKeyPair> = OnceLock::new();
        PAIR.get_or_init(|| AsymmetricEngine::new().generate_key_pair(2048).unwrap())
    }

    #[test]
    fn test_generate_key_pair() {
        let pair = shared_key_pair();
        assert_eq!(pair.modulus_bits(), 2048);
        assert_eq!(pair.public_key.e(), &BigUint::from(PUBLIC_EXPONENT));
        assert_eq!(pair.public_key, pair.private_key.to_public_key());
    }

    #[test]
    fn test_rejects_small_and_huge_moduli() {
        let engine = AsymmetricEngine::new();
        assert!(matches!(
            engine.generate_key_pair(1024),
            Err(HybridError::InvalidParameter(_))
        ));
        assert!(matches!(
            engine.generate_key_pair(8192),
            Err(HybridError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_max_wrap_len() {
        // 256-byte modulus minus two SHA-256 digests minus two
        assert_eq!(max_wrap_len(&shared_key_pair().public_key), 190);
    }

    #[test]
    fn test_wrap_unwrap_round_trip() {
        let engine = AsymmetricEngine::new();
        let pair = shared_key_pair();

        for len in [0usize, 16, 24, 32] {
            let data = vec![0xC3u8; len];
            let wrapped = engine.wrap_key(&data, &pair.public_key).unwrap();
            assert_eq!(wrapped.len(), 256);

            let unwrapped = engine.unwrap_key(&pair.private_key, &wrapped).unwrap();
            assert_eq!(unwrapped.as_bytes(), data.as_slice());
        }
    }

    #[test]
    fn test_wrap_is_randomized() {
        let engine = AsymmetricEngine::new();
        let pair = shared_key_pair();
        let a = engine.wrap_key(b"0123456789abcdef", &pair.public_key).unwrap();
        let b = engine.wrap_key(b"0123456789abcdef", &pair.public_key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrap_boundary() {
        let engine = AsymmetricEngine::new();
        let pair = shared_key_pair();
        let max = max_wrap_len(&pair.public_key);

        let at_limit = vec![1u8; max];
        let wrapped = engine.wrap_key(&at_limit, &pair.public_key).unwrap();
        let unwrapped = engine.unwrap_key(&pair.private_key, &wrapped).unwrap();
        assert_eq!(unwrapped.as_bytes(), at_limit.as_slice());

        let over_limit = vec![1u8; max + 1];
        assert!(matches!(
            engine.wrap_key(&over_limit, &pair.public_key),
            Err(HybridError::PayloadTooLarge { len, max: m }) if len == max + 1 && m == max
        ));
    }

    #[test]
    fn test_tampered_wrap_fails_opaquely() {
        let engine = AsymmetricEngine::new();
        let pair = shared_key_pair();
        let mut wrapped = engine.wrap_key(&[9u8; 32], &pair.public_key).unwrap();
        wrapped[100] ^= 0x80;

        let err = engine.unwrap_key(&pair.private_key, &wrapped).unwrap_err();
        assert!(matches!(err, HybridError::Decryption));
        assert_eq!(err.to_string(), "Decryption failed");

        let err = engine.unwrap_key(&pair.private_key, &wrapped[..10]).unwrap_err();
        assert!(matches!(err, HybridError::Decryption));
    }

    #[test]
    fn test_unwrap_from_missing_file() {
        let engine = AsymmetricEngine::new();
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = engine
            .unwrap_key_from_file(temp_dir.path().join("absent.pem"), &[0u8; 256])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_key_pair_debug_redacted() {
        let debug = format!("{:?}", shared_key_pair());
        assert!(debug.contains("2048"));
        assert!(debug.contains("REDACTED"));
    }
}
