//! Camellia-CBC payload encryption
//!
//! Encrypts arbitrary byte buffers with a random data key. Every call draws a
//! fresh IV which is prepended to the ciphertext, so a payload is
//! self-contained: `IV(16) || CBC(Pad(plaintext))`.
//!
//! There is no authentication tag. A modified ciphertext either fails to
//! unpad or decrypts to garbage; callers needing integrity must add it
//! themselves.

use std::fmt;
use std::str::FromStr;

use camellia::{Camellia128, Camellia192, Camellia256};
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{HybridError, HybridResult};

/// Size of the CBC initialization vector in bytes
pub const IV_SIZE: usize = 16;

/// Camellia block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Symmetric key length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum KeySize {
    Bits128,
    Bits192,
    #[default]
    Bits256,
}

impl KeySize {
    /// All supported sizes, smallest first
    pub const ALL: [KeySize; 3] = [KeySize::Bits128, KeySize::Bits192, KeySize::Bits256];

    /// Key length in bits
    pub fn bits(self) -> u32 {
        match self {
            KeySize::Bits128 => 128,
            KeySize::Bits192 => 192,
            KeySize::Bits256 => 256,
        }
    }

    /// Key length in bytes
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u32> for KeySize {
    type Error = HybridError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            128 => Ok(KeySize::Bits128),
            192 => Ok(KeySize::Bits192),
            256 => Ok(KeySize::Bits256),
            other => Err(HybridError::InvalidKeySize(other)),
        }
    }
}

impl From<KeySize> for u32 {
    fn from(size: KeySize) -> Self {
        size.bits()
    }
}

impl FromStr for KeySize {
    type Err = HybridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits: u32 = s
            .trim()
            .parse()
            .map_err(|_| HybridError::InvalidParameter(format!("'{}' is not a key size", s)))?;
        KeySize::try_from(bits)
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// How plaintext is padded before CBC encryption
///
/// `BlockSize` pads to the 16-byte cipher block. `KeyLength` pads to the key
/// length in bytes, which is how some older key files were produced; with a
/// 192-bit key that length is not block aligned and only some plaintext
/// lengths can be encrypted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PaddingMode {
    #[default]
    BlockSize,
    KeyLength,
}

impl PaddingMode {
    /// Padding block length in bytes for a given key size
    pub fn block_len(self, size: KeySize) -> usize {
        match self {
            PaddingMode::BlockSize => BLOCK_SIZE,
            PaddingMode::KeyLength => size.bytes(),
        }
    }
}

impl fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaddingMode::BlockSize => write!(f, "block_size"),
            PaddingMode::KeyLength => write!(f, "key_length"),
        }
    }
}

/// A raw symmetric data key, zeroed on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: Vec<u8>,
}

impl SymmetricKey {
    /// Wrap existing key bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Don't print key bytes in Debug output
impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Generate a random key of `bits` length from the OS CSPRNG
pub fn generate_key(bits: u32) -> HybridResult<SymmetricKey> {
    if bits == 0 || bits % 8 != 0 {
        return Err(HybridError::InvalidParameter(format!(
            "key length must be a positive multiple of 8 bits, got {}",
            bits
        )));
    }

    let mut bytes = vec![0u8; bits as usize / 8];
    OsRng.fill_bytes(&mut bytes);
    Ok(SymmetricKey::from_bytes(bytes))
}

/// Camellia-CBC engine
///
/// Holds nothing but the padding policy; keys and sizes are passed per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymmetricEngine {
    padding: PaddingMode,
}

impl SymmetricEngine {
    pub fn new(padding: PaddingMode) -> Self {
        Self { padding }
    }

    pub fn padding(&self) -> PaddingMode {
        self.padding
    }

    /// Generate a fresh data key
    pub fn generate_key(&self, bits: u32) -> HybridResult<SymmetricKey> {
        generate_key(bits)
    }

    /// Encrypt `plaintext`, returning `IV || ciphertext`
    pub fn encrypt(&self, plaintext: &[u8], key: &SymmetricKey, bits: u32) -> HybridResult<Vec<u8>> {
        let size = KeySize::try_from(bits)?;
        check_key_length(key, size)?;

        let mut iv = [0u8; IV_SIZE];
        OsRng.fill_bytes(&mut iv);

        let pad_len = match self.padding {
            PaddingMode::BlockSize => None,
            PaddingMode::KeyLength => Some(self.padding.block_len(size)),
        };

        let ciphertext = match size {
            KeySize::Bits128 => encrypt_cbc::<Camellia128>(key.as_bytes(), &iv, plaintext, pad_len)?,
            KeySize::Bits192 => encrypt_cbc::<Camellia192>(key.as_bytes(), &iv, plaintext, pad_len)?,
            KeySize::Bits256 => encrypt_cbc::<Camellia256>(key.as_bytes(), &iv, plaintext, pad_len)?,
        };

        let mut blob = Vec::with_capacity(IV_SIZE + ciphertext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypt an `IV || ciphertext` blob produced by [`SymmetricEngine::encrypt`]
    pub fn decrypt(&self, blob: &[u8], key: &SymmetricKey, bits: u32) -> HybridResult<Vec<u8>> {
        if blob.len() < IV_SIZE {
            return Err(HybridError::InvalidInput(format!(
                "encrypted payload is {} bytes, shorter than the {}-byte IV",
                blob.len(),
                IV_SIZE
            )));
        }

        let size = KeySize::try_from(bits)?;
        check_key_length(key, size)?;

        let (iv, ciphertext) = blob.split_at(IV_SIZE);
        let pad_len = match self.padding {
            PaddingMode::BlockSize => None,
            PaddingMode::KeyLength => Some(self.padding.block_len(size)),
        };

        match size {
            KeySize::Bits128 => decrypt_cbc::<Camellia128>(key.as_bytes(), iv, ciphertext, pad_len),
            KeySize::Bits192 => decrypt_cbc::<Camellia192>(key.as_bytes(), iv, ciphertext, pad_len),
            KeySize::Bits256 => decrypt_cbc::<Camellia256>(key.as_bytes(), iv, ciphertext, pad_len),
        }
    }
}

fn check_key_length(key: &SymmetricKey, size: KeySize) -> HybridResult<()> {
    if key.len() != size.bytes() {
        return Err(HybridError::InvalidParameter(format!(
            "key is {} bytes but the configured key size is {} bits",
            key.len(),
            size
        )));
    }
    Ok(())
}

/// `pad_len` of `None` uses PKCS#7 over the cipher block; `Some(n)` pads to `n` bytes.
fn encrypt_cbc<C>(
    key: &[u8],
    iv: &[u8; IV_SIZE],
    plaintext: &[u8],
    pad_len: Option<usize>,
) -> HybridResult<Vec<u8>>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv).map_err(|_| {
        HybridError::InvalidParameter("cipher rejected the key or IV length".to_string())
    })?;

    match pad_len {
        None => Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        Some(block_len) => {
            let mut padded = pkcs7_pad(plaintext, block_len);
            let padded_len = padded.len();
            if padded_len % BLOCK_SIZE != 0 {
                padded.zeroize();
                return Err(HybridError::InvalidParameter(format!(
                    "{}-byte padding leaves {} bytes, not a multiple of the {}-byte cipher block",
                    block_len, padded_len, BLOCK_SIZE
                )));
            }
            let ciphertext = encryptor.encrypt_padded_vec_mut::<NoPadding>(&padded);
            padded.zeroize();
            Ok(ciphertext)
        }
    }
}

fn decrypt_cbc<C>(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    pad_len: Option<usize>,
) -> HybridResult<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv).map_err(|_| {
        HybridError::InvalidParameter("cipher rejected the key or IV length".to_string())
    })?;

    match pad_len {
        None => decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| HybridError::Padding),
        Some(block_len) => {
            let padded = decryptor
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
                .map_err(|_| HybridError::Padding)?;
            pkcs7_unpad(padded, block_len)
        }
    }
}

/// PKCS#7 pad to a multiple of `block_len` (1..=255)
fn pkcs7_pad(data: &[u8], block_len: usize) -> Vec<u8> {
    let pad = block_len - data.len() % block_len;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

fn pkcs7_unpad(mut data: Vec<u8>, block_len: usize) -> HybridResult<Vec<u8>> {
    let Some(&last) = data.last() else {
        return Err(HybridError::Padding);
    };
    let pad = last as usize;
    if data.len() % block_len != 0 || pad == 0 || pad > block_len {
        data.zeroize();
        return Err(HybridError::Padding);
    }

    let start = data.len() - pad;
    let mismatch = data[start..].iter().fold(0u8, |acc, &b| acc | (b ^ last));
    if mismatch != 0 {
        data.zeroize();
        return Err(HybridError::Padding);
    }

    data.truncate(start);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_for(size: KeySize) -> SymmetricKey {
        generate_key(size.bits()).unwrap()
    }

    #[test]
    fn test_generate_key_lengths() {
        for size in KeySize::ALL {
            assert_eq!(generate_key(size.bits()).unwrap().len(), size.bytes());
        }
        assert_eq!(generate_key(64).unwrap().len(), 8);
    }

    #[test]
    fn test_generate_key_rejects_bad_lengths() {
        assert!(matches!(generate_key(0), Err(HybridError::InvalidParameter(_))));
        assert!(matches!(generate_key(129), Err(HybridError::InvalidParameter(_))));
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = generate_key(256).unwrap();
        let b = generate_key(256).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_key_debug_redacted() {
        let key = SymmetricKey::from_bytes(vec![0xAB; 16]);
        let debug = format!("{:?}", key);
        assert!(debug.contains("SymmetricKey"));
        assert!(debug.contains("16"));
        assert!(!debug.contains("171"));
    }

    #[test]
    fn test_key_size_parsing() {
        assert_eq!("128".parse::<KeySize>().unwrap(), KeySize::Bits128);
        assert_eq!(KeySize::try_from(192).unwrap(), KeySize::Bits192);
        assert!(matches!(
            KeySize::try_from(2048),
            Err(HybridError::InvalidKeySize(2048))
        ));
        assert!("abc".parse::<KeySize>().is_err());
    }

    #[test]
    fn test_key_size_serde() {
        let json = serde_json::to_string(&KeySize::Bits192).unwrap();
        assert_eq!(json, "192");
        let size: KeySize = serde_json::from_str("128").unwrap();
        assert_eq!(size, KeySize::Bits128);
        assert!(serde_json::from_str::<KeySize>("100").is_err());
    }

    #[test]
    fn test_round_trip_all_sizes() {
        let engine = SymmetricEngine::default();
        let samples: [&[u8]; 4] = [b"", b"HELLO WORLD", &[7u8; 16], &[0x5Au8; 1000]];

        for size in KeySize::ALL {
            let key = key_for(size);
            for plaintext in samples {
                let blob = engine.encrypt(plaintext, &key, size.bits()).unwrap();
                assert_eq!(blob.len() % BLOCK_SIZE, 0);
                let decrypted = engine.decrypt(&blob, &key, size.bits()).unwrap();
                assert_eq!(decrypted, plaintext);
            }
        }
    }

    #[test]
    fn test_block_padding_lengths() {
        let engine = SymmetricEngine::default();
        let key = key_for(KeySize::Bits256);

        let blob = engine.encrypt(b"", &key, 256).unwrap();
        assert_eq!(blob.len(), IV_SIZE + 16);

        // A full block gains a whole block of padding
        let blob = engine.encrypt(&[1u8; 16], &key, 256).unwrap();
        assert_eq!(blob.len(), IV_SIZE + 32);
    }

    #[test]
    fn test_different_ivs() {
        let engine = SymmetricEngine::default();
        let key = key_for(KeySize::Bits128);

        let blob1 = engine.encrypt(b"same input", &key, 128).unwrap();
        let blob2 = engine.encrypt(b"same input", &key, 128).unwrap();

        assert_ne!(blob1[..IV_SIZE], blob2[..IV_SIZE]);
        assert_ne!(blob1, blob2);
    }

    #[test]
    fn test_invalid_key_size_rejected() {
        let engine = SymmetricEngine::default();
        let key = key_for(KeySize::Bits128);

        assert!(matches!(
            engine.encrypt(b"data", &key, 64),
            Err(HybridError::InvalidKeySize(64))
        ));
        let blob = engine.encrypt(b"data", &key, 128).unwrap();
        assert!(matches!(
            engine.decrypt(&blob, &key, 512),
            Err(HybridError::InvalidKeySize(512))
        ));
    }

    #[test]
    fn test_short_blob_is_invalid_input() {
        let engine = SymmetricEngine::default();
        let key = key_for(KeySize::Bits256);
        assert!(matches!(
            engine.decrypt(&[0u8; 15], &key, 256),
            Err(HybridError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_iv_only_blob_is_padding_error() {
        let engine = SymmetricEngine::default();
        let key = key_for(KeySize::Bits256);
        assert!(matches!(
            engine.decrypt(&[0u8; IV_SIZE], &key, 256),
            Err(HybridError::Padding)
        ));
    }

    #[test]
    fn test_unaligned_ciphertext_is_padding_error() {
        let engine = SymmetricEngine::default();
        let key = key_for(KeySize::Bits256);
        let mut blob = engine.encrypt(b"HELLO WORLD", &key, 256).unwrap();
        blob.pop();
        assert!(matches!(
            engine.decrypt(&blob, &key, 256),
            Err(HybridError::Padding)
        ));
    }

    #[test]
    fn test_tampered_ciphertext_never_yields_plaintext() {
        let engine = SymmetricEngine::default();
        let key = key_for(KeySize::Bits256);
        let plaintext = b"attack at dawn, bring the big ladder".to_vec();
        let blob = engine.encrypt(&plaintext, &key, 256).unwrap();

        for index in IV_SIZE..blob.len() {
            let mut tampered = blob.clone();
            tampered[index] ^= 0x01;
            match engine.decrypt(&tampered, &key, 256) {
                Err(err) => assert!(matches!(err, HybridError::Padding)),
                Ok(decrypted) => assert_ne!(decrypted, plaintext),
            }
        }
    }

    #[test]
    fn test_wrong_key_never_yields_plaintext() {
        let engine = SymmetricEngine::default();
        let key1 = key_for(KeySize::Bits256);
        let key2 = key_for(KeySize::Bits256);
        let blob = engine.encrypt(b"HELLO WORLD", &key1, 256).unwrap();

        if let Ok(decrypted) = engine.decrypt(&blob, &key2, 256) {
            assert_ne!(decrypted, b"HELLO WORLD");
        }
    }

    #[test]
    fn test_key_size_mismatch_never_yields_plaintext() {
        let engine = SymmetricEngine::default();
        let key = key_for(KeySize::Bits256);
        let blob = engine.encrypt(b"HELLO WORLD", &key, 256).unwrap();

        let result = engine.decrypt(&blob, &key, 128);
        assert!(result.is_err());
        if let Ok(decrypted) = result {
            assert_ne!(decrypted, b"HELLO WORLD");
        }
    }

    #[test]
    fn test_key_length_padding_round_trip() {
        let engine = SymmetricEngine::new(PaddingMode::KeyLength);
        let key = key_for(KeySize::Bits256);

        let blob = engine.encrypt(b"HELLO WORLD", &key, 256).unwrap();
        // 11 bytes padded to a 32-byte boundary
        assert_eq!(blob.len(), IV_SIZE + 32);
        assert_eq!(engine.decrypt(&blob, &key, 256).unwrap(), b"HELLO WORLD");

        let key = key_for(KeySize::Bits128);
        let blob = engine.encrypt(b"HELLO WORLD", &key, 128).unwrap();
        assert_eq!(blob.len(), IV_SIZE + 16);
        assert_eq!(engine.decrypt(&blob, &key, 128).unwrap(), b"HELLO WORLD");
    }

    #[test]
    fn test_key_length_padding_with_192_bit_key() {
        let engine = SymmetricEngine::new(PaddingMode::KeyLength);
        let key = key_for(KeySize::Bits192);

        // 24 bytes pad to 48, which is block aligned
        let blob = engine.encrypt(&[3u8; 24], &key, 192).unwrap();
        assert_eq!(blob.len(), IV_SIZE + 48);
        assert_eq!(engine.decrypt(&blob, &key, 192).unwrap(), vec![3u8; 24]);

        // 11 bytes pad to 24, which is not
        assert!(matches!(
            engine.encrypt(b"HELLO WORLD", &key, 192),
            Err(HybridError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_padding_modes_are_not_interchangeable() {
        let key = key_for(KeySize::Bits256);
        let key_length = SymmetricEngine::new(PaddingMode::KeyLength);
        let block_size = SymmetricEngine::new(PaddingMode::BlockSize);

        // 21 bytes of 0x15 padding is more than a block
        let blob = key_length.encrypt(b"HELLO WORLD", &key, 256).unwrap();
        assert!(matches!(
            block_size.decrypt(&blob, &key, 256),
            Err(HybridError::Padding)
        ));
    }

    #[test]
    fn test_pkcs7_unpad_rejects_malformed_trailers() {
        assert!(pkcs7_unpad(vec![], 16).is_err());
        assert!(pkcs7_unpad(vec![0u8; 16], 16).is_err());
        assert!(pkcs7_unpad(vec![17u8; 16], 16).is_err());

        let mut data = vec![0u8; 14];
        data.extend_from_slice(&[1, 2]);
        assert!(pkcs7_unpad(data, 16).is_err());

        let mut data = b"abc".to_vec();
        data.resize(16, 13);
        assert_eq!(pkcs7_unpad(data, 16).unwrap(), b"abc");
    }
}
