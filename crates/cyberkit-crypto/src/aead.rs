//! AES-GCM authenticated encryption over text.
//!
//! Payload format (base64 of the binary layout):
//! ```text
//! [12 bytes: random IV][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! The key is the raw UTF-8 bytes of the key text and must be 16, 24 or 32
//! bytes long, selecting AES-128, AES-192 or AES-256. A fresh IV is drawn for
//! every encryption, so encrypting the same text twice yields different
//! payloads.

use aes_gcm::{
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
    aead::{Aead, KeyInit, consts::U12},
    aes::Aes192,
};
use tracing::{debug, warn};

use crate::encoding;
use crate::error::CipherError;
use crate::random::{OsRandom, RandomSource};

/// Size of the GCM IV in bytes
pub const IV_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Key sizes accepted for AES-128, AES-192 and AES-256
pub const VALID_KEY_SIZES: [usize; 3] = [16, 24, 32];

type Aes192Gcm = AesGcm<Aes192, U12>;

/// A validated AES-GCM key of one of the three supported sizes
enum AesKey {
    Aes128(Box<Aes128Gcm>),
    Aes192(Box<Aes192Gcm>),
    Aes256(Box<Aes256Gcm>),
}

impl AesKey {
    fn new(key: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKeyLength { actual: key.len() };
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key)
                .map(|c| Self::Aes128(Box::new(c)))
                .map_err(invalid),
            24 => Aes192Gcm::new_from_slice(key)
                .map(|c| Self::Aes192(Box::new(c)))
                .map_err(invalid),
            32 => Aes256Gcm::new_from_slice(key)
                .map(|c| Self::Aes256(Box::new(c)))
                .map_err(invalid),
            actual => Err(CipherError::InvalidKeyLength { actual }),
        }
    }

    #[allow(deprecated)] // aes-gcm uses generic-array 0.x, will be resolved when upgraded to 1.x
    fn encrypt(&self, iv: &[u8; IV_SIZE], plaintext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::<U12>::from_slice(iv);
        match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        }
    }

    #[allow(deprecated)] // aes-gcm uses generic-array 0.x, will be resolved when upgraded to 1.x
    fn decrypt(&self, iv: &[u8; IV_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>, aes_gcm::Error> {
        let nonce = Nonce::<U12>::from_slice(iv);
        match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
    }

    const fn bits(&self) -> usize {
        match self {
            Self::Aes128(_) => 128,
            Self::Aes192(_) => 192,
            Self::Aes256(_) => 256,
        }
    }
}

/// Wire value: IV followed by ciphertext with the GCM tag appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AesPayload {
    iv: [u8; IV_SIZE],
    ciphertext: Vec<u8>,
}

impl AesPayload {
    /// Build a payload from its parts
    pub fn new(iv: [u8; IV_SIZE], ciphertext: Vec<u8>) -> Self {
        Self { iv, ciphertext }
    }

    /// Split a binary payload into IV and ciphertext
    ///
    /// # Errors
    ///
    /// Returns `CipherError::MalformedPayload` if fewer than 12 bytes are given.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CipherError> {
        if bytes.len() < IV_SIZE {
            return Err(CipherError::MalformedPayload {
                reason: format!(
                    "payload is {} bytes, at least {IV_SIZE} required",
                    bytes.len()
                ),
            });
        }

        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&bytes[..IV_SIZE]);
        Ok(Self {
            iv,
            ciphertext: bytes[IV_SIZE..].to_vec(),
        })
    }

    /// Decode a base64 payload
    ///
    /// # Errors
    ///
    /// Returns `CipherError::MalformedPayload` if the text is not base64 or
    /// decodes to fewer than 12 bytes.
    pub fn from_base64(text: &str) -> Result<Self, CipherError> {
        let bytes = encoding::from_base64(text)?;
        Self::from_bytes(&bytes)
    }

    /// The IV
    pub const fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }

    /// Ciphertext with the tag appended
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Concatenate IV and ciphertext
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(IV_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Base64 of [`Self::to_bytes`]
    pub fn to_base64(&self) -> String {
        encoding::to_base64(&self.to_bytes())
    }
}

/// AES-GCM cipher bound to a validated key
pub struct AesGcmCipher {
    key: AesKey,
}

impl std::fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCipher")
            .field("bits", &self.key.bits())
            .finish_non_exhaustive()
    }
}

impl AesGcmCipher {
    /// Create a cipher from raw key bytes
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKeyLength` unless the key is 16, 24 or
    /// 32 bytes long.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        Ok(Self {
            key: AesKey::new(key)?,
        })
    }

    /// Key size in bits
    pub const fn key_bits(&self) -> usize {
        self.key.bits()
    }

    /// Encrypt text under a fresh IV drawn from `rng`
    pub fn encrypt(
        &self,
        plaintext: &str,
        rng: &dyn RandomSource,
    ) -> Result<AesPayload, CipherError> {
        let mut iv = [0u8; IV_SIZE];
        rng.fill_bytes(&mut iv);

        let ciphertext = self
            .key
            .encrypt(&iv, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptionFailure)?;

        debug!(
            bits = self.key.bits(),
            plaintext_len = plaintext.len(),
            "AES-GCM encrypted"
        );
        Ok(AesPayload::new(iv, ciphertext))
    }

    /// Authenticate and decrypt a payload back to text
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailure` on tag mismatch, corrupted
    /// ciphertext, a wrong key, or plaintext that is not UTF-8.
    pub fn decrypt(&self, payload: &AesPayload) -> Result<String, CipherError> {
        let plaintext = self
            .key
            .decrypt(&payload.iv, &payload.ciphertext)
            .map_err(|_| {
                warn!(bits = self.key.bits(), "AES-GCM authentication failed");
                CipherError::DecryptionFailure
            })?;

        String::from_utf8(plaintext).map_err(|_| CipherError::DecryptionFailure)
    }
}

/// Encrypt text with a text key, returning the base64 payload
pub fn encrypt(plaintext: &str, key: &str) -> Result<String, CipherError> {
    encrypt_with(plaintext, key, &OsRandom)
}

/// Encrypt text with a text key and an explicit IV source
pub fn encrypt_with(
    plaintext: &str,
    key: &str,
    rng: &dyn RandomSource,
) -> Result<String, CipherError> {
    let cipher = AesGcmCipher::new(key.as_bytes())?;
    Ok(cipher.encrypt(plaintext, rng)?.to_base64())
}

/// Decrypt a base64 payload with a text key
pub fn decrypt(payload: &str, key: &str) -> Result<String, CipherError> {
    let cipher = AesGcmCipher::new(key.as_bytes())?;
    let payload = AesPayload::from_base64(payload)?;
    cipher.decrypt(&payload)
}
