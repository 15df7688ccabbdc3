//! Cipher dispatch: request and outcome values and the single entry point
//! used by front-ends.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::activity::{ActivitySink, TracingActivitySink};
use crate::aead;
use crate::classical::{CaesarCipher, VigenereCipher};
use crate::error::{CipherError, CipherErrorKind};
use crate::keygen;
use crate::random::{OsRandom, RandomSource};

/// Tool name used for activity and usage records
pub const CRYPTO_LAB_TOOL: &str = "Cryptography Lab";

/// Cipher algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Caesar shift cipher, key is an integer
    Caesar,
    /// Vigenère cipher, key is an alphabetic keyword
    Vigenere,
    /// AES-GCM, key is 16, 24 or 32 bytes of text
    AesGcm,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Caesar => "CAESAR",
            Self::Vigenere => "VIGENERE",
            Self::AesGcm => "AES",
        })
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "caesar" => Ok(Self::Caesar),
            "vigenere" | "vigenère" => Ok(Self::Vigenere),
            "aes" | "aes-gcm" | "aesgcm" => Ok(Self::AesGcm),
            other => Err(format!("unknown cipher algorithm: {other}")),
        }
    }
}

/// Direction of a cipher operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Plaintext to ciphertext
    Encrypt,
    /// Ciphertext to plaintext
    Decrypt,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "encrypt" => Ok(Self::Encrypt),
            "decrypt" => Ok(Self::Decrypt),
            other => Err(format!("unknown cipher mode: {other}")),
        }
    }
}

/// A single cipher operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherRequest {
    /// Algorithm to run
    pub algorithm: Algorithm,
    /// Direction
    pub mode: Mode,
    /// Algorithm-specific key text
    pub key: String,
    /// Input text (base64 payload when decrypting AES)
    pub text: String,
}

impl CipherRequest {
    /// Create a request
    pub fn new(
        algorithm: Algorithm,
        mode: Mode,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            algorithm,
            mode,
            key: key.into(),
            text: text.into(),
        }
    }

    /// Run the request with the OS random source
    pub fn execute(&self) -> CipherOutcome {
        self.execute_with(&OsRandom)
    }

    /// Run the request with an explicit random source for AES IVs
    pub fn execute_with(&self, rng: &dyn RandomSource) -> CipherOutcome {
        transform_with(self.algorithm, self.mode, &self.key, &self.text, rng).into()
    }
}

/// Result of a cipher operation, exactly one of success or failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherOutcome {
    /// The transformed text
    Success {
        /// Output text
        text: String,
    },
    /// The operation was rejected
    Failure {
        /// Failure category
        kind: CipherErrorKind,
        /// User facing message
        message: String,
    },
}

impl CipherOutcome {
    /// Whether this is a success
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Output text on success
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    /// Failure kind on failure
    pub const fn error_kind(&self) -> Option<CipherErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<Result<String, CipherError>> for CipherOutcome {
    fn from(result: Result<String, CipherError>) -> Self {
        match result {
            Ok(text) => Self::Success { text },
            Err(err) => Self::Failure {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}

/// Transform `text` with the chosen algorithm, mode and key
///
/// # Errors
///
/// Returns `CipherError::InputMissing` for empty text or key, and the
/// algorithm-specific key or payload errors otherwise.
pub fn cipher_transform(
    algorithm: Algorithm,
    mode: Mode,
    key: &str,
    text: &str,
) -> Result<String, CipherError> {
    transform_with(algorithm, mode, key, text, &OsRandom)
}

/// [`cipher_transform`] with an explicit random source for AES IVs
pub fn transform_with(
    algorithm: Algorithm,
    mode: Mode,
    key: &str,
    text: &str,
    rng: &dyn RandomSource,
) -> Result<String, CipherError> {
    if text.is_empty() || key.is_empty() {
        return Err(CipherError::InputMissing);
    }

    debug!(%algorithm, %mode, text_len = text.len(), "cipher transform");

    match algorithm {
        Algorithm::Caesar => Ok(CaesarCipher::from_key(key)?.apply(text, mode)),
        Algorithm::Vigenere => Ok(VigenereCipher::from_key(key)?.apply(text, mode)),
        Algorithm::AesGcm => match mode {
            Mode::Encrypt => aead::encrypt_with(text, key, rng),
            Mode::Decrypt => aead::decrypt(text, key),
        },
    }
}

/// Generate a printable AES key of 16, 24 or 32 bytes
pub fn generate_key(length: usize) -> Result<String, CipherError> {
    keygen::generate_key(length)
}

/// Cipher front-end that records each successful operation
///
/// Failures are returned to the caller and not recorded, matching how the lab
/// only logs completed work.
pub struct CryptoLab {
    activity: Arc<dyn ActivitySink>,
    rng: Arc<dyn RandomSource>,
}

impl Default for CryptoLab {
    fn default() -> Self {
        Self::new(Arc::new(TracingActivitySink))
    }
}

impl CryptoLab {
    /// Create a lab that reports to `activity` and uses the OS random source
    pub fn new(activity: Arc<dyn ActivitySink>) -> Self {
        Self {
            activity,
            rng: Arc::new(OsRandom),
        }
    }

    /// Replace the random source used for IVs and keys
    #[must_use]
    pub fn with_random_source(mut self, rng: Arc<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Run a request, recording it on success
    pub fn process(&self, request: &CipherRequest) -> CipherOutcome {
        self.transform(request).into()
    }

    /// [`CryptoLab::process`] keeping the typed error
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`cipher_transform`].
    pub fn transform(&self, request: &CipherRequest) -> Result<String, CipherError> {
        let text = transform_with(
            request.algorithm,
            request.mode,
            &request.key,
            &request.text,
            self.rng.as_ref(),
        )?;
        self.activity.record(
            CRYPTO_LAB_TOOL,
            &format!("Performed {} using {}.", request.mode, request.algorithm),
        );
        Ok(text)
    }

    /// Generate a printable AES key
    pub fn generate_key(&self, length: usize) -> Result<String, CipherError> {
        keygen::generate_key_with(length, self.rng.as_ref())
    }
}
