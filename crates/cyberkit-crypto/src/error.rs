//! Error types for cipher operations

use std::fmt;
use thiserror::Error;

/// Errors that can occur during cipher operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Input text or key was empty
    #[error("Input text and key are required.")]
    InputMissing,

    /// Caesar key is not an integer
    #[error("Caesar shift key must be a number, got {0:?}.")]
    InvalidShift(String),

    /// Vigenère key contains something other than ASCII letters
    #[error("Vigenère key must only contain letters.")]
    InvalidVigenereKey,

    /// AES key or generated key has an unsupported size
    #[error(
        "AES key must be 16, 24, or 32 characters long for AES-128, AES-192, or AES-256 (got {actual})."
    )]
    InvalidKeyLength {
        /// Actual key size in bytes
        actual: usize,
    },

    /// AES payload is not base64 or is shorter than the IV
    #[error("Malformed payload: {reason}")]
    MalformedPayload {
        /// What was wrong with the payload
        reason: String,
    },

    /// Authenticated decryption failed
    #[error("Decryption failed. The key may be incorrect or the ciphertext corrupted.")]
    DecryptionFailure,

    /// The AEAD primitive refused to encrypt the input
    #[error("Encryption failed. The input could not be encrypted.")]
    EncryptionFailure,
}

/// Fieldless discriminant of [`CipherError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherErrorKind {
    /// See [`CipherError::InputMissing`]
    InputMissing,
    /// See [`CipherError::InvalidShift`]
    InvalidShift,
    /// See [`CipherError::InvalidVigenereKey`]
    InvalidVigenereKey,
    /// See [`CipherError::InvalidKeyLength`]
    InvalidKeyLength,
    /// See [`CipherError::MalformedPayload`]
    MalformedPayload,
    /// See [`CipherError::DecryptionFailure`]
    DecryptionFailure,
    /// See [`CipherError::EncryptionFailure`]
    EncryptionFailure,
}

impl CipherError {
    /// Get the kind of this error
    pub const fn kind(&self) -> CipherErrorKind {
        match self {
            Self::InputMissing => CipherErrorKind::InputMissing,
            Self::InvalidShift(_) => CipherErrorKind::InvalidShift,
            Self::InvalidVigenereKey => CipherErrorKind::InvalidVigenereKey,
            Self::InvalidKeyLength { .. } => CipherErrorKind::InvalidKeyLength,
            Self::MalformedPayload { .. } => CipherErrorKind::MalformedPayload,
            Self::DecryptionFailure => CipherErrorKind::DecryptionFailure,
            Self::EncryptionFailure => CipherErrorKind::EncryptionFailure,
        }
    }
}

impl fmt::Display for CipherErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InputMissing => "InputMissing",
            Self::InvalidShift => "InvalidShift",
            Self::InvalidVigenereKey => "InvalidVigenereKey",
            Self::InvalidKeyLength => "InvalidKeyLength",
            Self::MalformedPayload => "MalformedPayload",
            Self::DecryptionFailure => "DecryptionFailure",
            Self::EncryptionFailure => "EncryptionFailure",
        };
        f.write_str(name)
    }
}

impl From<base64::DecodeError> for CipherError {
    fn from(err: base64::DecodeError) -> Self {
        Self::MalformedPayload {
            reason: format!("invalid base64: {err}"),
        }
    }
}

/// Errors raised while loading or saving usage counters
#[derive(Debug, Error)]
pub enum UsageError {
    /// File I/O error
    #[error("Usage file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Usage file JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decryption_failure_message_is_generic() {
        let err = CipherError::DecryptionFailure;
        assert_eq!(
            err.to_string(),
            "Decryption failed. The key may be incorrect or the ciphertext corrupted."
        );
    }

    #[test]
    fn test_key_length_message_names_all_sizes() {
        let msg = CipherError::InvalidKeyLength { actual: 8 }.to_string();
        assert!(msg.contains("16"));
        assert!(msg.contains("24"));
        assert!(msg.contains("32"));
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            CipherError::InvalidShift("x".to_string()).kind(),
            CipherErrorKind::InvalidShift
        );
        assert_eq!(
            CipherError::MalformedPayload {
                reason: "short".to_string()
            }
            .kind(),
            CipherErrorKind::MalformedPayload
        );
        assert_eq!(
            CipherErrorKind::DecryptionFailure.to_string(),
            "DecryptionFailure"
        );
    }
}
