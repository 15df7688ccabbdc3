//! Cipher and credential-recovery engine for the CyberKit security lab
//!
//! This crate provides the cryptographic core behind the lab's cipher
//! workbench and password cracker. It is a teaching tool: the classical
//! ciphers are trivially breakable, keys are used without a KDF, and no
//! constant-time guarantees are made.
//!
//! # Components
//!
//! - **Encoding**: base64 and hex helpers
//! - **Classical ciphers**: Caesar and Vigenère over ASCII letters
//! - **Authenticated encryption**: AES-GCM with a `base64(IV || ciphertext)` payload
//! - **Key generation**: printable AES keys of 16, 24 or 32 bytes
//! - **Crack engine**: cooperative, cancellable dictionary attack over MD5/SHA digests
//! - **Activity**: activity sinks and per-tool usage counters
//!
//! # Examples
//!
//! ## Cipher Dispatch
//!
//! ```
//! use cyberkit_crypto::{cipher_transform, Algorithm, Mode};
//!
//! let ciphertext = cipher_transform(Algorithm::Caesar, Mode::Encrypt, "3", "Hello World")?;
//! assert_eq!(ciphertext, "Khoor Zruog");
//!
//! let key = cyberkit_crypto::generate_key(32)?;
//! let payload = cipher_transform(Algorithm::AesGcm, Mode::Encrypt, &key, "top secret")?;
//! let plaintext = cipher_transform(Algorithm::AesGcm, Mode::Decrypt, &key, &payload)?;
//! assert_eq!(plaintext, "top secret");
//! # Ok::<(), cyberkit_crypto::CipherError>(())
//! ```
//!
//! ## Typed Failures
//!
//! ```
//! use cyberkit_crypto::{Algorithm, CipherErrorKind, CipherRequest, Mode};
//!
//! let request = CipherRequest::new(Algorithm::AesGcm, Mode::Encrypt, "too short", "text");
//! let outcome = request.execute();
//! assert_eq!(outcome.error_kind(), Some(CipherErrorKind::InvalidKeyLength));
//! ```

#![warn(missing_docs)]

pub mod activity;
pub mod aead;
pub mod cipher;
pub mod classical;
pub mod crack;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod keygen;
pub mod random;

pub use error::{CipherError, CipherErrorKind, UsageError};

// Re-export commonly used types
pub use activity::{ActivityLog, ActivitySink, TracingActivitySink, UsageStats};
pub use aead::{AesGcmCipher, AesPayload};
pub use cipher::{
    Algorithm, CipherOutcome, CipherRequest, CryptoLab, Mode, cipher_transform, generate_key,
};
pub use classical::{CaesarCipher, VigenereCipher};
pub use crack::{
    Attempt, CancellationToken, CrackConfig, CrackEngine, CrackEvent, CrackObserver,
    CrackOutcome, CrackRequest, CrackResult, CrackSession, CrackSnapshot, SessionPhase,
};
pub use digest::HashAlgorithm;
pub use random::{FixedRandom, OsRandom, RandomSource};
