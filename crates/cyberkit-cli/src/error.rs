//! Error types for the command-line front-end.

use std::path::PathBuf;

use cyberkit_crypto::{CipherError, UsageError};
use thiserror::Error;

/// Command failures
#[derive(Debug, Error)]
pub enum CliError {
    /// Wordlist file could not be read
    #[error("Failed to read wordlist {path}: {source}")]
    WordlistRead {
        /// Path given on the command line
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Hash algorithm label not recognised
    #[error("Unsupported hash algorithm: {0} (expected MD5, SHA-1, SHA-256 or SHA-512)")]
    UnknownHashAlgorithm(String),

    /// Another crack session holds the engine
    #[error("A cracking session is already running")]
    EngineBusy,

    /// Cipher operation failed
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Usage counters could not be loaded or saved
    #[error(transparent)]
    Usage(#[from] UsageError),
}
