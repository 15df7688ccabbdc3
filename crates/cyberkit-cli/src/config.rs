//! Command-line configuration.
//!
//! Arguments are parsed with `clap`. Options that make sense to set once per
//! shell fall back to environment variables:
//!
//! - `CYBERKIT_LOG_LEVEL`: log filter used when `RUST_LOG` is unset
//! - `CYBERKIT_USAGE_FILE`: JSON file holding per-tool usage counters
//! - `CYBERKIT_WORDLIST`: default wordlist for `crack`
//!
//! # Example
//!
//! ```
//! use clap::Parser;
//! use cyberkit_cli::{Cli, Command};
//!
//! let cli = Cli::parse_from(["cyberkit", "encrypt", "-a", "caesar", "-k", "3", "Hello"]);
//! assert!(matches!(cli.command, Command::Encrypt(_)));
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cyberkit_crypto::Algorithm;

/// Top-level arguments
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cyberkit",
    about = "Educational cipher lab and dictionary password cracker",
    version
)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "cyberkit_crypto=debug")
    #[arg(
        long,
        global = true,
        env = "CYBERKIT_LOG_LEVEL",
        default_value = "warn"
    )]
    pub log_level: String,

    /// JSON file holding per-tool usage counters
    #[arg(long, global = true, env = "CYBERKIT_USAGE_FILE")]
    pub usage_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Encrypt text with a cipher
    Encrypt(CipherArgs),

    /// Decrypt text with a cipher
    Decrypt(CipherArgs),

    /// Generate a printable AES key
    Keygen {
        /// Key length in bytes (16, 24 or 32)
        #[arg(short, long, default_value_t = 32)]
        size: usize,
    },

    /// Print the hex digest of a word
    Hash {
        /// Digest algorithm (MD5, SHA-1, SHA-256, SHA-512)
        #[arg(short, long, default_value = "SHA-256")]
        algorithm: String,

        /// Word to hash
        word: String,
    },

    /// Recover a password from its digest with a dictionary attack
    Crack(CrackArgs),

    /// Show per-tool usage counters
    Usage,
}

/// Arguments shared by `encrypt` and `decrypt`
#[derive(Debug, Clone, Args)]
pub struct CipherArgs {
    /// Cipher to use
    #[arg(short, long, value_enum)]
    pub algorithm: CipherChoice,

    /// Shift (caesar), keyword (vigenere) or 16/24/32-byte key (aes)
    #[arg(short, long, allow_hyphen_values = true)]
    pub key: String,

    /// Input text; AES ciphertext is base64
    pub text: String,
}

/// Cipher selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CipherChoice {
    /// Caesar shift
    Caesar,
    /// Vigenère keyword
    Vigenere,
    /// AES-GCM
    Aes,
}

impl From<CipherChoice> for Algorithm {
    fn from(choice: CipherChoice) -> Self {
        match choice {
            CipherChoice::Caesar => Self::Caesar,
            CipherChoice::Vigenere => Self::Vigenere,
            CipherChoice::Aes => Self::AesGcm,
        }
    }
}

/// Arguments for `crack`
#[derive(Debug, Clone, Args)]
pub struct CrackArgs {
    /// Target digest as hex
    #[arg(long = "hash")]
    pub target_hash: String,

    /// Digest algorithm of the target (MD5, SHA-1, SHA-256, SHA-512)
    #[arg(short, long, default_value = "SHA-256")]
    pub algorithm: String,

    /// Wordlist file, one candidate per line; the built-in dictionary when unset
    #[arg(short, long, env = "CYBERKIT_WORDLIST")]
    pub wordlist: Option<PathBuf>,

    /// Print every attempt as it is made
    #[arg(long)]
    pub show_attempts: bool,
}
