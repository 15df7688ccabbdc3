//! Dictionary-based hash recovery.
//!
//! A [`CrackEngine`] hashes each word of an ordered wordlist with the chosen
//! [`HashAlgorithm`](crate::digest::HashAlgorithm) and compares it with a
//! target digest. The search runs as a cooperative async task: it yields to
//! the scheduler every few attempts and checks its [`CancellationToken`]
//! before each word, so a front-end stays responsive and can stop it.
//!
//! ```text
//! Idle -> Running -> { Found | Exhausted | Cancelled } -> (next start) Running
//! ```
//!
//! Only one session runs at a time; a second `start` while one is running is
//! rejected.
//!
//! # Example
//!
//! ```
//! use cyberkit_crypto::crack::{CrackEngine, CrackEvent, CrackOutcome, CrackRequest};
//! use cyberkit_crypto::digest::HashAlgorithm;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let engine = CrackEngine::new();
//! let target = HashAlgorithm::Sha256.hex_digest(b"password");
//! let request = CrackRequest::new(
//!     target,
//!     HashAlgorithm::Sha256,
//!     vec!["test".into(), "password".into(), "123456".into()],
//! );
//!
//! let session = engine.start(request).expect("engine is idle");
//! let outcome = session.run(&mut |_event: &CrackEvent| {}).await;
//!
//! match outcome {
//!     CrackOutcome::Completed(result) => {
//!         assert!(result.found);
//!         assert_eq!(result.password.as_deref(), Some("password"));
//!         assert_eq!(result.attempts, 2);
//!     }
//!     CrackOutcome::Cancelled { .. } => unreachable!(),
//! }
//! # });
//! ```

mod config;
mod engine;
mod token;
pub mod wordlist;

use std::time::Duration;

use crate::digest::HashAlgorithm;

pub use config::CrackConfig;
pub use engine::{CrackEngine, CrackSession, CrackSnapshot, SessionPhase};
pub use token::CancellationToken;

/// Tool name used for activity and usage records
pub const CRACKER_TOOL: &str = "Password Cracker";

/// What to crack and with which candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackRequest {
    /// Target digest as hex, any case
    pub target_hash: String,
    /// Digest applied to each candidate
    pub algorithm: HashAlgorithm,
    /// Candidates in attempt order
    pub wordlist: Vec<String>,
}

impl CrackRequest {
    /// Create a request
    pub fn new(
        target_hash: impl Into<String>,
        algorithm: HashAlgorithm,
        wordlist: Vec<String>,
    ) -> Self {
        Self {
            target_hash: target_hash.into(),
            algorithm,
            wordlist,
        }
    }

    /// Target digest trimmed and lower-cased
    pub fn normalized_target(&self) -> String {
        self.target_hash.trim().to_ascii_lowercase()
    }
}

/// One hashed candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// 1-based position in the wordlist
    pub index: usize,
    /// The candidate
    pub word: String,
    /// Leading hex characters of the candidate's digest
    pub hash_prefix: String,
}

/// Final verdict of a session that was not cancelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackResult {
    /// Whether a candidate matched
    pub found: bool,
    /// The matching candidate, present iff `found`
    pub password: Option<String>,
    /// Index of the match, or the wordlist length when exhausted
    pub attempts: usize,
    /// Wall-clock time from start to verdict
    pub elapsed: Duration,
    /// Normalized target digest
    pub target_hash: String,
}

impl CrackResult {
    /// Elapsed time in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Terminal state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrackOutcome {
    /// The wordlist produced a verdict
    Completed(CrackResult),
    /// The session was stopped before a verdict
    Cancelled {
        /// Attempts made before stopping
        attempts: usize,
    },
}

impl CrackOutcome {
    /// The verdict, if the session was not cancelled
    pub const fn result(&self) -> Option<&CrackResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Cancelled { .. } => None,
        }
    }
}

/// Event published while a session runs
///
/// Zero or more `Attempt` events are followed by exactly one of `Finished`
/// or `Cancelled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrackEvent {
    /// A candidate was hashed
    Attempt(Attempt),
    /// The session reached a verdict
    Finished(CrackResult),
    /// The session was stopped
    Cancelled {
        /// Attempts made before stopping
        attempts: usize,
    },
}

/// Receiver of session events
///
/// Called synchronously from the session task, in order.
pub trait CrackObserver {
    /// Handle one event
    fn on_event(&mut self, event: &CrackEvent);
}

impl<F> CrackObserver for F
where
    F: FnMut(&CrackEvent),
{
    fn on_event(&mut self, event: &CrackEvent) {
        self(event);
    }
}
