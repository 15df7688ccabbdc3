//! Crack engine and session lifecycle

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{
    Attempt, CRACKER_TOOL, CancellationToken, CrackConfig, CrackEvent, CrackObserver,
    CrackOutcome, CrackRequest, CrackResult,
};
use crate::activity::{ActivitySink, TracingActivitySink};
use crate::digest::HashAlgorithm;

/// Lifecycle phase of the engine's current or most recent session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No session has run yet
    Idle,
    /// A session is searching
    Running,
    /// The last session matched a candidate
    Found,
    /// The last session tried every candidate without a match
    Exhausted,
    /// The last session was stopped
    Cancelled,
}

impl SessionPhase {
    /// Whether a session is active
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Read-only view of the engine for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackSnapshot {
    /// Current phase
    pub phase: SessionPhase,
    /// Attempts made by the current or last session
    pub attempts: usize,
    /// Wordlist length of the current or last session
    pub total: usize,
    /// Most recent attempts, newest first
    pub recent: Vec<Attempt>,
    /// Verdict of the last completed session
    pub last_result: Option<CrackResult>,
}

impl CrackSnapshot {
    /// Progress through the wordlist in percent
    pub fn progress_percent(&self) -> f64 {
        match self.phase {
            SessionPhase::Found | SessionPhase::Exhausted => 100.0,
            _ if self.total == 0 => 0.0,
            _ => self.attempts as f64 / self.total as f64 * 100.0,
        }
    }
}

#[derive(Debug)]
struct EngineState {
    phase: SessionPhase,
    generation: u64,
    token: Option<CancellationToken>,
    attempts: usize,
    total: usize,
    recent: VecDeque<Attempt>,
    last_result: Option<CrackResult>,
}

struct Shared {
    state: Mutex<EngineState>,
    config: CrackConfig,
    activity: Arc<dyn ActivitySink>,
}

/// Single-session dictionary attack engine
///
/// Cloning the engine yields another handle to the same state, so one handle
/// can drive a session while another calls [`CrackEngine::stop`].
#[derive(Clone)]
pub struct CrackEngine {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for CrackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrackEngine")
            .field("phase", &self.phase())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl Default for CrackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CrackEngine {
    /// Create an engine with default configuration that logs through `tracing`
    pub fn new() -> Self {
        Self::with_config(CrackConfig::default(), Arc::new(TracingActivitySink))
    }

    /// Create an engine with explicit configuration and activity sink
    ///
    /// An invalid configuration is replaced by the defaults.
    pub fn with_config(config: CrackConfig, activity: Arc<dyn ActivitySink>) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(reason) => {
                warn!("invalid crack config ({reason}), using defaults");
                CrackConfig::default()
            }
        };

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(EngineState {
                    phase: SessionPhase::Idle,
                    generation: 0,
                    token: None,
                    attempts: 0,
                    total: 0,
                    recent: VecDeque::with_capacity(config.recent_attempts),
                    last_result: None,
                }),
                config,
                activity,
            }),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CrackConfig {
        &self.shared.config
    }

    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        self.shared.state.lock().phase
    }

    /// Whether a session is running
    pub fn is_running(&self) -> bool {
        self.phase().is_running()
    }

    /// Begin a new session
    ///
    /// Returns `None` without touching the running session if one is already
    /// active. The returned session does nothing until [`CrackSession::run`]
    /// is awaited.
    pub fn start(&self, request: CrackRequest) -> Option<CrackSession> {
        let token = CancellationToken::new();
        let generation = {
            let mut state = self.shared.state.lock();
            if state.phase.is_running() {
                warn!("crack session already running, start rejected");
                return None;
            }

            state.phase = SessionPhase::Running;
            state.generation += 1;
            state.token = Some(token.clone());
            state.attempts = 0;
            state.total = request.wordlist.len();
            state.recent.clear();
            state.last_result = None;
            state.generation
        };

        info!(
            generation,
            algorithm = %request.algorithm,
            words = request.wordlist.len(),
            "crack session started"
        );
        self.shared.activity.record(
            CRACKER_TOOL,
            &format!("Started cracking {} hash.", request.algorithm),
        );

        Some(CrackSession {
            shared: Arc::clone(&self.shared),
            generation,
            token,
            target: request.normalized_target(),
            request,
            started: Instant::now(),
            finished: false,
        })
    }

    /// Request cancellation of the running session
    ///
    /// Returns `true` if a running session was signalled. The session stops
    /// before hashing its next candidate.
    pub fn stop(&self) -> bool {
        let state = self.shared.state.lock();
        match (&state.token, state.phase) {
            (Some(token), SessionPhase::Running) => {
                debug!(generation = state.generation, "crack stop requested");
                token.cancel();
                true
            }
            _ => false,
        }
    }

    /// Start a session and drive it to completion
    ///
    /// Returns `None` if a session was already running.
    pub async fn crack<O>(&self, request: CrackRequest, observer: &mut O) -> Option<CrackOutcome>
    where
        O: CrackObserver + ?Sized,
    {
        let session = self.start(request)?;
        Some(session.run(observer).await)
    }

    /// Display view of the current or last session
    pub fn snapshot(&self) -> CrackSnapshot {
        let state = self.shared.state.lock();
        CrackSnapshot {
            phase: state.phase,
            attempts: state.attempts,
            total: state.total,
            recent: state.recent.iter().cloned().collect(),
            last_result: state.last_result.clone(),
        }
    }
}

/// A started crack session
///
/// Dropping a session before it finishes retires it as cancelled.
pub struct CrackSession {
    shared: Arc<Shared>,
    generation: u64,
    token: CancellationToken,
    request: CrackRequest,
    target: String,
    started: Instant,
    finished: bool,
}

impl std::fmt::Debug for CrackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrackSession")
            .field("generation", &self.generation)
            .field("algorithm", &self.request.algorithm)
            .field("words", &self.request.wordlist.len())
            .finish_non_exhaustive()
    }
}

impl CrackSession {
    /// Handle that cancels this session only
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Sequence number of this session within its engine
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the search, publishing events to `observer`
    pub async fn run<O>(mut self, observer: &mut O) -> CrackOutcome
    where
        O: CrackObserver + ?Sized,
    {
        let algorithm = self.request.algorithm;
        let yield_interval = self.shared.config.yield_interval;
        let prefix_len = self.shared.config.hash_prefix_len;
        let wordlist = std::mem::take(&mut self.request.wordlist);

        for (position, word) in wordlist.iter().enumerate() {
            let index = position + 1;
            if self.token.is_cancelled() {
                return self.cancel(index - 1, observer);
            }

            let digest = hash_candidate(algorithm, word).await;
            let attempt = Attempt {
                index,
                word: word.clone(),
                hash_prefix: digest.chars().take(prefix_len).collect(),
            };
            self.record_attempt(&attempt);
            observer.on_event(&CrackEvent::Attempt(attempt));

            if digest == self.target {
                return self.complete(Some(word.clone()), index, observer);
            }

            if index % yield_interval == 0 {
                tokio::task::yield_now().await;
            }
        }

        // A stop during the final attempt still counts as a stop
        if self.token.is_cancelled() {
            return self.cancel(wordlist.len(), observer);
        }
        self.complete(None, wordlist.len(), observer)
    }

    fn record_attempt(&self, attempt: &Attempt) {
        let mut state = self.shared.state.lock();
        if state.generation != self.generation {
            return;
        }
        state.attempts = attempt.index;
        state.recent.push_front(attempt.clone());
        state.recent.truncate(self.shared.config.recent_attempts);
    }

    fn complete<O>(
        &mut self,
        password: Option<String>,
        attempts: usize,
        observer: &mut O,
    ) -> CrackOutcome
    where
        O: CrackObserver + ?Sized,
    {
        let result = CrackResult {
            found: password.is_some(),
            password,
            attempts,
            elapsed: self.started.elapsed(),
            target_hash: self.target.clone(),
        };

        let phase = if result.found {
            SessionPhase::Found
        } else {
            SessionPhase::Exhausted
        };
        self.retire(phase, Some(result.clone()));

        if let Some(password) = &result.password {
            info!(attempts, elapsed = ?result.elapsed, "password found");
            self.shared.activity.record(
                CRACKER_TOOL,
                &format!("Successfully cracked hash. Found: \"{password}\"."),
            );
        } else {
            info!(attempts, elapsed = ?result.elapsed, "wordlist exhausted");
            self.shared
                .activity
                .record(CRACKER_TOOL, "Failed to crack hash. Not in dictionary.");
        }

        observer.on_event(&CrackEvent::Finished(result.clone()));
        CrackOutcome::Completed(result)
    }

    fn cancel<O>(&mut self, attempts: usize, observer: &mut O) -> CrackOutcome
    where
        O: CrackObserver + ?Sized,
    {
        self.retire(SessionPhase::Cancelled, None);
        info!(attempts, "crack session cancelled");
        self.shared
            .activity
            .record(CRACKER_TOOL, "Cracking process aborted by user.");

        observer.on_event(&CrackEvent::Cancelled { attempts });
        CrackOutcome::Cancelled { attempts }
    }

    fn retire(&mut self, phase: SessionPhase, result: Option<CrackResult>) {
        self.finished = true;
        let mut state = self.shared.state.lock();
        if state.generation != self.generation {
            return;
        }
        state.phase = phase;
        state.token = None;
        if phase == SessionPhase::Found || phase == SessionPhase::Exhausted {
            state.last_result = result;
        }
    }
}

impl Drop for CrackSession {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                generation = self.generation,
                "crack session dropped before finishing"
            );
            self.retire(SessionPhase::Cancelled, None);
        }
    }
}

/// Digest one candidate as lower-case hex
///
/// Kept as a suspension point of the session so a slower or offloaded digest
/// can replace it without changing the loop.
#[allow(clippy::unused_async)]
async fn hash_candidate(algorithm: HashAlgorithm, word: &str) -> String {
    algorithm.hex_digest(word.as_bytes())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::activity::ActivityLog;
    use crate::crack::wordlist;
    use pretty_assertions::assert_eq;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| (*w).to_string()).collect()
    }

    fn sha256(word: &str) -> String {
        HashAlgorithm::Sha256.hex_digest(word.as_bytes())
    }

    fn collect_events(events: &mut Vec<CrackEvent>) -> impl FnMut(&CrackEvent) + '_ {
        move |event: &CrackEvent| events.push(event.clone())
    }

    async fn crack_quietly(engine: &CrackEngine, request: CrackRequest) -> Option<CrackOutcome> {
        engine.crack(request, &mut |_: &CrackEvent| {}).await
    }

    #[tokio::test]
    async fn test_finds_password_at_second_position() {
        let engine = CrackEngine::new();
        let request = CrackRequest::new(
            sha256("password"),
            HashAlgorithm::Sha256,
            words(&["test", "password", "123456"]),
        );

        let mut events = Vec::new();
        let outcome = engine
            .crack(request, &mut collect_events(&mut events))
            .await
            .unwrap();

        let result = outcome.result().unwrap();
        assert!(result.found);
        assert_eq!(result.password.as_deref(), Some("password"));
        assert_eq!(result.attempts, 2);
        assert_eq!(result.target_hash, sha256("password"));

        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            CrackEvent::Attempt(a) if a.index == 1 && a.word == "test"
        ));
        assert!(matches!(
            &events[1],
            CrackEvent::Attempt(a) if a.index == 2 && a.word == "password"
        ));
        assert!(matches!(&events[2], CrackEvent::Finished(r) if r.found));
        assert_eq!(engine.phase(), SessionPhase::Found);
    }

    #[tokio::test]
    async fn test_exhausts_wordlist() {
        let engine = CrackEngine::new();
        let request = CrackRequest::new(
            sha256("not-in-list"),
            HashAlgorithm::Sha256,
            words(&["test", "password", "123456"]),
        );

        let outcome = crack_quietly(&engine, request).await.unwrap();
        let result = outcome.result().unwrap();
        assert!(!result.found);
        assert_eq!(result.password, None);
        assert_eq!(result.attempts, 3);
        assert_eq!(engine.phase(), SessionPhase::Exhausted);
        assert_eq!(engine.snapshot().progress_percent(), 100.0);
    }

    #[tokio::test]
    async fn test_target_is_case_insensitive() {
        let engine = CrackEngine::new();
        let target = HashAlgorithm::Sha1.hex_digest(b"admin").to_uppercase();
        let request = CrackRequest::new(
            format!("  {target}  "),
            HashAlgorithm::Sha1,
            wordlist::default_wordlist(),
        );

        let outcome = crack_quietly(&engine, request).await.unwrap();
        let result = outcome.result().unwrap();
        assert_eq!(result.password.as_deref(), Some("admin"));
        assert_eq!(result.attempts, 4);
        assert_eq!(result.target_hash, HashAlgorithm::Sha1.hex_digest(b"admin"));
    }

    #[tokio::test]
    async fn test_first_duplicate_wins() {
        let engine = CrackEngine::new();
        let request = CrackRequest::new(
            HashAlgorithm::Md5.hex_digest(b"dup"),
            HashAlgorithm::Md5,
            words(&["a", "dup", "b", "dup"]),
        );
        let outcome = crack_quietly(&engine, request).await.unwrap();
        assert_eq!(outcome.result().unwrap().attempts, 2);
    }

    #[tokio::test]
    async fn test_empty_wordlist_is_exhausted_immediately() {
        let engine = CrackEngine::new();
        let request = CrackRequest::new(sha256("x"), HashAlgorithm::Sha256, Vec::new());
        let outcome = crack_quietly(&engine, request).await.unwrap();
        let result = outcome.result().unwrap();
        assert!(!result.found);
        assert_eq!(result.attempts, 0);
    }

    #[tokio::test]
    async fn test_stop_after_n_attempts() {
        let engine = CrackEngine::new();
        let stopper = engine.clone();
        let request = CrackRequest::new(
            sha256("never"),
            HashAlgorithm::Sha256,
            (0..40).map(|i| format!("word{i}")).collect(),
        );

        let mut attempts_seen = 0usize;
        let mut terminal = Vec::new();
        let mut midway = None;
        let outcome = engine
            .crack(request, &mut |event: &CrackEvent| match event {
                CrackEvent::Attempt(attempt) => {
                    attempts_seen += 1;
                    if attempt.index == 5 {
                        midway = Some(stopper.snapshot());
                    }
                    if attempt.index == 10 {
                        assert!(stopper.stop());
                    }
                }
                other => terminal.push(other.clone()),
            })
            .await
            .unwrap();

        assert_eq!(outcome, CrackOutcome::Cancelled { attempts: 10 });
        assert!(outcome.result().is_none());
        assert_eq!(attempts_seen, 10);
        assert_eq!(terminal, vec![CrackEvent::Cancelled { attempts: 10 }]);

        let midway = midway.unwrap();
        assert_eq!(midway.phase, SessionPhase::Running);
        assert_eq!(midway.attempts, 5);
        assert_eq!(midway.progress_percent(), 12.5);

        // Progress stays where the stop left it
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Cancelled);
        assert_eq!(snapshot.last_result, None);
        assert_eq!(snapshot.attempts, 10);
        assert_eq!(snapshot.total, 40);
        assert_eq!(snapshot.progress_percent(), 25.0);
    }

    #[tokio::test]
    async fn test_stop_during_last_attempt_cancels() {
        let engine = CrackEngine::new();
        let stopper = engine.clone();
        let request =
            CrackRequest::new(sha256("never"), HashAlgorithm::Sha256, words(&["a", "b"]));

        let outcome = engine
            .crack(request, &mut |event: &CrackEvent| {
                if matches!(event, CrackEvent::Attempt(a) if a.index == 2) {
                    stopper.stop();
                }
            })
            .await
            .unwrap();
        assert_eq!(outcome, CrackOutcome::Cancelled { attempts: 2 });
    }

    #[tokio::test]
    async fn test_cancelled_before_run_makes_no_attempts() {
        let engine = CrackEngine::new();
        let session = engine
            .start(CrackRequest::new(sha256("x"), HashAlgorithm::Sha256, words(&["x"])))
            .unwrap();
        assert!(engine.stop());

        let mut events = Vec::new();
        let outcome = session.run(&mut collect_events(&mut events)).await;
        assert_eq!(outcome, CrackOutcome::Cancelled { attempts: 0 });
        assert_eq!(events, vec![CrackEvent::Cancelled { attempts: 0 }]);
    }

    #[tokio::test]
    async fn test_second_start_is_rejected_while_running() {
        let engine = CrackEngine::new();
        let request = CrackRequest::new(
            sha256("password"),
            HashAlgorithm::Sha256,
            words(&["password"]),
        );

        let session = engine.start(request.clone()).unwrap();
        assert!(engine.is_running());
        assert!(engine.start(request.clone()).is_none());
        assert!(crack_quietly(&engine, request.clone()).await.is_none());

        let outcome = session.run(&mut |_: &CrackEvent| {}).await;
        assert!(outcome.result().unwrap().found);

        // A finished engine accepts a fresh session
        let again = engine.start(request).unwrap();
        assert_eq!(again.generation(), 2);
    }

    #[tokio::test]
    async fn test_stale_token_does_not_cancel_new_session() {
        let engine = CrackEngine::new();
        let request = CrackRequest::new(sha256("b"), HashAlgorithm::Sha256, words(&["a", "b"]));

        let first = engine.start(request.clone()).unwrap();
        let stale = first.cancellation_token();
        first.run(&mut |_: &CrackEvent| {}).await;

        let second = engine.start(request).unwrap();
        assert!(!stale.same_as(&second.cancellation_token()));
        stale.cancel();

        let outcome = second.run(&mut |_: &CrackEvent| {}).await;
        assert_eq!(outcome.result().unwrap().attempts, 2);
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_noop() {
        let engine = CrackEngine::new();
        assert!(!engine.stop());
        assert_eq!(engine.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_dropped_session_releases_engine() {
        let engine = CrackEngine::new();
        let request = CrackRequest::new(sha256("x"), HashAlgorithm::Sha256, words(&["x"]));
        drop(engine.start(request.clone()).unwrap());
        assert_eq!(engine.phase(), SessionPhase::Cancelled);
        assert!(engine.start(request).is_some());
    }

    #[tokio::test]
    async fn test_snapshot_keeps_recent_attempts() {
        let engine = CrackEngine::new();
        let request = CrackRequest::new(
            sha256("never"),
            HashAlgorithm::Sha256,
            (1..=25).map(|i| format!("w{i}")).collect(),
        );
        crack_quietly(&engine, request).await.unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.total, 25);
        assert_eq!(snapshot.attempts, 25);
        assert_eq!(snapshot.recent.len(), 10);
        assert_eq!(snapshot.recent[0].index, 25);
        assert_eq!(snapshot.recent[9].index, 16);
        assert_eq!(snapshot.recent[0].hash_prefix, &sha256("w25")[..20]);
        assert_eq!(snapshot.last_result.map(|r| r.attempts), Some(25));
    }

    #[tokio::test]
    async fn test_attempts_never_exceed_wordlist_length() {
        let engine = CrackEngine::with_config(
            CrackConfig::new().with_yield_interval(3),
            Arc::new(ActivityLog::new()),
        );
        for len in [0usize, 1, 3, 4, 250] {
            let list: Vec<String> = (0..len).map(|i| i.to_string()).collect();
            let request = CrackRequest::new(sha256("none"), HashAlgorithm::Sha256, list);
            let mut count = 0usize;
            let outcome = engine
                .crack(request, &mut |event: &CrackEvent| {
                    if matches!(event, CrackEvent::Attempt(_)) {
                        count += 1;
                    }
                })
                .await
                .unwrap();
            let result = outcome.result().unwrap();
            assert_eq!(result.attempts, len);
            assert_eq!(count, len);
        }
    }

    #[tokio::test]
    async fn test_activity_messages() {
        let log = Arc::new(ActivityLog::new());
        let engine = CrackEngine::with_config(CrackConfig::default(), log.clone());

        let request = CrackRequest::new(
            sha256("password"),
            HashAlgorithm::Sha256,
            words(&["password"]),
        );
        crack_quietly(&engine, request.clone()).await.unwrap();

        let missing =
            CrackRequest::new(sha256("zzz"), HashAlgorithm::Sha256, words(&["password"]));
        crack_quietly(&engine, missing).await.unwrap();

        let session = engine.start(request).unwrap();
        assert!(engine.stop());
        session.run(&mut |_: &CrackEvent| {}).await;

        let messages: Vec<String> = log.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            vec![
                "Cracking process aborted by user.",
                "Started cracking SHA-256 hash.",
                "Failed to crack hash. Not in dictionary.",
                "Started cracking SHA-256 hash.",
                "Successfully cracked hash. Found: \"password\".",
                "Started cracking SHA-256 hash.",
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_config_falls_back_to_defaults() {
        let engine = CrackEngine::with_config(
            CrackConfig::new().with_yield_interval(0),
            Arc::new(ActivityLog::new()),
        );
        assert_eq!(engine.config(), &CrackConfig::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_from_another_task() {
        let engine = CrackEngine::new();
        let request = CrackRequest::new(
            sha256("never"),
            HashAlgorithm::Sha256,
            (0..200_000).map(|i| format!("candidate{i}")).collect(),
        );
        let session = engine.start(request).unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            session
                .run(&mut move |event: &CrackEvent| {
                    let _ = tx.send(event.clone());
                })
                .await
        });

        // Wait for the first attempt, then stop
        while let Some(event) = rx.recv().await {
            if matches!(event, CrackEvent::Attempt(_)) {
                break;
            }
        }
        assert!(engine.stop());

        let CrackOutcome::Cancelled { attempts } = handle.await.unwrap() else {
            unreachable!("session should have been cancelled");
        };
        assert!((1..200_000).contains(&attempts));

        // Nothing follows the cancellation notice
        let mut tail = Vec::new();
        while let Some(event) = rx.recv().await {
            tail.push(event);
        }
        assert_eq!(tail.last(), Some(&CrackEvent::Cancelled { attempts }));
        assert_eq!(
            tail.iter()
                .filter(|e| matches!(e, CrackEvent::Cancelled { .. }))
                .count(),
            1
        );
    }
}
