//! Activity records and tool usage counters
//!
//! The engines report what they did through [`ActivitySink`], a
//! fire-and-forget interface. Two sinks are provided: one that forwards to
//! `tracing` and a bounded in-memory log for front-ends that display recent
//! activity. [`UsageStats`] is a per-tool counter that can be persisted as a
//! small JSON object.

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::error::UsageError;

/// Number of entries kept by [`ActivityLog`] by default
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 20;

/// Receiver of activity records
pub trait ActivitySink: Send + Sync {
    /// Record that `tool` did something described by `message`
    fn record(&self, tool: &str, message: &str);
}

/// Sink that emits each record as a `tracing` info event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingActivitySink;

impl ActivitySink for TracingActivitySink {
    fn record(&self, tool: &str, message: &str) {
        tracing::info!(tool, "{message}");
    }
}

/// One activity record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    /// Tool that produced the record
    pub tool: String,
    /// What happened
    pub message: String,
    /// When it was recorded
    pub timestamp: DateTime<Utc>,
}

/// Bounded in-memory activity log, newest entry first
#[derive(Debug)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityEntry>>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLog {
    /// Create a log holding the 20 newest entries
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ACTIVITY_CAPACITY)
    }

    /// Create a log holding at most `capacity` entries (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Snapshot of the entries, newest first
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl ActivitySink for ActivityLog {
    fn record(&self, tool: &str, message: &str) {
        let mut entries = self.entries.lock();
        entries.push_front(ActivityEntry {
            tool: tool.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        });
        entries.truncate(self.capacity);
    }
}

/// Per-tool usage counter
#[derive(Debug, Default)]
pub struct UsageStats {
    counts: Mutex<BTreeMap<String, u64>>,
}

impl UsageStats {
    /// Create an empty counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Load counters from a JSON object file; a missing file yields an empty counter
    pub fn load(path: &Path) -> Result<Self, UsageError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let json = fs::read_to_string(path)?;
        let counts: BTreeMap<String, u64> = serde_json::from_str(&json)?;
        tracing::debug!(path = %path.display(), tools = counts.len(), "loaded usage counters");
        Ok(Self {
            counts: Mutex::new(counts),
        })
    }

    /// Write counters to a JSON object file
    pub fn save(&self, path: &Path) -> Result<(), UsageError> {
        let counts = self.counts.lock().clone();
        let json = serde_json::to_string_pretty(&counts)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Count one use of `tool`, returning the new total
    pub fn track(&self, tool: &str) -> u64 {
        let mut counts = self.counts.lock();
        let count = counts.entry(tool.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Uses recorded for `tool`
    pub fn count(&self, tool: &str) -> u64 {
        self.counts.lock().get(tool).copied().unwrap_or(0)
    }

    /// All counters, ordered by tool name
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counts.lock().clone()
    }
}
