//! Bounded, user-facing record of what the coach did.
//!
//! Separate from tracing: entries are short sentences meant for a person
//! looking at the session. Nothing in the coach reads them back.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};

/// Entries kept before the oldest is evicted.
pub const DIAGNOSTIC_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub time: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for DiagnosticEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.time.format("%H:%M:%S"), self.message)
    }
}

/// Fixed-capacity FIFO of [`DiagnosticEntry`].
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<DiagnosticEntry>,
    capacity: usize,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::with_capacity(DIAGNOSTIC_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one when full.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "coach::diagnostics", "{}", message);

        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(DiagnosticEntry {
            time: Local::now(),
            message,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&DiagnosticEntry> {
        self.entries.back()
    }

    pub fn to_vec(&self) -> Vec<DiagnosticEntry> {
        self.entries.iter().cloned().collect()
    }
}
