//! Bounded move history for one episode.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::domain::{MoveCommand, MoveOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Entries kept before the oldest is evicted.
    pub max_history: usize,
    /// Entries rendered into the context block, most recent first.
    pub render_recent: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_history: 5,
            render_recent: 3,
        }
    }
}

/// One analyzed turn. Only `ContextStore::add` creates these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextEntry {
    command: MoveCommand,
    outcome: MoveOutcome,
}

impl ContextEntry {
    pub fn command(&self) -> &MoveCommand {
        &self.command
    }

    pub fn outcome(&self) -> &MoveOutcome {
        &self.outcome
    }
}

/// FIFO of the last `max_history` (move, outcome) pairs.
///
/// Invariants:
/// - `len() <= max_history`
/// - entries are kept in insertion order
/// - eviction is oldest-first, at most one per `add`
#[derive(Debug, Clone)]
pub struct ContextStore {
    entries: VecDeque<ContextEntry>,
    max_history: usize,
}

impl ContextStore {
    /// A `max_history` of zero keeps nothing.
    pub fn new(max_history: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_history + 1),
            max_history,
        }
    }

    pub fn add(&mut self, command: MoveCommand, outcome: MoveOutcome) {
        self.entries.push_back(ContextEntry { command, outcome });
        while self.entries.len() > self.max_history {
            self.entries.pop_front();
        }
    }

    /// Drop all history (new game).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &ContextEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Most recent first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter().rev().take(n)
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new(ContextConfig::default().max_history)
    }
}

impl From<&ContextConfig> for ContextStore {
    fn from(config: &ContextConfig) -> Self {
        Self::new(config.max_history)
    }
}
