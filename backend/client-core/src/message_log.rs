//! Bounded chat history.
//!
//! The log keeps the most recent [`MESSAGE_LOG_CAPACITY`] entries in arrival
//! order. Appending past capacity evicts the oldest entry first.

use crate::MESSAGE_LOG_CAPACITY;
use crate::color::hue_of;

use std::collections::VecDeque;
use std::collections::vec_deque::Iter;

/// A rendered chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    sender: String,
    text: String,
    hue: u16,
}

impl LogEntry {
    /// Build an entry, deriving the hue from the sender name.
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        let sender = sender.into();
        let hue = hue_of(&sender);
        Self {
            sender,
            text: text.into(),
            hue,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }
}

/// Insertion-ordered log with FIFO eviction.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::with_capacity(MESSAGE_LOG_CAPACITY)
    }

    /// A log bounded at `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one when the log is full.
    pub fn append(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
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

    /// Most recently appended entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> Iter<'_, LogEntry> {
        self.entries.iter()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a LogEntry;
    type IntoIter = Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
