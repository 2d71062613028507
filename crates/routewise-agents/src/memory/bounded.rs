//! Bounded memory - FIFO window over prior turns
//!
//! Workers read a snapshot of this log when building prompts and append
//! each answered turn to it. Unlike the conversation state of a single run,
//! the log outlives runs and is capped: once full, every insertion evicts
//! the oldest entry.
//!
//! # Example
//!
//! ```
//! use routewise_agents::memory::BoundedMemory;
//! use routewise_agents::llm::Message;
//!
//! let mut memory = BoundedMemory::new(2);
//! memory.push(Message::user("one"));
//! memory.push(Message::user("two"));
//! memory.push(Message::user("three"));
//!
//! let contents: Vec<_> = memory.snapshot().into_iter().map(|m| m.content).collect();
//! assert_eq!(contents, vec!["two", "three"]);
//! ```

use std::collections::VecDeque;

use crate::llm::Message;

/// Default maximum number of entries kept in memory
pub const DEFAULT_MEMORY_CAPACITY: usize = 10;

/// Append-only message log capped at a fixed length.
///
/// Eviction is strictly FIFO. A capacity of zero keeps nothing.
#[derive(Debug, Clone)]
pub struct BoundedMemory {
    /// Entries stored in order (oldest first)
    entries: VecDeque<Message>,
    /// Maximum number of entries to retain
    capacity: usize,
}

impl Default for BoundedMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

impl BoundedMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest ones past capacity.
    ///
    /// Returns how many entries were evicted.
    pub fn push(&mut self, msg: Message) -> usize {
        if self.capacity == 0 {
            return 0;
        }

        self.entries.push_back(msg);
        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Copy of the current entries, oldest first.
    pub fn snapshot(&self) -> Vec<Message> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
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
}
