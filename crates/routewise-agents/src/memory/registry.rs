//! Per-conversation memory registry
//!
//! Concurrent conversations must never share a memory log. The registry
//! hands out one [`BoundedMemory`] per conversation id.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::BoundedMemory;

/// Conversation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Shared handle to one conversation's memory
pub type SharedMemory = Arc<Mutex<BoundedMemory>>;

/// Map of conversation id to its private memory log
#[derive(Debug)]
pub struct MemoryRegistry {
    memories: DashMap<ConversationId, SharedMemory>,
    capacity: usize,
}

impl MemoryRegistry {
    /// Create a registry whose memories hold `capacity` entries each.
    pub fn new(capacity: usize) -> Self {
        Self {
            memories: DashMap::new(),
            capacity,
        }
    }

    /// Start a new conversation with an empty memory.
    pub fn create(&self) -> ConversationId {
        let id = ConversationId::new();
        self.get_or_create(id);
        id
    }

    pub fn get(&self, id: ConversationId) -> Option<SharedMemory> {
        self.memories.get(&id).map(|entry| entry.value().clone())
    }

    pub fn get_or_create(&self, id: ConversationId) -> SharedMemory {
        self.memories
            .entry(id)
            .or_insert_with(|| {
                tracing::debug!(conversation = %id, "Creating conversation memory");
                Arc::new(Mutex::new(BoundedMemory::new(self.capacity)))
            })
            .value()
            .clone()
    }

    pub fn remove(&self, id: ConversationId) -> bool {
        self.memories.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new(super::DEFAULT_MEMORY_CAPACITY)
    }
}
