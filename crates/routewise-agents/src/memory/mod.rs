//! Memory system for worker agents
//!
//! - **Bounded Memory**: FIFO window of prior turns injected into worker
//!   prompts (distinct from the unbounded transcript of a run)
//! - **Registry**: one bounded memory per conversation id
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │  MemoryRegistry (DashMap<ConversationId, ..>)      │
//! │  ┌──────────────────────────────────────────────┐  │
//! │  │  BoundedMemory: VecDeque<Message>            │  │
//! │  │  capacity: 10 (configurable)                 │  │
//! │  │  ↓ overflow → evict oldest                   │  │
//! │  └──────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────┘
//! ```

mod bounded;
mod registry;

pub use bounded::{BoundedMemory, DEFAULT_MEMORY_CAPACITY};
pub use registry::{ConversationId, MemoryRegistry, SharedMemory};
