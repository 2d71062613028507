//! Worker agents
//!
//! A worker answers one query: retrieve, prompt, complete, remember.
//! Two instances exist, distinguished by [`WorkerKind`] and the retrieval
//! collaborator they are built with.

mod prompt;
mod retriever;
mod worker;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{ConversationState, StateUpdate};
use crate::memory::BoundedMemory;

pub use prompt::build_prompt;
pub use retriever::{
    DEFAULT_MAX_SEARCH_RESULTS, DEFAULT_TOP_K, DocumentRetriever, Retriever, WebRetriever,
};
pub use worker::AgentWorker;

/// Identity of a worker agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerKind {
    WebSearcher,
    DocumentAnalyst,
}

impl WorkerKind {
    pub const ALL: [WorkerKind; 2] = [WorkerKind::WebSearcher, WorkerKind::DocumentAnalyst];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerKind::WebSearcher => "web_searcher",
            WorkerKind::DocumentAnalyst => "document_analyst",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A graph node that answers the latest user query.
#[async_trait]
pub trait Worker: Send + Sync {
    fn kind(&self) -> WorkerKind;

    /// Answer the latest user message of `state`.
    ///
    /// Implementations append the turn to `memory` only after the answer
    /// exists, and route back to the supervisor.
    async fn run(
        &self,
        state: &ConversationState,
        memory: &mut BoundedMemory,
    ) -> Result<StateUpdate>;
}

#[cfg(test)]
mod tests {
    use super::WorkerKind;

    #[test]
    fn names_round_trip() {
        for kind in WorkerKind::ALL {
            assert_eq!(WorkerKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(WorkerKind::from_name("Web_Searcher"), None);
    }
}
