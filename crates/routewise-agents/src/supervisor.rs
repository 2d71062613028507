//! Supervisor - keyword routing of the latest user message
//!
//! The supervisor never calls a model. It looks at the most recent message
//! only, so an agent's own answer can never be routed again.

use serde::{Deserialize, Serialize};

use crate::agent::WorkerKind;
use crate::graph::{ConversationState, Next, StateUpdate};

/// Routing decision for the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingDecision {
    WebSearch,
    DocumentLookup,
    Terminate,
}

impl RoutingDecision {
    pub fn next(self) -> Next {
        match self {
            RoutingDecision::WebSearch => Next::Worker(WorkerKind::WebSearcher),
            RoutingDecision::DocumentLookup => Next::Worker(WorkerKind::DocumentAnalyst),
            RoutingDecision::Terminate => Next::Finish,
        }
    }
}

/// Keyword sets used by the supervisor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Whole-message keywords that end the conversation
    pub termination_keywords: Vec<String>,
    /// Substrings that send a query to the document analyst
    pub document_keywords: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            termination_keywords: ["quit", "exit", "bye"].map(String::from).to_vec(),
            document_keywords: ["pdf", "document", "file", "page", "pages"]
                .map(String::from)
                .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Supervisor {
    config: RoutingConfig,
}

impl Supervisor {
    pub fn new(config: RoutingConfig) -> Self {
        let clean = |words: Vec<String>| -> Vec<String> {
            words
                .into_iter()
                .map(|w| normalize(&w))
                .filter(|w| !w.is_empty())
                .collect()
        };

        Self {
            config: RoutingConfig {
                termination_keywords: clean(config.termination_keywords),
                document_keywords: clean(config.document_keywords),
            },
        }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Whether `text` is exactly a termination keyword after normalization.
    pub fn is_termination(&self, text: &str) -> bool {
        let query = normalize(text);
        self.config.termination_keywords.contains(&query)
    }

    /// Decide what handles the latest message of `state`.
    pub fn classify(&self, state: &ConversationState) -> RoutingDecision {
        let Some(latest) = state.latest() else {
            return RoutingDecision::Terminate;
        };

        if !latest.is_user() {
            return RoutingDecision::Terminate;
        }

        self.classify_query(&latest.content)
    }

    /// Classify a bare user query.
    pub fn classify_query(&self, text: &str) -> RoutingDecision {
        let query = normalize(text);

        if query.is_empty() || self.config.termination_keywords.contains(&query) {
            return RoutingDecision::Terminate;
        }

        if self
            .config
            .document_keywords
            .iter()
            .any(|k| query.contains(k.as_str()))
        {
            return RoutingDecision::DocumentLookup;
        }

        RoutingDecision::WebSearch
    }

    /// Supervisor node: classify and set the routing target.
    pub fn step(&self, state: &ConversationState) -> StateUpdate {
        let decision = self.classify(state);
        tracing::debug!(?decision, messages = state.messages().len(), "Routing decision");
        StateUpdate::route(decision.next())
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;

    fn classify(text: &str) -> RoutingDecision {
        Supervisor::default().classify(&ConversationState::new(Message::user(text)))
    }

    #[test]
    fn assistant_message_always_terminates() {
        let supervisor = Supervisor::default();
        for content in ["search the web", "page 4 of the pdf", "quit", ""] {
            for msg in [
                Message::assistant(content),
                Message::from_worker(WorkerKind::WebSearcher, content),
                Message::from_worker(WorkerKind::DocumentAnalyst, content),
            ] {
                let state = ConversationState::new(msg);
                assert_eq!(supervisor.classify(&state), RoutingDecision::Terminate);
            }
        }
    }

    #[test]
    fn termination_keywords_match_exactly_after_normalization() {
        for text in ["quit", "exit", "bye", "  QUIT  ", "Bye\n", "\tExit"] {
            assert_eq!(classify(text), RoutingDecision::Terminate, "{text:?}");
        }
        // Containment is not enough.
        assert_eq!(classify("how do I exit vim"), RoutingDecision::WebSearch);
        assert_eq!(classify("goodbye"), RoutingDecision::WebSearch);
    }

    #[test]
    fn document_keywords_route_to_document_lookup() {
        for text in [
            "summarize page 3 of the document",
            "What does the PDF say about revenue?",
            "open that File",
            "how many pages are there",
            // Substring match, preserved as-is.
            "what page was the Eiffel Tower built",
        ] {
            assert_eq!(classify(text), RoutingDecision::DocumentLookup, "{text:?}");
        }
    }

    #[test]
    fn everything_else_is_web_search() {
        for text in [
            "what is the capital of France?",
            "latest rust release",
            "quit smoking tips",
            "?",
        ] {
            assert_eq!(classify(text), RoutingDecision::WebSearch, "{text:?}");
        }
    }

    #[test]
    fn empty_state_terminates() {
        let supervisor = Supervisor::default();
        assert_eq!(
            supervisor.classify(&ConversationState::empty()),
            RoutingDecision::Terminate
        );
    }

    #[test]
    fn blank_query_terminates() {
        assert_eq!(classify("   "), RoutingDecision::Terminate);
    }

    #[test]
    fn classification_ignores_history() {
        let query = "latest news about rust";
        let first = classify(query);

        let mut state = ConversationState::new(Message::user("read the pdf"));
        state.apply(
            StateUpdate::default()
                .with_message(Message::from_worker(WorkerKind::DocumentAnalyst, "done"))
                .with_message(Message::user(query)),
        );
        assert_eq!(Supervisor::default().classify(&state), first);
        assert_eq!(classify(query), first);
    }

    #[test]
    fn step_sets_next_only() {
        let state = ConversationState::new(Message::user("bye"));
        let update = Supervisor::default().step(&state);
        assert!(update.messages.is_empty());
        assert_eq!(update.next, Some(Next::Finish));
    }

    #[test]
    fn custom_keywords_are_normalized() {
        let supervisor = Supervisor::new(RoutingConfig {
            termination_keywords: vec!["  STOP ".to_string(), "".to_string()],
            document_keywords: vec!["Manual".to_string()],
        });
        assert!(supervisor.is_termination("stop"));
        assert!(!supervisor.is_termination("quit"));
        assert_eq!(
            supervisor.classify_query("read the MANUAL"),
            RoutingDecision::DocumentLookup
        );
        assert_eq!(
            supervisor.classify_query("summarize the pdf"),
            RoutingDecision::WebSearch
        );
    }

    #[test]
    fn decisions_map_to_nodes() {
        assert_eq!(
            RoutingDecision::WebSearch.next(),
            Next::Worker(WorkerKind::WebSearcher)
        );
        assert_eq!(
            RoutingDecision::DocumentLookup.next(),
            Next::Worker(WorkerKind::DocumentAnalyst)
        );
        assert_eq!(RoutingDecision::Terminate.next(), Next::Finish);
    }
}
