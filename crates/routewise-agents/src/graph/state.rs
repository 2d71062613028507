//! Conversation state and the updates components return

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::WorkerKind;
use crate::llm::Message;

const SUPERVISOR: &str = "supervisor";
const FINISH: &str = "finish";

/// Component that should execute next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Next {
    Supervisor,
    Worker(WorkerKind),
    Finish,
}

impl Next {
    pub fn as_str(&self) -> &'static str {
        match self {
            Next::Supervisor => SUPERVISOR,
            Next::Worker(kind) => kind.as_str(),
            Next::Finish => FINISH,
        }
    }

    /// Parse a node name, failing closed.
    ///
    /// Unknown names map to [`Next::Finish`] so a corrupted or foreign
    /// state can never dispatch to a component that does not exist.
    pub fn parse(name: &str) -> Self {
        match name {
            SUPERVISOR => Next::Supervisor,
            FINISH => Next::Finish,
            other => match WorkerKind::from_name(other) {
                Some(kind) => Next::Worker(kind),
                None => {
                    tracing::warn!(node = other, "Unknown node name, finishing run");
                    Next::Finish
                }
            },
        }
    }
}

impl fmt::Display for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Next> for String {
    fn from(next: Next) -> Self {
        next.as_str().to_string()
    }
}

impl From<String> for Next {
    fn from(name: String) -> Self {
        Next::parse(&name)
    }
}

/// Partial update returned by the supervisor or a worker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    /// Messages to append to the transcript
    pub messages: Vec<Message>,
    /// New routing target, if the component sets one
    pub next: Option<Next>,
}

impl StateUpdate {
    pub fn route(next: Next) -> Self {
        Self {
            messages: Vec::new(),
            next: Some(next),
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// Transcript of one run plus the routing target
///
/// Messages are only ever appended. Components get a shared borrow and hand
/// back a [`StateUpdate`]; the orchestrator applies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    messages: Vec<Message>,
    next: Next,
    started_at: DateTime<Utc>,
}

impl ConversationState {
    /// Seed a run with its initial message.
    pub fn new(initial: Message) -> Self {
        Self {
            messages: vec![initial],
            next: Next::Supervisor,
            started_at: Utc::now(),
        }
    }

    /// A state with no messages at all. Only useful to exercise the
    /// classifier's malformed-state handling.
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            next: Next::Supervisor,
            started_at: Utc::now(),
        }
    }

    /// Append returned messages and overwrite `next` when set.
    pub fn apply(&mut self, update: StateUpdate) {
        self.messages.extend(update.messages);
        if let Some(next) = update.next {
            self.next = next;
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn next(&self) -> Next {
        self.next
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn latest_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_user())
    }

    /// Assistant messages produced during the run, in order.
    pub fn answers(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_appends_and_overwrites_next() {
        let mut state = ConversationState::new(Message::user("hi"));
        state.apply(StateUpdate::route(Next::Worker(WorkerKind::WebSearcher)));
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.next(), Next::Worker(WorkerKind::WebSearcher));

        state.apply(
            StateUpdate::route(Next::Supervisor)
                .with_message(Message::from_worker(WorkerKind::WebSearcher, "hello")),
        );
        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.next(), Next::Supervisor);
        assert_eq!(state.latest().unwrap().content, "hello");
    }

    #[test]
    fn apply_without_next_keeps_target() {
        let mut state = ConversationState::new(Message::user("hi"));
        state.apply(StateUpdate::default().with_message(Message::assistant("a")));
        assert_eq!(state.next(), Next::Supervisor);
        assert_eq!(state.answers().count(), 1);
    }

    #[test]
    fn latest_user_message_skips_answers() {
        let mut state = ConversationState::new(Message::user("question"));
        state.apply(StateUpdate::default().with_message(Message::assistant("answer")));
        assert_eq!(state.latest_user_message().unwrap().content, "question");
    }

    #[test]
    fn next_round_trips_through_names() {
        for next in [
            Next::Supervisor,
            Next::Finish,
            Next::Worker(WorkerKind::WebSearcher),
            Next::Worker(WorkerKind::DocumentAnalyst),
        ] {
            assert_eq!(Next::parse(next.as_str()), next);
        }
    }

    #[test]
    fn unknown_next_fails_closed() {
        assert_eq!(Next::parse("PDF_Analyst"), Next::Finish);
        assert_eq!(Next::parse(""), Next::Finish);

        let state: ConversationState = serde_json::from_value(serde_json::json!({
            "messages": [{"role": "user", "content": "hi"}],
            "next": "shell_executor",
            "started_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(state.next(), Next::Finish);
    }

    #[test]
    fn state_serializes_next_as_name() {
        let mut state = ConversationState::new(Message::user("hi"));
        state.apply(StateUpdate::route(Next::Worker(WorkerKind::DocumentAnalyst)));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["next"], "document_analyst");
        assert_eq!(json["messages"][0]["content"], "hi");
    }
}
