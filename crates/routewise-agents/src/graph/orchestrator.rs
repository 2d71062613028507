//! Orchestration loop: supervisor → worker → supervisor until finished

use std::sync::Arc;

use crate::agent::{Worker, WorkerKind};
use crate::error::{AgentError, Result};
use crate::llm::Message;
use crate::memory::BoundedMemory;
use crate::supervisor::Supervisor;

use super::state::{ConversationState, Next};

/// Default cap on executed components per run
pub const DEFAULT_MAX_STEPS: usize = 16;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Components executed per run before the run is aborted.
    pub max_steps: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// One executed component and the messages it produced
#[derive(Debug, Clone)]
pub struct StepEvent {
    pub node: Next,
    pub messages: Vec<Message>,
    pub next: Next,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: ConversationState,
    /// Worker dispatches performed
    pub dispatches: usize,
    /// Components executed, supervisor included
    pub steps: usize,
}

impl RunOutcome {
    /// Last assistant message of the run, if any worker answered.
    pub fn answer(&self) -> Option<&Message> {
        self.state.answers().last()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Classifying,
    Dispatched(WorkerKind),
    Terminated,
}

/// Drives one run at a time over a caller-owned memory.
pub struct Orchestrator {
    supervisor: Supervisor,
    web_searcher: Arc<dyn Worker>,
    document_analyst: Arc<dyn Worker>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        supervisor: Supervisor,
        web_searcher: Arc<dyn Worker>,
        document_analyst: Arc<dyn Worker>,
    ) -> Self {
        Self {
            supervisor,
            web_searcher,
            document_analyst,
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    fn worker(&self, kind: WorkerKind) -> &Arc<dyn Worker> {
        match kind {
            WorkerKind::WebSearcher => &self.web_searcher,
            WorkerKind::DocumentAnalyst => &self.document_analyst,
        }
    }

    /// Run a user query to completion.
    pub async fn ask(&self, query: &str, memory: &mut BoundedMemory) -> Result<RunOutcome> {
        self.run(Message::user(query), memory).await
    }

    pub async fn run(&self, input: Message, memory: &mut BoundedMemory) -> Result<RunOutcome> {
        self.run_with_events(input, memory, |_| {}).await
    }

    /// Run to completion, reporting every executed component to `on_step`.
    ///
    /// A worker failure aborts the run; the failed turn leaves memory as it
    /// was before the dispatch.
    pub async fn run_with_events<F>(
        &self,
        input: Message,
        memory: &mut BoundedMemory,
        mut on_step: F,
    ) -> Result<RunOutcome>
    where
        F: FnMut(&StepEvent) + Send,
    {
        let mut state = ConversationState::new(input);
        let mut phase = Phase::Classifying;
        let mut steps = 0;
        let mut dispatches = 0;

        while phase != Phase::Terminated {
            if steps >= self.config.max_steps {
                tracing::warn!(steps, "Run exceeded step limit");
                return Err(AgentError::MaxSteps(steps));
            }

            let (node, update) = match phase {
                Phase::Classifying => (Next::Supervisor, self.supervisor.step(&state)),
                Phase::Dispatched(kind) => {
                    tracing::info!(worker = %kind, "Dispatching worker");
                    let update = self.worker(kind).run(&state, memory).await?;
                    dispatches += 1;
                    (Next::Worker(kind), update)
                }
                Phase::Terminated => break,
            };
            steps += 1;

            let messages = update.messages.clone();
            state.apply(update);
            on_step(&StepEvent {
                node,
                messages,
                next: state.next(),
            });

            phase = match (phase, state.next()) {
                // Workers always hand control back to the classifier.
                (Phase::Dispatched(_), _) => Phase::Classifying,
                (Phase::Classifying, Next::Worker(kind)) => Phase::Dispatched(kind),
                // Routing to itself would spin; treat it like a finish.
                (Phase::Classifying, Next::Supervisor | Next::Finish) => Phase::Terminated,
                (Phase::Terminated, _) => Phase::Terminated,
            };
        }

        tracing::debug!(steps, dispatches, "Run finished");
        Ok(RunOutcome {
            state,
            dispatches,
            steps,
        })
    }
}
