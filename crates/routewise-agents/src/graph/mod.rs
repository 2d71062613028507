//! Graph module - supervisor/worker execution loop
//!
//! The graph is fixed: the supervisor classifies the latest message, a
//! worker answers it, control returns to the supervisor, which then
//! finishes the run.
//!
//! ```text
//!            ┌──────────────┐
//!  user ───▶ │  Supervisor  │ ──── finish ───▶ end
//!            └──────┬───────┘
//!          delegate │   ▲ loop back
//!                   ▼   │
//!      ┌───────────────────────────┐
//!      │ web_searcher │ document_  │
//!      │              │ analyst    │
//!      └───────────────────────────┘
//! ```

mod orchestrator;
mod state;

pub use orchestrator::{
    DEFAULT_MAX_STEPS, Orchestrator, OrchestratorConfig, RunOutcome, StepEvent,
};
pub use state::{ConversationState, Next, StateUpdate};
