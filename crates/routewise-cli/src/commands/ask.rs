use anyhow::Result;
use chrono::Utc;
use routewise_agents::{
    BoundedMemory, Message, RoutingDecision, RunOutcome, Supervisor, WorkerKind,
};
use serde::Serialize;

use crate::cli::{AskArgs, OutputFormat};
use crate::config::RoutewiseConfig;
use crate::output::{print_json, print_node_output};
use crate::setup::build_orchestrator;

#[derive(Serialize)]
struct AskReport<'a> {
    query: &'a str,
    route: RoutingDecision,
    worker: Option<WorkerKind>,
    answer: Option<&'a str>,
    dispatches: usize,
    elapsed_ms: i64,
    messages: &'a [Message],
}

/// Run one query through the loop and print the result.
///
/// A termination keyword ends the run before any collaborator is built, so
/// it works without API keys.
pub async fn run(config: &RoutewiseConfig, args: AskArgs, format: OutputFormat) -> Result<()> {
    let query = args.query();
    let route = Supervisor::new(config.routing.clone()).classify_query(&query);

    if route == RoutingDecision::Terminate {
        let messages = [Message::user(query.as_str())];
        let report = AskReport {
            query: &query,
            route,
            worker: None,
            answer: None,
            dispatches: 0,
            elapsed_ms: 0,
            messages: &messages,
        };
        if format.is_json() {
            return print_json(&report);
        }
        println!("Goodbye!");
        return Ok(());
    }

    let orchestrator = build_orchestrator(config).await?;
    let mut memory = BoundedMemory::new(config.memory.capacity);
    let outcome = orchestrator.ask(&query, &mut memory).await?;

    if format.is_json() {
        return print_json(&report_for(&query, route, &outcome));
    }

    for message in outcome.state.answers() {
        let node = message.name.as_deref().unwrap_or("assistant");
        print_node_output(node, std::slice::from_ref(message), "supervisor");
    }
    Ok(())
}

fn report_for<'a>(
    query: &'a str,
    route: RoutingDecision,
    outcome: &'a RunOutcome,
) -> AskReport<'a> {
    let answer = outcome.answer();
    AskReport {
        query,
        route,
        worker: answer.and_then(Message::producer),
        answer: answer.map(|m| m.content.as_str()),
        dispatches: outcome.dispatches,
        elapsed_ms: (Utc::now() - outcome.state.started_at()).num_milliseconds(),
        messages: outcome.state.messages(),
    }
}
