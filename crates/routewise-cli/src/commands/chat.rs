use anyhow::Result;
use colored::Colorize;
use routewise_agents::{MemoryRegistry, Message, StepEvent};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::ChatArgs;
use crate::config::RoutewiseConfig;
use crate::error::report_error;
use crate::output::print_node_output;
use crate::setup::build_orchestrator;

/// Line-oriented chat loop over stdin.
///
/// A failed turn is reported and the loop waits for the next line.
pub async fn run(config: &RoutewiseConfig, args: ChatArgs) -> Result<()> {
    let orchestrator = build_orchestrator(config).await?;
    let registry = MemoryRegistry::new(args.memory.unwrap_or(config.memory.capacity));
    let conversation = registry.create();
    let memory = registry.get_or_create(conversation);
    tracing::info!(%conversation, "Chat session started");

    let hint = "ask anything, mention a document or page to search your files, 'quit' to leave";
    println!("{} - {}", "Routewise".bold(), hint.dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{} ", "You:".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if orchestrator.supervisor().is_termination(query) {
            println!("Goodbye!");
            break;
        }

        let mut memory = memory.lock().await;
        if let Err(err) = orchestrator
            .run_with_events(Message::user(query), &mut memory, print_step)
            .await
        {
            let err = anyhow::Error::from(err);
            tracing::warn!(%conversation, error = %format!("{err:#}"), "Turn failed");
            report_error(&err);
        }
    }

    registry.remove(conversation);
    tracing::info!(%conversation, "Chat session ended");
    Ok(())
}

fn print_step(event: &StepEvent) {
    print_node_output(event.node.as_str(), &event.messages, event.next.as_str());
}
