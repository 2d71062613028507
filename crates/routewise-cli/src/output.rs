use anyhow::Result;
use colored::Colorize;
use routewise_agents::Message;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{output}");
    Ok(())
}

/// Print one component's output under a `--- Output from <node> ---` header.
pub fn print_node_output(node: &str, messages: &[Message], next: &str) {
    println!("\n{}", format!("--- Output from {node} ---").cyan().bold());
    if messages.is_empty() {
        println!("{}", format!("next: {next}").dimmed());
    }
    for message in messages {
        println!("{}", message.content);
    }
}
