use colored::Colorize;

/// Print an error with any matching suggestion.
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let msg = format!("{:#}", err).to_lowercase();

    if msg.contains("api key not found") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Export the key or add it to the config file:");
        eprintln!("  {} export OPENAI_API_KEY=<value>", "$".dimmed());
        eprintln!(
            "  {} ~/.config/routewise/config.toml  [api_keys]",
            "#".dimmed()
        );
    }

    if msg.contains("document index") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Rebuild the index with:");
        eprintln!("  {} routewise ingest <file>", "$".dimmed());
    }

    if msg.contains("connection refused") || msg.contains("network") || msg.contains("timed out") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check your internet connection and try again.");
    }
}

pub fn handle_error(err: anyhow::Error) -> ! {
    report_error(&err);
    std::process::exit(1);
}
