use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Output format for CLI commands
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    #[allow(dead_code)]
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[derive(Parser)]
#[command(name = "routewise")]
#[command(
    version,
    about = "Routewise - supervisor-routed chat over web search and your documents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to ~/.config/routewise/config.toml)
    #[arg(long, global = true, env = "ROUTEWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat (default)
    Chat(ChatArgs),

    /// Answer a single query and exit
    Ask(AskArgs),

    /// Chunk, embed and store a text document in the local index
    Ingest(IngestArgs),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct ChatArgs {
    /// Number of messages kept in conversation memory
    #[arg(long)]
    pub memory: Option<usize>,
}

#[derive(Args, Clone, Debug)]
pub struct AskArgs {
    /// The question to route and answer
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl AskArgs {
    pub fn query(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Args, Clone, Debug)]
pub struct IngestArgs {
    /// UTF-8 text document to ingest
    pub file: PathBuf,

    /// Index file to write (defaults to the configured index path)
    #[arg(long)]
    pub index: Option<PathBuf>,

    /// Chunk size in characters
    #[arg(long, default_value_t = 1000)]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    #[arg(long, default_value_t = 200)]
    pub overlap: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["routewise"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parses_ask_with_multiple_words() {
        let argv = "routewise --format json ask capital of France".split(' ');
        let cli = Cli::try_parse_from(argv).expect("parse ask");
        assert!(cli.format.is_json());
        match cli.command {
            Some(Commands::Ask(args)) => assert_eq!(args.query(), "capital of France"),
            _ => panic!("Expected ask command"),
        }
    }

    #[test]
    fn ask_requires_a_query() {
        assert!(Cli::try_parse_from(["routewise", "ask"]).is_err());
    }

    #[test]
    fn parses_ingest_defaults() {
        let cli = Cli::try_parse_from(["routewise", "ingest", "notes.txt"]).expect("parse ingest");
        match cli.command {
            Some(Commands::Ingest(args)) => {
                assert_eq!(args.file, PathBuf::from("notes.txt"));
                assert_eq!(args.chunk_size, 1000);
                assert_eq!(args.overlap, 200);
                assert!(args.index.is_none());
            }
            _ => panic!("Expected ingest command"),
        }
    }

    #[test]
    fn parses_chat_memory_flag() {
        let cli = Cli::try_parse_from(["routewise", "chat", "--memory", "4"]).expect("parse chat");
        assert!(matches!(
            cli.command,
            Some(Commands::Chat(ChatArgs { memory: Some(4) }))
        ));
    }
}
