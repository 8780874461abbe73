use clap::{ArgAction, Args, Parser, Subcommand};

pub const DEFAULT_USER: &str = "local";

/// Top-level CLI entry point.
#[derive(Debug, Parser)]
#[command(
    name = "wordmix",
    version,
    about = "Shuffle the words of a text, dropping excluded words and their relatives"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the shuffle engine once and print the result.
    Process(ProcessArgs),
    /// Interactive chat session: one command or text per line on stdin.
    Chat(ChatArgs),
    /// Print stored request history.
    History(HistoryArgs),
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Text to process; read from stdin when omitted.
    pub text: Option<String>,
    /// Comma-separated words to exclude together with their relatives.
    #[arg(short, long, default_value = "")]
    pub exclude: String,
    /// Print `{"result": ...}` or `{"error": ...}` instead of plain text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// User id the session acts as.
    #[arg(long, default_value = DEFAULT_USER)]
    pub user: String,
    /// Run without the history database.
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// User id whose history to show.
    #[arg(long, default_value = DEFAULT_USER)]
    pub user: String,
    /// Maximum number of entries.
    #[arg(long, default_value_t = 10)]
    pub limit: i64,
}
