use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_PROMPT: &str = "memdb> ";

/// Command line options of the `memdb` shell.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "memdb")]
#[command(about = "In-memory SQL (subset) shell")]
#[command(version)]
pub struct ShellConfig {
    /// Read statements from this file instead of stdin
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Prompt shown before each statement when reading from a terminal
    #[arg(long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Don't print the startup banner
    #[arg(short, long)]
    pub quiet: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            input: None,
            prompt: DEFAULT_PROMPT.to_string(),
            quiet: false,
        }
    }
}
