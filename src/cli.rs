use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "needy")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Compute the needs between a desired and a current configuration", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the needs that turn the current state into the desired state
    Diff(DiffArgs),

    /// Load a state file and print it back out
    Render(RenderArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Diff
// ============================================================================

#[derive(Parser)]
pub struct DiffArgs {
    /// Desired state file (.json, .toml, .yaml)
    pub desired: PathBuf,

    /// Current state file (.json, .toml, .yaml)
    pub current: PathBuf,

    /// Also delete attributes that only exist in the current state
    #[arg(long)]
    pub strict: bool,

    /// Name of the top-level state
    #[arg(long)]
    pub name: Option<String>,

    /// Address path of the target, dot separated (e.g. "dbconf.manager")
    #[arg(long)]
    pub address_path: Option<String>,

    /// Attribute description templates file
    ///
    /// In YAML, quote any template containing `#` tokens; an unquoted ` #`
    /// starts a comment.
    #[arg(long)]
    pub descriptors: Option<PathBuf>,

    /// Show descriptions under each need
    #[arg(short, long)]
    pub long: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

// ============================================================================
// Render
// ============================================================================

#[derive(Parser)]
pub struct RenderArgs {
    /// State file to render
    pub file: PathBuf,

    /// Output format (defaults to the input file's format)
    #[arg(long, value_enum)]
    pub format: Option<ConfigFormatArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormatArg {
    Json,
    Toml,
    Yaml,
}
