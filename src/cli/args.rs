//! CLI argument definitions
//!
//! All Clap derive structs for `podium` command-line parsing.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::schema::CompetitionStatus;

// ============================================================================
// Root CLI
// ============================================================================

/// Competition lifecycle engine: phases, status transitions, and advancement.
#[derive(Parser, Debug)]
#[command(name = "podium", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "PODIUM_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "PODIUM_LOG_FORMAT")]
    pub log_format: LogFormatArg,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the display phase of a competition.
    Phase(PhaseArgs),

    /// Validate competition timelines.
    Validate(ValidateArgs),

    /// Check or apply status transitions.
    Status(StatusArgs),

    /// Show who advances from a round.
    Advancement(AdvancementArgs),

    /// Break a tie at the advancement cutoff.
    TieBreak(TieBreakArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `phase`.
#[derive(Args, Debug)]
pub struct PhaseArgs {
    /// Competition snapshot file.
    pub file: PathBuf,

    /// Evaluate at this instant (RFC 3339) instead of now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Competition snapshot files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `status`.
///
/// Without `--to` or `--apply`, reports the stored status and any
/// time-driven transition that is due.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Competition snapshot file.
    pub file: PathBuf,

    /// Evaluate at this instant (RFC 3339) instead of now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Request a manual change to this status and write it back.
    #[arg(long, conflicts_with = "apply")]
    pub to: Option<CompetitionStatus>,

    /// Write back a due time-driven transition.
    #[arg(long)]
    pub apply: bool,

    /// Append lifecycle events (JSONL) to this file.
    #[arg(long, env = "PODIUM_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `advancement`.
#[derive(Args, Debug)]
pub struct AdvancementArgs {
    /// Competition snapshot file.
    pub file: PathBuf,

    /// Round order index (defaults to the active, next, or last round).
    #[arg(long)]
    pub round: Option<u32>,

    /// Evaluate at this instant (RFC 3339) instead of now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `tie-break`.
#[derive(Args, Debug)]
pub struct TieBreakArgs {
    /// Competition snapshot file.
    pub file: PathBuf,

    /// Contestant to advance, by id or name.
    #[arg(short, long)]
    pub contestant: String,

    /// Round order index (defaults to the active, next, or last round).
    #[arg(long)]
    pub round: Option<u32>,

    /// Evaluate at this instant (RFC 3339) instead of now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Append lifecycle events (JSONL) to this file.
    #[arg(long, env = "PODIUM_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// When to use ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

/// Command output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable
    #[default]
    Human,
    /// JSON lines
    Json,
}

// ============================================================================
// Tests
// ============================================================================
