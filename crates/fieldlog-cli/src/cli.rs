//! CLI argument definitions for the `fieldlog` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fieldlog",
    version,
    about = "Field-note document tools",
    long_about = "Read, validate, and rewrite field-note data files.\n\n\
                  Documents are checked against their named grammar; every\n\
                  record is re-validated field by field on the way in."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read and validate a document, reporting record counts per type.
    Check(CheckArgs),

    /// Read a document and re-emit it in canonical form.
    Rewrite(RewriteArgs),

    /// List all registered grammars.
    Grammars,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the data file to check.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Emit the report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct RewriteArgs {
    /// Path to the data file to rewrite.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write to this path instead of rewriting in place.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
