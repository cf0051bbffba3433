//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cxxstyle",
    version,
    about = "Heuristic naming and style checks for C-family sources",
    long_about = "cxxstyle — a fast, line-oriented scanner for C/C++ naming conventions, forbidden abbreviations, header guards, and include order.\n\nConfiguration precedence: CLI > cxxstyle.toml > defaults.",
    after_help = "Examples:\n  cxxstyle check --root src\n  cxxstyle check --file src/renderer/Window.cpp --info\n  cxxstyle check --root . --strict --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current cxxstyle version."
    )]
    Version,
    /// Scan sources for naming and style issues
    #[command(
        about = "Run style checks",
        long_about = "Scan the configured root (or a single file) for naming, abbreviation, header-guard, and include-order issues. Error-severity issues contribute to CI exits.",
        after_help = "Examples:\n  cxxstyle check --root src\n  cxxstyle check --quiet --output json"
    )]
    Check {
        #[arg(long, help = "Scan root (default: current dir, walks up to project root)")]
        root: Option<String>,
        #[arg(long, help = "Scan a single file instead of the whole tree")]
        file: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Also surface marker comments (TODO/FIXME/...) as info issues")]
        strict: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Include info-severity issues in the report")]
        info: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Only report error-severity issues")]
        quiet: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
