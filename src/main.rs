//! cxxstyle CLI binary entry point.
//! Delegates to modules for scanning and prints results.

mod abbrev;
mod classify;
mod cli;
mod config;
mod includes;
mod models;
mod naming;
mod report;
mod scan;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
// Colorization centralized in utils; no direct owo_colors usage here

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            root,
            file,
            strict,
            info,
            quiet,
            output,
        } => {
            let eff = config::resolve_effective(
                root.as_deref(),
                file.as_deref(),
                strict,
                info,
                quiet,
                output.as_deref(),
            );
            // Friendly error if an explicit file target is missing
            if let Some(target) = &eff.file {
                if !target.is_file() {
                    eprintln!(
                        "{} {}",
                        crate::utils::error_prefix(),
                        format!("File not found: {}", target.to_string_lossy())
                    );
                    std::process::exit(2);
                }
            }
            // Friendly note if no cxxstyle config was found
            if eff.output != "json" && config::load_config(&eff.root).is_none() {
                eprintln!(
                    "{} {}",
                    crate::utils::note_prefix(),
                    "No cxxstyle.toml found; using defaults."
                );
            }
            let result = scan::run_scan(&eff).filtered(eff.min_severity());
            report::print_scan(&result, &eff.output);
            if result.summary.errors > 0 {
                std::process::exit(1);
            }
        }
    }
}
