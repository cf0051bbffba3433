//! Output rendering for the check command.
//!
//! Supports `human` (default) and `json` outputs. The JSON form serializes
//! the full `ScanResult` including the summary; human output groups issues
//! by file with severity icons and a trailing summary line.

use crate::models::{ScanResult, Severity};
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

const SNIPPET_MAX: usize = 70;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn severity_label(sev: Severity, color: bool) -> String {
    let plain = format!("⟦{}⟧", sev.label());
    if !color {
        return plain;
    }
    match sev {
        Severity::Error => plain.red().bold().to_string(),
        Severity::Warning => plain.yellow().bold().to_string(),
        Severity::Info => plain.blue().bold().to_string(),
    }
}

fn severity_icon(sev: Severity, color: bool) -> String {
    match sev {
        Severity::Error => {
            if color {
                "✖".red().to_string()
            } else {
                "✖".to_string()
            }
        }
        Severity::Warning => {
            if color {
                "▲".yellow().to_string()
            } else {
                "▲".to_string()
            }
        }
        Severity::Info => {
            if color {
                "◆".blue().to_string()
            } else {
                "◆".to_string()
            }
        }
    }
}

fn truncate_snippet(snippet: &str) -> String {
    if snippet.chars().count() <= SNIPPET_MAX {
        return snippet.to_string();
    }
    let cut: String = snippet.chars().take(SNIPPET_MAX - 3).collect();
    format!("{}...", cut)
}

/// Print scan results in the requested format.
pub fn print_scan(res: &ScanResult, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_scan_json(res)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            let mut current_file: Option<&str> = None;
            for is in &res.issues {
                if current_file != Some(is.file.as_str()) {
                    let header = if color {
                        is.file.clone().bold().to_string()
                    } else {
                        is.file.clone()
                    };
                    println!("{}", header);
                    current_file = Some(is.file.as_str());
                }
                let icon = severity_icon(is.severity, color);
                let sev = severity_label(is.severity, color);
                let loc = match is.column {
                    Some(col) => format!("{}:{}", is.line, col),
                    None => format!("{}", is.line),
                };
                match &is.snippet {
                    Some(snippet) => println!(
                        "  {} {} {} ❲{}❳ — {}  `{}`",
                        icon,
                        sev,
                        loc,
                        is.category,
                        is.message,
                        truncate_snippet(snippet)
                    ),
                    None => println!(
                        "  {} {} {} ❲{}❳ — {}",
                        icon, sev, loc, is.category, is.message
                    ),
                }
            }
            let summary = format!(
                "— Summary — errors={} warnings={} infos={} files={}",
                res.summary.errors, res.summary.warnings, res.summary.infos, res.summary.files
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose scan JSON object (pure) for testing/snapshot purposes.
pub fn compose_scan_json(res: &ScanResult) -> JsonVal {
    // Directly serialize ScanResult as JSON, keeping stable shape
    serde_json::to_value(res).unwrap()
}
