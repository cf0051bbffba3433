//! Include-order validation.
//!
//! Convention: a source file includes its own header first, then system
//! headers, then third-party headers, then project headers. Classification
//! is textual: angle-bracket includes are system unless the path mentions a
//! known third-party library; quoted includes are project headers.

use crate::models::{Issue, Severity};
use regex::Regex;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum IncludeKind {
    OwnHeader,
    System,
    ThirdParty,
    Project,
}

/// Compiled include-order checker, parameterized by the third-party
/// library names to recognize in angle-bracket paths.
pub struct IncludeOrder {
    re_include: Regex,
    third_party: Vec<String>,
}

impl IncludeOrder {
    pub fn new(third_party: &[String]) -> IncludeOrder {
        IncludeOrder {
            re_include: Regex::new(r#"^\s*#\s*include\s+([<"])([^>"]+)[>"]"#)
                .expect("include pattern"),
            third_party: third_party.to_vec(),
        }
    }

    fn classify(&self, bracketed: bool, path: &str, stem: &str, is_source: bool) -> IncludeKind {
        if is_source && path.ends_with(&format!("{}.h", stem)) {
            return IncludeKind::OwnHeader;
        }
        if bracketed {
            if self.third_party.iter().any(|lib| path.contains(lib.as_str())) {
                return IncludeKind::ThirdParty;
            }
            return IncludeKind::System;
        }
        IncludeKind::Project
    }

    /// Validate the ordering of the collected `(line_no, raw_line)` include
    /// lines of one file. `stem` is the file name without extension.
    pub fn check(
        &self,
        file: &str,
        stem: &str,
        is_source: bool,
        includes: &[(usize, String)],
    ) -> Vec<Issue> {
        let mut issues = Vec::new();
        if includes.is_empty() {
            return issues;
        }

        let mut classified: Vec<(usize, &str, IncludeKind)> = Vec::new();
        for (line_no, raw) in includes {
            let caps = match self.re_include.captures(raw) {
                Some(c) => c,
                None => continue,
            };
            let bracketed = &caps[1] == "<";
            let kind = self.classify(bracketed, &caps[2], stem, is_source);
            classified.push((*line_no, raw.as_str(), kind));
        }
        if classified.is_empty() {
            return issues;
        }

        let issue = |line_no: usize, raw: &str, message: &str| Issue {
            file: file.to_string(),
            line: line_no,
            column: None,
            severity: Severity::Warning,
            category: "include-order".to_string(),
            message: message.to_string(),
            snippet: Some(raw.trim().to_string()),
        };

        let lines_of = |kind: IncludeKind| -> Vec<(usize, &str)> {
            classified
                .iter()
                .filter(|(_, _, k)| *k == kind)
                .map(|(n, raw, _)| (*n, *raw))
                .collect()
        };
        let own = lines_of(IncludeKind::OwnHeader);
        let system = lines_of(IncludeKind::System);
        let third = lines_of(IncludeKind::ThirdParty);
        let project = lines_of(IncludeKind::Project);

        // Own header first.
        if let Some(&(own_line, own_raw)) = own.first() {
            if own_line != classified[0].0 {
                issues.push(issue(
                    own_line,
                    own_raw,
                    "the file's own header should be the first include",
                ));
            }
        }

        // System before third-party.
        if let (Some(&(third_line, third_raw)), Some(&(last_system, _))) =
            (third.first(), system.last())
        {
            if third_line < last_system {
                issues.push(issue(
                    third_line,
                    third_raw,
                    "third-party includes should come after system includes",
                ));
            }
        }

        // Project headers last.
        if let Some(&(project_line, project_raw)) = project.first() {
            let latest_other = own
                .iter()
                .chain(system.iter())
                .chain(third.iter())
                .map(|(n, _)| *n)
                .max();
            if let Some(latest) = latest_other {
                if project_line < latest {
                    issues.push(issue(
                        project_line,
                        project_raw,
                        "project includes should come after system and third-party includes",
                    ));
                }
            }
        }

        issues
    }
}
