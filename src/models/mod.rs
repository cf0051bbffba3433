//! Shared data models for scan output: severity, issues, and summaries.

use serde::Serialize;

#[derive(Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[serde(rename_all = "lowercase")]
/// Issue severity, ordered so that `Info < Warning < Error`.
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Stable label used by the human reporter.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warn",
            Severity::Info => "info",
        }
    }
}

#[derive(Serialize, Clone, Debug)]
/// A single style issue anchored to a file location.
///
/// Immutable once constructed; `line` is 1-based, `column` 0-based when
/// known. `category` is a stable tag such as `class-naming` or
/// `abbreviation`.
pub struct Issue {
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub severity: Severity,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Serialize, Clone, Copy, Debug, Default)]
/// Aggregated severity counts used by printers and exit-code logic.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub files: usize,
}

impl Summary {
    /// Count severities over a finished issue list.
    pub fn tally(issues: &[Issue], files: usize) -> Summary {
        let mut s = Summary {
            files,
            ..Summary::default()
        };
        for is in issues {
            match is.severity {
                Severity::Error => s.errors += 1,
                Severity::Warning => s.warnings += 1,
                Severity::Info => s.infos += 1,
            }
        }
        s
    }
}

#[derive(Serialize, Debug)]
/// Scan results container: the ordered issue list plus its summary.
pub struct ScanResult {
    pub issues: Vec<Issue>,
    pub summary: Summary,
}

impl ScanResult {
    /// Restrict to issues with `severity >= min`, recomputing the summary.
    ///
    /// Filtering a full result to `Error` is equivalent to running the scan
    /// in errors-only mode.
    pub fn filtered(self, min: Severity) -> ScanResult {
        let files = self.summary.files;
        let issues: Vec<Issue> = self
            .issues
            .into_iter()
            .filter(|is| is.severity >= min)
            .collect();
        let summary = Summary::tally(&issues, files);
        ScanResult { issues, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(sev: Severity) -> Issue {
        Issue {
            file: "a.cpp".into(),
            line: 1,
            column: None,
            severity: sev,
            category: "test".into(),
            message: "m".into(),
            snippet: None,
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_filtered_recomputes_summary() {
        let issues = vec![
            issue(Severity::Info),
            issue(Severity::Warning),
            issue(Severity::Error),
        ];
        let summary = Summary::tally(&issues, 1);
        let res = ScanResult { issues, summary };
        let errs_only = res.filtered(Severity::Error);
        assert_eq!(errs_only.issues.len(), 1);
        assert_eq!(errs_only.summary.errors, 1);
        assert_eq!(errs_only.summary.warnings, 0);
        assert_eq!(errs_only.summary.files, 1);
    }

    #[test]
    fn test_filter_composes_with_itself() {
        let issues = vec![issue(Severity::Warning), issue(Severity::Error)];
        let summary = Summary::tally(&issues, 1);
        let res = ScanResult { issues, summary };
        let once = res.filtered(Severity::Warning);
        let kept: Vec<_> = once.issues.iter().map(|i| i.severity).collect();
        let twice = once.filtered(Severity::Warning);
        let kept2: Vec<_> = twice.issues.iter().map(|i| i.severity).collect();
        assert_eq!(kept, kept2);
    }
}
