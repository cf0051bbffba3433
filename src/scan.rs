//! File discovery and scan orchestration.
//!
//! `run_scan` discovers targets under the root, scans them in parallel, and
//! merges the per-file issue lists into a deterministically-ordered
//! `ScanResult`. `scan_file` is the single-file pipeline: classifier state
//! and context window feed the naming and abbreviation engines line by line,
//! with header-guard and include-order checks layered per file.

use crate::abbrev::AbbrevChecker;
use crate::classify::{ContextWindow, ScanState};
use crate::config::Effective;
use crate::includes::IncludeOrder;
use crate::models::{Issue, ScanResult, Severity, Summary};
use crate::naming::{self, LineContext, NamingRules};
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const CONTEXT_LINES: usize = 10;

/// Compiled checkers shared across all files in a run.
pub struct Engines {
    pub naming: NamingRules,
    pub abbrev: AbbrevChecker,
    pub includes: IncludeOrder,
    re_marker: Regex,
}

impl Engines {
    pub fn new(third_party: &[String]) -> Engines {
        Engines {
            naming: NamingRules::new(),
            abbrev: AbbrevChecker::new(),
            includes: IncludeOrder::new(third_party),
            re_marker: Regex::new(r"(?i)\b(TODO|FIXME|HACK|XXX|NOTE)\b")
                .expect("marker pattern"),
        }
    }
}

fn is_header(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("h") | Some("hpp")
    )
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Scan one file and return its issues in line order.
///
/// A read failure produces a single error-severity issue rather than
/// aborting the run; unreadable files are reported, not fatal.
pub fn scan_file(
    path: &Path,
    display: &str,
    in_interfaces_dir: bool,
    engines: &Engines,
    strict: bool,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            issues.push(Issue {
                file: display.to_string(),
                line: 1,
                column: None,
                severity: Severity::Error,
                category: "file-read".to_string(),
                message: format!("cannot read file: {}", e),
                snippet: None,
            });
            return issues;
        }
    };

    if is_header(path) {
        if let Some(issue) =
            naming::check_header_guard(display, content.lines().next())
        {
            issues.push(issue);
        }
    }

    let stem = file_stem(path);
    let is_source = !is_header(path);
    let mut includes: Vec<(usize, String)> = Vec::new();

    let mut state = ScanState::new();
    let mut window = ContextWindow::new(CONTEXT_LINES);

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        window.push(raw);
        let class = state.advance(raw);

        // Marker comments are surfaced in strict mode only, and they are
        // the one check that looks at raw text rather than blanked code.
        if strict {
            if let Some(m) = engines.re_marker.find(raw) {
                issues.push(Issue {
                    file: display.to_string(),
                    line: line_no,
                    column: Some(m.start() + 1),
                    severity: Severity::Info,
                    category: "marker-comment".to_string(),
                    message: format!("marker comment: {}", m.as_str()),
                    snippet: Some(raw.trim().to_string()),
                });
            }
        }

        if !class.significant {
            continue;
        }

        if class.code.trim_start().starts_with("#include") {
            includes.push((line_no, raw.to_string()));
        }

        let ctx = LineContext {
            code: &class.code,
            raw,
            line_no,
            file: display,
            in_interfaces_dir,
            in_enum_body: state.in_enum_body(),
            window: &window,
        };
        engines.naming.check_line(&ctx, &mut issues);
        engines.abbrev.check_line(&ctx, &mut issues);
    }

    issues.extend(engines.includes.check(display, &stem, is_source, &includes));

    issues
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

fn has_segment(path: &Path, segment: &str) -> bool {
    path.components()
        .any(|c| c.as_os_str().to_str() == Some(segment))
}

fn is_ignored(path: &Path, ignore_dirs: &[String]) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| ignore_dirs.iter().any(|d| d == s))
            .unwrap_or(false)
    })
}

/// Discover scan targets under the root per the effective config.
pub fn discover_targets(eff: &Effective) -> Vec<PathBuf> {
    if let Some(file) = &eff.file {
        return vec![file.clone()];
    }

    let pattern = format!("{}/**/*", eff.root.display());
    let mut targets: Vec<PathBuf> = glob::glob(&pattern)
        .expect("bad glob pattern")
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .filter(|p| has_extension(p, &eff.extensions))
        .filter(|p| {
            let rel = pathdiff::diff_paths(p, &eff.root).unwrap_or_else(|| p.clone());
            !is_ignored(&rel, &eff.ignore_dirs)
        })
        .filter(|p| match &eff.required_segment {
            Some(seg) => has_segment(p, seg),
            None => true,
        })
        .collect();
    targets.sort();
    targets
}

/// Run the full scan: discovery, parallel per-file checks, merge, and
/// deterministic ordering by (file, line, column, category).
pub fn run_scan(eff: &Effective) -> ScanResult {
    let targets = discover_targets(eff);
    let engines = Engines::new(&eff.third_party);

    let mut issues: Vec<Issue> = targets
        .par_iter()
        .flat_map(|path| {
            let display = pathdiff::diff_paths(path, &eff.root)
                .unwrap_or_else(|| path.clone())
                .display()
                .to_string();
            let in_interfaces_dir = has_segment(path, &eff.interfaces_segment);
            scan_file(path, &display, in_interfaces_dir, &engines, eff.strict)
        })
        .collect();

    issues.sort_by(|a, b| {
        (a.file.as_str(), a.line, a.column, a.category.as_str())
            .cmp(&(b.file.as_str(), b.line, b.column, b.category.as_str()))
    });

    let summary = Summary::tally(&issues, targets.len());
    ScanResult { issues, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut f = fs::File::create(&path).unwrap();
        write!(f, "{}", content).unwrap();
        path
    }

    fn effective(root: &Path) -> Effective {
        crate::config::resolve_effective(root.to_str(), None, false, false, false, None)
    }

    fn engines() -> Engines {
        Engines::new(&["vulkan".to_string(), "glfw".to_string(), "glm".to_string()])
    }

    #[test]
    fn test_header_without_pragma_once() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "Widget.h", "class Widget {\n};\n");
        let issues = scan_file(&path, "Widget.h", false, &engines(), false);
        assert!(issues.iter().any(|i| i.category == "header-guard"));
        assert_eq!(
            issues.iter().filter(|i| i.category == "header-guard").count(),
            1
        );
    }

    #[test]
    fn test_clean_header_no_issues() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "Widget.h",
            "#pragma once\n\nclass Widget {\npublic:\n    void Render();\n};\n",
        );
        let issues = scan_file(&path, "Widget.h", false, &engines(), false);
        assert!(issues.is_empty(), "unexpected: {:?}", issues);
    }

    #[test]
    fn test_interface_class_needs_i_prefix() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "interfaces/Renderer.h",
            "#pragma once\nclass Renderer {\n};\n",
        );
        let issues = scan_file(&path, "interfaces/Renderer.h", true, &engines(), false);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("must start with I"));
    }

    #[test]
    fn test_member_and_abbreviation_in_class_body() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "Player.h",
            "#pragma once\nclass Player {\nprivate:\n    int cnt;\n};\n",
        );
        let issues = scan_file(&path, "Player.h", false, &engines(), false);
        let cats: Vec<&str> = issues.iter().map(|i| i.category.as_str()).collect();
        assert!(cats.contains(&"member-naming"), "got: {:?}", issues);
        assert!(cats.contains(&"abbreviation"), "got: {:?}", issues);
    }

    #[test]
    fn test_plain_short_local_is_exempt() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "util.cpp",
            "void Tick() {\n    int cnt = 0;\n}\n",
        );
        let issues = scan_file(&path, "util.cpp", false, &engines(), false);
        assert!(
            !issues.iter().any(|i| i.category == "abbreviation"),
            "got: {:?}",
            issues
        );
    }

    #[test]
    fn test_using_namespace_is_error() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "main.cpp", "using namespace std;\n");
        let issues = scan_file(&path, "main.cpp", false, &engines(), false);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, "namespace-import");
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_strict_surfaces_markers() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "a.cpp", "// TODO fix this\nint x = 0;\n");
        let relaxed = scan_file(&path, "a.cpp", false, &engines(), false);
        assert!(relaxed.is_empty());
        let strict = scan_file(&path, "a.cpp", false, &engines(), true);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].category, "marker-comment");
        assert_eq!(strict[0].severity, Severity::Info);
    }

    #[test]
    fn test_unreadable_file_reports_issue() {
        let dir = tempdir().unwrap();
        // A directory named like a source file cannot be read as text.
        fs::create_dir(dir.path().join("odd.cpp")).unwrap();
        let path = dir.path().join("odd.cpp");
        let issues = scan_file(&path, "odd.cpp", false, &engines(), false);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].category, "file-read");
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_discovery_filters_and_sorts() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "src/b.cpp", "int x = 0;\n");
        write_file(dir.path(), "src/a.cpp", "int x = 0;\n");
        write_file(dir.path(), "build/gen.cpp", "int x = 0;\n");
        write_file(dir.path(), "src/notes.txt", "not code\n");

        let targets = discover_targets(&effective(dir.path()));
        let names: Vec<String> = targets
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.cpp", "b.cpp"]);
    }

    #[test]
    fn test_required_segment_narrows_discovery() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "renderer/r.cpp", "int x = 0;\n");
        write_file(dir.path(), "audio/a.cpp", "int x = 0;\n");

        let mut eff = effective(dir.path());
        eff.required_segment = Some("renderer".to_string());
        let targets = discover_targets(&eff);
        assert_eq!(targets.len(), 1);
        assert!(targets[0].ends_with("renderer/r.cpp"));
    }

    #[test]
    fn test_run_scan_sorted_and_tallied() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "z.cpp", "using namespace std;\n");
        write_file(dir.path(), "a.h", "class widget {\n};\n");

        let res = run_scan(&effective(dir.path()));
        assert_eq!(res.summary.files, 2);
        assert!(res.summary.errors >= 2);
        // File order is stable regardless of scan parallelism.
        let files: Vec<&str> = res.issues.iter().map(|i| i.file.as_str()).collect();
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "a.cpp", "using namespace std;\nint cnt;\n");
        write_file(dir.path(), "b.cpp", "class badName {\n};\n");

        let eff = effective(dir.path());
        let first = run_scan(&eff);
        let second = run_scan(&eff);
        assert_eq!(first.issues.len(), second.issues.len());
        for (a, b) in first.issues.iter().zip(second.issues.iter()) {
            assert_eq!(a.file, b.file);
            assert_eq!(a.line, b.line);
            assert_eq!(a.category, b.category);
        }
    }
}
