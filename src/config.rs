//! Configuration discovery and effective settings resolution.
//!
//! cxxstyle reads `cxxstyle.toml|yaml|yml` from the scan root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `scan.extensions`: `.h .hpp .cpp .cc .cxx`
//! - `scan.ignore_dirs`: build outputs, VCS metadata, vendored code, tests
//! - `scan.required_segment`: none (scan everything under the root)
//! - `scan.interfaces_segment`: `interfaces`
//! - `scan.third_party`: `vulkan glfw glm`
//! - `report.output`: `human`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::models::Severity;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Scan-related configuration section under `[scan]`.
pub struct ScanCfg {
    pub extensions: Option<Vec<String>>,
    pub ignore_dirs: Option<Vec<String>>,
    /// Only scan files whose path contains this segment (e.g. `renderer`).
    pub required_segment: Option<String>,
    /// Path segment marking interface headers (`I`-prefix rule).
    pub interfaces_segment: Option<String>,
    /// Library names recognized as third-party in include paths.
    pub third_party: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Reporting configuration section under `[report]`.
pub struct ReportCfg {
    pub output: Option<String>,
    pub show_info: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `cxxstyle.toml|yaml`.
pub struct StyleConfig {
    pub strict: Option<bool>,
    pub quiet: Option<bool>,
    #[serde(default)]
    pub scan: Option<ScanCfg>,
    #[serde(default)]
    pub report: Option<ReportCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the scan after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub file: Option<PathBuf>,
    pub strict: bool,
    pub show_info: bool,
    pub quiet: bool,
    pub output: String,
    pub extensions: Vec<String>,
    pub ignore_dirs: Vec<String>,
    pub required_segment: Option<String>,
    pub interfaces_segment: String,
    pub third_party: Vec<String>,
}

impl Effective {
    /// Minimum severity retained by the run's filter flags.
    pub fn min_severity(&self) -> Severity {
        if self.quiet {
            Severity::Error
        } else if self.show_info {
            Severity::Info
        } else {
            Severity::Warning
        }
    }
}

fn default_extensions() -> Vec<String> {
    [".h", ".hpp", ".cpp", ".cc", ".cxx"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_ignore_dirs() -> Vec<String> {
    [
        "build", "builds", "out", "bin", "obj", ".git", ".vs", "third_party",
        "third-party", "thirdparty", "external", "test", "example",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_third_party() -> Vec<String> {
    ["vulkan", "glfw", "glm"].iter().map(|s| s.to_string()).collect()
}

/// Walk upward from `start` to detect the scan root.
///
/// Stops when a `cxxstyle.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("cxxstyle.toml").exists()
            || cur.join("cxxstyle.yaml").exists()
            || cur.join("cxxstyle.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `StyleConfig` from `cxxstyle.toml` or `cxxstyle.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<StyleConfig> {
    let toml_path = root.join("cxxstyle.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: StyleConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["cxxstyle.yaml", "cxxstyle.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: StyleConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and
/// defaults. Boolean CLI flags only override when set.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_file: Option<&str>,
    cli_strict: bool,
    cli_info: bool,
    cli_quiet: bool,
    cli_output: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let root = detect_root(&start);
    let cfg = load_config(&root).unwrap_or_default();

    let strict = if cli_strict {
        true
    } else {
        cfg.strict.unwrap_or(false)
    };
    let quiet = if cli_quiet {
        true
    } else {
        cfg.quiet.unwrap_or(false)
    };
    let show_info = if cli_info {
        true
    } else {
        cfg.report.as_ref().and_then(|r| r.show_info).unwrap_or(false)
    };
    let output = cli_output
        .map(|s| s.to_string())
        .or_else(|| cfg.report.as_ref().and_then(|r| r.output.clone()))
        .unwrap_or_else(|| "human".to_string());

    let scan = cfg.scan.unwrap_or_default();
    let extensions = scan.extensions.unwrap_or_else(default_extensions);
    let ignore_dirs = scan.ignore_dirs.unwrap_or_else(default_ignore_dirs);
    let required_segment = scan.required_segment;
    let interfaces_segment = scan
        .interfaces_segment
        .unwrap_or_else(|| "interfaces".to_string());
    let third_party = scan.third_party.unwrap_or_else(default_third_party);

    let file = cli_file.map(PathBuf::from);

    Effective {
        root,
        file,
        strict,
        show_info,
        quiet,
        output,
        extensions,
        ignore_dirs,
        required_segment,
        interfaces_segment,
        third_party,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("cxxstyle.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
strict = true
[scan]
required_segment = "renderer"
extensions = [".h", ".cpp"]
[report]
output = "json"
    "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, false, false, false, None);
        assert!(eff.strict);
        assert_eq!(eff.output, "json");
        assert_eq!(eff.required_segment.as_deref(), Some("renderer"));
        assert_eq!(eff.extensions, vec![".h", ".cpp"]);
        // Unset sections fall back to defaults.
        assert_eq!(eff.interfaces_segment, "interfaces");
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("cxxstyle.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
quiet: true
report:
  show_info: false
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, false, false, false, None);
        assert!(eff.quiet);
        assert_eq!(eff.output, "human");
        assert!(eff.extensions.contains(&".cxx".to_string()));
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("cxxstyle.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
[report]
output = "human"
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, true, true, false, Some("json"));
        assert!(eff.strict);
        assert!(eff.show_info);
        assert_eq!(eff.output, "json");
    }

    #[test]
    fn test_min_severity_flags() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let eff = resolve_effective(root.to_str(), None, false, false, true, None);
        assert_eq!(eff.min_severity(), Severity::Error);
        let eff = resolve_effective(root.to_str(), None, false, true, false, None);
        assert_eq!(eff.min_severity(), Severity::Info);
        let eff = resolve_effective(root.to_str(), None, false, false, false, None);
        assert_eq!(eff.min_severity(), Severity::Warning);
    }
}
