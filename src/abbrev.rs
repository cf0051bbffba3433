//! Forbidden-abbreviation scan with an ordered exemption chain.
//!
//! Line-local matching cannot tell declaration context from usage context,
//! so the checker accumulates named exemption predicates instead of one
//! boolean expression. The chain is evaluated strictly in order and the
//! first hit suppresses the match; order matters because the later rules
//! are broader (the short-local rule would swallow loop variables, for
//! example) and must not shadow the specific ones.

use crate::classify::{contains_word, find_word};
use crate::models::{Issue, Severity};
use crate::naming::LineContext;
use regex::Regex;

/// Abbreviations banned by the naming convention, matched word-bounded and
/// case-insensitively.
const FORBIDDEN: &[&str] = &[
    "rdr", "mgr", "fact", "btn", "txt", "img", "ctx", "impl", "init", "clean",
    "desc", "info", "str", "buf", "ptr", "len", "idx", "cnt", "val", "arr",
    "vec", "msg", "param", "cfg", "req", "resp",
];

/// Platform/API short forms, coordinate and color components, and
/// standard-library markers. Exact-case membership.
const ALLOWED: &[&str] = &[
    "HWND", "HINSTANCE", "HMODULE", "HDC", "HGLRC", "LRESULT", "WPARAM",
    "LPARAM", "UINT", "POINT", "RECT", "SIZE", "MSG", "Vk", "GL", "gl", "ID",
    "id", "x", "y", "z", "w", "r", "g", "b", "a", "u", "v", "h", "std", "stl",
];

/// Conventional ownership-pattern markers.
const PIMPL_NAMES: &[&str] = &["Impl", "impl", "PImpl", "pImpl"];

/// Short method names allowed at call sites (`.str()`, `->size()`).
const METHOD_ALLOWED: &[&str] = &[
    "str", "size", "length", "empty", "clear", "push", "pop", "top", "front",
    "back",
];

/// All-uppercase platform structure names.
const PLATFORM_STRUCTS: &[&str] = &["MSG", "POINT", "RECT", "SIZE"];

/// Log-level method names allowed as call targets.
const LOG_LEVELS: &[&str] = &["info", "debug", "warn", "error"];

/// One forbidden-token match on a line.
struct AbbrevMatch<'a> {
    token: &'a str,
    start: usize,
    end: usize,
}

type Predicate = fn(&AbbrevChecker, &LineContext, &AbbrevMatch) -> bool;

/// The exemption chain. Order is load-bearing; see module docs.
const EXEMPTIONS: &[(&str, Predicate)] = &[
    ("allowed-abbreviation", AbbrevChecker::is_allowed),
    ("pimpl-marker", AbbrevChecker::is_pimpl),
    ("short-method-call", AbbrevChecker::is_short_method_call),
    ("platform-struct", AbbrevChecker::is_platform_struct),
    ("message-idiom", AbbrevChecker::is_message_idiom),
    ("lambda-parameter", AbbrevChecker::is_lambda_parameter),
    ("qualified-enum-value", AbbrevChecker::is_qualified_enum_value),
    ("enum-value-declaration", AbbrevChecker::is_enum_value_declaration),
    ("loop-variable", AbbrevChecker::is_loop_variable),
    ("short-local", AbbrevChecker::is_short_local),
    ("log-level-call", AbbrevChecker::is_log_level_call),
];

/// Compiled patterns for the forbidden scan and its exemptions.
pub struct AbbrevChecker {
    re_forbidden: Regex,
    re_lambda: Regex,
    re_qualified: Regex,
    re_for_header: Regex,
    re_local_decl: Regex,
    re_msg_context: Regex,
}

impl AbbrevChecker {
    pub fn new() -> AbbrevChecker {
        let alternation = FORBIDDEN.join("|");
        AbbrevChecker {
            re_forbidden: Regex::new(&format!(r"(?i)\b({})\b", alternation))
                .expect("forbidden pattern"),
            re_lambda: Regex::new(r"\[[^\]]*\][^(]*\(([^)]*)\)").expect("lambda pattern"),
            re_qualified: Regex::new(r"\b(\w+)::(\w+)").expect("qualified pattern"),
            re_for_header: Regex::new(r"\bfor\s*\(([^)]*)").expect("for header pattern"),
            re_local_decl: Regex::new(
                r"\b(?:auto|int|size_t|uint8_t|uint16_t|uint32_t|uint64_t|int32_t|int64_t|float|double|bool|char|unsigned|long|short|std::\w+)\s+([A-Za-z_]\w*)\s*[=;({]",
            )
            .expect("local decl pattern"),
            re_msg_context: Regex::new(r"const\s+MSG\s*&\s*\w+|\bMSG\s+\w+|\w*Message\s*\([^)]*MSG")
                .expect("msg context pattern"),
        }
    }

    /// Scan one significant line for forbidden abbreviations, appending a
    /// Warning per surviving match.
    pub fn check_line(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        for m in self.re_forbidden.find_iter(ctx.code) {
            let hit = AbbrevMatch {
                token: m.as_str(),
                start: m.start(),
                end: m.end(),
            };
            if self.exemption(ctx, &hit).is_some() {
                continue;
            }
            let before = &ctx.code[..hit.start];
            // Re-verify the match is not inside comment/string text. The
            // classifier already blanks both, so this is a safety net for
            // callers feeding raw lines.
            let quotes = before.matches('"').count() + before.matches('\'').count();
            let comments = before.matches("//").count() + before.matches("/*").count();
            if quotes % 2 != 0 || comments % 2 != 0 {
                continue;
            }
            // Casts spell out the source type; not a naming choice.
            if before.to_ascii_lowercase().contains("cast") {
                continue;
            }
            issues.push(Issue {
                file: ctx.file.to_string(),
                line: ctx.line_no,
                column: Some(hit.start),
                severity: Severity::Warning,
                category: "abbreviation".to_string(),
                message: format!("forbidden abbreviation: {}", hit.token),
                snippet: Some(ctx.raw.trim().to_string()),
            });
        }
    }

    /// First exemption in chain order that applies, by name.
    fn exemption(&self, ctx: &LineContext, m: &AbbrevMatch) -> Option<&'static str> {
        EXEMPTIONS
            .iter()
            .find(|(_, pred)| pred(self, ctx, m))
            .map(|(name, _)| *name)
    }

    fn is_allowed(&self, _ctx: &LineContext, m: &AbbrevMatch) -> bool {
        ALLOWED.contains(&m.token)
    }

    fn is_pimpl(&self, _ctx: &LineContext, m: &AbbrevMatch) -> bool {
        PIMPL_NAMES.contains(&m.token)
    }

    fn is_short_method_call(&self, ctx: &LineContext, m: &AbbrevMatch) -> bool {
        let before = ctx.code[..m.start].trim_end();
        (before.ends_with('.') || before.ends_with("->"))
            && METHOD_ALLOWED.contains(&m.token.to_ascii_lowercase().as_str())
    }

    fn is_platform_struct(&self, _ctx: &LineContext, m: &AbbrevMatch) -> bool {
        m.token.chars().all(|c| c.is_ascii_uppercase()) && PLATFORM_STRUCTS.contains(&m.token)
    }

    fn is_message_idiom(&self, ctx: &LineContext, m: &AbbrevMatch) -> bool {
        if !m.token.eq_ignore_ascii_case("msg") {
            return false;
        }
        let joined = ctx.window.joined();
        self.re_msg_context.is_match(&joined)
            || ["PeekMessage", "TranslateMessage", "DispatchMessage"]
                .iter()
                .any(|call| joined.contains(call))
    }

    fn is_lambda_parameter(&self, ctx: &LineContext, m: &AbbrevMatch) -> bool {
        self.re_lambda
            .captures_iter(ctx.code)
            .filter_map(|c| c.get(1))
            .any(|params| contains_word(params.as_str(), m.token))
    }

    fn is_qualified_enum_value(&self, ctx: &LineContext, m: &AbbrevMatch) -> bool {
        self.re_qualified
            .captures_iter(ctx.code)
            .filter_map(|c| c.get(2))
            .any(|value| value.as_str() == m.token)
    }

    fn is_enum_value_declaration(&self, ctx: &LineContext, m: &AbbrevMatch) -> bool {
        if !ctx.in_enum_body {
            return false;
        }
        // The token must be the declared name, i.e. first thing on the line.
        if !ctx.code[..m.start].trim().is_empty() {
            return false;
        }
        let rest = ctx.code[m.end..].trim_start();
        rest.is_empty() || rest.starts_with(',') || rest.starts_with('=') || rest.starts_with('}')
    }

    fn is_loop_variable(&self, ctx: &LineContext, m: &AbbrevMatch) -> bool {
        let header = match self.re_for_header.captures(ctx.code).and_then(|c| c.get(1)) {
            Some(h) => h.as_str(),
            None => return false,
        };
        let mut from = 0;
        while let Some(pos) = find_word(&header[from..], m.token) {
            let end = from + pos + m.token.len();
            let next = header[end..].trim_start().chars().next();
            match next {
                // Header end means the original line hit `)` right here.
                None => return true,
                Some(':') | Some(';') | Some(')') => return true,
                _ => from = end,
            }
        }
        false
    }

    fn is_short_local(&self, ctx: &LineContext, m: &AbbrevMatch) -> bool {
        if m.token.len() > 3 {
            return false;
        }
        let in_member_section = ["private:", "public:", "protected:"]
            .iter()
            .any(|s| ctx.window.recent_contains(5, s));
        if in_member_section {
            return false;
        }
        self.re_local_decl
            .captures_iter(ctx.code)
            .filter_map(|c| c.get(1))
            .any(|name| name.as_str() == m.token)
    }

    fn is_log_level_call(&self, ctx: &LineContext, m: &AbbrevMatch) -> bool {
        if !LOG_LEVELS.contains(&m.token.to_ascii_lowercase().as_str()) {
            return false;
        }
        ctx.code[m.end..].trim_start().starts_with('(')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ContextWindow;

    fn scan(lines: &[&str], in_enum: bool) -> Vec<Issue> {
        let checker = AbbrevChecker::new();
        let mut window = ContextWindow::new(10);
        let mut issues = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            window.push(line);
            let ctx = LineContext {
                code: line,
                raw: line,
                line_no: i + 1,
                file: "core/Widget.cpp",
                in_interfaces_dir: false,
                in_enum_body: in_enum,
                window: &window,
            };
            checker.check_line(&ctx, &mut issues);
        }
        issues
    }

    fn tokens(issues: &[Issue]) -> Vec<String> {
        issues
            .iter()
            .map(|i| i.message.rsplit(' ').next().unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_plain_usage_is_flagged() {
        let issues = scan(&["total = cnt + 1;"], false);
        assert_eq!(tokens(&issues), vec!["cnt"]);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].category, "abbreviation");
    }

    #[test]
    fn test_member_declaration_is_flagged() {
        // Access specifier in the window disables the short-local rule.
        let issues = scan(&["class W {", "private:", "    int cnt;"], false);
        assert_eq!(tokens(&issues), vec!["cnt"]);
    }

    #[test]
    fn test_word_boundaries_respected() {
        // `buffer` contains `buf`, `unique_ptr` contains `ptr`; neither is
        // word-bounded.
        let issues = scan(&["std::unique_ptr<Buffer> buffer;"], false);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_exemption_chain_names() {
        let checker = AbbrevChecker::new();
        let mut window = ContextWindow::new(10);
        let cases: Vec<(&str, bool, &str, &str)> = vec![
            ("MSG message;", false, "MSG", "allowed-abbreviation"),
            ("std::unique_ptr<Impl> pointer;", false, "Impl", "pimpl-marker"),
            ("auto text = stream.str();", false, "str", "short-method-call"),
            (
                "auto f = [](int idx) { return idx; };",
                false,
                "idx",
                "lambda-parameter",
            ),
            ("Log(LogLevel::Info);", false, "Info", "qualified-enum-value"),
            ("    Info,", true, "Info", "enum-value-declaration"),
            (
                "for (int idx = 0; idx < n; ++idx)",
                false,
                "idx",
                "loop-variable",
            ),
            ("auto ctx = MakeContext();", false, "ctx", "short-local"),
            ("Info(\"started\");", false, "Info", "log-level-call"),
        ];
        for (line, in_enum, token, expected) in cases {
            window.push(line);
            let ctx = LineContext {
                code: line,
                raw: line,
                line_no: 1,
                file: "f.cpp",
                in_interfaces_dir: false,
                in_enum_body: in_enum,
                window: &window,
            };
            let start = find_word(line, token).expect("token present");
            let m = AbbrevMatch {
                token,
                start,
                end: start + token.len(),
            };
            assert_eq!(checker.exemption(&ctx, &m), Some(expected), "{}", line);
        }
    }

    #[test]
    fn test_loop_variable_not_flagged() {
        let issues = scan(&["for (int idx = 0; idx < n; ++idx) {"], false);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_range_for_variable_exempt() {
        let issues = scan(&["for (const auto& img : images) {"], false);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_message_pump_context_exempts_msg() {
        let issues = scan(
            &["while (PeekMessage(&msg, nullptr, 0, 0, PM_REMOVE)) {"],
            false,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_msg_without_context_flagged() {
        let issues = scan(&["Send(msg);"], false);
        assert_eq!(tokens(&issues), vec!["msg"]);
    }

    #[test]
    fn test_short_local_requires_short_name() {
        // `init` is four characters; the short-local rule does not apply.
        let issues = scan(&["bool init = Prepare();"], false);
        assert_eq!(tokens(&issues), vec!["init"]);
    }

    #[test]
    fn test_case_label_exempt() {
        let issues = scan(&["    case LogLevel::Info:"], false);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_cast_context_suppressed() {
        let issues = scan(&["auto n = static_cast<int>(cnt);"], false);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_multiple_tokens_on_one_line() {
        let issues = scan(&["CopyData(sourceBuf, destBuf);"], false);
        assert!(issues.is_empty());
        let issues = scan(&["Copy(buf, cnt);"], false);
        assert_eq!(tokens(&issues), vec!["buf", "cnt"]);
    }
}
