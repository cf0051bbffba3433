//! Naming rule engine: one handler per identifier category.
//!
//! Handlers match against the blanked code text produced by the classifier,
//! so comment and string content never triggers a rule. Patterns are
//! compiled once per run inside `NamingRules`. The engine is deliberately
//! heuristic: it matches declaration-shaped lines rather than parsing, and
//! prefers missing an identifier over flagging one it cannot classify.

use crate::classify::{contains_word, ContextWindow};
use crate::models::{Issue, Severity};
use regex::Regex;

/// C++ keywords and storage specifiers that must never be reported as
/// identifiers by any category handler.
const CPP_KEYWORDS: &[&str] = &[
    "alignof", "auto", "bool", "break", "case", "catch", "char", "class",
    "const", "constexpr", "continue", "decltype", "default", "delete", "do",
    "double", "else", "enum", "explicit", "final", "float", "for", "goto",
    "if", "inline", "int", "namespace", "new", "nullptr", "override",
    "private", "protected", "public", "return", "sizeof", "static", "struct",
    "switch", "template", "this", "throw", "true", "false", "try", "typedef",
    "typename", "union", "using", "virtual", "void", "while",
];

/// Platform typedef names exempt from member/parameter casing rules.
const PLATFORM_TYPES: &[&str] = &[
    "HWND", "HINSTANCE", "HRESULT", "HANDLE", "DWORD", "LPARAM", "WPARAM",
    "LRESULT", "LPSTR", "LPCSTR",
];

/// Macros that are conventional despite not being UPPER_SNAKE_CASE local
/// definitions (platform feature toggles).
const MACRO_ALLOWED: &[&str] = &["WIN32_LEAN_AND_MEAN", "NOMINMAX", "VK_USE_PLATFORM_WIN32_KHR"];

/// Namespaces exempt from the casing rule.
const NAMESPACE_ALLOWED: &[&str] = &["std", "detail", "internal"];

pub fn is_keyword(name: &str) -> bool {
    CPP_KEYWORDS.contains(&name)
}

fn is_platform_type(name: &str) -> bool {
    PLATFORM_TYPES.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// PascalCase: leading uppercase, alphanumeric, no underscores.
pub fn is_pascal(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// camelCase: leading lowercase, alphanumeric, no underscores.
pub fn is_camel(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// UPPER_SNAKE_CASE: uppercase, digits, underscores; leading alpha. A
/// single uppercase word counts (no underscore required).
pub fn is_upper_snake(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Everything a per-line check needs to know about the current line.
pub struct LineContext<'a> {
    /// Blanked code text from the classifier.
    pub code: &'a str,
    /// Raw line, used only for snippets.
    pub raw: &'a str,
    pub line_no: usize,
    pub file: &'a str,
    /// File lives under the configured interfaces path segment.
    pub in_interfaces_dir: bool,
    /// Classifier enum-body flag at this line.
    pub in_enum_body: bool,
    /// Rolling window of recent raw lines, current line included.
    pub window: &'a ContextWindow,
}

impl<'a> LineContext<'a> {
    fn issue(&self, col: usize, severity: Severity, category: &str, message: String) -> Issue {
        Issue {
            file: self.file.to_string(),
            line: self.line_no,
            column: Some(col),
            severity,
            category: category.to_string(),
            message,
            snippet: Some(self.raw.trim().to_string()),
        }
    }
}

/// Compiled patterns for all identifier categories.
pub struct NamingRules {
    re_class: Regex,
    re_enum: Regex,
    re_enum_value: Regex,
    re_member: Regex,
    re_constant: Regex,
    re_func: Regex,
    re_param: Regex,
    re_namespace: Regex,
    re_macro: Regex,
    re_typedef: Regex,
    re_using_alias: Regex,
    re_using_namespace: Regex,
}

impl NamingRules {
    pub fn new() -> NamingRules {
        NamingRules {
            // Full definitions only; forward declarations end with ';' and
            // are skipped on purpose.
            re_class: Regex::new(r"^\s*(?:class|struct)\s+([A-Za-z_]\w*)(?:\s+final)?\s*[:{]")
                .expect("class pattern"),
            re_enum: Regex::new(r"^\s*enum\s+(?:class\s+|struct\s+)?([A-Za-z_]\w*)")
                .expect("enum pattern"),
            re_enum_value: Regex::new(r"^\s*([A-Za-z_]\w*)\s*(?:=[^,}]*)?[,}]")
                .expect("enum value pattern"),
            re_member: Regex::new(
                r"^\s*(?:static\s+)?(?:const(?:expr)?\s+)?(?:\w+(?:::\w+)*(?:<[^<>]*>)?)\s*[*&]?\s+[*&]?\s*([A-Za-z_]\w*)\s*[;=]",
            )
            .expect("member pattern"),
            // Free/module constants are expected at column zero; indented
            // const locals and members are left to other handlers.
            re_constant: Regex::new(
                r"^(?:static\s+)?const(?:expr)?\s+(?:\w+(?:::\w+)*(?:<[^<>]*>)?\s+)+([A-Za-z_]\w*)\s*[=;]",
            )
            .expect("constant pattern"),
            re_func: Regex::new(
                r"^\s*(?:virtual\s+)?(?:static\s+)?(?:inline\s+)?(?:explicit\s+)?(?:\w+(?:::\w+)*(?:<[^<>]*>)?\s*[*&]?\s+)?(~?[A-Za-z_]\w*)\s*\(",
            )
            .expect("function pattern"),
            // Anchored: matches one parameter per continuation line of a
            // multi-line signature, never call-site arguments.
            re_param: Regex::new(
                r"^\s*(?:const\s+)?(?:\w+(?:::\w+)*(?:<[^<>]*>)?)\s*[*&]?\s*([A-Za-z_]\w*)\s*[,)]",
            )
            .expect("parameter pattern"),
            re_namespace: Regex::new(r"^\s*namespace\s+([A-Za-z_]\w*)").expect("namespace pattern"),
            re_macro: Regex::new(r"^\s*#\s*define\s+([A-Za-z_]\w*)").expect("macro pattern"),
            re_typedef: Regex::new(r"^\s*typedef\s+.+\s+([A-Za-z_]\w*)\s*;")
                .expect("typedef pattern"),
            re_using_alias: Regex::new(r"^\s*using\s+([A-Za-z_]\w*)\s*=")
                .expect("using alias pattern"),
            re_using_namespace: Regex::new(r"\busing\s+namespace\b")
                .expect("using namespace pattern"),
        }
    }

    /// Run all category handlers over one significant line.
    ///
    /// Preprocessor lines only get the macro check; the abbreviation scan
    /// for them is handled by the caller.
    pub fn check_line(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        if ctx.code.trim_start().starts_with('#') {
            self.check_macro(ctx, issues);
            return;
        }
        self.check_using_namespace(ctx, issues);
        self.check_class(ctx, issues);
        self.check_enum(ctx, issues);
        if ctx.in_enum_body {
            self.check_enum_value(ctx, issues);
        }
        self.check_member(ctx, issues);
        self.check_constant(ctx, issues);
        self.check_function(ctx, issues);
        self.check_parameter(ctx, issues);
        self.check_namespace(ctx, issues);
        self.check_typedef(ctx, issues);
        self.check_using_alias(ctx, issues);
    }

    fn check_using_namespace(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        if let Some(m) = self.re_using_namespace.find(ctx.code) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Error,
                "namespace-import",
                "using namespace is forbidden".to_string(),
            ));
        }
    }

    fn check_class(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_class.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("class name group");
        let name = m.as_str();
        if ctx.in_interfaces_dir {
            let rest = name.strip_prefix('I').unwrap_or("");
            if rest.is_empty() || !is_pascal(rest) {
                issues.push(ctx.issue(
                    m.start(),
                    Severity::Error,
                    "class-naming",
                    format!("interface class must start with I: {}", name),
                ));
            }
            return;
        }
        if name.ends_with("Factory") && name.len() > 7 {
            if !is_pascal(&name[..name.len() - 7]) {
                issues.push(ctx.issue(
                    m.start(),
                    Severity::Warning,
                    "class-naming",
                    format!("factory class prefix should be PascalCase: {}", name),
                ));
            }
        } else if name.ends_with("Manager") && name.len() > 7 {
            if !is_pascal(&name[..name.len() - 7]) {
                issues.push(ctx.issue(
                    m.start(),
                    Severity::Warning,
                    "class-naming",
                    format!("manager class prefix should be PascalCase: {}", name),
                ));
            }
        } else if !is_pascal(name) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "class-naming",
                format!("class should be PascalCase: {}", name),
            ));
        }
    }

    fn check_enum(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_enum.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("enum name group");
        let name = m.as_str();
        if !is_keyword(name) && !is_pascal(name) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "enum-naming",
                format!("enum type should be PascalCase: {}", name),
            ));
        }
    }

    fn check_enum_value(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_enum_value.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("enum value group");
        let name = m.as_str();
        if !is_keyword(name) && !is_pascal(name) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "enum-value-naming",
                format!("enum value should be PascalCase: {}", name),
            ));
        }
    }

    fn check_member(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        // Member declarations are only recognized close to an access
        // specifier inside a class/struct body; everything else is treated
        // as a local and left alone.
        let near_access = ["private:", "public:", "protected:"]
            .iter()
            .any(|s| ctx.window.recent_contains(3, s));
        let near_class =
            ctx.window.recent_contains(6, "class") || ctx.window.recent_contains(6, "struct");
        if !near_access || !near_class {
            return;
        }
        // Statement- and declaration-keyword lines are never member
        // declarations even when they fit the pattern shape.
        let first = ctx.code.trim_start().split_whitespace().next().unwrap_or("");
        if matches!(
            first,
            "return" | "using" | "typedef" | "friend" | "template" | "throw" | "delete"
                | "case" | "goto" | "class" | "struct" | "enum" | "namespace"
        ) {
            return;
        }
        let caps = match self.re_member.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("member name group");
        let name = m.as_str();
        if is_keyword(name) || is_platform_type(name) {
            return;
        }
        let is_static = contains_word(ctx.code, "static");
        let is_const =
            contains_word(ctx.code, "const") || contains_word(ctx.code, "constexpr");
        if is_const && !is_static {
            if !is_upper_snake(name) && !name.starts_with("m_") {
                issues.push(ctx.issue(
                    m.start(),
                    Severity::Warning,
                    "member-naming",
                    format!(
                        "const member should be UPPER_SNAKE_CASE or m_-prefixed: {}",
                        name
                    ),
                ));
            }
            return;
        }
        if is_static {
            match name.strip_prefix("s_") {
                None => issues.push(ctx.issue(
                    m.start(),
                    Severity::Warning,
                    "member-naming",
                    format!("static member should start with s_: {}", name),
                )),
                Some(core) if !core.is_empty() && !is_camel(core) => issues.push(ctx.issue(
                    m.start(),
                    Severity::Warning,
                    "member-naming",
                    format!("s_ should be followed by camelCase: {}", name),
                )),
                Some(_) => {}
            }
            return;
        }
        match name.strip_prefix("m_") {
            None => issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "member-naming",
                format!("member variable should start with m_ or s_: {}", name),
            )),
            Some(core) if !core.is_empty() && !is_camel(core) => issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "member-naming",
                format!("m_ should be followed by camelCase: {}", name),
            )),
            Some(_) => {}
        }
    }

    fn check_constant(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_constant.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("constant name group");
        let name = m.as_str();
        if is_keyword(name) || is_platform_type(name) {
            return;
        }
        if !is_upper_snake(name) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "constant-naming",
                format!("constant should be UPPER_SNAKE_CASE: {}", name),
            ));
        }
    }

    fn check_function(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_func.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("function name group");
        let name = m.as_str();
        if name.starts_with('~') || is_keyword(name) {
            return;
        }
        let (message, bad) = if let Some(rest) = name.strip_prefix("Get") {
            (
                format!("Get should be followed by PascalCase: {}", name),
                !rest.is_empty() && !is_pascal(rest),
            )
        } else if let Some(rest) = name.strip_prefix("Set") {
            (
                format!("Set should be followed by PascalCase: {}", name),
                !rest.is_empty() && !is_pascal(rest),
            )
        } else if let Some(rest) = name.strip_prefix("Is") {
            (
                format!("Is should be followed by PascalCase: {}", name),
                !rest.is_empty() && !is_pascal(rest),
            )
        } else if let Some(rest) = name.strip_prefix("Has") {
            (
                format!("Has should be followed by PascalCase: {}", name),
                !rest.is_empty() && !is_pascal(rest),
            )
        } else {
            (
                format!("method should be PascalCase: {}", name),
                !is_pascal(name),
            )
        };
        if bad {
            issues.push(ctx.issue(m.start(), Severity::Warning, "function-naming", message));
        }
    }

    fn check_parameter(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_param.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("parameter name group");
        let name = m.as_str();
        if is_keyword(name) || is_platform_type(name) {
            return;
        }
        if !is_camel(name) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "parameter-naming",
                format!("parameter should be camelCase: {}", name),
            ));
        }
    }

    fn check_namespace(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_namespace.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("namespace name group");
        let name = m.as_str();
        if NAMESPACE_ALLOWED.contains(&name) {
            return;
        }
        if !is_camel(name) && !is_pascal(name) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "namespace-naming",
                format!("namespace should be camelCase or PascalCase: {}", name),
            ));
        }
    }

    fn check_macro(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_macro.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("macro name group");
        let name = m.as_str();
        if MACRO_ALLOWED.contains(&name) {
            return;
        }
        if !is_upper_snake(name) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "macro-naming",
                format!("macro should be UPPER_SNAKE_CASE: {}", name),
            ));
        }
    }

    fn check_typedef(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_typedef.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("typedef name group");
        let name = m.as_str();
        if !is_keyword(name) && !is_pascal(name) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "typedef-naming",
                format!("type alias should be PascalCase: {}", name),
            ));
        }
    }

    fn check_using_alias(&self, ctx: &LineContext, issues: &mut Vec<Issue>) {
        let caps = match self.re_using_alias.captures(ctx.code) {
            Some(c) => c,
            None => return,
        };
        let m = caps.get(1).expect("using alias group");
        let name = m.as_str();
        if !is_keyword(name) && !is_pascal(name) {
            issues.push(ctx.issue(
                m.start(),
                Severity::Warning,
                "typedef-naming",
                format!("type alias should be PascalCase: {}", name),
            ));
        }
    }
}

/// Header files must open with a `#pragma once` guard. Empty files are
/// exempt; everything else errors at line 1.
pub fn check_header_guard(file: &str, first_line: Option<&str>) -> Option<Issue> {
    let first = first_line?;
    if first.trim_start().starts_with("#pragma once") {
        return None;
    }
    Some(Issue {
        file: file.to_string(),
        line: 1,
        column: Some(0),
        severity: Severity::Error,
        category: "header-guard".to_string(),
        message: "header file must start with #pragma once".to_string(),
        snippet: Some(first.trim().to_string()),
    })
}
