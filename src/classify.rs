//! Line classification: comment/string/enum-body tracking across lines.
//!
//! The classifier walks each file strictly line by line, carrying a small
//! `ScanState` between lines. For every raw line it produces the "code"
//! portion (comment and string content replaced by spaces, columns
//! preserved) and a significance flag. Downstream checks only run on
//! significant lines and match against the blanked code text, which is what
//! keeps issues from ever being anchored inside comments or strings.
//!
//! Known limitation: string tracking is quote-parity based. An escaped
//! quote character toggles string state like any other quote, so lines
//! containing `\"` can be misclassified. The trade-off is deliberate; the
//! scanner prefers a cheap line-local heuristic over a real lexer.

use std::collections::VecDeque;

/// Per-file lexical state, reset at the start of each file scan.
#[derive(Debug, Default)]
pub struct ScanState {
    in_block_comment: bool,
    string_quote: Option<char>,
    in_enum_body: bool,
}

/// Classification of one raw line.
#[derive(Debug)]
pub struct LineClass {
    /// The line with comment/string content blanked out. Columns of code
    /// characters match the raw line up to the first truncation point.
    pub code: String,
    /// True when any non-whitespace code remains after blanking.
    pub significant: bool,
}

impl ScanState {
    pub fn new() -> ScanState {
        ScanState::default()
    }

    /// True while the classifier is between an enum introduction and its
    /// closing brace. Gates enum-value naming checks.
    pub fn in_enum_body(&self) -> bool {
        self.in_enum_body
    }

    /// Consume one raw line, update state, and return its classification.
    ///
    /// Strictly sequential: no lookahead past the current line and no
    /// backtracking into earlier ones.
    pub fn advance(&mut self, line: &str) -> LineClass {
        let chars: Vec<char> = line.chars().collect();
        let mut code = String::with_capacity(chars.len());
        let mut i = 0;

        // Resume an open block comment from a previous line.
        if self.in_block_comment {
            let mut closed = false;
            while i < chars.len() {
                if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                    code.push(' ');
                    code.push(' ');
                    i += 2;
                    closed = true;
                    break;
                }
                code.push(' ');
                i += 1;
            }
            if !closed {
                return LineClass {
                    code,
                    significant: false,
                };
            }
            self.in_block_comment = false;
        }

        // Resume an open string literal from a previous line.
        if let Some(q) = self.string_quote {
            let mut closed = false;
            while i < chars.len() {
                let c = chars[i];
                code.push(' ');
                i += 1;
                if c == q {
                    closed = true;
                    break;
                }
            }
            if !closed {
                return LineClass {
                    code,
                    significant: false,
                };
            }
            self.string_quote = None;
        }

        while i < chars.len() {
            let c = chars[i];
            match c {
                '"' | '\'' => {
                    // String/char literal: blank through the closing quote,
                    // or carry the open quote into the next line.
                    code.push(' ');
                    i += 1;
                    let mut closed = false;
                    while i < chars.len() {
                        let inner = chars[i];
                        code.push(' ');
                        i += 1;
                        if inner == c {
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        self.string_quote = Some(c);
                    }
                }
                '/' if chars.get(i + 1) == Some(&'/') => {
                    // Line comment truncates the rest of the line.
                    break;
                }
                '/' if chars.get(i + 1) == Some(&'*') => {
                    code.push(' ');
                    code.push(' ');
                    i += 2;
                    let mut closed = false;
                    while i < chars.len() {
                        if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                            code.push(' ');
                            code.push(' ');
                            i += 2;
                            closed = true;
                            break;
                        }
                        code.push(' ');
                        i += 1;
                    }
                    if !closed {
                        self.in_block_comment = true;
                        break;
                    }
                }
                _ => {
                    code.push(c);
                    i += 1;
                }
            }
        }

        let significant = !code.trim().is_empty();

        // Enum-body tracking happens on code text only, so braces in
        // comments or strings never toggle it.
        if contains_word(&code, "enum") && code.contains('{') {
            self.in_enum_body = true;
        }
        if self.in_enum_body && code.contains('}') {
            self.in_enum_body = false;
        }

        LineClass { code, significant }
    }
}

/// Word-bounded substring search without a regex.
pub fn contains_word(hay: &str, word: &str) -> bool {
    find_word(hay, word).is_some()
}

/// Position of the first word-bounded occurrence of `word` in `hay`.
pub fn find_word(hay: &str, word: &str) -> Option<usize> {
    if word.is_empty() {
        return None;
    }
    let mut from = 0;
    while let Some(rel) = hay[from..].find(word) {
        let pos = from + rel;
        let before_ok = pos == 0
            || !hay[..pos]
                .chars()
                .next_back()
                .map(is_ident_char)
                .unwrap_or(false);
        let after = pos + word.len();
        let after_ok = after >= hay.len()
            || !hay[after..].chars().next().map(is_ident_char).unwrap_or(false);
        if before_ok && after_ok {
            return Some(pos);
        }
        from = pos + word.len();
    }
    None
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Rolling buffer of the last N raw lines, pushed incrementally as the scan
/// walks a file. Consulted by context-sensitive checks (access-specifier
/// proximity, message-pump idiom, enum introductions).
#[derive(Debug)]
pub struct ContextWindow {
    cap: usize,
    lines: VecDeque<String>,
}

impl ContextWindow {
    pub fn new(cap: usize) -> ContextWindow {
        ContextWindow {
            cap,
            lines: VecDeque::with_capacity(cap),
        }
    }

    /// Append the current raw line, evicting the oldest when full.
    pub fn push(&mut self, line: &str) {
        if self.lines.len() == self.cap {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }

    /// True when `needle` occurs in any of the newest `n` lines
    /// (including the current line, which is pushed before checks run).
    pub fn recent_contains(&self, n: usize, needle: &str) -> bool {
        self.lines
            .iter()
            .rev()
            .take(n)
            .any(|l| l.contains(needle))
    }

    /// All buffered lines joined with newlines, oldest first.
    pub fn joined(&self) -> String {
        let parts: Vec<&str> = self.lines.iter().map(String::as_str).collect();
        parts.join("\n")
    }
}
