// File: src/module/scan.rs
// Purpose: Derive a route module's export map from its source text

use std::fs;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{Export, ModuleExports, ModuleLoader};
use crate::walker::DiscoveredFile;

/// Reference to a handler expression found in a route module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerRef {
    /// Root-relative path of the module, e.g. `api/user/[id].ts`
    pub module: String,
    /// Export that holds the handler (`get`, `default`, ...)
    pub export: String,
    /// Source text of the handler expression
    pub expr: String,
}

static FUNCTION_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)")
        .expect("valid regex")
});

static BINDING_EXPORT: Lazy<Regex> = Lazy::new(|| {
    // The annotation may contain `=>` but ends at the first bare `=`
    Regex::new(r"(?m)^[ \t]*export\s+(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::(?:[^=]|=>)*)?=")
        .expect("valid regex")
});

static LIST_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*export\s*\{([^}]*)\}").expect("valid regex"));

static DEFAULT_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*export\s+default\s+").expect("valid regex"));

static DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:async\s+)?(?:function|class)\b").expect("valid regex"));

static LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:["'`\d-]|new\s|true\b|false\b|null\b|undefined\b)"#).expect("valid regex")
});

/// Loads route modules by scanning their `export` declarations.
///
/// Recognized forms:
/// - `export function get(...)`, `export async function post(...)`
/// - `export const get = ...` (with or without a type annotation)
/// - `export { list as get, create as post }`
/// - `export default ...`, including `export default { default: ... }`
///
/// Array initializers become handler chains. Literals and `new` expressions
/// are treated as non-callable values. A file that cannot be read, or whose
/// brackets do not balance, fails to load.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceScanLoader;

impl SourceScanLoader {
    pub fn new() -> Self {
        Self
    }

    /// Scans `source` as though it were the module at `module`
    pub fn scan(&self, module: &str, source: &str) -> Result<ModuleExports<HandlerRef>> {
        let source = scrub(source)?;
        let mut exports = ModuleExports::new();
        let mut found: Vec<(usize, String, Export<HandlerRef>)> = Vec::new();

        for caps in FUNCTION_EXPORT.captures_iter(&source) {
            let name = &caps[1];
            let at = caps.get(0).map_or(0, |m| m.start());
            found.push((at, name.to_string(), Export::Handler(handler_ref(module, name, name))));
        }

        for caps in BINDING_EXPORT.captures_iter(&source) {
            let name = &caps[1];
            let (at, end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
            let expr = read_expression(&source[end..]);
            found.push((at, name.to_string(), classify(module, name, expr)));
        }

        for caps in LIST_EXPORT.captures_iter(&source) {
            let at = caps.get(0).map_or(0, |m| m.start());
            for item in caps[1].split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let (local, exported) = match item.split_once(" as ") {
                    Some((local, exported)) => (local.trim(), exported.trim()),
                    None => (item, item),
                };
                let export = Export::Handler(handler_ref(module, exported, local));
                if exported == "default" {
                    exports = exports.with_default(export);
                } else {
                    found.push((at, exported.to_string(), export));
                }
            }
        }

        found.sort_by_key(|(at, _, _)| *at);
        for (_, name, export) in found {
            exports = exports.with_export(name, export);
        }

        if let Some(m) = DEFAULT_EXPORT.find(&source) {
            let expr = read_expression(&source[m.end()..]);
            exports = exports.with_default(classify(module, "default", expr));
        }

        Ok(exports)
    }
}

impl ModuleLoader for SourceScanLoader {
    type Handler = HandlerRef;

    fn load(&self, file: &DiscoveredFile) -> Result<ModuleExports<HandlerRef>> {
        let path = file.path();
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read route module: {:?}", path))?;
        self.scan(&file.relative_path(), &source)
            .with_context(|| format!("Failed to load route module: {:?}", path))
    }
}

fn handler_ref(module: &str, export: &str, expr: &str) -> HandlerRef {
    HandlerRef {
        module: module.to_string(),
        export: export.to_string(),
        expr: expr.trim().to_string(),
    }
}

/// Decides what kind of export an initializer expression is
fn classify(module: &str, export: &str, expr: &str) -> Export<HandlerRef> {
    let expr = expr.trim();

    if DECLARATION.is_match(expr) {
        return Export::Handler(handler_ref(module, export, expr));
    }

    if let Some(inner) = enclosed(expr, '[', ']') {
        let chain = split_top_level(inner, ',')
            .into_iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| handler_ref(module, export, item))
            .collect();
        return Export::Chain(chain);
    }

    if let Some(inner) = enclosed(expr, '{', '}') {
        let mut object = ModuleExports::new();
        for member in split_top_level(inner, ',').into_iter().map(str::trim) {
            if member.is_empty() || member.starts_with("...") {
                continue;
            }
            let (key, value) = match split_top_level(member, ':').as_slice() {
                [key, rest @ ..] if !rest.is_empty() => {
                    (key.trim(), member[key.len() + 1..].trim())
                }
                _ => (member, member),
            };
            let key = key.trim_matches(|c| c == '"' || c == '\'');
            let value = classify(module, export, value);
            object = if key == "default" {
                object.with_default(value)
            } else {
                object.with_export(key, value)
            };
        }
        return Export::Object(object);
    }

    if expr.is_empty() || LITERAL.is_match(expr) {
        return Export::Value;
    }

    Export::Handler(handler_ref(module, export, expr))
}

/// Byte offsets of characters at nesting depth zero, outside string literals.
///
/// Opening brackets are reported at the depth they open from, closing
/// brackets at the depth they return to.
fn top_level(s: &str) -> Vec<(usize, char)> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                if depth == 0 {
                    out.push((i, ch));
                }
                quote = Some(ch);
            }
            '(' | '[' | '{' => {
                if depth == 0 {
                    out.push((i, ch));
                }
                depth += 1;
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    out.push((i, ch));
                }
            }
            _ if depth == 0 => out.push((i, ch)),
            _ => {}
        }
    }

    out
}

/// The initializer text up to the first top-level `;` or line break
fn read_expression(s: &str) -> &str {
    let end = top_level(s)
        .into_iter()
        .find(|&(i, ch)| (ch == ';' || ch == '\n') && !s[..i].trim().is_empty())
        .map_or(s.len(), |(i, _)| i);
    s[..end].trim()
}

fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, ch) in top_level(s) {
        if ch == sep {
            parts.push(&s[start..i]);
            start = i + ch.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Inner text when `expr` is exactly one `open ... close` group
fn enclosed(expr: &str, open: char, close: char) -> Option<&str> {
    if !expr.starts_with(open) || !expr.ends_with(close) {
        return None;
    }
    let first_close = top_level(expr)
        .into_iter()
        .find(|&(_, ch)| ch == close)
        .map(|(i, _)| i)?;
    (first_close == expr.len() - close.len_utf8()).then(|| &expr[open.len_utf8()..first_close])
}

/// Removes comments and verifies that brackets and strings are balanced.
///
/// Line structure is preserved so later scans can stop at line breaks.
fn scrub(source: &str) -> Result<String> {
    let mut out = String::with_capacity(source.len());
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1usize;

    while let Some(ch) = chars.next() {
        match ch {
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        line += 1;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let opened = line;
                let mut prev = '\0';
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        line += 1;
                    }
                    if prev == '*' && c == '/' {
                        closed = true;
                        break;
                    }
                    prev = c;
                }
                if !closed {
                    bail!("unterminated block comment opened on line {}", opened);
                }
            }
            '\'' | '"' | '`' => {
                let opened = line;
                out.push(ch);
                let mut escaped = false;
                let mut closed = false;
                for c in chars.by_ref() {
                    out.push(c);
                    if c == '\n' {
                        line += 1;
                        if ch != '`' {
                            break;
                        }
                    }
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == ch {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    bail!("unterminated string literal on line {}", opened);
                }
            }
            '(' | '[' | '{' => {
                stack.push((ch, line));
                out.push(ch);
            }
            ')' | ']' | '}' => {
                let expected = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => out.push(ch),
                    Some((open, opened)) => bail!(
                        "mismatched `{}` on line {} (`{}` opened on line {})",
                        ch,
                        line,
                        open,
                        opened
                    ),
                    None => bail!("unexpected `{}` on line {}", ch, line),
                }
            }
            '\n' => {
                line += 1;
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    if let Some((open, opened)) = stack.pop() {
        bail!("unclosed `{}` opened on line {}", open, opened);
    }

    Ok(out)
}
