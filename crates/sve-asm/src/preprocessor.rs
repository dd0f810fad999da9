//! C-style preprocessor for assembly sources.
//!
//! Handles `#include`, object-like and function-like `#define`, `#undef`,
//! the conditional family `#if`/`#ifdef`/`#ifndef`/`#elif`/`#else`/
//! `#endif`, backslash line continuation, and token-aware macro expansion
//! with a pushback stack and an expansion cap.
//!
//! Line numbers downstream must keep matching the input, so every
//! non-`#include` directive (including the continuation lines it
//! consumed) is replaced by blank lines; `#include` is replaced by the
//! included file's expanded content.
//!
//! The `#if` expression grammar is intentionally tiny: `defined(NAME)`,
//! a bare identifier (true iff defined with a non-empty object body
//! other than `"0"`), and the literal `1`. Everything else is false.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{short_path, AsmError};

/// Expansion cap per line; exceeding it reports a recursive macro.
const MAX_EXPANSIONS: u32 = 100;

/// A function-like macro definition.
#[derive(Debug, Clone)]
struct FnMacro {
    params: Vec<String>,
    body: String,
}

/// Directive handling outcome before source context is attached.
enum DirectiveError {
    /// A bare message to be wrapped with `file:line` by the caller.
    Bare(String),
    /// An error that already carries its own context (nested includes).
    Full(AsmError),
}

/// Preprocessor state for one top-level session. The macro table is
/// shared across `#include`s; the include-cycle guard is threaded
/// through the recursive [`Preprocessor::process`] calls.
#[derive(Debug, Default)]
pub struct Preprocessor {
    /// Directories searched for `#include` after the including file's own.
    pub include_dirs: Vec<PathBuf>,
    /// Emit `// file:line` markers in front of expanded content lines.
    pub keep_line_comments: bool,
    objects: BTreeMap<String, String>,
    functions: BTreeMap<String, FnMacro>,
    include_guard: BTreeSet<String>,
}

impl Preprocessor {
    /// Create an empty preprocessor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define an object-like macro.
    pub fn define_object(&mut self, name: &str, value: &str) {
        self.objects.insert(name.to_string(), value.to_string());
    }

    /// Define a function-like macro.
    pub fn define_func(&mut self, name: &str, params: Vec<String>, body: &str) {
        self.functions.insert(
            name.to_string(),
            FnMacro {
                params,
                body: body.to_string(),
            },
        );
    }

    fn is_defined(&self, name: &str) -> bool {
        self.objects.contains_key(name) || self.functions.contains_key(name)
    }

    /// Preprocess `source` (the content of `filename`), appending the
    /// expanded output to `out`.
    pub fn process(
        &mut self,
        filename: &str,
        source: &str,
        out: &mut String,
    ) -> Result<(), AsmError> {
        let resolved = self
            .resolve_as_file(filename, "")
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| filename.to_string());

        if self.include_guard.contains(&resolved) {
            return Err(AsmError::preprocess(
                &resolved,
                0,
                format!("include cycle detected at \"{}\"", short_path(&resolved)),
            ));
        }
        self.include_guard.insert(resolved.clone());
        let result = self.process_inner(&resolved, source, out);
        self.include_guard.remove(&resolved);
        result
    }

    fn process_inner(
        &mut self,
        filename: &str,
        source: &str,
        out: &mut String,
    ) -> Result<(), AsmError> {
        let mut lr = LineReader::new(source);
        let mut cond = CondStack::default();
        let mut buffered = String::new();

        let mut line_no: u32 = 0;
        let mut pending: Option<(String, u32)> = None;

        loop {
            let line = if let Some((text, no)) = pending.take() {
                line_no = no;
                text
            } else {
                match lr.next() {
                    Some((text, _)) => {
                        line_no += 1;
                        text
                    }
                    None => break,
                }
            };

            if let Some(idx) = line.find('#') {
                if let Some(first) = first_non_space_index(&line) {
                    if idx > first && is_directive_prefix(line[idx..].trim()) {
                        return Err(AsmError::preprocess(
                            filename,
                            line_no,
                            "'#' must be first item on line",
                        ));
                    }
                }
            }

            if line.trim().starts_with('#') {
                let start_line_no = line_no;
                let (full, end_line_no, next, ended_at_eof) =
                    read_directive_line(&line, line_no, &mut lr);
                line_no = end_line_no;
                pending = next;
                let full_trim = full.trim().to_string();
                let (cmd, arg) = split_directive(&full_trim);

                let at_eof = ended_at_eof || (pending.is_none() && lr.is_empty());
                if cmd == "define" && at_eof && !lr.last_has_nl() {
                    if let Some((_, _, body)) = parse_define_directive(&arg) {
                        if !body.trim().is_empty() {
                            return Err(AsmError::preprocess(
                                filename,
                                start_line_no,
                                "no newline after macro definition",
                            ));
                        }
                    }
                }

                match self.handle_directive(&mut buffered, filename, start_line_no, &full_trim, &mut cond)
                {
                    Ok(()) => {}
                    Err(DirectiveError::Bare(msg)) => {
                        return Err(AsmError::preprocess(filename, start_line_no, msg));
                    }
                    Err(DirectiveError::Full(err)) => return Err(err),
                }

                if cmd != "include" {
                    for _ in start_line_no..=line_no {
                        buffered.push('\n');
                    }
                }
                continue;
            }

            if !cond.active() {
                continue;
            }

            let expanded = self
                .expand_line_for_process(&line)
                .map_err(|msg| AsmError::preprocess(filename, line_no, msg))?;
            if self.keep_line_comments {
                let _ = writeln!(buffered, "// {}:{}", short_path(filename), line_no);
            }
            buffered.push_str(&expanded);
            if !expanded.ends_with('\n') {
                buffered.push('\n');
            }
        }

        if cond.depth() != 0 {
            return Err(AsmError::preprocess(
                filename,
                cond.unclosed_line(),
                "unclosed #ifdef or #ifndef",
            ));
        }
        out.push_str(&buffered);
        Ok(())
    }

    fn handle_directive(
        &mut self,
        out: &mut String,
        filename: &str,
        line_no: u32,
        trim: &str,
        cond: &mut CondStack,
    ) -> Result<(), DirectiveError> {
        let (cmd, arg) = split_directive(trim);

        match cmd.as_str() {
            "include" => {
                if !cond.active() {
                    return Ok(());
                }
                let path = parse_include_arg(&arg).ok_or_else(|| {
                    DirectiveError::Bare(format!("bad #include syntax: \"{trim}\""))
                })?;
                let (content, resolved) = self
                    .read_include(&path, filename)
                    .map_err(|msg| DirectiveError::Bare(format!("include \"{path}\": {msg}")))?;
                self.process(&resolved, &content, out)
                    .map_err(DirectiveError::Full)
            }
            "define" => {
                if !cond.active() {
                    return Ok(());
                }
                let (name, params, body) = parse_define_directive(&arg)
                    .ok_or_else(|| DirectiveError::Bare(format!("bad #define: \"{trim}\"")))?;
                if self.is_defined(&name) {
                    return Err(DirectiveError::Bare("redefinition of macro".to_string()));
                }
                match params {
                    None => self.define_object(&name, &body),
                    Some(params) => self.define_func(&name, params, &body),
                }
                Ok(())
            }
            "undef" => {
                if !cond.active() {
                    return Ok(());
                }
                let name = arg.trim();
                self.objects.remove(name);
                self.functions.remove(name);
                Ok(())
            }
            "ifdef" => {
                cond.push(self.is_defined(arg.trim()), line_no);
                Ok(())
            }
            "ifndef" => {
                cond.push(!self.is_defined(arg.trim()), line_no);
                Ok(())
            }
            "if" => {
                cond.push(self.eval_if_expr(arg.trim()), line_no);
                Ok(())
            }
            "elif" => {
                cond.elif(self.eval_if_expr(arg.trim()));
                Ok(())
            }
            "else" => {
                cond.push_else();
                Ok(())
            }
            "endif" => {
                cond.pop();
                Ok(())
            }
            _ => {
                if !cond.active() {
                    return Ok(());
                }
                Err(DirectiveError::Bare(format!(
                    "unknown directive \"{cmd}\""
                )))
            }
        }
    }

    /// Evaluate a `#if` expression. Only `defined(NAME)`, a bare
    /// identifier, and the literal `1` are recognized; a bare identifier
    /// with an object body of `"0"` (or an empty body) is false.
    fn eval_if_expr(&self, expr: &str) -> bool {
        let expr = expr.trim();
        if expr.is_empty() {
            return false;
        }
        if let Some(name) = parse_defined_expr(expr) {
            return self.is_defined(name);
        }
        if self.is_defined(expr) {
            let v = self
                .objects
                .get(expr)
                .map(|s| s.trim())
                .unwrap_or_default();
            return !v.is_empty() && v != "0";
        }
        expr == "1"
    }

    fn expand_line_for_process(&self, line: &str) -> Result<String, String> {
        if let Some(core) = self.sole_macro_invocation(line) {
            let mut expanded = self.expand_line(&core)?;
            // A body that starts with a continuation newline would push
            // the first expanded line below the call site; eat it so
            // the expansion starts on the invocation's own line.
            if let Some(rest) = expanded.strip_prefix('\n') {
                expanded = rest.to_string();
            }
            return Ok(expanded);
        }
        self.expand_line(line)
    }

    /// When the whole line (modulo comment and whitespace) is exactly one
    /// macro call, return the call text.
    fn sole_macro_invocation(&self, line: &str) -> Option<String> {
        let trim = strip_line_comment(line).trim();
        if trim.is_empty() {
            return None;
        }
        let (name, rest) = split_ident_prefix(trim)?;
        if self.functions.contains_key(name) {
            if rest.starts_with('(') {
                let end = scan_paren_end(rest)?;
                if rest[end..].trim().is_empty() {
                    return Some(trim.to_string());
                }
            }
            return None;
        }
        if self.objects.contains_key(name) && rest.trim().is_empty() {
            return Some(trim.to_string());
        }
        None
    }

    /// Expand macros in one line using a token scanner with a pushback
    /// stack, capped at [`MAX_EXPANSIONS`] substitutions.
    pub fn expand_line(&self, line: &str) -> Result<String, String> {
        Expander {
            p: self,
            stack: vec![Chunk::new(line.to_string())],
            expansions: 0,
        }
        .expand()
    }

    // ── Include resolution ───────────────────────────────────────

    fn read_include(&self, path: &str, including_file: &str) -> Result<(String, String), String> {
        let resolved = self.resolve_as_file(path, including_file)?;
        let content = fs::read_to_string(&resolved).map_err(|e| e.to_string())?;
        Ok((content, resolved.to_string_lossy().into_owned()))
    }

    /// Resolution order: absolute paths directly; then the including
    /// file's directory; then the configured include directories.
    fn resolve_as_file(&self, path: &str, including_file: &str) -> Result<PathBuf, String> {
        let p = Path::new(path);
        if p.is_absolute() {
            if p.is_file() {
                return Ok(p.to_path_buf());
            }
            return Err(format!("cannot resolve include \"{path}\""));
        }
        if !including_file.is_empty() && including_file != "<stdin>" {
            if let Some(base) = Path::new(including_file).parent() {
                let cand = base.join(p);
                if cand.is_file() {
                    return Ok(cand);
                }
            }
        }
        for dir in &self.include_dirs {
            let cand = dir.join(p);
            if cand.is_file() {
                return Ok(cand);
            }
        }
        Err(format!("cannot resolve include \"{path}\""))
    }
}

// ── Line reading ─────────────────────────────────────────────────────────

struct LineReader {
    lines: Vec<(String, bool)>,
    pos: usize,
    last_has_nl: bool,
}

impl LineReader {
    fn new(source: &str) -> Self {
        LineReader {
            lines: split_lines_keep_newline(source),
            pos: 0,
            last_has_nl: true,
        }
    }

    fn next(&mut self) -> Option<(String, bool)> {
        let (text, has_nl) = self.lines.get(self.pos)?.clone();
        self.pos += 1;
        self.last_has_nl = has_nl;
        Some((text, has_nl))
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.lines.len()
    }

    fn last_has_nl(&self) -> bool {
        self.last_has_nl
    }
}

fn split_lines_keep_newline(s: &str) -> Vec<(String, bool)> {
    let mut lines = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        match rest.find('\n') {
            Some(i) => {
                lines.push((rest[..i].to_string(), true));
                rest = &rest[i + 1..];
            }
            None => {
                lines.push((rest.to_string(), false));
                break;
            }
        }
    }
    lines
}

/// Join a backslash-continued directive into one logical line (interior
/// newlines preserved for line-number accounting). Returns the joined
/// text, the line number of the last consumed line, a pending line that
/// was read but does not belong to the directive, and whether EOF was
/// reached mid-directive.
fn read_directive_line(
    first_line: &str,
    first_line_no: u32,
    lr: &mut LineReader,
) -> (String, u32, Option<(String, u32)>, bool) {
    let mut line = first_line.to_string();
    let mut line_no = first_line_no;
    let mut b = String::new();
    loop {
        if !line_continues(&line) {
            b.push_str(&line);
            return (b, line_no, None, false);
        }
        b.push_str(strip_line_continuation(&line));
        let next = match lr.next() {
            Some((next, _)) => next,
            None => return (b, line_no, None, true),
        };
        line_no += 1;
        if !is_continuation_line(&next) {
            return (b, line_no - 1, Some((next, line_no)), false);
        }
        b.push('\n');
        line = next;
    }
}

fn line_continues(s: &str) -> bool {
    s.trim_end_matches([' ', '\t']).ends_with('\\')
}

fn strip_line_continuation(s: &str) -> &str {
    let trimmed = s.trim_end_matches([' ', '\t']);
    match trimmed.strip_suffix('\\') {
        Some(body) => body.trim_end_matches([' ', '\t']),
        None => s,
    }
}

/// Continuation lines are the indented ones.
fn is_continuation_line(s: &str) -> bool {
    s.starts_with(' ') || s.starts_with('\t')
}

// ── Directive parsing ────────────────────────────────────────────────────

fn split_directive(trim: &str) -> (String, String) {
    // `trim` begins with '#'.
    let rest = trim[1..].trim();
    if rest.is_empty() {
        return (String::new(), String::new());
    }
    let cmd = rest.split_whitespace().next().unwrap_or("");
    let arg = rest[cmd.len()..].trim().to_string();
    (cmd.to_string(), arg)
}

fn parse_include_arg(arg: &str) -> Option<String> {
    let arg = arg.trim();
    if arg.len() >= 2
        && ((arg.starts_with('"') && arg.ends_with('"'))
            || (arg.starts_with('<') && arg.ends_with('>')))
    {
        return Some(arg[1..arg.len() - 1].to_string());
    }
    None
}

/// Parse `NAME body` or `NAME(p1, p2) body`. The parameter list is
/// `Some` only when `(` immediately follows the name.
fn parse_define_directive(arg: &str) -> Option<(String, Option<Vec<String>>, String)> {
    let arg = arg.trim_start();
    let bytes = arg.as_bytes();
    if bytes.is_empty() || !is_ident_start(bytes[0]) {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() && is_ident_part(bytes[i]) {
        i += 1;
    }
    let name = arg[..i].to_string();
    let rest = &arg[i..];

    if let Some(paren) = rest.strip_prefix('(') {
        let j = paren.find(')')?;
        let param_str = &paren[..j];
        let body = paren[j + 1..].trim_start_matches([' ', '\t']).to_string();
        if param_str.trim().is_empty() {
            return Some((name, Some(Vec::new()), body));
        }
        let params = param_str
            .split(',')
            .map(|p| p.trim().to_string())
            .collect();
        return Some((name, Some(params), body));
    }

    let body = rest.trim_start_matches([' ', '\t']).to_string();
    Some((name, None, body))
}

fn parse_defined_expr(expr: &str) -> Option<&str> {
    let inner = expr.strip_prefix("defined")?.trim_start();
    let inner = inner.strip_prefix('(')?;
    let inner = inner.strip_suffix(')')?.trim();
    let bytes = inner.as_bytes();
    if bytes.is_empty() || !is_ident_start(bytes[0]) {
        return None;
    }
    if bytes.iter().skip(1).all(|&b| is_ident_part(b)) {
        Some(inner)
    } else {
        None
    }
}

fn first_non_space_index(s: &str) -> Option<usize> {
    s.bytes().position(|b| b != b' ' && b != b'\t')
}

fn is_directive_prefix(s: &str) -> bool {
    let Some(rest) = s.strip_prefix('#') else {
        return false;
    };
    matches!(
        rest.trim().split_whitespace().next(),
        Some("include" | "define" | "undef" | "ifdef" | "ifndef" | "if" | "elif" | "else" | "endif")
    )
}

fn strip_line_comment(s: &str) -> &str {
    match s.find("//") {
        Some(i) => &s[..i],
        None => s,
    }
}

fn split_ident_prefix(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || !is_ident_start(bytes[0]) {
        return None;
    }
    let mut i = 1;
    while i < bytes.len() && is_ident_part(bytes[i]) {
        i += 1;
    }
    Some((&s[..i], &s[i..]))
}

/// Find the index one past the `)` matching the leading `(`, skipping
/// over quoted strings.
fn scan_paren_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\\' {
                        i += 1;
                    } else if bytes[i] == quote {
                        break;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn is_ident_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

fn is_ident_part(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

// ── Macro expansion ──────────────────────────────────────────────────────

struct Chunk {
    s: Vec<u8>,
    i: usize,
}

impl Chunk {
    fn new(s: String) -> Self {
        Chunk {
            s: s.into_bytes(),
            i: 0,
        }
    }
}

struct Expander<'p> {
    p: &'p Preprocessor,
    stack: Vec<Chunk>,
    expansions: u32,
}

impl Expander<'_> {
    fn expand(mut self) -> Result<String, String> {
        let mut out: Vec<u8> = Vec::new();
        while let Some(ch) = self.next() {
            if ch == b'"' || ch == b'\'' {
                out.push(ch);
                self.copy_string(&mut out, ch);
                continue;
            }
            if ch == b'/' {
                if self.peek_is(b'/') {
                    out.push(ch);
                    out.push(self.must_next());
                    self.copy_line_comment(&mut out);
                    continue;
                }
                if self.peek_is(b'*') {
                    out.push(ch);
                    out.push(self.must_next());
                    self.copy_block_comment(&mut out);
                    continue;
                }
            }
            if is_ident_start(ch) {
                let name = self.read_ident(ch);
                if let Some(macro_def) = self.p.functions.get(&name) {
                    if self.peek_is(b'(') {
                        self.next();
                        if let Some(args) = self.read_args() {
                            let repl = apply_fn_macro(macro_def, &args);
                            self.push_expansion(repl)?;
                            continue;
                        }
                    }
                    out.extend_from_slice(name.as_bytes());
                    continue;
                }
                if let Some(val) = self.p.objects.get(&name) {
                    self.push_expansion(val.clone())?;
                    continue;
                }
                out.extend_from_slice(name.as_bytes());
                continue;
            }
            out.push(ch);
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn push_expansion(&mut self, s: String) -> Result<(), String> {
        self.expansions += 1;
        if self.expansions > MAX_EXPANSIONS {
            return Err("recursive macro invocation".to_string());
        }
        if !s.is_empty() {
            self.stack.push(Chunk::new(s));
        }
        Ok(())
    }

    fn next(&mut self) -> Option<u8> {
        while let Some(top) = self.stack.last_mut() {
            if top.i >= top.s.len() {
                self.stack.pop();
                continue;
            }
            let ch = top.s[top.i];
            top.i += 1;
            return Some(ch);
        }
        None
    }

    fn must_next(&mut self) -> u8 {
        self.next().unwrap_or(0)
    }

    fn peek_is(&self, b: u8) -> bool {
        self.peek(0) == Some(b)
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        let mut off = offset;
        for chunk in self.stack.iter().rev() {
            let remain = chunk.s.len().saturating_sub(chunk.i);
            if off < remain {
                return Some(chunk.s[chunk.i + off]);
            }
            off -= remain;
        }
        None
    }

    fn read_ident(&mut self, first: u8) -> String {
        let mut b = vec![first];
        while let Some(ch) = self.peek(0) {
            if !is_ident_part(ch) {
                break;
            }
            self.next();
            b.push(ch);
        }
        String::from_utf8_lossy(&b).into_owned()
    }

    /// Read the comma-separated argument list of a function-like macro
    /// invocation; the opening `(` has already been consumed. Nested
    /// parentheses and quoted strings do not split arguments.
    fn read_args(&mut self) -> Option<Vec<String>> {
        let mut args = Vec::new();
        let mut cur: Vec<u8> = Vec::new();
        let mut depth = 1usize;
        loop {
            let ch = self.next()?;
            match ch {
                b'"' | b'\'' => {
                    cur.push(ch);
                    self.copy_string(&mut cur, ch);
                }
                b'/' if self.peek_is(b'/') => {
                    cur.push(ch);
                    cur.push(self.must_next());
                    self.copy_line_comment(&mut cur);
                }
                b'/' if self.peek_is(b'*') => {
                    cur.push(ch);
                    cur.push(self.must_next());
                    self.copy_block_comment(&mut cur);
                }
                b'(' => {
                    depth += 1;
                    cur.push(ch);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        args.push(String::from_utf8_lossy(&cur).trim().to_string());
                        return Some(args);
                    }
                    cur.push(ch);
                }
                b',' if depth == 1 => {
                    args.push(String::from_utf8_lossy(&cur).trim().to_string());
                    cur.clear();
                }
                _ => cur.push(ch),
            }
        }
    }

    fn copy_string(&mut self, out: &mut Vec<u8>, quote: u8) {
        while let Some(ch) = self.next() {
            out.push(ch);
            if ch == b'\\' {
                if let Some(next) = self.next() {
                    out.push(next);
                }
                continue;
            }
            if ch == quote {
                return;
            }
        }
    }

    fn copy_line_comment(&mut self, out: &mut Vec<u8>) {
        while let Some(ch) = self.next() {
            out.push(ch);
            if ch == b'\n' {
                return;
            }
        }
    }

    fn copy_block_comment(&mut self, out: &mut Vec<u8>) {
        while let Some(ch) = self.next() {
            out.push(ch);
            if ch == b'*' && self.peek_is(b'/') {
                out.push(self.must_next());
                return;
            }
        }
    }
}

/// Substitute each parameter occurrence in the macro body with the
/// corresponding argument text (missing arguments substitute as empty).
fn apply_fn_macro(m: &FnMacro, args: &[String]) -> String {
    let mut repl = BTreeMap::new();
    for (i, p) in m.params.iter().enumerate() {
        repl.insert(p.as_str(), args.get(i).map(String::as_str).unwrap_or(""));
    }
    replace_idents(&m.body, &repl)
}

/// Identifier-boundary replacement that leaves quoted strings and
/// comments untouched.
fn replace_idents(s: &str, repl: &BTreeMap<&str, &str>) -> String {
    let bytes = s.as_bytes();
    let mut b: Vec<u8> = Vec::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        let ch = bytes[i];
        if ch == b'"' || ch == b'\'' {
            let quote = ch;
            b.push(ch);
            i += 1;
            while i < bytes.len() {
                let c = bytes[i];
                b.push(c);
                i += 1;
                if c == b'\\' && i < bytes.len() {
                    b.push(bytes[i]);
                    i += 1;
                    continue;
                }
                if c == quote {
                    break;
                }
            }
            continue;
        }
        if ch == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            b.extend_from_slice(&bytes[i..]);
            break;
        }
        if ch == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            b.push(ch);
            b.push(bytes[i + 1]);
            i += 2;
            while i < bytes.len() {
                let c = bytes[i];
                b.push(c);
                i += 1;
                if c == b'*' && i < bytes.len() && bytes[i] == b'/' {
                    b.push(bytes[i]);
                    i += 1;
                    break;
                }
            }
            continue;
        }
        if is_ident_start(ch) {
            let mut j = i + 1;
            while j < bytes.len() && is_ident_part(bytes[j]) {
                j += 1;
            }
            let name = &s[i..j];
            match repl.get(name) {
                Some(val) => b.extend_from_slice(val.as_bytes()),
                None => b.extend_from_slice(name.as_bytes()),
            }
            i = j;
            continue;
        }
        b.push(ch);
        i += 1;
    }
    String::from_utf8_lossy(&b).into_owned()
}

// ── Conditional stack ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct CondFrame {
    parent_active: bool,
    taken: bool,
    active: bool,
    line: u32,
}

#[derive(Debug, Default)]
struct CondStack {
    stack: Vec<CondFrame>,
}

impl CondStack {
    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn active(&self) -> bool {
        self.stack.last().map_or(true, |f| f.active)
    }

    fn push(&mut self, cond: bool, line: u32) {
        let parent = self.active();
        let active = parent && cond;
        self.stack.push(CondFrame {
            parent_active: parent,
            taken: active,
            active,
            line,
        });
    }

    fn elif(&mut self, cond: bool) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if !top.parent_active || top.taken {
            top.active = false;
            return;
        }
        top.active = cond;
        if cond {
            top.taken = true;
        }
    }

    fn push_else(&mut self) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if !top.parent_active {
            top.active = false;
            return;
        }
        top.active = !top.taken;
        top.taken = true;
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    fn unclosed_line(&self) -> u32 {
        self.stack.last().map_or(0, |f| f.line)
    }
}

// ── Lexer-style drain (test harness) ─────────────────────────────────────

/// Tokenize and expand `input`, returning the dot-joined token stream
/// (newlines appear as `\n` tokens). This mirrors how the host
/// toolchain's own assembler lexer exercises its preprocessor and is
/// used by the preprocessor test suite.
pub fn lex_drain(input: &str) -> Result<String, AsmError> {
    let mut pp = Preprocessor::new();
    let mut cond = CondStack::default();
    let lines = split_lines_keep_newline(input);

    let mut buf = String::new();
    let mut i = 0;
    while i < lines.len() {
        let (line, has_nl) = (&lines[i].0, lines[i].1);

        if let Some(idx) = line.find('#') {
            if let Some(first) = first_non_space_index(line) {
                if idx > first {
                    return Err(AsmError::preprocess(
                        "<lex>",
                        (i + 1) as u32,
                        "'#' must be first item on line",
                    ));
                }
            }
        }

        if line.trim().starts_with('#') {
            let start_line_no = (i + 1) as u32;
            let mut full = line.clone();
            while line_continues(&full) {
                full = strip_line_continuation(&full).to_string();
                if i + 1 >= lines.len() {
                    break;
                }
                i += 1;
                full.push('\n');
                full.push_str(&lines[i].0);
            }
            let full_trim = full.trim().to_string();
            let (cmd, arg) = split_directive(&full_trim);
            if cmd == "define" && !lines[i].1 {
                if let Some((_, _, body)) = parse_define_directive(&arg) {
                    if !body.trim().is_empty() {
                        return Err(AsmError::preprocess(
                            "<lex>",
                            start_line_no,
                            "no newline after macro definition",
                        ));
                    }
                }
            }
            if let Err(err) =
                pp.handle_directive(&mut String::new(), "<lex>", start_line_no, &full_trim, &mut cond)
            {
                return Err(match err {
                    DirectiveError::Bare(msg) => AsmError::preprocess("<lex>", start_line_no, msg),
                    DirectiveError::Full(e) => e,
                });
            }
            i += 1;
            continue;
        }

        if !cond.active() {
            i += 1;
            continue;
        }

        lex_process_expanded(&mut buf, &mut pp, &mut cond, line, has_nl)
            .map_err(|msg| AsmError::preprocess("<lex>", (i + 1) as u32, msg))?;
        i += 1;
    }
    if cond.depth() != 0 {
        return Err(AsmError::preprocess(
            "<lex>",
            cond.unclosed_line(),
            "unclosed #ifdef or #ifndef",
        ));
    }
    Ok(buf)
}

fn lex_process_expanded(
    buf: &mut String,
    pp: &mut Preprocessor,
    cond: &mut CondStack,
    line: &str,
    has_nl: bool,
) -> Result<(), String> {
    let expanded = pp.expand_line(line)?;
    let parts: Vec<&str> = expanded.split('\n').collect();
    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        let emit_nl = if i < last { true } else { has_nl };
        lex_process_line(buf, pp, cond, part, emit_nl)?;
    }
    Ok(())
}

fn lex_process_line(
    buf: &mut String,
    pp: &mut Preprocessor,
    cond: &mut CondStack,
    line: &str,
    emit_nl: bool,
) -> Result<(), String> {
    let trim = line.trim();
    if trim.starts_with('#') {
        // A directive produced by expansion takes effect immediately
        // (this is how `#define A #define B THIS` works).
        return pp
            .handle_directive(&mut String::new(), "<lex>", 0, trim, cond)
            .map_err(|err| match err {
                DirectiveError::Bare(msg) => msg,
                DirectiveError::Full(e) => format!("{e}"),
            });
    }
    if !cond.active() {
        return Ok(());
    }
    for tok in lex_tokens(line) {
        append_token(buf, &tok);
    }
    if emit_nl {
        append_token(buf, "\n");
    }
    Ok(())
}

fn append_token(buf: &mut String, tok: &str) {
    if tok.is_empty() {
        return;
    }
    if !buf.is_empty() {
        buf.push('.');
    }
    buf.push_str(tok);
}

/// Tokenize one line the way the host assembler's lexer would:
/// identifiers (including `.` and `·`), radix-prefixed numbers, quoted
/// strings, comments stripped, every other character its own token.
pub fn lex_tokens(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut toks = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == ' ' || ch == '\t' || ch == '\r' {
            i += 1;
            continue;
        }
        if ch == '/' && chars.get(i + 1) == Some(&'/') {
            break;
        }
        if ch == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i + 1 < chars.len() {
                if chars[i] == '*' && chars[i + 1] == '/' {
                    i += 2;
                    break;
                }
                i += 1;
            }
            continue;
        }
        if ch == '"' || ch == '\'' {
            let quote = ch;
            let start = i;
            i += 1;
            while i < chars.len() {
                let c = chars[i];
                i += 1;
                if c == '\\' && i < chars.len() {
                    i += 1;
                    continue;
                }
                if c == quote {
                    break;
                }
            }
            toks.push(chars[start..i].iter().collect());
            continue;
        }
        if lex_is_ident_start(ch) {
            let start = i;
            i += 1;
            while i < chars.len() && lex_is_ident_part(chars[i]) {
                i += 1;
            }
            toks.push(chars[start..i].iter().collect());
            continue;
        }
        if ch.is_ascii_digit() {
            let start = i;
            i += 1;
            if ch == '0' && i < chars.len() {
                match chars[i] {
                    'x' | 'X' => {
                        i += 1;
                        while i < chars.len() && chars[i].is_ascii_hexdigit() {
                            i += 1;
                        }
                    }
                    'b' | 'B' => {
                        i += 1;
                        while i < chars.len() && matches!(chars[i], '0' | '1') {
                            i += 1;
                        }
                    }
                    'o' | 'O' => {
                        i += 1;
                        while i < chars.len() && ('0'..='7').contains(&chars[i]) {
                            i += 1;
                        }
                    }
                    _ => {
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
            } else {
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            toks.push(chars[start..i].iter().collect());
            continue;
        }
        toks.push(ch.to_string());
        i += 1;
    }
    toks
}

fn lex_is_ident_start(c: char) -> bool {
    c == '_' || c == '.' || c == '·' || c.is_ascii_alphabetic()
}

fn lex_is_ident_part(c: char) -> bool {
    lex_is_ident_start(c) || c.is_ascii_digit()
}
