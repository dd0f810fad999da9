//! File-level driver: `.s` reassembly, `.asm` translation, and the
//! optional disassembly-back stage.
//!
//! Two modes, keyed by file extension:
//!
//! - **`.s` (already preprocessed)**: every `WORD`/`DWORD` line carries
//!   its source instruction in a trailing comment; the numeric literal
//!   is recomputed from that comment. A first pass discovers which
//!   routines contain `DWORD` pairs so a second pass can pad the `//`
//!   column of their `WORD` lines into alignment.
//! - **`.asm` (raw)**: the preprocessor runs first, then each line is
//!   passed through verbatim (labels, comments, anything already in
//!   host syntax), rewritten by [`pass_through`], or encoded into a
//!   `WORD`/`DWORD` placeholder.
//!
//! The disassembly-back stage shells out to the host toolchain's `asm`
//! and `objdump`, keys the listing by source line number, and replaces
//! matching placeholders with the disassembled mnemonic.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{debug, warn};

use crate::encoder::{assemble, Encoded};
use crate::error::AsmError;
use crate::passthrough::pass_through;
use crate::preprocessor::Preprocessor;

/// Reassemble an already-preprocessed `.s` buffer.
///
/// `has_dwords` carries the routine map discovered by a prior pass;
/// routines listed there get nine spaces of padding in front of the
/// `//` marker of their `WORD` lines so comment columns align with the
/// wider `DWORD` lines. The returned map records which routines contain
/// at least one `DWORD` in this pass.
pub fn assemble_file(
    buf: &str,
    has_dwords: Option<&BTreeMap<String, bool>>,
) -> Result<(String, BTreeMap<String, bool>), AsmError> {
    let mut contains_dwords = BTreeMap::new();
    let mut out = String::new();
    let mut align = "";
    let mut routine = String::new();

    for line in buf.lines() {
        let mut line = line.to_string();

        if let Some(name) = routine_name(&line) {
            routine = name.to_string();
            align = match has_dwords {
                Some(map) if map.get(&routine).copied().unwrap_or(false) => "         ",
                _ => "",
            };
        }

        if line.starts_with("//") {
            // Full-line comments are not reassembled.
        } else if has_opcode_comment(&line) {
            let instruction = line.splitn(2, "//").nth(1).unwrap_or("").to_string();
            let ins = instruction.split("/*").next().unwrap_or("");
            if let Some(pt) = pass_through(ins) {
                line = format!("    {pt}");
            } else {
                match assemble(ins)? {
                    Encoded::Word(opcode) => {
                        line = format!("    WORD $0x{opcode:08x} {align}//{instruction}");
                    }
                    pair => {
                        let dword = pair.dword().unwrap();
                        line = format!("    DWORD $0x{dword:016x} //{instruction}");
                        contains_dwords.insert(routine.clone(), true);
                    }
                }
            }
        }

        out.push_str(&line);
        out.push('\n');
    }

    Ok((out, contains_dwords))
}

/// Translate a raw `.asm` buffer into `.s` form: preprocess, then
/// pass-through or encode each instruction line. With `to_plan9`, run
/// the disassembly-back stage on the result.
pub fn translate_asm(fname: &str, buf: &str, to_plan9: bool) -> Result<String, AsmError> {
    let mut pp = new_preprocessor(fname);
    let mut preprocessed = String::new();
    pp.process(fname, buf, &mut preprocessed)?;

    let mut assembled = String::new();
    for raw in preprocessed.lines() {
        let mut line = raw.to_string();
        let mut comments = String::new();
        let parts: Vec<&str> = raw.split("//").collect();
        if parts.len() == 2 {
            let code = parts[0].trim_end();
            comments = format!("{}//{}", &parts[0][code.len()..], parts[1]);
            line = code.to_string();
        }

        let trimmed = line.trim();
        if trimmed.is_empty()
            || line.to_lowercase() != line
            || trimmed.starts_with("//")
            || trimmed.starts_with("#include")
            || line.ends_with(':')
        {
            // Verbatim: blanks, labels, comments, and anything already
            // written in host syntax (it contains uppercase).
        } else if let Some(pt) = pass_through(&line) {
            line = format!("    {pt}");
        } else {
            match assemble(&line)? {
                Encoded::Word(opcode) => {
                    line = format!("    WORD $0x{opcode:08x} // {}", line.trim());
                }
                pair => {
                    let dword = pair.dword().unwrap();
                    line = format!("    DWORD $0x{dword:016x} // {}", line.trim());
                }
            }
        }
        assembled.push_str(&line);
        assembled.push_str(&comments);
        assembled.push('\n');
    }

    if to_plan9 {
        translate_back_to_plan9(&assembled)
    } else {
        Ok(assembled)
    }
}

/// Build the preprocessor for `fname`: includes resolve against the
/// source's own directory and the host toolchain's runtime headers.
fn new_preprocessor(fname: &str) -> Preprocessor {
    let mut pp = Preprocessor::new();
    if let Some(dir) = Path::new(fname).parent() {
        if !dir.as_os_str().is_empty() {
            pp.include_dirs.push(dir.to_path_buf());
        }
    }
    match goroot() {
        Some(root) => pp.include_dirs.push(root.join("src").join("runtime")),
        None => warn!("go toolchain not found; runtime include directory unavailable"),
    }
    pp
}

fn goroot() -> Option<PathBuf> {
    let out = Command::new("go").args(["env", "GOROOT"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let root = String::from_utf8_lossy(&out.stdout).trim().to_string();
    if root.is_empty() {
        None
    } else {
        Some(PathBuf::from(root))
    }
}

// ── Line matching ────────────────────────────────────────────────────────

/// `TEXT ·name(SB)` at the start of a line introduces a routine.
fn routine_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("TEXT ·")?;
    let end = rest.find('(')?;
    if end > 0 && rest[end..].starts_with("(SB)") {
        Some(&rest[..end])
    } else {
        None
    }
}

/// Whether the line holds a reassemblable `WORD $0x…` / `DWORD $0x…`
/// literal followed by an instruction comment.
fn has_opcode_comment(line: &str) -> bool {
    fn check(line: &str, tag: &str, digits: usize) -> bool {
        let Some(pos) = line.find(tag) else {
            return false;
        };
        let rest = &line[pos + tag.len()..];
        if rest.len() < digits
            || !rest.as_bytes()[..digits]
                .iter()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return false;
        }
        rest[digits..].trim_start().starts_with("//")
    }
    check(line, "DWORD $0x", 16) || check(line, "WORD $0x", 8)
}

/// Extract `digits` lowercase hex characters following `prefix` on a
/// trimmed line.
fn extract_hex<'a>(line: &'a str, prefix: &str, digits: usize) -> Option<&'a str> {
    let rest = line.trim().strip_prefix(prefix)?;
    if rest.len() < digits {
        return None;
    }
    let hex = &rest[..digits];
    if hex
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    {
        Some(hex)
    } else {
        None
    }
}

// ── Disassembly-back stage ───────────────────────────────────────────────

/// A temporary file that is removed on every exit path.
struct TempFile(PathBuf);

impl TempFile {
    fn new(suffix: &str) -> Result<TempFile, AsmError> {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "sve-as-{}-{}{}",
            std::process::id(),
            n,
            suffix
        ));
        Ok(TempFile(path))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

fn run_tool(tool: &str, args: &[&str]) -> Result<Vec<u8>, AsmError> {
    let output = Command::new("go")
        .arg("tool")
        .arg(tool)
        .args(args)
        .output()
        .map_err(|e| AsmError::Tool {
            tool: format!("go tool {tool}"),
            msg: e.to_string(),
        })?;
    if !output.status.success() {
        let mut msg = String::from_utf8_lossy(&output.stdout).into_owned();
        msg.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(AsmError::Tool {
            tool: format!("go tool {tool}"),
            msg,
        });
    }
    let mut combined = output.stdout;
    combined.extend_from_slice(&output.stderr);
    Ok(combined)
}

/// Replace `WORD`/`DWORD` placeholders with the host disassembler's
/// rendering where the opcodes round-trip. An opcode the disassembler
/// prints as `?` keeps its numeric form.
fn translate_back_to_plan9(opcodes: &str) -> Result<String, AsmError> {
    let root = goroot().ok_or_else(|| AsmError::Tool {
        tool: "go env GOROOT".to_string(),
        msg: "go toolchain not found".to_string(),
    })?;
    let include_dir = root.join("pkg").join("include");

    let src = TempFile::new(".s")?;
    let obj = TempFile::new(".o")?;
    fs::write(src.path(), opcodes).map_err(|e| AsmError::Io {
        path: src.path().display().to_string(),
        msg: e.to_string(),
    })?;

    let src_path = src.path().display().to_string();
    let obj_path = obj.path().display().to_string();
    let inc_path = include_dir.display().to_string();
    run_tool("asm", &["-o", &obj_path, "-I", &inc_path, &src_path])?;
    let objdump = run_tool("objdump", &[&obj_path])?;
    let objdump = String::from_utf8_lossy(&objdump);

    // Each source line may carry several opcodes (e.g. a DWORD pair or
    // a MOVD expanded to ADRP+ADD).
    let mut by_line: BTreeMap<u32, Vec<(String, String)>> = BTreeMap::new();
    for line in objdump.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }
        if !fields[2]
            .bytes()
            .all(|b| b.is_ascii_hexdigit())
            || fields[2].is_empty()
        {
            continue;
        }
        let Some(colon) = fields[0].rfind(':') else {
            continue;
        };
        let Ok(lineno) = fields[0][colon + 1..].parse::<u32>() else {
            continue;
        };
        by_line
            .entry(lineno)
            .or_default()
            .push((fields[2].to_lowercase(), fields[3..].join(" ")));
    }

    let find_by_opcode = |lineno: u32, ophex: &str| -> Option<String> {
        by_line
            .get(&lineno)?
            .iter()
            .find(|(hex, _)| hex == ophex)
            .map(|(_, instr)| instr.clone())
    };

    let mut plan9 = String::new();
    for (idx, raw) in opcodes.lines().enumerate() {
        let lineno = (idx + 1) as u32;
        let mut line = raw.to_string();
        if let Some(pt) = pass_through(raw) {
            // Keep the symbolic form (labels) from the original source.
            line = format!("    {pt}");
        } else if raw.trim().starts_with("WORD $0x") {
            if let Some(pos) = raw.find("//") {
                if let Some(pt) = pass_through(&raw[pos + 2..]) {
                    // Prefer the source-comment instruction when it
                    // carries labels the listing cannot reproduce.
                    plan9.push_str(&format!("    {pt}\n"));
                    continue;
                }
            }
            if let Some(ophex) = extract_hex(raw, "WORD $0x", 8) {
                if let Some(instr) = find_by_opcode(lineno, ophex) {
                    if instr != "?" {
                        line = format!("    {instr}");
                    }
                }
            }
        } else if raw.trim().starts_with("DWORD $0x") {
            if let Some(ophex) = extract_hex(raw, "DWORD $0x", 16) {
                let upper = &ophex[..8];
                let lower = &ophex[8..];
                if let Some(instr) = find_by_opcode(lineno, lower) {
                    if instr != "?" {
                        line = format!("    {instr}");
                    }
                }
                if let Some(instr) = find_by_opcode(lineno, upper) {
                    if instr != "?" {
                        plan9.push_str(&format!("    {instr}\n"));
                    }
                }
            }
        }
        plan9.push_str(&line);
        plan9.push('\n');
    }

    debug!(lines = by_line.len(), "disassembly-back substitution done");
    Ok(plan9)
}
