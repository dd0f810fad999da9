//! Operand lexing and scalar token parsing.
//!
//! The lexer is deliberately dumb: it splits on whitespace, strips the
//! commas, and pulls register-list braces out into standalone tokens.
//! All interpretation of the retained punctuation (`[`/`]` memory
//! addressing, `.` element suffixes, `/` predicate qualifiers, `#`
//! immediates) happens in the token parsers below and in the
//! shape classifiers of [`crate::classify`].
//!
//! Memory-address operands span several tokens because commas are
//! stripped and whitespace splits; the address helpers at the bottom
//! re-join the bracketed sub-list with `", "` before picking it apart.
//! That re-join is a fixed contract with the memory-form classifiers.

/// SVE element type suffix (`.b`/`.h`/`.s`/`.d`/`.q`): 8/16/32/64/128-bit lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    /// 8-bit lanes.
    B,
    /// 16-bit lanes.
    H,
    /// 32-bit lanes.
    S,
    /// 64-bit lanes.
    D,
    /// 128-bit lanes.
    Q,
}

impl ElementType {
    /// Parse a `.T` suffix (case-insensitive).
    pub fn from_suffix(s: &str) -> Option<ElementType> {
        match s {
            "b" | "B" => Some(ElementType::B),
            "h" | "H" => Some(ElementType::H),
            "s" | "S" => Some(ElementType::S),
            "d" | "D" => Some(ElementType::D),
            "q" | "Q" => Some(ElementType::Q),
            _ => None,
        }
    }

    /// The 2-bit `size` field: B=00, H=01, S=10, D=11.
    ///
    /// # Panics
    ///
    /// Q has no 2-bit size encoding; asking for one is a bug in the
    /// dispatch tables.
    pub fn size_bits(self) -> &'static str {
        match self {
            ElementType::B => "00",
            ElementType::H => "01",
            ElementType::S => "10",
            ElementType::D => "11",
            ElementType::Q => panic!("128-bit lanes have no 2-bit size field"),
        }
    }

    /// The 5-bit type specifier with a one-hot lane-width bit:
    /// B=00001, H=00010, S=00100, D=01000, Q=10000.
    pub fn type_specifier(self) -> &'static str {
        match self {
            ElementType::B => "00001",
            ElementType::H => "00010",
            ElementType::S => "00100",
            ElementType::D => "01000",
            ElementType::Q => "10000",
        }
    }

    /// Lane width in bits.
    pub fn esize(self) -> u32 {
        match self {
            ElementType::B => 8,
            ElementType::H => 16,
            ElementType::S => 32,
            ElementType::D => 64,
            ElementType::Q => 128,
        }
    }
}

/// Split one instruction into its mnemonic and operand tokens.
///
/// Commas are stripped from every operand token; `{`/`}` register-list
/// braces become standalone tokens regardless of how the source spaced
/// them, so `{z20.b}` and `{ z20.b }` classify identically.
pub fn split_instruction(ins: &str) -> Option<(String, Vec<String>)> {
    let mut fields = ins.split_whitespace();
    let mnem = fields.next()?.to_string();
    let mut args = Vec::new();
    for field in fields {
        let tok = field.replace(',', "");
        if tok.is_empty() {
            continue;
        }
        push_brace_split(&mut args, &tok);
    }
    Some((mnem, args))
}

fn push_brace_split(args: &mut Vec<String>, tok: &str) {
    let mut rest = tok;
    if let Some(inner) = rest.strip_prefix('{') {
        args.push("{".to_string());
        rest = inner;
    }
    if let Some(inner) = rest.strip_suffix('}') {
        if !inner.is_empty() {
            args.push(inner.to_string());
        }
        args.push("}".to_string());
        return;
    }
    if !rest.is_empty() {
        args.push(rest.to_string());
    }
}

/// Parse a scalar register: `xN`/`wN` (N in 0..=31), `xzr`/`wzr` → 31,
/// `sp` → 31. The `w`/`x` width does not change the encoding; the
/// mnemonic context selects the `sf` bit.
pub fn get_r(r: &str) -> Option<u32> {
    let mut chars = r.chars();
    match chars.next() {
        Some('x') | Some('w') => {
            let rest = &r[1..];
            if rest == "zr" {
                return Some(31);
            }
            match rest.parse::<u32>() {
                Ok(n) if n < 32 => Some(n),
                _ => None,
            }
        }
        _ if r == "sp" => Some(31),
        _ => None,
    }
}

/// Parse a predicate register `pN` (N in 0..=15), ignoring any suffix.
pub fn get_p(r: &str) -> Option<u32> {
    let rest = r.strip_prefix('p')?;
    match rest.parse::<u32>() {
        Ok(n) if n < 16 => Some(n),
        _ => None,
    }
}

/// Parse a predicate register with a required element-type suffix,
/// e.g. `p3.s`.
pub fn get_p_typed(reg: &str) -> Option<(u32, ElementType)> {
    let (name, suffix) = reg.split_once('.')?;
    let p = get_p(name)?;
    let t = ElementType::from_suffix(suffix)?;
    Some((p, t))
}

/// Parse the guarding predicate of a predicated operand, dropping any
/// `/z` or `/m` qualifier (`p1/M` → 1).
pub fn get_p_governing(reg: &str) -> Option<u32> {
    get_p(reg.split('/').next().unwrap_or(reg))
}

/// Whether a predicate operand carries the zeroing qualifier `/z`.
pub fn is_zeroing(predicate: &str) -> bool {
    predicate.to_uppercase().ends_with("/Z")
}

/// Parse a vector register `zN` with optional `.T` suffix and optional
/// `[index]` subscript. The index defaults to 0 when absent.
pub fn get_z(reg: &str) -> Option<(u32, Option<ElementType>, i64)> {
    let (name, suffix) = match reg.split_once('.') {
        Some((name, suffix)) => (name, Some(suffix)),
        None => (reg, None),
    };
    let rest = name.strip_prefix('z')?;
    let num: u32 = rest.parse().ok()?;
    if num >= 32 {
        return None;
    }
    let mut index = 0i64;
    let t = match suffix {
        None => None,
        Some(s) => {
            let s = match s.split_once('[') {
                Some((t, idx)) => {
                    index = idx.trim_end_matches(']').parse().ok()?;
                    t
                }
                None => s,
            };
            Some(ElementType::from_suffix(s)?)
        }
    };
    Some((num, t, index))
}

/// Parse an immediate: `#N` (decimal), `#-N`, `#0xH` (hex).
pub fn get_imm(imm: &str) -> Option<i64> {
    if let Some(hex) = imm.strip_prefix("#0x") {
        return u64::from_str_radix(hex, 16).ok().map(|n| n as i64);
    }
    if let Some(neg) = imm.strip_prefix("#-") {
        return neg.parse::<u64>().ok().map(|n| -(n as i64));
    }
    if let Some(dec) = imm.strip_prefix('#') {
        return dec.parse::<u64>().ok().map(|n| n as i64);
    }
    None
}

/// 4-bit condition code.
pub fn get_cond(cond: &str) -> Option<u32> {
    match cond.to_lowercase().as_str() {
        "eq" => Some(0),
        "ne" => Some(1),
        "cs" => Some(2),
        "cc" => Some(3),
        "mi" => Some(4),
        "pl" => Some(5),
        "vs" => Some(6),
        "vc" => Some(7),
        "hi" => Some(8),
        "ls" => Some(9),
        "ge" => Some(10),
        "lt" => Some(11),
        "gt" => Some(12),
        "le" => Some(13),
        "al" => Some(14),
        "nv" => Some(15),
        _ => None,
    }
}

/// Invert a condition code by flipping bit 0. AL and NV are their own
/// inverses in the alias rewrites that use this.
pub fn invert_cond(cond: u32) -> u32 {
    if cond < 14 {
        cond ^ 1
    } else {
        cond
    }
}

/// Shift specifier: LSL=0, LSR=1, ASR=2.
pub fn get_shift(s: &str) -> Option<u32> {
    match s.to_uppercase().as_str() {
        "LSL" => Some(0),
        "LSR" => Some(1),
        "ASR" => Some(2),
        _ => None,
    }
}

/// Extend specifier for the 3-bit `option` field. `LSL` in this
/// position is an alias for `UXTX`.
pub fn get_extend(s: &str) -> Option<u32> {
    match s.to_uppercase().as_str() {
        "UXTB" => Some(0b000),
        "UXTH" => Some(0b001),
        "UXTW" => Some(0b010),
        "LSL" | "UXTX" => Some(0b011),
        "SXTB" => Some(0b100),
        "SXTH" => Some(0b101),
        "SXTW" => Some(0b110),
        "SXTX" => Some(0b111),
        _ => None,
    }
}

// ── Memory-address helpers ───────────────────────────────────────────────
//
// The lexer leaves a bracketed address as several comma-less tokens:
// "[x1", "#1", "MUL", "VL]". These helpers re-join the sub-list with
// ", ", strip the brackets, and pick the pieces apart.

fn join_addr(args: &[String]) -> Vec<String> {
    let joined = args.join(", ");
    let joined = joined
        .replace('[', "")
        .replace("]!", "")
        .replace(']', "");
    let mut parts: Vec<String> = joined.split(", ").map(str::to_string).collect();
    // "#1, MUL, VL" lexed from "#1, MUL VL": glue the trailer back.
    if parts.len() >= 2
        && parts[parts.len() - 2].eq_ignore_ascii_case("mul")
        && parts[parts.len() - 1].eq_ignore_ascii_case("vl")
    {
        parts.truncate(parts.len() - 2);
        parts.push("MUL VL".to_string());
    }
    parts
}

fn is_bracketed(args: &[String]) -> bool {
    !args.is_empty()
        && args[0].starts_with('[')
        && (args[args.len() - 1].ends_with(']') || args[args.len() - 1].ends_with("]!"))
}

/// `[Xn]`, `[Xn, #imm]`, or `[Xn, #imm, MUL VL]` → (base, imm).
pub fn mem_addr_imm(args: &[String]) -> Option<(u32, i64)> {
    if !is_bracketed(args) {
        return None;
    }
    let mas = join_addr(args);
    let xn = get_r(mas.first()?)?;
    match mas.len() {
        1 => Some((xn, 0)),
        2 if mas[1].starts_with('#') => Some((xn, get_imm(&mas[1])?)),
        3 if mas[2] == "MUL VL" => Some((xn, get_imm(&mas[1])?)),
        _ => None,
    }
}

/// `[Xn]` or `[Xn, #imm, MUL VL]` → (base, imm). The vector/predicate
/// `LDR`/`STR` address form, which requires the `MUL VL` trailer for a
/// nonzero offset.
pub fn mem_addr_mul_vl(args: &[String]) -> Option<(u32, i64)> {
    if !is_bracketed(args) {
        return None;
    }
    let mas = join_addr(args);
    let xn = get_r(mas.first()?)?;
    match mas.len() {
        1 => Some((xn, 0)),
        3 if mas[2] == "MUL VL" => Some((xn, get_imm(&mas[1])?)),
        _ => None,
    }
}

/// `[Xn, Xm, LSL #amount]` → (base, index, option, amount).
/// The only extend spelled in this position is `LSL` (option 0b011).
pub fn mem_addr_register(args: &[String]) -> Option<(u32, u32, u32, i64)> {
    if !is_bracketed(args) {
        return None;
    }
    let mas = join_addr(args);
    if mas.len() != 4 {
        return None;
    }
    let rn = get_r(&mas[0])?;
    let rm = get_r(&mas[1])?;
    if !mas[2].eq_ignore_ascii_case("lsl") {
        return None;
    }
    let amount = get_imm(&mas[3])?;
    Some((rn, rm, 0b011, amount))
}

/// `[Xn, Zm.T{, SXTW|UXTW}]` → (base, index vector, xs, element type).
pub fn mem_addr_vectored(args: &[String]) -> Option<(u32, u32, u32, Option<ElementType>)> {
    if !is_bracketed(args) {
        return None;
    }
    let mas = join_addr(args);
    if mas.len() < 2 {
        return None;
    }
    let rn = get_r(&mas[0])?;
    let (zm, tm, _) = get_z(&mas[1])?;
    let xs = if mas.len() > 2 && mas[2].eq_ignore_ascii_case("sxtw") {
        1
    } else {
        0
    };
    Some((rn, zm, xs, tm))
}
