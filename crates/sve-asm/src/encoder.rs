//! Mnemonic dispatch and `MOVPRFX` prefix synthesis.
//!
//! [`assemble`] takes one textual instruction and produces either a single
//! 32-bit opcode or an atomic (prefix, base) pair. Dispatch is a single
//! match over the lowercased mnemonic; inside each arm, operand-shape
//! classifiers are tried in priority order — scalar forms before vector
//! forms, narrow immediates before wide ones, destructive-merging
//! predicated forms before the prefixed rewrites — and the first shape
//! whose numeric constraints hold selects the encoding template.
//!
//! Destructive SVE operations written with a distinct destination, or
//! with a zeroing predicate, cannot be encoded directly: they re-enter
//! the encoder through a patched instruction text with an implicit
//! `MOVPRFX` in front (see [`prefixed_predicated`]).

use crate::bitmask::{bitfield_const, logical_imm13};
use crate::classify as is;
use crate::error::AsmError;
use crate::operand::{invert_cond, is_zeroing, split_instruction, ElementType};
use crate::template::{bin, Template};

/// One assembled instruction: a single word, or a contiguous
/// (`MOVPRFX`, base) pair in memory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoded {
    /// A single 32-bit opcode.
    Word(u32),
    /// An atomic pair: `prefix` is emitted at the lower address.
    Pair {
        /// The `MOVPRFX` opcode.
        prefix: u32,
        /// The base opcode in canonical destructive, merging form.
        base: u32,
    },
}

impl Encoded {
    /// Pack a pair into the 64-bit `DWORD` literal: base opcode in the
    /// high 32 bits, prefix in the low 32 bits, so a little-endian store
    /// places the prefix first. `None` for a single word.
    pub fn dword(self) -> Option<u64> {
        match self {
            Encoded::Word(_) => None,
            Encoded::Pair { prefix, base } => Some(u64::from(base) << 32 | u64::from(prefix)),
        }
    }

    /// Whether this encoding carries a `MOVPRFX`.
    pub fn is_pair(self) -> bool {
        matches!(self, Encoded::Pair { .. })
    }
}

fn w(word: u32) -> Result<Encoded, AsmError> {
    Ok(Encoded::Word(word))
}

fn unhandled(ins: &str) -> AsmError {
    AsmError::Unhandled {
        ins: ins.to_string(),
    }
}

/// The 2-bit `size` field for a required element-type suffix. `None`
/// when the suffix is absent or names 128-bit lanes.
fn size2(t: Option<ElementType>) -> Option<&'static str> {
    match t {
        Some(ElementType::Q) | None => None,
        Some(t) => Some(t.size_bits()),
    }
}

/// Pack an SVE shift amount into `(imm3, tszh:tszl)` for element size
/// `t`. LSR/ASR amounts are bit-reversed (`esize - amount`) and span
/// `1..=esize`; LSL amounts span `0..esize`. Out-of-range amounts
/// reject the form.
fn shift_specifier(amount: i64, reverse: bool, t: Option<ElementType>) -> Option<(u32, String)> {
    let t = t?;
    let esize = i64::from(t.esize());
    let enc = if reverse {
        if amount < 1 || amount > esize {
            return None;
        }
        (esize - amount) as u32
    } else {
        if amount < 0 || amount >= esize {
            return None;
        }
        amount as u32
    };
    let tsz = match t {
        ElementType::B => "0001".to_string(),
        ElementType::H => format!("001{:01b}", enc >> 3),
        ElementType::S => format!("01{:02b}", enc >> 3),
        ElementType::D => format!("1{:03b}", enc >> 3),
        ElementType::Q => return None,
    };
    Some((enc & 7, tsz))
}

// ── MOVPRFX synthesis ────────────────────────────────────────────────────

const MOVPRFX_UNPRED: &str = "0 0 0 0 0 1 0 0 0 0 1 0 0 0 0 0 1 0 1 1 1 1 Zn Zd";
const MOVPRFX_PRED: &str = "0 0 0 0 0 1 0 0 size 0 1 0 0 0 M 0 0 1 Pg Zn Zd";

/// Build the predicated `MOVPRFX` opcode. The `M` bit comes from the
/// qualifier on the governing predicate operand: `/m` merges, `/z`
/// zeroes; anything else is unencodable.
fn movprfx_predicated(
    ins: &str,
    qualifier: &str,
    zd: u32,
    pg: u32,
    zn: u32,
    t: Option<ElementType>,
) -> Result<u32, AsmError> {
    let sz = size2(t).ok_or_else(|| AsmError::UnhandledPrefix {
        ins: ins.to_string(),
        predicated: true,
    })?;
    let upper = qualifier.to_uppercase();
    let m = if upper.contains("/M") {
        "1"
    } else if upper.contains("/Z") {
        "0"
    } else {
        return Err(AsmError::UnhandledPrefix {
            ins: ins.to_string(),
            predicated: true,
        });
    };
    Ok(Template::new(MOVPRFX_PRED)
        .bits("size", sz)
        .bits("M", m)
        .pred("Pg", pg)
        .reg("Zn", zn)
        .reg("Zd", zd)
        .encode())
}

/// Synthesize an unpredicated prefix and re-encode the instruction in
/// destructive form (`Zn` replaced by `Zd` in the source text).
fn prefixed_unpredicated(ins: &str, zd: u32, zn: u32) -> Result<Encoded, AsmError> {
    let prefix = Template::new(MOVPRFX_UNPRED)
        .reg("Zn", zn)
        .reg("Zd", zd)
        .encode();
    let patched = ins.replace(&format!("z{zn}."), &format!("z{zd}."));
    match assemble(&patched) {
        Ok(Encoded::Word(base)) => Ok(Encoded::Pair { prefix, base }),
        _ => Err(AsmError::UnhandledPrefix {
            ins: ins.to_string(),
            predicated: false,
        }),
    }
}

/// Synthesize a predicated prefix and re-encode the instruction in its
/// canonical destructive, merging form. Zeroing semantics are carried
/// by the prefix's `M=0`, so `/z` becomes `/m` in the patched text. A
/// patched instruction that still needs a prefix is unencodable.
fn prefixed_predicated(
    ins: &str,
    qualifier: &str,
    zd: u32,
    pg: u32,
    zn: u32,
    t: Option<ElementType>,
) -> Result<Encoded, AsmError> {
    let prefix = movprfx_predicated(ins, qualifier, zd, pg, zn, t)?;
    let patched = ins
        .replace(&format!("z{zn}."), &format!("z{zd}."))
        .replace("/Z", "/M")
        .replace("/z", "/m");
    match assemble(&patched) {
        Ok(Encoded::Word(base)) => Ok(Encoded::Pair { prefix, base }),
        _ => Err(AsmError::UnhandledPrefix {
            ins: ins.to_string(),
            predicated: true,
        }),
    }
}

/// The recurring predicated tail of a destructive SVE family: try the
/// destructive-merging form first, then hand anything else (distinct
/// destination or zeroing predicate) to the prefix rewrite. `None`
/// means neither shape matched and the caller keeps trying.
fn pred_destructive(
    ins: &str,
    args: &[String],
    spec: &str,
) -> Option<Result<Encoded, AsmError>> {
    if let Some((zdn, pg, zm, t)) = is::z_p_zz(args) {
        if !is_zeroing(&args[1]) {
            if let Some(sz) = size2(t) {
                let word = Template::new(spec)
                    .bits("size", sz)
                    .pred("Pg", pg)
                    .pred("Pv", pg)
                    .reg("Zm", zm)
                    .reg("Zdn", zdn)
                    .encode();
                return Some(Ok(Encoded::Word(word)));
            }
        }
    }
    if let Some((zd, pg, zn, _zm, t)) = is::prefixed_z_p_zz(args) {
        return Some(prefixed_predicated(ins, &args[1], zd, pg, zn, t));
    }
    None
}

// ── Dispatch ─────────────────────────────────────────────────────────────

/// Assemble one instruction into its opcode word(s).
///
/// # Errors
///
/// [`AsmError::Unhandled`] when no mnemonic/operand-shape combination
/// matches; [`AsmError::UnhandledPrefix`] when a required `MOVPRFX`
/// rewrite cannot be completed.
pub fn assemble(ins: &str) -> Result<Encoded, AsmError> {
    let (mnem_raw, args) = split_instruction(ins).ok_or_else(|| unhandled(ins))?;
    let mnem = mnem_raw.to_lowercase();
    let args = &args[..];

    match mnem.as_str() {
        // ── Scalar add/sub family ────────────────────────────────
        "add" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 0 0 0 1 0 1 1 shift 0 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, rm, option, amount)) = is::r_rr_ext(args) {
                if (0..=7).contains(&amount) {
                    let t = "sf 0 0 0 1 0 1 1 0 0 1 Rm option imm3 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .field("option", option, 3)
                        .field("imm3", amount as u32, 3)
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if (0..=4095).contains(&imm) {
                    let t = "sf 0 0 1 0 0 0 1 0 sh imm12 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bit("sh", sh)
                        .field("imm12", imm as u32, 12)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((zd, zn, zm, t)) = is::z_zz(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 0 size 1 Zm 0 0 0 0 0 0 Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
            if let Some((zd, zn, imm, sh, t)) = is::z_zi(args) {
                if (0..256).contains(&imm) && size2(t).is_some() {
                    if zd != zn {
                        return prefixed_unpredicated(ins, zd, zn);
                    }
                    let spec = "0 0 1 0 0 1 0 1 size 1 0 0 0 0 0 1 1 sh imm8 Zdn";
                    return w(Template::new(spec)
                        .bits("size", size2(t).unwrap())
                        .bit("sh", sh)
                        .field("imm8", imm as u32, 8)
                        .reg("Zdn", zd)
                        .encode());
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 0 0 0 0 0 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "adds" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 0 1 0 1 0 1 1 shift 0 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, rm, option, amount)) = is::r_rr_ext(args) {
                if (0..=7).contains(&amount) {
                    let t = "sf 0 1 0 1 0 1 1 0 0 1 Rm option imm3 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .field("option", option, 3)
                        .field("imm3", amount as u32, 3)
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if (0..=4095).contains(&imm) {
                    let t = "sf 0 1 1 0 0 0 1 0 sh imm12 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bit("sh", sh)
                        .field("imm12", imm as u32, 12)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "sub" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 1 0 0 1 0 1 1 shift 0 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, rm, option, amount)) = is::r_rr_ext(args) {
                if (0..=7).contains(&amount) {
                    let t = "sf 1 0 0 1 0 1 1 0 0 1 Rm option imm3 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .field("option", option, 3)
                        .field("imm3", amount as u32, 3)
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if (0..=4095).contains(&imm) {
                    let t = "sf 1 0 1 0 0 0 1 0 sh imm12 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bit("sh", sh)
                        .field("imm12", imm as u32, 12)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((zd, zn, zm, t)) = is::z_zz(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 0 size 1 Zm 0 0 0 0 0 1 Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
            if let Some((zd, zn, imm, sh, t)) = is::z_zi(args) {
                if (0..256).contains(&imm) && size2(t).is_some() {
                    if zd != zn {
                        return prefixed_unpredicated(ins, zd, zn);
                    }
                    let spec = "0 0 1 0 0 1 0 1 size 1 0 0 0 0 1 1 1 sh imm8 Zdn";
                    return w(Template::new(spec)
                        .bits("size", size2(t).unwrap())
                        .bit("sh", sh)
                        .field("imm8", imm as u32, 8)
                        .reg("Zdn", zd)
                        .encode());
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 0 0 0 0 1 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "subs" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 1 1 0 1 0 1 1 shift 0 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, rm, option, amount)) = is::r_rr_ext(args) {
                if (0..=7).contains(&amount) {
                    let t = "sf 1 1 0 1 0 1 1 0 0 1 Rm option imm3 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .field("option", option, 3)
                        .field("imm3", amount as u32, 3)
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if (0..=4095).contains(&imm) {
                    let t = "sf 1 1 1 0 0 0 1 0 sh imm12 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bit("sh", sh)
                        .field("imm12", imm as u32, 12)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "subr" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 0 0 0 1 1 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "adc" | "adcs" | "sbc" | "sbcs" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if args.len() == 3 && shift == 0 && imm == 0 {
                    let t = match mnem.as_str() {
                        "adcs" => "sf 0 1 1 1 0 1 0 0 0 0 Rm 0 0 0 0 0 0 Rn Rd",
                        "sbc" => "sf 1 0 1 1 0 1 0 0 0 0 Rm 0 0 0 0 0 0 Rn Rd",
                        "sbcs" => "sf 1 1 1 1 0 1 0 0 0 0 Rm 0 0 0 0 0 0 Rn Rd",
                        _ => "sf 0 0 1 1 0 1 0 0 0 0 Rm 0 0 0 0 0 0 Rn Rd",
                    };
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "addvl" => {
            if let Some((rd, rn, imm, _)) = is::r_ri(args) {
                if (-32..=31).contains(&imm) {
                    let imm = if imm < 0 { (1 << 6) + imm } else { imm };
                    let t = "0 0 0 0 0 1 0 0 0 0 1 Rn 0 1 0 1 0 imm6 Rd";
                    return w(Template::new(t)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "rdvl" => {
            if let Some((rd, imm, shift)) = is::r_i(args) {
                if shift == 0 && (-32..=31).contains(&imm) {
                    let imm = if imm < 0 { (1 << 6) + imm } else { imm };
                    let t = "0 0 0 0 0 1 0 0 1 0 1 1 1 1 1 1 0 1 0 1 0 imm6 Rd";
                    return w(Template::new(t)
                        .field("imm6", imm as u32, 6)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }

        // ── Multiply / divide ────────────────────────────────────
        "udiv" => {
            if let Some((rd, rn, rm, _, _)) = is::r_rr(args) {
                let t = "sf 0 0 1 1 0 1 0 1 1 0 Rm 0 0 0 0 1 0 Rn Rd";
                return w(Template::new(t)
                    .bits("sf", "1")
                    .reg("Rm", rm)
                    .reg("Rn", rn)
                    .reg("Rd", rd)
                    .encode());
            }
        }
        "sdiv" => {
            if let Some((zdn, pg, zm, t)) = is::z_p_zz(args) {
                if !is_zeroing(&args[1])
                    && matches!(t, Some(ElementType::S) | Some(ElementType::D))
                {
                    let spec = "0 0 0 0 0 1 0 0 size 0 1 0 1 0 0 0 0 0 Pg Zm Zdn";
                    return w(Template::new(spec)
                        .bits("size", size2(t).unwrap())
                        .pred("Pg", pg)
                        .reg("Zm", zm)
                        .reg("Zdn", zdn)
                        .encode());
                }
            }
            if let Some((zd, pg, zn, _, t)) = is::prefixed_z_p_zz(args) {
                if matches!(t, Some(ElementType::S) | Some(ElementType::D)) {
                    return prefixed_predicated(ins, &args[1], zd, pg, zn, t);
                }
            }
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if shift == 0 && imm == 0 {
                    let t = "sf 0 0 1 1 0 1 0 1 1 0 Rm 0 0 0 0 1 1 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "sdivr" => {
            if let Some((zdn, pg, zm, t)) = is::z_p_zz(args) {
                if !is_zeroing(&args[1])
                    && matches!(t, Some(ElementType::S) | Some(ElementType::D))
                {
                    let spec = "0 0 0 0 0 1 0 0 size 0 1 0 1 1 0 0 0 0 Pg Zm Zdn";
                    return w(Template::new(spec)
                        .bits("size", size2(t).unwrap())
                        .pred("Pg", pg)
                        .reg("Zm", zm)
                        .reg("Zdn", zdn)
                        .encode());
                }
            }
            if let Some((zd, pg, zn, _, t)) = is::prefixed_z_p_zz(args) {
                if matches!(t, Some(ElementType::S) | Some(ElementType::D)) {
                    return prefixed_predicated(ins, &args[1], zd, pg, zn, t);
                }
            }
        }
        "mul" => {
            if let Some((zd, zn, zm, t)) = is::z_zz(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 0 size 1 Zm 0 1 1 0 0 0 Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 0 0 0 0 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if shift == 0 && imm == 0 {
                    // MUL is MADD with Ra = XZR.
                    let t = "sf 0 0 1 1 0 1 1 0 0 0 Rm 0 Ra Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rm", rm)
                        .reg("Ra", 31)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "madd" | "msub" => {
            if let Some((rd, rn, rm, ra)) = is::r_rrr(args) {
                let t = if mnem == "msub" {
                    "sf 0 0 1 1 0 1 1 0 0 0 Rm 1 Ra Rn Rd"
                } else {
                    "sf 0 0 1 1 0 1 1 0 0 0 Rm 0 Ra Rn Rd"
                };
                return w(Template::new(t)
                    .bits("sf", "1")
                    .reg("Rm", rm)
                    .reg("Ra", ra)
                    .reg("Rn", rn)
                    .reg("Rd", rd)
                    .encode());
            }
        }
        "mneg" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if shift == 0 && imm == 0 {
                    // MNEG is MSUB with Ra = XZR.
                    let t = "sf 0 0 1 1 0 1 1 0 0 0 Rm 1 Ra Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rm", rm)
                        .reg("Ra", 31)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "smulh" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 0 0 1 0 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }

        // ── Logical ──────────────────────────────────────────────
        "tst" => {
            if let Some((rn, rm)) = is::rr(args) {
                // TST is ANDS with Rd = XZR.
                let t = "sf 1 1 0 1 0 1 0 shift 0 Rm imm6 Rn Rd";
                return w(Template::new(t)
                    .bits("sf", "1")
                    .bits("shift", "00")
                    .reg("Rm", rm)
                    .field("imm6", 0, 6)
                    .reg("Rn", rn)
                    .reg("Rd", 31)
                    .encode());
            }
            if let Some((rn, imm)) = is::ri(args) {
                if let Some((lsb, width)) = bitfield_const(imm as u64) {
                    let imm13 = logical_imm13(width, lsb, ElementType::D).unwrap();
                    let t = "sf 1 1 1 0 0 1 0 0 N immr imms Rn 1 1 1 1 1";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .fuse(&["N", "immr", "imms"], "imm13")
                        .field("imm13", imm13, 13)
                        .reg("Rn", rn)
                        .encode());
                }
            }
        }
        "and" => {
            if let Some((zd, zn, zm, _)) = is::z_zz(args) {
                let spec = "0 0 0 0 0 1 0 0 0 0 1 Zm 0 0 1 1 0 0 Zn Zd";
                return w(Template::new(spec)
                    .reg("Zm", zm)
                    .reg("Zn", zn)
                    .reg("Zd", zd)
                    .encode());
            }
            if let Some((zdn, zn, imm, t)) = is::z_zimm(args) {
                if zdn == zn {
                    if let Some((lsb, width)) = bitfield_const(imm as u64) {
                        if let Some(imm13) = t.and_then(|t| logical_imm13(width, lsb, t)) {
                            let spec = "0 0 0 0 0 1 0 1 1 0 0 0 0 0 imm13 Zdn";
                            return w(Template::new(spec)
                                .field("imm13", imm13, 13)
                                .reg("Zdn", zdn)
                                .encode());
                        }
                    }
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 1 0 1 0 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if sh == 0 {
                    if let Some((lsb, width)) = bitfield_const(imm as u64) {
                        let imm13 = logical_imm13(width, lsb, ElementType::D).unwrap();
                        let t = "sf 0 0 1 0 0 1 0 0 N immr imms Rn Rd";
                        return w(Template::new(t)
                            .bits("sf", "1")
                            .fuse(&["N", "immr", "imms"], "imm13")
                            .field("imm13", imm13, 13)
                            .reg("Rn", rn)
                            .reg("Rd", rd)
                            .encode());
                    }
                }
            }
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 0 0 0 1 0 1 0 shift 0 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "ands" => {
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if sh == 0 {
                    if let Some((lsb, width)) = bitfield_const(imm as u64) {
                        let imm13 = logical_imm13(width, lsb, ElementType::D).unwrap();
                        let t = "sf 1 1 1 0 0 1 0 0 N immr imms Rn Rd";
                        return w(Template::new(t)
                            .bits("sf", "1")
                            .fuse(&["N", "immr", "imms"], "imm13")
                            .field("imm13", imm13, 13)
                            .reg("Rn", rn)
                            .reg("Rd", rd)
                            .encode());
                    }
                }
            }
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 1 1 0 1 0 1 0 shift 0 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "eor" => {
            if let Some((zd, zn, zm, _)) = is::z_zz(args) {
                let spec = "0 0 0 0 0 1 0 0 1 0 1 Zm 0 0 1 1 0 0 Zn Zd";
                return w(Template::new(spec)
                    .reg("Zm", zm)
                    .reg("Zn", zn)
                    .reg("Zd", zd)
                    .encode());
            }
            if let Some((zdn, zn, imm, t)) = is::z_zimm(args) {
                if zdn == zn {
                    if let Some((lsb, width)) = bitfield_const(imm as u64) {
                        if let Some(imm13) = t.and_then(|t| logical_imm13(width, lsb, t)) {
                            let spec = "0 0 0 0 0 1 0 1 0 1 0 0 0 0 imm13 Zdn";
                            return w(Template::new(spec)
                                .field("imm13", imm13, 13)
                                .reg("Zdn", zdn)
                                .encode());
                        }
                    }
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 1 0 0 1 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 1 0 0 1 0 1 0 shift 0 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if sh == 0 {
                    if let Some((lsb, width)) = bitfield_const(imm as u64) {
                        let imm13 = logical_imm13(width, lsb, ElementType::D).unwrap();
                        let t = "sf 1 0 1 0 0 1 0 0 N immr imms Rn Rd";
                        return w(Template::new(t)
                            .bits("sf", "1")
                            .fuse(&["N", "immr", "imms"], "imm13")
                            .field("imm13", imm13, 13)
                            .reg("Rn", rn)
                            .reg("Rd", rd)
                            .encode());
                    }
                }
            }
        }
        "orr" => {
            if let Some((zd, zn, zm, _)) = is::z_zz(args) {
                let spec = "0 0 0 0 0 1 0 0 0 1 1 Zm 0 0 1 1 0 0 Zn Zd";
                return w(Template::new(spec)
                    .reg("Zm", zm)
                    .reg("Zn", zn)
                    .reg("Zd", zd)
                    .encode());
            }
            if let Some((zdn, zn, imm, t)) = is::z_zimm(args) {
                if zdn == zn {
                    if let Some((lsb, width)) = bitfield_const(imm as u64) {
                        if let Some(imm13) = t.and_then(|t| logical_imm13(width, lsb, t)) {
                            let spec = "0 0 0 0 0 1 0 1 0 0 0 0 0 0 imm13 Zdn";
                            return w(Template::new(spec)
                                .field("imm13", imm13, 13)
                                .reg("Zdn", zdn)
                                .encode());
                        }
                    }
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 1 0 0 0 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 0 1 0 1 0 1 0 shift 0 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if sh == 0 {
                    if let Some((lsb, width)) = bitfield_const(imm as u64) {
                        let imm13 = logical_imm13(width, lsb, ElementType::D).unwrap();
                        let t = "sf 0 1 1 0 0 1 0 0 N immr imms Rn Rd";
                        return w(Template::new(t)
                            .bits("sf", "1")
                            .fuse(&["N", "immr", "imms"], "imm13")
                            .field("imm13", imm13, 13)
                            .reg("Rn", rn)
                            .reg("Rd", rd)
                            .encode());
                    }
                }
            }
        }
        "eon" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 1 0 0 1 0 1 0 shift 1 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "orn" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 0 1 0 1 0 1 0 shift 1 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "bic" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 0 0 0 1 0 1 0 shift 1 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 1 0 1 1 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "bics" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 1 1 0 1 0 1 0 shift 1 Rm imm6 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "mvn" => {
            if let Some((rd, rm, shift, imm)) = is::r_r(args) {
                if (0..=63).contains(&imm) {
                    // MVN is ORN with Rn = XZR.
                    let t = "sf 0 1 0 1 0 1 0 shift 1 Rm imm6 1 1 1 1 1 Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rm)
                        .field("imm6", imm as u32, 6)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "eor3" => {
            if let Some((zd, zn, zm, za, _)) = is::z_zzz(args) {
                if zd == zn {
                    let spec = "0 0 0 0 0 1 0 0 0 0 1 Zm 0 0 1 1 1 0 Zk Zdn";
                    return w(Template::new(spec)
                        .reg("Zm", zm)
                        .reg("Zk", za)
                        .reg("Zdn", zd)
                        .encode());
                }
            }
        }
        "dupm" => {
            if let Some((zd, imm, t)) = is::z_i(args) {
                if let Some((lsb, width)) = bitfield_const(imm as u64) {
                    if let Some(imm13) = t.and_then(|t| logical_imm13(width, lsb, t)) {
                        let spec = "0 0 0 0 0 1 0 1 1 1 0 0 0 0 imm13 Zd";
                        return w(Template::new(spec)
                            .field("imm13", imm13, 13)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
            }
        }

        // ── Table lookup / permute ───────────────────────────────
        "tbl" => {
            if let Some((zd, zn1, zn2, zm, t)) = is::z_zz_z(args) {
                if zn2 == zn1 + 1 {
                    if let Some(sz) = size2(t) {
                        let spec = "0 0 0 0 0 1 0 1 size 1 Zm 0 0 1 0 1 0 Zn Zd";
                        return w(Template::new(spec)
                            .bits("size", sz)
                            .reg("Zm", zm)
                            .reg("Zn", zn1)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
            }
            if let Some((zd, zn, zm, t)) = is::z_zz(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 1 size 1 Zm 0 0 1 1 0 0 Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "zip1" | "zip2" | "uzp1" | "uzp2" | "trn1" | "trn2" => {
            if let Some((zd, zn, zm, t)) = is::z_zz(args) {
                if let Some(sz) = size2(t) {
                    let opc = match mnem.as_str() {
                        "zip1" => "0 0 0",
                        "zip2" => "0 0 1",
                        "uzp1" => "0 1 0",
                        "uzp2" => "0 1 1",
                        "trn1" => "1 0 0",
                        _ => "1 0 1",
                    };
                    let spec =
                        format!("0 0 0 0 0 1 0 1 size 1 Zm 0 1 1 {opc} Zn Zd");
                    return w(Template::new(&spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "compact" => {
            if let Some((zd, pg, zn, t)) = is::z_p_z(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 1 size 1 0 0 0 0 1 1 0 0 Pg Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "splice" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 1 size 1 0 1 1 0 0 1 0 0 Pv Zm Zdn",
            ) {
                return r;
            }
        }
        "sel" => {
            if let Some((zd, pv, zn, zm, t)) = is::z_p_zz_4(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 1 size 1 Zm 1 1 Pv Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .pred4("Pv", pv)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "clasta" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 1 size 1 0 1 0 0 0 1 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "clastb" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 1 size 1 0 1 0 0 1 1 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }

        // ── Reversals / bit ops ──────────────────────────────────
        "rev" => {
            if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                if args.len() == 2 && shift == 0 && imm == 0 {
                    let t = "sf 1 0 1 1 0 1 0 1 1 0 0 0 0 0 0 0 0 0 0 1 x Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("x", "1")
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((zd, zn, t)) = is::z_z(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 1 size 1 1 1 0 0 0 0 0 1 1 1 0 Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
            if let Some((pd, pn, t)) = is::p_p(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 1 size 1 1 0 1 0 0 0 1 0 0 0 0 0 Pn 0 Pd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .pred4("Pn", pn)
                        .pred4("Pd", pd)
                        .encode());
                }
            }
        }
        "revb" | "revh" | "revw" => {
            if let Some((zd, pg, zn, t)) = is::z_p_z(args) {
                if let Some(sz) = size2(t) {
                    let opc = match mnem.as_str() {
                        "revb" => "0 0 1 0 0",
                        "revh" => "0 0 1 0 1",
                        _ => "0 0 1 1 0",
                    };
                    let spec = format!("0 0 0 0 0 1 0 1 size 1 {opc} 1 0 0 Pg Zn Zd");
                    return w(Template::new(&spec)
                        .bits("size", sz)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "rbit" | "rev16" | "cls" | "cnt" | "ctz" => {
            if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                if args.len() == 2 && shift == 0 && imm == 0 {
                    let opc = match mnem.as_str() {
                        "rbit" => "0 0 0 0 0",
                        "rev16" => "0 0 0 0 1",
                        "cls" => "0 0 1 0 1",
                        "ctz" => "0 0 1 1 0",
                        _ => "0 0 1 1 1", // cnt
                    };
                    let spec =
                        format!("sf 1 0 1 1 0 1 0 1 1 0 0 0 0 0 0 0 {opc} Rn Rd");
                    return w(Template::new(&spec)
                        .bits("sf", "1")
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "rev32" | "rev64" => {
            if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                if args.len() == 2 && shift == 0 && imm == 0 {
                    let t = if mnem == "rev32" {
                        "1 1 0 1 1 0 1 0 1 1 0 0 0 0 0 0 0 0 0 0 1 0 Rn Rd"
                    } else {
                        // REV64 is REV.
                        "1 1 0 1 1 0 1 0 1 1 0 0 0 0 0 0 0 0 0 0 1 1 Rn Rd"
                    };
                    return w(Template::new(t).reg("Rn", rn).reg("Rd", rd).encode());
                }
            }
        }
        "clz" => {
            if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                if args.len() == 2 && shift == 0 && imm == 0 {
                    let t = "sf 1 0 1 1 0 1 0 1 1 0 0 0 0 0 0 0 0 0 1 0 0 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((zd, pg, zn, t)) = is::z_p_z(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 0 size 0 1 1 0 0 1 1 0 1 Pg Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "abs" => {
            if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                if args.len() == 2 && shift == 0 && imm == 0 {
                    let t = "sf 1 0 1 1 0 1 0 1 1 0 0 0 0 0 0 0 0 1 0 0 0 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "neg" | "negs" => {
            if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                if (0..=63).contains(&imm) {
                    // NEG/NEGS is SUB/SUBS with Rn = XZR.
                    let t = if mnem == "negs" {
                        "sf 1 1 0 1 0 1 1 shift 0 Rm imm6 1 1 1 1 1 Rd"
                    } else {
                        "sf 1 0 0 1 0 1 1 shift 0 Rm imm6 1 1 1 1 1 Rd"
                    };
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("shift", &bin(shift, 2))
                        .reg("Rm", rn)
                        .field("imm6", imm as u32, 6)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "ngc" | "ngcs" => {
            if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                if args.len() == 2 && shift == 0 && imm == 0 {
                    // NGC/NGCS is SBC/SBCS with Rn = XZR.
                    let t = if mnem == "ngcs" {
                        "sf 1 1 1 1 0 1 0 0 0 0 Rm 0 0 0 0 0 0 1 1 1 1 1 Rd"
                    } else {
                        "sf 1 0 1 1 0 1 0 0 0 0 Rm 0 0 0 0 0 0 1 1 1 1 1 Rd"
                    };
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rm", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }

        // ── Compare ──────────────────────────────────────────────
        "cmp" | "cmn" => {
            if let Some((rd, imm, shift)) = is::r_i(args) {
                if (0..4096).contains(&imm) && (shift == 0 || shift == 12) {
                    // CMP/CMN is SUBS/ADDS with Rd = XZR.
                    let t = if mnem == "cmn" {
                        "sf 0 1 1 0 0 0 1 0 sh imm12 Rn 1 1 1 1 1"
                    } else {
                        "sf 1 1 1 0 0 0 1 0 sh imm12 Rn 1 1 1 1 1"
                    };
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bit("sh", if shift == 12 { 1 } else { 0 })
                        .field("imm12", imm as u32, 12)
                        .reg("Rn", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                if !(0..=63).contains(&imm) {
                    return Err(unhandled(ins));
                }
                let t = if mnem == "cmn" {
                    "sf 0 1 0 1 0 1 1 shift 0 Rm imm6 Rn 1 1 1 1 1"
                } else {
                    "sf 1 1 0 1 0 1 1 shift 0 Rm imm6 Rn 1 1 1 1 1"
                };
                return w(Template::new(t)
                    .bits("sf", "1")
                    .bits("shift", &bin(shift, 2))
                    .reg("Rm", rn)
                    .field("imm6", imm as u32, 6)
                    .reg("Rn", rd)
                    .encode());
            }
        }
        "cmpeq" | "cmpne" => {
            if let Some((pd, pg, zn, zm, t)) = is::p_p_zz(args) {
                if let Some(sz) = size2(t) {
                    let last = if mnem == "cmpne" { "1" } else { "0" };
                    let spec = format!("0 0 1 0 0 1 0 0 size 0 Zm 1 0 1 Pg Zn {last} Pd");
                    return w(Template::new(&spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .pred4("Pd", pd)
                        .encode());
                }
            }
            if mnem == "cmpeq" {
                if let Some((pd, pg, zn, imm, t)) = is::p_p_zi(args) {
                    if (-16..=15).contains(&imm) {
                        if let Some(sz) = size2(t) {
                            let imm = if imm < 0 { (1 << 5) + imm } else { imm };
                            let spec = "0 0 1 0 0 1 0 1 size 0 imm5 1 0 0 Pg Zn 0 Pd";
                            return w(Template::new(spec)
                                .bits("size", sz)
                                .field("imm5", imm as u32, 5)
                                .pred("Pg", pg)
                                .reg("Zn", zn)
                                .pred4("Pd", pd)
                                .encode());
                        }
                    }
                }
            }
        }
        "cmphs" | "cmpls" | "cmphi" | "cmplo" | "cmpge" | "cmple" | "cmpgt" | "cmplt" => {
            if let Some((pd, pg, mut zn, mut zm, t)) = is::p_p_zz(args) {
                if let Some(sz) = size2(t) {
                    // The "reversed" spellings swap their vector operands
                    // and encode as the canonical comparison.
                    if matches!(mnem.as_str(), "cmpls" | "cmplo" | "cmple" | "cmplt") {
                        std::mem::swap(&mut zn, &mut zm);
                    }
                    let tail = match mnem.as_str() {
                        "cmphs" | "cmpls" => "0 0 0 Pg Zn 0 Pd",
                        "cmphi" | "cmplo" => "0 0 0 Pg Zn 1 Pd",
                        "cmpge" | "cmple" => "1 0 0 Pg Zn 0 Pd",
                        _ => "1 0 0 Pg Zn 1 Pd", // cmpgt / cmplt
                    };
                    let spec = format!("0 0 1 0 0 1 0 0 size 0 Zm {tail}");
                    return w(Template::new(&spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .pred4("Pd", pd)
                        .encode());
                }
            }
            if matches!(mnem.as_str(), "cmpgt" | "cmplt") {
                if let Some((pd, pg, zn, imm, t)) = is::p_p_zi(args) {
                    if (-16..=15).contains(&imm) {
                        if let Some(sz) = size2(t) {
                            let spec = if mnem == "cmplt" {
                                "0 0 1 0 0 1 0 1 size 0 imm5 0 0 1 Pg Zn 0 Pd"
                            } else {
                                "0 0 1 0 0 1 0 1 size 0 imm5 0 0 0 Pg Zn 1 Pd"
                            };
                            let imm = if imm < 0 { (1 << 5) + imm } else { imm };
                            return w(Template::new(spec)
                                .bits("size", sz)
                                .field("imm5", imm as u32, 5)
                                .pred("Pg", pg)
                                .reg("Zn", zn)
                                .pred4("Pd", pd)
                                .encode());
                        }
                    }
                }
            }
        }
        "match" | "nmatch" => {
            if let Some((pd, pg, zn, zm, t)) = is::p_p_zz(args) {
                if let Some(sz) = size2(t) {
                    let neg = if mnem == "nmatch" { "1" } else { "0" };
                    let spec = format!("0 1 0 0 0 1 0 1 size 1 Zm 1 0 0 Pg Zn {neg} Pd");
                    return w(Template::new(&spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .pred4("Pd", pd)
                        .encode());
                }
            }
        }
        "histseg" => {
            if let Some((zd, zn, zm, t)) = is::z_zz(args) {
                if t == Some(ElementType::B) {
                    let spec = "0 1 0 0 0 1 0 1 size 1 Zm 1 0 1 0 0 0 Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", t.unwrap().size_bits())
                        .reg("Zm", zm)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "histcnt" => {
            if let Some((zd, pg, zn, zm, t)) = is::z_p_zz_4(args) {
                if pg < 8 && matches!(t, Some(ElementType::S) | Some(ElementType::D)) {
                    let spec = "0 1 0 0 0 1 0 1 size 1 Zm 1 1 0 Pg Zn Zd";
                    return w(Template::new(spec)
                        .bits("size", size2(t).unwrap())
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "ptest" => {
            if let Some((pg, pn, _)) = is::p_p(args) {
                let t = "0 0 1 0 0 1 0 1 op S 0 1 0 0 0 0 1 1 Pg 0 Pn 0 opc2";
                return w(Template::new(t)
                    .bits("op", "0")
                    .bits("S", "1")
                    .bits("opc2", "0000")
                    .pred4("Pg", pg)
                    .pred4("Pn", pn)
                    .encode());
            }
        }
        "ptrue" => {
            if args.len() <= 2 {
                if let Some((pd, t)) = is::p(args) {
                    let pattern = if args.len() == 2 {
                        args[1].to_uppercase()
                    } else {
                        "ALL".to_string()
                    };
                    let bits = match pattern.as_str() {
                        "POW2" => Some("00000"),
                        "VL1" => Some("00001"),
                        "VL2" => Some("00010"),
                        "VL3" => Some("00011"),
                        "VL4" => Some("00100"),
                        "VL5" => Some("00101"),
                        "VL6" => Some("00110"),
                        "VL7" => Some("00111"),
                        "VL8" => Some("01000"),
                        "VL16" => Some("01001"),
                        "VL32" => Some("01010"),
                        "VL64" => Some("01011"),
                        "VL128" => Some("01100"),
                        "VL256" => Some("01101"),
                        "MUL4" => Some("11101"),
                        "MUL3" => Some("11110"),
                        "ALL" => Some("11111"),
                        _ => None,
                    };
                    if let (Some(bits), ElementType::B | ElementType::H | ElementType::S
                        | ElementType::D) = (bits, t)
                    {
                        let spec = "0 0 1 0 0 1 0 1 size 0 1 1 0 0 0 1 1 1 0 0 0 pattern 0 Pd";
                        return w(Template::new(spec)
                            .bits("size", t.size_bits())
                            .bits("pattern", bits)
                            .pred4("Pd", pd)
                            .encode());
                    }
                }
            }
        }

        // ── Moves ────────────────────────────────────────────────
        "mov" | "movz" | "movk" | "movn" => {
            // MOV Xd, #imm selects MOVZ/MOVN by inspecting which 16-bit
            // lane of imm (or !imm) is nonzero; hw encodes shift/16.
            if let Some((rd, imm0, shift0)) = is::r_i(args) {
                let mut imm = imm0 as u64;
                let mut shift = shift0 as u64;
                let mut chosen = mnem.as_str();
                if shift == 0 && imm >= 0x10000 {
                    if imm & !0xffff_0000u64 == 0 {
                        shift = 16;
                    } else if imm & !0xffff_0000_0000u64 == 0 {
                        shift = 32;
                    } else if imm & !0xffff_0000_0000_0000u64 == 0 {
                        shift = 48;
                    } else if chosen == "mov" {
                        if !imm & !0xffffu64 == 0 {
                            chosen = "movn";
                            imm = !imm;
                        } else if !imm & !0xffff_0000u64 == 0 {
                            chosen = "movn";
                            shift = 16;
                            imm = !imm;
                        } else if !imm & !0xffff_0000_0000u64 == 0 {
                            chosen = "movn";
                            shift = 32;
                            imm = !imm;
                        } else if !imm & !0xffff_0000_0000_0000u64 == 0 {
                            chosen = "movn";
                            shift = 48;
                            imm = !imm;
                        }
                    }
                    imm >>= shift;
                }
                let hw = ((shift >> 4) & 3) as u32;
                if u64::from(hw) << 4 == shift && imm < 0x10000 {
                    let t = match chosen {
                        "movk" => "sf 1 1 1 0 0 1 0 1 hw imm16 Rd",
                        "movn" => "sf 0 0 1 0 0 1 0 1 hw imm16 Rd",
                        _ => "sf 1 0 1 0 0 1 0 1 hw imm16 Rd",
                    };
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .field("hw", hw, 2)
                        .field("imm16", imm as u32, 16)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if mnem == "mov" {
                if let Some((pd, pn, t)) = is::p_p(args) {
                    if t == Some(ElementType::B) {
                        // MOV Pd.B, Pn.B is ORR Pd.B, Pn/Z, Pn.B, Pn.B.
                        let spec = "0 0 1 0 0 1 0 1 1 0 0 0 Pm 0 1 Pg 0 Pn 0 Pd";
                        return w(Template::new(spec)
                            .pred4("Pm", pn)
                            .pred4("Pg", pn)
                            .pred4("Pn", pn)
                            .pred4("Pd", pd)
                            .encode());
                    }
                }
                if let Some((zd, rn, t)) = is::z_r(args) {
                    if let Some(sz) = size2(t) {
                        let spec =
                            "0 0 0 0 0 1 0 1 size 1 0 0 0 0 0 0 0 1 1 1 0 Rn Zd";
                        return w(Template::new(spec)
                            .bits("size", sz)
                            .reg("Rn", rn)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
                if let Some((zd, pv, zn, t)) = is::z_p_z(args) {
                    if let Some(sz) = size2(t) {
                        // MOV Zd.T, Pv/M, Zn.T is SEL Zd.T, Pv, Zn.T, Zd.T.
                        let spec = "0 0 0 0 0 1 0 1 size 1 Zm 1 1 Pv Zn Zd";
                        return w(Template::new(spec)
                            .bits("size", sz)
                            .reg("Zm", zd)
                            .pred4("Pv", pv)
                            .reg("Zn", zn)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
                if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                    if args.len() == 2 && shift == 0 && imm == 0 {
                        // MOV Xd, Xm is ORR Xd, XZR, Xm.
                        let t =
                            "sf 0 1 0 1 0 1 0 0 0 0 Rn 0 0 0 0 0 0 1 1 1 1 1 Rd";
                        return w(Template::new(t)
                            .bits("sf", "1")
                            .reg("Rn", rn)
                            .reg("Rd", rd)
                            .encode());
                    }
                }
                if let Some((zd, imm, t)) = is::z_i(args) {
                    if size2(t).is_some() {
                        // MOV Zd.T, #imm is DUP Zd.T, #imm.
                        if let Some(word) = dup_imm(zd, imm, t) {
                            return w(word);
                        }
                    }
                }
            }
        }
        "movprfx" => {
            if let Some((zd, zn, t)) = is::z_z(args) {
                if t.is_none() {
                    return w(Template::new(MOVPRFX_UNPRED)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
            if let Some((zd, pg, zn, t)) = is::z_p_z(args) {
                return w(movprfx_predicated(ins, &args[1], zd, pg, zn, t)?);
            }
        }
        "dup" => {
            if let Some((zd, zn, index, t)) = is::z_zindexed(args) {
                if let Some(t) = t {
                    if (0..4).contains(&index) {
                        let spec = "0 0 0 0 0 1 0 1 imm2 1 tsz 0 0 1 0 0 0 Zn Zd";
                        return w(Template::new(spec)
                            .field("imm2", index as u32, 2)
                            .bits("tsz", t.type_specifier())
                            .reg("Zn", zn)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
            }
            if let Some((zd, imm, t)) = is::z_i(args) {
                if size2(t).is_some() {
                    if let Some(word) = dup_imm(zd, imm, t) {
                        return w(word);
                    }
                }
            }
            if let Some((zd, rn, t)) = is::z_r(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 1 size 1 0 0 0 0 0 0 0 1 1 1 0 Rn Zd";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Rn", rn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "insr" => {
            if let Some((zdn, rm, t)) = is::z_r(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 1 size 1 0 0 1 0 0 0 0 1 1 1 0 Rm Zdn";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Rm", rm)
                        .reg("Zdn", zdn)
                        .encode());
                }
            }
        }
        "index" => {
            if let Some((zd, imm1, imm2, t)) = is::z_ii(args) {
                if (-16..16).contains(&imm1) && (-16..16).contains(&imm2) {
                    if let Some(sz) = size2(t) {
                        let a = if imm1 < 0 { (1 << 5) + imm1 } else { imm1 };
                        let b = if imm2 < 0 { (1 << 5) + imm2 } else { imm2 };
                        let spec = "0 0 0 0 0 1 0 0 size 1 imm5b 0 1 0 0 0 0 imm5 Zd";
                        return w(Template::new(spec)
                            .bits("size", sz)
                            .field("imm5b", b as u32, 5)
                            .field("imm5", a as u32, 5)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
            }
            if let Some((zd, imm, rm, t)) = is::z_ir(args) {
                if (-16..16).contains(&imm) {
                    if let Some(sz) = size2(t) {
                        let imm = if imm < 0 { (1 << 5) + imm } else { imm };
                        let spec = "0 0 0 0 0 1 0 0 size 1 Rm 0 1 0 0 1 0 imm5 Zd";
                        return w(Template::new(spec)
                            .bits("size", sz)
                            .reg("Rm", rm)
                            .field("imm5", imm as u32, 5)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
            }
            if let Some((zd, rn, imm, t)) = is::z_ri(args) {
                if (-16..16).contains(&imm) {
                    if let Some(sz) = size2(t) {
                        let imm = if imm < 0 { (1 << 5) + imm } else { imm };
                        let spec = "0 0 0 0 0 1 0 0 size 1 imm5 0 1 0 0 0 1 Rn Zd";
                        return w(Template::new(spec)
                            .bits("size", sz)
                            .field("imm5", imm as u32, 5)
                            .reg("Rn", rn)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
            }
        }

        // ── Shifts ───────────────────────────────────────────────
        "lsr" => {
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if sh == 0 && (0..=63).contains(&imm) {
                    // LSR Xd, Xn, #shift is UBFM Xd, Xn, #shift, #63.
                    let t = "sf 1 0 1 0 0 1 1 0 N immr x 1 1 1 1 1 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("N", "1")
                        .bits("x", "1")
                        .field("immr", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if shift == 0 && imm == 0 {
                    // Register form is LSRV.
                    let t = "sf 0 0 1 1 0 1 0 1 1 0 Rm 0 0 1 0 0 1 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 0 0 0 1 1 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
            if let Some((zd, pg, zn, imm, t)) = is::z_p_zimm(args) {
                if imm > 0 {
                    if let Some((imm3, tsz)) = shift_specifier(imm, true, t) {
                        if zd == zn {
                            let spec =
                                "0 0 0 0 0 1 0 0 tszh 0 0 0 0 0 1 1 0 0 Pg tszl imm3 Zdn";
                            return w(Template::new(spec)
                                .bits("tszh", &tsz[..2])
                                .bits("tszl", &tsz[2..])
                                .pred("Pg", pg)
                                .field("imm3", imm3, 3)
                                .reg("Zdn", zd)
                                .encode());
                        }
                        return prefixed_predicated(ins, &args[1], zd, pg, zn, t);
                    }
                }
            }
            if let Some((zd, zn, imm, t)) = is::z_zimm(args) {
                if imm > 0 {
                    if let Some((imm3, tsz)) = shift_specifier(imm, true, t) {
                        let spec = "0 0 0 0 0 1 0 0 tszh 1 tszl imm3 1 0 0 1 0 1 Zn Zd";
                        return w(Template::new(spec)
                            .bits("tszh", &tsz[..2])
                            .bits("tszl", &tsz[2..])
                            .field("imm3", imm3, 3)
                            .reg("Zn", zn)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
            }
        }
        "lsrv" | "lslv" | "rorv" => {
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if shift == 0 && imm == 0 {
                    let opc = match mnem.as_str() {
                        "lsrv" => "0 0 1 0 0 1",
                        "lslv" => "0 0 1 0 0 0",
                        _ => "0 0 1 0 1 1",
                    };
                    let spec = format!("sf 0 0 1 1 0 1 0 1 1 0 Rm {opc} Rn Rd");
                    return w(Template::new(&spec)
                        .bits("sf", "1")
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "lsl" => {
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if sh == 0 && (0..=63).contains(&imm) {
                    // LSL Xd, Xn, #shift is
                    // UBFM Xd, Xn, #(-shift MOD 64), #(63-shift).
                    let immr = (-imm).rem_euclid(64) as u32;
                    let imms = (63 - imm) as u32;
                    let t = "sf 1 0 1 0 0 1 1 0 N immr imms Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("N", "1")
                        .field("imms", imms, 6)
                        .field("immr", immr, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if shift == 0 && imm == 0 {
                    // Register form is LSLV.
                    let t = "sf 0 0 1 1 0 1 0 1 1 0 Rm 0 0 1 0 0 0 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 0 0 1 1 1 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
            if let Some((zd, zn, imm, t)) = is::z_zimm(args) {
                if let Some((imm3, tsz)) = shift_specifier(imm, false, t) {
                    let spec = "0 0 0 0 0 1 0 0 tszh 1 tszl imm3 1 0 0 1 1 1 Zn Zd";
                    return w(Template::new(spec)
                        .bits("tszh", &tsz[..2])
                        .bits("tszl", &tsz[2..])
                        .field("imm3", imm3, 3)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "asr" => {
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if sh == 0 && (0..=63).contains(&imm) {
                    // ASR Xd, Xn, #shift is SBFM Xd, Xn, #shift, #63.
                    let t = "sf 0 0 1 0 0 1 1 0 N immr x 1 1 1 1 1 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("N", "1")
                        .bits("x", "1")
                        .field("immr", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((zd, zn, imm, t)) = is::z_zimm(args) {
                if let Some((imm3, tsz)) = shift_specifier(imm, true, t) {
                    let spec = "0 0 0 0 0 1 0 0 tszh 1 tszl imm3 1 0 0 1 0 0 Zn Zd";
                    return w(Template::new(spec)
                        .bits("tszh", &tsz[..2])
                        .bits("tszl", &tsz[2..])
                        .field("imm3", imm3, 3)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 0 0 0 0 1 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "asrr" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 0 1 0 0 1 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "lslr" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 0 1 1 1 1 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "lsrr" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 1 0 1 0 1 1 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "extr" => {
            if let Some((rd, rn, rm, imm)) = is::r_rri(args) {
                if (0..=63).contains(&imm) {
                    let t = "sf 0 0 1 0 0 1 1 1 N 0 Rm imms Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("N", "1")
                        .reg("Rm", rm)
                        .field("imms", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "ror" => {
            if let Some((rd, rn, imm, sh)) = is::r_ri(args) {
                if sh == 0 && (0..=63).contains(&imm) {
                    // ROR Xd, Xs, #shift is EXTR Xd, Xs, Xs, #shift.
                    let t = "sf 0 0 1 0 0 1 1 1 N 0 Rm imms Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("N", "1")
                        .reg("Rm", rn)
                        .field("imms", imm as u32, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
            if let Some((rd, rn, rm, shift, imm)) = is::r_rr(args) {
                if shift == 0 && imm == 0 {
                    // Register form is RORV.
                    let t = "sf 0 0 1 1 0 1 0 1 1 0 Rm 0 0 1 0 1 1 Rn Rd";
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .reg("Rm", rm)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }

        // ── Bitfield moves ───────────────────────────────────────
        // SBFM/UBFM/BFM have no direct spelling here; their preferred
        // aliases below cover the forms the inputs use.
        "sbfm" | "ubfm" | "bfm" => {}
        "sbfiz" | "ubfiz" => {
            if let Some((rd, rn, lsb, width)) = is::r_rii(args) {
                if (0..=63).contains(&lsb) && width >= 1 && width <= 64 - lsb {
                    let immr = (-lsb).rem_euclid(64) as u32;
                    let imms = (width - 1) as u32;
                    if imms < immr {
                        let t = if mnem == "ubfiz" {
                            "sf 1 0 1 0 0 1 1 0 N immr imms Rn Rd"
                        } else {
                            "sf 0 0 1 0 0 1 1 0 N immr imms Rn Rd"
                        };
                        return w(Template::new(t)
                            .bits("sf", "1")
                            .bits("N", "1")
                            .field("imms", imms, 6)
                            .field("immr", immr, 6)
                            .reg("Rn", rn)
                            .reg("Rd", rd)
                            .encode());
                    }
                }
            }
        }
        "sbfx" | "ubfx" => {
            if let Some((rd, rn, lsb, width)) = is::r_rii(args) {
                if (0..=63).contains(&lsb) && width >= 1 && width <= 64 - lsb {
                    let immr = lsb as u32;
                    let imms = (lsb + width - 1) as u32;
                    let t = if mnem == "ubfx" {
                        "sf 1 0 1 0 0 1 1 0 N immr imms Rn Rd"
                    } else {
                        "sf 0 0 1 0 0 1 1 0 N immr imms Rn Rd"
                    };
                    return w(Template::new(t)
                        .bits("sf", "1")
                        .bits("N", "1")
                        .field("imms", imms, 6)
                        .field("immr", immr, 6)
                        .reg("Rn", rn)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "sxtb" | "sxth" | "sxtw" | "uxtb" | "uxth" => {
            if let Some((rd, rn, shift, imm)) = is::r_r(args) {
                if shift == 0 && imm == 0 {
                    match mnem.as_str() {
                        "uxtb" => {
                            let t = "0 1 0 1 0 0 1 1 0 0 0 0 0 0 0 0 0 0 0 1 1 1 Rn Rd";
                            return w(Template::new(t).reg("Rn", rn).reg("Rd", rd).encode());
                        }
                        "uxth" => {
                            let t = "0 1 0 1 0 0 1 1 0 0 0 0 0 0 0 0 0 0 1 1 1 1 Rn Rd";
                            return w(Template::new(t).reg("Rn", rn).reg("Rd", rd).encode());
                        }
                        _ => {
                            // SXTB/SXTH/SXTW are SBFM Xd, Xn, #0, #7/#15/#31.
                            let imms = match mnem.as_str() {
                                "sxth" => 15,
                                "sxtw" => 31,
                                _ => 7,
                            };
                            let t = "sf 0 0 1 0 0 1 1 0 N immr imms Rn Rd";
                            return w(Template::new(t)
                                .bits("sf", "1")
                                .bits("N", "1")
                                .field("imms", imms, 6)
                                .field("immr", 0, 6)
                                .reg("Rn", rn)
                                .reg("Rd", rd)
                                .encode());
                        }
                    }
                }
            }
        }
        "bfxil" => {
            if let Some((rd, rn, lsb, width)) = is::r_rii(args) {
                if (0..=63).contains(&lsb) && width >= 1 && width <= 64 - lsb {
                    let immr = lsb as u32;
                    let imms = (lsb + width - 1) as u32;
                    if imms >= immr {
                        let t = "sf 0 1 1 0 0 1 1 0 N immr imms Rn Rd";
                        return w(Template::new(t)
                            .bits("sf", "1")
                            .bits("N", "1")
                            .field("imms", imms, 6)
                            .field("immr", immr, 6)
                            .reg("Rn", rn)
                            .reg("Rd", rd)
                            .encode());
                    }
                }
            }
        }
        "bfc" => {
            if let Some((rd, lsb, width)) = is::r_ii(args) {
                if (0..=63).contains(&lsb) && width >= 1 && width <= 64 - lsb {
                    let immr = (-lsb).rem_euclid(64) as u32;
                    let imms = (width - 1) as u32;
                    if imms < immr {
                        // BFC is BFM with Rn = XZR.
                        let t = "sf 0 1 1 0 0 1 1 0 N immr imms 1 1 1 1 1 Rd";
                        return w(Template::new(t)
                            .bits("sf", "1")
                            .bits("N", "1")
                            .field("imms", imms, 6)
                            .field("immr", immr, 6)
                            .reg("Rd", rd)
                            .encode());
                    }
                }
            }
        }
        "bfi" => {
            if let Some((rd, rn, lsb, width)) = is::r_rii(args) {
                if rn != 31 && (0..=63).contains(&lsb) && width >= 1 && width <= 64 - lsb {
                    let immr = (-lsb).rem_euclid(64) as u32;
                    let imms = (width - 1) as u32;
                    if imms < immr {
                        let t = "sf 0 1 1 0 0 1 1 0 N immr imms Rn Rd";
                        return w(Template::new(t)
                            .bits("sf", "1")
                            .bits("N", "1")
                            .field("imms", imms, 6)
                            .field("immr", immr, 6)
                            .reg("Rn", rn)
                            .reg("Rd", rd)
                            .encode());
                    }
                }
            }
        }

        // ── Conditional select family ────────────────────────────
        "csel" => {
            if let Some((rd, rn, rm, cond)) = is::r_rr_cond(args) {
                let t = "sf 0 0 1 1 0 1 0 1 0 0 Rm cond 0 0 Rn Rd";
                return w(Template::new(t)
                    .bits("sf", "1")
                    .reg("Rm", rm)
                    .field("cond", cond, 4)
                    .reg("Rn", rn)
                    .reg("Rd", rd)
                    .encode());
            }
        }
        "csinc" | "csneg" | "csinv" => {
            if let Some((rd, rn, rm, cond)) = is::r_rr_cond(args) {
                let t = match mnem.as_str() {
                    "csneg" => "sf 1 0 1 1 0 1 0 1 0 0 Rm cond 0 1 Rn Rd",
                    "csinv" => "sf 1 0 1 1 0 1 0 1 0 0 Rm cond 0 0 Rn Rd",
                    _ => "sf 0 0 1 1 0 1 0 1 0 0 Rm cond 0 1 Rn Rd",
                };
                return w(Template::new(t)
                    .bits("sf", "1")
                    .reg("Rm", rm)
                    .field("cond", cond, 4)
                    .reg("Rn", rn)
                    .reg("Rd", rd)
                    .encode());
            }
        }
        "cinc" | "cneg" | "cinv" => {
            if let Some((rd, rn, cond)) = is::r_r_cond(args) {
                // CINC Xd, Xn, cond is CSINC Xd, Xn, Xn, invert(cond);
                // likewise CNEG → CSNEG and CINV → CSINV.
                let t = match mnem.as_str() {
                    "cneg" => "sf 1 0 1 1 0 1 0 1 0 0 Rm cond 0 1 Rn Rd",
                    "cinv" => "sf 1 0 1 1 0 1 0 1 0 0 Rm cond 0 0 Rn Rd",
                    _ => "sf 0 0 1 1 0 1 0 1 0 0 Rm cond 0 1 Rn Rd",
                };
                return w(Template::new(t)
                    .bits("sf", "1")
                    .reg("Rm", rn)
                    .field("cond", invert_cond(cond), 4)
                    .reg("Rn", rn)
                    .reg("Rd", rd)
                    .encode());
            }
        }
        "cset" | "csetm" => {
            if let Some((rd, cond)) = is::r_cond(args) {
                // CSET Xd, cond is CSINC Xd, XZR, XZR, invert(cond);
                // CSETM is CSINV.
                let t = if mnem == "csetm" {
                    "sf 1 0 1 1 0 1 0 1 0 0 Rm cond 0 0 Rn Rd"
                } else {
                    "sf 0 0 1 1 0 1 0 1 0 0 Rm cond 0 1 Rn Rd"
                };
                return w(Template::new(t)
                    .bits("sf", "1")
                    .reg("Rm", 31)
                    .field("cond", invert_cond(cond), 4)
                    .reg("Rn", 31)
                    .reg("Rd", rd)
                    .encode());
            }
        }

        // ── Address generation / branches ────────────────────────
        "adr" => {
            if let Some((rd, imm, shift)) = is::r_i(args) {
                if shift == 0 && (-(1 << 20)..1 << 20).contains(&imm) {
                    let imm = if imm < 0 { (1 << 21) + imm } else { imm };
                    let t = "0 immlo 1 0 0 0 0 immhi Rd";
                    return w(Template::new(t)
                        .bits("immlo", &bin((imm & 3) as u32, 2))
                        .field("immhi", (imm >> 2) as u32, 19)
                        .reg("Rd", rd)
                        .encode());
                }
            }
        }
        "br" | "blr" => {
            if args.len() == 1 {
                if let Some(rn) = crate::operand::get_r(&args[0]) {
                    let t = if mnem == "blr" {
                        "1 1 0 1 0 1 1 0 0 0 1 1 1 1 1 1 0 0 0 0 0 0 Rn 0 0 0 0 0"
                    } else {
                        "1 1 0 1 0 1 1 0 0 0 0 1 1 1 1 1 0 0 0 0 0 0 Rn 0 0 0 0 0"
                    };
                    return w(Template::new(t).reg("Rn", rn).encode());
                }
            }
        }
        "ret" => {
            let t = "1 1 0 1 0 1 1 0 0 1 0 1 1 1 1 1 0 0 0 0 0 0 Rn 0 0 0 0 0";
            return w(Template::new(t).reg("Rn", 30).encode());
        }
        "nop" => {
            return w(0xd503201f);
        }
        "svc" => {
            if let Some(imm) = is::i(args) {
                if (0..0x10000).contains(&imm) {
                    let t = "1 1 0 1 0 1 0 0 0 0 0 imm16 0 0 0 0 1";
                    return w(Template::new(t)
                        .field("imm16", imm as u32, 16)
                        .encode());
                }
            }
        }

        // ── Scalar loads / stores ────────────────────────────────
        "ldr" => {
            if let Some((zt, xn, imm)) = is::z_bi(args) {
                if (-256..256).contains(&imm) {
                    let t = "1 0 0 0 0 1 0 1 1 0 imm9h 0 1 0 imm9l Rn Zt";
                    return w(Template::new(t)
                        .imm9(imm)
                        .reg("Rn", xn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
            if let Some((pt, xn, imm)) = is::p_bi(args) {
                if (-256..256).contains(&imm) {
                    let t = "1 0 0 0 0 1 0 1 1 0 imm9h 0 0 0 imm9l Rn 0 Pt";
                    return w(Template::new(t)
                        .imm9(imm)
                        .reg("Rn", xn)
                        .pred4("Pt", pt)
                        .encode());
                }
            }
            if let Some((rt, rn, rm, option, amount)) = is::r_br(args) {
                if option == 3 && (amount == 0 || amount == 3) {
                    let t = "1 x 1 1 1 0 0 0 0 1 1 Rm option S 1 0 Rn Rt";
                    return w(Template::new(t)
                        .bits("x", "1")
                        .reg("Rm", rm)
                        .field("option", option, 3)
                        .bit("S", if amount == 3 { 1 } else { 0 })
                        .reg("Rn", rn)
                        .reg("Rt", rt)
                        .encode());
                }
            }
            if let Some((rt, rn, imm, post_index, write_back)) = is::r_bi(args) {
                if write_back {
                    if (-256..=255).contains(&imm) {
                        let t = if post_index {
                            "1 x 1 1 1 0 0 0 0 1 0 imm9 0 1 Rn Rt"
                        } else {
                            "1 x 1 1 1 0 0 0 0 1 0 imm9 1 1 Rn Rt"
                        };
                        let imm = if imm < 0 { (1 << 9) + imm } else { imm };
                        return w(Template::new(t)
                            .bits("x", "1")
                            .field("imm9", imm as u32, 9)
                            .reg("Rn", rn)
                            .reg("Rt", rt)
                            .encode());
                    }
                } else if imm & 7 == 0 && (0..32768).contains(&imm) {
                    let t = "1 x 1 1 1 0 0 1 0 1 imm12 Rn Rt";
                    return w(Template::new(t)
                        .bits("x", "1")
                        .field("imm12", (imm / 8) as u32, 12)
                        .reg("Rn", rn)
                        .reg("Rt", rt)
                        .encode());
                }
            }
        }
        "ldrb" => {
            if let Some((rt, rn, imm, post_index, write_back)) = is::r_bi(args) {
                if write_back {
                    if (-256..=255).contains(&imm) {
                        let t = if post_index {
                            "0 0 1 1 1 0 0 0 0 1 0 imm9 0 1 Rn Rt"
                        } else {
                            "0 0 1 1 1 0 0 0 0 1 0 imm9 1 1 Rn Rt"
                        };
                        let imm = if imm < 0 { (1 << 9) + imm } else { imm };
                        return w(Template::new(t)
                            .field("imm9", imm as u32, 9)
                            .reg("Rn", rn)
                            .reg("Rt", rt)
                            .encode());
                    }
                } else if (0..4096).contains(&imm) {
                    let t = "0 0 1 1 1 0 0 1 0 1 imm12 Rn Rt";
                    return w(Template::new(t)
                        .field("imm12", imm as u32, 12)
                        .reg("Rn", rn)
                        .reg("Rt", rt)
                        .encode());
                }
            }
        }
        "ldrh" => {
            if let Some((rt, rn, imm, post_index, write_back)) = is::r_bi(args) {
                if write_back {
                    if (-256..=255).contains(&imm) {
                        let t = if post_index {
                            "0 1 1 1 1 0 0 0 0 1 0 imm9 0 1 Rn Rt"
                        } else {
                            "0 1 1 1 1 0 0 0 0 1 0 imm9 1 1 Rn Rt"
                        };
                        let imm = if imm < 0 { (1 << 9) + imm } else { imm };
                        return w(Template::new(t)
                            .field("imm9", imm as u32, 9)
                            .reg("Rn", rn)
                            .reg("Rt", rt)
                            .encode());
                    }
                } else if imm & 1 == 0 && (0..8192).contains(&imm) {
                    let t = "0 1 1 1 1 0 0 1 0 1 imm12 Rn Rt";
                    return w(Template::new(t)
                        .field("imm12", (imm / 2) as u32, 12)
                        .reg("Rn", rn)
                        .reg("Rt", rt)
                        .encode());
                }
            }
        }
        "str" => {
            if let Some((zt, xn, imm)) = is::z_bi(args) {
                if (-256..256).contains(&imm) {
                    let t = "1 1 1 0 0 1 0 1 1 0 imm9h 0 1 0 imm9l Rn Zt";
                    return w(Template::new(t)
                        .imm9(imm)
                        .reg("Rn", xn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
            if let Some((pt, xn, imm)) = is::p_bi(args) {
                if (-256..256).contains(&imm) {
                    let t = "1 1 1 0 0 1 0 1 1 0 imm9h 0 0 0 imm9l Rn 0 Pt";
                    return w(Template::new(t)
                        .imm9(imm)
                        .reg("Rn", xn)
                        .pred4("Pt", pt)
                        .encode());
                }
            }
            if let Some((rt, rn, rm, option, amount)) = is::r_br(args) {
                if option == 3 && (amount == 0 || amount == 3) {
                    let t = "1 x 1 1 1 0 0 0 0 0 1 Rm option S 1 0 Rn Rt";
                    return w(Template::new(t)
                        .bits("x", "1")
                        .reg("Rm", rm)
                        .field("option", option, 3)
                        .bit("S", if amount == 3 { 1 } else { 0 })
                        .reg("Rn", rn)
                        .reg("Rt", rt)
                        .encode());
                }
            }
            if let Some((rt, rn, imm, post_index, write_back)) = is::r_bi(args) {
                if write_back {
                    if (-256..=255).contains(&imm) {
                        let t = if post_index {
                            "1 x 1 1 1 0 0 0 0 0 0 imm9 0 1 Rn Rt"
                        } else {
                            "1 x 1 1 1 0 0 0 0 0 0 imm9 1 1 Rn Rt"
                        };
                        let imm = if imm < 0 { (1 << 9) + imm } else { imm };
                        return w(Template::new(t)
                            .bits("x", "1")
                            .field("imm9", imm as u32, 9)
                            .reg("Rn", rn)
                            .reg("Rt", rt)
                            .encode());
                    }
                } else if imm & 7 == 0 && (0..32768).contains(&imm) {
                    let t = "1 x 1 1 1 0 0 1 0 0 imm12 Rn Rt";
                    return w(Template::new(t)
                        .bits("x", "1")
                        .field("imm12", (imm / 8) as u32, 12)
                        .reg("Rn", rn)
                        .reg("Rt", rt)
                        .encode());
                }
            }
        }

        // ── Atomics ──────────────────────────────────────────────
        "cas" | "casa" | "casal" | "casl" | "casb" | "casab" | "casalb" | "caslb" | "cash"
        | "casah" | "casalh" | "caslh" => {
            if let Some((rt, rs, rn)) = is::r_r_b(args) {
                let t = if mnem.ends_with('b') && mnem != "cas" {
                    "0 0 0 0 1 0 0 0 1 L 1 Rs o0 1 1 1 1 1 Rn Rt"
                } else if mnem.ends_with('h') {
                    "0 1 0 0 1 0 0 0 1 L 1 Rs o0 1 1 1 1 1 Rn Rt"
                } else {
                    "1 x 0 0 1 0 0 0 1 L 1 Rs o0 1 1 1 1 1 Rn Rt"
                };
                // Acquire (L) and release (o0) come from the suffix.
                let (l, o0) = match mnem.trim_end_matches(['b', 'h']) {
                    "casa" => ("1", "0"),
                    "casal" => ("1", "1"),
                    "casl" => ("0", "1"),
                    _ => ("0", "0"),
                };
                return w(Template::new(t)
                    .bits("x", "1")
                    .bits("L", l)
                    .bits("o0", o0)
                    .reg("Rs", rs)
                    .reg("Rn", rn)
                    .reg("Rt", rt)
                    .encode());
            }
        }
        "casp" | "caspa" | "caspal" | "caspl" => {
            if let Some((rt, rs, rn)) = is::rr_rr_b(args) {
                let t = "0 sz 0 0 1 0 0 0 0 L 1 Rs o0 1 1 1 1 1 Rn Rt";
                let (l, o0) = match mnem.as_str() {
                    "caspa" => ("1", "0"),
                    "caspal" => ("1", "1"),
                    "caspl" => ("0", "1"),
                    _ => ("0", "0"),
                };
                return w(Template::new(t)
                    .bits("sz", "1")
                    .bits("L", l)
                    .bits("o0", o0)
                    .reg("Rs", rs)
                    .reg("Rn", rn)
                    .reg("Rt", rt)
                    .encode());
            }
        }

        // ── SVE loads / stores ───────────────────────────────────
        "ld1b" => {
            if let Some((zt, pg, rn, zm, xs, t)) = is::z_p_bz(args) {
                if t == Some(ElementType::S) {
                    let spec = "1 0 0 0 0 1 0 0 0 xs 0 Zm 0 1 0 Pg Rn Zt";
                    return w(Template::new(spec)
                        .bit("xs", xs)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
            if let Some((zt, pg, rn, rm, t)) = is::zt4_p_rr(args) {
                if t == Some(ElementType::B) && zt & 3 == 0 && (8..=15).contains(&pg) {
                    let spec = "1 0 1 0 0 0 0 0 0 0 0 Rm 1 0 0 PNg Rn Zt 0 0";
                    return w(Template::new(spec)
                        .reg("Rm", rm)
                        .pred("PNg", pg - 8)
                        .reg("Rn", rn)
                        .field("Zt", zt >> 2, 3)
                        .encode());
                }
            }
            if let Some((zt, pg, rn, imm, t)) = is::z_p_bi(args) {
                if t == Some(ElementType::B) && (-8..8).contains(&imm) {
                    let imm = if imm < 0 { (1 << 4) + imm } else { imm };
                    let spec = "1 0 1 0 0 1 0 0 size 0 0 imm4 1 0 1 Pg Rn Zt";
                    return w(Template::new(spec)
                        .bits("size", "00")
                        .field("imm4", imm as u32, 4)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
        }
        "ld1h" => {
            if let Some((zt, pg, rn, zm, xs, t)) = is::z_p_bz(args) {
                if t == Some(ElementType::S) {
                    let spec = "1 0 0 0 0 1 0 0 1 xs 0 Zm 0 1 0 Pg Rn Zt";
                    return w(Template::new(spec)
                        .bit("xs", xs)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
        }
        "ld1w" => {
            if let Some((zt, pg, rn, zm, xs, t)) = is::z_p_bz(args) {
                if t == Some(ElementType::S) {
                    let spec = "1 0 0 0 0 1 0 1 0 xs 0 Zm 0 1 0 Pg Rn Zt";
                    return w(Template::new(spec)
                        .bit("xs", xs)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
            if let Some((zt, pg, rn, rm, shift, t)) = is::z_p_rr(args) {
                if shift == 2 {
                    let spec = match t {
                        Some(ElementType::S) => "1 0 1 0 0 1 0 1 0 1 0 Rm 0 1 0 Pg Rn Zt",
                        Some(ElementType::D) => "1 0 1 0 0 1 0 1 0 1 1 Rm 0 1 0 Pg Rn Zt",
                        Some(ElementType::Q) => "1 0 1 0 0 1 0 1 0 0 0 Rm 1 0 0 Pg Rn Zt",
                        _ => "",
                    };
                    if !spec.is_empty() {
                        return w(Template::new(spec)
                            .reg("Rm", rm)
                            .pred("Pg", pg)
                            .reg("Rn", rn)
                            .reg("Zt", zt)
                            .encode());
                    }
                }
            }
        }
        "ld1d" => {
            if let Some((zt, pg, rn, rm, _, _)) = is::z_p_rr(args) {
                let spec = "1 0 1 0 0 1 0 1 1 1 1 Rm 0 1 0 Pg Rn Zt";
                return w(Template::new(spec)
                    .reg("Rm", rm)
                    .pred("Pg", pg)
                    .reg("Rn", rn)
                    .reg("Zt", zt)
                    .encode());
            }
        }
        "ld1rw" => {
            if let Some((zt, pg, rn, imm, t)) = is::z_p_bi(args) {
                let spec = match t {
                    Some(ElementType::S) => "1 0 0 0 0 1 0 1 0 1 imm6 1 1 0 Pg Rn Zt",
                    Some(ElementType::D) => "1 0 0 0 0 1 0 1 0 1 imm6 1 1 1 Pg Rn Zt",
                    _ => "",
                };
                if !spec.is_empty() {
                    return w(Template::new(spec)
                        .field("imm6", (imm / 4) as u32, 6)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
        }
        "ld4b" => {
            if let Some((zt, pg, rn, rm, t)) = is::zt4_p_rr(args) {
                if t == Some(ElementType::B) && pg <= 7 {
                    let spec = "1 0 1 0 0 1 0 0 0 1 1 Rm 1 1 0 Pg Rn Zt";
                    return w(Template::new(spec)
                        .reg("Rm", rm)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
        }
        "st1b" => {
            if let Some((zt, pg, rn, zm, xs, t)) = is::z_p_bz(args) {
                if t == Some(ElementType::S) {
                    let spec = "1 1 1 0 0 1 0 0 0 1 0 Zm 1 xs 0 Pg Rn Zt";
                    return w(Template::new(spec)
                        .bit("xs", xs)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
            if let Some((zt, pg, rn, imm, t)) = is::z_p_bi(args) {
                if let Some(sz) = size2(t) {
                    if (-8..8).contains(&imm) {
                        let imm = if imm < 0 { (1 << 4) + imm } else { imm };
                        let spec = "1 1 1 0 0 1 0 0 0 size 0 imm4 1 1 1 Pg Rn Zt";
                        return w(Template::new(spec)
                            .bits("size", sz)
                            .field("imm4", imm as u32, 4)
                            .pred("Pg", pg)
                            .reg("Rn", rn)
                            .reg("Zt", zt)
                            .encode());
                    }
                }
            }
        }
        "st1h" => {
            if let Some((zt, pg, rn, zm, xs, t)) = is::z_p_bz(args) {
                if t == Some(ElementType::S) {
                    let spec = "1 1 1 0 0 1 0 0 1 1 0 Zm 1 xs 0 Pg Rn Zt";
                    return w(Template::new(spec)
                        .bit("xs", xs)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
        }
        "st1w" => {
            if let Some((zt, pg, rn, zm, xs, t)) = is::z_p_bz(args) {
                if t == Some(ElementType::S) {
                    let spec = "1 1 1 0 0 1 0 1 0 1 0 Zm 1 xs 0 Pg Rn Zt";
                    return w(Template::new(spec)
                        .bit("xs", xs)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
            if let Some((zt, pg, rn, rm, shift, t)) = is::z_p_rr(args) {
                if shift == 2 && matches!(t, Some(ElementType::S) | Some(ElementType::D)) {
                    let spec = "1 1 1 0 0 1 0 1 0 1 sz Rm 0 1 0 Pg Rn Zt";
                    let sz = if t == Some(ElementType::D) { "1" } else { "0" };
                    return w(Template::new(spec)
                        .bits("sz", sz)
                        .reg("Rm", rm)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
        }
        "st1d" => {
            if let Some((zt, pg, rn, rm, shift, t)) = is::z_p_rr(args) {
                if shift == 3 && t == Some(ElementType::D) {
                    let spec = "1 1 1 0 0 1 0 1 1 1 1 Rm 0 1 0 Pg Rn Zt";
                    return w(Template::new(spec)
                        .reg("Rm", rm)
                        .pred("Pg", pg)
                        .reg("Rn", rn)
                        .reg("Zt", zt)
                        .encode());
                }
            }
        }

        // ── Predicated arithmetic (remaining families) ───────────
        "sabd" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 0 1 1 0 0 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "uabd" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 0 1 1 0 1 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "smin" => {
            if let Some(r) = pred_destructive(
                ins,
                args,
                "0 0 0 0 0 1 0 0 size 0 0 1 0 1 0 0 0 0 Pg Zm Zdn",
            ) {
                return r;
            }
        }
        "mad" => {
            if let Some((zdn, pg, zm, za, t)) = is::z2_p_zz(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 0 size 0 Zm 1 1 0 Pg Za Zdn";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Za", za)
                        .reg("Zdn", zdn)
                        .encode());
                }
            }
        }
        "mls" => {
            if let Some((zda, pg, zn, zm, t)) = is::z2_p_zz(args) {
                if let Some(sz) = size2(t) {
                    let spec = "0 0 0 0 0 1 0 0 size 0 Zm 0 1 1 Pg Zn Zda";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .reg("Zda", zda)
                        .encode());
                }
            }
        }
        "sdot" => {
            if let Some((zda, zn, zm, td, t)) = is::z_zz_2t(args) {
                let sz = match (td, t) {
                    (Some(ElementType::D), Some(ElementType::H)) => Some("11"),
                    (Some(ElementType::S), Some(ElementType::B)) => Some("10"),
                    _ => None,
                };
                if let Some(sz) = sz {
                    let spec = "0 1 0 0 0 1 0 0 size 0 Zm 0 0 0 0 0 0 Zn Zda";
                    return w(Template::new(spec)
                        .bits("size", sz)
                        .reg("Zm", zm)
                        .reg("Zn", zn)
                        .reg("Zda", zda)
                        .encode());
                }
            }
        }
        "pmullb" | "pmullt" => {
            if let Some((zd, zn, zm, td, t)) = is::z_zz_2t(args) {
                if td == Some(ElementType::Q) && t == Some(ElementType::D) {
                    let spec = if mnem == "pmullt" {
                        "0 1 0 0 0 1 0 1 0 0 0 Zm 0 1 1 0 1 1 Zn Zd"
                    } else {
                        "0 1 0 0 0 1 0 1 0 0 0 Zm 0 1 1 0 1 0 Zn Zd"
                    };
                    return w(Template::new(spec)
                        .reg("Zm", zm)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }

        // ── Floating point ───────────────────────────────────────
        "fcvt" => {
            if let Some((zd, pg, zn, td, tn)) = is::z_p_z_tt(args) {
                if td == Some(ElementType::S) && tn == Some(ElementType::H) {
                    let spec = "0 1 1 0 0 1 0 1 1 0 0 0 1 0 0 1 1 0 1 Pg Zn Zd";
                    return w(Template::new(spec)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }
        "fmul" => {
            if let Some((zd, zn, zm, t)) = is::z_zz(args) {
                if t != Some(ElementType::B) {
                    if let Some(sz) = size2(t) {
                        let spec = "0 1 1 0 0 1 0 1 size 0 Zm 0 0 0 0 1 0 Zn Zd";
                        return w(Template::new(spec)
                            .bits("size", sz)
                            .reg("Zm", zm)
                            .reg("Zn", zn)
                            .reg("Zd", zd)
                            .encode());
                    }
                }
            }
        }
        "fmla" => {
            if let Some((zda, pg, zn, zm, t)) = is::z_p_zz2(args) {
                if t != Some(ElementType::B) {
                    if let Some(sz) = size2(t) {
                        let spec = "0 1 1 0 0 1 0 1 size 1 Zm 0 0 0 Pg Zn Zda";
                        return w(Template::new(spec)
                            .bits("size", sz)
                            .reg("Zm", zm)
                            .pred("Pg", pg)
                            .reg("Zn", zn)
                            .reg("Zda", zda)
                            .encode());
                    }
                }
            }
        }
        "scvtf" => {
            if let Some((zd, pg, zn, t)) = is::z_p_z(args) {
                if t == Some(ElementType::S) {
                    let spec = "0 1 1 0 0 1 0 1 1 0 0 1 0 1 0 0 1 0 1 Pg Zn Zd";
                    return w(Template::new(spec)
                        .pred("Pg", pg)
                        .reg("Zn", zn)
                        .reg("Zd", zd)
                        .encode());
                }
            }
        }

        // ── Crypto ───────────────────────────────────────────────
        "aesd" | "aese" => {
            if let Some((zd, zn, zm, t)) = is::z_zz(args) {
                if t == Some(ElementType::B) && zd == zn {
                    let spec = "0 1 0 0 0 1 0 1 0 0 1 0 0 0 1 0 1 1 1 0 0 U Zm Zdn";
                    return w(Template::new(spec)
                        .bits("U", if mnem == "aesd" { "1" } else { "0" })
                        .reg("Zm", zm)
                        .reg("Zdn", zd)
                        .encode());
                }
            }
        }
        "aesimc" | "aesmc" => {
            if let Some((zd, zn, t)) = is::z_z(args) {
                if t == Some(ElementType::B) && zd == zn {
                    let spec = "0 1 0 0 0 1 0 1 0 0 1 0 0 0 0 0 1 1 1 0 0 U 0 0 0 0 0 Zdn";
                    return w(Template::new(spec)
                        .bits("U", if mnem == "aesimc" { "1" } else { "0" })
                        .reg("Zdn", zd)
                        .encode());
                }
            }
        }

        _ => {}
    }

    Err(unhandled(ins))
}

/// Shared DUP/MOV immediate-splat encoding: 8-bit immediate with an
/// optional left-shift by 8 for byte-aligned wider constants.
fn dup_imm(zd: u32, imm: i64, t: Option<ElementType>) -> Option<u32> {
    let sz = size2(t)?;
    let (sh, imm8) = if (-128..=127).contains(&imm) {
        ("0", if imm < 0 { 0x100 + imm } else { imm })
    } else if (-128 * 256..=127 * 256).contains(&imm) && imm % 256 == 0 {
        ("1", (if imm < 0 { 0x10000 + imm } else { imm }) >> 8)
    } else {
        return None;
    };
    let spec = "0 0 1 0 0 1 0 1 size 1 1 1 0 0 0 1 1 sh imm8 Zd";
    Some(
        Template::new(spec)
            .bits("size", sz)
            .bits("sh", sh)
            .field("imm8", imm8 as u32, 8)
            .reg("Zd", zd)
            .encode(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(ins: &str) -> u32 {
        match assemble(ins).unwrap() {
            Encoded::Word(w) => w,
            Encoded::Pair { .. } => panic!("unexpected pair for `{ins}`"),
        }
    }

    fn pair(ins: &str) -> (u32, u32) {
        match assemble(ins).unwrap() {
            Encoded::Pair { prefix, base } => (prefix, base),
            Encoded::Word(w) => panic!("unexpected single word {w:#010x} for `{ins}`"),
        }
    }

    #[test]
    fn scalar_add_forms() {
        assert_eq!(word("add x14, x14, x15"), 0x8b0f01ce);
        assert_eq!(word("add x8, x8, #64"), 0x91010108);
        assert_eq!(word("add x2, x1, #0x20, lsl #12"), 0x91408022);
        assert_eq!(word("add x2, x1, w0, uxth #2"), 0x8b202822);
    }

    #[test]
    fn mov_selects_movz_or_movn_lane() {
        assert_eq!(word("mov x1, #0xffff000000000000"), 0xd2ffffe1);
        assert_eq!(word("mov x1, #0xffffffffffff0000"), 0x929fffe1);
        assert_eq!(word("movk x1, #0xffff, lsl #32"), 0xf2dfffe1);
    }

    #[test]
    fn destructive_merging_needs_no_prefix() {
        assert_eq!(word("add z1.s, p1/M, z1.s, z3.s"), 0x04800461);
    }

    #[test]
    fn distinct_destination_gets_prefix() {
        let (prefix, base) = pair("add z1.s, p1/M, z2.s, z3.s");
        assert_eq!(prefix, 0x04912441);
        assert_eq!(base, 0x04800461);
    }

    #[test]
    fn zeroing_always_gets_prefix() {
        let (prefix, base) = pair("add z1.s, p1/Z, z1.s, z3.s");
        assert_eq!(prefix, 0x04902421);
        assert_eq!(base, 0x04800461);
        // The shift family follows the same rule.
        assert!(assemble("lsr z4.s, p3/Z, z4.s, z5.s").unwrap().is_pair());
    }

    #[test]
    fn dword_packs_base_high_prefix_low() {
        let enc = assemble("add z1.s, p1/M, z2.s, z3.s").unwrap();
        assert_eq!(enc.dword(), Some(0x0480046104912441));
    }

    #[test]
    fn predicated_immediate_shift_prefix() {
        let enc = assemble("lsr z5.b, p1/m, z1.b, #4").unwrap();
        assert_eq!(enc.dword(), Some(0x0401858504112425));
    }

    #[test]
    fn shift_specifier_endpoints() {
        // LSR/ASR amounts run 1..=esize; LSL runs 0..esize.
        assert!(shift_specifier(64, true, Some(ElementType::D)).is_some());
        assert!(shift_specifier(65, true, Some(ElementType::D)).is_none());
        assert!(shift_specifier(0, true, Some(ElementType::D)).is_none());
        assert!(shift_specifier(63, false, Some(ElementType::D)).is_some());
        assert!(shift_specifier(64, false, Some(ElementType::D)).is_none());
    }

    #[test]
    fn bitmask_logical_forms() {
        assert_eq!(word("and z11.b, z11.b, #254"), 0x05803ecb);
        assert_eq!(word("tst x6, #0x3ff"), 0xf24024df);
    }

    #[test]
    fn non_contiguous_bitmask_is_unhandled() {
        assert!(matches!(
            assemble("and x1, x2, #0b101"),
            Err(AsmError::Unhandled { .. })
        ));
    }

    #[test]
    fn ptrue_defaults_to_all_pattern() {
        assert_eq!(word("ptrue p3.s"), 0x2598e3e3);
        assert_eq!(word("ptrue p4.s, VL4"), 0x2598e084);
    }

    #[test]
    fn unknown_mnemonic_reports_instruction() {
        let err = assemble("frobnicate x1, x2").unwrap_err();
        assert_eq!(
            format!("{err}"),
            "unhandled instruction: frobnicate x1, x2"
        );
    }

    #[test]
    fn movprfx_spellings() {
        assert_eq!(word("movprfx z26, z2"), 0x0420bc5a);
        assert_eq!(word("movprfx z28.s, p6/m, z31.s"), 0x04913bfc);
        assert_eq!(word("movprfx z7.s, p5/z, z6.s"), 0x049034c7);
    }
}
