//! Operand-shape classifiers.
//!
//! One function per syntactic shape. Every classifier is total and
//! side-effect-free: it either recognizes the token list and returns the
//! parsed register numbers / immediates / element type, or returns
//! `None`. The encoder composes them with short-circuit `?`/`else if`
//! chains, so classifier order at the dispatch site decides which form
//! wins. Numeric range checks deliberately live at the dispatch sites,
//! not here — one shape can feed templates with different ranges.
//!
//! Naming: `r` scalar register, `z` vector register, `p` predicate,
//! `i` immediate, `b` a bracketed base address, `cond` a condition code.
//! A trailing `_ext` is an extend qualifier; `zt4` a four-register list.

use crate::operand::{
    get_cond, get_extend, get_imm, get_p, get_p_governing, get_p_typed, get_r, get_shift, get_z,
    mem_addr_imm, mem_addr_mul_vl, mem_addr_register, mem_addr_vectored, ElementType,
};

type T = Option<ElementType>;

/// `Pd.T` (+ optionally more args the caller inspects, e.g. a pattern).
pub fn p(args: &[String]) -> Option<(u32, ElementType)> {
    get_p_typed(args.first()?)
}

/// `Rn, #imm`
pub fn ri(args: &[String]) -> Option<(u32, i64)> {
    if args.len() != 2 {
        return None;
    }
    Some((get_r(&args[0])?, get_imm(&args[1])?))
}

/// `Rn, Rm`
pub fn rr(args: &[String]) -> Option<(u32, u32)> {
    if args.len() != 2 {
        return None;
    }
    Some((get_r(&args[0])?, get_r(&args[1])?))
}

/// `#imm`
pub fn i(args: &[String]) -> Option<i64> {
    if args.len() != 1 {
        return None;
    }
    get_imm(&args[0])
}

/// `Rd, #imm{, lsl #shift}` with shift in {0, 12, 16, 32, 48}.
pub fn r_i(args: &[String]) -> Option<(u32, i64, i64)> {
    match args.len() {
        2 => Some((get_r(&args[0])?, get_imm(&args[1])?, 0)),
        4 if args[2].eq_ignore_ascii_case("lsl") => {
            let rd = get_r(&args[0])?;
            let imm = get_imm(&args[1])?;
            let sh = get_imm(&args[3])?;
            if matches!(sh, 0 | 12 | 16 | 32 | 48) {
                Some((rd, imm, sh))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// `Rd, Rn{, shift #amount}` → (rd, rn, shift, amount)
pub fn r_r(args: &[String]) -> Option<(u32, u32, u32, i64)> {
    match args.len() {
        2 => Some((get_r(&args[0])?, get_r(&args[1])?, 0, 0)),
        4 => {
            let rd = get_r(&args[0])?;
            let rn = get_r(&args[1])?;
            let shift = get_shift(&args[2])?;
            let imm = get_imm(&args[3])?;
            Some((rd, rn, shift, imm))
        }
        _ => None,
    }
}

/// `Rd, Rn, #imm{, LSL #0|#12}` → (rd, rn, imm, sh) with sh already
/// divided down to the 1-bit field value.
pub fn r_ri(args: &[String]) -> Option<(u32, u32, i64, u32)> {
    match args.len() {
        3 => Some((get_r(&args[0])?, get_r(&args[1])?, get_imm(&args[2])?, 0)),
        5 if args[3].eq_ignore_ascii_case("lsl") => {
            let rd = get_r(&args[0])?;
            let rn = get_r(&args[1])?;
            let imm = get_imm(&args[2])?;
            match get_imm(&args[4])? {
                0 => Some((rd, rn, imm, 0)),
                12 => Some((rd, rn, imm, 1)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// `Rd, Rn, Rm{, shift #amount}` → (rd, rn, rm, shift, amount)
pub fn r_rr(args: &[String]) -> Option<(u32, u32, u32, u32, i64)> {
    match args.len() {
        3 => Some((get_r(&args[0])?, get_r(&args[1])?, get_r(&args[2])?, 0, 0)),
        5 => {
            let rd = get_r(&args[0])?;
            let rn = get_r(&args[1])?;
            let rm = get_r(&args[2])?;
            let shift = get_shift(&args[3])?;
            let imm = get_imm(&args[4])?;
            Some((rd, rn, rm, shift, imm))
        }
        _ => None,
    }
}

/// `Rd, Rn, Rm, extend{ #amount}` → (rd, rn, rm, option, amount)
pub fn r_rr_ext(args: &[String]) -> Option<(u32, u32, u32, u32, i64)> {
    if args.len() != 4 && args.len() != 5 {
        return None;
    }
    let rd = get_r(&args[0])?;
    let rn = get_r(&args[1])?;
    let rm = get_r(&args[2])?;
    let option = get_extend(&args[3])?;
    let amount = if args.len() == 5 {
        get_imm(&args[4])?
    } else {
        0
    };
    Some((rd, rn, rm, option, amount))
}

/// `Rd, Rn, Rm, #imm`
pub fn r_rri(args: &[String]) -> Option<(u32, u32, u32, i64)> {
    if args.len() != 4 {
        return None;
    }
    Some((
        get_r(&args[0])?,
        get_r(&args[1])?,
        get_r(&args[2])?,
        get_imm(&args[3])?,
    ))
}

/// `Rd, Rn, Rm, Ra`
pub fn r_rrr(args: &[String]) -> Option<(u32, u32, u32, u32)> {
    if args.len() != 4 {
        return None;
    }
    Some((
        get_r(&args[0])?,
        get_r(&args[1])?,
        get_r(&args[2])?,
        get_r(&args[3])?,
    ))
}

/// `Rd, cond`
pub fn r_cond(args: &[String]) -> Option<(u32, u32)> {
    if args.len() != 2 {
        return None;
    }
    Some((get_r(&args[0])?, get_cond(&args[1])?))
}

/// `Rd, Rn, cond`
pub fn r_r_cond(args: &[String]) -> Option<(u32, u32, u32)> {
    if args.len() != 3 {
        return None;
    }
    Some((get_r(&args[0])?, get_r(&args[1])?, get_cond(&args[2])?))
}

/// `Rd, Rn, Rm, cond`
pub fn r_rr_cond(args: &[String]) -> Option<(u32, u32, u32, u32)> {
    if args.len() != 4 {
        return None;
    }
    Some((
        get_r(&args[0])?,
        get_r(&args[1])?,
        get_r(&args[2])?,
        get_cond(&args[3])?,
    ))
}

/// `Rd, #lsb, #width`
pub fn r_ii(args: &[String]) -> Option<(u32, i64, i64)> {
    if args.len() != 3 {
        return None;
    }
    Some((get_r(&args[0])?, get_imm(&args[1])?, get_imm(&args[2])?))
}

/// `Rd, Rn, #lsb, #width`
pub fn r_rii(args: &[String]) -> Option<(u32, u32, i64, i64)> {
    if args.len() != 4 {
        return None;
    }
    Some((
        get_r(&args[0])?,
        get_r(&args[1])?,
        get_imm(&args[2])?,
        get_imm(&args[3])?,
    ))
}

/// Base+immediate load/store: `Rt, [Xn{, #imm}]` (unsigned offset),
/// `Rt, [Xn, #imm]!` (pre-index), `Rt, [Xn], #imm` (post-index).
/// Returns (rt, xn, imm, post_index, write_back).
pub fn r_bi(args: &[String]) -> Option<(u32, u32, i64, bool, bool)> {
    if args.len() < 2 {
        return None;
    }
    let rt = get_r(&args[0])?;
    let last = &args[args.len() - 1];
    if args[1].starts_with('[') && last.ends_with("]!") {
        let (xn, imm) = mem_addr_imm(&args[1..])?;
        return Some((rt, xn, imm, false, true));
    }
    if args[1].starts_with('[') && last.ends_with(']') {
        let (xn, imm) = mem_addr_imm(&args[1..])?;
        return Some((rt, xn, imm, false, false));
    }
    if args[1].starts_with('[') && args[1].ends_with(']') && args.len() >= 3 {
        let memreg = args[1].replace(['[', ']'], "");
        let xn = get_r(&memreg)?;
        let imm = get_imm(&args[2])?;
        return Some((rt, xn, imm, true, true));
    }
    None
}

/// Scaled register-index load/store: `Rt, [Xn, Xm, LSL #amount]`.
pub fn r_br(args: &[String]) -> Option<(u32, u32, u32, u32, i64)> {
    if args.len() < 2 || !args[1].starts_with('[') {
        return None;
    }
    let rt = get_r(&args[0])?;
    let (rn, rm, option, amount) = mem_addr_register(&args[1..])?;
    Some((rt, rn, rm, option, amount))
}

/// Compare-and-swap operands: `Rs, Rt, [Xn]` → (rt, rs, rn).
pub fn r_r_b(args: &[String]) -> Option<(u32, u32, u32)> {
    if args.len() < 3 {
        return None;
    }
    let rs = get_r(&args[0])?;
    let rt = get_r(&args[1])?;
    let (rn, imm) = mem_addr_imm(&args[2..])?;
    if imm != 0 {
        return None;
    }
    Some((rt, rs, rn))
}

/// Compare-and-swap-pair operands: `Rs, R(s+1), Rt, R(t+1), [Xn]`.
pub fn rr_rr_b(args: &[String]) -> Option<(u32, u32, u32)> {
    if args.len() < 5 {
        return None;
    }
    let rs = get_r(&args[0])?;
    if get_r(&args[1])? != rs + 1 {
        return None;
    }
    let rt = get_r(&args[2])?;
    if get_r(&args[3])? != rt + 1 {
        return None;
    }
    let (rn, imm) = mem_addr_imm(&args[4..])?;
    if imm != 0 {
        return None;
    }
    Some((rt, rs, rn))
}

// ── Vector shapes ────────────────────────────────────────────────────────

/// `Zd.T, Zn.T` (types must agree; both may be absent)
pub fn z_z(args: &[String]) -> Option<(u32, u32, T)> {
    if args.len() != 2 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let (zn, t2, _) = get_z(&args[1])?;
    if t1 != t2 {
        return None;
    }
    Some((zd, zn, t1))
}

/// `Zd.T, Zn.T, Zm.T`
pub fn z_zz(args: &[String]) -> Option<(u32, u32, u32, T)> {
    if args.len() != 3 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let (zn, t2, _) = get_z(&args[1])?;
    let (zm, t3, _) = get_z(&args[2])?;
    if t1 != t2 || t2 != t3 {
        return None;
    }
    Some((zd, zn, zm, t1))
}

/// `Zd.Td, Zn.T, Zm.T` — destination lane width may differ (widening
/// forms such as `sdot` and `pmull`).
pub fn z_zz_2t(args: &[String]) -> Option<(u32, u32, u32, T, T)> {
    if args.len() != 3 {
        return None;
    }
    let (zd, td, _) = get_z(&args[0])?;
    let (zn, t2, _) = get_z(&args[1])?;
    let (zm, t3, _) = get_z(&args[2])?;
    if t2 != t3 {
        return None;
    }
    Some((zd, zn, zm, td, t2))
}

/// `Zd.T, Zn.T, Zm.T, Za.T`
pub fn z_zzz(args: &[String]) -> Option<(u32, u32, u32, u32, T)> {
    if args.len() != 4 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let (zn, t2, _) = get_z(&args[1])?;
    let (zm, t3, _) = get_z(&args[2])?;
    let (za, t4, _) = get_z(&args[3])?;
    if t1 != t2 || t2 != t3 || t3 != t4 {
        return None;
    }
    Some((zd, zn, zm, za, t1))
}

/// `Zd.T, { Zn1.T, Zn2.T }, Zm.T` (two-register table list)
pub fn z_zz_z(args: &[String]) -> Option<(u32, u32, u32, u32, T)> {
    if args.len() != 6 || args[1] != "{" || args[4] != "}" {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let (zn1, t2, _) = get_z(&args[2])?;
    let (zn2, t3, _) = get_z(&args[3])?;
    let (zm, t4, _) = get_z(&args[5])?;
    if t1 != t2 || t2 != t3 || t3 != t4 {
        return None;
    }
    Some((zd, zn1, zn2, zm, t1))
}

/// `Zd.T, #imm{, LSL #8}` is handled by [`z_zi`]'s caller; this shape is
/// `Zd.T, Zn.T, #imm{, LSL #8}` → (zd, zn, imm, sh, T).
pub fn z_zi(args: &[String]) -> Option<(u32, u32, i64, u32, T)> {
    if args.len() < 3 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let (zn, t2, _) = get_z(&args[1])?;
    if t1 != t2 {
        return None;
    }
    let imm = get_imm(&args[2])?;
    if args.len() >= 5 && args[3].eq_ignore_ascii_case("lsl") && args[4] == "#8" {
        return Some((zd, zn, imm, 1, t1));
    }
    Some((zd, zn, imm, 0, t1))
}

/// `Zd.T, #imm`
pub fn z_i(args: &[String]) -> Option<(u32, i64, T)> {
    if args.len() != 2 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let imm = get_imm(&args[1])?;
    Some((zd, imm, t1))
}

/// `Zd.T, #imm1, #imm2`
pub fn z_ii(args: &[String]) -> Option<(u32, i64, i64, T)> {
    if args.len() != 3 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    Some((zd, get_imm(&args[1])?, get_imm(&args[2])?, t1))
}

/// `Zd.T, Zn.T, #imm` (unpredicated immediate, e.g. shifts and logicals)
pub fn z_zimm(args: &[String]) -> Option<(u32, u32, i64, T)> {
    if args.len() != 3 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let (zn, t2, _) = get_z(&args[1])?;
    if t1 != t2 {
        return None;
    }
    Some((zd, zn, get_imm(&args[2])?, t1))
}

/// `Zd.T, Zn.T[index]`
pub fn z_zindexed(args: &[String]) -> Option<(u32, u32, i64, T)> {
    if args.len() != 2 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let (zn, t2, index) = get_z(&args[1])?;
    if t1 != t2 {
        return None;
    }
    Some((zd, zn, index, t1))
}

/// `Zd.T, Rn`
pub fn z_r(args: &[String]) -> Option<(u32, u32, T)> {
    if args.len() != 2 {
        return None;
    }
    let (zd, t, _) = get_z(&args[0])?;
    Some((zd, get_r(&args[1])?, t))
}

/// `Zd.T, #imm, Rm`
pub fn z_ir(args: &[String]) -> Option<(u32, i64, u32, T)> {
    if args.len() != 3 {
        return None;
    }
    let (zd, t, _) = get_z(&args[0])?;
    Some((zd, get_imm(&args[1])?, get_r(&args[2])?, t))
}

/// `Zd.T, Rn, #imm`
pub fn z_ri(args: &[String]) -> Option<(u32, u32, i64, T)> {
    if args.len() != 3 {
        return None;
    }
    let (zd, t, _) = get_z(&args[0])?;
    Some((zd, get_r(&args[1])?, get_imm(&args[2])?, t))
}

// ── Predicated vector shapes ─────────────────────────────────────────────

/// `Zd.T, Pg, Zn.T` (predicate qualifier dropped)
pub fn z_p_z(args: &[String]) -> Option<(u32, u32, u32, T)> {
    if args.len() != 3 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let pg = get_p_governing(&args[1])?;
    let (zn, t2, _) = get_z(&args[2])?;
    if t1 != t2 {
        return None;
    }
    Some((zd, pg, zn, t1))
}

/// `Zd.Td, Pg, Zn.Tn` — conversion forms with distinct lane widths.
pub fn z_p_z_tt(args: &[String]) -> Option<(u32, u32, u32, T, T)> {
    if args.len() != 3 {
        return None;
    }
    let (zd, td, _) = get_z(&args[0])?;
    let pg = get_p_governing(&args[1])?;
    let (zn, tn, _) = get_z(&args[2])?;
    Some((zd, pg, zn, td, tn))
}

/// Destructive predicated form: `Zdn.T, Pg, Zdn.T, Zm.T` — the first and
/// third registers must be the same.
pub fn z_p_zz(args: &[String]) -> Option<(u32, u32, u32, T)> {
    let (zd, pg, zn, zm, t) = prefixed_z_p_zz(args)?;
    if zd != zn {
        return None;
    }
    Some((zd, pg, zm, t))
}

/// General predicated three-register form: `Zd.T, Pg, Zn.T, Zm.T` with a
/// possibly distinct destination (the `MOVPRFX` candidate).
pub fn prefixed_z_p_zz(args: &[String]) -> Option<(u32, u32, u32, u32, T)> {
    if args.len() != 4 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let pg = get_p_governing(&args[1])?;
    let (zn, t2, _) = get_z(&args[2])?;
    let (zm, t3, _) = get_z(&args[3])?;
    if t1 != t2 || t2 != t3 {
        return None;
    }
    Some((zd, pg, zn, zm, t1))
}

/// Multiply-accumulate shape `Zdn.T, Pg, Zm.T, Za.T` (no equality
/// constraints).
pub fn z2_p_zz(args: &[String]) -> Option<(u32, u32, u32, u32, T)> {
    prefixed_z_p_zz(args)
}

/// Accumulator shape `Zda.T, Pg, Zn.T, Zm.T` (fmla and friends).
pub fn z_p_zz2(args: &[String]) -> Option<(u32, u32, u32, u32, T)> {
    prefixed_z_p_zz(args)
}

/// Four-operand select shape `Zd.T, Pv, Zn.T, Zm.T`.
pub fn z_p_zz_4(args: &[String]) -> Option<(u32, u32, u32, u32, T)> {
    prefixed_z_p_zz(args)
}

/// Predicated immediate shift: `Zd.T, Pg, Zn.T, #imm`.
pub fn z_p_zimm(args: &[String]) -> Option<(u32, u32, u32, i64, T)> {
    if args.len() != 4 {
        return None;
    }
    let (zd, t1, _) = get_z(&args[0])?;
    let pg = get_p_governing(&args[1])?;
    let (zn, t2, _) = get_z(&args[2])?;
    if t1 != t2 {
        return None;
    }
    Some((zd, pg, zn, get_imm(&args[3])?, t1))
}

// ── Predicate destinations ───────────────────────────────────────────────

/// `Pg, Pn` — either side may carry a `.T`; a bare left side pairs with a
/// `.b` right side (`ptest p4, p5.b`).
pub fn p_p(args: &[String]) -> Option<(u32, u32, T)> {
    if args.len() != 2 {
        return None;
    }
    let parse = |s: &str| -> Option<(u32, T)> {
        if let Some(p) = get_p(s) {
            return Some((p, None));
        }
        get_p_typed(s).map(|(p, t)| (p, Some(t)))
    };
    let (pg, t1) = parse(&args[0])?;
    let (pn, t2) = parse(&args[1])?;
    if t1 == t2 || (t1.is_none() && t2 == Some(ElementType::B)) {
        return Some((pg, pn, t1));
    }
    None
}

/// `Pd.T, Pg/Z, Zn.T, Zm.T` (vector compares)
pub fn p_p_zz(args: &[String]) -> Option<(u32, u32, u32, u32, T)> {
    if args.len() != 4 {
        return None;
    }
    let (pd, t1) = get_p_typed(&args[0])?;
    let pg = get_p_governing(&args[1])?;
    let (zn, t2, _) = get_z(&args[2])?;
    let (zm, t3, _) = get_z(&args[3])?;
    if Some(t1) != t2 || t2 != t3 {
        return None;
    }
    Some((pd, pg, zn, zm, t2))
}

/// `Pd.T, Pg/Z, Zn.T, #imm` (compare with immediate)
pub fn p_p_zi(args: &[String]) -> Option<(u32, u32, u32, i64, T)> {
    if args.len() != 4 {
        return None;
    }
    let (pd, t1) = get_p_typed(&args[0])?;
    let pg = get_p_governing(&args[1])?;
    let (zn, t2, _) = get_z(&args[2])?;
    if Some(t1) != t2 {
        return None;
    }
    Some((pd, pg, zn, get_imm(&args[3])?, t2))
}

// ── Vector memory shapes ─────────────────────────────────────────────────

/// `Zt, [Xn{, #imm, MUL VL}]` (LDR/STR vector)
pub fn z_bi(args: &[String]) -> Option<(u32, u32, i64)> {
    if args.len() < 2 {
        return None;
    }
    let (zt, _, _) = get_z(&args[0])?;
    let (xn, imm) = mem_addr_mul_vl(&args[1..])?;
    Some((zt, xn, imm))
}

/// `Pt, [Xn{, #imm, MUL VL}]` (LDR/STR predicate)
pub fn p_bi(args: &[String]) -> Option<(u32, u32, i64)> {
    if args.len() < 2 {
        return None;
    }
    let pt = get_p(&args[0])?;
    let (xn, imm) = mem_addr_mul_vl(&args[1..])?;
    Some((pt, xn, imm))
}

/// Gather/scatter: `{ Zt.T }, Pg, [Xn, Zm.T{, SXTW|UXTW}]`.
pub fn z_p_bz(args: &[String]) -> Option<(u32, u32, u32, u32, u32, T)> {
    if args.len() != 7 || args[0] != "{" || args[2] != "}" {
        return None;
    }
    let (zt, t, _) = get_z(&args[1])?;
    let pg = get_p_governing(&args[3])?;
    if !args[4].starts_with('[') {
        return None;
    }
    let (rn, zm, xs, tm) = mem_addr_vectored(&args[4..])?;
    if t != tm {
        return None;
    }
    Some((zt, pg, rn, zm, xs, t))
}

/// Contiguous with immediate: `{ Zt.T }, Pg, [Xn{, #imm, MUL VL}]`.
pub fn z_p_bi(args: &[String]) -> Option<(u32, u32, u32, i64, T)> {
    if args.len() < 4 || args[0] != "{" || args[2] != "}" {
        return None;
    }
    let (zt, t, _) = get_z(&args[1])?;
    let pg = get_p_governing(&args[3])?;
    if args.len() == 4 {
        return None;
    }
    if !args[4].starts_with('[') {
        return None;
    }
    let (rn, imm) = mem_addr_imm(&args[4..])?;
    Some((zt, pg, rn, imm, t))
}

/// Contiguous with scaled index: `{ Zt.T }, Pg, [Xn, Xm, LSL #2|#3]`.
pub fn z_p_rr(args: &[String]) -> Option<(u32, u32, u32, u32, u32, T)> {
    if args.len() != 8 || args[0] != "{" || args[2] != "}" {
        return None;
    }
    if !args[6].eq_ignore_ascii_case("lsl") || (args[7] != "#3]" && args[7] != "#2]") {
        return None;
    }
    let (zt, t, _) = get_z(&args[1])?;
    let pg = get_p_governing(&args[3])?;
    let rn = get_r(&args[4].replace('[', ""))?;
    let rm = get_r(&args[5])?;
    let shift: u32 = args[7].replace(['#', ']'], "").parse().ok()?;
    Some((zt, pg, rn, rm, shift, t))
}

/// Four-consecutive-register list: `{ Zt.T, Z(t+1).T, Z(t+2).T,
/// Z(t+3).T }, Pg, [Xn, Xm]`.
pub fn zt4_p_rr(args: &[String]) -> Option<(u32, u32, u32, u32, T)> {
    if args.len() != 9 || args[0] != "{" || args[5] != "}" {
        return None;
    }
    let (zt, t, _) = get_z(&args[1])?;
    for k in 1..4u32 {
        let (z_next, t_next, _) = get_z(&args[1 + k as usize])?;
        if z_next != zt + k || t_next != t {
            return None;
        }
    }
    let pg = get_p_governing(&args[6])?;
    let rn = get_r(&args[7].replace('[', ""))?;
    let rm = get_r(&args[8].replace(']', ""))?;
    Some((zt, pg, rn, rm, t))
}
