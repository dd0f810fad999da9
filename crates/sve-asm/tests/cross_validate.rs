//! Cross-validation: encode with sve-asm, decode with independent
//! AArch64 decoders (bad64 and yaxpeax-arm), and property-sweep the
//! `MOVPRFX` rules over the register/element-type space.

use proptest::prelude::*;
use sve_asm::{assemble, Encoded};
use yaxpeax_arch::{Decoder as _, U8Reader};
use yaxpeax_arm::armv8::a64::InstDecoder;

// ─── Helpers ──────────────────────────────────────────────────────────────

fn encode_word(source: &str) -> u32 {
    match assemble(source) {
        Ok(Encoded::Word(w)) => w,
        Ok(other) => panic!("`{source}` produced a pair: {other:?}"),
        Err(e) => panic!("`{source}` failed: {e}"),
    }
}

/// Decode one word with bad64 (Binary Ninja's decoder, SVE-aware).
fn bad64_decode(word: u32, source: &str) -> bad64::Instruction {
    bad64::decode(word, 0)
        .unwrap_or_else(|e| panic!("bad64 failed to decode `{source}` → {word:#010x}: {e}"))
}

fn verify_op(source: &str, expected: bad64::Op) {
    let word = encode_word(source);
    let inst = bad64_decode(word, source);
    assert_eq!(
        inst.op(),
        expected,
        "`{source}` → {word:#010x} decoded as `{inst}`"
    );
}

/// Decode one word with yaxpeax-arm and return the formatted text.
fn yax_fmt(word: u32, source: &str) -> String {
    let bytes = word.to_le_bytes();
    let decoder = InstDecoder::default();
    let mut reader = U8Reader::new(&bytes);
    let inst = decoder
        .decode(&mut reader)
        .unwrap_or_else(|e| panic!("yaxpeax failed to decode `{source}` → {word:#010x}: {e}"));
    format!("{inst}")
}

fn verify_yax(source: &str, expected_prefix: &str) {
    let word = encode_word(source);
    let formatted = yax_fmt(word, source);
    assert!(
        formatted.starts_with(expected_prefix),
        "`{source}` → {word:#010x} decoded as `{formatted}`, expected `{expected_prefix}…`"
    );
}

// ─── Scalar spot checks against both decoders ─────────────────────────────

#[test]
fn xv_scalar_arithmetic() {
    verify_op("add x14, x14, x15", bad64::Op::ADD);
    verify_op("adds x0, x1, x2, uxtb #3", bad64::Op::ADDS);
    verify_op("sub x16, x2, #124", bad64::Op::SUB);
    verify_op("madd x0, x1, x2, x3", bad64::Op::MADD);
    verify_op("msub x10, x11, x12, x13", bad64::Op::MSUB);
    verify_op("udiv x0, x0, x1", bad64::Op::UDIV);
    verify_op("sdiv x0, x1, x2", bad64::Op::SDIV);
}

#[test]
fn xv_scalar_logic_and_moves() {
    verify_op("and x10, x11, #0xff", bad64::Op::AND);
    verify_op("orr x1, x2, x3, lsl #4", bad64::Op::ORR);
    verify_op("eor x1, x2, x3, asr #4", bad64::Op::EOR);
    verify_op("bic x0, x1, x2, lsr #3", bad64::Op::BIC);
    verify_op("movk x1, #0xffff, lsl #16", bad64::Op::MOVK);
    // MOV of a wide constant re-materializes through MOVZ/MOVN.
    verify_op("mov x1, #0xffff000000000000", bad64::Op::MOVZ);
    verify_op("mov x1, #0xffffffffffff0000", bad64::Op::MOVN);
}

#[test]
fn xv_scalar_branches_and_memory() {
    verify_op("br x15", bad64::Op::BR);
    verify_op("blr x3", bad64::Op::BLR);
    verify_op("ret", bad64::Op::RET);
    verify_op("nop", bad64::Op::NOP);
    verify_op("ldr x0, [x4], #8", bad64::Op::LDR);
    verify_op("str x10, [x20, #123]!", bad64::Op::STR);
    verify_op("ldrb x1, [x5, #4095]", bad64::Op::LDRB);
    verify_op("ldrh w1, [x0, #4]", bad64::Op::LDRH);
    verify_op("csel x1, x2, x3, ne", bad64::Op::CSEL);
    verify_op("cas x0, x1, [x0]", bad64::Op::CAS);
}

#[test]
fn xv_yaxpeax_agrees_on_scalars() {
    verify_yax("add x14, x14, x15", "add");
    verify_yax("sub x9, x9, x5", "sub");
    verify_yax("mov x1, #0xffff", "movz");
    verify_yax("lsr x0, x0, #6", "lsr");
    verify_yax("ret", "ret");
    verify_yax("udiv x0, x0, x1", "udiv");
}

// ─── SVE spot checks ──────────────────────────────────────────────────────

#[test]
fn xv_sve_vector_ops() {
    verify_op("add z1.d, z2.d, z3.d", bad64::Op::ADD);
    verify_op("mul z7.h, z1.h, z12.h", bad64::Op::MUL);
    verify_op("ptrue p3.s", bad64::Op::PTRUE);
    verify_op("dup z3.s, w4", bad64::Op::DUP);
    verify_op("zip1 z1.d, z2.d, z3.d", bad64::Op::ZIP1);
    verify_op("cmpeq p5.s, p6/z, z7.s, z17.s", bad64::Op::CMPEQ);
    verify_op("movprfx z26, z2", bad64::Op::MOVPRFX);
    verify_op("movprfx z28.s, p6/m, z31.s", bad64::Op::MOVPRFX);
}

#[test]
fn xv_pair_decodes_to_movprfx_then_base() {
    let (prefix, base) = match assemble("mul z1.s, p1/M, z2.s, z3.s").unwrap() {
        Encoded::Pair { prefix, base } => (prefix, base),
        other => panic!("expected pair, got {other:?}"),
    };
    assert_eq!(bad64_decode(prefix, "prefix").op(), bad64::Op::MOVPRFX);
    assert_eq!(bad64_decode(base, "base").op(), bad64::Op::MUL);
}

// ─── Property sweeps ──────────────────────────────────────────────────────

fn element_types() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["b", "h", "s", "d"])
}

proptest! {
    // A distinct destination always yields a (MOVPRFX, base) pair whose
    // prefix decodes as MOVPRFX with the same element size as the base.
    #[test]
    fn prop_distinct_destination_pairs(
        zd in 0u32..32,
        zn in 0u32..32,
        zm in 0u32..32,
        pg in 0u32..8,
        t in element_types(),
    ) {
        prop_assume!(zd != zn);
        let ins = format!("add z{zd}.{t}, p{pg}/m, z{zn}.{t}, z{zm}.{t}");
        let enc = assemble(&ins).unwrap();
        let (prefix, base) = match enc {
            Encoded::Pair { prefix, base } => (prefix, base),
            Encoded::Word(w) => panic!("`{ins}` stayed single: {w:#010x}"),
        };
        prop_assert_eq!(bad64_decode(prefix, &ins).op(), bad64::Op::MOVPRFX);
        // Element size lives in bits 23:22 of both opcodes.
        prop_assert_eq!((prefix >> 22) & 3, (base >> 22) & 3);
    }

    // Merging with destination == first source needs no prefix.
    #[test]
    fn prop_merging_destructive_stays_single(
        zdn in 0u32..32,
        zm in 0u32..32,
        pg in 0u32..8,
        t in element_types(),
    ) {
        let ins = format!("add z{zdn}.{t}, p{pg}/m, z{zdn}.{t}, z{zm}.{t}");
        prop_assert!(matches!(assemble(&ins), Ok(Encoded::Word(_))), "`{}`", ins);
    }

    // A zeroing predicate forces a prefix even in destructive form.
    #[test]
    fn prop_zeroing_always_pairs(
        zdn in 0u32..32,
        zm in 0u32..32,
        pg in 0u32..8,
        t in element_types(),
    ) {
        let ins = format!("add z{zdn}.{t}, p{pg}/z, z{zdn}.{t}, z{zm}.{t}");
        let enc = assemble(&ins).unwrap();
        prop_assert!(enc.is_pair(), "`{}` → {:?}", ins, enc);
        if let Encoded::Pair { prefix, .. } = enc {
            // M=0 marks the zeroing prefix (bit 16).
            prop_assert_eq!((prefix >> 16) & 1, 0);
            prop_assert_eq!(bad64_decode(prefix, &ins).op(), bad64::Op::MOVPRFX);
        }
    }

    // Re-encoding a paired instruction with Zd substituted for Zn gives
    // exactly the base opcode, with no prefix.
    #[test]
    fn prop_patched_reencode_is_base(
        zd in 0u32..32,
        zn in 0u32..32,
        zm in 0u32..32,
        pg in 0u32..8,
        t in element_types(),
    ) {
        prop_assume!(zd != zn);
        let ins = format!("sub z{zd}.{t}, p{pg}/m, z{zn}.{t}, z{zm}.{t}");
        let pair = assemble(&ins).unwrap();
        let zm_patched = if zm == zn { zd } else { zm };
        let destructive =
            format!("sub z{zd}.{t}, p{pg}/m, z{zd}.{t}, z{zm_patched}.{t}");
        let base = assemble(&destructive).unwrap();
        match (pair, base) {
            (Encoded::Pair { base: b, .. }, Encoded::Word(w)) => prop_assert_eq!(b, w),
            other => prop_assert!(false, "unexpected encodings: {:?}", other),
        }
    }

    // Scalar register arithmetic round-trips through bad64.
    #[test]
    fn prop_scalar_add_roundtrips(rd in 0u32..31, rn in 0u32..31, rm in 0u32..31) {
        let ins = format!("add x{rd}, x{rn}, x{rm}");
        let word = encode_word(&ins);
        prop_assert_eq!(bad64_decode(word, &ins).op(), bad64::Op::ADD);
        prop_assert_eq!(word & 0x1f, rd);
        prop_assert_eq!((word >> 5) & 0x1f, rn);
        prop_assert_eq!((word >> 16) & 0x1f, rm);
    }

    // Immediate adds cover the full 12-bit range; one past fails.
    #[test]
    fn prop_add_immediate_range(rd in 0u32..31, imm in 0i64..4096) {
        let ins = format!("add x{rd}, x{rd}, #{imm}");
        let word = encode_word(&ins);
        prop_assert_eq!(bad64_decode(word, &ins).op(), bad64::Op::ADD);
        prop_assert_eq!((word >> 10) & 0xfff, imm as u32);
    }

    // Unpredicated vector adds agree with bad64 for every element type
    // and register triple.
    #[test]
    fn prop_vector_add_decodes(
        zd in 0u32..32,
        zn in 0u32..32,
        zm in 0u32..32,
        t in element_types(),
    ) {
        let ins = format!("add z{zd}.{t}, z{zn}.{t}, z{zm}.{t}");
        let word = encode_word(&ins);
        prop_assert_eq!(bad64_decode(word, &ins).op(), bad64::Op::ADD);
        prop_assert_eq!(word & 0x1f, zd);
        prop_assert_eq!((word >> 5) & 0x1f, zn);
        prop_assert_eq!((word >> 16) & 0x1f, zm);
    }
}
