//! Pinned instruction→opcode corpus.
//!
//! Every entry pins the exact word (or DWORD pair) the host `as`
//! assembler emits for the same text, so the encoder contract is
//! bit-exact equivalence. Entries are grouped the way the output file
//! renders them: single `WORD`s, then `MOVPRFX` pairs.

use sve_asm::{assemble, Encoded};

fn word(ins: &str) -> u32 {
    match assemble(ins) {
        Ok(Encoded::Word(w)) => w,
        Ok(Encoded::Pair { prefix, base }) => {
            panic!("`{ins}` unexpectedly paired: prefix={prefix:#010x} base={base:#010x}")
        }
        Err(e) => panic!("`{ins}` failed: {e}"),
    }
}

fn dword(ins: &str) -> u64 {
    match assemble(ins) {
        Ok(enc @ Encoded::Pair { .. }) => enc.dword().unwrap(),
        Ok(Encoded::Word(w)) => panic!("`{ins}` unexpectedly single: {w:#010x}"),
        Err(e) => panic!("`{ins}` failed: {e}"),
    }
}

fn check_words(cases: &[(&str, u32)]) {
    for &(ins, want) in cases {
        let got = word(ins);
        assert_eq!(
            got, want,
            "`{ins}`: got {got:#010x} want {want:#010x}\n got: {got:032b}\nwant: {want:032b}"
        );
    }
}

fn check_dwords(cases: &[(&str, u64)]) {
    for &(ins, want) in cases {
        let got = dword(ins);
        assert_eq!(
            got, want,
            "`{ins}`: got {got:#018x} want {want:#018x}\n got: {got:064b}\nwant: {want:064b}"
        );
    }
}

#[test]
fn scalar_arithmetic() {
    check_words(&[
        ("add x14, x14, x15", 0x8b0f01ce),
        ("add x9, x9, x15", 0x8b0f0129),
        ("add x1, x2, x3, lsl #1", 0x8b030441),
        ("add x2, x3, x4, lsr #2", 0x8b440862),
        ("add x3, x4, x5, asr #3", 0x8b850c83),
        ("add x8, x8, #64", 0x91010108),
        ("add x2, x1, #0x20, lsl #0", 0x91008022),
        ("add x2, x1, #0x20, lsl #12", 0x91408022),
        ("add x2, x1, w0, sxtb", 0x8b208022),
        ("add x2, x1, x0, sxtb", 0x8b208022),
        ("add x2, x1, w0, uxth #2", 0x8b202822),
        ("add x2, x1, x0, uxth #2", 0x8b202822),
        ("adds x0, x1, x2, uxtb #3", 0xab220c20),
        ("sub x1, x2, x3, uxth #4", 0xcb233041),
        ("subs x2, x3, x4, uxtw #5", 0xeb245462),
        ("subs x0, x0, #1", 0xf1000400),
        ("sub x16, x2, #124", 0xd101f050),
        ("sub x9, x9, x5", 0xcb050129),
        ("adc x1, x2, x3", 0x9a030041),
        ("adcs x4, x5, x6", 0xba0600a4),
        ("sbc x7, x8, x9", 0xda090107),
        ("sbcs x10, x11, x12", 0xfa0c016a),
        ("addvl x2, x2, #1", 0x04225022),
        ("rdvl x16, #2", 0x04bf5050),
        ("udiv x0, x0, x1", 0x9ac10800),
        ("sdiv x0, x1, x2", 0x9ac20c20),
        ("madd x0, x1, x2, x3", 0x9b020c20),
        ("mul x0, x1, x2", 0x9b027c20),
        ("msub x10, x11, x12, x13", 0x9b0cb56a),
        ("mneg x10, x11, x12", 0x9b0cfd6a),
        ("neg x1, x2", 0xcb0203e1),
        ("neg x1, x2, asr #3", 0xcb820fe1),
        ("negs x10, x12, lsr #31", 0xeb4c7fea),
        ("ngc x12, x13", 0xda0d03ec),
        ("ngcs x14, x15", 0xfa0f03ee),
        ("abs x1, x2", 0xdac02041),
    ])
}

#[test]
fn scalar_shifts_and_bitfields() {
    check_words(&[
        ("lsr x0, x0, #6", 0xd346fc00),
        ("lsl x0, x0, #6", 0xd37ae400),
        ("lsrv x0, x1, x2", 0x9ac22420),
        ("lsr x0, x1, x2", 0x9ac22420),
        ("lslv x0, x1, x2", 0x9ac22020),
        ("lsl x0, x1, x2", 0x9ac22020),
        ("asr x1, x2, #3", 0x9343fc41),
        ("extr x0, x1, x2, #3", 0x93c20c20),
        ("extr x20, x21, x22, #63", 0x93d6feb4),
        ("ror x10, x11, #63", 0x93cbfd6a),
        ("ror x2, x3, x4", 0x9ac42c62),
        ("rorv x2, x3, x4", 0x9ac42c62),
        ("sbfiz x5, x10, #63, #1", 0x93410145),
        ("sbfiz x5, x10, #55, #9", 0x93492145),
        ("sbfiz x5, x10, #54, #10", 0x934a2545),
        ("sbfiz x5, x10, #1, #63", 0x937ff945),
        ("sbfx x5, x10, #0, #1", 0x93400145),
        ("sbfx x5, x10, #0, #63", 0x9340f945),
        ("sbfx x5, x10, #10, #1", 0x934a2945),
        ("sbfx x5, x10, #10, #2", 0x934a2d45),
        ("sbfx x5, x10, #10, #50", 0x934aed45),
        ("sbfx x5, x10, #10, #53", 0x934af945),
        ("sbfx x5, x10, #62, #1", 0x937ef945),
        ("asr x5, x10, #10", 0x934afd45),
        ("asr x5, x10, #62", 0x937efd45),
        ("asr x5, x10, #63", 0x937ffd45),
        ("sxtb x5, x10", 0x93401d45),
        ("sxth x5, x10", 0x93403d45),
        ("sxtw x5, x10", 0x93407d45),
        ("lsl x5, x10, #63", 0xd3410145),
        ("ubfiz x5, x10, #63, #1", 0xd3410145),
        ("lsl x5, x10, #1", 0xd37ff945),
        ("ubfiz x5, x10, #1, #63", 0xd37ff945),
        ("lsl x5, x10, #54", 0xd34a2545),
        ("ubfiz x5, x10, #54, #10", 0xd34a2545),
        ("ubfiz x5, x10, #54, #1", 0xd34a0145),
        ("ubfiz x5, x10, #54, #2", 0xd34a0545),
        ("ubfx x5, x10, #0, #1", 0xd3400145),
        ("ubfx x5, x10, #0, #63", 0xd340f945),
        ("uxtb x5, x10", 0x53001d45),
        ("uxth x5, x10", 0x53003d45),
        ("bfxil x5, x10, #1, #1", 0xb3410545),
        ("bfxil x5, x10, #1, #20", 0xb3415145),
        ("bfxil x5, x10, #1, #63", 0xb341fd45),
        ("bfxil x5, x10, #54, #1", 0xb376d945),
        ("bfxil x5, x10, #54, #10", 0xb376fd45),
        ("bfc x5, #54, #1", 0xb34a03e5),
        ("bfc x5, #2, #60", 0xb37eefe5),
        ("bfi x5, x10, #2, #60", 0xb37eed45),
    ])
}

#[test]
fn scalar_compare_and_logic() {
    check_words(&[
        ("cmp x6, #2", 0xf10008df),
        ("cmp x7, #1234", 0xf11348ff),
        ("cmp x7, #1234, lsl #0", 0xf11348ff),
        ("cmp x8, #4095, lsl #12", 0xf17ffd1f),
        ("cmn x8, #4095, lsl #12", 0xb17ffd1f),
        ("cmp x13, x21", 0xeb1501bf),
        ("cmp x13, x21, lsl #2", 0xeb1509bf),
        ("cmn x13, x21", 0xab1501bf),
        ("cmn x13, x21, lsr #2", 0xab5509bf),
        ("tst x0, x0", 0xea00001f),
        ("tst x6, #0x3ff", 0xf24024df),
        ("and x10, x11, #0xf", 0x92400d6a),
        ("ands x10, x11, #0xff", 0xf2401d6a),
        ("eor x10, x11, #0xfff", 0xd2402d6a),
        ("orr x10, x11, #0xffff", 0xb2403d6a),
        ("and x10, x11, #0xfffff", 0x92404d6a),
        ("and x10, x11, #0xffffff", 0x92405d6a),
        ("and x10, x11, #0xfffffff", 0x92406d6a),
        ("and x10, x11, #0xffffffff", 0x92407d6a),
        ("and x10, x11, #0xfffffffff", 0x92408d6a),
        ("and x10, x11, #0xffffffffff", 0x92409d6a),
        ("and x10, x11, #0xfffffffffff", 0x9240ad6a),
        ("and x10, x11, #0xffffffffffff", 0x9240bd6a),
        ("and x10, x11, #0xfffffffffffff", 0x9240cd6a),
        ("and x10, x11, #0xffffffffffffff", 0x9240dd6a),
        ("and x10, x11, #0xfffffffffffffff", 0x9240ed6a),
        ("and x10, x11, #0xffffffffffffffff", 0x9240fd6a),
        ("and x1, x2, x3, lsl #4", 0x8a031041),
        ("ands x1, x2, x3, lsr #4", 0xea431041),
        ("eor x1, x2, x3, asr #4", 0xca831041),
        ("eon x1, x2, x3, lsl #4", 0xca231041),
        ("orr x1, x2, x3, lsl #4", 0xaa031041),
        ("orn x1, x2, x3, lsl #4", 0xaa231041),
        ("mvn x1, x3, lsl #4", 0xaa2313e1),
        ("orr x9, xzr, x6, lsl #2", 0xaa060be9),
        ("orr x9, xzr, x6, lsl #0", 0xaa0603e9),
        ("orr x9, xzr, x6", 0xaa0603e9),
        ("mov x9, x6", 0xaa0603e9),
        ("ands x14, x28, #7", 0xf2400b8e),
        ("bic x0, x1, x2, lsr #3", 0x8a620c20),
        ("bics x10, x11, x12, lsr #13", 0xea6c356a),
        ("cls x2, x3", 0xdac01462),
        ("clz x3, x4", 0xdac01083),
        ("ctz x4, x5", 0xdac018a4),
        ("cnt x5, x6", 0xdac01cc5),
        ("rbit x6, x7", 0xdac000e6),
        ("rev x7, x8", 0xdac00d07),
        ("rev16 x8, x9", 0xdac00528),
        ("rev32 x9, x10", 0xdac00949),
        ("rev64 x10, x11", 0xdac00d6a),
        ("mvn x0, x0", 0xaa2003e0),
    ])
}

#[test]
fn moves_and_aliases() {
    check_words(&[
        ("mov x1, #0xffff", 0xd29fffe1),
        ("mov x1, #0xffff, lsl #16", 0xd2bfffe1),
        ("mov x1, #0xffff, lsl #32", 0xd2dfffe1),
        ("mov x1, #0xffff, lsl #48", 0xd2ffffe1),
        ("mov x1, #0xffff0000", 0xd2bfffe1),
        ("mov x1, #0xffff00000000", 0xd2dfffe1),
        ("mov x1, #0xffff000000000000", 0xd2ffffe1),
        ("movk x1, #0xffff", 0xf29fffe1),
        ("movk x1, #0xffff, lsl #16", 0xf2bfffe1),
        ("movk x1, #0xffff, lsl #32", 0xf2dfffe1),
        ("movk x1, #0xffff, lsl #48", 0xf2ffffe1),
        ("movk x1, #0xffff0000", 0xf2bfffe1),
        ("movk x1, #0xffff00000000", 0xf2dfffe1),
        ("movk x1, #0xffff000000000000", 0xf2ffffe1),
        ("movn x1, #0xffff", 0x929fffe1),
        ("movn x1, #0xffff0000", 0x92bfffe1),
        ("movn x1, #0xffff00000000", 0x92dfffe1),
        ("movn x1, #0xffff000000000000", 0x92ffffe1),
        ("mov x1, #0xffffffffffff0000", 0x929fffe1),
        ("mov x1, #0xffffffff0000ffff", 0x92bfffe1),
        ("mov x1, #0xffff0000ffffffff", 0x92dfffe1),
        ("mov x1, #0xffffffffffff", 0x92ffffe1),
        ("mov x10, x1", 0xaa0103ea),
        ("nop", 0xd503201f),
        ("ret", 0xd65f03c0),
        ("br x15", 0xd61f01e0),
        ("blr x3", 0xd63f0060),
        ("svc #0x80", 0xd4001001),
    ])
}

#[test]
fn conditional_select_family() {
    check_words(&[
        ("csel x1, x2, x3, eq", 0x9a830041),
        ("csel x1, x2, x3, ne", 0x9a831041),
        ("csel x1, x2, x3, cs", 0x9a832041),
        ("csel x1, x2, x3, cc", 0x9a833041),
        ("csel x1, x2, x3, mi", 0x9a834041),
        ("csel x1, x2, x3, pl", 0x9a835041),
        ("csel x1, x2, x3, vs", 0x9a836041),
        ("csel x1, x2, x3, vc", 0x9a837041),
        ("csel x1, x2, x3, hi", 0x9a838041),
        ("csel x1, x2, x3, ls", 0x9a839041),
        ("csel x1, x2, x3, ge", 0x9a83a041),
        ("csel x1, x2, x3, lt", 0x9a83b041),
        ("csel x1, x2, x3, gt", 0x9a83c041),
        ("csel x1, x2, x3, le", 0x9a83d041),
        ("csel x1, x2, x3, al", 0x9a83e041),
        ("csel x1, x2, x3, nv", 0x9a83f041),
        ("csinc x10, x11, x12, eq", 0x9a8c056a),
        ("csinc x10, x11, x12, ne", 0x9a8c156a),
        ("cinc x10, x11, eq", 0x9a8b156a),
        ("cinc x10, x11, ne", 0x9a8b056a),
        ("cset x20, cc", 0x9a9f27f4),
        ("cset x20, cs", 0x9a9f37f4),
        ("csneg x1, x2, x3, eq", 0xda830441),
        ("csneg x1, x2, x3, ne", 0xda831441),
        ("cneg x1, x2, eq", 0xda821441),
        ("cneg x1, x2, ne", 0xda820441),
        ("csinv x1, x2, x3, cc", 0xda833041),
        ("cinv x1, x2, cc", 0xda822041),
        ("csetm x1, cc", 0xda9f23e1),
    ])
}

#[test]
fn loads_stores_and_atomics() {
    check_words(&[
        ("ldrh w1, [x0, #4]", 0x79400801),
        ("ldrh w3, [x0]", 0x79400003),
        ("adr x2, #1234", 0x50002682),
        ("adr x1, #256", 0x10000801),
        ("adr x2, #-1024", 0x10ffe002),
        ("adr x3, #-516", 0x10ffefe3),
        ("str x1, [x2]", 0xf9000041),
        ("str x10, [x20, #123]!", 0xf807be8a),
        ("str x10, [x20, #32760]", 0xf93ffe8a),
        ("ldr x23, [x17, x22, lsl #3]", 0xf8767a37),
        ("str x20, [x4, x13, lsl #3]", 0xf82d7894),
        ("str x2, [sp, #8]", 0xf90007e2),
        ("ldr x20, [x14, #0x1f8]", 0xf940fdd4),
        ("ldr x0, [x4], #8", 0xf8408480),
        ("ldr x0, [x4, #8]!", 0xf8408c80),
        ("ldr x0, [x4, #32760]", 0xf97ffc80),
        ("ldrb x1, [x5], #1", 0x384014a1),
        ("ldrb x1, [x5, #1]!", 0x38401ca1),
        ("ldrb x1, [x5, #4095]", 0x397ffca1),
        ("ldrh x2, [x6], #2", 0x784024c2),
        ("ldrh x3, [x7, #255]!", 0x784ffce3),
        ("ldrh x4, [x8, #8190]", 0x797ffd04),
        ("cas x0, x1, [x0]", 0xc8a07c01),
        ("casa x2, x3, [x1]", 0xc8e27c23),
        ("casal x4, x5, [x2]", 0xc8e4fc45),
        ("casl x6, x7, [x3]", 0xc8a6fc67),
        ("casb x8, x9, [x0]", 0x08a87c09),
        ("casab x10, x11, [x1]", 0x08ea7c2b),
        ("casalb x12, x13, [x2]", 0x08ecfc4d),
        ("caslb x14, x15, [x3]", 0x08aefc6f),
        ("cash x16, x17, [x0]", 0x48b07c11),
        ("casah x18, x19, [x1]", 0x48f27c33),
        ("casalh x20, x21, [x2]", 0x48f4fc55),
        ("caslh x22, x23, [x3]", 0x48b6fc77),
        ("casp x10, x11, x20, x21, [x0]", 0x482a7c14),
        ("caspa x12, x13, x22, x23, [x1]", 0x486c7c36),
        ("caspal x14, x15, x24, x25, [x2]", 0x486efc58),
        ("caspl x16, x17, x26, x27, [x3]", 0x4830fc7a),
    ])
}

#[test]
fn vector_arithmetic_and_permute() {
    check_words(&[
        ("mov z2.d, x15", 0x05e039e2),
        ("and z6.d, z6.d, z2.d", 0x042230c6),
        ("and z5.d, z5.d, z2.d", 0x042230a5),
        ("add z1.d, z2.d, z3.d", 0x04e30041),
        ("add z1.d, p1/M, z1.d, z3.d", 0x04c00461),
        ("mul z7.h, z1.h, z12.h", 0x046c6027),
        ("mul z11.s, p1/M, z11.s, z10.s", 0x0490054b),
        ("mul z13.h, p1/M, z13.h, z12.h", 0x0450058d),
        ("tbl z5.b, z3.b, z5.b", 0x05253065),
        ("tbl z6.b, z4.b, z8.b", 0x05283086),
        ("tbl z7.b, { z9.b, z10.b }, z11.b", 0x052b2927),
        ("eor z0.d, z4.d, z3.d", 0x04a33080),
        ("dup z2.b, z2.b[0]", 0x05212042),
        ("dup z3.s, w4", 0x05a03883),
        ("mov z3.s, w4", 0x05a03883),
        ("dup z5.d, x6", 0x05e038c5),
        ("mov z5.d, x6", 0x05e038c5),
        ("lsr z7.d, z6.d, #4", 0x04fc94c7),
        ("lsr z8.d, z5.d, #4", 0x04fc94a8),
        ("eor3 z0.d, z0.d, z3.d, z4.d", 0x04233880),
        ("mad z11.d, p1/m, z12.d, z13.d", 0x04ccc5ab),
        ("mls z11.d, p1/m, z12.d, z13.d", 0x04cd658b),
        ("compact z1.d, p1, z2.d", 0x05e18441),
        ("zip1 z1.d, z2.d, z3.d", 0x05e36041),
        ("zip2 z1.s, z2.s, z3.s", 0x05a36441),
        ("uzp1 z4.s, z5.s, z6.s", 0x05a668a4),
        ("uzp2 z7.s, z8.s, z9.s", 0x05a96d07),
        ("trn1 z1.s, z2.s, z3.s", 0x05a37041),
        ("trn2 z4.s, z5.s, z6.s", 0x05a674a4),
        ("rev z1.d, z2.d", 0x05f83841),
        ("revb z1.d, p2/M, z3.d", 0x05e48861),
        ("revh z4.d, p5/M, z6.d", 0x05e594c4),
        ("revw z4.d, p5/M, z6.d", 0x05e694c4),
        ("sdot z28.s, z22.b, z26.b", 0x449a02dc),
        ("fcvt z17.s, p0/m, z17.h", 0x6589a231),
        ("fmul z18.s, z18.s, z17.s", 0x65910a52),
        ("scvtf z17.s, p0/m, z17.s", 0x6594a231),
        ("fmla z31.s, p0/M, z17.s, z18.s", 0x65b2023f),
        ("add z22.b, z22.b, z22.b", 0x043602d6),
        ("splice z10.s, p1/M, z10.s, z11.s", 0x05ac856a),
        ("sel z10.s, p1/M, z11.s, z12.s", 0x05acc56a),
        ("orr z11.d, z21.d, z31.d", 0x047f32ab),
        ("sub z10.d, z20.d, z30.d", 0x04fe068a),
        ("sub z29.s, z29.s, #136", 0x25a1d11d),
        ("mov z10.s, p6/m,  z21.s", 0x05aadaaa),
        ("pmullb z2.q, z0.d, z1.d", 0x45016802),
        ("pmullt z5.q, z4.d, z3.d", 0x45036c85),
        ("histseg z1.b, z2.b, z3.b", 0x4523a041),
        ("histcnt z10.s, p2/z, z11.s, z12.s", 0x45acc96a),
        ("histcnt z11.d, p3/z, z12.d, z13.d", 0x45edcd8b),
    ])
}

#[test]
fn vector_immediates() {
    check_words(&[
        ("dup z0.b, #15", 0x2538c1e0),
        ("mov z0.b, #15", 0x2538c1e0),
        ("dup z0.b, #-15", 0x2538de20),
        ("mov z0.b, #-15", 0x2538de20),
        ("dup z22.s, #-32768", 0x25b8f016),
        ("mov z22.s, #-32768", 0x25b8f016),
        ("dup z22.s, #0x7f00", 0x25b8eff6),
        ("mov z22.s, #0x7f00", 0x25b8eff6),
        ("dup z22.s, #256", 0x25b8e036),
        ("mov z22.s, #256", 0x25b8e036),
        ("dup z22.s, #-256", 0x25b8fff6),
        ("mov z22.s, #-256", 0x25b8fff6),
        ("dup z22.s, #32512", 0x25b8eff6),
        ("dup z1.h, #7", 0x2578c0e1),
        ("dup z2.s, #5", 0x25b8c0a2),
        ("dup z3.d, #11", 0x25f8c163),
        ("dup z22.b, #64", 0x2538c816),
        ("and z0.b, z0.b, #1", 0x05800600),
        ("and z0.b, z0.b, #0x7f", 0x058006c0),
        ("and z0.b, z0.b, #0x80", 0x05800e00),
        ("and z0.b, z0.b, #0xfe", 0x05803ec0),
        ("and z1.h, z1.h, #1", 0x05800401),
        ("and z1.h, z1.h, #0x7fff", 0x058005c1),
        ("and z1.h, z1.h, #0x8000", 0x05800c01),
        ("and z1.h, z1.h, #0xfffe", 0x05807dc1),
        ("and z2.s, z2.s, #1", 0x05800002),
        ("and z2.s, z2.s, #0x7fffffff", 0x058003c2),
        ("and z2.s, z2.s, #0x80000000", 0x05800802),
        ("and z2.s, z2.s, #0xfffffffe", 0x0580fbc2),
        ("and z3.d, z3.d, #1", 0x05820003),
        ("and z3.d, z3.d, #0x7fffffffffffffff", 0x058207c3),
        ("and z3.d, z3.d, #0x8000000000000000", 0x05820803),
        ("and z3.d, z3.d, #0xfffffffffffffffe", 0x0583ffc3),
        ("and z11.b, z11.b, #254", 0x05803ecb),
        ("eor z11.b, z11.b, #254", 0x05403ecb),
        ("orr z11.b, z11.b, #254", 0x05003ecb),
        ("dupm z11.b, #254", 0x05c03ecb),
        ("dupm z12.h, #0xfffe", 0x05c07dcc),
        ("dupm z13.s, #0xfffffffe", 0x05c0fbcd),
        ("dupm z14.d, #0xfffffffffffffffe", 0x05c3ffce),
        ("index z12.b, #0, #4", 0x0424400c),
        ("index z13.b, #-16, #15", 0x042f420d),
        ("index z14.b, #15, #-16", 0x043041ee),
        ("index z15.h, #11, w23", 0x0477496f),
        ("index z16.s, #15, w24", 0x04b849f0),
        ("index z17.d, #-16, x25", 0x04f94a11),
        ("index z18.b, w26, #15", 0x042f4752),
        ("index z19.h, w27, #-16", 0x04704773),
        ("index z20.s, w28, #-15", 0x04b14794),
        ("index z21.d, x29, #14", 0x04ee47b5),
        ("insr z0.s, w1", 0x05a43820),
        ("insr z1.d, x2", 0x05e43841),
    ])
}

#[test]
fn vector_predicated_and_shifts() {
    check_words(&[
        ("asr z16.d, z16.d, #0x3f", 0x04a19210),
        ("asr z16.d, z16.d, #0x1", 0x04ff9210),
        ("asr z17.s, z17.s, #0x1f", 0x04619231),
        ("asr z17.s, z17.s, #0x1", 0x047f9231),
        ("asr z18.h, z18.h, #0xf", 0x04319252),
        ("asr z18.h, z18.h, #0x1", 0x043f9252),
        ("asr z19.b, z19.b, #7", 0x04299273),
        ("asr z19.b, z19.b, #1", 0x042f9273),
        ("lsl z13.d, z14.d, #1", 0x04a19dcd),
        ("lsl z13.d, z14.d, #8", 0x04a89dcd),
        ("lsl z13.d, z14.d, #63", 0x04ff9dcd),
        ("lsl z13.s, z14.s, #1", 0x04619dcd),
        ("lsl z13.s, z14.s, #8", 0x04689dcd),
        ("lsl z13.s, z14.s, #31", 0x047f9dcd),
        ("lsl z13.h, z14.h, #1", 0x04319dcd),
        ("lsl z13.h, z14.h, #8", 0x04389dcd),
        ("lsl z13.h, z14.h, #15", 0x043f9dcd),
        ("lsl z13.b, z14.b, #1", 0x04299dcd),
        ("lsl z13.b, z14.b, #7", 0x042f9dcd),
        ("and z4.s, p3/M, z4.s, z5.s", 0x049a0ca4),
        ("asr z4.s, p3/M, z4.s, z5.s", 0x04908ca4),
        ("asrr z4.s, p3/M, z4.s, z5.s", 0x04948ca4),
        ("bic z4.s, p3/M, z4.s, z5.s", 0x049b0ca4),
        ("clasta z4.s, p3/M, z4.s, z5.s", 0x05a88ca4),
        ("clastb z4.s, p3/M, z4.s, z5.s", 0x05a98ca4),
        ("eor z4.s, p3/M, z4.s, z5.s", 0x04990ca4),
        ("lsl z4.s, p3/M, z4.s, z5.s", 0x04938ca4),
        ("lslr z4.s, p3/M, z4.s, z5.s", 0x04978ca4),
        ("lsr z4.s, p3/M, z4.s, z5.s", 0x04918ca4),
        ("lsrr z4.s, p3/M, z4.s, z5.s", 0x04958ca4),
        ("orr z4.s, p3/M, z4.s, z5.s", 0x04980ca4),
        ("sabd z4.s, p3/M, z4.s, z5.s", 0x048c0ca4),
        ("sdiv  z24.s, p3/M, z24.s, z25.s", 0x04940f38),
        ("sdivr z4.s, p3/M, z4.s, z5.s", 0x04960ca4),
        ("smin z4.s, p3/M, z4.s, z5.s", 0x048a0ca4),
        ("smulh z4.s, p3/M, z4.s, z5.s", 0x04920ca4),
        ("sub z4.s, p3/M, z4.s, z5.s", 0x04810ca4),
        ("subr z4.s, p3/M, z4.s, z5.s", 0x04830ca4),
        ("uabd z4.s, p3/M, z4.s, z5.s", 0x048d0ca4),
        ("lsr   z6.h, p3/m, z6.h, #8", 0x04018f06),
        ("lsr   z7.s, p5/m, z7.s, #16", 0x04419607),
        ("lsr   z11.s, p6/m, z11.s, #8", 0x04419b0b),
        ("lsr   z18.s, z22.s, #26", 0x046696d2),
        ("lsr   z18.s, z22.s, #16", 0x047096d2),
        ("lsr   z18.s, z22.s, #24", 0x046896d2),
        ("lsr   z18.s, z22.s, #8", 0x047896d2),
        ("clz   z10.s, p7/m, z27.s", 0x0499bf6a),
    ])
}

#[test]
fn predicate_ops_and_compares() {
    check_words(&[
        ("cmpeq p5.s, p6/z, z7.s, #8", 0x258898e5),
        ("cmpeq p5.s, p6/z,  z7.s, z17.s", 0x2491b8e5),
        ("cmpne p15.s, p1/z, z10.s, z20.s", 0x2494a55f),
        ("cmphs p5.s, p6/z,  z6.s, z18.s", 0x249218c5),
        ("cmpls p1.s, p6/z, z26.s, z27.s", 0x249a1b61),
        ("cmphs p1.s, p6/z, z27.s, z26.s", 0x249a1b61),
        ("cmphi p5.s, p6/z,  z6.s, z18.s", 0x249218d5),
        ("cmplo p2.s, p6/z, z26.s, z27.s", 0x249a1b72),
        ("cmphi p2.s, p6/z, z27.s, z26.s", 0x249a1b72),
        ("cmpge p14.s, p2/z, z11.s, z21.s", 0x2495896e),
        ("cmple p13.s, p3/z, z12.s, z22.s", 0x248c8ecd),
        ("cmpge p13.s, p3/z, z22.s, z12.s", 0x248c8ecd),
        ("cmpgt p12.s, p4/z, z13.s, #14", 0x258e11bc),
        ("cmpgt p12.s, p4/z, z13.s, z23.s", 0x249791bc),
        ("cmplt p11.s, p5/z, z14.s, z24.s", 0x248e971b),
        ("cmpgt p11.s, p5/z, z24.s, z14.s", 0x248e971b),
        ("match p12.b, p6/z, z25.b, z26.b", 0x453a9b2c),
        ("nmatch p13.h, p7/z, z27.h, z28.h", 0x457c9f7d),
        ("ptest p4, p5.b", 0x2550d0a0),
        ("ptrue p4.s, VL4", 0x2598e084),
        ("ptrue p3.s", 0x2598e3e3),
        ("rev   p15.s, p15.s", 0x05b441ef),
        ("mov   p6.b, p5.b", 0x258554a6),
    ])
}

#[test]
fn vector_loads_and_stores() {
    check_words(&[
        ("ldr z5, [x1, #1, MUL VL]", 0x85804425),
        ("ldr z6, [x1]", 0x85804026),
        ("ldr p1, [x10]", 0x85800141),
        ("str z0, [x14]", 0xe58041c0),
        ("str z1, [x14, #1, MUL VL]", 0xe58045c1),
        ("str   p1, [x20]", 0xe5800281),
        ("ld1w  { z2.s }, p5/z, [x4, z28.s, sxtw]", 0x855c5482),
        ("ld1w  { z16.s }, p1/z, [x2, x11, lsl #2]", 0xa54b4450),
        ("ld1rw { z27.s }, p7/z, [x20]", 0x8540de9b),
        ("ld1h  { z10.s }, p6/z, [x10, z11.s, sxtw]", 0x84cb594a),
        ("ld1b  { z20.s }, p7/z, [x20, z21.s, uxtw]", 0x84155e94),
        ("ld1b  { z24.b, z25.b, z26.b, z27.b }, p9/z, [x30, x31]", 0xa01f87d8),
        ("ld4b  { z13.b, z14.b, z15.b, z16.b }, p1/z, [x19, x18]", 0xa472c66d),
        ("ld1b {z20.b}, p0/z, [x11, #1, mul vl]", 0xa401a174),
        ("st1d  { z1.d }, p0, [x6, x15, lsl #3]", 0xe5ef40c1),
        ("st1w  { z21.d }, p1, [x6, x15, lsl #2]", 0xe56f44d5),
        ("st1w  { z7.s }, p1, [x2, z29.s, uxtw]", 0xe55d8447),
        ("st1h  { z7.s }, p1, [x10, z29.s, uxtw]", 0xe4dd8547),
        ("st1b  { z7.s }, p1, [x10, z29.s, uxtw]", 0xe45d8547),
        ("st1b  { z11.s }, p7, [x20]", 0xe440fe8b),
    ])
}

#[test]
fn movprfx_forms() {
    check_words(&[
        ("movprfx z28.s, p6/m, z31.s", 0x04913bfc),
        ("movprfx z6.h, p3/z, z2.h", 0x04502c46),
        ("movprfx z7.s, p5/z, z6.s", 0x049034c7),
        ("movprfx z26, z2", 0x0420bc5a),
        ("movprfx z7.s, p5/m, z2.s", 0x04913447),
        ("movprfx z11.s, p6/m, z2.s", 0x0491384b),
        ("movprfx z30, z28", 0x0420bf9e),
        ("movprfx z31, z7", 0x0420bcff),
        ("movprfx z31.s, p1/m, z7.s", 0x049124ff),
        ("movprfx z28.s, p6/z, z31.s", 0x04903bfc),
        ("add z1.s, p1/M, z1.s, z2.s", 0x04800441),
        ("movprfx z1.s, p1/M, z2.s", 0x04912441),
        ("add z1.s, p1/M, z1.s, z3.s", 0x04800461),
    ])
}

#[test]
fn movprfx_merging_pairs() {
    check_dwords(&[
        ("add z1.s, p1/M, z2.s, z3.s", 0x0480046104912441),
        ("mul z1.s, p1/M, z2.s, z3.s", 0x0490046104912441),
        ("and z1.s, p1/M, z2.s, z3.s", 0x049a046104912441),
        ("eor z1.s, p1/M, z2.s, z3.s", 0x0499046104912441),
        ("lsr z1.s, p1/M, z2.s, z3.s", 0x0491846104912441),
        ("lsl z1.s, p1/M, z2.s, z3.s", 0x0493846104912441),
        ("asr z1.s, p1/M, z2.s, z3.s", 0x0490846104912441),
        ("asrr z1.s, p1/M, z2.s, z3.s", 0x0494846104912441),
        ("splice z1.s, p1/M, z2.s, z3.s", 0x05ac846104912441),
        ("bic z1.s, p1/M, z2.s, z3.s", 0x049b046104912441),
        ("clasta z1.s, p1/M, z2.s, z3.s", 0x05a8846104912441),
        ("clastb z1.s, p1/M, z2.s, z3.s", 0x05a9846104912441),
        ("lslr z1.s, p1/M, z2.s, z3.s", 0x0497846104912441),
        ("lsrr z1.s, p1/M, z2.s, z3.s", 0x0495846104912441),
        ("orr z1.s, p1/M, z2.s, z3.s", 0x0498046104912441),
        ("sabd z1.s, p1/M, z2.s, z3.s", 0x048c046104912441),
        ("sdiv  z1.s, p1/M, z2.s, z3.s", 0x0494046104912441),
        ("sdivr z1.d, p1/M, z2.d, z3.d", 0x04d6046104d12441),
        ("sdivr z1.s, p1/M, z2.s, z3.s", 0x0496046104912441),
        ("smin z1.s, p1/M, z2.s, z3.s", 0x048a046104912441),
        ("smulh z1.s, p1/M, z2.s, z3.s", 0x0492046104912441),
        ("sub z1.s, p1/M, z2.s, z3.s", 0x0481046104912441),
        ("subr z1.s, p1/M, z2.s, z3.s", 0x0483046104912441),
        ("uabd z1.s, p1/M, z2.s, z3.s", 0x048d046104912441),
    ])
}

#[test]
fn movprfx_zeroing_pairs() {
    // A zeroing predicate always produces a prefix, even when the
    // destination already equals the first source.
    check_dwords(&[
        ("add z1.s, p1/Z, z2.s, z3.s", 0x0480046104902441),
        ("add z1.s, p1/Z, z1.s, z3.s", 0x0480046104902421),
        ("add z1.s, p1/z, z1.s, z3.s", 0x0480046104902421),
        ("add z1.s, p1/z, z2.s, z3.s", 0x0480046104902441),
        ("add z1.s, p1/m, z2.s, z3.s", 0x0480046104912441),
    ])
}

#[test]
fn movprfx_immediate_shift_pairs() {
    check_dwords(&[
        ("lsr z5.b, p1/m, z1.b, #4", 0x0401858504112425),
        ("lsr z6.h, p3/m, z2.h, #8", 0x04018f0604512c46),
        ("lsr z7.s, p5/m, z3.s, #16", 0x0441960704913467),
        ("lsr z8.d, p7/m, z4.d, #32", 0x04c19c0804d13c88),
    ])
}

#[test]
fn merging_with_same_destination_stays_single() {
    for ins in [
        "add z1.s, p1/M, z1.s, z3.s",
        "add z1.s, p1/m, z1.s, z3.s",
        "mul z11.s, p1/M, z11.s, z10.s",
    ] {
        assert!(
            matches!(assemble(ins), Ok(Encoded::Word(_))),
            "`{ins}` should not need a prefix"
        );
    }
}

#[test]
fn immediate_range_endpoints() {
    // Endpoints of the advertised ranges encode; one past fails.
    assert!(assemble("add x8, x8, #4095").is_ok());
    assert!(assemble("add x8, x8, #4096").is_err());
    assert!(assemble("svc #0xffff").is_ok());
    assert!(assemble("svc #0x10000").is_err());
    assert!(assemble("cmpeq p5.s, p6/z, z7.s, #15").is_ok());
    assert!(assemble("cmpeq p5.s, p6/z, z7.s, #16").is_err());
    assert!(assemble("cmpeq p5.s, p6/z, z7.s, #-16").is_ok());
    assert!(assemble("cmpeq p5.s, p6/z, z7.s, #-17").is_err());
    assert!(assemble("lsr z16.d, z16.d, #64").is_ok());
    assert!(assemble("lsr z16.d, z16.d, #65").is_err());
    assert!(assemble("lsl z13.d, z14.d, #63").is_ok());
    assert!(assemble("lsl z13.d, z14.d, #64").is_err());
    assert!(assemble("rdvl x16, #31").is_ok());
    assert!(assemble("rdvl x16, #32").is_err());
    assert!(assemble("rdvl x16, #-32").is_ok());
    assert!(assemble("rdvl x16, #-33").is_err());
}

#[test]
fn reencoding_pair_base_alone() {
    // Re-encoding with Zd substituted for Zn returns the base opcode
    // alone, with no prefix.
    let pair = assemble("add z1.s, p1/M, z2.s, z3.s").unwrap();
    let base = assemble("add z1.s, p1/M, z1.s, z3.s").unwrap();
    match (pair, base) {
        (Encoded::Pair { base: b, .. }, Encoded::Word(w)) => assert_eq!(b, w),
        other => panic!("unexpected encodings: {other:?}"),
    }
}
