//! Encoding templates and bit-field substitution.
//!
//! A template is a 32-bit pattern written MSB-first as whitespace-separated
//! tokens, each token either a literal bit or a named field:
//!
//! ```text
//! sf 0 0 0 1 0 1 1 shift 0 Rm imm6 Rn Rd
//! ```
//!
//! Substitution happens at whole-token granularity — a field name only ever
//! matches a complete token, so overlapping names (`Rn` vs `PNg`, `imm6` vs
//! `imm6…`) cannot corrupt neighbouring fields. Setting a field that the
//! template does not contain is a no-op; several dispatch paths share
//! helpers that set fields only some of their templates carry.
//!
//! Anything still alphabetic after substitution is a bug in the dispatch
//! tables, not in user input, and trips a panic in [`Template::encode`].

/// Format `value` as a `width`-digit binary string, left zero-padded.
///
/// # Panics
///
/// If the value does not fit the field width. Field widths come from the
/// encoding tables; an overflow here means a dispatch-site range check is
/// missing.
pub fn bin(value: u32, width: u32) -> String {
    assert!(
        width == 32 || value < (1 << width),
        "field value {value} does not fit in {width} bits"
    );
    format!("{value:0width$b}", width = width as usize)
}

/// One in-progress instruction encoding.
#[derive(Debug, Clone)]
pub struct Template {
    toks: Vec<String>,
}

impl Template {
    /// Parse a template specification into its token list.
    pub fn new(spec: &str) -> Self {
        Template {
            toks: spec.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Replace every token equal to `field` with a literal bit string.
    pub fn bits(mut self, field: &str, bits: &str) -> Self {
        for tok in &mut self.toks {
            if tok == field {
                *tok = bits.to_string();
            }
        }
        self
    }

    /// Substitute a numeric field of the given width.
    pub fn field(self, field: &str, value: u32, width: u32) -> Self {
        let bits = bin(value, width);
        self.bits(field, &bits)
    }

    /// Substitute a single-bit field.
    pub fn bit(self, field: &str, value: u32) -> Self {
        self.field(field, value, 1)
    }

    /// Substitute a 5-bit register number (scalar or vector).
    pub fn reg(self, field: &str, r: u32) -> Self {
        self.field(field, r, 5)
    }

    /// Substitute a 3-bit governing-predicate number (0..=7).
    pub fn pred(self, field: &str, p: u32) -> Self {
        self.field(field, p, 3)
    }

    /// Substitute a 4-bit predicate number (0..=15).
    pub fn pred4(self, field: &str, p: u32) -> Self {
        self.field(field, p, 4)
    }

    /// Collapse a run of adjacent field tokens into a single field, e.g.
    /// `N immr imms` → `imm13` for the logical-immediate composite.
    pub fn fuse(mut self, run: &[&str], to: &str) -> Self {
        let n = run.len();
        let mut i = 0;
        while self.toks.len() >= n && i <= self.toks.len() - n {
            if self.toks[i..i + n].iter().zip(run).all(|(t, r)| t == r) {
                self.toks.splice(i..i + n, [to.to_string()]);
            }
            i += 1;
        }
        self
    }

    /// Substitute the split 9-bit load/store offset: the value is
    /// two's-complemented into 9 bits, then the upper 6 bits land in
    /// `imm9h` and the lower 3 in `imm9l`.
    pub fn imm9(self, imm: i64) -> Self {
        let imm = if imm < 0 { (1 << 9) + imm } else { imm } as u32;
        let s = bin(imm, 9);
        self.bits("imm9h", &s[..6]).bits("imm9l", &s[6..])
    }

    /// Finish the encoding: concatenate, check that no placeholder
    /// survived, and parse the 32-bit word.
    ///
    /// # Panics
    ///
    /// On any remaining non-binary token or a total width other than 32
    /// bits — both are table bugs.
    pub fn encode(self) -> u32 {
        let mut word = String::with_capacity(32);
        for tok in &self.toks {
            assert!(
                tok.bytes().all(|b| b == b'0' || b == b'1'),
                "unsubstituted template field: {tok}"
            );
            word.push_str(tok);
        }
        assert_eq!(word.len(), 32, "template is {} bits wide", word.len());
        u32::from_str_radix(&word, 2).expect("binary parse of substituted template")
    }
}
