//! Pass-through translation of mnemonics the host toolchain already
//! understands.
//!
//! A small fixed set of scalar instructions never reaches the encoder:
//! frame-pointer loads and stores, branches, `adr`, and the test/compare
//! branches are rewritten into the host toolchain's own spelling
//! (uppercase mnemonic, `xN` → `RN`, `(fp)`/`(sb)` suffixes uppercased).
//! Lines that are already written all-caps are handed back verbatim.

/// Rewrite `ins` into host-toolchain syntax, or `None` when the
/// instruction is not a pass-through candidate and must be encoded.
pub fn pass_through(ins: &str) -> Option<String> {
    if ins.trim().is_empty() {
        return None;
    }
    let mut fields = ins.split_whitespace();
    let mnem = fields.next()?;
    let args: Vec<String> = fields.map(|a| a.replace(',', "")).collect();

    match mnem.to_lowercase().as_str() {
        "ldr" | "str" => {
            if args.len() == 2 && args[1].ends_with("(fp)]") {
                let lbl = args[1]
                    .replace("(fp)", "(FP)")
                    .replace(['[', ']'], "");
                if mnem.to_lowercase() == "ldr" {
                    return Some(format!("MOVD {}, {}", lbl, reg_to_host(&args[0])));
                }
                return Some(format!("MOVD {}, {}", reg_to_host(&args[0]), lbl));
            }
        }

        "adr" => {
            if all_caps(mnem) {
                return Some(ins.trim().to_string());
            }
            if args.len() == 2 {
                let lbl = &args[1];
                if lbl.starts_with("$·") && lbl.ends_with("(sb)") {
                    // Absolute addresses load through MOVD.
                    let lbl = lbl.replace("(sb)", "(SB)");
                    return Some(format!("MOVD {}, {}", lbl, reg_to_host(&args[0])));
                }
                // PC-relative addresses keep the ADR.
                return Some(format!(
                    "{} {}, {}",
                    mnem.to_uppercase(),
                    lbl,
                    reg_to_host(&args[0])
                ));
            }
        }

        "movd" => {
            if all_caps(mnem) {
                return Some(ins.trim().to_string());
            }
        }

        "b" | "beq" | "bne" | "bcc" | "blo" | "bcs" | "bmi" | "bpl" | "bvs" | "bvc" | "bhi"
        | "bls" | "bge" | "blt" | "bgt" | "ble" | "bal" | "bnv" | "b.eq" | "b.ne" | "b.cc"
        | "b.lo" | "b.cs" | "b.mi" | "b.pl" | "b.vs" | "b.vc" | "b.hi" | "b.ls" | "b.ge"
        | "b.lt" | "b.gt" | "b.le" | "b.al" | "b.nv" => {
            if all_caps(mnem) {
                return Some(ins.trim().to_string());
            }
            let rest: Vec<&str> = ins.split_whitespace().skip(1).collect();
            return Some(format!("{} {}", mnem.to_uppercase(), rest.join(" ")));
        }

        "bl" | "jmp" => {
            if all_caps(mnem) {
                return Some(ins.trim().to_string());
            }
        }

        "tbz" | "tbnz" => {
            if all_caps(mnem) {
                return Some(ins.trim().to_string());
            }
            if args.len() == 3 {
                return Some(format!(
                    "{} ${}, {}, {}",
                    mnem.to_uppercase(),
                    args[1].replace('#', ""),
                    reg_to_host(&args[0]),
                    args[2]
                ));
            }
        }

        "cbz" | "cbnz" => {
            if all_caps(mnem) {
                return Some(ins.trim().to_string());
            }
            if args.len() == 2 {
                return Some(format!(
                    "{} {}, {}",
                    mnem.to_uppercase(),
                    reg_to_host(&args[0]),
                    args[1]
                ));
            }
        }

        _ => {}
    }
    None
}

/// Whether every letter in `s` is uppercase (and there is at least one).
fn all_caps(s: &str) -> bool {
    let mut has_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            has_letter = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    has_letter
}

/// `xN` → `RN`; anything else passes unchanged.
fn reg_to_host(reg: &str) -> String {
    if reg.starts_with('x') {
        reg.replace('x', "R")
    } else {
        reg.to_string()
    }
}
