//! # sve-asm — SVE assembler for Plan 9-style toolchains
//!
//! `sve-asm` assembles a subset of the ARMv8-A Scalable Vector Extension
//! (and the scalar instructions that show up alongside it) into raw 32-bit
//! opcodes, so that assembly sources using SVE can be fed to a host
//! toolchain that has never heard of SVE. Each unrecognized instruction is
//! emitted as a `WORD $0x…` (or, when an implicit `MOVPRFX` is required, a
//! paired `DWORD $0x…`) constant with the original instruction preserved as
//! a trailing comment.
//!
//! ## Quick start
//!
//! ```rust
//! use sve_asm::{assemble, Encoded};
//!
//! let enc = assemble("add x14, x14, x15").unwrap();
//! assert_eq!(enc, Encoded::Word(0x8b0f01ce));
//! ```
//!
//! Destructive SVE operations used non-destructively come back as a pair:
//!
//! ```rust
//! use sve_asm::{assemble, Encoded};
//!
//! let enc = assemble("add z1.s, p1/M, z2.s, z3.s").unwrap();
//! assert_eq!(enc, Encoded::Pair { prefix: 0x04912441, base: 0x04800461 });
//! assert_eq!(enc.dword(), Some(0x0480046104912441));
//! ```
//!
//! ## Pipeline
//!
//! - [`preprocessor`] — C-style preprocessing (`#include`, `#define`,
//!   conditionals, macro expansion) for raw `.asm` inputs.
//! - [`passthrough`] — cosmetic rewriting of mnemonics the host toolchain
//!   already understands (frame-pointer loads/stores, branches, `adr`).
//! - [`encoder`] — operand classification, template substitution, and
//!   `MOVPRFX` pair synthesis for everything else.
//! - [`driver`] — whole-file processing, `WORD`/`DWORD` emission, and the
//!   optional disassembly-back stage.

// ── Lint policy ──────────────────────────────────────────────────────────
// An assembler is wall-to-wall bit twiddling: dense binary/hex literals,
// narrowing casts between immediate widths, and long dispatch tables are
// the norm here, not an accident.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::match_same_arms,
    clippy::too_many_lines,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::similar_names,
    clippy::many_single_char_names
)]

pub mod bitmask;
/// Operand-shape classifiers: each recognizes one syntactic form.
pub mod classify;
/// File-level driver: `.s` reassembly, `.asm` translation, plan9 stage.
pub mod driver;
/// Mnemonic dispatch and `MOVPRFX` prefix synthesis.
pub mod encoder;
/// Error types with source context.
pub mod error;
/// Operand lexing and scalar token parsing.
pub mod operand;
/// Pass-through translation of host-native mnemonics.
pub mod passthrough;
/// C-style preprocessor: includes, macros, conditionals.
pub mod preprocessor;
/// Encoding templates and bit-field substitution.
pub mod template;

// Re-exports
pub use driver::{assemble_file, translate_asm};
pub use encoder::{assemble, Encoded};
pub use error::AsmError;
pub use operand::ElementType;
pub use passthrough::pass_through;
pub use preprocessor::Preprocessor;
