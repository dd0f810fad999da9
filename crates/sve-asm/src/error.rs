//! Error types with source context for diagnostics.

use std::fmt;

/// Assembly or preprocessing error.
///
/// Encoder errors carry the offending instruction text; preprocessor
/// errors carry the file name and 1-based line number the way the
/// diagnostics are printed (`file:line: message`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsmError {
    /// No operand-shape classifier matched for the mnemonic, or every
    /// candidate template rejected the operand ranges.
    Unhandled {
        /// The instruction text that could not be encoded.
        ins: String,
    },

    /// A `MOVPRFX` rewrite was required but the patched instruction did
    /// not re-encode to a single word.
    UnhandledPrefix {
        /// The original instruction text.
        ins: String,
        /// Whether the predicated prefix form was being synthesized.
        predicated: bool,
    },

    /// Preprocessor error (directive syntax, conditionals, macros,
    /// include resolution).
    Preprocess {
        /// Short name of the file being preprocessed.
        file: String,
        /// 1-based line number of the offending line.
        line: u32,
        /// The diagnostic message.
        msg: String,
    },

    /// File system error while reading or writing.
    Io {
        /// The path involved.
        path: String,
        /// The underlying error, stringified.
        msg: String,
    },

    /// An external toolchain command failed (disassembly-back stage).
    Tool {
        /// The command that failed (e.g. `go tool asm`).
        tool: String,
        /// Captured output / failure description.
        msg: String,
    },
}

impl AsmError {
    /// Build a preprocessor error for `file:line`.
    pub fn preprocess(file: &str, line: u32, msg: impl Into<String>) -> Self {
        AsmError::Preprocess {
            file: short_path(file),
            line,
            msg: msg.into(),
        }
    }
}

/// Reduce a path to its final component for diagnostics.
pub(crate) fn short_path(p: &str) -> String {
    match p.rsplit(['/', '\\']).next() {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => p.to_string(),
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::Unhandled { ins } => {
                write!(f, "unhandled instruction: {ins}")
            }
            AsmError::UnhandledPrefix { ins, predicated } => {
                let kind = if *predicated { "predicated" } else { "unpredicated" };
                write!(f, "unhandled 'MOVPRFX ({kind})' instruction: {ins}")
            }
            AsmError::Preprocess { file, line, msg } => {
                write!(f, "{file}:{line}: {msg}")
            }
            AsmError::Io { path, msg } => {
                write!(f, "{path}: {msg}")
            }
            AsmError::Tool { tool, msg } => {
                write!(f, "{tool} failed: {msg}")
            }
        }
    }
}

impl std::error::Error for AsmError {}
