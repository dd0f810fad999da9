//! `sve-as` — rewrite SVE assembly sources into host-toolchain form.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sve_asm::{assemble_file, translate_asm, AsmError};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble SVE sources into WORD/DWORD opcodes for the host toolchain",
    override_usage = "sve-as [--plan9] <filename.s/.asm> [...]"
)]
struct Opts {
    /// Render assembled opcodes back through the host disassembler
    /// (raw `.asm` inputs only).
    #[arg(long = "plan9")]
    plan9: bool,

    /// Input files: `.s` reassembles in place, `.asm` writes a `.s`
    /// sibling.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<String>,
}

/// Exit code 2 flags encoder failures; everything else (I/O, usage,
/// preprocessing) exits 1.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<AsmError>() {
        Some(AsmError::Unhandled { .. } | AsmError::UnhandledPrefix { .. }) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn process_file(fname: &str, plan9: bool) -> Result<()> {
    let lower = fname.to_lowercase();
    let (is_asm, is_s) = (lower.ends_with(".asm"), lower.ends_with(".s"));
    if !is_asm && !is_s {
        anyhow::bail!("Usage: sve-as [--plan9] <filename.s/.asm> [...]");
    }

    let buf = std::fs::read_to_string(fname)
        .with_context(|| format!("reading {fname}"))?;

    if is_asm {
        let out_name = replace_extension(fname, ".asm", ".s");
        println!("Processing {fname} → {out_name}");
        let processed = translate_asm(&out_name, &buf, plan9)?;
        std::fs::write(&out_name, processed)
            .with_context(|| format!("writing {out_name}"))?;
    } else {
        println!("Processing {fname}");
        let (_, contains_dwords) = assemble_file(&buf, None)?;
        let (processed, _) = assemble_file(&buf, Some(&contains_dwords))?;
        std::fs::write(fname, processed).with_context(|| format!("writing {fname}"))?;
    }
    Ok(())
}

fn replace_extension(fname: &str, from: &str, to: &str) -> String {
    let path = Path::new(fname);
    match path.to_str() {
        Some(s) if s.to_lowercase().ends_with(from) => {
            format!("{}{}", &s[..s.len() - from.len()], to)
        }
        _ => fname.to_string(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    for fname in &opts.files {
        if let Err(err) = process_file(fname, opts.plan9) {
            eprintln!("{err:#}");
            return exit_code_for(&err);
        }
    }
    ExitCode::SUCCESS
}
