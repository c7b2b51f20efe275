//! gup compiler CLI.
//!
//! Synopsis: `gupc [-h] [-v] [-a] [-f FMT] PATH...`
//!
//! Each positional argument is compiled independently, in order, stopping
//! at the first one that fails. Manual argv matching, no external argv
//! crate.

mod tracing_setup;

use std::path::Path;
use std::process::Command;

use gup_diagnostic::ColorMode;
use gupc::{CompilerState, DEFAULT_ASMOUT};

const VERSION: &str = "0.0.1";
const DEFAULT_FORMAT: &str = "elf64";
const DEFAULT_ASSEMBLER: &str = "nasm";

struct Options {
    assembly_only: bool,
    format: String,
    paths: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<Options, i32> {
    let mut assembly_only = false;
    let mut format = DEFAULT_FORMAT.to_string();
    let mut paths = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" => {
                help();
                return Err(0);
            }
            "-v" => {
                version();
                return Err(0);
            }
            "-a" => assembly_only = true,
            "-f" => {
                i += 1;
                let Some(fmt) = args.get(i) else {
                    eprintln!("fatal: '-f' requires a format argument");
                    return Err(1);
                };
                format = fmt.clone();
            }
            other => paths.push(other.to_string()),
        }
        i += 1;
    }

    if paths.is_empty() {
        eprintln!("fatal: too few arguments!");
        help();
        return Err(1);
    }

    Ok(Options { assembly_only, format, paths })
}

fn help() {
    println!(
        "the gup compiler - gup!\n\
         -----------------------------\n\
         Usage: gupc [-h] [-v] [-a] [-f FMT] PATH...\n\
         [-h]        Display this help menu\n\
         [-v]        Display the version\n\
         [-a]        Assembly-only; do not invoke the external assembler\n\
         [-f FMT]    Pass -fFMT to the external assembler (default: elf64)"
    );
}

fn version() {
    println!(
        "------------------------------\n\
         gup compiler -- v{VERSION}\n\
         ------------------------------"
    );
}

/// Compile one source file to `DEFAULT_ASMOUT`, then, unless `-a` was
/// given, invoke the external assembler on it and remove the intermediate
/// file on success.
fn compile_one(path: &str, opts: &Options) -> i32 {
    let mut state = match CompilerState::new(path, DEFAULT_ASMOUT, ColorMode::Auto, false) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };

    let warnings = match state.compile() {
        Ok(warnings) => warnings,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };
    let _ = warnings;

    if opts.assembly_only {
        return 0;
    }

    assemble(state.output_path(), &opts.format)
}

fn assemble(asm_path: &Path, format: &str) -> i32 {
    let status = Command::new(DEFAULT_ASSEMBLER).arg(format!("-f{format}")).arg(asm_path).status();

    match status {
        Ok(status) if status.success() => {
            let _ = std::fs::remove_file(asm_path);
            0
        }
        Ok(status) => {
            eprintln!("fatal: {DEFAULT_ASSEMBLER} exited with {status}");
            1
        }
        Err(e) => {
            eprintln!("fatal: failed to invoke {DEFAULT_ASSEMBLER}: {e}");
            1
        }
    }
}

fn main() {
    tracing_setup::init();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(code) => std::process::exit(code),
    };

    for path in &opts.paths {
        let code = compile_one(path, &opts);
        if code != 0 {
            std::process::exit(code);
        }
    }
}
