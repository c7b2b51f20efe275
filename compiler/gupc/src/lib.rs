//! Compiler-state orchestration for the gup compiler.
//!
//! [`CompilerState`] is the Rust counterpart of the original `struct
//! gup_state`: it owns the input reader, the output writer, the scratch
//! arena, the symbol table, the scope stack, and the diagnostic sink for
//! one compilation, and drives the lexer/parser/emitter pipeline to
//! completion or to the first error. Construction opens the input file
//! and truncates the output file; the output file is flushed and closed
//! when `CompilerState` is dropped, so input and output are released on
//! every exit path.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::{Path, PathBuf};

use gup_codegen::Emitter;
use gup_diagnostic::{ColorMode, DiagnosticSink, GupErrorKind, GupResult};
use gup_ir::{NodeArena, ScopeStack, SymbolTable};
use gup_lexer::Lexer;
use gup_parse::Parser;

/// Default name of the intermediate assembly file a compilation writes to,
/// matching the original's `DEFAULT_ASMOUT`.
pub const DEFAULT_ASMOUT: &str = "gupgen.asm";

/// Owns every mutable resource needed to compile one source file: the
/// input reader, the output writer, the scratch arena, the symbol table,
/// the open-scope stack, and the diagnostic sink. These all live for as
/// long as `CompilerState` itself rather than being rebuilt per call to
/// `compile`, so the arena and symbol table survive a compilation and can
/// still be inspected afterwards.
pub struct CompilerState {
    input_path: PathBuf,
    output_path: PathBuf,
    reader: BufReader<File>,
    writer: BufWriter<File>,
    nodes: NodeArena,
    symtab: SymbolTable,
    scopes: ScopeStack,
    sink: DiagnosticSink<std::io::Stderr>,
}

impl CompilerState {
    /// Open `input_path` for reading and truncate `output_path` for
    /// writing. Both are opened eagerly so a missing input file or an
    /// unwritable output location is reported before any parsing begins.
    pub fn new(
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        color: ColorMode,
        debug_enabled: bool,
    ) -> GupResult<Self> {
        use std::io::IsTerminal;
        let input_path = input_path.as_ref().to_path_buf();
        let output_path = output_path.as_ref().to_path_buf();

        let input = File::open(&input_path).map_err(|e| {
            gup_diagnostic::GupError::new(
                GupErrorKind::IoFailure,
                0,
                gup_ir::Span::DUMMY,
                format!("cannot open '{}': {e}", input_path.display()),
            )
        })?;
        let output = File::create(&output_path).map_err(|e| {
            gup_diagnostic::GupError::new(
                GupErrorKind::IoFailure,
                0,
                gup_ir::Span::DUMMY,
                format!("cannot create '{}': {e}", output_path.display()),
            )
        })?;

        let sink =
            DiagnosticSink::stderr(color, std::io::stderr().is_terminal(), debug_enabled);

        Ok(CompilerState {
            input_path,
            output_path,
            reader: BufReader::new(input),
            writer: BufWriter::new(output),
            nodes: NodeArena::new(),
            symtab: SymbolTable::new(),
            scopes: ScopeStack::new(),
            sink,
        })
    }

    /// Run the full lex → parse → emit pipeline for this compilation.
    ///
    /// Returns the number of warnings emitted on success. The first error
    /// from any stage aborts the compilation immediately; no partial
    /// output file is left in a half-written state beyond whatever was
    /// already flushed.
    pub fn compile(&mut self) -> GupResult<usize> {
        tracing::debug!(input = %self.input_path.display(), "parsing source file");
        let lexer = Lexer::new(&mut self.reader);
        let mut emitter = Emitter::new(&mut self.writer);

        let result = {
            let mut parser = Parser::new(
                lexer,
                &mut emitter,
                &mut self.sink,
                &mut self.nodes,
                &mut self.symtab,
                &mut self.scopes,
            );
            parser.run()
        };

        emitter.flush().map_err(|e| {
            self.sink.error(0, gup_ir::Span::DUMMY, GupErrorKind::IoFailure, e.to_string())
        })?;
        tracing::debug!(output = %self.output_path.display(), "flushed output file");

        result.map(|()| self.sink.warning_count())
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl Drop for CompilerState {
    /// Flush the output writer on every exit path, including an early
    /// return or panic partway through a compilation.
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
