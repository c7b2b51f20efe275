//! Recursive-descent parser for the gup compiler.
//!
//! The parser owns the scope stack and symbol table, drives the lexer one
//! token at a time, and hands finished fragments to the [`gup_codegen`]
//! emitter immediately rather than building a whole-program tree — the
//! same single-pass discipline the lexer and emitter follow.

mod decl;
mod expr;
mod stmt;
mod ty;

use std::io::{Read, Write};

use gup_codegen::Emitter;
use gup_diagnostic::{DiagnosticSink, GupErrorKind, GupResult};
use gup_ir::{Node, NodeArena, NodeId, ScopeStack, Span, SymbolId, SymbolTable, Token, TokenKind};
use gup_lexer::Lexer;

/// Drives one source file's token stream through `begin_parse`, handing
/// finished fragments to the emitter as they're produced.
///
/// The scratch arena, symbol table and open-scope stack are borrowed
/// rather than owned here: a caller that compiles more than one file (or
/// that needs the symbol table to outlive a single parse) owns them and
/// passes them in, the same way `emitter` and `sink` are borrowed so the
/// caller (`gupc::CompilerState`) can hold the output writer and
/// diagnostic stream itself and reuse them across stages.
pub struct Parser<'e, R: Read, W: Write, SW: Write> {
    lexer: Lexer<R>,
    emitter: &'e mut Emitter<W>,
    sink: &'e mut DiagnosticSink<SW>,
    nodes: &'e mut NodeArena,
    symtab: &'e mut SymbolTable,
    scopes: &'e mut ScopeStack,
    cur: Token,
    tail: Option<Token>,
    current_function: Option<SymbolId>,
    /// Set by a `return` statement; suppresses the next `}`'s procedure
    /// epilogue emission (the `return`'s own `ret` already closed it out).
    unreachable: bool,
}

impl<'e, R: Read, W: Write, SW: Write> Parser<'e, R, W, SW> {
    pub fn new(
        lexer: Lexer<R>,
        emitter: &'e mut Emitter<W>,
        sink: &'e mut DiagnosticSink<SW>,
        nodes: &'e mut NodeArena,
        symtab: &'e mut SymbolTable,
        scopes: &'e mut ScopeStack,
    ) -> Self {
        Parser {
            lexer,
            emitter,
            sink,
            nodes,
            symtab,
            scopes,
            cur: Token::simple(TokenKind::None, Span::DUMMY),
            tail: None,
            current_function: None,
            unreachable: false,
        }
    }

    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &*self.symtab
    }

    #[must_use]
    pub fn nodes(&self) -> &NodeArena {
        &*self.nodes
    }

    /// Parse and emit an entire source file.
    ///
    /// Scan a token, dispatch on its kind, record it as lookbehind, repeat
    /// until end of file or the first error. A non-empty scope stack at
    /// end of file is itself an error ("missing `}`?").
    pub fn run(&mut self) -> GupResult<()> {
        self.bump()?;
        while self.cur.kind != TokenKind::None {
            let dispatched = self.cur.clone();
            self.begin_parse()?;
            self.tail = Some(dispatched);
        }
        if !self.scopes.is_empty() {
            return Err(self.sink.error(
                self.lexer.line(),
                Span::DUMMY,
                GupErrorKind::ScopeViolation,
                "unexpected end of file; missing '}'?",
            ));
        }
        Ok(())
    }

    /// Advance `self.cur` to the next token, or the `None` sentinel at EOF.
    fn bump(&mut self) -> GupResult<()> {
        self.cur = match self.lexer.scan(self.sink)? {
            Some(tok) => tok,
            None => Token::simple(TokenKind::None, Span::DUMMY),
        };
        Ok(())
    }

    /// Require `self.cur` to be `kind`, consume it, and advance. `what`
    /// names the expected token in the error message on mismatch.
    fn expect(&mut self, kind: TokenKind, what: &str) -> GupResult<Token> {
        if self.cur.kind != kind {
            return Err(self.sink.error(
                self.lexer.line(),
                self.cur.span,
                GupErrorKind::UnexpectedToken,
                format!("expected {what}, found {:?}", self.cur.kind),
            ));
        }
        let tok = self.cur.clone();
        self.bump()?;
        Ok(tok)
    }

    fn error_here(&mut self, kind: GupErrorKind, message: impl Into<String>) -> gup_diagnostic::GupError {
        let line = self.lexer.line();
        let span = self.cur.span;
        self.sink.error(line, span, kind, message)
    }

    /// Hand an already-allocated node to the emitter by id.
    fn emit_by_id(&mut self, id: NodeId) -> GupResult<()> {
        let line = self.lexer.line();
        self.emitter.compile(self.nodes.get(id), &self.nodes, &self.symtab, self.sink, line)
    }

    /// Allocate a node fragment and immediately hand it to the emitter,
    /// matching the "construct then lower" discipline the whole pipeline
    /// follows (see the module docs).
    fn alloc_and_emit(&mut self, node: Node) -> GupResult<NodeId> {
        let id = self.nodes.alloc(node);
        self.emit_by_id(id)?;
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gup_codegen::Emitter;
    use gup_diagnostic::ColorMode;

    /// Parse and emit `src`, returning the assembly text and the final
    /// symbol table (dropped along with the parser otherwise).
    fn compile(src: &str) -> (String, GupResult<()>) {
        let mut emitter = Emitter::new(Vec::new());
        let mut sink = DiagnosticSink::new(Vec::new(), ColorMode::Never, false, false);
        let lexer = Lexer::new(src.as_bytes());
        let mut nodes = gup_ir::NodeArena::new();
        let mut symtab = gup_ir::SymbolTable::new();
        let mut scopes = gup_ir::ScopeStack::new();
        let result = {
            let mut parser =
                Parser::new(lexer, &mut emitter, &mut sink, &mut nodes, &mut symtab, &mut scopes);
            parser.run()
        };
        let out = String::from_utf8(emitter.into_inner()).unwrap();
        (out, result)
    }

    #[test]
    fn inline_asm_only() {
        let (out, result) = compile("@ mov rax, 1 ;");
        result.unwrap();
        assert!(out.starts_with("[section .text]\n"));
        assert!(out.contains("mov rax, 1"));
    }

    #[test]
    fn public_proc_with_return() {
        let (out, result) = compile("pub proc main -> u32 { return 42 ; }");
        result.unwrap();
        assert!(out.contains("[global main]"));
        assert!(out.contains("main:"));
        assert!(out.contains("mov eax, 42"));
        assert!(out.contains("ret"));
        assert_eq!(out.matches("ret").count(), 1, "return's ret must stand in for the epilogue");
    }

    #[test]
    fn global_pointer_forces_qword() {
        let (out, result) = compile("u8 *p ;");
        result.unwrap();
        assert!(out.contains("[section .data]"));
        assert!(out.contains("p: dq 0"));
    }

    #[test]
    fn nested_proc_is_rejected() {
        let (_out, result) = compile("proc f -> void { proc g -> void { } }");
        let err = result.unwrap_err();
        assert_eq!(err.kind, gup_diagnostic::GupErrorKind::ScopeViolation);
    }

    #[test]
    fn break_outside_loop_is_rejected() {
        let (_out, result) = compile("proc f -> void { break ; }");
        assert_eq!(result.unwrap_err().kind, gup_diagnostic::GupErrorKind::ScopeViolation);
    }

    #[test]
    fn return_in_void_function_is_rejected() {
        let (_out, result) = compile("proc f -> void { return 1 ; }");
        assert_eq!(result.unwrap_err().kind, gup_diagnostic::GupErrorKind::ScopeViolation);
    }

    #[test]
    fn forward_declared_proc_can_be_called() {
        let (out, result) = compile("proc f -> u8 ; proc g -> u8 { f ( ) ; return 0 ; }");
        result.unwrap();
        assert!(!out.contains("f:"));
        assert!(out.contains("call f"));
    }

    #[test]
    fn struct_definition_then_instance_emits_both_fields() {
        let (out, result) = compile("struct Pt { u32 x ; u32 y ; } struct Pt p ;");
        result.unwrap();
        assert!(out.contains("p.x: dd 0"));
        assert!(out.contains("p.y: dd 0"));
    }

    #[test]
    fn struct_instance_of_unknown_struct_is_undefined_reference() {
        let (_out, result) = compile("struct Pt q ;");
        assert_eq!(result.unwrap_err().kind, gup_diagnostic::GupErrorKind::UndefinedReference);
    }

    #[test]
    fn unclosed_block_reports_missing_brace() {
        let (_out, result) = compile("proc f -> void {");
        assert_eq!(result.unwrap_err().kind, gup_diagnostic::GupErrorKind::ScopeViolation);
    }

    #[test]
    fn call_to_unknown_procedure_is_undefined_reference() {
        let (_out, result) = compile("proc f -> void { g ( ) ; }");
        assert_eq!(result.unwrap_err().kind, gup_diagnostic::GupErrorKind::UndefinedReference);
    }
}
