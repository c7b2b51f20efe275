//! NASM-like x86_64 assembly emitter for the gup compiler.
//!
//! The emitter's contract is narrow and single-pass: hand it one AST
//! fragment at a time, as soon as the parser has produced it, and it
//! commits text immediately. It never retains a node after emitting it
//! (except implicitly, by walking a struct's field chain during `STRUCT`
//! emission).

mod labels;
mod section;
mod sizing;

use std::io::{self, Write};

use gup_diagnostic::{DiagnosticSink, GupErrorKind, GupResult};
use gup_ir::{BaseType, Node, NodeArena, NodeKind, Span, SymbolTable};

pub use labels::{LoopLabelStack, LoopLabels};
pub use section::Section;
pub use sizing::{data_directive, field_directive, return_register};

/// Drives assembly text onto `W`, tracking the active output section and
/// open loop labels across a whole compilation.
pub struct Emitter<W: Write> {
    writer: W,
    section: Section,
    loops: LoopLabelStack,
}

impl<W: Write> Emitter<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Emitter { writer, section: Section::None, loops: LoopLabelStack::new() }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Reclaim the underlying writer, e.g. to close a file or inspect a
    /// test buffer once emission is finished.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn switch_section(&mut self, want: Section) -> io::Result<()> {
        if self.section != want {
            writeln!(self.writer, "[section {want}]")?;
            self.section = want;
        }
        Ok(())
    }

    fn instr(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "\t{line}")
    }

    fn label(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.writer, "{name}:")
    }

    /// Lower a single AST fragment to assembly text.
    ///
    /// `line` is the source line the fragment originated on, threaded
    /// through purely for diagnostics raised here (a missing symbol, an
    /// unknown node kind).
    pub fn compile<SW: Write>(
        &mut self,
        node: &Node,
        arena: &NodeArena,
        symtab: &SymbolTable,
        sink: &mut DiagnosticSink<SW>,
        line: usize,
    ) -> GupResult<()> {
        tracing::trace!(kind = ?node.kind, epilogue = node.epilogue, "emit");
        let result = match node.kind {
            NodeKind::Asm => self.emit_asm(node),
            NodeKind::Proc if !node.epilogue => self.emit_proc_open(node, symtab, sink, line)?,
            NodeKind::Proc => self.emit_proc_close(),
            NodeKind::Loop if !node.epilogue => self.emit_loop_open(),
            NodeKind::Loop => self.emit_loop_close(),
            NodeKind::Break => self.emit_break(sink, line)?,
            NodeKind::Continue => self.emit_continue(sink, line)?,
            NodeKind::Call => self.emit_call(node, symtab, sink, line)?,
            NodeKind::GlobVar => self.emit_globvar(node, symtab, sink, line)?,
            NodeKind::Ret => self.emit_ret(node, symtab, sink, line)?,
            NodeKind::Struct => self.emit_struct(node, arena, sink, line)?,
            NodeKind::Access => self.emit_access(node, arena),
            _ => {
                return Err(sink.error(
                    line,
                    Span::DUMMY,
                    GupErrorKind::BadAst,
                    format!("emitter cannot lower node kind {:?}", node.kind),
                ))
            }
        };
        result.map_err(|e| sink.error(line, Span::DUMMY, GupErrorKind::IoFailure, e.to_string()))
    }

    fn emit_asm(&mut self, node: &Node) -> io::Result<()> {
        self.switch_section(Section::Text)?;
        let body = node.payload.as_str().unwrap_or_default();
        writeln!(self.writer, "\t{body}")
    }

    fn emit_proc_open<SW: Write>(
        &mut self,
        node: &Node,
        symtab: &SymbolTable,
        sink: &mut DiagnosticSink<SW>,
        line: usize,
    ) -> GupResult<io::Result<()>> {
        let symbol = node
            .symbol
            .and_then(|id| symtab.lookup_by_id(id))
            .ok_or_else(|| missing_symbol(sink, line, "proc"))?;
        self.switch_section(Section::Text).map_err(|e| io_err(sink, line, e))?;
        Ok((|| {
            if symbol.global {
                writeln!(self.writer, "[global {}]", symbol.name)?;
            }
            self.label(&symbol.name)
        })())
    }

    fn emit_proc_close(&mut self) -> io::Result<()> {
        self.instr("ret")
    }

    fn emit_loop_open(&mut self) -> io::Result<()> {
        let labels = self.loops.open();
        self.switch_section(Section::Text)?;
        self.label(&labels.start)
    }

    fn emit_loop_close(&mut self) -> io::Result<()> {
        // An empty stack here means the parser emitted an epilogue without
        // a matching open, which the scope stack is supposed to prevent;
        // there is nothing sane to jump to, so this is a silent no-op
        // rather than a panic.
        if let Some(labels) = self.loops.close() {
            self.switch_section(Section::Text)?;
            self.instr(&format!("jmp {}", labels.start))?;
            self.label(&labels.exit)
        } else {
            Ok(())
        }
    }

    fn emit_break<SW: Write>(
        &mut self,
        sink: &mut DiagnosticSink<SW>,
        line: usize,
    ) -> GupResult<io::Result<()>> {
        let exit = self
            .loops
            .top()
            .map(|l| l.exit.clone())
            .ok_or_else(|| sink.error(line, Span::DUMMY, GupErrorKind::ScopeViolation, "break outside a loop"))?;
        Ok(self.switch_section(Section::Text).and_then(|()| self.instr(&format!("jmp {exit}"))))
    }

    fn emit_continue<SW: Write>(
        &mut self,
        sink: &mut DiagnosticSink<SW>,
        line: usize,
    ) -> GupResult<io::Result<()>> {
        let start = self
            .loops
            .top()
            .map(|l| l.start.clone())
            .ok_or_else(|| sink.error(line, Span::DUMMY, GupErrorKind::ScopeViolation, "continue outside a loop"))?;
        Ok(self.switch_section(Section::Text).and_then(|()| self.instr(&format!("jmp {start}"))))
    }

    fn emit_call<SW: Write>(
        &mut self,
        node: &Node,
        symtab: &SymbolTable,
        sink: &mut DiagnosticSink<SW>,
        line: usize,
    ) -> GupResult<io::Result<()>> {
        let symbol = node
            .symbol
            .and_then(|id| symtab.lookup_by_id(id))
            .ok_or_else(|| missing_symbol(sink, line, "call"))?;
        Ok(self.switch_section(Section::Text).and_then(|()| self.instr(&format!("call {}", symbol.name))))
    }

    fn emit_globvar<SW: Write>(
        &mut self,
        node: &Node,
        symtab: &SymbolTable,
        sink: &mut DiagnosticSink<SW>,
        line: usize,
    ) -> GupResult<io::Result<()>> {
        let symbol = node
            .symbol
            .and_then(|id| symtab.lookup_by_id(id))
            .ok_or_else(|| missing_symbol(sink, line, "global variable"))?;
        let directive = data_directive(symbol.data_type);
        Ok(self
            .switch_section(Section::Data)
            .and_then(|()| writeln!(self.writer, "{}: {directive} 0", symbol.name)))
    }

    fn emit_ret<SW: Write>(
        &mut self,
        node: &Node,
        symtab: &SymbolTable,
        sink: &mut DiagnosticSink<SW>,
        line: usize,
    ) -> GupResult<io::Result<()>> {
        let current_fn = node
            .symbol
            .and_then(|id| symtab.lookup_by_id(id))
            .ok_or_else(|| missing_symbol(sink, line, "return"))?;
        let reg = return_register(current_fn.data_type);
        let imm = node.payload.as_int().unwrap_or(0);
        Ok((|| {
            self.switch_section(Section::Text)?;
            self.instr(&format!("mov {reg}, {imm}"))?;
            self.instr("ret")
        })())
    }

    fn emit_struct<SW: Write>(
        &mut self,
        node: &Node,
        arena: &NodeArena,
        sink: &mut DiagnosticSink<SW>,
        line: usize,
    ) -> GupResult<io::Result<()>> {
        let parent_name = node.payload.as_str().unwrap_or_default().to_string();
        self.switch_section(Section::Data).map_err(|e| io_err(sink, line, e))?;

        // The instance node's `right` points at the struct's definition
        // root; the field chain itself starts one hop further in, at the
        // definition root's own `right` (see `emit_struct` grounding note
        // in DESIGN.md for why this is a double hop, not a single one).
        let mut cursor = node
            .right
            .map(|def_root| arena.get(def_root))
            .and_then(|def_root| def_root.right);

        Ok((|| {
            while let Some(field_id) = cursor {
                let field = arena.get(field_id);
                if field.field_type != BaseType::Bad {
                    let directive = field_directive(field.field_type);
                    let field_name = field.payload.as_str().unwrap_or_default();
                    writeln!(self.writer, "{parent_name}.{field_name}: {directive} 0")?;
                }
                cursor = field.right;
            }
            Ok(())
        })())
    }

    fn emit_access(&mut self, node: &Node, arena: &NodeArena) -> io::Result<()> {
        self.switch_section(Section::Text)?;
        let mut chain = vec![node.payload.as_str().unwrap_or_default().to_string()];
        let mut cursor = node.right;
        while let Some(id) = cursor {
            let next = arena.get(id);
            chain.push(next.payload.as_str().unwrap_or_default().to_string());
            cursor = next.right;
        }
        writeln!(self.writer, "\t; access {}", chain.join("."))
    }
}

fn missing_symbol<SW: Write>(
    sink: &mut DiagnosticSink<SW>,
    line: usize,
    what: &str,
) -> gup_diagnostic::GupError {
    sink.error(
        line,
        Span::DUMMY,
        GupErrorKind::BadAst,
        format!("{what} node reached the emitter with no attached symbol"),
    )
}

fn io_err<SW: Write>(
    sink: &mut DiagnosticSink<SW>,
    line: usize,
    err: io::Error,
) -> gup_diagnostic::GupError {
    sink.error(line, Span::DUMMY, GupErrorKind::IoFailure, err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gup_diagnostic::ColorMode;
    use gup_ir::{DataType, Node, NodeArena, NodePayload, SymbolKind, SymbolTable};

    fn sink() -> DiagnosticSink<Vec<u8>> {
        DiagnosticSink::new(Vec::new(), ColorMode::Never, false, false)
    }

    fn output(emitter: Emitter<Vec<u8>>) -> String {
        String::from_utf8(emitter.writer).unwrap()
    }

    #[test]
    fn asm_emits_one_indented_line_in_text() {
        let mut emitter = Emitter::new(Vec::new());
        let mut sk = sink();
        let mut arena = NodeArena::new();
        let symtab = SymbolTable::new();
        let node = Node::new(NodeKind::Asm).with_payload(NodePayload::Str("mov rax, 1 ".into()));
        let id = arena.alloc(node);
        emitter.compile(arena.get(id), &arena, &symtab, &mut sk, 1).unwrap();
        let out = output(emitter);
        assert_eq!(out, "[section .text]\n\tmov rax, 1 \n");
    }

    #[test]
    fn public_proc_open_emits_global_and_label() {
        let mut emitter = Emitter::new(Vec::new());
        let mut sk = sink();
        let arena = NodeArena::new();
        let mut symtab = SymbolTable::new();
        let sid = symtab.insert("main", BaseType::U32);
        {
            let s = symtab.get_mut(sid).unwrap();
            s.kind = SymbolKind::Func;
            s.global = true;
        }
        let node = Node::new(NodeKind::Proc).with_symbol(sid);
        emitter.compile(&node, &arena, &symtab, &mut sk, 1).unwrap();
        let out = output(emitter);
        assert_eq!(out, "[section .text]\n[global main]\nmain:\n");
    }

    #[test]
    fn ret_picks_register_by_function_return_type() {
        let mut emitter = Emitter::new(Vec::new());
        let mut sk = sink();
        let arena = NodeArena::new();
        let mut symtab = SymbolTable::new();
        let sid = symtab.insert("main", BaseType::U32);
        symtab.get_mut(sid).unwrap().kind = SymbolKind::Func;
        let node = Node::new(NodeKind::Ret).with_symbol(sid).with_payload(NodePayload::Int(42));
        emitter.compile(&node, &arena, &symtab, &mut sk, 1).unwrap();
        let out = output(emitter);
        assert_eq!(out, "[section .text]\n\tmov eax, 42\n\tret\n");
    }

    #[test]
    fn pointer_global_forces_qword() {
        let mut emitter = Emitter::new(Vec::new());
        let mut sk = sink();
        let arena = NodeArena::new();
        let mut symtab = SymbolTable::new();
        let sid = symtab.insert("p", BaseType::U8);
        {
            let s = symtab.get_mut(sid).unwrap();
            s.kind = SymbolKind::Var;
            s.data_type = DataType::pointer_to(BaseType::U8, 1);
        }
        let node = Node::new(NodeKind::GlobVar).with_symbol(sid);
        emitter.compile(&node, &arena, &symtab, &mut sk, 1).unwrap();
        assert_eq!(output(emitter), "[section .data]\np: dq 0\n");
    }

    #[test]
    fn nested_loop_break_targets_innermost_loop() {
        let mut emitter = Emitter::new(Vec::new());
        let mut sk = sink();
        let arena = NodeArena::new();
        let symtab = SymbolTable::new();

        emitter.compile(&Node::new(NodeKind::Loop), &arena, &symtab, &mut sk, 1).unwrap();
        emitter.compile(&Node::new(NodeKind::Loop), &arena, &symtab, &mut sk, 1).unwrap();
        emitter.compile(&Node::new(NodeKind::Break), &arena, &symtab, &mut sk, 1).unwrap();
        emitter
            .compile(&Node::new(NodeKind::Loop).with_epilogue(true), &arena, &symtab, &mut sk, 1)
            .unwrap();
        emitter.compile(&Node::new(NodeKind::Continue), &arena, &symtab, &mut sk, 1).unwrap();
        emitter
            .compile(&Node::new(NodeKind::Loop).with_epilogue(true), &arena, &symtab, &mut sk, 1)
            .unwrap();

        let out = output(emitter);
        assert!(out.contains("L.0:\nL.1:\n\tjmp L.1.1\n\tjmp L.1\nL.1.1:\n\tjmp L.0\nL.0.1:\n"));
    }

    #[test]
    fn struct_emission_skips_bad_fields() {
        let mut emitter = Emitter::new(Vec::new());
        let mut sk = sink();
        let mut arena = NodeArena::new();
        let symtab = SymbolTable::new();

        let f2 = arena.alloc(
            Node::new(NodeKind::Field)
                .with_payload(NodePayload::Str("y".into()))
                .with_field_type(BaseType::U32),
        );
        let f1 = arena.alloc(
            Node::new(NodeKind::Field)
                .with_payload(NodePayload::Str("x".into()))
                .with_field_type(BaseType::U32)
                .with_right(f2),
        );
        let def_root = arena.alloc(Node::new(NodeKind::Struct).with_right(f1));
        let instance = Node::new(NodeKind::Struct)
            .with_payload(NodePayload::Str("p".into()))
            .with_right(def_root);

        emitter.compile(&instance, &arena, &symtab, &mut sk, 1).unwrap();
        assert_eq!(output(emitter), "[section .data]\np.x: dd 0\np.y: dd 0\n");
    }
}
