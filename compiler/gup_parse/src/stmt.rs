use std::io::{Read, Write};

use gup_diagnostic::{GupErrorKind, GupResult};
use gup_ir::{BaseType, Node, NodeKind, NodePayload, ScopeKind, TokenKind};

use crate::Parser;

impl<R: Read, W: Write, SW: Write> Parser<'_, R, W, SW> {
    /// Top-level dispatch: one statement or declaration per call.
    pub(crate) fn begin_parse(&mut self) -> GupResult<()> {
        match self.cur.kind {
            TokenKind::Asm => self.parse_asm(),
            TokenKind::Proc => {
                let is_pub = matches!(self.tail.as_ref().map(|t| t.kind), Some(TokenKind::Pub));
                self.parse_proc(is_pub)
            }
            TokenKind::RBrace => self.parse_rbrace(),
            TokenKind::Loop => self.parse_loop(),
            TokenKind::Break => self.parse_break(),
            TokenKind::Continue => self.parse_continue(),
            TokenKind::Ident => self.parse_ident_stmt(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Struct => self.parse_struct(),
            TokenKind::Pub => self.bump(),
            TokenKind::Void | TokenKind::U8 | TokenKind::U16 | TokenKind::U32 | TokenKind::U64 => {
                self.parse_globvar()
            }
            other => Err(self.error_here(
                GupErrorKind::UnexpectedToken,
                format!("unexpected token {other:?} at start of statement"),
            )),
        }
    }

    fn parse_asm(&mut self) -> GupResult<()> {
        let body = self.cur.payload.as_str().unwrap_or_default().to_string();
        self.bump()?;
        self.alloc_and_emit(Node::new(NodeKind::Asm).with_payload(NodePayload::Str(body)))?;
        Ok(())
    }

    /// Pop the innermost scope and emit whatever closing fragment it needs
    /// (a procedure `ret`, a loop back-edge + exit label, or nothing for a
    /// struct body).
    pub(crate) fn parse_rbrace(&mut self) -> GupResult<()> {
        self.bump()?;
        match self.scopes.pop() {
            ScopeKind::None => {
                Err(self.error_here(GupErrorKind::ScopeViolation, "unexpected '}'"))
            }
            ScopeKind::Proc => {
                self.current_function = None;
                if self.unreachable {
                    self.unreachable = false;
                } else {
                    self.alloc_and_emit(Node::new(NodeKind::Proc).with_epilogue(true))?;
                }
                Ok(())
            }
            ScopeKind::Loop => {
                self.alloc_and_emit(Node::new(NodeKind::Loop).with_epilogue(true))?;
                Ok(())
            }
            ScopeKind::Struct => Ok(()),
        }
    }

    fn parse_loop(&mut self) -> GupResult<()> {
        self.bump()?; // past `loop`
        self.expect(TokenKind::LBrace, "'{'")?;
        if !self.scopes.push(ScopeKind::Loop) {
            return Err(self.error_here(GupErrorKind::ScopeOverflow, "maximum scope depth reached"));
        }
        self.alloc_and_emit(Node::new(NodeKind::Loop))?;
        Ok(())
    }

    fn parse_break(&mut self) -> GupResult<()> {
        if self.scopes.top() != ScopeKind::Loop {
            return Err(self.error_here(GupErrorKind::ScopeViolation, "'break' outside a loop"));
        }
        self.bump()?; // past `break`
        self.expect(TokenKind::Semi, "';'")?;
        self.alloc_and_emit(Node::new(NodeKind::Break))?;
        Ok(())
    }

    fn parse_continue(&mut self) -> GupResult<()> {
        if self.scopes.top() != ScopeKind::Loop {
            return Err(self.error_here(GupErrorKind::ScopeViolation, "'continue' outside a loop"));
        }
        self.bump()?; // past `continue`
        self.expect(TokenKind::Semi, "';'")?;
        self.alloc_and_emit(Node::new(NodeKind::Continue))?;
        Ok(())
    }

    fn parse_return(&mut self) -> GupResult<()> {
        let sid = self
            .current_function
            .ok_or_else(|| self.error_here(GupErrorKind::ScopeViolation, "'return' outside a procedure"))?;
        let is_void =
            self.symtab.lookup_by_id(sid).map(|s| s.data_type.base == BaseType::Void).unwrap_or(false);
        if is_void {
            return Err(self.error_here(
                GupErrorKind::ScopeViolation,
                "'return' in a function declared '-> void'",
            ));
        }
        self.bump()?; // past `return`
        let value_tok = self.expect(TokenKind::Number, "a number literal")?;
        let value = value_tok.payload.as_int().unwrap_or(0);
        self.expect(TokenKind::Semi, "';'")?;
        self.unreachable = true;
        self.alloc_and_emit(Node::new(NodeKind::Ret).with_symbol(sid).with_payload(NodePayload::Int(value)))?;
        Ok(())
    }

    /// An identifier at statement head is either a call (`name();`) or the
    /// start of a field-access chain (`name.field;`).
    fn parse_ident_stmt(&mut self) -> GupResult<()> {
        let name = self.cur.payload.as_str().unwrap_or_default().to_string();
        self.bump()?;
        match self.cur.kind {
            TokenKind::LParen => self.parse_call(name),
            TokenKind::Dot => self.parse_access(name),
            other => Err(self.error_here(
                GupErrorKind::UnexpectedToken,
                format!("expected '(' or '.' after identifier, found {other:?}"),
            )),
        }
    }
}
