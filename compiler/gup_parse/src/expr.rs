use std::io::{Read, Write};

use gup_diagnostic::{GupErrorKind, GupResult};
use gup_ir::{Node, NodeKind, NodePayload, TokenKind};

use crate::Parser;

impl<R: Read, W: Write, SW: Write> Parser<'_, R, W, SW> {
    /// `name ( ) ;` — no arguments yet (see Non-goals).
    pub(crate) fn parse_call(&mut self, name: String) -> GupResult<()> {
        self.expect(TokenKind::LParen, "'('")?;
        self.expect(TokenKind::RParen, "')'")?;
        let sid = self.symtab.lookup_by_name(&name).map(|s| s.id).ok_or_else(|| {
            self.error_here(GupErrorKind::UndefinedReference, format!("undefined reference to `{name}`"))
        })?;
        self.expect(TokenKind::Semi, "';'")?;
        self.alloc_and_emit(Node::new(NodeKind::Call).with_symbol(sid))?;
        Ok(())
    }

    /// `name.field[.field...] ;` — a struct field access chain. On entry
    /// `self.cur` is the `.` after `name`.
    pub(crate) fn parse_access(&mut self, head_name: String) -> GupResult<()> {
        let head_id = self.nodes.alloc(Node::new(NodeKind::Access).with_payload(NodePayload::Str(head_name)));
        let mut cursor = head_id;

        loop {
            self.bump()?; // past '.'
            let field_tok = self.expect(TokenKind::Ident, "a field name")?;
            let field_name = field_tok.payload.as_str().unwrap_or_default().to_string();
            let field_id =
                self.nodes.alloc(Node::new(NodeKind::Access).with_payload(NodePayload::Str(field_name)));
            self.nodes.get_mut(cursor).right = Some(field_id);
            cursor = field_id;

            match self.cur.kind {
                TokenKind::Semi => {
                    self.bump()?;
                    break;
                }
                TokenKind::Dot => {}
                other => {
                    return Err(self.error_here(
                        GupErrorKind::UnexpectedToken,
                        format!("expected '.' or ';' in field access, found {other:?}"),
                    ))
                }
            }
        }

        self.emit_by_id(head_id)?;
        Ok(())
    }
}
