use std::io::{Read, Write};

use gup_diagnostic::{GupErrorKind, GupResult};
use gup_ir::{BaseType, Node, NodeKind, NodePayload, ScopeKind, SymbolKind, TokenKind};

use crate::Parser;

impl<R: Read, W: Write, SW: Write> Parser<'_, R, W, SW> {
    /// `[pub] proc IDENT -> TYPE[*...] { ... } | ;`
    pub(crate) fn parse_proc(&mut self, is_pub: bool) -> GupResult<()> {
        if self.current_function.is_some() {
            return Err(self.error_here(GupErrorKind::ScopeViolation, "nested functions are not supported"));
        }
        self.bump()?; // past `proc`

        let name_tok = self.expect(TokenKind::Ident, "a procedure name")?;
        let name = name_tok.payload.as_str().unwrap_or_default().to_string();
        self.expect(TokenKind::Minus, "'->'")?;
        self.expect(TokenKind::Gt, "'->'")?;
        let data_type = self.parse_type()?;

        let sid = self.symtab.insert(name, data_type.base);
        if let Some(sym) = self.symtab.get_mut(sid) {
            sym.kind = SymbolKind::Func;
            sym.global = is_pub;
            sym.data_type = data_type;
        }

        match self.cur.kind {
            TokenKind::Semi => {
                self.bump()?;
                Ok(())
            }
            TokenKind::LBrace => {
                if !self.scopes.push(ScopeKind::Proc) {
                    return Err(self.error_here(GupErrorKind::ScopeOverflow, "maximum scope depth reached"));
                }
                self.current_function = Some(sid);
                self.bump()?;
                self.alloc_and_emit(Node::new(NodeKind::Proc).with_symbol(sid))?;
                Ok(())
            }
            other => Err(self.error_here(
                GupErrorKind::UnexpectedToken,
                format!("expected '{{' or ';' after procedure signature, found {other:?}"),
            )),
        }
    }

    /// `TYPE[*...] IDENT ;` — only legal at file scope.
    pub(crate) fn parse_globvar(&mut self) -> GupResult<()> {
        if !self.scopes.is_empty() {
            return Err(self.error_here(
                GupErrorKind::ScopeViolation,
                "only globals are supported outside a procedure",
            ));
        }
        let data_type = self.parse_type()?;
        let name_tok = self.expect(TokenKind::Ident, "a variable name")?;
        let name = name_tok.payload.as_str().unwrap_or_default().to_string();

        let sid = self.symtab.insert(name, data_type.base);
        if let Some(sym) = self.symtab.get_mut(sid) {
            sym.kind = SymbolKind::Var;
            sym.data_type = data_type;
        }
        self.expect(TokenKind::Semi, "';'")?;
        self.alloc_and_emit(Node::new(NodeKind::GlobVar).with_symbol(sid))?;
        Ok(())
    }

    /// `struct IDENT ;` (forward), `struct IDENT IDENT ;` (instance), or
    /// `struct IDENT { (TYPE IDENT ;)* }` (definition).
    pub(crate) fn parse_struct(&mut self) -> GupResult<()> {
        self.bump()?; // past `struct`
        let name_tok = self.expect(TokenKind::Ident, "a struct name")?;
        let name = name_tok.payload.as_str().unwrap_or_default().to_string();

        match self.cur.kind {
            TokenKind::Semi => {
                // Forward declaration: parsed and discarded, as in the
                // source grammar — no symbol is recorded.
                self.bump()?;
                Ok(())
            }
            TokenKind::Ident => self.parse_struct_instance(name),
            TokenKind::LBrace => self.parse_struct_definition(name),
            other => Err(self.error_here(
                GupErrorKind::UnexpectedToken,
                format!(
                    "expected a struct forward declaration, instance, or definition, found {other:?}"
                ),
            )),
        }
    }

    fn parse_struct_instance(&mut self, struct_name: String) -> GupResult<()> {
        let instance_name = self.cur.payload.as_str().unwrap_or_default().to_string();
        self.bump()?;
        self.expect(TokenKind::Semi, "';'")?;

        let symbol = self.symtab.lookup_by_name(&struct_name).cloned().ok_or_else(|| {
            self.error_here(GupErrorKind::UndefinedReference, format!("undefined struct `{struct_name}`"))
        })?;

        let mut node = Node::new(NodeKind::Struct).with_payload(NodePayload::Str(instance_name));
        if let Some(tree) = symbol.tree {
            node = node.with_right(tree);
        }
        self.alloc_and_emit(node)?;
        Ok(())
    }

    fn parse_struct_definition(&mut self, struct_name: String) -> GupResult<()> {
        if !self.scopes.push(ScopeKind::Struct) {
            return Err(self.error_here(GupErrorKind::ScopeOverflow, "maximum scope depth reached"));
        }
        self.bump()?; // past `{`

        let sid = self.symtab.insert(struct_name.clone(), BaseType::Void);
        if let Some(sym) = self.symtab.get_mut(sid) {
            sym.kind = SymbolKind::Struct;
        }

        let def_root = self
            .nodes
            .alloc(Node::new(NodeKind::Struct).with_symbol(sid).with_payload(NodePayload::Str(struct_name)));
        let mut cursor = def_root;

        loop {
            if self.cur.kind == TokenKind::RBrace {
                self.parse_rbrace()?;
                break;
            }
            let field_type = self.parse_type()?;
            let field_name_tok = self.expect(TokenKind::Ident, "a field name")?;
            let field_name = field_name_tok.payload.as_str().unwrap_or_default().to_string();
            self.expect(TokenKind::Semi, "';'")?;

            let field = Node::new(NodeKind::Field)
                .with_payload(NodePayload::Str(field_name))
                .with_field_type(field_type.base);
            let field_id = self.nodes.alloc(field);
            self.nodes.get_mut(cursor).right = Some(field_id);
            cursor = field_id;
        }

        if let Some(sym) = self.symtab.get_mut(sid) {
            sym.tree = Some(def_root);
        }
        Ok(())
    }
}
