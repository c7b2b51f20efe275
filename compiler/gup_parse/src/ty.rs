use std::io::{Read, Write};

use gup_diagnostic::{GupErrorKind, GupResult};
use gup_ir::{BaseType, DataType, TokenKind};

use crate::Parser;

impl<R: Read, W: Write, SW: Write> Parser<'_, R, W, SW> {
    /// Parse a type: a base-type keyword, then zero or more `*`.
    ///
    /// On entry `self.cur` is the base-type token; on exit `self.cur` is
    /// the first non-`*` token, left for the caller to consume.
    pub(crate) fn parse_type(&mut self) -> GupResult<DataType> {
        let base = match self.cur.kind {
            TokenKind::Void => BaseType::Void,
            TokenKind::U8 => BaseType::U8,
            TokenKind::U16 => BaseType::U16,
            TokenKind::U32 => BaseType::U32,
            TokenKind::U64 => BaseType::U64,
            other => {
                return Err(self.error_here(
                    GupErrorKind::UnexpectedToken,
                    format!("expected a type, found {other:?}"),
                ))
            }
        };
        self.bump()?;

        let mut ptr_depth = 0u32;
        while self.cur.kind == TokenKind::Star {
            ptr_depth += 1;
            self.bump()?;
        }
        Ok(DataType::pointer_to(base, ptr_depth))
    }
}
