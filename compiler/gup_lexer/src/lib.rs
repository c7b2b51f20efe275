//! Byte-level lexer for the gup source language.
//!
//! Scans one token at a time off a byte stream. Whitespace (space, tab,
//! `\r`, `\f`, newline) is skipped between tokens except inside an
//! inline-assembly body, where it is preserved verbatim.

mod cursor;
mod keywords;

use std::io::Read;

use gup_diagnostic::{ColorMode, DiagnosticSink, GupErrorKind, GupResult};
use gup_ir::{Span, Token, TokenKind, TokenPayload};

use cursor::Cursor;

pub use keywords::lookup as lookup_keyword;

/// Scans gup source text into a stream of [`Token`]s.
pub struct Lexer<R> {
    cursor: Cursor<R>,
}

impl<R: Read> Lexer<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Lexer { cursor: Cursor::new(reader) }
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.cursor.line()
    }

    fn io_err<W: std::io::Write>(
        &self,
        sink: &mut DiagnosticSink<W>,
        err: std::io::Error,
    ) -> gup_diagnostic::GupError {
        sink.error(self.cursor.line(), Span::DUMMY, GupErrorKind::IoFailure, err.to_string())
    }

    /// Scan the next token, or `Ok(None)` at end of file.
    pub fn scan<W: std::io::Write>(
        &mut self,
        sink: &mut DiagnosticSink<W>,
    ) -> GupResult<Option<Token>> {
        let start = self.cursor.pos();
        let c = match self.cursor.nom(false) {
            Ok(Some(c)) => c,
            Ok(None) => return Ok(None),
            Err(e) => return Err(self.io_err(sink, e)),
        };

        let simple = |kind: TokenKind, c: u8, start: u32, end: u32| {
            Token::new(kind, Span::new(start, end), TokenPayload::Char(c))
        };

        let tok = match c {
            b'@' => return self.scan_asm(sink, start).map(Some),
            b';' => simple(TokenKind::Semi, c, start, self.cursor.pos()),
            b'*' => simple(TokenKind::Star, c, start, self.cursor.pos()),
            b'+' => simple(TokenKind::Plus, c, start, self.cursor.pos()),
            b'-' => simple(TokenKind::Minus, c, start, self.cursor.pos()),
            b'/' => simple(TokenKind::Slash, c, start, self.cursor.pos()),
            b'(' => simple(TokenKind::LParen, c, start, self.cursor.pos()),
            b')' => simple(TokenKind::RParen, c, start, self.cursor.pos()),
            b'{' => simple(TokenKind::LBrace, c, start, self.cursor.pos()),
            b'}' => simple(TokenKind::RBrace, c, start, self.cursor.pos()),
            b'<' => simple(TokenKind::Lt, c, start, self.cursor.pos()),
            b'>' => simple(TokenKind::Gt, c, start, self.cursor.pos()),
            b'.' => simple(TokenKind::Dot, c, start, self.cursor.pos()),
            b'0'..=b'9' => return self.scan_number(sink, c, start).map(Some),
            c if c.is_ascii_alphabetic() || c == b'_' => {
                return self.scan_ident(sink, c, start).map(Some)
            }
            other => {
                return Err(sink.error(
                    self.cursor.line(),
                    Span::new(start, self.cursor.pos()),
                    GupErrorKind::UnexpectedToken,
                    format!("unrecognized token {:?}", other as char),
                ))
            }
        };

        sink.debug(self.cursor.line(), format!("scanned {:?}", tok.kind));
        Ok(Some(tok))
    }

    /// `@ <body> ;` — inline assembly. A single separating byte after `@`
    /// is consumed; if it isn't a space it is pushed back so the body
    /// stays pretty (`@mov rax, 1;` and `@ mov rax, 1;` both keep the
    /// mnemonic un-indented by a stray first byte).
    fn scan_asm<W: std::io::Write>(
        &mut self,
        sink: &mut DiagnosticSink<W>,
        start: u32,
    ) -> GupResult<Token> {
        match self.cursor.nom(true) {
            Ok(Some(b' ')) => {}
            Ok(Some(b)) => self.cursor.putback(b),
            Ok(None) => {
                return Err(self.unexpected_eof(sink));
            }
            Err(e) => return Err(self.io_err(sink, e)),
        }

        let mut body = String::new();
        loop {
            match self.cursor.nom(true) {
                Ok(Some(b';')) => break,
                Ok(Some(b)) => body.push(b as char),
                Ok(None) => return Err(self.unexpected_eof(sink)),
                Err(e) => return Err(self.io_err(sink, e)),
            }
        }

        let tok = Token::new(
            TokenKind::Asm,
            Span::new(start, self.cursor.pos()),
            TokenPayload::Str(body),
        );
        sink.debug(self.cursor.line(), "scanned inline asm");
        Ok(tok)
    }

    fn unexpected_eof<W: std::io::Write>(
        &mut self,
        sink: &mut DiagnosticSink<W>,
    ) -> gup_diagnostic::GupError {
        sink.warn(self.cursor.line(), "missing a semicolon?");
        sink.error(
            self.cursor.line(),
            Span::at(self.cursor.pos()),
            GupErrorKind::UnexpectedEof,
            "unexpected end of file",
        )
    }

    /// Decimal integer literal. `_` is accepted between digits and
    /// silently ignored (a digit-group separator, `1_000 == 1000`). The
    /// first byte that is neither a digit nor `_` is pushed back. Values
    /// outside the range of a signed 64-bit integer are rejected rather
    /// than silently wrapped.
    fn scan_number<W: std::io::Write>(
        &mut self,
        sink: &mut DiagnosticSink<W>,
        first: u8,
        start: u32,
    ) -> GupResult<Token> {
        let mut digits = String::new();
        digits.push(first as char);

        loop {
            match self.cursor.nom(false) {
                Ok(Some(b)) if b.is_ascii_digit() => digits.push(b as char),
                Ok(Some(b'_')) => {}
                Ok(Some(b)) => {
                    self.cursor.putback(b);
                    break;
                }
                Ok(None) => break,
                Err(e) => return Err(self.io_err(sink, e)),
            }
        }

        let value: i64 = digits.parse().map_err(|_| {
            sink.error(
                self.cursor.line(),
                Span::new(start, self.cursor.pos()),
                GupErrorKind::UnexpectedToken,
                format!("integer literal `{digits}` does not fit in a 64-bit signed integer"),
            )
        })?;

        let tok = Token::new(
            TokenKind::Number,
            Span::new(start, self.cursor.pos()),
            TokenPayload::Int(value),
        );
        sink.debug(self.cursor.line(), format!("scanned number {value}"));
        Ok(tok)
    }

    /// `[A-Za-z0-9_]+`, rewritten to its keyword kind if it matches the
    /// keyword table, otherwise left as `Ident`.
    fn scan_ident<W: std::io::Write>(
        &mut self,
        sink: &mut DiagnosticSink<W>,
        first: u8,
        start: u32,
    ) -> GupResult<Token> {
        let mut name = String::new();
        name.push(first as char);

        loop {
            match self.cursor.nom(false) {
                Ok(Some(b)) if b.is_ascii_alphanumeric() || b == b'_' => name.push(b as char),
                Ok(Some(b)) => {
                    self.cursor.putback(b);
                    break;
                }
                Ok(None) => break,
                Err(e) => return Err(self.io_err(sink, e)),
            }
        }

        let kind = lookup_keyword(&name).unwrap_or(TokenKind::Ident);
        let span = Span::new(start, self.cursor.pos());
        let tok = match kind {
            TokenKind::Ident => Token::new(kind, span, TokenPayload::Str(name)),
            _ => Token::new(kind, span, TokenPayload::None),
        };
        sink.debug(self.cursor.line(), format!("scanned {:?} {name:?}", tok.kind));
        Ok(tok)
    }
}

/// Convenience constructor for a stderr-backed diagnostic sink, matching
/// how the rest of the pipeline reports lexer/parser/emitter errors.
#[must_use]
pub fn default_sink(debug_enabled: bool) -> DiagnosticSink<std::io::Stderr> {
    use std::io::IsTerminal;
    DiagnosticSink::stderr(ColorMode::Auto, std::io::stderr().is_terminal(), debug_enabled)
}
