use std::fmt;

use gup_ir::Span;

/// The closed set of ways a compilation can fail.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum GupErrorKind {
    /// A null/empty argument crossed an interface boundary.
    InvalidArgument,
    /// An arena or buffer failed to grow.
    OutOfMemory,
    /// The scanner hit end of file in a context expecting more input.
    UnexpectedEof,
    /// A token's kind differed from what the grammar expected.
    UnexpectedToken,
    /// A symbol lookup by name found nothing.
    UndefinedReference,
    /// `break`/`continue` outside a loop, `return` outside a function,
    /// nested procedures, `return` in a `void` function, or an unbalanced
    /// `}`.
    ScopeViolation,
    /// The scope stack is already at `MAX_SCOPE_DEPTH`.
    ScopeOverflow,
    /// The input or output file could not be read/written.
    IoFailure,
    /// The emitter was handed a node kind it doesn't know how to lower.
    BadAst,
}

impl fmt::Display for GupErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GupErrorKind::InvalidArgument => "invalid argument",
            GupErrorKind::OutOfMemory => "out of memory",
            GupErrorKind::UnexpectedEof => "unexpected end of file",
            GupErrorKind::UnexpectedToken => "unexpected token",
            GupErrorKind::UndefinedReference => "undefined reference",
            GupErrorKind::ScopeViolation => "scope violation",
            GupErrorKind::ScopeOverflow => "maximum scope depth reached",
            GupErrorKind::IoFailure => "I/O failure",
            GupErrorKind::BadAst => "bad AST node",
        };
        f.write_str(s)
    }
}

/// A single compilation error: what went wrong, where, and why.
///
/// `line` is the 1-based source line active when the error was raised, the
/// location a compile error message is always prefixed with; `span` is the
/// precise byte range, carried for callers that want more than a line
/// number (editor integrations, tests asserting exact ranges).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct GupError {
    pub kind: GupErrorKind,
    pub message: String,
    pub line: usize,
    pub span: Span,
}

impl GupError {
    #[must_use]
    pub fn new(kind: GupErrorKind, line: usize, span: Span, message: impl Into<String>) -> Self {
        GupError { kind, message: message.into(), line, span }
    }
}

impl fmt::Display for GupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: error: {}", self.line, self.message)
    }
}

impl std::error::Error for GupError {}

impl From<std::io::Error> for GupError {
    fn from(err: std::io::Error) -> Self {
        GupError::new(GupErrorKind::IoFailure, 0, Span::DUMMY, err.to_string())
    }
}

pub type GupResult<T> = Result<T, GupError>;
