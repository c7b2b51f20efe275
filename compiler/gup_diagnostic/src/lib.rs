//! Diagnostic sink and error taxonomy for the gup compiler.
//!
//! Every fallible operation in the lexer, parser and emitter returns a
//! [`GupError`]; the [`DiagnosticSink`] is the one place that knows how to
//! turn one into human-readable, line-prefixed text.

mod error;
mod sink;

pub use error::{GupError, GupErrorKind, GupResult};
pub use sink::{ColorMode, DiagnosticSink};
