//! gup IR - core data structures shared by the lexer, parser and emitter.
//!
//! This crate contains the parts of the compiler that are pure data:
//! - `Span`, a compact source location.
//! - `Token`/`TokenKind`, the lexer's output alphabet.
//! - `DataType`/`BaseType`, the source language's (tiny) type system.
//! - `Symbol`/`SymbolTable`, the flat program symbol table.
//! - `Node`/`NodeArena`, the AST fragments the parser hands to the emitter.
//!
//! Nodes and symbols never own a pointer into another node's storage
//! directly; they hold `NodeId`/`SymbolId` indices into the arena/table
//! that owns them, so the whole tree is freed in one pass when the arena
//! is dropped at the end of compilation.

mod ast;
mod scope;
mod span;
mod symbol;
mod token;
mod ty;

pub use ast::{Node, NodeArena, NodeId, NodeKind, NodePayload};
pub use scope::{ScopeKind, ScopeStack, MAX_SCOPE_DEPTH};
pub use span::Span;
pub use symbol::{Symbol, SymbolId, SymbolKind, SymbolTable};
pub use token::{Token, TokenKind, TokenPayload};
pub use ty::{BaseType, DataType};
