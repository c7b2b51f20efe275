use crate::{DataType, NodeId};

/// A symbol's monotonically-assigned identity. IDs are handed out in
/// insertion order starting at zero and never reused.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct SymbolId(u32);

impl SymbolId {
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        SymbolId(index as u32)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of program entity a symbol names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SymbolKind {
    /// Freshly inserted, not yet specialized by the parser.
    None,
    Func,
    Var,
    Struct,
}

/// A named program entity: a function, a global variable, or a struct
/// definition.
///
/// `tree` is only populated for `Struct` symbols, where it points at the
/// root of the field chain (see [`crate::Node`]) so that a later instance
/// declaration can walk it to emit per-field storage.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Symbol {
    pub name: String,
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub global: bool,
    pub data_type: DataType,
    pub tree: Option<NodeId>,
}

/// Flat, insertion-ordered collection of symbols.
///
/// Lookups are linear scans: this compiler never has enough symbols in
/// one file for a hash map to pay for itself, and linear scan keeps
/// insertion order trivially preserved for free.
#[derive(Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        SymbolTable { symbols: Vec::new() }
    }

    /// Insert a new symbol with the given name and base type. The caller
    /// is expected to specialize `kind`, `global`, `ptr_depth` and `tree`
    /// afterwards via [`SymbolTable::get_mut`].
    pub fn insert(&mut self, name: impl Into<String>, base: crate::BaseType) -> SymbolId {
        let id = SymbolId::from_index(self.symbols.len());
        self.symbols.push(Symbol {
            name: name.into(),
            id,
            kind: SymbolKind::None,
            global: false,
            data_type: DataType::new(base),
            tree: None,
        });
        id
    }

    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn lookup_by_id(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
