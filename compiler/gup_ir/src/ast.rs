use crate::{BaseType, SymbolId};

/// Index into a [`NodeArena`]. Never constructed except by
/// [`NodeArena::alloc`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    const fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tagged variant of an AST fragment. The parser produces one of these
/// per statement and hands it to the emitter immediately; only the field
/// chain rooted at a `Struct` symbol's `tree` outlives the statement that
/// created it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    None,
    Asm,
    Proc,
    Loop,
    GlobVar,
    Break,
    Continue,
    Call,
    Ret,
    Struct,
    Field,
    Access,
    Assign,
    Number,
    Equality,
    If,
}

/// Payload carried by a node: inline-asm text, a name (procedure, struct
/// instance, access-chain element, field), or an integer (a `return`'s
/// immediate value).
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum NodePayload {
    #[default]
    None,
    Str(String),
    Int(i64),
}

impl NodePayload {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodePayload::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            NodePayload::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// A single AST node. `epilogue` marks the "closing" variant of `Proc` and
/// `Loop` (a procedure's/loop's `}`); `field_type` is only meaningful on
/// `Field` nodes, naming the declared base type of that field.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub symbol: Option<SymbolId>,
    pub epilogue: bool,
    pub field_type: BaseType,
    pub payload: NodePayload,
}

impl Node {
    #[must_use]
    pub const fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            left: None,
            right: None,
            symbol: None,
            epilogue: false,
            field_type: BaseType::Bad,
            payload: NodePayload::None,
        }
    }

    #[must_use]
    pub const fn with_symbol(mut self, symbol: SymbolId) -> Self {
        self.symbol = Some(symbol);
        self
    }

    #[must_use]
    pub const fn with_epilogue(mut self, epilogue: bool) -> Self {
        self.epilogue = epilogue;
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: NodePayload) -> Self {
        self.payload = payload;
        self
    }

    #[must_use]
    pub const fn with_right(mut self, right: NodeId) -> Self {
        self.right = Some(right);
        self
    }

    #[must_use]
    pub const fn with_field_type(mut self, field_type: BaseType) -> Self {
        self.field_type = field_type;
        self
    }
}

/// Append-only storage for every node allocated during a compilation.
///
/// A flat `Vec` is itself a bump allocator with the property we need —
/// contiguous allocation and bulk deallocation in a single `Drop` when the
/// arena (and with it, the whole `CompilerState`) goes out of scope. Nodes
/// reference each other by `NodeId` index rather than by pointer, so the
/// arena never needs unsafe code or a lifetime parameter threaded through
/// every node.
#[derive(Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
