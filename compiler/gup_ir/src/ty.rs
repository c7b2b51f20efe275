use std::fmt;

/// The base type named by a `u8`/`u16`/`u32`/`u64`/`void` keyword.
///
/// `Bad` is the sentinel produced when a non-type token is parsed where a
/// type was expected; it is never constructed from valid source.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BaseType {
    Void,
    U8,
    U16,
    U32,
    U64,
    Bad,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BaseType::Void => "void",
            BaseType::U8 => "u8",
            BaseType::U16 => "u16",
            BaseType::U32 => "u32",
            BaseType::U64 => "u64",
            BaseType::Bad => "<bad>",
        };
        f.write_str(s)
    }
}

/// The full type of a declared symbol or struct field: a base type plus a
/// pointer depth.
///
/// `ptr_depth == 0` means "not a pointer"; each lexical `*` following the
/// base type in source increases the depth by one. A non-zero pointer
/// depth always promotes the machine size to 64 bits, regardless of the
/// base (see [`DataType::effective_base`]).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct DataType {
    pub base: BaseType,
    pub ptr_depth: u32,
}

impl DataType {
    #[must_use]
    pub const fn new(base: BaseType) -> Self {
        DataType { base, ptr_depth: 0 }
    }

    #[must_use]
    pub const fn pointer_to(base: BaseType, ptr_depth: u32) -> Self {
        DataType { base, ptr_depth }
    }

    #[must_use]
    pub const fn is_pointer(&self) -> bool {
        self.ptr_depth > 0
    }

    /// The base type used for machine-size purposes: any pointer depth
    /// promotes to `U64` regardless of the declared base.
    #[must_use]
    pub const fn effective_base(&self) -> BaseType {
        if self.is_pointer() {
            BaseType::U64
        } else {
            self.base
        }
    }
}
