use gup_ir::{BaseType, DataType};

/// Map a data type to its NASM data-definition mnemonic (`db`/`dw`/`dd`/`dq`).
///
/// A non-zero pointer depth always selects `dq`, regardless of the declared
/// base (see [`DataType::effective_base`]). `VOID`/`BAD` have no storage
/// size; callers never ask for one (a global cannot be declared `void`, and
/// `BAD` only appears in already-rejected parses), so this maps them to
/// `dq` defensively rather than panicking.
#[must_use]
pub fn data_directive(ty: DataType) -> &'static str {
    match ty.effective_base() {
        BaseType::U8 => "db",
        BaseType::U16 => "dw",
        BaseType::U32 => "dd",
        BaseType::U64 | BaseType::Void | BaseType::Bad => "dq",
    }
}

/// Map a struct field's base type (fields carry no pointer depth of their
/// own, see `Node::field_type`) to its data directive. `BAD` fields are
/// skipped by the caller before this is reached.
#[must_use]
pub fn field_directive(base: BaseType) -> &'static str {
    match base {
        BaseType::U8 => "db",
        BaseType::U16 => "dw",
        BaseType::U32 => "dd",
        BaseType::U64 | BaseType::Void | BaseType::Bad => "dq",
    }
}

/// Map a function's return type to the register its `ret` value is loaded
/// into: `al/ax/eax/rax` by width, `rax` for any pointer.
#[must_use]
pub fn return_register(ty: DataType) -> &'static str {
    match ty.effective_base() {
        BaseType::U8 => "al",
        BaseType::U16 => "ax",
        BaseType::U32 => "eax",
        BaseType::U64 | BaseType::Void | BaseType::Bad => "rax",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gup_ir::BaseType;

    #[test]
    fn pointer_forces_qword() {
        let ty = DataType::pointer_to(BaseType::U8, 1);
        assert_eq!(data_directive(ty), "dq");
        assert_eq!(return_register(ty), "rax");
    }

    #[test]
    fn widths_map_one_to_one() {
        assert_eq!(data_directive(DataType::new(BaseType::U8)), "db");
        assert_eq!(data_directive(DataType::new(BaseType::U16)), "dw");
        assert_eq!(data_directive(DataType::new(BaseType::U32)), "dd");
        assert_eq!(data_directive(DataType::new(BaseType::U64)), "dq");
        assert_eq!(return_register(DataType::new(BaseType::U8)), "al");
        assert_eq!(return_register(DataType::new(BaseType::U32)), "eax");
    }
}
