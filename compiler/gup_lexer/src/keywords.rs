use gup_ir::TokenKind;

/// Map a fully-scanned identifier to a keyword token kind, or `None` if it
/// is an ordinary identifier.
///
/// A single exhaustive match over the whole identifier, rather than a
/// hand-dispatch on its first byte: matching on the first byte alone would
/// require a second check per keyword family anyway and invites silently
/// missing a keyword when the vocabulary grows. At twelve entries a
/// perfect-hash/trie buys nothing a plain `match` doesn't already give.
#[must_use]
pub fn lookup(ident: &str) -> Option<TokenKind> {
    match ident {
        "u8" => Some(TokenKind::U8),
        "u16" => Some(TokenKind::U16),
        "u32" => Some(TokenKind::U32),
        "u64" => Some(TokenKind::U64),
        "void" => Some(TokenKind::Void),
        "pub" => Some(TokenKind::Pub),
        "proc" => Some(TokenKind::Proc),
        "loop" => Some(TokenKind::Loop),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "return" => Some(TokenKind::Return),
        "struct" => Some(TokenKind::Struct),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_match_is_byte_exact() {
        assert_eq!(lookup("proc"), Some(TokenKind::Proc));
        assert_eq!(lookup("process"), None);
        assert_eq!(lookup("Proc"), None);
    }

    #[test]
    fn all_table_entries_recognized() {
        for kw in [
            "u8", "u16", "u32", "u64", "void", "pub", "proc", "loop", "break", "continue",
            "return", "struct",
        ] {
            assert!(lookup(kw).is_some(), "{kw} should be a keyword");
        }
    }
}
