use std::fmt;

/// The output assembly section the emitter is currently writing into.
///
/// `None` is the state before any instruction has been emitted; it never
/// reappears once a real section has been entered.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Section {
    #[default]
    None,
    Text,
    Data,
    Bss,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Section::None => "none",
            Section::Text => ".text",
            Section::Data => ".data",
            Section::Bss => ".bss",
        };
        f.write_str(s)
    }
}
