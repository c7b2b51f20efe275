/// The pair of labels belonging to one open loop: the back-edge target and
/// the exit label jumped to by `break`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LoopLabels {
    pub start: String,
    pub exit: String,
}

/// Per-loop label allocation and break/continue target resolution.
///
/// A single `loop_count - 1` counter is only correct for finding the
/// innermost loop's labels when loops close in strict LIFO order and are
/// never nested — `break` inside an inner loop would jump to whichever
/// loop happened to be most recently *opened*, not necessarily the one
/// it's lexically inside, once closing order and opening order diverge.
/// This keeps a stack of label pairs instead: each `open` pushes its pair,
/// each `close` pops it, and `break`/`continue` always read the top of the
/// stack, so nesting resolves correctly regardless of how loops are opened
/// or closed. Label *text* still comes from one monotonically increasing
/// counter, so `L.<n>` stays globally unique even though target resolution
/// is stack-based.
#[derive(Default)]
pub struct LoopLabelStack {
    counter: u64,
    stack: Vec<LoopLabels>,
}

impl LoopLabelStack {
    #[must_use]
    pub fn new() -> Self {
        LoopLabelStack { counter: 0, stack: Vec::new() }
    }

    /// Allocate and push a fresh label pair for a newly opened loop,
    /// returning its start label.
    pub fn open(&mut self) -> LoopLabels {
        let n = self.counter;
        self.counter += 1;
        let labels = LoopLabels { start: format!("L.{n}"), exit: format!("L.{n}.1") };
        self.stack.push(labels.clone());
        labels
    }

    /// Pop the innermost loop's label pair on loop close.
    pub fn close(&mut self) -> Option<LoopLabels> {
        self.stack.pop()
    }

    /// The innermost open loop's label pair, for `break`/`continue`.
    #[must_use]
    pub fn top(&self) -> Option<&LoopLabels> {
        self.stack.last()
    }
}
