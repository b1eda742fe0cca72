/// The VM state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VMState {
    /// Running; the steady state between steps.
    NONE = 0,

    /// The invocation stack drained normally.
    HALT = 1,

    /// Execution stopped on an error.
    FAULT = 2,

    /// Paused by step control or a breakpoint.
    BREAK = 4,
}

impl VMState {
    /// HALT and FAULT end an invocation; nothing resumes from them.
    pub fn is_terminal(self) -> bool {
        matches!(self, VMState::HALT | VMState::FAULT)
    }
}
