//! Lifecycle of one reconciliation run.

use std::fmt;

/// `Loaded → Validated → Planned → Applied | Aborted`.
/// Terminal states are `Applied` and `Aborted`; there is no
/// partial-success state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Loaded,
    Validated,
    Planned,
    Applied,
    Aborted,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Loaded => "loaded",
            RunState::Validated => "validated",
            RunState::Planned => "planned",
            RunState::Applied => "applied",
            RunState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Applied | RunState::Aborted)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
