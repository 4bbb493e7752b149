//! Open/closed lifecycle as a small state machine
//!
//! States react to `u32` events and either move to a new state or reject the
//! event. Rejected events are no-ops, which is what makes closing idempotent.

/// A state type driven by `u32` events
pub trait StateTransitions: Sized + Copy {
    /// Next state for `event`, or `None` if the event does not apply
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Events understood by [`OpenState`]
pub mod open_events {
    /// User activation or explicit open request
    pub const OPEN: u32 = 30001;
    /// Explicit close request
    pub const CLOSE: u32 = 30002;
    /// Escape key pressed while topmost
    pub const ESCAPE: u32 = 30003;
    /// Pointer pressed outside trigger and content
    pub const OUTSIDE_POINTER: u32 = 30004;
    /// A single-select commit finished
    pub const COMMIT: u32 = 30005;
}

/// Whether the option list is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum OpenState {
    #[default]
    Closed,
    Open,
}

impl OpenState {
    pub fn is_open(&self) -> bool {
        matches!(self, OpenState::Open)
    }
}

impl StateTransitions for OpenState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use open_events::*;
        use OpenState::*;

        match (self, event) {
            (Closed, OPEN) => Some(Open),
            // Re-opening an open list is allowed so the highlight can be re-seeded
            (Open, OPEN) => Some(Open),
            (Open, CLOSE) | (Open, ESCAPE) | (Open, OUTSIDE_POINTER) | (Open, COMMIT) => {
                Some(Closed)
            }
            _ => None,
        }
    }
}
