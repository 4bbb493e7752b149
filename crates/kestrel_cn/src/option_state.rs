//! Render-time state handed to presentation code
//!
//! The controller never renders. It hands each visible option (and the
//! trigger) a small bag of flags, and the caller's render function decides
//! what they look like.

/// State of one visible option
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OptionState {
    pub disabled: bool,
    pub is_selected: bool,
    pub is_highlighted: bool,
}

/// State of the trigger element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TriggerState {
    pub open: bool,
    pub disabled: bool,
    pub invalid: bool,
    /// At least one value is selected
    pub has_value: bool,
}
