//! Selection model
//!
//! Holds the set of selected values in either single or multiple mode. The
//! set is keyed by value, not option id, so a selection survives its option
//! unmounting (filtered out, virtualized away, still loading).
//!
//! Every mutating operation returns the *proposed* next selection, or `None`
//! when nothing would change. Under internal ownership the proposal is
//! committed at once; under external ownership it only reaches the caller's
//! `on_change`.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::SelectError;
use crate::option::{OptionValue, SelectOption};
use crate::ownership::{OwnedState, StateOwnership};

/// Selected values, in the order they were selected
pub type Selection<V> = IndexSet<V>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Single => f.write_str("single"),
            SelectionMode::Multiple => f.write_str("multiple"),
        }
    }
}

#[derive(Debug)]
pub struct SelectionModel<V: OptionValue> {
    mode: SelectionMode,
    state: OwnedState<Selection<V>>,
}

impl<V: OptionValue> SelectionModel<V> {
    /// Create a model
    ///
    /// A single-mode model handed more than one value keeps only the first.
    pub fn new(mode: SelectionMode, ownership: StateOwnership<Selection<V>>) -> Self {
        let mut state = OwnedState::new("value", ownership);

        if mode == SelectionMode::Single && state.get().len() > 1 {
            tracing::warn!(
                "single selection given {} values; keeping the first",
                state.get().len()
            );
            let first: Selection<V> = state.get().iter().take(1).cloned().collect();
            state.replace_silently(first);
        }

        Self { mode, state }
    }

    /// Internally owned model starting from `initial`
    pub fn uncontrolled(mode: SelectionMode, initial: impl IntoIterator<Item = V>) -> Self {
        Self::new(mode, StateOwnership::internal(initial.into_iter().collect()))
    }

    /// Attach an observer to an internally owned model
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Selection<V>) + Send + Sync + 'static,
    {
        self.state = self.state.with_observer(observer);
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_multiple(&self) -> bool {
        self.mode == SelectionMode::Multiple
    }

    pub fn is_controlled(&self) -> bool {
        self.state.is_controlled()
    }

    pub fn selected(&self) -> &Selection<V> {
        self.state.get()
    }

    /// The single selected value, or the first selected one in multiple mode
    pub fn selected_value(&self) -> Option<&V> {
        self.state.get().first()
    }

    pub fn is_selected(&self, value: &V) -> bool {
        self.state.get().contains(value)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Toggle `value`
    ///
    /// Single mode: `force` of `None` or `Some(true)` selects `value`,
    /// replacing whatever was selected; `Some(false)` clears the selection
    /// only if `value` is the selected one.
    ///
    /// Multiple mode: adds or removes `value`; `force` pins the direction.
    pub fn toggle(&mut self, value: V, force: Option<bool>) -> Option<Selection<V>> {
        let current = self.state.get();
        let present = current.contains(&value);

        let next = match self.mode {
            SelectionMode::Single => match force {
                Some(false) if present => Selection::new(),
                Some(false) => return None,
                _ => std::iter::once(value).collect(),
            },
            SelectionMode::Multiple => {
                let mut next = current.clone();
                if force.unwrap_or(!present) {
                    next.insert(value);
                } else {
                    next.shift_remove(&value);
                }
                next
            }
        };

        self.propose(next)
    }

    /// Deselect everything
    pub fn clear(&mut self) -> Option<Selection<V>> {
        self.propose(Selection::new())
    }

    /// Replace the selection wholesale
    pub fn set_values(&mut self, values: impl IntoIterator<Item = V>) -> Option<Selection<V>> {
        let mut next: Selection<V> = values.into_iter().collect();
        if self.mode == SelectionMode::Single && next.len() > 1 {
            tracing::warn!("set_values: single selection given {} values; keeping the first", next.len());
            next.truncate(1);
        }
        self.propose(next)
    }

    /// Select every enabled option in `options`, keeping existing selections
    ///
    /// Not available in single mode.
    pub fn select_all_enabled<'a, I>(&mut self, options: I) -> Result<Option<Selection<V>>, SelectError>
    where
        I: IntoIterator<Item = &'a SelectOption<V>>,
    {
        if self.mode != SelectionMode::Multiple {
            return Err(SelectError::InvalidForMode {
                operation: "select_all_enabled",
                mode: self.mode,
            }
            .reported());
        }

        let mut next = self.state.get().clone();
        next.extend(
            options
                .into_iter()
                .filter(|o| !o.is_disabled())
                .map(|o| o.value().clone()),
        );
        Ok(self.propose(next))
    }

    /// Feed the caller's value prop back in (external ownership)
    pub fn sync_external(&mut self, prop: Option<Selection<V>>) {
        let prop = prop.map(|mut values| {
            if self.mode == SelectionMode::Single {
                values.truncate(1);
            }
            values
        });
        self.state.observe(prop);
    }

    fn propose(&mut self, next: Selection<V>) -> Option<Selection<V>> {
        // IndexSet equality ignores order; treat a pure reorder as no change
        if self.state.propose(next.clone()) {
            tracing::debug!(
                mode = %self.mode,
                controlled = self.is_controlled(),
                "selection -> {:?}",
                next
            );
            Some(next)
        } else {
            None
        }
    }
}
