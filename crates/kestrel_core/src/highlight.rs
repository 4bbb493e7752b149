//! Keyboard highlight over the visible options
//!
//! The navigator only remembers *which* option is highlighted. Every movement
//! takes the current visible list, so the highlight can never be computed
//! against a stale list. Disabled options are skipped by all movements.

use crate::error::SelectError;
use crate::option::{OptionId, SelectOption};

/// Something the navigator can move over
pub trait Navigable {
    fn option_id(&self) -> OptionId;
    fn is_disabled(&self) -> bool;
}

impl<V> Navigable for SelectOption<V> {
    fn option_id(&self) -> OptionId {
        self.id
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl<T: Navigable + ?Sized> Navigable for &T {
    fn option_id(&self) -> OptionId {
        (**self).option_id()
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }
}

/// Which end to start from when the list opens via keyboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HighlightSeed {
    #[default]
    First,
    Last,
}

/// Tracks the highlighted option
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightNavigator {
    highlighted: Option<OptionId>,
}

impl HighlightNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> Option<OptionId> {
        self.highlighted
    }

    pub fn clear(&mut self) {
        self.highlighted = None;
    }

    /// Whether the current highlight points at a visible, enabled option
    pub fn is_valid<T: Navigable>(&self, visible: &[T]) -> bool {
        self.highlighted
            .is_some_and(|id| visible.iter().any(|o| o.option_id() == id && !o.is_disabled()))
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Move to the next enabled option, wrapping past the end
    pub fn next<T: Navigable>(&mut self, visible: &[T]) -> Option<OptionId> {
        self.step(visible, true)
    }

    /// Move to the previous enabled option, wrapping past the start
    pub fn previous<T: Navigable>(&mut self, visible: &[T]) -> Option<OptionId> {
        self.step(visible, false)
    }

    /// Jump to the first enabled option
    pub fn first<T: Navigable>(&mut self, visible: &[T]) -> Option<OptionId> {
        if let Some(id) = first_enabled(visible) {
            self.highlighted = Some(id);
        }
        self.highlighted
    }

    /// Jump to the last enabled option
    pub fn last<T: Navigable>(&mut self, visible: &[T]) -> Option<OptionId> {
        if let Some(id) = last_enabled(visible) {
            self.highlighted = Some(id);
        }
        self.highlighted
    }

    /// Move by `delta` enabled options
    ///
    /// `±1` behaves like [`next`](Self::next)/[`previous`](Self::previous) and
    /// wraps. Larger steps page through the list and stop at the last enabled
    /// option in that direction instead of wrapping.
    pub fn move_by<T: Navigable>(&mut self, visible: &[T], delta: i32) -> Option<OptionId> {
        match delta {
            0 => self.highlighted,
            1 => self.next(visible),
            -1 => self.previous(visible),
            _ => {
                let forward = delta > 0;
                let Some(start) = self.position_in(visible) else {
                    return self.enter_from_edge(visible, forward);
                };

                let mut remaining = delta.unsigned_abs();
                let mut landed = start;
                let mut idx = start;
                while remaining > 0 {
                    idx = match (forward, idx) {
                        (true, i) if i + 1 < visible.len() => i + 1,
                        (false, i) if i > 0 => i - 1,
                        _ => break,
                    };
                    if !visible[idx].is_disabled() {
                        landed = idx;
                        remaining -= 1;
                    }
                }

                self.highlighted = Some(visible[landed].option_id());
                self.highlighted
            }
        }
    }

    /// Highlight a specific option
    ///
    /// Only visible, enabled options can be highlighted; anything else is
    /// rejected and the highlight stays where it was.
    pub fn highlight<T: Navigable>(&mut self, id: OptionId, visible: &[T]) -> Result<(), SelectError> {
        if visible.iter().any(|o| o.option_id() == id && !o.is_disabled()) {
            self.highlighted = Some(id);
            Ok(())
        } else {
            Err(SelectError::NotNavigable {
                id: format!("{:?}", id),
            }
            .reported())
        }
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Re-validate after the visible set changed
    ///
    /// A still-valid highlight is kept. Otherwise the first enabled option
    /// accepted by `preferred` wins, then the first enabled option, then none.
    pub fn resolve_after_visible_set_change<T, F>(
        &mut self,
        visible: &[T],
        preferred: F,
    ) -> Option<OptionId>
    where
        T: Navigable,
        F: Fn(&T) -> bool,
    {
        if self.is_valid(visible) {
            return self.highlighted;
        }

        let resolved = visible
            .iter()
            .find(|o| !o.is_disabled() && preferred(*o))
            .map(|o| o.option_id())
            .or_else(|| first_enabled(visible));

        if resolved != self.highlighted {
            tracing::trace!("highlight re-resolved {:?} -> {:?}", self.highlighted, resolved);
        }
        self.highlighted = resolved;
        resolved
    }

    /// Seed the highlight when the list opens from the keyboard
    ///
    /// Preferred options win over the edge; with several preferred options the
    /// one nearest the seeded edge is taken.
    pub fn seed<T, F>(&mut self, visible: &[T], seed: HighlightSeed, preferred: F) -> Option<OptionId>
    where
        T: Navigable,
        F: Fn(&T) -> bool,
    {
        let candidate = |o: &&T| !o.is_disabled() && preferred(*o);
        let resolved = match seed {
            HighlightSeed::First => visible
                .iter()
                .find(candidate)
                .map(|o| o.option_id())
                .or_else(|| first_enabled(visible)),
            HighlightSeed::Last => visible
                .iter()
                .rev()
                .find(candidate)
                .map(|o| o.option_id())
                .or_else(|| last_enabled(visible)),
        };
        self.highlighted = resolved;
        resolved
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn position_in<T: Navigable>(&self, visible: &[T]) -> Option<usize> {
        let id = self.highlighted?;
        visible.iter().position(|o| o.option_id() == id)
    }

    fn step<T: Navigable>(&mut self, visible: &[T], forward: bool) -> Option<OptionId> {
        let Some(start) = self.position_in(visible) else {
            return self.enter_from_edge(visible, forward);
        };

        let len = visible.len();
        // Walking a full lap ends back on `start`, so a lone enabled option stays put
        for offset in 1..=len {
            let idx = if forward {
                (start + offset) % len
            } else {
                (start + len - offset) % len
            };
            if !visible[idx].is_disabled() {
                self.highlighted = Some(visible[idx].option_id());
                break;
            }
        }
        self.highlighted
    }

    /// Movement with nothing (or something no longer visible) highlighted
    fn enter_from_edge<T: Navigable>(&mut self, visible: &[T], forward: bool) -> Option<OptionId> {
        self.highlighted = if forward {
            first_enabled(visible)
        } else {
            last_enabled(visible)
        };
        self.highlighted
    }
}

fn first_enabled<T: Navigable>(visible: &[T]) -> Option<OptionId> {
    visible
        .iter()
        .find(|o| !o.is_disabled())
        .map(|o| o.option_id())
}

fn last_enabled<T: Navigable>(visible: &[T]) -> Option<OptionId> {
    visible
        .iter()
        .rev()
        .find(|o| !o.is_disabled())
        .map(|o| o.option_id())
}
