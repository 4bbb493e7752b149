//! Controlled vs uncontrolled state
//!
//! A piece of widget state (selected values, query text) is either owned by
//! the widget itself or by the caller. The choice is made once, at
//! construction, and holds for the widget's whole life.
//!
//! - **Internal**: the widget stores the value and updates it on every change.
//! - **External**: the caller stores the value. The widget only *proposes*
//!   changes through `on_change` and waits for the caller to feed the new
//!   value back through [`OwnedState::observe`].

use std::fmt;
use std::sync::Arc;

use crate::error::SelectError;

/// Change notification callback
pub type ChangeCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ownership declared by the caller
pub enum StateOwnership<T> {
    Internal { initial: T },
    External { value: T, on_change: ChangeCallback<T> },
}

impl<T> StateOwnership<T> {
    pub fn internal(initial: T) -> Self {
        Self::Internal { initial }
    }

    pub fn external<F>(value: T, on_change: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self::External {
            value,
            on_change: Arc::new(on_change),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StateOwnership<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal { initial } => f.debug_struct("Internal").field("initial", initial).finish(),
            Self::External { value, .. } => f.debug_struct("External").field("value", value).finish(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnershipMode {
    Internal,
    External,
}

/// A value whose ownership mode is fixed at construction
pub struct OwnedState<T> {
    label: &'static str,
    mode: OwnershipMode,
    value: T,
    /// External: the caller's change handler. Internal: optional observer.
    on_change: Option<ChangeCallback<T>>,
    mismatch_reported: bool,
}

impl<T: Clone + PartialEq> OwnedState<T> {
    /// `label` names the state in diagnostics (`"value"`, `"query"`)
    pub fn new(label: &'static str, ownership: StateOwnership<T>) -> Self {
        let (mode, value, on_change) = match ownership {
            StateOwnership::Internal { initial } => (OwnershipMode::Internal, initial, None),
            StateOwnership::External { value, on_change } => {
                (OwnershipMode::External, value, Some(on_change))
            }
        };

        Self {
            label,
            mode,
            value,
            on_change,
            mismatch_reported: false,
        }
    }

    /// Observe changes of internally owned state
    ///
    /// Externally owned state already has its handler; this is a no-op there.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        if self.mode == OwnershipMode::Internal {
            self.on_change = Some(Arc::new(observer));
        }
        self
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn mode(&self) -> OwnershipMode {
        self.mode
    }

    pub fn is_controlled(&self) -> bool {
        self.mode == OwnershipMode::External
    }

    /// Propose a new value
    ///
    /// Internal state commits immediately. External state is left untouched
    /// and the caller is asked to commit. Returns false when `next` equals
    /// the current value, in which case nobody is notified.
    pub fn propose(&mut self, next: T) -> bool {
        if next == self.value {
            return false;
        }

        match self.mode {
            OwnershipMode::Internal => {
                self.value = next;
                if let Some(observer) = &self.on_change {
                    observer(&self.value);
                }
            }
            OwnershipMode::External => {
                if let Some(on_change) = &self.on_change {
                    on_change(&next);
                }
            }
        }
        true
    }

    /// Feed the caller's current prop value back in
    ///
    /// `None` means the caller did not pass a value this round. Switching
    /// between passing and omitting the value after construction is a
    /// configuration mismatch: it is reported once and the original mode is
    /// kept.
    pub fn observe(&mut self, prop: Option<T>) {
        match (self.mode, prop) {
            (OwnershipMode::External, Some(value)) => self.value = value,
            (OwnershipMode::Internal, None) => {}
            (OwnershipMode::External, None) => self.report_mismatch("controlled", "uncontrolled"),
            (OwnershipMode::Internal, Some(_)) => self.report_mismatch("uncontrolled", "controlled"),
        }
    }

    /// Overwrite the stored value without notifying anyone
    ///
    /// Used when the widget normalizes a value it was handed.
    pub(crate) fn replace_silently(&mut self, value: T) {
        self.value = value;
    }

    fn report_mismatch(&mut self, from: &str, to: &str) {
        if self.mismatch_reported {
            return;
        }
        self.mismatch_reported = true;
        SelectError::ConfigurationMismatch {
            state: self.label,
            detail: format!(
                "switched from {} to {} after construction; keeping {} behavior",
                from, to, from
            ),
        }
        .report();
    }
}

impl<T: fmt::Debug> fmt::Debug for OwnedState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedState")
            .field("label", &self.label)
            .field("mode", &self.mode)
            .field("value", &self.value)
            .field("has_callback", &self.on_change.is_some())
            .finish()
    }
}
