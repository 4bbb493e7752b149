//! Open overlay stack
//!
//! Every popup that is open sits in one shared stack ordered by the time it
//! opened. Escape and outside pointer presses belong to the topmost entry
//! only, so nested or side-by-side popups never all close at once.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

// =============================================================================
// OverlayKind
// =============================================================================

/// Categorizes what kind of surface an entry is
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// Listbox anchored to a trigger (select, combobox)
    #[default]
    Dropdown,
    /// Free-form anchored panel
    Popover,
    /// Dialog
    Dialog,
}

// =============================================================================
// OverlayHandle
// =============================================================================

/// Handle to one open overlay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlayHandle(u64);

// =============================================================================
// OverlayEntry
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayEntry {
    pub handle: OverlayHandle,
    pub kind: OverlayKind,
    /// Key of the widget that opened the overlay, for diagnostics
    pub owner: String,
    pub dismiss_on_escape: bool,
    pub dismiss_on_outside: bool,
}

// =============================================================================
// OverlayStack
// =============================================================================

/// Inner state of the overlay registry
#[derive(Debug)]
pub struct OverlayStack {
    /// Open overlays, oldest first
    overlays: IndexMap<OverlayHandle, OverlayEntry>,
    next_id: u64,
}

impl Default for OverlayStack {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayStack {
    pub fn new() -> Self {
        Self {
            overlays: IndexMap::new(),
            next_id: 1,
        }
    }

    /// Push a dismissable overlay on top of the stack
    pub fn push(&mut self, kind: OverlayKind, owner: impl Into<String>) -> OverlayHandle {
        self.push_with(kind, owner, true, true)
    }

    pub fn push_with(
        &mut self,
        kind: OverlayKind,
        owner: impl Into<String>,
        dismiss_on_escape: bool,
        dismiss_on_outside: bool,
    ) -> OverlayHandle {
        let handle = OverlayHandle(self.next_id);
        self.next_id += 1;

        let entry = OverlayEntry {
            handle,
            kind,
            owner: owner.into(),
            dismiss_on_escape,
            dismiss_on_outside,
        };
        tracing::debug!(
            "overlay #{} opened by {} ({} open)",
            handle.0,
            entry.owner,
            self.overlays.len() + 1
        );
        self.overlays.insert(handle, entry);
        handle
    }

    /// Remove an overlay; removing one that is already gone is a no-op
    pub fn remove(&mut self, handle: OverlayHandle) -> bool {
        // shift_remove keeps the open order of the remaining entries
        let removed = self.overlays.shift_remove(&handle).is_some();
        if removed {
            tracing::debug!("overlay #{} closed ({} open)", handle.0, self.overlays.len());
        }
        removed
    }

    pub fn topmost(&self) -> Option<&OverlayEntry> {
        self.overlays.values().last()
    }

    pub fn is_topmost(&self, handle: OverlayHandle) -> bool {
        self.topmost().is_some_and(|entry| entry.handle == handle)
    }

    pub fn is_open(&self, handle: OverlayHandle) -> bool {
        self.overlays.contains_key(&handle)
    }

    /// Whether Escape should go to `handle`
    pub fn receives_escape(&self, handle: OverlayHandle) -> bool {
        self.topmost()
            .is_some_and(|entry| entry.handle == handle && entry.dismiss_on_escape)
    }

    /// Whether an outside pointer press should go to `handle`
    pub fn receives_outside_pointer(&self, handle: OverlayHandle) -> bool {
        self.topmost()
            .is_some_and(|entry| entry.handle == handle && entry.dismiss_on_outside)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}

// =============================================================================
// OverlayRegistry
// =============================================================================

/// Shared overlay stack
pub type OverlayRegistry = Arc<Mutex<OverlayStack>>;

/// Create a new overlay registry
pub fn overlay_registry() -> OverlayRegistry {
    Arc::new(Mutex::new(OverlayStack::new()))
}

/// Convenience methods on the shared registry
pub trait OverlayRegistryExt {
    /// Push a dismissable overlay
    fn open(&self, kind: OverlayKind, owner: &str) -> OverlayHandle;
    /// Remove an overlay (idempotent)
    fn close(&self, handle: OverlayHandle) -> bool;
    fn is_open(&self, handle: OverlayHandle) -> bool;
    fn is_topmost(&self, handle: OverlayHandle) -> bool;
    fn receives_escape(&self, handle: OverlayHandle) -> bool;
    fn receives_outside_pointer(&self, handle: OverlayHandle) -> bool;
    /// Handle of the most recently opened overlay
    fn topmost_handle(&self) -> Option<OverlayHandle>;
    fn open_count(&self) -> usize;
}

fn locked(registry: &OverlayRegistry) -> MutexGuard<'_, OverlayStack> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OverlayRegistryExt for OverlayRegistry {
    fn open(&self, kind: OverlayKind, owner: &str) -> OverlayHandle {
        locked(self).push(kind, owner)
    }

    fn close(&self, handle: OverlayHandle) -> bool {
        locked(self).remove(handle)
    }

    fn is_open(&self, handle: OverlayHandle) -> bool {
        locked(self).is_open(handle)
    }

    fn is_topmost(&self, handle: OverlayHandle) -> bool {
        locked(self).is_topmost(handle)
    }

    fn receives_escape(&self, handle: OverlayHandle) -> bool {
        locked(self).receives_escape(handle)
    }

    fn receives_outside_pointer(&self, handle: OverlayHandle) -> bool {
        locked(self).receives_outside_pointer(handle)
    }

    fn topmost_handle(&self) -> Option<OverlayHandle> {
        locked(self).topmost().map(|entry| entry.handle)
    }

    fn open_count(&self) -> usize {
        locked(self).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topmost_follows_open_order() {
        let mut stack = OverlayStack::new();
        let a = stack.push(OverlayKind::Dropdown, "a");
        let b = stack.push(OverlayKind::Dropdown, "b");
        let c = stack.push(OverlayKind::Popover, "c");
        assert!(stack.is_topmost(c));

        // Closing a middle entry leaves the top alone
        stack.remove(b);
        assert!(stack.is_topmost(c));

        stack.remove(c);
        assert!(stack.is_topmost(a));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut stack = OverlayStack::new();
        let a = stack.push(OverlayKind::Dropdown, "a");
        assert!(stack.remove(a));
        assert!(!stack.remove(a));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_dismiss_gating() {
        let mut stack = OverlayStack::new();
        let below = stack.push(OverlayKind::Dropdown, "below");
        let sticky = stack.push_with(OverlayKind::Dialog, "sticky", false, false);

        assert!(!stack.receives_escape(below));
        assert!(!stack.receives_escape(sticky));
        assert!(!stack.receives_outside_pointer(sticky));

        stack.remove(sticky);
        assert!(stack.receives_escape(below));
        assert!(stack.receives_outside_pointer(below));
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut stack = OverlayStack::new();
        let a = stack.push(OverlayKind::Dropdown, "a");
        stack.remove(a);
        let b = stack.push(OverlayKind::Dropdown, "b");
        assert_ne!(a, b);
        assert!(!stack.is_open(a));
    }

    #[test]
    fn test_shared_registry() {
        let overlays = overlay_registry();
        let clone = Arc::clone(&overlays);

        let handle = overlays.open(OverlayKind::Dropdown, "x");
        assert_eq!(clone.topmost_handle(), Some(handle));
        assert_eq!(clone.open_count(), 1);

        clone.close(handle);
        assert!(!overlays.is_open(handle));
        assert_eq!(overlays.topmost_handle(), None);
    }
}
