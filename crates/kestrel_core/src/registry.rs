//! Option registry
//!
//! Tracks the options that are currently mounted, in the order they appear in
//! the rendered list. Options mount and unmount independently (filtering,
//! virtualization, async loading), so registration order says nothing about
//! visual order: the list is re-sorted by `dom_order` on every change.
//!
//! The registry does not filter or touch the highlight. Whoever changes it is
//! responsible for re-deriving the visible set afterwards.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::error::SelectError;
use crate::option::{OptionDecl, OptionId, OptionValue, SelectOption};

/// Handle returned by [`OptionRegistry::register`]
///
/// Hand it back to [`OptionRegistry::release`] when the option unmounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Registration {
    id: OptionId,
}

impl Registration {
    pub fn id(&self) -> OptionId {
        self.id
    }
}

/// Ordered set of mounted options
#[derive(Debug)]
pub struct OptionRegistry<V: OptionValue> {
    options: SlotMap<OptionId, SelectOption<V>>,
    /// Live value -> option, for duplicate detection and value lookups
    by_value: FxHashMap<V, OptionId>,
    /// Ids in visual order
    order: Vec<OptionId>,
    next_seq: u64,
}

impl<V: OptionValue> Default for OptionRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: OptionValue> OptionRegistry<V> {
    pub fn new() -> Self {
        Self {
            options: SlotMap::with_key(),
            by_value: FxHashMap::default(),
            order: Vec::new(),
            next_seq: 0,
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a mounted option
    ///
    /// Registering a value that a live option already holds is rejected: two
    /// options competing for one value almost always means an unmount was missed.
    pub fn register(&mut self, decl: OptionDecl<V>) -> Result<Registration, SelectError> {
        if let Some(existing) = self.by_value.get(&decl.value) {
            tracing::debug!(existing = ?existing, "duplicate registration attempt");
            return Err(SelectError::DuplicateValue {
                value: format!("{:?}", decl.value),
            }
            .reported());
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let value = decl.value.clone();
        let id = self
            .options
            .insert_with_key(|id| SelectOption::from_decl(id, seq, decl));
        self.by_value.insert(value, id);
        self.order.push(id);
        self.resort();

        tracing::trace!("registered option {:?} ({} mounted)", id, self.options.len());
        Ok(Registration { id })
    }

    /// Unregister through the handle returned at registration
    pub fn release(&mut self, registration: Registration) -> Result<SelectOption<V>, SelectError> {
        self.unregister(registration.id)
    }

    /// Remove an option by id
    pub fn unregister(&mut self, id: OptionId) -> Result<SelectOption<V>, SelectError> {
        let option = self.options.remove(id).ok_or_else(|| {
            SelectError::StaleOption {
                id: format!("{:?}", id),
            }
            .reported()
        })?;

        if self.by_value.get(&option.value) == Some(&id) {
            self.by_value.remove(&option.value);
        }
        self.order.retain(|other| *other != id);

        tracing::trace!("unregistered option {:?} ({} mounted)", id, self.options.len());
        Ok(option)
    }

    /// Move an option to a new rendered position
    pub fn set_dom_order(&mut self, id: OptionId, dom_order: u32) -> Result<(), SelectError> {
        self.get_mut(id)?.dom_order = dom_order;
        self.resort();
        Ok(())
    }

    /// Enable or disable a mounted option
    pub fn set_disabled(&mut self, id: OptionId, disabled: bool) -> Result<(), SelectError> {
        self.get_mut(id)?.disabled = disabled;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, id: OptionId) -> Option<&SelectOption<V>> {
        self.options.get(id)
    }

    pub fn contains(&self, id: OptionId) -> bool {
        self.options.contains_key(id)
    }

    /// Look up the live option holding `value`
    pub fn find_by_value(&self, value: &V) -> Option<&SelectOption<V>> {
        self.by_value.get(value).and_then(|id| self.options.get(*id))
    }

    /// Options in visual order
    pub fn list(&self) -> Vec<&SelectOption<V>> {
        self.iter().collect()
    }

    /// Iterate options in visual order
    pub fn iter(&self) -> impl Iterator<Item = &SelectOption<V>> + '_ {
        self.order.iter().filter_map(|id| self.options.get(*id))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn get_mut(&mut self, id: OptionId) -> Result<&mut SelectOption<V>, SelectError> {
        self.options.get_mut(id).ok_or_else(|| {
            SelectError::StaleOption {
                id: format!("{:?}", id),
            }
            .reported()
        })
    }

    fn resort(&mut self) {
        let options = &self.options;
        self.order.sort_by_key(|id| {
            options
                .get(*id)
                .map(|o| (o.dom_order, o.seq))
                .unwrap_or((u32::MAX, u64::MAX))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels<'a>(registry: &'a OptionRegistry<&'static str>) -> Vec<&'a str> {
        registry.iter().map(|o| o.label()).collect()
    }

    #[test]
    fn test_list_follows_dom_order_not_registration_order() {
        let mut registry = OptionRegistry::new();
        registry
            .register(OptionDecl::new("c", "C").dom_order(2))
            .unwrap();
        registry
            .register(OptionDecl::new("a", "A").dom_order(0))
            .unwrap();
        registry
            .register(OptionDecl::new("b", "B").dom_order(1))
            .unwrap();

        assert_eq!(labels(&registry), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_equal_dom_order_keeps_registration_order() {
        let mut registry = OptionRegistry::new();
        registry.register(OptionDecl::new("x", "X")).unwrap();
        registry.register(OptionDecl::new("y", "Y")).unwrap();
        assert_eq!(labels(&registry), vec!["X", "Y"]);
    }

    #[test]
    fn test_duplicate_value_rejected() {
        let mut registry = OptionRegistry::new();
        let first = registry.register(OptionDecl::new("a", "First")).unwrap();

        let err = registry
            .register(OptionDecl::new("a", "Second"))
            .unwrap_err();
        assert!(matches!(err, SelectError::DuplicateValue { .. }));

        // The original registration is untouched
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find_by_value(&"a").unwrap().label(), "First");
        assert_eq!(registry.find_by_value(&"a").unwrap().id(), first.id());
    }

    #[test]
    fn test_value_can_register_again_after_release() {
        let mut registry = OptionRegistry::new();
        let reg = registry.register(OptionDecl::new("a", "A")).unwrap();
        registry.release(reg).unwrap();
        assert!(registry.register(OptionDecl::new("a", "A again")).is_ok());
    }

    #[test]
    fn test_unregister_unknown_is_stale() {
        let mut registry = OptionRegistry::new();
        let reg = registry.register(OptionDecl::new("a", "A")).unwrap();
        registry.unregister(reg.id()).unwrap();

        let err = registry.unregister(reg.id()).unwrap_err();
        assert!(matches!(err, SelectError::StaleOption { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_stale_id_does_not_resolve_after_slot_reuse() {
        let mut registry = OptionRegistry::new();
        let old = registry.register(OptionDecl::new("a", "A")).unwrap();
        registry.release(old).unwrap();
        let new = registry.register(OptionDecl::new("b", "B")).unwrap();

        assert_ne!(old.id(), new.id());
        assert!(registry.get(old.id()).is_none());
    }

    #[test]
    fn test_set_dom_order_resorts() {
        let mut registry = OptionRegistry::new();
        let a = registry
            .register(OptionDecl::new("a", "A").dom_order(0))
            .unwrap();
        registry
            .register(OptionDecl::new("b", "B").dom_order(1))
            .unwrap();

        registry.set_dom_order(a.id(), 5).unwrap();
        assert_eq!(labels(&registry), vec!["B", "A"]);
    }

    #[test]
    fn test_set_disabled() {
        let mut registry = OptionRegistry::new();
        let a = registry.register(OptionDecl::new("a", "A")).unwrap();
        registry.set_disabled(a.id(), true).unwrap();
        assert!(registry.get(a.id()).unwrap().is_disabled());
    }
}
