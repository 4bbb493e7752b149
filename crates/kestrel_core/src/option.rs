//! Option declarations and registered options

use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

slotmap::new_key_type! {
    /// Stable identifier of a mounted option.
    ///
    /// Ids are versioned: once an option unregisters, its id never resolves
    /// again, even if the slot is reused.
    pub struct OptionId;
}

/// Values that can back an option
///
/// The value is the selection key, so it must be comparable and hashable.
pub trait OptionValue: Clone + Eq + Hash + Debug + 'static {}

impl<T: Clone + Eq + Hash + Debug + 'static> OptionValue for T {}

/// Search keys of one option; most options have one or two
pub type SearchKeys = SmallVec<[String; 2]>;

/// What a caller declares when an option mounts
#[derive(Clone, Debug, PartialEq)]
pub struct OptionDecl<V> {
    pub value: V,
    pub label: String,
    pub disabled: bool,
    /// Keys matched by the search filter; the label is used when empty
    pub search_keys: SearchKeys,
    /// Position of the option in the rendered list
    pub dom_order: u32,
}

impl<V> OptionDecl<V> {
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            disabled: false,
            search_keys: SearchKeys::new(),
            dom_order: 0,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn search_key(mut self, key: impl Into<String>) -> Self {
        self.search_keys.push(key.into());
        self
    }

    pub fn search_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn dom_order(mut self, order: u32) -> Self {
        self.dom_order = order;
        self
    }
}

/// An option currently registered with an [`OptionRegistry`](crate::OptionRegistry)
#[derive(Clone, Debug)]
pub struct SelectOption<V> {
    pub(crate) id: OptionId,
    pub(crate) value: V,
    pub(crate) label: String,
    pub(crate) search_keys: SearchKeys,
    pub(crate) disabled: bool,
    pub(crate) dom_order: u32,
    /// Registration sequence, breaks ties between equal `dom_order`s
    pub(crate) seq: u64,
}

impl<V> SelectOption<V> {
    pub(crate) fn from_decl(id: OptionId, seq: u64, decl: OptionDecl<V>) -> Self {
        let OptionDecl {
            value,
            label,
            disabled,
            mut search_keys,
            dom_order,
        } = decl;

        if search_keys.is_empty() {
            search_keys.push(label.clone());
        }

        Self {
            id,
            value,
            label,
            search_keys,
            disabled,
            dom_order,
            seq,
        }
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn search_keys(&self) -> &[String] {
        &self.search_keys
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn dom_order(&self) -> u32 {
        self.dom_order
    }
}
