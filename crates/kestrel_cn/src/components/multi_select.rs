//! Multiple-value select
//!
//! Activating an option toggles it and keeps the list open.
//!
//! # Example
//!
//! ```rust
//! use kestrel_cn::cn;
//! use kestrel_overlay::overlay_registry;
//!
//! let overlays = overlay_registry();
//! let mut toppings = cn::multi_select()
//!     .option("cheese", "Cheese")
//!     .option("olives", "Olives")
//!     .build(&overlays);
//!
//! toppings.toggle_open(Some(true), None);
//! toppings.handle_option_activate(&"olives");
//! toppings.handle_option_activate(&"cheese");
//! assert!(toppings.is_open());
//! assert_eq!(toppings.trigger_text(), "Olives, Cheese");
//! ```

use std::sync::Arc;

use kestrel_core::{OptionValue, Selection, StateOwnership};

use super::select::SelectBuilder;
use crate::config::SelectConfig;

impl<V: OptionValue> SelectBuilder<V> {
    /// Uncontrolled initial values
    pub fn default_values(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.value = Some(StateOwnership::internal(values.into_iter().collect()));
        self
    }

    /// Controlled values, in selection order
    pub fn values<F>(mut self, current: Vec<V>, on_change: F) -> Self
    where
        F: Fn(&[V]) + Send + Sync + 'static,
    {
        self.value = Some(StateOwnership::external(
            current.into_iter().collect(),
            move |next: &Selection<V>| {
                let values: Vec<V> = next.iter().cloned().collect();
                on_change(&values);
            },
        ));
        self
    }

    /// Observe changes of uncontrolled values
    pub fn on_values_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[V]) + Send + Sync + 'static,
    {
        self.on_value_change = Some(Arc::new(move |next: &Selection<V>| {
            let values: Vec<V> = next.iter().cloned().collect();
            callback(&values);
        }));
        self
    }
}

/// Create a multiple-value select
#[track_caller]
pub fn multi_select<V: OptionValue>() -> SelectBuilder<V> {
    SelectBuilder::new(SelectConfig::multiple())
}
