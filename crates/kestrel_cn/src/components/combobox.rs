//! Searchable combobox
//!
//! Typing filters the options. Space is text here, never activation, and
//! closing the list clears an uncontrolled query.
//!
//! # Example
//!
//! ```rust
//! use kestrel_cn::cn;
//! use kestrel_core::KeyCode;
//! use kestrel_overlay::overlay_registry;
//!
//! let overlays = overlay_registry();
//! let mut country = cn::combobox()
//!     .option("nz", "New Zealand")
//!     .option("no", "Norway")
//!     .option("np", "Nepal")
//!     .build(&overlays);
//!
//! country.set_query("ne");
//! assert!(country.is_open());
//! assert_eq!(country.visible_options().len(), 2);
//!
//! country.handle_key(KeyCode::Enter.into());
//! assert!(country.is_selected(&"nz"));
//! assert_eq!(country.query(), "");
//! ```

use std::sync::Arc;

use kestrel_core::{OptionValue, StateOwnership};

use super::select::SelectBuilder;
use crate::config::SelectConfig;

impl<V: OptionValue> SelectBuilder<V> {
    /// Controlled query text
    pub fn query<F>(mut self, current: impl Into<String>, on_change: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.query = Some(StateOwnership::external(
            current.into(),
            move |next: &String| on_change(next),
        ));
        self
    }

    /// Uncontrolled initial query
    pub fn default_query(mut self, text: impl Into<String>) -> Self {
        self.query = Some(StateOwnership::internal(text.into()));
        self
    }

    /// Observe changes of an uncontrolled query
    pub fn on_query_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_query_change = Some(Arc::new(move |next: &String| callback(next)));
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.config_mut().case_sensitive = case_sensitive;
        self
    }

    /// Allow selecting several values from the filtered list
    pub fn multiple(mut self) -> Self {
        self.config_mut().mode = kestrel_core::SelectionMode::Multiple;
        self
    }
}

/// Create a searchable combobox
#[track_caller]
pub fn combobox<V: OptionValue>() -> SelectBuilder<V> {
    SelectBuilder::new(SelectConfig::combobox())
}
