//! # Kestrel Components (kestrel_cn)
//!
//! Headless select, multi-select and combobox widgets built on
//! `kestrel_core` primitives.
//!
//! - **Primitives**: `kestrel_core` provides the registry, filter, highlight and selection models
//! - **Overlays**: `kestrel_overlay` tracks open popups and places them
//! - **Components**: `kestrel_cn` wires them into a [`SelectController`] per widget
//!
//! Presentation layers render from the controller's state
//! ([`SelectController::render_options`], [`SelectController::trigger_text`])
//! and feed input back through [`SelectController::handle_key`] and
//! [`SelectController::handle_pointer_down`].
//!
//! ## Example
//!
//! ```rust
//! use kestrel_cn::prelude::*;
//! use kestrel_overlay::overlay_registry;
//!
//! let overlays = overlay_registry();
//! let mut fruit = cn::select()
//!     .option("apple", "Apple")
//!     .option("banana", "Banana")
//!     .build(&overlays);
//!
//! fruit.handle_key(KeyCode::ArrowDown.into());
//! fruit.handle_key(KeyCode::ArrowDown.into());
//! fruit.handle_key(KeyCode::Enter.into());
//! assert!(fruit.is_selected(&"banana"));
//! ```

pub mod components;
pub mod config;
pub mod controller;
pub mod i18n;
pub mod option_state;

#[cfg(test)]
mod tests;

pub use components::*;
pub use config::{ConfigError, OptionSpec, SelectConfig, WidgetDefinition};
pub use controller::{CloseReason, SelectController};
pub use i18n::{interpolate, TranslateArg, Translator};
pub use option_state::{OptionState, TriggerState};

/// Convenience module for accessing components with `cn::` prefix
pub mod cn {
    pub use crate::components::combobox::combobox;
    pub use crate::components::multi_select::multi_select;
    pub use crate::components::select::select;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cn;
    pub use crate::components::select::SelectBuilder;
    pub use crate::config::SelectConfig;
    pub use crate::controller::{CloseReason, SelectController};
    pub use crate::option_state::{OptionState, TriggerState};
    // Re-export the core types every caller touches
    pub use kestrel_core::{
        EventOutcome, HighlightSeed, KeyCode, KeyEvent, OptionDecl, OptionId, SelectionMode,
    };
}
