//! Kestrel Core
//!
//! Headless building blocks shared by every select-like widget in Kestrel:
//!
//! - **Option Registry**: ordered set of mounted options, keyed by stable ids
//! - **Search Filter**: case-insensitive, token-based, order-preserving filtering
//! - **Highlight Navigator**: keyboard highlight that skips disabled options and wraps
//! - **Selection Model**: single/multiple selection with controlled or uncontrolled ownership
//! - **Open State**: small event-driven state machine for the popup lifecycle
//!
//! Nothing in this crate renders. Presentation layers read the state and feed
//! events back in; the composition root lives in `kestrel_cn`.
//!
//! # Example
//!
//! ```rust
//! use kestrel_core::{HighlightNavigator, OptionDecl, OptionRegistry, SearchFilter};
//!
//! let mut registry = OptionRegistry::new();
//! registry.register(OptionDecl::new("apple", "Apple").dom_order(0)).unwrap();
//! registry.register(OptionDecl::new("banana", "Banana").dom_order(1)).unwrap();
//!
//! let options = registry.list();
//! let visible = SearchFilter::default().filter("ban", &options);
//! assert_eq!(visible.len(), 1);
//!
//! let mut nav = HighlightNavigator::new();
//! nav.first(&visible);
//! assert_eq!(nav.highlighted(), Some(visible[0].id()));
//! ```

pub mod error;
pub mod events;
pub mod filter;
pub mod fsm;
pub mod highlight;
pub mod key;
pub mod option;
pub mod ownership;
pub mod registry;
pub mod selection;
pub mod typeahead;

pub use error::{ErrorClass, SelectError};
pub use events::{EventOutcome, KeyCode, KeyEvent, Modifiers};
pub use filter::{CaseSensitivity, SearchFilter, SearchQuery, Searchable};
pub use fsm::{open_events, OpenState, StateTransitions};
pub use highlight::{HighlightNavigator, HighlightSeed, Navigable};
pub use key::{generate_stable_id, InstanceKey};
pub use option::{OptionDecl, OptionId, OptionValue, SearchKeys, SelectOption};
pub use ownership::{ChangeCallback, OwnedState, OwnershipMode, StateOwnership};
pub use registry::{OptionRegistry, Registration};
pub use selection::{Selection, SelectionMode, SelectionModel};
pub use typeahead::{Typeahead, DEFAULT_TYPEAHEAD_TIMEOUT_MS};
