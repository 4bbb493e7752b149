//! Select-like widget front-ends
//!
//! All three share [`SelectBuilder`] and produce a
//! [`SelectController`](crate::SelectController); they differ in the
//! configuration they start from.

pub mod combobox;
pub mod multi_select;
pub mod select;

pub use combobox::combobox;
pub use multi_select::multi_select;
pub use select::{select, SelectBuilder};
