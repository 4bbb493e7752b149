//! Kestrel Overlay
//!
//! Bookkeeping for popups that float above the page:
//!
//! - **OverlayRegistry**: shared stack of open overlays ordered by open time.
//!   Only the topmost overlay reacts to Escape and outside pointer presses.
//! - **Floating position**: places popup content next to its anchor, flipping
//!   and clamping to stay inside the window.
//!
//! The registry is an explicit service: create one per application root and
//! hand clones of it to every widget that opens an overlay.
//!
//! # Example
//!
//! ```rust
//! use kestrel_overlay::{overlay_registry, OverlayKind, OverlayRegistryExt};
//!
//! let overlays = overlay_registry();
//! let first = overlays.open(OverlayKind::Dropdown, "fruit");
//! let second = overlays.open(OverlayKind::Dropdown, "color");
//! assert!(overlays.is_topmost(second));
//!
//! overlays.close(second);
//! assert!(overlays.is_topmost(first));
//! ```

pub mod geometry;
pub mod position;
pub mod registry;

pub use geometry::{Point, Rect, Size};
pub use position::{
    compute_floating_position, FloatingAlign, FloatingOptions, FloatingPosition, Placement, PositionFn,
};
pub use registry::{
    overlay_registry, OverlayEntry, OverlayHandle, OverlayKind, OverlayRegistry, OverlayRegistryExt,
    OverlayStack,
};
