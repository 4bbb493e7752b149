//! Floating placement for popup content
//!
//! Content goes below its anchor unless it does not fit there and there is
//! more room above, in which case it flips. Horizontally it is aligned to the
//! anchor and then clamped into the window.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Side of the anchor the content opens on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Below the anchor (default)
    #[default]
    Bottom,
    /// Above the anchor
    Top,
}

/// Horizontal alignment against the anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatingAlign {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingOptions {
    pub placement: Placement,
    pub align: FloatingAlign,
    /// Gap between anchor and content
    pub offset: f32,
    /// Minimum distance kept from the window edges
    pub viewport_padding: f32,
    /// Content is at least as wide as the anchor
    pub match_anchor_width: bool,
    /// Switch sides when the preferred side is too small
    pub flip: bool,
}

impl Default for FloatingOptions {
    fn default() -> Self {
        Self {
            placement: Placement::Bottom,
            align: FloatingAlign::Start,
            offset: 4.0,
            viewport_padding: 8.0,
            match_anchor_width: true,
            flip: true,
        }
    }
}

/// Where to put the content
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FloatingPosition {
    pub left: f32,
    pub top: f32,
    pub max_width: f32,
    pub max_height: f32,
    /// Side actually used, after flipping
    pub placement: Placement,
}

/// Pluggable positioning: `(anchor, content, window, options)`
pub type PositionFn = Arc<dyn Fn(Rect, Rect, Rect, &FloatingOptions) -> FloatingPosition + Send + Sync>;

/// Compute the content position
///
/// Only the size of `content` is used; its origin is ignored.
pub fn compute_floating_position(
    anchor: Rect,
    content: Rect,
    window: Rect,
    options: &FloatingOptions,
) -> FloatingPosition {
    let padding = options.viewport_padding;
    let space_below = (window.bottom() - padding - anchor.bottom() - options.offset).max(0.0);
    let space_above = (anchor.y() - options.offset - window.y() - padding).max(0.0);

    let mut placement = options.placement;
    if options.flip {
        placement = match placement {
            Placement::Bottom if content.height() > space_below && space_above > space_below => {
                Placement::Top
            }
            Placement::Top if content.height() > space_above && space_below > space_above => {
                Placement::Bottom
            }
            keep => keep,
        };
    }

    let (top, max_height) = match placement {
        Placement::Bottom => (anchor.bottom() + options.offset, space_below),
        Placement::Top => {
            let height = content.height().min(space_above);
            (anchor.y() - options.offset - height, space_above)
        }
    };

    let width = if options.match_anchor_width {
        content.width().max(anchor.width())
    } else {
        content.width()
    };

    let preferred_left = match options.align {
        FloatingAlign::Start => anchor.x(),
        FloatingAlign::Center => anchor.x() + (anchor.width() - width) / 2.0,
        FloatingAlign::End => anchor.right() - width,
    };
    // The left window edge wins when the window is narrower than the content
    let min_left = window.x() + padding;
    let max_left = window.right() - padding - width;
    let left = preferred_left.min(max_left).max(min_left);

    let position = FloatingPosition {
        left,
        top,
        max_width: (window.width() - 2.0 * padding).max(0.0),
        max_height,
        placement,
    };

    tracing::trace!(
        "floating position: left={:.1}, top={:.1}, placement={:?} (anchor {:.1}, {:.1}, {:.1}, {:.1})",
        position.left,
        position.top,
        position.placement,
        anchor.x(),
        anchor.y(),
        anchor.width(),
        anchor.height()
    );
    position
}
