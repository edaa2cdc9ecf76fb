// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Erasing brush strokes.

use kurbo::{Line, Point, Vec2};

use crate::config::BrushConfig;
use crate::surface::ScratchSurface;

/// Offset applied to the end of a stroke issued outside an active gesture.
///
/// Some backends render a zero-length path as nothing at all; nudging the end
/// point keeps a tap visible as a dot.
pub const TAP_NUDGE: Vec2 = Vec2::new(0.1, 0.1);

/// The segment a stroke from `from` to `to` actually covers.
///
/// When `gesture_active` is `false` the end point is replaced by `to` plus
/// [`TAP_NUDGE`].
#[must_use]
pub fn stroke_segment(from: Point, to: Point, gesture_active: bool) -> Line {
    if gesture_active {
        Line::new(from, to)
    } else {
        Line::new(from, to + TAP_NUDGE)
    }
}

/// Erases a straight segment from the surface with `brush`.
///
/// Returns `false` without touching the surface when it has no rendering
/// context.
pub fn stroke(
    surface: &mut impl ScratchSurface,
    from: Point,
    to: Point,
    brush: &BrushConfig,
    gesture_active: bool,
) -> bool {
    if !surface.is_ready() {
        return false;
    }
    let segment = stroke_segment(from, to, gesture_active);
    tracing::trace!(?segment, width = brush.size, shape = brush.shape.as_str(), "erase");
    surface.erase_segment(segment, &brush.stroke_style());
    true
}
