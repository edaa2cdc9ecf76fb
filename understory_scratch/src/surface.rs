// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing surface a scratch card paints on and erases from.
//!
//! [`ScratchSurface`] is the capability interface between the engine and a
//! concrete rendering target (a `<canvas>`, a CPU pixel buffer, ...). It is
//! deliberately small: size the target, acquire a 2D context, fill, erase,
//! and read pixels back.
//!
//! A surface may exist before its rendering context does. The engine checks
//! [`ScratchSurface::is_ready`] before every drawing or reading operation and
//! silently skips the operation when it returns `false`.

use alloc::borrow::Cow;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point, Size, Stroke};
use peniko::Color;

/// Pixel dimensions of a surface.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Creates a size from explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The size that covers `content`, truncating fractional pixels.
    ///
    /// Negative and non-finite extents map to zero.
    #[must_use]
    pub fn covering(content: Size) -> Self {
        Self {
            width: floor_extent(content.width),
            height: floor_extent(content.height),
        }
    }

    /// Number of bytes in an RGBA8 buffer of this size.
    #[must_use]
    pub fn rgba_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Whether either dimension is zero.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the value is floored and clamped to the u32 range before the cast"
)]
fn floor_extent(extent: f64) -> u32 {
    if !extent.is_finite() || extent <= 0.0 {
        return 0;
    }
    extent.floor().min(f64::from(u32::MAX)) as u32
}

/// A drawing target that can be obscured and erased.
///
/// Implementations composite in the usual premultiplied "source-over" sense
/// for [`fill`](Self::fill) and in the "destination-out" sense for
/// [`clear`](Self::clear) and [`erase_segment`](Self::erase_segment). Pixels
/// read back through [`read_pixels`](Self::read_pixels) are RGBA8, row-major,
/// with no padding between rows.
pub trait ScratchSurface {
    /// (Re)acquires the 2D rendering context.
    ///
    /// `read_frequently` hints that pixels will be read back after most
    /// strokes. Returns `true` if a context is available afterwards.
    fn acquire_context(&mut self, read_frequently: bool) -> bool;

    /// Whether a rendering context is currently available.
    fn is_ready(&self) -> bool;

    /// Current pixel dimensions.
    fn size(&self) -> SurfaceSize;

    /// Sets both the pixel dimensions and the displayed size.
    ///
    /// Resizing discards the current content.
    fn resize(&mut self, size: SurfaceSize);

    /// Top-left corner of the surface in the coordinate space of incoming
    /// input events (client coordinates, accounting for scroll).
    fn origin(&self) -> Point;

    /// Paints `color` over the whole surface using normal composition.
    fn fill(&mut self, color: Color);

    /// Makes the whole surface fully transparent.
    fn clear(&mut self);

    /// Erases along `line`, stroked as a closed two-point subpath with
    /// `style`'s width and join.
    fn erase_segment(&mut self, line: Line, style: &Stroke);

    /// Reads back the whole surface, or `None` if no context is available.
    fn read_pixels(&mut self) -> Option<Cow<'_, [u8]>>;
}

impl<S: ScratchSurface + ?Sized> ScratchSurface for &mut S {
    fn acquire_context(&mut self, read_frequently: bool) -> bool {
        (**self).acquire_context(read_frequently)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn size(&self) -> SurfaceSize {
        (**self).size()
    }

    fn resize(&mut self, size: SurfaceSize) {
        (**self).resize(size);
    }

    fn origin(&self) -> Point {
        (**self).origin()
    }

    fn fill(&mut self, color: Color) {
        (**self).fill(color);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn erase_segment(&mut self, line: Line, style: &Stroke) {
        (**self).erase_segment(line, style);
    }

    fn read_pixels(&mut self) -> Option<Cow<'_, [u8]>> {
        (**self).read_pixels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covering_truncates_fractional_pixels() {
        assert_eq!(
            SurfaceSize::covering(Size::new(120.9, 80.2)),
            SurfaceSize::new(120, 80)
        );
        assert_eq!(
            SurfaceSize::covering(Size::new(0.99, 5.0)),
            SurfaceSize::new(0, 5)
        );
    }

    #[test]
    fn covering_maps_degenerate_extents_to_zero() {
        assert_eq!(
            SurfaceSize::covering(Size::new(-3.0, f64::NAN)),
            SurfaceSize::new(0, 0)
        );
        assert_eq!(
            SurfaceSize::covering(Size::new(f64::INFINITY, 2.0)),
            SurfaceSize::new(0, 2)
        );
        assert!(SurfaceSize::new(0, 2).is_empty());
    }

    #[test]
    fn rgba_len_counts_four_bytes_per_pixel() {
        assert_eq!(SurfaceSize::new(3, 5).rgba_len(), 60);
        assert_eq!(SurfaceSize::default().rgba_len(), 0);
    }
}
