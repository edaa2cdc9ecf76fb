// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scratch_cpu --heading-base-level=0

//! Understory Scratch CPU surface.
//!
//! This crate provides [`CpuSurface`], an in-memory RGBA8 implementation of
//! [`ScratchSurface`] for tests, headless hosts, and benchmarks.
//!
//! The rasterizer is intentionally simple:
//! - It does **not** anti-alias. A pixel is covered when its center is.
//! - Erased pixels become fully transparent black.
//! - A round brush erases a capsule around the segment. Bevel and miter
//!   brushes erase a rectangle with flat ends, so a zero-length segment
//!   erases nothing with them.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_scratch::{Attribute, Attributes, ScratchCard};
//! use understory_scratch_cpu::CpuSurface;
//!
//! let mut card = ScratchCard::new(
//!     CpuSurface::new(),
//!     Attributes::new().with(Attribute::BrushSize, "4"),
//! );
//! card.on_mount(Size::new(20.0, 20.0));
//! assert_eq!(card.surface().pixel(10, 10), Some([0, 0, 0, 255]));
//!
//! card.handle_start(Point::new(10.0, 10.0));
//! assert_eq!(card.surface().pixel(10, 10), Some([0, 0, 0, 0]));
//! assert!(card.surface().revealed_fraction() > 0.0);
//! ```

#![no_std]

extern crate alloc;

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Join, Line, ParamCurveNearest, Point, Rect, Stroke};
use peniko::Color;
use understory_scratch::{ScratchSurface, SurfaceSize};

/// A scratch surface backed by a CPU pixel buffer.
///
/// Pixels are stored as unpremultiplied RGBA8, row-major, without padding,
/// which is also the layout returned by [`ScratchSurface::read_pixels`].
#[derive(Clone, Debug)]
pub struct CpuSurface {
    size: SurfaceSize,
    pixels: Vec<u8>,
    origin: Point,
    context_available: bool,
    ready: bool,
    read_frequently: bool,
    reads: usize,
}

impl Default for CpuSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSurface {
    /// Creates an empty surface whose context can be acquired.
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: SurfaceSize::default(),
            pixels: Vec::new(),
            origin: Point::ZERO,
            context_available: true,
            ready: false,
            read_frequently: false,
            reads: 0,
        }
    }

    /// Creates a transparent surface of `size`.
    #[must_use]
    pub fn with_size(size: SurfaceSize) -> Self {
        let mut surface = Self::new();
        surface.resize(size);
        surface
    }

    /// Controls whether [`ScratchSurface::acquire_context`] succeeds.
    ///
    /// Making the context unavailable also drops the current one.
    pub fn set_context_available(&mut self, available: bool) {
        self.context_available = available;
        if !available {
            self.ready = false;
        }
    }

    /// Places the surface's top-left corner at `origin` in client space.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// The read-back hint given with the most recent context acquisition.
    #[must_use]
    pub fn read_frequently(&self) -> bool {
        self.read_frequently
    }

    /// Number of times pixels were read back.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// The raw RGBA8 buffer.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA8 value at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = self.index(x, y);
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Exact fraction of fully transparent pixels, in `0.0..=1.0`.
    ///
    /// An empty surface reports `0.0`.
    #[must_use]
    pub fn revealed_fraction(&self) -> f64 {
        let total = self.pixels.len() / 4;
        if total == 0 {
            return 0.0;
        }
        let cleared = self.pixels.chunks_exact(4).filter(|px| px[3] == 0).count();
        cleared as f64 / total as f64
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.size.width as usize + x as usize) * 4
    }

    fn erase_where(&mut self, bounds: Rect, covers: impl Fn(Point) -> bool) {
        let xs = pixel_span(bounds.x0, bounds.x1, self.size.width);
        let ys = pixel_span(bounds.y0, bounds.y1, self.size.height);
        for y in ys {
            for x in xs.clone() {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if covers(center) {
                    let i = self.index(x, y);
                    self.pixels[i..i + 4].fill(0);
                }
            }
        }
    }
}

impl ScratchSurface for CpuSurface {
    fn acquire_context(&mut self, read_frequently: bool) -> bool {
        self.ready = self.context_available;
        if self.ready {
            self.read_frequently = read_frequently;
        }
        self.ready
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.pixels = vec![0; size.rgba_len()];
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn fill(&mut self, color: Color) {
        let src = color.to_rgba8();
        let src = [src.r, src.g, src.b, src.a];
        for px in self.pixels.chunks_exact_mut(4) {
            source_over(px, src);
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn erase_segment(&mut self, line: Line, style: &Stroke) {
        let half_width = style.width * 0.5;
        if half_width.is_nan() || half_width <= 0.0 || self.size.is_empty() {
            return;
        }
        let bounds = Rect::from_points(line.p0, line.p1).inflate(half_width, half_width);
        match style.join {
            Join::Round => {
                let limit = half_width * half_width;
                self.erase_where(bounds, |pt| line.nearest(pt, 0.).distance_sq <= limit);
            }
            Join::Bevel | Join::Miter => {
                let dir = line.p1 - line.p0;
                let len = dir.length();
                if len == 0.0 {
                    return;
                }
                let unit = dir / len;
                self.erase_where(bounds, |pt| {
                    let rel = pt - line.p0;
                    let along = rel.dot(unit);
                    (0.0..=len).contains(&along) && rel.cross(unit).abs() <= half_width
                });
            }
        }
    }

    fn read_pixels(&mut self) -> Option<Cow<'_, [u8]>> {
        if !self.ready {
            return None;
        }
        self.reads += 1;
        Some(Cow::Borrowed(&self.pixels))
    }
}

/// Pixel indices whose centers may fall inside `lo..hi`, clamped to `limit`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "values are clamped to 0..=limit before the cast"
)]
fn pixel_span(lo: f64, hi: f64, limit: u32) -> Range<u32> {
    let limit = f64::from(limit);
    let start = lo.floor().clamp(0.0, limit);
    let end = hi.ceil().clamp(0.0, limit);
    if start.is_nan() || end.is_nan() {
        return 0..0;
    }
    start as u32..end as u32
}

/// Composites an unpremultiplied `src` over the unpremultiplied `dst` pixel.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "channels are rounded and clamped to 0..=255 before the cast"
)]
fn source_over(dst: &mut [u8], src: [u8; 4]) {
    if src[3] == 255 || dst[3] == 0 {
        dst.copy_from_slice(&src);
        return;
    }
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0 * (1.0 - sa);
    let out_a = sa + da;
    if out_a <= 0.0 {
        dst.fill(0);
        return;
    }
    for (d, s) in dst[..3].iter_mut().zip(&src[..3]) {
        let v = (f32::from(*s) * sa + f32::from(*d) * da) / out_a;
        *d = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
