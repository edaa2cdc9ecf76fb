// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sampled estimate of how much of a surface has been scratched away.
//!
//! The estimate looks only at the alpha channel of an RGBA8 pixel buffer and
//! only at every [`COVERAGE_STRIDE`]-th pixel, starting with the first. A
//! sampled pixel counts as cleared when its alpha is exactly zero.
//!
//! The denominator is the *fractional* number of strides that fit in the
//! alpha view (`alpha_len / COVERAGE_STRIDE`), while the numerator counts
//! every visited sample. When the length is not a multiple of the stride the
//! ratio can exceed one, so the rounded result is clamped to `0..=100`.
//!
//! ```
//! use understory_scratch::coverage::{COVERAGE_STRIDE, sample_coverage};
//!
//! // Two strides worth of opaque pixels; clear the first sample.
//! let mut pixels = vec![255_u8; COVERAGE_STRIDE * 2 * 4];
//! pixels[3] = 0;
//! assert_eq!(sample_coverage(&pixels), 50);
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Number of alpha values between two samples.
pub const COVERAGE_STRIDE: usize = 146;

/// A single channel of an RGBA8 pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Byte 0 of each pixel.
    Red,
    /// Byte 1 of each pixel.
    Green,
    /// Byte 2 of each pixel.
    Blue,
    /// Byte 3 of each pixel.
    Alpha,
}

impl Channel {
    /// Byte offset of the channel within a pixel.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Alpha => 3,
        }
    }
}

/// Iterates the values of one channel over every complete pixel.
///
/// Trailing bytes that do not form a whole pixel are ignored.
pub fn channel_values(pixels: &[u8], channel: Channel) -> impl Iterator<Item = u8> + '_ {
    let offset = channel.offset();
    pixels.chunks_exact(4).map(move |px| px[offset])
}

/// Estimates the revealed percentage of an RGBA8 buffer.
///
/// Returns 0 for an empty buffer.
#[must_use]
pub fn sample_coverage(pixels: &[u8]) -> u8 {
    let alpha_len = pixels.len() / 4;
    if alpha_len == 0 {
        return 0;
    }

    let cleared = channel_values(pixels, Channel::Alpha)
        .step_by(COVERAGE_STRIDE)
        .filter(|&alpha| alpha == 0)
        .count();

    let ratio = cleared as f64 / (alpha_len as f64 / COVERAGE_STRIDE as f64);
    to_percent(ratio)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the value is clamped to 0..=100 before the cast"
)]
fn to_percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}
