// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative configuration: attribute names, typed resolvers, and stores.
//!
//! Scratch cards are configured through string-valued, attribute-style keys
//! (see [`Attribute`]). Each key has a pure resolver that turns the raw value
//! (or its absence) into a typed value. Resolvers never fail: anything that
//! cannot be interpreted falls back to the documented default.
//!
//! ```
//! use understory_scratch::config::{Attribute, Attributes, BrushShape, ScratchConfig};
//!
//! let mut attrs = Attributes::new();
//! attrs.set(Attribute::BrushSize, "24");
//! attrs.set(Attribute::BrushShape, "zigzag");
//!
//! let config = ScratchConfig::resolve(&attrs);
//! assert_eq!(config.brush.size, 24);
//! assert_eq!(config.brush.shape, BrushShape::Round);
//! assert!(!config.percentage_update);
//! ```

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::fmt;

use kurbo::{Join, Stroke};
use peniko::Color;
use peniko::color::{Srgb, parse_color};

/// Brush width used when `brush-size` is absent or invalid.
pub const DEFAULT_BRUSH_SIZE: u32 = 10;

/// Color used when `scratch-color` is absent or invalid (opaque black).
pub const DEFAULT_SCRATCH_COLOR: Color = Color::BLACK;

/// The attribute keys recognized by a scratch card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    /// `brush-size`: stroke width in pixels.
    BrushSize,
    /// `brush-shape`: line join style of the brush.
    BrushShape,
    /// `scratch-color`: fill color of the obscuring layer.
    ScratchColor,
    /// `percentage-update`: enables live coverage reporting when present.
    PercentageUpdate,
}

impl Attribute {
    /// Every attribute a host should observe for changes.
    pub const OBSERVED: [Self; 4] = [
        Self::BrushSize,
        Self::BrushShape,
        Self::ScratchColor,
        Self::PercentageUpdate,
    ];

    /// The attribute's key as it appears in markup.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BrushSize => "brush-size",
            Self::BrushShape => "brush-shape",
            Self::ScratchColor => "scratch-color",
            Self::PercentageUpdate => "percentage-update",
        }
    }

    /// Looks up an attribute by its markup key.
    pub fn from_name(name: &str) -> Result<Self, UnknownAttribute> {
        Self::OBSERVED
            .into_iter()
            .find(|attr| attr.name() == name)
            .ok_or_else(|| UnknownAttribute {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned by [`Attribute::from_name`] for keys that are not observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownAttribute {
    /// The key that was looked up.
    pub name: String,
}

impl fmt::Display for UnknownAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a scratch card attribute", self.name)
    }
}

impl core::error::Error for UnknownAttribute {}

/// Line join style of the brush.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BrushShape {
    /// Rounded joins; a single tap draws a round dot.
    #[default]
    Round,
    /// Beveled joins.
    Bevel,
    /// Mitered joins.
    Miter,
}

impl BrushShape {
    /// The keyword used for this shape in markup.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Bevel => "bevel",
            Self::Miter => "miter",
        }
    }

    /// The equivalent Kurbo join.
    #[must_use]
    pub const fn join(self) -> Join {
        match self {
            Self::Round => Join::Round,
            Self::Bevel => Join::Bevel,
            Self::Miter => Join::Miter,
        }
    }
}

/// Brush parameters derived from the current attributes.
#[derive(Copy, Clone, Debug)]
pub struct BrushConfig {
    /// Stroke width in pixels; always at least 1.
    pub size: u32,
    /// Join style applied to strokes.
    pub shape: BrushShape,
    /// Color of the obscuring layer.
    pub color: Color,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BRUSH_SIZE,
            shape: BrushShape::Round,
            color: DEFAULT_SCRATCH_COLOR,
        }
    }
}

impl BrushConfig {
    /// Resolves the brush from an attribute source.
    #[must_use]
    pub fn resolve(source: &impl AttributeSource) -> Self {
        Self {
            size: resolve_brush_size(source.attribute(Attribute::BrushSize)),
            shape: resolve_brush_shape(source.attribute(Attribute::BrushShape)),
            color: resolve_scratch_color(source.attribute(Attribute::ScratchColor)),
        }
    }

    /// The Kurbo stroke style for erasing with this brush.
    #[must_use]
    pub fn stroke_style(&self) -> Stroke {
        Stroke::new(f64::from(self.size)).with_join(self.shape.join())
    }
}

/// A fully resolved configuration snapshot.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScratchConfig {
    /// Brush parameters.
    pub brush: BrushConfig,
    /// Whether coverage is reported after every stroke.
    pub percentage_update: bool,
}

impl ScratchConfig {
    /// Resolves every key from an attribute source.
    #[must_use]
    pub fn resolve(source: &impl AttributeSource) -> Self {
        Self {
            brush: BrushConfig::resolve(source),
            percentage_update: resolve_percentage_update(source),
        }
    }
}

/// Resolves `brush-size`.
///
/// Reads the leading integer of the value, so `"12px"` gives 12. Values with
/// no leading digits, zero, negative values, and values that overflow fall
/// back to [`DEFAULT_BRUSH_SIZE`].
#[must_use]
pub fn resolve_brush_size(value: Option<&str>) -> u32 {
    let Some(value) = value else {
        return DEFAULT_BRUSH_SIZE;
    };
    let value = value.trim_start();
    let unsigned = value.strip_prefix('+').unwrap_or(value);
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    match unsigned[..digits_end].parse::<u32>() {
        Ok(size) if size > 0 => size,
        _ => DEFAULT_BRUSH_SIZE,
    }
}

/// Resolves `brush-shape`; only the exact keywords are recognized.
#[must_use]
pub fn resolve_brush_shape(value: Option<&str>) -> BrushShape {
    match value {
        Some("bevel") => BrushShape::Bevel,
        Some("miter") => BrushShape::Miter,
        _ => BrushShape::Round,
    }
}

/// Resolves `scratch-color` from any CSS color syntax.
#[must_use]
pub fn resolve_scratch_color(value: Option<&str>) -> Color {
    value
        .and_then(|css| parse_color(css.trim()).ok())
        .map_or(DEFAULT_SCRATCH_COLOR, |color| {
            color.to_alpha_color::<Srgb>()
        })
}

/// Resolves `percentage-update`: presence alone enables it.
#[must_use]
pub fn resolve_percentage_update(source: &impl AttributeSource) -> bool {
    source.has_attribute(Attribute::PercentageUpdate)
}

/// Read access to the attributes of a scratch card host.
pub trait AttributeSource {
    /// The raw value of `attribute`, or `None` when absent.
    fn attribute(&self, attribute: Attribute) -> Option<&str>;

    /// Whether `attribute` is present, regardless of its value.
    fn has_attribute(&self, attribute: Attribute) -> bool {
        self.attribute(attribute).is_some()
    }
}

/// An in-memory attribute store for hosts without their own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    values: BTreeMap<Attribute, String>,
}

impl Attributes {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `attribute` to `value`. Returns `true` if the stored value changed.
    pub fn set(&mut self, attribute: Attribute, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.values.get(&attribute) == Some(&value) {
            return false;
        }
        self.values.insert(attribute, value);
        true
    }

    /// Removes `attribute`. Returns `true` if it was present.
    pub fn remove(&mut self, attribute: Attribute) -> bool {
        self.values.remove(&attribute).is_some()
    }

    /// Builder-style [`Attributes::set`].
    #[must_use]
    pub fn with(mut self, attribute: Attribute, value: impl Into<String>) -> Self {
        self.set(attribute, value);
        self
    }
}

impl AttributeSource for Attributes {
    fn attribute(&self, attribute: Attribute) -> Option<&str> {
        self.values.get(&attribute).map(String::as_str)
    }
}

impl<T: AttributeSource + ?Sized> AttributeSource for &T {
    fn attribute(&self, attribute: Attribute) -> Option<&str> {
        (**self).attribute(attribute)
    }

    fn has_attribute(&self, attribute: Attribute) -> bool {
        (**self).has_attribute(attribute)
    }
}
