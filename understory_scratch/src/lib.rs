// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scratch --heading-base-level=0

//! Understory Scratch: scratch-off reveal surfaces.
//!
//! A scratch card is an overlay that hides the content below it until the
//! user scratches it away with a pointer or a finger. This crate contains the
//! headless engine behind such an overlay:
//!
//! - [`gesture`]: a small state machine turning press/move/release into
//!   stroke requests.
//! - [`stroke`]: erasing strokes along the gesture path, with a nudge that
//!   keeps single taps visible.
//! - [`coverage`]: a sampled estimate of the revealed percentage, read from
//!   the surface's alpha channel.
//! - [`surface`]: the [`ScratchSurface`] capability trait implemented by
//!   rendering backends.
//! - [`config`]: attribute keys and their typed, total resolvers.
//! - [`event`]: coverage-changed listeners.
//! - [`input`]: host pointer/touch events and their gesture mapping.
//!
//! [`ScratchCard`] ties these together and exposes an explicit lifecycle:
//! create it with a surface and an attribute source, call
//! [`ScratchCard::on_mount`] once the covered content has a size, and forward
//! attribute changes to [`ScratchCard::on_config_changed`].
//!
//! The crate does not own a window, a canvas, or an event loop. Backends such
//! as `understory_scratch_cpu` (a pixel buffer) or
//! `understory_scratch_web_canvas` (a `<canvas>` element) provide the
//! surface, and the host forwards input events.
//!
//! ## Example
//!
//! ```rust
//! use std::borrow::Cow;
//! use kurbo::{Line, Point, Size, Stroke};
//! use peniko::Color;
//! use understory_scratch::config::{Attribute, Attributes};
//! use understory_scratch::input::InputEvent;
//! use understory_scratch::surface::{ScratchSurface, SurfaceSize};
//! use understory_scratch::ScratchCard;
//!
//! /// A surface that only counts erasing strokes.
//! #[derive(Default)]
//! struct Counting {
//!     size: SurfaceSize,
//!     strokes: usize,
//! }
//!
//! impl ScratchSurface for Counting {
//!     fn acquire_context(&mut self, _read_frequently: bool) -> bool { true }
//!     fn is_ready(&self) -> bool { true }
//!     fn size(&self) -> SurfaceSize { self.size }
//!     fn resize(&mut self, size: SurfaceSize) { self.size = size; }
//!     fn origin(&self) -> Point { Point::ZERO }
//!     fn fill(&mut self, _color: Color) {}
//!     fn clear(&mut self) {}
//!     fn erase_segment(&mut self, _line: Line, _style: &Stroke) { self.strokes += 1; }
//!     fn read_pixels(&mut self) -> Option<Cow<'_, [u8]>> { None }
//! }
//!
//! let attrs = Attributes::new().with(Attribute::BrushSize, "24");
//! let mut card = ScratchCard::new(Counting::default(), attrs);
//! card.on_mount(Size::new(300.5, 120.0));
//! assert_eq!(card.surface().size(), SurfaceSize::new(300, 120));
//!
//! let _ = card.handle_input(InputEvent::PointerDown { position: Point::new(10.0, 10.0) });
//! let _ = card.handle_input(InputEvent::PointerMove { position: Point::new(40.0, 12.0) });
//! let _ = card.handle_input(InputEvent::PointerUp);
//! // Moves after release are ignored.
//! let _ = card.handle_input(InputEvent::PointerMove { position: Point::new(80.0, 12.0) });
//!
//! assert_eq!(card.surface().strokes, 2);
//! ```
//!
//! ## Logging
//!
//! Lifecycle and configuration transitions are logged through `tracing` at
//! `debug` level; per-event work is logged at `trace` level. The crate never
//! installs a subscriber.
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to Kurbo, Peniko, and `tracing`.
//! - `libm`: use `libm` for float math in `no_std` builds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod card;
pub mod config;
pub mod coverage;
pub mod event;
pub mod gesture;
pub mod input;
pub mod stroke;
pub mod surface;

pub use card::ScratchCard;
pub use config::{Attribute, AttributeSource, Attributes, BrushConfig, BrushShape, ScratchConfig};
pub use coverage::{COVERAGE_STRIDE, sample_coverage};
pub use event::{CoverageListeners, DeferredCoverage, ListenerId, PERCENTAGE_UPDATE_EVENT};
pub use gesture::{GesturePhase, GestureState};
pub use input::{InputEvent, InputOutcome};
pub use surface::{ScratchSurface, SurfaceSize};
