// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scratch_web_canvas --heading-base-level=0

//! Web Canvas (2D) binding for Understory Scratch.
//!
//! This crate provides, when targeting `wasm32`:
//!
//! - `WebCanvasSurface`: a [`ScratchSurface`](understory_scratch::ScratchSurface)
//!   backed by `web_sys::CanvasRenderingContext2d`. Erasing uses the
//!   `destination-out` composite operation, and coverage is read back with
//!   `getImageData`.
//! - `ScratchElement`: a custom-element style wrapper. It attaches an open
//!   shadow root to a host element, covers the slotted content with a
//!   `<canvas>`, forwards mouse and touch events, and dispatches
//!   `percentage-update` `CustomEvent`s whose `detail` is the revealed
//!   percentage.
//!
//! # Usage
//!
//! The element does not register itself as a custom element. Hosts forward
//! the lifecycle callbacks of their own element class:
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn mount(
//!     host: web_sys::HtmlElement,
//! ) -> Result<understory_scratch_web_canvas::ScratchElement, wasm_bindgen::JsValue> {
//!     let element = understory_scratch_web_canvas::ScratchElement::attach(host)?;
//!     // From `connectedCallback`:
//!     element.connected();
//!     // From `attributeChangedCallback`:
//!     element.attribute_changed("brush-size");
//!     Ok(element)
//! }
//! ```
//!
//! Notes:
//! - The shadow DOM template is built once per thread and cloned for every
//!   element.
//! - The surface origin follows `getBoundingClientRect` plus the document
//!   body's scroll offset.
//! - On other targets the crate is empty.

#[cfg(target_arch = "wasm32")]
mod element;
#[cfg(target_arch = "wasm32")]
mod surface;

#[cfg(target_arch = "wasm32")]
pub use element::{SCRATCH_SOURCE_SLOT, ScratchElement, WebScratchCard, host_attributes};
#[cfg(target_arch = "wasm32")]
pub use surface::WebCanvasSurface;
