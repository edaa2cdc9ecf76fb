// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scratch card: lifecycle, input handling, and coverage reporting.

use kurbo::{Point, Size};
use peniko::Color;

use crate::config::{
    Attribute, AttributeSource, Attributes, BrushConfig, BrushShape, ScratchConfig,
    resolve_brush_shape, resolve_brush_size, resolve_percentage_update, resolve_scratch_color,
};
use crate::coverage::sample_coverage;
use crate::event::{CoverageListeners, ListenerId};
use crate::gesture::{GestureState, StrokeRequest, to_surface_local};
use crate::input::{GestureInput, InputEvent, InputOutcome};
use crate::stroke::stroke;
use crate::surface::{ScratchSurface, SurfaceSize};

/// A scratch-off overlay bound to a surface and an attribute source.
///
/// The card has three lifecycle entry points:
///
/// - [`ScratchCard::new`] when the host creates the element,
/// - [`ScratchCard::on_mount`] once the overlaid content has been laid out,
/// - [`ScratchCard::on_config_changed`] whenever an observed attribute changes.
///
/// Everything else is driven by input through [`ScratchCard::handle_input`]
/// or the individual `handle_*` methods.
#[derive(Debug)]
pub struct ScratchCard<S, A = Attributes> {
    surface: S,
    attributes: A,
    gesture: GestureState,
    listeners: CoverageListeners,
}

impl<S: ScratchSurface, A: AttributeSource> ScratchCard<S, A> {
    /// Creates a card and acquires the surface's rendering context.
    pub fn new(mut surface: S, attributes: A) -> Self {
        let read_frequently = resolve_percentage_update(&attributes);
        if !surface.acquire_context(read_frequently) {
            tracing::debug!("scratch surface has no rendering context yet");
        }
        Self {
            surface,
            attributes,
            gesture: GestureState::default(),
            listeners: CoverageListeners::new(),
        }
    }

    /// Sizes the surface to cover `content` and obscures it.
    ///
    /// Fractional extents are truncated. Mounting again with the same bounds
    /// leaves the card in the same state.
    pub fn on_mount(&mut self, content: Size) {
        let size = SurfaceSize::covering(content);
        tracing::debug!(width = size.width, height = size.height, "mounting scratch surface");
        self.surface.resize(size);
        self.surface.acquire_context(self.percentage_update());
        self.fill();
    }

    /// Reacts to a change of `attribute`.
    ///
    /// Toggling `percentage-update` reacquires the rendering context with a
    /// matching read-back hint. The other attributes are read on demand.
    pub fn on_config_changed(&mut self, attribute: Attribute) {
        tracing::debug!(%attribute, "scratch attribute changed");
        if attribute == Attribute::PercentageUpdate {
            self.surface.acquire_context(self.percentage_update());
        }
    }

    /// Brush width in pixels.
    #[must_use]
    pub fn brush_size(&self) -> u32 {
        resolve_brush_size(self.attributes.attribute(Attribute::BrushSize))
    }

    /// Brush join style.
    #[must_use]
    pub fn brush_shape(&self) -> BrushShape {
        resolve_brush_shape(self.attributes.attribute(Attribute::BrushShape))
    }

    /// Color of the obscuring layer.
    #[must_use]
    pub fn scratch_color(&self) -> Color {
        resolve_scratch_color(self.attributes.attribute(Attribute::ScratchColor))
    }

    /// Whether coverage is reported after every stroke.
    #[must_use]
    pub fn percentage_update(&self) -> bool {
        resolve_percentage_update(&self.attributes)
    }

    /// The current brush.
    #[must_use]
    pub fn brush(&self) -> BrushConfig {
        BrushConfig::resolve(&self.attributes)
    }

    /// Every configuration value at once.
    #[must_use]
    pub fn config(&self) -> ScratchConfig {
        ScratchConfig::resolve(&self.attributes)
    }

    /// Feeds a host input event through the gesture machine.
    ///
    /// Touch moves that continue an active gesture ask the host to suppress
    /// scrolling; nothing else does.
    pub fn handle_input(&mut self, event: InputEvent<'_>) -> InputOutcome {
        let prevent_default = matches!(event, InputEvent::TouchMove { .. }) && self.is_scratching();
        match event.gesture() {
            Some(GestureInput::Start(position)) => self.handle_start(position),
            Some(GestureInput::Move(position)) => self.handle_move(position),
            Some(GestureInput::End) => self.handle_end(),
            None => tracing::trace!(?event, "ignoring input without a position"),
        }
        InputOutcome { prevent_default }
    }

    /// Starts scratching at client position `client`.
    pub fn handle_start(&mut self, client: Point) {
        let local = self.to_local(client);
        let request = self.gesture.start(local);
        tracing::trace!(?local, "scratch start");
        self.apply(request);
    }

    /// Continues scratching to client position `client`; ignored while idle.
    pub fn handle_move(&mut self, client: Point) {
        if !self.gesture.is_active() {
            return;
        }
        let local = self.to_local(client);
        if let Some(request) = self.gesture.update(local) {
            self.apply(request);
        }
    }

    /// Ends or cancels the current gesture. Already drawn strokes remain.
    pub fn handle_end(&mut self) {
        if self.gesture.is_active() {
            tracing::trace!(last = ?self.gesture.last_point(), "scratch end");
        }
        self.gesture.end();
    }

    /// Obscures the whole surface with the scratch color.
    ///
    /// Reports 0 when coverage reporting is enabled.
    pub fn fill(&mut self) {
        if !self.surface.is_ready() {
            return;
        }
        self.surface.fill(self.scratch_color());
        if self.percentage_update() {
            self.emit_coverage_changed(0);
        }
    }

    /// Erases the whole surface.
    ///
    /// Reports 100 when coverage reporting is enabled, without sampling.
    pub fn clear(&mut self) {
        if !self.surface.is_ready() {
            return;
        }
        self.surface.clear();
        if self.percentage_update() {
            self.emit_coverage_changed(100);
        }
    }

    /// Samples the surface and reports the revealed percentage.
    ///
    /// Returns the reported value, or `None` if the surface could not be read.
    pub fn report_coverage(&mut self) -> Option<u8> {
        if !self.surface.is_ready() {
            return None;
        }
        let percent = sample_coverage(&self.surface.read_pixels()?);
        tracing::trace!(percent, "coverage sampled");
        self.emit_coverage_changed(percent);
        Some(percent)
    }

    /// Delivers `percent` to every coverage listener.
    pub fn emit_coverage_changed(&mut self, percent: u8) {
        self.listeners.emit(percent);
    }

    /// Registers a coverage listener.
    pub fn add_listener(&mut self, listener: impl FnMut(u8) + 'static) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Removes a coverage listener. Returns `true` if it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// The gesture state.
    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_scratching(&self) -> bool {
        self.gesture.is_active()
    }

    /// The surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The attribute source.
    #[must_use]
    pub fn attributes(&self) -> &A {
        &self.attributes
    }

    /// Mutable access to the attribute source.
    ///
    /// Call [`ScratchCard::on_config_changed`] after changing an attribute.
    pub fn attributes_mut(&mut self) -> &mut A {
        &mut self.attributes
    }

    /// Splits the card back into its surface and attribute source.
    pub fn into_parts(self) -> (S, A) {
        (self.surface, self.attributes)
    }

    fn to_local(&self, client: Point) -> Point {
        to_surface_local(client, self.surface.origin())
    }

    fn apply(&mut self, request: StrokeRequest) {
        let brush = self.brush();
        let drawn = stroke(
            &mut self.surface,
            request.from,
            request.to,
            &brush,
            request.active,
        );
        if drawn && self.percentage_update() {
            self.report_coverage();
        }
    }
}

impl<S: ScratchSurface> ScratchCard<S, Attributes> {
    /// Sets an attribute and applies the change.
    pub fn set_attribute(&mut self, attribute: Attribute, value: &str) {
        if self.attributes.set(attribute, value) {
            self.on_config_changed(attribute);
        }
    }

    /// Removes an attribute and applies the change.
    pub fn remove_attribute(&mut self, attribute: Attribute) {
        if self.attributes.remove(attribute) {
            self.on_config_changed(attribute);
        }
    }
}
