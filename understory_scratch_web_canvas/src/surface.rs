// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`ScratchSurface`] over an HTML `<canvas>` element.

use std::borrow::Cow;
use std::fmt;

use js_sys::{Object, Reflect};
use kurbo::{Join, Line, Point, Stroke};
use peniko::Color;
use understory_scratch::{ScratchSurface, SurfaceSize};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A scratch surface drawing into a `<canvas>` through its 2D context.
///
/// The context is acquired lazily through
/// [`ScratchSurface::acquire_context`], so the surface can be created before
/// the canvas is attached to a document.
pub struct WebCanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
}

impl fmt::Debug for WebCanvasSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebCanvasSurface")
            .field("width", &self.canvas.width())
            .field("height", &self.canvas.height())
            .field("ready", &self.ctx.is_some())
            .finish_non_exhaustive()
    }
}

impl WebCanvasSurface {
    /// Wraps `canvas` without acquiring a context yet.
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, ctx: None }
    }

    /// The wrapped canvas element.
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_composite(ctx: &CanvasRenderingContext2d, op: &str) {
        if let Err(err) = ctx.set_global_composite_operation(op) {
            tracing::debug!(?err, op, "globalCompositeOperation rejected");
        }
    }

    fn set_css_extent(&self, property: &str, px: u32) {
        let value = format!("{px}px");
        if let Err(err) = self.canvas.style().set_property(property, &value) {
            tracing::debug!(?err, property, "failed to set canvas style");
        }
    }
}

fn context_options(read_frequently: bool) -> Result<Object, JsValue> {
    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("willReadFrequently"),
        &JsValue::from_bool(read_frequently),
    )?;
    Ok(options)
}

fn color_to_css(color: Color) -> String {
    // `Rgba8` formats as a CSS `rgb(...)`/`rgba(...)` string.
    color.to_rgba8().to_string()
}

fn join_to_canvas(join: Join) -> &'static str {
    match join {
        Join::Bevel => "bevel",
        Join::Miter => "miter",
        Join::Round => "round",
    }
}

impl ScratchSurface for WebCanvasSurface {
    fn acquire_context(&mut self, read_frequently: bool) -> bool {
        let ctx = context_options(read_frequently)
            .and_then(|options| self.canvas.get_context_with_context_options("2d", &options))
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        if ctx.is_none() {
            tracing::debug!(read_frequently, "2d context unavailable");
        }
        self.ctx = ctx;
        self.ctx.is_some()
    }

    fn is_ready(&self) -> bool {
        self.ctx.is_some()
    }

    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.set_css_extent("width", size.width);
        self.canvas.set_width(size.width);
        self.set_css_extent("height", size.height);
        self.canvas.set_height(size.height);
    }

    fn origin(&self) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        let (scroll_left, scroll_top) = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body())
            .map_or((0, 0), |body| (body.scroll_left(), body.scroll_top()));
        Point::new(
            rect.left() + f64::from(scroll_left),
            rect.top() + f64::from(scroll_top),
        )
    }

    fn fill(&mut self, color: Color) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        let size = self.size();
        Self::set_composite(ctx, "source-over");
        ctx.set_fill_style_str(&color_to_css(color));
        ctx.fill_rect(0.0, 0.0, f64::from(size.width), f64::from(size.height));
    }

    fn clear(&mut self) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        let size = self.size();
        Self::set_composite(ctx, "destination-out");
        ctx.fill_rect(0.0, 0.0, f64::from(size.width), f64::from(size.height));
    }

    fn erase_segment(&mut self, line: Line, style: &Stroke) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        ctx.begin_path();
        Self::set_composite(ctx, "destination-out");
        ctx.set_line_width(style.width);
        ctx.set_line_join(join_to_canvas(style.join));
        ctx.move_to(line.p0.x, line.p0.y);
        ctx.line_to(line.p1.x, line.p1.y);
        ctx.close_path();
        ctx.stroke();
    }

    fn read_pixels(&mut self) -> Option<Cow<'_, [u8]>> {
        let ctx = self.ctx.as_ref()?;
        let size = self.size();
        if size.is_empty() {
            return Some(Cow::Owned(Vec::new()));
        }
        match ctx.get_image_data(0.0, 0.0, f64::from(size.width), f64::from(size.height)) {
            Ok(image) => Some(Cow::Owned(image.data().0)),
            Err(err) => {
                tracing::debug!(?err, "getImageData failed");
                None
            }
        }
    }
}
