// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Custom-element style binding: shadow DOM, event wiring, and notifications.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kurbo::{Point, Size};
use understory_scratch::{
    Attribute, Attributes, DeferredCoverage, InputEvent, PERCENTAGE_UPDATE_EVENT, ScratchCard,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, CustomEvent, CustomEventInit, Document, Element, Event, EventTarget,
    HtmlCanvasElement, HtmlElement, HtmlImageElement, HtmlSlotElement, HtmlTemplateElement,
    MouseEvent, ShadowRoot, ShadowRootInit, ShadowRootMode, TouchEvent,
};

use crate::WebCanvasSurface;

/// The card type driven by a [`ScratchElement`].
pub type WebScratchCard = ScratchCard<WebCanvasSurface, Attributes>;

const STYLE: &str = ":host{display:inline-block}\
div{position:relative;display:inline-block}\
canvas{position:absolute;top:0;left:0}";

/// Name of the hidden slot holding an optional image for the scratch layer.
pub const SCRATCH_SOURCE_SLOT: &str = "scratch-source";

thread_local! {
    static TEMPLATE: RefCell<Option<HtmlTemplateElement>> = const { RefCell::new(None) };
}

/// Returns this thread's template, building it on first use.
fn template(document: &Document) -> Result<HtmlTemplateElement, JsValue> {
    TEMPLATE.with(|cell| {
        if let Some(template) = cell.borrow().as_ref() {
            return Ok(template.clone());
        }
        let template = document
            .create_element("template")?
            .dyn_into::<HtmlTemplateElement>()
            .map_err(JsValue::from)?;
        template.set_inner_html(&format!(
            "<style>{STYLE}</style><div><slot></slot>\
             <slot name=\"{SCRATCH_SOURCE_SLOT}\" hidden></slot><canvas></canvas></div>"
        ));
        *cell.borrow_mut() = Some(template.clone());
        Ok(template)
    })
}

/// Reads the observed attributes of `host` into a store.
pub fn host_attributes(host: &Element) -> Attributes {
    let mut attributes = Attributes::new();
    for attribute in Attribute::OBSERVED {
        if let Some(value) = host.get_attribute(attribute.name()) {
            attributes.set(attribute, value);
        }
    }
    attributes
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

fn listen(
    target: &EventTarget,
    kind: &'static str,
    passive: Option<bool>,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener, JsValue> {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    match passive {
        Some(passive) => {
            let options = AddEventListenerOptions::new();
            options.set_passive(passive);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            )?;
        }
        None => {
            target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        }
    }
    Ok(Listener {
        target: target.clone(),
        kind,
        callback,
    })
}

fn client_position(event: &Event) -> Option<Point> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Point::new(
        f64::from(mouse.client_x()),
        f64::from(mouse.client_y()),
    ))
}

fn touch_positions(event: &Event) -> Vec<Point> {
    let Some(touch) = event.dyn_ref::<TouchEvent>() else {
        return Vec::new();
    };
    let list = touch.target_touches();
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect()
}

fn dispatch_percentage(host: &HtmlElement, percent: u8) {
    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from(percent));
    match CustomEvent::new_with_event_init_dict(PERCENTAGE_UPDATE_EVENT, &init) {
        Ok(event) => {
            if let Err(err) = host.dispatch_event(&event) {
                tracing::debug!(?err, "failed to dispatch coverage event");
            }
        }
        Err(err) => tracing::debug!(?err, "failed to create coverage event"),
    }
}

fn query_slot(root: &ShadowRoot, selector: &str) -> Result<HtmlSlotElement, JsValue> {
    root.query_selector(selector)?
        .ok_or_else(|| JsValue::from_str("template slot missing"))?
        .dyn_into::<HtmlSlotElement>()
        .map_err(JsValue::from)
}

/// State shared between the element and its event closures.
///
/// Coverage notifications are queued while the card is borrowed and
/// dispatched once the borrow ends, so `percentage-update` handlers can call
/// back into the element.
struct Shared {
    host: HtmlElement,
    card: RefCell<WebScratchCard>,
    pending: DeferredCoverage,
}

impl Shared {
    fn with_card<R>(&self, f: impl FnOnce(&mut WebScratchCard) -> R) -> Option<R> {
        let result = match self.card.try_borrow_mut() {
            Ok(mut card) => Some(f(&mut card)),
            Err(_) => {
                tracing::debug!("scratch card is busy");
                None
            }
        };
        while let Some(percent) = self.pending.pop() {
            dispatch_percentage(&self.host, percent);
        }
        result
    }

    fn forward(&self, input: InputEvent<'_>, event: &Event) {
        let outcome = self.with_card(|card| card.handle_input(input));
        if outcome.is_some_and(|outcome| outcome.prevent_default) {
            event.prevent_default();
        }
    }
}

/// A scratch card living in the shadow root of a host element.
///
/// The host is expected to call [`connected`](Self::connected) when it is
/// inserted into a document and [`attribute_changed`](Self::attribute_changed)
/// for every change of an observed attribute (see
/// [`Attribute::OBSERVED`]). Dropping the element removes its event
/// listeners.
pub struct ScratchElement {
    shared: Rc<Shared>,
    slot: HtmlSlotElement,
    source_slot: HtmlSlotElement,
    listeners: Vec<Listener>,
}

impl fmt::Debug for ScratchElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchElement")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.shared.pending.len())
            .finish_non_exhaustive()
    }
}

impl ScratchElement {
    /// Attaches an open shadow root to `host` and wires the scratch card.
    ///
    /// Pointer and touch presses are observed on the canvas; moves and
    /// releases are observed on the window so a gesture can leave the card.
    /// Touch moves are registered as non-passive so they can suppress
    /// scrolling while scratching.
    pub fn attach(host: HtmlElement) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let document = host
            .owner_document()
            .or_else(|| window.document())
            .ok_or_else(|| JsValue::from_str("missing document"))?;

        let shadow = host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?;
        let content = template(&document)?.content().clone_node_with_deep(true)?;
        shadow.append_child(&content)?;

        let canvas = shadow
            .query_selector("canvas")?
            .ok_or_else(|| JsValue::from_str("template has no canvas"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        let slot = query_slot(&shadow, "slot:not([name])")?;
        let source_slot = query_slot(&shadow, &format!("slot[name=\"{SCRATCH_SOURCE_SLOT}\"]"))?;

        let pending = DeferredCoverage::new();
        let mut card = ScratchCard::new(
            WebCanvasSurface::new(canvas.clone()),
            host_attributes(&host),
        );
        let sink = pending.clone();
        card.add_listener(move |percent| sink.push(percent));

        // Listeners are registered on `element` so that a failure part way
        // through detaches the ones already added when it is dropped.
        let mut element = Self {
            shared: Rc::new(Shared {
                host,
                card: RefCell::new(card),
                pending,
            }),
            slot,
            source_slot,
            listeners: Vec::with_capacity(7),
        };
        let on_canvas: &EventTarget = &canvas;
        let on_window: &EventTarget = &window;

        let s = Rc::clone(&element.shared);
        element.listeners.push(listen(on_canvas, "mousedown", None, move |event| {
            if let Some(position) = client_position(&event) {
                s.forward(InputEvent::PointerDown { position }, &event);
            }
        })?);
        let s = Rc::clone(&element.shared);
        element.listeners.push(listen(on_window, "mousemove", None, move |event| {
            if let Some(position) = client_position(&event) {
                s.forward(InputEvent::PointerMove { position }, &event);
            }
        })?);
        let s = Rc::clone(&element.shared);
        element.listeners.push(listen(on_window, "mouseup", None, move |event| {
            s.forward(InputEvent::PointerUp, &event);
        })?);
        let s = Rc::clone(&element.shared);
        element.listeners.push(listen(on_canvas, "touchstart", None, move |event| {
            let touches = touch_positions(&event);
            s.forward(InputEvent::TouchStart { touches: &touches }, &event);
        })?);
        let s = Rc::clone(&element.shared);
        element.listeners.push(listen(on_window, "touchmove", Some(false), move |event| {
            let touches = touch_positions(&event);
            s.forward(InputEvent::TouchMove { touches: &touches }, &event);
        })?);
        let s = Rc::clone(&element.shared);
        element.listeners.push(listen(on_window, "touchcancel", None, move |event| {
            s.forward(InputEvent::TouchCancel, &event);
        })?);
        let s = Rc::clone(&element.shared);
        element.listeners.push(listen(on_window, "touchend", None, move |event| {
            s.forward(InputEvent::TouchEnd, &event);
        })?);

        tracing::debug!("scratch element attached");
        Ok(element)
    }

    /// Sizes the canvas over the first slotted element and obscures it.
    ///
    /// Does nothing when no element is slotted.
    pub fn connected(&self) {
        let Some(content) = self
            .slot
            .assigned_elements()
            .get(0)
            .dyn_into::<Element>()
            .ok()
        else {
            tracing::debug!("no slotted content to cover");
            return;
        };
        let rect = content.get_bounding_client_rect();
        self.with_card(|card| card.on_mount(Size::new(rect.width(), rect.height())));
    }

    /// Re-reads the attribute `name` from the host and applies it.
    ///
    /// Attributes outside [`Attribute::OBSERVED`] are ignored.
    pub fn attribute_changed(&self, name: &str) {
        let attribute = match Attribute::from_name(name) {
            Ok(attribute) => attribute,
            Err(err) => {
                tracing::debug!(%err, "ignoring attribute change");
                return;
            }
        };
        let value = self.shared.host.get_attribute(name);
        self.with_card(|card| match value {
            Some(value) => card.set_attribute(attribute, &value),
            None => card.remove_attribute(attribute),
        });
    }

    /// Obscures the whole card again.
    pub fn fill(&self) {
        self.with_card(WebScratchCard::fill);
    }

    /// Reveals the whole card.
    pub fn clear(&self) {
        self.with_card(WebScratchCard::clear);
    }

    /// The `<img>` assigned to the hidden [`SCRATCH_SOURCE_SLOT`] slot, if any.
    pub fn scratch_source_image(&self) -> Option<HtmlImageElement> {
        self.source_slot
            .assigned_elements()
            .get(0)
            .dyn_into::<HtmlImageElement>()
            .ok()
    }

    /// The host element.
    pub fn host(&self) -> &HtmlElement {
        &self.shared.host
    }

    /// Runs `f` with the card, then dispatches the coverage events it queued.
    ///
    /// Returns `None` without running `f` when the card is already in use
    /// further up the call stack. Event handlers for `percentage-update` run
    /// after the card is released and may call back into the element.
    pub fn with_card<R>(&self, f: impl FnOnce(&mut WebScratchCard) -> R) -> Option<R> {
        self.shared.with_card(f)
    }
}

impl Drop for ScratchElement {
    fn drop(&mut self) {
        for listener in &self.listeners {
            if let Err(err) = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            ) {
                tracing::debug!(?err, kind = listener.kind, "failed to remove listener");
            }
        }
    }
}
