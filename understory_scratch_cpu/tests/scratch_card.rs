// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests driving a `ScratchCard` over a `CpuSurface`.
//!
//! These check that strokes really remove pixels and that the sampled
//! coverage reported to listeners matches what was erased.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size};
use understory_scratch::{
    Attribute, Attributes, DeferredCoverage, InputEvent, ScratchCard, ScratchSurface,
};
use understory_scratch_cpu::CpuSurface;

fn reporting_card(brush_size: &str) -> ScratchCard<CpuSurface> {
    let attrs = Attributes::new()
        .with(Attribute::PercentageUpdate, "")
        .with(Attribute::BrushSize, brush_size);
    ScratchCard::new(CpuSurface::new(), attrs)
}

fn log_of(card: &mut ScratchCard<CpuSurface>) -> Rc<RefCell<Vec<u8>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    card.add_listener(move |percent| sink.borrow_mut().push(percent));
    log
}

fn erased_pixels(card: &ScratchCard<CpuSurface>) -> usize {
    card.surface()
        .pixels()
        .chunks_exact(4)
        .filter(|px| px[3] == 0)
        .count()
}

#[test]
fn mount_obscures_the_content_with_the_scratch_color() {
    let mut card = ScratchCard::new(
        CpuSurface::new(),
        Attributes::new().with(Attribute::ScratchColor, "rgb(200, 10, 20)"),
    );

    card.on_mount(Size::new(12.9, 7.0));

    let surface = card.surface();
    assert_eq!(surface.size().width, 12);
    assert_eq!(surface.size().height, 7);
    assert!(
        surface
            .pixels()
            .chunks_exact(4)
            .all(|px| px == [200, 10, 20, 255]),
        "every pixel should carry the scratch color"
    );
}

#[test]
fn mounting_twice_leaves_the_same_pixels_as_mounting_once() {
    let mount = |times: usize| {
        let mut card = ScratchCard::new(
            CpuSurface::new(),
            Attributes::new().with(Attribute::ScratchColor, "rgba(255, 0, 0, 0.5)"),
        );
        for _ in 0..times {
            card.on_mount(Size::new(6.0, 4.0));
        }
        card.surface().pixels().to_vec()
    };

    let once = mount(1);
    let twice = mount(2);

    assert_eq!(once, twice);
    // A translucent fill is not composited over the previous one.
    assert_eq!(&once[..4], &[255, 0, 0, 128]);
}

#[test]
fn a_band_across_half_the_sampled_rows_reports_fifty() {
    // With a width of one stride, the samples are the first pixel of each row.
    let mut card = reporting_card("5");
    let log = log_of(&mut card);
    card.on_mount(Size::new(146.0, 10.0));

    card.handle_start(Point::new(-10.0, 2.5));
    card.handle_move(Point::new(160.0, 2.5));
    card.handle_end();

    assert_eq!(*log.borrow(), vec![0, 0, 50]);
    assert_eq!(card.surface().reads(), 2);
    assert_eq!(card.surface().revealed_fraction(), 0.5);
}

#[test]
fn client_positions_are_offset_by_the_surface_origin() {
    let mut card = reporting_card("2");
    card.surface_mut().set_origin(Point::new(100.0, 200.0));
    card.on_mount(Size::new(10.0, 10.0));

    let _ = card.handle_input(InputEvent::PointerDown {
        position: Point::new(105.0, 205.0),
    });

    assert_eq!(card.gesture().last_point(), Point::new(5.0, 5.0));
    assert_eq!(card.surface().pixel(5, 5), Some([0, 0, 0, 0]));
    assert_eq!(card.surface().pixel(0, 0), Some([0, 0, 0, 255]));
}

#[test]
fn round_taps_erase_more_than_flat_ended_taps() {
    let tap = |shape: &str| {
        let attrs = Attributes::new()
            .with(Attribute::BrushSize, "10")
            .with(Attribute::BrushShape, shape);
        let mut card = ScratchCard::new(CpuSurface::new(), attrs);
        card.on_mount(Size::new(20.0, 20.0));
        card.handle_start(Point::new(10.0, 10.0));
        card.handle_end();
        erased_pixels(&card)
    };

    let round = tap("round");
    let bevel = tap("bevel");
    let miter = tap("miter");

    assert!(bevel > 0, "the nudge keeps a bevel tap visible");
    assert!(round > bevel, "round {round} vs bevel {bevel}");
    assert_eq!(bevel, miter);
}

#[test]
fn touch_scratching_prevents_scrolling_and_erases() {
    let mut card = reporting_card("4");
    card.on_mount(Size::new(30.0, 30.0));

    let idle = card.handle_input(InputEvent::TouchMove {
        touches: &[Point::new(3.0, 3.0)],
    });
    assert!(!idle.prevent_default);
    assert_eq!(erased_pixels(&card), 0);

    let _ = card.handle_input(InputEvent::TouchStart {
        touches: &[Point::new(5.0, 15.0), Point::new(25.0, 25.0)],
    });
    let moved = card.handle_input(InputEvent::TouchMove {
        touches: &[Point::new(25.0, 15.0)],
    });
    let _ = card.handle_input(InputEvent::TouchEnd);

    assert!(moved.prevent_default);
    assert_eq!(card.surface().pixel(15, 15), Some([0, 0, 0, 0]));
    // The second touch is ignored.
    assert_eq!(card.surface().pixel(25, 25), Some([0, 0, 0, 255]));
    assert!(!card.is_scratching());
}

#[test]
fn moves_after_release_do_not_erase() {
    let mut card = reporting_card("6");
    card.on_mount(Size::new(40.0, 40.0));
    card.handle_start(Point::new(5.0, 5.0));
    card.handle_end();
    let before = card.surface().pixels().to_vec();

    card.handle_move(Point::new(35.0, 35.0));

    assert_eq!(card.surface().pixels(), &before[..]);
}

#[test]
fn clear_and_refill_report_without_sampling() {
    let mut card = reporting_card("10");
    card.on_mount(Size::new(8.0, 8.0));
    let log = log_of(&mut card);

    card.clear();
    assert_eq!(card.surface().revealed_fraction(), 1.0);
    card.fill();
    assert_eq!(card.surface().revealed_fraction(), 0.0);

    assert_eq!(*log.borrow(), vec![100, 0]);
    assert_eq!(card.surface().reads(), 0);
}

#[test]
fn reporting_toggle_updates_the_read_back_hint() {
    let mut card = ScratchCard::new(CpuSurface::new(), Attributes::new());
    card.on_mount(Size::new(4.0, 4.0));
    assert!(!card.surface().read_frequently());

    card.set_attribute(Attribute::PercentageUpdate, "");
    assert!(card.surface().read_frequently());

    card.handle_start(Point::new(1.0, 1.0));
    assert_eq!(card.surface().reads(), 1);

    card.remove_attribute(Attribute::PercentageUpdate);
    assert!(!card.surface().read_frequently());
    card.handle_move(Point::new(3.0, 3.0));
    assert_eq!(card.surface().reads(), 1);
}

#[test]
fn without_a_context_nothing_is_drawn_or_reported() {
    let mut surface = CpuSurface::new();
    surface.set_context_available(false);
    let mut card = ScratchCard::new(
        surface,
        Attributes::new().with(Attribute::PercentageUpdate, ""),
    );
    let log = log_of(&mut card);

    card.on_mount(Size::new(10.0, 10.0));
    card.handle_start(Point::new(5.0, 5.0));

    assert!(!card.surface().is_ready());
    assert!(log.borrow().is_empty());
    assert_eq!(card.report_coverage(), None);
    // Resizing still happens; the buffer stays transparent.
    assert_eq!(card.surface().pixels().len(), 400);
}

/// A card shared with its coverage handler the way an embedding host holds
/// it: notifications are queued while the card is borrowed and delivered
/// afterwards.
struct SharedCard {
    card: RefCell<ScratchCard<CpuSurface>>,
    pending: DeferredCoverage,
    delivered: RefCell<Vec<u8>>,
    reveal_at: u8,
}

impl SharedCard {
    fn new(mut card: ScratchCard<CpuSurface>, reveal_at: u8) -> Self {
        let pending = DeferredCoverage::new();
        let sink = pending.clone();
        card.add_listener(move |percent| sink.push(percent));
        Self {
            card: RefCell::new(card),
            pending,
            delivered: RefCell::new(Vec::new()),
            reveal_at,
        }
    }

    fn with_card<R>(&self, f: impl FnOnce(&mut ScratchCard<CpuSurface>) -> R) -> Option<R> {
        let result = self.card.try_borrow_mut().ok().map(|mut card| f(&mut card));
        while let Some(percent) = self.pending.pop() {
            self.on_percentage(percent);
        }
        result
    }

    /// Reveals everything once enough has been scratched.
    fn on_percentage(&self, percent: u8) {
        self.delivered.borrow_mut().push(percent);
        if (self.reveal_at..100).contains(&percent) {
            assert!(
                self.with_card(ScratchCard::clear).is_some(),
                "the card should be free while handlers run"
            );
        }
    }
}

#[test]
fn coverage_handlers_can_clear_the_card_they_observe() {
    let shared = SharedCard::new(reporting_card("5"), 50);

    shared.with_card(|card| card.on_mount(Size::new(146.0, 10.0)));
    shared.with_card(|card| card.handle_start(Point::new(-10.0, 2.5)));
    shared.with_card(|card| card.handle_move(Point::new(160.0, 2.5)));

    assert_eq!(*shared.delivered.borrow(), vec![0, 0, 50, 100]);
    assert!(shared.pending.is_empty());
    let card = shared.card.borrow();
    assert_eq!(card.surface().revealed_fraction(), 1.0);
}
