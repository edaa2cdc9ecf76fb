// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scratch gesture tracking: turn start/move/end input into stroke segments.
//!
//! ## Usage
//!
//! 1) Call [`GestureState::start`] with the surface-local press position. It
//!    returns the single-point segment that draws the initial dot.
//! 2) On each move, call [`GestureState::update`]. It returns the segment
//!    from the previous point to the new one, or `None` while idle.
//! 3) Call [`GestureState::end`] on release or cancel.
//!
//! Coordinates given to the state are already surface-local; see
//! [`to_surface_local`] for the conversion from client coordinates.
//!
//! ```
//! use kurbo::Point;
//! use understory_scratch::gesture::{GesturePhase, GestureState};
//!
//! let mut gesture = GestureState::default();
//! assert!(gesture.update(Point::new(3.0, 3.0)).is_none());
//!
//! let tap = gesture.start(Point::new(10.0, 10.0));
//! assert!(!tap.active);
//! assert_eq!(gesture.phase(), GesturePhase::Scratching);
//!
//! let seg = gesture.update(Point::new(14.0, 10.0)).unwrap();
//! assert_eq!((seg.from, seg.to), (Point::new(10.0, 10.0), Point::new(14.0, 10.0)));
//!
//! gesture.end();
//! assert_eq!(gesture.phase(), GesturePhase::Idle);
//! assert_eq!(gesture.last_point(), Point::new(14.0, 10.0));
//! ```

use kurbo::Point;

/// Phase of the gesture machine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// No gesture in progress; moves are ignored.
    #[default]
    Idle,
    /// A press is held down and moves produce strokes.
    Scratching,
}

/// A stroke request produced by the gesture machine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StrokeRequest {
    /// Start of the stroke, surface-local.
    pub from: Point,
    /// End of the stroke, surface-local.
    pub to: Point,
    /// Whether a gesture was in progress when the stroke was requested.
    ///
    /// The initial stroke of a gesture is issued before the gesture becomes
    /// active, so renderers draw it as a dot.
    pub active: bool,
}

/// Tracks a single scratch gesture.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GestureState {
    active: bool,
    last_point: Point,
}

impl GestureState {
    /// Starts a gesture at `point`.
    ///
    /// A start while another gesture is active restarts tracking from
    /// `point`, exactly as if the previous gesture had ended first.
    pub fn start(&mut self, point: Point) -> StrokeRequest {
        self.last_point = point;
        let request = StrokeRequest {
            from: point,
            to: point,
            active: false,
        };
        self.active = true;
        request
    }

    /// Continues the gesture to `point`.
    ///
    /// Returns `None` and leaves the state untouched while idle.
    pub fn update(&mut self, point: Point) -> Option<StrokeRequest> {
        if !self.active {
            return None;
        }
        let request = StrokeRequest {
            from: self.last_point,
            to: point,
            active: true,
        };
        self.last_point = point;
        Some(request)
    }

    /// Ends the gesture. The last point is kept.
    pub fn end(&mut self) {
        self.active = false;
    }

    /// Returns `true` while a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        if self.active {
            GesturePhase::Scratching
        } else {
            GesturePhase::Idle
        }
    }

    /// The most recent surface-local point processed.
    #[must_use]
    pub fn last_point(&self) -> Point {
        self.last_point
    }
}

/// Converts a client-space position into surface-local coordinates.
#[must_use]
pub fn to_surface_local(client: Point, surface_origin: Point) -> Point {
    (client - surface_origin).to_point()
}
