// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host input events and their mapping onto scratch gestures.
//!
//! Hosts translate their native pointer and touch events into [`InputEvent`]
//! and hand them to [`ScratchCard::handle_input`](crate::ScratchCard::handle_input).
//! Positions are in client coordinates; the card converts them to
//! surface-local coordinates itself.

use kurbo::Point;

/// A pointer or touch event delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent<'a> {
    /// A pointer button was pressed over the surface.
    PointerDown {
        /// Client position of the pointer.
        position: Point,
    },
    /// The pointer moved anywhere in the window.
    PointerMove {
        /// Client position of the pointer.
        position: Point,
    },
    /// A pointer button was released anywhere in the window.
    PointerUp,
    /// Touches began on the surface.
    TouchStart {
        /// Client positions of the touches targeting the surface.
        touches: &'a [Point],
    },
    /// Touches moved anywhere in the window.
    TouchMove {
        /// Client positions of the touches targeting the surface.
        touches: &'a [Point],
    },
    /// Touches were lifted.
    TouchEnd,
    /// The touch sequence was cancelled by the platform.
    TouchCancel,
}

/// The gesture vocabulary the engine understands.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureInput {
    /// Begin scratching at a client position.
    Start(Point),
    /// Continue scratching to a client position.
    Move(Point),
    /// Stop scratching.
    End,
}

impl InputEvent<'_> {
    /// Maps the event onto a gesture input.
    ///
    /// Only the first touch of a touch event is used. Touch starts and moves
    /// without any touch points map to `None`.
    #[must_use]
    pub fn gesture(&self) -> Option<GestureInput> {
        match *self {
            Self::PointerDown { position } => Some(GestureInput::Start(position)),
            Self::PointerMove { position } => Some(GestureInput::Move(position)),
            Self::TouchStart { touches } => touches.first().copied().map(GestureInput::Start),
            Self::TouchMove { touches } => touches.first().copied().map(GestureInput::Move),
            Self::PointerUp | Self::TouchEnd | Self::TouchCancel => Some(GestureInput::End),
        }
    }

    /// Whether this is a touch event.
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::TouchStart { .. } | Self::TouchMove { .. } | Self::TouchEnd | Self::TouchCancel
        )
    }
}

/// What the host should do with the native event after it was handled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct InputOutcome {
    /// Suppress the platform default (scrolling or panning) for this event.
    pub prevent_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_events_map_directly() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(
            InputEvent::PointerDown { position: p }.gesture(),
            Some(GestureInput::Start(p))
        );
        assert_eq!(
            InputEvent::PointerMove { position: p }.gesture(),
            Some(GestureInput::Move(p))
        );
        assert_eq!(InputEvent::PointerUp.gesture(), Some(GestureInput::End));
    }

    #[test]
    fn touch_events_use_the_first_touch() {
        let touches = [Point::new(1.0, 1.0), Point::new(9.0, 9.0)];
        assert_eq!(
            InputEvent::TouchStart { touches: &touches }.gesture(),
            Some(GestureInput::Start(Point::new(1.0, 1.0)))
        );
        assert_eq!(
            InputEvent::TouchMove { touches: &touches }.gesture(),
            Some(GestureInput::Move(Point::new(1.0, 1.0)))
        );
        assert_eq!(InputEvent::TouchEnd.gesture(), Some(GestureInput::End));
        assert_eq!(InputEvent::TouchCancel.gesture(), Some(GestureInput::End));
    }

    #[test]
    fn touch_events_without_points_are_dropped() {
        assert_eq!(InputEvent::TouchStart { touches: &[] }.gesture(), None);
        assert_eq!(InputEvent::TouchMove { touches: &[] }.gesture(), None);
    }

    #[test]
    fn touch_classification() {
        assert!(InputEvent::TouchMove { touches: &[] }.is_touch());
        assert!(InputEvent::TouchCancel.is_touch());
        assert!(!InputEvent::PointerUp.is_touch());
    }
}
