//! Touch gestures.
//!
//! Gestures are queued on an [`Actions`] chain and sent to the session on
//! [`Actions::perform`]. Swipe geometry is computed from the viewport size by
//! [`swipe_path`], which is pure and tested on its own.

use crate::locator::{ElementHandle, Point};
use crate::result::{PageError, PageResult};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fraction of the viewport height swipes run along
const SWIPE_HEIGHT_RATIO: f64 = 0.2;

/// A touch gesture sent to the remote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    /// Press at `start`, move to `end`, release
    Flick {
        /// Element the coordinates are relative to
        element: ElementHandle,
        /// Touch start
        start: Point,
        /// Touch end
        end: Point,
        /// Duration in milliseconds
        duration_ms: u64,
    },
}

/// Chain of gestures performed together
#[derive(Debug)]
pub struct Actions<'a, S: Session + ?Sized> {
    session: &'a S,
    flick_duration_ms: u64,
    queued: Vec<Gesture>,
}

impl<'a, S: Session + ?Sized> Actions<'a, S> {
    /// Create an empty chain against a session
    pub fn new(session: &'a S, flick_duration_ms: u64) -> Self {
        Self {
            session,
            flick_duration_ms,
            queued: Vec::new(),
        }
    }

    /// Queue a flick from `(x1, y1)` to `(x2, y2)` on `element`
    #[must_use]
    pub fn flick(mut self, element: &ElementHandle, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        self.queued.push(Gesture::Flick {
            element: element.clone(),
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
            duration_ms: self.flick_duration_ms,
        });
        self
    }

    /// Gestures queued so far
    #[must_use]
    pub fn queued(&self) -> &[Gesture] {
        &self.queued
    }

    /// Send all queued gestures, in order
    pub fn perform(self) -> PageResult<()> {
        for gesture in &self.queued {
            tracing::debug!(?gesture, "performing gesture");
            self.session.perform(gesture)?;
        }
        Ok(())
    }
}

/// Horizontal swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    /// Finger moves toward the left edge
    Left,
    /// Finger moves toward the right edge
    Right,
}

impl SwipeDirection {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwipeDirection {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(PageError::invalid_argument(format!(
                "swipe needs a direction of 'left' or 'right', got {other:?}"
            ))),
        }
    }
}

/// Viewport size as reported by `document.body`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// `clientWidth`
    pub width: f64,
    /// `clientHeight`
    pub height: f64,
}

/// Start and end point of a swipe across the viewport.
///
/// Left runs from 20% of the width to the left edge, right from 80% to the
/// right edge, both at 20% of the height.
#[must_use]
pub fn swipe_path(direction: SwipeDirection, viewport: Viewport) -> (Point, Point) {
    let y = viewport.height * SWIPE_HEIGHT_RATIO;
    let (x1, x2) = match direction {
        SwipeDirection::Left => (viewport.width * 0.2, 0.0),
        SwipeDirection::Right => (viewport.width * 0.8, viewport.width),
    };
    (Point::new(x1, y), Point::new(x2, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod direction_tests {
        use super::*;

        #[test]
        fn test_parse() {
            assert_eq!("left".parse::<SwipeDirection>().unwrap(), SwipeDirection::Left);
            assert_eq!("right".parse::<SwipeDirection>().unwrap(), SwipeDirection::Right);
        }

        #[test]
        fn test_parse_rejects_other_directions() {
            for bad in ["up", "down", "", "Left"] {
                let err = bad.parse::<SwipeDirection>().unwrap_err();
                assert!(matches!(err, PageError::InvalidArgument { .. }), "{bad}");
            }
        }

        #[test]
        fn test_display_roundtrip() {
            assert_eq!(SwipeDirection::Right.to_string(), "right");
        }
    }

    mod swipe_path_tests {
        use super::*;

        #[test]
        fn test_left() {
            let (start, end) = swipe_path(
                SwipeDirection::Left,
                Viewport {
                    width: 320.0,
                    height: 480.0,
                },
            );
            assert_eq!(start, Point::new(64.0, 96.0));
            assert_eq!(end, Point::new(0.0, 96.0));
        }

        #[test]
        fn test_right() {
            let (start, end) = swipe_path(
                SwipeDirection::Right,
                Viewport {
                    width: 320.0,
                    height: 480.0,
                },
            );
            assert_eq!(start, Point::new(256.0, 96.0));
            assert_eq!(end, Point::new(320.0, 96.0));
        }

        proptest! {
            #[test]
            fn prop_swipe_is_horizontal(w in 1.0f64..4000.0, h in 1.0f64..4000.0) {
                let viewport = Viewport { width: w, height: h };
                for dir in [SwipeDirection::Left, SwipeDirection::Right] {
                    let (start, end) = swipe_path(dir, viewport);
                    prop_assert_eq!(start.y, end.y);
                    prop_assert!((start.y - h * 0.2).abs() < 1e-9);
                    prop_assert!(end.x >= 0.0 && end.x <= w);
                }
            }
        }
    }

    mod actions_tests {
        use super::*;
        use crate::mock::MockSession;

        #[test]
        fn test_flick_queues_then_performs() {
            let session = MockSession::new();
            let body = session.add_element("body");
            let actions = Actions::new(&session, 200).flick(&body, 10.0, 20.0, 0.0, 20.0);
            assert_eq!(actions.queued().len(), 1);
            assert!(session.gestures().is_empty());

            actions.perform().unwrap();
            let gestures = session.gestures();
            assert_eq!(gestures.len(), 1);
            let Gesture::Flick {
                start,
                end,
                duration_ms,
                ..
            } = &gestures[0];
            assert_eq!(*start, Point::new(10.0, 20.0));
            assert_eq!(*end, Point::new(0.0, 20.0));
            assert_eq!(*duration_ms, 200);
        }

        #[test]
        fn test_perform_on_removed_element_fails() {
            let session = MockSession::new();
            let body = session.add_element("body");
            let actions = Actions::new(&session, 200).flick(&body, 10.0, 20.0, 0.0, 20.0);
            session.remove_element(&body);

            let err = actions.perform().unwrap_err();
            assert!(matches!(err, PageError::Session { .. }));
            assert!(session.gestures().is_empty());
        }
    }
}
