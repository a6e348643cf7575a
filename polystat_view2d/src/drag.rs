// Copyright 2025 the Polystat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-pan: pointer deltas plus scoped pointer capture.
//!
//! ## Usage
//!
//! 1) On pointer-down, create a [`DragSession`] with [`DragSession::begin`]. This
//!    acquires the host's [`PointerCapture`] (for example global move/up
//!    listeners) for the duration of the gesture.
//! 2) On each pointer-move, call [`DragSession::update`] to pan the viewport by
//!    the movement since the last event.
//! 3) On pointer-up call [`DragSession::finish`]. Dropping the session (for
//!    example when the view is torn down mid-gesture) releases the capture too.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Size, Vec2};
//! use polystat_view2d::{DragSession, PointerCapture, ViewportController, ZoomProfile};
//!
//! #[derive(Default)]
//! struct Listeners {
//!     installed: bool,
//! }
//!
//! impl PointerCapture for Listeners {
//!     fn acquire(&mut self) {
//!         self.installed = true;
//!     }
//!     fn release(&mut self) {
//!         self.installed = false;
//!     }
//! }
//!
//! let mut viewport = ViewportController::new(Size::new(800.0, 600.0), 20.0, ZoomProfile::default());
//! let mut listeners = Listeners::default();
//!
//! let mut session = DragSession::begin(&mut listeners, Point::new(10.0, 20.0));
//! session.update(Point::new(15.0, 25.0), &mut viewport);
//! session.finish();
//!
//! assert_eq!(viewport.pan(), Vec2::new(5.0, 5.0));
//! assert!(!listeners.installed);
//! ```

use kurbo::Point;

use crate::controller::ViewportController;

/// Host hook for capturing pointer events outside the view while dragging.
///
/// In a browser this installs and removes document-level `pointermove` /
/// `pointerup` listeners; native hosts typically grab and release the
/// pointer.
pub trait PointerCapture {
    /// Starts routing pointer events to the view.
    fn acquire(&mut self);
    /// Stops routing pointer events to the view.
    fn release(&mut self);
}

impl<C: PointerCapture + ?Sized> PointerCapture for &mut C {
    fn acquire(&mut self) {
        (**self).acquire();
    }

    fn release(&mut self) {
        (**self).release();
    }
}

impl<C: PointerCapture + ?Sized> PointerCapture for Box<C> {
    fn acquire(&mut self) {
        (**self).acquire();
    }

    fn release(&mut self) {
        (**self).release();
    }
}

/// A drag-to-pan gesture holding pointer capture until it ends.
///
/// Capture is acquired in [`begin`](Self::begin) and released exactly once,
/// either by [`finish`](Self::finish) or when the session is dropped.
#[derive(Debug)]
pub struct DragSession<C: PointerCapture> {
    capture: Option<C>,
    last: Point,
}

impl<C: PointerCapture> DragSession<C> {
    /// Starts a drag at `pos`, acquiring `capture`.
    pub fn begin(mut capture: C, pos: Point) -> Self {
        capture.acquire();
        Self {
            capture: Some(capture),
            last: pos,
        }
    }

    /// Pans `viewport` by the pointer movement since the last update.
    ///
    /// Returns `true` if the viewport moved.
    pub fn update(&mut self, pos: Point, viewport: &mut ViewportController) -> bool {
        let delta = pos - self.last;
        self.last = pos;
        viewport.pan_by(delta)
    }

    /// Ends the gesture and releases capture.
    pub fn finish(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            capture.release();
        }
    }
}

impl<C: PointerCapture> Drop for DragSession<C> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Size, Vec2};

    use super::{DragSession, PointerCapture};
    use crate::{ViewportController, ZoomProfile};

    #[derive(Debug, Default)]
    struct CountingCapture {
        acquired: u32,
        released: u32,
    }

    impl PointerCapture for CountingCapture {
        fn acquire(&mut self) {
            self.acquired += 1;
        }

        fn release(&mut self) {
            self.released += 1;
        }
    }

    fn viewport() -> ViewportController {
        ViewportController::new(Size::new(800.0, 600.0), 20.0, ZoomProfile::default())
    }

    #[test]
    fn updates_pan_by_incremental_deltas() {
        let mut vp = viewport();
        let mut capture = CountingCapture::default();
        let mut session = DragSession::begin(&mut capture, Point::new(0.0, 0.0));
        session.update(Point::new(5.0, 3.0), &mut vp);
        assert_eq!(vp.pan(), Vec2::new(5.0, 3.0));
        session.update(Point::new(8.0, 7.0), &mut vp);
        assert_eq!(vp.pan(), Vec2::new(8.0, 7.0));
    }

    #[test]
    fn session_pans_viewport() {
        let mut vp = viewport();
        let mut capture = CountingCapture::default();
        {
            let mut session = DragSession::begin(&mut capture, Point::new(100.0, 100.0));
            assert!(session.update(Point::new(90.0, 120.0), &mut vp));
            assert!(session.update(Point::new(80.0, 125.0), &mut vp));
            assert!(!session.update(Point::new(80.0, 125.0), &mut vp), "no movement");
            session.finish();
        }
        assert_eq!(vp.pan(), Vec2::new(-20.0, 25.0));
        assert_eq!(capture.acquired, 1);
        assert_eq!(capture.released, 1);
    }

    #[test]
    fn dropping_session_releases_capture_once() {
        let mut capture = CountingCapture::default();
        {
            let _session = DragSession::begin(&mut capture, Point::ORIGIN);
        }
        assert_eq!(capture.acquired, 1);
        assert_eq!(capture.released, 1);
    }

    #[test]
    fn boxed_capture_is_supported() {
        let boxed: Box<dyn PointerCapture> = Box::new(CountingCapture::default());
        let mut session = DragSession::begin(boxed, Point::ORIGIN);
        let mut vp = viewport();
        session.update(Point::new(3.0, 4.0), &mut vp);
        drop(session);
        assert_eq!(vp.pan(), Vec2::new(3.0, 4.0));
    }
}
