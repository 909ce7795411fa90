// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag sessions: one pointer interaction from press to release.
//!
//! [`Slider::begin_drag`] returns a [`DragSession`] once the interaction has
//! begun. Feed it pointer moves with [`DragSession::update`] and end it with
//! [`DragSession::finish`] (commit) or [`DragSession::cancel`] (abort).
//! Dropping a session that was never finished aborts the interaction, so the
//! slider cannot be left mid-drag on an early return.
//!
//! ```
//! use kurbo::Point;
//! use understory_slider::{Slider, SliderConfig};
//!
//! // The default headless track spans x = 0..100 over the range 0..100.
//! let slider = Slider::new(SliderConfig::default().with_value(10.0));
//!
//! let mut session = slider.begin_drag(Point::new(30.0, 5.0)).unwrap();
//! assert_eq!(slider.value().as_single(), Some(30.0));
//! session.update(Point::new(45.0, 8.0));
//! assert_eq!(session.total_offset().x, 15.0);
//! assert!(session.finish());
//! assert_eq!(slider.value().as_single(), Some(45.0));
//!
//! // An abandoned session restores the value it started from.
//! let session = slider.begin_drag(Point::new(90.0, 5.0));
//! assert_eq!(slider.value().as_single(), Some(90.0));
//! drop(session);
//! assert_eq!(slider.value().as_single(), Some(45.0));
//! ```

use kurbo::{Point, Vec2};

use crate::slider::Slider;
use crate::value::Value;

/// Pointer interaction in progress on a [`Slider`].
#[derive(Debug)]
pub struct DragSession {
    slider: Slider,
    handle: usize,
    start_pos: Point,
    last_pos: Point,
    released: bool,
}

impl DragSession {
    pub(crate) fn new(slider: Slider, handle: usize, pos: Point) -> Self {
        Self {
            slider,
            handle,
            start_pos: pos,
            last_pos: pos,
            released: false,
        }
    }

    /// The slider being dragged.
    #[must_use]
    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    /// Index of the grabbed handle.
    #[must_use]
    pub fn handle(&self) -> usize {
        self.handle
    }

    /// Where the pointer went down.
    #[must_use]
    pub fn start_pos(&self) -> Point {
        self.start_pos
    }

    /// Last pointer position seen by [`DragSession::update`].
    #[must_use]
    pub fn last_pos(&self) -> Point {
        self.last_pos
    }

    /// Offset of the last pointer position from the press position.
    #[must_use]
    pub fn total_offset(&self) -> Vec2 {
        self.last_pos - self.start_pos
    }

    /// Moves the grabbed handle to the value under `pos`.
    ///
    /// Returns the new value, or `None` if the pointer did not move, the value
    /// did not change or a listener vetoed the move.
    pub fn update(&mut self, pos: Point) -> Option<Value> {
        if pos == self.last_pos {
            return None;
        }
        self.last_pos = pos;
        let position = self.slider.value_at(pos);
        self.slider.set_tentative_value(position, false, false)
    }

    /// Releases the pointer and commits; returns `true` if the value changed.
    pub fn finish(mut self) -> bool {
        self.released = true;
        self.slider.has_changed()
    }

    /// Releases the pointer and restores the value from before the press.
    pub fn cancel(mut self) {
        self.released = true;
        self.slider.abort_change();
    }
}

impl Drop for DragSession {
    fn drop(&mut self) {
        if !self.released {
            log::debug!("{} drag session dropped; aborting", self.slider.id());
            self.slider.abort_change();
        }
    }
}
