// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer mapping: convert device-space pointer positions into slider values.
//!
//! A [`Track`] describes where the slider bar sits in view/device coordinates
//! along one axis. Pointer positions are converted into a fraction of the
//! track (clamped to `[0, 1]`, so a pointer beyond either end pins to that
//! end) and then interpolated across the slider's drawable extent.
//!
//! The drawable extent is the configured `range`, which may be wider than the
//! selectable bounds; the value model clamps the interpolated value afterwards.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_slider::track::{Orientation, Track};
//!
//! // A 200px wide bar starting at x = 50.
//! let track = Track::from_rect(Rect::new(50.0, 0.0, 250.0, 20.0), Orientation::Horizontal);
//! assert_eq!(track.fraction_at(Point::new(150.0, 10.0)), 0.5);
//! assert_eq!(track.fraction_at(Point::new(0.0, 10.0)), 0.0);
//! assert_eq!(track.value_at(Point::new(100.0, 10.0), [0.0, 100.0]), 25.0);
//! ```

use kurbo::{Point, Rect};

/// Axis along which a slider track runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Values grow left to right along the x axis.
    #[default]
    Horizontal,
    /// Values grow bottom to top along the y axis.
    Vertical,
}

/// Physical extent of a slider bar along one axis.
///
/// `start` maps to the low end of the value extent and `end` to the high end.
/// `end` may be smaller than `start`, which is how vertical tracks put the
/// minimum at the bottom.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Track {
    start: f64,
    end: f64,
    orientation: Orientation,
}

impl Track {
    /// Creates a track between two device coordinates on `orientation`'s axis.
    #[must_use]
    pub const fn new(start: f64, end: f64, orientation: Orientation) -> Self {
        Self {
            start,
            end,
            orientation,
        }
    }

    /// Horizontal track spanning `start..end` on the x axis.
    #[must_use]
    pub const fn horizontal(start: f64, end: f64) -> Self {
        Self::new(start, end, Orientation::Horizontal)
    }

    /// Vertical track with the low end at `bottom` and the high end at `top`.
    #[must_use]
    pub const fn vertical(bottom: f64, top: f64) -> Self {
        Self::new(bottom, top, Orientation::Vertical)
    }

    /// Track covering `rect` along `orientation`'s axis.
    ///
    /// Vertical tracks run from the bottom edge (`y1`) to the top edge (`y0`).
    #[must_use]
    pub fn from_rect(rect: Rect, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Horizontal => Self::horizontal(rect.x0, rect.x1),
            Orientation::Vertical => Self::vertical(rect.y1, rect.y0),
        }
    }

    /// Device coordinate of the low end.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Device coordinate of the high end.
    #[must_use]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// The axis this track runs along.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Signed length of the track in device units.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Fraction of the track at `point`, clamped to `[0, 1]`.
    ///
    /// A zero-length track always reports `0`.
    #[must_use]
    pub fn fraction_at(&self, point: Point) -> f64 {
        let length = self.length();
        if length == 0.0 {
            return 0.0;
        }
        let coordinate = match self.orientation {
            Orientation::Horizontal => point.x,
            Orientation::Vertical => point.y,
        };
        let fraction = (coordinate - self.start) / length;
        if fraction.is_nan() {
            return 0.0;
        }
        fraction.clamp(0.0, 1.0)
    }

    /// Device coordinate of `fraction` along the track; the inverse of
    /// [`Track::fraction_at`] for fractions in `[0, 1]`.
    #[must_use]
    pub fn position_at(&self, fraction: f64) -> f64 {
        self.start + self.length() * fraction
    }

    /// Interpolates the value under `point` across `extent` (`[low, high]`).
    #[must_use]
    pub fn value_at(&self, point: Point, extent: [f64; 2]) -> f64 {
        extent[0] + (extent[1] - extent[0]) * self.fraction_at(point)
    }

    /// Device coordinate at which `value` is drawn for the given `extent`.
    ///
    /// Renderers use this to place handles.
    #[must_use]
    pub fn position_of(&self, value: f64, extent: [f64; 2]) -> f64 {
        let span = extent[1] - extent[0];
        if span == 0.0 {
            return self.start;
        }
        self.position_at((value - extent[0]) / span)
    }
}

impl Default for Track {
    /// A horizontal track from `0` to `100`, so device units read as percent.
    fn default() -> Self {
        Self::horizontal(0.0, 100.0)
    }
}
