// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rounding helpers shared by the value model and by slider groups.
//!
//! Slider arithmetic happens in `f64`, and repeated additions of values such as
//! `0.1` drift quickly (`0.1 + 0.2 != 0.3`). Everything that stores or compares
//! a value first rounds it to a fixed number of decimal places derived from the
//! configured step, which keeps results exact enough for equality checks.

use alloc::format;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`

/// Upper bound on the number of decimal places tracked for a value.
///
/// `f64` carries roughly 15-17 significant digits; anything finer is noise.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Rounds `value` to the nearest integer, resolving ties towards positive infinity.
///
/// This is ordinary arithmetic rounding as used by most UI toolkits:
/// `2.5` becomes `3.0` and `-2.5` becomes `-2.0`.
///
/// ```
/// use understory_slider::numeric::round_half_up;
///
/// assert_eq!(round_half_up(2.5), 3.0);
/// assert_eq!(round_half_up(-2.5), -2.0);
/// assert_eq!(round_half_up(1.49), 1.0);
/// ```
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Returns the number of digits after the decimal point in the shortest
/// representation of `value`, capped at [`MAX_DECIMAL_PLACES`].
///
/// ```
/// use understory_slider::numeric::decimal_places;
///
/// assert_eq!(decimal_places(1.0), 0);
/// assert_eq!(decimal_places(0.25), 2);
/// assert_eq!(decimal_places(2.5), 1);
/// ```
#[must_use]
pub fn decimal_places(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    // `Display` for floats never switches to exponent notation.
    let text = format!("{value}");
    match text.split_once('.') {
        Some((_, fraction)) => u32::try_from(fraction.len())
            .unwrap_or(MAX_DECIMAL_PLACES)
            .min(MAX_DECIMAL_PLACES),
        None => 0,
    }
}

/// Rounds `value` (half up) to `places` decimal places.
///
/// ```
/// use understory_slider::numeric::round_to;
///
/// assert_eq!(round_to(0.1 + 0.2, 1), 0.3);
/// assert_eq!(round_to(12.346, 2), 12.35);
/// assert_eq!(round_to(7.5, 0), 8.0);
/// ```
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = scale_for(places);
    round_half_up(value * scale) / scale
}

/// Snaps `value` onto the grid `origin + k * step` (half up), without clamping.
#[must_use]
pub fn snap_to_grid(value: f64, origin: f64, step: f64) -> f64 {
    origin + round_half_up((value - origin) / step) * step
}

fn scale_for(places: u32) -> f64 {
    // Exact for every power of ten up to 1e22, well past the cap.
    (0..places.min(MAX_DECIMAL_PLACES)).fold(1.0, |acc, _| acc * 10.0)
}
