// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Redistribution algorithms.
//!
//! Both algorithms receive the subordinates in usage order (least recently
//! used first), the values captured when the interaction started and the
//! `flex` to absorb: the amount the subordinates must move in total so the
//! group sums to its target again. They move subordinates through
//! tentative values, so every move is snapped and clamped by that slider's
//! own value model, and return the flex that could not be absorbed. A
//! non-zero result means the move is infeasible.

use core::fmt;
use core::str::FromStr;

use alloc::string::ToString;
use smallvec::SmallVec;
use understory_slider::numeric::round_to;
use understory_slider::Slider;

use crate::error::ConfigError;
use crate::snapshot::{Snapshot, current};

/// Upper bound on passes made by [`fair`].
pub const FAIR_MAX_PASSES: usize = 20;

/// How flex is spread across subordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Give all of the flex to one slider at a time, least recently used
    /// first. See [`least_recently_used`].
    #[default]
    LeastRecentlyUsed,
    /// Share the flex evenly. See [`fair`].
    Fair,
}

impl Algorithm {
    /// Configuration name of the algorithm.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LeastRecentlyUsed => "least_recently_used",
            Self::Fair => "fair",
        }
    }

    /// Runs the algorithm; returns the flex left over.
    pub fn run(self, subordinates: &[Slider], snapshot: &Snapshot, flex: f64, places: u32) -> f64 {
        match self {
            Self::LeastRecentlyUsed => least_recently_used(subordinates, snapshot, flex, places),
            Self::Fair => fair(subordinates, snapshot, flex, places),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "least_recently_used" => Ok(Self::LeastRecentlyUsed),
            "fair" => Ok(Self::Fair),
            _ => Err(ConfigError::UnknownAlgorithm(name.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tries to put all remaining flex on each subordinate in turn.
///
/// Every subordinate is visited. Each one is set to its captured value plus
/// whatever flex is still unabsorbed, so once the flex is used up the rest
/// go back to where they started. This keeps values the user set recently
/// (late in the order) untouched whenever possible.
pub fn least_recently_used(
    subordinates: &[Slider],
    snapshot: &Snapshot,
    mut flex: f64,
    places: u32,
) -> f64 {
    for slider in subordinates {
        let before = snapshot.value(slider);
        slider.set_tentative_value(round_to(before + flex, places), false, false);
        flex = round_to(flex - (current(slider) - before), places);
    }
    flex
}

/// Shares flex as evenly as possible.
///
/// Each pass splits the remaining flex evenly over the subordinates that can
/// still move in its direction, recomputing the share after every slider so
/// that whatever one slider could not take passes to the rest. The first
/// pass works from the captured values; later passes from the current ones.
/// Stops when the flex is used up, no slider can move, a pass absorbs
/// nothing or after [`FAIR_MAX_PASSES`] passes.
pub fn fair(subordinates: &[Slider], snapshot: &Snapshot, mut flex: f64, places: u32) -> f64 {
    let mut movable: SmallVec<[&Slider; 8]> = subordinates.iter().collect();
    let mut prev_flex: Option<f64> = None;

    for pass in 0..FAIR_MAX_PASSES {
        let mut next: SmallVec<[&Slider; 8]> = SmallVec::new();
        let count = movable.len();
        for (i, slider) in movable.iter().enumerate() {
            let share = flex / (count - i) as f64;
            let before = if pass == 0 {
                snapshot.value(slider)
            } else {
                current(slider)
            };
            slider.set_tentative_value(round_to(before + share, places), false, false);
            flex = round_to(flex - (current(slider) - before), places);
            if can_move(slider, flex) {
                next.push(slider);
            }
        }
        movable = next;

        if flex == 0.0 || movable.is_empty() || prev_flex == Some(flex) {
            break;
        }
        prev_flex = Some(flex);
    }
    flex
}

/// Whether `slider` has room to move in the direction of `flex`.
fn can_move(slider: &Slider, flex: f64) -> bool {
    let value = current(slider);
    (flex < 0.0 && value > slider.minimum()) || (flex > 0.0 && value < slider.maximum())
}
