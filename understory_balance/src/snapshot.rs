// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Captured slider values, used to compute flex and to roll back.

use hashbrown::HashMap;
use understory_slider::{Slider, SliderId};

/// Scalar value of `slider`; range sliders report their lowest handle.
pub(crate) fn current(slider: &Slider) -> f64 {
    slider.value().get(0).unwrap_or_default()
}

/// Values of a set of sliders at one point in time.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    values: HashMap<SliderId, f64>,
}

impl Snapshot {
    /// Records the current value of every slider in `sliders`.
    #[must_use]
    pub fn capture<'a>(sliders: impl IntoIterator<Item = &'a Slider>) -> Self {
        Self {
            values: sliders
                .into_iter()
                .map(|slider| (slider.id(), current(slider)))
                .collect(),
        }
    }

    /// Recorded value of `slider`, or its current value if it was not
    /// captured.
    #[must_use]
    pub fn value(&self, slider: &Slider) -> f64 {
        self.get(slider.id()).unwrap_or_else(|| current(slider))
    }

    /// Recorded value for `id`.
    #[must_use]
    pub fn get(&self, id: SliderId) -> Option<f64> {
        self.values.get(&id).copied()
    }

    /// Sum of every recorded value.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    /// Puts every captured slider in `sliders` back to its recorded value
    /// without firing drag events.
    pub fn revert(&self, sliders: &[Slider]) {
        for slider in sliders {
            if let Some(value) = self.get(slider.id()) {
                slider.set_tentative_value(value, false, true);
            }
        }
    }

    /// Number of captured sliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_slider::SliderConfig;

    #[test]
    fn capture_sum_and_revert() {
        let a = Slider::new(SliderConfig::default().with_value(10.0));
        let b = Slider::new(SliderConfig::default().with_value(30.0));
        let members = [a.clone(), b.clone()];
        let snapshot = Snapshot::capture(&members);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.total(), 40.0);

        b.set_value(70.0, false, false);
        assert_eq!(snapshot.value(&b), 30.0);
        snapshot.revert(&members);
        assert_eq!(b.value(), 30.0.into());
        assert_eq!(a.value(), 10.0.into());
    }

    #[test]
    fn uncaptured_sliders_report_their_current_value() {
        let a = Slider::new(SliderConfig::default().with_value(10.0));
        let snapshot = Snapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.value(&a), 10.0);
        assert_eq!(snapshot.get(a.id()), None);
    }
}
