// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The value model: authoritative slider value plus snapping and clamping rules.
//!
//! [`ValueModel`] knows nothing about events or interaction state. It answers
//! two questions: "what is the nearest legal value to this candidate?" and
//! "would storing this candidate change anything?".
//!
//! ## Bounds
//!
//! The selectable bounds are snapped onto the absolute step grid (`k * step`)
//! once at construction. A bound that lands outside the supplied interval is
//! moved inward by one step, so the derived bounds are never looser than the
//! configured ones:
//!
//! ```
//! use understory_slider::model::ValueModel;
//!
//! // 100 is not a multiple of 15, so the largest reachable value is 90.
//! let model = ValueModel::new([0.0, 100.0], 15.0, None, None);
//! assert_eq!(model.minimum(), 0.0);
//! assert_eq!(model.maximum(), 90.0);
//! assert_eq!(model.sanitize(97.0), 90.0);
//! ```

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`

use crate::numeric::{decimal_places, round_half_up, round_to, snap_to_grid};
use crate::value::{Handles, Value};

/// Owns a slider's value and enforces step, `only` and bound constraints.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueModel {
    value: Value,
    minimum: f64,
    maximum: f64,
    step: f64,
    only: Option<Vec<f64>>,
    places: u32,
}

impl ValueModel {
    /// Creates a model over the `selectable` interval.
    ///
    /// - `step` must be positive and finite; anything else falls back to `1.0`.
    /// - `only`, when non-empty, restricts values to its members.
    /// - `initial` of `None` starts at the minimum. Range values are sanitized
    ///   element-wise and sorted; a range of fewer than two entries becomes a
    ///   scalar.
    #[must_use]
    pub fn new(
        selectable: [f64; 2],
        step: f64,
        only: Option<Vec<f64>>,
        initial: Option<Value>,
    ) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            log::warn!("invalid slider step {step}; using 1");
            1.0
        };
        let only = only.filter(|values| !values.is_empty());

        let places = only
            .iter()
            .flatten()
            .copied()
            .map(decimal_places)
            .fold(decimal_places(step), u32::max);

        let (low, high) = if selectable[0] <= selectable[1] {
            (selectable[0], selectable[1])
        } else {
            (selectable[1], selectable[0])
        };

        let mut minimum = round_to(round_half_up(low / step) * step, places);
        if minimum < low {
            minimum = round_to(minimum + step, places);
        }
        let mut maximum = round_to(round_half_up(high / step) * step, places);
        if maximum > high {
            maximum = round_to(maximum - step, places);
        }
        if maximum < minimum {
            // The interval is narrower than one step; collapse onto the minimum.
            maximum = minimum;
        }

        let mut model = Self {
            value: Value::Single(minimum),
            minimum,
            maximum,
            step,
            only,
            places,
        };
        model.value = model.initial_value(initial);
        model
    }

    fn initial_value(&self, initial: Option<Value>) -> Value {
        match initial {
            None => Value::Single(self.sanitize(self.minimum)),
            Some(Value::Single(value)) => Value::Single(self.sanitize(value)),
            Some(Value::Range(values)) => match values.len() {
                0 => Value::Single(self.sanitize(self.minimum)),
                1 => Value::Single(self.sanitize(values[0])),
                _ => {
                    if let Some(handles) = self.normalize_range(&values) {
                        Value::Range(handles)
                    } else {
                        log::warn!("initial range {values:?} cannot keep handles apart");
                        let mut handles: Handles =
                            values.iter().map(|&value| self.sanitize(value)).collect();
                        handles.sort_unstable_by(f64::total_cmp);
                        Value::Range(handles)
                    }
                }
            },
        }
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the lowest selectable value.
    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    /// Returns the highest selectable value.
    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Returns the step between adjacent legal values.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the enumerated set of legal values, if one is configured.
    #[must_use]
    pub fn only(&self) -> Option<&[f64]> {
        self.only.as_deref()
    }

    /// Number of decimal places values are rounded to.
    #[must_use]
    pub fn places(&self) -> u32 {
        self.places
    }

    /// Returns `true` if the model holds a range value.
    #[must_use]
    pub fn is_range(&self) -> bool {
        self.value.is_range()
    }

    /// Snaps `value` to the nearest legal value and clamps it into bounds.
    ///
    /// With an `only` set the closest member wins, ties going to the member
    /// listed first. Otherwise the value snaps onto `minimum + k * step`.
    /// `NaN` sanitizes to the minimum.
    ///
    /// ```
    /// use understory_slider::model::ValueModel;
    ///
    /// let model = ValueModel::new([0.0, 100.0], 7.0, None, None);
    /// let snapped: Vec<f64> = [0.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]
    ///     .into_iter()
    ///     .map(|v| model.sanitize(v))
    ///     .collect();
    /// assert_eq!(snapped, [0.0, 7.0, 7.0, 7.0, 7.0, 7.0, 14.0]);
    /// ```
    #[must_use]
    pub fn sanitize(&self, value: f64) -> f64 {
        let value = if value.is_nan() { self.minimum } else { value };
        let snapped = match &self.only {
            Some(only) => closest_member(only, value),
            None => snap_to_grid(value, self.minimum, self.step),
        };
        round_to(snapped.clamp(self.minimum, self.maximum), self.places)
    }

    /// Replaces the whole value with the sanitized `candidate`.
    ///
    /// Returns the stored value, or `None` when nothing changed. A candidate
    /// whose shape differs from the current value (a scalar for a range
    /// slider, or a range with a different number of handles) is rejected, as
    /// is a range whose handles would end up closer than one step.
    pub fn set_value(&mut self, candidate: Value) -> Option<Value> {
        let next = match (&self.value, candidate) {
            (Value::Single(_), Value::Single(value)) if !value.is_nan() => {
                Value::Single(self.sanitize(value))
            }
            (Value::Range(current), Value::Range(values)) if current.len() == values.len() => {
                Value::Range(self.normalize_range(&values)?)
            }
            (_, candidate) => {
                log::debug!("rejecting candidate {candidate} for value {}", self.value);
                return None;
            }
        };
        self.store(next)
    }

    /// Moves handle `index` of a range value towards `candidate`.
    ///
    /// The sanitized candidate is clamped so that the handle stays at least
    /// one step away from its neighbours; handles never cross or touch.
    /// Returns the stored value, or `None` when nothing changed, the value is
    /// not a range, or the handle has nowhere to go.
    pub fn set_handle(&mut self, index: usize, candidate: f64) -> Option<Value> {
        let Value::Range(current) = &self.value else {
            return None;
        };
        if index >= current.len() || candidate.is_nan() {
            return None;
        }
        let (low, high) = self.handle_bounds(current, index)?;
        let position = self.sanitize(candidate).clamp(low, high);
        if position == current[index] {
            return None;
        }
        let mut next = current.clone();
        next[index] = position;
        self.store(Value::Range(next))
    }

    /// Returns the index of the handle nearest to `position`.
    ///
    /// Ties go to the lower index. Scalar values always report `0`.
    #[must_use]
    pub fn nearest_handle(&self, position: f64) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (index, value) in self.value.as_slice().iter().enumerate() {
            let distance = (value - position).abs();
            if distance < best_distance {
                best = index;
                best_distance = distance;
            }
        }
        best
    }

    /// Overwrites the value without sanitizing; used to roll back to a
    /// previously stored value.
    pub(crate) fn replace(&mut self, value: Value) {
        self.value = value;
    }

    fn store(&mut self, next: Value) -> Option<Value> {
        if next == self.value {
            return None;
        }
        self.value = next.clone();
        Some(next)
    }

    /// Legal interval for handle `index`, given its neighbours.
    fn handle_bounds(&self, handles: &[f64], index: usize) -> Option<(f64, f64)> {
        let mut low = match index.checked_sub(1) {
            Some(below) => round_to(handles[below] + self.step, self.places),
            None => self.minimum,
        };
        let mut high = match handles.get(index + 1) {
            Some(above) => round_to(above - self.step, self.places),
            None => self.maximum,
        };
        low = low.max(self.minimum);
        high = high.min(self.maximum);

        if let Some(only) = &self.only {
            low = only
                .iter()
                .copied()
                .filter(|&member| member >= low)
                .min_by(f64::total_cmp)?;
            high = only
                .iter()
                .copied()
                .filter(|&member| member <= high)
                .max_by(f64::total_cmp)?;
        }

        (low <= high).then_some((low, high))
    }

    /// Sanitizes and sorts `values`; `None` if any pair ends up closer than a step.
    fn normalize_range(&self, values: &[f64]) -> Option<Handles> {
        if values.iter().any(|value| value.is_nan()) {
            return None;
        }
        let mut handles: Handles = values.iter().map(|&value| self.sanitize(value)).collect();
        handles.sort_unstable_by(f64::total_cmp);
        let separated = handles
            .windows(2)
            .all(|pair| round_to(pair[1] - pair[0], self.places) >= self.step);
        separated.then_some(handles)
    }
}

/// Closest member of `only` to `value`; the first listed member wins ties.
fn closest_member(only: &[f64], value: f64) -> f64 {
    let mut best = only[0];
    let mut best_distance = (best - value).abs();
    for &member in &only[1..] {
        let distance = (member - value).abs();
        if distance < best_distance {
            best = member;
            best_distance = distance;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn default_model() -> ValueModel {
        ValueModel::new([0.0, 100.0], 1.0, None, None)
    }

    #[test]
    fn defaults_start_at_minimum() {
        let model = default_model();
        assert_eq!(model.value(), &Value::Single(0.0));
        assert_eq!(model.minimum(), 0.0);
        assert_eq!(model.maximum(), 100.0);
    }

    #[test]
    fn bounds_snap_inward() {
        let model = ValueModel::new([3.0, 98.0], 5.0, None, None);
        assert_eq!(model.minimum(), 5.0);
        assert_eq!(model.maximum(), 95.0);
    }

    #[test]
    fn reversed_bounds_are_normalized() {
        let model = ValueModel::new([100.0, 0.0], 1.0, None, None);
        assert_eq!(model.minimum(), 0.0);
        assert_eq!(model.maximum(), 100.0);
    }

    #[test]
    fn invalid_step_falls_back_to_one() {
        let model = ValueModel::new([0.0, 10.0], 0.0, None, None);
        assert_eq!(model.step(), 1.0);
        let model = ValueModel::new([0.0, 10.0], -2.0, None, None);
        assert_eq!(model.step(), 1.0);
    }

    #[test]
    fn interval_narrower_than_a_step_collapses() {
        let model = ValueModel::new([1.0, 4.0], 5.0, None, None);
        assert_eq!(model.minimum(), 5.0);
        assert_eq!(model.maximum(), 5.0);
        assert_eq!(model.sanitize(0.0), 5.0);
    }

    #[test]
    fn sanitize_clamps_out_of_range_values_to_the_nearest_bound() {
        let model = default_model();
        assert_eq!(model.sanitize(-1.0), 0.0);
        assert_eq!(model.sanitize(-1e9), 0.0);
        assert_eq!(model.sanitize(101.0), 100.0);
        assert_eq!(model.sanitize(f64::INFINITY), 100.0);
        assert_eq!(model.sanitize(f64::NEG_INFINITY), 0.0);
        assert_eq!(model.sanitize(f64::NAN), 0.0);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let models = [
            default_model(),
            ValueModel::new([0.0, 100.0], 7.0, None, None),
            ValueModel::new([0.0, 1.0], 0.1, None, None),
            ValueModel::new([-50.0, 50.0], 2.5, None, None),
            ValueModel::new([0.0, 100.0], 1.0, Some(vec![10.0, 20.0, 50.0]), None),
        ];
        let mut candidate = -120.0;
        while candidate <= 120.0 {
            for model in &models {
                let once = model.sanitize(candidate);
                assert_eq!(model.sanitize(once), once, "candidate {candidate}");
            }
            candidate += 0.37;
        }
    }

    #[test]
    fn sanitize_with_fractional_step_has_no_float_noise() {
        let model = ValueModel::new([0.0, 1.0], 0.1, None, None);
        assert_eq!(model.sanitize(0.3), 0.3);
        assert_eq!(model.sanitize(0.26), 0.3);
        assert_eq!(model.sanitize(0.7000001), 0.7);
    }

    #[test]
    fn sanitize_is_relative_to_minimum() {
        let model = ValueModel::new([1.0, 11.0], 2.0, None, None);
        // Bounds snap onto the absolute grid first.
        assert_eq!(model.minimum(), 2.0);
        assert_eq!(model.maximum(), 10.0);
        assert_eq!(model.sanitize(4.9), 4.0);
        assert_eq!(model.sanitize(5.0), 6.0);
    }

    #[test]
    fn only_picks_closest_member_with_first_listed_tie_break() {
        let model = ValueModel::new([0.0, 100.0], 1.0, Some(vec![10.0, 20.0, 50.0]), None);
        assert_eq!(model.sanitize(40.0), 50.0);
        assert_eq!(model.sanitize(14.0), 10.0);
        assert_eq!(model.sanitize(15.0), 10.0);
        assert_eq!(model.sanitize(35.0), 20.0);

        let reversed = ValueModel::new([0.0, 100.0], 1.0, Some(vec![20.0, 10.0]), None);
        assert_eq!(reversed.sanitize(15.0), 20.0);
    }

    #[test]
    fn only_sliders_start_on_a_member() {
        let only = Some(vec![10.0, 20.0, 50.0]);
        let model = ValueModel::new([0.0, 100.0], 1.0, only.clone(), None);
        assert_eq!(model.value(), &Value::Single(10.0));

        let empty = ValueModel::new(
            [0.0, 100.0],
            1.0,
            only.clone(),
            Some(Value::Range(Handles::new())),
        );
        assert_eq!(empty.value(), &Value::Single(10.0));

        let nan = ValueModel::new([0.0, 100.0], 1.0, only, Some(Value::Single(f64::NAN)));
        assert_eq!(nan.value(), &Value::Single(10.0));
    }

    #[test]
    fn only_members_keep_their_own_precision() {
        let model = ValueModel::new([0.0, 1.0], 1.0, Some(vec![0.25, 0.5, 0.75]), None);
        assert_eq!(model.places(), 2);
        assert_eq!(model.sanitize(0.3), 0.25);
    }

    #[test]
    fn set_value_reports_no_change() {
        let mut model = default_model();
        assert_eq!(model.set_value(Value::Single(0.0)), None);
        assert_eq!(model.set_value(Value::Single(0.2)), None);
        assert_eq!(model.set_value(Value::Single(50.0)), Some(Value::Single(50.0)));
        assert_eq!(model.set_value(Value::Single(f64::NAN)), None);
        assert_eq!(model.value(), &Value::Single(50.0));
    }

    #[test]
    fn set_value_rejects_shape_mismatch() {
        let mut single = default_model();
        assert_eq!(single.set_value(Value::from([10.0, 20.0])), None);

        let mut range = ValueModel::new([0.0, 100.0], 1.0, None, Some(Value::from([25.0, 75.0])));
        assert_eq!(range.set_value(Value::Single(10.0)), None);
        assert_eq!(range.set_value(Value::from([1.0, 2.0, 3.0])), None);
        assert_eq!(range.value(), &Value::from([25.0, 75.0]));
    }

    #[test]
    fn set_value_sorts_ranges_and_enforces_separation() {
        let mut model = ValueModel::new([0.0, 100.0], 5.0, None, Some(Value::from([25.0, 75.0])));
        assert_eq!(
            model.set_value(Value::from([90.0, 10.0])),
            Some(Value::from([10.0, 90.0]))
        );
        // 41 and 42 both snap to 40.
        assert_eq!(model.set_value(Value::from([41.0, 42.0])), None);
        assert_eq!(
            model.set_value(Value::from([40.0, 45.0])),
            Some(Value::from([40.0, 45.0]))
        );
    }

    #[test]
    fn set_handle_cannot_cross_or_touch_neighbours() {
        let mut model = ValueModel::new([0.0, 100.0], 1.0, None, Some(Value::from([25.0, 75.0])));
        assert_eq!(model.set_handle(0, 90.0), Some(Value::from([74.0, 75.0])));
        assert_eq!(model.set_handle(1, 0.0), None);
        assert_eq!(model.value(), &Value::from([74.0, 75.0]));
        assert_eq!(model.set_handle(1, 100.0), Some(Value::from([74.0, 100.0])));
        assert_eq!(model.set_handle(1, 10.0), Some(Value::from([74.0, 75.0])));
    }

    #[test]
    fn set_handle_respects_only_members() {
        let mut model = ValueModel::new(
            [0.0, 100.0],
            1.0,
            Some(vec![0.0, 10.0, 20.0, 30.0]),
            Some(Value::from([10.0, 30.0])),
        );
        assert_eq!(model.set_handle(0, 29.0), Some(Value::from([20.0, 30.0])));
        assert_eq!(model.set_handle(1, 0.0), None);
        assert_eq!(model.set_handle(5, 0.0), None);
    }

    #[test]
    fn set_handle_on_scalar_is_a_no_op() {
        let mut model = default_model();
        assert_eq!(model.set_handle(0, 50.0), None);
    }

    #[test]
    fn nearest_handle_prefers_lower_index_on_ties() {
        let model = ValueModel::new([0.0, 100.0], 1.0, None, Some(Value::from([20.0, 40.0, 80.0])));
        assert_eq!(model.nearest_handle(0.0), 0);
        assert_eq!(model.nearest_handle(30.0), 0);
        assert_eq!(model.nearest_handle(31.0), 1);
        assert_eq!(model.nearest_handle(70.0), 2);
    }

    #[test]
    fn short_initial_ranges_become_scalars() {
        let model = ValueModel::new([0.0, 100.0], 1.0, None, Some(Value::from([40.0])));
        assert_eq!(model.value(), &Value::Single(40.0));
        let model = ValueModel::new([0.0, 100.0], 1.0, None, Some(Value::from([0.0; 0])));
        assert_eq!(model.value(), &Value::Single(0.0));
    }
}
