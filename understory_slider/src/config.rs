// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slider construction options.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use crate::events::{Outcome, SliderEvent};
use crate::slider::{Slider, SliderListener};
use crate::value::Value;

/// Options for [`Slider::new`].
///
/// Start from [`SliderConfig::default`] and adjust with the `with_*` builder
/// methods:
///
/// ```
/// use understory_slider::{Slider, SliderConfig};
///
/// let slider = Slider::new(
///     SliderConfig::default()
///         .with_range([0.0, 10.0])
///         .with_step(0.5)
///         .with_value(2.3),
/// );
/// assert_eq!(slider.value().as_single(), Some(2.5));
/// ```
#[derive(Clone)]
pub struct SliderConfig {
    /// Drawable extent of the bar, `[low, high]`.
    pub range: [f64; 2],
    /// Selectable bounds; defaults to `range` when `None`.
    pub selectable: Option<[f64; 2]>,
    /// Increment between legal values.
    pub step: f64,
    /// Enumerated legal values; overrides `step` snapping when set.
    pub only: Option<Vec<f64>>,
    /// Initial value; `None` starts at the minimum.
    pub value: Option<Value>,
    /// Start out disabled.
    pub disable: bool,
    /// Whether renderers may animate discrete jumps.
    pub effects: bool,
    pub(crate) callbacks: Vec<(SliderEvent, Rc<SliderListener>)>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            range: [0.0, 100.0],
            selectable: None,
            step: 1.0,
            only: None,
            value: None,
            disable: false,
            effects: true,
            callbacks: Vec::new(),
        }
    }
}

impl SliderConfig {
    /// Sets the drawable extent.
    #[must_use]
    pub fn with_range(mut self, range: [f64; 2]) -> Self {
        self.range = range;
        self
    }

    /// Restricts the selectable bounds to a sub-interval of the range.
    #[must_use]
    pub fn with_selectable(mut self, selectable: [f64; 2]) -> Self {
        self.selectable = Some(selectable);
        self
    }

    /// Sets the step.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Restricts values to the given members.
    #[must_use]
    pub fn with_only(mut self, only: impl Into<Vec<f64>>) -> Self {
        self.only = Some(only.into());
        self
    }

    /// Sets the initial value; pass an array for a range slider.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Starts the slider disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disable = true;
        self
    }

    /// Enables or disables the animation hint passed to renderers.
    #[must_use]
    pub fn with_effects(mut self, effects: bool) -> Self {
        self.effects = effects;
        self
    }

    /// Runs `callback` once the slider is fully constructed.
    #[must_use]
    pub fn on_setup<F, R>(self, callback: F) -> Self
    where
        F: Fn(&Value, &Slider) -> R + 'static,
        R: Into<Outcome>,
    {
        self.with_callback(SliderEvent::Setup, callback)
    }

    /// Runs `callback` when an interaction is about to begin.
    #[must_use]
    pub fn on_begin<F, R>(self, callback: F) -> Self
    where
        F: Fn(&Value, &Slider) -> R + 'static,
        R: Into<Outcome>,
    {
        self.with_callback(SliderEvent::Begin, callback)
    }

    /// Runs `callback` after each tentative value.
    #[must_use]
    pub fn on_drag<F, R>(self, callback: F) -> Self
    where
        F: Fn(&Value, &Slider) -> R + 'static,
        R: Into<Outcome>,
    {
        self.with_callback(SliderEvent::Drag, callback)
    }

    /// Runs `callback` when an interaction is committed.
    #[must_use]
    pub fn on_change<F, R>(self, callback: F) -> Self
    where
        F: Fn(&Value, &Slider) -> R + 'static,
        R: Into<Outcome>,
    {
        self.with_callback(SliderEvent::Change, callback)
    }

    /// Runs `callback` when an interaction ends without a change.
    #[must_use]
    pub fn on_abort<F, R>(self, callback: F) -> Self
    where
        F: Fn(&Value, &Slider) -> R + 'static,
        R: Into<Outcome>,
    {
        self.with_callback(SliderEvent::Abort, callback)
    }

    fn with_callback<F, R>(mut self, kind: SliderEvent, callback: F) -> Self
    where
        F: Fn(&Value, &Slider) -> R + 'static,
        R: Into<Outcome>,
    {
        let listener: Rc<SliderListener> =
            Rc::new(move |value: &Value, slider: &Slider| callback(value, slider).into());
        self.callbacks.push((kind, listener));
        self
    }

    /// Bounds the value model is built from: `selectable`, or `range`.
    pub(crate) fn selectable_bounds(&self) -> [f64; 2] {
        self.selectable.unwrap_or(self.range)
    }
}

impl fmt::Debug for SliderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderConfig")
            .field("range", &self.range)
            .field("selectable", &self.selectable)
            .field("step", &self.step)
            .field("only", &self.only)
            .field("value", &self.value)
            .field("disable", &self.disable)
            .field("effects", &self.effects)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
