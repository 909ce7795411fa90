// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slider controller: the begin / drag / change / abort interaction lifecycle.
//!
//! A [`Slider`] wraps a [`ValueModel`] and drives it through a small state
//! machine:
//!
//! ```text
//! Idle --will_change--> Interacting --has_changed--> Idle (committed)
//!                            |
//!                            +------abort_change---> Idle (value restored)
//! ```
//!
//! [`Slider::will_change`] snapshots the current value and fires
//! [`SliderEvent::Begin`]. While interacting, [`Slider::set_tentative_value`]
//! moves the value and fires [`SliderEvent::Drag`]. [`Slider::has_changed`]
//! commits with [`SliderEvent::Change`] and [`Slider::abort_change`] puts the
//! snapshot back and fires [`SliderEvent::Abort`]. Listeners may return
//! [`Outcome::Cancel`] from `Begin`, `Drag` and `Change` to veto.
//!
//! `Slider` is a cheap handle (`Rc`) to shared state, so the same slider can be
//! held by listeners, drag sessions and slider groups. No internal borrow is
//! held while listeners or the renderer run, so listeners may call back into
//! this slider or into other sliders.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use kurbo::Point;

use crate::config::SliderConfig;
use crate::events::{Dispatch, EventBus, Outcome, SliderEvent};
use crate::model::ValueModel;
use crate::renderer::{HeadlessRenderer, RenderState, Renderer};
use crate::session::DragSession;
use crate::value::Value;

/// Listener signature for slider events.
pub type SliderListener = dyn Fn(&Value, &Slider) -> Outcome;

/// Process-unique identifier of a slider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SliderId(u64);

impl SliderId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slider#{}", self.0)
    }
}

struct State {
    model: ValueModel,
    /// Value captured by `will_change`; `Some` while interacting.
    previous: Option<Value>,
    active_handle: Option<usize>,
    disabled: bool,
}

struct Inner {
    id: SliderId,
    extent: [f64; 2],
    effects: bool,
    state: RefCell<State>,
    bus: EventBus<SliderEvent, SliderListener>,
    renderer: RefCell<Box<dyn Renderer>>,
}

/// Handle to an interactive slider.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use understory_slider::{Slider, SliderConfig};
///
/// let changes = Rc::new(Cell::new(0));
/// let seen = Rc::clone(&changes);
/// let slider = Slider::new(
///     SliderConfig::default()
///         .with_step(5.0)
///         .on_change(move |_, _| seen.set(seen.get() + 1)),
/// );
///
/// assert_eq!(slider.set_value(42.0, false, false).as_single(), Some(40.0));
/// assert_eq!(changes.get(), 1);
///
/// // Setting the same value again is not a change.
/// slider.set_value(41.0, false, false);
/// assert_eq!(changes.get(), 1);
/// ```
#[derive(Clone)]
pub struct Slider {
    inner: Rc<Inner>,
}

impl Slider {
    /// Builds a slider drawn by a [`HeadlessRenderer`].
    #[must_use]
    pub fn new(config: SliderConfig) -> Self {
        Self::with_renderer(config, HeadlessRenderer::default())
    }

    /// Builds a slider drawn by `renderer`.
    ///
    /// Configured callbacks are registered first, then the renderer draws the
    /// initial state, the slider is disabled if requested and finally
    /// [`SliderEvent::Setup`] fires.
    #[must_use]
    pub fn with_renderer(config: SliderConfig, renderer: impl Renderer + 'static) -> Self {
        let model = ValueModel::new(
            config.selectable_bounds(),
            config.step,
            config.only.clone(),
            config.value.clone(),
        );
        let SliderConfig {
            range,
            disable,
            effects,
            callbacks,
            ..
        } = config;

        let slider = Self {
            inner: Rc::new(Inner {
                id: SliderId::next(),
                extent: range,
                effects,
                state: RefCell::new(State {
                    model,
                    previous: None,
                    active_handle: None,
                    disabled: false,
                }),
                bus: EventBus::new(),
                renderer: RefCell::new(Box::new(renderer)),
            }),
        };
        for (kind, listener) in callbacks {
            slider.inner.bus.on(kind, listener);
        }

        let value = slider.value();
        slider.inner.renderer.borrow_mut().render(&RenderState {
            value: &value,
            extent: slider.inner.extent,
            minimum: slider.minimum(),
            maximum: slider.maximum(),
            disabled: disable,
        });
        if disable {
            slider.disable();
        }
        log::trace!(
            "{} created: value {value} in [{}, {}]",
            slider.id(),
            slider.minimum(),
            slider.maximum()
        );
        slider.fire(SliderEvent::Setup);
        slider
    }

    /// Registers `listener` for `kind`, after any existing listeners.
    ///
    /// Closures may return `()`, `bool` (`false` vetoes) or an [`Outcome`].
    pub fn on<F, R>(&self, kind: SliderEvent, listener: F)
    where
        F: Fn(&Value, &Self) -> R + 'static,
        R: Into<Outcome>,
    {
        self.inner.bus.on(
            kind,
            Rc::new(move |value: &Value, slider: &Self| listener(value, slider).into()),
        );
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: SliderEvent) -> usize {
        self.inner.bus.listener_count(kind)
    }

    fn fire(&self, kind: SliderEvent) -> Outcome {
        let value = self.value();
        self.inner
            .bus
            .trigger(kind, |listener| listener(&value, self))
    }

    fn redraw(&self, animate: bool) {
        let value = self.value();
        self.inner
            .renderer
            .borrow_mut()
            .on_redraw(&value, animate && self.inner.effects);
    }

    /// Prepares for an interaction.
    ///
    /// Returns `false` if the slider is disabled or a [`SliderEvent::Begin`]
    /// listener cancels; in the latter case [`SliderEvent::Abort`] fires so
    /// that listeners which already accepted can let go. Calling this while
    /// already interacting returns `true` and keeps the original snapshot.
    pub fn will_change(&self) -> bool {
        let snapshot = {
            let state = self.inner.state.borrow();
            if state.disabled {
                log::debug!("{} is disabled; not starting", self.inner.id);
                return false;
            }
            if state.previous.is_some() {
                return true;
            }
            state.model.value().clone()
        };

        if self.fire(SliderEvent::Begin).is_cancel() {
            log::debug!("{} begin vetoed", self.inner.id);
            self.fire(SliderEvent::Abort);
            return false;
        }
        log::trace!("{} begin at {snapshot}", self.inner.id);
        self.inner.state.borrow_mut().previous = Some(snapshot);
        true
    }

    /// Moves the value towards `candidate` without committing.
    ///
    /// A scalar candidate for a range slider moves the active handle; with no
    /// active handle nothing happens. Returns the new value, or `None` if the
    /// candidate changed nothing or a [`SliderEvent::Drag`] listener vetoed
    /// it. On a veto the value is rolled back and the `Drag` listeners that
    /// ran before the vetoing one are called again with the restored value.
    /// `silent` skips the `Drag` event.
    pub fn set_tentative_value(
        &self,
        candidate: impl Into<Value>,
        animate: bool,
        silent: bool,
    ) -> Option<Value> {
        let candidate = candidate.into();
        let prior = {
            let mut state = self.inner.state.borrow_mut();
            let prior = state.model.value().clone();
            match candidate {
                Value::Single(position) if state.model.is_range() => {
                    let index = state.active_handle?;
                    state.model.set_handle(index, position)?;
                }
                candidate => {
                    state.model.set_value(candidate)?;
                }
            }
            prior
        };

        if !silent {
            let value = self.value();
            let dispatch = self
                .inner
                .bus
                .dispatch(SliderEvent::Drag, |listener| listener(&value, self));
            if let Dispatch::Cancelled { accepted } = dispatch {
                log::debug!("{} drag vetoed; back to {prior}", self.inner.id);
                self.inner.state.borrow_mut().model.replace(prior);
                // Listeners that already followed the candidate follow it back.
                let restored = self.value();
                for listener in &accepted {
                    (**listener)(&restored, self);
                }
                return None;
            }
        }
        self.redraw(animate);
        Some(self.value())
    }

    /// Commits the current interaction.
    ///
    /// Returns `true` if a [`SliderEvent::Change`] fired and nobody vetoed it.
    /// An interaction that ended where it started is aborted instead. When a
    /// `Change` listener cancels, the pre-interaction value is re-applied as a
    /// tentative value (so `Drag` listeners see the restoration) and the
    /// interaction aborts.
    pub fn has_changed(&self) -> bool {
        let Some(previous) = self.previous_value() else {
            return false;
        };
        self.deactivate_handle();

        if self.value() == previous {
            self.abort_change();
            return false;
        }
        if self.fire(SliderEvent::Change).is_cancel() {
            log::debug!("{} change vetoed; restoring {previous}", self.inner.id);
            self.set_tentative_value(previous, true, false);
            self.abort_change();
            return false;
        }
        self.inner.state.borrow_mut().previous = None;
        log::trace!("{} committed {}", self.inner.id, self.value());
        true
    }

    /// Ends the current interaction without a change.
    ///
    /// The pre-interaction value is restored silently, the active handle is
    /// released and [`SliderEvent::Abort`] fires. Does nothing when idle.
    pub fn abort_change(&self) {
        let restored = {
            let mut state = self.inner.state.borrow_mut();
            let Some(previous) = state.previous.take() else {
                return;
            };
            let restored = *state.model.value() != previous;
            if restored {
                state.model.replace(previous);
            }
            restored
        };
        if restored {
            self.redraw(true);
        }
        self.deactivate_handle();
        log::trace!("{} aborted at {}", self.inner.id, self.value());
        self.fire(SliderEvent::Abort);
    }

    /// Sets the value as a complete interaction.
    ///
    /// Runs [`will_change`](Self::will_change), then
    /// [`set_tentative_value`](Self::set_tentative_value) and finally
    /// [`has_changed`](Self::has_changed) (or
    /// [`abort_change`](Self::abort_change) when nothing moved). Inside an
    /// interaction that is already running only the tentative value is
    /// applied. Returns the resulting value.
    pub fn set_value(&self, value: impl Into<Value>, animate: bool, silent: bool) -> Value {
        let value = value.into();
        if self.is_interacting() {
            self.set_tentative_value(value, animate, silent);
            return self.value();
        }
        if !self.will_change() {
            return self.value();
        }
        if self.set_tentative_value(value, animate, silent).is_some() {
            self.has_changed();
        } else {
            self.abort_change();
        }
        self.value()
    }

    /// Increases a scalar slider by `count` steps (at least one).
    ///
    /// Range sliders are left unchanged.
    pub fn step_up(&self, count: u32) -> Value {
        self.step_by(f64::from(count.max(1)))
    }

    /// Decreases a scalar slider by `count` steps (at least one).
    ///
    /// Range sliders are left unchanged.
    pub fn step_down(&self, count: u32) -> Value {
        self.step_by(-f64::from(count.max(1)))
    }

    fn step_by(&self, steps: f64) -> Value {
        let current = self.value();
        match current {
            Value::Single(value) => self.set_value(value + self.step() * steps, false, false),
            Value::Range(_) => current,
        }
    }

    /// Value under `point`, interpolated across the drawable extent.
    ///
    /// The result is not sanitized; see [`Slider::sanitize`].
    #[must_use]
    pub fn value_at(&self, point: Point) -> f64 {
        let track = self.inner.renderer.borrow().track();
        track.value_at(point, self.inner.extent)
    }

    /// Starts a pointer interaction at `point`.
    ///
    /// Grabs the handle nearest to the pointer, applies the value under the
    /// pointer and returns the session that tracks the rest of the drag.
    /// Returns `None` if the interaction could not begin.
    pub fn begin_drag(&self, point: Point) -> Option<DragSession> {
        if !self.will_change() {
            return None;
        }
        let position = self.value_at(point);
        let handle = self.inner.state.borrow().model.nearest_handle(position);
        self.activate_handle(handle);
        self.set_tentative_value(position, true, false);
        Some(DragSession::new(self.clone(), handle, point))
    }

    /// Marks handle `index` as the one being manipulated.
    pub fn activate_handle(&self, index: usize) {
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            if index >= state.model.value().handle_count() {
                log::warn!("{} has no handle {index}", self.inner.id);
                return;
            }
            state.active_handle.replace(index)
        };
        if previous == Some(index) {
            return;
        }
        let mut renderer = self.inner.renderer.borrow_mut();
        if let Some(previous) = previous {
            renderer.on_handle_toggle(previous, false);
        }
        renderer.on_handle_toggle(index, true);
    }

    /// Releases the active handle, if any.
    pub fn deactivate_handle(&self) {
        let released = self.inner.state.borrow_mut().active_handle.take();
        if let Some(index) = released {
            self.inner
                .renderer
                .borrow_mut()
                .on_handle_toggle(index, false);
        }
    }

    /// Allows interactions again.
    pub fn enable(&self) {
        self.set_disabled(false);
    }

    /// Prevents interactions from starting.
    pub fn disable(&self) {
        self.set_disabled(true);
    }

    fn set_disabled(&self, disabled: bool) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.disabled == disabled {
                return;
            }
            state.disabled = disabled;
        }
        log::trace!("{} disabled: {disabled}", self.inner.id);
        self.inner
            .renderer
            .borrow_mut()
            .on_enabled_changed(!disabled);
    }

    /// Nearest legal value to `value`.
    #[must_use]
    pub fn sanitize(&self, value: f64) -> f64 {
        self.inner.state.borrow().model.sanitize(value)
    }

    /// Unique id of this slider.
    #[must_use]
    pub fn id(&self) -> SliderId {
        self.inner.id
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> Value {
        self.inner.state.borrow().model.value().clone()
    }

    /// Lowest selectable value.
    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.inner.state.borrow().model.minimum()
    }

    /// Highest selectable value.
    #[must_use]
    pub fn maximum(&self) -> f64 {
        self.inner.state.borrow().model.maximum()
    }

    /// Step between legal values.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.inner.state.borrow().model.step()
    }

    /// Decimal places values are rounded to.
    #[must_use]
    pub fn places(&self) -> u32 {
        self.inner.state.borrow().model.places()
    }

    /// Drawable extent, `[low, high]`.
    #[must_use]
    pub fn extent(&self) -> [f64; 2] {
        self.inner.extent
    }

    /// Enumerated legal values, if configured.
    #[must_use]
    pub fn only(&self) -> Option<Vec<f64>> {
        self.inner.state.borrow().model.only().map(<[f64]>::to_vec)
    }

    /// Handle currently being manipulated.
    #[must_use]
    pub fn active_handle(&self) -> Option<usize> {
        self.inner.state.borrow().active_handle
    }

    /// Value captured when the current interaction began.
    #[must_use]
    pub fn previous_value(&self) -> Option<Value> {
        self.inner.state.borrow().previous.clone()
    }

    /// Returns `true` between `will_change` and commit or abort.
    #[must_use]
    pub fn is_interacting(&self) -> bool {
        self.inner.state.borrow().previous.is_some()
    }

    /// Returns `true` while the slider refuses interactions.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.inner.state.borrow().disabled
    }

    /// Returns `true` for multi-handle sliders.
    #[must_use]
    pub fn is_range(&self) -> bool {
        self.inner.state.borrow().model.is_range()
    }

    /// Number of handles.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.inner.state.borrow().model.value().handle_count()
    }

    /// Returns `true` if both handles refer to the same slider.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Slider");
        debug.field("id", &self.inner.id);
        match self.inner.state.try_borrow() {
            Ok(state) => {
                debug
                    .field("value", state.model.value())
                    .field("minimum", &state.model.minimum())
                    .field("maximum", &state.model.maximum())
                    .field("previous", &state.previous)
                    .field("active_handle", &state.active_handle)
                    .field("disabled", &state.disabled);
            }
            Err(_) => {
                debug.field("state", &"<in use>");
            }
        }
        debug.field("bus", &self.inner.bus).finish()
    }
}
