// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer interface: how a slider talks to whatever draws it.
//!
//! The slider core never touches pixels. It tells a [`Renderer`] when to draw
//! itself, when the value moved, when a handle was grabbed or released and
//! when the slider was enabled or disabled. In return the renderer reports
//! where the bar sits on screen as a [`Track`], which the core uses to turn
//! pointer positions into values.
//!
//! [`HeadlessRenderer`] implements the interface without drawing anything; it
//! records every call in a shared [`RenderLog`], which makes it handy for tests
//! and for driving sliders from non-visual code.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::track::Track;
use crate::value::Value;

/// Snapshot of a slider handed to [`Renderer::render`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState<'a> {
    /// Current value.
    pub value: &'a Value,
    /// Drawable extent, `[low, high]`.
    pub extent: [f64; 2],
    /// Lowest selectable value.
    pub minimum: f64,
    /// Highest selectable value.
    pub maximum: f64,
    /// Whether the slider starts out disabled.
    pub disabled: bool,
}

/// Capability a slider needs from its visual representation.
///
/// All notification methods default to doing nothing.
pub trait Renderer {
    /// Builds the visual representation; called once during construction.
    fn render(&mut self, _state: &RenderState<'_>) {}

    /// The value changed. `animate` is a hint that the change came from a
    /// discrete jump (such as clicking the bar) and may be animated.
    fn on_redraw(&mut self, _value: &Value, _animate: bool) {}

    /// Handle `index` was grabbed (`active == true`) or released.
    fn on_handle_toggle(&mut self, _index: usize, _active: bool) {}

    /// The slider was enabled or disabled.
    fn on_enabled_changed(&mut self, _enabled: bool) {}

    /// Where the bar currently sits in device coordinates.
    fn track(&self) -> Track;
}

/// A call received by a [`HeadlessRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    /// [`Renderer::render`] with the value at construction time.
    Render(Value),
    /// [`Renderer::on_redraw`].
    Redraw {
        /// The new value.
        value: Value,
        /// The animation hint.
        animate: bool,
    },
    /// [`Renderer::on_handle_toggle`].
    HandleToggle {
        /// Handle index.
        index: usize,
        /// Whether the handle became active.
        active: bool,
    },
    /// [`Renderer::on_enabled_changed`].
    EnabledChanged(bool),
}

/// Shared, clonable log of [`RenderCall`]s.
#[derive(Clone, Debug, Default)]
pub struct RenderLog {
    calls: Rc<RefCell<Vec<RenderCall>>>,
}

impl RenderLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.borrow().clone()
    }

    /// Returns the most recent call.
    #[must_use]
    pub fn last(&self) -> Option<RenderCall> {
        self.calls.borrow().last().cloned()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Forgets every recorded call.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn push(&self, call: RenderCall) {
        self.calls.borrow_mut().push(call);
    }
}

/// A renderer that draws nothing and records what it was asked to do.
///
/// ```
/// use understory_slider::renderer::{HeadlessRenderer, RenderCall};
/// use understory_slider::{Slider, SliderConfig};
///
/// let renderer = HeadlessRenderer::default();
/// let log = renderer.log();
/// let slider = Slider::with_renderer(SliderConfig::default(), renderer);
///
/// slider.set_value(40.0, true, false);
/// assert_eq!(
///     log.last(),
///     Some(RenderCall::Redraw { value: 40.0.into(), animate: true })
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct HeadlessRenderer {
    track: Track,
    log: RenderLog,
}

impl HeadlessRenderer {
    /// Creates a headless renderer reporting `track` as its bar.
    #[must_use]
    pub fn new(track: Track) -> Self {
        Self {
            track,
            log: RenderLog::new(),
        }
    }

    /// Returns a handle to the call log; keep it before handing the renderer
    /// to a slider.
    #[must_use]
    pub fn log(&self) -> RenderLog {
        self.log.clone()
    }

    /// Moves or resizes the reported bar.
    pub fn set_track(&mut self, track: Track) {
        self.track = track;
    }
}

impl Renderer for HeadlessRenderer {
    fn render(&mut self, state: &RenderState<'_>) {
        self.log.push(RenderCall::Render(state.value.clone()));
    }

    fn on_redraw(&mut self, value: &Value, animate: bool) {
        self.log.push(RenderCall::Redraw {
            value: value.clone(),
            animate,
        });
    }

    fn on_handle_toggle(&mut self, index: usize, active: bool) {
        self.log.push(RenderCall::HandleToggle { index, active });
    }

    fn on_enabled_changed(&mut self, enabled: bool) {
        self.log.push(RenderCall::EnabledChanged(enabled));
    }

    fn track(&self) -> Track {
        self.track
    }
}
