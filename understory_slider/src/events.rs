// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event bus: ordered listeners with explicit veto outcomes.
//!
//! Listeners are registered per event kind and run in registration order.
//! Each returns an [`Outcome`]; the first [`Outcome::Cancel`] stops the walk
//! and is reported back to whoever triggered the event. This is the only way a
//! listener can cancel an in-flight interaction.
//!
//! The bus is generic over both the event kind `K` and the listener type `F`,
//! so sliders and slider groups share it while passing different arguments.
//! The caller supplies the invocation closure, much like a dispatcher walking
//! a responder sequence:
//!
//! ```
//! use std::rc::Rc;
//! use understory_slider::events::{EventBus, Outcome};
//!
//! type Listener = dyn Fn(u32) -> Outcome;
//!
//! let bus: EventBus<&str, Listener> = EventBus::new();
//! bus.on("drag", Rc::new(|v: u32| Outcome::from(v < 10)));
//! bus.on("drag", Rc::new(|_: u32| Outcome::Proceed));
//!
//! assert_eq!(bus.trigger("drag", |listener| listener(5)), Outcome::Proceed);
//! assert_eq!(bus.trigger("drag", |listener| listener(50)), Outcome::Cancel);
//! // No listeners means nothing objects.
//! assert_eq!(bus.trigger("change", |listener| listener(50)), Outcome::Proceed);
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use smallvec::SmallVec;

/// Result of running a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    /// Let the interaction continue.
    #[default]
    Proceed,
    /// Veto the interaction; remaining listeners are skipped.
    Cancel,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Cancel`].
    #[must_use]
    pub fn is_cancel(self) -> bool {
        matches!(self, Self::Cancel)
    }

    /// Returns `true` for [`Outcome::Proceed`].
    #[must_use]
    pub fn is_proceed(self) -> bool {
        matches!(self, Self::Proceed)
    }
}

impl From<bool> for Outcome {
    /// `true` proceeds, `false` cancels.
    fn from(proceed: bool) -> Self {
        if proceed { Self::Proceed } else { Self::Cancel }
    }
}

impl From<()> for Outcome {
    fn from((): ()) -> Self {
        Self::Proceed
    }
}

/// Lifecycle events fired by a slider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SliderEvent {
    /// Fired once when construction finishes. The outcome is ignored.
    Setup,
    /// An interaction is about to start; `Cancel` keeps the slider idle.
    Begin,
    /// A tentative value was applied; `Cancel` rolls it back.
    Drag,
    /// The interaction is being committed; `Cancel` restores the
    /// pre-interaction value.
    Change,
    /// The interaction ended without a change. The outcome is ignored.
    Abort,
}

/// Ordered listener registry with short-circuiting dispatch.
///
/// The bus uses interior mutability so that it can live inside shared
/// handles; listeners are snapshotted before dispatch, which means a listener
/// may register further listeners (they run from the next trigger onwards) or
/// re-enter whatever owns the bus.
pub struct EventBus<K, F: ?Sized> {
    listeners: RefCell<Vec<(K, Rc<F>)>>,
}

impl<K, F: ?Sized> EventBus<K, F> {
    /// Creates an empty bus.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<K: Copy + PartialEq, F: ?Sized> EventBus<K, F> {
    /// Registers `listener` for `kind`, after any existing listeners.
    pub fn on(&self, kind: K, listener: Rc<F>) {
        self.listeners.borrow_mut().push((kind, listener));
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: K) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Runs the listeners registered for `kind` through `call`, in order.
    ///
    /// Returns [`Outcome::Cancel`] as soon as one listener cancels, otherwise
    /// [`Outcome::Proceed`].
    pub fn trigger(&self, kind: K, call: impl FnMut(&F) -> Outcome) -> Outcome {
        match self.dispatch(kind, call) {
            Dispatch::Completed => Outcome::Proceed,
            Dispatch::Cancelled { .. } => Outcome::Cancel,
        }
    }

    /// Like [`trigger`](Self::trigger), but a cancelled dispatch hands back
    /// the listeners that had already proceeded, so the caller can tell them
    /// about the rollback.
    pub fn dispatch(&self, kind: K, mut call: impl FnMut(&F) -> Outcome) -> Dispatch<F> {
        let matching: SmallVec<[Rc<F>; 4]> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        let Some(cancelled_at) = matching
            .iter()
            .position(|listener| call(&**listener).is_cancel())
        else {
            return Dispatch::Completed;
        };
        let mut accepted = matching;
        accepted.truncate(cancelled_at);
        Dispatch::Cancelled { accepted }
    }
}

/// Result of [`EventBus::dispatch`].
pub enum Dispatch<F: ?Sized> {
    /// Every listener proceeded.
    Completed,
    /// A listener cancelled.
    Cancelled {
        /// Listeners that ran and proceeded before the cancel, in order.
        accepted: SmallVec<[Rc<F>; 4]>,
    },
}

impl<F: ?Sized> Dispatch<F> {
    /// Returns `true` if a listener cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl<F: ?Sized> fmt::Debug for Dispatch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("Completed"),
            Self::Cancelled { accepted } => f
                .debug_struct("Cancelled")
                .field("accepted", &accepted.len())
                .finish(),
        }
    }
}

impl<K, F: ?Sized> Default for EventBus<K, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, F: ?Sized> fmt::Debug for EventBus<K, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("EventBus");
        match self.listeners.try_borrow() {
            Ok(listeners) => {
                let kinds: Vec<&K> = listeners.iter().map(|(kind, _)| kind).collect();
                debug.field("listeners", &kinds);
            }
            Err(_) => {
                debug.field("listeners", &"<in use>");
            }
        }
        debug.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    type Listener = dyn Fn(&mut Vec<u32>) -> Outcome;

    #[test]
    fn listeners_run_in_registration_order() {
        let bus: EventBus<SliderEvent, Listener> = EventBus::new();
        bus.on(SliderEvent::Drag, Rc::new(|seen: &mut Vec<u32>| {
            seen.push(1);
            Outcome::Proceed
        }));
        bus.on(SliderEvent::Change, Rc::new(|seen: &mut Vec<u32>| {
            seen.push(99);
            Outcome::Proceed
        }));
        bus.on(SliderEvent::Drag, Rc::new(|seen: &mut Vec<u32>| {
            seen.push(2);
            Outcome::Proceed
        }));

        let mut seen = Vec::new();
        let outcome = bus.trigger(SliderEvent::Drag, |listener| listener(&mut seen));
        assert_eq!(outcome, Outcome::Proceed);
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(bus.listener_count(SliderEvent::Drag), 2);
        assert_eq!(bus.listener_count(SliderEvent::Abort), 0);
    }

    #[test]
    fn cancel_short_circuits() {
        let bus: EventBus<SliderEvent, Listener> = EventBus::new();
        bus.on(SliderEvent::Begin, Rc::new(|seen: &mut Vec<u32>| {
            seen.push(1);
            Outcome::Cancel
        }));
        bus.on(SliderEvent::Begin, Rc::new(|seen: &mut Vec<u32>| {
            seen.push(2);
            Outcome::Proceed
        }));

        let mut seen = Vec::new();
        let outcome = bus.trigger(SliderEvent::Begin, |listener| listener(&mut seen));
        assert_eq!(outcome, Outcome::Cancel);
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn cancelled_dispatch_reports_earlier_listeners() {
        let bus: EventBus<SliderEvent, Listener> = EventBus::new();
        for id in 1..=3 {
            bus.on(SliderEvent::Drag, Rc::new(move |seen: &mut Vec<u32>| {
                seen.push(id);
                Outcome::from(id != 2)
            }));
        }

        let mut seen = Vec::new();
        let Dispatch::Cancelled { accepted } =
            bus.dispatch(SliderEvent::Drag, |listener| listener(&mut seen))
        else {
            panic!("second listener cancels");
        };
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(accepted.len(), 1);

        seen.clear();
        (*accepted[0])(&mut seen);
        assert_eq!(seen, vec![1]);

        let quiet: EventBus<SliderEvent, Listener> = EventBus::new();
        let dispatch = quiet.dispatch(SliderEvent::Drag, |listener| listener(&mut seen));
        assert!(!dispatch.is_cancelled());
    }

    #[test]
    fn listeners_registered_during_dispatch_run_next_time() {
        type Counter = dyn Fn(&mut u32) -> Outcome;
        let bus: Rc<EventBus<SliderEvent, Counter>> = Rc::new(EventBus::new());
        let inner = Rc::clone(&bus);
        bus.on(SliderEvent::Drag, Rc::new(move |count: &mut u32| {
            *count += 1;
            inner.on(SliderEvent::Drag, Rc::new(|count: &mut u32| {
                *count += 100;
                Outcome::Proceed
            }));
            Outcome::Proceed
        }));

        let mut count = 0;
        bus.trigger(SliderEvent::Drag, |listener| listener(&mut count));
        assert_eq!(count, 1);
        bus.trigger(SliderEvent::Drag, |listener| listener(&mut count));
        assert_eq!(count, 102);
    }

    #[test]
    fn outcome_conversions() {
        assert_eq!(Outcome::from(true), Outcome::Proceed);
        assert_eq!(Outcome::from(false), Outcome::Cancel);
        assert_eq!(Outcome::from(()), Outcome::Proceed);
        assert!(Outcome::Cancel.is_cancel());
        assert!(Outcome::Proceed.is_proceed());
    }
}
