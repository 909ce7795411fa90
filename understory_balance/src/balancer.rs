// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The balancer: keeps a group of sliders summing to a target.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`

use smallvec::SmallVec;
use understory_slider::numeric::round_to;
use understory_slider::{EventBus, Outcome, Slider, SliderEvent, SliderId, Value};

use crate::algorithm::Algorithm;
use crate::error::ConfigError;
use crate::snapshot::{Snapshot, current};

/// Events fired by a [`Balancer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BalanceEvent {
    /// A member began an interaction and became the master. `Cancel` rejects
    /// the interaction.
    Start,
    /// The subordinates were rebalanced after the master moved.
    Update,
    /// The master committed; subordinates committed with it.
    Change,
    /// The interaction was abandoned; every member is back where it started.
    Abort,
}

/// Listener signature for balancer events.
pub type BalanceListener = dyn Fn(&Balancer) -> Outcome;

/// Options for [`Balancer::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct BalancerConfig {
    /// Sum the members must add up to after every interaction.
    pub target: f64,
    /// Name of the redistribution algorithm: `"least_recently_used"` or
    /// `"fair"`.
    pub algorithm: String,
    /// Largest distance the master may move from where the interaction
    /// started. `None` uses the combined span of the subordinates.
    pub max_delta: Option<f64>,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            target: 100.0,
            algorithm: String::from(Algorithm::LeastRecentlyUsed.name()),
            max_delta: None,
        }
    }
}

impl BalancerConfig {
    /// Sets the target sum.
    #[must_use]
    pub fn with_target(mut self, target: f64) -> Self {
        self.target = target;
        self
    }

    /// Selects the redistribution algorithm by name.
    #[must_use]
    pub fn with_algorithm(mut self, name: impl Into<String>) -> Self {
        self.algorithm = name.into();
        self
    }

    /// Caps how far the master may move in one interaction.
    #[must_use]
    pub fn with_max_delta(mut self, max_delta: f64) -> Self {
        self.max_delta = Some(max_delta);
        self
    }
}

/// Per-interaction state; present only while a master is set.
struct Interaction {
    master: SliderId,
    subordinates: SmallVec<[Slider; 4]>,
    snapshot: Snapshot,
    max_delta: f64,
}

struct State {
    members: Vec<Slider>,
    /// Member ids, least recently used first.
    order: Vec<SliderId>,
    precision: u32,
    disabled: bool,
    interaction: Option<Interaction>,
    /// The interaction most recently committed, kept until its master
    /// starts over so that a late veto of the master's own commit can
    /// bring the group along.
    settled: Option<Interaction>,
}

struct Inner {
    target: f64,
    algorithm: Algorithm,
    max_delta: Option<f64>,
    state: RefCell<State>,
    bus: EventBus<BalanceEvent, BalanceListener>,
}

/// Keeps a group of scalar sliders summing to a target.
///
/// When a member starts an interaction it becomes the master and every other
/// enabled member becomes a subordinate. Each time the master moves, the
/// difference to the target (the flex) is spread over the subordinates by
/// the configured [`Algorithm`]. If the subordinates cannot absorb all of it
/// they are put back and the master's move is vetoed, so the group never
/// leaves balance. Committing or aborting the master commits or aborts the
/// subordinates with it.
///
/// ```
/// use understory_balance::{Balancer, BalancerConfig};
/// use understory_slider::{Slider, SliderConfig};
///
/// let a = Slider::new(SliderConfig::default().with_value(0.0));
/// let b = Slider::new(SliderConfig::default().with_value(100.0));
/// let c = Slider::new(SliderConfig::default().with_value(0.0));
///
/// let balancer = Balancer::new(BalancerConfig::default()).unwrap();
/// balancer.add(&a).add(&b).add(&c);
///
/// a.set_value(25.0, false, false);
/// assert_eq!(a.value().as_single(), Some(25.0));
/// assert_eq!(b.value().as_single(), Some(75.0));
/// assert_eq!(c.value().as_single(), Some(0.0));
/// ```
#[derive(Clone)]
pub struct Balancer {
    inner: Rc<Inner>,
}

impl Balancer {
    /// Creates an empty group.
    ///
    /// Fails if `config.algorithm` does not name a known algorithm.
    pub fn new(config: BalancerConfig) -> Result<Self, ConfigError> {
        let algorithm = config.algorithm.parse::<Algorithm>()?;
        Ok(Self {
            inner: Rc::new(Inner {
                target: config.target,
                algorithm,
                max_delta: config.max_delta,
                state: RefCell::new(State {
                    members: Vec::new(),
                    order: Vec::new(),
                    precision: 0,
                    disabled: false,
                    interaction: None,
                    settled: None,
                }),
                bus: EventBus::new(),
            }),
        })
    }

    /// Adds `slider` to the group; returns `self` for chaining.
    ///
    /// Range sliders and sliders that are already members are ignored.
    pub fn add(&self, slider: &Slider) -> &Self {
        {
            let mut state = self.inner.state.borrow_mut();
            if slider.is_range() {
                log::warn!("{} is a range slider; not balancing it", slider.id());
                return self;
            }
            if state.members.iter().any(|member| member.ptr_eq(slider)) {
                log::warn!("{} is already balanced by this group", slider.id());
                return self;
            }
            state.members.push(slider.clone());
            state.order.push(slider.id());
            state.precision = state
                .members
                .iter()
                .map(Slider::places)
                .max()
                .unwrap_or(0);
        }

        let handlers: [(SliderEvent, fn(&Self, &Slider) -> Outcome); 4] = [
            (SliderEvent::Begin, Self::start),
            (SliderEvent::Drag, Self::drag),
            (SliderEvent::Change, Self::change),
            (SliderEvent::Abort, Self::abort),
        ];
        for (kind, handler) in handlers {
            let group = Rc::downgrade(&self.inner);
            slider.on(kind, move |_: &Value, slider: &Slider| {
                match Weak::upgrade(&group) {
                    Some(inner) => handler(&Self { inner }, slider),
                    None => Outcome::Proceed,
                }
            });
        }
        self
    }

    /// Registers `listener` for `kind`, after any existing listeners.
    pub fn on<F, R>(&self, kind: BalanceEvent, listener: F)
    where
        F: Fn(&Self) -> R + 'static,
        R: Into<Outcome>,
    {
        self.inner
            .bus
            .on(kind, Rc::new(move |group: &Self| listener(group).into()));
    }

    fn fire(&self, kind: BalanceEvent) -> Outcome {
        self.inner.bus.trigger(kind, |listener| listener(self))
    }

    /// Lets members move independently until [`Balancer::enable`].
    ///
    /// An interaction already in progress is not affected.
    pub fn disable(&self) {
        self.inner.state.borrow_mut().disabled = true;
    }

    /// Resumes balancing.
    pub fn enable(&self) {
        self.inner.state.borrow_mut().disabled = false;
    }

    /// Returns `true` while balancing is switched off.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.inner.state.borrow().disabled
    }

    /// Sum the members are kept at.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.inner.target
    }

    /// Decimal places balancer arithmetic is rounded to: the finest
    /// precision among members, counting their steps and `only` values.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.inner.state.borrow().precision
    }

    /// The redistribution algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.inner.algorithm
    }

    /// Members in the order they were added.
    #[must_use]
    pub fn members(&self) -> Vec<Slider> {
        self.inner.state.borrow().members.clone()
    }

    /// Member ids, least recently used first.
    #[must_use]
    pub fn order(&self) -> Vec<SliderId> {
        self.inner.state.borrow().order.clone()
    }

    /// The member driving the current interaction.
    #[must_use]
    pub fn master(&self) -> Option<SliderId> {
        self.inner
            .state
            .borrow()
            .interaction
            .as_ref()
            .map(|interaction| interaction.master)
    }

    /// Subordinates of the current interaction, in the order they absorb flex.
    #[must_use]
    pub fn subordinates(&self) -> Vec<Slider> {
        self.inner
            .state
            .borrow()
            .interaction
            .as_ref()
            .map(|interaction| interaction.subordinates.to_vec())
            .unwrap_or_default()
    }

    /// Current sum of all member values.
    #[must_use]
    pub fn sum(&self) -> f64 {
        let members = self.members();
        self.snap(members.iter().map(current).sum())
    }

    /// Rounds `value` to the group precision.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        round_to(value, self.precision())
    }

    fn is_master(&self, slider: &Slider) -> bool {
        self.master() == Some(slider.id())
    }

    /// Member `Begin` handler.
    fn start(&self, slider: &Slider) -> Outcome {
        let subordinates = {
            let mut state = self.inner.state.borrow_mut();
            if state.interaction.is_some() {
                return Outcome::Proceed;
            }
            state.settled = None;
            if state.disabled {
                return Outcome::Proceed;
            }

            let mut subordinates: SmallVec<[Slider; 4]> = state
                .members
                .iter()
                .filter(|member| !member.ptr_eq(slider) && !member.is_disabled())
                .cloned()
                .collect();
            let order = &state.order;
            subordinates.sort_unstable_by_key(|member| {
                order
                    .iter()
                    .position(|id| *id == member.id())
                    .unwrap_or(usize::MAX)
            });

            let max_delta = self.inner.max_delta.unwrap_or_else(|| {
                subordinates
                    .iter()
                    .map(|member| member.maximum() - member.minimum())
                    .sum()
            });
            let snapshot = Snapshot::capture(&state.members);
            state.interaction = Some(Interaction {
                master: slider.id(),
                subordinates: subordinates.clone(),
                snapshot,
                max_delta,
            });
            subordinates
        };
        log::trace!(
            "{} is the master over {} subordinates",
            slider.id(),
            subordinates.len()
        );

        // Subordinates that refuse to begin cannot be moved this time.
        let refused: SmallVec<[SliderId; 4]> = subordinates
            .iter()
            .filter(|subordinate| !subordinate.will_change())
            .map(Slider::id)
            .collect();
        if !refused.is_empty() {
            if let Some(interaction) = self.inner.state.borrow_mut().interaction.as_mut() {
                interaction
                    .subordinates
                    .retain(|subordinate| !refused.contains(&subordinate.id()));
            }
        }

        // A veto reaches the master's own `Abort`, which unwinds the group.
        self.fire(BalanceEvent::Start)
    }

    /// Member `Drag` handler.
    fn drag(&self, slider: &Slider) -> Outcome {
        if !self.is_master(slider) {
            return self.follow_settled_master(slider);
        }
        if self.balance(current(slider)) {
            self.fire(BalanceEvent::Update);
            Outcome::Proceed
        } else {
            Outcome::Cancel
        }
    }

    /// Spreads the master's move to `proposed` over the subordinates.
    ///
    /// Returns `false`, with the subordinates back where they were before
    /// this call, if the move cannot be balanced.
    fn balance(&self, proposed: f64) -> bool {
        let (master, subordinates, snapshot, max_delta) = {
            let state = self.inner.state.borrow();
            let Some(interaction) = state.interaction.as_ref() else {
                return false;
            };
            (
                interaction.master,
                interaction.subordinates.clone(),
                interaction.snapshot.clone(),
                interaction.max_delta,
            )
        };
        let places = self.precision();

        let started_at = snapshot.get(master).unwrap_or(proposed);
        let moved = proposed - started_at;
        if moved.abs() > max_delta {
            log::debug!("{master} moved {moved}, more than the group allows ({max_delta})");
            return false;
        }
        if subordinates.is_empty() {
            log::debug!("{master} has no subordinates to balance against");
            return false;
        }

        // Members that are neither master nor subordinate (disabled ones)
        // still count towards the target at their captured values.
        let others = snapshot.total() - started_at;
        let flex = round_to(self.inner.target - (others + proposed), places);
        let before = Snapshot::capture(&subordinates);
        let residual = self
            .inner
            .algorithm
            .run(&subordinates, &snapshot, flex, places);
        if residual != 0.0 {
            log::debug!("{master} at {proposed} leaves {residual} unbalanced; reverting");
            before.revert(&subordinates);
            return false;
        }
        true
    }

    /// Rebalances the last committed group when its master moves again
    /// before its own commit is final, as when a `Change` listener that runs
    /// after the group vetoes and the master restores its previous value.
    fn follow_settled_master(&self, slider: &Slider) -> Outcome {
        let settled_here = self
            .inner
            .state
            .borrow()
            .settled
            .as_ref()
            .is_some_and(|settled| settled.master == slider.id());
        if !settled_here || !slider.is_interacting() {
            return Outcome::Proceed;
        }

        let subordinates = {
            let mut state = self.inner.state.borrow_mut();
            let settled = state.settled.take();
            state.interaction = settled;
            state
                .interaction
                .as_ref()
                .map(|interaction| interaction.subordinates.clone())
                .unwrap_or_default()
        };
        log::debug!(
            "{} moved to {} after the group committed; rebalancing",
            slider.id(),
            current(slider)
        );
        for subordinate in &subordinates {
            subordinate.will_change();
        }
        let balanced = self.balance(current(slider));
        for subordinate in &subordinates {
            subordinate.has_changed();
        }
        {
            let mut state = self.inner.state.borrow_mut();
            let finished = state.interaction.take();
            state.settled = finished;
        }

        if balanced {
            self.fire(BalanceEvent::Update);
            Outcome::Proceed
        } else {
            Outcome::Cancel
        }
    }

    /// Member `Change` handler.
    fn change(&self, slider: &Slider) -> Outcome {
        if !self.is_master(slider) {
            return Outcome::Proceed;
        }
        self.slider_used(slider.id());
        for subordinate in self.subordinates() {
            subordinate.has_changed();
        }
        {
            let mut state = self.inner.state.borrow_mut();
            let finished = state.interaction.take();
            state.settled = finished;
        }
        log::trace!("{} committed; group sums to {}", slider.id(), self.sum());
        self.fire(BalanceEvent::Change)
    }

    /// Member `Abort` handler.
    fn abort(&self, slider: &Slider) -> Outcome {
        if !self.is_master(slider) {
            let mut state = self.inner.state.borrow_mut();
            if state
                .settled
                .as_ref()
                .is_some_and(|settled| settled.master == slider.id())
            {
                state.settled = None;
            }
            return Outcome::Proceed;
        }
        for subordinate in self.subordinates() {
            subordinate.abort_change();
        }
        self.inner.state.borrow_mut().interaction = None;
        log::trace!("{} aborted; group restored", slider.id());
        self.fire(BalanceEvent::Abort);
        Outcome::Proceed
    }

    /// Moves `id` to the back of the usage order.
    fn slider_used(&self, id: SliderId) {
        let mut state = self.inner.state.borrow_mut();
        // With two members the other slider is always the only subordinate.
        if state.members.len() <= 2 {
            return;
        }
        state.order.retain(|member| *member != id);
        state.order.push(id);
    }
}

impl fmt::Debug for Balancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Balancer");
        debug
            .field("target", &self.inner.target)
            .field("algorithm", &self.inner.algorithm)
            .field("max_delta", &self.inner.max_delta);
        match self.inner.state.try_borrow() {
            Ok(state) => {
                debug
                    .field("members", &state.members.len())
                    .field("order", &state.order)
                    .field("precision", &state.precision)
                    .field("disabled", &state.disabled)
                    .field(
                        "master",
                        &state.interaction.as_ref().map(|interaction| interaction.master),
                    );
            }
            Err(_) => {
                debug.field("state", &"<in use>");
            }
        }
        debug.field("bus", &self.inner.bus).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_slider::SliderConfig;

    fn group(values: &[f64]) -> (Balancer, Vec<Slider>) {
        let balancer = Balancer::new(BalancerConfig::default()).unwrap();
        let sliders: Vec<Slider> = values
            .iter()
            .map(|&value| Slider::new(SliderConfig::default().with_value(value)))
            .collect();
        for slider in &sliders {
            balancer.add(slider);
        }
        (balancer, sliders)
    }

    #[test]
    fn begin_assigns_master_and_subordinates() {
        let (balancer, sliders) = group(&[0.0, 100.0, 0.0]);
        assert!(sliders[0].will_change());
        assert_eq!(balancer.master(), Some(sliders[0].id()));
        let subordinates: Vec<SliderId> =
            balancer.subordinates().iter().map(Slider::id).collect();
        assert_eq!(subordinates, [sliders[1].id(), sliders[2].id()]);
        assert!(sliders[1].is_interacting());
        assert!(sliders[2].is_interacting());

        // A second member beginning does not take over.
        assert!(sliders[1].will_change());
        assert_eq!(balancer.master(), Some(sliders[0].id()));

        sliders[0].abort_change();
        assert_eq!(balancer.master(), None);
        assert!(!sliders[1].is_interacting());
    }

    #[test]
    fn range_sliders_and_duplicates_are_not_added() {
        let balancer = Balancer::new(BalancerConfig::default()).unwrap();
        let scalar = Slider::new(SliderConfig::default());
        let range = Slider::new(SliderConfig::default().with_value([10.0, 20.0]));
        balancer.add(&scalar).add(&scalar).add(&range);
        assert_eq!(balancer.members().len(), 1);
        assert_eq!(scalar.listener_count(SliderEvent::Drag), 1);
        assert_eq!(range.listener_count(SliderEvent::Drag), 0);
    }

    #[test]
    fn dropped_balancer_leaves_members_alone() {
        let a = Slider::new(SliderConfig::default().with_value(50.0));
        let b = Slider::new(SliderConfig::default().with_value(50.0));
        {
            let balancer = Balancer::new(BalancerConfig::default()).unwrap();
            balancer.add(&a).add(&b);
        }
        a.set_value(70.0, false, false);
        assert_eq!(a.value(), 70.0.into());
        assert_eq!(b.value(), 50.0.into());
    }

    #[test]
    fn sum_and_snap_use_group_precision() {
        let balancer = Balancer::new(BalancerConfig::default()).unwrap();
        let a = Slider::new(SliderConfig::default().with_step(0.1).with_value(0.1));
        let b = Slider::new(SliderConfig::default().with_step(0.1).with_value(0.2));
        balancer.add(&a).add(&b);
        assert_eq!(balancer.precision(), 1);
        assert_eq!(balancer.sum(), 0.3);
        assert_eq!(balancer.snap(0.25), 0.3);
    }
}
