// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Balance: keep a group of sliders summing to a target.
//!
//! A [`Balancer`] watches the lifecycle events of its member
//! [`Slider`](understory_slider::Slider)s. The member a user starts moving
//! becomes the master; every move it makes is compensated by moving the other
//! members (the subordinates) so that the group still adds up to the target.
//! Moves that cannot be compensated are vetoed, and committing or aborting the
//! master commits or aborts the whole group.
//!
//! - [`Balancer`], [`BalancerConfig`]: the group and its options.
//! - [`Algorithm`]: how the compensating amount (the flex) is spread:
//!   [`algorithm::least_recently_used`] moves the sliders the user touched
//!   longest ago first, [`algorithm::fair`] shares it evenly.
//! - [`BalanceEvent`]: group-level events on the same event bus sliders use.
//! - [`Snapshot`]: member values captured when an interaction starts.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_balance::{Balancer, BalancerConfig};
//! use understory_slider::{Slider, SliderConfig};
//!
//! let balancer = Balancer::new(BalancerConfig::default().with_algorithm("fair")).unwrap();
//! let sliders: Vec<Slider> = [40.0, 30.0, 30.0]
//!     .into_iter()
//!     .map(|value| Slider::new(SliderConfig::default().with_value(value)))
//!     .collect();
//! for slider in &sliders {
//!     balancer.add(slider);
//! }
//!
//! sliders[0].set_value(60.0, false, false);
//! assert_eq!(balancer.sum(), 100.0);
//! assert_eq!(sliders[1].value().as_single(), Some(20.0));
//! assert_eq!(sliders[2].value().as_single(), Some(20.0));
//!
//! // Infeasible moves are refused and nothing changes.
//! let config = BalancerConfig::default().with_target(50.0);
//! let small = Balancer::new(config).unwrap();
//! let a = Slider::new(SliderConfig::default().with_value(10.0));
//! let b = Slider::new(SliderConfig::default().with_range([0.0, 40.0]).with_value(40.0));
//! small.add(&a).add(&b);
//! assert_eq!(a.set_value(0.0, false, false).as_single(), Some(10.0));
//! assert_eq!(b.value().as_single(), Some(40.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std` and `understory_slider/std`.
//! - `libm`: float math through `libm` for `no_std` targets.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod algorithm;
mod balancer;
mod error;
mod snapshot;

pub use algorithm::Algorithm;
pub use balancer::{BalanceEvent, BalanceListener, Balancer, BalancerConfig};
pub use error::ConfigError;
pub use snapshot::Snapshot;
