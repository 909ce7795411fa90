// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Slider: a headless slider core.
//!
//! This crate models the part of a slider widget that is independent of how
//! it is drawn:
//!
//! - **Values** ([`Value`], [`model::ValueModel`]): a single number or an
//!   ordered set of handle positions, snapped to a step grid (or to an
//!   enumerated set of allowed values) and clamped to selectable bounds.
//! - **Interaction lifecycle** ([`Slider`]): `will_change` / tentative values /
//!   `has_changed` or `abort_change`, with listeners that can veto each stage.
//! - **Events** ([`events::EventBus`], [`Outcome`]): ordered listeners with
//!   explicit veto results, shared with slider groups.
//! - **Rendering seam** ([`renderer::Renderer`]): drawing, redraw hints and
//!   handle activation are delegated; [`renderer::HeadlessRenderer`] records
//!   calls instead of drawing.
//! - **Pointer input** ([`track::Track`], [`session::DragSession`]): map device
//!   positions onto the bar and run a drag from press to release.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_slider::{Outcome, Slider, SliderConfig, SliderEvent};
//!
//! let slider = Slider::new(
//!     SliderConfig::default()
//!         .with_range([0.0, 10.0])
//!         .with_step(0.5)
//!         .with_value(3.0),
//! );
//!
//! // Refuse anything above 8.
//! slider.on(SliderEvent::Drag, |value, _| {
//!     Outcome::from(value.as_single().is_some_and(|v| v <= 8.0))
//! });
//!
//! assert_eq!(slider.set_value(4.2, false, false).as_single(), Some(4.0));
//! assert_eq!(slider.set_value(9.0, false, false).as_single(), Some(4.0));
//! assert_eq!(slider.step_up(3).as_single(), Some(5.5));
//! ```
//!
//! ## Range Sliders
//!
//! Initialise with more than one value to get a multi-handle slider. Handles
//! stay sorted and at least one step apart:
//!
//! ```rust
//! use understory_slider::{Slider, SliderConfig};
//!
//! let slider = Slider::new(SliderConfig::default().with_value([25.0, 75.0]));
//! assert!(slider.is_range());
//! assert_eq!(slider.set_value([90.0, 10.0], false, false), [10.0, 90.0].into());
//!
//! // A single number is not a valid value for a range slider.
//! assert_eq!(slider.set_value(10.0, false, false), [10.0, 90.0].into());
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: float math through `libm` for `no_std` targets.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod config;
pub mod events;
pub mod model;
pub mod numeric;
pub mod renderer;
pub mod session;
mod slider;
pub mod track;
mod value;

pub use config::SliderConfig;
pub use events::{Dispatch, EventBus, Outcome, SliderEvent};
pub use session::DragSession;
pub use slider::{Slider, SliderId, SliderListener};
pub use value::{Handles, Value};
