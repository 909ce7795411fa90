// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slider basics.
//!
//! Drive a single slider through a text renderer: keyboard-style stepping, a
//! pointer drag that commits and one that is vetoed by a listener.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example slider_basics`

use kurbo::Point;
use understory_slider::renderer::{RenderState, Renderer};
use understory_slider::track::Track;
use understory_slider::{Outcome, Slider, SliderConfig, SliderEvent, Value};

const WIDTH: usize = 40;

/// Draws the slider as a row of characters on stdout.
struct TextRenderer {
    track: Track,
    extent: [f64; 2],
}

impl TextRenderer {
    fn draw(&self, value: &Value, note: &str) {
        let mut row = vec!['-'; WIDTH + 1];
        for handle in value.as_slice() {
            let fraction = (handle - self.extent[0]) / (self.extent[1] - self.extent[0]);
            let cell = (fraction.clamp(0.0, 1.0) * WIDTH as f64).round() as usize;
            row[cell] = 'O';
        }
        let row: String = row.into_iter().collect();
        println!("[{row}] {value:>6} {note}");
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, state: &RenderState<'_>) {
        self.extent = state.extent;
        self.draw(state.value, "render");
    }

    fn on_redraw(&mut self, value: &Value, animate: bool) {
        self.draw(value, if animate { "redraw (animated)" } else { "redraw" });
    }

    fn on_handle_toggle(&mut self, index: usize, active: bool) {
        let state = if active { "grabbed" } else { "released" };
        println!("  handle {index} {state}");
    }

    fn on_enabled_changed(&mut self, enabled: bool) {
        println!("  {}", if enabled { "enabled" } else { "disabled" });
    }

    fn track(&self) -> Track {
        self.track
    }
}

fn main() {
    env_logger::init();

    let renderer = TextRenderer {
        track: Track::horizontal(0.0, 400.0),
        extent: [0.0, 100.0],
    };
    let slider = Slider::with_renderer(
        SliderConfig::default()
            .with_step(5.0)
            .with_value(20.0)
            .on_change(|value, slider| println!("  {} committed {value}", slider.id())),
        renderer,
    );

    println!("step up twice, then down once");
    slider.step_up(2);
    slider.step_down(1);

    println!("drag from 100px to 260px");
    if let Some(mut session) = slider.begin_drag(Point::new(100.0, 8.0)) {
        session.update(Point::new(180.0, 8.0));
        session.update(Point::new(260.0, 8.0));
        session.finish();
    }

    println!("refuse drags past 70");
    slider.on(SliderEvent::Drag, |value: &Value, _: &Slider| {
        Outcome::from(value.as_single().is_some_and(|v| v <= 70.0))
    });
    if let Some(mut session) = slider.begin_drag(Point::new(260.0, 8.0)) {
        session.update(Point::new(270.0, 8.0));
        session.update(Point::new(360.0, 8.0));
        session.finish();
    }
    println!("final value: {}", slider.value());

    slider.disable();
    println!("disabled slider ignores stepping: {}", slider.step_up(1));
}
