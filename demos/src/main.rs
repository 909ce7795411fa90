// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Balanced budget.
//!
//! Split a budget of 100 over four categories with a [`Balancer`]. Moving one
//! category takes from or gives to the others, first with the least recently
//! used algorithm and then with the fair one.
//!
//! Run:
//! - `RUST_LOG=understory_balance=debug cargo run -p understory_demos`

use understory_balance::{BalanceEvent, Balancer, BalancerConfig, ConfigError};
use understory_slider::{Slider, SliderConfig};

const CATEGORIES: [&str; 4] = ["rent", "food", "travel", "savings"];

fn print_budget(label: &str, sliders: &[Slider]) {
    let parts: Vec<String> = CATEGORIES
        .iter()
        .zip(sliders)
        .map(|(name, slider)| format!("{name}={}", slider.value()))
        .collect();
    println!("{label:<28} {}", parts.join(" "));
}

fn budget(algorithm: &str) -> Result<(Balancer, Vec<Slider>), ConfigError> {
    let balancer = Balancer::new(BalancerConfig::default().with_algorithm(algorithm))?;
    let sliders: Vec<Slider> = [40.0, 30.0, 20.0, 10.0]
        .into_iter()
        .map(|value| Slider::new(SliderConfig::default().with_value(value)))
        .collect();
    for slider in &sliders {
        balancer.add(slider);
    }
    balancer.on(BalanceEvent::Abort, |balancer: &Balancer| {
        println!("  move refused, group sum stays {}", balancer.sum());
    });
    Ok((balancer, sliders))
}

fn main() -> Result<(), ConfigError> {
    env_logger::init();

    for algorithm in ["least_recently_used", "fair"] {
        println!("== {algorithm}");
        let (balancer, sliders) = budget(algorithm)?;
        print_budget("start", &sliders);

        sliders[0].set_value(55.0, false, false);
        print_budget("rent -> 55", &sliders);

        sliders[3].set_value(25.0, false, false);
        print_budget("savings -> 25", &sliders);

        sliders[1].set_value(0.0, false, false);
        print_budget("food -> 0", &sliders);

        // Travel is fixed for now; it no longer gives or takes.
        sliders[2].disable();
        sliders[0].set_value(100.0, false, false);
        print_budget("rent -> 100 (travel fixed)", &sliders);

        println!("sum = {}\n", balancer.sum());
    }

    match Balancer::new(BalancerConfig::default().with_algorithm("random")) {
        Ok(_) => println!("unexpected algorithm accepted"),
        Err(err) => println!("config error: {err}"),
    }
    Ok(())
}
