// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use understory_balance::{Balancer, BalancerConfig};
use understory_slider::{Slider, SliderConfig};

/// A group of `len` sliders on 0..=1000 whose values sum to 1000, with the
/// first member at zero.
fn group(algorithm: &str, len: usize) -> (Balancer, Vec<Slider>) {
    let config = BalancerConfig::default()
        .with_target(1000.0)
        .with_algorithm(algorithm);
    let balancer = Balancer::new(config).expect("known algorithm");
    let share = (1000.0 / (len - 1) as f64).floor();
    let remainder = 1000.0 - share * (len - 1) as f64;
    let sliders: Vec<Slider> = (0..len)
        .map(|i| {
            let value = match i {
                0 => 0.0,
                i if i == len - 1 => share + remainder,
                _ => share,
            };
            Slider::new(
                SliderConfig::default()
                    .with_range([0.0, 1000.0])
                    .with_value(value),
            )
        })
        .collect();
    for slider in &sliders {
        balancer.add(slider);
    }
    (balancer, sliders)
}

fn bench_commit(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("balance/commit");

    for algorithm in ["least_recently_used", "fair"] {
        for len in [3_usize, 8, 32, 128] {
            group_bench.throughput(Throughput::Elements(len as u64));
            group_bench.bench_with_input(BenchmarkId::new(algorithm, len), &len, |b, &len| {
                b.iter_batched(
                    || group(algorithm, len),
                    |(balancer, sliders)| {
                        sliders[0].set_value(500.0, false, false);
                        black_box(balancer.sum());
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group_bench.finish();
}

fn bench_drag(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("balance/drag");

    // One interaction made of many tentative steps, as a pointer drag would.
    for algorithm in ["least_recently_used", "fair"] {
        for len in [8_usize, 32] {
            group_bench.bench_with_input(BenchmarkId::new(algorithm, len), &len, |b, &len| {
                b.iter_batched(
                    || group(algorithm, len),
                    |(balancer, sliders)| {
                        let master = &sliders[0];
                        if master.will_change() {
                            for step in 1..=100 {
                                master.set_tentative_value(f64::from(step) * 5.0, false, false);
                            }
                            master.has_changed();
                        }
                        black_box(balancer.sum());
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group_bench.finish();
}

fn bench_infeasible(c: &mut Criterion) {
    let mut group_bench = c.benchmark_group("balance/infeasible");

    // Subordinates pinned at their maximum: every attempt rolls back.
    for algorithm in ["least_recently_used", "fair"] {
        group_bench.bench_function(algorithm, |b| {
            b.iter_batched(
                || {
                    let config = BalancerConfig::default().with_algorithm(algorithm);
                    let balancer = Balancer::new(config).expect("known algorithm");
                    let master = Slider::new(SliderConfig::default().with_value(40.0));
                    let pinned: Vec<Slider> = (0..6)
                        .map(|_| {
                            Slider::new(
                                SliderConfig::default()
                                    .with_range([0.0, 10.0])
                                    .with_value(10.0),
                            )
                        })
                        .collect();
                    balancer.add(&master);
                    for slider in &pinned {
                        balancer.add(slider);
                    }
                    (balancer, master, pinned)
                },
                |(balancer, master, _pinned)| {
                    black_box(master.set_value(0.0, false, false));
                    black_box(balancer.sum());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group_bench.finish();
}

criterion_group!(benches, bench_commit, bench_drag, bench_infeasible);
criterion_main!(benches);
