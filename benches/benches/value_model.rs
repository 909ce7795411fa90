// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_slider::model::ValueModel;
use understory_slider::{Slider, SliderConfig, Value};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_f64(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        f64::from((self.0 >> 32) as u32) / f64::from(u32::MAX)
    }
}

fn candidates(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..len).map(|_| rng.next_f64() * 140.0 - 20.0).collect()
}

fn bench_sanitize(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_model/sanitize");
    let inputs = candidates(1_024, 7);

    let stepped = ValueModel::new([0.0, 100.0], 0.25, None, None);
    group.bench_function("step", |b| {
        b.iter(|| {
            for &value in &inputs {
                black_box(stepped.sanitize(value));
            }
        });
    });

    let only: Vec<f64> = (0..64).map(|i| f64::from(i) * 1.5).collect();
    let restricted = ValueModel::new([0.0, 100.0], 1.0, Some(only), None);
    group.bench_function("only", |b| {
        b.iter(|| {
            for &value in &inputs {
                black_box(restricted.sanitize(value));
            }
        });
    });

    group.finish();
}

fn bench_set_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_model/set_value");
    let inputs = candidates(256, 11);

    group.bench_function("model_range", |b| {
        b.iter_batched(
            || ValueModel::new([0.0, 100.0], 1.0, None, Some(Value::from([20.0, 80.0]))),
            |mut model| {
                for pair in inputs.chunks_exact(2) {
                    black_box(model.set_value(Value::from([pair[0], pair[1]])));
                }
            },
            BatchSize::SmallInput,
        );
    });

    // Full lifecycle: begin, drag and commit with listeners attached.
    group.bench_function("slider_lifecycle", |b| {
        b.iter_batched(
            || {
                Slider::new(
                    SliderConfig::default()
                        .with_step(0.5)
                        .on_drag(|_, _| true)
                        .on_change(|_, _| true),
                )
            },
            |slider| {
                for &value in &inputs {
                    black_box(slider.set_value(value, false, false));
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_sanitize, bench_set_value);
criterion_main!(benches);
