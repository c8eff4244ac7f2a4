// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_area::Area;
use understory_refresh::{DirtyQueue, Display, RefreshConfig};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range_i32(&mut self, upper_exclusive: i32) -> i32 {
        (self.next_u32() % upper_exclusive.max(1) as u32) as i32
    }
}

/// Widget-sized rectangles scattered over an 800x480 screen.
fn random_areas(n: usize, seed: u64) -> Vec<Area> {
    let mut rng = Lcg::new(seed);
    (0..n)
        .map(|_| {
            let w = 8 + rng.gen_range_i32(120);
            let h = 8 + rng.gen_range_i32(60);
            Area::new(rng.gen_range_i32(800 - w), rng.gen_range_i32(480 - h), w, h)
        })
        .collect()
}

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_refresh/queue");
    group.sample_size(50);

    for &n in &[16_usize, 256, 4_096] {
        let areas = random_areas(n, 0x2EF2_0000_0000_0001);
        group.bench_function(format!("invalidate(n={n})"), |b| {
            b.iter_batched(
                DirtyQueue::<32>::new,
                |mut queue| {
                    for &a in &areas {
                        let _ = queue.invalidate(a);
                    }
                    black_box(queue.len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_refresh/display");
    group.sample_size(50);
    let areas = random_areas(64, 0x2EF2_0000_0000_0002);

    for &lines in &[480_u32, 40] {
        let config = RefreshConfig::new(800, 480)
            .with_align(4, 2)
            .with_flush_lines(lines);
        group.bench_function(format!("drain(flush_lines={lines})"), |b| {
            b.iter_batched(
                || {
                    let mut display: Display = Display::new(config);
                    for &a in &areas {
                        let _ = display.invalidate(a);
                    }
                    display
                },
                |mut display| {
                    let mut pixels = 0_usize;
                    while display.has_pending() {
                        display.refresh_tick(&mut |band: Area| pixels += band.pixel_count());
                    }
                    black_box(pixels)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_queue, bench_ticks);
criterion_main!(benches);
