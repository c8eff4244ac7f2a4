// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use understory_area::{Area, Point};
use understory_mask::{
    ActiveMaskList, AngleMask, CircleCache, CircleProfile, LineMask, LineSide, Mask, RadiusMask,
};

const W: usize = 320;
const H: i32 = 240;

fn sweep(mask: &Mask, row: &mut [u8]) -> u32 {
    let mut hits = 0;
    for y in 0..H {
        row.fill(255);
        let _ = mask.query(row, 0, y);
        hits += u32::from(row[W / 2]);
    }
    hits
}

fn bench_profiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_mask/profile");
    group.sample_size(50);
    for &radius in &[4_u16, 16, 64] {
        group.bench_function(format!("build(r={radius})"), |b| {
            b.iter(|| black_box(CircleProfile::build(black_box(radius))));
        });
    }
    group.bench_function("cache_acquire_hot", |b| {
        let mut cache = CircleCache::new();
        let _keep = cache.acquire(16);
        b.iter(|| black_box(cache.acquire(16)));
    });
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_mask/query");
    group.sample_size(50);
    let mut cache = CircleCache::new();
    let mut row = vec![0_u8; W];
    let card = Area::new(10, 10, 300, 220);

    let masks: [(&str, Mask); 4] = [
        ("radius", RadiusMask::new(card, 24, false, &mut cache).into()),
        ("radius_outer", RadiusMask::new(card, 24, true, &mut cache).into()),
        (
            "line_diagonal",
            LineMask::from_points(Point::new(0, 0), Point::new(300, 200), LineSide::Left).into(),
        ),
        ("angle", AngleMask::new(Point::new(160, 120), 30, 200).into()),
    ];
    for (name, mask) in &masks {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(sweep(mask, &mut row)));
        });
    }

    group.bench_function("active_list(3)", |b| {
        let mut list = ActiveMaskList::new();
        for (_, mask) in masks.iter().take(3) {
            let _ = list.add(mask.clone());
        }
        b.iter(|| {
            let mut hits = 0_u32;
            for y in 0..H {
                row.fill(255);
                let _ = list.query(&mut row, 0, y);
                hits += u32::from(row[W / 2]);
            }
            black_box(hits)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_profiles, bench_queries);
criterion_main!(benches);
