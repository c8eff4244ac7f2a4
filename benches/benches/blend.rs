// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use understory_area::Area;
use understory_blend::{
    BlendDesc, Bpp, Color16, Color32, DrawBuffer, GlyphBitmap, OverCache, Pixel, blend,
    blend_over, blend_text,
};

const W: u32 = 320;
const H: u32 = 240;

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

    fn next_u8(&mut self) -> u8 {
        (self.next_u32() >> 24) as u8
    }
}

fn screen() -> Area {
    Area::new(0, 0, W as i32, H as i32)
}

fn noise_mask(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = Lcg::new(seed);
    (0..len).map(|_| rng.next_u8()).collect()
}

/// Mostly opaque or transparent, with antialiased edges.
fn edge_mask(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = Lcg::new(seed);
    (0..len)
        .map(|_| match rng.next_u32() % 8 {
            0 => rng.next_u8(),
            1..=3 => 0,
            _ => 255,
        })
        .collect()
}

fn bench_fill<P: Pixel>(c: &mut Criterion, name: &str, bg: P, fg: P) {
    let mut group = c.benchmark_group(format!("understory_blend/{name}"));
    group.sample_size(50);
    let len = (W * H) as usize;
    let mut pixels = vec![bg; len];
    let noise = noise_mask(len, 0xB1E4_0000_0000_0001);
    let edges = edge_mask(len, 0xB1E4_0000_0000_0002);

    for &opa in &[255_u8, 128] {
        group.bench_function(format!("fill(opa={opa})"), |b| {
            b.iter(|| {
                let mut buf = DrawBuffer::new(&mut pixels, screen());
                blend(&mut buf, &BlendDesc::fill(screen(), fg).with_opa(opa));
                black_box(buf.pixel(1, 1));
            });
        });
    }
    for (label, mask) in [("noise", &noise), ("edges", &edges)] {
        group.bench_function(format!("fill_masked({label})"), |b| {
            b.iter(|| {
                let mut buf = DrawBuffer::new(&mut pixels, screen());
                blend(&mut buf, &BlendDesc::fill(screen(), fg).with_mask(mask));
                black_box(buf.pixel(1, 1));
            });
        });
    }
    let src = vec![fg; len];
    group.bench_function("image(opa=200)", |b| {
        b.iter(|| {
            let mut buf = DrawBuffer::new(&mut pixels, screen());
            blend(&mut buf, &BlendDesc::image(screen(), &src).with_opa(200));
            black_box(buf.pixel(1, 1));
        });
    });
    group.finish();
}

fn bench_formats(c: &mut Criterion) {
    bench_fill(c, "argb8888", Color32::WHITE, Color32::RED);
    bench_fill(c, "rgb565", Color16::WHITE, Color16::RED);
}

fn bench_over(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_blend/over");
    group.sample_size(50);
    let len = (W * H) as usize;
    let mut pixels = vec![Color32::WHITE.with_alpha(96); len];
    let mask = edge_mask(len, 0x0BE2_0000_0000_0001);
    let fg = Color32::RED.with_alpha(160);

    group.bench_function("over_fill_masked", |b| {
        let mut cache = OverCache::new();
        b.iter(|| {
            let mut buf = DrawBuffer::new(&mut pixels, screen());
            blend_over(&mut buf, &BlendDesc::fill(screen(), fg).with_mask(&mask), &mut cache);
            black_box(cache.misses());
        });
    });
    group.finish();
}

fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_blend/text");
    group.sample_size(50);
    let mut pixels = vec![Color16::WHITE; (W * H) as usize];
    let (gw, gh) = (16_u16, 24_u16);

    for bpp in [Bpp::One, Bpp::Two, Bpp::Four] {
        let stride = understory_blend::bytes_per_row(gw, bpp);
        let data = noise_mask(stride * usize::from(gh), 0x7E47_0000_0000_0001);
        let glyph = GlyphBitmap::new(&data, bpp, gw, gh);
        group.bench_function(format!("glyph_row(bpp={})", bpp.bits()), |b| {
            b.iter(|| {
                let mut buf = DrawBuffer::new(&mut pixels, screen());
                for k in 0..(W as i32 / i32::from(gw)) {
                    let at = Area::new(k * i32::from(gw), 8, i32::from(gw), i32::from(gh));
                    blend_text(&mut buf, &BlendDesc::fill(at, Color16::BLACK), &glyph);
                }
                black_box(buf.pixel(1, 9));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_formats, bench_over, bench_text);
criterion_main!(benches);
