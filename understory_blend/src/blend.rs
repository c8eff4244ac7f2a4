// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle compositing into a draw buffer.

use understory_area::{Area, OPA_COVER, OPA_MIN, OPA_TRANSP, Opa, scale_opa};

use crate::color::{Color32, Pixel};
use crate::over::OverCache;

/// A caller-owned pixel buffer covering `area` of the screen.
///
/// Rows are `area.w` pixels wide and stored top to bottom. Pixels outside
/// the slice (if it is shorter than the area) are never written.
#[derive(Debug)]
pub struct DrawBuffer<'a, P> {
    pixels: &'a mut [P],
    area: Area,
}

impl<'a, P: Pixel> DrawBuffer<'a, P> {
    /// Wraps `pixels` as the screen region `area`.
    pub fn new(pixels: &'a mut [P], area: Area) -> Self {
        Self { pixels, area }
    }

    /// The screen region covered by the buffer.
    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }

    /// All pixels, row by row.
    #[must_use]
    pub fn pixels(&self) -> &[P] {
        self.pixels
    }

    /// All pixels, row by row.
    pub fn pixels_mut(&mut self) -> &mut [P] {
        self.pixels
    }

    /// The pixel at screen position `(x, y)`, if the buffer holds it.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<P> {
        let i = self.index(x, y)?;
        self.pixels.get(i).copied()
    }

    /// Fills the whole buffer with `color`.
    pub fn clear(&mut self, color: P) {
        P::fill_span(self.pixels, color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.area.contains_point(x, y) {
            return None;
        }
        let row = usize::try_from(y - self.area.y).ok()?;
        let col = usize::try_from(x - self.area.x).ok()?;
        let w = usize::try_from(self.area.w).ok()?;
        Some(row * w + col)
    }

    /// The `len` pixels starting at screen position `(x, y)`, clamped to the
    /// slice.
    pub(crate) fn span_mut(&mut self, x: i32, y: i32, len: usize) -> Option<&mut [P]> {
        let start = self.index(x, y)?;
        let end = start.saturating_add(len).min(self.pixels.len());
        self.pixels.get_mut(start..end)
    }
}

/// One compositing request.
///
/// `area` is where the content lands in screen coordinates. An optional
/// `source` image and `mask` are laid out row by row with `area.w` entries
/// per row. Without a source, `fill` is painted.
#[derive(Clone, Copy, Debug)]
pub struct BlendDesc<'a, P> {
    /// Destination rectangle in screen coordinates.
    pub area: Area,
    /// Source pixels, `area.w` per row.
    pub source: Option<&'a [P]>,
    /// Per-pixel coverage, `area.w` per row.
    pub mask: Option<&'a [Opa]>,
    /// Color painted when there is no source.
    pub fill: P,
    /// Overall opacity.
    pub opa: Opa,
    /// Further clip, such as a parent bound or a text-limit box.
    pub clip: Option<Area>,
}

impl<'a, P: Pixel> BlendDesc<'a, P> {
    /// An opaque solid fill of `area`.
    #[must_use]
    pub fn fill(area: Area, color: P) -> Self {
        Self {
            area,
            source: None,
            mask: None,
            fill: color,
            opa: OPA_COVER,
            clip: None,
        }
    }

    /// An opaque copy of `source` into `area`.
    #[must_use]
    pub fn image(area: Area, source: &'a [P]) -> Self {
        Self {
            source: Some(source),
            ..Self::fill(area, P::default())
        }
    }

    /// Sets the overall opacity.
    #[must_use]
    pub fn with_opa(mut self, opa: Opa) -> Self {
        self.opa = opa;
        self
    }

    /// Sets the per-pixel coverage.
    #[must_use]
    pub fn with_mask(mut self, mask: &'a [Opa]) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Sets the extra clip rectangle.
    #[must_use]
    pub fn with_clip(mut self, clip: Area) -> Self {
        self.clip = Some(clip);
        self
    }

    /// The screen region actually written when blending into `buf_area`.
    #[must_use]
    pub fn visible_area(&self, buf_area: &Area) -> Option<Area> {
        let area = self.area.intersect(buf_area)?;
        match &self.clip {
            Some(clip) => area.intersect(clip),
            None => Some(area),
        }
    }

    /// Index into `source`/`mask` of screen position `(x, y)`, which must lie
    /// inside `area`.
    pub(crate) fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let row = usize::try_from(y - self.area.y).ok()?;
        let col = usize::try_from(x - self.area.x).ok()?;
        Some(row * usize::try_from(self.area.w).ok()? + col)
    }
}

/// Where the foreground of a row comes from.
#[derive(Clone, Copy)]
enum Fg<'a, P> {
    Fill(P),
    Image(&'a [P]),
}

impl<P: Pixel> Fg<'_, P> {
    #[inline]
    fn at(&self, i: usize) -> P {
        match self {
            Self::Fill(c) => *c,
            Self::Image(s) => s.get(i).copied().unwrap_or_default(),
        }
    }
}

/// Remembers the last `(fg, bg, opa)` mix so runs of identical pixels skip
/// the arithmetic.
struct MixMemo<P> {
    key: Option<(P, P, Opa)>,
    res: P,
}

impl<P: Pixel> MixMemo<P> {
    fn new() -> Self {
        Self {
            key: None,
            res: P::default(),
        }
    }

    #[inline]
    fn mix(&mut self, fg: P, bg: P, opa: Opa) -> P {
        if self.key != Some((fg, bg, opa)) {
            self.key = Some((fg, bg, opa));
            self.res = fg.mix(bg, opa);
        }
        self.res
    }
}

/// Composites `desc` into `buf`.
///
/// The written region is the intersection of `desc.area`, the buffer's area
/// and `desc.clip`. Opacities at or below [`OPA_MIN`] draw nothing.
///
/// Without a mask, opacity [`OPA_COVER`] copies the source (or fills) and
/// anything lower mixes every pixel. With a mask, each pixel's effective
/// opacity is the mask value (scaled by `opa` unless `opa` is
/// [`OPA_COVER`]); fully covered pixels are copied, uncovered pixels are
/// skipped and the rest are mixed.
pub fn blend<P: Pixel>(buf: &mut DrawBuffer<'_, P>, desc: &BlendDesc<'_, P>) {
    if desc.opa <= OPA_MIN {
        return;
    }
    let Some(region) = desc.visible_area(&buf.area()) else {
        return;
    };
    let Ok(w) = usize::try_from(region.w) else {
        return;
    };
    let mut memo = MixMemo::new();

    for y in region.y..region.y2() {
        let Some(dst) = buf.span_mut(region.x, y, w) else {
            continue;
        };
        let Some(src_off) = desc.offset(region.x, y) else {
            continue;
        };
        let fg = match desc.source {
            Some(s) => Fg::Image(s.get(src_off..).unwrap_or(&[])),
            None => Fg::Fill(desc.fill),
        };
        match desc.mask {
            None => blend_row(dst, fg, desc.opa, &mut memo),
            Some(mask) => {
                let mask = mask.get(src_off..).unwrap_or(&[]);
                blend_row_masked(dst, fg, mask, desc.opa, &mut memo);
            }
        }
    }
}

fn blend_row<P: Pixel>(dst: &mut [P], fg: Fg<'_, P>, opa: Opa, memo: &mut MixMemo<P>) {
    match (fg, opa) {
        (Fg::Fill(c), OPA_COVER) => P::fill_span(dst, c),
        (Fg::Image(s), OPA_COVER) => {
            let n = dst.len().min(s.len());
            dst[..n].copy_from_slice(&s[..n]);
        }
        _ => {
            for (i, px) in dst.iter_mut().enumerate() {
                *px = memo.mix(fg.at(i), *px, opa);
            }
        }
    }
}

fn blend_row_masked<P: Pixel>(
    dst: &mut [P],
    fg: Fg<'_, P>,
    mask: &[Opa],
    opa: Opa,
    memo: &mut MixMemo<P>,
) {
    for (i, (px, &m)) in dst.iter_mut().zip(mask).enumerate() {
        let eff = if opa == OPA_COVER { m } else { scale_opa(opa, m) };
        match eff {
            OPA_TRANSP => {}
            OPA_COVER => *px = fg.at(i),
            _ => *px = memo.mix(fg.at(i), *px, eff),
        }
    }
}

/// Composites a translucent ARGB image over a translucent ARGB buffer.
///
/// Unlike [`blend`], which treats the destination as opaque, this keeps the
/// destination's alpha channel meaningful: every pixel is combined with the
/// [`over`](crate::over()) operator, using the source alpha scaled by the mask
/// and `desc.opa` as foreground opacity. Results are memoized in `cache`.
pub fn blend_over(
    buf: &mut DrawBuffer<'_, Color32>,
    desc: &BlendDesc<'_, Color32>,
    cache: &mut OverCache<Color32>,
) {
    if desc.opa <= OPA_MIN {
        return;
    }
    let Some(region) = desc.visible_area(&buf.area()) else {
        return;
    };
    let Ok(w) = usize::try_from(region.w) else {
        return;
    };

    for y in region.y..region.y2() {
        let Some(dst) = buf.span_mut(region.x, y, w) else {
            continue;
        };
        let Some(src_off) = desc.offset(region.x, y) else {
            continue;
        };
        let fg = match desc.source {
            Some(s) => Fg::Image(s.get(src_off..).unwrap_or(&[])),
            None => Fg::Fill(desc.fill),
        };
        let mask = desc.mask.map(|m| m.get(src_off..).unwrap_or(&[]));
        for (i, px) in dst.iter_mut().enumerate() {
            let coverage = match mask {
                Some(m) => m.get(i).copied().unwrap_or(OPA_TRANSP),
                None => OPA_COVER,
            };
            let src = fg.at(i);
            let fg_opa = scale_opa(scale_opa(src.a(), desc.opa), coverage);
            let (color, res_opa) = cache.over(src, fg_opa, *px, px.a());
            *px = color.with_alpha(res_opa);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color16;
    use alloc::vec;
    use alloc::vec::Vec;

    fn screen<P: Pixel>(w: i32, h: i32, color: P) -> (Vec<P>, Area) {
        (vec![color; (w * h) as usize], Area::new(0, 0, w, h))
    }

    #[test]
    fn opaque_fill_stays_inside_its_area() {
        let (mut px, area) = screen(64, 64, Color32::WHITE);
        let mut buf = DrawBuffer::new(&mut px, area);
        let target = Area::new(16, 16, 32, 32);
        blend(&mut buf, &BlendDesc::fill(target, Color32::RED));
        for y in 0..64 {
            for x in 0..64 {
                let expected = if target.contains_point(x, y) {
                    Color32::RED
                } else {
                    Color32::WHITE
                };
                assert_eq!(buf.pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
    }

    #[test]
    fn half_opaque_fill_uses_fixed_point_mix() {
        let (mut px, area) = screen(64, 64, Color32::WHITE);
        let mut buf = DrawBuffer::new(&mut px, area);
        let target = Area::new(16, 16, 32, 32);
        blend(&mut buf, &BlendDesc::fill(target, Color32::RED).with_opa(128));
        let mixed = Color32::new(255, 127, 127, 255);
        assert_eq!(mixed, Color32::RED.mix(Color32::WHITE, 128));
        assert_eq!(buf.pixel(16, 16), Some(mixed));
        assert_eq!(buf.pixel(47, 47), Some(mixed));
        assert_eq!(buf.pixel(15, 16), Some(Color32::WHITE));
        assert_eq!(buf.pixel(48, 47), Some(Color32::WHITE));
    }

    #[test]
    fn opaque_blend_onto_itself_is_identity() {
        let src: Vec<Color32> = (0..256_u32)
            .map(|i| Color32::new(i as u8, (i * 7) as u8, (i * 13) as u8, 255))
            .collect();
        let mut px = src.clone();
        let area = Area::new(0, 0, 16, 16);
        let mut buf = DrawBuffer::new(&mut px, area);
        blend(&mut buf, &BlendDesc::image(area, &src));
        assert_eq!(buf.pixels(), &src[..]);

        let mask = [255_u8; 256];
        blend(&mut buf, &BlendDesc::image(area, &src).with_mask(&mask));
        assert_eq!(buf.pixels(), &src[..]);
    }

    #[test]
    fn low_opacity_draws_nothing() {
        let (mut px, area) = screen(4, 4, Color16::WHITE);
        let mut buf = DrawBuffer::new(&mut px, area);
        for opa in 0..=OPA_MIN {
            blend(&mut buf, &BlendDesc::fill(area, Color16::RED).with_opa(opa));
        }
        assert!(buf.pixels().iter().all(|&p| p == Color16::WHITE));
    }

    #[test]
    fn opacity_254_is_not_255() {
        let (mut a, area) = screen(1, 1, Color32::WHITE);
        let (mut b, _) = screen(1, 1, Color32::WHITE);
        let fill = Color32::from_hex(0x204080);
        blend(
            &mut DrawBuffer::new(&mut a, area),
            &BlendDesc::fill(area, fill).with_opa(254),
        );
        blend(
            &mut DrawBuffer::new(&mut b, area),
            &BlendDesc::fill(area, fill),
        );
        assert_ne!(a, b);
        assert_eq!(b[0], fill);
    }

    #[test]
    fn mask_selects_copy_skip_or_mix() {
        let (mut px, area) = screen(4, 1, Color32::WHITE);
        let mut buf = DrawBuffer::new(&mut px, area);
        let mask = [0, 255, 128, 1];
        blend(&mut buf, &BlendDesc::fill(area, Color32::RED).with_mask(&mask));
        assert_eq!(
            buf.pixels(),
            &[
                Color32::WHITE,
                Color32::RED,
                Color32::RED.mix(Color32::WHITE, 128),
                Color32::RED.mix(Color32::WHITE, 1),
            ]
        );
    }

    #[test]
    fn mask_is_scaled_by_overall_opacity() {
        let (mut px, area) = screen(2, 1, Color16::BLACK);
        let mut buf = DrawBuffer::new(&mut px, area);
        let mask = [255, 128];
        blend(
            &mut buf,
            &BlendDesc::fill(area, Color16::WHITE)
                .with_mask(&mask)
                .with_opa(128),
        );
        // 255 scaled by 128 is 128, 128 scaled by 128 is 64.
        assert_eq!(buf.pixels()[0], Color16::WHITE.mix(Color16::BLACK, 128));
        assert_eq!(buf.pixels()[1], Color16::WHITE.mix(Color16::BLACK, 64));
    }

    #[test]
    fn partially_visible_image_keeps_source_stride() {
        // A 4x2 image at (-2, 1) on a 4x4 screen: only its right half lands.
        let src: Vec<Color32> = (0..8_u8).map(|i| Color32::from_rgb(i, 0, 0)).collect();
        let (mut px, area) = screen(4, 4, Color32::BLACK);
        let mut buf = DrawBuffer::new(&mut px, area);
        blend(&mut buf, &BlendDesc::image(Area::new(-2, 1, 4, 2), &src));
        assert_eq!(buf.pixel(0, 1), Some(Color32::from_rgb(2, 0, 0)));
        assert_eq!(buf.pixel(1, 1), Some(Color32::from_rgb(3, 0, 0)));
        assert_eq!(buf.pixel(0, 2), Some(Color32::from_rgb(6, 0, 0)));
        assert_eq!(buf.pixel(1, 2), Some(Color32::from_rgb(7, 0, 0)));
        assert_eq!(buf.pixel(2, 1), Some(Color32::BLACK));
    }

    #[test]
    fn buffer_offset_and_clip() {
        // The buffer holds screen rows 10..12 of a band.
        let mut px = vec![Color16::BLACK; 8 * 2];
        let mut buf = DrawBuffer::new(&mut px, Area::new(0, 10, 8, 2));
        let desc = BlendDesc::fill(Area::new(0, 0, 8, 100), Color16::WHITE)
            .with_clip(Area::new(2, 0, 3, 100));
        blend(&mut buf, &desc);
        for y in 10..12 {
            for x in 0..8 {
                let expected = if (2..5).contains(&x) {
                    Color16::WHITE
                } else {
                    Color16::BLACK
                };
                assert_eq!(buf.pixel(x, y), Some(expected), "({x}, {y})");
            }
        }
        assert_eq!(buf.pixel(0, 9), None);
    }

    #[test]
    fn short_slices_never_panic() {
        let mut px = vec![Color32::WHITE; 5];
        let mut buf = DrawBuffer::new(&mut px, Area::new(0, 0, 4, 4));
        let src = [Color32::RED; 3];
        let mask = [200_u8; 2];
        blend(&mut buf, &BlendDesc::image(Area::new(0, 0, 4, 4), &src).with_mask(&mask));
        blend(&mut buf, &BlendDesc::fill(Area::new(-3, -3, 20, 20), Color32::RED).with_opa(77));
        assert_eq!(buf.pixels().len(), 5);
    }

    #[test]
    fn over_keeps_destination_alpha() {
        let area = Area::new(0, 0, 2, 1);
        let mut px = vec![Color32::WHITE.with_alpha(128), Color32::TRANSPARENT];
        let mut buf = DrawBuffer::new(&mut px, area);
        let src = [Color32::RED.with_alpha(128); 2];
        let mut cache = OverCache::new();
        blend_over(&mut buf, &BlendDesc::image(area, &src), &mut cache);
        let expected = Color32::RED.mix(Color32::WHITE.with_alpha(128), 170);
        assert_eq!(buf.pixels()[0], expected.with_alpha(192));
        // Over a transparent pixel the source wins as is.
        assert_eq!(buf.pixels()[1], Color32::RED.with_alpha(128));
    }
}
