// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grayscale glyph bitmaps and the text blend path.

use understory_area::{OPA_COVER, OPA_MIN, OPA_TRANSP, Opa, scale_opa};

use crate::blend::{BlendDesc, DrawBuffer};
use crate::color::Pixel;

/// Bits per glyph sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bpp {
    /// Monochrome: each sample is on or off.
    One,
    /// Four gray levels.
    Two,
    /// Eight gray levels. Samples may straddle byte boundaries.
    Three,
    /// Sixteen gray levels.
    Four,
}

impl Bpp {
    /// Maps a bit depth to a variant.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    /// The bit depth.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Scales a raw sample to `0..=255`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "v <= 7, so v * 255 / 7 <= 255")]
    pub const fn normalize(self, v: u8) -> Opa {
        match self {
            Self::One => {
                if v == 0 {
                    OPA_TRANSP
                } else {
                    OPA_COVER
                }
            }
            Self::Two => (v & 0x3) * 85,
            Self::Three => ((v & 0x7) as u16 * 255 / 7) as u8,
            Self::Four => (v & 0xF) * 17,
        }
    }
}

/// Order in which samples are packed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScanOrder {
    /// One padded line per row, left to right.
    #[default]
    RowMajor,
    /// One padded line per column, top to bottom.
    ColumnMajor,
}

/// Bytes needed for `samples` samples of `bpp` bits, padded to a whole byte.
#[must_use]
pub const fn bytes_per_row(samples: u16, bpp: Bpp) -> usize {
    (samples as usize * bpp.bits() as usize).div_ceil(8)
}

/// An already decoded glyph bitmap.
///
/// Samples are packed most significant bit first. Each line (a row, or a
/// column for [`ScanOrder::ColumnMajor`]) starts on a byte boundary `stride`
/// bytes after the previous one.
#[derive(Clone, Copy, Debug)]
pub struct GlyphBitmap<'a> {
    /// Packed samples.
    pub data: &'a [u8],
    /// Bits per sample.
    pub bpp: Bpp,
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
    /// Bytes per packed line.
    pub stride: usize,
    /// Packing order.
    pub order: ScanOrder,
}

impl<'a> GlyphBitmap<'a> {
    /// A row-major bitmap with tightly padded rows.
    #[must_use]
    pub const fn new(data: &'a [u8], bpp: Bpp, width: u16, height: u16) -> Self {
        Self {
            data,
            bpp,
            width,
            height,
            stride: bytes_per_row(width, bpp),
            order: ScanOrder::RowMajor,
        }
    }

    /// A column-major bitmap with tightly padded columns.
    #[must_use]
    pub const fn column_major(data: &'a [u8], bpp: Bpp, width: u16, height: u16) -> Self {
        Self {
            data,
            bpp,
            width,
            height,
            stride: bytes_per_row(height, bpp),
            order: ScanOrder::ColumnMajor,
        }
    }

    /// The raw sample at `(x, y)`, or `0` outside the bitmap or past the end
    /// of `data`.
    #[must_use]
    pub fn raw(&self, x: u16, y: u16) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let (line, idx) = match self.order {
            ScanOrder::RowMajor => (y, x),
            ScanOrder::ColumnMajor => (x, y),
        };
        let bits = usize::from(self.bpp.bits());
        let bit = usize::from(line) * self.stride * 8 + usize::from(idx) * bits;
        let byte = bit / 8;
        let hi = self.data.get(byte).copied().unwrap_or(0);
        let lo = self.data.get(byte + 1).copied().unwrap_or(0);
        let word = u16::from_be_bytes([hi, lo]);
        let shift = 16 - (bit % 8) - bits;
        let v = (word >> shift) & ((1 << bits) - 1);
        u8::try_from(v).unwrap_or(0)
    }

    /// The sample at `(x, y)` scaled to `0..=255`.
    #[must_use]
    pub fn sample(&self, x: u16, y: u16) -> Opa {
        self.bpp.normalize(self.raw(x, y))
    }
}

/// Paints `glyph` with `desc.fill` into `buf`.
///
/// The glyph's top-left corner is `desc.area`'s origin and `desc.area`
/// bounds the painted cell together with `desc.clip`. Each sample is
/// normalized to `0..=255` and scaled by `desc.opa`. One-bit glyphs switch
/// pixels hard between the destination and the fill.
pub fn blend_text<P: Pixel>(
    buf: &mut DrawBuffer<'_, P>,
    desc: &BlendDesc<'_, P>,
    glyph: &GlyphBitmap<'_>,
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
    let color = desc.fill;
    let opa = desc.opa;

    for y in region.y..region.y2() {
        let Ok(gy) = u16::try_from(y - desc.area.y) else {
            continue;
        };
        if gy >= glyph.height {
            break;
        }
        let Some(dst) = buf.span_mut(region.x, y, w) else {
            continue;
        };
        for (px, x) in dst.iter_mut().zip(region.x..) {
            let Ok(gx) = u16::try_from(x - desc.area.x) else {
                continue;
            };
            if glyph.bpp == Bpp::One {
                if glyph.raw(gx, gy) != 0 {
                    *px = if opa == OPA_COVER {
                        color
                    } else {
                        color.mix(*px, opa)
                    };
                }
                continue;
            }
            let s = glyph.sample(gx, gy);
            let eff = if opa == OPA_COVER { s } else { scale_opa(opa, s) };
            match eff {
                OPA_TRANSP => {}
                OPA_COVER => *px = color,
                _ => *px = color.mix(*px, eff),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color16, Color32};
    use alloc::vec;
    use understory_area::Area;

    #[test]
    fn row_padding() {
        assert_eq!(bytes_per_row(8, Bpp::One), 1);
        assert_eq!(bytes_per_row(9, Bpp::One), 2);
        assert_eq!(bytes_per_row(5, Bpp::Three), 2);
        assert_eq!(bytes_per_row(3, Bpp::Four), 2);
        assert_eq!(bytes_per_row(0, Bpp::Two), 0);
    }

    #[test]
    fn normalization_tables() {
        let two: [u8; 4] = core::array::from_fn(|v| Bpp::Two.normalize(v as u8));
        assert_eq!(two, [0, 85, 170, 255]);
        let three: [u8; 8] = core::array::from_fn(|v| Bpp::Three.normalize(v as u8));
        assert_eq!(three, [0, 36, 72, 109, 145, 182, 218, 255]);
        assert_eq!(Bpp::Four.normalize(8), 136);
        assert_eq!(Bpp::Four.normalize(15), 255);
        assert_eq!(Bpp::One.normalize(1), 255);
        assert_eq!(Bpp::from_bits(3), Some(Bpp::Three));
        assert_eq!(Bpp::from_bits(8), None);
    }

    #[test]
    fn unpack_one_bit() {
        let data = [0b1010_0000, 0b0000_0001];
        let g = GlyphBitmap::new(&data, Bpp::One, 8, 2);
        let row0: [u8; 8] = core::array::from_fn(|x| g.raw(x as u16, 0));
        assert_eq!(row0, [1, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(g.raw(7, 1), 1);
        assert_eq!(g.raw(6, 1), 0);
        assert_eq!(g.raw(8, 0), 0);
    }

    #[test]
    fn unpack_two_and_four_bits() {
        let g = GlyphBitmap::new(&[0b00_01_10_11], Bpp::Two, 4, 1);
        let row: [u8; 4] = core::array::from_fn(|x| g.sample(x as u16, 0));
        assert_eq!(row, [0, 85, 170, 255]);

        let g = GlyphBitmap::new(&[0x0F, 0x80], Bpp::Four, 2, 2);
        assert_eq!(g.sample(0, 0), 0);
        assert_eq!(g.sample(1, 0), 255);
        assert_eq!(g.sample(0, 1), 136);
        assert_eq!(g.sample(1, 1), 0);
    }

    #[test]
    fn unpack_three_bits_across_bytes() {
        // 000 001 010 011 100 101 110 111
        let data = [0b0000_0101, 0b0011_1001, 0b0111_0111];
        let g = GlyphBitmap::new(&data, Bpp::Three, 8, 1);
        let raw: [u8; 8] = core::array::from_fn(|x| g.raw(x as u16, 0));
        assert_eq!(raw, [0, 1, 2, 3, 4, 5, 6, 7]);

        // Rows of 3 * 3 bits are padded to two bytes; the padding bits of
        // row 0 are set and must not leak into either row.
        let data = [0b1110_0000, 0b0111_1111, 0b1010_0011, 0b0000_0000];
        let g = GlyphBitmap::new(&data, Bpp::Three, 3, 2);
        assert_eq!(g.stride, 2);
        assert_eq!((g.raw(0, 0), g.raw(2, 0)), (7, 0));
        assert_eq!((g.raw(0, 1), g.raw(1, 1), g.raw(2, 1)), (5, 0, 6));
    }

    #[test]
    fn column_major_order() {
        // Two columns of three 2-bit samples each, one byte per column.
        let data = [0b11_00_01_00, 0b00_10_00_00];
        let g = GlyphBitmap::column_major(&data, Bpp::Two, 2, 3);
        assert_eq!(g.stride, 1);
        assert_eq!((g.raw(0, 0), g.raw(0, 1), g.raw(0, 2)), (3, 0, 1));
        assert_eq!((g.raw(1, 0), g.raw(1, 1), g.raw(1, 2)), (0, 2, 0));
    }

    #[test]
    fn truncated_data_reads_zero() {
        let g = GlyphBitmap::new(&[0xFF], Bpp::Four, 4, 4);
        assert_eq!(g.raw(1, 0), 15);
        assert_eq!(g.raw(3, 3), 0);
    }

    #[test]
    fn blends_gray_glyph() {
        let mut px = vec![Color32::WHITE; 4 * 2];
        let mut buf = DrawBuffer::new(&mut px, Area::new(0, 0, 4, 2));
        let glyph = GlyphBitmap::new(&[0b00_01_10_11, 0b11_11_11_11], Bpp::Two, 4, 2);
        let desc = BlendDesc::fill(Area::new(0, 0, 4, 2), Color32::BLACK);
        blend_text(&mut buf, &desc, &glyph);
        let p = buf.pixels();
        assert_eq!(p[0], Color32::WHITE);
        assert_eq!(p[1], Color32::BLACK.mix(Color32::WHITE, 85));
        assert_eq!(p[2], Color32::BLACK.mix(Color32::WHITE, 170));
        assert_eq!(p[3], Color32::BLACK);
        assert!(p[4..].iter().all(|&c| c == Color32::BLACK));
    }

    #[test]
    fn one_bit_glyph_is_hard_edged() {
        let mut px = vec![Color16::WHITE; 8];
        let mut buf = DrawBuffer::new(&mut px, Area::new(0, 0, 8, 1));
        let glyph = GlyphBitmap::new(&[0b1100_0011], Bpp::One, 8, 1);
        let desc = BlendDesc::fill(Area::new(0, 0, 8, 1), Color16::RED).with_opa(128);
        blend_text(&mut buf, &desc, &glyph);
        let half = Color16::RED.mix(Color16::WHITE, 128);
        assert_eq!(
            buf.pixels(),
            &[
                half,
                half,
                Color16::WHITE,
                Color16::WHITE,
                Color16::WHITE,
                Color16::WHITE,
                half,
                half
            ]
        );
    }

    #[test]
    fn glyph_is_clipped_and_offset() {
        let mut px = vec![Color32::WHITE; 6 * 3];
        let mut buf = DrawBuffer::new(&mut px, Area::new(0, 0, 6, 3));
        let glyph = GlyphBitmap::new(&[0xFF, 0xFF], Bpp::Four, 4, 1);
        // Placed at x = 2, clipped to columns 0..4.
        let desc = BlendDesc::fill(Area::new(2, 1, 4, 1), Color32::RED)
            .with_clip(Area::new(0, 0, 4, 3));
        blend_text(&mut buf, &desc, &glyph);
        for x in 0..6 {
            let expected = if (2..4).contains(&x) {
                Color32::RED
            } else {
                Color32::WHITE
            };
            assert_eq!(buf.pixel(x, 1), Some(expected), "column {x}");
        }
        assert_eq!(buf.pixel(2, 0), Some(Color32::WHITE));
        assert_eq!(buf.pixel(2, 2), Some(Color32::WHITE));
    }
}
