// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel formats and the per-channel mix primitive.

use core::fmt;

use understory_area::{Opa, udiv255};

/// A pixel format the blend loops can write.
///
/// Implementors provide the linear interpolation used by every compositing
/// path. [`fill_span`](Self::fill_span) is the solid-fill fast path and may be
/// specialized by formats that can store several pixels at once.
pub trait Pixel: Copy + PartialEq + Default + fmt::Debug {
    /// Interpolates from `bg` (at `opa == 0`) to `self` (at `opa == 255`).
    #[must_use]
    fn mix(self, bg: Self, opa: Opa) -> Self;

    /// Overwrites every pixel of `span` with `color`.
    fn fill_span(span: &mut [Self], color: Self) {
        span.fill(color);
    }

    /// Converts from 32-bit ARGB.
    #[must_use]
    fn from_color32(color: Color32) -> Self;

    /// Converts to 32-bit ARGB.
    #[must_use]
    fn to_color32(self) -> Color32;
}

/// Mixes `fg` over `bg` with weight `opa`.
///
/// `mix(fg, bg, 0) == bg` and `mix(fg, bg, 255) == fg` for every pixel format.
#[must_use]
#[inline]
pub fn mix<P: Pixel>(fg: P, bg: P, opa: Opa) -> P {
    fg.mix(bg, opa)
}

/// One channel of `c1 * m + c2 * (255 - m)`, divided by 255.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "the weighted sum of two channels divided by 255 never exceeds the larger channel"
)]
const fn mix_channel(c1: u8, c2: u8, m: Opa, round: u32) -> u8 {
    udiv255(c1 as u32 * m as u32 + c2 as u32 * (255 - m as u32) + round) as u8
}

/// A 32-bit ARGB8888 pixel.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color32 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color32 {
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb(0xFF, 0xFF, 0xFF);
    /// Opaque red.
    pub const RED: Self = Self::from_rgb(0xFF, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Creates a color from its four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Creates an opaque color from `0xRRGGBB`. The top byte is ignored.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "each channel is masked to 8 bits first"
    )]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Creates a color from an `0xAARRGGBB` word.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "each channel is masked to 8 bits first"
    )]
    pub const fn from_u32(argb: u32) -> Self {
        Self::new(
            ((argb >> 16) & 0xFF) as u8,
            ((argb >> 8) & 0xFF) as u8,
            (argb & 0xFF) as u8,
            (argb >> 24) as u8,
        )
    }

    /// Red channel.
    #[must_use]
    pub const fn r(self) -> u8 {
        self.r
    }

    /// Green channel.
    #[must_use]
    pub const fn g(self) -> u8 {
        self.g
    }

    /// Blue channel.
    #[must_use]
    pub const fn b(self) -> u8 {
        self.b
    }

    /// Alpha channel.
    #[must_use]
    pub const fn a(self) -> u8 {
        self.a
    }

    /// The same color with alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// The `0xAARRGGBB` word.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Perceived brightness in `0..=255`, weighting green the most.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "the weights sum to 8, so the shifted sum is at most 255"
    )]
    pub const fn brightness(self) -> u8 {
        ((self.r as u16 * 3 + self.b as u16 + self.g as u16 * 4) >> 3) as u8
    }
}

impl fmt::Debug for Color32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color32(#{:08x})", self.to_u32())
    }
}

impl Pixel for Color32 {
    #[inline]
    fn mix(self, bg: Self, opa: Opa) -> Self {
        Self {
            r: mix_channel(self.r, bg.r, opa, 0),
            g: mix_channel(self.g, bg.g, opa, 0),
            b: mix_channel(self.b, bg.b, opa, 0),
            a: mix_channel(self.a, bg.a, opa, 0),
        }
    }

    fn from_color32(color: Color32) -> Self {
        color
    }

    fn to_color32(self) -> Color32 {
        self
    }
}

impl From<peniko::Color> for Color32 {
    fn from(color: peniko::Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Color32> for peniko::Color {
    fn from(color: Color32) -> Self {
        Self::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A 16-bit RGB565 pixel.
///
/// There is no alpha channel; opacity always comes from the blend call.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color16(u16);

impl Color16 {
    /// Black.
    pub const BLACK: Self = Self(0);
    /// White.
    pub const WHITE: Self = Self(0xFFFF);
    /// Red.
    pub const RED: Self = Self(0xF800);

    /// Creates a color from 8-bit channels, dropping the low bits.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_channels(r >> 3, g >> 2, b >> 3)
    }

    /// Wraps a raw `RRRRRGGGGGGBBBBB` word.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// The raw `RRRRRGGGGGGBBBBB` word.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    const fn from_channels(r5: u8, g6: u8, b5: u8) -> Self {
        Self(((r5 as u16 & 0x1F) << 11) | ((g6 as u16 & 0x3F) << 5) | (b5 as u16 & 0x1F))
    }

    /// The 5-bit red channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "five bits")]
    pub const fn r5(self) -> u8 {
        (self.0 >> 11) as u8
    }

    /// The 6-bit green channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "six bits")]
    pub const fn g6(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    /// The 5-bit blue channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "five bits")]
    pub const fn b5(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    /// Expands to an opaque 32-bit color, mapping full channels to `255`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "(31 * 263 + 7) >> 5 and (63 * 259 + 3) >> 6 are both 255"
    )]
    pub const fn to_color32(self) -> Color32 {
        let r = (self.r5() as u16 * 263 + 7) >> 5;
        let g = (self.g6() as u16 * 259 + 3) >> 6;
        let b = (self.b5() as u16 * 263 + 7) >> 5;
        Color32::from_rgb(r as u8, g as u8, b as u8)
    }

    /// Perceived brightness in `0..=255`.
    #[must_use]
    pub const fn brightness(self) -> u8 {
        self.to_color32().brightness()
    }
}

impl fmt::Debug for Color16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color16({:#06x})", self.0)
    }
}

impl Pixel for Color16 {
    #[inline]
    fn mix(self, bg: Self, opa: Opa) -> Self {
        Self::from_channels(
            mix_channel(self.r5(), bg.r5(), opa, 128),
            mix_channel(self.g6(), bg.g6(), opa, 128),
            mix_channel(self.b5(), bg.b5(), opa, 128),
        )
    }

    fn from_color32(color: Color32) -> Self {
        Self::from_rgb(color.r, color.g, color.b)
    }

    fn to_color32(self) -> Color32 {
        Self::to_color32(self)
    }
}
