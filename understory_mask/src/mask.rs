// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mask enum, query results, and span helpers shared by all mask shapes.

use understory_area::Opa;

use crate::angle::AngleMask;
use crate::line::LineMask;
use crate::radius::RadiusMask;

/// Outcome of querying a mask over one horizontal span.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MaskResult {
    /// Every pixel of the span is clipped away. The buffer may be left
    /// unmodified; callers must not draw the span.
    Transparent,
    /// Every pixel of the span is kept. The buffer is unmodified.
    FullCover,
    /// The coverage buffer was updated and must be applied pixel by pixel.
    Changed,
    /// The mask could not classify the span (for example a radius mask whose
    /// profile could not be allocated). The buffer is unmodified.
    Unknown,
}

/// A clipping shape that can report per-pixel coverage for a span.
///
/// Masks are fully normalized at construction and never change afterwards.
///
/// # Example
///
/// ```
/// use understory_area::{Area, Point};
/// use understory_mask::{CircleCache, LineMask, LineSide, Mask, MaskResult, RadiusMask};
///
/// let mut cache = CircleCache::new();
/// let rounded: Mask = RadiusMask::new(Area::new(0, 0, 40, 40), 8, false, &mut cache).into();
///
/// // A row through the straight middle band keeps everything.
/// let mut row = [255_u8; 40];
/// assert_eq!(rounded.query(&mut row, 0, 20), MaskResult::FullCover);
///
/// // A horizontal half-plane keeping what lies below y = 10.
/// let floor: Mask = LineMask::from_points(Point::new(0, 10), Point::new(100, 10), LineSide::Bottom).into();
/// assert_eq!(floor.query(&mut row, 0, 5), MaskResult::Transparent);
/// assert_eq!(floor.query(&mut row, 0, 15), MaskResult::FullCover);
/// ```
#[derive(Clone, Debug)]
pub enum Mask {
    /// Rounded rectangle, keeping either the inside or the outside.
    Radius(RadiusMask),
    /// Half-plane bounded by a directed line.
    Line(LineMask),
    /// Wedge between two rays sharing a vertex.
    Angle(AngleMask),
}

impl Mask {
    /// Applies the mask to the span of `buf.len()` pixels starting at
    /// `(abs_x, abs_y)`, narrowing the coverage already held in `buf`.
    pub fn query(&self, buf: &mut [Opa], abs_x: i32, abs_y: i32) -> MaskResult {
        match self {
            Self::Radius(m) => m.query(buf, abs_x, abs_y),
            Self::Line(m) => m.query(buf, abs_x, abs_y),
            Self::Angle(m) => m.query(buf, abs_x, abs_y),
        }
    }
}

impl From<RadiusMask> for Mask {
    fn from(m: RadiusMask) -> Self {
        Self::Radius(m)
    }
}

impl From<LineMask> for Mask {
    fn from(m: LineMask) -> Self {
        Self::Line(m)
    }
}

impl From<AngleMask> for Mask {
    fn from(m: AngleMask) -> Self {
        Self::Angle(m)
    }
}

/// Combines existing coverage `a` with new coverage `b`.
#[cfg(not(feature = "multiply_mask_mix"))]
#[inline]
pub(crate) fn mix(a: Opa, b: Opa) -> Opa {
    a.min(b)
}

/// Combines existing coverage `a` with new coverage `b`.
#[cfg(feature = "multiply_mask_mix")]
#[inline]
pub(crate) fn mix(a: Opa, b: Opa) -> Opa {
    understory_area::scale_opa(b, a)
}

/// Span length as a signed coordinate.
#[inline]
pub(crate) fn span_len(buf: &[Opa]) -> i64 {
    i64::try_from(buf.len()).unwrap_or(i64::MAX)
}

/// Mutable access to `buf[k]` when `k` is within `[0, len)`.
#[inline]
pub(crate) fn pixel_at(buf: &mut [Opa], k: i64) -> Option<&mut Opa> {
    usize::try_from(k).ok().and_then(|k| buf.get_mut(k))
}

/// Clears `buf[start..end]`, clamped to the buffer.
pub(crate) fn zero_span(buf: &mut [Opa], start: i64, end: i64) {
    let len = span_len(buf);
    let start = start.clamp(0, len);
    let end = end.clamp(0, len);
    if start < end {
        // Both bounds are within `0..=len`.
        let (s, e) = (usize::try_from(start), usize::try_from(end));
        if let (Ok(s), Ok(e)) = (s, e) {
            buf[s..e].fill(0);
        }
    }
}

/// Truncates fixed-point coverage to 8 bits, wrapping like byte storage.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "coverage arithmetic is defined modulo 256"
)]
pub(crate) fn opa_wrap(v: i64) -> Opa {
    v as Opa
}
