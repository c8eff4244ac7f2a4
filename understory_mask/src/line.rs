// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Half-plane masks bounded by a line.

use understory_area::{Opa, Point, sin};

use crate::mask::{MaskResult, mix, opa_wrap, pixel_at, span_len, zero_span};

/// Which side of a [`LineMask`] stays visible.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LineSide {
    /// Keep pixels left of the line.
    Left,
    /// Keep pixels right of the line.
    Right,
    /// Keep pixels above the line.
    Top,
    /// Keep pixels below the line.
    Bottom,
}

/// Half-plane mask with an anti-aliased edge along a line.
///
/// Slopes are stored in 22.10 fixed point. A line is *flat* when its
/// horizontal extent exceeds its vertical extent; flat and steep lines use
/// different rasterization paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineMask {
    origin: Point,
    side: LineSide,
    xy_steep: i32,
    yx_steep: i32,
    steep: i32,
    spx: i32,
    flat: bool,
    inv: bool,
}

impl LineMask {
    /// Creates a mask for the line through `p1` and `p2` keeping `side`.
    ///
    /// A horizontal line that keeps its bottom side is shifted up by one
    /// pixel so that the row the line was specified on stays visible.
    #[must_use]
    pub fn from_points(mut p1: Point, mut p2: Point, side: LineSide) -> Self {
        if p1.y == p2.y && side == LineSide::Bottom {
            p1.y -= 1;
            p2.y -= 1;
        }
        if p1.y > p2.y {
            core::mem::swap(&mut p1, &mut p2);
        }

        let dx = i64::from(p2.x) - i64::from(p1.x);
        let dy = i64::from(p2.y) - i64::from(p1.y);
        let flat = dx.abs() > dy.abs();
        let yx_steep = slope(dy, dx);
        let xy_steep = slope(dx, dy);
        let steep = if flat { yx_steep } else { xy_steep };

        let inv = match side {
            LineSide::Left => false,
            LineSide::Right => true,
            LineSide::Top => steep > 0,
            LineSide::Bottom => steep <= 0,
        };

        Self {
            origin: p1,
            side,
            xy_steep,
            yx_steep,
            steep,
            spx: (steep >> 2).abs(),
            flat,
            inv,
        }
    }

    /// Creates a mask for the line through `p` at `angle` degrees.
    ///
    /// Angles follow the same clockwise, y-down convention as
    /// [`understory_area::sin`]. A line and its reverse are the same line, so
    /// angles past `180` are folded back.
    #[must_use]
    pub fn from_angle(p: Point, angle: i32, side: LineSide) -> Self {
        let mut angle = angle.rem_euclid(360);
        if angle > 180 {
            angle -= 180;
        }
        let p2 = Point::new(
            p.x.saturating_add(i32::from(sin(angle + 90)) >> 5),
            p.y.saturating_add(i32::from(sin(angle)) >> 5),
        );
        Self::from_points(p, p2, side)
    }

    /// The kept side.
    #[must_use]
    pub fn side(&self) -> LineSide {
        self.side
    }

    /// The upper endpoint, used as the origin of the slope arithmetic.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Returns `true` if the line is closer to horizontal than vertical.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.flat
    }

    /// `Δx / Δy` in 22.10 fixed point.
    pub(crate) fn xy_steep(&self) -> i64 {
        i64::from(self.xy_steep)
    }

    /// Applies the mask to the span of `buf.len()` pixels at `(abs_x, abs_y)`.
    pub fn query(&self, buf: &mut [Opa], abs_x: i32, abs_y: i32) -> MaskResult {
        let x = i64::from(abs_x) - i64::from(self.origin.x);
        let y = i64::from(abs_y) - i64::from(self.origin.y);
        if self.steep == 0 {
            self.axis_aligned(buf, x, y)
        } else if self.flat {
            self.flat_span(buf, x, y)
        } else {
            self.steep_span(buf, x, y)
        }
    }

    fn axis_aligned(&self, buf: &mut [Opa], x: i64, y: i64) -> MaskResult {
        let len = span_len(buf);
        if self.flat {
            return match self.side {
                LineSide::Left | LineSide::Right => MaskResult::FullCover,
                LineSide::Top if y + 1 < 0 => MaskResult::FullCover,
                LineSide::Bottom if y > 0 => MaskResult::FullCover,
                _ => MaskResult::Transparent,
            };
        }
        match self.side {
            LineSide::Top | LineSide::Bottom => MaskResult::FullCover,
            LineSide::Right if x > 0 => MaskResult::FullCover,
            LineSide::Left => {
                if x + len < 0 {
                    return MaskResult::FullCover;
                }
                let k = -x;
                if k < 0 {
                    return MaskResult::Transparent;
                }
                zero_span(buf, k, len);
                MaskResult::Changed
            }
            LineSide::Right => {
                if x + len < 0 {
                    return MaskResult::Transparent;
                }
                let k = (-x).max(0);
                if k >= len {
                    return MaskResult::Transparent;
                }
                zero_span(buf, 0, k);
                MaskResult::Changed
            }
        }
    }

    fn flat_span(&self, buf: &mut [Opa], x: i64, y: i64) -> MaskResult {
        let len = span_len(buf);
        let yx = i64::from(self.yx_steep);
        let xy = i64::from(self.xy_steep);
        let spx = i64::from(self.spx);
        let (past, short) = self.outcomes();

        // Whole span on one side of the line.
        let y_at_start = (yx * x) >> 10;
        if (yx > 0 && y_at_start > y) || (yx <= 0 && y_at_start < y) {
            return short;
        }
        let y_at_end = (yx * (x + len)) >> 10;
        if (yx > 0 && y_at_end < y) || (yx <= 0 && y_at_end > y) {
            return past;
        }

        let xe = if yx > 0 {
            ((y * 256) * xy) >> 10
        } else {
            (((y + 1) * 256) * xy) >> 10
        };
        let xei = xe >> 8;
        let xef = xe & 0xFF;

        let mut px_h = if xef == 0 {
            255
        } else {
            255 - (((255 - xef) * spx) >> 8)
        };
        let mut k = xei - x;

        if xef != 0 {
            let m = opa_wrap(255 - (((255 - xef) * (255 - px_h)) >> 9));
            self.cover(buf, k, m);
            k += 1;
        }

        while px_h > spx {
            self.cover(buf, k, opa_wrap(px_h - (spx >> 1)));
            px_h -= spx;
            k += 1;
            if k >= len {
                break;
            }
        }

        if k >= 0 && k < len {
            let x_inters = (px_h * xy) >> 10;
            let mut m = opa_wrap((x_inters * px_h) >> 9);
            if yx < 0 {
                m = 255 - m;
            }
            self.cover(buf, k, m);
        }

        if self.inv {
            k = xei - x;
            if k > len {
                return MaskResult::Transparent;
            }
            zero_span(buf, 0, k);
        } else {
            k += 1;
            if k < 0 {
                return MaskResult::Transparent;
            }
            zero_span(buf, k, len);
        }
        MaskResult::Changed
    }

    fn steep_span(&self, buf: &mut [Opa], x: i64, y: i64) -> MaskResult {
        let len = span_len(buf);
        let yx = i64::from(self.yx_steep);
        let xy = i64::from(self.xy_steep);
        let (past, short) = self.outcomes();

        let mut x_at_y = (xy * y) >> 10;
        if xy > 0 {
            x_at_y += 1;
        }
        if x_at_y < x {
            return short;
        }
        if (xy * y) >> 10 > x + len {
            return past;
        }

        let xs = ((y * 256) * xy) >> 10;
        let mut xsi = xs >> 8;
        let mut xsf = xs & 0xFF;

        let xe = (((y + 1) * 256) * xy) >> 10;
        let xei = xe >> 8;
        let xef = xe & 0xFF;

        let mut k = xsi - x;
        if xsi != xei && xy < 0 && xsf == 0 {
            xsf = 0xFF;
            xsi = xei;
            k -= 1;
        }

        if xsi == xei {
            // The edge crosses this row within a single pixel.
            self.cover(buf, k, opa_wrap((xsf + xef) >> 1));
            k += 1;
            return self.clear_steep_rest(buf, k, xsi - x, false);
        }

        if xy < 0 {
            let y_inters = (xsf * -yx) >> 10;
            self.cover(buf, k, opa_wrap((y_inters * xsf) >> 9));
            k -= 1;

            let x_inters = ((255 - y_inters) * -xy) >> 10;
            self.cover(buf, k, opa_wrap(255 - (((255 - y_inters) * x_inters) >> 9)));
            k += 2;

            if self.inv {
                let k = xsi - x - 1;
                if k <= len {
                    zero_span(buf, 0, k);
                }
            } else {
                if k > len {
                    return MaskResult::FullCover;
                }
                if k >= 0 {
                    zero_span(buf, k, len);
                }
            }
            return MaskResult::Changed;
        }

        let y_inters = ((255 - xsf) * yx) >> 10;
        self.cover(buf, k, opa_wrap(255 - ((y_inters * (255 - xsf)) >> 9)));
        k += 1;

        let x_inters = ((255 - y_inters) * xy) >> 10;
        self.cover(buf, k, opa_wrap(((255 - y_inters) * x_inters) >> 9));
        k += 1;

        self.clear_steep_rest(buf, k, xsi - x, true)
    }

    /// Clears the dropped side of a steep edge once its anti-aliased pixels
    /// are written. `k` is one past the last edge pixel and `edge` the first.
    fn clear_steep_rest(&self, buf: &mut [Opa], k: i64, edge: i64, inclusive: bool) -> MaskResult {
        let len = span_len(buf);
        if self.inv {
            let past = if inclusive { edge > len } else { edge >= len };
            if past {
                return MaskResult::Transparent;
            }
            zero_span(buf, 0, edge);
        } else {
            let k = k.min(len);
            if k == 0 {
                return MaskResult::Transparent;
            }
            if k > 0 {
                zero_span(buf, k, len);
            }
        }
        MaskResult::Changed
    }

    /// Results for a span lying wholly past the edge, or wholly short of it.
    fn outcomes(&self) -> (MaskResult, MaskResult) {
        if self.inv {
            (MaskResult::Transparent, MaskResult::FullCover)
        } else {
            (MaskResult::FullCover, MaskResult::Transparent)
        }
    }

    /// Narrows `buf[k]` by the edge coverage `m`, flipped for inverted sides.
    fn cover(&self, buf: &mut [Opa], k: i64, m: Opa) {
        let m = if self.inv { 255 - m } else { m };
        if let Some(px) = pixel_at(buf, k) {
            *px = mix(*px, m);
        }
    }
}

/// `num / den` in 22.10 fixed point, `0` for a zero denominator.
fn slope(num: i64, den: i64) -> i32 {
    if den == 0 {
        return 0;
    }
    let v = (((1_i64 << 20) / den) * num) >> 10;
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}
