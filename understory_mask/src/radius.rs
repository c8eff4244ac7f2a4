// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rounded-rectangle masks.

use alloc::sync::Arc;

use understory_area::{Area, Opa};

use crate::cache::CircleCache;
use crate::mask::{MaskResult, mix, pixel_at, span_len, zero_span};
use crate::profile::CircleProfile;

/// Clips to the inside (or the outside) of a rectangle with rounded corners.
///
/// The radius is clamped to half of the shorter side. Corners are
/// anti-aliased with a [`CircleProfile`] shared through a [`CircleCache`];
/// dropping the mask releases its reference.
#[derive(Clone, Debug)]
pub struct RadiusMask {
    area: Area,
    radius: u16,
    outer: bool,
    profile: Option<Arc<CircleProfile>>,
}

impl RadiusMask {
    /// Creates a mask for `area` with corner `radius`.
    ///
    /// With `outer == false` the mask keeps the inside of the rounded
    /// rectangle; with `outer == true` it keeps everything else.
    pub fn new(area: Area, radius: u16, outer: bool, cache: &mut CircleCache) -> Self {
        let half = u16::try_from((area.w.min(area.h) >> 1).max(0)).unwrap_or(u16::MAX);
        let radius = radius.min(half);
        Self {
            area,
            radius,
            outer,
            profile: cache.acquire(radius),
        }
    }

    /// The masked rectangle.
    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }

    /// The effective (clamped) corner radius.
    #[must_use]
    pub fn radius(&self) -> u16 {
        self.radius
    }

    /// Returns `true` if the mask keeps the outside of the rectangle.
    #[must_use]
    pub fn is_outer(&self) -> bool {
        self.outer
    }

    /// Returns `true` if the corner profile is available.
    ///
    /// A radius mask without a profile (radius `0`, or allocation failure)
    /// reports [`MaskResult::Unknown`] for rows crossing the corners.
    #[must_use]
    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }

    /// Applies the mask to the span of `buf.len()` pixels at `(abs_x, abs_y)`.
    pub fn query(&self, buf: &mut [Opa], abs_x: i32, abs_y: i32) -> MaskResult {
        let len = span_len(buf);
        let (abs_x, abs_y) = (i64::from(abs_x), i64::from(abs_y));
        let radius = i64::from(self.radius);
        let (ax, ay) = (i64::from(self.area.x), i64::from(self.area.y));
        let (w, h) = (i64::from(self.area.w), i64::from(self.area.h));
        // Inclusive far edges.
        let x2 = ax + w - 1;
        let y2 = ay + h - 1;

        if abs_y < ay || abs_y > y2 {
            return if self.outer {
                MaskResult::FullCover
            } else {
                MaskResult::Transparent
            };
        }

        let in_straight_band = (abs_x >= ax + radius && abs_x + len <= x2 - radius)
            || (abs_y >= ay + radius && abs_y <= y2 - radius);
        if in_straight_band {
            if !self.outer {
                let last = ax - abs_x;
                if last > len {
                    return MaskResult::Transparent;
                }
                zero_span(buf, 0, last);
                let first = x2 - abs_x + 1;
                if first <= 0 {
                    return MaskResult::Transparent;
                }
                zero_span(buf, first, len);
                return if last <= 0 && first >= len {
                    MaskResult::FullCover
                } else {
                    MaskResult::Changed
                };
            }
            let first = (ax - abs_x).max(0);
            if first <= len {
                let last = (x2 - abs_x - first + 1).min(len - first);
                if last >= 0 {
                    zero_span(buf, first, first + last);
                }
            }
            return MaskResult::Changed;
        }

        let k = ax - abs_x;
        let rel_y = abs_y - ay;
        let cir_y = if rel_y < radius {
            radius - rel_y - 1
        } else {
            rel_y - (h - radius)
        };

        let Some(profile) = &self.profile else {
            return MaskResult::Unknown;
        };
        let Some((run, x_start)) = usize::try_from(cir_y).ok().and_then(|y| profile.row(y))
        else {
            return MaskResult::Unknown;
        };
        let x_start = i64::from(x_start);
        let run_len = span_len(run);
        let right = k + w - radius + x_start;
        let left = k + radius - x_start - 1;

        for (i, &cov) in (0_i64..).zip(run.iter().rev()) {
            let opa = if self.outer { 255 - cov } else { cov };
            if let Some(px) = pixel_at(buf, right + i) {
                *px = mix(opa, *px);
            }
            if let Some(px) = pixel_at(buf, left - i) {
                *px = mix(opa, *px);
            }
        }

        if !self.outer {
            zero_span(buf, right + run_len, len);
            zero_span(buf, 0, left - run_len + 1);
        } else {
            let clr_start = (left + 1).clamp(0, len);
            let clr_len = (right - clr_start).clamp(0, len - clr_start);
            zero_span(buf, clr_start, clr_start + clr_len);
        }
        MaskResult::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn mask(area: Area, radius: u16, outer: bool) -> RadiusMask {
        RadiusMask::new(area, radius, outer, &mut CircleCache::new())
    }

    #[test]
    fn radius_is_clamped_to_half_side() {
        let m = mask(Area::new(0, 0, 20, 9), 50, false);
        assert_eq!(m.radius(), 4);
        assert!(m.has_profile());
        let square = mask(Area::new(0, 0, 20, 9), 0, false);
        assert!(!square.has_profile());
    }

    #[test]
    fn rows_outside_area() {
        let inner = mask(Area::new(10, 10, 30, 30), 6, false);
        let outer = mask(Area::new(10, 10, 30, 30), 6, true);
        let mut buf = [255_u8; 50];
        assert_eq!(inner.query(&mut buf, 0, 9), MaskResult::Transparent);
        assert_eq!(inner.query(&mut buf, 0, 40), MaskResult::Transparent);
        assert_eq!(outer.query(&mut buf, 0, 9), MaskResult::FullCover);
        assert_eq!(outer.query(&mut buf, 0, 40), MaskResult::FullCover);
        assert!(buf.iter().all(|&v| v == 255));
    }

    #[test]
    fn middle_band_inside_is_untouched() {
        let m = mask(Area::new(10, 10, 30, 30), 6, false);
        let mut buf = [200_u8; 30];
        assert_eq!(m.query(&mut buf, 10, 25), MaskResult::FullCover);
        assert!(buf.iter().all(|&v| v == 200));
    }

    #[test]
    fn middle_band_clears_outside_columns() {
        let m = mask(Area::new(10, 10, 30, 30), 6, false);
        let mut buf = [255_u8; 50];
        assert_eq!(m.query(&mut buf, 0, 25), MaskResult::Changed);
        assert!(buf[..10].iter().all(|&v| v == 0));
        assert!(buf[10..40].iter().all(|&v| v == 255));
        assert!(buf[40..].iter().all(|&v| v == 0));
    }

    #[test]
    fn span_left_of_inner_area_is_transparent() {
        let m = mask(Area::new(10, 10, 30, 30), 6, false);
        let mut buf = [255_u8; 5];
        assert_eq!(m.query(&mut buf, 0, 25), MaskResult::Transparent);
        let mut buf = [255_u8; 5];
        assert_eq!(m.query(&mut buf, 40, 25), MaskResult::Transparent);
    }

    #[test]
    fn outer_middle_band_clears_inside() {
        let m = mask(Area::new(10, 10, 30, 30), 6, true);
        let mut buf = [255_u8; 50];
        assert_eq!(m.query(&mut buf, 0, 25), MaskResult::Changed);
        assert!(buf[..10].iter().all(|&v| v == 255));
        assert!(buf[10..40].iter().all(|&v| v == 0));
        assert!(buf[40..].iter().all(|&v| v == 255));
    }

    #[test]
    fn corner_row_is_symmetric_and_ramped() {
        let area = Area::new(0, 0, 40, 40);
        let m = mask(area, 10, false);
        let mut buf = vec![255_u8; 40];
        assert_eq!(m.query(&mut buf, 0, 0), MaskResult::Changed);
        #[cfg(not(feature = "multiply_mask_mix"))]
        assert_eq!(buf[..10], [0, 0, 0, 0, 0, 0, 80, 160, 224, 255]);
        // Top row: both corners are mirror images.
        for x in 0..20 {
            assert_eq!(buf[x], buf[39 - x], "column {x}");
        }
        // Far corner pixels are cleared, the middle stays covered.
        assert_eq!(buf[0], 0);
        assert_eq!(buf[20], 255);
        // Coverage never decreases towards the middle.
        for x in 0..19 {
            assert!(buf[x] <= buf[x + 1], "column {x}");
        }
    }

    #[test]
    fn corner_rows_shrink_towards_the_edge() {
        let area = Area::new(0, 0, 40, 40);
        let m = mask(area, 10, false);
        let mut prev_covered = 0;
        for y in (0..10).rev() {
            let mut buf = vec![255_u8; 40];
            m.query(&mut buf, 0, y);
            let covered: u32 = buf.iter().map(|&v| u32::from(v)).sum();
            if y < 9 {
                assert!(covered <= prev_covered, "row {y}");
            }
            prev_covered = covered;
        }
    }

    #[cfg(not(feature = "multiply_mask_mix"))]
    #[test]
    fn outer_corner_complements_inner() {
        let area = Area::new(0, 0, 40, 40);
        let inner = mask(area, 10, false);
        let outer = mask(area, 10, true);
        for y in 0..10 {
            let mut a = vec![255_u8; 40];
            let mut b = vec![255_u8; 40];
            inner.query(&mut a, 0, y);
            outer.query(&mut b, 0, y);
            for x in 0..40 {
                assert_eq!(u16::from(a[x]) + u16::from(b[x]), 255, "({x}, {y})");
            }
        }
    }

    #[test]
    fn missing_profile_reports_unknown() {
        let m = RadiusMask {
            area: Area::new(0, 0, 40, 40),
            radius: 10,
            outer: false,
            profile: None,
        };
        let mut buf = [255_u8; 40];
        assert_eq!(m.query(&mut buf, 0, 0), MaskResult::Unknown);
        assert!(buf.iter().all(|&v| v == 255));
    }

    #[test]
    fn span_offset_and_partial_buffers_stay_in_bounds() {
        let m = mask(Area::new(5, 5, 20, 20), 8, false);
        for y in 0..30 {
            for x in -10..30 {
                let mut buf = [255_u8; 7];
                let _ = m.query(&mut buf, x, y);
            }
        }
    }
}
