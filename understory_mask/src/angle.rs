// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wedge masks between two rays.

use understory_area::{Opa, Point};

use crate::line::{LineMask, LineSide};
use crate::mask::MaskResult;

/// Keeps the wedge swept clockwise from `start` to `end` degrees around a
/// vertex.
///
/// Angles are clamped to `0..=359`. A sweep of a whole turn or more keeps
/// every pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AngleMask {
    vertex: Point,
    start: i32,
    end: i32,
    delta_deg: u16,
    full: bool,
    start_line: LineMask,
    end_line: LineMask,
}

impl AngleMask {
    /// Creates a wedge mask around `vertex`.
    #[must_use]
    pub fn new(vertex: Point, start_angle: i32, end_angle: i32) -> Self {
        let full = i64::from(end_angle) - i64::from(start_angle) >= 360;
        let start = start_angle.clamp(0, 359);
        let end = end_angle.clamp(0, 359);
        let delta = if end < start {
            360 - start + end
        } else {
            end - start
        };

        let start_side = if start < 180 {
            LineSide::Left
        } else {
            LineSide::Right
        };
        let end_side = if end < 180 {
            LineSide::Right
        } else {
            LineSide::Left
        };

        Self {
            vertex,
            start,
            end,
            delta_deg: u16::try_from(delta).unwrap_or(0),
            full,
            start_line: LineMask::from_angle(vertex, start, start_side),
            end_line: LineMask::from_angle(vertex, end, end_side),
        }
    }

    /// The shared endpoint of both rays.
    #[must_use]
    pub fn vertex(&self) -> Point {
        self.vertex
    }

    /// Clamped start angle.
    #[must_use]
    pub fn start_angle(&self) -> i32 {
        self.start
    }

    /// Clamped end angle.
    #[must_use]
    pub fn end_angle(&self) -> i32 {
        self.end
    }

    /// Clockwise sweep from start to end, wrapping through `0`.
    #[must_use]
    pub fn delta_deg(&self) -> u16 {
        self.delta_deg
    }

    /// Returns `true` if the wedge covers the whole plane.
    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        self.full
    }

    /// Applies the mask to the span of `buf.len()` pixels at `(abs_x, abs_y)`.
    pub fn query(&self, buf: &mut [Opa], abs_x: i32, abs_y: i32) -> MaskResult {
        if self.full {
            return MaskResult::FullCover;
        }
        let (start, end) = (self.start, self.end);
        let vy = self.vertex.y;

        if start < 180 && end < 180 && start != 0 && end != 0 && start > end {
            if abs_y < vy {
                return MaskResult::FullCover;
            }
            return self.split_row(buf, abs_x, abs_y, &self.start_line, &self.end_line);
        }
        if start > 180 && end > 180 && start > end {
            if abs_y > vy {
                return MaskResult::FullCover;
            }
            return self.split_row(buf, abs_x, abs_y, &self.end_line, &self.start_line);
        }

        let above = abs_y < vy;
        let start_res = match start {
            180 if above => MaskResult::FullCover,
            180 => MaskResult::Unknown,
            0 if above => MaskResult::Unknown,
            0 => MaskResult::FullCover,
            _ if (start < 180 && above) || (start > 180 && !above) => MaskResult::Unknown,
            _ => self.start_line.query(buf, abs_x, abs_y),
        };
        let end_res = match end {
            180 if above => MaskResult::Unknown,
            180 => MaskResult::FullCover,
            0 if above => MaskResult::FullCover,
            0 => MaskResult::Unknown,
            _ if (end < 180 && above) || (end > 180 && !above) => MaskResult::Unknown,
            _ => self.end_line.query(buf, abs_x, abs_y),
        };

        match (start_res, end_res) {
            (MaskResult::Transparent, _)
            | (_, MaskResult::Transparent)
            | (MaskResult::Unknown, MaskResult::Unknown) => {
                buf.fill(0);
                MaskResult::Transparent
            }
            (MaskResult::FullCover, MaskResult::FullCover) => MaskResult::FullCover,
            _ => MaskResult::Changed,
        }
    }

    /// Splits a row crossed by both rays half way between their intercepts,
    /// applying `first` to the left part and `second` to the rest.
    fn split_row(
        &self,
        buf: &mut [Opa],
        abs_x: i32,
        abs_y: i32,
        first: &LineMask,
        second: &LineMask,
    ) -> MaskResult {
        let len = crate::mask::span_len(buf);
        let rel_x = i64::from(abs_x) - i64::from(self.vertex.x);
        let rel_y = i64::from(abs_y) - i64::from(self.vertex.y);

        let end_first = (rel_y * self.end_line.xy_steep()) >> 10;
        let mut start_last = ((rel_y + 1) * self.start_line.xy_steep()) >> 10;
        for angle in [self.start, self.end] {
            let wrong_sign = match angle {
                271..=359 | 1..=90 => start_last < 0,
                91..=269 => start_last > 0,
                _ => false,
            };
            if wrong_sign {
                start_last = 0;
            }
        }

        let dist = (end_first - start_last) >> 1;
        let split = (start_last + dist - rel_x).min(len);

        let mut first_res = MaskResult::FullCover;
        if split > 0 {
            let at = usize::try_from(split).unwrap_or(0);
            let head = &mut buf[..at];
            first_res = first.query(head, abs_x, abs_y);
            if first_res == MaskResult::Transparent {
                head.fill(0);
            }
        }

        let at = usize::try_from(split.clamp(0, len)).unwrap_or(0);
        let tail_x = abs_x.saturating_add(i32::try_from(at).unwrap_or(i32::MAX));
        let tail = &mut buf[at..];
        let second_res = second.query(tail, tail_x, abs_y);
        if second_res == MaskResult::Transparent {
            tail.fill(0);
        }

        if first_res == second_res {
            first_res
        } else {
            MaskResult::Changed
        }
    }
}
