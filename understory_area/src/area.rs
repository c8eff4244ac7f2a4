// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles and points.

use kurbo::Rect;

/// An integer pixel coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: i32,
    /// Vertical coordinate, growing downwards.
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

/// An integer rectangle `{x, y, w, h}`.
///
/// `x`/`y` is the top-left pixel; the area spans `w` columns and `h` rows, so
/// the exclusive right and bottom edges are [`x2`](Self::x2) and
/// [`y2`](Self::y2). Widths and heights are never negative when built through
/// the constructors; an area with a zero extent is [empty](Self::is_empty).
///
/// `Area` is a plain value type: copy it freely.
///
/// # Example
///
/// ```
/// use understory_area::Area;
///
/// let screen = Area::new(0, 0, 800, 480);
/// let widget = Area::new(-10, 470, 40, 40);
///
/// let visible = screen.intersect(&widget).unwrap();
/// assert_eq!(visible, Area::new(0, 470, 30, 10));
/// assert!(screen.contains(&visible));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Area {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Area {
    /// The empty area at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a new area. Negative extents are clamped to zero.
    #[must_use]
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w: if w < 0 { 0 } else { w },
            h: if h < 0 { 0 } else { h },
        }
    }

    /// Creates an area from its inclusive top-left and exclusive bottom-right edges.
    #[must_use]
    #[inline]
    pub const fn from_edges(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Exclusive right edge (`x + w`).
    #[must_use]
    #[inline]
    pub const fn x2(&self) -> i32 {
        self.x + self.w
    }

    /// Exclusive bottom edge (`y + h`).
    #[must_use]
    #[inline]
    pub const fn y2(&self) -> i32 {
        self.y + self.h
    }

    /// Returns `true` if the area covers no pixel.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Number of pixels covered by the area.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.w.unsigned_abs() as usize * self.h.unsigned_abs() as usize
    }

    /// Returns `true` if the two areas overlap or share an edge.
    ///
    /// This is the test used to decide whether two dirty areas are merged, so
    /// adjacent (touching) areas count as being "on" each other.
    #[must_use]
    pub fn is_on(&self, other: &Self) -> bool {
        self.x <= other.x2() && self.x2() >= other.x && self.y <= other.y2() && self.y2() >= other.y
    }

    /// Smallest area covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.x2().max(other.x2()),
            self.y2().max(other.y2()),
        )
    }

    /// The common part of both areas, or `None` if they share no pixel.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.x2().min(other.x2());
        let y2 = self.y2().min(other.y2());
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Self::from_edges(x1, y1, x2, y2))
    }

    /// Returns `true` if `other` lies entirely within `self`.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        other.x >= self.x && other.y >= self.y && other.x2() <= self.x2() && other.y2() <= self.y2()
    }

    /// Returns `true` if the pixel at `(x, y)` lies within the area.
    #[must_use]
    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x2() && y >= self.y && y < self.y2()
    }

    /// Returns the area moved by `(dx, dy)`.
    #[must_use]
    #[inline]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Snaps the area outwards to multiples of `align_x` horizontally and
    /// `align_y` vertically.
    ///
    /// The origin is rounded down and the far edge up, so the result always
    /// covers the original extent. An alignment of `0` or `1` leaves that axis
    /// untouched.
    #[must_use]
    pub fn align(&self, align_x: u32, align_y: u32) -> Self {
        let (x1, x2) = align_span(self.x, self.x2(), align_x);
        let (y1, y2) = align_span(self.y, self.y2(), align_y);
        Self::from_edges(x1, y1, x2, y2)
    }

    /// Clips the area to a `width` × `height` screen anchored at the origin.
    #[must_use]
    pub fn clip_to_screen(&self, width: u32, height: u32) -> Option<Self> {
        let screen = Self::new(0, 0, saturate(width), saturate(height));
        self.intersect(&screen)
    }

    /// Returns the smallest integer area covering `rect`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "float-to-int casts saturate; the rect is already rounded outwards"
    )]
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.abs().expand();
        Self::from_edges(r.x0 as i32, r.y0 as i32, r.x1 as i32, r.y1 as i32)
    }
}

impl From<Area> for Rect {
    fn from(a: Area) -> Self {
        Self::new(
            f64::from(a.x),
            f64::from(a.y),
            f64::from(a.x2()),
            f64::from(a.y2()),
        )
    }
}

fn saturate(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn align_span(start: i32, end: i32, align: u32) -> (i32, i32) {
    if align <= 1 {
        return (start, end);
    }
    let a = saturate(align);
    let lo = start.div_euclid(a) * a;
    let hi = end.saturating_add(a - 1).div_euclid(a) * a;
    (lo, hi)
}
