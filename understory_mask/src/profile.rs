// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Precomputed anti-aliasing runs for one quadrant of a circle.

use alloc::vec::Vec;
use core::fmt;

use understory_area::Opa;

/// Error returned when storage for a [`CircleProfile`] cannot be reserved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProfileAllocError {
    /// Radius of the profile that failed to build.
    pub radius: u16,
}

impl fmt::Display for ProfileAllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot allocate circle profile storage for radius {}",
            self.radius
        )
    }
}

impl core::error::Error for ProfileAllocError {}

/// Anti-aliased edge coverage of a circle quadrant, one run per row.
///
/// Row `0` is the row nearest the circle's horizontal diameter and the last
/// row is the flat top of the quadrant. Each row stores the leftmost covered
/// x offset ([`row`](Self::row)) and a run of coverage values ordered from the
/// outermost pixel inwards, so `run[run.len() - 1]` sits at `x_start`.
///
/// Profiles are built with a midpoint circle stepper at 4× vertical
/// sub-sampling over one octant, with the diagonal pixel interpolated
/// separately, then mirrored about the diagonal.
pub struct CircleProfile {
    radius: u16,
    opa: Vec<Opa>,
    run_start: Vec<u16>,
    x_start: Vec<u16>,
}

impl fmt::Debug for CircleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircleProfile")
            .field("radius", &self.radius)
            .field("rows", &self.rows())
            .finish_non_exhaustive()
    }
}

/// Midpoint circle stepper state.
struct Stepper {
    x: i32,
    y: i32,
    err: i32,
}

impl Stepper {
    fn new(radius: i32) -> Self {
        Self {
            x: radius,
            y: 0,
            err: 1 - radius,
        }
    }

    fn active(&self) -> bool {
        self.y <= self.x
    }

    fn step(&mut self) {
        if self.err <= 0 {
            self.err += 2 * self.y + 3;
        } else {
            self.err += 2 * (self.y - self.x) + 5;
            self.x -= 1;
        }
        self.y += 1;
    }
}

/// One anti-aliased pixel of the first octant before mirroring.
#[derive(Clone, Copy)]
struct Sample {
    x: i32,
    y: i32,
    opa: Opa,
}

impl CircleProfile {
    /// Builds the profile for `radius`.
    ///
    /// Radius `0` yields an empty profile; radius `1` is a single pixel of
    /// coverage 180.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileAllocError`] if the backing storage cannot be reserved.
    pub fn build(radius: u16) -> Result<Self, ProfileAllocError> {
        let err = ProfileAllocError { radius };
        let size = (usize::from(radius) << 1) + 2;
        let mut opa = Vec::new();
        let mut run_start = Vec::new();
        let mut x_start = Vec::new();
        opa.try_reserve_exact(size).map_err(|_| err)?;
        run_start.try_reserve_exact(size).map_err(|_| err)?;
        x_start.try_reserve_exact(size).map_err(|_| err)?;

        let mut profile = Self {
            radius,
            opa,
            run_start,
            x_start,
        };
        match radius {
            0 => {}
            1 => {
                profile.opa.push(180);
                profile.run_start.extend_from_slice(&[0, 1]);
                profile.x_start.push(0);
            }
            _ => {
                let mut samples = Vec::new();
                samples.try_reserve_exact(size).map_err(|_| err)?;
                octant_samples(i32::from(radius), &mut samples);
                mirror_octant(&mut samples);
                profile.fill_rows(&samples);
            }
        }
        Ok(profile)
    }

    /// Radius this profile was built for.
    #[must_use]
    pub fn radius(&self) -> u16 {
        self.radius
    }

    /// Number of rows in the quadrant.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.x_start.len()
    }

    /// Coverage run and leftmost x offset of row `y`, or `None` past the last row.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<(&[Opa], u16)> {
        let start = usize::from(*self.run_start.get(y)?);
        let end = usize::from(*self.run_start.get(y + 1)?);
        let x_start = *self.x_start.get(y)?;
        Some((self.opa.get(start..end)?, x_start))
    }

    fn fill_rows(&mut self, samples: &[Sample]) {
        let mut i = 0;
        let mut y = 0;
        while i < samples.len() {
            self.run_start.push(to_u16(i));
            let mut min_x = samples[i].x;
            while i < samples.len() && samples[i].y == y {
                min_x = min_x.min(samples[i].x);
                i += 1;
            }
            self.x_start.push(to_u16(min_x));
            y += 1;
        }
        self.run_start.push(to_u16(samples.len()));
        self.opa.extend(samples.iter().map(|s| s.opa));
    }
}

/// Walks the first octant at 4× sub-sampling, emitting one or two
/// anti-aliased pixels per output row, followed by the diagonal pixel.
fn octant_samples(radius: i32, out: &mut Vec<Sample>) {
    let mut cp = Stepper::new(radius * 4);
    let mut x_int = [cp.x >> 2, 0, 0, 0];
    let mut x_fract = [0_i32; 4];
    let mut row = 0;

    'rows: while cp.active() {
        for i in 0..4 {
            cp.step();
            if !cp.active() {
                break 'rows;
            }
            x_int[i] = cp.x >> 2;
            x_fract[i] = cp.x & 0x3;
        }

        let x0 = x_int[0];
        if x0 == x_int[3] {
            push(out, x0, row, x_fract.iter().sum());
        } else if x0 != x_int[1] {
            push(out, x0, row, x_fract[0]);
            push(out, x0 - 1, row, 4 + x_fract[1] + x_fract[2] + x_fract[3]);
        } else if x0 != x_int[2] {
            push(out, x0, row, x_fract[0] + x_fract[1]);
            push(out, x0 - 1, row, 8 + x_fract[2] + x_fract[3]);
        } else {
            push(out, x0, row, x_fract[0] + x_fract[1] + x_fract[2]);
            push(out, x0 - 1, row, 12 + x_fract[3]);
        }
        row += 1;
    }

    // The stepper is unreliable exactly on the diagonal, so interpolate it.
    let mid = radius * 723;
    let mid_int = mid >> 10;
    let on_diagonal = out.last().is_some_and(|s| s.x == mid_int && s.y == mid_int);
    if !on_diagonal {
        let t = mid - (mid_int << 10);
        let sixteenths = if t <= 512 {
            (t * t * 2) >> 16
        } else {
            let u = 1024 - t;
            15 - ((u * u * 2) >> 16)
        };
        push(out, mid_int, mid_int, sixteenths);
    }
}

fn push(out: &mut Vec<Sample>, x: i32, y: i32, sixteenths: i32) {
    out.push(Sample {
        x,
        y,
        opa: crate::mask::opa_wrap(i64::from(sixteenths * 16)),
    });
}

/// Appends the second octant by reflecting every sample but the diagonal one.
fn mirror_octant(samples: &mut Vec<Sample>) {
    let n = samples.len();
    for i in (0..n.saturating_sub(1)).rev() {
        let s = samples[i];
        samples.push(Sample {
            x: s.y,
            y: s.x,
            opa: s.opa,
        });
    }
}

fn to_u16(v: impl TryInto<u16>) -> u16 {
    v.try_into().unwrap_or(u16::MAX)
}
