// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer trigonometry in whole degrees.
//!
//! Angles follow screen conventions: `0°` points along `+x`, and angles grow
//! clockwise because `y` grows downwards.

/// Peak value returned by [`sin`] and [`cos`] (`sin(90) == SIN_AMPLITUDE`).
pub const SIN_AMPLITUDE: i16 = 32767;

const SIN_TABLE: [i16; 91] = [
    0, 572, 1144, 1715, 2286, 2856, 3425, 3993, 4560, 5126, 5690, 6252, 6813, 7371, 7927, 8481,
    9032, 9580, 10126, 10668, 11207, 11743, 12275, 12803, 13328, 13848, 14364, 14876, 15383,
    15886, 16383, 16876, 17364, 17846, 18323, 18794, 19260, 19720, 20173, 20621, 21062, 21497,
    21925, 22347, 22762, 23170, 23571, 23964, 24351, 24730, 25101, 25465, 25821, 26169, 26509,
    26841, 27165, 27481, 27788, 28087, 28377, 28659, 28932, 29196, 29451, 29697, 29934, 30162,
    30381, 30591, 30791, 30982, 31163, 31335, 31498, 31650, 31794, 31927, 32051, 32165, 32269,
    32364, 32448, 32523, 32587, 32642, 32687, 32722, 32747, 32762, 32767,
];

#[inline]
fn table(deg: i32) -> i16 {
    // Callers keep `deg` within 0..=90.
    SIN_TABLE[deg.clamp(0, 90).unsigned_abs() as usize]
}

/// Sine of `angle` degrees, scaled to `±`[`SIN_AMPLITUDE`].
///
/// Any angle is accepted; it is reduced modulo 360 first.
#[must_use]
pub fn sin(angle: i32) -> i16 {
    let a = angle.rem_euclid(360);
    match a {
        0..90 => table(a),
        90..180 => table(180 - a),
        180..270 => -table(a - 180),
        _ => -table(360 - a),
    }
}

/// Cosine of `angle` degrees, scaled to `±`[`SIN_AMPLITUDE`].
#[must_use]
#[inline]
pub fn cos(angle: i32) -> i16 {
    sin(angle.rem_euclid(360) + 90)
}

/// Direction of the vector `(x, y)` in whole degrees, `0..=359`.
///
/// Uses the same clockwise, y-down convention as [`sin`]: `atan2(1, 0)` is
/// `90`. The zero vector maps to `0`.
#[must_use]
pub fn atan2(y: i32, x: i32) -> u16 {
    if x == 0 && y == 0 {
        return 0;
    }
    let ax = i64::from(x.unsigned_abs());
    let ay = i64::from(y.unsigned_abs());
    let (hi, lo) = if ax >= ay { (ax, ay) } else { (ay, ax) };

    // First-octant angle: the smallest `a` whose tangent reaches `lo / hi`,
    // then pick whichever neighbor is closer.
    let mut oct = 45;
    for a in 0..=45 {
        let over = hi * i64::from(table(a)) - lo * i64::from(table(90 - a));
        if over >= 0 {
            oct = a;
            if a > 0 {
                let under = lo * i64::from(table(91 - a)) - hi * i64::from(table(a - 1));
                if under < over {
                    oct = a - 1;
                }
            }
            break;
        }
    }

    let quadrant_angle = if ax >= ay { oct } else { 90 - oct };
    let deg = match (x >= 0, y >= 0) {
        (true, true) => quadrant_angle,
        (false, true) => 180 - quadrant_angle,
        (false, false) => 180 + quadrant_angle,
        (true, false) => 360 - quadrant_angle,
    };
    u16::try_from(deg.rem_euclid(360)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sin_quadrants() {
        assert_eq!(sin(0), 0);
        assert_eq!(sin(30), 16383);
        assert_eq!(sin(90), SIN_AMPLITUDE);
        assert_eq!(sin(150), 16383);
        assert_eq!(sin(180), 0);
        assert_eq!(sin(210), -16383);
        assert_eq!(sin(270), -SIN_AMPLITUDE);
        assert_eq!(sin(330), -16383);
    }

    #[test]
    fn sin_wraps_out_of_range_angles() {
        assert_eq!(sin(-90), -SIN_AMPLITUDE);
        assert_eq!(sin(450), SIN_AMPLITUDE);
        assert_eq!(sin(-330), sin(30));
    }

    #[test]
    fn cos_is_shifted_sin() {
        assert_eq!(cos(0), SIN_AMPLITUDE);
        assert_eq!(cos(90), 0);
        assert_eq!(cos(180), -SIN_AMPLITUDE);
        assert_eq!(cos(60), 16383);
        assert_eq!(cos(-60), 16383);
    }

    #[test]
    fn atan2_axes_and_diagonals() {
        assert_eq!(atan2(0, 0), 0);
        assert_eq!(atan2(0, 10), 0);
        assert_eq!(atan2(10, 0), 90);
        assert_eq!(atan2(0, -10), 180);
        assert_eq!(atan2(-10, 0), 270);
        assert_eq!(atan2(7, 7), 45);
        assert_eq!(atan2(7, -7), 135);
        assert_eq!(atan2(-7, -7), 225);
        assert_eq!(atan2(-7, 7), 315);
    }

    #[test]
    fn atan2_inverts_sin_cos() {
        for deg in 0..360 {
            let x = i32::from(cos(deg));
            let y = i32::from(sin(deg));
            let got = i32::from(atan2(y, x));
            let diff = (got - deg).rem_euclid(360);
            assert!(diff == 0 || diff == 1 || diff == 359, "deg {deg} -> {got}");
        }
    }
}
