// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opacity constants and 255-denominator fixed-point arithmetic.

/// An 8-bit opacity: `0` is fully transparent, `255` fully opaque.
pub type Opa = u8;

/// Fully transparent.
pub const OPA_TRANSP: Opa = 0;
/// Opacities at or below this value are treated as transparent.
pub const OPA_MIN: Opa = 2;
/// Half opacity.
pub const OPA_50: Opa = 127;
/// Opacities at or above this value are treated as opaque.
pub const OPA_MAX: Opa = 253;
/// Fully opaque.
pub const OPA_COVER: Opa = 255;

/// Divides by 255 using `(x * 0x8081) >> 23`.
///
/// The result equals `x / 255` (rounded down) for every `x` up to
/// `255 * 255 + 255`, which covers all products of two 8-bit values plus a
/// rounding offset.
#[must_use]
#[inline]
pub const fn udiv255(x: u32) -> u32 {
    (x * 0x8081) >> 23
}

/// Maps `n` in `0..=255` to `0..=32768` (`n / 255` in 1.15 fixed point).
#[must_use]
#[inline]
pub const fn per_255(n: u8) -> u32 {
    (n as u32 * 32768 + 127) / 255
}

/// Scales the opacity `a` by `b / 255`: `(per_255(b) * a) >> 15`.
///
/// Used to fold a per-pixel mask value into an overall opacity.
#[must_use]
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "per_255(b) <= 32768, so the product shifted by 15 is at most 255"
)]
pub const fn scale_opa(a: Opa, b: Opa) -> Opa {
    ((per_255(b) * a as u32) >> 15) as Opa
}

/// Linearly maps `x` from `in_min..=in_max` to `out_min..=out_max`, clamping
/// at both ends. Reversed input ranges are supported.
#[must_use]
pub fn map(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max >= in_min {
        if x >= in_max {
            return out_max;
        }
        if x <= in_min {
            return out_min;
        }
    }
    if in_max <= in_min {
        if x >= in_min {
            return out_min;
        }
        if x <= in_max {
            return out_max;
        }
    }
    let in_delta = i64::from(in_max) - i64::from(in_min);
    let out_delta = i64::from(out_max) - i64::from(out_min);
    let v = (i64::from(x) - i64::from(in_min)) * out_delta / in_delta + i64::from(out_min);
    i32::try_from(v).unwrap_or(out_max)
}
