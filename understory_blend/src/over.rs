// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The "over" operator for two colors that both carry opacity.

use understory_area::{OPA_COVER, OPA_MAX, OPA_MIN, Opa, udiv255};

use crate::color::Pixel;

/// Composites `fg` with opacity `fg_opa` over `bg` with opacity `bg_opa`.
///
/// Returns the resulting color and its opacity. Fast paths:
///
/// - an opaque foreground or a transparent background yields `fg`;
/// - a transparent foreground yields `bg`;
/// - an opaque background yields a plain [`mix`](crate::mix) with opacity
///   [`OPA_COVER`].
///
/// Otherwise the result opacity is `255 - (255 - fg_opa) * (255 - bg_opa) / 255`
/// and the color is `mix(fg, bg, fg_opa * 255 / result_opa)`.
#[must_use]
pub fn over<P: Pixel>(fg: P, fg_opa: Opa, bg: P, bg_opa: Opa) -> (P, Opa) {
    match fast_path(fg, fg_opa, bg, bg_opa) {
        Some(res) => res,
        None => over_slow(fg, fg_opa, bg, bg_opa),
    }
}

#[inline]
fn fast_path<P: Pixel>(fg: P, fg_opa: Opa, bg: P, bg_opa: Opa) -> Option<(P, Opa)> {
    if fg_opa >= OPA_MAX || bg_opa <= OPA_MIN {
        Some((fg, fg_opa))
    } else if fg_opa <= OPA_MIN {
        Some((bg, bg_opa))
    } else if bg_opa >= OPA_MAX {
        Some((fg.mix(bg, fg_opa), OPA_COVER))
    } else {
        None
    }
}

fn over_slow<P: Pixel>(fg: P, fg_opa: Opa, bg: P, bg_opa: Opa) -> (P, Opa) {
    let hidden = udiv255((255 - u32::from(fg_opa)) * (255 - u32::from(bg_opa)));
    let res_opa = 255 - hidden;
    // Both opacities are above OPA_MIN here, so res_opa > fg_opa > 0.
    let ratio = u32::from(fg_opa) * 255 / res_opa.max(1);
    let ratio = Opa::try_from(ratio).unwrap_or(OPA_COVER);
    let res_opa = Opa::try_from(res_opa).unwrap_or(OPA_COVER);
    (fg.mix(bg, ratio), res_opa)
}

/// [`over`] with a one-entry memo of the last slow-path computation.
///
/// Runs of identical pixels (solid sprites, long anti-aliased edges) hit the
/// memo and skip the division. Results are identical to [`over`].
#[derive(Clone, Debug, Default)]
pub struct OverCache<P> {
    last: Option<OverEntry<P>>,
    misses: u32,
}

#[derive(Clone, Copy, Debug)]
struct OverEntry<P> {
    fg: P,
    fg_opa: Opa,
    bg: P,
    bg_opa: Opa,
    res: (P, Opa),
}

impl<P: Pixel> OverCache<P> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: None,
            misses: 0,
        }
    }

    /// Same as [`over`], reusing the previous result when the inputs repeat.
    pub fn over(&mut self, fg: P, fg_opa: Opa, bg: P, bg_opa: Opa) -> (P, Opa) {
        if let Some(res) = fast_path(fg, fg_opa, bg, bg_opa) {
            return res;
        }
        if let Some(e) = &self.last
            && e.fg == fg
            && e.fg_opa == fg_opa
            && e.bg == bg
            && e.bg_opa == bg_opa
        {
            return e.res;
        }
        let res = over_slow(fg, fg_opa, bg, bg_opa);
        self.misses = self.misses.wrapping_add(1);
        self.last = Some(OverEntry {
            fg,
            fg_opa,
            bg,
            bg_opa,
            res,
        });
        res
    }

    /// Number of slow-path computations performed so far.
    #[must_use]
    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Forgets the memoized entry.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color16, Color32};

    #[test]
    fn fast_paths() {
        let fg = Color32::RED;
        let bg = Color32::from_hex(0x00FF00);
        assert_eq!(over(fg, 255, bg, 100), (fg, 255));
        assert_eq!(over(fg, 100, bg, 0), (fg, 100));
        assert_eq!(over(fg, 1, bg, 100), (bg, 100));
        assert_eq!(over(fg, 128, bg, 255), (fg.mix(bg, 128), 255));
    }

    #[test]
    fn two_translucent_layers() {
        // (255 - 128) * (255 - 128) / 255 = 63, so the result is 192 opaque
        // and the foreground weight is 128 * 255 / 192 = 170.
        let (c, a) = over(Color32::RED, 128, Color32::WHITE, 128);
        assert_eq!(a, 192);
        assert_eq!(c, Color32::RED.mix(Color32::WHITE, 170));
    }

    #[test]
    fn result_is_at_least_as_opaque_as_either_input() {
        for fg_opa in (3..253_u8).step_by(7) {
            for bg_opa in (3..253_u8).step_by(11) {
                let (_, a) = over(Color16::RED, fg_opa, Color16::WHITE, bg_opa);
                assert!(a >= fg_opa.max(bg_opa), "{fg_opa} over {bg_opa} gave {a}");
            }
        }
    }

    #[test]
    fn cache_matches_uncached() {
        let mut cache = OverCache::new();
        let colors = [Color32::RED, Color32::WHITE, Color32::from_hex(0x123456)];
        for &fg in &colors {
            for &bg in &colors {
                for fg_opa in [0, 50, 128, 200, 255] {
                    for bg_opa in [0, 50, 128, 200, 255] {
                        assert_eq!(
                            cache.over(fg, fg_opa, bg, bg_opa),
                            over(fg, fg_opa, bg, bg_opa)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_inputs_hit_the_cache() {
        let mut cache = OverCache::new();
        for _ in 0..10 {
            let _ = cache.over(Color32::RED, 100, Color32::WHITE, 100);
        }
        assert_eq!(cache.misses(), 1);
        let _ = cache.over(Color32::RED, 101, Color32::WHITE, 100);
        assert_eq!(cache.misses(), 2);
        cache.clear();
        let _ = cache.over(Color32::RED, 101, Color32::WHITE, 100);
        assert_eq!(cache.misses(), 3);
    }
}
