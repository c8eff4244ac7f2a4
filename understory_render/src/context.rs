// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owned rendering context.

use alloc::vec::Vec;

use understory_area::{Area, OPA_COVER, OPA_MIN, Opa};
use understory_blend::{BlendDesc, DrawBuffer, GlyphBitmap, Pixel};
use understory_mask::{ActiveMaskList, CircleCache, Mask, MaskListFull, MaskResult, RadiusMask};
use understory_refresh::{
    DEFAULT_QUEUE_CAPACITY, Display, FlushTarget, Invalidation, RefreshConfig, TickOutcome,
};

/// Everything one display needs to draw and refresh.
///
/// Owns the circle-profile cache, the active mask list and the refresh
/// state. Draw calls consult the active masks row by row: each row's
/// coverage is narrowed by [`ActiveMaskList::query`] and then blended, so
/// every pixel survives only where all masks keep it.
#[derive(Debug)]
pub struct RenderContext<const N: usize = DEFAULT_QUEUE_CAPACITY> {
    circles: CircleCache,
    masks: ActiveMaskList,
    display: Display<N>,
    row: Vec<Opa>,
}

impl<const N: usize> RenderContext<N> {
    /// Creates a context for a display with `config`.
    #[must_use]
    pub fn new(config: RefreshConfig) -> Self {
        Self {
            circles: CircleCache::new(),
            masks: ActiveMaskList::new(),
            display: Display::new(config),
            row: Vec::new(),
        }
    }

    /// The circle-profile cache.
    #[must_use]
    pub fn circles(&self) -> &CircleCache {
        &self.circles
    }

    /// The circle-profile cache.
    pub fn circles_mut(&mut self) -> &mut CircleCache {
        &mut self.circles
    }

    /// The active masks.
    #[must_use]
    pub fn masks(&self) -> &ActiveMaskList {
        &self.masks
    }

    /// The active masks.
    pub fn masks_mut(&mut self) -> &mut ActiveMaskList {
        &mut self.masks
    }

    /// The refresh state.
    #[must_use]
    pub fn display(&self) -> &Display<N> {
        &self.display
    }

    /// The refresh state.
    pub fn display_mut(&mut self) -> &mut Display<N> {
        &mut self.display
    }

    /// Builds a rounded-rectangle mask sharing this context's circle cache.
    pub fn radius_mask(&mut self, area: Area, radius: u16, outer: bool) -> RadiusMask {
        RadiusMask::new(area, radius, outer, &mut self.circles)
    }

    /// Activates `mask` for subsequent draw calls and returns its slot.
    ///
    /// # Errors
    ///
    /// Returns [`MaskListFull`] with the mask when every slot is in use.
    pub fn add_mask(&mut self, mask: impl Into<Mask>) -> Result<usize, MaskListFull> {
        self.masks.add(mask.into())
    }

    /// Deactivates the mask in slot `id`.
    pub fn remove_mask(&mut self, id: usize) -> Option<Mask> {
        self.masks.remove(id)
    }

    /// Paints `area` with `color` at opacity `opa`.
    pub fn fill<P: Pixel>(&mut self, buf: &mut DrawBuffer<'_, P>, area: Area, color: P, opa: Opa) {
        self.blend(buf, &BlendDesc::fill(area, color).with_opa(opa));
    }

    /// [`understory_blend::blend`] clipped by the active masks.
    pub fn blend<P: Pixel>(&mut self, buf: &mut DrawBuffer<'_, P>, desc: &BlendDesc<'_, P>) {
        if !self.masks.is_active_for(&desc.area) {
            understory_blend::blend(buf, desc);
            return;
        }
        if desc.opa <= OPA_MIN {
            return;
        }
        let Some(region) = desc.visible_area(&buf.area()) else {
            return;
        };
        let Ok(w) = usize::try_from(region.w) else {
            return;
        };

        for y in region.y..region.y2() {
            let Some(off) = row_offset(&desc.area, region.x, y) else {
                continue;
            };
            self.row.clear();
            match desc.mask {
                Some(m) => self
                    .row
                    .extend((0..w).map(|i| m.get(off + i).copied().unwrap_or(0))),
                None => self.row.resize(w, OPA_COVER),
            }
            let mask = match self.masks.query(&mut self.row, region.x, y) {
                MaskResult::Transparent => continue,
                MaskResult::FullCover if desc.mask.is_none() => None,
                _ => Some(&self.row[..]),
            };
            let row = BlendDesc {
                area: Area::new(region.x, y, region.w, 1),
                source: desc.source.map(|s| s.get(off..).unwrap_or(&[])),
                mask,
                fill: desc.fill,
                opa: desc.opa,
                clip: None,
            };
            understory_blend::blend(buf, &row);
        }
    }

    /// [`understory_blend::blend_text`] clipped by the active masks.
    pub fn blend_text<P: Pixel>(
        &mut self,
        buf: &mut DrawBuffer<'_, P>,
        desc: &BlendDesc<'_, P>,
        glyph: &GlyphBitmap<'_>,
    ) {
        if !self.masks.is_active_for(&desc.area) {
            understory_blend::blend_text(buf, desc, glyph);
            return;
        }
        if desc.opa <= OPA_MIN {
            return;
        }
        let Some(region) = desc.visible_area(&buf.area()) else {
            return;
        };

        for y in region.y..region.y2() {
            let Ok(gy) = u16::try_from(y - desc.area.y) else {
                continue;
            };
            self.row.clear();
            self.row.extend((region.x..region.x2()).map(|x| {
                u16::try_from(x - desc.area.x).map_or(0, |gx| glyph.sample(gx, gy))
            }));
            if self.masks.query(&mut self.row, region.x, y) == MaskResult::Transparent {
                continue;
            }
            let row = BlendDesc::fill(Area::new(region.x, y, region.w, 1), desc.fill)
                .with_opa(desc.opa)
                .with_mask(&self.row);
            understory_blend::blend(buf, &row);
        }
    }

    /// Reports `area` as needing a redraw.
    pub fn invalidate(&mut self, area: Area) -> Invalidation {
        self.display.invalidate(area)
    }

    /// Runs one refresh tick against `target`.
    pub fn refresh_tick(&mut self, target: &mut impl FlushTarget) -> TickOutcome {
        self.display.refresh_tick(target)
    }
}

/// Index of screen position `(x, y)` in a row-major buffer laid over `area`.
fn row_offset(area: &Area, x: i32, y: i32) -> Option<usize> {
    let row = usize::try_from(y - area.y).ok()?;
    let col = usize::try_from(x - area.x).ok()?;
    Some(row * usize::try_from(area.w).ok()? + col)
}
