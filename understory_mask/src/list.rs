// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The set of masks applied to every draw call.

use core::fmt;

use understory_area::{Area, Opa};

use crate::mask::{Mask, MaskResult};

/// Maximum number of simultaneously active masks.
pub const MAX_ACTIVE_MASKS: usize = 16;

/// Error returned by [`ActiveMaskList::add`] when every slot is taken.
///
/// The rejected mask is handed back so the caller can keep or drop it.
pub struct MaskListFull<M = Mask> {
    mask: M,
}

impl<M> MaskListFull<M> {
    /// Recovers the mask that could not be added.
    pub fn into_inner(self) -> M {
        self.mask
    }
}

impl<M> fmt::Debug for MaskListFull<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskListFull").finish_non_exhaustive()
    }
}

impl<M> fmt::Display for MaskListFull<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {MAX_ACTIVE_MASKS} mask slots are in use")
    }
}

impl<M> core::error::Error for MaskListFull<M> {}

/// Fixed-capacity list of active masks, combined by intersection.
///
/// Each mask lives in a numbered slot; the slot index returned by
/// [`add`](Self::add) is the handle for [`remove`](Self::remove). Removing a
/// mask leaves a hole that the next `add` fills.
///
/// # Example
///
/// ```
/// use understory_area::Area;
/// use understory_mask::{ActiveMaskList, CircleCache, MaskResult, RadiusMask};
///
/// let mut cache = CircleCache::new();
/// let mut masks = ActiveMaskList::new();
/// let id = masks
///     .add(RadiusMask::new(Area::new(0, 0, 32, 32), 6, false, &mut cache).into())
///     .unwrap();
///
/// let mut row = [255_u8; 32];
/// assert_eq!(masks.query(&mut row, 0, 100), MaskResult::Transparent);
///
/// masks.remove(id);
/// assert!(masks.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ActiveMaskList {
    slots: [Option<Mask>; MAX_ACTIVE_MASKS],
}

impl ActiveMaskList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates `mask` in the first free slot and returns the slot index.
    ///
    /// # Errors
    ///
    /// Returns [`MaskListFull`] carrying the mask back when all
    /// [`MAX_ACTIVE_MASKS`] slots are occupied.
    pub fn add(&mut self, mask: Mask) -> Result<usize, MaskListFull> {
        let Some((id, slot)) = self.slots.iter_mut().enumerate().find(|(_, s)| s.is_none())
        else {
            log::warn!("mask list full, rejecting mask");
            return Err(MaskListFull { mask });
        };
        *slot = Some(mask);
        Ok(id)
    }

    /// Deactivates and returns the mask in slot `id`.
    ///
    /// Out-of-range or empty slots are ignored.
    pub fn remove(&mut self, id: usize) -> Option<Mask> {
        self.slots.get_mut(id).and_then(Option::take)
    }

    /// Deactivates every mask.
    pub fn remove_all(&mut self) {
        self.slots = Default::default();
    }

    /// The mask in slot `id`, if any.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&Mask> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    /// Number of active masks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Returns `true` if no mask is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Returns `true` if any mask is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_empty()
    }

    /// Returns `true` if drawing into `area` has to consult the masks.
    ///
    /// Every active mask is treated as relevant regardless of where it lies,
    /// so this is `true` whenever the list is non-empty.
    #[must_use]
    pub fn is_active_for(&self, area: &Area) -> bool {
        let _ = area;
        self.is_active()
    }

    /// Active masks with their slot indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Mask)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.as_ref().map(|m| (id, m)))
    }

    /// Narrows `buf` by every active mask for the span at `(x, y)`.
    ///
    /// Stops at the first [`MaskResult::Transparent`]. Returns
    /// [`MaskResult::Changed`] if any mask modified the buffer and
    /// [`MaskResult::FullCover`] otherwise, including for an empty list.
    pub fn query(&self, buf: &mut [Opa], x: i32, y: i32) -> MaskResult {
        let mut changed = false;
        for (_, mask) in self.iter() {
            match mask.query(buf, x, y) {
                MaskResult::Transparent => return MaskResult::Transparent,
                MaskResult::Changed => changed = true,
                MaskResult::FullCover | MaskResult::Unknown => {}
            }
        }
        if changed {
            MaskResult::Changed
        } else {
            MaskResult::FullCover
        }
    }
}
