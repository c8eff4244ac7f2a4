// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded ring of pending dirty areas.

use understory_area::Area;

/// Number of ring slots used by [`DirtyQueue`] unless specified otherwise.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// What [`DirtyQueue::invalidate`] did with an area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invalidation {
    /// The area became independently pending in `slot`.
    Queued {
        /// Ring slot holding the area.
        slot: usize,
    },
    /// The area touched the pending area in `slot` and was unioned into it.
    Merged {
        /// Ring slot that absorbed the area.
        slot: usize,
    },
    /// The queue was full and the area was unioned into the pending slot
    /// whose bounds grew the least.
    ForcedMerge {
        /// Ring slot that absorbed the area.
        slot: usize,
    },
    /// The area covers no pixel.
    Ignored,
}

/// A fixed-capacity FIFO of dirty areas that coalesces overlapping entries.
///
/// The queue is a ring of `N` slots with a write index and a read index;
/// equal indices mean "empty", so at most `N - 1` areas are pending at once.
/// A new area that touches a pending one is unioned into the first such slot
/// instead of taking a slot of its own. When that union grows into later
/// pending slots, those are folded in as well and flagged as joined: they
/// stay in the ring but carry no work and are skipped by
/// [`next_pending_area`](Self::next_pending_area).
///
/// When the ring is full and nothing overlaps, the area is unioned into the
/// pending slot whose bounds grow the least. Nothing is dropped.
///
/// # Example
///
/// ```
/// use understory_area::Area;
/// use understory_refresh::{DirtyQueue, Invalidation};
///
/// let mut queue = DirtyQueue::<8>::new();
/// queue.invalidate(Area::new(0, 0, 10, 10));
/// assert_eq!(
///     queue.invalidate(Area::new(5, 5, 10, 10)),
///     Invalidation::Merged { slot: 0 }
/// );
/// assert_eq!(queue.next_pending_area(), Some(Area::new(0, 0, 15, 15)));
/// queue.pop();
/// assert!(!queue.has_pending());
/// ```
#[derive(Clone, Debug)]
pub struct DirtyQueue<const N: usize = DEFAULT_QUEUE_CAPACITY> {
    areas: [Area; N],
    joined: [bool; N],
    idx_w: usize,
    idx_r: usize,
}

impl<const N: usize> Default for DirtyQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> DirtyQueue<N> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        const { assert!(N >= 2, "a dirty queue needs at least two slots") };
        Self {
            areas: [Area::ZERO; N],
            joined: [false; N],
            idx_w: 0,
            idx_r: 0,
        }
    }

    #[inline]
    const fn advance(i: usize) -> usize {
        if i + 1 >= N { 0 } else { i + 1 }
    }

    /// Slots between the read and write index, oldest first.
    fn occupied(&self) -> impl Iterator<Item = usize> + '_ {
        let len = (self.idx_w + N - self.idx_r) % N;
        (0..len).map(move |k| (self.idx_r + k) % N)
    }

    /// Occupied slots that still carry work.
    fn live(&self) -> impl Iterator<Item = usize> + '_ {
        self.occupied().filter(|&i| !self.joined[i])
    }

    /// Pops joined slots off the read end.
    fn skip_joined(&mut self) {
        while self.idx_r != self.idx_w && self.joined[self.idx_r] {
            self.pop();
        }
    }

    /// Reports `area` as needing a redraw.
    pub fn invalidate(&mut self, area: Area) -> Invalidation {
        if area.is_empty() {
            return Invalidation::Ignored;
        }
        self.skip_joined();

        let hit = self.live().find(|&i| self.areas[i].is_on(&area));
        if let Some(slot) = hit {
            self.absorb(slot, area);
            return Invalidation::Merged { slot };
        }

        let next = Self::advance(self.idx_w);
        if next == self.idx_r {
            let cheapest = self.live().min_by_key(|&i| {
                let current = self.areas[i].pixel_count();
                self.areas[i].union(&area).pixel_count().saturating_sub(current)
            });
            if let Some(slot) = cheapest {
                log::warn!("dirty queue full, merging {area:?} into slot {slot}");
                self.absorb(slot, area);
                return Invalidation::ForcedMerge { slot };
            }
        }

        let slot = self.idx_w;
        self.areas[slot] = area;
        self.joined[slot] = false;
        self.idx_w = next;
        Invalidation::Queued { slot }
    }

    /// Unions `area` into `slot`, then folds every later live slot the grown
    /// area touches into it.
    fn absorb(&mut self, slot: usize, area: Area) {
        self.areas[slot] = self.areas[slot].union(&area);
        let start = (slot + N - self.idx_r) % N + 1;
        let len = (self.idx_w + N - self.idx_r) % N;
        for k in start..len {
            let j = (self.idx_r + k) % N;
            if !self.joined[j] && self.areas[slot].is_on(&self.areas[j]) {
                self.areas[slot] = self.areas[slot].union(&self.areas[j]);
                self.joined[j] = true;
            }
        }
    }

    /// Returns `true` if the ring holds any slot, joined or not.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.idx_w != self.idx_r
    }

    /// The oldest area that still needs flushing, without removing it.
    ///
    /// Joined slots in front of it are popped on the way.
    pub fn next_pending_area(&mut self) -> Option<Area> {
        self.skip_joined();
        self.has_pending().then(|| self.areas[self.idx_r])
    }

    /// Removes the oldest slot. Does nothing on an empty queue.
    pub fn pop(&mut self) {
        if !self.has_pending() {
            return;
        }
        self.joined[self.idx_r] = false;
        self.idx_r = Self::advance(self.idx_r);
    }

    /// Drops every pending area.
    pub fn reset(&mut self) {
        self.areas = [Area::ZERO; N];
        self.joined = [false; N];
        self.idx_w = 0;
        self.idx_r = 0;
    }

    /// Number of areas still carrying work.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live().count()
    }

    /// Returns `true` if no area carries work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live().next().is_none()
    }

    /// Maximum number of independently pending areas, `N - 1`.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Pending areas that still carry work, oldest first.
    pub fn iter_pending(&self) -> impl Iterator<Item = Area> + '_ {
        self.live().map(|i| self.areas[i])
    }
}
