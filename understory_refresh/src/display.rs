// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-display refresh scheduling.

use understory_area::Area;

use crate::queue::{DEFAULT_QUEUE_CAPACITY, DirtyQueue, Invalidation};

/// Static refresh parameters of a display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshConfig {
    /// Screen size in pixels.
    pub resolution: (u32, u32),
    /// Flushed areas are widened to multiples of this many columns.
    pub align_x: u32,
    /// Flushed areas are widened to multiples of this many rows.
    pub align_y: u32,
    /// Maximum number of rows handed to the flush target at once.
    pub flush_lines: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new(800, 480)
    }
}

impl RefreshConfig {
    /// A `width` × `height` screen flushed in one band without alignment.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: (width, height),
            align_x: 1,
            align_y: 1,
            flush_lines: height,
        }
    }

    /// Sets the flush alignment.
    #[must_use]
    pub const fn with_align(mut self, align_x: u32, align_y: u32) -> Self {
        self.align_x = align_x;
        self.align_y = align_y;
        self
    }

    /// Sets the band height.
    #[must_use]
    pub const fn with_flush_lines(mut self, flush_lines: u32) -> Self {
        self.flush_lines = flush_lines;
        self
    }

    /// The whole screen, anchored at the origin.
    #[must_use]
    pub fn screen(&self) -> Area {
        let (w, h) = self.resolution;
        Area::new(
            0,
            0,
            i32::try_from(w).unwrap_or(i32::MAX),
            i32::try_from(h).unwrap_or(i32::MAX),
        )
    }
}

/// Whether the flush target finished with a band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushStatus {
    /// The band has been written to the panel.
    Done,
    /// The band is still being transferred; the display stays busy until
    /// [`Display::flush_ready`] is called.
    InProgress,
}

/// The panel side of a refresh: receives screen bands to redraw and send.
///
/// Closures taking an [`Area`] implement this and always report
/// [`FlushStatus::Done`].
pub trait FlushTarget {
    /// Redraws and transfers `band`, given in screen coordinates.
    fn flush(&mut self, band: Area) -> FlushStatus;
}

impl<F: FnMut(Area)> FlushTarget for F {
    fn flush(&mut self, band: Area) -> FlushStatus {
        self(band);
        FlushStatus::Done
    }
}

/// Where a display is in its refresh cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayState {
    /// Nothing to do.
    Idle,
    /// Areas are waiting for the next tick.
    Pending,
    /// A flush is in progress.
    Flushing,
}

/// What one [`Display::refresh_tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No area was pending.
    Idle,
    /// The previous flush has not completed; nothing was done.
    Busy,
    /// The pending area lay entirely off screen and was discarded.
    Skipped(Area),
    /// `area` (aligned and clipped, in screen coordinates) was handed to the
    /// target in `bands` bands.
    Flushed {
        /// The flushed screen area.
        area: Area,
        /// Number of [`FlushTarget::flush`] calls.
        bands: u32,
    },
}

/// Counters describing how a display's queue has been used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshStats {
    /// Calls to [`Display::refresh_tick`].
    pub ticks: u64,
    /// Areas handed to the flush target.
    pub flushed: u64,
    /// Bands handed to the flush target.
    pub bands: u64,
    /// Areas discarded because they were off screen.
    pub skipped: u64,
    /// Ticks rejected while a flush was in progress.
    pub busy: u64,
    /// Invalidations coalesced into an overlapping pending area.
    pub merged: u64,
    /// Invalidations coalesced because the queue was full.
    pub forced_merges: u64,
}

/// Refresh state of one display.
///
/// Dirty areas are reported in content coordinates. The display shows the
/// `resolution`-sized active window of that content, which can be scrolled
/// within [`bounds`](Self::bounds). Each [`refresh_tick`](Self::refresh_tick)
/// flushes at most one pending area.
///
/// # Example
///
/// ```
/// use understory_area::Area;
/// use understory_refresh::{Display, RefreshConfig, TickOutcome};
///
/// let mut display = Display::<8>::new(RefreshConfig::new(320, 240).with_flush_lines(40));
/// display.invalidate(Area::new(10, 10, 50, 100));
///
/// let mut bands = Vec::new();
/// let outcome = display.refresh_tick(&mut |band: Area| bands.push(band));
/// assert_eq!(
///     outcome,
///     TickOutcome::Flushed { area: Area::new(10, 10, 50, 100), bands: 3 }
/// );
/// assert_eq!(bands[2], Area::new(10, 90, 50, 20));
/// assert_eq!(display.refresh_tick(&mut |_: Area| {}), TickOutcome::Idle);
/// ```
#[derive(Clone, Debug)]
pub struct Display<const N: usize = DEFAULT_QUEUE_CAPACITY> {
    config: RefreshConfig,
    queue: DirtyQueue<N>,
    active: Area,
    bounds: Area,
    flushing: bool,
    stats: RefreshStats,
}

impl<const N: usize> Display<N> {
    /// Creates an idle display showing the content origin.
    #[must_use]
    pub fn new(config: RefreshConfig) -> Self {
        let screen = config.screen();
        Self {
            config,
            queue: DirtyQueue::new(),
            active: screen,
            bounds: screen,
            flushing: false,
            stats: RefreshStats::default(),
        }
    }

    /// The refresh parameters.
    #[must_use]
    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// The dirty queue.
    #[must_use]
    pub fn queue(&self) -> &DirtyQueue<N> {
        &self.queue
    }

    /// Usage counters.
    #[must_use]
    pub fn stats(&self) -> &RefreshStats {
        &self.stats
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> DisplayState {
        if self.flushing {
            DisplayState::Flushing
        } else if self.queue.has_pending() {
            DisplayState::Pending
        } else {
            DisplayState::Idle
        }
    }

    /// Returns `true` if any area is waiting to be flushed.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.queue.has_pending()
    }

    /// Reports `area`, in content coordinates, as needing a redraw.
    pub fn invalidate(&mut self, area: Area) -> Invalidation {
        let res = self.queue.invalidate(area);
        match res {
            Invalidation::Merged { .. } => self.stats.merged += 1,
            Invalidation::ForcedMerge { .. } => self.stats.forced_merges += 1,
            Invalidation::Queued { .. } | Invalidation::Ignored => {}
        }
        res
    }

    /// Invalidates the whole visible window.
    pub fn invalidate_all(&mut self) -> Invalidation {
        self.invalidate(self.active)
    }

    /// The part of the content currently on screen.
    #[must_use]
    pub fn active_area(&self) -> Area {
        self.active
    }

    /// The extent the active window may scroll within.
    #[must_use]
    pub fn bounds(&self) -> Area {
        self.bounds
    }

    /// Replaces the scrollable extent.
    pub fn set_bounds(&mut self, bounds: Area) {
        self.bounds = bounds;
    }

    /// Grows the scrollable extent to include `area`.
    pub fn extend_bounds(&mut self, area: Area) {
        if !area.is_empty() {
            self.bounds = self.bounds.union(&area);
        }
    }

    /// Moves the active window to `(x, y)`, clamped into
    /// [`bounds`](Self::bounds).
    ///
    /// Everything pending is dropped and the new window is invalidated as a
    /// whole. Returns the new active window.
    pub fn scroll_to(&mut self, x: i32, y: i32) -> Area {
        let b = self.bounds;
        let x = clamp_axis(x, self.active.w, b.x, b.x2());
        let y = clamp_axis(y, self.active.h, b.y, b.y2());
        self.active = Area::new(x, y, self.active.w, self.active.h);
        log::debug!("scrolled active window to {:?}", self.active);
        self.queue.reset();
        self.invalidate(self.active);
        self.active
    }

    /// Marks an asynchronous flush as finished.
    pub fn flush_ready(&mut self) {
        self.flushing = false;
    }

    /// Flushes the oldest pending area.
    ///
    /// The area is moved into screen coordinates, aligned, clipped to the
    /// screen, and handed to `target` in bands of at most
    /// [`flush_lines`](RefreshConfig::flush_lines) rows. It is removed from
    /// the queue afterwards. While a previous flush is still in progress
    /// the tick does nothing and returns [`TickOutcome::Busy`].
    pub fn refresh_tick(&mut self, target: &mut impl FlushTarget) -> TickOutcome {
        self.stats.ticks += 1;
        if self.flushing {
            log::debug!("refresh tick while flushing, display busy");
            self.stats.busy += 1;
            return TickOutcome::Busy;
        }
        let Some(dirty) = self.queue.next_pending_area() else {
            return TickOutcome::Idle;
        };

        let screen_area = dirty
            .translate(-self.active.x, -self.active.y)
            .align(self.config.align_x, self.config.align_y);
        let (w, h) = self.config.resolution;
        let Some(area) = screen_area.clip_to_screen(w, h) else {
            self.queue.pop();
            self.stats.skipped += 1;
            return TickOutcome::Skipped(dirty);
        };

        self.flushing = true;
        let lines = i32::try_from(self.config.flush_lines.max(1)).unwrap_or(i32::MAX);
        let mut bands = 0_u32;
        let mut in_progress = false;
        let mut y = area.y;
        while y < area.y2() {
            let band = Area::new(area.x, y, area.w, lines.min(area.y2() - y));
            log::trace!("flushing band {band:?}");
            if target.flush(band) == FlushStatus::InProgress {
                in_progress = true;
            }
            bands += 1;
            y = y.saturating_add(lines);
        }
        self.queue.pop();
        self.flushing = in_progress;

        self.stats.flushed += 1;
        self.stats.bands += u64::from(bands);
        TickOutcome::Flushed { area, bands }
    }
}

/// Clamps a window of `len` starting at `pos` into `lo..hi`.
///
/// A window longer than the range is pinned at `0` rather than at `lo`.
fn clamp_axis(pos: i32, len: i32, lo: i32, hi: i32) -> i32 {
    if pos < lo {
        lo
    } else if pos.saturating_add(len) > hi {
        if len < hi {
            hi - len
        } else if pos > 0 {
            0
        } else {
            pos
        }
    } else {
        pos
    }
}
