// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Refresh: dirty-rectangle tracking and flush scheduling.
//!
//! Drawing code reports rectangles that changed; a periodic tick picks them
//! up one at a time and hands them to the panel. This crate provides:
//!
//! - [`DirtyQueue`]: a bounded ring of pending areas. Overlapping or touching
//!   areas are coalesced into one, and a full queue coalesces instead of
//!   dropping work.
//! - [`Display`]: one display's refresh state machine
//!   ([`Idle`](DisplayState::Idle), [`Pending`](DisplayState::Pending),
//!   [`Flushing`](DisplayState::Flushing)) with alignment, clipping, banding
//!   and a scrollable active window.
//! - [`FlushTarget`]: the panel collaborator, implemented for closures.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_area::Area;
//! use understory_refresh::{Display, RefreshConfig};
//!
//! let mut display: Display = Display::new(RefreshConfig::new(240, 320).with_align(2, 1));
//!
//! // Two overlapping widgets changed; they are flushed as one area.
//! display.invalidate(Area::new(10, 10, 40, 20));
//! display.invalidate(Area::new(30, 20, 40, 20));
//! assert_eq!(display.queue().len(), 1);
//!
//! let mut flushed = Vec::new();
//! while display.has_pending() {
//!     display.refresh_tick(&mut |band: Area| flushed.push(band));
//! }
//! assert_eq!(flushed, [Area::new(10, 10, 60, 30)]);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod display;
mod queue;

pub use display::{
    Display, DisplayState, FlushStatus, FlushTarget, RefreshConfig, RefreshStats, TickOutcome,
};
pub use queue::{DEFAULT_QUEUE_CAPACITY, DirtyQueue, Invalidation};
