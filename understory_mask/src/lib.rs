// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Mask: per-scanline coverage masks for software rasterizers.
//!
//! A mask answers one question: given a horizontal span of pixels, how much of
//! each pixel survives clipping? Masks narrow a caller-owned coverage buffer
//! in place and report a [`MaskResult`] so callers can skip spans that are
//! fully hidden or fully visible without touching the buffer at all.
//!
//! - [`RadiusMask`]: rounded rectangle, keeping the inside or the outside.
//!   Corner anti-aliasing comes from a [`CircleProfile`], shared between masks
//!   of the same radius through a [`CircleCache`].
//! - [`LineMask`]: half-plane bounded by a line, with an anti-aliased edge.
//! - [`AngleMask`]: wedge between two rays from a common vertex.
//! - [`ActiveMaskList`]: up to [`MAX_ACTIVE_MASKS`] masks combined by
//!   intersection.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_area::{Area, Point};
//! use understory_mask::{ActiveMaskList, AngleMask, CircleCache, MaskResult, RadiusMask};
//!
//! let mut cache = CircleCache::new();
//! let mut masks = ActiveMaskList::new();
//!
//! // Rounded 40x40 card with 8px corners.
//! masks
//!     .add(RadiusMask::new(Area::new(0, 0, 40, 40), 8, false, &mut cache).into())
//!     .unwrap();
//! // Only the lower-right quadrant around the card's center.
//! masks.add(AngleMask::new(Point::new(20, 20), 0, 90).into()).unwrap();
//!
//! let mut row = [255_u8; 40];
//! assert_eq!(masks.query(&mut row, 0, 10), MaskResult::Transparent);
//!
//! let mut row = [255_u8; 40];
//! assert_eq!(masks.query(&mut row, 0, 30), MaskResult::Changed);
//! assert_eq!(row[10], 0);
//! assert_eq!(row[30], 255);
//! ```
//!
//! ## Combining coverage
//!
//! Overlapping masks combine by taking the minimum coverage. With the
//! `multiply_mask_mix` feature they multiply instead, which darkens
//! overlapping anti-aliased edges slightly more.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc` for circle profiles.

#![no_std]

extern crate alloc;

mod angle;
mod cache;
mod line;
mod list;
mod mask;
mod profile;
mod radius;

pub use angle::AngleMask;
pub use cache::{CIRCLE_CACHE_SLOTS, CIRCLE_HEAT_MAX, CircleCache};
pub use line::{LineMask, LineSide};
pub use list::{ActiveMaskList, MAX_ACTIVE_MASKS, MaskListFull};
pub use mask::{Mask, MaskResult};
pub use profile::{CircleProfile, ProfileAllocError};
pub use radius::RadiusMask;
