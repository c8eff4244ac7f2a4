// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Area: integer geometry and fixed-point primitives for raster code.
//!
//! This crate is the leaf of the Understory raster stack. It provides:
//!
//! - [`Area`]: an integer `{x, y, w, h}` rectangle with the intersection,
//!   union ("join"), overlap ("is on") and alignment helpers used by the mask,
//!   blend, and refresh crates.
//! - [`Point`]: an integer pixel coordinate.
//! - Opacity constants ([`OPA_MIN`], [`OPA_MAX`], [`OPA_COVER`], ...) and the
//!   255-denominator fixed-point helpers [`udiv255`], [`per_255`] and
//!   [`scale_opa`].
//! - Table-driven integer trigonometry ([`sin`], [`cos`], [`atan2`]) in whole
//!   degrees, as consumed by line and angle masks.
//!
//! Everything here is integer-only. Floating point appears solely at the
//! [`kurbo`] interop boundary.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_area::{Area, udiv255};
//!
//! let a = Area::new(0, 0, 10, 10);
//! let b = Area::new(5, 5, 10, 10);
//!
//! assert!(a.is_on(&b));
//! assert_eq!(a.intersect(&b), Some(Area::new(5, 5, 5, 5)));
//! assert_eq!(a.union(&b), Area::new(0, 0, 15, 15));
//!
//! // Origin rounds down, size rounds up to cover the original extent.
//! assert_eq!(Area::new(3, 5, 6, 2).align(4, 4), Area::new(0, 4, 12, 4));
//!
//! // Exact for every product of two 8-bit values.
//! assert_eq!(udiv255(255 * 128), 128);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std`. Enable either the `std` (default) or `libm` feature
//! so that [`kurbo`] can round floating-point rectangles.

#![no_std]

mod area;
mod fixed;
mod trig;

pub use area::{Area, Point};
pub use fixed::{
    OPA_50, OPA_COVER, OPA_MAX, OPA_MIN, OPA_TRANSP, Opa, map, per_255, scale_opa, udiv255,
};
pub use trig::{SIN_AMPLITUDE, atan2, cos, sin};
