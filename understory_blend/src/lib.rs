// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Blend: integer compositing loops for small frame buffers.
//!
//! Everything here writes into a caller-owned [`DrawBuffer`] of one of two
//! pixel formats:
//!
//! - [`Color32`]: ARGB8888.
//! - [`Color16`]: RGB565, with opacity supplied separately.
//!
//! Both implement [`Pixel`], whose `mix` is a per-channel interpolation
//! divided by 255 through [`udiv255`](understory_area::udiv255). Results are
//! bit-exact across platforms.
//!
//! Entry points:
//!
//! - [`blend()`]: solid fills and images, with an optional per-pixel coverage
//!   mask and overall opacity.
//! - [`blend_text`]: 1, 2, 3 or 4 bit grayscale glyphs ([`GlyphBitmap`]).
//! - [`blend_over`]: translucent ARGB onto translucent ARGB using the
//!   [`over()`] operator, memoized by [`OverCache`].
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_area::Area;
//! use understory_blend::{BlendDesc, Color32, DrawBuffer, Pixel, blend};
//!
//! let mut pixels = vec![Color32::WHITE; 64 * 64];
//! let mut buf = DrawBuffer::new(&mut pixels, Area::new(0, 0, 64, 64));
//!
//! let red = Area::new(16, 16, 32, 32);
//! blend(&mut buf, &BlendDesc::fill(red, Color32::RED).with_opa(128));
//!
//! assert_eq!(buf.pixel(20, 20), Some(Color32::RED.mix(Color32::WHITE, 128)));
//! assert_eq!(buf.pixel(0, 0), Some(Color32::WHITE));
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod blend;
mod color;
mod over;
mod text;

pub use blend::{BlendDesc, DrawBuffer, blend, blend_over};
pub use color::{Color16, Color32, Pixel, mix};
pub use over::{OverCache, over};
pub use text::{Bpp, GlyphBitmap, ScanOrder, blend_text, bytes_per_row};
