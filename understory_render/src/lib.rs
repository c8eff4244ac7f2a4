// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Render: one owned context per display for masked drawing and
//! refresh.
//!
//! [`RenderContext`] bundles the pieces the lower crates keep separate:
//!
//! - the [`CircleCache`](understory_mask::CircleCache) shared by all
//!   rounded-rectangle masks,
//! - the [`ActiveMaskList`](understory_mask::ActiveMaskList) applied to every
//!   draw call,
//! - the [`Display`](understory_refresh::Display) refresh state.
//!
//! Draw calls ([`fill`](RenderContext::fill), [`blend`](RenderContext::blend),
//! [`blend_text`](RenderContext::blend_text)) narrow each row's coverage with
//! the active masks before compositing it into the caller's
//! [`DrawBuffer`](understory_blend::DrawBuffer). Independent contexts share
//! nothing, so each display gets its own.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_area::Area;
//! use understory_blend::{Color32, DrawBuffer};
//! use understory_refresh::RefreshConfig;
//! use understory_render::RenderContext;
//!
//! let mut ctx: RenderContext = RenderContext::new(RefreshConfig::new(64, 64));
//! let card = Area::new(8, 8, 48, 48);
//!
//! let mut pixels = vec![Color32::WHITE; 64 * 64];
//! let mut buf = DrawBuffer::new(&mut pixels, Area::new(0, 0, 64, 64));
//!
//! let mask = ctx.radius_mask(card, 12, false);
//! let id = ctx.add_mask(mask).unwrap();
//! ctx.fill(&mut buf, card, Color32::RED, 255);
//! ctx.remove_mask(id);
//!
//! assert_eq!(buf.pixel(8, 8), Some(Color32::WHITE));
//! assert_eq!(buf.pixel(32, 32), Some(Color32::RED));
//!
//! ctx.invalidate(card);
//! let mut flushed = Vec::new();
//! ctx.refresh_tick(&mut |band: Area| flushed.push(band));
//! assert_eq!(flushed, [card]);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc` for a scratch coverage row.

#![no_std]

extern crate alloc;

mod context;

pub use context::RenderContext;
