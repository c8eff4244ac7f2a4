// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small shared cache of circle profiles.

use alloc::sync::Arc;

use crate::profile::CircleProfile;

/// Number of profiles the cache keeps alive between uses.
pub const CIRCLE_CACHE_SLOTS: usize = 4;

/// Upper bound of a slot's heat.
pub const CIRCLE_HEAT_MAX: u16 = 1000;

#[derive(Clone, Debug, Default)]
struct Slot {
    profile: Option<Arc<CircleProfile>>,
    heat: u16,
}

impl Slot {
    fn users(&self) -> usize {
        self.profile
            .as_ref()
            .map_or(0, |p| Arc::strong_count(p).saturating_sub(1))
    }

    fn age(&mut self, radius: u16) {
        let gain = if radius < 16 { 1 } else { radius >> 4 };
        self.heat = self.heat.saturating_add(gain).min(CIRCLE_HEAT_MAX);
    }
}

/// Reference-counted cache of [`CircleProfile`]s keyed by radius.
///
/// Every [`RadiusMask`](crate::RadiusMask) holds an [`Arc`] to its profile,
/// so a slot has as many users as there are live masks of that radius.
/// Reusing a radius raises the slot's *heat*; heavier radii heat up faster.
/// A new radius takes over the coldest slot without users. When all slots
/// are in use the profile is built as a one-shot: it is handed to the mask
/// but not cached, and it is freed when the last mask using it is dropped.
///
/// # Example
///
/// ```
/// use understory_mask::CircleCache;
///
/// let mut cache = CircleCache::new();
/// let a = cache.acquire(12).unwrap();
/// let b = cache.acquire(12).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// assert_eq!(cache.users(12), 2);
///
/// drop((a, b));
/// assert_eq!(cache.users(12), 0);
/// assert!(cache.is_cached(12));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CircleCache {
    slots: [Slot; CIRCLE_CACHE_SLOTS],
}

impl CircleCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the profile for `radius`, building it if needed.
    ///
    /// Returns `None` for radius `0` and when the profile storage cannot be
    /// allocated; the failure is logged and callers fall back to square
    /// corners.
    pub fn acquire(&mut self, radius: u16) -> Option<Arc<CircleProfile>> {
        if radius == 0 {
            return None;
        }

        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.profile.as_ref().is_some_and(|p| p.radius() == radius))
        {
            slot.age(radius);
            return slot.profile.clone();
        }

        let profile = match CircleProfile::build(radius) {
            Ok(p) => Arc::new(p),
            Err(err) => {
                log::error!("{err}");
                return None;
            }
        };

        let mut coldest: Option<&mut Slot> = None;
        for slot in &mut self.slots {
            if slot.users() != 0 {
                continue;
            }
            if coldest.as_ref().is_none_or(|c| slot.heat < c.heat) {
                coldest = Some(slot);
            }
        }

        match coldest {
            Some(slot) => {
                if let Some(old) = &slot.profile {
                    log::debug!("evicting circle profile r={} for r={radius}", old.radius());
                }
                slot.profile = Some(Arc::clone(&profile));
                slot.heat = 0;
                slot.age(radius);
            }
            None => {
                log::debug!("circle cache full, building one-shot profile r={radius}");
            }
        }
        Some(profile)
    }

    /// Returns `true` if a profile for `radius` is currently cached.
    #[must_use]
    pub fn is_cached(&self, radius: u16) -> bool {
        self.slot(radius).is_some()
    }

    /// Number of live masks using the cached profile for `radius`.
    ///
    /// One-shot profiles are not tracked and report `0`.
    #[must_use]
    pub fn users(&self, radius: u16) -> usize {
        self.slot(radius).map_or(0, Slot::users)
    }

    /// Heat of the cached profile for `radius`, if cached.
    #[must_use]
    pub fn heat(&self, radius: u16) -> Option<u16> {
        self.slot(radius).map(|s| s.heat)
    }

    /// Radii of all cached profiles, in slot order.
    pub fn cached_radii(&self) -> impl Iterator<Item = u16> + '_ {
        self.slots
            .iter()
            .filter_map(|s| s.profile.as_ref().map(|p| p.radius()))
    }

    /// Drops every cached profile that no mask is using.
    pub fn purge_unused(&mut self) {
        for slot in &mut self.slots {
            if slot.users() == 0 {
                *slot = Slot::default();
            }
        }
    }

    fn slot(&self, radius: u16) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|s| s.profile.as_ref().is_some_and(|p| p.radius() == radius))
    }
}
