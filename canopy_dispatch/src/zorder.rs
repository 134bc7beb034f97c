// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validated stacking depth for views.

use tracing::warn;

/// Stacking depth of a view, valid over `[0, 650]`.
///
/// Higher values stack nearer the user; [`Zorder::GUI_TOP`] is the
/// conventional always-on-top value for GUI overlays, deliberately below
/// [`Zorder::MAX`] so diagnostics can still stack above it. Construction
/// never fails: out-of-range values are clamped to the nearest bound and
/// logged.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Zorder(i32);

impl Zorder {
    /// The lowest valid depth.
    pub const MIN: Self = Self(0);
    /// The highest valid depth.
    pub const MAX: Self = Self(650);
    /// Conventional always-on-top depth for GUI overlays.
    pub const GUI_TOP: Self = Self(640);

    /// Build a depth from a raw value, clamping into `[0, 650]`.
    pub fn new(value: i32) -> Self {
        if value < Self::MIN.0 {
            warn!(value, clamped = Self::MIN.0, "z-order below range");
            Self::MIN
        } else if value > Self::MAX.0 {
            warn!(value, clamped = Self::MAX.0, "z-order above range");
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// The wrapped depth value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for Zorder {
    fn default() -> Self {
        Self::MIN
    }
}
