// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the widget tree: identifiers, flags, and creation specs.

use kurbo::{Point, Size};

/// Identifier for a widget in the tree.
///
/// This is a small, copyable handle that stays stable across updates but
/// becomes invalid when the underlying slot is reused. It consists of a slot
/// index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `WidgetId` that pointed to
///   that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a
///   new, distinct `WidgetId`.
///
/// ### Liveness
///
/// Use [`WidgetTree::is_alive`](crate::tree::WidgetTree::is_alive) to check
/// whether a `WidgetId` still refers to a live widget. Stale ids never alias
/// a different live widget because the generation must match; mutation
/// through a stale id is a silent no-op.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct WidgetId(pub(crate) u32, pub(crate) u32);

impl WidgetId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Widget flags controlling visibility, input, and highlight state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u16 {
        /// Widget is visible (participates in hit testing and receives input).
        const VISIBLE        = 0b0000_0001;
        /// Widget can take keyboard focus. Set implicitly when a keyboard
        /// listener is registered.
        const FOCUSABLE      = 0b0000_0010;
        /// Widget reacts to hover/focus highlighting.
        const HIGHLIGHTABLE  = 0b0000_0100;
        /// Widget is currently highlighted. Shared between hover and focus;
        /// a focused widget and a hovered one are visually indistinguishable.
        const HIGHLIGHTED    = 0b0000_1000;
        /// Pointer is currently over the widget.
        const MOUSE_OVER     = 0b0001_0000;
        /// Widget never contains any point (input-transparent), without
        /// removing it from the tree.
        const HIT_TRANSPARENT = 0b0010_0000;
        /// Registered empty zones are consulted during hit testing.
        const EMPTY_ZONES    = 0b0100_0000;
        /// A left click is being held on this widget (armed until release).
        const CLICK_ARMED    = 0b1000_0000;
        /// Widget owns ordered children and participates in focus traversal
        /// as a nested container.
        const CONTAINER      = 0b1_0000_0000;
    }
}

impl Default for WidgetFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::HIGHLIGHTABLE | Self::EMPTY_ZONES
    }
}

/// Creation-time data for a widget.
#[derive(Clone, Debug)]
pub struct WidgetSpec {
    /// Absolute position of the top-left corner.
    pub origin: Point,
    /// Rendered size.
    pub size: Size,
    /// Opacity in percent, clamped to `0..=100`.
    pub opacity: u8,
    /// Initial flags.
    pub flags: WidgetFlags,
}

impl Default for WidgetSpec {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            size: Size::ZERO,
            opacity: 100,
            flags: WidgetFlags::default(),
        }
    }
}

/// Error returned when a widget name is already registered.
///
/// Names are process-unique within one [`WidgetTree`](crate::tree::WidgetTree)
/// and back the by-name lookup registry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DuplicateName(pub alloc::string::String);

impl core::fmt::Display for DuplicateName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "widget name {:?} is already registered", self.0)
    }
}

impl core::error::Error for DuplicateName {}
