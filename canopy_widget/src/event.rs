// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events and listener registries.
//!
//! Pointer handlers observe a [`PointerEvent`]; keyboard handlers observe a
//! [`KeyInput`] and report whether they consumed it (unconsumed key input
//! bubbles to the parent container). Listener lists run in registration
//! order. Handlers receive only the event; they cannot re-enter the tree
//! during dispatch.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};

/// Pointer event kinds a widget can listen for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerKind {
    /// Left button click.
    LeftClick,
    /// Left button double click.
    DoubleLeftClick,
    /// Right button click.
    RightClick,
    /// Button release.
    Release,
    /// Pointer movement.
    Move,
    /// Pointer movement with a button held.
    Drag,
    /// Wheel scroll.
    Wheel,
}

/// A pointer event: position plus the fields specific kinds carry.
///
/// `delta` is meaningful for [`PointerKind::Drag`], `scroll` for
/// [`PointerKind::Wheel`]; both are zero otherwise.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in absolute pixels.
    pub pos: Point,
    /// Movement since the previous drag event.
    pub delta: Vec2,
    /// Scroll amount (positive away from the user).
    pub scroll: f64,
}

impl PointerEvent {
    /// An event at `pos` with no delta or scroll.
    pub fn at(pos: Point) -> Self {
        Self {
            pos,
            delta: Vec2::ZERO,
            scroll: 0.0,
        }
    }

    /// Attach a drag delta.
    pub fn with_delta(mut self, delta: Vec2) -> Self {
        self.delta = delta;
        self
    }

    /// Attach a wheel scroll amount.
    pub fn with_scroll(mut self, scroll: f64) -> Self {
        self.scroll = scroll;
        self
    }
}

/// A non-character key, carried as a raw code so the input source's key map
/// passes through unchanged.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SpecialKey(pub u16);

impl SpecialKey {
    /// Tab, the conventional focus-advance key.
    pub const TAB: Self = Self(0x0F);
    /// Enter.
    pub const ENTER: Self = Self(0x1C);
    /// Escape.
    pub const ESCAPE: Self = Self(0x01);
    /// Backspace.
    pub const BACKSPACE: Self = Self(0x0E);
    /// Left arrow.
    pub const LEFT: Self = Self(0xCB);
    /// Right arrow.
    pub const RIGHT: Self = Self(0xCD);
    /// Up arrow.
    pub const UP: Self = Self(0xC8);
    /// Down arrow.
    pub const DOWN: Self = Self(0xD0);
}

/// Keyboard input delivered to the focused widget.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyInput {
    /// A printable character was pressed.
    Char(char),
    /// A special key was pressed.
    SpecialPressed(SpecialKey),
    /// A special key was released.
    SpecialReleased(SpecialKey),
}

/// A pointer listener. Runs for every event of its registered kind.
pub type PointerListener = Box<dyn FnMut(&PointerEvent)>;

/// A keyboard listener. Returns whether it consumed the input; an event no
/// listener consumed bubbles to the parent container.
pub type KeyListener = Box<dyn FnMut(&KeyInput) -> bool>;

/// Per-widget listener lists, one per event kind.
///
/// Kinds have different callback signatures, so this is a struct of lists
/// rather than a map keyed by kind.
#[derive(Default)]
pub(crate) struct Listeners {
    pub(crate) left_click: Vec<PointerListener>,
    pub(crate) double_left_click: Vec<PointerListener>,
    pub(crate) right_click: Vec<PointerListener>,
    pub(crate) release: Vec<PointerListener>,
    pub(crate) pointer_move: Vec<PointerListener>,
    pub(crate) drag: Vec<PointerListener>,
    pub(crate) wheel: Vec<PointerListener>,
    pub(crate) key: Vec<KeyListener>,
}

impl Listeners {
    pub(crate) fn pointer_list_mut(&mut self, kind: PointerKind) -> &mut Vec<PointerListener> {
        match kind {
            PointerKind::LeftClick => &mut self.left_click,
            PointerKind::DoubleLeftClick => &mut self.double_left_click,
            PointerKind::RightClick => &mut self.right_click,
            PointerKind::Release => &mut self.release,
            PointerKind::Move => &mut self.pointer_move,
            PointerKind::Drag => &mut self.drag,
            PointerKind::Wheel => &mut self.wheel,
        }
    }

    /// Clears the click-ish lists only: left, double left, right, release.
    /// Move, drag, wheel, and keyboard listeners stay.
    pub(crate) fn clear_clicks(&mut self) {
        self.left_click.clear();
        self.double_left_click.clear();
        self.right_click.clear();
        self.release.clear();
    }
}

impl core::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners")
            .field("left_click", &self.left_click.len())
            .field("double_left_click", &self.double_left_click.len())
            .field("right_click", &self.right_click.len())
            .field("release", &self.release.len())
            .field("pointer_move", &self.pointer_move.len())
            .field("drag", &self.drag.len())
            .field("wheel", &self.wheel.len())
            .field("key", &self.key.len())
            .finish()
    }
}
