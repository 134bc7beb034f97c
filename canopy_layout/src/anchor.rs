// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attachment modes and stored anchor rules.
//!
//! An anchor rule names a target rectangle, an attachment mode, and an offset.
//! The rule is stored on the dependent frame and re-applied whenever either
//! side changes size; resolution itself is a handful of additions.

/// Horizontal attachment modes.
///
/// `Left` and `Right` place the dependent rectangle *outside* the target;
/// the `Inside*` modes align edges within it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HAttach {
    /// Centered over the target's horizontal span.
    Center,
    /// Outside, flush to the target's left edge.
    Left,
    /// Outside, flush to the target's right edge.
    Right,
    /// Inside, left edges aligned.
    InsideLeft,
    /// Inside, right edges aligned.
    InsideRight,
}

impl HAttach {
    /// Resolve the dependent rectangle's `left` (offset not yet applied).
    pub fn resolve(self, target_left: f64, target_width: f64, own_width: f64) -> f64 {
        match self {
            Self::Center => target_left + target_width / 2.0 - own_width / 2.0,
            Self::Left => target_left - own_width,
            Self::Right => target_left + target_width,
            Self::InsideLeft => target_left,
            Self::InsideRight => target_left + target_width - own_width,
        }
    }
}

/// Vertical attachment modes, symmetric to [`HAttach`] over top/height.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VAttach {
    /// Centered over the target's vertical span.
    Center,
    /// Outside, above the target.
    Top,
    /// Inside, top edges aligned.
    TopInside,
    /// Outside, below the target.
    Bottom,
    /// Inside, bottom edges aligned.
    BottomInside,
}

impl VAttach {
    /// Resolve the dependent rectangle's `top` (offset not yet applied).
    pub fn resolve(self, target_top: f64, target_height: f64, own_height: f64) -> f64 {
        match self {
            Self::Center => target_top + target_height / 2.0 - own_height / 2.0,
            Self::Top => target_top - own_height,
            Self::TopInside => target_top,
            Self::Bottom => target_top + target_height,
            Self::BottomInside => target_top + target_height - own_height,
        }
    }
}

/// Simple self-alignment within a target, for callers that do not care about
/// the outside modes. Converts to the corresponding inside attachment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Alignment {
    /// Flush to the target's left edge.
    Left,
    /// Flush to the target's right edge.
    Right,
    /// Flush to the target's top edge.
    Top,
    /// Flush to the target's bottom edge.
    Bottom,
    /// Centered on the relevant axis.
    Center,
}

impl Alignment {
    /// The horizontal attachment this alignment stands for, if it names one.
    pub fn h_attach(self) -> Option<HAttach> {
        match self {
            Self::Left => Some(HAttach::InsideLeft),
            Self::Right => Some(HAttach::InsideRight),
            Self::Center => Some(HAttach::Center),
            Self::Top | Self::Bottom => None,
        }
    }

    /// The vertical attachment this alignment stands for, if it names one.
    pub fn v_attach(self) -> Option<VAttach> {
        match self {
            Self::Top => Some(VAttach::TopInside),
            Self::Bottom => Some(VAttach::BottomInside),
            Self::Center => Some(VAttach::Center),
            Self::Left | Self::Right => None,
        }
    }
}

/// An anchor offset, either absolute pixels or a fraction of the target's
/// extent on the same axis. Fractions are converted to pixels when the rule
/// is stored, so later re-resolution is pure arithmetic.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AnchorOffset {
    /// Offset in pixels.
    Px(f64),
    /// Offset as a fraction of the target's width (horizontal rules) or
    /// height (vertical rules).
    Fraction(f64),
}

impl AnchorOffset {
    /// Convert to pixels against the target's extent on this axis.
    pub fn to_px(self, target_extent: f64) -> f64 {
        match self {
            Self::Px(px) => px,
            Self::Fraction(f) => f * target_extent,
        }
    }
}

/// A stored horizontal anchor rule. The offset is kept in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HAnchor<K> {
    /// Anchor target key.
    pub target: K,
    /// Attachment mode.
    pub attach: HAttach,
    /// Pixel offset added after attachment resolution.
    pub offset: f64,
}

/// A stored vertical anchor rule. The offset is kept in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VAnchor<K> {
    /// Anchor target key.
    pub target: K,
    /// Attachment mode.
    pub attach: VAttach,
    /// Pixel offset added after attachment resolution.
    pub offset: f64,
}
