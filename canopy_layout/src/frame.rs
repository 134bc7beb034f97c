// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cached frames: absolute position, size, virtual height, and stored anchors.

use kurbo::{Point, Rect, Size, Vec2};

use crate::anchor::{AnchorOffset, HAnchor, HAttach, VAnchor, VAttach};

/// An axis-aligned rectangle with an eagerly resolved position cache.
///
/// The origin is a *cache*: it always holds the result of the last explicit
/// instruction, either a direct move or the stored anchor rules applied
/// against the target's geometry at that time. Nothing is recomputed at read
/// time.
///
/// Two asymmetries are part of the contract and must not be "fixed":
///
/// - A direct move ([`Frame::set_origin`], [`Frame::translate`]) does not
///   re-run the stored anchor rules. The frame drifts from its anchor until
///   the next size change or explicit re-anchor.
/// - A size change is expected to re-run the stored rules (the centered and
///   inside-far modes depend on the dependent size); the owner does this by
///   calling [`Frame::apply_h_anchor`]/[`Frame::apply_v_anchor`] with the
///   target's current geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<K> {
    origin: Point,
    size: Size,
    /// Height used for hit testing only; follows `size.height` on every size
    /// change unless explicitly overridden.
    virtual_height: f64,
    opacity: u8,
    h_anchor: Option<HAnchor<K>>,
    v_anchor: Option<VAnchor<K>>,
}

impl<K> Default for Frame<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Frame<K> {
    /// A zero-sized, fully opaque frame at the origin with no anchors.
    pub fn new() -> Self {
        Self {
            origin: Point::ZERO,
            size: Size::ZERO,
            virtual_height: 0.0,
            opacity: 100,
            h_anchor: None,
            v_anchor: None,
        }
    }

    /// Absolute position of the top-left corner.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Rendered size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The height used for hit testing.
    pub fn virtual_height(&self) -> f64 {
        self.virtual_height
    }

    /// Opacity in percent, `0..=100`.
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    /// The stored horizontal anchor rule, if any.
    pub fn h_anchor(&self) -> Option<&HAnchor<K>> {
        self.h_anchor.as_ref()
    }

    /// The stored vertical anchor rule, if any.
    pub fn v_anchor(&self) -> Option<&VAnchor<K>> {
        self.v_anchor.as_ref()
    }

    /// Move to an absolute position. Does not re-run stored anchors.
    pub fn set_origin(&mut self, origin: Point) -> bool {
        let moved = self.origin != origin;
        self.origin = origin;
        moved
    }

    /// Move by a delta. Does not re-run stored anchors.
    pub fn translate(&mut self, delta: Vec2) -> bool {
        if delta.x == 0.0 && delta.y == 0.0 {
            return false;
        }
        self.origin += delta;
        true
    }

    /// Resize. Returns whether either dimension changed; when it did, the
    /// virtual height snaps back to the new height.
    pub fn set_size(&mut self, width: f64, height: f64) -> bool {
        let size = Size::new(width, height);
        if self.size == size {
            return false;
        }
        self.size = size;
        self.virtual_height = height;
        true
    }

    /// Clamp and store opacity. Returns whether the value changed.
    pub fn set_opacity(&mut self, percent: u8) -> bool {
        let percent = percent.min(100);
        let changed = self.opacity != percent;
        self.opacity = percent;
        changed
    }

    /// Override the hit-testing height without touching the rendered size.
    pub fn set_virtual_height(&mut self, height: f64) {
        self.virtual_height = height;
    }

    /// Restore the hit-testing height to the rendered height.
    pub fn reset_virtual_height(&mut self) {
        self.virtual_height = self.size.height;
    }

    /// Rendered bounds.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// Bounds used for hit testing (virtual height instead of rendered
    /// height).
    pub fn hit_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.size.width,
            self.origin.y + self.virtual_height,
        )
    }

    /// Inclusive containment against the hit rectangle.
    pub fn contains(&self, pt: Point) -> bool {
        rect_contains_inclusive(self.hit_rect(), pt)
    }
}

impl<K: Copy + Eq> Frame<K> {
    /// Store a horizontal anchor rule and resolve it immediately against the
    /// target's current geometry. Fractional offsets convert to pixels here,
    /// against the target's width.
    pub fn anchor_left(
        &mut self,
        target: K,
        attach: HAttach,
        offset: AnchorOffset,
        target_left: f64,
        target_width: f64,
    ) -> bool {
        self.h_anchor = Some(HAnchor {
            target,
            attach,
            offset: offset.to_px(target_width),
        });
        self.apply_h_anchor(target_left, target_width)
    }

    /// Store a vertical anchor rule and resolve it immediately against the
    /// target's current geometry. Fractional offsets convert to pixels here,
    /// against the target's height.
    pub fn anchor_top(
        &mut self,
        target: K,
        attach: VAttach,
        offset: AnchorOffset,
        target_top: f64,
        target_height: f64,
    ) -> bool {
        self.v_anchor = Some(VAnchor {
            target,
            attach,
            offset: offset.to_px(target_height),
        });
        self.apply_v_anchor(target_top, target_height)
    }

    /// Re-run the stored horizontal rule. Returns whether the origin moved.
    /// No-op when no rule is stored.
    pub fn apply_h_anchor(&mut self, target_left: f64, target_width: f64) -> bool {
        let Some(anchor) = self.h_anchor else {
            return false;
        };
        let x = anchor.attach.resolve(target_left, target_width, self.size.width) + anchor.offset;
        let moved = self.origin.x != x;
        self.origin.x = x;
        moved
    }

    /// Re-run the stored vertical rule. Returns whether the origin moved.
    /// No-op when no rule is stored.
    pub fn apply_v_anchor(&mut self, target_top: f64, target_height: f64) -> bool {
        let Some(anchor) = self.v_anchor else {
            return false;
        };
        let y = anchor.attach.resolve(target_top, target_height, self.size.height) + anchor.offset;
        let moved = self.origin.y != y;
        self.origin.y = y;
        moved
    }
}

/// Point-in-rect test that is inclusive on all four edges.
///
/// `kurbo::Rect::contains` is half-open; hit testing in this layer treats
/// both the near and far edges as inside.
pub fn rect_contains_inclusive(rect: Rect, pt: Point) -> bool {
    pt.x >= rect.x0 && pt.x <= rect.x1 && pt.y >= rect.y0 && pt.y <= rect.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_resolution_reference_cases() {
        // Reference element at (100, 100), 150×100; dependent 50×50.
        let mut f: Frame<u32> = Frame::new();
        let _ = f.set_size(50.0, 50.0);

        let _ = f.anchor_left(1, HAttach::InsideRight, AnchorOffset::Px(0.0), 100.0, 150.0);
        assert_eq!(f.origin().x, 200.0);

        let _ = f.anchor_left(1, HAttach::Center, AnchorOffset::Px(0.0), 100.0, 150.0);
        assert_eq!(f.origin().x, 150.0);

        let _ = f.anchor_top(1, VAttach::Bottom, AnchorOffset::Px(5.0), 100.0, 100.0);
        assert_eq!(f.origin().y, 205.0);
    }

    #[test]
    fn fraction_offset_converts_once_at_store_time() {
        let mut f: Frame<u32> = Frame::new();
        let _ = f.set_size(50.0, 50.0);
        let _ = f.anchor_left(1, HAttach::InsideLeft, AnchorOffset::Fraction(0.1), 0.0, 200.0);
        assert_eq!(f.origin().x, 20.0);
        // Re-applying against a different target width keeps the stored pixel
        // offset; fractions do not re-convert.
        let _ = f.apply_h_anchor(0.0, 400.0);
        assert_eq!(f.origin().x, 20.0);
    }

    #[test]
    fn direct_move_does_not_rerun_anchor() {
        let mut f: Frame<u32> = Frame::new();
        let _ = f.set_size(50.0, 50.0);
        let _ = f.anchor_left(1, HAttach::InsideLeft, AnchorOffset::Px(0.0), 100.0, 150.0);
        assert_eq!(f.origin().x, 100.0);

        let _ = f.set_origin(Point::new(300.0, 0.0));
        assert_eq!(f.origin().x, 300.0);
        // The rule is still stored; only an explicit re-apply snaps back.
        assert!(f.h_anchor().is_some());
        let _ = f.apply_h_anchor(100.0, 150.0);
        assert_eq!(f.origin().x, 100.0);
    }

    #[test]
    fn size_change_refreshes_virtual_height() {
        let mut f: Frame<u32> = Frame::new();
        let _ = f.set_size(50.0, 50.0);
        assert_eq!(f.virtual_height(), 50.0);

        f.set_virtual_height(80.0);
        assert_eq!(f.virtual_height(), 80.0);
        assert!(f.contains(Point::new(10.0, 60.0)));

        // Resizing snaps the override back to the rendered height.
        let _ = f.set_size(50.0, 40.0);
        assert_eq!(f.virtual_height(), 40.0);
        assert!(!f.contains(Point::new(10.0, 60.0)));

        f.set_virtual_height(90.0);
        f.reset_virtual_height();
        assert_eq!(f.virtual_height(), 40.0);
    }

    #[test]
    fn containment_is_edge_inclusive() {
        let mut f: Frame<u32> = Frame::new();
        let _ = f.set_origin(Point::new(10.0, 20.0));
        let _ = f.set_size(50.0, 60.0);
        for x in [10, 35, 60] {
            for y in [20, 50, 80] {
                assert!(f.contains(Point::new(f64::from(x), f64::from(y))));
            }
        }
        assert!(!f.contains(Point::new(9.0, 22.0)));
        assert!(!f.contains(Point::new(12.0, 19.0)));
        assert!(!f.contains(Point::new(61.0, 22.0)));
        assert!(!f.contains(Point::new(12.0, 81.0)));
    }

    #[test]
    fn opacity_clamps() {
        let mut f: Frame<u32> = Frame::new();
        assert!(!f.set_opacity(100));
        assert!(f.set_opacity(40));
        assert_eq!(f.opacity(), 40);
        assert!(f.set_opacity(250));
        assert_eq!(f.opacity(), 100);
    }

    #[test]
    fn set_size_reports_change_only() {
        let mut f: Frame<u32> = Frame::new();
        assert!(f.set_size(10.0, 10.0));
        assert!(!f.set_size(10.0, 10.0));
        assert!(f.set_size(10.0, 20.0));
    }
}
