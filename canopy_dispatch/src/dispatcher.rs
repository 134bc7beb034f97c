// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input routing state machine.

use alloc::format;
use alloc::vec::Vec;
use kurbo::{Point, Vec2};
use tracing::{debug, trace};

use canopy_widget::{
    KeyInput, PointerEvent, PointerKind, RenderBackend, SpecialKey, WidgetFlags, WidgetId,
    WidgetSpec, WidgetTree,
};

use crate::view::View;
use crate::zorder::Zorder;

/// Routes raw input events across a Z-ordered list of widget-tree views.
///
/// The dispatcher owns three pieces of state: the view list, the widget
/// under the mouse, and the focused widget. The latter two are never
/// dangling: when nothing claims the pointer or the focus, they fall back to
/// a hidden, hit-transparent sink widget the dispatcher creates in the tree,
/// so event delivery never needs a "no target" branch (the sink silently
/// swallows whatever reaches it).
///
/// The view list is kept sorted by depth, highest first; the sort is stable,
/// so views registered earlier win ties at equal depth. Re-sorting is gated
/// on the per-root dirty flags the tree sets on visibility transitions, and
/// views whose root has been removed from the tree are pruned at the same
/// point.
///
/// The dispatcher borrows the tree per call rather than owning it; the
/// application owns both and passes the tree wherever input arrives.
#[derive(Debug)]
pub struct Dispatcher {
    views: Vec<View>,
    focused: WidgetId,
    under_mouse: WidgetId,
    /// Widget a left click is held on; drag and release route here while
    /// set, regardless of what the pointer is over now.
    armed: Option<WidgetId>,
    default_widget: WidgetId,
    next_auto_z: i32,
    needs_sort: bool,
}

impl Dispatcher {
    /// Create a dispatcher, installing its sink widget in the tree.
    pub fn new<R: RenderBackend>(tree: &mut WidgetTree<R>) -> Self {
        let sink_spec = WidgetSpec {
            flags: WidgetFlags::HIT_TRANSPARENT,
            ..WidgetSpec::default()
        };
        // The name only needs to not collide; number past any existing one.
        let mut n = 0;
        let default_widget = loop {
            match tree.insert_widget(None, &format!("dispatcher.sink.{n}"), sink_spec.clone()) {
                Ok(id) => break id,
                Err(_) => n += 1,
            }
        };
        Self {
            views: Vec::new(),
            focused: default_widget,
            under_mouse: default_widget,
            armed: None,
            default_widget,
            next_auto_z: 0,
            needs_sort: false,
        }
    }

    /// The widget currently under the mouse (the sink when nothing is).
    pub fn under_mouse(&self) -> WidgetId {
        self.under_mouse
    }

    /// The widget currently holding keyboard focus (the sink when none).
    pub fn focused(&self) -> WidgetId {
        self.focused
    }

    /// The fallback sink widget.
    pub fn default_widget(&self) -> WidgetId {
        self.default_widget
    }

    /// Number of registered views.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// The view list in its current (possibly not yet re-sorted) order.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    // --- view list ---

    /// Register a view. With `z` absent, depths auto-increment so later
    /// views stack above earlier ones; explicit depths also advance the
    /// auto-allocation point past themselves.
    pub fn add_view(&mut self, root: WidgetId, z: Option<Zorder>) -> Zorder {
        let z = z.unwrap_or_else(|| Zorder::new(self.next_auto_z));
        self.next_auto_z = (z.get() + 1).min(Zorder::MAX.get());
        self.views.push(View::new(root, z));
        self.needs_sort = true;
        debug!(?root, z = z.get(), "view added");
        z
    }

    /// Unregister a view. A root that was never registered is a no-op.
    pub fn remove_view(&mut self, root: WidgetId) {
        self.views.retain(|v| v.root != root);
    }

    /// Enable or disable input for a view without unregistering it.
    pub fn set_view_active(&mut self, root: WidgetId, active: bool) {
        for view in &mut self.views {
            if view.root == root {
                view.active = active;
            }
        }
    }

    /// Prune dead views, then re-sort when the list changed or any root
    /// reported a visibility transition since the last scan.
    fn refresh_views<R: RenderBackend>(&mut self, tree: &mut WidgetTree<R>) {
        let before = self.views.len();
        self.views.retain(|v| tree.is_alive(v.root));
        let mut dirty = self.views.len() != before || self.needs_sort;
        for view in &self.views {
            dirty |= tree.take_dirty(view.root);
        }
        if dirty {
            self.views.sort_by(|a, b| b.z.cmp(&a.z));
            self.needs_sort = false;
            trace!(views = self.views.len(), "view list re-sorted");
        }
        if !tree.is_alive(self.under_mouse) {
            self.under_mouse = self.default_widget;
        }
        if !tree.is_alive(self.focused) {
            self.focused = self.default_widget;
        }
        if self.armed.is_some_and(|w| !tree.is_alive(w)) {
            self.armed = None;
        }
    }

    // --- pointer events ---

    /// Route pointer movement.
    ///
    /// Scans active views top-down for the topmost widget under `pos`,
    /// falling back to the sink. On a handoff the old owner loses mouse-over
    /// and its highlight, the new owner gains both; staying on the same
    /// widget changes nothing. Hover and focus share the highlight flag, so
    /// even a focused widget dims when the pointer leaves it. The move event
    /// is then delivered to the current owner.
    pub fn mouse_move<R: RenderBackend>(&mut self, tree: &mut WidgetTree<R>, pos: Point) {
        self.refresh_views(tree);
        let mut hit = self.default_widget;
        for view in &self.views {
            if !view.active {
                continue;
            }
            if let Some(w) = tree.widget_at(view.root, pos) {
                hit = w;
                break;
            }
        }
        if hit != self.under_mouse {
            let old = self.under_mouse;
            if tree.set_mouse_over(old, false) {
                tree.highlight(old, false);
            }
            if tree.set_mouse_over(hit, true) {
                tree.highlight(hit, true);
            }
            debug!(?old, new = ?hit, "hover moved");
            self.under_mouse = hit;
        }
        tree.fire_pointer(self.under_mouse, PointerKind::Move, &PointerEvent::at(pos));
    }

    /// Route a left click: focus moves to the widget under the mouse, the
    /// click arms it for drag/release capture, then the click is delivered.
    pub fn mouse_left_click<R: RenderBackend>(&mut self, tree: &mut WidgetTree<R>, pos: Point) {
        self.refresh_views(tree);
        let target = self.under_mouse;
        self.set_focus(tree, target);
        self.armed = Some(target);
        tree.set_click_armed(target, true);
        tree.fire_pointer(target, PointerKind::LeftClick, &PointerEvent::at(pos));
    }

    /// Route a left double click to the widget under the mouse.
    pub fn mouse_double_click<R: RenderBackend>(&mut self, tree: &mut WidgetTree<R>, pos: Point) {
        self.refresh_views(tree);
        tree.fire_pointer(
            self.under_mouse,
            PointerKind::DoubleLeftClick,
            &PointerEvent::at(pos),
        );
    }

    /// Route a right click to the widget under the mouse.
    pub fn mouse_right_click<R: RenderBackend>(&mut self, tree: &mut WidgetTree<R>, pos: Point) {
        self.refresh_views(tree);
        tree.fire_pointer(
            self.under_mouse,
            PointerKind::RightClick,
            &PointerEvent::at(pos),
        );
    }

    /// Route a button release: to the armed widget when a click is held
    /// (even if the pointer has left it), else to the widget under the
    /// mouse. Disarms.
    pub fn mouse_release<R: RenderBackend>(&mut self, tree: &mut WidgetTree<R>, pos: Point) {
        self.refresh_views(tree);
        let target = self.armed.take().unwrap_or(self.under_mouse);
        tree.set_click_armed(target, false);
        tree.fire_pointer(target, PointerKind::Release, &PointerEvent::at(pos));
    }

    /// Route a drag: to the armed widget when a click is held (pointer
    /// capture), else to the widget under the mouse.
    pub fn mouse_drag<R: RenderBackend>(
        &mut self,
        tree: &mut WidgetTree<R>,
        pos: Point,
        delta: Vec2,
    ) {
        self.refresh_views(tree);
        let target = self.armed.unwrap_or(self.under_mouse);
        tree.fire_pointer(
            target,
            PointerKind::Drag,
            &PointerEvent::at(pos).with_delta(delta),
        );
    }

    /// Route a wheel scroll to the widget under the mouse.
    pub fn mouse_wheel<R: RenderBackend>(
        &mut self,
        tree: &mut WidgetTree<R>,
        pos: Point,
        scroll: f64,
    ) {
        self.refresh_views(tree);
        tree.fire_pointer(
            self.under_mouse,
            PointerKind::Wheel,
            &PointerEvent::at(pos).with_scroll(scroll),
        );
    }

    // --- keyboard events ---

    /// Deliver a printable character to the focused widget (unconsumed
    /// input bubbles inside the tree). Returns whether it was consumed.
    pub fn key_pressed<R: RenderBackend>(&mut self, tree: &mut WidgetTree<R>, ch: char) -> bool {
        self.refresh_views(tree);
        tree.key_pressed(self.focused, &KeyInput::Char(ch))
    }

    /// Deliver a special key press to the focused widget.
    pub fn special_key_pressed<R: RenderBackend>(
        &mut self,
        tree: &mut WidgetTree<R>,
        key: SpecialKey,
    ) -> bool {
        self.refresh_views(tree);
        tree.key_pressed(self.focused, &KeyInput::SpecialPressed(key))
    }

    /// Deliver a special key release to the focused widget.
    pub fn special_key_released<R: RenderBackend>(
        &mut self,
        tree: &mut WidgetTree<R>,
        key: SpecialKey,
    ) -> bool {
        self.refresh_views(tree);
        tree.key_pressed(self.focused, &KeyInput::SpecialReleased(key))
    }

    // --- focus ---

    /// Move keyboard focus explicitly (the Tab-navigation building block;
    /// click focus goes through the same path).
    ///
    /// A dead id falls back to the sink. The old owner's highlight clears,
    /// the new owner's lights up; the view containing the new owner records
    /// it as its focus target.
    pub fn set_focus<R: RenderBackend>(&mut self, tree: &mut WidgetTree<R>, widget: WidgetId) {
        let widget = if tree.is_alive(widget) {
            widget
        } else {
            self.default_widget
        };
        if widget == self.focused {
            return;
        }
        let old = self.focused;
        tree.highlight(old, false);
        tree.highlight(widget, true);
        debug!(?old, new = ?widget, "focus moved");
        self.focused = widget;
        if let Some(root) = self.view_root_of(tree, widget) {
            for view in &mut self.views {
                if view.root == root {
                    view.focus_target = widget;
                }
            }
        }
    }

    /// Restore focus to a view's remembered focus target (its root when the
    /// target died or focus never entered the view). A root that is not a
    /// registered view is a no-op.
    pub fn focus_view<R: RenderBackend>(&mut self, tree: &mut WidgetTree<R>, root: WidgetId) {
        let Some(target) = self
            .views
            .iter()
            .find(|v| v.root == root)
            .map(|v| v.focus_target)
        else {
            return;
        };
        let target = if tree.is_alive(target) { target } else { root };
        self.set_focus(tree, target);
    }

    /// The registered view whose subtree holds `widget`, if any.
    fn view_root_of<R: RenderBackend>(
        &self,
        tree: &WidgetTree<R>,
        widget: WidgetId,
    ) -> Option<WidgetId> {
        let mut root = widget;
        while let Some(parent) = tree.parent(root) {
            root = parent;
        }
        self.views.iter().any(|v| v.root == root).then_some(root)
    }
}
