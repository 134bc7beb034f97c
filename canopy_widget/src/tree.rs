// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core widget tree: structure, layout writes, hit testing, input delivery,
//! and focus traversal.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect, Size, Vec2};
use tracing::trace;

use canopy_layout::{AnchorOffset, Frame, HAttach, VAttach, rect_contains_inclusive};

use crate::backend::{NoopBackend, RenderBackend};
use crate::event::{KeyInput, Listeners, PointerEvent, PointerKind};
use crate::types::{DuplicateName, WidgetFlags, WidgetId, WidgetSpec};

#[derive(Debug)]
struct Node {
    name: String,
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    frame: Frame<WidgetId>,
    flags: WidgetFlags,
    empty_zones: Vec<Rect>,
    listeners: Listeners,
    /// Index of the next child the focus cursor will consider.
    focus_cursor: usize,
    /// Most recently added child container; the only one that participates
    /// in focus traversal.
    nested: Option<WidgetId>,
    /// Set on visibility transitions anywhere in this node's subtree
    /// (propagated to the root); consumed by the dispatcher to decide
    /// whether its view list needs re-sorting.
    dirty: bool,
}

impl Node {
    fn new(name: String, spec: &WidgetSpec, container: bool) -> Self {
        let mut frame = Frame::new();
        let _ = frame.set_origin(spec.origin);
        let _ = frame.set_size(spec.size.width, spec.size.height);
        let _ = frame.set_opacity(spec.opacity);
        let mut flags = spec.flags;
        flags.set(WidgetFlags::CONTAINER, container);
        Self {
            name,
            parent: None,
            children: Vec::new(),
            frame,
            flags,
            empty_zones: Vec::new(),
            listeners: Listeners::default(),
            focus_cursor: 0,
            nested: None,
            dirty: false,
        }
    }
}

/// The widget tree: a generational-slot arena of widgets and containers,
/// plus the process-wide name registry and the injected render backend.
///
/// One application owns one tree (and one dispatcher); everything is
/// single-threaded and synchronous. All operations accept a [`WidgetId`];
/// operations on a stale or dead id are silent no-ops, and lookups return
/// `None`, so "not found" is a normal control path rather than an error.
pub struct WidgetTree<R: RenderBackend = NoopBackend> {
    nodes: Vec<Option<Node>>,
    /// Last generation per slot; persists across frees so reused slots mint
    /// fresh, non-aliasing ids.
    generations: Vec<u32>,
    free_list: Vec<usize>,
    names: alloc::collections::BTreeMap<String, WidgetId>,
    backend: R,
}

impl<R: RenderBackend> core::fmt::Debug for WidgetTree<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("WidgetTree")
            .field("widgets_total", &total)
            .field("widgets_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("names", &self.names.len())
            .finish_non_exhaustive()
    }
}

impl Default for WidgetTree<NoopBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree<NoopBackend> {
    /// Create an empty tree with no render backend.
    pub fn new() -> Self {
        Self::with_backend(NoopBackend)
    }
}

impl<R: RenderBackend> WidgetTree<R> {
    /// Create an empty tree mirroring its state into `backend`.
    pub fn with_backend(backend: R) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            names: alloc::collections::BTreeMap::new(),
            backend,
        }
    }

    /// Borrow the render backend.
    pub fn backend(&self) -> &R {
        &self.backend
    }

    /// Mutably borrow the render backend.
    pub fn backend_mut(&mut self) -> &mut R {
        &mut self.backend
    }

    // --- lifecycle ---

    /// Insert a plain widget under `parent` (or as a root when `None`).
    ///
    /// The name must be unique within the tree; it backs [`Self::lookup`].
    pub fn insert_widget(
        &mut self,
        parent: Option<WidgetId>,
        name: &str,
        spec: WidgetSpec,
    ) -> Result<WidgetId, DuplicateName> {
        self.insert_node(parent, name, spec, false)
    }

    /// Insert a container under `parent` (or as a root when `None`).
    ///
    /// Besides owning ordered children, the new container becomes its
    /// parent's *nested container*: the one slot of the parent's focus cycle
    /// that descends into child containers. A later sibling container
    /// supersedes it.
    pub fn insert_container(
        &mut self,
        parent: Option<WidgetId>,
        name: &str,
        spec: WidgetSpec,
    ) -> Result<WidgetId, DuplicateName> {
        self.insert_node(parent, name, spec, true)
    }

    fn insert_node(
        &mut self,
        parent: Option<WidgetId>,
        name: &str,
        spec: WidgetSpec,
        container: bool,
    ) -> Result<WidgetId, DuplicateName> {
        if self.names.contains_key(name) {
            return Err(DuplicateName(String::from(name)));
        }
        let idx = if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            self.nodes.push(None);
            self.generations.push(0);
            self.nodes.len() - 1
        };
        let generation = self.generations[idx] + 1;
        self.generations[idx] = generation;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "WidgetId uses 32-bit indices by design."
        )]
        let id = WidgetId::new(idx as u32, generation);
        self.nodes[idx] = Some(Node::new(String::from(name), &spec, container));
        self.names.insert(String::from(name), id);

        if let Some(p) = parent.filter(|&p| self.is_alive(p)) {
            self.node_mut(p).children.push(id);
            if container {
                self.node_mut(p).nested = Some(id);
            }
            self.node_mut(id).parent = Some(p);
        }

        // Mirror the initial state into the backend.
        let (origin, size, opacity, visible) = {
            let n = self.node(id);
            (
                n.frame.origin(),
                n.frame.size(),
                n.frame.opacity(),
                n.flags.contains(WidgetFlags::VISIBLE),
            )
        };
        self.backend.set_position(id, origin.x, origin.y);
        self.backend.set_size(id, size.width, size.height);
        if opacity != 100 {
            self.backend.set_opacity(id, opacity);
        }
        if visible {
            self.backend.show(id);
        }
        trace!(name, container, "widget inserted");
        Ok(id)
    }

    /// Remove a widget and its subtree.
    ///
    /// Idempotent: removing a dead or stale id is a no-op. Children are
    /// removed first; the widget is unregistered from the name registry and
    /// detached from its parent.
    pub fn remove(&mut self, id: WidgetId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            let p = self.node_mut(parent);
            p.children.retain(|c| *c != id);
            if p.nested == Some(id) {
                p.nested = None;
            }
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        let name = core::mem::take(&mut self.node_mut(id).name);
        self.names.remove(&name);
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        trace!(name = %name, "widget removed");
    }

    /// Whether `id` refers to a live widget.
    pub fn is_alive(&self, id: WidgetId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|_| self.generations[id.idx()] == id.1)
    }

    /// Find a widget by registered name.
    pub fn lookup(&self, name: &str) -> Option<WidgetId> {
        self.names.get(name).copied()
    }

    /// The widget's registered name.
    pub fn name(&self, id: WidgetId) -> Option<&str> {
        self.node_opt(id).map(|n| n.name.as_str())
    }

    /// The widget's parent, if any.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// The widget's children in insertion order. Empty for dead ids.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.node_opt(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The widget's frame (position cache, size, virtual height, anchors).
    pub fn frame(&self, id: WidgetId) -> Option<&Frame<WidgetId>> {
        self.node_opt(id).map(|n| &n.frame)
    }

    /// The widget's flags.
    pub fn flags(&self, id: WidgetId) -> Option<WidgetFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Whether the widget's visibility flag is set.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(WidgetFlags::VISIBLE))
    }

    /// Whether the widget can take keyboard focus.
    pub fn is_focusable(&self, id: WidgetId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(WidgetFlags::FOCUSABLE))
    }

    // --- layout writes ---

    /// Store a horizontal anchor rule against `target` and resolve it now.
    ///
    /// Fractional offsets convert to pixels against the target's current
    /// width. A dead target makes this a no-op. Anchoring to oneself is
    /// allowed; such a rule is not re-run on size changes.
    pub fn set_left(
        &mut self,
        id: WidgetId,
        target: WidgetId,
        attach: HAttach,
        offset: AnchorOffset,
    ) {
        let Some((left, width)) = self
            .node_opt(target)
            .map(|n| (n.frame.origin().x, n.frame.size().width))
        else {
            return;
        };
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let moved = node.frame.anchor_left(target, attach, offset, left, width);
        if moved {
            let origin = node.frame.origin();
            self.backend.set_position(id, origin.x, origin.y);
        }
    }

    /// Store a vertical anchor rule against `target` and resolve it now.
    /// Symmetric to [`Self::set_left`].
    pub fn set_top(
        &mut self,
        id: WidgetId,
        target: WidgetId,
        attach: VAttach,
        offset: AnchorOffset,
    ) {
        let Some((top, height)) = self
            .node_opt(target)
            .map(|n| (n.frame.origin().y, n.frame.size().height))
        else {
            return;
        };
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let moved = node.frame.anchor_top(target, attach, offset, top, height);
        if moved {
            let origin = node.frame.origin();
            self.backend.set_position(id, origin.x, origin.y);
        }
    }

    /// Resize the widget.
    ///
    /// A no-op when neither dimension changes. Otherwise the virtual height
    /// snaps back to the new height, stored anchor rules are re-run (the
    /// centered and inside-far modes depend on the dependent size) unless
    /// the widget is anchored to itself, and the backend size (and, when the
    /// origin moved, position) hooks fire.
    pub fn set_size(&mut self, id: WidgetId, width: f64, height: f64) {
        let (old_origin, h_target, v_target) = {
            let Some(node) = self.node_opt_mut(id) else {
                return;
            };
            let old_origin = node.frame.origin();
            if !node.frame.set_size(width, height) {
                return;
            }
            (
                old_origin,
                node.frame.h_anchor().map(|a| a.target),
                node.frame.v_anchor().map(|a| a.target),
            )
        };

        if let Some(target) = h_target.filter(|&t| t != id) {
            if let Some((left, w)) = self
                .node_opt(target)
                .map(|n| (n.frame.origin().x, n.frame.size().width))
            {
                let _ = self.node_mut(id).frame.apply_h_anchor(left, w);
            }
        }
        if let Some(target) = v_target.filter(|&t| t != id) {
            if let Some((top, h)) = self
                .node_opt(target)
                .map(|n| (n.frame.origin().y, n.frame.size().height))
            {
                let _ = self.node_mut(id).frame.apply_v_anchor(top, h);
            }
        }

        let origin = self.node(id).frame.origin();
        self.backend.set_size(id, width, height);
        if origin != old_origin {
            self.backend.set_position(id, origin.x, origin.y);
        }
    }

    /// Move the widget to an absolute position.
    ///
    /// Always fires the backend position hook. Deliberately does *not*
    /// re-run stored anchor rules: an anchored-then-moved widget stays where
    /// it was put until the next size change or explicit re-anchor.
    pub fn set_position(&mut self, id: WidgetId, x: f64, y: f64) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let _ = node.frame.set_origin(Point::new(x, y));
        self.backend.set_position(id, x, y);
    }

    /// Move the widget by a delta. Same anchor semantics as
    /// [`Self::set_position`].
    pub fn move_by(&mut self, id: WidgetId, delta: Vec2) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let _ = node.frame.translate(delta);
        let origin = node.frame.origin();
        self.backend.set_position(id, origin.x, origin.y);
    }

    /// Set opacity in percent (clamped to `0..=100`); the backend hook fires
    /// only when the value changed.
    pub fn set_opacity(&mut self, id: WidgetId, percent: u8) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.frame.set_opacity(percent) {
            let applied = node.frame.opacity();
            self.backend.set_opacity(id, applied);
        }
    }

    /// Forward a material change to the backend. Materials are opaque here.
    pub fn set_material(&mut self, id: WidgetId, material: &str) {
        if self.is_alive(id) {
            self.backend.set_material(id, material);
        }
    }

    /// Override the hit-testing height without changing the rendered height.
    ///
    /// Lets a panel collapsed to its title bar keep capturing input over its
    /// full nominal area.
    pub fn set_virtual_height(&mut self, id: WidgetId, height: f64) {
        if let Some(node) = self.node_opt_mut(id) {
            node.frame.set_virtual_height(height);
        }
    }

    /// Restore the hit-testing height to the rendered height.
    pub fn reset_virtual_height(&mut self, id: WidgetId) {
        if let Some(node) = self.node_opt_mut(id) {
            node.frame.reset_virtual_height();
        }
    }

    // --- visibility ---

    /// Show the widget and, recursively, its children.
    ///
    /// Idempotent: a second call (or showing an already-visible widget) does
    /// nothing and fires no hook. Sets the root's dirty flag for the
    /// dispatcher's Z-order re-sort gate.
    pub fn show(&mut self, id: WidgetId) {
        if !self.is_alive(id) || self.is_visible(id) {
            return;
        }
        self.node_mut(id).flags.insert(WidgetFlags::VISIBLE);
        self.mark_root_dirty(id);
        self.backend.show(id);
        let children = self.node(id).children.clone();
        for child in children {
            self.show(child);
        }
    }

    /// Hide the widget and, recursively, its children. Idempotent like
    /// [`Self::show`].
    pub fn hide(&mut self, id: WidgetId) {
        if !self.is_alive(id) || !self.is_visible(id) {
            return;
        }
        self.node_mut(id).flags.remove(WidgetFlags::VISIBLE);
        self.mark_root_dirty(id);
        self.backend.hide(id);
        let children = self.node(id).children.clone();
        for child in children {
            self.hide(child);
        }
    }

    /// Read and clear the dirty flag of a (root) widget.
    pub fn take_dirty(&mut self, id: WidgetId) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        core::mem::take(&mut node.dirty)
    }

    fn mark_root_dirty(&mut self, id: WidgetId) {
        let mut root = id;
        while let Some(parent) = self.node(root).parent {
            root = parent;
        }
        self.node_mut(root).dirty = true;
    }

    // --- hit testing ---

    /// Whether the point is inside the widget for input purposes.
    ///
    /// False when the widget is hit-transparent, or when empty-zone checking
    /// is enabled and the point falls inside a registered empty zone.
    /// Otherwise an edge-inclusive test against the widget's rectangle using
    /// the *virtual* height.
    pub fn contains(&self, id: WidgetId, pt: Point) -> bool {
        let Some(node) = self.node_opt(id) else {
            return false;
        };
        if node.flags.contains(WidgetFlags::HIT_TRANSPARENT) {
            return false;
        }
        if node.flags.contains(WidgetFlags::EMPTY_ZONES)
            && node
                .empty_zones
                .iter()
                .any(|zone| rect_contains_inclusive(*zone, pt))
        {
            return false;
        }
        node.frame.contains(pt)
    }

    /// The widget under a point within this subtree.
    ///
    /// Descends into visible children first, later siblings before earlier
    /// ones (later children stack on top); falls back to the subtree root
    /// itself when it contains the point. Children are not clipped by their
    /// parent's rectangle.
    pub fn widget_at(&self, id: WidgetId, pt: Point) -> Option<WidgetId> {
        let node = self.node_opt(id)?;
        if !node.flags.contains(WidgetFlags::VISIBLE) {
            return None;
        }
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.widget_at(child, pt) {
                return Some(hit);
            }
        }
        self.contains(id, pt).then_some(id)
    }

    /// Register a rectangle inside which points count as *outside* the
    /// widget.
    pub fn add_empty_zone(&mut self, id: WidgetId, zone: Rect) {
        if let Some(node) = self.node_opt_mut(id) {
            node.empty_zones.push(zone);
        }
    }

    /// Drop all registered empty zones.
    pub fn clear_empty_zones(&mut self, id: WidgetId) {
        if let Some(node) = self.node_opt_mut(id) {
            node.empty_zones.clear();
        }
    }

    /// Enable or disable empty-zone checking without dropping the zones.
    pub fn set_empty_zones_enabled(&mut self, id: WidgetId, enabled: bool) {
        if let Some(node) = self.node_opt_mut(id) {
            node.flags.set(WidgetFlags::EMPTY_ZONES, enabled);
        }
    }

    /// Make the widget input-transparent (or opaque again) without removing
    /// it from the tree. A transparent widget's children remain hittable.
    pub fn set_hit_transparent(&mut self, id: WidgetId, transparent: bool) {
        if let Some(node) = self.node_opt_mut(id) {
            node.flags.set(WidgetFlags::HIT_TRANSPARENT, transparent);
        }
    }

    // --- highlight / hover / click state ---

    /// Set or clear the highlight.
    ///
    /// A no-op unless the widget is visible and highlightable; the backend
    /// hook fires only on an actual transition. Hover and keyboard focus
    /// share this one bit.
    pub fn highlight(&mut self, id: WidgetId, on: bool) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if !node.flags.contains(WidgetFlags::VISIBLE)
            || !node.flags.contains(WidgetFlags::HIGHLIGHTABLE)
        {
            return;
        }
        if node.flags.contains(WidgetFlags::HIGHLIGHTED) == on {
            return;
        }
        node.flags.set(WidgetFlags::HIGHLIGHTED, on);
        self.backend.set_highlight(id, on);
    }

    /// Update mouse-over bookkeeping. Returns whether this was a transition.
    pub fn set_mouse_over(&mut self, id: WidgetId, over: bool) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        if node.flags.contains(WidgetFlags::MOUSE_OVER) == over {
            return false;
        }
        node.flags.set(WidgetFlags::MOUSE_OVER, over);
        true
    }

    /// Arm or disarm the held-click state.
    pub fn set_click_armed(&mut self, id: WidgetId, armed: bool) {
        if let Some(node) = self.node_opt_mut(id) {
            node.flags.set(WidgetFlags::CLICK_ARMED, armed);
        }
    }

    /// Whether a left click is currently held on the widget.
    pub fn is_click_armed(&self, id: WidgetId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(WidgetFlags::CLICK_ARMED))
    }

    // --- listeners and delivery ---

    /// Append a pointer listener for one event kind. Listeners run in
    /// registration order.
    pub fn add_pointer_listener(
        &mut self,
        id: WidgetId,
        kind: PointerKind,
        listener: impl FnMut(&PointerEvent) + 'static,
    ) {
        if let Some(node) = self.node_opt_mut(id) {
            node.listeners
                .pointer_list_mut(kind)
                .push(alloc::boxed::Box::new(listener));
        }
    }

    /// Append a keyboard listener. Registering one makes the widget
    /// focusable.
    pub fn add_keyboard_listener(
        &mut self,
        id: WidgetId,
        listener: impl FnMut(&KeyInput) -> bool + 'static,
    ) {
        if let Some(node) = self.node_opt_mut(id) {
            node.listeners.key.push(alloc::boxed::Box::new(listener));
            node.flags.insert(WidgetFlags::FOCUSABLE);
        }
    }

    /// Clear the click-ish listener lists (left, double left, right,
    /// release). Move, drag, wheel, and keyboard listeners stay.
    pub fn remove_click_listeners(&mut self, id: WidgetId) {
        if let Some(node) = self.node_opt_mut(id) {
            node.listeners.clear_clicks();
        }
    }

    /// Run the widget's listeners for one pointer event kind. Nothing runs
    /// when the widget is hidden or dead.
    pub fn fire_pointer(&mut self, id: WidgetId, kind: PointerKind, event: &PointerEvent) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if !node.flags.contains(WidgetFlags::VISIBLE) {
            return;
        }
        for listener in node.listeners.pointer_list_mut(kind).iter_mut() {
            listener(event);
        }
    }

    /// Deliver keyboard input to the widget, bubbling up the parent chain.
    ///
    /// Every registered listener on a visible widget runs; if none of them
    /// consumed the input, it is forwarded to the parent, one level per hop,
    /// until a widget consumes it or a root is reached. Returns whether any
    /// widget consumed it.
    pub fn key_pressed(&mut self, id: WidgetId, input: &KeyInput) -> bool {
        let parent = {
            let Some(node) = self.node_opt_mut(id) else {
                return false;
            };
            let mut consumed = false;
            if node.flags.contains(WidgetFlags::VISIBLE) {
                for listener in node.listeners.key.iter_mut() {
                    consumed |= listener(input);
                }
            }
            if consumed {
                return true;
            }
            node.parent
        };
        match parent {
            Some(p) => self.key_pressed(p, input),
            None => false,
        }
    }

    // --- focus traversal ---

    /// Advance the container's round-robin focus cursor and return the next
    /// focusable widget, or `None` when the subtree has none.
    ///
    /// The cursor walks the container's direct children in insertion order,
    /// skipping non-focusable ones transparently. When it wraps past the
    /// end, a single extra slot descends into the most recently added nested
    /// container (if it has focusable content) before the cycle restarts at
    /// the first child. A direct child added after the nested container
    /// therefore takes its turn before the nested container does; a nested
    /// container superseded by a newer sibling container is never visited
    /// again.
    pub fn next_focusable(&mut self, container: WidgetId) -> Option<WidgetId> {
        if !self.is_alive(container) {
            return None;
        }
        let children = self.node(container).children.clone();
        let focusable_here = children.iter().any(|&c| self.is_focusable(c));
        let nested = self
            .node(container)
            .nested
            .filter(|&n| n != container && self.has_focusable(n));
        if !focusable_here && nested.is_none() {
            return None;
        }
        let len = children.len();
        loop {
            let cursor = self.node(container).focus_cursor;
            if cursor >= len {
                self.node_mut(container).focus_cursor = 0;
                if let Some(n) = nested {
                    return self.next_focusable(n);
                }
                // No nested slot: restart at the first child. The loop
                // terminates because focusable_here holds here.
                continue;
            }
            self.node_mut(container).focus_cursor = cursor + 1;
            let child = children[cursor];
            if self.is_focusable(child) {
                return Some(child);
            }
        }
    }

    /// Whether the container's focus cycle would yield anything: a focusable
    /// direct child, or a nested container with focusable content.
    pub fn has_focusable(&self, id: WidgetId) -> bool {
        let Some(node) = self.node_opt(id) else {
            return false;
        };
        if node.children.iter().any(|&c| self.is_focusable(c)) {
            return true;
        }
        node.nested.is_some_and(|n| n != id && self.has_focusable(n))
    }

    // --- internals ---

    fn node(&self, id: WidgetId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling WidgetId")
    }

    fn node_mut(&mut self, id: WidgetId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling WidgetId")
    }

    fn node_opt(&self, id: WidgetId) -> Option<&Node> {
        if self.generations.get(id.idx()).copied() != Some(id.1) {
            return None;
        }
        self.nodes.get(id.idx())?.as_ref()
    }

    fn node_opt_mut(&mut self, id: WidgetId) -> Option<&mut Node> {
        if self.generations.get(id.idx()).copied() != Some(id.1) {
            return None;
        }
        self.nodes.get_mut(id.idx())?.as_mut()
    }
}

/// Convenience for building a [`WidgetSpec`] at a position and size.
pub fn spec_at(x: f64, y: f64, width: f64, height: f64) -> WidgetSpec {
    WidgetSpec {
        origin: Point::new(x, y),
        size: Size::new(width, height),
        ..WidgetSpec::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use alloc::vec;
    use core::cell::RefCell;

    /// Records every backend hook invocation for transition checks.
    #[derive(Debug, Default)]
    struct Recording {
        shows: Vec<WidgetId>,
        hides: Vec<WidgetId>,
        positions: Vec<(WidgetId, f64, f64)>,
        sizes: Vec<(WidgetId, f64, f64)>,
        highlights: Vec<(WidgetId, bool)>,
        opacities: Vec<(WidgetId, u8)>,
        materials: Vec<(WidgetId, String)>,
    }

    impl RenderBackend for Recording {
        fn show(&mut self, id: WidgetId) {
            self.shows.push(id);
        }
        fn hide(&mut self, id: WidgetId) {
            self.hides.push(id);
        }
        fn set_position(&mut self, id: WidgetId, x: f64, y: f64) {
            self.positions.push((id, x, y));
        }
        fn set_size(&mut self, id: WidgetId, width: f64, height: f64) {
            self.sizes.push((id, width, height));
        }
        fn set_highlight(&mut self, id: WidgetId, on: bool) {
            self.highlights.push((id, on));
        }
        fn set_opacity(&mut self, id: WidgetId, percent: u8) {
            self.opacities.push((id, percent));
        }
        fn set_material(&mut self, id: WidgetId, material: &str) {
            self.materials.push((id, material.to_string()));
        }
    }

    fn focusable_spec(x: f64, y: f64, w: f64, h: f64) -> WidgetSpec {
        let mut spec = spec_at(x, y, w, h);
        spec.flags |= WidgetFlags::FOCUSABLE;
        spec
    }

    #[test]
    fn names_are_unique_and_looked_up() {
        let mut tree = WidgetTree::new();
        let a = tree.insert_widget(None, "a", WidgetSpec::default()).unwrap();
        assert_eq!(tree.lookup("a"), Some(a));
        assert_eq!(tree.name(a), Some("a"));
        let err = tree.insert_widget(None, "a", WidgetSpec::default());
        assert_eq!(err, Err(DuplicateName("a".to_string())));
        assert_eq!(tree.lookup("missing"), None);
    }

    #[test]
    fn remove_is_idempotent_and_recursive() {
        let mut tree = WidgetTree::new();
        let root = tree
            .insert_container(None, "root", WidgetSpec::default())
            .unwrap();
        let child = tree
            .insert_widget(Some(root), "child", WidgetSpec::default())
            .unwrap();
        tree.remove(root);
        assert!(!tree.is_alive(root));
        assert!(!tree.is_alive(child));
        assert_eq!(tree.lookup("root"), None);
        assert_eq!(tree.lookup("child"), None);
        // Second delete must not error or double-unregister.
        tree.remove(root);
        tree.remove(child);

        // The freed name can be reused; the reused slot mints a distinct id.
        let again = tree
            .insert_widget(None, "child", WidgetSpec::default())
            .unwrap();
        assert_ne!(again, child);
        assert!(tree.is_alive(again));
        assert!(!tree.is_alive(child));
    }

    #[test]
    fn stale_id_mutation_is_a_no_op() {
        let mut tree = WidgetTree::new();
        let w = tree.insert_widget(None, "w", spec_at(0.0, 0.0, 10.0, 10.0)).unwrap();
        tree.remove(w);
        tree.set_position(w, 50.0, 50.0);
        tree.set_size(w, 99.0, 99.0);
        tree.show(w);
        assert_eq!(tree.frame(w), None);
        assert!(!tree.contains(w, Point::new(5.0, 5.0)));
    }

    #[test]
    fn anchor_inside_right_and_center_reference_values() {
        let mut tree = WidgetTree::new();
        let reference = tree
            .insert_widget(None, "ref", spec_at(100.0, 100.0, 150.0, 100.0))
            .unwrap();
        let dep = tree
            .insert_widget(None, "dep", spec_at(0.0, 0.0, 50.0, 50.0))
            .unwrap();

        tree.set_left(dep, reference, HAttach::InsideRight, AnchorOffset::Px(0.0));
        assert_eq!(tree.frame(dep).unwrap().origin().x, 200.0);

        tree.set_left(dep, reference, HAttach::Center, AnchorOffset::Px(0.0));
        assert_eq!(tree.frame(dep).unwrap().origin().x, 150.0);
    }

    #[test]
    fn resize_reruns_anchor_but_direct_move_does_not() {
        let mut tree = WidgetTree::new();
        let reference = tree
            .insert_widget(None, "ref", spec_at(100.0, 100.0, 150.0, 100.0))
            .unwrap();
        let dep = tree
            .insert_widget(None, "dep", spec_at(0.0, 0.0, 50.0, 50.0))
            .unwrap();
        tree.set_left(dep, reference, HAttach::InsideRight, AnchorOffset::Px(0.0));
        assert_eq!(tree.frame(dep).unwrap().origin().x, 200.0);

        // A direct move breaks the cache; the anchor is not re-run.
        tree.set_position(dep, 10.0, 10.0);
        assert_eq!(tree.frame(dep).unwrap().origin().x, 10.0);

        // The next size change snaps the widget back onto its anchor.
        tree.set_size(dep, 30.0, 30.0);
        assert_eq!(tree.frame(dep).unwrap().origin().x, 220.0);
    }

    #[test]
    fn self_anchored_widget_skips_reresolution_on_resize() {
        let mut tree = WidgetTree::new();
        let w = tree
            .insert_widget(None, "w", spec_at(40.0, 40.0, 20.0, 20.0))
            .unwrap();
        tree.set_left(w, w, HAttach::InsideLeft, AnchorOffset::Px(0.0));
        assert_eq!(tree.frame(w).unwrap().origin().x, 40.0);
        tree.set_position(w, 70.0, 40.0);
        tree.set_size(w, 25.0, 25.0);
        // Self-anchored: the resize left the direct move in place.
        assert_eq!(tree.frame(w).unwrap().origin().x, 70.0);
    }

    #[test]
    fn resize_to_same_size_fires_no_hooks() {
        let mut tree = WidgetTree::with_backend(Recording::default());
        let w = tree
            .insert_widget(None, "w", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let sizes_before = tree.backend().sizes.len();
        tree.set_size(w, 10.0, 10.0);
        assert_eq!(tree.backend().sizes.len(), sizes_before);
        tree.set_size(w, 10.0, 12.0);
        assert_eq!(tree.backend().sizes.len(), sizes_before + 1);
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let mut tree = WidgetTree::new();
        let c = tree
            .insert_container(None, "c", spec_at(10.0, 20.0, 50.0, 60.0))
            .unwrap();
        for x in 10..=60 {
            for y in 20..=80 {
                assert!(
                    tree.contains(c, Point::new(f64::from(x), f64::from(y))),
                    "({x},{y}) must be inside"
                );
            }
        }
        assert!(!tree.contains(c, Point::new(9.0, 22.0)));
        assert!(!tree.contains(c, Point::new(12.0, 19.0)));
    }

    #[test]
    fn virtual_height_override_extends_hit_area() {
        let mut tree = WidgetTree::new();
        let c = tree
            .insert_container(None, "c", spec_at(0.0, 0.0, 50.0, 50.0))
            .unwrap();
        assert!(!tree.contains(c, Point::new(10.0, 60.0)));
        tree.set_virtual_height(c, 80.0);
        assert!(tree.contains(c, Point::new(10.0, 60.0)));
        tree.reset_virtual_height(c);
        assert!(!tree.contains(c, Point::new(10.0, 60.0)));
    }

    #[test]
    fn empty_zones_and_hit_transparency() {
        let mut tree = WidgetTree::new();
        let w = tree
            .insert_widget(None, "w", spec_at(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        tree.add_empty_zone(w, Rect::new(40.0, 40.0, 60.0, 60.0));
        assert!(tree.contains(w, Point::new(10.0, 10.0)));
        assert!(!tree.contains(w, Point::new(50.0, 50.0)));

        tree.set_empty_zones_enabled(w, false);
        assert!(tree.contains(w, Point::new(50.0, 50.0)));
        tree.set_empty_zones_enabled(w, true);
        tree.clear_empty_zones(w);
        assert!(tree.contains(w, Point::new(50.0, 50.0)));

        tree.set_hit_transparent(w, true);
        assert!(!tree.contains(w, Point::new(10.0, 10.0)));
        tree.set_hit_transparent(w, false);
        assert!(tree.contains(w, Point::new(10.0, 10.0)));
    }

    #[test]
    fn widget_at_prefers_later_siblings_and_skips_hidden() {
        let mut tree = WidgetTree::new();
        let root = tree
            .insert_container(None, "root", spec_at(0.0, 0.0, 200.0, 200.0))
            .unwrap();
        let under = tree
            .insert_widget(Some(root), "under", spec_at(10.0, 10.0, 60.0, 60.0))
            .unwrap();
        let over = tree
            .insert_widget(Some(root), "over", spec_at(40.0, 40.0, 60.0, 60.0))
            .unwrap();

        assert_eq!(tree.widget_at(root, Point::new(50.0, 50.0)), Some(over));
        assert_eq!(tree.widget_at(root, Point::new(15.0, 15.0)), Some(under));
        assert_eq!(tree.widget_at(root, Point::new(150.0, 150.0)), Some(root));
        assert_eq!(tree.widget_at(root, Point::new(500.0, 500.0)), None);

        tree.hide(over);
        assert_eq!(tree.widget_at(root, Point::new(50.0, 50.0)), Some(under));
    }

    #[test]
    fn hit_transparent_container_still_exposes_children() {
        let mut tree = WidgetTree::new();
        let root = tree
            .insert_container(None, "root", spec_at(0.0, 0.0, 200.0, 200.0))
            .unwrap();
        let child = tree
            .insert_widget(Some(root), "child", spec_at(10.0, 10.0, 20.0, 20.0))
            .unwrap();
        tree.set_hit_transparent(root, true);
        assert_eq!(tree.widget_at(root, Point::new(15.0, 15.0)), Some(child));
        assert_eq!(tree.widget_at(root, Point::new(100.0, 100.0)), None);
    }

    #[test]
    fn highlight_fires_only_on_transitions() {
        let mut tree = WidgetTree::with_backend(Recording::default());
        let w = tree
            .insert_widget(None, "w", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        tree.highlight(w, true);
        tree.highlight(w, true);
        tree.highlight(w, false);
        tree.highlight(w, false);
        assert_eq!(tree.backend().highlights, vec![(w, true), (w, false)]);
    }

    #[test]
    fn highlight_requires_visible_and_highlightable() {
        let mut tree = WidgetTree::with_backend(Recording::default());
        let mut spec = spec_at(0.0, 0.0, 10.0, 10.0);
        spec.flags.remove(WidgetFlags::HIGHLIGHTABLE);
        let plain = tree.insert_widget(None, "plain", spec).unwrap();
        tree.highlight(plain, true);
        assert!(tree.backend().highlights.is_empty());

        let hidden = tree
            .insert_widget(None, "hidden", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        tree.hide(hidden);
        tree.highlight(hidden, true);
        assert!(tree.backend().highlights.is_empty());
    }

    #[test]
    fn show_hide_are_idempotent_and_recursive() {
        let mut tree = WidgetTree::with_backend(Recording::default());
        let root = tree
            .insert_container(None, "root", spec_at(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        let child = tree
            .insert_widget(Some(root), "child", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();

        let shows_after_insert = tree.backend().shows.len();
        tree.hide(root);
        assert_eq!(tree.backend().hides, vec![root, child]);
        tree.hide(root);
        assert_eq!(tree.backend().hides.len(), 2);

        tree.show(root);
        assert_eq!(tree.backend().shows.len(), shows_after_insert + 2);
        tree.show(root);
        assert_eq!(tree.backend().shows.len(), shows_after_insert + 2);
    }

    #[test]
    fn visibility_transitions_mark_the_root_dirty() {
        let mut tree = WidgetTree::new();
        let root = tree
            .insert_container(None, "root", spec_at(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        let inner = tree
            .insert_container(Some(root), "inner", spec_at(0.0, 0.0, 50.0, 50.0))
            .unwrap();
        let leaf = tree
            .insert_widget(Some(inner), "leaf", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();

        assert!(!tree.take_dirty(root));
        tree.hide(leaf);
        assert!(tree.take_dirty(root));
        assert!(!tree.take_dirty(root));
        tree.show(leaf);
        assert!(tree.take_dirty(root));
    }

    #[test]
    fn pointer_listeners_run_in_registration_order() {
        let mut tree = WidgetTree::new();
        let w = tree
            .insert_widget(None, "w", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();

        let l = Rc::clone(&log);
        tree.add_pointer_listener(w, PointerKind::LeftClick, move |_| l.borrow_mut().push("first"));
        let l = Rc::clone(&log);
        tree.add_pointer_listener(w, PointerKind::LeftClick, move |_| l.borrow_mut().push("second"));
        let l = Rc::clone(&log);
        tree.add_pointer_listener(w, PointerKind::Wheel, move |_| l.borrow_mut().push("wheel"));

        tree.fire_pointer(w, PointerKind::LeftClick, &PointerEvent::at(Point::ZERO));
        assert_eq!(*log.borrow(), vec!["first", "second"]);

        // Hidden widgets receive nothing.
        tree.hide(w);
        tree.fire_pointer(w, PointerKind::Wheel, &PointerEvent::at(Point::ZERO));
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn remove_click_listeners_spares_other_kinds() {
        let mut tree = WidgetTree::new();
        let w = tree
            .insert_widget(None, "w", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        for kind in [
            PointerKind::LeftClick,
            PointerKind::DoubleLeftClick,
            PointerKind::RightClick,
            PointerKind::Release,
            PointerKind::Drag,
        ] {
            let l = Rc::clone(&log);
            tree.add_pointer_listener(w, kind, move |_| l.borrow_mut().push("hit"));
        }
        tree.remove_click_listeners(w);
        let ev = PointerEvent::at(Point::ZERO);
        tree.fire_pointer(w, PointerKind::LeftClick, &ev);
        tree.fire_pointer(w, PointerKind::Release, &ev);
        assert!(log.borrow().is_empty());
        tree.fire_pointer(w, PointerKind::Drag, &ev);
        assert_eq!(*log.borrow(), vec!["hit"]);
    }

    #[test]
    fn keyboard_listener_makes_widget_focusable() {
        let mut tree = WidgetTree::new();
        let w = tree
            .insert_widget(None, "w", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        assert!(!tree.is_focusable(w));
        tree.add_keyboard_listener(w, |_| false);
        assert!(tree.is_focusable(w));
    }

    #[test]
    fn unconsumed_key_input_bubbles_to_ancestors() {
        let mut tree = WidgetTree::new();
        let root = tree
            .insert_container(None, "root", spec_at(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        let mid = tree
            .insert_container(Some(root), "mid", spec_at(0.0, 0.0, 50.0, 50.0))
            .unwrap();
        let leaf = tree
            .insert_widget(Some(mid), "leaf", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();

        let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let l = Rc::clone(&log);
        tree.add_keyboard_listener(leaf, move |_| {
            l.borrow_mut().push("leaf");
            false
        });
        let l = Rc::clone(&log);
        tree.add_keyboard_listener(mid, move |_| {
            l.borrow_mut().push("mid");
            true
        });
        let l = Rc::clone(&log);
        tree.add_keyboard_listener(root, move |_| {
            l.borrow_mut().push("root");
            true
        });

        // `mid` consumes, so `root` never sees the event.
        assert!(tree.key_pressed(leaf, &KeyInput::Char('x')));
        assert_eq!(*log.borrow(), vec!["leaf", "mid"]);
    }

    #[test]
    fn bubbling_stops_naturally_at_a_root() {
        let mut tree = WidgetTree::new();
        let root = tree
            .insert_container(None, "root", spec_at(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        let leaf = tree
            .insert_widget(Some(root), "leaf", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        tree.add_keyboard_listener(leaf, |_| false);
        assert!(!tree.key_pressed(leaf, &KeyInput::SpecialPressed(crate::event::SpecialKey::TAB)));
    }

    #[test]
    fn every_key_listener_runs_even_after_one_consumes() {
        let mut tree = WidgetTree::new();
        let w = tree
            .insert_widget(None, "w", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        let l = Rc::clone(&log);
        tree.add_keyboard_listener(w, move |_| {
            l.borrow_mut().push("a");
            true
        });
        let l = Rc::clone(&log);
        tree.add_keyboard_listener(w, move |_| {
            l.borrow_mut().push("b");
            false
        });
        assert!(tree.key_pressed(w, &KeyInput::Char('k')));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    // The documented focus-cycle scenario, reproduced step by step. Each
    // stage drives one full cycle so the cursor lands where the next stage
    // expects it.
    #[test]
    fn focus_cycle_scenario() {
        let mut tree = WidgetTree::new();
        let parent = tree
            .insert_container(None, "parent", spec_at(0.0, 0.0, 300.0, 300.0))
            .unwrap();
        let w1 = tree
            .insert_widget(Some(parent), "w1", focusable_spec(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let w2 = tree
            .insert_widget(Some(parent), "w2", focusable_spec(10.0, 0.0, 10.0, 10.0))
            .unwrap();

        assert_eq!(tree.next_focusable(parent), Some(w1));
        assert_eq!(tree.next_focusable(parent), Some(w2));

        let w3 = tree
            .insert_widget(Some(parent), "w3", focusable_spec(20.0, 0.0, 10.0, 10.0))
            .unwrap();
        assert_eq!(tree.next_focusable(parent), Some(w3));
        assert_eq!(tree.next_focusable(parent), Some(w1));
        assert_eq!(tree.next_focusable(parent), Some(w2));
        assert_eq!(tree.next_focusable(parent), Some(w3));

        let nested = tree
            .insert_container(Some(parent), "nested", spec_at(0.0, 100.0, 100.0, 100.0))
            .unwrap();
        let w4 = tree
            .insert_widget(Some(nested), "w4", focusable_spec(0.0, 100.0, 10.0, 10.0))
            .unwrap();
        assert_eq!(tree.next_focusable(parent), Some(w4));
        assert_eq!(tree.next_focusable(parent), Some(w1));
        assert_eq!(tree.next_focusable(parent), Some(w2));
        assert_eq!(tree.next_focusable(parent), Some(w3));

        let w5 = tree
            .insert_widget(Some(parent), "w5", focusable_spec(30.0, 0.0, 10.0, 10.0))
            .unwrap();
        assert_eq!(tree.next_focusable(parent), Some(w5));
        assert_eq!(tree.next_focusable(parent), Some(w4));
        assert_eq!(tree.next_focusable(parent), Some(w1));
        assert_eq!(tree.next_focusable(parent), Some(w2));
        assert_eq!(tree.next_focusable(parent), Some(w3));

        // A non-focusable child leaves the cycle unchanged.
        let _w6 = tree
            .insert_widget(Some(parent), "w6", spec_at(40.0, 0.0, 10.0, 10.0))
            .unwrap();
        assert_eq!(tree.next_focusable(parent), Some(w5));
        assert_eq!(tree.next_focusable(parent), Some(w4));
        assert_eq!(tree.next_focusable(parent), Some(w1));
        assert_eq!(tree.next_focusable(parent), Some(w2));
        assert_eq!(tree.next_focusable(parent), Some(w3));
    }

    #[test]
    fn focus_traversal_with_no_focusables_returns_none() {
        let mut tree = WidgetTree::new();
        let parent = tree
            .insert_container(None, "parent", WidgetSpec::default())
            .unwrap();
        assert_eq!(tree.next_focusable(parent), None);
        let _plain = tree
            .insert_widget(Some(parent), "plain", WidgetSpec::default())
            .unwrap();
        assert_eq!(tree.next_focusable(parent), None);
    }

    #[test]
    fn superseded_nested_container_is_not_visited() {
        let mut tree = WidgetTree::new();
        let parent = tree
            .insert_container(None, "parent", WidgetSpec::default())
            .unwrap();
        let old_nested = tree
            .insert_container(Some(parent), "old", WidgetSpec::default())
            .unwrap();
        let in_old = tree
            .insert_widget(Some(old_nested), "in_old", focusable_spec(0.0, 0.0, 1.0, 1.0))
            .unwrap();
        let new_nested = tree
            .insert_container(Some(parent), "new", WidgetSpec::default())
            .unwrap();
        let in_new = tree
            .insert_widget(Some(new_nested), "in_new", focusable_spec(0.0, 0.0, 1.0, 1.0))
            .unwrap();

        // Only the newest nested container participates.
        let mut seen = vec![];
        for _ in 0..4 {
            seen.push(tree.next_focusable(parent));
        }
        assert!(seen.iter().all(|s| *s == Some(in_new)));
        assert!(!seen.contains(&Some(in_old)));
    }

    #[test]
    fn removed_nested_container_drops_out_of_the_cycle() {
        let mut tree = WidgetTree::new();
        let parent = tree
            .insert_container(None, "parent", WidgetSpec::default())
            .unwrap();
        let w1 = tree
            .insert_widget(Some(parent), "w1", focusable_spec(0.0, 0.0, 1.0, 1.0))
            .unwrap();
        let nested = tree
            .insert_container(Some(parent), "nested", WidgetSpec::default())
            .unwrap();
        let _w2 = tree
            .insert_widget(Some(nested), "w2", focusable_spec(0.0, 0.0, 1.0, 1.0))
            .unwrap();
        tree.remove(nested);
        for _ in 0..3 {
            assert_eq!(tree.next_focusable(parent), Some(w1));
        }
    }

    #[test]
    fn opacity_and_material_hooks() {
        let mut tree = WidgetTree::with_backend(Recording::default());
        let w = tree
            .insert_widget(None, "w", spec_at(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        tree.set_opacity(w, 60);
        tree.set_opacity(w, 60);
        tree.set_opacity(w, 200);
        assert_eq!(tree.backend().opacities, vec![(w, 60), (w, 100)]);

        tree.set_material(w, "panel/steel");
        assert_eq!(
            tree.backend().materials,
            vec![(w, "panel/steel".to_string())]
        );
    }
}
