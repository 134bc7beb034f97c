// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_widget --heading-base-level=0

//! Canopy Widget: the interaction tree of the Canopy GUI core.
//!
//! This crate owns widget structure and interaction state: parent/child
//! links, per-widget listener lists, hit testing with empty zones and
//! virtual heights, hover/focus highlighting, and round-robin focus
//! traversal through containers. Geometry and anchor resolution come from
//! [`canopy_layout`]; rendering is delegated through the [`RenderBackend`]
//! seam, which a concrete renderer implements and the tree calls on real
//! state transitions only.
//!
//! ## Where this fits
//!
//! - Layout ([`canopy_layout`]): anchored frames, pure arithmetic.
//! - Widget tree (this crate): interaction and state.
//! - Dispatch (`canopy_dispatch`): routing raw input across Z-ordered views
//!   into this tree.
//!
//! ## API overview
//!
//! - [`WidgetTree`]: the arena of widgets, generic over a [`RenderBackend`].
//! - [`WidgetId`]: generational handle of a widget; stale ids are inert.
//! - [`WidgetSpec`] and [`WidgetFlags`]: creation-time data and state bits.
//! - [`PointerEvent`] / [`PointerKind`] / [`KeyInput`]: the event surface.
//!
//! Key operations:
//! - [`WidgetTree::insert_widget`] / [`WidgetTree::insert_container`] →
//!   [`WidgetId`], with tree-unique names behind [`WidgetTree::lookup`].
//! - [`WidgetTree::set_left`] / [`WidgetTree::set_top`] /
//!   [`WidgetTree::set_size`]: anchored layout writes.
//! - [`WidgetTree::widget_at`]: topmost-child-first point query.
//! - [`WidgetTree::fire_pointer`] and [`WidgetTree::key_pressed`]:
//!   delivery, the latter bubbling unconsumed input to ancestors.
//! - [`WidgetTree::next_focusable`]: the container focus cycle.
//!
//! ## Example
//!
//! ```
//! use canopy_widget::{WidgetTree, WidgetSpec, PointerKind, PointerEvent};
//! use kurbo::{Point, Size};
//!
//! let mut tree = WidgetTree::new();
//! let panel = tree
//!     .insert_container(
//!         None,
//!         "panel",
//!         WidgetSpec {
//!             origin: Point::new(10.0, 20.0),
//!             size: Size::new(50.0, 60.0),
//!             ..WidgetSpec::default()
//!         },
//!     )
//!     .unwrap();
//! tree.add_pointer_listener(panel, PointerKind::LeftClick, |ev| {
//!     println!("clicked at {:?}", ev.pos);
//! });
//!
//! // Edges are inclusive on all four sides.
//! assert_eq!(tree.widget_at(panel, Point::new(60.0, 80.0)), Some(panel));
//! tree.fire_pointer(panel, PointerKind::LeftClick, &PointerEvent::at(Point::new(30.0, 30.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod event;
pub mod tree;
pub mod types;

pub use backend::{NoopBackend, RenderBackend};
pub use event::{KeyInput, KeyListener, PointerEvent, PointerKind, PointerListener, SpecialKey};
pub use tree::{WidgetTree, spec_at};
pub use types::{DuplicateName, WidgetFlags, WidgetId, WidgetSpec};
