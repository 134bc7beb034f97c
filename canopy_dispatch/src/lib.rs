// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_dispatch --heading-base-level=0

//! Canopy Dispatch: routing raw input across Z-ordered views.
//!
//! ## Overview
//!
//! This crate sits on top of [`canopy_widget`]. An application registers
//! one or more widget-tree roots as views, each with a [`Zorder`] depth, and
//! feeds raw input (pointer positions, clicks, wheel, keyboard) to a
//! [`Dispatcher`]. The dispatcher resolves which widget owns each event and
//! delivers it through the tree:
//!
//! - Pointer events go to the topmost widget under the mouse, scanning
//!   views by depth, highest first. Equal depths resolve to the earlier
//!   registration; the scan order refreshes lazily, gated on the dirty
//!   flags the tree raises on visibility transitions.
//! - A held left click *captures* the pointer: drag and release events
//!   stick to the clicked widget even after the pointer leaves it.
//! - Keyboard events go to the focused widget; unconsumed input bubbles up
//!   the parent chain inside the tree.
//!
//! Both the hover owner and the focus owner are always live widgets. When
//! nothing claims the pointer or the focus, they fall back to a hidden sink
//! widget the dispatcher installs, so there is no "no target" case anywhere
//! downstream.
//!
//! ## Example
//!
//! ```
//! use canopy_dispatch::{Dispatcher, Zorder};
//! use canopy_widget::{WidgetTree, spec_at};
//! use kurbo::Point;
//!
//! let mut tree = WidgetTree::new();
//! let hud = tree.insert_container(None, "hud", spec_at(0.0, 0.0, 800.0, 600.0)).unwrap();
//! let menu = tree.insert_container(None, "menu", spec_at(200.0, 100.0, 400.0, 300.0)).unwrap();
//!
//! let mut dispatcher = Dispatcher::new(&mut tree);
//! dispatcher.add_view(hud, Some(Zorder::new(10)));
//! dispatcher.add_view(menu, Some(Zorder::GUI_TOP));
//!
//! // The menu overlaps the HUD and stacks above it.
//! dispatcher.mouse_move(&mut tree, Point::new(300.0, 200.0));
//! assert_eq!(dispatcher.under_mouse(), menu);
//! dispatcher.mouse_move(&mut tree, Point::new(50.0, 50.0));
//! assert_eq!(dispatcher.under_mouse(), hud);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
pub mod view;
pub mod zorder;

pub use dispatcher::Dispatcher;
pub use view::View;
pub use zorder::Zorder;
