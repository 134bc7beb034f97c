// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Layout: anchor-relative layout resolution for retained-mode GUIs.
//!
//! - Attachment modes describe how one edge or axis of a rectangle relates to
//!   another rectangle (outside, inside, or centered), with a pixel or
//!   fractional offset.
//! - [`Frame`] caches the resolved absolute position so reads are O(1); the
//!   stored rule is re-applied eagerly whenever either rectangle's size
//!   changes, never walked lazily at read time.
//!
//! This crate knows nothing about widgets or rendering. It is generic over
//! the key type `K` used to name an anchor target, so a widget tree can store
//! its own node handles inside a [`Frame`] without this crate depending on it.
//!
//! ## Resolution
//!
//! Horizontal modes resolve a `left` coordinate against the target's
//! `left`/`width` and the dependent rectangle's own `width`; vertical modes
//! are symmetric over `top`/`height`. For example, with a target at
//! `(100, 100)` sized `150×100` and a dependent rectangle sized `50×50`:
//!
//! ```
//! use canopy_layout::{Frame, HAttach, AnchorOffset};
//!
//! let mut frame: Frame<u32> = Frame::new();
//! frame.set_size(50.0, 50.0);
//! frame.anchor_left(7, HAttach::InsideRight, AnchorOffset::Px(0.0), 100.0, 150.0);
//! assert_eq!(frame.origin().x, 200.0);
//! frame.anchor_left(7, HAttach::Center, AnchorOffset::Px(0.0), 100.0, 150.0);
//! assert_eq!(frame.origin().x, 150.0);
//! ```
//!
//! ## Hit rectangles
//!
//! A frame carries a *virtual height* used only for hit testing. It follows
//! the real height on every size change but can be overridden, so a panel
//! collapsed to its title bar can keep capturing input over its full nominal
//! area. Containment is inclusive on all four edges.
//!
//! This crate is `no_std` and does not allocate.

#![no_std]

pub mod anchor;
pub mod frame;

pub use anchor::{Alignment, AnchorOffset, HAnchor, HAttach, VAnchor, VAttach};
pub use frame::{Frame, rect_contains_inclusive};
