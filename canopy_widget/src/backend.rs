// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer seam.
//!
//! The tree calls into a [`RenderBackend`] on real state transitions only
//! (never redundantly), so a backend can mirror tree state without
//! deduplicating. The backend is injected at tree construction; the core
//! performs no drawing of its own.

use crate::types::WidgetId;

/// Hooks a concrete renderer implements to mirror widget state.
///
/// All methods default to no-ops so a backend only implements the hooks it
/// cares about.
pub trait RenderBackend {
    /// The widget became visible.
    fn show(&mut self, id: WidgetId) {
        let _ = id;
    }

    /// The widget became hidden.
    fn hide(&mut self, id: WidgetId) {
        let _ = id;
    }

    /// The widget's absolute position changed (or was explicitly re-set).
    fn set_position(&mut self, id: WidgetId, x: f64, y: f64) {
        let _ = (id, x, y);
    }

    /// The widget's rendered size changed.
    fn set_size(&mut self, id: WidgetId, width: f64, height: f64) {
        let _ = (id, width, height);
    }

    /// The widget's highlight state flipped.
    fn set_highlight(&mut self, id: WidgetId, on: bool) {
        let _ = (id, on);
    }

    /// The widget's opacity changed (percent, `0..=100`).
    fn set_opacity(&mut self, id: WidgetId, percent: u8) {
        let _ = (id, percent);
    }

    /// The widget's material changed. Materials are opaque to the core.
    fn set_material(&mut self, id: WidgetId, material: &str) {
        let _ = (id, material);
    }
}

/// A backend that ignores every hook. The default for trees that are only
/// used for layout and routing (including most tests).
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopBackend;

impl RenderBackend for NoopBackend {}
