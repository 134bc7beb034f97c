// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A registered widget-tree root with a stacking depth.

use canopy_widget::WidgetId;

use crate::zorder::Zorder;

/// One entry in the dispatcher's view list: a root widget, its stacking
/// depth, whether it currently accepts input, and the view's own notion of
/// where focus last was inside it.
///
/// An inactive view stays registered and keeps its depth but is skipped
/// during hit scans, so input falls through to the views below it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct View {
    /// Root widget of this view's subtree.
    pub root: WidgetId,
    /// Stacking depth; higher is nearer the user.
    pub z: Zorder,
    /// Whether the view accepts input.
    pub active: bool,
    /// Last widget inside this view to hold focus; starts at the root.
    /// Updated by the dispatcher whenever focus lands in the subtree, read
    /// back when focus returns to the view as a whole.
    pub focus_target: WidgetId,
}

impl View {
    /// A new, active view at the given depth, with the focus target at the
    /// root.
    pub fn new(root: WidgetId, z: Zorder) -> Self {
        Self {
            root,
            z,
            active: true,
            focus_target: root,
        }
    }
}
