// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Round-robin focus traversal through a container.
//!
//! Builds a container with three focusable fields plus a nested container,
//! then walks the focus cycle the way a Tab handler would.
//!
//! Run:
//! - `cargo run -p canopy_demos --example focus_cycle`

use canopy_widget::{WidgetTree, spec_at};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut tree = WidgetTree::new();
    let form = tree
        .insert_container(None, "form", spec_at(0.0, 0.0, 300.0, 300.0))
        .unwrap();
    for (i, name) in ["name", "street", "city"].into_iter().enumerate() {
        let field = tree
            .insert_widget(
                Some(form),
                name,
                spec_at(10.0, 10.0 + 30.0 * i as f64, 200.0, 24.0),
            )
            .unwrap();
        tree.add_keyboard_listener(field, |_| true);
    }
    let extras = tree
        .insert_container(Some(form), "extras", spec_at(10.0, 120.0, 200.0, 100.0))
        .unwrap();
    let nickname = tree
        .insert_widget(Some(extras), "nickname", spec_at(20.0, 130.0, 180.0, 24.0))
        .unwrap();
    tree.add_keyboard_listener(nickname, |_| true);

    // Two full cycles: the nested container's field takes the wrap slot.
    for _ in 0..8 {
        let next = tree.next_focusable(form).unwrap();
        println!("focus -> {}", tree.name(next).unwrap());
    }
}
