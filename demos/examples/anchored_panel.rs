// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchored layout basics.
//!
//! A label is anchored inside a panel, moved directly, and then resized to
//! show the two asymmetries of the anchor cache: direct moves stick, size
//! changes snap back onto the anchor.
//!
//! Run:
//! - `cargo run -p canopy_demos --example anchored_panel`

use canopy_layout::{AnchorOffset, HAttach, VAttach};
use canopy_widget::{WidgetTree, spec_at};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut tree = WidgetTree::new();
    let panel = tree
        .insert_container(None, "panel", spec_at(100.0, 100.0, 150.0, 100.0))
        .unwrap();
    let label = tree
        .insert_widget(Some(panel), "label", spec_at(0.0, 0.0, 50.0, 20.0))
        .unwrap();

    tree.set_left(label, panel, HAttach::InsideRight, AnchorOffset::Px(0.0));
    tree.set_top(label, panel, VAttach::TopInside, AnchorOffset::Px(4.0));
    println!("anchored:     {:?}", tree.frame(label).unwrap().origin());

    // A direct move wins over the stored anchor...
    tree.set_position(label, 10.0, 10.0);
    println!("moved:        {:?}", tree.frame(label).unwrap().origin());

    // ...until the next size change re-runs the rules.
    tree.set_size(label, 60.0, 20.0);
    println!("resized:      {:?}", tree.frame(label).unwrap().origin());

    assert_eq!(tree.frame(label).unwrap().origin().x, 190.0);
}
