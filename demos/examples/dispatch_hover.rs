// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover, click, and pointer capture across two overlapping views.
//!
//! A HUD view sits under a dialog view stacked at the GUI-top depth; the
//! pointer wanders across both, clicks a button, and drags off it while the
//! click is held.
//!
//! Run:
//! - `cargo run -p canopy_demos --example dispatch_hover`

use std::cell::RefCell;
use std::rc::Rc;

use canopy_dispatch::{Dispatcher, Zorder};
use canopy_widget::{PointerKind, WidgetTree, spec_at};
use kurbo::{Point, Vec2};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut tree = WidgetTree::new();
    let hud = tree
        .insert_container(None, "hud", spec_at(0.0, 0.0, 800.0, 600.0))
        .unwrap();
    let dialog = tree
        .insert_container(None, "dialog", spec_at(200.0, 150.0, 400.0, 300.0))
        .unwrap();
    let button = tree
        .insert_widget(Some(dialog), "ok", spec_at(380.0, 400.0, 60.0, 24.0))
        .unwrap();

    let clicks: Rc<RefCell<u32>> = Rc::default();
    let c = Rc::clone(&clicks);
    tree.add_pointer_listener(button, PointerKind::LeftClick, move |ev| {
        *c.borrow_mut() += 1;
        println!("ok clicked at {:?}", ev.pos);
    });
    tree.add_pointer_listener(button, PointerKind::Drag, |ev| {
        println!("ok dragged by {:?}", ev.delta);
    });

    let mut dispatcher = Dispatcher::new(&mut tree);
    dispatcher.add_view(hud, Some(Zorder::new(10)));
    dispatcher.add_view(dialog, Some(Zorder::GUI_TOP));

    dispatcher.mouse_move(&mut tree, Point::new(50.0, 50.0));
    println!("over {}", tree.name(dispatcher.under_mouse()).unwrap());

    dispatcher.mouse_move(&mut tree, Point::new(400.0, 410.0));
    println!("over {}", tree.name(dispatcher.under_mouse()).unwrap());

    dispatcher.mouse_left_click(&mut tree, Point::new(400.0, 410.0));
    // The drag sticks to the button even though the pointer left it.
    dispatcher.mouse_move(&mut tree, Point::new(700.0, 50.0));
    dispatcher.mouse_drag(&mut tree, Point::new(700.0, 50.0), Vec2::new(300.0, -360.0));
    dispatcher.mouse_release(&mut tree, Point::new(700.0, 50.0));

    assert_eq!(*clicks.borrow(), 1);
    assert_eq!(tree.name(dispatcher.under_mouse()), Some("hud"));
}
