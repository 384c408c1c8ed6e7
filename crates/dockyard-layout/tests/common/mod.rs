//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use std::time::Instant;

use dockyard_config::load_layout_config;
use dockyard_layout::component::{recording_factory, CallLog};
use dockyard_layout::{ItemId, LayoutManager};

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;

/// Register the `x` component type, size the container and init.
pub fn started(mut mgr: LayoutManager) -> (LayoutManager, CallLog) {
    let log = CallLog::default();
    mgr.register_component("x", recording_factory(log.clone())).unwrap();
    mgr.set_container_size(WIDTH, HEIGHT);
    mgr.init().unwrap();
    (mgr, log)
}

pub fn layout(json: &str) -> LayoutManager {
    started(LayoutManager::new(load_layout_config(json).unwrap())).0
}

pub fn children(mgr: &LayoutManager, id: ItemId) -> Vec<ItemId> {
    mgr.item(id).unwrap().children().to_vec()
}

pub fn titles(mgr: &LayoutManager, stack: ItemId) -> Vec<String> {
    children(mgr, stack)
        .into_iter()
        .map(|c| mgr.container(c).unwrap().title().to_string())
        .collect()
}

/// A point inside the tab of `item`, clear of its close button.
pub fn tab_point(mgr: &LayoutManager, stack: ItemId, item: ItemId) -> (f64, f64) {
    let rect = mgr
        .item(stack)
        .and_then(|s| s.as_stack())
        .and_then(|s| s.header().tab_for(item))
        .and_then(|t| t.rect())
        .expect("tab has no rectangle");
    (rect.x + 5.0, rect.y + rect.height / 2.0)
}

/// Press at `from`, move straight to `to` and release there.
pub fn drag(mgr: &mut LayoutManager, from: (f64, f64), to: (f64, f64)) {
    let now = Instant::now();
    mgr.pointer_down(from.0, from.1, now).unwrap();
    mgr.pointer_move(to.0, to.1, now).unwrap();
    assert!(mgr.is_dragging(), "pointer move did not start a drag");
    mgr.pointer_up(to.0, to.1).unwrap();
}

/// Structural rules that must hold after any operation.
pub fn assert_tree_invariants(mgr: &LayoutManager) {
    let all = mgr.get_all_content_items();
    let grounds = all.iter().filter(|id| mgr.item(**id).unwrap().is_ground()).count();
    assert_eq!(grounds, 1, "exactly one ground");
    assert!(children(mgr, mgr.ground()).len() <= 1, "ground has at most one child");

    for id in all {
        let item = mgr.item(id).unwrap();
        for child in item.children() {
            assert_eq!(mgr.item(*child).unwrap().parent(), Some(id), "broken parent link");
        }
        if let Some(stack) = item.as_stack() {
            if !item.children().is_empty() {
                let active = stack.active().expect("stack without an active child");
                assert!(item.children().contains(&active), "active child not in stack");
            }
            assert_eq!(stack.header().tabs().len(), item.children().len(), "tabs out of sync");
        }
        if item.is_row_or_column() {
            for child in item.children() {
                assert!(!mgr.item(*child).unwrap().is_component(), "bare component in row or column");
            }
        }
    }
}
