//! Popout windows against the in-memory host, with a live child manager
//! where the opener needs one.

mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use dockyard_common::{DockError, HostError, USER_BROADCAST_EVENT};
use dockyard_config::{load_layout_config, ResolvedItemConfig, ResolvedLayoutConfig};
use dockyard_layout::component::{recording_factory, CallLog};
use dockyard_layout::events::{INITIALISED, POPOUT_BLOCKED, WINDOW_CLOSED, WINDOW_OPENED};
use dockyard_layout::popout::POPOUT_POLL_INTERVAL;
use dockyard_layout::{Environment, ItemId, LayoutManager, MemoryHost, WindowContext, WindowRegistry};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{assert_tree_invariants, children, started, titles};

const THREE_COLUMNS: &str = r#"{ "root": { "type": "row", "id": "main", "content": [
    { "type": "stack", "content": [
        { "type": "component", "componentType": "x", "title": "one" },
        { "type": "component", "componentType": "x", "title": "two" }
    ] },
    { "type": "component", "componentType": "x", "title": "three" },
    { "type": "component", "componentType": "x", "title": "four" }
] } }"#;

const TWO_COLUMNS: &str = r#"{ "root": { "type": "row", "id": "main", "content": [
    { "type": "stack", "content": [
        { "type": "component", "componentType": "x", "title": "one" },
        { "type": "component", "componentType": "x", "title": "two" }
    ] },
    { "type": "component", "componentType": "x", "title": "three" }
] } }"#;

struct Fixture {
    host: Rc<MemoryHost>,
    windows: Rc<WindowRegistry>,
    main: LayoutManager,
    row: ItemId,
}

fn fixture(settings: &str) -> Fixture {
    fixture_for(THREE_COLUMNS, settings)
}

fn fixture_for(layout: &str, settings: &str) -> Fixture {
    let json = layout.replacen('{', &format!("{{ \"settings\": {settings},"), 1);
    let config = load_layout_config(&json).unwrap();
    let host = Rc::new(MemoryHost::new());
    let windows = WindowRegistry::new();
    let env = Environment::with_host(host.clone(), windows.clone());
    let (main, _) = started(LayoutManager::with_environment(config, env));
    let row = main.find_items_by_id("main")[0];
    Fixture {
        host,
        windows,
        main,
        row,
    }
}

/// Boot the manager of the most recently opened window.
fn boot_child(f: &Fixture) -> Rc<RefCell<LayoutManager>> {
    let (handle, url) = f.host.take_opened().pop().expect("no window opened");
    let env = Environment {
        context: WindowContext::for_window(handle, url),
        ..Environment::with_host(f.host.clone(), f.windows.clone())
    };
    let child = LayoutManager::new_shared(ResolvedLayoutConfig::default(), env);
    {
        let mut c = child.borrow_mut();
        c.register_component("x", recording_factory(CallLog::default())).unwrap();
        c.set_container_size(400.0, 300.0);
        c.init().unwrap();
    }
    child
}

fn record(mgr: &mut LayoutManager, name: &'static str) -> Rc<RefCell<usize>> {
    let count = Rc::new(RefCell::new(0));
    let seen = count.clone();
    mgr.on(name, move |_| *seen.borrow_mut() += 1);
    count
}

#[test]
fn child_window_boots_from_stored_config() {
    let mut f = fixture("{}");
    let stack = children(&f.main, f.row)[0];
    f.main.create_popout(stack).unwrap().unwrap();
    assert_eq!(f.host.storage_len(), 1);

    let opened = record(&mut f.main, WINDOW_OPENED);
    let child = boot_child(&f);
    assert_eq!(f.host.storage_len(), 0);
    {
        let c = child.borrow();
        assert!(c.is_sub_window());
        let root = c.root().unwrap();
        assert_eq!(titles(&c, root), ["one", "two"]);
    }

    f.main.tick(Instant::now()).unwrap();
    assert_eq!(*opened.borrow(), 1);
    assert!(f.main.popouts()[0].is_initialised());

    let saved = f.main.save_layout().unwrap();
    assert_eq!(saved.open_popouts.len(), 1);
    let Some(ResolvedItemConfig::Stack(stack)) = &saved.open_popouts[0].root else {
        panic!("popout root should be a stack");
    };
    assert_eq!(stack.content.len(), 2);
}

#[test]
fn popout_announces_initialised_once() {
    let mut f = fixture("{}");
    let stack = children(&f.main, f.row)[0];
    let id = f.main.create_popout(stack).unwrap().unwrap();

    let count = Rc::new(RefCell::new(0));
    let seen = count.clone();
    f.main
        .popout_mut(id)
        .unwrap()
        .on(INITIALISED, move |_| *seen.borrow_mut() += 1);

    f.main.tick(Instant::now()).unwrap();
    assert_eq!(*count.borrow(), 0);

    let _child = boot_child(&f);
    let now = Instant::now() + POPOUT_POLL_INTERVAL;
    f.main.tick(now).unwrap();
    f.main.tick(now + POPOUT_POLL_INTERVAL).unwrap();
    assert_eq!(*count.borrow(), 1);
    assert!(f.main.popouts()[0].is_initialised());
}

#[test]
fn dock_request_from_child_pops_in() {
    let mut f = fixture("{}");
    let stack = children(&f.main, f.row)[0];
    f.main.create_popout(stack).unwrap().unwrap();
    let child = boot_child(&f);
    f.main.tick(Instant::now()).unwrap();

    assert!(child.borrow_mut().dock().unwrap());
    let closed = record(&mut f.main, WINDOW_CLOSED);
    f.main.tick(Instant::now()).unwrap();

    assert_eq!(*closed.borrow(), 1);
    assert!(f.main.popouts().is_empty());
    assert!(!child.borrow().is_initialised());
    assert_eq!(f.host.open_window_count(), 0);
    let columns = children(&f.main, f.row);
    assert_eq!(columns.len(), 3);
    assert_eq!(titles(&f.main, columns[0]), ["one", "two"]);
    assert_tree_invariants(&f.main);
}

#[test]
fn dock_is_refused_in_the_main_window() {
    let mut f = fixture("{}");
    assert!(!f.main.dock().unwrap());
}

#[test]
fn closed_window_is_dropped_by_default() {
    let mut f = fixture("{}");
    let stack = children(&f.main, f.row)[0];
    f.main.create_popout(stack).unwrap().unwrap();
    let handle = f.main.popouts()[0].handle();

    assert!(f.host.close_by_user(handle));
    f.main.tick(Instant::now()).unwrap();

    assert!(f.main.popouts().is_empty());
    assert_eq!(children(&f.main, f.row).len(), 2);
}

#[test]
fn closed_window_pops_in_when_configured() {
    let mut f = fixture(r#"{ "popInOnClose": true }"#);
    let stack = children(&f.main, f.row)[0];
    f.main.create_popout(stack).unwrap().unwrap();
    let handle = f.main.popouts()[0].handle();

    f.host.close_by_user(handle);
    f.main.tick(Instant::now()).unwrap();

    assert!(f.main.popouts().is_empty());
    let columns = children(&f.main, f.row);
    assert_eq!(columns.len(), 3);
    assert_eq!(titles(&f.main, columns[0]), ["one", "two"]);
}

#[test]
fn pop_in_after_parent_collapsed_docks_into_the_root() {
    let mut f = fixture_for(TWO_COLUMNS, r#"{ "popInOnClose": true }"#);
    let stack = children(&f.main, f.row)[0];
    f.main.create_popout(stack).unwrap().unwrap();

    // The row held the pop-in marker and went away with its second pane.
    assert!(!f.main.contains(f.row));
    let root = f.main.root().unwrap();
    assert!(f.main.item(root).unwrap().is_stack());
    assert_eq!(titles(&f.main, root), ["three"]);
    assert_tree_invariants(&f.main);

    let handle = f.main.popouts()[0].handle();
    f.host.close_by_user(handle);
    f.main.tick(Instant::now()).unwrap();

    assert!(f.main.popouts().is_empty());
    assert_eq!(f.main.root(), Some(root));
    assert_eq!(titles(&f.main, root), ["one", "two", "three"]);
    assert_tree_invariants(&f.main);
}

#[test]
fn blocked_popout_is_an_error_by_default() {
    let mut f = fixture("{}");
    f.host.set_block_popups(true);
    let stack = children(&f.main, f.row)[0];

    let err = f.main.create_popout(stack).unwrap_err();
    assert!(matches!(err, DockError::Host(HostError::PopoutBlocked)));
    assert!(f.main.contains(stack));
    assert_eq!(children(&f.main, f.row).len(), 3);
    assert_eq!(f.host.storage_len(), 0);
}

#[test]
fn blocked_popout_can_fail_silently() {
    let mut f = fixture(r#"{ "blockedPopoutsThrowError": false }"#);
    f.host.set_block_popups(true);
    let blocked = record(&mut f.main, POPOUT_BLOCKED);
    let stack = children(&f.main, f.row)[0];

    assert_eq!(f.main.create_popout(stack).unwrap(), None);
    assert_eq!(*blocked.borrow(), 1);
    assert!(f.main.contains(stack));
    assert!(f.main.popouts().is_empty());
}

#[test]
fn popout_from_config_leaves_the_tree_alone() {
    let mut f = fixture("{}");
    let root = ResolvedItemConfig::Component(dockyard_config::ResolvedComponentItemConfig::new("x"));
    let id = f.main.create_popout_from_config(root, Default::default()).unwrap();
    assert!(id.is_some());
    assert_eq!(children(&f.main, f.row).len(), 3);
    assert_eq!(f.host.open_window_count(), 1);

    f.main.close_all_open_popouts();
    assert_eq!(f.host.open_window_count(), 0);
    assert!(f.main.popouts().is_empty());
}

#[test]
fn destroy_closes_popouts() {
    let mut f = fixture("{}");
    let stack = children(&f.main, f.row)[0];
    f.main.create_popout(stack).unwrap().unwrap();
    f.main.destroy();
    assert_eq!(f.host.open_window_count(), 0);
}

#[test]
fn saved_popouts_reopen_on_load() {
    let mut f = fixture("{}");
    let stack = children(&f.main, f.row)[0];
    f.main.create_popout(stack).unwrap().unwrap();
    let saved = f.main.save_layout().unwrap();

    f.main.close_all_open_popouts();
    f.main.load_layout(saved).unwrap();
    assert_eq!(f.main.popouts().len(), 1);
    assert_eq!(f.host.open_window_count(), 1);
}

#[tokio::test]
async fn user_broadcast_reaches_every_window() {
    let mut f = fixture("{}");
    let stack = children(&f.main, f.row)[0];
    f.main.create_popout(stack).unwrap().unwrap();
    let child = boot_child(&f);

    let mut main_rx = f.main.hub().subscribe();
    let mut child_rx = child.borrow().hub().subscribe();
    let reached = child.borrow().emit_user_broadcast(vec![json!("hello"), json!(7)]);
    assert_eq!(reached, 2);

    for rx in [&mut main_rx, &mut child_rx] {
        let message = rx.recv().await.unwrap();
        assert_eq!(message.event_name, USER_BROADCAST_EVENT);
        assert_eq!(message.args, vec![json!("hello"), json!(7)]);
    }
}
