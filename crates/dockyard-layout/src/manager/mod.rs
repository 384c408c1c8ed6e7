//! The LayoutManager owns one window's content-item tree and drives it:
//! lifecycle, layout, focus, maximise, drag and drop, and popouts.

mod bubbling;
mod commands;
mod drag_ops;
mod focus;
mod init;
mod layout_compute;
mod location;
mod maximise;
mod operations;
mod pointer;
mod popouts;
mod responsive;
mod tick;
mod tree_ops;
mod types;

pub use location::{
    Location, LocationKind, LocationSelector, AFTER_FOCUSED_ITEM_LOCATION_SELECTORS,
    DEFAULT_LOCATION_SELECTORS,
};
pub use types::*;

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use dockyard_common::{ApiError, DockError, Rect};
    use dockyard_config::{load_layout_config, ResolvedComponentItemConfig, ResolvedItemConfig};

    use super::*;
    use crate::commands::HeaderAction;
    use crate::component::{recording_factory, CallLog};
    use crate::item::ItemId;

    const TWO_COLUMNS: &str = r#"{ "root": { "type": "row", "content": [
        { "type": "component", "componentType": "x", "title": "a" },
        { "type": "component", "componentType": "x", "title": "b" }
    ] } }"#;

    fn start(mut mgr: LayoutManager, width: f64, height: f64) -> (LayoutManager, CallLog) {
        let log = CallLog::default();
        mgr.register_component("x", recording_factory(log.clone())).unwrap();
        mgr.set_container_size(width, height);
        mgr.init().unwrap();
        (mgr, log)
    }

    fn layout(json: &str) -> LayoutManager {
        start(LayoutManager::new(load_layout_config(json).unwrap()), 800.0, 600.0).0
    }

    fn children(mgr: &LayoutManager, id: ItemId) -> Vec<ItemId> {
        mgr.item(id).unwrap().children().to_vec()
    }

    #[test]
    fn init_builds_and_lays_out_the_tree() {
        let (mgr, log) = start(LayoutManager::new(load_layout_config(TWO_COLUMNS).unwrap()), 800.0, 600.0);
        let root = mgr.root().unwrap();
        assert!(mgr.item(root).unwrap().is_row_or_column());

        let stacks = children(&mgr, root);
        assert_eq!(stacks.len(), 2);
        let widths: f64 = stacks.iter().map(|s| mgr.item(*s).unwrap().rect().width).sum();
        assert!((widths + 5.0 - 800.0).abs() < 1.0, "widths {widths}");

        for stack in stacks {
            let component = children(&mgr, stack)[0];
            assert!(mgr.item(component).unwrap().is_visible());
            assert!(mgr.container(component).unwrap().width() > 0.0);
        }
        assert_eq!(log.borrow().iter().filter(|l| l.starts_with("create x")).count(), 2);
    }

    #[test]
    fn init_twice_is_an_error() {
        let mut mgr = layout(TWO_COLUMNS);
        assert!(matches!(mgr.init(), Err(DockError::Api(ApiError::AlreadyInitialised))));
    }

    #[test]
    fn unknown_component_type_fails_init() {
        let config = load_layout_config(r#"{ "root": { "type": "component", "componentType": "nope" } }"#).unwrap();
        let mut mgr = LayoutManager::new(config);
        let err = mgr.init().unwrap_err();
        assert!(matches!(err, DockError::Api(ApiError::UnknownComponentType(t)) if t == "nope"));
    }

    #[test]
    fn operations_before_init_are_rejected() {
        let mut mgr = LayoutManager::new(load_layout_config(TWO_COLUMNS).unwrap());
        assert!(matches!(
            mgr.save_layout(),
            Err(DockError::Api(ApiError::NotInitialised(_)))
        ));
    }

    #[test]
    fn closing_a_stack_collapses_its_row() {
        let mut mgr = layout(TWO_COLUMNS);
        let stacks = children(&mgr, mgr.root().unwrap());
        assert!(mgr.close_item(stacks[0]).unwrap());
        assert_eq!(mgr.root(), Some(stacks[1]));
        assert!(!mgr.contains(stacks[0]));
    }

    #[test]
    fn closing_a_component_drops_its_container_handlers() {
        let mut mgr = layout(TWO_COLUMNS);
        let stack = children(&mgr, mgr.root().unwrap())[0];
        let component = children(&mgr, stack)[0];
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let log = seen.clone();
        mgr.container_mut(component)
            .unwrap()
            .on(crate::events::ALL_EVENTS, move |e| log.borrow_mut().push(e.name.clone()));

        assert!(mgr.close_item(component).unwrap());
        assert!(seen.borrow().iter().any(|n| n == crate::events::BEFORE_COMPONENT_RELEASE));
        assert_eq!(std::rc::Rc::strong_count(&seen), 1);
    }

    #[test]
    fn maximise_and_minimise_are_idempotent() {
        let mut mgr = layout(TWO_COLUMNS);
        let stacks = children(&mgr, mgr.root().unwrap());

        assert!(mgr.maximise_stack(stacks[0]).unwrap());
        assert!(!mgr.maximise_stack(stacks[0]).unwrap());
        assert_eq!(mgr.maximised_stack(), Some(stacks[0]));
        assert_eq!(mgr.item(stacks[0]).unwrap().rect(), mgr.container_rect());
        assert!(!mgr.item(stacks[1]).unwrap().is_visible());

        assert!(mgr.minimise_stack(stacks[0]).unwrap());
        assert!(!mgr.minimise_stack(stacks[0]).unwrap());
        assert!(mgr.item(stacks[1]).unwrap().is_visible());
    }

    #[test]
    fn minimise_restores_the_stack_in_place() {
        let mut mgr = layout(TWO_COLUMNS);
        let root = mgr.root().unwrap();
        let stacks = children(&mgr, root);
        let before = mgr.item(stacks[1]).unwrap().rect();
        let size = mgr.item(stacks[1]).unwrap().size();

        mgr.maximise_stack(stacks[1]).unwrap();
        assert_eq!(children(&mgr, root), stacks);
        mgr.minimise().unwrap();

        assert_eq!(children(&mgr, root), stacks);
        assert_eq!(mgr.item(stacks[1]).unwrap().rect(), before);
        assert_eq!(mgr.item(stacks[1]).unwrap().size(), size);
        assert!(!mgr.item(stacks[1]).unwrap().as_stack().unwrap().is_maximised());
    }

    #[test]
    fn only_first_flagged_stack_is_maximised() {
        let mut mgr = layout(
            r#"{ "root": { "type": "row", "content": [
                { "type": "stack", "maximised": true, "content": [
                    { "type": "component", "componentType": "x" } ] },
                { "type": "stack", "maximised": true, "content": [
                    { "type": "component", "componentType": "x" } ] }
            ] } }"#,
        );
        let stacks = children(&mgr, mgr.root().unwrap());
        assert_eq!(mgr.maximised_stack(), Some(stacks[0]));
        assert!(mgr.item(stacks[0]).unwrap().as_stack().unwrap().is_maximised());
        assert!(!mgr.item(stacks[1]).unwrap().as_stack().unwrap().is_maximised());

        let saved = mgr.save_layout().unwrap();
        let Some(ResolvedItemConfig::Row(row)) = saved.root else {
            panic!("root should be a row");
        };
        let flags: Vec<bool> = row
            .content
            .iter()
            .map(|c| matches!(c, ResolvedItemConfig::Stack(s) if s.maximised))
            .collect();
        assert_eq!(flags, [true, false]);
    }

    #[test]
    fn maximising_a_component_is_refused() {
        let mut mgr = layout(TWO_COLUMNS);
        let stack = children(&mgr, mgr.root().unwrap())[0];
        let component = children(&mgr, stack)[0];
        assert!(matches!(
            mgr.maximise_stack(component),
            Err(DockError::Api(ApiError::InvalidTarget(_)))
        ));
    }

    #[test]
    fn header_actions_toggle_maximise() {
        let mut mgr = layout(TWO_COLUMNS);
        let stack = children(&mgr, mgr.root().unwrap())[1];
        assert!(mgr.execute_header_action(HeaderAction::ToggleMaximise(stack)).unwrap());
        assert_eq!(mgr.maximised_stack(), Some(stack));
        assert!(mgr.execute_header_action(HeaderAction::ToggleMaximise(stack)).unwrap());
        assert_eq!(mgr.maximised_stack(), None);
    }

    #[test]
    fn header_dock_is_a_no_op_in_the_main_window() {
        let mut mgr = layout(TWO_COLUMNS);
        let stack = children(&mgr, mgr.root().unwrap())[0];
        assert!(!mgr.execute_header_action(HeaderAction::Dock(stack)).unwrap());
    }

    #[test]
    fn responsive_mode_folds_columns_that_do_not_fit() {
        let config = load_layout_config(
            r#"{ "settings": { "responsiveMode": "always" },
                 "root": { "type": "row", "content": [
                    { "type": "component", "componentType": "x", "title": "a" },
                    { "type": "component", "componentType": "x", "title": "b" },
                    { "type": "component", "componentType": "x", "title": "c" }
                 ] } }"#,
        )
        .unwrap();
        // Default minimum width is 10px: 25px fits two columns.
        let (mgr, _) = start(LayoutManager::new(config), 25.0, 100.0);
        let root = mgr.root().unwrap();
        let columns = children(&mgr, root);
        assert_eq!(columns.len(), 2);

        let first: Vec<String> = children(&mgr, columns[0])
            .into_iter()
            .map(|c| mgr.container(c).unwrap().title().to_string())
            .collect();
        assert_eq!(first, ["a", "c"]);
    }

    #[test]
    fn container_requests_run_on_tick() {
        let mut mgr = layout(TWO_COLUMNS);
        let stacks = children(&mgr, mgr.root().unwrap());
        let a = children(&mgr, stacks[0])[0];
        let b = children(&mgr, stacks[1])[0];

        mgr.container_mut(a).unwrap().focus();
        mgr.tick(Instant::now()).unwrap();
        assert_eq!(mgr.focused_component(), Some(a));

        mgr.container_mut(b).unwrap().close();
        mgr.tick(Instant::now()).unwrap();
        assert!(!mgr.contains(b));
        assert_eq!(mgr.root(), Some(stacks[0]));
    }

    #[test]
    fn container_resizes_are_debounced() {
        let env = Environment {
            options: ManagerOptions {
                resize_with_container_automatically: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let config = load_layout_config(TWO_COLUMNS).unwrap();
        let (mut mgr, _) = start(LayoutManager::with_environment(config, env), 800.0, 600.0);
        let t0 = Instant::now();

        mgr.notify_container_resized(400.0, 300.0, t0);
        mgr.notify_container_resized(500.0, 300.0, t0 + Duration::from_millis(80));
        mgr.tick(t0 + Duration::from_millis(120)).unwrap();
        assert_eq!(mgr.container_size(), (800.0, 600.0));
        assert!(mgr.has_pending_resize());

        mgr.tick(t0 + Duration::from_millis(180)).unwrap();
        assert_eq!(mgr.container_size(), (500.0, 300.0));
        assert!(!mgr.has_pending_resize());
    }

    #[test]
    fn container_resizes_are_ignored_unless_enabled() {
        let mut mgr = layout(TWO_COLUMNS);
        let t0 = Instant::now();
        mgr.notify_container_resized(400.0, 300.0, t0);
        assert!(!mgr.has_pending_resize());
        mgr.tick(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(mgr.container_size(), (800.0, 600.0));
    }

    #[test]
    fn drag_sources_can_be_removed() {
        let mut mgr = layout(TWO_COLUMNS);
        let id = mgr.new_drag_source(Rect::new(900.0, 0.0, 50.0, 20.0), ResolvedComponentItemConfig::new("x"));
        assert_eq!(mgr.drag_sources().len(), 1);
        assert!(mgr.remove_drag_source(id));
        assert!(!mgr.remove_drag_source(id));
        assert!(mgr.drag_sources().is_empty());
    }

    #[test]
    fn saved_layout_loads_back_unchanged() {
        let mut mgr = layout(TWO_COLUMNS);
        let saved = mgr.save_layout().unwrap();
        mgr.load_layout(saved.clone()).unwrap();
        pretty_assertions::assert_eq!(mgr.save_layout().unwrap(), saved);
    }

    #[test]
    fn destroy_releases_components() {
        let (mut mgr, log) = start(LayoutManager::new(load_layout_config(TWO_COLUMNS).unwrap()), 800.0, 600.0);
        mgr.destroy();
        assert!(!mgr.is_initialised());
        assert_eq!(mgr.root(), None);
        assert_eq!(log.borrow().iter().filter(|l| l.starts_with("release")).count(), 2);
    }
}
