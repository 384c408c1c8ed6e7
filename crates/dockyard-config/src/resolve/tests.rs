//! Tests for layout and popout resolution.

use super::*;
use crate::schema::{HeaderShow, ResolvedStackItemConfig, Size};
use pretty_assertions::assert_eq;
use serde_json::json;

fn stack(item: &ResolvedItemConfig) -> &ResolvedStackItemConfig {
    match item {
        ResolvedItemConfig::Stack(s) => s,
        other => panic!("expected stack, got {:?}", other.item_type()),
    }
}

#[test]
fn empty_object_resolves_to_defaults() {
    let config = resolve_layout(&json!({})).unwrap();
    assert_eq!(config, ResolvedLayoutConfig::default());
}

#[test]
fn legacy_width_applies_to_whole_group() {
    let config = resolve_layout(&json!({
        "root": {
            "type": "row",
            "content": [
                { "type": "component", "componentType": "x" },
                { "type": "component", "componentType": "y", "width": 30 }
            ]
        }
    }))
    .unwrap();
    let root = config.root.unwrap();
    assert_eq!(root.item_type(), ItemType::Row);
    let sizes: Vec<Size> = root.content().iter().map(|c| c.size()).collect();
    assert_eq!(sizes, vec![Size::fractional(1.0), Size::percent(30.0)]);
}

#[test]
fn size_field_disables_legacy_width() {
    let config = resolve_layout(&json!({
        "root": {
            "type": "row",
            "content": [
                { "type": "component", "componentType": "x", "width": 80 },
                { "type": "component", "componentType": "y", "size": "40%" }
            ]
        }
    }))
    .unwrap();
    let root = config.root.unwrap();
    let sizes: Vec<Size> = root.content().iter().map(|c| c.size()).collect();
    assert_eq!(sizes, vec![Size::fractional(1.0), Size::percent(40.0)]);
}

#[test]
fn legacy_content_array_becomes_root() {
    let config = resolve_layout(&json!({
        "content": [{ "type": "stack", "content": [] }]
    }))
    .unwrap();
    assert_eq!(config.root.map(|r| r.item_type()), Some(ItemType::Stack));
}

#[test]
fn maximised_item_id_marks_owning_stack() {
    let config = resolve_layout(&json!({
        "maximisedItemId": "target",
        "root": {
            "type": "column",
            "content": [
                { "type": "stack", "content": [{ "type": "component", "componentType": "a" }] },
                { "type": "stack", "content": [{ "type": "component", "componentType": "b", "id": "target" }] }
            ]
        }
    }))
    .unwrap();
    let root = config.root.unwrap();
    assert!(!stack(&root.content()[0]).maximised);
    assert!(stack(&root.content()[1]).maximised);
}

#[test]
fn settings_and_dimensions_are_merged_with_defaults() {
    let config = resolve_layout(&json!({
        "settings": { "reorderEnabled": false, "responsiveMode": "onload", "tabControlOffset": "bad" },
        "dimensions": { "headerHeight": 32, "minItemHeight": 25 }
    }))
    .unwrap();
    assert!(!config.settings.reorder_enabled);
    assert_eq!(config.settings.responsive_mode, ResponsiveMode::Onload);
    assert_eq!(config.settings.tab_control_offset, 10.0);
    assert_eq!(config.dimensions.header_height, 32.0);
    assert_eq!(config.dimensions.default_min_item_height, Size::pixels(25.0));
    assert_eq!(config.dimensions.border_width, 5.0);
}

#[test]
fn has_headers_false_hides_headers() {
    let config = resolve_layout(&json!({ "settings": { "hasHeaders": false } })).unwrap();
    assert_eq!(config.header.show, HeaderShow::Hidden);
}

#[test]
fn open_popouts_are_resolved() {
    let config = resolve_layout(&json!({
        "openPopouts": [{
            "content": [{ "type": "component", "componentType": "p" }],
            "parentId": "abc",
            "indexInParent": 1,
            "dimensions": { "width": 640, "height": 480, "left": 5, "top": 6 }
        }]
    }))
    .unwrap();
    let popout = &config.open_popouts[0];
    assert_eq!(popout.parent_id.as_deref(), Some("abc"));
    assert_eq!(popout.index_in_parent, Some(1));
    assert_eq!(popout.window.width, Some(640.0));
    assert_eq!(popout.window.top, Some(6.0));
}

#[test]
fn popout_requires_root() {
    assert_eq!(resolve_popout(&json!({ "parentId": "x" })), Err(ConfigError::MissingRoot));
}

#[test]
fn non_object_root_is_missing_root() {
    assert_eq!(resolve_layout(&json!({ "root": 5 })), Err(ConfigError::MissingRoot));
}

#[test]
fn non_object_layout_is_parse_error() {
    assert!(matches!(resolve_layout(&json!([1, 2])), Err(ConfigError::ParseError(_))));
}

#[test]
fn ground_as_root_is_illegal() {
    let err = resolve_layout(&json!({ "root": { "type": "ground" } })).unwrap_err();
    assert!(matches!(err, ConfigError::IllegalChild { .. }));
}

#[test]
fn resolved_input_passes_through() {
    let first = resolve_layout(&json!({
        "root": { "type": "stack", "content": [{ "type": "component", "componentType": "a" }] }
    }))
    .unwrap();
    let value = serde_json::to_value(&first).unwrap();
    assert_eq!(value["resolved"], true);
    assert_eq!(resolve_layout(&value).unwrap(), first);
}

#[test]
fn item_config_for_parent() {
    let item = resolve_item_config(&json!({ "type": "component", "componentType": "a" }), ItemType::Stack)
        .unwrap();
    assert_eq!(item.item_type(), ItemType::Component);
    let err = resolve_item_config(&json!({ "type": "row" }), ItemType::Stack).unwrap_err();
    assert!(matches!(err, ConfigError::IllegalChild { .. }));
}
