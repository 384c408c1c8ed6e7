//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;
use serde_json::json;

fn stack_of(n: usize, active: usize) -> ResolvedItemConfig {
    ResolvedItemConfig::Stack(ResolvedStackItemConfig {
        content: (0..n)
            .map(|i| ResolvedItemConfig::Component(ResolvedComponentItemConfig::new(format!("c{i}"))))
            .collect(),
        active_item_index: active,
        ..Default::default()
    })
}

#[test]
fn default_config_validates() {
    assert!(validate(&ResolvedLayoutConfig::default()).is_ok());
}

#[test]
fn catches_border_width_too_large() {
    let mut config = ResolvedLayoutConfig::default();
    config.dimensions.border_width = 80.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("dimensions.borderWidth"));
}

#[test]
fn catches_header_height_out_of_range() {
    let mut config = ResolvedLayoutConfig::default();
    config.dimensions.header_height = -1.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("dimensions.headerHeight"));
}

#[test]
fn catches_zero_drag_proxy() {
    let mut config = ResolvedLayoutConfig::default();
    config.dimensions.drag_proxy_width = 0.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("dimensions.dragProxyWidth"));
}

#[test]
fn catches_negative_overlap_allowance() {
    let mut config = ResolvedLayoutConfig::default();
    config.settings.tab_overlap_allowance = -3.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("settings.tabOverlapAllowance"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = ResolvedLayoutConfig::default();
    config.dimensions.border_width = 100.0;
    config.settings.tab_control_offset = -1.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("borderWidth"));
    assert!(err.contains("tabControlOffset"));
    assert!(err.contains("; "));
}

#[test]
fn catches_active_index_past_content() {
    let config = ResolvedLayoutConfig {
        root: Some(stack_of(2, 2)),
        ..Default::default()
    };
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("root.activeItemIndex"));

    let config = ResolvedLayoutConfig {
        root: Some(stack_of(2, 1)),
        ..Default::default()
    };
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_pixel_item_size() {
    let mut stack = stack_of(1, 0);
    stack.set_size(Size::pixels(200.0));
    let config = ResolvedLayoutConfig {
        root: Some(ResolvedItemConfig::Row(ResolvedRowOrColumnItemConfig {
            content: vec![stack],
            ..Default::default()
        })),
        ..Default::default()
    };
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("root.content[0].size"));
}

#[test]
fn structure_errors_are_reported_directly() {
    let root = ResolvedItemConfig::Stack(ResolvedStackItemConfig {
        content: vec![stack_of(1, 0)],
        ..Default::default()
    });
    let config = ResolvedLayoutConfig {
        root: Some(root),
        ..Default::default()
    };
    assert_eq!(
        validate(&config),
        Err(ConfigError::IllegalChild {
            parent: "stack".into(),
            child: "stack".into()
        })
    );
}

#[test]
fn resolved_input_with_bad_structure_is_rejected() {
    let err = crate::resolve::resolve_layout(&json!({
        "resolved": true,
        "root": { "type": "component", "componentType": "" }
    }))
    .unwrap_err();
    assert_eq!(err, ConfigError::MissingComponentType);
}

#[test]
fn popout_without_root_is_reported() {
    let config = ResolvedLayoutConfig {
        open_popouts: vec![ResolvedPopoutLayoutConfig::default()],
        ..Default::default()
    };
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("openPopouts[0] has no root item"));
}
