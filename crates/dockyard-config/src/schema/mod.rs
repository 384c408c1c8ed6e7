//! Resolved configuration model.

mod header;
mod item;
mod layout;
mod size;

pub use header::*;
pub use item::*;
pub use layout::*;
pub use size::*;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settings_defaults() {
        let s = Settings::default();
        assert!(s.constrain_drag_to_container);
        assert!(s.reorder_enabled);
        assert!(!s.popout_whole_stack);
        assert!(s.blocked_popouts_throw_error);
        assert_eq!(s.responsive_mode, ResponsiveMode::None);
        assert_eq!(s.tab_control_offset, 10.0);
        assert!(!s.pop_in_on_close);
    }

    #[test]
    fn dimensions_defaults() {
        let d = Dimensions::default();
        assert_eq!(d.border_width, 5.0);
        assert_eq!(d.header_height, 20.0);
        assert_eq!(d.default_min_item_width, Size::pixels(10.0));
        assert_eq!(d.default_min_item_height, Size::pixels(0.0));
    }

    #[test]
    fn partial_settings_json_keeps_defaults() {
        let s: Settings =
            serde_json::from_value(json!({ "popoutWholeStack": true, "responsiveMode": "always" }))
                .unwrap();
        assert!(s.popout_whole_stack);
        assert_eq!(s.responsive_mode, ResponsiveMode::Always);
        assert!(s.reorder_enabled);
    }

    #[test]
    fn item_config_is_tagged_by_type() {
        let item = ResolvedItemConfig::Stack(ResolvedStackItemConfig {
            content: vec![ResolvedItemConfig::Component(ResolvedComponentItemConfig::new(
                "editor",
            ))],
            id: "main".into(),
            ..Default::default()
        });
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "stack");
        assert_eq!(value["content"][0]["type"], "component");
        assert_eq!(value["content"][0]["componentType"], "editor");
        assert_eq!(value["size"], "1fr");

        let back: ResolvedItemConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn find_by_id_searches_depth_first() {
        let mut tree = ResolvedItemConfig::Row(ResolvedRowOrColumnItemConfig {
            content: vec![
                ResolvedItemConfig::Stack(ResolvedStackItemConfig {
                    id: "left".into(),
                    ..Default::default()
                }),
                ResolvedItemConfig::Column(ResolvedRowOrColumnItemConfig {
                    id: "right".into(),
                    content: vec![ResolvedItemConfig::Stack(ResolvedStackItemConfig {
                        id: "deep".into(),
                        ..Default::default()
                    })],
                    ..Default::default()
                }),
            ],
            ..Default::default()
        });
        assert_eq!(tree.find_by_id("deep").map(|c| c.item_type()), Some(ItemType::Stack));
        assert!(tree.find_by_id("missing").is_none());
        tree.find_by_id_mut("left").unwrap().set_size(Size::percent(40.0));
        assert_eq!(tree.find_by_id("left").unwrap().size(), Size::percent(40.0));
    }

    #[test]
    fn accepts_child_rules() {
        assert!(ItemType::Row.accepts_child(ItemType::Component));
        assert!(ItemType::Stack.accepts_child(ItemType::Component));
        assert!(!ItemType::Stack.accepts_child(ItemType::Row));
        assert!(!ItemType::Component.accepts_child(ItemType::Component));
        assert!(!ItemType::Column.accepts_child(ItemType::Ground));
    }

    #[test]
    fn popout_config_converts_to_layout() {
        let popout = ResolvedPopoutLayoutConfig {
            root: Some(ResolvedItemConfig::Component(ResolvedComponentItemConfig::new("x"))),
            parent_id: Some("p1".into()),
            ..Default::default()
        };
        let layout = popout.to_layout_config();
        assert!(layout.resolved);
        assert_eq!(layout.root, popout.root);
    }
}
