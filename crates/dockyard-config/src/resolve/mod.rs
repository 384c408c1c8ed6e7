//! Configuration resolver: sparse, possibly legacy user JSON in, fully
//! defaulted [`ResolvedLayoutConfig`] out.
//!
//! Resolution never fails on wrong-typed optional fields; those fall back
//! to their defaults with a warning. It fails only on structural problems:
//! an unknown item type, a component without a type, or an item that cannot
//! sit under its parent. Input already carrying `"resolved": true` is
//! deserialized as is and only checked for structure.

mod fields;
mod items;
mod legacy;

pub use legacy::LEGACY_MAXIMISED_ID;

use dockyard_common::ConfigError;
use serde_json::Value;

use crate::schema::{
    Dimensions, ItemType, PopoutWindow, ResolvedItemConfig, ResolvedLayoutConfig,
    ResolvedPopoutLayoutConfig, ResponsiveMode, Settings, SizeUnit,
};
use crate::validation::check_structure;
use fields::{get_bool, get_f64, get_object, get_size, get_str, get_usize, Object};
use items::{resolve_item, Placement};

/// Resolve a user layout config.
pub fn resolve_layout(config: &Value) -> Result<ResolvedLayoutConfig, ConfigError> {
    let obj = as_object(config, "layout config")?;
    if is_resolved(obj) {
        let resolved: ResolvedLayoutConfig = serde_json::from_value(config.clone())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        check_layout_structure(resolved.root.as_ref(), &resolved.open_popouts)?;
        return Ok(resolved);
    }

    let mut root = resolve_root(obj)?;
    if let (Some(root), Some(id)) = (root.as_mut(), get_str(obj, "maximisedItemId")) {
        if !mark_maximised(root, id) {
            tracing::warn!(id, "maximisedItemId does not name an item, ignoring");
        }
    }

    let open_popouts = match obj.get("openPopouts") {
        Some(Value::Array(popouts)) => popouts
            .iter()
            .map(resolve_popout)
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    Ok(ResolvedLayoutConfig {
        root,
        open_popouts,
        dimensions: resolve_dimensions(obj),
        settings: resolve_settings(obj),
        header: legacy::resolve_layout_header(obj),
        resolved: true,
    })
}

/// Resolve the config of one popout window. Unlike a layout, a popout must
/// have a root item.
pub fn resolve_popout(config: &Value) -> Result<ResolvedPopoutLayoutConfig, ConfigError> {
    let obj = as_object(config, "popout config")?;
    if is_resolved(obj) {
        let resolved: ResolvedPopoutLayoutConfig = serde_json::from_value(config.clone())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        if resolved.root.is_none() {
            return Err(ConfigError::MissingRoot);
        }
        check_layout_structure(resolved.root.as_ref(), &resolved.open_popouts)?;
        return Ok(resolved);
    }

    let layout = resolve_layout(config)?;
    if layout.root.is_none() {
        return Err(ConfigError::MissingRoot);
    }
    Ok(ResolvedPopoutLayoutConfig {
        root: layout.root,
        open_popouts: layout.open_popouts,
        dimensions: layout.dimensions,
        settings: layout.settings,
        header: layout.header,
        window: resolve_window(obj),
        parent_id: get_str(obj, "parentId").map(str::to_owned),
        index_in_parent: get_usize(obj, "indexInParent"),
        resolved: true,
    })
}

/// Resolve a single item config destined for a parent of type `parent`.
pub fn resolve_item_config(
    config: &Value,
    parent: ItemType,
) -> Result<ResolvedItemConfig, ConfigError> {
    resolve_item(config, Placement::root(parent, config))
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Object, ConfigError> {
    value
        .as_object()
        .ok_or_else(|| ConfigError::ParseError(format!("{what} must be a JSON object")))
}

fn is_resolved(obj: &Object) -> bool {
    get_bool(obj, "resolved") == Some(true)
}

fn check_layout_structure(
    root: Option<&ResolvedItemConfig>,
    popouts: &[ResolvedPopoutLayoutConfig],
) -> Result<(), ConfigError> {
    if let Some(root) = root {
        check_structure(root, ItemType::Ground)?;
    }
    for popout in popouts {
        check_layout_structure(popout.root.as_ref(), &popout.open_popouts)?;
    }
    Ok(())
}

/// `root`, or the first entry of the legacy `content` array.
fn resolve_root(obj: &Object) -> Result<Option<ResolvedItemConfig>, ConfigError> {
    let value = match obj.get("root") {
        Some(Value::Null) | None => match obj.get("content") {
            Some(Value::Array(content)) => {
                if content.len() > 1 {
                    tracing::warn!(
                        count = content.len(),
                        "legacy content has more than one root item, using the first"
                    );
                }
                content.first()
            }
            _ => None,
        },
        Some(root @ Value::Object(_)) => Some(root),
        Some(_) => return Err(ConfigError::MissingRoot),
    };
    value
        .map(|v| resolve_item(v, Placement::root(ItemType::Ground, v)))
        .transpose()
}

/// Set `maximised` on the stack named by `id`, or on the stack holding the
/// component named by `id`.
fn mark_maximised(item: &mut ResolvedItemConfig, id: &str) -> bool {
    match item {
        ResolvedItemConfig::Stack(stack) => {
            if stack.id == id || stack.content.iter().any(|c| c.id() == id) {
                stack.maximised = true;
                return true;
            }
            false
        }
        ResolvedItemConfig::Row(rc) | ResolvedItemConfig::Column(rc) => {
            rc.content.iter_mut().any(|child| mark_maximised(child, id))
        }
        ResolvedItemConfig::Ground(ground) => {
            ground.content.iter_mut().any(|child| mark_maximised(child, id))
        }
        ResolvedItemConfig::Component(_) => false,
    }
}

fn resolve_settings(layout: &Object) -> Settings {
    let mut settings = Settings::default();
    let Some(obj) = get_object(layout, "settings") else {
        return settings;
    };
    let flag = |key: &str, default: bool| get_bool(obj, key).unwrap_or(default);
    settings.constrain_drag_to_container =
        flag("constrainDragToContainer", settings.constrain_drag_to_container);
    settings.reorder_enabled = flag("reorderEnabled", settings.reorder_enabled);
    settings.popout_whole_stack = flag("popoutWholeStack", settings.popout_whole_stack);
    settings.blocked_popouts_throw_error =
        flag("blockedPopoutsThrowError", settings.blocked_popouts_throw_error);
    settings.close_popouts_on_unload =
        flag("closePopoutsOnUnload", settings.close_popouts_on_unload);
    settings.reorder_on_tab_menu_click =
        flag("reorderOnTabMenuClick", settings.reorder_on_tab_menu_click);
    settings.pop_in_on_close = flag("popInOnClose", settings.pop_in_on_close);
    settings.responsive_mode = match get_str(obj, "responsiveMode") {
        Some("always") => ResponsiveMode::Always,
        Some("onload") => ResponsiveMode::Onload,
        Some("none") | None => ResponsiveMode::None,
        Some(other) => {
            tracing::warn!(value = other, "unknown responsiveMode, using none");
            ResponsiveMode::None
        }
    };
    if let Some(allowance) = get_f64(obj, "tabOverlapAllowance") {
        settings.tab_overlap_allowance = allowance;
    }
    if let Some(offset) = get_f64(obj, "tabControlOffset") {
        settings.tab_control_offset = offset;
    }
    settings
}

fn resolve_dimensions(layout: &Object) -> Dimensions {
    let mut dimensions = Dimensions::default();
    let Some(obj) = get_object(layout, "dimensions") else {
        return dimensions;
    };
    let number = |key: &str, default: f64| get_f64(obj, key).unwrap_or(default);
    dimensions.border_width = number("borderWidth", dimensions.border_width);
    dimensions.border_grab_width = number("borderGrabWidth", dimensions.border_grab_width);
    dimensions.header_height = number("headerHeight", dimensions.header_height);
    dimensions.drag_proxy_width = number("dragProxyWidth", dimensions.drag_proxy_width);
    dimensions.drag_proxy_height = number("dragProxyHeight", dimensions.drag_proxy_height);
    if let Some(size) = get_size(obj, "defaultMinItemWidth", SizeUnit::Pixel)
        .or_else(|| get_size(obj, "minItemWidth", SizeUnit::Pixel))
    {
        dimensions.default_min_item_width = size;
    }
    if let Some(size) = get_size(obj, "defaultMinItemHeight", SizeUnit::Pixel)
        .or_else(|| get_size(obj, "minItemHeight", SizeUnit::Pixel))
    {
        dimensions.default_min_item_height = size;
    }
    dimensions
}

/// Window placement from `window`, falling back to the legacy habit of
/// storing it in `dimensions`.
fn resolve_window(popout: &Object) -> PopoutWindow {
    let read = |obj: &Object| PopoutWindow {
        left: get_f64(obj, "left"),
        top: get_f64(obj, "top"),
        width: get_f64(obj, "width"),
        height: get_f64(obj, "height"),
    };
    if let Some(window) = get_object(popout, "window") {
        return read(window);
    }
    get_object(popout, "dimensions").map(read).unwrap_or_default()
}

#[cfg(test)]
mod tests;
