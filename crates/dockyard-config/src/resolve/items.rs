//! Item-level resolution: user item JSON to [`ResolvedItemConfig`].

use dockyard_common::ConfigError;
use serde_json::Value;

use super::fields::{get_bool, get_object, get_str, get_usize, parse_header_override, Object};
use super::legacy::{resolve_id, resolve_min_size, resolve_size, sibling_size_mode, SizeMode};
use crate::schema::{
    HeaderOverride, HeaderShow, ItemType, ResolvedComponentItemConfig, ResolvedItemConfig,
    ResolvedRowOrColumnItemConfig, ResolvedStackItemConfig,
};

/// Placement of an item inside its parent, decided once per sibling group.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub parent: ItemType,
    pub mode: SizeMode,
}

impl Placement {
    pub fn root(parent: ItemType, item: &Value) -> Self {
        Self {
            parent,
            mode: sibling_size_mode(std::slice::from_ref(item)),
        }
    }

    fn vertical(&self) -> bool {
        self.parent == ItemType::Column
    }
}

/// Read the `type` tag. `react-component` is an alias for `component`.
pub(crate) fn item_type_of(obj: &Object) -> Result<ItemType, ConfigError> {
    match get_str(obj, "type") {
        Some("row") => Ok(ItemType::Row),
        Some("column") => Ok(ItemType::Column),
        Some("stack") => Ok(ItemType::Stack),
        Some("component") | Some("react-component") => Ok(ItemType::Component),
        Some("ground") => Ok(ItemType::Ground),
        Some(other) => Err(ConfigError::UnknownItemType(other.to_owned())),
        None => Err(ConfigError::UnknownItemType(String::new())),
    }
}

pub(crate) fn resolve_item(value: &Value, at: Placement) -> Result<ResolvedItemConfig, ConfigError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ConfigError::ParseError(format!("item config must be an object, got {value}")))?;
    let item_type = item_type_of(obj)?;
    if !at.parent.accepts_child(item_type) {
        return Err(ConfigError::IllegalChild {
            parent: at.parent.to_string(),
            child: item_type.to_string(),
        });
    }

    let size = resolve_size(obj, at.mode, at.vertical());
    let min_size = resolve_min_size(obj, at.vertical());
    let (id, legacy_maximised) = resolve_id(obj);
    let is_closable = get_bool(obj, "isClosable").unwrap_or(true);

    let resolved = match item_type {
        ItemType::Row | ItemType::Column => {
            let content = resolve_content(obj, item_type)?;
            let config = ResolvedRowOrColumnItemConfig {
                content,
                size,
                min_size,
                id,
                is_closable,
            };
            if item_type == ItemType::Row {
                ResolvedItemConfig::Row(config)
            } else {
                ResolvedItemConfig::Column(config)
            }
        }
        ItemType::Stack => {
            let content = resolve_content(obj, ItemType::Stack)?;
            ResolvedItemConfig::Stack(ResolvedStackItemConfig {
                content,
                size,
                min_size,
                id,
                is_closable,
                active_item_index: get_usize(obj, "activeItemIndex").unwrap_or(0),
                maximised: get_bool(obj, "maximised").unwrap_or(false) || legacy_maximised,
                header: resolve_item_header(obj),
            })
        }
        ItemType::Component => {
            let component_type = component_type_of(obj)?;
            let title = get_str(obj, "title")
                .map(str::to_owned)
                .unwrap_or_else(|| component_type.clone());
            let component_state = match obj.get("componentState") {
                None | Some(Value::Null) => None,
                Some(state) => Some(state.clone()),
            };
            ResolvedItemConfig::Component(ResolvedComponentItemConfig {
                component_type,
                component_state,
                title,
                reorder_enabled: get_bool(obj, "reorderEnabled").unwrap_or(true),
                size,
                min_size,
                id,
                is_closable,
                header: resolve_item_header(obj),
            })
        }
        ItemType::Ground => {
            return Err(ConfigError::IllegalChild {
                parent: at.parent.to_string(),
                child: ItemType::Ground.to_string(),
            })
        }
    };
    Ok(resolved)
}

/// Resolve `content` as one sibling group under a parent of `parent_type`.
fn resolve_content(obj: &Object, parent_type: ItemType) -> Result<Vec<ResolvedItemConfig>, ConfigError> {
    let children = match obj.get("content") {
        Some(Value::Array(children)) => children.as_slice(),
        None | Some(Value::Null) => &[],
        Some(other) => {
            return Err(ConfigError::ParseError(format!(
                "{parent_type} content must be an array, got {other}"
            )))
        }
    };
    let at = Placement {
        parent: parent_type,
        mode: sibling_size_mode(children),
    };
    children.iter().map(|child| resolve_item(child, at)).collect()
}

/// `componentType`, or the legacy `componentName` / `component` keys. A
/// non-string type is stringified.
fn component_type_of(obj: &Object) -> Result<String, ConfigError> {
    for key in ["componentType", "componentName", "component"] {
        match obj.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Ok(s.clone()),
            Some(Value::Null) | None => continue,
            Some(Value::String(_)) => continue,
            Some(other) => return Ok(other.to_string()),
        }
    }
    Err(ConfigError::MissingComponentType)
}

/// Item-level header override, folding in the legacy `hasHeaders` flag.
fn resolve_item_header(obj: &Object) -> Option<HeaderOverride> {
    let mut header = get_object(obj, "header")
        .map(parse_header_override)
        .unwrap_or_default();
    if header.show.is_none() && get_bool(obj, "hasHeaders") == Some(false) {
        header.show = Some(HeaderShow::Hidden);
    }
    (!header.is_empty()).then_some(header)
}
