//! Item tree validation.

use dockyard_common::ConfigError;

use crate::schema::{ItemType, ResolvedItemConfig, SizeUnit};

use super::helpers::validate_non_negative;

/// Fail on the first structural problem: an item under a parent that
/// cannot hold it, or a component without a type.
pub fn check_structure(item: &ResolvedItemConfig, parent: ItemType) -> Result<(), ConfigError> {
    let item_type = item.item_type();
    if !parent.accepts_child(item_type) {
        return Err(ConfigError::IllegalChild {
            parent: parent.to_string(),
            child: item_type.to_string(),
        });
    }
    if let ResolvedItemConfig::Component(component) = item {
        if component.component_type.is_empty() {
            return Err(ConfigError::MissingComponentType);
        }
    }
    item.content()
        .iter()
        .try_for_each(|child| check_structure(child, item_type))
}

/// Range checks on sizes and stack indices, recursively.
pub(crate) fn validate_item(errors: &mut Vec<String>, path: &str, item: &ResolvedItemConfig) {
    let size = item.size();
    if size.unit == SizeUnit::Pixel {
        errors.push(format!("{path}.size = {size} cannot be in px"));
    }
    validate_non_negative(errors, &format!("{path}.size"), size.magnitude);
    if let Some(min) = item.min_size() {
        if min.unit != SizeUnit::Pixel {
            errors.push(format!("{path}.minSize = {min} must be in px"));
        }
        validate_non_negative(errors, &format!("{path}.minSize"), min.magnitude);
    }

    if let ResolvedItemConfig::Stack(stack) = item {
        let len = stack.content.len();
        let index = stack.active_item_index;
        if (len == 0 && index != 0) || (len > 0 && index >= len) {
            errors.push(format!(
                "{path}.activeItemIndex = {index} is out of range for {len} items"
            ));
        }
    }

    for (i, child) in item.content().iter().enumerate() {
        validate_item(errors, &format!("{path}.content[{i}]"), child);
    }
}
