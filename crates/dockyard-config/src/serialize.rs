//! Resolved config back to the user JSON shape.
//!
//! The output uses canonical field names only and drops the `resolved`
//! marker, so feeding it back through the resolver reproduces the same
//! resolved config.

use serde_json::Value;

use crate::schema::{ResolvedItemConfig, ResolvedLayoutConfig, ResolvedPopoutLayoutConfig};

pub fn from_resolved(config: &ResolvedLayoutConfig) -> Value {
    let mut value = serde_json::to_value(config).unwrap_or(Value::Null);
    strip_resolved_markers(&mut value);
    value
}

pub fn from_resolved_popout(config: &ResolvedPopoutLayoutConfig) -> Value {
    let mut value = serde_json::to_value(config).unwrap_or(Value::Null);
    strip_resolved_markers(&mut value);
    value
}

pub fn from_resolved_item(config: &ResolvedItemConfig) -> Value {
    serde_json::to_value(config).unwrap_or(Value::Null)
}

fn strip_resolved_markers(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    obj.remove("resolved");
    if let Some(Value::Array(popouts)) = obj.get_mut("openPopouts") {
        popouts.iter_mut().for_each(strip_resolved_markers);
    }
}
