//! Lenient accessors over user JSON. Wrong-typed fields are treated as
//! absent (with a warning) so that resolution never fails on them.

use serde_json::{Map, Value};

use crate::schema::{ButtonLabel, HeaderOverride, HeaderShow, Size, SizeUnit};
use dockyard_common::Side;

pub(crate) type Object = Map<String, Value>;

pub(crate) fn get_bool(obj: &Object, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Null => None,
        other => {
            tracing::warn!(key, value = %other, "expected a boolean, ignoring");
            None
        }
    }
}

pub(crate) fn get_f64(obj: &Object, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Null => None,
        other => {
            tracing::warn!(key, value = %other, "expected a number, ignoring");
            None
        }
    }
}

pub(crate) fn get_usize(obj: &Object, key: &str) -> Option<usize> {
    let value = get_f64(obj, key)?;
    if value.is_finite() && value >= 0.0 {
        Some(value as usize)
    } else {
        None
    }
}

pub(crate) fn get_str<'a>(obj: &'a Object, key: &str) -> Option<&'a str> {
    match obj.get(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            tracing::warn!(key, value = %other, "expected a string, ignoring");
            None
        }
    }
}

pub(crate) fn get_object<'a>(obj: &'a Object, key: &str) -> Option<&'a Object> {
    obj.get(key)?.as_object()
}

/// A size field given either as a number (interpreted in `unit`) or as a
/// `"<number><unit>"` string.
pub(crate) fn get_size(obj: &Object, key: &str, unit: SizeUnit) -> Option<Size> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64().map(|magnitude| Size { magnitude, unit }),
        Value::String(s) => {
            let parsed = Size::parse(s, unit);
            if parsed.is_none() {
                tracing::warn!(key, value = %s, "unparseable size, using default");
            }
            parsed
        }
        Value::Null => None,
        other => {
            tracing::warn!(key, value = %other, "unparseable size, using default");
            None
        }
    }
}

pub(crate) fn parse_header_show(value: &Value) -> Option<HeaderShow> {
    match value {
        Value::Bool(false) => Some(HeaderShow::Hidden),
        Value::Bool(true) => Some(HeaderShow::Side(Side::Top)),
        Value::String(s) => Side::parse(s).map(HeaderShow::Side),
        _ => None,
    }
}

pub(crate) fn parse_button_label(value: &Value) -> Option<ButtonLabel> {
    match value {
        Value::Bool(false) => Some(ButtonLabel::Disabled),
        Value::String(s) => Some(ButtonLabel::Text(s.clone())),
        _ => None,
    }
}

/// Parse a `header` object field by field, dropping anything malformed.
pub(crate) fn parse_header_override(obj: &Object) -> HeaderOverride {
    let label = |key: &str| obj.get(key).and_then(parse_button_label);
    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_owned);
    HeaderOverride {
        show: obj.get("show").and_then(parse_header_show),
        popout: label("popout"),
        dock: text("dock"),
        maximise: label("maximise"),
        minimise: text("minimise"),
        close: label("close"),
        tab_dropdown: label("tabDropdown"),
    }
}
