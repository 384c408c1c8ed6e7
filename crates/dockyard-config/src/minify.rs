//! Minification codec for shipping configs through URLs and storage.
//!
//! Known keys and values are replaced by single base-36 characters (their
//! index in a fixed table). Genuine single-character keys and strings, and
//! anything that already starts with the escape prefix, get the prefix
//! added so they can never be mistaken for a code. Everything else passes
//! through untouched.

use dockyard_common::ConfigError;
use serde_json::{Map, Value};

use crate::schema::ResolvedPopoutLayoutConfig;

const ESCAPE: &str = "___";

/// Keys with a single-character code. Order is part of the wire format.
pub const KEYS: [&str; 36] = [
    "settings",
    "hasHeaders",
    "constrainDragToContainer",
    "selectionEnabled",
    "dimensions",
    "borderWidth",
    "minItemHeight",
    "minItemWidth",
    "headerHeight",
    "dragProxyWidth",
    "dragProxyHeight",
    "labels",
    "close",
    "maximise",
    "minimise",
    "popout",
    "content",
    "componentType",
    "componentState",
    "id",
    "width",
    "type",
    "height",
    "isClosable",
    "title",
    "popoutWholeStack",
    "openPopouts",
    "parentId",
    "activeItemIndex",
    "reorderEnabled",
    "borderGrabWidth",
    "size",
    "minSize",
    "root",
    "header",
    "maximised",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Known {
    Bool(bool),
    Text(&'static str),
}

/// Values with a single-character code. Order is part of the wire format.
const VALUES: [Known; 10] = [
    Known::Bool(true),
    Known::Bool(false),
    Known::Text("row"),
    Known::Text("column"),
    Known::Text("stack"),
    Known::Text("component"),
    Known::Text("close"),
    Known::Text("maximise"),
    Known::Text("minimise"),
    Known::Text("open in new window"),
];

pub fn minify(value: &Value) -> Value {
    match value {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(key, v)| (minify_key(key), minify(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(minify).collect()),
        Value::Bool(b) => code_of(Known::Bool(*b)).map_or_else(|| value.clone(), Value::String),
        Value::String(s) => Value::String(minify_text(s)),
        Value::Null | Value::Number(_) => value.clone(),
    }
}

pub fn unminify(value: &Value) -> Value {
    match value {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(key, v)| (unminify_key(key), unminify(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(unminify).collect()),
        Value::String(s) => unminify_text(s),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

/// Minify a popout config into the compact JSON text stored for the child
/// window.
pub fn minify_config(config: &ResolvedPopoutLayoutConfig) -> Result<String, ConfigError> {
    let value =
        serde_json::to_value(config).map_err(|e| ConfigError::MinifyError(e.to_string()))?;
    serde_json::to_string(&minify(&value)).map_err(|e| ConfigError::MinifyError(e.to_string()))
}

/// Inverse of [`minify_config`].
pub fn unminify_config(text: &str) -> Result<ResolvedPopoutLayoutConfig, ConfigError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ConfigError::MinifyError(e.to_string()))?;
    serde_json::from_value(unminify(&value)).map_err(|e| ConfigError::MinifyError(e.to_string()))
}

fn is_single_char(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some() && chars.next().is_none()
}

fn needs_escape(s: &str) -> bool {
    is_single_char(s) || s.starts_with(ESCAPE)
}

fn to_code(index: usize) -> String {
    char::from_digit(index as u32, 36)
        .map(String::from)
        .unwrap_or_default()
}

fn from_code(s: &str) -> Option<usize> {
    let c = s.chars().next()?;
    if c.is_ascii_uppercase() {
        return None;
    }
    c.to_digit(36).map(|d| d as usize)
}

fn code_of(known: Known) -> Option<String> {
    VALUES.iter().position(|v| *v == known).map(to_code)
}

fn text_code(s: &str) -> Option<String> {
    VALUES
        .iter()
        .position(|v| matches!(v, Known::Text(t) if *t == s))
        .map(to_code)
}

fn minify_key(key: &str) -> String {
    if let Some(index) = KEYS.iter().position(|k| *k == key) {
        to_code(index)
    } else if needs_escape(key) {
        format!("{ESCAPE}{key}")
    } else {
        key.to_owned()
    }
}

fn unminify_key(key: &str) -> String {
    if is_single_char(key) {
        if let Some(known) = from_code(key).and_then(|i| KEYS.get(i)) {
            return (*known).to_owned();
        }
        return key.to_owned();
    }
    key.strip_prefix(ESCAPE).unwrap_or(key).to_owned()
}

fn minify_text(s: &str) -> String {
    if let Some(code) = text_code(s) {
        code
    } else if needs_escape(s) {
        format!("{ESCAPE}{s}")
    } else {
        s.to_owned()
    }
}

fn unminify_text(s: &str) -> Value {
    if is_single_char(s) {
        return match from_code(s).and_then(|i| VALUES.get(i)) {
            Some(Known::Bool(b)) => Value::Bool(*b),
            Some(Known::Text(t)) => Value::String((*t).to_owned()),
            None => Value::String(s.to_owned()),
        };
    }
    Value::String(s.strip_prefix(ESCAPE).unwrap_or(s).to_owned())
}
