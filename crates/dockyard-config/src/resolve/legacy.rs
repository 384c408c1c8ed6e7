//! Adapters for older config shapes. These only run while resolving user
//! input; the resolved model carries canonical fields only.

use serde_json::Value;

use super::fields::{get_bool, get_object, get_size, Object};
use crate::schema::{ButtonLabel, HeaderConfig, HeaderShow, Size, SizeUnit};

/// Id token that older configs put into an item's id array to mark it
/// maximised.
pub const LEGACY_MAXIMISED_ID: &str = "__glMaximised";

/// How the sizes of one sibling group are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SizeMode {
    /// At least one sibling has `size`: `width`/`height` are ignored.
    Size,
    /// No `size` anywhere but some `width`/`height`: those are percentages.
    WidthOrHeight,
    /// Neither: every sibling gets the default size.
    Default,
}

/// Decide the size mode for a whole sibling group before resolving any of
/// its members.
pub(crate) fn sibling_size_mode(siblings: &[Value]) -> SizeMode {
    let has = |key: &str| {
        siblings
            .iter()
            .filter_map(Value::as_object)
            .any(|o| o.get(key).is_some_and(|v| !v.is_null()))
    };
    if has("size") {
        SizeMode::Size
    } else if has("width") || has("height") {
        SizeMode::WidthOrHeight
    } else {
        SizeMode::Default
    }
}

/// Resolve an item's size within its sibling group. `vertical` is true when
/// the parent is a column.
pub(crate) fn resolve_size(obj: &Object, mode: SizeMode, vertical: bool) -> Size {
    let size = match mode {
        SizeMode::Size => get_size(obj, "size", SizeUnit::Percent),
        SizeMode::WidthOrHeight => {
            let key = if vertical { "height" } else { "width" };
            get_size(obj, key, SizeUnit::Percent)
        }
        SizeMode::Default => None,
    };
    size.unwrap_or_default()
}

/// `minSize`, or the legacy `minWidth`/`minHeight` pixel number along the
/// parent's axis.
pub(crate) fn resolve_min_size(obj: &Object, vertical: bool) -> Option<Size> {
    get_size(obj, "minSize", SizeUnit::Pixel).or_else(|| {
        let key = if vertical { "minHeight" } else { "minWidth" };
        get_size(obj, key, SizeUnit::Pixel)
    })
}

/// Item id plus whether the legacy maximised token was present. Older
/// configs allow an array of ids; the first non-sentinel entry wins.
pub(crate) fn resolve_id(obj: &Object) -> (String, bool) {
    match obj.get("id") {
        Some(Value::String(s)) => (s.clone(), false),
        Some(Value::Number(n)) => (n.to_string(), false),
        Some(Value::Array(ids)) => {
            let mut maximised = false;
            let mut id = None;
            for entry in ids.iter().filter_map(Value::as_str) {
                if entry == LEGACY_MAXIMISED_ID {
                    maximised = true;
                } else if id.is_none() {
                    id = Some(entry.to_owned());
                }
            }
            (id.unwrap_or_default(), maximised)
        }
        _ => (String::new(), false),
    }
}

/// Build the layout-wide header config, honouring the legacy
/// `settings.hasHeaders`/`show*Icon` switches and the `labels` block when
/// the modern `header` field does not say otherwise.
pub(crate) fn resolve_layout_header(layout: &Object) -> HeaderConfig {
    let mut header = HeaderConfig::default();
    let settings = get_object(layout, "settings");
    let labels = get_object(layout, "labels");
    let modern = get_object(layout, "header")
        .map(super::fields::parse_header_override)
        .unwrap_or_default();

    let label_text = |key: &str| -> Option<String> {
        labels
            .and_then(|l| l.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned)
    };
    let icon_disabled =
        |key: &str| settings.and_then(|s| get_bool(s, key)).is_some_and(|shown| !shown);

    header.show = modern.show.unwrap_or_else(|| {
        match settings.and_then(|s| get_bool(s, "hasHeaders")) {
            Some(false) => HeaderShow::Hidden,
            _ => header.show,
        }
    });

    header.popout = pick_button(
        modern.popout,
        icon_disabled("showPopoutIcon"),
        label_text("popout"),
        header.popout,
    );
    header.maximise = pick_button(
        modern.maximise,
        icon_disabled("showMaximiseIcon"),
        label_text("maximise"),
        header.maximise,
    );
    header.close = pick_button(
        modern.close,
        icon_disabled("showCloseIcon"),
        label_text("close"),
        header.close,
    );
    header.tab_dropdown = pick_button(
        modern.tab_dropdown,
        false,
        label_text("tabDropdown"),
        header.tab_dropdown,
    );
    header.minimise = modern
        .minimise
        .or_else(|| label_text("minimise"))
        .unwrap_or(header.minimise);
    header.dock = modern
        .dock
        .or_else(|| label_text("popin"))
        .unwrap_or(header.dock);
    header
}

fn pick_button(
    modern: Option<ButtonLabel>,
    legacy_disabled: bool,
    legacy_label: Option<String>,
    default: ButtonLabel,
) -> ButtonLabel {
    if let Some(label) = modern {
        return label;
    }
    if legacy_disabled {
        return ButtonLabel::Disabled;
    }
    legacy_label.map(ButtonLabel::Text).unwrap_or(default)
}
