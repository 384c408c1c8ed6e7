//! Dimension validation (splitters, headers, drag proxy, minimum sizes).

use crate::schema::{Dimensions, SizeUnit};

use super::helpers::{validate_non_negative, validate_positive, validate_range_f64};

pub(crate) fn validate_dimensions(errors: &mut Vec<String>, prefix: &str, dims: &Dimensions) {
    validate_range_f64(errors, &format!("{prefix}.borderWidth"), dims.border_width, 0.0, 50.0);
    validate_non_negative(errors, &format!("{prefix}.borderGrabWidth"), dims.border_grab_width);
    validate_range_f64(errors, &format!("{prefix}.headerHeight"), dims.header_height, 0.0, 200.0);
    validate_positive(errors, &format!("{prefix}.dragProxyWidth"), dims.drag_proxy_width);
    validate_positive(errors, &format!("{prefix}.dragProxyHeight"), dims.drag_proxy_height);

    for (name, size) in [
        ("defaultMinItemWidth", dims.default_min_item_width),
        ("defaultMinItemHeight", dims.default_min_item_height),
    ] {
        if size.unit != SizeUnit::Pixel {
            errors.push(format!("{prefix}.{name} = {size} must be in px"));
        }
        validate_non_negative(errors, &format!("{prefix}.{name}"), size.magnitude);
    }
}
