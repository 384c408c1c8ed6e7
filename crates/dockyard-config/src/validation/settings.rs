//! Settings validation.

use crate::schema::Settings;

use super::helpers::validate_non_negative;

pub(crate) fn validate_settings(errors: &mut Vec<String>, prefix: &str, settings: &Settings) {
    validate_non_negative(
        errors,
        &format!("{prefix}.tabOverlapAllowance"),
        settings.tab_overlap_allowance,
    );
    validate_non_negative(
        errors,
        &format!("{prefix}.tabControlOffset"),
        settings.tab_control_offset,
    );
}
