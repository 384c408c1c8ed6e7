//! Full resolved-config validation.
//!
//! Each area has its own submodule; [`validate`] calls them all and
//! collects every problem into a single `ConfigError`. Structural errors
//! (illegal child types, components without a type) are reported on their
//! own by [`check_structure`], since the tree cannot be built at all.

mod dimensions;
mod helpers;
mod items;
mod settings;

#[cfg(test)]
mod tests;

pub use items::check_structure;

use crate::schema::{ItemType, ResolvedLayoutConfig};
use dockyard_common::ConfigError;

/// Run all validations on a resolved layout.
pub fn validate(config: &ResolvedLayoutConfig) -> Result<(), ConfigError> {
    if let Some(root) = &config.root {
        check_structure(root, ItemType::Ground)?;
    }

    let mut errors: Vec<String> = Vec::new();
    dimensions::validate_dimensions(&mut errors, "dimensions", &config.dimensions);
    settings::validate_settings(&mut errors, "settings", &config.settings);
    if let Some(root) = &config.root {
        items::validate_item(&mut errors, "root", root);
    }
    for (i, popout) in config.open_popouts.iter().enumerate() {
        let prefix = format!("openPopouts[{i}]");
        dimensions::validate_dimensions(&mut errors, &format!("{prefix}.dimensions"), &popout.dimensions);
        settings::validate_settings(&mut errors, &format!("{prefix}.settings"), &popout.settings);
        match &popout.root {
            Some(root) => {
                check_structure(root, ItemType::Ground)?;
                items::validate_item(&mut errors, &format!("{prefix}.root"), root);
            }
            None => errors.push(format!("{prefix} has no root item")),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
