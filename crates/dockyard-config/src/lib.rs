//! Dockyard layout configuration.
//!
//! Users hand in sparse JSON, possibly in an older shape. The resolver turns
//! it into a fully defaulted [`ResolvedLayoutConfig`]; [`from_resolved`]
//! goes the other way, and the minification codec packs configs for
//! transport to popout windows.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dockyard_config::{load_layout_config, config_to_json};
//!
//! let config = load_layout_config(r#"{ "root": { "type": "component", "componentType": "editor" } }"#)
//!     .expect("invalid layout");
//! println!("{}", config_to_json(&config));
//! ```

pub mod minify;
pub mod resolve;
pub mod schema;
pub mod serialize;
pub mod validation;

pub use minify::{minify, minify_config, unminify, unminify_config};
pub use resolve::{resolve_item_config, resolve_layout, resolve_popout, LEGACY_MAXIMISED_ID};
pub use schema::*;
pub use serialize::{from_resolved, from_resolved_item, from_resolved_popout};

use dockyard_common::ConfigError;

/// Parse, resolve and validate a layout config from JSON text.
pub fn load_layout_config(text: &str) -> Result<ResolvedLayoutConfig, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    let config = resolve_layout(&value)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a resolved config to a pretty-printed JSON string.
pub fn config_to_json(config: &ResolvedLayoutConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_resolves_and_validates() {
        let config = load_layout_config(
            r#"{ "root": { "type": "row", "content": [
                { "type": "component", "componentType": "x" },
                { "type": "component", "componentType": "y", "width": 30 }
            ] } }"#,
        )
        .unwrap();
        assert_eq!(config.root.map(|r| r.content().len()), Some(2));
    }

    #[test]
    fn load_rejects_invalid_json() {
        assert!(matches!(load_layout_config("{"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn load_rejects_out_of_range_values() {
        let err = load_layout_config(r#"{ "dimensions": { "borderWidth": 99 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn config_to_json_contains_sections() {
        let json = config_to_json(&ResolvedLayoutConfig::default());
        assert!(json.contains("\"settings\""));
        assert!(json.contains("\"dimensions\""));
        assert!(json.contains("\"header\""));
        assert!(json.contains("\"resolved\": true"));
    }
}
