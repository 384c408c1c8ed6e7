//! Stack header configuration: placement and button labels.

use dockyard_common::Side;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Where a stack header is drawn, or `Hidden`. Serialized as `false` or a
/// side name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderShow {
    Hidden,
    Side(Side),
}

impl HeaderShow {
    pub fn side(self) -> Option<Side> {
        match self {
            HeaderShow::Hidden => None,
            HeaderShow::Side(side) => Some(side),
        }
    }
}

impl Default for HeaderShow {
    fn default() -> Self {
        HeaderShow::Side(Side::Top)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagOrText {
    Flag(bool),
    Text(String),
}

impl Serialize for HeaderShow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HeaderShow::Hidden => serializer.serialize_bool(false),
            HeaderShow::Side(side) => serializer.serialize_str(side.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for HeaderShow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match FlagOrText::deserialize(deserializer)? {
            FlagOrText::Flag(false) => Ok(HeaderShow::Hidden),
            FlagOrText::Flag(true) => Ok(HeaderShow::Side(Side::Top)),
            FlagOrText::Text(text) => Side::parse(&text)
                .map(HeaderShow::Side)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid header side '{text}'"))),
        }
    }
}

/// A header button: either disabled (`false`) or shown with a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonLabel {
    Disabled,
    Text(String),
}

impl ButtonLabel {
    pub fn text(label: impl Into<String>) -> Self {
        ButtonLabel::Text(label.into())
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, ButtonLabel::Text(_))
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            ButtonLabel::Disabled => None,
            ButtonLabel::Text(text) => Some(text),
        }
    }
}

impl Serialize for ButtonLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ButtonLabel::Disabled => serializer.serialize_bool(false),
            ButtonLabel::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl<'de> Deserialize<'de> for ButtonLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match FlagOrText::deserialize(deserializer)? {
            FlagOrText::Flag(false) => Ok(ButtonLabel::Disabled),
            FlagOrText::Flag(true) => Err(serde::de::Error::custom(
                "expected false or a button label",
            )),
            FlagOrText::Text(text) => Ok(ButtonLabel::Text(text)),
        }
    }
}

/// Layout-wide header settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderConfig {
    pub show: HeaderShow,
    pub popout: ButtonLabel,
    pub dock: String,
    pub maximise: ButtonLabel,
    pub minimise: String,
    pub close: ButtonLabel,
    pub tab_dropdown: ButtonLabel,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            show: HeaderShow::default(),
            popout: ButtonLabel::text("open in new window"),
            dock: "dock".into(),
            maximise: ButtonLabel::text("maximise"),
            minimise: "minimise".into(),
            close: ButtonLabel::text("close"),
            tab_dropdown: ButtonLabel::text("additional tabs"),
        }
    }
}

/// Per-item header override. Unset fields inherit from [`HeaderConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<HeaderShow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popout: Option<ButtonLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dock: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximise: Option<ButtonLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimise: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<ButtonLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_dropdown: Option<ButtonLabel>,
}

impl HeaderOverride {
    pub fn is_empty(&self) -> bool {
        *self == HeaderOverride::default()
    }

    /// Layer this override on top of `base`.
    pub fn apply_to(&self, base: &HeaderConfig) -> HeaderConfig {
        HeaderConfig {
            show: self.show.unwrap_or(base.show),
            popout: self.popout.clone().unwrap_or_else(|| base.popout.clone()),
            dock: self.dock.clone().unwrap_or_else(|| base.dock.clone()),
            maximise: self.maximise.clone().unwrap_or_else(|| base.maximise.clone()),
            minimise: self.minimise.clone().unwrap_or_else(|| base.minimise.clone()),
            close: self.close.clone().unwrap_or_else(|| base.close.clone()),
            tab_dropdown: self
                .tab_dropdown
                .clone()
                .unwrap_or_else(|| base.tab_dropdown.clone()),
        }
    }
}
