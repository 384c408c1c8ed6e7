//! Resolved item configs: one closed variant per node kind, canonical
//! fields only. Legacy spellings are handled by the resolver.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::header::HeaderOverride;
use super::size::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Ground,
    Row,
    Column,
    Stack,
    Component,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Ground => "ground",
            ItemType::Row => "row",
            ItemType::Column => "column",
            ItemType::Stack => "stack",
            ItemType::Component => "component",
        }
    }

    pub fn is_row_or_column(self) -> bool {
        matches!(self, ItemType::Row | ItemType::Column)
    }

    /// Whether an item of type `child` may sit directly under `self` in a
    /// config tree. Components under rows, columns and ground are legal in
    /// config; they are wrapped in stacks when the tree is built.
    pub fn accepts_child(self, child: ItemType) -> bool {
        match self {
            ItemType::Ground | ItemType::Row | ItemType::Column => child != ItemType::Ground,
            ItemType::Stack => child == ItemType::Component,
            ItemType::Component => false,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResolvedItemConfig {
    Ground(ResolvedGroundItemConfig),
    Row(ResolvedRowOrColumnItemConfig),
    Column(ResolvedRowOrColumnItemConfig),
    Stack(ResolvedStackItemConfig),
    Component(ResolvedComponentItemConfig),
}

impl ResolvedItemConfig {
    pub fn item_type(&self) -> ItemType {
        match self {
            ResolvedItemConfig::Ground(_) => ItemType::Ground,
            ResolvedItemConfig::Row(_) => ItemType::Row,
            ResolvedItemConfig::Column(_) => ItemType::Column,
            ResolvedItemConfig::Stack(_) => ItemType::Stack,
            ResolvedItemConfig::Component(_) => ItemType::Component,
        }
    }

    pub fn content(&self) -> &[ResolvedItemConfig] {
        match self {
            ResolvedItemConfig::Ground(c) => &c.content,
            ResolvedItemConfig::Row(c) | ResolvedItemConfig::Column(c) => &c.content,
            ResolvedItemConfig::Stack(c) => &c.content,
            ResolvedItemConfig::Component(_) => &[],
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ResolvedItemConfig::Ground(_) => "",
            ResolvedItemConfig::Row(c) | ResolvedItemConfig::Column(c) => &c.id,
            ResolvedItemConfig::Stack(c) => &c.id,
            ResolvedItemConfig::Component(c) => &c.id,
        }
    }

    pub fn size(&self) -> Size {
        match self {
            ResolvedItemConfig::Ground(_) => Size::percent(100.0),
            ResolvedItemConfig::Row(c) | ResolvedItemConfig::Column(c) => c.size,
            ResolvedItemConfig::Stack(c) => c.size,
            ResolvedItemConfig::Component(c) => c.size,
        }
    }

    pub fn min_size(&self) -> Option<Size> {
        match self {
            ResolvedItemConfig::Ground(_) => None,
            ResolvedItemConfig::Row(c) | ResolvedItemConfig::Column(c) => c.min_size,
            ResolvedItemConfig::Stack(c) => c.min_size,
            ResolvedItemConfig::Component(c) => c.min_size,
        }
    }

    pub fn set_size(&mut self, size: Size) {
        match self {
            ResolvedItemConfig::Ground(_) => {}
            ResolvedItemConfig::Row(c) | ResolvedItemConfig::Column(c) => c.size = size,
            ResolvedItemConfig::Stack(c) => c.size = size,
            ResolvedItemConfig::Component(c) => c.size = size,
        }
    }

    pub fn is_closable(&self) -> bool {
        match self {
            ResolvedItemConfig::Ground(_) => false,
            ResolvedItemConfig::Row(c) | ResolvedItemConfig::Column(c) => c.is_closable,
            ResolvedItemConfig::Stack(c) => c.is_closable,
            ResolvedItemConfig::Component(c) => c.is_closable,
        }
    }

    /// Depth-first search for the first config with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<&ResolvedItemConfig> {
        if self.id() == id {
            return Some(self);
        }
        self.content().iter().find_map(|c| c.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut ResolvedItemConfig> {
        if self.id() == id {
            return Some(self);
        }
        let children: &mut Vec<ResolvedItemConfig> = match self {
            ResolvedItemConfig::Ground(c) => &mut c.content,
            ResolvedItemConfig::Row(c) | ResolvedItemConfig::Column(c) => &mut c.content,
            ResolvedItemConfig::Stack(c) => &mut c.content,
            ResolvedItemConfig::Component(_) => return None,
        };
        children.iter_mut().find_map(|c| c.find_by_id_mut(id))
    }

    /// Number of component configs in this subtree.
    pub fn component_count(&self) -> usize {
        match self {
            ResolvedItemConfig::Component(_) => 1,
            other => other.content().iter().map(|c| c.component_count()).sum(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolvedGroundItemConfig {
    pub content: Vec<ResolvedItemConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolvedRowOrColumnItemConfig {
    pub content: Vec<ResolvedItemConfig>,
    pub size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<Size>,
    pub id: String,
    pub is_closable: bool,
}

impl Default for ResolvedRowOrColumnItemConfig {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            size: Size::default(),
            min_size: None,
            id: String::new(),
            is_closable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolvedStackItemConfig {
    /// Always component configs.
    pub content: Vec<ResolvedItemConfig>,
    pub size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<Size>,
    pub id: String,
    pub is_closable: bool,
    /// Logical child index of the visible component.
    pub active_item_index: usize,
    pub maximised: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderOverride>,
}

impl Default for ResolvedStackItemConfig {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            size: Size::default(),
            min_size: None,
            id: String::new(),
            is_closable: true,
            active_item_index: 0,
            maximised: false,
            header: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolvedComponentItemConfig {
    pub component_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_state: Option<Value>,
    pub title: String,
    pub reorder_enabled: bool,
    pub size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<Size>,
    pub id: String,
    pub is_closable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderOverride>,
}

impl Default for ResolvedComponentItemConfig {
    fn default() -> Self {
        Self {
            component_type: String::new(),
            component_state: None,
            title: String::new(),
            reorder_enabled: true,
            size: Size::default(),
            min_size: None,
            id: String::new(),
            is_closable: true,
            header: None,
        }
    }
}

impl ResolvedComponentItemConfig {
    pub fn new(component_type: impl Into<String>) -> Self {
        let component_type = component_type.into();
        Self {
            title: component_type.clone(),
            component_type,
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.component_state = if state.is_null() { None } else { Some(state) };
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
