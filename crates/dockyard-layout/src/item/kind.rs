//! Per-variant state of a content item.

use dockyard_common::Rect;
use dockyard_config::{HeaderOverride, ItemType, ResolvedComponentItemConfig};

use crate::component::ComponentContainer;
use crate::header::Header;
use crate::sizing::Splitter;

use super::ItemId;

/// The closed set of node variants.
#[derive(Debug)]
pub enum ItemKind {
    Ground,
    RowOrColumn(RowOrColumnState),
    Stack(StackState),
    Component(ComponentItem),
}

impl ItemKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemKind::Ground => ItemType::Ground,
            ItemKind::RowOrColumn(state) if state.is_column => ItemType::Column,
            ItemKind::RowOrColumn(_) => ItemType::Row,
            ItemKind::Stack(_) => ItemType::Stack,
            ItemKind::Component(_) => ItemType::Component,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RowOrColumnState {
    pub(crate) is_column: bool,
    pub(crate) splitters: Vec<Splitter>,
}

impl RowOrColumnState {
    pub fn new(is_column: bool) -> Self {
        Self {
            is_column,
            splitters: Vec::new(),
        }
    }

    pub fn is_column(&self) -> bool {
        self.is_column
    }

    pub fn splitters(&self) -> &[Splitter] {
        &self.splitters
    }
}

#[derive(Debug, Default)]
pub struct StackState {
    pub(crate) active: Option<ItemId>,
    pub(crate) maximised: bool,
    pub(crate) header: Header,
    pub(crate) header_override: Option<HeaderOverride>,
    /// Area below (or beside) the header where the active component lives.
    pub(crate) content_rect: Rect,
    /// Logical index to activate once children are attached.
    pub(crate) initial_active_index: usize,
}

impl StackState {
    pub fn new(header_override: Option<HeaderOverride>, initial_active_index: usize) -> Self {
        Self {
            header_override,
            initial_active_index,
            ..Default::default()
        }
    }

    pub fn active(&self) -> Option<ItemId> {
        self.active
    }

    pub fn is_maximised(&self) -> bool {
        self.maximised
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_override(&self) -> Option<&HeaderOverride> {
        self.header_override.as_ref()
    }

    pub fn content_rect(&self) -> Rect {
        self.content_rect
    }
}

#[derive(Debug)]
pub struct ComponentItem {
    pub(crate) component_type: String,
    pub(crate) reorder_enabled: bool,
    pub(crate) header_override: Option<HeaderOverride>,
    pub(crate) container: ComponentContainer,
    /// Bound through the external binder rather than the registry.
    pub(crate) bound_externally: bool,
}

impl ComponentItem {
    pub fn new(config: &ResolvedComponentItemConfig) -> Self {
        Self {
            component_type: config.component_type.clone(),
            reorder_enabled: config.reorder_enabled,
            header_override: config.header.clone(),
            container: ComponentContainer::new(config),
            bound_externally: false,
        }
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn reorder_enabled(&self) -> bool {
        self.reorder_enabled
    }

    pub fn title(&self) -> &str {
        self.container.title()
    }

    pub fn container(&self) -> &ComponentContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut ComponentContainer {
        &mut self.container
    }
}
