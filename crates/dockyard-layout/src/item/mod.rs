//! Live content item nodes.
//!
//! Items live in the manager's arena and refer to each other by
//! [`ItemId`]. A node owns its children (by id, in logical order); the
//! parent link is a plain back-reference that the manager keeps in sync.

mod kind;

pub use kind::*;

use dockyard_common::Rect;
use dockyard_config::{ItemType, Size};

use crate::events::EventEmitter;

slotmap::new_key_type! {
    /// Arena key of a live content item.
    pub struct ItemId;
}

/// One-way lifecycle of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialised,
    Initialised,
    Destroyed,
}

/// Stand-in for the item's DOM element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementState {
    pub rect: Rect,
    pub visible: bool,
    /// Set while the element is part of the rendered tree. Cleared while a
    /// component rides in the drag proxy.
    pub attached: bool,
}

#[derive(Debug)]
pub struct ContentItem {
    pub(crate) kind: ItemKind,
    pub(crate) parent: Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
    pub(crate) id: String,
    pub(crate) size: Size,
    pub(crate) min_size: Option<Size>,
    pub(crate) is_closable: bool,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) element: ElementState,
    pub(crate) pop_in_parent_ids: Vec<String>,
    pub(crate) events: EventEmitter,
}

impl ContentItem {
    pub(crate) fn new(kind: ItemKind, id: String, size: Size, min_size: Option<Size>, is_closable: bool) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            id,
            size,
            min_size,
            is_closable,
            lifecycle: Lifecycle::Uninitialised,
            element: ElementState::default(),
            pop_in_parent_ids: Vec::new(),
            events: EventEmitter::new(),
        }
    }

    // -- Accessors --

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn item_type(&self) -> ItemType {
        self.kind.item_type()
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn min_size(&self) -> Option<Size> {
        self.min_size
    }

    pub fn is_closable(&self) -> bool {
        self.is_closable
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_initialised(&self) -> bool {
        self.lifecycle == Lifecycle::Initialised
    }

    pub fn rect(&self) -> Rect {
        self.element.rect
    }

    pub fn element(&self) -> &ElementState {
        &self.element
    }

    pub fn is_visible(&self) -> bool {
        self.element.visible
    }

    pub fn pop_in_parent_ids(&self) -> &[String] {
        &self.pop_in_parent_ids
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventEmitter {
        &mut self.events
    }

    pub fn is_ground(&self) -> bool {
        matches!(self.kind, ItemKind::Ground)
    }

    pub fn is_row_or_column(&self) -> bool {
        matches!(self.kind, ItemKind::RowOrColumn(_))
    }

    pub fn is_stack(&self) -> bool {
        matches!(self.kind, ItemKind::Stack(_))
    }

    pub fn is_component(&self) -> bool {
        matches!(self.kind, ItemKind::Component(_))
    }

    pub fn as_row_or_column(&self) -> Option<&RowOrColumnState> {
        match &self.kind {
            ItemKind::RowOrColumn(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_stack(&self) -> Option<&StackState> {
        match &self.kind {
            ItemKind::Stack(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn as_stack_mut(&mut self) -> Option<&mut StackState> {
        match &mut self.kind {
            ItemKind::Stack(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentItem> {
        match &self.kind {
            ItemKind::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_component_mut(&mut self) -> Option<&mut ComponentItem> {
        match &mut self.kind {
            ItemKind::Component(component) => Some(component),
            _ => None,
        }
    }

    /// Whether `id` is this item's identifier. Items without an id never
    /// match.
    pub fn has_id(&self, id: &str) -> bool {
        !self.id.is_empty() && self.id == id
    }

    pub fn index_of(&self, child: ItemId) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }
}
