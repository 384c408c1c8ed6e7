//! Structural tree operations.
//!
//! Everything here keeps parent links, stack tabs and lifecycles in sync.
//! Only `add_child` and `remove_item_inner` run the layout pass; the raw
//! helpers leave that to their caller.

use dockyard_common::{ApiError, ConfigError, UnreachableCase};
use dockyard_config::{ItemType, ResolvedComponentItemConfig, ResolvedItemConfig, Size, SizeUnit};

use crate::drag::DeferredCommand;
use crate::events::{
    EventPayload, ACTIVE_CONTENT_ITEM_CHANGED, BEFORE_ITEM_DESTROYED, ITEM_CREATED, ITEM_DESTROYED,
};
use crate::item::{
    ComponentItem, ContentItem, ItemId, ItemKind, Lifecycle, RowOrColumnState, StackState,
};
use crate::sizing::relative_percents;
use crate::Result;

use super::LayoutManager;

impl LayoutManager {
    pub(super) fn node(&self, id: ItemId) -> Result<&ContentItem> {
        self.items
            .get(id)
            .ok_or_else(|| ApiError::ItemNotFound(format!("{id:?}")).into())
    }

    // -- Creation --

    /// Fail early on component types neither the registry nor a binder
    /// could produce.
    pub(super) fn check_component_types(&self, config: &ResolvedItemConfig) -> Result<()> {
        if let ResolvedItemConfig::Component(c) = config {
            if !self.registry.contains(&c.component_type) && self.binder.is_none() {
                return Err(ApiError::UnknownComponentType(c.component_type.clone()).into());
            }
        }
        config
            .content()
            .iter()
            .try_for_each(|child| self.check_component_types(child))
    }

    /// Build the subtree for `config` under a parent of type `parent`. The
    /// result is neither attached nor initialised.
    pub(super) fn create_item(&mut self, config: &ResolvedItemConfig, parent: ItemType) -> Result<ItemId> {
        let item_type = config.item_type();
        if !parent.accepts_child(item_type) {
            return Err(ConfigError::IllegalChild {
                parent: parent.to_string(),
                child: item_type.to_string(),
            }
            .into());
        }
        let id = match config {
            ResolvedItemConfig::Ground(_) => {
                return Err(UnreachableCase::new("create_item", item_type).into());
            }
            ResolvedItemConfig::Row(c) | ResolvedItemConfig::Column(c) => {
                let state = RowOrColumnState::new(item_type == ItemType::Column);
                let id = self.items.insert(ContentItem::new(
                    ItemKind::RowOrColumn(state),
                    c.id.clone(),
                    c.size,
                    c.min_size,
                    c.is_closable,
                ));
                self.create_children(id, &c.content, item_type)?;
                id
            }
            ResolvedItemConfig::Stack(c) => {
                let mut state = StackState::new(c.header.clone(), c.active_item_index);
                state.maximised = c.maximised;
                let id = self.items.insert(ContentItem::new(
                    ItemKind::Stack(state),
                    c.id.clone(),
                    c.size,
                    c.min_size,
                    c.is_closable,
                ));
                self.create_children(id, &c.content, ItemType::Stack)?;
                id
            }
            ResolvedItemConfig::Component(c) => {
                // A popout window may show a lone component as its root.
                let bare = parent == ItemType::Stack
                    || (parent == ItemType::Ground && self.is_sub_window());
                if bare {
                    self.create_component(c)
                } else {
                    let stack = self.new_stack(c.size, c.min_size);
                    let component = self.create_component(c);
                    self.attach_raw(stack, component, None);
                    stack
                }
            }
        };
        Ok(id)
    }

    fn create_children(
        &mut self,
        parent: ItemId,
        content: &[ResolvedItemConfig],
        parent_type: ItemType,
    ) -> Result<()> {
        for child in content {
            match self.create_item(child, parent_type) {
                Ok(id) => {
                    self.attach_raw(parent, id, None);
                }
                Err(e) => {
                    self.discard(parent);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn create_component(&mut self, config: &ResolvedComponentItemConfig) -> ItemId {
        self.items.insert(ContentItem::new(
            ItemKind::Component(ComponentItem::new(config)),
            config.id.clone(),
            config.size,
            config.min_size,
            config.is_closable,
        ))
    }

    pub(super) fn new_stack(&mut self, size: Size, min_size: Option<Size>) -> ItemId {
        self.items.insert(ContentItem::new(
            ItemKind::Stack(StackState::new(None, 0)),
            String::new(),
            size,
            min_size,
            true,
        ))
    }

    pub(super) fn new_row_or_column(&mut self, is_column: bool, size: Size) -> ItemId {
        self.items.insert(ContentItem::new(
            ItemKind::RowOrColumn(RowOrColumnState::new(is_column)),
            String::new(),
            size,
            None,
            true,
        ))
    }

    /// Put a detached item into a fresh, unattached stack.
    pub(super) fn wrap_in_stack(&mut self, item: ItemId) -> ItemId {
        let (size, min_size) = self
            .items
            .get(item)
            .map(|i| (i.size, i.min_size))
            .unwrap_or_default();
        let stack = self.new_stack(size, min_size);
        self.attach_raw(stack, item, None);
        stack
    }

    /// Drop a never-initialised subtree from the arena without events.
    pub(super) fn discard(&mut self, id: ItemId) {
        if let Some(item) = self.items.remove(id) {
            for child in item.children {
                self.discard(child);
            }
        }
    }

    // -- Initialisation --

    /// Initialise `id` and its uninitialised descendants, children first.
    /// Components are bound on the way.
    pub(super) fn init_item(&mut self, id: ItemId) -> Result<()> {
        let Some(item) = self.items.get(id) else {
            return Ok(());
        };
        if item.lifecycle != Lifecycle::Uninitialised {
            return Ok(());
        }
        for child in item.children.clone() {
            self.init_item(child)?;
        }
        self.bind_component(id)?;

        let Some(item) = self.items.get_mut(id) else {
            return Ok(());
        };
        item.lifecycle = Lifecycle::Initialised;
        item.element.attached = true;
        let is_ground = item.is_ground();
        if let ItemKind::Stack(stack) = &mut item.kind {
            if stack.active.is_none() && !item.children.is_empty() {
                let index = stack.initial_active_index.min(item.children.len() - 1);
                let active = item.children[index];
                stack.active = Some(active);
                stack.header.set_active(Some(active));
            }
        }
        if !is_ground {
            self.emit_item_event(id, ITEM_CREATED, EventPayload::Item(id));
        }
        Ok(())
    }

    /// Registry first, then the binder.
    pub(super) fn bind_component(&mut self, id: ItemId) -> Result<()> {
        let Self {
            items,
            registry,
            binder,
            ..
        } = self;
        let Some(component) = items.get_mut(id).and_then(|i| i.as_component_mut()) else {
            return Ok(());
        };
        if component.container.has_component() {
            return Ok(());
        }
        let state = component.container.state().cloned();
        if let Some(bound) =
            registry.instantiate(&component.component_type, &mut component.container, state.as_ref())
        {
            component.container.attach(bound);
            return Ok(());
        }

        let config = ResolvedComponentItemConfig {
            component_type: component.component_type.clone(),
            component_state: state,
            title: component.container.title().to_string(),
            reorder_enabled: component.reorder_enabled,
            header: component.header_override.clone(),
            ..Default::default()
        };
        match binder
            .as_mut()
            .and_then(|b| b.bind(&mut component.container, &config))
        {
            Some(bound) => {
                component.container.attach(bound);
                component.bound_externally = true;
                Ok(())
            }
            None => Err(ApiError::UnknownComponentType(component.component_type.clone()).into()),
        }
    }

    // -- Linking --

    /// Link `child` under `parent` at `index` (clamped; `None` appends).
    /// A stack parent gets a tab at the matching visual position.
    pub(super) fn attach_raw(&mut self, parent: ItemId, child: ItemId, index: Option<usize>) -> usize {
        let Some(p) = self.items.get_mut(parent) else {
            return 0;
        };
        let len = p.children.len();
        let index = index.unwrap_or(len).min(len);
        let next = p.children.get(index).copied();
        p.children.insert(index, child);
        if let ItemKind::Stack(stack) = &mut p.kind {
            let visual = next
                .and_then(|n| stack.header.visual_index_of(n))
                .unwrap_or(usize::MAX);
            stack.header.add_tab(child, visual);
        }
        if let Some(c) = self.items.get_mut(child) {
            c.parent = Some(parent);
        }
        index
    }

    /// Unlink `child` from its parent and return the former parent and
    /// index. While a drag is in progress the header tab is only hidden and
    /// its removal deferred.
    pub(super) fn detach_raw(&mut self, child: ItemId) -> Option<(ItemId, usize)> {
        let parent = self.items.get(child)?.parent?;
        let p = self.items.get_mut(parent)?;
        let index = p.index_of(child)?;
        p.children.remove(index);

        let mut activated = None;
        if let ItemKind::Stack(stack) = &mut p.kind {
            if self.dragging {
                if let Some(tab) = stack.header.detach_tab(child) {
                    self.deferred.push(DeferredCommand::RemoveTab { stack: parent, tab });
                }
            } else if let Some(tab) = stack.header.tab_for(child).map(|t| t.id()) {
                stack.header.remove_tab(tab);
            }
            if stack.active == Some(child) {
                let next = p.children.get(index.saturating_sub(1)).copied();
                stack.active = next;
                stack.header.set_active(next);
                activated = next;
            }
        }
        if let Some(c) = self.items.get_mut(child) {
            c.parent = None;
        }
        if let Some(next) = activated {
            self.emit_item_event(parent, ACTIVE_CONTENT_ITEM_CHANGED, EventPayload::Item(next));
        }
        Some((parent, index))
    }

    /// Put `new` where `old` sits under `parent`. `old` is unlinked, not
    /// destroyed; `new` takes over its size.
    pub(super) fn replace_raw(&mut self, parent: ItemId, old: ItemId, new: ItemId) {
        let size = self.items.get(old).map(|i| i.size);
        let Some((_, index)) = self.detach_raw(old) else {
            return;
        };
        self.attach_raw(parent, new, Some(index));
        if let (Some(size), Some(item)) = (size, self.items.get_mut(new)) {
            item.size = size;
        }
    }

    /// Make `item` the visible child of `stack`. False if it already was
    /// or is not a child.
    pub(super) fn set_stack_active(&mut self, stack: ItemId, item: ItemId) -> bool {
        let Some(s) = self.items.get_mut(stack) else {
            return false;
        };
        if !s.children.contains(&item) {
            return false;
        }
        let Some(state) = s.as_stack_mut() else {
            return false;
        };
        if state.active == Some(item) {
            return false;
        }
        state.active = Some(item);
        state.header.set_active(Some(item));
        state.header.close_dropdown();
        self.emit_item_event(stack, ACTIVE_CONTENT_ITEM_CHANGED, EventPayload::Item(item));
        true
    }

    // -- Insertion and removal --

    /// Attach `child` under `parent` with the parent's insertion rules,
    /// initialise it if the parent is live, and lay out.
    pub(super) fn add_child(&mut self, parent: ItemId, child: ItemId, index: Option<usize>) -> Result<usize> {
        let p = self.node(parent)?;
        let live = p.is_initialised();
        if p.is_row_or_column() && live {
            self.make_room(parent, child);
        }
        let index = self.attach_raw(parent, child, index);
        if live {
            if let Err(e) = self.init_item(child) {
                self.detach_raw(child);
                self.destroy_subtree(child);
                self.items.remove(child);
                return Err(e);
            }
            if self.node(parent)?.is_stack() {
                self.set_stack_active(parent, child);
            }
        }
        self.update_layout();
        self.emit_state_changed(child);
        Ok(index)
    }

    /// New child of an initialised row or column takes `100/n` percent;
    /// existing children are scaled to fit the rest.
    fn make_room(&mut self, parent: ItemId, child: ItemId) {
        let siblings = self
            .items
            .get(parent)
            .map(|p| p.children.clone())
            .unwrap_or_default();
        let share = 100.0 / (siblings.len() + 1) as f64;
        let scale = (100.0 - share) / 100.0;
        let sizes: Vec<Size> = siblings
            .iter()
            .filter_map(|s| self.items.get(*s).map(|i| i.size))
            .collect();
        for (sibling, percent) in siblings.iter().zip(relative_percents(&sizes)) {
            if let Some(item) = self.items.get_mut(*sibling) {
                item.size = Size::percent(percent * scale);
            }
        }
        if let Some(item) = self.items.get_mut(child) {
            item.size = Size::percent(share);
        }
    }

    /// Destroy `id` and its descendants and drop them from the arena. `id`
    /// stays linked to its parent so its destroy events still bubble; the
    /// caller unlinks and removes it.
    pub(super) fn destroy_subtree(&mut self, id: ItemId) {
        let Some(item) = self.items.get(id) else {
            return;
        };
        let live = item.lifecycle == Lifecycle::Initialised;
        let children = item.children.clone();
        if live {
            self.emit_item_event(id, BEFORE_ITEM_DESTROYED, EventPayload::Item(id));
        }
        for child in children {
            self.destroy_subtree(child);
            self.items.remove(child);
        }
        self.release_component(id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.maximised.is_some_and(|m| m.stack == id) {
            self.maximised = None;
        }
        if let Some(item) = self.items.get_mut(id) {
            item.lifecycle = Lifecycle::Destroyed;
            item.element.attached = false;
            item.element.visible = false;
        }
        if live {
            self.emit_item_event(id, ITEM_DESTROYED, EventPayload::Item(id));
        }
    }

    pub(super) fn release_component(&mut self, id: ItemId) {
        let Self { items, binder, .. } = self;
        let Some(component) = items.get_mut(id).and_then(|i| i.as_component_mut()) else {
            return;
        };
        component.container.release();
        if component.bound_externally {
            if let Some(binder) = binder.as_mut() {
                binder.unbind(&mut component.container);
            }
            component.bound_externally = false;
        }
    }

    /// Destroy `id`, unlink it, give its share to the remaining siblings
    /// and apply the cleanup rules to the former parent.
    pub(super) fn remove_item_inner(&mut self, id: ItemId) {
        let Some(size) = self.items.get(id).map(|i| i.size) else {
            return;
        };
        self.destroy_subtree(id);
        let former = self.detach_raw(id);
        self.items.remove(id);
        if let Some((parent, _)) = former {
            self.redistribute(parent, size);
            self.cleanup(parent);
        }
    }

    fn redistribute(&mut self, parent: ItemId, removed: Size) {
        let Some(p) = self.items.get(parent) else {
            return;
        };
        if !p.is_row_or_column() || removed.unit != SizeUnit::Percent || p.children.is_empty() {
            return;
        }
        let extra = removed.magnitude / p.children.len() as f64;
        for child in p.children.clone() {
            if let Some(item) = self.items.get_mut(child) {
                if item.size.unit == SizeUnit::Percent {
                    item.size.magnitude += extra;
                }
            }
        }
    }

    /// Structural rules after `parent` lost a child: an empty closable
    /// stack removes itself, a closable row or column with one child is
    /// replaced by that child and an empty one is removed.
    pub(super) fn cleanup(&mut self, parent: ItemId) {
        let Some(item) = self.items.get(parent) else {
            return;
        };
        if !item.is_closable {
            return;
        }
        let count = item.children.len();
        let only = item.children.first().copied();
        let grand = item.parent;
        let is_stack = item.is_stack();
        let is_row_or_column = item.is_row_or_column();

        if (is_stack || is_row_or_column) && count == 0 {
            tracing::debug!(item = ?parent, "removing empty container");
            self.remove_item_inner(parent);
        } else if is_row_or_column && count == 1 {
            let (Some(child), Some(grand)) = (only, grand) else {
                return;
            };
            tracing::debug!(item = ?parent, "collapsing single-child container");
            self.detach_raw(child);
            self.replace_raw(grand, parent, child);
            self.destroy_subtree(parent);
            self.items.remove(parent);
        }
    }

    /// Apply header-tab removals that were deferred during a drag.
    pub(super) fn flush_deferred(&mut self) {
        for command in self.deferred.drain() {
            match command {
                DeferredCommand::RemoveTab { stack, tab } => {
                    if let Some(state) = self.items.get_mut(stack).and_then(|s| s.as_stack_mut()) {
                        state.header.remove_tab(tab);
                    }
                }
            }
        }
    }
}
