//! Public tree operations: adding, removing, activating and replacing
//! items.

use dockyard_common::ApiError;
use dockyard_config::{resolve_item_config, ItemType, ResolvedComponentItemConfig, ResolvedItemConfig};
use serde_json::Value;

use crate::item::ItemId;
use crate::Result;

use super::location::{Location, LocationSelector, DEFAULT_LOCATION_SELECTORS};
use super::LayoutManager;

fn component_config(component_type: &str, state: Option<Value>, title: Option<&str>) -> ResolvedComponentItemConfig {
    let mut config = ResolvedComponentItemConfig::new(component_type);
    if let Some(state) = state {
        config = config.with_state(state);
    }
    if let Some(title) = title {
        config = config.with_title(title);
    }
    config
}

fn no_location() -> crate::DockError {
    ApiError::InvalidTarget("no location available".into()).into()
}

impl LayoutManager {
    pub(super) fn require_init(&self, operation: &'static str) -> Result<()> {
        if self.initialised {
            Ok(())
        } else {
            Err(ApiError::NotInitialised(operation).into())
        }
    }

    // -- Adding --

    pub fn add_component(
        &mut self,
        component_type: &str,
        state: Option<Value>,
        title: Option<&str>,
    ) -> Result<Location> {
        self.add_component_at_location(component_type, state, title, &DEFAULT_LOCATION_SELECTORS)?
            .ok_or_else(no_location)
    }

    /// Like [`add_component`](Self::add_component) but returns the new
    /// component item.
    pub fn new_component(
        &mut self,
        component_type: &str,
        state: Option<Value>,
        title: Option<&str>,
    ) -> Result<ItemId> {
        self.new_component_at_location(component_type, state, title, &DEFAULT_LOCATION_SELECTORS)?
            .ok_or_else(no_location)
    }

    /// `Ok(None)` when no selector matches.
    pub fn add_component_at_location(
        &mut self,
        component_type: &str,
        state: Option<Value>,
        title: Option<&str>,
        selectors: &[LocationSelector],
    ) -> Result<Option<Location>> {
        let config = ResolvedItemConfig::Component(component_config(component_type, state, title));
        Ok(self
            .add_resolved_item_at_location(&config, selectors)?
            .map(|(location, _)| location))
    }

    pub fn new_component_at_location(
        &mut self,
        component_type: &str,
        state: Option<Value>,
        title: Option<&str>,
        selectors: &[LocationSelector],
    ) -> Result<Option<ItemId>> {
        let config = ResolvedItemConfig::Component(component_config(component_type, state, title));
        Ok(self
            .add_resolved_item_at_location(&config, selectors)?
            .map(|(_, id)| id))
    }

    /// Add an item described by user-facing JSON config.
    pub fn add_item(&mut self, config: &Value) -> Result<Location> {
        self.add_item_at_location(config, &DEFAULT_LOCATION_SELECTORS)?
            .ok_or_else(no_location)
    }

    pub fn new_item(&mut self, config: &Value) -> Result<ItemId> {
        self.new_item_at_location(config, &DEFAULT_LOCATION_SELECTORS)?
            .ok_or_else(no_location)
    }

    pub fn add_item_at_location(
        &mut self,
        config: &Value,
        selectors: &[LocationSelector],
    ) -> Result<Option<Location>> {
        Ok(self
            .add_json_item_at_location(config, selectors)?
            .map(|(location, _)| location))
    }

    pub fn new_item_at_location(
        &mut self,
        config: &Value,
        selectors: &[LocationSelector],
    ) -> Result<Option<ItemId>> {
        Ok(self
            .add_json_item_at_location(config, selectors)?
            .map(|(_, id)| id))
    }

    fn add_json_item_at_location(
        &mut self,
        config: &Value,
        selectors: &[LocationSelector],
    ) -> Result<Option<(Location, ItemId)>> {
        self.require_init("add_item")?;
        let Some(location) = self.find_first_location(selectors) else {
            return Ok(None);
        };
        let parent_type = self.node(location.parent)?.item_type();
        let resolved = resolve_item_config(config, parent_type)?;
        self.insert_at(location, &resolved).map(Some)
    }

    /// Add an already-resolved item at the first matching location.
    pub fn add_resolved_item_at_location(
        &mut self,
        config: &ResolvedItemConfig,
        selectors: &[LocationSelector],
    ) -> Result<Option<(Location, ItemId)>> {
        self.require_init("add_item")?;
        match self.find_first_location(selectors) {
            Some(location) => self.insert_at(location, config).map(Some),
            None => Ok(None),
        }
    }

    /// Create `config` and add it at `location`. Returns where it went and
    /// the created item; for a component that is the component itself,
    /// not the stack it was wrapped in.
    pub fn insert_at(&mut self, location: Location, config: &ResolvedItemConfig) -> Result<(Location, ItemId)> {
        self.require_init("insert_at")?;
        self.check_component_types(config)?;
        let parent = self.node(location.parent)?;
        let parent_type = parent.item_type();
        let item_type = config.item_type();
        match parent_type {
            ItemType::Stack if item_type != ItemType::Component => {
                return Err(ApiError::InvalidTarget(format!("a stack cannot hold a {item_type}")).into());
            }
            ItemType::Ground if !parent.children.is_empty() => {
                return Err(ApiError::InvalidTarget("the layout already has a root".into()).into());
            }
            ItemType::Component => {
                return Err(ApiError::InvalidTarget("a component cannot hold children".into()).into());
            }
            _ => {}
        }

        let id = self.create_item(config, parent_type)?;
        let index = self.add_child(location.parent, id, Some(location.index))?;
        let created = match self.items.get(id) {
            Some(item) if item_type == ItemType::Component && item.is_stack() => {
                item.children.first().copied().unwrap_or(id)
            }
            _ => id,
        };
        tracing::debug!(item = ?created, kind = %item_type, index, "item added");
        Ok((
            Location {
                parent: location.parent,
                index,
            },
            created,
        ))
    }

    // -- Removing --

    /// Remove `id` and everything below it, closable or not.
    pub fn remove_item(&mut self, id: ItemId) -> Result<()> {
        if self.node(id)?.is_ground() {
            return Err(ApiError::InvalidTarget("ground cannot be removed".into()).into());
        }
        let parent = self.node(id)?.parent;
        self.remove_item_inner(id);
        self.update_layout();
        let origin = parent.filter(|p| self.items.contains_key(*p)).unwrap_or(self.ground);
        self.emit_state_changed(origin);
        Ok(())
    }

    /// Remove `id` if it is closable. Returns whether it was removed.
    pub fn close_item(&mut self, id: ItemId) -> Result<bool> {
        let item = self.node(id)?;
        if item.is_ground() {
            return Err(ApiError::InvalidTarget("ground cannot be closed".into()).into());
        }
        if !item.is_closable {
            return Ok(false);
        }
        self.remove_item(id)?;
        Ok(true)
    }

    /// Remove the root, leaving an empty layout.
    pub fn clear(&mut self) {
        if let Some(root) = self.root() {
            self.destroy_subtree(root);
            self.detach_raw(root);
            self.items.remove(root);
        }
        self.maximised = None;
        self.focused = None;
        self.update_layout();
    }

    // -- Activation and replacement --

    /// Show `id` in its stack, optionally focusing it.
    pub fn set_active_component_item(&mut self, id: ItemId, focus: bool) -> Result<()> {
        let item = self.node(id)?;
        let Some(stack) = item.parent.filter(|_| item.is_component()) else {
            return Err(ApiError::InvalidTarget("only components in a stack can be activated".into()).into());
        };
        if self.set_stack_active(stack, id) {
            self.update_layout();
            self.emit_state_changed(stack);
        }
        if focus {
            self.focus_component(id)?;
        }
        Ok(())
    }

    /// Release the component bound to `id` and bind a new one from
    /// `config` in the same container.
    pub fn replace_component(&mut self, id: ItemId, config: ResolvedComponentItemConfig) -> Result<()> {
        if !self.node(id)?.is_component() {
            return Err(ApiError::InvalidTarget("not a component".into()).into());
        }
        self.check_component_types(&ResolvedItemConfig::Component(config.clone()))?;
        self.release_component(id);
        if let Some(component) = self.items.get_mut(id).and_then(|i| i.as_component_mut()) {
            component.component_type = config.component_type.clone();
            component.reorder_enabled = config.reorder_enabled;
            component.header_override = config.header.clone();
            component.container.reset_for(&config);
        }
        self.bind_component(id)?;
        self.update_layout();
        self.emit_state_changed(id);
        Ok(())
    }
}
