//! Manager lifecycle and persistence: init, load, save and teardown.

use dockyard_common::{ApiError, HostError};
use dockyard_config::{
    unminify_config, validation, ItemType, ResolvedComponentItemConfig, ResolvedGroundItemConfig,
    ResolvedItemConfig, ResolvedLayoutConfig, ResolvedPopoutLayoutConfig,
    ResolvedRowOrColumnItemConfig, ResolvedStackItemConfig, ResponsiveMode,
};

use crate::events::{EventPayload, INITIALISED};
use crate::item::{ItemId, ItemKind};
use crate::Result;

use super::types::{Gesture, PopoutOrigin};
use super::LayoutManager;

impl LayoutManager {
    /// Build the tree from the config and lay it out.
    ///
    /// A popout window first reads its config from host storage, under the
    /// key carried by its URL, and deletes the entry.
    pub fn init(&mut self) -> Result<()> {
        if self.initialised {
            return Err(ApiError::AlreadyInitialised.into());
        }
        if let Some(key) = self.sub_window_key.clone() {
            self.read_window_config(&key)?;
        }
        validation::validate(&self.config)?;

        let config = self.config.clone();
        self.settings = config.settings.clone();
        self.dimensions = config.dimensions.clone();
        self.header = config.header.clone();
        self.init_item(self.ground)?;
        self.build_root(config.root.as_ref())?;

        self.initialised = true;
        if self.settings.responsive_mode != ResponsiveMode::None {
            self.apply_responsive_layout();
        }
        self.maximise_flagged_stack()?;
        self.update_layout();

        if self.is_sub_window() {
            self.register_window();
        } else {
            for popout in config.open_popouts {
                self.open_popout(popout)?;
            }
        }
        tracing::info!(
            items = self.items.len(),
            sub_window = self.is_sub_window(),
            "layout initialised"
        );
        self.emit_manager_event(INITIALISED, EventPayload::None);
        Ok(())
    }

    fn read_window_config(&mut self, key: &str) -> Result<()> {
        let missing = || HostError::MissingWindowConfig(key.to_string());
        let host = self.host.clone().ok_or_else(missing)?;
        let text = host.storage_get(key).ok_or_else(missing)?;
        host.storage_remove(key);
        let config = unminify_config(&text)?;
        self.origin = PopoutOrigin {
            parent_id: config.parent_id.clone(),
            index_in_parent: config.index_in_parent,
            window: config.window,
        };
        self.config = config.to_layout_config();
        Ok(())
    }

    fn register_window(&mut self) {
        let Some(handle) = self.context.handle else {
            tracing::warn!("popout window has no handle; opener cannot reach it");
            return;
        };
        if self.self_ref.strong_count() == 0 {
            tracing::warn!(%handle, "popout manager is not shared; opener will not see it initialise");
        }
        if !self.windows.register(handle, self.self_ref.clone(), &self.hub) {
            tracing::warn!(%handle, "no opener expected this window");
        }
    }

    /// Create, attach and initialise the root under ground.
    fn build_root(&mut self, root: Option<&ResolvedItemConfig>) -> Result<()> {
        let Some(root) = root else {
            return Ok(());
        };
        self.check_component_types(root)?;
        let id = self.create_item(root, ItemType::Ground)?;
        self.attach_raw(self.ground, id, None);
        if let Err(e) = self.init_item(id) {
            self.detach_raw(id);
            self.destroy_subtree(id);
            self.items.remove(id);
            return Err(e);
        }
        Ok(())
    }

    /// Only the first stack flagged in the config is maximised; the flag is
    /// cleared on the rest.
    fn maximise_flagged_stack(&mut self) -> Result<()> {
        let flagged: Vec<ItemId> = self
            .get_all_content_items()
            .into_iter()
            .filter(|id| {
                self.items
                    .get(*id)
                    .and_then(|i| i.as_stack())
                    .is_some_and(|s| s.is_maximised())
            })
            .collect();
        for id in &flagged {
            if let Some(state) = self.items.get_mut(*id).and_then(|i| i.as_stack_mut()) {
                state.maximised = false;
            }
        }
        if let Some(&stack) = flagged.first() {
            if flagged.len() > 1 {
                tracing::warn!(flagged = flagged.len(), "several stacks flagged maximised; using the first");
            }
            self.maximise_stack(stack)?;
        }
        Ok(())
    }

    /// Replace the whole layout with `config`.
    pub fn load_layout(&mut self, config: ResolvedLayoutConfig) -> Result<()> {
        self.require_init("load_layout")?;
        validation::validate(&config)?;
        if let Some(root) = &config.root {
            self.check_component_types(root)?;
        }
        self.clear();
        self.settings = config.settings.clone();
        self.dimensions = config.dimensions.clone();
        self.header = config.header.clone();
        self.build_root(config.root.as_ref())?;
        self.maximise_flagged_stack()?;
        self.update_layout();
        if !self.is_sub_window() {
            for popout in config.open_popouts.clone() {
                self.open_popout(popout)?;
            }
        }
        self.config = config;
        tracing::debug!(items = self.items.len(), "layout loaded");
        self.emit_state_changed(self.ground);
        Ok(())
    }

    /// Snapshot of the current layout, including open popouts. Closed
    /// popout windows are dropped first.
    pub fn save_layout(&mut self) -> Result<ResolvedLayoutConfig> {
        self.require_init("save_layout")?;
        self.reconcile_popouts();
        let root = self.root().map(|r| self.item_to_config(r)).transpose()?;
        Ok(ResolvedLayoutConfig {
            root,
            open_popouts: self.popout_configs(),
            dimensions: self.dimensions.clone(),
            settings: self.settings.clone(),
            header: self.header.clone(),
            resolved: true,
        })
    }

    /// This window's layout as a popout config, with the placement it was
    /// booted with.
    pub fn to_popout_config(&self) -> Result<ResolvedPopoutLayoutConfig> {
        self.require_init("to_popout_config")?;
        let root = self.root().map(|r| self.item_to_config(r)).transpose()?;
        Ok(ResolvedPopoutLayoutConfig {
            root,
            open_popouts: self.popout_configs(),
            dimensions: self.dimensions.clone(),
            settings: self.settings.clone(),
            header: self.header.clone(),
            window: self.origin.window,
            parent_id: self.origin.parent_id.clone(),
            index_in_parent: self.origin.index_in_parent,
            resolved: true,
        })
    }

    fn popout_configs(&self) -> Vec<ResolvedPopoutLayoutConfig> {
        let Some(host) = self.host.as_deref() else {
            return Vec::new();
        };
        self.popouts
            .iter()
            .map(|p| p.to_config(host, &self.windows))
            .collect()
    }

    /// Resolved config of the live subtree at `id`. Stack children are
    /// saved in logical order.
    pub fn item_to_config(&self, id: ItemId) -> Result<ResolvedItemConfig> {
        let item = self.node(id)?;
        let content = item
            .children
            .iter()
            .map(|c| self.item_to_config(*c))
            .collect::<Result<Vec<_>>>()?;
        let config = match &item.kind {
            ItemKind::Ground => ResolvedItemConfig::Ground(ResolvedGroundItemConfig { content }),
            ItemKind::RowOrColumn(state) => {
                let config = ResolvedRowOrColumnItemConfig {
                    content,
                    size: item.size,
                    min_size: item.min_size,
                    id: item.id.clone(),
                    is_closable: item.is_closable,
                };
                if state.is_column() {
                    ResolvedItemConfig::Column(config)
                } else {
                    ResolvedItemConfig::Row(config)
                }
            }
            ItemKind::Stack(state) => ResolvedItemConfig::Stack(ResolvedStackItemConfig {
                content,
                size: item.size,
                min_size: item.min_size,
                id: item.id.clone(),
                is_closable: item.is_closable,
                active_item_index: state
                    .active
                    .and_then(|a| item.index_of(a))
                    .unwrap_or_default(),
                maximised: self.maximised_stack() == Some(id),
                header: state.header_override.clone(),
            }),
            ItemKind::Component(component) => {
                ResolvedItemConfig::Component(ResolvedComponentItemConfig {
                    component_type: component.component_type.clone(),
                    component_state: component.container.saved_state(),
                    title: component.container.title().to_string(),
                    reorder_enabled: component.reorder_enabled,
                    size: item.size,
                    min_size: item.min_size,
                    id: item.id.clone(),
                    is_closable: item.is_closable,
                    header: component.header_override.clone(),
                })
            }
        };
        Ok(config)
    }

    /// Tear the layout down: popouts (when configured), the tree, drag
    /// sources and any gesture in flight.
    pub fn destroy(&mut self) {
        if !self.initialised {
            return;
        }
        if self.settings.close_popouts_on_unload {
            self.close_all_open_popouts();
        }
        self.clear();
        self.drag_sources.clear();
        self.gesture = Gesture::Idle;
        self.dragging = false;
        self.deferred.drain();
        self.pending_resize = None;
        self.initialised = false;
        tracing::info!("layout destroyed");
    }
}
