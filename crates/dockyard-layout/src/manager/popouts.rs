//! Popping items out into separate windows and docking them back.

use std::rc::Rc;

use dockyard_common::{new_unique_id, ApiError, DockError, HostError};
use dockyard_config::{ItemType, PopoutWindow, ResolvedItemConfig, ResolvedPopoutLayoutConfig};

use crate::events::{EventPayload, POPOUT_BLOCKED, WINDOW_CLOSED};
use crate::item::ItemId;
use crate::popout::{BrowserPopout, WindowHost, WindowRequest};
use crate::Result;

use super::location::Location;
use super::LayoutManager;

impl LayoutManager {
    fn require_host(&self) -> Result<Rc<dyn WindowHost>> {
        self.host
            .clone()
            .ok_or_else(|| DockError::Other("no window host configured".into()))
    }

    /// Move `item` into a new window. The window is opened first; if it is
    /// blocked the tree is left untouched and, unless blocked popouts are
    /// errors, `Ok(None)` is returned.
    pub fn create_popout(&mut self, item: ItemId) -> Result<Option<usize>> {
        self.require_init("create_popout")?;
        let node = self.node(item)?;
        if node.is_ground() {
            return Err(ApiError::InvalidTarget("ground cannot be popped out".into()).into());
        }
        let rect = node.element.rect;

        // The pop-in marker goes on the first ancestor that survives the
        // removal.
        let mut child = item;
        let mut parent = node.parent.unwrap_or(self.ground);
        while let Some(p) = self.items.get(parent) {
            if p.is_ground() || p.children.len() != 1 {
                break;
            }
            match p.parent {
                Some(grand) => {
                    child = parent;
                    parent = grand;
                }
                None => break,
            }
        }
        let index = self.node(parent)?.index_of(child);

        let host = self.require_host()?;
        let (origin_x, origin_y) = host.screen_origin();
        let window = if rect.width > 0.0 && rect.height > 0.0 {
            PopoutWindow {
                left: Some(rect.x + origin_x),
                top: Some(rect.y + origin_y),
                width: Some(rect.width),
                height: Some(rect.height),
            }
        } else {
            PopoutWindow::default()
        };
        let pop_in_id = new_unique_id();
        let config = ResolvedPopoutLayoutConfig {
            root: Some(self.item_to_config(item)?),
            dimensions: self.dimensions.clone(),
            settings: self.settings.clone(),
            header: self.header.clone(),
            window,
            parent_id: Some(pop_in_id.clone()),
            index_in_parent: index,
            ..Default::default()
        };

        let Some(id) = self.open_popout(config)? else {
            return Ok(None);
        };
        if let Some(p) = self.items.get_mut(parent) {
            p.pop_in_parent_ids.push(pop_in_id);
        }
        self.remove_item(item)?;
        Ok(Some(id))
    }

    /// Open a window for a config that is not in the tree.
    pub fn create_popout_from_config(
        &mut self,
        root: ResolvedItemConfig,
        window: PopoutWindow,
    ) -> Result<Option<usize>> {
        self.require_init("create_popout_from_config")?;
        self.check_component_types(&root)?;
        let config = ResolvedPopoutLayoutConfig {
            root: Some(root),
            dimensions: self.dimensions.clone(),
            settings: self.settings.clone(),
            header: self.header.clone(),
            window,
            ..Default::default()
        };
        self.open_popout(config)
    }

    pub(super) fn open_popout(&mut self, config: ResolvedPopoutLayoutConfig) -> Result<Option<usize>> {
        let host = self.require_host()?;
        let id = self.next_popout_id;
        match BrowserPopout::open(id, config, host.as_ref(), &self.context) {
            Ok(popout) => {
                self.next_popout_id += 1;
                self.windows.expect(popout.handle(), &self.hub);
                tracing::info!(popout = id, handle = %popout.handle(), "popout created");
                self.popouts.push(popout);
                Ok(Some(id))
            }
            Err(HostError::PopoutBlocked) if !self.settings.blocked_popouts_throw_error => {
                tracing::warn!(popout = id, "popout window blocked");
                self.emit_manager_event(POPOUT_BLOCKED, EventPayload::Popout { id, handle: None });
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Dock popout `id` back into this window and close it.
    pub fn pop_in(&mut self, id: usize) -> Result<()> {
        let index = self
            .popouts
            .iter()
            .position(|p| p.id() == id)
            .ok_or(ApiError::PopoutNotFound(id))?;
        let host = self.require_host()?;
        let config = self.popouts[index].to_config(host.as_ref(), &self.windows);
        self.pop_in_config(index, config)
    }

    /// Close and forget popout `index`, then insert `config` where it came
    /// from: the item carrying its pop-in marker, else the root.
    pub(super) fn pop_in_config(&mut self, index: usize, config: ResolvedPopoutLayoutConfig) -> Result<()> {
        let popout = self.forget_popout(index)?;
        let Some(root) = config.root else {
            return Ok(());
        };
        let marked = config.parent_id.as_deref().and_then(|marker| {
            self.get_all_content_items().into_iter().find(|item| {
                self.items
                    .get(*item)
                    .is_some_and(|i| i.pop_in_parent_ids.iter().any(|p| p == marker))
            })
        });
        let (parent, index_in_parent) = match marked {
            Some(parent) => {
                if let (Some(node), Some(marker)) = (self.items.get_mut(parent), config.parent_id.as_deref()) {
                    node.pop_in_parent_ids.retain(|p| p != marker);
                }
                (parent, config.index_in_parent)
            }
            // Marker gone with a collapsed parent: dock first into the root.
            None => (self.root().unwrap_or(self.ground), Some(0)),
        };
        tracing::info!(popout = popout.id(), parent = ?parent, "popout docked");
        self.dock_config(root, parent, index_in_parent)
    }

    fn dock_config(&mut self, root: ResolvedItemConfig, parent: ItemId, index: Option<usize>) -> Result<()> {
        let node = self.node(parent)?;
        let len = node.children.len();
        let at = index.unwrap_or(len).min(len);
        match (node.item_type(), root) {
            (ItemType::Ground, root) if len > 0 => {
                let current = self.root().unwrap_or(parent);
                if current == parent {
                    return Err(ApiError::InvalidTarget("no place to dock into".into()).into());
                }
                self.dock_config(root, current, index)
            }
            (ItemType::Component, _) => {
                Err(ApiError::InvalidTarget("cannot dock into a component".into()).into())
            }
            (ItemType::Stack, ResolvedItemConfig::Stack(stack)) => {
                for (offset, component) in stack.content.iter().enumerate() {
                    self.insert_at(
                        Location {
                            parent,
                            index: at + offset,
                        },
                        component,
                    )?;
                }
                Ok(())
            }
            (ItemType::Stack, root @ (ResolvedItemConfig::Row(_) | ResolvedItemConfig::Column(_))) => {
                self.check_component_types(&root)?;
                let new = self.create_item(&root, ItemType::Row)?;
                self.split(parent, new, false, true)?;
                self.update_layout();
                self.emit_state_changed(new);
                Ok(())
            }
            (_, root) => {
                self.insert_at(Location { parent, index: at }, &root)?;
                Ok(())
            }
        }
    }

    /// Close the window of popout `index`, unlink and tear down its
    /// manager, and announce it.
    fn forget_popout(&mut self, index: usize) -> Result<BrowserPopout> {
        let host = self.require_host()?;
        let mut popout = self.popouts.remove(index);
        popout.close(host.as_ref());
        if let Some(child) = self.windows.unregister(popout.handle()) {
            match child.try_borrow_mut() {
                Ok(mut child) => child.destroy(),
                Err(_) => tracing::warn!(handle = %popout.handle(), "popout manager busy; not destroyed"),
            }
        }
        self.emit_manager_event(
            WINDOW_CLOSED,
            EventPayload::Popout {
                id: popout.id(),
                handle: Some(popout.handle()),
            },
        );
        Ok(popout)
    }

    pub fn close_all_open_popouts(&mut self) {
        while !self.popouts.is_empty() {
            if let Err(e) = self.forget_popout(0) {
                tracing::warn!(error = %e, "failed to close popout");
                self.popouts.clear();
            }
        }
    }

    /// Handle windows the user closed: dock their content back when
    /// pop-in-on-close is set, otherwise drop them.
    pub(super) fn reconcile_popouts(&mut self) {
        let Some(host) = self.host.clone() else {
            return;
        };
        let mut index = 0;
        while index < self.popouts.len() {
            if !self.popouts[index].is_closed(host.as_ref()) {
                index += 1;
                continue;
            }
            let result = if self.settings.pop_in_on_close {
                let config = self.popouts[index].to_config(host.as_ref(), &self.windows);
                self.pop_in_config(index, config)
            } else {
                self.forget_popout(index).map(|_| ())
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "closed popout could not be reconciled");
            }
        }
    }

    /// Ask the opener to dock this popout window's content. Returns false
    /// in a main window or when the opener is gone.
    pub fn dock(&mut self) -> Result<bool> {
        let Some(handle) = self.context.handle.filter(|_| self.is_sub_window()) else {
            return Ok(false);
        };
        let config = self.to_popout_config()?;
        Ok(self.windows.push_request(handle, WindowRequest::PopIn(config)))
    }

    /// Dock requests posted by popout windows.
    pub(super) fn process_window_requests(&mut self) -> Result<()> {
        let handles: Vec<_> = self.popouts.iter().map(|p| (p.id(), p.handle())).collect();
        for (id, handle) in handles {
            for request in self.windows.take_requests(handle) {
                let WindowRequest::PopIn(config) = request;
                if let Some(index) = self.popouts.iter().position(|p| p.id() == id) {
                    self.pop_in_config(index, config)?;
                }
            }
        }
        Ok(())
    }
}
