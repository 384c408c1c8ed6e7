//! The drag-and-drop transaction: detach on start, hit areas, and the
//! reparenting performed on drop.

use dockyard_common::{ApiError, Side};
use dockyard_config::{ItemType, ResolvedItemConfig, Size, SizeUnit};

use crate::drag::areas::{ground_areas, stack_areas};
use crate::drag::{Area, AreaHit, DragListener, DragProxy, DropZone, HeaderSlot};
use crate::events::{EventPayload, DRAG_START, DRAG_STOP, ITEM_DROPPED};
use crate::item::ItemId;
use crate::Result;

use super::types::{DragSubject, Gesture};
use super::LayoutManager;

/// Orientation of the container a side drop creates, and whether the new
/// item goes after the target.
fn split_axis(side: Side) -> (bool, bool) {
    let is_column = !side.is_vertical_edge();
    let after = matches!(side, Side::Right | Side::Bottom);
    (is_column, after)
}

impl LayoutManager {
    /// Start dragging `subject`. Returns false if the drag was refused
    /// (reordering disabled or the subject is gone).
    pub(super) fn begin_drag(
        &mut self,
        subject: DragSubject,
        listener: DragListener,
        x: f64,
        y: f64,
    ) -> Result<bool> {
        let (item, original) = match subject {
            DragSubject::Tab { stack, item } => {
                let reorderable = self
                    .items
                    .get(item)
                    .and_then(|i| i.as_component())
                    .is_some_and(|c| c.reorder_enabled());
                if !self.settings.reorder_enabled || !reorderable || !self.items.contains_key(stack) {
                    tracing::debug!(item = ?item, "drag refused");
                    return Ok(false);
                }
                if self.maximised_stack() == Some(stack) {
                    self.minimise_stack(stack)?;
                }
                self.dragging = true;
                let original = self.detach_raw(item);
                if let Some((parent, _)) = original {
                    self.cleanup(parent);
                }
                (item, original)
            }
            DragSubject::Source(source) => {
                let Some(config) = self
                    .drag_sources
                    .iter()
                    .find(|s| s.id() == source)
                    .map(|s| s.config.clone())
                else {
                    return Ok(false);
                };
                let config = ResolvedItemConfig::Component(config);
                self.check_component_types(&config)?;
                self.dragging = true;
                (self.create_item(&config, ItemType::Stack)?, None)
            }
        };

        self.update_layout();
        let areas = self.drop_areas();
        let bounds = self
            .settings
            .constrain_drag_to_container
            .then(|| self.container_rect());
        let size = (self.dimensions.drag_proxy_width, self.dimensions.drag_proxy_height);
        let header_height = self.dimensions.header_height;
        if let Some(node) = self.items.get_mut(item) {
            node.element.attached = false;
            node.element.visible = true;
        }
        if let Some(container) = self.container_mut(item) {
            container.set_size(size.0, (size.1 - header_height).max(0.0));
            container.set_visible(true);
        }

        let mut proxy = DragProxy::new(item, original, areas, size, bounds);
        proxy.update(x, y);
        self.gesture = Gesture::Dragging { listener, proxy };
        tracing::debug!(item = ?item, x, y, "drag started");
        self.emit_manager_event(DRAG_START, EventPayload::Item(item));
        Ok(true)
    }

    /// Every drop area of the current tree. Computed once per drag.
    fn drop_areas(&self) -> Vec<Area> {
        let root = self.root().and_then(|r| self.items.get(r));
        let mut areas = ground_areas(
            self.ground,
            self.container_rect(),
            root.is_none(),
            root.is_some_and(|r| r.is_stack()),
        );
        for id in self.get_all_content_items() {
            let Some(item) = self.items.get(id) else {
                continue;
            };
            let Some(state) = item.as_stack() else {
                continue;
            };
            if !item.element.visible {
                continue;
            }
            let header = state.header.side().map(|side| {
                let slots = state
                    .header
                    .tabs()
                    .iter()
                    .filter(|t| !t.detached)
                    .filter_map(|t| {
                        Some(HeaderSlot {
                            rect: t.rect?,
                            logical_index: item.index_of(t.item)?,
                        })
                    })
                    .collect();
                (state.header.rect(), side, slots)
            });
            areas.extend(stack_areas(id, header, state.content_rect, item.children.len()));
        }
        areas
    }

    /// End the drag carried by `proxy`: drop on the chosen area, return
    /// the item home, or destroy it.
    pub(super) fn finish_drag(&mut self, proxy: DragProxy) -> Result<()> {
        let item = proxy.item();
        let target = proxy
            .drop_target()
            .copied()
            .filter(|hit| self.items.contains_key(hit.target));

        let result = match target {
            Some(hit) => self.drop_on(item, hit).map(|_| true),
            None => self.return_home(&proxy),
        };

        self.dragging = false;
        self.flush_deferred();
        let placed = match result {
            Ok(placed) => placed,
            Err(e) => {
                self.discard_dragged(item);
                self.update_layout();
                return Err(e);
            }
        };
        if placed {
            if let Some(node) = self.items.get_mut(item) {
                node.element.attached = true;
            }
        }
        self.update_layout();
        tracing::debug!(item = ?item, zone = ?target.map(|h| h.zone), placed, "drag finished");
        if placed {
            self.emit_manager_event(ITEM_DROPPED, EventPayload::Item(item));
        }
        self.emit_manager_event(DRAG_STOP, EventPayload::Item(item));
        let origin = if placed { item } else { self.ground };
        self.emit_state_changed(origin);
        Ok(())
    }

    /// No area was ever hit: back to the original parent if it survived,
    /// otherwise the item is destroyed. Returns whether it was placed.
    fn return_home(&mut self, proxy: &DragProxy) -> Result<bool> {
        let item = proxy.item();
        match proxy.original_parent().filter(|p| self.items.contains_key(*p)) {
            Some(parent) => {
                let len = self.node(parent)?.children.len();
                self.add_child(parent, item, Some(proxy.original_index().min(len)))?;
                Ok(true)
            }
            None => {
                self.discard_dragged(item);
                Ok(false)
            }
        }
    }

    /// Destroy the detached subtree holding `item`, including a wrapper
    /// stack made for a failed drop. No-op if it is part of the tree.
    fn discard_dragged(&mut self, item: ItemId) {
        let mut top = item;
        while let Some(parent) = self.items.get(top).and_then(|i| i.parent) {
            top = parent;
        }
        if top != self.ground && self.items.contains_key(top) {
            self.destroy_subtree(top);
            self.items.remove(top);
        }
    }

    fn drop_on(&mut self, item: ItemId, hit: AreaHit) -> Result<()> {
        match hit.zone {
            DropZone::StackHeader => {
                self.add_child(hit.target, item, hit.index)?;
            }
            DropZone::StackCenter => {
                self.add_child(hit.target, item, None)?;
            }
            DropZone::StackSide(side) => {
                let wrapped = self.wrap_in_stack(item);
                self.place_beside(hit.target, wrapped, side)?;
            }
            DropZone::GroundWhole => {
                let wrapped = self.wrap_in_stack(item);
                self.add_child(self.ground, wrapped, None)?;
            }
            DropZone::GroundSide(side) => {
                let wrapped = self.wrap_in_stack(item);
                self.place_at_root_edge(wrapped, side)?;
            }
        }
        Ok(())
    }

    /// Halve the percentage size of `id` and return the half.
    fn halve(&mut self, id: ItemId) -> Size {
        let Some(item) = self.items.get_mut(id) else {
            return Size::percent(50.0);
        };
        if item.size.unit == SizeUnit::Percent {
            item.size.magnitude /= 2.0;
            item.size
        } else {
            Size::percent(50.0)
        }
    }

    fn set_item_size(&mut self, id: ItemId, size: Size) {
        if let Some(item) = self.items.get_mut(id) {
            item.size = size;
        }
    }

    /// Put the unattached stack `new` on `side` of `target`.
    fn place_beside(&mut self, target: ItemId, new: ItemId, side: Side) -> Result<()> {
        let (is_column, after) = split_axis(side);
        let parent = self
            .node(target)?
            .parent
            .ok_or_else(|| ApiError::InvalidTarget("drop target is detached".into()))?;
        let parent_item = self.node(parent)?;
        let same_axis = parent_item
            .as_row_or_column()
            .is_some_and(|s| s.is_column() == is_column);
        if same_axis {
            let index = parent_item.index_of(target).unwrap_or_default() + usize::from(after);
            let half = self.halve(target);
            self.set_item_size(new, half);
            self.attach_raw(parent, new, Some(index));
            self.init_item(new)
        } else {
            self.split(target, new, is_column, after)
        }
    }

    /// Replace `target` with a new row or column holding it and `new`.
    pub(super) fn split(&mut self, target: ItemId, new: ItemId, is_column: bool, after: bool) -> Result<()> {
        let parent = self
            .node(target)?
            .parent
            .ok_or_else(|| ApiError::InvalidTarget("drop target is detached".into()))?;
        let size = self.node(target)?.size;
        let container = self.new_row_or_column(is_column, size);
        self.replace_raw(parent, target, container);
        self.set_item_size(target, Size::percent(50.0));
        self.set_item_size(new, Size::percent(50.0));
        let (first, second) = if after { (target, new) } else { (new, target) };
        self.attach_raw(container, first, None);
        self.attach_raw(container, second, None);
        self.init_item(container)
    }

    /// Drop along an edge of the whole layout.
    fn place_at_root_edge(&mut self, new: ItemId, side: Side) -> Result<()> {
        let Some(root) = self.root() else {
            self.add_child(self.ground, new, None)?;
            return Ok(());
        };
        let (is_column, after) = split_axis(side);
        let root_item = self.node(root)?;
        let same_axis = root_item
            .as_row_or_column()
            .is_some_and(|s| s.is_column() == is_column);
        if same_axis {
            let len = root_item.children.len();
            let (index, neighbour) = if after {
                (len, root_item.children.last().copied())
            } else {
                (0, root_item.children.first().copied())
            };
            let half = neighbour.map_or(Size::percent(50.0), |n| self.halve(n));
            self.set_item_size(new, half);
            self.attach_raw(root, new, Some(index));
            return self.init_item(new);
        }

        // A popout may have a bare component as root.
        let target = if root_item.is_component() {
            self.detach_raw(root);
            let wrapped = self.wrap_in_stack(root);
            self.attach_raw(self.ground, wrapped, None);
            self.init_item(wrapped)?;
            wrapped
        } else {
            root
        };
        self.split(target, new, is_column, after)
    }
}
