//! Top-down layout pass.
//!
//! Rows and columns split their rectangle among children (minus splitter
//! space) and record splitters. Stacks carve out the header on its side
//! and show only the active child. Components receive their size and
//! visibility; virtual ones are reported to the binder as well.

use std::collections::HashSet;

use dockyard_common::{Rect, Side};
use dockyard_config::{HeaderConfig, ItemType, Size, SizeUnit};

use crate::header::{HeaderButtonKind, HeaderLayout};
use crate::item::{ItemId, ItemKind};
use crate::sizing::{compute_extents, ChildSize, Splitter};

use super::LayoutManager;

/// Header and content rectangles of a stack whose header sits on `side`.
pub(super) fn split_header(rect: Rect, side: Side, thickness: f64) -> (Rect, Rect) {
    let t = thickness.min(rect.extent(!side.is_vertical_edge())).max(0.0);
    match side {
        Side::Top => (
            Rect::new(rect.x, rect.y, rect.width, t),
            Rect::new(rect.x, rect.y + t, rect.width, rect.height - t),
        ),
        Side::Bottom => (
            Rect::new(rect.x, rect.bottom() - t, rect.width, t),
            Rect::new(rect.x, rect.y, rect.width, rect.height - t),
        ),
        Side::Left => (
            Rect::new(rect.x, rect.y, t, rect.height),
            Rect::new(rect.x + t, rect.y, rect.width - t, rect.height),
        ),
        Side::Right => (
            Rect::new(rect.right() - t, rect.y, t, rect.height),
            Rect::new(rect.x, rect.y, rect.width - t, rect.height),
        ),
    }
}

impl LayoutManager {
    /// Recompute every rectangle. No-op before `init`.
    pub(super) fn update_layout(&mut self) {
        if !self.initialised {
            return;
        }
        let rect = self.container_rect();
        self.layout_item(self.ground, rect, true);
        if let Some(maximised) = self.maximised {
            self.apply_maximised(maximised.stack, rect);
        }
    }

    fn layout_item(&mut self, id: ItemId, rect: Rect, visible: bool) {
        let Some(item) = self.items.get_mut(id) else {
            return;
        };
        let moved = item.element.rect != rect;
        item.element.rect = rect;
        item.element.visible = visible;
        let item_type = item.item_type();
        let children = item.children.clone();

        match item_type {
            ItemType::Ground => {
                for child in children {
                    self.layout_item(child, rect, visible);
                }
            }
            ItemType::Row => self.layout_row_or_column(id, false, &children, rect, visible),
            ItemType::Column => self.layout_row_or_column(id, true, &children, rect, visible),
            ItemType::Stack => self.layout_stack(id, &children, rect, visible),
            ItemType::Component => self.layout_component(id, rect, visible, moved),
        }
    }

    fn layout_row_or_column(
        &mut self,
        id: ItemId,
        is_column: bool,
        children: &[ItemId],
        rect: Rect,
        visible: bool,
    ) {
        let border = self.dimensions.border_width;
        let grab = self.dimensions.border_grab_width;
        let mut splitters = Vec::new();

        if !children.is_empty() {
            let gaps = border * (children.len() - 1) as f64;
            let available = (rect.extent(is_column) - gaps).max(0.0);
            let sizes: Vec<ChildSize> = children
                .iter()
                .map(|c| ChildSize {
                    size: self.items.get(*c).map(|i| i.size).unwrap_or_default(),
                    min_px: self.min_extent(*c, is_column),
                })
                .collect();
            let (percents, pixels) = compute_extents(&sizes, available);

            let mut offset = 0.0;
            for (i, child) in children.iter().enumerate() {
                if let Some(item) = self.items.get_mut(*child) {
                    item.size = Size::percent(percents[i]);
                }
                let length = pixels[i];
                let child_rect = if is_column {
                    Rect::new(rect.x, rect.y + offset, rect.width, length)
                } else {
                    Rect::new(rect.x + offset, rect.y, length, rect.height)
                };
                self.layout_item(*child, child_rect, visible);
                offset += length;

                if i + 1 < children.len() {
                    let bar = if is_column {
                        Rect::new(rect.x, rect.y + offset, rect.width, border)
                    } else {
                        Rect::new(rect.x + offset, rect.y, border, rect.height)
                    };
                    splitters.push(Splitter::new(i, is_column, bar, grab));
                    offset += border;
                }
            }
        }

        if let Some(state) = self.items.get_mut(id).and_then(|i| match &mut i.kind {
            ItemKind::RowOrColumn(state) => Some(state),
            _ => None,
        }) {
            state.splitters = splitters;
        }
    }

    /// Pixel floor of `id` along the parent's axis.
    pub(super) fn min_extent(&self, id: ItemId, vertical: bool) -> f64 {
        let declared = self
            .items
            .get(id)
            .and_then(|i| i.min_size)
            .filter(|s| s.unit == SizeUnit::Pixel);
        let fallback = if vertical {
            self.dimensions.default_min_item_height
        } else {
            self.dimensions.default_min_item_width
        };
        match declared {
            Some(size) => size.magnitude,
            None if fallback.unit == SizeUnit::Pixel => fallback.magnitude,
            None => 0.0,
        }
    }

    /// Header settings for `stack`: layout-wide, then the stack's override,
    /// then the active component's.
    pub(super) fn effective_header(&self, stack: ItemId) -> HeaderConfig {
        let Some(state) = self.items.get(stack).and_then(|s| s.as_stack()) else {
            return self.header.clone();
        };
        let mut config = match &state.header_override {
            Some(o) => o.apply_to(&self.header),
            None => self.header.clone(),
        };
        let component_override = state
            .active
            .and_then(|a| self.items.get(a))
            .and_then(|c| c.as_component())
            .and_then(|c| c.header_override.as_ref());
        if let Some(o) = component_override {
            config = o.apply_to(&config);
        }
        config
    }

    fn header_buttons(&self, config: &HeaderConfig, maximised: bool, closable: bool) -> Vec<(HeaderButtonKind, String)> {
        let mut buttons = Vec::new();
        if self.is_sub_window() {
            if !config.dock.is_empty() {
                buttons.push((HeaderButtonKind::Dock, config.dock.clone()));
            }
        } else if let Some(label) = config.popout.label() {
            buttons.push((HeaderButtonKind::Popout, label.to_string()));
        }
        if let Some(label) = config.maximise.label() {
            let label = if maximised { config.minimise.as_str() } else { label };
            buttons.push((HeaderButtonKind::Maximise, label.to_string()));
        }
        if closable {
            if let Some(label) = config.close.label() {
                buttons.push((HeaderButtonKind::Close, label.to_string()));
            }
        }
        buttons
    }

    fn layout_stack(&mut self, id: ItemId, children: &[ItemId], rect: Rect, visible: bool) {
        let Some(item) = self.items.get(id) else {
            return;
        };
        let Some(state) = item.as_stack() else {
            return;
        };
        let active = state.active;
        let closable = item.is_closable;
        let metrics = self.options.tab_metrics;
        let widths: Vec<f64> = state
            .header
            .visual_items()
            .iter()
            .map(|tab| {
                let title = self
                    .items
                    .get(*tab)
                    .and_then(|c| c.as_component())
                    .map_or("", |c| c.title());
                metrics.natural_width(title)
            })
            .collect();

        let config = self.effective_header(id);
        let maximised = self.maximised.is_some_and(|m| m.stack == id);
        let header = config
            .show
            .side()
            .map(|side| (side, split_header(rect, side, self.dimensions.header_height)));
        let content = header.map_or(rect, |(_, (_, content))| content);
        let buttons = self.header_buttons(&config, maximised, closable);
        let dropdown_label = config.tab_dropdown.label().unwrap_or_default().to_string();
        let control_offset = self.settings.tab_control_offset;
        let overlap_allowance = self.settings.tab_overlap_allowance;

        if let Some(state) = self.items.get_mut(id).and_then(|i| i.as_stack_mut()) {
            state.content_rect = content;
            match header {
                Some((side, (header_rect, _))) => state.header.layout(
                    HeaderLayout {
                        rect: header_rect,
                        side,
                        widths: &widths,
                        buttons,
                        dropdown_label,
                        control_offset,
                        overlap_allowance,
                    },
                    &metrics,
                ),
                None => state.header.clear_layout(),
            }
        }

        for child in children {
            let shown = visible && Some(*child) == active;
            self.layout_item(*child, content, shown);
        }
    }

    fn layout_component(&mut self, id: ItemId, rect: Rect, visible: bool, moved: bool) {
        let Self { items, binder, .. } = self;
        let Some(component) = items.get_mut(id).and_then(|i| i.as_component_mut()) else {
            return;
        };
        let resized = component.container.set_size(rect.width, rect.height);
        let toggled = component.container.set_visible(visible);
        if !(component.bound_externally && component.container.is_virtual()) {
            return;
        }
        if let Some(binder) = binder.as_mut() {
            if resized || moved {
                binder.rect_required(&component.container, rect);
            }
            if toggled {
                binder.visibility_required(&component.container, visible);
            }
        }
    }

    /// Hide everything outside the maximised stack and give it the whole
    /// container.
    fn apply_maximised(&mut self, stack: ItemId, rect: Rect) {
        let keep: HashSet<ItemId> = self.subtree(stack).into_iter().collect();
        let hidden: Vec<ItemId> = self
            .items
            .keys()
            .filter(|id| *id != self.ground && !keep.contains(id))
            .collect();
        for id in hidden {
            let Some(item) = self.items.get(id) else {
                continue;
            };
            let item_rect = item.element.rect;
            if item.is_component() {
                self.layout_component(id, item_rect, false, false);
            }
            if let Some(item) = self.items.get_mut(id) {
                item.element.visible = false;
            }
        }
        self.layout_item(stack, rect, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_split_per_side() {
        let rect = Rect::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(
            split_header(rect, Side::Top, 20.0),
            (Rect::new(10.0, 20.0, 200.0, 20.0), Rect::new(10.0, 40.0, 200.0, 80.0))
        );
        assert_eq!(
            split_header(rect, Side::Bottom, 20.0),
            (Rect::new(10.0, 100.0, 200.0, 20.0), Rect::new(10.0, 20.0, 200.0, 80.0))
        );
        assert_eq!(
            split_header(rect, Side::Left, 20.0),
            (Rect::new(10.0, 20.0, 20.0, 100.0), Rect::new(30.0, 20.0, 180.0, 100.0))
        );
        assert_eq!(
            split_header(rect, Side::Right, 20.0),
            (Rect::new(190.0, 20.0, 20.0, 100.0), Rect::new(10.0, 20.0, 180.0, 100.0))
        );
    }

    #[test]
    fn header_never_exceeds_item() {
        let (header, content) = split_header(Rect::new(0.0, 0.0, 50.0, 8.0), Side::Top, 20.0);
        assert_eq!(header.height, 8.0);
        assert_eq!(content.height, 0.0);
    }
}
