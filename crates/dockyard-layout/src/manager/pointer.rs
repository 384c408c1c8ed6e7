//! Pointer input: splitters, header clicks, tab drags and focus.
//!
//! The embedder forwards pointer events with the current time. A press
//! is routed to the first thing under it, in this order: external drag
//! sources, splitters, header controls and tabs, then components.

use std::time::Instant;

use dockyard_config::Size;

use crate::commands::HeaderAction;
use crate::drag::{DragListener, DragSignal};
use crate::events::{EventPayload, STACK_HEADER_CLICK};
use crate::header::{HeaderButtonKind, HeaderHit};
use crate::item::ItemId;
use crate::sizing::{rescale_neighbours, SplitterDrag};
use crate::Result;

use super::types::{DragSubject, Gesture};
use super::LayoutManager;

impl LayoutManager {
    pub fn pointer_down(&mut self, x: f64, y: f64, now: Instant) -> Result<()> {
        self.gesture = Gesture::Idle;

        if let Some(source) = self.drag_sources.iter().find(|s| s.contains(x, y)).map(|s| s.id()) {
            self.start_pending(DragSubject::Source(source), x, y, now);
            return Ok(());
        }
        if let Some(drag) = self.splitter_at(x, y) {
            tracing::debug!(owner = ?drag.owner, index = drag.index, "splitter grabbed");
            self.gesture = Gesture::Splitter(drag);
            return Ok(());
        }
        if let Some((stack, hit)) = self.header_hit(x, y) {
            return self.header_pressed(stack, hit, x, y, now);
        }
        self.close_dropdowns(None);

        let component = self.get_all_content_items().into_iter().find(|id| {
            self.items
                .get(*id)
                .is_some_and(|i| i.is_component() && i.element.visible && i.element.rect.contains(x, y))
        });
        if let Some(component) = component {
            self.focus_component(component)?;
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now: Instant) -> Result<()> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Splitter(mut drag) => {
                drag.update(if drag.vertical { y } else { x });
                self.gesture = Gesture::Splitter(drag);
            }
            Gesture::Pending { mut listener, subject } => match listener.pointer_move(x, y, now) {
                Some(DragSignal::Start { x, y }) => {
                    self.begin_drag(subject, listener, x, y)?;
                }
                _ => self.gesture = Gesture::Pending { listener, subject },
            },
            Gesture::Dragging {
                mut listener,
                mut proxy,
            } => {
                listener.pointer_move(x, y, now);
                proxy.update(x, y);
                self.gesture = Gesture::Dragging { listener, proxy };
            }
        }
        Ok(())
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<()> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Ok(()),
            Gesture::Splitter(drag) => {
                self.apply_splitter(&drag);
                Ok(())
            }
            Gesture::Pending { mut listener, .. } => {
                listener.pointer_up(x, y);
                Ok(())
            }
            Gesture::Dragging {
                mut listener,
                mut proxy,
            } => {
                listener.pointer_up(x, y);
                proxy.update(x, y);
                self.finish_drag(proxy)
            }
        }
    }

    fn start_pending(&mut self, subject: DragSubject, x: f64, y: f64, now: Instant) {
        let mut listener = DragListener::new();
        listener.pointer_down(x, y, now);
        self.gesture = Gesture::Pending { listener, subject };
    }

    /// Fire the drag hold timeout of a pending press.
    pub(super) fn tick_gesture(&mut self, now: Instant) -> Result<()> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Pending { mut listener, subject } => match listener.tick(now) {
                Some(DragSignal::Start { x, y }) => {
                    self.begin_drag(subject, listener, x, y)?;
                }
                _ => self.gesture = Gesture::Pending { listener, subject },
            },
            other => self.gesture = other,
        }
        Ok(())
    }

    // -- Splitters --

    fn splitter_at(&self, x: f64, y: f64) -> Option<SplitterDrag> {
        self.get_all_content_items().into_iter().find_map(|owner| {
            let item = self.items.get(owner)?;
            if !item.element.visible {
                return None;
            }
            let splitter = item
                .as_row_or_column()?
                .splitters()
                .iter()
                .find(|s| s.hit_test(x, y))?;
            let before = *item.children.get(splitter.index)?;
            let after = *item.children.get(splitter.index + 1)?;
            let vertical = splitter.vertical;
            let extent = |id: ItemId| self.items.get(id).map_or(0.0, |i| i.element.rect.extent(vertical));
            Some(SplitterDrag::new(
                owner,
                splitter,
                splitter.axis_coordinate(x, y),
                (extent(before), self.min_extent(before, vertical)),
                (extent(after), self.min_extent(after, vertical)),
            ))
        })
    }

    /// Rescale the two neighbours of a released splitter.
    fn apply_splitter(&mut self, drag: &SplitterDrag) {
        if drag.offset() == 0.0 {
            return;
        }
        let Some(owner) = self.items.get(drag.owner) else {
            return;
        };
        let (Some(&before), Some(&after)) = (
            owner.children.get(drag.index),
            owner.children.get(drag.index + 1),
        ) else {
            return;
        };
        let measure = |id: ItemId| {
            self.items
                .get(id)
                .map_or((0.0, 0.0), |i| (i.size.magnitude, i.element.rect.extent(drag.vertical)))
        };
        let (before_percent, before_px) = measure(before);
        let (after_percent, after_px) = measure(after);
        let (b, a) = rescale_neighbours(before_percent, after_percent, before_px, after_px, drag.offset());
        if let Some(item) = self.items.get_mut(before) {
            item.size = Size::percent(b);
        }
        if let Some(item) = self.items.get_mut(after) {
            item.size = Size::percent(a);
        }
        tracing::debug!(owner = ?drag.owner, offset = drag.offset(), "splitter released");
        self.update_layout();
        self.emit_state_changed(drag.owner);
    }

    // -- Headers --

    fn header_hit(&self, x: f64, y: f64) -> Option<(ItemId, HeaderHit)> {
        self.get_all_content_items().into_iter().find_map(|id| {
            let item = self.items.get(id)?;
            if !item.element.visible {
                return None;
            }
            let hit = item.as_stack()?.header.hit_test(x, y)?;
            Some((id, hit))
        })
    }

    fn header_pressed(&mut self, stack: ItemId, hit: HeaderHit, x: f64, y: f64, now: Instant) -> Result<()> {
        let keep_open = matches!(
            hit,
            HeaderHit::DropdownEntry(_) | HeaderHit::Button(HeaderButtonKind::TabDropdown)
        );
        if !keep_open {
            self.close_dropdowns(None);
        }
        match hit {
            HeaderHit::DropdownEntry(item) => {
                self.execute_header_action(HeaderAction::SelectFromDropdown(item))?;
            }
            HeaderHit::Button(kind) => {
                let action = match kind {
                    HeaderButtonKind::TabDropdown => HeaderAction::ToggleDropdown(stack),
                    HeaderButtonKind::Popout => HeaderAction::Popout(stack),
                    HeaderButtonKind::Dock => HeaderAction::Dock(stack),
                    HeaderButtonKind::Maximise => HeaderAction::ToggleMaximise(stack),
                    HeaderButtonKind::Close => HeaderAction::Close(stack),
                };
                self.execute_header_action(action)?;
            }
            HeaderHit::Tab { item, close_zone } => {
                let closable = self.items.get(item).is_some_and(|i| i.is_closable);
                if close_zone && closable {
                    self.execute_header_action(HeaderAction::CloseTab(item))?;
                } else {
                    self.execute_header_action(HeaderAction::SelectTab(item))?;
                    self.start_pending(DragSubject::Tab { stack, item }, x, y, now);
                }
            }
            HeaderHit::Header => {
                self.emit_item_event(stack, STACK_HEADER_CLICK, EventPayload::Item(stack));
            }
        }
        Ok(())
    }

    /// Close every open tab dropdown except the one of `except`.
    pub(super) fn close_dropdowns(&mut self, except: Option<ItemId>) {
        let mut changed = false;
        for (id, item) in self.items.iter_mut() {
            if Some(id) == except {
                continue;
            }
            if let Some(state) = item.as_stack_mut() {
                if state.header.is_dropdown_open() {
                    state.header.close_dropdown();
                    changed = true;
                }
            }
        }
        if changed {
            self.update_layout();
        }
    }
}
