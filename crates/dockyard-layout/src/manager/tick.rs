//! Time-driven work and the container's outer surface: resizing, the
//! periodic tick, external drag sources and user broadcasts.

use std::time::Instant;

use dockyard_common::Rect;
use dockyard_config::{ResolvedComponentItemConfig, ResponsiveMode};
use serde_json::Value;

use crate::component::ContainerRequest;
use crate::drag::{DragSource, DragSourceId};
use crate::events::{EventPayload, WINDOW_OPENED};
use crate::item::ItemId;
use crate::Result;

use super::types::PendingResize;
use super::LayoutManager;

impl LayoutManager {
    // -- Sizing --

    /// Record the container's size. Before `init` this only stores it.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        if self.initialised {
            self.update_root_size();
        }
    }

    /// Resize the layout now, dropping any debounced resize.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.pending_resize = None;
        self.set_container_size(width, height);
    }

    /// Lay the whole tree out again at the current container size.
    pub fn update_root_size(&mut self) {
        if !self.initialised {
            return;
        }
        if self.settings.responsive_mode == ResponsiveMode::Always {
            self.apply_responsive_layout();
        }
        self.update_layout();
        tracing::trace!(width = self.width, height = self.height, "root resized");
    }

    /// The container element changed size. Coalesced into one resize
    /// after the debounce; ignored unless automatic resizing is on.
    pub fn notify_container_resized(&mut self, width: f64, height: f64, now: Instant) {
        if !self.options.resize_with_container_automatically {
            return;
        }
        let fresh = now + self.options.resize_debounce;
        let deadline = match self.pending_resize {
            Some(pending) if !self.options.resize_debounce_extended_when_possible => pending.deadline,
            _ => fresh,
        };
        self.pending_resize = Some(PendingResize {
            width,
            height,
            deadline,
        });
    }

    // -- Tick --

    /// Run everything that is due at `now`: the debounced resize, drag hold
    /// timeouts, popout readiness, closed popout windows, dock requests
    /// from popouts and requests made by component containers.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        if let Some(pending) = self.pending_resize.filter(|p| now >= p.deadline) {
            self.pending_resize = None;
            self.set_container_size(pending.width, pending.height);
        }
        self.tick_gesture(now)?;

        let opened: Vec<_> = self
            .popouts
            .iter_mut()
            .filter_map(|p| p.poll(now, &self.windows).then(|| (p.id(), p.handle())))
            .collect();
        for (id, handle) in opened {
            tracing::debug!(popout = id, %handle, "popout window initialised");
            self.emit_manager_event(
                WINDOW_OPENED,
                EventPayload::Popout {
                    id,
                    handle: Some(handle),
                },
            );
        }

        self.reconcile_popouts();
        self.process_window_requests()?;
        self.process_container_requests()
    }

    fn process_container_requests(&mut self) -> Result<()> {
        let pending: Vec<(ItemId, Vec<ContainerRequest>)> = self
            .items
            .iter_mut()
            .filter_map(|(id, item)| {
                let requests = item.as_component_mut()?.container.take_requests();
                (!requests.is_empty()).then_some((id, requests))
            })
            .collect();

        for (id, requests) in pending {
            for request in requests {
                if !self.items.contains_key(id) {
                    break;
                }
                match request {
                    ContainerRequest::Close => {
                        self.close_item(id)?;
                    }
                    ContainerRequest::Focus => self.focus_component(id)?,
                    ContainerRequest::Blur => {
                        self.blur_if_focused(id);
                    }
                    ContainerRequest::StateChanged => self.emit_state_changed(id),
                    ContainerRequest::Replace(config) => self.replace_component(id, *config)?,
                }
            }
        }
        Ok(())
    }

    // -- Drag sources --

    /// Register an element outside the layout that drags in a new
    /// component built from `config`.
    pub fn new_drag_source(&mut self, rect: Rect, config: ResolvedComponentItemConfig) -> DragSourceId {
        let id = DragSourceId(self.next_drag_source);
        self.next_drag_source += 1;
        self.drag_sources.push(DragSource { id, rect, config });
        id
    }

    pub fn remove_drag_source(&mut self, id: DragSourceId) -> bool {
        let before = self.drag_sources.len();
        self.drag_sources.retain(|s| s.id() != id);
        before != self.drag_sources.len()
    }

    // -- Broadcast --

    /// Send `args` to every window of the popout tree. Returns the number
    /// of receivers reached.
    pub fn emit_user_broadcast(&self, args: Vec<Value>) -> usize {
        self.hub.emit_user_broadcast(args)
    }
}
