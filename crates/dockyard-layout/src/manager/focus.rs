//! Focus handling. At most one component is focused per manager.

use dockyard_common::ApiError;

use crate::events::{EventPayload, BLUR, FOCUS};
use crate::item::ItemId;
use crate::Result;

use super::LayoutManager;

impl LayoutManager {
    /// Focus the component `id`, blurring the previous one.
    pub fn focus_component(&mut self, id: ItemId) -> Result<()> {
        if !self.node(id)?.is_component() {
            return Err(ApiError::InvalidTarget("only components can be focused".into()).into());
        }
        if self.focused == Some(id) {
            return Ok(());
        }
        self.blur_component();

        let parent = self.node(id)?.parent;
        if let Some(container) = self.container_mut(id) {
            container.set_focused(true);
        }
        if let Some(state) = parent
            .and_then(|p| self.items.get_mut(p))
            .and_then(|p| p.as_stack_mut())
        {
            state.header.set_focused(Some(id));
        }
        self.focused = Some(id);
        tracing::debug!(item = ?id, "component focused");
        self.emit_item_event(id, FOCUS, EventPayload::Item(id));
        Ok(())
    }

    /// Blur the focused component, if any. Returns whether one was focused.
    pub fn blur_component(&mut self) -> bool {
        let Some(id) = self.focused.take() else {
            return false;
        };
        let parent = self.items.get(id).and_then(|i| i.parent);
        if let Some(container) = self.container_mut(id) {
            container.set_focused(false);
        }
        if let Some(state) = parent
            .and_then(|p| self.items.get_mut(p))
            .and_then(|p| p.as_stack_mut())
        {
            state.header.set_focused(None);
        }
        if self.items.contains_key(id) {
            self.emit_item_event(id, BLUR, EventPayload::Item(id));
        }
        true
    }

    /// Blur `id` only if it is the focused component.
    pub(super) fn blur_if_focused(&mut self, id: ItemId) -> bool {
        self.focused == Some(id) && self.blur_component()
    }
}
