//! Event delivery: bubbling events climb from the origin item to the
//! ground and then reach the manager's own listeners.

use crate::events::{is_bubbling, EventPayload, LayoutEvent};
use crate::item::ItemId;

use super::LayoutManager;

impl LayoutManager {
    /// Emit `name` with `origin` as the source. Bubbling events walk the
    /// parent chain until a handler stops propagation; the rest only reach
    /// the origin's listeners.
    pub(super) fn emit_item_event(&mut self, origin: ItemId, name: &str, payload: EventPayload) {
        let event = LayoutEvent::new(name, Some(origin), payload);
        if !is_bubbling(name) {
            if let Some(item) = self.items.get_mut(origin) {
                item.events.emit(&event);
            }
            return;
        }
        let mut cursor = Some(origin);
        while let Some(id) = cursor {
            let Some(item) = self.items.get_mut(id) else {
                break;
            };
            item.events.emit(&event);
            if event.is_propagation_stopped() {
                return;
            }
            cursor = item.parent;
        }
        self.events.emit(&event);
    }

    /// Emit on the manager only.
    pub(super) fn emit_manager_event(&mut self, name: &str, payload: EventPayload) {
        self.events.emit(&LayoutEvent::new(name, None, payload));
    }

    pub(super) fn emit_state_changed(&mut self, origin: ItemId) {
        self.emit_item_event(origin, crate::events::STATE_CHANGED, EventPayload::None);
    }
}
