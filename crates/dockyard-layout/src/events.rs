//! Per-object publish/subscribe.
//!
//! Every content item, component container and popout owns an
//! [`EventEmitter`]. Bubbling events are delivered by the manager, which
//! walks from the originating item up through its ancestors and finally to
//! its own emitter, stopping early when a handler calls
//! [`LayoutEvent::stop_propagation`].

use std::cell::Cell;

use dockyard_common::WindowHandle;
use serde_json::Value;

use crate::item::ItemId;

// Manager and item events.
pub const INITIALISED: &str = "initialised";
pub const ITEM_CREATED: &str = "itemCreated";
pub const BEFORE_ITEM_DESTROYED: &str = "beforeItemDestroyed";
pub const ITEM_DESTROYED: &str = "itemDestroyed";
pub const ITEM_DROPPED: &str = "itemDropped";
pub const STATE_CHANGED: &str = "stateChanged";
pub const STACK_HEADER_CLICK: &str = "stackHeaderClick";
pub const ACTIVE_CONTENT_ITEM_CHANGED: &str = "activeContentItemChanged";
pub const FOCUS: &str = "focus";
pub const BLUR: &str = "blur";
pub const MAXIMISED: &str = "maximised";
pub const MINIMISED: &str = "minimised";
pub const DRAG_START: &str = "dragStart";
pub const DRAG_STOP: &str = "dragStop";
pub const WINDOW_OPENED: &str = "windowOpened";
pub const WINDOW_CLOSED: &str = "windowClosed";
pub const POPOUT_BLOCKED: &str = "popoutBlocked";

// Component container events.
pub const RESIZE: &str = "resize";
pub const SHOW: &str = "show";
pub const HIDE: &str = "hide";
pub const TITLE_CHANGED: &str = "titleChanged";
pub const BEFORE_COMPONENT_RELEASE: &str = "beforeComponentRelease";

/// Subscribing to this name receives every event.
pub const ALL_EVENTS: &str = "__all";

/// Events that travel up the item tree.
pub fn is_bubbling(name: &str) -> bool {
    matches!(
        name,
        ITEM_CREATED
            | BEFORE_ITEM_DESTROYED
            | ITEM_DESTROYED
            | STACK_HEADER_CLICK
            | ACTIVE_CONTENT_ITEM_CHANGED
            | FOCUS
            | BLUR
            | STATE_CHANGED
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    None,
    Item(ItemId),
    Size { width: f64, height: f64 },
    Title(String),
    Popout { id: usize, handle: Option<WindowHandle> },
    Args(Vec<Value>),
}

#[derive(Debug)]
pub struct LayoutEvent {
    pub name: String,
    /// Item the event originated from, for item events.
    pub origin: Option<ItemId>,
    pub payload: EventPayload,
    stopped: Cell<bool>,
}

impl LayoutEvent {
    pub fn new(name: impl Into<String>, origin: Option<ItemId>, payload: EventPayload) -> Self {
        Self {
            name: name.into(),
            origin,
            payload,
            stopped: Cell::new(false),
        }
    }

    pub fn bubbles(&self) -> bool {
        is_bubbling(&self.name)
    }

    pub fn stop_propagation(&self) {
        self.stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped.get()
    }
}

pub type EventHandler = Box<dyn FnMut(&LayoutEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventEmitter {
    handlers: Vec<(SubscriptionId, String, EventHandler)>,
    next_id: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &mut self,
        name: impl Into<String>,
        handler: impl FnMut(&LayoutEvent) + 'static,
    ) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.handlers.push((id, name.into(), Box::new(handler)));
        id
    }

    /// Remove one subscription. Returns false if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _, _)| *sid != id);
        self.handlers.len() != before
    }

    pub fn off_all(&mut self, name: &str) {
        self.handlers.retain(|(_, n, _)| n != name);
    }

    pub fn has_listeners(&self, name: &str) -> bool {
        self.handlers
            .iter()
            .any(|(_, n, _)| n == name || n == ALL_EVENTS)
    }

    pub fn listener_count(&self) -> usize {
        self.handlers.len()
    }

    /// Call every handler subscribed to `event.name` (and the wildcard).
    /// Returns how many ran.
    pub fn emit(&mut self, event: &LayoutEvent) -> usize {
        let mut called = 0;
        for (_, name, handler) in self.handlers.iter_mut() {
            if name.as_str() == event.name || name.as_str() == ALL_EVENTS {
                handler(event);
                called += 1;
            }
        }
        called
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_reaches_named_and_wildcard_handlers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::new();
        let s = seen.clone();
        emitter.on(RESIZE, move |e| s.borrow_mut().push(format!("named:{}", e.name)));
        let s = seen.clone();
        emitter.on(ALL_EVENTS, move |e| s.borrow_mut().push(format!("all:{}", e.name)));

        let called = emitter.emit(&LayoutEvent::new(RESIZE, None, EventPayload::None));
        assert_eq!(called, 2);
        emitter.emit(&LayoutEvent::new(SHOW, None, EventPayload::None));
        assert_eq!(
            *seen.borrow(),
            vec!["named:resize", "all:resize", "all:show"]
        );
    }

    #[test]
    fn off_removes_single_subscription() {
        let mut emitter = EventEmitter::new();
        let a = emitter.on(SHOW, |_| {});
        emitter.on(SHOW, |_| {});
        assert!(emitter.off(a));
        assert!(!emitter.off(a));
        assert_eq!(emitter.listener_count(), 1);
        assert_eq!(emitter.emit(&LayoutEvent::new(SHOW, None, EventPayload::None)), 1);
    }

    #[test]
    fn stop_propagation_is_sticky() {
        let event = LayoutEvent::new(ITEM_CREATED, None, EventPayload::None);
        assert!(event.bubbles());
        assert!(!event.is_propagation_stopped());
        event.stop_propagation();
        assert!(event.is_propagation_stopped());
    }

    #[test]
    fn window_events_do_not_bubble() {
        assert!(!is_bubbling(WINDOW_OPENED));
        assert!(!is_bubbling(RESIZE));
        assert!(is_bubbling(ITEM_DESTROYED));
    }
}
