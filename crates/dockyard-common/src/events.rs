//! Cross-window event hub.
//!
//! Every layout window owns one hub. Hubs of a popout tree are linked
//! parent/child; a user broadcast climbs to the root window and is then
//! delivered to the root and every descendant. Nothing else is
//! synchronised between windows.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

pub const USER_BROADCAST_EVENT: &str = "userBroadcast";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub event_name: String,
    pub args: Vec<Value>,
}

pub struct EventHub {
    sender: broadcast::Sender<BroadcastMessage>,
    parent: RefCell<Option<Weak<EventHub>>>,
    children: RefCell<Vec<Weak<EventHub>>>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Rc<Self> {
        let (sender, _) = broadcast::channel(capacity);
        Rc::new(Self {
            sender,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastMessage> {
        self.sender.subscribe()
    }

    /// Link `child` below this hub. A child has at most one parent.
    pub fn attach_child(self: &Rc<Self>, child: &Rc<EventHub>) {
        *child.parent.borrow_mut() = Some(Rc::downgrade(self));
        let mut children = self.children.borrow_mut();
        children.retain(|c| c.strong_count() > 0);
        if !children.iter().any(|c| c.ptr_eq(&Rc::downgrade(child))) {
            children.push(Rc::downgrade(child));
        }
    }

    pub fn detach_child(&self, child: &Rc<EventHub>) {
        let weak = Rc::downgrade(child);
        self.children
            .borrow_mut()
            .retain(|c| c.strong_count() > 0 && !c.ptr_eq(&weak));
        *child.parent.borrow_mut() = None;
    }

    pub fn has_parent(&self) -> bool {
        self.parent_hub().is_some()
    }

    pub fn child_count(&self) -> usize {
        self.children
            .borrow()
            .iter()
            .filter(|c| c.strong_count() > 0)
            .count()
    }

    /// Emit only to subscribers of this window.
    pub fn emit_local(&self, event_name: impl Into<String>, args: Vec<Value>) -> usize {
        self.sender
            .send(BroadcastMessage {
                event_name: event_name.into(),
                args,
            })
            .unwrap_or(0)
    }

    /// Broadcast to every window of the popout tree, this one included.
    /// Returns the number of receivers reached.
    pub fn emit_user_broadcast(&self, args: Vec<Value>) -> usize {
        self.handle_broadcast(BroadcastMessage {
            event_name: USER_BROADCAST_EVENT.to_string(),
            args,
        })
    }

    fn handle_broadcast(&self, message: BroadcastMessage) -> usize {
        match self.parent_hub() {
            Some(parent) => parent.handle_broadcast(message),
            None => {
                let delivered = self.propagate_to_this_and_subtree(&message);
                tracing::trace!(event = %message.event_name, delivered, "broadcast delivered");
                delivered
            }
        }
    }

    fn propagate_to_this_and_subtree(&self, message: &BroadcastMessage) -> usize {
        let mut delivered = self.sender.send(message.clone()).unwrap_or(0);
        let children: Vec<Rc<EventHub>> = {
            let mut children = self.children.borrow_mut();
            children.retain(|c| c.strong_count() > 0);
            children.iter().filter_map(Weak::upgrade).collect()
        };
        for child in children {
            delivered += child.propagate_to_this_and_subtree(message);
        }
        delivered
    }

    fn parent_hub(&self) -> Option<Rc<EventHub>> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn local_emit_reaches_only_this_window() {
        let root = EventHub::new(16);
        let child = EventHub::new(16);
        root.attach_child(&child);
        let mut root_rx = root.subscribe();
        let mut child_rx = child.subscribe();

        assert_eq!(root.emit_local("ping", vec![]), 1);
        assert_eq!(root_rx.try_recv().unwrap().event_name, "ping");
        assert!(child_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_from_child_reaches_whole_tree() {
        let root = EventHub::new(16);
        let child = EventHub::new(16);
        let grandchild = EventHub::new(16);
        root.attach_child(&child);
        child.attach_child(&grandchild);

        let mut root_rx = root.subscribe();
        let mut child_rx = child.subscribe();
        let mut grandchild_rx = grandchild.subscribe();

        let delivered = grandchild.emit_user_broadcast(vec![json!("hello"), json!(42)]);
        assert_eq!(delivered, 3);

        for rx in [&mut root_rx, &mut child_rx, &mut grandchild_rx] {
            let msg = rx.recv().await.unwrap();
            assert_eq!(msg.event_name, USER_BROADCAST_EVENT);
            assert_eq!(msg.args, vec![json!("hello"), json!(42)]);
        }
    }

    #[test]
    fn dropped_child_is_pruned() {
        let root = EventHub::new(16);
        {
            let child = EventHub::new(16);
            root.attach_child(&child);
            assert_eq!(root.child_count(), 1);
            assert!(child.has_parent());
        }
        assert_eq!(root.child_count(), 0);
        assert_eq!(root.emit_user_broadcast(vec![]), 0);
    }

    #[test]
    fn detach_child_stops_delivery() {
        let root = EventHub::new(16);
        let child = EventHub::new(16);
        root.attach_child(&child);
        let mut child_rx = child.subscribe();
        root.detach_child(&child);
        assert!(!child.has_parent());

        root.emit_user_broadcast(vec![json!(1)]);
        assert!(child_rx.try_recv().is_err());
    }

    #[test]
    fn attach_twice_keeps_single_link() {
        let root = EventHub::new(16);
        let child = EventHub::new(16);
        root.attach_child(&child);
        root.attach_child(&child);
        assert_eq!(root.child_count(), 1);
    }
}
