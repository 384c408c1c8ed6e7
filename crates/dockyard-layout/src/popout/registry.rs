//! Links between a manager and the managers running in its popout windows.
//!
//! Windows never share a tree. The opener records the handle it expects a
//! child on; the child registers itself once booted. After that the
//! opener can read the child's state and the child can post requests
//! (such as "dock me") that the opener drains on its next tick.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use dockyard_common::{EventHub, WindowHandle};
use dockyard_config::ResolvedPopoutLayoutConfig;

use crate::manager::LayoutManager;

#[derive(Debug, Clone, PartialEq)]
pub enum WindowRequest {
    /// Dock the window's content back into the opener.
    PopIn(ResolvedPopoutLayoutConfig),
}

#[derive(Default)]
struct WindowEntry {
    manager: Option<Weak<RefCell<LayoutManager>>>,
    parent_hub: Weak<EventHub>,
    child_hub: Weak<EventHub>,
    requests: Vec<WindowRequest>,
}

#[derive(Default)]
pub struct WindowRegistry {
    entries: RefCell<HashMap<WindowHandle, WindowEntry>>,
}

impl WindowRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Called by the opener right after the window was created.
    pub(crate) fn expect(&self, handle: WindowHandle, parent_hub: &Rc<EventHub>) {
        self.entries.borrow_mut().insert(
            handle,
            WindowEntry {
                parent_hub: Rc::downgrade(parent_hub),
                ..Default::default()
            },
        );
    }

    /// Called by a booted child. Links its event hub below the opener's.
    /// Returns false if nobody opened `handle`.
    pub(crate) fn register(
        &self,
        handle: WindowHandle,
        manager: Weak<RefCell<LayoutManager>>,
        hub: &Rc<EventHub>,
    ) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(entry) = entries.get_mut(&handle) else {
            return false;
        };
        entry.manager = Some(manager);
        entry.child_hub = Rc::downgrade(hub);
        if let Some(parent) = entry.parent_hub.upgrade() {
            parent.attach_child(hub);
        }
        true
    }

    pub fn contains(&self, handle: WindowHandle) -> bool {
        self.entries.borrow().contains_key(&handle)
    }

    pub fn manager(&self, handle: WindowHandle) -> Option<Rc<RefCell<LayoutManager>>> {
        self.entries
            .borrow()
            .get(&handle)
            .and_then(|entry| entry.manager.as_ref())
            .and_then(Weak::upgrade)
    }

    /// Whether the child in `handle` has registered and finished `init`.
    /// A child that is mutably borrowed right now reports false and is
    /// polled again later.
    pub fn is_initialised(&self, handle: WindowHandle) -> bool {
        self.manager(handle)
            .and_then(|manager| manager.try_borrow().ok().map(|m| m.is_initialised()))
            .unwrap_or(false)
    }

    pub(crate) fn push_request(&self, handle: WindowHandle, request: WindowRequest) -> bool {
        match self.entries.borrow_mut().get_mut(&handle) {
            Some(entry) => {
                entry.requests.push(request);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_requests(&self, handle: WindowHandle) -> Vec<WindowRequest> {
        self.entries
            .borrow_mut()
            .get_mut(&handle)
            .map(|entry| std::mem::take(&mut entry.requests))
            .unwrap_or_default()
    }

    /// Forget `handle` and unlink its hub. Returns the child manager, if it
    /// is still alive, so the caller can tear it down.
    pub(crate) fn unregister(&self, handle: WindowHandle) -> Option<Rc<RefCell<LayoutManager>>> {
        let entry = self.entries.borrow_mut().remove(&handle)?;
        if let (Some(parent), Some(child)) = (entry.parent_hub.upgrade(), entry.child_hub.upgrade()) {
            parent.detach_child(&child);
        }
        entry.manager.as_ref().and_then(Weak::upgrade)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl std::fmt::Debug for WindowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut handles: Vec<WindowHandle> = self.entries.borrow().keys().copied().collect();
        handles.sort();
        f.debug_struct("WindowRegistry").field("windows", &handles).finish()
    }
}
