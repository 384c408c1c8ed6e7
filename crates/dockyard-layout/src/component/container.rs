//! The object handed to user component code.
//!
//! A container wraps one component item's content slot. Component code
//! reads and writes its state and title, subscribes to resize/visibility
//! notifications, and asks for close or focus. Requests that affect the
//! tree are queued and carried out by the manager on its next pass.

use dockyard_config::ResolvedComponentItemConfig;
use serde_json::Value;

use crate::events::{
    EventEmitter, EventPayload, LayoutEvent, SubscriptionId, BEFORE_COMPONENT_RELEASE, BLUR,
    FOCUS, HIDE, RESIZE, SHOW, TITLE_CHANGED,
};

use super::{BindableComponent, Component};

/// Something component code asked the manager to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerRequest {
    Close,
    Focus,
    Blur,
    StateChanged,
    /// Swap the bound component for a new config in place.
    Replace(Box<ResolvedComponentItemConfig>),
}

pub struct ComponentContainer {
    component_type: String,
    state: Option<Value>,
    title: String,
    width: f64,
    height: f64,
    visible: bool,
    focused: bool,
    is_virtual: bool,
    component: Option<Box<dyn Component>>,
    events: EventEmitter,
    requests: Vec<ContainerRequest>,
}

impl ComponentContainer {
    pub fn new(config: &ResolvedComponentItemConfig) -> Self {
        Self {
            component_type: config.component_type.clone(),
            state: config.component_state.clone(),
            title: config.title.clone(),
            width: 0.0,
            height: 0.0,
            visible: false,
            focused: false,
            is_virtual: false,
            component: None,
            events: EventEmitter::new(),
            requests: Vec::new(),
        }
    }

    // -- Component-facing API --

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn state(&self) -> Option<&Value> {
        self.state.as_ref()
    }

    pub fn set_state(&mut self, state: Value) {
        self.state = Some(state);
        self.requests.push(ContainerRequest::StateChanged);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title == self.title {
            return;
        }
        self.title = title;
        let event = LayoutEvent::new(TITLE_CHANGED, None, EventPayload::Title(self.title.clone()));
        self.events.emit(&event);
        self.requests.push(ContainerRequest::StateChanged);
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn close(&mut self) {
        self.requests.push(ContainerRequest::Close);
    }

    pub fn focus(&mut self) {
        self.requests.push(ContainerRequest::Focus);
    }

    pub fn blur(&mut self) {
        self.requests.push(ContainerRequest::Blur);
    }

    pub fn replace_component(&mut self, config: ResolvedComponentItemConfig) {
        self.requests.push(ContainerRequest::Replace(Box::new(config)));
    }

    pub fn on(&mut self, name: impl Into<String>, handler: impl FnMut(&LayoutEvent) + 'static) -> SubscriptionId {
        self.events.on(name, handler)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn component(&self) -> Option<&dyn Component> {
        self.component.as_deref()
    }

    pub fn has_component(&self) -> bool {
        self.component.is_some()
    }

    pub fn pending_requests(&self) -> &[ContainerRequest] {
        &self.requests
    }

    // -- Manager-facing API --

    pub(crate) fn attach(&mut self, bound: BindableComponent) {
        self.is_virtual = bound.is_virtual;
        self.component = Some(bound.component);
    }

    /// Apply a new content size. Returns true if it changed.
    pub(crate) fn set_size(&mut self, width: f64, height: f64) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        if let Some(component) = self.component.as_mut() {
            component.resize(width, height);
        }
        self.events
            .emit(&LayoutEvent::new(RESIZE, None, EventPayload::Size { width, height }));
        true
    }

    /// Show or hide. Returns true if it changed.
    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        if let Some(component) = self.component.as_mut() {
            component.set_visible(visible);
        }
        let name = if visible { SHOW } else { HIDE };
        self.events.emit(&LayoutEvent::new(name, None, EventPayload::None));
        true
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        if self.focused == focused {
            return;
        }
        self.focused = focused;
        if let Some(component) = self.component.as_mut() {
            if focused {
                component.focus();
            } else {
                component.blur();
            }
        }
        let name = if focused { FOCUS } else { BLUR };
        self.events.emit(&LayoutEvent::new(name, None, EventPayload::None));
    }

    /// Let go of the component instance, notifying it first.
    pub(crate) fn release(&mut self) -> bool {
        let Some(mut component) = self.component.take() else {
            return false;
        };
        self.events
            .emit(&LayoutEvent::new(BEFORE_COMPONENT_RELEASE, None, EventPayload::None));
        component.release();
        true
    }

    /// State to persist: the component's own view if it has one.
    pub(crate) fn saved_state(&self) -> Option<Value> {
        self.component
            .as_ref()
            .and_then(|c| c.save_state())
            .or_else(|| self.state.clone())
    }

    /// Point the container at a new config after its component was
    /// released.
    pub(crate) fn reset_for(&mut self, config: &ResolvedComponentItemConfig) {
        self.component_type = config.component_type.clone();
        self.state = config.component_state.clone();
        self.is_virtual = false;
        // The next layout pass sizes and shows the new component.
        self.width = 0.0;
        self.height = 0.0;
        self.visible = false;
        self.set_title(config.title.clone());
    }

    pub(crate) fn take_requests(&mut self) -> Vec<ContainerRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl std::fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("component_type", &self.component_type)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("visible", &self.visible)
            .field("focused", &self.focused)
            .field("is_virtual", &self.is_virtual)
            .field("bound", &self.component.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::RecordingComponent;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn container() -> ComponentContainer {
        ComponentContainer::new(&ResolvedComponentItemConfig::new("editor").with_title("Editor"))
    }

    #[test]
    fn resize_reaches_component_and_subscribers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut container = container();
        container.attach(BindableComponent {
            component: Box::new(RecordingComponent::new("editor", None, log.clone())),
            is_virtual: false,
        });
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let s = sizes.clone();
        container.on(RESIZE, move |e| s.borrow_mut().push(e.payload.clone()));

        assert!(container.set_size(100.0, 50.0));
        assert!(!container.set_size(100.0, 50.0));
        assert_eq!(
            *sizes.borrow(),
            vec![EventPayload::Size {
                width: 100.0,
                height: 50.0
            }]
        );
        assert_eq!(*log.borrow(), vec!["resize editor 100x50"]);
    }

    #[test]
    fn visibility_changes_emit_show_and_hide() {
        let names = Rc::new(RefCell::new(Vec::new()));
        let mut container = container();
        let n = names.clone();
        container.on(crate::events::ALL_EVENTS, move |e| n.borrow_mut().push(e.name.clone()));
        container.set_visible(true);
        container.set_visible(true);
        container.set_visible(false);
        assert_eq!(*names.borrow(), vec![SHOW, HIDE]);
    }

    #[test]
    fn title_and_state_queue_state_changed() {
        let mut container = container();
        container.set_title("Editor");
        assert!(container.pending_requests().is_empty());
        container.set_title("Renamed");
        container.set_state(json!({ "line": 4 }));
        container.close();
        assert_eq!(
            container.take_requests(),
            vec![
                ContainerRequest::StateChanged,
                ContainerRequest::StateChanged,
                ContainerRequest::Close
            ]
        );
        assert_eq!(container.title(), "Renamed");
        assert_eq!(container.state(), Some(&json!({ "line": 4 })));
    }

    #[test]
    fn saved_state_prefers_component() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut container = container();
        container.set_state(json!("container"));
        assert_eq!(container.saved_state(), Some(json!("container")));
        container.attach(BindableComponent {
            component: Box::new(RecordingComponent::new("editor", Some(json!("live")), log)),
            is_virtual: false,
        });
        assert_eq!(container.saved_state(), Some(json!("live")));
    }

    #[test]
    fn release_notifies_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut container = container();
        container.attach(BindableComponent {
            component: Box::new(RecordingComponent::new("editor", None, log.clone())),
            is_virtual: false,
        });
        assert!(container.release());
        assert!(!container.release());
        assert!(!container.has_component());
        assert_eq!(*log.borrow(), vec!["release editor"]);
    }
}
