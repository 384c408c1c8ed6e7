//! Components and binders that record every call into a shared log.
//!
//! Useful for embedders writing tests against the layout, and used by this
//! crate's own tests.

use std::cell::RefCell;
use std::rc::Rc;

use dockyard_common::Rect;
use dockyard_config::ResolvedComponentItemConfig;
use serde_json::Value;

use super::{BindableComponent, Component, ComponentBinder, ComponentContainer, ComponentFactory};

pub type CallLog = Rc<RefCell<Vec<String>>>;

#[derive(Debug)]
pub struct RecordingComponent {
    component_type: String,
    state: Option<Value>,
    log: CallLog,
}

impl RecordingComponent {
    pub fn new(component_type: impl Into<String>, state: Option<Value>, log: CallLog) -> Self {
        Self {
            component_type: component_type.into(),
            state,
            log,
        }
    }

    fn record(&self, what: impl AsRef<str>) {
        self.log
            .borrow_mut()
            .push(format!("{} {}", what.as_ref(), self.component_type));
    }
}

impl Component for RecordingComponent {
    fn resize(&mut self, width: f64, height: f64) {
        self.log
            .borrow_mut()
            .push(format!("resize {} {width}x{height}", self.component_type));
    }

    fn set_visible(&mut self, visible: bool) {
        self.record(if visible { "show" } else { "hide" });
    }

    fn focus(&mut self) {
        self.record("focus");
    }

    fn blur(&mut self) {
        self.record("blur");
    }

    fn save_state(&self) -> Option<Value> {
        self.state.clone()
    }

    fn release(&mut self) {
        self.record("release");
    }
}

/// Factory producing [`RecordingComponent`]s that share `log`.
pub fn recording_factory(log: CallLog) -> ComponentFactory {
    Box::new(move |container: &mut ComponentContainer, state: Option<&Value>, is_virtual: bool| {
        let component_type = container.component_type().to_owned();
        let entry = if is_virtual {
            format!("create {component_type} virtual")
        } else {
            format!("create {component_type}")
        };
        log.borrow_mut().push(entry);
        Box::new(RecordingComponent::new(component_type, state.cloned(), log.clone())) as Box<dyn Component>
    })
}

/// Binder that binds every type in `known` (or every type at all when
/// `known` is empty) as a virtual recording component.
#[derive(Debug, Default)]
pub struct RecordingBinder {
    pub log: CallLog,
    pub known: Vec<String>,
}

impl RecordingBinder {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            known: Vec::new(),
        }
    }

    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.known = types.iter().map(|t| (*t).to_owned()).collect();
        self
    }
}

impl ComponentBinder for RecordingBinder {
    fn bind(
        &mut self,
        _container: &mut ComponentContainer,
        config: &ResolvedComponentItemConfig,
    ) -> Option<BindableComponent> {
        if !self.known.is_empty() && !self.known.contains(&config.component_type) {
            return None;
        }
        self.log
            .borrow_mut()
            .push(format!("bind {}", config.component_type));
        Some(BindableComponent {
            component: Box::new(RecordingComponent::new(
                config.component_type.clone(),
                config.component_state.clone(),
                self.log.clone(),
            )),
            is_virtual: true,
        })
    }

    fn unbind(&mut self, container: &mut ComponentContainer) {
        self.log
            .borrow_mut()
            .push(format!("unbind {}", container.component_type()));
    }

    fn rect_required(&mut self, container: &ComponentContainer, rect: Rect) {
        self.log.borrow_mut().push(format!(
            "rect {} {}x{}",
            container.component_type(),
            rect.width,
            rect.height
        ));
    }

    fn visibility_required(&mut self, container: &ComponentContainer, visible: bool) {
        self.log
            .borrow_mut()
            .push(format!("visible {} {visible}", container.component_type()));
    }
}
