//! Component instantiation: the user component contract, the factory
//! registry and the external binder used for unregistered types.

mod binder;
mod container;
mod recording;

pub use binder::{BindableComponent, ComponentBinder};
pub use container::{ComponentContainer, ContainerRequest};
pub use recording::{recording_factory, CallLog, RecordingBinder, RecordingComponent};

use std::collections::HashMap;

use dockyard_common::ApiError;
use serde_json::Value;

/// What the layout needs from a user component. Every hook is optional.
pub trait Component {
    fn resize(&mut self, _width: f64, _height: f64) {}

    fn set_visible(&mut self, _visible: bool) {}

    fn focus(&mut self) {}

    fn blur(&mut self) {}

    /// Current state to persist. `None` keeps whatever the container holds.
    fn save_state(&self) -> Option<Value> {
        None
    }

    /// Called once, right before the container lets go of the instance.
    fn release(&mut self) {}

    /// Identifier of the externally positioned root element of a virtual
    /// component.
    fn root_element_id(&self) -> Option<String> {
        None
    }
}

/// Builds a component for a container: `(container, initial state, virtual)`.
pub type ComponentFactory = Box<dyn Fn(&mut ComponentContainer, Option<&Value>, bool) -> Box<dyn Component>>;

struct Registration {
    factory: ComponentFactory,
    is_virtual: bool,
}

/// Maps component type names to factories.
#[derive(Default)]
pub struct ComponentRegistry {
    registrations: HashMap<String, Registration>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, factory: ComponentFactory) -> Result<(), ApiError> {
        self.insert(name.into(), factory, false)
    }

    /// Register a factory whose components are positioned externally.
    pub fn register_virtual(&mut self, name: impl Into<String>, factory: ComponentFactory) -> Result<(), ApiError> {
        self.insert(name.into(), factory, true)
    }

    fn insert(&mut self, name: String, factory: ComponentFactory, is_virtual: bool) -> Result<(), ApiError> {
        if self.registrations.contains_key(&name) {
            return Err(ApiError::DuplicateComponentType(name));
        }
        tracing::debug!(component_type = %name, is_virtual, "component type registered");
        self.registrations.insert(name, Registration { factory, is_virtual });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registrations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Instantiate `name` for `container`. Returns `None` if the type is not
    /// registered.
    pub fn instantiate(
        &self,
        name: &str,
        container: &mut ComponentContainer,
        state: Option<&Value>,
    ) -> Option<BindableComponent> {
        let registration = self.registrations.get(name)?;
        let component = (registration.factory)(container, state, registration.is_virtual);
        Some(BindableComponent {
            component,
            is_virtual: registration.is_virtual,
        })
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.registrations.keys().collect();
        names.sort();
        f.debug_struct("ComponentRegistry").field("types", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockyard_config::ResolvedComponentItemConfig;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn duplicate_registration_is_rejected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ComponentRegistry::new();
        registry.register("a", recording_factory(log.clone())).unwrap();
        let err = registry.register("a", recording_factory(log)).unwrap_err();
        assert_eq!(err, ApiError::DuplicateComponentType("a".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn instantiate_passes_state_and_virtual_flag() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ComponentRegistry::new();
        registry.register_virtual("v", recording_factory(log.clone())).unwrap();

        let config = ResolvedComponentItemConfig::new("v").with_state(json!({ "n": 1 }));
        let mut container = ComponentContainer::new(&config);
        let bound = registry
            .instantiate("v", &mut container, config.component_state.as_ref())
            .unwrap();
        assert!(bound.is_virtual);
        assert_eq!(bound.component.save_state(), Some(json!({ "n": 1 })));
        assert_eq!(*log.borrow(), vec!["create v virtual"]);
    }

    #[test]
    fn unknown_type_instantiates_nothing() {
        let registry = ComponentRegistry::new();
        let config = ResolvedComponentItemConfig::new("nope");
        let mut container = ComponentContainer::new(&config);
        assert!(registry.instantiate("nope", &mut container, None).is_none());
    }
}
