use dockyard_common::Rect;
use dockyard_config::ResolvedComponentItemConfig;

use super::{Component, ComponentContainer};

/// A component produced by a factory or a binder.
pub struct BindableComponent {
    pub component: Box<dyn Component>,
    /// Virtual components are positioned by the embedder through
    /// [`ComponentBinder::rect_required`].
    pub is_virtual: bool,
}

impl std::fmt::Debug for BindableComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindableComponent")
            .field("is_virtual", &self.is_virtual)
            .finish_non_exhaustive()
    }
}

/// External binding for component types that are not in the registry.
pub trait ComponentBinder {
    /// Produce a component for `config`, or `None` if this binder does not
    /// know the type either.
    fn bind(
        &mut self,
        container: &mut ComponentContainer,
        config: &ResolvedComponentItemConfig,
    ) -> Option<BindableComponent>;

    /// The container is about to release a component this binder produced.
    fn unbind(&mut self, container: &mut ComponentContainer);

    /// A virtual component's container moved or resized.
    fn rect_required(&mut self, _container: &ComponentContainer, _rect: Rect) {}

    /// A virtual component's container was shown or hidden.
    fn visibility_required(&mut self, _container: &ComponentContainer, _visible: bool) {}
}
