pub mod commands;
pub mod component;
pub mod drag;
pub mod events;
pub mod header;
pub mod item;
pub mod manager;
pub mod popout;
pub mod sizing;

pub use commands::HeaderAction;
pub use component::{Component, ComponentBinder, ComponentContainer, ComponentFactory, ComponentRegistry};
pub use dockyard_common::{DockError, Result};
pub use events::{EventPayload, LayoutEvent};
pub use item::{ContentItem, ItemId};
pub use manager::{Environment, LayoutManager, Location, LocationKind, LocationSelector, ManagerOptions};
pub use popout::{MemoryHost, WindowContext, WindowHost, WindowRegistry};
