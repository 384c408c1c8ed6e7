pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ApiError, ConfigError, DockError, HostError, UnreachableCase};
pub use events::{BroadcastMessage, EventHub, USER_BROADCAST_EVENT};
pub use id::{new_id, new_unique_id};
pub use types::{Rect, Side, WindowHandle};

pub type Result<T> = std::result::Result<T, DockError>;
