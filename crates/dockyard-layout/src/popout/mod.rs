//! Popout windows: the host abstraction, the opener's view of each
//! window, and the registry that lets separate managers find each other.

mod browser;
mod context;
mod host;
mod registry;

pub use browser::{BrowserPopout, PopoutState, POPOUT_POLL_INTERVAL, STORAGE_KEY_PREFIX};
pub use context::{WindowContext, WINDOW_QUERY_KEY};
pub use host::{HostResult, MemoryHost, WindowHost, DEFAULT_POPOUT_HEIGHT, DEFAULT_POPOUT_WIDTH};
pub use registry::{WindowRegistry, WindowRequest};
