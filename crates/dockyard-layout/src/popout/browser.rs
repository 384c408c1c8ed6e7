//! One popout window as seen from the manager that opened it.

use std::time::{Duration, Instant};

use dockyard_common::{new_unique_id, HostError, WindowHandle};
use dockyard_config::{minify_config, ResolvedPopoutLayoutConfig};

use crate::events::{EventEmitter, EventPayload, LayoutEvent, SubscriptionId, INITIALISED};

use super::context::WindowContext;
use super::host::{WindowHost, DEFAULT_POPOUT_HEIGHT, DEFAULT_POPOUT_WIDTH};
use super::registry::WindowRegistry;

/// How often an opening window is checked for a finished child.
pub const POPOUT_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub const STORAGE_KEY_PREFIX: &str = "gl-window-config-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopoutState {
    Opening { next_poll: Option<Instant> },
    Initialised,
    Closed,
}

#[derive(Debug)]
pub struct BrowserPopout {
    id: usize,
    config: ResolvedPopoutLayoutConfig,
    handle: WindowHandle,
    storage_key: String,
    state: PopoutState,
    events: EventEmitter,
}

impl BrowserPopout {
    /// Store the minified config and ask the host for a window. On
    /// failure the stored config is removed again.
    pub(crate) fn open(
        id: usize,
        mut config: ResolvedPopoutLayoutConfig,
        host: &dyn WindowHost,
        context: &WindowContext,
    ) -> Result<Self, HostError> {
        let (origin_x, origin_y) = host.screen_origin();
        let window = &mut config.window;
        window.left.get_or_insert(origin_x);
        window.top.get_or_insert(origin_y);
        window.width.get_or_insert(DEFAULT_POPOUT_WIDTH);
        window.height.get_or_insert(DEFAULT_POPOUT_HEIGHT);

        let storage_key = format!("{STORAGE_KEY_PREFIX}{}", new_unique_id());
        let text = minify_config(&config).map_err(|e| HostError::StorageError(e.to_string()))?;
        host.storage_set(&storage_key, &text)?;

        match host.open_window(&context.popout_url(&storage_key), &config.window) {
            Ok(handle) => {
                tracing::debug!(popout = id, %handle, key = %storage_key, "popout window opened");
                Ok(Self {
                    id,
                    config,
                    handle,
                    storage_key,
                    state: PopoutState::Opening { next_poll: None },
                    events: EventEmitter::new(),
                })
            }
            Err(e) => {
                host.storage_remove(&storage_key);
                Err(e)
            }
        }
    }

    // -- Accessors --

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn config(&self) -> &ResolvedPopoutLayoutConfig {
        &self.config
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn state(&self) -> PopoutState {
        self.state
    }

    pub fn is_initialised(&self) -> bool {
        self.state == PopoutState::Initialised
    }

    pub fn on(&mut self, name: impl Into<String>, handler: impl FnMut(&LayoutEvent) + 'static) -> SubscriptionId {
        self.events.on(name, handler)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    // -- Lifecycle --

    /// Check whether the child finished booting. Returns true exactly once,
    /// on the poll that observes it, after emitting `initialised` on this
    /// popout.
    pub(crate) fn poll(&mut self, now: Instant, registry: &WindowRegistry) -> bool {
        let PopoutState::Opening { next_poll } = self.state else {
            return false;
        };
        if next_poll.is_some_and(|at| now < at) {
            return false;
        }
        if registry.is_initialised(self.handle) {
            self.state = PopoutState::Initialised;
            let payload = EventPayload::Popout {
                id: self.id,
                handle: Some(self.handle),
            };
            self.events.emit(&LayoutEvent::new(INITIALISED, None, payload));
            true
        } else {
            self.state = PopoutState::Opening {
                next_poll: Some(now + POPOUT_POLL_INTERVAL),
            };
            false
        }
    }

    pub(crate) fn is_closed(&self, host: &dyn WindowHost) -> bool {
        self.state == PopoutState::Closed || host.is_window_closed(self.handle)
    }

    /// Current config: the child's live layout once it is initialised,
    /// otherwise the one it was opened with. Window placement and the
    /// pop-in markers always come from this side.
    pub(crate) fn to_config(
        &self,
        host: &dyn WindowHost,
        registry: &WindowRegistry,
    ) -> ResolvedPopoutLayoutConfig {
        let live = registry
            .manager(self.handle)
            .and_then(|child| child.try_borrow().ok().and_then(|m| m.to_popout_config().ok()));
        let mut config = match live {
            Some(live) if self.is_initialised() => live,
            _ => self.config.clone(),
        };
        if let Some(rect) = host.window_rect(self.handle) {
            config.window.left = Some(rect.x);
            config.window.top = Some(rect.y);
            config.window.width = Some(rect.width);
            config.window.height = Some(rect.height);
        } else {
            config.window = self.config.window;
        }
        config.parent_id = self.config.parent_id.clone();
        config.index_in_parent = self.config.index_in_parent;
        config
    }

    pub(crate) fn close(&mut self, host: &dyn WindowHost) {
        if self.state != PopoutState::Closed {
            host.close_window(self.handle);
            host.storage_remove(&self.storage_key);
            self.state = PopoutState::Closed;
        }
    }
}
