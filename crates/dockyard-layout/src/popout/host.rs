//! The environment that owns real windows and their shared storage.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use dockyard_common::{HostError, Rect, WindowHandle};
use dockyard_config::PopoutWindow;

/// Default popout size when neither the config nor the source item
/// supplies one.
pub const DEFAULT_POPOUT_WIDTH: f64 = 500.0;
pub const DEFAULT_POPOUT_HEIGHT: f64 = 309.0;

pub type HostResult<T> = std::result::Result<T, HostError>;

/// Host-agnostic window and storage operations.
///
/// All methods take `&self`: a host is shared by every window of a
/// layout tree.
pub trait WindowHost {
    fn open_window(&self, url: &str, window: &PopoutWindow) -> HostResult<WindowHandle>;
    fn close_window(&self, handle: WindowHandle);
    /// Unknown handles count as closed.
    fn is_window_closed(&self, handle: WindowHandle) -> bool;
    fn window_rect(&self, handle: WindowHandle) -> Option<Rect>;
    /// Screen position of the main window's client area.
    fn screen_origin(&self) -> (f64, f64);

    fn storage_get(&self, key: &str) -> Option<String>;
    fn storage_set(&self, key: &str, value: &str) -> HostResult<()>;
    fn storage_remove(&self, key: &str);
}

#[derive(Debug, Clone)]
struct HostWindow {
    url: String,
    rect: Rect,
    closed: bool,
}

#[derive(Debug, Default)]
struct MemoryHostState {
    next_handle: u32,
    windows: BTreeMap<WindowHandle, HostWindow>,
    storage: HashMap<String, String>,
    block_popups: bool,
    opened: Vec<(WindowHandle, String)>,
    screen_origin: (f64, f64),
}

/// In-process host: windows are records, storage is a map.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: RefCell<MemoryHostState>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `open_window` fail as a popup blocker would.
    pub fn set_block_popups(&self, block: bool) {
        self.state.borrow_mut().block_popups = block;
    }

    pub fn set_screen_origin(&self, x: f64, y: f64) {
        self.state.borrow_mut().screen_origin = (x, y);
    }

    /// Simulate the user closing a window.
    pub fn close_by_user(&self, handle: WindowHandle) -> bool {
        match self.state.borrow_mut().windows.get_mut(&handle) {
            Some(window) if !window.closed => {
                window.closed = true;
                true
            }
            _ => false,
        }
    }

    pub fn move_window(&self, handle: WindowHandle, rect: Rect) {
        if let Some(window) = self.state.borrow_mut().windows.get_mut(&handle) {
            window.rect = rect;
        }
    }

    /// Windows opened since the last call, with the URL each was given.
    pub fn take_opened(&self) -> Vec<(WindowHandle, String)> {
        std::mem::take(&mut self.state.borrow_mut().opened)
    }

    pub fn open_window_count(&self) -> usize {
        self.state
            .borrow()
            .windows
            .values()
            .filter(|w| !w.closed)
            .count()
    }

    pub fn window_url(&self, handle: WindowHandle) -> Option<String> {
        self.state.borrow().windows.get(&handle).map(|w| w.url.clone())
    }

    pub fn storage_len(&self) -> usize {
        self.state.borrow().storage.len()
    }
}

impl WindowHost for MemoryHost {
    fn open_window(&self, url: &str, window: &PopoutWindow) -> HostResult<WindowHandle> {
        let mut state = self.state.borrow_mut();
        if state.block_popups {
            return Err(HostError::PopoutBlocked);
        }
        state.next_handle += 1;
        let handle = WindowHandle(state.next_handle);
        let rect = Rect::new(
            window.left.unwrap_or(0.0),
            window.top.unwrap_or(0.0),
            window.width.unwrap_or(DEFAULT_POPOUT_WIDTH),
            window.height.unwrap_or(DEFAULT_POPOUT_HEIGHT),
        );
        state.windows.insert(
            handle,
            HostWindow {
                url: url.to_string(),
                rect,
                closed: false,
            },
        );
        state.opened.push((handle, url.to_string()));
        Ok(handle)
    }

    fn close_window(&self, handle: WindowHandle) {
        if let Some(window) = self.state.borrow_mut().windows.get_mut(&handle) {
            window.closed = true;
        }
    }

    fn is_window_closed(&self, handle: WindowHandle) -> bool {
        self.state
            .borrow()
            .windows
            .get(&handle)
            .map_or(true, |w| w.closed)
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
        self.state
            .borrow()
            .windows
            .get(&handle)
            .filter(|w| !w.closed)
            .map(|w| w.rect)
    }

    fn screen_origin(&self) -> (f64, f64) {
        self.state.borrow().screen_origin
    }

    fn storage_get(&self, key: &str) -> Option<String> {
        self.state.borrow().storage.get(key).cloned()
    }

    fn storage_set(&self, key: &str, value: &str) -> HostResult<()> {
        self.state
            .borrow_mut()
            .storage
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn storage_remove(&self, key: &str) {
        self.state.borrow_mut().storage.remove(key);
    }
}
