//! Core types and constructors for LayoutManager.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use dockyard_common::{EventHub, Rect, WindowHandle};
use dockyard_config::{
    Dimensions, HeaderConfig, PopoutWindow, ResolvedLayoutConfig, Settings, Size,
};
use slotmap::SlotMap;

use crate::component::{ComponentBinder, ComponentContainer, ComponentFactory, ComponentRegistry};
use crate::drag::{DeferredQueue, DragListener, DragProxy, DragSource, DragSourceId};
use crate::events::{EventEmitter, LayoutEvent, SubscriptionId};
use crate::header::TabMetrics;
use crate::item::{ContentItem, ItemId, ItemKind};
use crate::popout::{BrowserPopout, WindowContext, WindowHost, WindowRegistry};
use crate::sizing::SplitterDrag;

pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);
pub const DEFAULT_HUB_CAPACITY: usize = 64;

/// Construction-time knobs that are not part of the layout config.
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    pub resize_debounce: Duration,
    /// A resize arriving while one is pending pushes the deadline out.
    pub resize_debounce_extended_when_possible: bool,
    /// Act on [`LayoutManager::notify_container_resized`]. When off, the
    /// embedder calls `set_size` itself.
    pub resize_with_container_automatically: bool,
    pub tab_metrics: TabMetrics,
    pub hub_capacity: usize,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE,
            resize_debounce_extended_when_possible: true,
            resize_with_container_automatically: false,
            tab_metrics: TabMetrics::default(),
            hub_capacity: DEFAULT_HUB_CAPACITY,
        }
    }
}

/// Where a manager runs and what it can reach outside itself.
pub struct Environment {
    pub context: WindowContext,
    /// Required for popouts; a manager without a host cannot open windows.
    pub host: Option<Rc<dyn WindowHost>>,
    /// Shared by every manager of one window tree.
    pub windows: Rc<WindowRegistry>,
    pub options: ManagerOptions,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            context: WindowContext::main("index.html"),
            host: None,
            windows: WindowRegistry::new(),
            options: ManagerOptions::default(),
        }
    }
}

impl Environment {
    pub fn with_host(host: Rc<dyn WindowHost>, windows: Rc<WindowRegistry>) -> Self {
        Self {
            host: Some(host),
            windows,
            ..Default::default()
        }
    }
}

/// A stack shown over the whole layout. It stays in its place in the
/// tree; the layout pass hides its siblings instead of moving it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maximised {
    pub stack: ItemId,
}

/// What a pending or active drag will move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DragSubject {
    Tab { stack: ItemId, item: ItemId },
    Source(DragSourceId),
}

/// The pointer gesture in progress.
#[derive(Debug, Default)]
pub(super) enum Gesture {
    #[default]
    Idle,
    Splitter(SplitterDrag),
    /// Pointer is down on something draggable; not yet a drag.
    Pending {
        listener: DragListener,
        subject: DragSubject,
    },
    Dragging {
        listener: DragListener,
        proxy: DragProxy,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PendingResize {
    pub(super) width: f64,
    pub(super) height: f64,
    pub(super) deadline: Instant,
}

/// Popout placement this window was booted with, echoed back on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct PopoutOrigin {
    pub(super) parent_id: Option<String>,
    pub(super) index_in_parent: Option<usize>,
    pub(super) window: PopoutWindow,
}

/// Owns the content-item tree of one window and everything that acts on
/// it: sizing, focus, maximise, drag and drop, popouts.
pub struct LayoutManager {
    pub(super) items: SlotMap<ItemId, ContentItem>,
    pub(super) ground: ItemId,
    /// Config applied by `init`.
    pub(super) config: ResolvedLayoutConfig,
    pub(super) settings: Settings,
    pub(super) dimensions: Dimensions,
    pub(super) header: HeaderConfig,
    pub(super) options: ManagerOptions,
    pub(super) registry: ComponentRegistry,
    pub(super) binder: Option<Box<dyn ComponentBinder>>,
    pub(super) events: EventEmitter,
    pub(super) hub: Rc<EventHub>,
    pub(super) initialised: bool,
    pub(super) width: f64,
    pub(super) height: f64,
    pub(super) maximised: Option<Maximised>,
    pub(super) focused: Option<ItemId>,
    pub(super) gesture: Gesture,
    /// True between drag start and drop; header removals are deferred.
    pub(super) dragging: bool,
    pub(super) drag_sources: Vec<DragSource>,
    pub(super) next_drag_source: u64,
    pub(super) deferred: DeferredQueue,
    pub(super) pending_resize: Option<PendingResize>,
    pub(super) popouts: Vec<BrowserPopout>,
    pub(super) next_popout_id: usize,
    pub(super) host: Option<Rc<dyn WindowHost>>,
    pub(super) windows: Rc<WindowRegistry>,
    pub(super) context: WindowContext,
    /// Storage key this window boots from; `Some` for popout windows.
    pub(super) sub_window_key: Option<String>,
    pub(super) origin: PopoutOrigin,
    pub(super) self_ref: Weak<RefCell<LayoutManager>>,
}

impl LayoutManager {
    /// A main-window manager with no window host.
    pub fn new(config: ResolvedLayoutConfig) -> Self {
        Self::with_environment(config, Environment::default())
    }

    /// Popout windows are recognised here, from the context URL; their
    /// `config` argument is ignored in favour of the stored one.
    pub fn with_environment(config: ResolvedLayoutConfig, env: Environment) -> Self {
        let sub_window_key = env.context.sub_window_key();
        let mut items = SlotMap::with_key();
        let ground = items.insert(ContentItem::new(
            ItemKind::Ground,
            String::new(),
            Size::percent(100.0),
            None,
            false,
        ));
        let hub = EventHub::new(env.options.hub_capacity);
        if let Some(key) = &sub_window_key {
            tracing::debug!(key = %key, "manager created for popout window");
        }

        Self {
            items,
            ground,
            settings: config.settings.clone(),
            dimensions: config.dimensions.clone(),
            header: config.header.clone(),
            config,
            options: env.options,
            registry: ComponentRegistry::new(),
            binder: None,
            events: EventEmitter::new(),
            hub,
            initialised: false,
            width: 0.0,
            height: 0.0,
            maximised: None,
            focused: None,
            gesture: Gesture::Idle,
            dragging: false,
            drag_sources: Vec::new(),
            next_drag_source: 1,
            deferred: DeferredQueue::new(),
            pending_resize: None,
            popouts: Vec::new(),
            next_popout_id: 1,
            host: env.host,
            windows: env.windows,
            context: env.context,
            sub_window_key,
            origin: PopoutOrigin::default(),
            self_ref: Weak::new(),
        }
    }

    /// Shared handle, required for popout windows so the opener can reach
    /// this manager through the window registry.
    pub fn new_shared(config: ResolvedLayoutConfig, env: Environment) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|weak| {
            let mut manager = Self::with_environment(config, env);
            manager.self_ref = weak.clone();
            RefCell::new(manager)
        })
    }

    // -- Registration --

    pub fn register_component(
        &mut self,
        name: impl Into<String>,
        factory: ComponentFactory,
    ) -> crate::Result<()> {
        Ok(self.registry.register(name, factory)?)
    }

    pub fn register_virtual_component(
        &mut self,
        name: impl Into<String>,
        factory: ComponentFactory,
    ) -> crate::Result<()> {
        Ok(self.registry.register_virtual(name, factory)?)
    }

    pub fn set_component_binder(&mut self, binder: Box<dyn ComponentBinder>) {
        self.binder = Some(binder);
    }

    pub fn on(&mut self, name: impl Into<String>, handler: impl FnMut(&LayoutEvent) + 'static) -> SubscriptionId {
        self.events.on(name, handler)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    // -- Accessors --

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    pub fn is_sub_window(&self) -> bool {
        self.sub_window_key.is_some()
    }

    pub fn window_handle(&self) -> Option<WindowHandle> {
        self.context.handle
    }

    pub fn ground(&self) -> ItemId {
        self.ground
    }

    /// The single child of ground, if any.
    pub fn root(&self) -> Option<ItemId> {
        self.items
            .get(self.ground)
            .and_then(|g| g.children.first().copied())
    }

    pub fn item(&self, id: ItemId) -> Option<&ContentItem> {
        self.items.get(id)
    }

    /// Mutable access for subscribing to item events.
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut ContentItem> {
        self.items.get_mut(id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn container(&self, id: ItemId) -> Option<&ComponentContainer> {
        self.items
            .get(id)
            .and_then(|item| item.as_component())
            .map(|c| &c.container)
    }

    pub fn container_mut(&mut self, id: ItemId) -> Option<&mut ComponentContainer> {
        self.items
            .get_mut(id)
            .and_then(|item| item.as_component_mut())
            .map(|c| &mut c.container)
    }

    pub fn focused_component(&self) -> Option<ItemId> {
        self.focused
    }

    pub fn maximised(&self) -> Option<&Maximised> {
        self.maximised.as_ref()
    }

    pub fn maximised_stack(&self) -> Option<ItemId> {
        self.maximised.map(|m| m.stack)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn header_config(&self) -> &HeaderConfig {
        &self.header
    }

    pub fn container_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn container_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn hub(&self) -> &Rc<EventHub> {
        &self.hub
    }

    pub fn windows(&self) -> &Rc<WindowRegistry> {
        &self.windows
    }

    pub fn popouts(&self) -> &[BrowserPopout] {
        &self.popouts
    }

    /// Mutable access for subscribing to popout events.
    pub fn popout_mut(&mut self, id: usize) -> Option<&mut BrowserPopout> {
        self.popouts.iter_mut().find(|p| p.id() == id)
    }

    pub fn drag_sources(&self) -> &[DragSource] {
        &self.drag_sources
    }

    pub fn deferred(&self) -> &DeferredQueue {
        &self.deferred
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn drag_proxy(&self) -> Option<&DragProxy> {
        match &self.gesture {
            Gesture::Dragging { proxy, .. } => Some(proxy),
            _ => None,
        }
    }

    /// Rectangle of the current drop indicator while dragging.
    pub fn drop_highlight(&self) -> Option<Rect> {
        self.drag_proxy().and_then(DragProxy::highlight)
    }

    pub fn splitter_drag(&self) -> Option<&SplitterDrag> {
        match &self.gesture {
            Gesture::Splitter(drag) => Some(drag),
            _ => None,
        }
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending_resize.is_some()
    }
}
