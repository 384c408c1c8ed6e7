//! Drag and drop: gesture detection, drop areas, the drag proxy, external
//! drag sources and mutations deferred until the gesture ends.

pub mod areas;
mod deferred;
mod listener;
mod proxy;
mod source;

pub use areas::{Area, AreaHit, DropZone, HeaderSlot, GROUND_EDGE};
pub use deferred::{DeferredCommand, DeferredQueue};
pub use listener::{DragListener, DragSignal, DRAG_DISTANCE, DRAG_HOLD_DELAY};
pub use proxy::DragProxy;
pub use source::{DragSource, DragSourceId};
