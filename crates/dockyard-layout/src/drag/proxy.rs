use dockyard_common::Rect;

use crate::item::ItemId;

use super::areas::{hit_test, Area, AreaHit};

/// The floating representation of an item being dragged.
#[derive(Debug, Clone)]
pub struct DragProxy {
    pub(crate) item: ItemId,
    /// Where the item came from; `None` for external drag sources.
    pub(crate) original_parent: Option<ItemId>,
    pub(crate) original_index: usize,
    pub(crate) areas: Vec<Area>,
    pub(crate) current: Option<AreaHit>,
    pub(crate) last_valid: Option<AreaHit>,
    pub(crate) rect: Rect,
    /// Pointer is clamped to these bounds before hit testing.
    pub(crate) bounds: Option<Rect>,
}

impl DragProxy {
    pub fn new(
        item: ItemId,
        original: Option<(ItemId, usize)>,
        areas: Vec<Area>,
        size: (f64, f64),
        bounds: Option<Rect>,
    ) -> Self {
        Self {
            item,
            original_parent: original.map(|(parent, _)| parent),
            original_index: original.map_or(0, |(_, index)| index),
            areas,
            current: None,
            last_valid: None,
            rect: Rect::new(0.0, 0.0, size.0, size.1),
            bounds,
        }
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn original_parent(&self) -> Option<ItemId> {
        self.original_parent
    }

    pub fn original_index(&self) -> usize {
        self.original_index
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn current(&self) -> Option<&AreaHit> {
        self.current.as_ref()
    }

    /// Move the proxy to the pointer and hit-test.
    pub fn update(&mut self, x: f64, y: f64) -> Option<&AreaHit> {
        let (x, y) = match self.bounds {
            Some(bounds) => bounds.clamp_point(x, y),
            None => (x, y),
        };
        self.rect.x = x;
        self.rect.y = y;
        self.current = hit_test(&self.areas, x, y);
        if self.current.is_some() {
            self.last_valid = self.current;
        }
        self.current.as_ref()
    }

    /// Where a release right now would drop.
    pub fn drop_target(&self) -> Option<&AreaHit> {
        self.current.as_ref().or(self.last_valid.as_ref())
    }

    /// Rectangle to highlight as the drop indicator.
    pub fn highlight(&self) -> Option<Rect> {
        self.drop_target().map(|hit| hit.highlight)
    }
}
