use dockyard_common::Rect;
use dockyard_config::ResolvedComponentItemConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DragSourceId(pub(crate) u64);

/// An element outside the layout that creates a new component when
/// dragged into it.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSource {
    pub(crate) id: DragSourceId,
    pub rect: Rect,
    pub config: ResolvedComponentItemConfig,
}

impl DragSource {
    pub fn id(&self) -> DragSourceId {
        self.id
    }

    /// Inclusive, so a press on the very edge still counts.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.rect.x && x <= self.rect.right() && y >= self.rect.y && y <= self.rect.bottom()
    }
}
