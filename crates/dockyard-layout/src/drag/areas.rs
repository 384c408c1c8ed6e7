//! Drop areas.
//!
//! Areas are computed once when a drag starts. Each is a rectangle tagged
//! with the item that would receive the drop and the kind of drop. Hit
//! testing picks the smallest area strictly containing the pointer, so a
//! tab strip beats its stack and a stack beats the whole container.

use dockyard_common::{Rect, Side};

use crate::item::ItemId;

/// Thickness of the ground's edge strips.
pub const GROUND_EDGE: f64 = 50.0;

/// Thickness of the header insertion marker.
const MARKER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// Empty layout: the item becomes the root.
    GroundWhole,
    /// Split the root along this edge.
    GroundSide(Side),
    /// Insert as a tab.
    StackHeader,
    /// Add as a tab at the end.
    StackCenter,
    /// Split the stack along this edge.
    StackSide(Side),
}

/// One tab of a header, for insertion-point lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderSlot {
    pub rect: Rect,
    pub logical_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub rect: Rect,
    pub target: ItemId,
    pub zone: DropZone,
    pub highlight: Rect,
    /// Header tabs in visual order (header areas only).
    pub slots: Vec<HeaderSlot>,
    pub vertical_header: bool,
    /// Logical index used when the pointer is past the last tab.
    pub end_index: usize,
}

impl Area {
    fn simple(rect: Rect, target: ItemId, zone: DropZone, highlight: Rect) -> Self {
        Self {
            rect,
            target,
            zone,
            highlight,
            slots: Vec::new(),
            vertical_header: false,
            end_index: 0,
        }
    }

    pub fn surface(&self) -> f64 {
        self.rect.surface()
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaHit {
    pub area: usize,
    pub target: ItemId,
    pub zone: DropZone,
    /// Logical insertion index for header drops.
    pub index: Option<usize>,
    pub highlight: Rect,
}

fn half(rect: Rect, side: Side) -> Rect {
    match side {
        Side::Left => Rect::new(rect.x, rect.y, rect.width / 2.0, rect.height),
        Side::Right => Rect::new(rect.x + rect.width / 2.0, rect.y, rect.width / 2.0, rect.height),
        Side::Top => Rect::new(rect.x, rect.y, rect.width, rect.height / 2.0),
        Side::Bottom => Rect::new(rect.x, rect.y + rect.height / 2.0, rect.width, rect.height / 2.0),
    }
}

fn strip(rect: Rect, side: Side, thickness: f64) -> Rect {
    let t = thickness.min(rect.width).min(rect.height).max(0.0);
    match side {
        Side::Left => Rect::new(rect.x, rect.y, t, rect.height),
        Side::Right => Rect::new(rect.right() - t, rect.y, t, rect.height),
        Side::Top => Rect::new(rect.x, rect.y, rect.width, t),
        Side::Bottom => Rect::new(rect.x, rect.bottom() - t, rect.width, t),
    }
}

pub fn ground_areas(ground: ItemId, rect: Rect, is_empty: bool, root_is_stack: bool) -> Vec<Area> {
    if is_empty {
        return vec![Area::simple(rect, ground, DropZone::GroundWhole, rect)];
    }
    if root_is_stack {
        return Vec::new();
    }
    [Side::Left, Side::Right, Side::Top, Side::Bottom]
        .into_iter()
        .map(|side| {
            Area::simple(
                strip(rect, side, GROUND_EDGE),
                ground,
                DropZone::GroundSide(side),
                half(rect, side),
            )
        })
        .collect()
}

/// Areas of one stack. `header` is the header rect, side and its tabs in
/// visual order; `None` when the header is hidden.
pub fn stack_areas(
    stack: ItemId,
    header: Option<(Rect, Side, Vec<HeaderSlot>)>,
    content: Rect,
    child_count: usize,
) -> Vec<Area> {
    let mut areas = Vec::new();
    if let Some((rect, side, slots)) = header {
        areas.push(Area {
            rect,
            target: stack,
            zone: DropZone::StackHeader,
            highlight: rect,
            slots,
            vertical_header: side.is_vertical_edge(),
            end_index: child_count,
        });
    }
    if child_count == 0 {
        if areas.is_empty() {
            areas.push(Area::simple(content, stack, DropZone::StackCenter, content));
        }
        return areas;
    }

    let (w, h) = (content.width, content.height);
    let (qw, qh) = (w * 0.25, h * 0.25);
    areas.push(Area::simple(
        Rect::new(content.x, content.y, qw, h),
        stack,
        DropZone::StackSide(Side::Left),
        half(content, Side::Left),
    ));
    areas.push(Area::simple(
        Rect::new(content.right() - qw, content.y, qw, h),
        stack,
        DropZone::StackSide(Side::Right),
        half(content, Side::Right),
    ));
    areas.push(Area::simple(
        Rect::new(content.x + qw, content.y, w - 2.0 * qw, qh),
        stack,
        DropZone::StackSide(Side::Top),
        half(content, Side::Top),
    ));
    areas.push(Area::simple(
        Rect::new(content.x + qw, content.bottom() - qh, w - 2.0 * qw, qh),
        stack,
        DropZone::StackSide(Side::Bottom),
        half(content, Side::Bottom),
    ));
    areas.push(Area::simple(
        Rect::new(content.x + qw, content.y + qh, w - 2.0 * qw, h - 2.0 * qh),
        stack,
        DropZone::StackCenter,
        content,
    ));
    areas
}

/// Insertion point within a header area: logical index and marker rect.
fn header_insertion(area: &Area, x: f64, y: f64) -> (usize, Rect) {
    let pos = if area.vertical_header { y } else { x };
    let mid = |r: &Rect| {
        if area.vertical_header {
            r.y + r.height / 2.0
        } else {
            r.x + r.width / 2.0
        }
    };
    let visual = area.slots.iter().take_while(|s| mid(&s.rect) < pos).count();
    let (index, at) = match area.slots.get(visual) {
        Some(slot) => (
            slot.logical_index,
            if area.vertical_header { slot.rect.y } else { slot.rect.x },
        ),
        None => {
            let end = area.slots.last().map_or(
                if area.vertical_header { area.rect.y } else { area.rect.x },
                |s| if area.vertical_header { s.rect.bottom() } else { s.rect.right() },
            );
            (area.end_index, end)
        }
    };
    let marker = if area.vertical_header {
        Rect::new(area.rect.x, at, area.rect.width, MARKER)
    } else {
        Rect::new(at, area.rect.y, MARKER, area.rect.height)
    };
    (index, marker)
}

pub fn hit_test(areas: &[Area], x: f64, y: f64) -> Option<AreaHit> {
    let (i, area) = areas
        .iter()
        .enumerate()
        .filter(|(_, a)| a.rect.contains(x, y))
        .min_by(|(_, a), (_, b)| a.surface().total_cmp(&b.surface()))?;
    let (index, highlight) = if area.zone == DropZone::StackHeader {
        let (index, marker) = header_insertion(area, x, y);
        (Some(index), marker)
    } else {
        (None, area.highlight)
    };
    Some(AreaHit {
        area: i,
        target: area.target,
        zone: area.zone,
        index,
        highlight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids() -> (ItemId, ItemId) {
        let mut map: SlotMap<ItemId, ()> = SlotMap::with_key();
        (map.insert(()), map.insert(()))
    }

    #[test]
    fn empty_ground_is_one_area() {
        let (g, _) = ids();
        let rect = Rect::new(0.0, 0.0, 800.0, 600.0);
        let areas = ground_areas(g, rect, true, false);
        assert_eq!(areas.len(), 1);
        let hit = hit_test(&areas, 400.0, 300.0).unwrap();
        assert_eq!(hit.zone, DropZone::GroundWhole);
        assert_eq!(hit.highlight, rect);
    }

    #[test]
    fn stack_root_leaves_ground_without_areas() {
        let (g, _) = ids();
        assert!(ground_areas(g, Rect::new(0.0, 0.0, 800.0, 600.0), false, true).is_empty());
    }

    #[test]
    fn smallest_area_wins() {
        let (g, s) = ids();
        let rect = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut areas = ground_areas(g, rect, false, false);
        areas.extend(stack_areas(s, None, rect, 2));
        // Inside the ground's 50px left strip and the stack's left quarter.
        let hit = hit_test(&areas, 20.0, 300.0).unwrap();
        assert_eq!(hit.zone, DropZone::GroundSide(Side::Left));
        assert_eq!(hit.target, g);
        // Further in only the stack segment matches.
        let hit = hit_test(&areas, 100.0, 300.0).unwrap();
        assert_eq!(hit.zone, DropZone::StackSide(Side::Left));
        assert_eq!(hit.highlight, Rect::new(0.0, 0.0, 400.0, 600.0));
        let hit = hit_test(&areas, 400.0, 300.0).unwrap();
        assert_eq!(hit.zone, DropZone::StackCenter);
        let hit = hit_test(&areas, 400.0, 500.0).unwrap();
        assert_eq!(hit.zone, DropZone::StackSide(Side::Bottom));
        let hit = hit_test(&areas, 400.0, 580.0).unwrap();
        assert_eq!(hit.zone, DropZone::GroundSide(Side::Bottom));
    }

    #[test]
    fn header_insertion_index_follows_midpoints() {
        let (_, s) = ids();
        let header = Rect::new(0.0, 0.0, 400.0, 20.0);
        // Visual order differs from logical order.
        let slots = vec![
            HeaderSlot { rect: Rect::new(0.0, 0.0, 100.0, 20.0), logical_index: 1 },
            HeaderSlot { rect: Rect::new(100.0, 0.0, 100.0, 20.0), logical_index: 0 },
        ];
        let areas = stack_areas(s, Some((header, Side::Top, slots)), Rect::new(0.0, 20.0, 400.0, 300.0), 2);
        let hit = hit_test(&areas, 30.0, 10.0).unwrap();
        assert_eq!(hit.index, Some(1));
        assert_eq!(hit.highlight, Rect::new(0.0, 0.0, 2.0, 20.0));
        let hit = hit_test(&areas, 120.0, 10.0).unwrap();
        assert_eq!(hit.index, Some(0));
        let hit = hit_test(&areas, 300.0, 10.0).unwrap();
        assert_eq!(hit.index, Some(2));
        assert_eq!(hit.highlight.x, 200.0);
    }

    #[test]
    fn empty_stack_only_offers_header() {
        let (_, s) = ids();
        let areas = stack_areas(
            s,
            Some((Rect::new(0.0, 0.0, 400.0, 20.0), Side::Top, Vec::new())),
            Rect::new(0.0, 20.0, 400.0, 300.0),
            0,
        );
        assert_eq!(areas.len(), 1);
        assert_eq!(hit_test(&areas, 10.0, 10.0).unwrap().index, Some(0));
        assert!(hit_test(&areas, 10.0, 100.0).is_none());
    }
}
