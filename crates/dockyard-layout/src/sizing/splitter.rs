//! Splitters between row/column children.
//!
//! Each row or column stores one [`Splitter`] per gap between adjacent
//! children after every layout pass. The pointer handler hit-tests their
//! grab zones and drives a [`SplitterDrag`], whose final offset rescales
//! the two neighbours.

use dockyard_common::Rect;

use crate::item::ItemId;

#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
    /// The splitter sits between child `index` and child `index + 1`.
    pub index: usize,
    /// True inside a column: the splitter is a horizontal bar.
    pub vertical: bool,
    /// Visible bar, `borderWidth` thick.
    pub rect: Rect,
    /// Hit zone, centred on the bar and at least as thick as it.
    pub grab_rect: Rect,
}

impl Splitter {
    pub fn new(index: usize, vertical: bool, rect: Rect, grab_width: f64) -> Self {
        let thickness = rect.extent(vertical);
        let grab = grab_width.max(thickness);
        let pad = (grab - thickness) / 2.0;
        let grab_rect = if vertical {
            Rect::new(rect.x, rect.y - pad, rect.width, grab)
        } else {
            Rect::new(rect.x - pad, rect.y, grab, rect.height)
        };
        Self {
            index,
            vertical,
            rect,
            grab_rect,
        }
    }

    /// Inclusive test against the grab zone.
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        x >= self.grab_rect.x
            && x <= self.grab_rect.right()
            && y >= self.grab_rect.y
            && y <= self.grab_rect.bottom()
    }

    /// Pointer coordinate along the axis this splitter moves on.
    pub fn axis_coordinate(&self, x: f64, y: f64) -> f64 {
        if self.vertical {
            y
        } else {
            x
        }
    }
}

/// An in-progress splitter drag.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitterDrag {
    pub owner: ItemId,
    pub index: usize,
    pub vertical: bool,
    start: f64,
    offset: f64,
    min_offset: f64,
    max_offset: f64,
}

impl SplitterDrag {
    /// `before`/`after` are the current pixel extents of the two
    /// neighbours and their minimums.
    pub fn new(
        owner: ItemId,
        splitter: &Splitter,
        start: f64,
        before: (f64, f64),
        after: (f64, f64),
    ) -> Self {
        let (before_extent, before_min) = before;
        let (after_extent, after_min) = after;
        Self {
            owner,
            index: splitter.index,
            vertical: splitter.vertical,
            start,
            offset: 0.0,
            min_offset: -(before_extent - before_min).max(0.0),
            max_offset: (after_extent - after_min).max(0.0),
        }
    }

    /// Track the pointer; the offset is clamped so neither neighbour goes
    /// below its minimum.
    pub fn update(&mut self, coordinate: f64) -> f64 {
        self.offset = (coordinate - self.start).clamp(self.min_offset, self.max_offset);
        self.offset
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// New percentage sizes for two neighbours after the splitter between them
/// moved by `offset` pixels. Their combined percentage is preserved.
pub fn rescale_neighbours(
    before_percent: f64,
    after_percent: f64,
    before_px: f64,
    after_px: f64,
    offset: f64,
) -> (f64, f64) {
    let total_px = before_px + after_px;
    let total_percent = before_percent + after_percent;
    if total_px <= 0.0 {
        return (before_percent, after_percent);
    }
    let ratio = ((before_px + offset) / total_px).clamp(0.0, 1.0);
    (total_percent * ratio, total_percent * (1.0 - ratio))
}
