//! Stack headers: the tab strip and the header buttons.
//!
//! A header keeps its tabs in visual order, which can drift from the
//! owning stack's logical child order (see `move_to_front`). The manager
//! feeds it measured widths and the enabled buttons; the header computes
//! every rectangle and answers hit tests.

mod tabs;

pub use tabs::{layout_tab_strip, StripMode, TabMetrics, TabPlacement, TabStrip, TabStripInput};

use dockyard_common::{Rect, Side};

use crate::item::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub(crate) id: TabId,
    pub(crate) item: ItemId,
    pub(crate) is_active: bool,
    pub(crate) is_focused: bool,
    /// Item already left the stack; the tab goes away when the current
    /// drag finishes.
    pub(crate) detached: bool,
    /// `None` while the tab sits in the dropdown or the header is hidden.
    pub(crate) rect: Option<Rect>,
}

impl Tab {
    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderButtonKind {
    TabDropdown,
    Popout,
    Dock,
    /// Maximise or minimise, depending on the stack's state.
    Maximise,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderButton {
    pub kind: HeaderButtonKind,
    pub label: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropdownEntry {
    pub item: ItemId,
    pub rect: Rect,
    pub is_active: bool,
}

/// What a pointer landed on inside a header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderHit {
    Button(HeaderButtonKind),
    Tab { item: ItemId, close_zone: bool },
    DropdownEntry(ItemId),
    /// Empty header space.
    Header,
}

/// Inputs for one header layout pass.
#[derive(Debug, Clone)]
pub struct HeaderLayout<'a> {
    pub rect: Rect,
    pub side: Side,
    /// Natural tab lengths, one per attached tab in visual order.
    pub widths: &'a [f64],
    /// Enabled buttons (without the dropdown toggle), in display order.
    pub buttons: Vec<(HeaderButtonKind, String)>,
    pub dropdown_label: String,
    pub control_offset: f64,
    pub overlap_allowance: f64,
}

#[derive(Debug, Default)]
pub struct Header {
    tabs: Vec<Tab>,
    next_tab_id: u64,
    side: Option<Side>,
    rect: Rect,
    strip: TabStrip,
    buttons: Vec<HeaderButton>,
    dropdown_open: bool,
    dropdown_entries: Vec<DropdownEntry>,
    close_width: f64,
}

fn along(rect: Rect, side: Side, offset: f64, length: f64) -> Rect {
    if side.is_vertical_edge() {
        Rect::new(rect.x, rect.y + offset, rect.width, length)
    } else {
        Rect::new(rect.x + offset, rect.y, length, rect.height)
    }
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Accessors --

    /// All tabs in visual order, including ones waiting for removal.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Items of attached tabs in visual order.
    pub fn visual_items(&self) -> Vec<ItemId> {
        self.attached().map(|t| t.item).collect()
    }

    pub fn tab_for(&self, item: ItemId) -> Option<&Tab> {
        self.attached().find(|t| t.item == item)
    }

    pub fn visual_index_of(&self, item: ItemId) -> Option<usize> {
        self.attached().position(|t| t.item == item)
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_shown(&self) -> bool {
        self.side.is_some()
    }

    pub fn strip(&self) -> &TabStrip {
        &self.strip
    }

    pub fn is_tight(&self) -> bool {
        self.strip.is_tight()
    }

    pub fn buttons(&self) -> &[HeaderButton] {
        &self.buttons
    }

    pub fn button(&self, kind: HeaderButtonKind) -> Option<&HeaderButton> {
        self.buttons.iter().find(|b| b.kind == kind)
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn dropdown_entries(&self) -> &[DropdownEntry] {
        &self.dropdown_entries
    }

    /// Items currently hidden in the dropdown (the active one excluded).
    pub fn overflow_items(&self) -> Vec<ItemId> {
        self.attached()
            .filter(|t| t.rect.is_none() && self.side.is_some())
            .map(|t| t.item)
            .collect()
    }

    fn attached(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter().filter(|t| !t.detached)
    }

    // -- Tab list --

    pub(crate) fn add_tab(&mut self, item: ItemId, visual_index: usize) -> TabId {
        self.next_tab_id += 1;
        let id = TabId(self.next_tab_id);
        let tab = Tab {
            id,
            item,
            is_active: false,
            is_focused: false,
            detached: false,
            rect: None,
        };
        // Position among attached tabs, translated to a raw index.
        let raw = self
            .tabs
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.detached)
            .nth(visual_index)
            .map_or(self.tabs.len(), |(i, _)| i);
        self.tabs.insert(raw, tab);
        id
    }

    pub(crate) fn remove_tab(&mut self, id: TabId) -> Option<Tab> {
        let index = self.tabs.iter().position(|t| t.id == id)?;
        Some(self.tabs.remove(index))
    }

    /// Hide the tab of `item` until it can be removed. Returns its id.
    pub(crate) fn detach_tab(&mut self, item: ItemId) -> Option<TabId> {
        let tab = self.tabs.iter_mut().find(|t| t.item == item && !t.detached)?;
        tab.detached = true;
        tab.rect = None;
        tab.is_active = false;
        Some(tab.id)
    }

    pub(crate) fn move_to_front(&mut self, item: ItemId) {
        if let Some(index) = self.tabs.iter().position(|t| t.item == item && !t.detached) {
            let tab = self.tabs.remove(index);
            self.tabs.insert(0, tab);
        }
    }

    pub(crate) fn set_active(&mut self, item: Option<ItemId>) {
        for tab in self.tabs.iter_mut() {
            tab.is_active = !tab.detached && Some(tab.item) == item;
        }
    }

    pub(crate) fn set_focused(&mut self, item: Option<ItemId>) {
        for tab in self.tabs.iter_mut() {
            tab.is_focused = !tab.detached && Some(tab.item) == item;
        }
    }

    pub(crate) fn toggle_dropdown(&mut self) -> bool {
        self.dropdown_open = !self.dropdown_open && self.strip.has_dropdown();
        self.dropdown_open
    }

    pub(crate) fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    // -- Layout --

    /// Header hidden: drop every rectangle.
    pub(crate) fn clear_layout(&mut self) {
        self.side = None;
        self.rect = Rect::default();
        self.strip = TabStrip::default();
        self.buttons.clear();
        self.dropdown_open = false;
        self.dropdown_entries.clear();
        for tab in self.tabs.iter_mut() {
            tab.rect = None;
        }
    }

    pub(crate) fn layout(&mut self, spec: HeaderLayout<'_>, metrics: &TabMetrics) {
        self.side = Some(spec.side);
        self.rect = spec.rect;
        self.close_width = metrics.close_width;
        let length = spec.rect.extent(spec.side.is_vertical_edge());

        let active = self.attached().position(|t| t.is_active);
        let strip = layout_tab_strip(
            TabStripInput {
                widths: spec.widths,
                active,
                length,
                buttons: spec.buttons.len(),
                control_offset: spec.control_offset,
                overlap_allowance: spec.overlap_allowance,
            },
            metrics,
        );

        let mut placements = strip.placements.iter();
        for tab in self.tabs.iter_mut() {
            tab.rect = if tab.detached {
                None
            } else {
                placements
                    .next()
                    .copied()
                    .flatten()
                    .map(|p| along(spec.rect, spec.side, p.offset, p.length))
            };
        }

        let button_length = if strip.is_tight() {
            metrics.tight_button_width
        } else {
            metrics.button_width
        };
        let mut controls: Vec<(HeaderButtonKind, String, f64)> = Vec::new();
        if strip.has_dropdown() {
            controls.push((HeaderButtonKind::TabDropdown, spec.dropdown_label.clone(), metrics.tight_button_width));
        }
        controls.extend(spec.buttons.into_iter().map(|(kind, label)| (kind, label, button_length)));
        let total: f64 = controls.iter().map(|(_, _, l)| l).sum();
        let mut offset = (length - total).max(0.0);
        self.buttons = controls
            .into_iter()
            .map(|(kind, label, l)| {
                let rect = along(spec.rect, spec.side, offset, l);
                offset += l;
                HeaderButton { kind, label, rect }
            })
            .collect();

        if !strip.has_dropdown() {
            self.dropdown_open = false;
        }
        self.dropdown_entries = self.build_dropdown(&strip, spec.widths);
        self.strip = strip;
    }

    fn build_dropdown(&self, strip: &TabStrip, widths: &[f64]) -> Vec<DropdownEntry> {
        if !self.dropdown_open {
            return Vec::new();
        }
        let Some(toggle) = self.button(HeaderButtonKind::TabDropdown) else {
            return Vec::new();
        };
        let attached: Vec<&Tab> = self.attached().collect();
        let width = strip
            .dropdown
            .iter()
            .filter_map(|&i| widths.get(i))
            .fold(0.0_f64, |a, &b| a.max(b));
        let height = self.rect.extent(!self.side.is_some_and(Side::is_vertical_edge));
        let x = (toggle.rect.right() - width).max(0.0);
        strip
            .dropdown
            .iter()
            .enumerate()
            .filter_map(|(row, &i)| {
                let tab = attached.get(i)?;
                Some(DropdownEntry {
                    item: tab.item,
                    rect: Rect::new(x, toggle.rect.bottom() + row as f64 * height, width, height),
                    is_active: tab.is_active,
                })
            })
            .collect()
    }

    /// Tab centres along the header axis, for laid-out tabs in visual
    /// order. Used to find a drop insertion point.
    pub fn tab_midpoints(&self) -> Vec<(f64, ItemId)> {
        let vertical = self.side.is_some_and(Side::is_vertical_edge);
        self.attached()
            .filter_map(|t| {
                let r = t.rect?;
                let mid = if vertical {
                    r.y + r.height / 2.0
                } else {
                    r.x + r.width / 2.0
                };
                Some((mid, t.item))
            })
            .collect()
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<HeaderHit> {
        if let Some(entry) = self.dropdown_entries.iter().find(|e| e.rect.contains(x, y)) {
            return Some(HeaderHit::DropdownEntry(entry.item));
        }
        if self.side.is_none() || !self.rect.contains(x, y) {
            return None;
        }
        if let Some(button) = self.buttons.iter().find(|b| b.rect.contains(x, y)) {
            return Some(HeaderHit::Button(button.kind));
        }
        let vertical = self.side.is_some_and(Side::is_vertical_edge);
        for tab in self.attached() {
            let Some(r) = tab.rect else { continue };
            if r.contains(x, y) {
                let (pos, end) = if vertical { (y, r.bottom()) } else { (x, r.right()) };
                return Some(HeaderHit::Tab {
                    item: tab.item,
                    close_zone: end - pos <= self.close_width,
                });
            }
        }
        Some(HeaderHit::Header)
    }
}
