//! Finding items and insertion points.

use crate::item::ItemId;

use super::LayoutManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// Next to the focused component, inside its stack. The selector
    /// index is relative to the focused component's own index.
    FocusedItem,
    FocusedStack,
    FirstStack,
    FirstRowOrColumn,
    FirstRow,
    FirstColumn,
    /// Only matches a layout without a root.
    Empty,
    Root,
}

/// One candidate insertion point. `index: None` means "at the end".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationSelector {
    pub kind: LocationKind,
    pub index: Option<usize>,
}

impl LocationSelector {
    pub const fn new(kind: LocationKind) -> Self {
        Self { kind, index: None }
    }

    pub const fn at(kind: LocationKind, index: usize) -> Self {
        Self {
            kind,
            index: Some(index),
        }
    }
}

/// Tried in order by `add_*` calls that do not name a location.
pub const DEFAULT_LOCATION_SELECTORS: [LocationSelector; 4] = [
    LocationSelector::new(LocationKind::FocusedStack),
    LocationSelector::new(LocationKind::FirstStack),
    LocationSelector::new(LocationKind::FirstRowOrColumn),
    LocationSelector::new(LocationKind::Root),
];

/// Right after the focused component when there is one.
pub const AFTER_FOCUSED_ITEM_LOCATION_SELECTORS: [LocationSelector; 4] = [
    LocationSelector::at(LocationKind::FocusedItem, 1),
    LocationSelector::new(LocationKind::FirstStack),
    LocationSelector::new(LocationKind::FirstRowOrColumn),
    LocationSelector::new(LocationKind::Root),
];

/// A parent and a child index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub parent: ItemId,
    pub index: usize,
}

impl LayoutManager {
    /// `id` and all its descendants, depth first, parents before children.
    pub fn subtree(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let Some(item) = self.items.get(next) else {
                continue;
            };
            out.push(next);
            pending.extend(item.children.iter().rev());
        }
        out
    }

    /// Every item of the tree, ground first.
    pub fn get_all_content_items(&self) -> Vec<ItemId> {
        self.subtree(self.ground)
    }

    pub fn find_items_by_id(&self, id: &str) -> Vec<ItemId> {
        self.get_all_content_items()
            .into_iter()
            .filter(|item| self.items.get(*item).is_some_and(|i| i.has_id(id)))
            .collect()
    }

    pub fn find_first_component_by_type(&self, component_type: &str) -> Option<ItemId> {
        self.get_all_content_items().into_iter().find(|item| {
            self.items
                .get(*item)
                .and_then(|i| i.as_component())
                .is_some_and(|c| c.component_type() == component_type)
        })
    }

    fn first_matching(&self, pred: impl Fn(&crate::item::ContentItem) -> bool) -> Option<ItemId> {
        self.get_all_content_items()
            .into_iter()
            .find(|id| self.items.get(*id).is_some_and(&pred))
    }

    /// First selector that yields a valid location wins.
    pub fn find_first_location(&self, selectors: &[LocationSelector]) -> Option<Location> {
        selectors.iter().find_map(|s| self.find_location(*s))
    }

    pub fn find_location(&self, selector: LocationSelector) -> Option<Location> {
        match selector.kind {
            LocationKind::FocusedItem => {
                let focused = self.focused?;
                let parent = self.items.get(focused)?.parent?;
                let siblings = &self.items.get(parent)?.children;
                let own = siblings.iter().position(|c| *c == focused)?;
                let index = own + selector.index.unwrap_or(1);
                (index <= siblings.len()).then_some(Location { parent, index })
            }
            LocationKind::FocusedStack => {
                let parent = self.items.get(self.focused?)?.parent?;
                self.location_in(parent, selector.index)
            }
            LocationKind::FirstStack => {
                let parent = self.first_matching(|i| i.is_stack())?;
                self.location_in(parent, selector.index)
            }
            LocationKind::FirstRowOrColumn => {
                let parent = self.first_matching(|i| i.is_row_or_column())?;
                self.location_in(parent, selector.index)
            }
            LocationKind::FirstRow => {
                let parent = self.first_matching(|i| {
                    i.as_row_or_column().is_some_and(|s| !s.is_column())
                })?;
                self.location_in(parent, selector.index)
            }
            LocationKind::FirstColumn => {
                let parent =
                    self.first_matching(|i| i.as_row_or_column().is_some_and(|s| s.is_column()))?;
                self.location_in(parent, selector.index)
            }
            LocationKind::Empty => match self.root() {
                None => self.empty_ground_location(selector.index),
                Some(_) => None,
            },
            LocationKind::Root => match self.root() {
                None => self.empty_ground_location(selector.index),
                Some(root) if self.items.get(root).is_some_and(|r| r.is_component()) => None,
                Some(root) => self.location_in(root, selector.index),
            },
        }
    }

    fn empty_ground_location(&self, index: Option<usize>) -> Option<Location> {
        matches!(index, None | Some(0)).then_some(Location {
            parent: self.ground,
            index: 0,
        })
    }

    fn location_in(&self, parent: ItemId, index: Option<usize>) -> Option<Location> {
        let count = self.items.get(parent)?.children.len();
        let index = index.unwrap_or(count);
        (index <= count).then_some(Location { parent, index })
    }
}
