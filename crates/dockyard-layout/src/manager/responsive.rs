//! Responsive folding of a root row that is too narrow for its columns.

use dockyard_config::Size;

use crate::item::ItemId;

use super::LayoutManager;

impl LayoutManager {
    /// Columns of a root row that fit the container at their minimum width.
    fn fitting_columns(&self, row: ItemId) -> Option<usize> {
        let min_width = self.min_extent(row, false);
        if self.width <= 0.0 || min_width <= 0.0 {
            return None;
        }
        Some(((self.width / min_width).floor() as usize).max(1))
    }

    /// When the root is a row with more columns than fit, move every
    /// component of the right-most columns into the first stack and drop
    /// those columns. The remaining columns share the width evenly.
    pub(super) fn apply_responsive_layout(&mut self) {
        let Some(root) = self.root() else {
            return;
        };
        let Some(item) = self.items.get(root) else {
            return;
        };
        if !item.as_row_or_column().is_some_and(|s| !s.is_column()) {
            return;
        }
        let columns = item.children.clone();
        let Some(fit) = self.fitting_columns(root) else {
            return;
        };
        if columns.len() <= fit {
            return;
        }
        let Some(first_stack) = self
            .subtree(columns[0])
            .into_iter()
            .find(|id| self.items.get(*id).is_some_and(|i| i.is_stack()))
        else {
            return;
        };

        tracing::info!(columns = columns.len(), fit, "folding columns for narrow container");
        for column in &columns[fit..] {
            let components: Vec<ItemId> = self
                .subtree(*column)
                .into_iter()
                .filter(|id| self.items.get(*id).is_some_and(|i| i.is_component()))
                .collect();
            for component in components {
                self.detach_raw(component);
                self.attach_raw(first_stack, component, None);
            }
            self.remove_item_inner(*column);
        }

        if let Some(row) = self.items.get(root).filter(|r| r.is_row_or_column()) {
            let remaining = row.children.clone();
            let share = 100.0 / remaining.len().max(1) as f64;
            for child in remaining {
                if let Some(item) = self.items.get_mut(child) {
                    item.size = Size::percent(share);
                }
            }
        }
        self.update_layout();
        self.emit_state_changed(first_stack);
    }
}
