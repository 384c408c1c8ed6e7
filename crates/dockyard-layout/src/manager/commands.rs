use crate::commands::HeaderAction;
use crate::Result;

use super::LayoutManager;

impl LayoutManager {
    /// Run a header action. Returns whether it changed anything.
    pub fn execute_header_action(&mut self, action: HeaderAction) -> Result<bool> {
        tracing::debug!(?action, "header action");
        match action {
            HeaderAction::Close(stack) | HeaderAction::CloseTab(stack) => self.close_item(stack),
            HeaderAction::ToggleMaximise(stack) => {
                self.toggle_maximise(stack)?;
                Ok(true)
            }
            HeaderAction::Popout(stack) => {
                let target = if self.settings.popout_whole_stack {
                    Some(stack)
                } else {
                    self.node(stack)?.as_stack().and_then(|s| s.active())
                };
                match target {
                    Some(target) => Ok(self.create_popout(target)?.is_some()),
                    None => Ok(false),
                }
            }
            HeaderAction::Dock(_) => self.dock(),
            HeaderAction::SelectTab(item) => {
                self.set_active_component_item(item, true)?;
                Ok(true)
            }
            HeaderAction::ToggleDropdown(stack) => {
                self.close_dropdowns(Some(stack));
                let open = self
                    .items
                    .get_mut(stack)
                    .and_then(|i| i.as_stack_mut())
                    .is_some_and(|s| s.header.toggle_dropdown());
                self.update_layout();
                Ok(open)
            }
            HeaderAction::SelectFromDropdown(item) => {
                let stack = self.node(item)?.parent;
                let reorder = self.settings.reorder_on_tab_menu_click;
                if let Some(state) = stack.and_then(|s| self.items.get_mut(s)).and_then(|s| s.as_stack_mut()) {
                    if reorder {
                        state.header.move_to_front(item);
                    }
                    state.header.close_dropdown();
                }
                self.set_active_component_item(item, true)?;
                self.update_layout();
                Ok(true)
            }
        }
    }
}
