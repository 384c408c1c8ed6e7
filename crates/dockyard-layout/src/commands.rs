use crate::item::ItemId;

/// User actions triggered from a stack header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    /// Close the whole stack.
    Close(ItemId),
    ToggleMaximise(ItemId),
    /// Pop out the stack, or its active component, into a new window.
    Popout(ItemId),
    /// Dock this popout window's content back into its opener.
    Dock(ItemId),
    CloseTab(ItemId),
    SelectTab(ItemId),
    ToggleDropdown(ItemId),
    SelectFromDropdown(ItemId),
}
