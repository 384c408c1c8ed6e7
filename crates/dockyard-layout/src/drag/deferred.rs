//! Mutations postponed until the current drag gesture ends.

use crate::header::TabId;
use crate::item::ItemId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredCommand {
    /// Drop a detached tab from a header's tab list.
    RemoveTab { stack: ItemId, tab: TabId },
}

/// FIFO queue; commands run in the order they were deferred.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    commands: Vec<DeferredCommand>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DeferredCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn pending(&self) -> &[DeferredCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<DeferredCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;
    use slotmap::SlotMap;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut map: SlotMap<ItemId, ()> = SlotMap::with_key();
        let stack = map.insert(());
        let (a, b) = (map.insert(()), map.insert(()));
        let mut header = Header::new();
        let ta = header.add_tab(a, 0);
        let tb = header.add_tab(b, 1);

        let mut queue = DeferredQueue::new();
        queue.push(DeferredCommand::RemoveTab { stack, tab: tb });
        queue.push(DeferredCommand::RemoveTab { stack, tab: ta });
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.drain(),
            vec![
                DeferredCommand::RemoveTab { stack, tab: tb },
                DeferredCommand::RemoveTab { stack, tab: ta },
            ]
        );
        assert!(queue.is_empty());
    }
}
