//! Maximising a stack over the whole layout.
//!
//! The stack keeps its place in the tree. The layout pass shows it over
//! the full container while hiding everything else, so minimising only has
//! to lay the tree out again.

use dockyard_common::ApiError;

use crate::events::{EventPayload, MAXIMISED, MINIMISED};
use crate::item::ItemId;
use crate::Result;

use super::types::Maximised;
use super::LayoutManager;

impl LayoutManager {
    fn require_stack(&self, id: ItemId) -> Result<()> {
        if self.node(id)?.is_stack() {
            Ok(())
        } else {
            Err(ApiError::InvalidTarget("only stacks can be maximised".into()).into())
        }
    }

    /// Maximise `stack`, minimising any other maximised stack first.
    /// Returns false if it already was maximised.
    pub fn maximise_stack(&mut self, stack: ItemId) -> Result<bool> {
        self.require_stack(stack)?;
        if self.maximised_stack() == Some(stack) {
            return Ok(false);
        }
        if let Some(other) = self.maximised_stack() {
            self.minimise_stack(other)?;
        }

        if let Some(state) = self.items.get_mut(stack).and_then(|s| s.as_stack_mut()) {
            state.maximised = true;
        }
        self.maximised = Some(Maximised { stack });
        tracing::debug!(stack = ?stack, "stack maximised");

        self.update_layout();
        self.emit_item_event(stack, MAXIMISED, EventPayload::Item(stack));
        self.emit_state_changed(stack);
        Ok(true)
    }

    /// Restore `stack` to its place. Returns false if it was not maximised.
    pub fn minimise_stack(&mut self, stack: ItemId) -> Result<bool> {
        self.require_stack(stack)?;
        if self.maximised_stack() != Some(stack) {
            return Ok(false);
        }
        self.maximised = None;
        if let Some(state) = self.items.get_mut(stack).and_then(|s| s.as_stack_mut()) {
            state.maximised = false;
        }
        tracing::debug!(stack = ?stack, "stack minimised");

        self.update_layout();
        self.emit_item_event(stack, MINIMISED, EventPayload::Item(stack));
        self.emit_state_changed(stack);
        Ok(true)
    }

    /// Minimise whatever is maximised.
    pub fn minimise(&mut self) -> Result<bool> {
        match self.maximised_stack() {
            Some(stack) => self.minimise_stack(stack),
            None => Ok(false),
        }
    }

    pub fn toggle_maximise(&mut self, stack: ItemId) -> Result<()> {
        if self.maximised_stack() == Some(stack) {
            self.minimise_stack(stack)?;
        } else {
            self.maximise_stack(stack)?;
        }
        Ok(())
    }
}
