//! Linear undo/redo history of graph snapshots.

use crate::model::GraphSnapshot;

#[derive(Debug, Clone, Default)]
pub struct History {
    /// Older → newer; the last entry is the next undo target.
    past: Vec<GraphSnapshot>,
    /// The last entry is the next redo target.
    future: Vec<GraphSnapshot>,
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        History {
            past: Vec::new(),
            future: Vec::new(),
            limit,
        }
    }

    /// Record the pre-mutation snapshot. Any redo branch is discarded.
    pub fn record(&mut self, before: GraphSnapshot) {
        self.past.push(before);
        self.future.clear();
        if let Some(limit) = self.limit {
            let overflow = self.past.len().saturating_sub(limit);
            if overflow > 0 {
                self.past.drain(..overflow);
            }
        }
    }

    /// Step back. Returns the snapshot to restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: GraphSnapshot) -> Option<GraphSnapshot> {
        let previous = self.past.pop()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward. Returns the snapshot to restore, or `None` if there is nothing to redo.
    pub fn redo(&mut self, current: GraphSnapshot) -> Option<GraphSnapshot> {
        let next = self.future.pop()?;
        self.past.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}
