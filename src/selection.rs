//! Selection state and the gate that collapses duplicate notifications.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Which end of a selection the user is extending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionDirection {
    Forward,
    Backward,
    #[default]
    None,
}

/// A selection on the editable surface, in `char` offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub direction: SelectionDirection,
}

impl Selection {
    pub const fn new(start: usize, end: usize, direction: SelectionDirection) -> Self {
        Self {
            start,
            end,
            direction,
        }
    }

    /// A collapsed selection at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self::new(offset, offset, SelectionDirection::None)
    }

    /// The end the caret sits on: `start` when selecting backward, `end` otherwise.
    pub const fn anchor(&self) -> usize {
        match self.direction {
            SelectionDirection::Backward => self.start,
            SelectionDirection::Forward | SelectionDirection::None => self.end,
        }
    }

    pub const fn is_collapsed(&self) -> bool {
        self.start >= self.end
    }

    /// Clamp to a text of `len` chars; `start` never exceeds `end`.
    #[must_use]
    pub fn clamped(self, len: usize) -> Self {
        let end = self.end.min(len);
        let start = self.start.min(end);
        Self::new(start, end, self.direction)
    }
}

impl From<(usize, usize, SelectionDirection)> for Selection {
    fn from((start, end, direction): (usize, usize, SelectionDirection)) -> Self {
        Self::new(start, end, direction)
    }
}

/// 1-based number of the line containing char offset `end` of `text`.
///
/// Only `'\n'` counts as a line break.
pub fn count_lines(text: &str, end: usize) -> usize {
    1 + text.chars().take(end).filter(|&ch| ch == '\n').count()
}

/// Work deferred until the host finishes its current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Let native selection notifications through again.
    ReopenSelectionGate,
}

/// FIFO of deferred tasks drained by [`crate::EditorSession::run_deferred`].
#[derive(Debug, Default, Clone)]
pub struct TaskQueue {
    tasks: VecDeque<DeferredTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: DeferredTask) {
        self.tasks.push_back(task);
    }

    /// Take every queued task, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<DeferredTask> {
        self.tasks.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Drops native selection notifications between an update pass and the
/// end of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionGate {
    open: bool,
}

impl SelectionGate {
    pub const fn new() -> Self {
        Self { open: true }
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Close the gate after an update pass.
    ///
    /// Queues the reopen task only when the gate was open, so back-to-back
    /// passes in one turn schedule a single reopen.
    pub fn close(&mut self, queue: &mut TaskQueue) {
        if self.open {
            queue.push(DeferredTask::ReopenSelectionGate);
        }
        self.open = false;
    }

    pub const fn reopen(&mut self) {
        self.open = true;
    }
}

impl Default for SelectionGate {
    fn default() -> Self {
        Self::new()
    }
}
