// ============================================================================
// HISTORY — bounded snapshot undo/redo stacks
// ============================================================================

use std::collections::VecDeque;

use crate::canvas::{Color, PixelCanvas};

/// Default number of undo steps kept per editing session.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Immutable value copy of one canvas state. Owns its buffer outright, so
/// later mutation of the live canvas can never corrupt a stored step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasSnapshot {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl CanvasSnapshot {
    pub fn capture(canvas: &PixelCanvas) -> Self {
        Self {
            width: canvas.width(),
            height: canvas.height(),
            pixels: canvas.pixels().to_vec(),
        }
    }

    /// Rebuild a live canvas from this snapshot.
    pub fn restore(&self) -> PixelCanvas {
        PixelCanvas::from_pixels(self.width, self.height, self.pixels.clone())
            .expect("snapshot was captured from a valid canvas")
    }
}

/// Undo/redo manager over two bounded stacks. Generic so it can hold any
/// snapshot value; the editor instantiates it with [`CanvasSnapshot`].
pub struct HistoryManager<T> {
    undo_stack: VecDeque<T>,
    redo_stack: VecDeque<T>,
    max_depth: usize,
}

impl<T> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl<T> HistoryManager<T> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a pre-gesture state. A new edit invalidates the redo branch;
    /// the oldest entry is evicted once the depth bound is hit.
    pub fn save_state(&mut self, snapshot: T) {
        self.redo_stack.clear();
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Pop the state to return to, parking `current` on the redo stack.
    /// `None` (and `current` dropped) when there is nothing to undo.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let snapshot = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current);
        Some(snapshot)
    }

    /// Inverse of [`undo`](Self::undo).
    pub fn redo(&mut self, current: T) -> Option<T> {
        let snapshot = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop both stacks (document load).
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
