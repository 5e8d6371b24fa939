//! Change notifications for the renderer.
//!
//! The engine never draws anything. Every mutation of a field the renderer
//! cares about is recorded here, and the host drains the log after each
//! event to update its visual surface.

use crate::anchor::LineId;
use crate::geometry::Orientation;
use crate::interaction::ObjectId;
use crate::shape::{ShapeId, ShapeKind};
use kurbo::Point;

/// A single observable change.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneChange {
    ShapeAdded { id: ShapeId, kind: ShapeKind },
    ShapeRemoved { id: ShapeId },
    ShapeMoved { id: ShapeId, center: Point },
    ShapeResized { id: ShapeId, width: f64, height: f64 },
    LineAdded { id: LineId, orientation: Orientation, position: f64 },
    LineRemoved { id: LineId },
    LineMoved { id: LineId, position: f64 },
    LineReoriented { id: LineId, orientation: Orientation },
    SpreadChanged { id: LineId, spread: bool },
    SelectionChanged { object: ObjectId, selected: bool },
    Attached { line: LineId, shape: ShapeId },
    Detached { line: LineId, shape: ShapeId },
}

/// Ordered queue of pending changes.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    changes: Vec<SceneChange>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: SceneChange) {
        log::trace!("change: {:?}", change);
        self.changes.push(change);
    }

    pub fn shape_moved(&mut self, id: ShapeId, center: Point) {
        self.push(SceneChange::ShapeMoved { id, center });
    }

    pub fn line_moved(&mut self, id: LineId, position: f64) {
        self.push(SceneChange::LineMoved { id, position });
    }

    /// Pending changes, oldest first.
    pub fn pending(&self) -> &[SceneChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Take every pending change, leaving the log empty.
    pub fn drain(&mut self) -> Vec<SceneChange> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_drain_empties_log() {
        let mut log = ChangeLog::new();
        let id = Uuid::new_v4();
        log.shape_moved(id, Point::new(1.0, 2.0));
        log.push(SceneChange::ShapeRemoved { id });
        assert_eq!(log.pending().len(), 2);

        let drained = log.drain();
        assert_eq!(drained[0], SceneChange::ShapeMoved { id, center: Point::new(1.0, 2.0) });
        assert!(log.is_empty());
    }
}
