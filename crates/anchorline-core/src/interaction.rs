//! Per-object interaction state and uniform event dispatch.
//!
//! Shapes and anchor lines remain plain data; this module gives both the
//! same Idle → Selected → Dragging state machine so the scene can route
//! pointer and key events without knowing which kind of object it holds.

use crate::anchor::LineId;
use crate::input::{KeyCode, Modifiers};
use crate::shape::ShapeId;
use kurbo::{Point, Vec2};

/// Identity of any object living in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectId {
    Shape(ShapeId),
    Line(LineId),
}

/// Interaction state of a single object.
///
/// `P` is what the object remembers when a drag starts: a center point for
/// shapes, a scalar position for lines.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState<P> {
    #[default]
    Idle,
    Selected,
    /// Being dragged; `start` is the position at pointer-down.
    Dragging { start: P },
}

impl<P: Copy> InteractionState<P> {
    /// Selected or dragging.
    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected | Self::Dragging { .. })
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Position recorded when the current drag started.
    pub fn drag_start(&self) -> Option<P> {
        match self {
            Self::Dragging { start } => Some(*start),
            _ => None,
        }
    }
}

/// Capability shared by every object the scene dispatches events to.
pub trait Interactive {
    /// Position snapshot taken at drag start.
    type Origin: Copy;

    fn object_id(&self) -> ObjectId;

    fn interaction(&self) -> &InteractionState<Self::Origin>;

    fn interaction_mut(&mut self) -> &mut InteractionState<Self::Origin>;

    /// Current position, as remembered when a drag starts.
    fn origin(&self) -> Self::Origin;

    /// Whether `point` lies on this object.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Move to `start + delta`. Returns `true` if the position changed.
    fn drag_to(&mut self, start: Self::Origin, delta: Vec2) -> bool;

    fn is_selected(&self) -> bool {
        self.interaction().is_selected()
    }

    fn set_selected(&mut self, selected: bool) {
        let state = self.interaction_mut();
        *state = if selected {
            match *state {
                InteractionState::Idle => InteractionState::Selected,
                other => other,
            }
        } else {
            InteractionState::Idle
        };
    }

    /// Handle a pointer press. `hit` tells whether the press landed on this
    /// object; the scene has already cleared other selections when needed.
    ///
    /// Returns `true` when the press was consumed by this object.
    fn on_pointer_down(&mut self, hit: bool, modifiers: Modifiers) -> bool {
        let origin = self.origin();
        if hit {
            *self.interaction_mut() = InteractionState::Dragging { start: origin };
            return true;
        }
        if self.is_selected() {
            if modifiers.multi_select() {
                // Selected objects follow the one being pressed.
                *self.interaction_mut() = InteractionState::Dragging { start: origin };
            } else {
                *self.interaction_mut() = InteractionState::Idle;
            }
        }
        false
    }

    /// Apply the drag delta while dragging. Returns `true` if the object moved.
    fn on_pointer_move(&mut self, delta: Vec2) -> bool {
        match self.interaction().drag_start() {
            Some(start) => self.drag_to(start, delta),
            None => false,
        }
    }

    /// End a drag. Returns `true` if a drag was in progress.
    fn on_pointer_up(&mut self) -> bool {
        if self.interaction().is_dragging() {
            *self.interaction_mut() = InteractionState::Selected;
            true
        } else {
            false
        }
    }

    /// Whether this key press asks for the object to be deleted.
    fn on_key_down(&self, key: KeyCode) -> bool {
        self.is_selected() && key.is_delete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_flags() {
        let idle: InteractionState<f64> = InteractionState::Idle;
        assert!(!idle.is_selected());
        assert!(!idle.is_dragging());

        let selected: InteractionState<f64> = InteractionState::Selected;
        assert!(selected.is_selected());
        assert!(selected.drag_start().is_none());

        let dragging = InteractionState::Dragging { start: 12.0 };
        assert!(dragging.is_selected());
        assert!(dragging.is_dragging());
        assert_eq!(dragging.drag_start(), Some(12.0));
    }
}
