//! Tool system for the editor.

use crate::geometry::Orientation;
use crate::shape::{ShapeId, ShapeKind};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Ellipse,
    HorizontalLine,
    VerticalLine,
}

impl ToolKind {
    /// Shape drawn by this tool, if it draws shapes.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Ellipse => Some(ShapeKind::Ellipse),
            _ => None,
        }
    }

    /// Orientation of the line placed by this tool, if it places lines.
    pub fn line_orientation(self) -> Option<Orientation> {
        match self {
            ToolKind::HorizontalLine => Some(Orientation::Horizontal),
            ToolKind::VerticalLine => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// A shape is being drawn from `origin` to the pointer.
    Drawing { shape: ShapeId, origin: Point },
    /// A marquee selection is in progress.
    Selecting {
        origin: Point,
        current: Point,
        /// Shapes kept selected because the multi-select modifier was held.
        retained: Vec<ShapeId>,
    },
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any interaction in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    pub fn begin_drawing(&mut self, shape: ShapeId, origin: Point) {
        self.state = ToolState::Drawing { shape, origin };
    }

    pub fn begin_selecting(&mut self, origin: Point, retained: Vec<ShapeId>) {
        self.state = ToolState::Selecting {
            origin,
            current: origin,
            retained,
        };
    }

    /// Update the marquee corner. No-op unless selecting.
    pub fn update_selecting(&mut self, point: Point) {
        if let ToolState::Selecting { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// End the interaction, returning its final state.
    pub fn finish(&mut self) -> ToolState {
        std::mem::take(&mut self.state)
    }
}

/// Rectangle spanned by two drag corners, in either order.
pub fn drag_rect(origin: Point, current: Point) -> Rect {
    Rect::from_points(origin, current)
}
