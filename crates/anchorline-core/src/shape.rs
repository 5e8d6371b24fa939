//! Draggable, resizable shapes.

use crate::geometry::{Axis, SNAP_PADDING, snap_offsets_for};
use crate::interaction::{InteractionState, Interactive, ObjectId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Visual kind of a shape. Only affects hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
}

/// A rectangle-like element positioned by its center.
#[derive(Debug, Clone)]
pub struct Shape {
    pub(crate) id: ShapeId,
    kind: ShapeKind,
    center: Point,
    width: f64,
    height: f64,
    padding: f64,
    /// Cached from width, height and padding.
    snap_offsets: [Vec2; 3],
    pub(crate) interaction: InteractionState<Point>,
}

impl Shape {
    /// Create a shape with the default padding.
    pub fn new(kind: ShapeKind, center: Point, width: f64, height: f64) -> Self {
        Self::with_padding(kind, center, width, height, SNAP_PADDING)
    }

    /// Create a shape with an explicit padding.
    pub fn with_padding(kind: ShapeKind, center: Point, width: f64, height: f64, padding: f64) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        Self {
            id: Uuid::new_v4(),
            kind,
            center,
            width,
            height,
            padding,
            snap_offsets: snap_offsets_for(width, height, padding),
            interaction: InteractionState::Idle,
        }
    }

    /// Create a shape filling `rect` (normalized, so either corner order works).
    pub fn from_rect(kind: ShapeKind, rect: Rect, padding: f64) -> Self {
        let rect = rect.abs();
        Self::with_padding(kind, rect.center(), rect.width(), rect.height(), padding)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Near corner, center and far corner offsets, in that order.
    pub fn snap_offsets(&self) -> &[Vec2; 3] {
        &self.snap_offsets
    }

    pub fn set_position(&mut self, center: Point) {
        self.center = center;
    }

    /// Set one coordinate of the center, leaving the other untouched.
    pub fn set_coordinate(&mut self, axis: Axis, value: f64) {
        self.center = axis.with_point(self.center, value);
    }

    pub fn set_dimensions(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.snap_offsets = snap_offsets_for(self.width, self.height, self.padding);
    }

    /// A shape with no area is discarded when a draw ends.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Extent along `axis` including the padding on both sides.
    pub fn padded_extent(&self, axis: Axis) -> f64 {
        axis.extent(self.width, self.height) + self.padding * 2.0
    }

    /// Visible bounds (without padding).
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.width, self.height))
    }

    /// Bounds including the padding.
    pub fn padded_bounds(&self) -> Rect {
        self.bounds().inflate(self.padding, self.padding)
    }
}

impl Interactive for Shape {
    type Origin = Point;

    fn object_id(&self) -> ObjectId {
        ObjectId::Shape(self.id)
    }

    fn interaction(&self) -> &InteractionState<Point> {
        &self.interaction
    }

    fn interaction_mut(&mut self) -> &mut InteractionState<Point> {
        &mut self.interaction
    }

    fn origin(&self) -> Point {
        self.center
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let bounds = self.padded_bounds().inflate(tolerance, tolerance);
        match self.kind {
            ShapeKind::Rectangle => bounds.contains(point),
            ShapeKind::Ellipse => {
                let rx = bounds.width() / 2.0;
                let ry = bounds.height() / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (point.x - self.center.x) / rx;
                let dy = (point.y - self.center.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
        }
    }

    fn drag_to(&mut self, start: Point, delta: Vec2) -> bool {
        let target = start + delta;
        if target == self.center {
            return false;
        }
        self.center = target;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_creation() {
        let shape = Shape::new(ShapeKind::Rectangle, Point::new(100.0, 50.0), 40.0, 20.0);
        assert_eq!(shape.center(), Point::new(100.0, 50.0));
        assert!((shape.width() - 40.0).abs() < f64::EPSILON);
        assert_eq!(shape.snap_offsets()[0], Vec2::new(-24.0, -14.0));
        assert!(!shape.is_selected());
    }

    #[test]
    fn test_set_dimensions_recomputes_offsets() {
        let mut shape = Shape::new(ShapeKind::Rectangle, Point::ZERO, 10.0, 10.0);
        shape.set_dimensions(60.0, 30.0);
        assert_eq!(shape.snap_offsets()[0], Vec2::new(-34.0, -19.0));
        assert_eq!(shape.snap_offsets()[2], Vec2::new(34.0, 19.0));
    }

    #[test]
    fn test_from_rect_normalizes() {
        let rect = Rect::new(100.0, 100.0, 50.0, 80.0);
        let shape = Shape::from_rect(ShapeKind::Ellipse, rect, SNAP_PADDING);
        assert_eq!(shape.center(), Point::new(75.0, 90.0));
        assert!((shape.width() - 50.0).abs() < f64::EPSILON);
        assert!((shape.height() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_degenerate() {
        let shape = Shape::new(ShapeKind::Rectangle, Point::ZERO, 0.0, 10.0);
        assert!(shape.is_degenerate());
        let shape = Shape::new(ShapeKind::Rectangle, Point::ZERO, 5.0, 10.0);
        assert!(!shape.is_degenerate());
    }

    #[test]
    fn test_padded_extent() {
        let shape = Shape::new(ShapeKind::Rectangle, Point::ZERO, 50.0, 70.0);
        assert!((shape.padded_extent(Axis::X) - 58.0).abs() < f64::EPSILON);
        assert!((shape.padded_extent(Axis::Y) - 78.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_rectangle() {
        let shape = Shape::new(ShapeKind::Rectangle, Point::new(50.0, 50.0), 20.0, 20.0);
        assert!(shape.hit_test(Point::new(50.0, 50.0), 0.0));
        // Padding counts as part of the shape.
        assert!(shape.hit_test(Point::new(63.0, 50.0), 0.0));
        assert!(!shape.hit_test(Point::new(70.0, 50.0), 0.0));
    }

    #[test]
    fn test_hit_test_ellipse_excludes_corners() {
        let shape = Shape::new(ShapeKind::Ellipse, Point::new(0.0, 0.0), 92.0, 92.0);
        assert!(shape.hit_test(Point::new(0.0, 49.0), 0.0));
        assert!(!shape.hit_test(Point::new(48.0, 48.0), 0.0));
    }

    #[test]
    fn test_drag_lifecycle() {
        let mut shape = Shape::new(ShapeKind::Rectangle, Point::new(10.0, 10.0), 20.0, 20.0);
        assert!(shape.on_pointer_down(true, Default::default()));
        assert!(shape.interaction().is_dragging());
        assert!(shape.on_pointer_move(Vec2::new(5.0, -3.0)));
        assert_eq!(shape.center(), Point::new(15.0, 7.0));
        // Deltas are measured from the drag start, not accumulated.
        assert!(shape.on_pointer_move(Vec2::new(6.0, -3.0)));
        assert_eq!(shape.center(), Point::new(16.0, 7.0));
        assert!(shape.on_pointer_up());
        assert_eq!(*shape.interaction(), InteractionState::Selected);
        assert!(!shape.on_pointer_move(Vec2::new(100.0, 100.0)));
    }
}
