//! Axis-aligned geometry shared by shapes and anchor lines.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Distance (in world units) under which a snap offset attaches to a line.
pub const SNAP_THRESHOLD: f64 = 15.0;

/// Visual margin around every shape. Two adjacent shapes keep a gap of twice this.
pub const SNAP_PADDING: f64 = 4.0;

/// Orientation of an anchor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Extends along x; its position is a y coordinate.
    Horizontal,
    /// Extends along y; its position is an x coordinate.
    Vertical,
}

impl Orientation {
    /// The other orientation.
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Axis the line's scalar position is measured on.
    pub fn perpendicular_axis(self) -> Axis {
        match self {
            Orientation::Horizontal => Axis::Y,
            Orientation::Vertical => Axis::X,
        }
    }

    /// Axis the line extends along (the axis dependents are spread across).
    pub fn parallel_axis(self) -> Axis {
        self.perpendicular_axis().other()
    }
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Read this axis' component of a point.
    pub fn of_point(self, point: Point) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }

    /// Read this axis' component of a vector.
    pub fn of_vec(self, vec: Vec2) -> f64 {
        match self {
            Axis::X => vec.x,
            Axis::Y => vec.y,
        }
    }

    /// Return `point` with this axis' component replaced.
    pub fn with_point(self, point: Point, value: f64) -> Point {
        match self {
            Axis::X => Point::new(value, point.y),
            Axis::Y => Point::new(point.x, value),
        }
    }

    /// Pick the extent along this axis from a width/height pair.
    pub fn extent(self, width: f64, height: f64) -> f64 {
        match self {
            Axis::X => width,
            Axis::Y => height,
        }
    }
}

/// Snap offsets of a `width` x `height` box with `pad` margin, relative to its center.
///
/// Order is fixed: near corner (top/left), center, far corner (bottom/right).
/// Proximity ties resolve to the earliest entry.
pub fn snap_offsets_for(width: f64, height: f64, pad: f64) -> [Vec2; 3] {
    let half_w = width / 2.0 + pad;
    let half_h = height / 2.0 + pad;
    [
        Vec2::new(-half_w, -half_h),
        Vec2::ZERO,
        Vec2::new(half_w, half_h),
    ]
}

/// Signed distance between `a` and `b` along a line's perpendicular axis.
pub fn distance_along(orientation: Orientation, a: Point, b: Point) -> f64 {
    let axis = orientation.perpendicular_axis();
    axis.of_point(a) - axis.of_point(b)
}

/// Whether every component is a finite number.
pub fn is_finite_point(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}
