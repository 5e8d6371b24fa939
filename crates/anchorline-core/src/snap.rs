//! Proximity detection between shapes and anchor lines.
//!
//! The same test serves both directions: a shape dragged near a line
//! attaches to it, and a line dragged near a resting shape locks onto it.

use crate::anchor::AnchorLine;
use crate::geometry::{Orientation, distance_along};
use crate::shape::{Shape, ShapeId};
use kurbo::Vec2;

/// Which of the three snap offsets of a shape matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapPoint {
    /// Top or left edge, padding included.
    NearCorner,
    Center,
    /// Bottom or right edge, padding included.
    FarCorner,
}

impl SnapPoint {
    /// In tie-break order.
    pub const ALL: [SnapPoint; 3] = [SnapPoint::NearCorner, SnapPoint::Center, SnapPoint::FarCorner];
}

/// Result of a successful proximity test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapMatch {
    pub point: SnapPoint,
    /// Offset from the shape center, fixed for the lifetime of an attachment.
    pub offset: Vec2,
    /// `line position - (shape coordinate + offset)`, signed.
    pub distance: f64,
}

/// Find the snap offset of `shape` closest to a line at `position`.
///
/// Returns `None` unless the closest offset lies strictly within `threshold`.
/// Ties keep the earliest offset (near corner, center, far corner).
pub fn closest_snap(shape: &Shape, orientation: Orientation, position: f64, threshold: f64) -> Option<SnapMatch> {
    let center = shape.center();
    let on_line = orientation.perpendicular_axis().with_point(center, position);

    let mut best: Option<SnapMatch> = None;
    for (point, offset) in SnapPoint::ALL.into_iter().zip(shape.snap_offsets().iter().copied()) {
        let distance = distance_along(orientation, on_line, center + offset);
        let closer = best.is_none_or(|b| distance.abs() < b.distance.abs());
        if closer {
            best = Some(SnapMatch { point, offset, distance });
        }
    }

    best.filter(|b| b.distance.abs() < threshold)
}

impl Shape {
    /// Closest snap offset to `line`, if within `threshold`. Pure.
    pub fn closest_snap_to(&self, line: &AnchorLine, threshold: f64) -> Option<SnapMatch> {
        closest_snap(self, line.orientation(), line.position(), threshold)
    }
}

/// Where a dragged line should sit to lock onto a resting shape.
///
/// `raw` is the pointer-derived line position. Each candidate shape is
/// tested against it; the closest match wins, earlier candidates on ties.
/// Returns the locked position and the shape it locked onto.
pub fn line_snap_position<'a>(
    orientation: Orientation,
    raw: f64,
    candidates: impl IntoIterator<Item = &'a Shape>,
    threshold: f64,
) -> Option<(f64, ShapeId)> {
    let axis = orientation.perpendicular_axis();
    let mut best: Option<(SnapMatch, &Shape)> = None;

    for shape in candidates {
        let Some(m) = closest_snap(shape, orientation, raw, threshold) else {
            continue;
        };
        if best.is_none_or(|(b, _)| m.distance.abs() < b.distance.abs()) {
            best = Some((m, shape));
        }
    }

    best.map(|(m, shape)| (axis.of_point(shape.center()) + axis.of_vec(m.offset), shape.id()))
}
