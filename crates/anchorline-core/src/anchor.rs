//! Anchor lines: infinite horizontal or vertical guides that shapes attach to.

use crate::changes::{ChangeLog, SceneChange};
use crate::geometry::{Axis, Orientation};
use crate::interaction::{InteractionState, Interactive, ObjectId};
use crate::shape::{Shape, ShapeId};
use kurbo::{Point, Size, Vec2};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for anchor lines.
pub type LineId = Uuid;

/// Shapes keyed by id, as stored by the scene.
pub type ShapeMap = HashMap<ShapeId, Shape>;

/// A shape attached to a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dependent {
    pub shape: ShapeId,
    /// Snap offset chosen when the attachment formed.
    pub offset: Vec2,
}

/// An infinite guide line holding an ordered set of dependent shapes.
///
/// Every dependent satisfies `coordinate = position - offset` on the line's
/// perpendicular axis after the line or the dependent last moved.
#[derive(Debug, Clone)]
pub struct AnchorLine {
    pub(crate) id: LineId,
    orientation: Orientation,
    position: f64,
    spread: bool,
    dependents: Vec<Dependent>,
    /// Rendered length reported by the host, if any.
    span: Option<f64>,
    pub(crate) interaction: InteractionState<f64>,
}

impl AnchorLine {
    pub fn new(orientation: Orientation, position: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            orientation,
            position,
            spread: false,
            dependents: Vec::new(),
            span: None,
            interaction: InteractionState::Idle,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Offset along the perpendicular axis (y for horizontal lines, x for vertical).
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_spread(&self) -> bool {
        self.spread
    }

    pub fn dependents(&self) -> &[Dependent] {
        &self.dependents
    }

    pub fn contains(&self, shape: ShapeId) -> bool {
        self.dependents.iter().any(|d| d.shape == shape)
    }

    /// Offset a shape was attached with.
    pub fn offset_of(&self, shape: ShapeId) -> Option<Vec2> {
        self.dependents.iter().find(|d| d.shape == shape).map(|d| d.offset)
    }

    pub fn span(&self) -> Option<f64> {
        self.span
    }

    pub fn set_span(&mut self, span: Option<f64>) {
        self.span = span;
    }

    /// Length used when spreading: the reported span, or the viewport extent
    /// along the line.
    pub fn length(&self, viewport: Size) -> f64 {
        self.span.unwrap_or(match self.orientation.parallel_axis() {
            Axis::X => viewport.width,
            Axis::Y => viewport.height,
        })
    }

    /// Move the line. Dependents stay put until [`push_to_dependents`](Self::push_to_dependents).
    pub fn set_position(&mut self, position: f64) {
        self.position = position;
    }

    /// Returns `true` if the flag changed. Does not redistribute.
    pub fn set_spread(&mut self, spread: bool) -> bool {
        let changed = self.spread != spread;
        self.spread = spread;
        changed
    }

    /// Flip orientation in place. The scalar position keeps its value but now
    /// denotes the other axis. Dependents are left untouched.
    pub fn switch_direction(&mut self) {
        self.orientation = self.orientation.flipped();
    }

    /// Remove every dependent, returning them in order.
    pub fn take_dependents(&mut self) -> Vec<Dependent> {
        std::mem::take(&mut self.dependents)
    }

    fn place(&self, dependent: Dependent, shape: &mut Shape, changes: &mut ChangeLog) {
        let axis = self.orientation.perpendicular_axis();
        shape.set_coordinate(axis, self.position - axis.of_vec(dependent.offset));
        changes.shape_moved(shape.id(), shape.center());
    }

    /// Align every dependent's perpendicular coordinate with the line.
    /// The parallel coordinate is left alone.
    pub fn push_to_dependents(&self, shapes: &mut ShapeMap, changes: &mut ChangeLog) {
        for &dependent in &self.dependents {
            if let Some(shape) = shapes.get_mut(&dependent.shape) {
                self.place(dependent, shape, changes);
            }
        }
    }

    /// Attach `shape` with `offset` and pull it onto the line.
    ///
    /// A shape already attached keeps its first offset. Spread lines
    /// redistribute afterwards. Returns `true` if the shape was newly attached.
    pub fn attach(
        &mut self,
        shape: ShapeId,
        offset: Vec2,
        shapes: &mut ShapeMap,
        length: f64,
        changes: &mut ChangeLog,
    ) -> bool {
        let added = !self.contains(shape);
        if added {
            self.dependents.push(Dependent { shape, offset });
            log::debug!("line {} attached shape {} at offset {:?}", self.id, shape, offset);
        }

        let dependent = self.dependents.iter().copied().find(|d| d.shape == shape);
        if let (Some(dependent), Some(target)) = (dependent, shapes.get_mut(&shape)) {
            self.place(dependent, target, changes);
        }

        if self.spread {
            self.redistribute(shapes, length, changes);
        }
        added
    }

    /// Detach `shape`. Spread lines redistribute the remaining dependents
    /// when something was removed. Returns `true` if the shape was attached.
    pub fn detach(&mut self, shape: ShapeId, shapes: &mut ShapeMap, length: f64, changes: &mut ChangeLog) -> bool {
        let before = self.dependents.len();
        self.dependents.retain(|d| d.shape != shape);
        let removed = self.dependents.len() != before;
        if removed {
            log::debug!("line {} detached shape {}", self.id, shape);
            if self.spread {
                self.redistribute(shapes, length, changes);
            }
        }
        removed
    }

    /// Lay dependents out evenly over `length` along the line.
    ///
    /// Dependents are ordered by their current coordinate along the line
    /// (stable), then placed with equal gaps before, between and after them.
    /// Oversubscribed lines produce negative gaps and overlapping shapes.
    pub fn redistribute(&mut self, shapes: &mut ShapeMap, length: f64, changes: &mut ChangeLog) {
        self.dependents.retain(|d| shapes.contains_key(&d.shape));
        if self.dependents.is_empty() {
            return;
        }

        let axis = self.orientation.parallel_axis();
        let coordinate = |d: &Dependent| shapes.get(&d.shape).map_or(0.0, |s| axis.of_point(s.center()));
        self.dependents
            .sort_by(|a, b| coordinate(a).total_cmp(&coordinate(b)));

        let extents: Vec<f64> = self
            .dependents
            .iter()
            .map(|d| shapes.get(&d.shape).map_or(0.0, |s| s.padded_extent(axis)))
            .collect();
        let centers = even_spread(&extents, length);
        log::debug!(
            "line {} spreading {} dependents over {}",
            self.id,
            self.dependents.len(),
            length
        );

        for (&dependent, center) in self.dependents.iter().zip(centers) {
            if let Some(shape) = shapes.get_mut(&dependent.shape) {
                shape.set_coordinate(axis, center);
                self.place(dependent, shape, changes);
            }
        }
    }

    /// Drop a dependent without any repositioning. Used when another line claims it.
    pub(crate) fn evict(&mut self, shape: ShapeId) -> bool {
        let before = self.dependents.len();
        self.dependents.retain(|d| d.shape != shape);
        self.dependents.len() != before
    }

    pub(crate) fn spread_change(&self) -> SceneChange {
        SceneChange::SpreadChanged {
            id: self.id,
            spread: self.spread,
        }
    }
}

/// Centers of items with the given extents spread evenly over `0..length`.
///
/// The free space `length - sum(extents)` is split into `n + 1` equal gaps.
pub fn even_spread(extents: &[f64], length: f64) -> Vec<f64> {
    if extents.is_empty() {
        return Vec::new();
    }
    let occupied: f64 = extents.iter().sum();
    let gap = (length - occupied) / (extents.len() + 1) as f64;

    let mut distance = 0.0;
    extents
        .iter()
        .map(|extent| {
            distance += gap + extent / 2.0;
            let center = distance;
            distance += extent / 2.0;
            center
        })
        .collect()
}

impl Interactive for AnchorLine {
    type Origin = f64;

    fn object_id(&self) -> ObjectId {
        ObjectId::Line(self.id)
    }

    fn interaction(&self) -> &InteractionState<f64> {
        &self.interaction
    }

    fn interaction_mut(&mut self) -> &mut InteractionState<f64> {
        &mut self.interaction
    }

    fn origin(&self) -> f64 {
        self.position
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let axis = self.orientation.perpendicular_axis();
        (axis.of_point(point) - self.position).abs() <= tolerance
    }

    fn drag_to(&mut self, start: f64, delta: Vec2) -> bool {
        let target = start + self.orientation.perpendicular_axis().of_vec(delta);
        if target == self.position {
            return false;
        }
        self.position = target;
        true
    }
}
