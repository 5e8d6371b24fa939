//! The scene: every shape and anchor line of one editing session.

use crate::anchor::{AnchorLine, Dependent, LineId, ShapeMap};
use crate::changes::{ChangeLog, SceneChange};
use crate::config::{DirectionSwitchPolicy, EngineConfig, SpreadClaimPolicy};
use crate::error::{SceneError, SceneResult};
use crate::geometry::{Orientation, is_finite_point};
use crate::interaction::{Interactive, ObjectId};
use crate::shape::{Shape, ShapeId, ShapeKind};
use crate::tools::ToolManager;
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::HashMap;

/// Live set of shapes and lines plus selection, drag and tool state.
///
/// The scene is the context every cross-object operation runs against:
/// attachment scans, spread claims and commands over the selection.
/// All mutation happens synchronously inside one event handler at a time.
#[derive(Debug, Clone)]
pub struct Scene {
    pub(crate) config: EngineConfig,
    pub(crate) shapes: ShapeMap,
    /// Creation order of shapes (back to front).
    pub(crate) shape_order: Vec<ShapeId>,
    pub(crate) lines: HashMap<LineId, AnchorLine>,
    /// Creation order of lines (back to front).
    pub(crate) line_order: Vec<LineId>,
    /// Reverse attachment index: the lines each shape depends on.
    attachments: HashMap<ShapeId, Vec<LineId>>,
    /// Tool manager.
    pub tools: ToolManager,
    /// Pointer position at the last press, while the pointer is down.
    pub(crate) drag_anchor: Option<Point>,
    pub(crate) changes: ChangeLog,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Scene {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            shapes: ShapeMap::new(),
            shape_order: Vec::new(),
            lines: HashMap::new(),
            line_order: Vec::new(),
            attachments: HashMap::new(),
            tools: ToolManager::new(),
            drag_anchor: None,
            changes: ChangeLog::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.config.viewport
    }

    /// Record the size of the drawing surface reported by the renderer.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.config.viewport = Size::new(width, height);
    }

    /// Record the rendered length of a line. `None` falls back to the viewport.
    pub fn set_line_span(&mut self, id: LineId, span: Option<f64>) -> SceneResult<()> {
        self.line_mut(id)?.set_span(span);
        Ok(())
    }

    // --- Lookup -----------------------------------------------------------

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn line(&self, id: LineId) -> Option<&AnchorLine> {
        self.lines.get(&id)
    }

    fn line_mut(&mut self, id: LineId) -> SceneResult<&mut AnchorLine> {
        self.lines.get_mut(&id).ok_or(SceneError::UnknownLine(id))
    }

    /// Shapes in creation order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shape_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Lines in creation order.
    pub fn lines(&self) -> impl Iterator<Item = &AnchorLine> {
        self.line_order.iter().filter_map(|id| self.lines.get(id))
    }

    /// Every line except `id`, in creation order.
    pub fn other_lines(&self, id: LineId) -> impl Iterator<Item = &AnchorLine> {
        self.lines().filter(move |line| line.id() != id)
    }

    /// Lines `shape` is currently attached to.
    pub fn lines_of(&self, shape: ShapeId) -> &[LineId] {
        self.attachments.get(&shape).map_or(&[], Vec::as_slice)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.lines.is_empty()
    }

    // --- Notifications ------------------------------------------------------

    /// Changes recorded since the last drain.
    pub fn pending_changes(&self) -> &[SceneChange] {
        self.changes.pending()
    }

    /// Hand every pending change to the renderer.
    pub fn take_changes(&mut self) -> Vec<SceneChange> {
        self.changes.drain()
    }

    // --- Creation and removal ----------------------------------------------

    /// Add an existing shape.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        log::info!("adding {:?} shape {} at {:?}", shape.kind(), id, shape.center());
        self.changes.push(SceneChange::ShapeAdded { id, kind: shape.kind() });
        self.changes.shape_moved(id, shape.center());
        self.changes.push(SceneChange::ShapeResized {
            id,
            width: shape.width(),
            height: shape.height(),
        });
        self.shapes.insert(id, shape);
        self.shape_order.push(id);
        id
    }

    /// Create a shape filling `rect` and attach it to any line it lands near.
    pub fn create_shape(&mut self, kind: ShapeKind, rect: Rect) -> SceneResult<ShapeId> {
        if !is_finite_point(rect.origin()) || !is_finite_point(Point::new(rect.x1, rect.y1)) {
            return Err(SceneError::InvalidGeometry(format!("non-finite rect {rect:?}")));
        }
        let shape = Shape::from_rect(kind, rect, self.config.padding);
        if shape.is_degenerate() {
            return Err(SceneError::DegenerateShape {
                width: shape.width(),
                height: shape.height(),
            });
        }
        let id = self.add_shape(shape);
        self.resolve_attachments(id)?;
        Ok(id)
    }

    /// Add an existing line.
    pub fn add_line(&mut self, line: AnchorLine) -> LineId {
        let id = line.id();
        log::info!("adding {:?} line {} at {}", line.orientation(), id, line.position());
        self.changes.push(SceneChange::LineAdded {
            id,
            orientation: line.orientation(),
            position: line.position(),
        });
        self.lines.insert(id, line);
        self.line_order.push(id);
        id
    }

    pub fn create_line(&mut self, orientation: Orientation, position: f64) -> SceneResult<LineId> {
        if !position.is_finite() {
            return Err(SceneError::InvalidGeometry(format!("non-finite line position {position}")));
        }
        Ok(self.add_line(AnchorLine::new(orientation, position)))
    }

    /// Remove a shape, detaching it from every line first.
    pub fn remove_shape(&mut self, id: ShapeId) -> SceneResult<Shape> {
        if !self.shapes.contains_key(&id) {
            return Err(SceneError::UnknownShape(id));
        }
        for line in self.lines_of(id).to_vec() {
            self.detach(line, id)?;
        }
        self.attachments.remove(&id);
        self.shape_order.retain(|s| *s != id);
        let shape = self.shapes.remove(&id).ok_or(SceneError::UnknownShape(id))?;
        log::info!("removed shape {}", id);
        self.changes.push(SceneChange::ShapeRemoved { id });
        Ok(shape)
    }

    /// Remove a line. Its dependents stay where they are.
    pub fn remove_line(&mut self, id: LineId) -> SceneResult<AnchorLine> {
        let mut line = self.lines.remove(&id).ok_or(SceneError::UnknownLine(id))?;
        self.line_order.retain(|l| *l != id);
        for dependent in line.take_dependents() {
            self.unlink(dependent.shape, id);
            self.changes.push(SceneChange::Detached {
                line: id,
                shape: dependent.shape,
            });
        }
        log::info!("removed line {}", id);
        self.changes.push(SceneChange::LineRemoved { id });
        Ok(line)
    }

    // --- Geometry -------------------------------------------------------------

    pub fn set_shape_position(&mut self, id: ShapeId, center: Point) -> SceneResult<()> {
        let shape = self.shapes.get_mut(&id).ok_or(SceneError::UnknownShape(id))?;
        shape.set_position(center);
        self.changes.shape_moved(id, center);
        Ok(())
    }

    pub fn set_shape_dimensions(&mut self, id: ShapeId, width: f64, height: f64) -> SceneResult<()> {
        let shape = self.shapes.get_mut(&id).ok_or(SceneError::UnknownShape(id))?;
        shape.set_dimensions(width, height);
        self.changes.push(SceneChange::ShapeResized {
            id,
            width: shape.width(),
            height: shape.height(),
        });
        Ok(())
    }

    /// Move a line and carry its dependents along.
    pub fn set_line_position(&mut self, id: LineId, position: f64) -> SceneResult<()> {
        let line = self.lines.get_mut(&id).ok_or(SceneError::UnknownLine(id))?;
        line.set_position(position);
        self.changes.line_moved(id, position);
        line.push_to_dependents(&mut self.shapes, &mut self.changes);
        Ok(())
    }

    // --- Attachments ----------------------------------------------------------

    fn link(&mut self, shape: ShapeId, line: LineId) {
        let lines = self.attachments.entry(shape).or_default();
        if !lines.contains(&line) {
            lines.push(line);
        }
    }

    fn unlink(&mut self, shape: ShapeId, line: LineId) {
        if let Some(lines) = self.attachments.get_mut(&shape) {
            lines.retain(|l| *l != line);
            if lines.is_empty() {
                self.attachments.remove(&shape);
            }
        }
    }

    /// Attach `shape` to `line` with `offset`. Returns `true` if newly attached.
    pub fn attach(&mut self, line_id: LineId, shape: ShapeId, offset: Vec2) -> SceneResult<bool> {
        if !self.shapes.contains_key(&shape) {
            return Err(SceneError::UnknownShape(shape));
        }
        let viewport = self.config.viewport;
        let line = self.lines.get_mut(&line_id).ok_or(SceneError::UnknownLine(line_id))?;
        let length = line.length(viewport);
        let added = line.attach(shape, offset, &mut self.shapes, length, &mut self.changes);
        let spread = line.is_spread();

        if added {
            self.link(shape, line_id);
            self.changes.push(SceneChange::Attached { line: line_id, shape });
        }
        if spread {
            self.claim(line_id)?;
        }
        Ok(added)
    }

    /// Detach `shape` from `line`. Returns `true` if it was attached.
    pub fn detach(&mut self, line_id: LineId, shape: ShapeId) -> SceneResult<bool> {
        let viewport = self.config.viewport;
        let line = self.lines.get_mut(&line_id).ok_or(SceneError::UnknownLine(line_id))?;
        let length = line.length(viewport);
        let removed = line.detach(shape, &mut self.shapes, length, &mut self.changes);
        if removed {
            self.unlink(shape, line_id);
            self.changes.push(SceneChange::Detached { line: line_id, shape });
        }
        Ok(removed)
    }

    /// Re-run the proximity test of `shape` against every line, attaching
    /// where a snap offset is in range and detaching everywhere else.
    pub fn resolve_attachments(&mut self, shape_id: ShapeId) -> SceneResult<()> {
        let threshold = self.config.snap_threshold;
        for line_id in self.line_order.clone() {
            // Earlier attachments in this pass may have moved the shape.
            let (Some(shape), Some(line)) = (self.shapes.get(&shape_id), self.lines.get(&line_id)) else {
                continue;
            };
            match shape.closest_snap_to(line, threshold) {
                Some(found) => {
                    log::trace!("shape {} near line {} ({:?})", shape_id, line_id, found.point);
                    self.attach(line_id, shape_id, found.offset)?;
                }
                None => {
                    self.detach(line_id, shape_id)?;
                }
            }
        }
        Ok(())
    }

    /// Attach every shape in range of `line_id` that is not yet a dependent.
    pub(crate) fn capture_nearby(&mut self, line_id: LineId) -> SceneResult<()> {
        let threshold = self.config.snap_threshold;
        let line = self.lines.get(&line_id).ok_or(SceneError::UnknownLine(line_id))?;
        let found: Vec<(ShapeId, Vec2)> = self
            .shapes()
            .filter(|shape| !line.contains(shape.id()))
            .filter_map(|shape| shape.closest_snap_to(line, threshold).map(|m| (shape.id(), m.offset)))
            .collect();
        for (shape, offset) in found {
            self.attach(line_id, shape, offset)?;
        }
        Ok(())
    }

    /// Evenly distribute the dependents of a line, then claim them.
    pub fn redistribute(&mut self, line_id: LineId) -> SceneResult<()> {
        let viewport = self.config.viewport;
        let line = self.lines.get_mut(&line_id).ok_or(SceneError::UnknownLine(line_id))?;
        let length = line.length(viewport);
        line.redistribute(&mut self.shapes, length, &mut self.changes);
        self.claim(line_id)
    }

    /// A spreading line owns its dependents: remove them from every other
    /// line, applying the configured [`SpreadClaimPolicy`].
    fn claim(&mut self, line_id: LineId) -> SceneResult<()> {
        let line = self.lines.get(&line_id).ok_or(SceneError::UnknownLine(line_id))?;
        let dependents: Vec<ShapeId> = line.dependents().iter().map(|d| d.shape).collect();
        let claimed: Vec<(ShapeId, LineId)> = self
            .other_lines(line_id)
            .flat_map(|other| {
                dependents
                    .iter()
                    .filter(|shape| other.contains(**shape))
                    .map(move |shape| (*shape, other.id()))
            })
            .collect();

        for (shape, other) in claimed {
            let Some(loser) = self.lines.get_mut(&other) else {
                continue;
            };
            if !loser.evict(shape) {
                continue;
            }
            log::debug!("line {} claimed shape {} from line {}", line_id, shape, other);
            if self.config.spread_claim == SpreadClaimPolicy::EvictAndDisableSpread && loser.set_spread(false) {
                self.changes.push(loser.spread_change());
            }
            self.unlink(shape, other);
            self.changes.push(SceneChange::Detached { line: other, shape });
        }
        Ok(())
    }

    /// Turn spreading on or off. Turning it on redistributes immediately.
    pub fn set_spread(&mut self, line_id: LineId, spread: bool) -> SceneResult<bool> {
        let line = self.line_mut(line_id)?;
        if !line.set_spread(spread) {
            return Ok(false);
        }
        let change = line.spread_change();
        self.changes.push(change);
        if spread {
            self.redistribute(line_id)?;
        }
        Ok(true)
    }

    /// Flip a line between horizontal and vertical according to the
    /// configured [`DirectionSwitchPolicy`].
    pub fn switch_direction(&mut self, line_id: LineId) -> SceneResult<()> {
        let policy = self.config.direction_switch;
        let line = self.line_mut(line_id)?;
        let dependents: Vec<Dependent> = match policy {
            DirectionSwitchPolicy::Forbid if !line.dependents().is_empty() => {
                return Err(SceneError::LineHasDependents(line_id));
            }
            _ => line.take_dependents(),
        };
        line.switch_direction();
        let orientation = line.orientation();

        for dependent in dependents {
            self.unlink(dependent.shape, line_id);
            self.changes.push(SceneChange::Detached {
                line: line_id,
                shape: dependent.shape,
            });
        }
        log::debug!("line {} switched to {:?}", line_id, orientation);
        self.changes.push(SceneChange::LineReoriented { id: line_id, orientation });
        Ok(())
    }

    // --- Selection -----------------------------------------------------------

    pub fn is_selected(&self, object: ObjectId) -> bool {
        match object {
            ObjectId::Shape(id) => self.shapes.get(&id).is_some_and(|s| s.is_selected()),
            ObjectId::Line(id) => self.lines.get(&id).is_some_and(|l| l.is_selected()),
        }
    }

    /// Set the selection flag of one object. Returns `true` if it changed.
    pub fn set_selected(&mut self, object: ObjectId, selected: bool) -> bool {
        let before = self.is_selected(object);
        match object {
            ObjectId::Shape(id) => {
                if let Some(shape) = self.shapes.get_mut(&id) {
                    shape.set_selected(selected);
                }
            }
            ObjectId::Line(id) => {
                if let Some(line) = self.lines.get_mut(&id) {
                    line.set_selected(selected);
                }
            }
        }
        let after = self.is_selected(object);
        if before != after {
            self.changes.push(SceneChange::SelectionChanged { object, selected: after });
        }
        before != after
    }

    /// Every object id, lines first, each group in creation order.
    pub fn objects(&self) -> Vec<ObjectId> {
        self.line_order
            .iter()
            .map(|id| ObjectId::Line(*id))
            .chain(self.shape_order.iter().map(|id| ObjectId::Shape(*id)))
            .collect()
    }

    pub fn select_all(&mut self) -> bool {
        let mut changed = false;
        for object in self.objects() {
            changed |= self.set_selected(object, true);
        }
        changed
    }

    pub fn deselect_all(&mut self) -> bool {
        let mut changed = false;
        for object in self.objects() {
            changed |= self.set_selected(object, false);
        }
        changed
    }

    /// Selected shapes in creation order.
    pub fn selected_shapes(&self) -> Vec<ShapeId> {
        self.shapes().filter(|s| s.is_selected()).map(Shape::id).collect()
    }

    /// Selected lines in creation order.
    pub fn selected_lines(&self) -> Vec<LineId> {
        self.lines().filter(|l| l.is_selected()).map(AnchorLine::id).collect()
    }

    /// The line the spread toggle applies to: the only selected line.
    pub fn spread_target(&self) -> Option<LineId> {
        match self.selected_lines().as_slice() {
            [line] => Some(*line),
            _ => None,
        }
    }

    /// Toolbox state of the spread toggle: `None` when disabled, otherwise
    /// whether the target line is spreading.
    pub fn spread_toggle_state(&self) -> Option<bool> {
        self.spread_target().and_then(|id| self.line(id)).map(AnchorLine::is_spread)
    }

    /// Delete every selected object. Returns how many were removed.
    pub fn delete_selected(&mut self) -> SceneResult<usize> {
        let lines = self.selected_lines();
        let shapes = self.selected_shapes();
        let count = lines.len() + shapes.len();
        for id in lines {
            self.remove_line(id)?;
        }
        for id in shapes {
            self.remove_shape(id)?;
        }
        Ok(count)
    }

    /// Topmost object under `point`. Lines sit above shapes.
    pub fn hit_test(&self, point: Point) -> Option<ObjectId> {
        let tolerance = self.config.line_hit_tolerance;
        let line = self
            .line_order
            .iter()
            .rev()
            .filter_map(|id| self.lines.get(id))
            .find(|line| line.hit_test(point, tolerance))
            .map(Interactive::object_id);
        line.or_else(|| {
            self.shape_order
                .iter()
                .rev()
                .filter_map(|id| self.shapes.get(id))
                .find(|shape| shape.hit_test(point, 0.0))
                .map(Interactive::object_id)
        })
    }
}
