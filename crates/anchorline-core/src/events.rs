//! Pointer and keyboard dispatch.
//!
//! Within one pointer-move, dragged lines move (and snap) before dragged
//! shapes, and every object's geometry is updated before its attachments
//! are re-resolved, so proximity tests never see a stale position.

use crate::anchor::{AnchorLine, LineId};
use crate::changes::SceneChange;
use crate::input::{KeyCode, Modifiers, PointerButton};
use crate::interaction::{Interactive, ObjectId};
use crate::scene::Scene;
use crate::shape::{Shape, ShapeId};
use crate::snap::line_snap_position;
use crate::tools::{ToolKind, ToolState, drag_rect};
use kurbo::Point;

impl Scene {
    /// Handle a pointer press.
    ///
    /// Returns `true` when an object consumed the press. Presses on empty
    /// canvas go to the current tool. Only the primary button interacts.
    pub fn pointer_down(&mut self, position: Point, button: PointerButton, modifiers: Modifiers) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        self.finish_drawing();
        self.drag_anchor = Some(position);
        let hit = self.hit_test(position);

        for object in self.objects() {
            let before = self.is_selected(object);
            let is_hit = hit == Some(object);
            match object {
                ObjectId::Shape(id) => {
                    if let Some(shape) = self.shapes.get_mut(&id) {
                        shape.on_pointer_down(is_hit, modifiers);
                    }
                }
                ObjectId::Line(id) => {
                    if let Some(line) = self.lines.get_mut(&id) {
                        line.on_pointer_down(is_hit, modifiers);
                    }
                }
            }
            let after = self.is_selected(object);
            if before != after {
                self.changes.push(SceneChange::SelectionChanged { object, selected: after });
            }
        }

        if let Some(object) = hit {
            log::trace!("pointer down on {:?} at {:?}", object, position);
            return true;
        }
        self.begin_tool(position, modifiers);
        false
    }

    fn begin_tool(&mut self, position: Point, modifiers: Modifiers) {
        let tool = self.tools.current_tool;
        if let Some(kind) = tool.shape_kind() {
            let shape = Shape::with_padding(kind, position, 0.0, 0.0, self.config.padding);
            let id = self.add_shape(shape);
            self.tools.begin_drawing(id, position);
        } else if let Some(orientation) = tool.line_orientation() {
            let value = orientation.perpendicular_axis().of_point(position);
            let line = AnchorLine::new(orientation, value);
            let id = self.add_line(line);
            self.deselect_all();
            self.set_selected(ObjectId::Line(id), true);
        } else if tool == ToolKind::Select {
            let retained = if modifiers.multi_select() {
                self.selected_shapes()
            } else {
                Vec::new()
            };
            self.tools.begin_selecting(position, retained);
        }
    }

    /// Handle pointer movement. Returns `true` if anything moved or changed.
    pub fn pointer_move(&mut self, position: Point) -> bool {
        match self.tools.state.clone() {
            ToolState::Drawing { shape, origin } => {
                self.update_drawing(shape, origin, position);
                return true;
            }
            ToolState::Selecting { origin, retained, .. } => {
                self.tools.update_selecting(position);
                self.update_marquee(origin, position, &retained);
                return true;
            }
            ToolState::Idle => {}
        }

        let Some(anchor) = self.drag_anchor else {
            return false;
        };
        let delta = position - anchor;
        let mut moved = false;

        for id in self.line_order.clone() {
            moved |= self.drag_line(id, delta);
        }
        for id in self.shape_order.clone() {
            let Some(shape) = self.shapes.get_mut(&id) else {
                continue;
            };
            if shape.on_pointer_move(delta) {
                self.changes.shape_moved(id, shape.center());
                if let Err(err) = self.resolve_attachments(id) {
                    log::warn!("attachment scan for shape {} failed: {}", id, err);
                }
                moved = true;
            }
        }
        moved
    }

    /// Move a dragged line, lock it onto a nearby resting shape and carry
    /// its dependents along.
    fn drag_line(&mut self, id: LineId, delta: kurbo::Vec2) -> bool {
        let threshold = self.config.snap_threshold;
        let Some(line) = self.lines.get_mut(&id) else {
            return false;
        };
        if !line.on_pointer_move(delta) {
            return false;
        }

        let raw = line.position();
        let candidates = self.shape_order.iter().filter_map(|s| self.shapes.get(s)).filter(|s| !line.contains(s.id()));
        if let Some((locked, shape)) = line_snap_position(line.orientation(), raw, candidates, threshold) {
            log::trace!("line {} locked onto shape {} at {}", id, shape, locked);
            line.set_position(locked);
        }

        self.changes.line_moved(id, line.position());
        line.push_to_dependents(&mut self.shapes, &mut self.changes);
        true
    }

    fn update_drawing(&mut self, id: ShapeId, origin: Point, position: Point) {
        let rect = drag_rect(origin, position);
        let Some(shape) = self.shapes.get_mut(&id) else {
            return;
        };
        shape.set_dimensions(rect.width(), rect.height());
        shape.set_position(rect.center());
        self.changes.push(SceneChange::ShapeResized {
            id,
            width: shape.width(),
            height: shape.height(),
        });
        self.changes.shape_moved(id, shape.center());
        if let Err(err) = self.resolve_attachments(id) {
            log::warn!("attachment scan for shape {} failed: {}", id, err);
        }
    }

    fn update_marquee(&mut self, origin: Point, position: Point, retained: &[ShapeId]) {
        let rect = drag_rect(origin, position);
        for id in self.line_order.clone() {
            self.set_selected(ObjectId::Line(id), false);
        }
        for id in self.shape_order.clone() {
            let inside = self.shapes.get(&id).is_some_and(|s| rect.contains(s.center()));
            self.set_selected(ObjectId::Shape(id), inside || retained.contains(&id));
        }
    }

    /// Handle a pointer release, ending drags and tool interactions.
    ///
    /// Returns `true` if a drag was in progress.
    pub fn pointer_up(&mut self, position: Point) -> bool {
        self.drag_anchor = None;
        if self.finish_drawing() {
            log::trace!("draw ended at {:?}", position);
        }
        self.tools.finish();

        let mut ended = false;
        for id in self.line_order.clone() {
            let dragging = self.lines.get(&id).is_some_and(|l| l.interaction().is_dragging());
            if !dragging {
                continue;
            }
            if let Err(err) = self.capture_nearby(id) {
                log::warn!("capture for line {} failed: {}", id, err);
            }
            if let Some(line) = self.lines.get_mut(&id) {
                ended |= line.on_pointer_up();
            }
        }
        for shape in self.shapes.values_mut() {
            ended |= shape.on_pointer_up();
        }
        ended
    }

    /// End a draw in progress. A shape without area is removed along with
    /// any attachment it formed while being drawn.
    ///
    /// Returns `true` if a shape was discarded.
    pub(crate) fn finish_drawing(&mut self) -> bool {
        let ToolState::Drawing { shape, .. } = self.tools.state else {
            return false;
        };
        self.tools.state = ToolState::Idle;
        if !self.shapes.get(&shape).is_none_or(Shape::is_degenerate) {
            return false;
        }
        log::debug!("discarding degenerate shape {}", shape);
        match self.remove_shape(shape) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("failed to discard shape {}: {}", shape, err);
                false
            }
        }
    }

    /// Handle a key press. Returns `true` if the key did something.
    pub fn key_down(&mut self, key: KeyCode, _modifiers: Modifiers) -> bool {
        if key == KeyCode::Escape {
            return self.deselect_all();
        }
        let doomed: Vec<ObjectId> = self
            .objects()
            .into_iter()
            .filter(|object| match object {
                ObjectId::Shape(id) => self.shapes.get(id).is_some_and(|s| s.on_key_down(key)),
                ObjectId::Line(id) => self.lines.get(id).is_some_and(|l| l.on_key_down(key)),
            })
            .collect();

        for object in &doomed {
            let removed = match *object {
                ObjectId::Shape(id) => self.remove_shape(id).map(|_| ()),
                ObjectId::Line(id) => self.remove_line(id).map(|_| ()),
            };
            if let Err(err) = removed {
                log::warn!("failed to delete {:?}: {}", object, err);
            }
        }
        !doomed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::config::EngineConfig;
    use crate::geometry::Orientation;
    use crate::interaction::InteractionState;
    use crate::shape::ShapeKind;
    use kurbo::Vec2;

    fn press(scene: &mut Scene, x: f64, y: f64) -> bool {
        scene.pointer_down(Point::new(x, y), PointerButton::Primary, Modifiers::default())
    }

    #[test]
    fn test_shape_drag_attaches_to_line() {
        let mut scene = Scene::default();
        let line = scene.create_line(Orientation::Horizontal, 200.0).unwrap();
        let shape = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(100.0, 100.0), 40.0, 40.0));

        assert!(press(&mut scene, 100.0, 100.0));
        // Center lands at y = 193, 7 from the line.
        assert!(scene.pointer_move(Point::new(100.0, 193.0)));
        assert_eq!(scene.shape(shape).unwrap().center(), Point::new(100.0, 200.0));
        assert_eq!(scene.lines_of(shape), &[line]);

        // Dragging away breaks the attachment.
        scene.pointer_move(Point::new(100.0, 100.0));
        assert!(scene.lines_of(shape).is_empty());
        assert_eq!(scene.shape(shape).unwrap().center(), Point::new(100.0, 100.0));
        assert!(scene.pointer_up(Point::new(100.0, 100.0)));
        assert_eq!(*scene.shape(shape).unwrap().interaction(), InteractionState::Selected);
    }

    #[test]
    fn test_line_drag_locks_onto_shape() {
        let mut scene = Scene::default();
        let line = scene.create_line(Orientation::Horizontal, 100.0).unwrap();
        let shape = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(500.0, 120.0), 40.0, 40.0));

        assert!(press(&mut scene, 0.0, 100.0));
        // Raw position 110 is 10 from the shape center.
        scene.pointer_move(Point::new(0.0, 110.0));
        assert!((scene.line(line).unwrap().position() - 120.0).abs() < f64::EPSILON);
        // The shape does not move and is not attached until release.
        assert_eq!(scene.shape(shape).unwrap().center(), Point::new(500.0, 120.0));
        assert!(scene.lines_of(shape).is_empty());

        scene.pointer_up(Point::new(0.0, 110.0));
        assert_eq!(scene.lines_of(shape), &[line]);
        assert_eq!(scene.line(line).unwrap().offset_of(shape), Some(Vec2::ZERO));
    }

    #[test]
    fn test_line_drag_carries_dependents() {
        let mut scene = Scene::default();
        let line = scene.create_line(Orientation::Vertical, 100.0).unwrap();
        let shape = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(100.0, 300.0), 20.0, 20.0));
        scene.attach(line, shape, Vec2::ZERO).unwrap();

        press(&mut scene, 101.0, 0.0);
        scene.pointer_move(Point::new(251.0, 40.0));
        assert!((scene.line(line).unwrap().position() - 250.0).abs() < f64::EPSILON);
        assert_eq!(scene.shape(shape).unwrap().center(), Point::new(250.0, 300.0));
    }

    #[test]
    fn test_press_elsewhere_deselects() {
        let mut scene = Scene::default();
        let line = scene.create_line(Orientation::Horizontal, 50.0).unwrap();
        press(&mut scene, 0.0, 50.0);
        scene.pointer_up(Point::new(0.0, 50.0));
        assert!(scene.is_selected(ObjectId::Line(line)));

        assert!(!press(&mut scene, 0.0, 400.0));
        assert!(!scene.is_selected(ObjectId::Line(line)));
    }

    #[test]
    fn test_multi_select_drags_together() {
        let mut scene = Scene::default();
        let a = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(100.0, 100.0), 20.0, 20.0));
        let b = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(300.0, 100.0), 20.0, 20.0));

        press(&mut scene, 100.0, 100.0);
        scene.pointer_up(Point::new(100.0, 100.0));
        scene.pointer_down(Point::new(300.0, 100.0), PointerButton::Primary, Modifiers::ctrl());
        scene.pointer_move(Point::new(310.0, 130.0));

        assert_eq!(scene.shape(a).unwrap().center(), Point::new(110.0, 130.0));
        assert_eq!(scene.shape(b).unwrap().center(), Point::new(310.0, 130.0));
    }

    #[test]
    fn test_press_without_modifier_replaces_selection() {
        let mut scene = Scene::default();
        let a = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(100.0, 100.0), 20.0, 20.0));
        let b = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(300.0, 100.0), 20.0, 20.0));

        press(&mut scene, 100.0, 100.0);
        scene.pointer_up(Point::new(100.0, 100.0));
        press(&mut scene, 300.0, 100.0);
        scene.pointer_move(Point::new(310.0, 100.0));

        assert!(!scene.is_selected(ObjectId::Shape(a)));
        assert_eq!(scene.shape(a).unwrap().center(), Point::new(100.0, 100.0));
        assert_eq!(scene.shape(b).unwrap().center(), Point::new(310.0, 100.0));
    }

    #[test]
    fn test_draw_tool_creates_shape() {
        let mut scene = Scene::default();
        scene.tools.set_tool(ToolKind::Ellipse);
        assert!(!press(&mut scene, 10.0, 10.0));
        scene.pointer_move(Point::new(60.0, 40.0));
        scene.pointer_up(Point::new(60.0, 40.0));

        let shape = scene.shapes().next().unwrap();
        assert_eq!(shape.kind(), ShapeKind::Ellipse);
        assert_eq!(shape.center(), Point::new(35.0, 25.0));
        assert!((shape.width() - 50.0).abs() < f64::EPSILON);
        assert!(!scene.tools.is_active());
    }

    #[test]
    fn test_degenerate_draw_is_discarded_and_retracted() {
        let mut scene = Scene::default();
        let line = scene.create_line(Orientation::Horizontal, 100.0).unwrap();
        scene.tools.set_tool(ToolKind::Rectangle);

        press(&mut scene, 50.0, 95.0);
        // Zero height, but width makes it a tentative dependent of the line.
        scene.pointer_move(Point::new(80.0, 95.0));
        assert_eq!(scene.line(line).unwrap().dependents().len(), 1);

        scene.pointer_up(Point::new(80.0, 95.0));
        assert_eq!(scene.shape_count(), 0);
        assert!(scene.line(line).unwrap().dependents().is_empty());
    }

    #[test]
    fn test_tool_switch_mid_draw_discards_degenerate_shape() {
        let mut scene = Scene::default();
        let line = scene.create_line(Orientation::Horizontal, 100.0).unwrap();
        scene.tools.set_tool(ToolKind::Rectangle);

        press(&mut scene, 50.0, 95.0);
        scene.pointer_move(Point::new(80.0, 95.0));
        assert_eq!(scene.line(line).unwrap().dependents().len(), 1);

        assert!(scene.execute(Command::SelectTool { tool: ToolKind::Select }).unwrap());
        assert_eq!(scene.shape_count(), 0);
        assert!(scene.line(line).unwrap().dependents().is_empty());
        assert!(!scene.tools.is_active());

        scene.pointer_up(Point::new(80.0, 95.0));
        assert_eq!(scene.shape_count(), 0);
    }

    #[test]
    fn test_second_press_mid_draw_discards_degenerate_shape() {
        let mut scene = Scene::default();
        scene.tools.set_tool(ToolKind::Rectangle);

        press(&mut scene, 10.0, 10.0);
        press(&mut scene, 100.0, 100.0);
        scene.pointer_move(Point::new(150.0, 140.0));
        scene.pointer_up(Point::new(150.0, 140.0));

        assert_eq!(scene.shape_count(), 1);
        let shape = scene.shapes().next().unwrap();
        assert!(!shape.is_degenerate());
        assert_eq!(shape.center(), Point::new(125.0, 120.0));
    }

    #[test]
    fn test_line_tool_creates_selected_line() {
        let mut scene = Scene::default();
        scene.tools.set_tool(ToolKind::VerticalLine);
        press(&mut scene, 42.0, 7.0);
        let line = scene.lines().next().unwrap();
        assert_eq!(line.orientation(), Orientation::Vertical);
        assert!((line.position() - 42.0).abs() < f64::EPSILON);
        assert!(line.is_selected());
    }

    #[test]
    fn test_marquee_selects_shapes() {
        let mut scene = Scene::default();
        let inside = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(50.0, 50.0), 10.0, 10.0));
        let outside = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(500.0, 50.0), 10.0, 10.0));

        press(&mut scene, 0.0, 0.0);
        scene.pointer_move(Point::new(100.0, 100.0));
        scene.pointer_up(Point::new(100.0, 100.0));
        assert_eq!(scene.selected_shapes(), vec![inside]);

        // Extending keeps the previous selection.
        scene.pointer_down(Point::new(400.0, 0.0), PointerButton::Primary, Modifiers::ctrl());
        scene.pointer_move(Point::new(600.0, 100.0));
        scene.pointer_up(Point::new(600.0, 100.0));
        assert_eq!(scene.selected_shapes(), vec![inside, outside]);
    }

    #[test]
    fn test_delete_key_removes_selection() {
        let mut scene = Scene::default();
        let line = scene.create_line(Orientation::Horizontal, 100.0).unwrap();
        let shape = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(50.0, 100.0), 20.0, 20.0));
        scene.attach(line, shape, Vec2::ZERO).unwrap();
        scene.set_selected(ObjectId::Line(line), true);

        assert!(scene.key_down(KeyCode::Backspace, Modifiers::default()));
        assert_eq!(scene.line_count(), 0);
        assert_eq!(scene.shape_count(), 1);
        assert!(scene.lines_of(shape).is_empty());
        assert!(!scene.key_down(KeyCode::Delete, Modifiers::default()));
    }

    #[test]
    fn test_secondary_button_does_not_drag() {
        let mut scene = Scene::new(EngineConfig::default());
        let shape = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(100.0, 100.0), 20.0, 20.0));
        assert!(!scene.pointer_down(Point::new(100.0, 100.0), PointerButton::Secondary, Modifiers::default()));
        assert!(!scene.pointer_move(Point::new(150.0, 150.0)));
        assert_eq!(scene.shape(shape).unwrap().center(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_spread_line_redistributes_during_drag() {
        let mut scene = Scene::default();
        scene.set_viewport_size(300.0, 300.0);
        let line = scene.create_line(Orientation::Horizontal, 200.0).unwrap();
        scene.set_spread(line, true).unwrap();
        let shape = scene.add_shape(Shape::new(ShapeKind::Rectangle, Point::new(20.0, 100.0), 42.0, 42.0));

        press(&mut scene, 20.0, 100.0);
        scene.pointer_move(Point::new(20.0, 195.0));
        // A single dependent of extent 50 sits in the middle of the line.
        assert_eq!(scene.shape(shape).unwrap().center(), Point::new(150.0, 200.0));
    }
}
