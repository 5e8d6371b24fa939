//! Toolbox commands executed against the scene.

use crate::anchor::even_spread;
use crate::error::SceneResult;
use crate::geometry::{Axis, Orientation};
use crate::scene::Scene;
use crate::shape::{ShapeId, ShapeKind};
use crate::tools::ToolKind;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Reduction used by the align commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    Min,
    Max,
    Mean,
}

/// Intent sent by the toolbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    CreateShape { kind: ShapeKind, rect: Rect },
    CreateLine { orientation: Orientation, position: f64 },
    DeleteSelected,
    SelectAll,
    DeselectAll,
    /// Flip spreading on the only selected line.
    ToggleSpread,
    /// Flip the orientation of every selected line.
    SwitchDirection,
    Align { axis: Axis, mode: AlignMode },
    Distribute { axis: Axis },
    SelectTool { tool: ToolKind },
}

impl Scene {
    /// Run a toolbox command. Returns `true` if the scene changed.
    pub fn execute(&mut self, command: Command) -> SceneResult<bool> {
        log::debug!("executing {:?}", command);
        match command {
            Command::CreateShape { kind, rect } => self.create_shape(kind, rect).map(|_| true),
            Command::CreateLine { orientation, position } => self.create_line(orientation, position).map(|_| true),
            Command::DeleteSelected => self.delete_selected().map(|count| count > 0),
            Command::SelectAll => Ok(self.select_all()),
            Command::DeselectAll => Ok(self.deselect_all()),
            Command::ToggleSpread => {
                let Some(line) = self.spread_target() else {
                    log::warn!("toggle spread needs exactly one selected line");
                    return Ok(false);
                };
                let spread = self.line(line).is_some_and(|l| l.is_spread());
                self.set_spread(line, !spread)
            }
            Command::SwitchDirection => {
                let lines = self.selected_lines();
                for line in &lines {
                    self.switch_direction(*line)?;
                }
                Ok(!lines.is_empty())
            }
            Command::Align { axis, mode } => self.align(axis, mode),
            Command::Distribute { axis } => self.distribute(axis),
            Command::SelectTool { tool } => {
                let discarded = self.finish_drawing();
                self.tools.set_tool(tool);
                Ok(discarded)
            }
        }
    }

    /// Move every selected shape's `axis` coordinate to the min, max or
    /// mean of the selection. An empty selection is a no-op.
    pub fn align(&mut self, axis: Axis, mode: AlignMode) -> SceneResult<bool> {
        let selected = self.selected_shapes();
        let values: Vec<f64> = selected
            .iter()
            .filter_map(|id| self.shape(*id))
            .map(|s| axis.of_point(s.center()))
            .collect();
        if values.is_empty() {
            return Ok(false);
        }

        let target = match mode {
            AlignMode::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            AlignMode::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            AlignMode::Mean => values.iter().sum::<f64>() / values.len() as f64,
        };
        log::debug!("aligning {} shapes on {:?} to {}", values.len(), axis, target);
        self.move_along(&selected, axis, |_| target)
    }

    /// Spread the selected shapes evenly across the viewport along `axis`,
    /// keeping their current order. An empty selection is a no-op.
    pub fn distribute(&mut self, axis: Axis) -> SceneResult<bool> {
        let mut selected: Vec<(ShapeId, f64, f64)> = self
            .selected_shapes()
            .into_iter()
            .filter_map(|id| self.shape(id).map(|s| (id, axis.of_point(s.center()), s.padded_extent(axis))))
            .collect();
        if selected.is_empty() {
            return Ok(false);
        }
        selected.sort_by(|a, b| a.1.total_cmp(&b.1));

        let viewport = self.viewport();
        let length = axis.extent(viewport.width, viewport.height);
        let extents: Vec<f64> = selected.iter().map(|(_, _, extent)| *extent).collect();
        let centers = even_spread(&extents, length);
        log::debug!("distributing {} shapes on {:?} over {}", selected.len(), axis, length);

        let ids: Vec<ShapeId> = selected.iter().map(|(id, _, _)| *id).collect();
        self.move_along(&ids, axis, |i| centers[i])
    }

    /// Set the `axis` coordinate of each shape, then re-resolve its attachments.
    fn move_along(&mut self, ids: &[ShapeId], axis: Axis, target: impl Fn(usize) -> f64) -> SceneResult<bool> {
        for (i, id) in ids.iter().enumerate() {
            let Some(shape) = self.shape(*id) else {
                continue;
            };
            let center = axis.with_point(shape.center(), target(i));
            self.set_shape_position(*id, center)?;
            self.resolve_attachments(*id)?;
        }
        Ok(true)
    }
}
