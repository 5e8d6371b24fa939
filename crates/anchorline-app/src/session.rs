//! Replays scripts against a scene, standing in for the renderer and
//! input source of an interactive editor.

use std::collections::HashMap;
use std::fmt::Write;

use anchorline_core::{AnchorLine, Command, EngineConfig, Interactive, KeyCode, Scene, SceneChange, Shape};
use uuid::Uuid;

use crate::error::AppError;
use crate::script::{Script, Step};
use crate::shortcuts::ShortcutRegistry;

/// One editing session.
pub struct Session {
    scene: Scene,
    notifications: usize,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            scene: Scene::new(config),
            notifications: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Renderer notifications received so far.
    pub fn notifications(&self) -> usize {
        self.notifications
    }

    /// Replay every step of `script`, stopping at the first failing command.
    pub fn run(&mut self, script: &Script) -> Result<(), AppError> {
        if let Some(viewport) = script.viewport {
            self.scene.set_viewport_size(viewport.width, viewport.height);
        }
        for (index, step) in script.steps.iter().enumerate() {
            let consumed = self.apply(index, step)?;
            log::debug!("step {} {:?} consumed: {}", index, step, consumed);
            self.flush();
        }
        log::info!(
            "Replayed {} steps: {} shapes, {} lines",
            script.steps.len(),
            self.scene.shape_count(),
            self.scene.line_count()
        );
        Ok(())
    }

    /// Dispatch one step. Returns whether the scene consumed it.
    pub fn apply(&mut self, index: usize, step: &Step) -> Result<bool, AppError> {
        let consumed = match step {
            Step::PointerDown { x, y, button, modifiers } => {
                self.scene.pointer_down((*x, *y).into(), *button, *modifiers)
            }
            Step::PointerMove { x, y } => self.scene.pointer_move((*x, *y).into()),
            Step::PointerUp { x, y } => self.scene.pointer_up((*x, *y).into()),
            Step::KeyDown { key, modifiers } => {
                let code = KeyCode::from_name(key).ok_or_else(|| AppError::UnknownKey(key.clone()))?;
                if self.scene.key_down(code, *modifiers) {
                    true
                } else if let Some(command) = ShortcutRegistry::command_for(code, *modifiers) {
                    self.execute(index, command)?
                } else {
                    false
                }
            }
            Step::Command { run } => self.execute(index, run.clone())?,
        };
        Ok(consumed)
    }

    fn execute(&mut self, index: usize, command: Command) -> Result<bool, AppError> {
        self.scene
            .execute(command)
            .map_err(|source| AppError::Step { step: index, source })
    }

    /// Drain pending notifications, logging each one.
    fn flush(&mut self) {
        for change in self.scene.take_changes() {
            match &change {
                SceneChange::Attached { .. } | SceneChange::Detached { .. } | SceneChange::SpreadChanged { .. } => {
                    log::debug!("notify: {:?}", change)
                }
                _ => log::trace!("notify: {:?}", change),
            }
            self.notifications += 1;
        }
    }

    /// Textual summary of every line and shape, labelled in creation order.
    pub fn report(&self) -> String {
        let labels = self.labels();
        let label = |id: &Uuid| labels.get(id).cloned().unwrap_or_else(|| id.to_string());
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{} shapes, {} lines, {} notifications",
            self.scene.shape_count(),
            self.scene.line_count(),
            self.notifications
        );
        for line in self.scene.lines() {
            let dependents: Vec<String> = line.dependents().iter().map(|d| label(&d.shape)).collect();
            let _ = writeln!(
                out,
                "{} {:?} at {}{}{}: [{}]",
                label(&line.id()),
                line.orientation(),
                line.position(),
                if line.is_spread() { " spread" } else { "" },
                if line.is_selected() { " selected" } else { "" },
                dependents.join(", ")
            );
        }
        for shape in self.scene.shapes() {
            let center = shape.center();
            let _ = writeln!(
                out,
                "{} {:?} at ({}, {}) size {}x{}{}",
                label(&shape.id()),
                shape.kind(),
                center.x,
                center.y,
                shape.width(),
                shape.height(),
                if shape.is_selected() { " selected" } else { "" }
            );
        }
        out
    }

    fn labels(&self) -> HashMap<Uuid, String> {
        let lines = self.scene.lines().map(AnchorLine::id).enumerate().map(|(i, id)| (id, format!("L{}", i + 1)));
        let shapes = self.scene.shapes().map(Shape::id).enumerate().map(|(i, id)| (id, format!("S{}", i + 1)));
        lines.chain(shapes).collect()
    }
}
