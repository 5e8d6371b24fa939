//! JSON event scripts replayed against a scene.

use std::path::Path;

use anchorline_core::{Command, Modifiers, PointerButton};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One input event or toolbox command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Step {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Command {
        run: Command,
    },
}

impl Step {
    /// Pointer position carried by the step, if any.
    pub fn position(&self) -> Option<Point> {
        match *self {
            Step::PointerDown { x, y, .. } | Step::PointerMove { x, y } | Step::PointerUp { x, y } => {
                Some(Point::new(x, y))
            }
            _ => None,
        }
    }
}

/// A recorded editing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Overrides the configured viewport when present.
    #[serde(default)]
    pub viewport: Option<Size>,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        log::debug!("loading script from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorline_core::AlignMode;
    use anchorline_core::Axis;

    #[test]
    fn test_parse_steps() {
        let script = Script::from_json(
            r#"{
                "viewport": {"width": 300.0, "height": 200.0},
                "steps": [
                    {"event": "pointer_down", "x": 1.0, "y": 2.0, "modifiers": {"ctrl": true}},
                    {"event": "pointer_move", "x": 3.0, "y": 4.0},
                    {"event": "pointer_up", "x": 3.0, "y": 4.0},
                    {"event": "key_down", "key": "Delete"},
                    {"event": "command", "run": {"command": "align", "axis": "Y", "mode": "min"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.viewport, Some(Size::new(300.0, 200.0)));
        assert_eq!(
            script.steps[0],
            Step::PointerDown {
                x: 1.0,
                y: 2.0,
                button: PointerButton::Primary,
                modifiers: Modifiers::ctrl(),
            }
        );
        assert_eq!(script.steps[1].position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(script.steps[3].position(), None);
        assert_eq!(
            script.steps[4],
            Step::Command {
                run: Command::Align {
                    axis: Axis::Y,
                    mode: AlignMode::Min
                }
            }
        );
    }

    #[test]
    fn test_rejects_unknown_event() {
        let err = Script::from_json(r#"{"steps": [{"event": "scroll"}]}"#).unwrap_err();
        assert!(matches!(err, AppError::Script(_)));
    }
}
