//! AnchorLine Core Library
//!
//! Spatial constraint engine for the AnchorLine diagram editor: shapes,
//! anchor lines, proximity snapping, attachment bookkeeping and even spread.

pub mod anchor;
pub mod changes;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod scene;
pub mod shape;
pub mod snap;
pub mod tools;

pub use anchor::{AnchorLine, Dependent, LineId, even_spread};
pub use changes::{ChangeLog, SceneChange};
pub use commands::{AlignMode, Command};
pub use config::{DirectionSwitchPolicy, EngineConfig, SpreadClaimPolicy};
pub use error::{ConfigError, SceneError, SceneResult};
pub use geometry::{Axis, Orientation, SNAP_PADDING, SNAP_THRESHOLD, distance_along, snap_offsets_for};
pub use input::{KeyCode, Modifiers, PointerButton};
pub use interaction::{InteractionState, Interactive, ObjectId};
pub use scene::Scene;
pub use shape::{Shape, ShapeId, ShapeKind};
pub use snap::{SnapMatch, SnapPoint, closest_snap};
pub use tools::{ToolKind, ToolManager, ToolState};
