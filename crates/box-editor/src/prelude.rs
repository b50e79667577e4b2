pub use crate::camera::{Camera, CameraConfig, OrbitCamera, Projection};
pub use crate::config::{
    BoxStyle, EditorConfig, EditorMode, HandleStyle, InnerPanelConfig, LightingConfig,
};
pub use crate::editor::{Editor, EditorEvent, EditorPhase};
pub use crate::face::{Axis, Face};
pub use crate::gizmo::{AxisGizmo, GizmoArrow, GizmoDrawData, GizmoResult, GizmoVisuals};
pub use crate::label::{
    ApproximateTextMetrics, DimensionLabel, LabelAlign, LabelStyle, TextMetrics, TextPlane,
};
pub use crate::material::{MaterialDesc, Shading, TextureSource};
pub use crate::params::{BoxParams, MIN_DIMENSION};
pub use crate::picking::{HandleHit, pick_handle};
pub use crate::resource::{ResourceArena, ResourceId, ResourceKind};
pub use crate::scene::{BoxMesh, HandleObject, HandleSet, Quad, QuadSource, Scene};

pub use enumset::{EnumSet, enum_set};

pub use mint;

pub use ecolor::Color32;
pub use emath::{Pos2, Rect, Vec2};
