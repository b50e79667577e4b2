use ecolor::Color32;
use enumset::EnumSet;

use crate::camera::{CameraConfig, Projection};
use crate::face::Face;
use crate::gizmo::GizmoVisuals;
use crate::label::LabelStyle;
use crate::material::{self, DEFAULT_IMAGE_PATH, MaterialDesc, TextureSource};
use crate::math::DVec3;
use crate::params::BoxParams;

/// The two editor flavours.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
    /// Orthographic isometric view with handles on the positive faces only,
    /// dimension labels and a textured inner panel.
    #[default]
    Isometric,
    /// Perspective view with handles on all six faces and two-tone faces.
    Perspective,
}

impl EditorMode {
    pub const ALL: [Self; 2] = [Self::Isometric, Self::Perspective];

    pub fn config(self) -> EditorConfig {
        match self {
            Self::Isometric => EditorConfig::isometric(),
            Self::Perspective => EditorConfig::perspective(),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Isometric => "Isometric",
            Self::Perspective => "Perspective",
        }
    }
}

/// Appearance of the box mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStyle {
    /// One material per face, in [`Face::ALL`] order.
    pub materials: [MaterialDesc; 6],
    /// Color of the edge lines, if drawn.
    pub edges: Option<Color32>,
}

impl BoxStyle {
    /// The same translucent material on every face.
    pub fn translucent() -> Self {
        Self {
            materials: std::array::from_fn(|_| material::light_blue()),
            edges: Some(Color32::WHITE),
        }
    }

    /// Light blue on right, top and front; dark blue on left, bottom and back.
    pub fn two_tone() -> Self {
        Self {
            materials: Face::ALL.map(|face| {
                if face.sign() > 0.0 {
                    material::light_blue()
                } else {
                    material::dark_blue()
                }
            }),
            edges: Some(Color32::WHITE),
        }
    }
}

/// Appearance of the face handles.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleStyle {
    /// Edge length of the handle cube.
    pub size: f64,
    pub material: MaterialDesc,
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            material: material::handle(),
        }
    }
}

/// The panel inside the box.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerPanelConfig {
    /// Inset from the box on the X and Y axes.
    pub padding: f64,
    /// Fixed size along Z.
    pub depth: f64,
    /// Material of the right, left, top and bottom faces.
    pub flat: MaterialDesc,
    /// Image on the front and back faces.
    pub texture: TextureSource,
}

impl Default for InnerPanelConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            depth: 20.0,
            flat: material::panel_flat(),
            texture: TextureSource::new(DEFAULT_IMAGE_PATH),
        }
    }
}

impl InnerPanelConfig {
    /// Materials in [`Face::ALL`] order.
    pub fn materials(&self) -> [MaterialDesc; 6] {
        Face::ALL.map(|face| match face {
            Face::Front | Face::Back => material::panel_textured(self.texture.clone()),
            Face::Right | Face::Left | Face::Top | Face::Bottom => self.flat.clone(),
        })
    }
}

/// Scene lighting.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightingConfig {
    pub ambient_color: Color32,
    pub ambient_intensity: f32,
    pub directional_color: Color32,
    pub directional_intensity: f32,
    /// Direction the directional light shines *from*.
    pub directional_from: DVec3,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_color: Color32::WHITE,
            ambient_intensity: 0.8,
            directional_color: Color32::WHITE,
            directional_intensity: 1.0,
            directional_from: DVec3::ONE,
        }
    }
}

/// Complete configuration of an [`crate::Editor`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub mode: EditorMode,
    /// Initial box dimensions.
    pub params: BoxParams,
    /// Faces that get a handle.
    pub faces: EnumSet<Face>,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub background: Color32,
    pub box_style: BoxStyle,
    pub handle_style: HandleStyle,
    /// Dimension labels, if shown.
    pub labels: Option<LabelStyle>,
    /// Inner panel, if shown.
    pub inner_panel: Option<InnerPanelConfig>,
    pub gizmo: GizmoVisuals,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::isometric()
    }
}

impl EditorConfig {
    pub fn isometric() -> Self {
        Self {
            mode: EditorMode::Isometric,
            params: BoxParams::default(),
            faces: Face::positive(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            background: Color32::from_gray(0xf0),
            box_style: BoxStyle::translucent(),
            handle_style: HandleStyle::default(),
            labels: Some(LabelStyle::default()),
            inner_panel: Some(InnerPanelConfig::default()),
            gizmo: GizmoVisuals::default(),
        }
    }

    pub fn perspective() -> Self {
        Self {
            mode: EditorMode::Perspective,
            params: BoxParams::default(),
            faces: Face::all(),
            camera: CameraConfig {
                projection: Projection::Perspective {
                    fov_y: 45f64.to_radians(),
                },
                near: 1.0,
                far: 5000.0,
                position: DVec3::new(450.0, 350.0, 550.0),
                ..Default::default()
            },
            lighting: LightingConfig::default(),
            background: Color32::from_gray(0xf0),
            box_style: BoxStyle::two_tone(),
            handle_style: HandleStyle::default(),
            labels: None,
            inner_panel: None,
            gizmo: GizmoVisuals::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isometric_exposes_positive_faces() {
        let config = EditorConfig::isometric();
        assert_eq!(config.faces, Face::positive());
        assert!(config.labels.is_some());
        assert!(config.inner_panel.is_some());
        assert!(matches!(config.camera.projection, Projection::Orthographic { .. }));
    }

    #[test]
    fn perspective_exposes_all_faces() {
        let config = EditorMode::Perspective.config();
        assert_eq!(config.faces.len(), 6);
        assert!(config.labels.is_none());
        assert!(config.inner_panel.is_none());
    }

    #[test]
    fn two_tone_splits_by_side() {
        let style = BoxStyle::two_tone();
        assert_eq!(style.materials[Face::Right.index()], material::light_blue());
        assert_eq!(style.materials[Face::Back.index()], material::dark_blue());
    }

    #[test]
    fn panel_texture_only_on_front_and_back() {
        let materials = InnerPanelConfig::default().materials();
        for face in Face::ALL {
            let textured = materials[face.index()].texture.is_some();
            assert_eq!(textured, matches!(face, Face::Front | Face::Back), "{face}");
        }
    }
}
