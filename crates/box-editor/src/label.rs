//! Dimension labels drawn as text planes next to the box edges.
//!
//! Text is not rasterized here. A label only carries its text, the size of the
//! plane the text is drawn on and where that plane sits in the world; each
//! frontend draws the text into that plane.

use std::f64::consts::FRAC_PI_2;

use ecolor::Color32;

use crate::face::Axis;
use crate::math::{DMat4, DQuat, DVec2, DVec3, EulerRot};
use crate::params::BoxParams;
use crate::resource::ResourceId;

/// Which edge of the text plane sits at the label's pivot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LabelAlign {
    Left,
    Right,
    Top,
    Bottom,
}

/// Measures text for plane sizing.
pub trait TextMetrics {
    /// Width of `text` in pixels when set at `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Fixed advance per character, close enough to a proportional sans-serif
/// for short labels like `w: 200`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ApproximateTextMetrics {
    pub glyph_width_ratio: f32,
}

impl Default for ApproximateTextMetrics {
    fn default() -> Self {
        Self {
            glyph_width_ratio: 0.56,
        }
    }
}

impl TextMetrics for ApproximateTextMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.glyph_width_ratio
    }
}

/// Visual settings of the dimension labels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelStyle {
    /// Font size in pixels of the rasterized text.
    pub font_size: f32,
    /// Transparent margin around the text, in pixels.
    pub border: f32,
    /// Line height relative to the font size.
    pub line_height: f32,
    /// World units per text pixel.
    pub world_scale: f64,
    pub color: Color32,
    /// Distance between a label and the box edge it annotates.
    pub gap: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size: 48.0,
            border: 4.0,
            line_height: 1.4,
            world_scale: 0.5,
            color: Color32::from_black_alpha(51),
            gap: 10.0,
        }
    }
}

/// A text plane laid out from measured text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlane {
    pub text: String,
    /// Size of the rasterized text image in pixels, border included.
    pub image_size: [u32; 2],
    /// Size of the plane in world units.
    pub size: DVec2,
    pub align: LabelAlign,
}

impl TextPlane {
    pub fn layout(
        text: impl Into<String>,
        style: &LabelStyle,
        align: LabelAlign,
        metrics: &dyn TextMetrics,
    ) -> Self {
        let text = text.into();
        let text_width = metrics.text_width(&text, style.font_size);
        let text_height = style.font_size * style.line_height;

        // Image sizes are whole pixels.
        let image_size = [
            (text_width + style.border * 2.0).max(1.0) as u32,
            (text_height + style.border * 2.0).max(1.0) as u32,
        ];

        let size =
            DVec2::new(f64::from(image_size[0]), f64::from(image_size[1])) * style.world_scale;

        Self {
            text,
            image_size,
            size,
            align,
        }
    }

    /// Offset of the plane center from the pivot, in plane space.
    pub fn center_offset(&self) -> DVec2 {
        match self.align {
            LabelAlign::Left => DVec2::new(self.size.x / 2.0, 0.0),
            LabelAlign::Right => DVec2::new(-self.size.x / 2.0, 0.0),
            LabelAlign::Bottom => DVec2::new(0.0, self.size.y / 2.0),
            LabelAlign::Top => DVec2::new(0.0, -self.size.y / 2.0),
        }
    }

    /// Corners in plane space: bottom left, bottom right, top right, top left.
    pub fn local_corners(&self) -> [DVec3; 4] {
        let center = self.center_offset();
        let half = self.size / 2.0;
        [
            DVec3::new(center.x - half.x, center.y - half.y, 0.0),
            DVec3::new(center.x + half.x, center.y - half.y, 0.0),
            DVec3::new(center.x + half.x, center.y + half.y, 0.0),
            DVec3::new(center.x - half.x, center.y + half.y, 0.0),
        ]
    }
}

/// A label showing one box dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionLabel {
    pub id: ResourceId,
    pub axis: Axis,
    pub plane: TextPlane,
    /// World position of the pivot.
    pub position: DVec3,
    /// Euler angles, applied in X, Y, Z order.
    pub rotation: DVec3,
    pub color: Color32,
}

impl DimensionLabel {
    /// Text for `axis` of `params`, with the value rounded to a whole number.
    pub fn text(axis: Axis, params: &BoxParams) -> String {
        let prefix = match axis {
            Axis::X => "w",
            Axis::Y => "h",
            Axis::Z => "l",
        };
        format!("{prefix}: {}", params.dimension(axis).round())
    }

    /// Fixed alignment, position and rotation of the label for `axis`.
    pub fn placement(axis: Axis, params: &BoxParams, gap: f64) -> (LabelAlign, DVec3, DVec3) {
        let half = params.half_extents();
        match axis {
            // Along the front bottom edge, facing +Z.
            Axis::X => (
                LabelAlign::Top,
                DVec3::new(0.0, -half.y - gap, half.z),
                DVec3::ZERO,
            ),
            // Upright next to the back right edge.
            Axis::Y => (
                LabelAlign::Left,
                DVec3::new(half.x + gap + 20.0, -50.0, -half.z),
                DVec3::new(0.0, 0.0, FRAC_PI_2),
            ),
            // Along the right bottom edge, facing +X.
            Axis::Z => (
                LabelAlign::Right,
                DVec3::new(half.x, -half.y - gap - 15.0, -50.0),
                DVec3::new(0.0, FRAC_PI_2, 0.0),
            ),
        }
    }

    pub fn build(
        id: ResourceId,
        axis: Axis,
        params: &BoxParams,
        style: &LabelStyle,
        metrics: &dyn TextMetrics,
    ) -> Self {
        let (align, position, rotation) = Self::placement(axis, params, style.gap);
        Self {
            id,
            axis,
            plane: TextPlane::layout(Self::text(axis, params), style, align, metrics),
            position,
            rotation,
            color: style.color,
        }
    }

    pub fn rotation_quat(&self) -> DQuat {
        DQuat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn transform(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation_quat(), self.position)
    }

    /// World space corners: bottom left, bottom right, top right, top left.
    pub fn corners(&self) -> [DVec3; 4] {
        let transform = self.transform();
        self.plane
            .local_corners()
            .map(|corner| transform.transform_point3(corner))
    }
}
