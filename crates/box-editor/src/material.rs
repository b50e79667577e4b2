use ecolor::Color32;

/// Path of the image shown on the inner panel and in the description panel.
pub const DEFAULT_IMAGE_PATH: &str = "image.jpg";

/// Lighting model of a material.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Shading {
    /// Diffuse lighting from the scene lights.
    #[default]
    Lambert,
    /// Full, unlit color.
    Unlit,
}

/// An image loaded by path. Loading is up to the frontend; a missing image
/// renders as a blank texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureSource {
    pub path: String,
}

impl TextureSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Description of a surface material, independent of any renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    pub color: Color32,
    /// `1.0` is opaque. Anything lower is alpha blended.
    pub opacity: f32,
    pub double_sided: bool,
    pub shading: Shading,
    pub texture: Option<TextureSource>,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            color: Color32::WHITE,
            opacity: 1.0,
            double_sided: false,
            shading: Shading::default(),
            texture: None,
        }
    }
}

impl MaterialDesc {
    pub fn lambert(color: Color32) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn unlit(color: Color32) -> Self {
        Self {
            color,
            shading: Shading::Unlit,
            ..Default::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn with_texture(mut self, texture: TextureSource) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Color with the opacity folded into the alpha channel.
    pub fn display_color(&self) -> Color32 {
        self.color.gamma_multiply(self.opacity)
    }
}

/// Translucent light blue used on every face of the isometric box.
pub fn light_blue() -> MaterialDesc {
    MaterialDesc::lambert(Color32::from_rgb(0x87, 0xce, 0xfa))
        .with_opacity(0.1)
        .double_sided()
}

/// Opaque dark blue used on the negative-side faces in two-tone mode.
pub fn dark_blue() -> MaterialDesc {
    MaterialDesc::lambert(Color32::from_rgb(0x4f, 0xbd, 0xfd)).double_sided()
}

pub fn handle() -> MaterialDesc {
    MaterialDesc::unlit(Color32::from_rgb(0xf3, 0xf6, 0xf4))
}

pub fn panel_flat() -> MaterialDesc {
    MaterialDesc::unlit(Color32::BLACK)
}

pub fn panel_textured(texture: TextureSource) -> MaterialDesc {
    MaterialDesc::unlit(Color32::WHITE)
        .with_texture(texture)
        .double_sided()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_blue_is_transparent_and_double_sided() {
        let material = light_blue();
        assert!(material.is_transparent());
        assert!(material.double_sided);
        assert_eq!(material.shading, Shading::Lambert);
    }

    #[test]
    fn textured_panel_keeps_path() {
        let material = panel_textured(TextureSource::new(DEFAULT_IMAGE_PATH));
        assert_eq!(material.texture.map(|t| t.path).as_deref(), Some("image.jpg"));
        assert_eq!(material.shading, Shading::Unlit);
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(MaterialDesc::default().with_opacity(3.0).opacity, 1.0);
    }
}
