use ahash::AHashMap;

use egui::epaint::{TextShape, Vertex};
use egui::emath::Rot2;
use egui::{Color32, FontId, Mesh, Painter, Pos2, Rgba, Stroke, TextureHandle, TextureId};

use box_editor::math::{DVec3, world_to_screen};
use box_editor::{
    Camera, DimensionLabel, Editor, GizmoDrawData, LightingConfig, MaterialDesc, Projection, Quad,
    Shading,
};

/// Textures loaded for the scene, keyed by image path.
#[derive(Default, Clone)]
pub struct SceneTextures {
    textures: AHashMap<String, TextureHandle>,
}

impl SceneTextures {
    pub fn insert(&mut self, path: impl Into<String>, texture: TextureHandle) {
        self.textures.insert(path.into(), texture);
    }

    pub fn get(&self, path: &str) -> Option<TextureId> {
        self.textures.get(path).map(TextureHandle::id)
    }
}

/// Paints the box, the inner panel, the handles and the labels.
pub fn paint_scene(painter: &Painter, editor: &Editor, textures: &SceneTextures) {
    let camera = editor.camera();
    let config = editor.config();
    let scene = editor.scene();

    painter.rect_filled(camera.viewport(), 0.0, config.background);

    let mut quads: Vec<(f64, Quad)> = scene
        .quads()
        .into_iter()
        .filter(|quad| quad.material.double_sided || faces_camera(camera, quad))
        .map(|quad| ((quad.center() - camera.eye()).dot(camera.forward()), quad))
        .collect();

    // Back to front.
    quads.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    for (_, quad) in &quads {
        if let Some(mesh) = quad_mesh(camera, &config.lighting, quad, textures) {
            painter.add(mesh);
        }
    }

    if let Some(mesh) = scene.box_mesh()
        && let Some(color) = mesh.edges
    {
        for [from, to] in mesh.edge_segments() {
            if let Some((from, to)) = camera.project(from).zip(camera.project(to)) {
                painter.line_segment([from, to], Stroke::new(1.0, color));
            }
        }
    }

    if let Some(style) = &config.labels {
        for label in scene.labels() {
            paint_label(painter, camera, label, style.line_height);
        }
    }
}

/// Paints gizmo draw data.
pub fn paint_gizmo(painter: &Painter, draw_data: GizmoDrawData) {
    if draw_data.is_empty() {
        return;
    }

    painter.add(Mesh {
        indices: draw_data.indices,
        vertices: draw_data
            .vertices
            .into_iter()
            .zip(draw_data.colors)
            .map(|(pos, [r, g, b, a])| Vertex {
                pos: pos.into(),
                uv: Pos2::default(),
                color: Rgba::from_rgba_premultiplied(r, g, b, a).into(),
            })
            .collect(),
        ..Default::default()
    });
}

fn faces_camera(camera: &Camera, quad: &Quad) -> bool {
    let towards_eye = match camera.projection() {
        Projection::Orthographic { .. } => -camera.forward(),
        Projection::Perspective { .. } => camera.eye() - quad.center(),
    };
    quad.normal.dot(towards_eye) > 0.0
}

/// Lambert term of the scene lights, saturated at full brightness.
fn shade(lighting: &LightingConfig, material: &MaterialDesc, normal: DVec3) -> Color32 {
    let color = material.display_color();
    if material.shading == Shading::Unlit {
        return color;
    }

    let diffuse = normal
        .dot(lighting.directional_from.normalize_or_zero())
        .max(0.0) as f32;
    let intensity = diffuse
        .mul_add(lighting.directional_intensity, lighting.ambient_intensity)
        .min(1.0);

    let [r, g, b, a] = color.to_array();
    let scale = |channel: u8| (f32::from(channel) * intensity).round() as u8;
    Color32::from_rgba_premultiplied(scale(r), scale(g), scale(b), a)
}

fn quad_mesh(
    camera: &Camera,
    lighting: &LightingConfig,
    quad: &Quad,
    textures: &SceneTextures,
) -> Option<Mesh> {
    let view_projection = camera.view_projection();
    let viewport = camera.viewport();
    let corners = [
        world_to_screen(viewport, view_projection, quad.corners[0])?,
        world_to_screen(viewport, view_projection, quad.corners[1])?,
        world_to_screen(viewport, view_projection, quad.corners[2])?,
        world_to_screen(viewport, view_projection, quad.corners[3])?,
    ];

    let color = shade(lighting, &quad.material, quad.normal);
    let texture = quad
        .material
        .texture
        .as_ref()
        .and_then(|texture| textures.get(&texture.path));

    let mut mesh = match texture {
        Some(texture_id) => Mesh::with_texture(texture_id),
        None => Mesh::default(),
    };

    for (pos, [u, v]) in corners.into_iter().zip(Quad::UVS) {
        if texture.is_some() {
            mesh.vertices.push(Vertex {
                pos,
                uv: Pos2::new(u, v),
                color,
            });
        } else {
            mesh.colored_vertex(pos, color);
        }
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);

    Some(mesh)
}

fn paint_label(painter: &Painter, camera: &Camera, label: &DimensionLabel, line_height: f32) {
    let [bottom_left, bottom_right, top_right, top_left] =
        label.corners().map(|corner| camera.project(corner));
    let (Some(bottom_left), Some(bottom_right), Some(top_right), Some(top_left)) =
        (bottom_left, bottom_right, top_right, top_left)
    else {
        return;
    };

    let baseline = bottom_right - bottom_left;
    let height = bottom_left.distance(top_left);
    if baseline.length() < 1.0 || height < 1.0 {
        return;
    }

    // The plane holds one line of text inside a thin border.
    let font_size = height / line_height * 0.8;
    let galley = painter.layout_no_wrap(
        label.plane.text.clone(),
        FontId::proportional(font_size),
        label.color,
    );

    let angle = baseline.angle();
    let center = bottom_left.lerp(top_right, 0.5);
    let offset = Rot2::from_angle(angle) * (galley.size() / 2.0);

    painter.add(TextShape::new(center - offset, galley, label.color).with_angle(angle));
}

#[cfg(test)]
mod tests {
    use egui::{ColorImage, Context, TextureOptions};

    use box_editor::EditorConfig;
    use box_editor::material::{dark_blue, handle};

    use super::*;

    #[test]
    fn scene_textures_are_found_by_path() {
        let ctx = Context::default();
        let texture = ctx.load_texture(
            "panel",
            ColorImage::from_rgba_unmultiplied([1, 1], &[255, 255, 255, 255]),
            TextureOptions::LINEAR,
        );

        let mut textures = SceneTextures::default();
        textures.insert("assets/panel.jpg", texture.clone());

        assert_eq!(textures.get("assets/panel.jpg"), Some(texture.id()));
        assert_eq!(textures.get("assets/missing.jpg"), None);
    }

    #[test]
    fn unlit_materials_keep_their_color() {
        let lighting = EditorConfig::isometric().lighting;
        let material = handle();

        assert_eq!(
            shade(&lighting, &material, DVec3::Y),
            material.display_color()
        );
    }

    #[test]
    fn lit_faces_are_never_brighter_than_the_material() {
        let lighting = EditorConfig::perspective().lighting;
        let material = dark_blue();
        let base = material.display_color();

        for normal in [DVec3::X, DVec3::Y, DVec3::Z, -DVec3::X, -DVec3::Y, -DVec3::Z] {
            let shaded = shade(&lighting, &material, normal);
            assert!(shaded.r() <= base.r());
            assert!(shaded.g() <= base.g());
            assert!(shaded.b() <= base.b());
            assert_eq!(shaded.a(), base.a());
        }
    }
}
