use bevy::prelude::*;

use box_editor::{MaterialDesc, QuadSource, Shading};

use crate::{BoxEditor, EditorCamera, convert};

/// Anything spawned for one scene revision. Despawned on the next.
#[derive(Component)]
pub(crate) struct SceneEntity;

/// UI text showing the dimension label at `index`.
#[derive(Component)]
pub(crate) struct LabelText {
    index: usize,
}

/// Bevy side copy of the editor scene.
#[derive(Resource, Default)]
pub(crate) struct MirroredScene {
    revision: u64,
    meshes: Vec<Handle<Mesh>>,
    materials: Vec<Handle<StandardMaterial>>,
}

pub(crate) fn sync_camera(
    editor: Res<BoxEditor>,
    mut q_camera: Query<(&mut Transform, &mut Projection), With<EditorCamera>>,
) {
    let camera = editor.camera();

    for (mut transform, mut projection) in &mut q_camera {
        *transform = convert::camera_transform(camera);

        // Orthographic projections are sized in window pixels.
        let height = f64::from(camera.viewport().height());
        if let Projection::Orthographic(ortho) = projection.as_mut()
            && height > 0.0
        {
            ortho.scale = (camera.half_extents().y * 2.0 / height) as f32;
        }
    }
}

fn standard_material(desc: &MaterialDesc, asset_server: &AssetServer) -> StandardMaterial {
    let mut material = StandardMaterial {
        base_color: convert::color(desc.color).with_alpha(desc.opacity),
        base_color_texture: desc
            .texture
            .as_ref()
            .map(|texture| asset_server.load(texture.path.clone())),
        unlit: desc.shading == Shading::Unlit,
        alpha_mode: if desc.is_transparent() {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        ..default()
    };

    if desc.double_sided {
        material.double_sided = true;
        material.cull_mode = None;
    }

    material
}

/// Replaces every mirrored entity and asset when the editor scene was rebuilt.
pub(crate) fn sync_scene(
    mut commands: Commands,
    editor: Res<BoxEditor>,
    asset_server: Res<AssetServer>,
    mut mirrored: ResMut<MirroredScene>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    q_entities: Query<Entity, With<SceneEntity>>,
) {
    let scene = editor.scene();
    if scene.revision() == mirrored.revision {
        return;
    }

    for entity in &q_entities {
        commands.entity(entity).despawn();
    }
    for handle in mirrored.meshes.drain(..) {
        meshes.remove(&handle);
    }
    for handle in mirrored.materials.drain(..) {
        materials.remove(&handle);
    }

    for quad in scene.quads() {
        if matches!(quad.source, QuadSource::Handle(_)) {
            continue;
        }

        let (transform, [width, height]) = convert::quad_transform(quad.corners);
        if width <= f32::EPSILON || height <= f32::EPSILON {
            continue;
        }

        let mesh = meshes.add(Rectangle::new(width, height));
        let material = materials.add(standard_material(&quad.material, &asset_server));
        mirrored.meshes.push(mesh.clone());
        mirrored.materials.push(material.clone());

        commands.spawn((Mesh3d(mesh), MeshMaterial3d(material), transform, SceneEntity));
    }

    if let Some(set) = scene.handle_set() {
        let material = materials.add(standard_material(&set.material.desc, &asset_server));
        mirrored.materials.push(material.clone());

        for handle in set.iter() {
            let mesh = meshes.add(Cuboid::from_length(handle.size as f32));
            mirrored.meshes.push(mesh.clone());

            commands.spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(convert::vec3(handle.position)),
                SceneEntity,
            ));
        }
    }

    if let Some(style) = &editor.config().labels {
        for (index, label) in scene.labels().iter().enumerate() {
            commands.spawn((
                Text::new(label.plane.text.clone()),
                TextFont {
                    font_size: style.font_size * 0.5,
                    ..default()
                },
                TextColor(convert::color(label.color)),
                Node {
                    position_type: PositionType::Absolute,
                    ..default()
                },
                LabelText { index },
                SceneEntity,
            ));
        }
    }

    mirrored.revision = scene.revision();

    bevy::log::debug!(
        "mirrored scene revision {} with {} meshes and {} materials",
        mirrored.revision,
        mirrored.meshes.len(),
        mirrored.materials.len()
    );
}

/// Keeps the label texts centered on their planes.
pub(crate) fn place_labels(
    editor: Res<BoxEditor>,
    mut q_labels: Query<(&LabelText, &ComputedNode, &mut Node, &mut Visibility)>,
) {
    let labels = editor.scene().labels();
    let camera = editor.camera();

    for (text, computed, mut node, mut visibility) in &mut q_labels {
        let Some(label) = labels.get(text.index) else {
            continue;
        };

        let [bottom_left, _, top_right, _] = label.corners();
        match camera.project((bottom_left + top_right) * 0.5) {
            Some(center) => {
                let size = computed.size() * computed.inverse_scale_factor();
                node.left = Val::Px(center.x - size.x / 2.0);
                node.top = Val::Px(center.y - size.y / 2.0);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// Draws the box edges and the gizmo arrows.
pub(crate) fn draw_gizmo(editor: Res<BoxEditor>, mut gizmos: Gizmos) {
    if let Some(mesh) = editor.scene().box_mesh()
        && let Some(color) = mesh.edges
    {
        let color = convert::color(color);
        for [from, to] in mesh.edge_segments() {
            gizmos.line(convert::vec3(from), convert::vec3(to), color);
        }
    }

    for arrow in editor.gizmo().arrows() {
        let color = convert::color(arrow.color);
        gizmos.line(convert::vec3(arrow.start), convert::vec3(arrow.end), color);
        gizmos.arrow(convert::vec3(arrow.end), convert::vec3(arrow.tip), color);
    }
}
