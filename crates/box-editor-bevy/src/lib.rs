//! Provides the box editor for the [Bevy](https://bevyengine.org/) game engine.
//!
//! # Usage
//!
//! Insert [`BoxEditorSettings`] with the configuration you want and add
//! [`BoxEditorPlugin`]. The plugin spawns the camera and the lights, mirrors
//! the editor scene into entities and drives the editor with the mouse.
//!
//! ```ignore
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .insert_resource(BoxEditorSettings {
//!         config: EditorConfig::perspective(),
//!     })
//!     .add_plugins(BoxEditorPlugin)
//!     .run();
//! ```
//!
//! The editor itself is available as the [`BoxEditor`] resource, and the
//! events produced this frame as [`EditorEvents`].

use bevy::prelude::{Projection, *};
use bevy::window::PrimaryWindow;

pub use box_editor::*;

pub mod prelude;

mod convert;
mod mouse_interact;
mod render;

pub struct BoxEditorPlugin;

impl Plugin for BoxEditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BoxEditorSettings>()
            .init_resource::<EditorEvents>()
            .init_resource::<render::MirroredScene>()
            .add_systems(Startup, setup_editor)
            .add_systems(
                Update,
                (
                    mouse_interact::handle_resize,
                    mouse_interact::handle_mouse,
                    render::sync_camera,
                    render::sync_scene,
                    render::place_labels,
                    render::draw_gizmo,
                )
                    .chain()
                    .run_if(resource_exists::<BoxEditor>),
            );
    }
}

/// Configuration the editor is created from at startup.
#[derive(Resource, Debug, Clone, Default)]
pub struct BoxEditorSettings {
    pub config: EditorConfig,
}

/// The editor, created at startup.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct BoxEditor(pub Editor);

/// Events the editor produced this frame.
#[derive(Resource, Debug, Default)]
pub struct EditorEvents(pub Vec<EditorEvent>);

/// Marks the camera the editor renders through.
#[derive(Component)]
pub struct EditorCamera;

// Ambient and directional light intensities are given on a 0..1 scale.
const AMBIENT_BRIGHTNESS: f32 = 600.0;
const DIRECTIONAL_ILLUMINANCE: f32 = 4000.0;

fn setup_editor(
    mut commands: Commands,
    settings: Res<BoxEditorSettings>,
    q_window: Query<&Window, With<PrimaryWindow>>,
) {
    let viewport = q_window
        .single()
        .map(mouse_interact::window_viewport)
        .unwrap_or(box_editor::math::Rect::NOTHING);

    let config = settings.config.clone();
    let editor = Editor::new(config.clone(), viewport);

    let projection = match config.camera.projection {
        box_editor::Projection::Orthographic { .. } => {
            Projection::Orthographic(OrthographicProjection {
                near: config.camera.near as f32,
                far: config.camera.far as f32,
                ..OrthographicProjection::default_3d()
            })
        }
        box_editor::Projection::Perspective { fov_y } => {
            Projection::Perspective(PerspectiveProjection {
                fov: fov_y as f32,
                near: config.camera.near as f32,
                far: config.camera.far as f32,
                ..default()
            })
        }
    };

    let lighting = config.lighting;

    commands.insert_resource(ClearColor(convert::color(config.background)));

    commands.spawn((
        Camera3d::default(),
        projection,
        convert::camera_transform(editor.camera()),
        AmbientLight {
            color: convert::color(lighting.ambient_color),
            brightness: lighting.ambient_intensity * AMBIENT_BRIGHTNESS,
            ..default()
        },
        EditorCamera,
    ));

    commands.spawn((
        DirectionalLight {
            color: convert::color(lighting.directional_color),
            illuminance: lighting.directional_intensity * DIRECTIONAL_ILLUMINANCE,
            ..default()
        },
        Transform::from_translation(convert::vec3(lighting.directional_from))
            .looking_at(Vec3::ZERO, Vec3::Y),
    ));

    bevy::log::info!(
        "box editor plugin started in {} mode",
        config.mode.name()
    );

    commands.insert_resource(BoxEditor(editor));
}
