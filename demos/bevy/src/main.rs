use bevy::prelude::*;

use box_editor_bevy::prelude::*;

mod hud;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "box-editor".into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(BoxEditorSettings {
            config: EditorConfig::perspective(),
        })
        .add_plugins(BoxEditorPlugin)
        .add_plugins(hud::HudPlugin)
        .run();
}
