use bevy::prelude::*;

use box_editor_bevy::prelude::*;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(Update, update_hud.run_if(resource_exists::<BoxEditor>));
    }
}

#[derive(Component)]
struct HudText;

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::BLACK),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(12.0),
            ..default()
        },
        HudText,
    ));
}

fn update_hud(
    editor: Res<BoxEditor>,
    events: Res<EditorEvents>,
    mut q_text: Query<&mut Text, With<HudText>>,
) {
    if events.0.is_empty() && !editor.is_changed() {
        return;
    }

    for event in &events.0 {
        if let EditorEvent::DimensionChanged { axis, value } = event {
            info!("{} changed to {value:.0}", axis.name());
        }
    }

    let params = editor.params();
    let selected = editor
        .attached_face()
        .map_or_else(|| "none".to_owned(), |face| face.to_string());

    for mut text in &mut q_text {
        text.0 = format!(
            "width {:.0}  height {:.0}  length {:.0}\nselected handle: {selected}",
            params.width(),
            params.height(),
            params.length(),
        );
    }
}
