use bevy::input::mouse::{AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use box_editor::math::{Pos2, Rect as Viewport, Vec2 as ViewportVec2};

use crate::{BoxEditor, EditorEvents};

/// Scroll distance in pixels that counts as one wheel notch.
const PIXELS_PER_LINE: f32 = 50.0;

/// Logical window area, with the origin at the top left corner.
pub(crate) fn window_viewport(window: &Window) -> Viewport {
    Viewport::from_min_size(Pos2::ZERO, ViewportVec2::new(window.width(), window.height()))
}

pub(crate) fn handle_resize(
    q_window: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut editor: ResMut<BoxEditor>,
    mut events: ResMut<EditorEvents>,
) {
    events.0.clear();

    let Ok(window) = q_window.single() else {
        return;
    };

    let resized = editor.resize(window_viewport(window));
    events.0.extend(resized);
}

pub(crate) fn handle_mouse(
    q_window: Query<&Window, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    scroll: Res<AccumulatedMouseScroll>,
    mut editor: ResMut<BoxEditor>,
    mut events: ResMut<EditorEvents>,
) {
    let Ok(window) = q_window.single() else {
        return;
    };

    editor.set_pixels_per_point(window.scale_factor());

    if let Some(cursor_pos) = window.cursor_position() {
        let pos = Pos2::new(cursor_pos.x, cursor_pos.y);

        let produced = if mouse.just_pressed(MouseButton::Left) {
            editor.pointer_down(pos)
        } else {
            editor.pointer_move(pos)
        };
        events.0.extend(produced);

        if scroll.delta.y != 0.0 {
            let notches = match scroll.unit {
                MouseScrollUnit::Line => scroll.delta.y,
                MouseScrollUnit::Pixel => scroll.delta.y / PIXELS_PER_LINE,
            };
            editor.zoom(f64::from(notches));
        }
    }

    if mouse.just_released(MouseButton::Left) {
        let produced = editor.pointer_up();
        events.0.extend(produced);
    }
}
