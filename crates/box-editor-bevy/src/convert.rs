use bevy::prelude::{Color, Quat, Transform, Vec3};

use box_editor::math::DVec3;
use box_editor::{Camera, Color32, mint};

/// Converts a core vector to a bevy one.
pub(crate) fn vec3(v: DVec3) -> Vec3 {
    bevy_math::DVec3::from(mint::Vector3::<f64>::from(v)).as_vec3()
}

pub(crate) fn color(color: Color32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color::srgba_u8(r, g, b, a)
}

/// Eye transform of the editor camera.
pub(crate) fn camera_transform(camera: &Camera) -> Transform {
    Transform::from_translation(vec3(camera.eye())).looking_at(vec3(camera.orbit().target), Vec3::Y)
}

/// Transform of a rectangle mesh, which lies in the XY plane facing +Z,
/// covering the quad `corners` (bottom left, bottom right, top right, top left).
pub(crate) fn quad_transform(corners: [DVec3; 4]) -> (Transform, [f32; 2]) {
    let [bottom_left, bottom_right, top_right, top_left] = corners.map(vec3);
    let right = bottom_right - bottom_left;
    let up = top_left - bottom_left;

    let rotation = Quat::from_mat3(&bevy::math::Mat3::from_cols(
        right.normalize_or_zero(),
        up.normalize_or_zero(),
        right.cross(up).normalize_or_zero(),
    ));

    (
        Transform::from_translation((bottom_left + top_right) * 0.5).with_rotation(rotation),
        [right.length(), up.length()],
    )
}
