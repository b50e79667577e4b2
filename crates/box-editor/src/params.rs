use crate::face::{Axis, Face};
use crate::math::DVec3;

/// Smallest allowed box dimension. Every mutation clamps to it.
pub const MIN_DIMENSION: f64 = 10.0;

/// Dimensions of the box, centered at the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoxParams {
    width: f64,
    height: f64,
    length: f64,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self::new(200.0, 200.0, 200.0)
    }
}

impl BoxParams {
    /// Creates new parameters, clamping each dimension to [`MIN_DIMENSION`].
    pub fn new(width: f64, height: f64, length: f64) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            length: clamp_dimension(length),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn dimension(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
            Axis::Z => self.length,
        }
    }

    /// Sets the dimension along `axis`, clamped to [`MIN_DIMENSION`].
    ///
    /// Returns `true` if the stored value changed.
    pub fn set_dimension(&mut self, axis: Axis, value: f64) -> bool {
        let value = clamp_dimension(value);
        let slot = match axis {
            Axis::X => &mut self.width,
            Axis::Y => &mut self.height,
            Axis::Z => &mut self.length,
        };

        let changed = (*slot - value).abs() > f64::EPSILON;
        *slot = value;
        changed
    }

    /// Full size of the box as a vector.
    pub fn size(&self) -> DVec3 {
        DVec3::new(self.width, self.height, self.length)
    }

    pub fn half_extents(&self) -> DVec3 {
        self.size() * 0.5
    }

    /// Signed offset of the handle for `face` from the origin.
    pub fn face_offset(&self, face: Face) -> f64 {
        self.dimension(face.axis()) * 0.5 * face.sign()
    }

    /// World position of the handle for `face`.
    pub fn face_center(&self, face: Face) -> DVec3 {
        face.axis().unit() * self.face_offset(face)
    }

    /// Returns these parameters with the dimension of `face`'s axis recomputed
    /// from a handle at `position`.
    ///
    /// Only the component along the face's axis is read. Negative-side faces
    /// flip its sign so that moving any handle outwards grows the box. The box
    /// stays centered, so the opposite face moves by the same amount.
    pub fn with_handle_position(mut self, face: Face, position: DVec3) -> Self {
        let axis = face.axis();
        let offset = axis.component(position) * face.sign();
        self.set_dimension(axis, 2.0 * offset);
        self
    }
}

fn clamp_dimension(value: f64) -> f64 {
    if value.is_nan() {
        MIN_DIMENSION
    } else {
        value.max(MIN_DIMENSION)
    }
}

impl From<BoxParams> for mint::Vector3<f64> {
    fn from(params: BoxParams) -> Self {
        params.size().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_clamps() {
        let params = BoxParams::new(4.0, -20.0, f64::NAN);
        assert_eq!(params.size(), DVec3::splat(MIN_DIMENSION));
    }

    #[test]
    fn right_handle_at_150_gives_width_300() {
        let params =
            BoxParams::default().with_handle_position(Face::Right, DVec3::new(150.0, 3.0, -8.0));
        assert_eq!(params.width(), 300.0);
        assert_eq!(params.height(), 200.0);
        assert_eq!(params.length(), 200.0);
    }

    #[test]
    fn left_handle_is_sign_flipped() {
        let params =
            BoxParams::default().with_handle_position(Face::Left, DVec3::new(-75.0, 0.0, 0.0));
        assert_eq!(params.width(), 150.0);
    }

    #[test]
    fn negative_side_faces_on_every_axis() {
        let params = BoxParams::default()
            .with_handle_position(Face::Bottom, DVec3::new(0.0, -40.0, 0.0))
            .with_handle_position(Face::Back, DVec3::new(0.0, 0.0, -60.0));
        assert_eq!(params.height(), 80.0);
        assert_eq!(params.length(), 120.0);
    }

    #[test]
    fn small_offsets_clamp_to_minimum() {
        for x in [5.0, 4.9, 0.0, -300.0] {
            let params =
                BoxParams::default().with_handle_position(Face::Right, DVec3::new(x, 0.0, 0.0));
            assert_eq!(params.width(), MIN_DIMENSION, "x = {x}");
        }

        // Dragging a negative-side handle across the origin also clamps.
        let params =
            BoxParams::default().with_handle_position(Face::Top, DVec3::new(0.0, -90.0, 0.0));
        assert_eq!(params.height(), MIN_DIMENSION);
    }

    #[test]
    fn set_dimension_reports_change() {
        let mut params = BoxParams::default();
        assert!(!params.set_dimension(Axis::Y, 200.0));
        assert!(params.set_dimension(Axis::Y, 120.0));
        assert!(params.set_dimension(Axis::Y, 1.0));
        assert_eq!(params.height(), MIN_DIMENSION);
        assert!(!params.set_dimension(Axis::Y, 3.0));
    }

    #[test]
    fn face_centers_sit_on_half_dimensions() {
        let params = BoxParams::new(300.0, 100.0, 40.0);
        assert_eq!(params.face_center(Face::Right), DVec3::new(150.0, 0.0, 0.0));
        assert_eq!(params.face_center(Face::Left), DVec3::new(-150.0, 0.0, 0.0));
        assert_eq!(params.face_center(Face::Top), DVec3::new(0.0, 50.0, 0.0));
        assert_eq!(params.face_center(Face::Bottom), DVec3::new(0.0, -50.0, 0.0));
        assert_eq!(params.face_center(Face::Front), DVec3::new(0.0, 0.0, 20.0));
        assert_eq!(params.face_center(Face::Back), DVec3::new(0.0, 0.0, -20.0));
    }
}
