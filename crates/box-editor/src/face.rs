use enumset::{EnumSet, EnumSetType, enum_set};

use crate::math::DVec3;

/// World axis a box dimension and its handles live on.
#[derive(Debug, EnumSetType, Hash)]
pub enum Axis {
    /// Width
    X,
    /// Height
    Y,
    /// Length
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Unit vector pointing in the positive direction of this axis.
    pub const fn unit(self) -> DVec3 {
        match self {
            Self::X => DVec3::X,
            Self::Y => DVec3::Y,
            Self::Z => DVec3::Z,
        }
    }

    /// Component of `v` along this axis.
    pub fn component(self, v: DVec3) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    /// The positive and the negative face on this axis, in that order.
    pub const fn faces(self) -> [Face; 2] {
        match self {
            Self::X => [Face::Right, Face::Left],
            Self::Y => [Face::Top, Face::Bottom],
            Self::Z => [Face::Front, Face::Back],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "width",
            Self::Y => "height",
            Self::Z => "length",
        }
    }
}

/// One of the six faces of the box.
///
/// The declaration order is the material order of the box mesh:
/// right, left, top, bottom, front, back.
#[derive(Debug, EnumSetType, Hash)]
pub enum Face {
    /// +X
    Right,
    /// -X
    Left,
    /// +Y
    Top,
    /// -Y
    Bottom,
    /// +Z
    Front,
    /// -Z
    Back,
}

impl Face {
    /// All faces in material order.
    pub const ALL: [Self; 6] = [
        Self::Right,
        Self::Left,
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
    ];

    /// All six faces.
    pub fn all() -> EnumSet<Self> {
        EnumSet::all()
    }

    /// The faces on the positive side of each axis.
    pub const fn positive() -> EnumSet<Self> {
        enum_set!(Self::Right | Self::Top | Self::Front)
    }

    /// Index of this face in [`Face::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Right => 0,
            Self::Left => 1,
            Self::Top => 2,
            Self::Bottom => 3,
            Self::Front => 4,
            Self::Back => 5,
        }
    }

    pub const fn axis(self) -> Axis {
        match self {
            Self::Right | Self::Left => Axis::X,
            Self::Top | Self::Bottom => Axis::Y,
            Self::Front | Self::Back => Axis::Z,
        }
    }

    /// `1.0` for faces on the positive side of their axis, `-1.0` otherwise.
    pub const fn sign(self) -> f64 {
        match self {
            Self::Right | Self::Top | Self::Front => 1.0,
            Self::Left | Self::Bottom | Self::Back => -1.0,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }

    /// Outward unit normal.
    pub fn normal(self) -> DVec3 {
        self.axis().unit() * self.sign()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_order_matches_index() {
        for (i, face) in Face::ALL.into_iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn faces_pair_up_on_their_axis() {
        for axis in Axis::ALL {
            let [positive, negative] = axis.faces();
            assert_eq!(positive.axis(), axis);
            assert_eq!(negative.axis(), axis);
            assert_eq!(positive.opposite(), negative);
            assert!(positive.sign() > 0.0);
            assert!(negative.sign() < 0.0);
        }
    }

    #[test]
    fn normals_point_outwards() {
        assert_eq!(Face::Left.normal(), DVec3::NEG_X);
        assert_eq!(Face::Top.normal(), DVec3::Y);
        assert_eq!(Face::Back.normal(), DVec3::NEG_Z);
    }

    #[test]
    fn positive_set_has_one_face_per_axis() {
        let axes: EnumSet<Axis> = Face::positive().iter().map(Face::axis).collect();
        assert_eq!(axes, EnumSet::all());
    }
}
