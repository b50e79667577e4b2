use crate::face::Face;
use crate::math::{Ray, intersect_aabb};
use crate::resource::ResourceId;
use crate::scene::HandleObject;

/// A handle hit by a picking ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HandleHit {
    pub id: ResourceId,
    pub face: Face,
    /// Distance along the ray.
    pub distance: f64,
}

/// Picks the handle nearest to the ray origin, if any.
///
/// Only handles are tested; the box and the inner panel never block a pick.
/// Equal distances resolve to the face that comes first in face order.
pub fn pick_handle<'a>(
    ray: &Ray,
    handles: impl IntoIterator<Item = &'a HandleObject>,
) -> Option<HandleHit> {
    handles
        .into_iter()
        .filter_map(|handle| {
            intersect_aabb(ray, handle.min(), handle.max()).map(|distance| HandleHit {
                id: handle.id,
                face: handle.face,
                distance,
            })
        })
        .min_by(|first, second| {
            first
                .distance
                .partial_cmp(&second.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(first.face.index().cmp(&second.face.index()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::label::ApproximateTextMetrics;
    use crate::math::{DVec3, Pos2};
    use crate::params::BoxParams;
    use crate::scene::Scene;

    fn scene() -> Scene {
        let mut scene = Scene::default();
        scene.rebuild(
            &BoxParams::default(),
            &EditorConfig::perspective(),
            &ApproximateTextMetrics::default(),
        );
        scene
    }

    fn ray(origin: DVec3, direction: DVec3) -> Ray {
        Ray {
            screen_pos: Pos2::ZERO,
            origin,
            direction: direction.normalize(),
        }
    }

    #[test]
    fn nearest_handle_wins() {
        let scene = scene();
        // Straight through the right and the left handle.
        let hit =
            pick_handle(&ray(DVec3::new(500.0, 0.0, 0.0), DVec3::NEG_X), scene.handles()).unwrap();
        assert_eq!(hit.face, Face::Right);
        assert_eq!(hit.distance, 395.0);
        assert_eq!(Some(hit.id), scene.handle(Face::Right).map(|h| h.id));

        let hit =
            pick_handle(&ray(DVec3::new(-500.0, 0.0, 0.0), DVec3::X), scene.handles()).unwrap();
        assert_eq!(hit.face, Face::Left);
    }

    #[test]
    fn box_does_not_block_picking() {
        let scene = scene();
        // From inside the box towards the back handle.
        let hit = pick_handle(&ray(DVec3::ZERO, DVec3::NEG_Z), scene.handles()).unwrap();
        assert_eq!(hit.face, Face::Back);
    }

    #[test]
    fn missing_everything_is_none() {
        let scene = scene();
        assert!(
            pick_handle(&ray(DVec3::new(0.0, 500.0, 500.0), DVec3::Y), scene.handles()).is_none()
        );
        assert!(pick_handle(&ray(DVec3::ZERO, DVec3::X), std::iter::empty()).is_none());
    }
}
