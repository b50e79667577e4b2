//! The rebuild pipeline.
//!
//! Everything in the scene is derived from [`BoxParams`] and is thrown away and
//! recreated whenever the parameters change. Nothing is updated in place, so
//! old resource ids never survive a rebuild.

use ecolor::Color32;
use enumset::EnumSet;

use crate::config::{EditorConfig, InnerPanelConfig};
use crate::face::{Axis, Face};
use crate::label::{DimensionLabel, LabelStyle, TextMetrics};
use crate::material::MaterialDesc;
use crate::math::DVec3;
use crate::params::BoxParams;
use crate::resource::{ResourceArena, ResourceId, ResourceKind};

/// A material together with the id of the resource created for it.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSlot {
    pub id: ResourceId,
    pub desc: MaterialDesc,
}

/// A box shaped mesh with one material per face.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMesh {
    pub geometry: ResourceId,
    pub center: DVec3,
    pub size: DVec3,
    /// In [`Face::ALL`] order.
    pub materials: [MaterialSlot; 6],
    pub edges: Option<Color32>,
}

impl BoxMesh {
    fn build(
        arena: &mut ResourceArena,
        center: DVec3,
        size: DVec3,
        materials: [MaterialDesc; 6],
        edges: Option<Color32>,
    ) -> Self {
        let geometry = arena.allocate(ResourceKind::Geometry);
        let materials = materials.map(|desc| MaterialSlot {
            id: arena.allocate(ResourceKind::Material),
            desc,
        });

        Self {
            geometry,
            center,
            size,
            materials,
            edges,
        }
    }

    /// Releases the geometry and every material.
    fn dispose(&self, arena: &mut ResourceArena) {
        arena.release(self.geometry);
        for material in &self.materials {
            arena.release(material.id);
        }
    }

    pub fn material(&self, face: Face) -> &MaterialDesc {
        &self.materials[face.index()].desc
    }

    /// Quad covering `face`.
    pub fn face_quad(&self, face: Face, source: QuadSource) -> Quad {
        Quad::cube_face(
            self.center,
            self.size,
            face,
            self.material(face).clone(),
            source,
        )
    }

    /// The twelve edges as line segments.
    pub fn edge_segments(&self) -> Vec<[DVec3; 2]> {
        let half = self.size * 0.5;
        let mut segments = Vec::with_capacity(12);

        for axis in Axis::ALL {
            let along = axis.unit() * axis.component(half);
            let [u, v] = other_axes(axis);
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let offset = u * u.dot(half) * su + v * v.dot(half) * sv;
                segments.push([
                    self.center + offset - along,
                    self.center + offset + along,
                ]);
            }
        }

        segments
    }
}

/// A draggable marker on one face of the box.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleObject {
    pub id: ResourceId,
    pub face: Face,
    pub position: DVec3,
    /// Edge length of the handle cube.
    pub size: f64,
}

impl HandleObject {
    pub fn min(&self) -> DVec3 {
        self.position - DVec3::splat(self.size * 0.5)
    }

    pub fn max(&self) -> DVec3 {
        self.position + DVec3::splat(self.size * 0.5)
    }
}

/// Handles of the enabled faces, keyed by face.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleSet {
    pub geometry: ResourceId,
    pub material: MaterialSlot,
    handles: [Option<HandleObject>; 6],
}

impl HandleSet {
    fn build(
        arena: &mut ResourceArena,
        params: &BoxParams,
        faces: EnumSet<Face>,
        size: f64,
        material: MaterialDesc,
    ) -> Self {
        let geometry = arena.allocate(ResourceKind::Geometry);
        let material = MaterialSlot {
            id: arena.allocate(ResourceKind::Material),
            desc: material,
        };

        let handles = Face::ALL.map(|face| {
            faces.contains(face).then(|| HandleObject {
                id: arena.allocate(ResourceKind::Handle),
                face,
                position: params.face_center(face),
                size,
            })
        });

        Self {
            geometry,
            material,
            handles,
        }
    }

    fn dispose(&self, arena: &mut ResourceArena) {
        arena.release(self.geometry);
        arena.release(self.material.id);
        for handle in self.iter() {
            arena.release(handle.id);
        }
    }

    pub fn get(&self, face: Face) -> Option<&HandleObject> {
        self.handles[face.index()].as_ref()
    }

    /// Handles in face order.
    pub fn iter(&self) -> impl Iterator<Item = &HandleObject> {
        self.handles.iter().flatten()
    }

    /// Face of the handle with the given identity.
    pub fn face_of(&self, id: ResourceId) -> Option<Face> {
        self.iter()
            .find(|handle| handle.id == id)
            .map(|handle| handle.face)
    }

    pub fn faces(&self) -> EnumSet<Face> {
        self.iter().map(|handle| handle.face).collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What a [`Quad`] belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum QuadSource {
    Box(Face),
    InnerPanel(Face),
    Handle(Face),
}

/// A world space rectangle with a material, for renderers that draw faces
/// one by one.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    /// Counter-clockwise seen from the outside: bottom left, bottom right,
    /// top right, top left.
    pub corners: [DVec3; 4],
    pub normal: DVec3,
    pub material: MaterialDesc,
    pub source: QuadSource,
}

impl Quad {
    /// Texture coordinates of the corners, `v` pointing down.
    pub const UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    fn cube_face(
        center: DVec3,
        size: DVec3,
        face: Face,
        material: MaterialDesc,
        source: QuadSource,
    ) -> Self {
        let half = size * 0.5;
        let normal = face.normal();
        let (right, up) = face_basis(face);
        let face_center = center + normal * face.axis().component(half);
        let right = right * right.abs().dot(half);
        let up = up * up.abs().dot(half);

        Self {
            corners: [
                face_center - right - up,
                face_center + right - up,
                face_center + right + up,
                face_center - right + up,
            ],
            normal,
            material,
            source,
        }
    }

    pub fn center(&self) -> DVec3 {
        self.corners.iter().copied().sum::<DVec3>() / 4.0
    }
}

/// Right and up directions of a face, as seen from outside the box.
fn face_basis(face: Face) -> (DVec3, DVec3) {
    match face {
        Face::Right => (DVec3::NEG_Z, DVec3::Y),
        Face::Left => (DVec3::Z, DVec3::Y),
        Face::Top => (DVec3::X, DVec3::NEG_Z),
        Face::Bottom => (DVec3::X, DVec3::Z),
        Face::Front => (DVec3::X, DVec3::Y),
        Face::Back => (DVec3::NEG_X, DVec3::Y),
    }
}

fn other_axes(axis: Axis) -> [DVec3; 2] {
    match axis {
        Axis::X => [DVec3::Y, DVec3::Z],
        Axis::Y => [DVec3::Z, DVec3::X],
        Axis::Z => [DVec3::X, DVec3::Y],
    }
}

/// Size of the inner panel for given box parameters.
pub fn inner_panel_size(params: &BoxParams, config: &InnerPanelConfig) -> DVec3 {
    DVec3::new(
        (params.width() - 2.0 * config.padding).max(0.0),
        (params.height() - 2.0 * config.padding).max(0.0),
        config.depth,
    )
}

/// All render resources derived from the current box parameters.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    arena: ResourceArena,
    revision: u64,
    box_mesh: Option<BoxMesh>,
    handles: Option<HandleSet>,
    labels: Vec<DimensionLabel>,
    inner_panel: Option<BoxMesh>,
}

impl Scene {
    /// Runs the whole rebuild pipeline.
    ///
    /// Order: box mesh, handles, labels, inner panel. Each step releases what
    /// the previous rebuild created before allocating replacements.
    pub fn rebuild(
        &mut self,
        params: &BoxParams,
        config: &EditorConfig,
        metrics: &dyn TextMetrics,
    ) {
        self.rebuild_box(params, config);
        self.rebuild_handles(params, config);
        self.rebuild_labels(params, config.labels.as_ref(), metrics);
        self.rebuild_inner_panel(params, config.inner_panel.as_ref());

        self.revision += 1;

        log::debug!(
            "scene revision {} built for {:.1} x {:.1} x {:.1}, {} live resources",
            self.revision,
            params.width(),
            params.height(),
            params.length(),
            self.arena.live_count()
        );
    }

    fn rebuild_box(&mut self, params: &BoxParams, config: &EditorConfig) {
        if let Some(old) = self.box_mesh.take() {
            old.dispose(&mut self.arena);
        }

        self.box_mesh = Some(BoxMesh::build(
            &mut self.arena,
            DVec3::ZERO,
            params.size(),
            config.box_style.materials.clone(),
            config.box_style.edges,
        ));
    }

    fn rebuild_handles(&mut self, params: &BoxParams, config: &EditorConfig) {
        if let Some(old) = self.handles.take() {
            old.dispose(&mut self.arena);
        }

        self.handles = Some(HandleSet::build(
            &mut self.arena,
            params,
            config.faces,
            config.handle_style.size,
            config.handle_style.material.clone(),
        ));
    }

    fn rebuild_labels(
        &mut self,
        params: &BoxParams,
        style: Option<&LabelStyle>,
        metrics: &dyn TextMetrics,
    ) {
        for old in self.labels.drain(..) {
            self.arena.release(old.id);
        }

        let Some(style) = style else {
            return;
        };

        for axis in Axis::ALL {
            let id = self.arena.allocate(ResourceKind::Label);
            self.labels.push(DimensionLabel::build(id, axis, params, style, metrics));
        }
    }

    fn rebuild_inner_panel(&mut self, params: &BoxParams, config: Option<&InnerPanelConfig>) {
        if let Some(old) = self.inner_panel.take() {
            old.dispose(&mut self.arena);
        }

        let Some(config) = config else {
            return;
        };

        self.inner_panel = Some(BoxMesh::build(
            &mut self.arena,
            DVec3::ZERO,
            inner_panel_size(params, config),
            config.materials(),
            None,
        ));
    }

    /// Releases every resource. The scene is empty afterwards.
    pub fn clear(&mut self) {
        if let Some(old) = self.box_mesh.take() {
            old.dispose(&mut self.arena);
        }
        if let Some(old) = self.handles.take() {
            old.dispose(&mut self.arena);
        }
        for old in self.labels.drain(..) {
            self.arena.release(old.id);
        }
        if let Some(old) = self.inner_panel.take() {
            old.dispose(&mut self.arena);
        }
    }

    /// Incremented by every rebuild.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn resources(&self) -> &ResourceArena {
        &self.arena
    }

    pub fn box_mesh(&self) -> Option<&BoxMesh> {
        self.box_mesh.as_ref()
    }

    pub fn inner_panel(&self) -> Option<&BoxMesh> {
        self.inner_panel.as_ref()
    }

    pub fn labels(&self) -> &[DimensionLabel] {
        &self.labels
    }

    pub fn handle_set(&self) -> Option<&HandleSet> {
        self.handles.as_ref()
    }

    pub fn handle(&self, face: Face) -> Option<&HandleObject> {
        self.handles.as_ref().and_then(|handles| handles.get(face))
    }

    pub fn handles(&self) -> impl Iterator<Item = &HandleObject> {
        self.handles.iter().flat_map(HandleSet::iter)
    }

    /// Identity lookup of a handle against the current handle set.
    pub fn face_of(&self, id: ResourceId) -> Option<Face> {
        self.handles.as_ref().and_then(|handles| handles.face_of(id))
    }

    /// Every face of the box, the inner panel and the handle cubes as quads.
    pub fn quads(&self) -> Vec<Quad> {
        let mut quads = Vec::new();

        if let Some(mesh) = &self.box_mesh {
            quads.extend(
                Face::ALL
                    .into_iter()
                    .map(|face| mesh.face_quad(face, QuadSource::Box(face))),
            );
        }

        if let Some(panel) = &self.inner_panel {
            quads.extend(
                Face::ALL
                    .into_iter()
                    .map(|face| panel.face_quad(face, QuadSource::InnerPanel(face))),
            );
        }

        if let Some(set) = &self.handles {
            for handle in set.iter() {
                quads.extend(Face::ALL.into_iter().map(|side| {
                    Quad::cube_face(
                        handle.position,
                        DVec3::splat(handle.size),
                        side,
                        set.material.desc.clone(),
                        QuadSource::Handle(handle.face),
                    )
                }));
            }
        }

        quads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::ApproximateTextMetrics;
    use crate::params::MIN_DIMENSION;

    fn rebuilt(params: BoxParams, config: &EditorConfig) -> Scene {
        let mut scene = Scene::default();
        scene.rebuild(&params, config, &ApproximateTextMetrics::default());
        scene
    }

    #[test]
    fn handles_sit_on_half_dimensions() {
        let params = BoxParams::new(300.0, 120.0, 48.0);
        let scene = rebuilt(params, &EditorConfig::perspective());

        let expected = [
            (Face::Right, DVec3::new(150.0, 0.0, 0.0)),
            (Face::Left, DVec3::new(-150.0, 0.0, 0.0)),
            (Face::Top, DVec3::new(0.0, 60.0, 0.0)),
            (Face::Bottom, DVec3::new(0.0, -60.0, 0.0)),
            (Face::Front, DVec3::new(0.0, 0.0, 24.0)),
            (Face::Back, DVec3::new(0.0, 0.0, -24.0)),
        ];
        for (face, position) in expected {
            assert_eq!(scene.handle(face).map(|h| h.position), Some(position), "{face}");
        }
    }

    #[test]
    fn isometric_only_has_positive_handles() {
        let scene = rebuilt(BoxParams::default(), &EditorConfig::isometric());
        assert_eq!(scene.handle_set().map(HandleSet::faces), Some(Face::positive()));
        assert!(scene.handle(Face::Left).is_none());
    }

    #[test]
    fn box_has_six_materials_for_any_valid_size() {
        for d in [MIN_DIMENSION, 10.5, 200.0, 1234.0] {
            for config in [EditorConfig::isometric(), EditorConfig::perspective()] {
                let scene = rebuilt(BoxParams::new(d, d * 2.0, d + 3.0), &config);
                let mesh = scene.box_mesh().unwrap();
                assert_eq!(mesh.materials.len(), 6);
                assert_eq!(mesh.size, DVec3::new(d, d * 2.0, d + 3.0));
                assert_eq!(scene.handles().count(), config.faces.len());
            }
        }
    }

    #[test]
    fn rebuild_is_idempotent_but_recreates_resources() {
        let config = EditorConfig::isometric();
        let params = BoxParams::new(220.0, 180.0, 90.0);
        let mut scene = rebuilt(params, &config);

        let first_mesh = scene.box_mesh().cloned().unwrap();
        let first_handle = scene.handle(Face::Right).cloned().unwrap();
        let first_labels = scene.labels().to_vec();
        let live = scene.resources().live_count();

        scene.rebuild(&params, &config, &ApproximateTextMetrics::default());

        let mesh = scene.box_mesh().unwrap();
        assert_eq!(mesh.size, first_mesh.size);
        for face in Face::ALL {
            assert_eq!(mesh.material(face), first_mesh.material(face));
        }
        assert_ne!(mesh.geometry, first_mesh.geometry);

        let handle = scene.handle(Face::Right).unwrap();
        assert_eq!(handle.position, first_handle.position);
        assert_ne!(handle.id, first_handle.id);

        for (label, first) in scene.labels().iter().zip(&first_labels) {
            assert_eq!(label.plane, first.plane);
            assert_eq!(label.position, first.position);
            assert_ne!(label.id, first.id);
        }

        assert_eq!(scene.revision(), 2);
        assert_eq!(scene.resources().live_count(), live);
    }

    #[test]
    fn old_resources_are_released() {
        let config = EditorConfig::isometric();
        let mut scene = rebuilt(BoxParams::default(), &config);
        let old_geometry = scene.box_mesh().unwrap().geometry;
        let old_panel = scene.inner_panel().unwrap().materials[4].id;
        let old_handle = scene.handle(Face::Top).unwrap().id;

        scene.rebuild(
            &BoxParams::new(100.0, 100.0, 100.0),
            &config,
            &ApproximateTextMetrics::default(),
        );

        for id in [old_geometry, old_panel, old_handle] {
            assert!(!scene.resources().is_live(id));
        }
        assert!(scene.face_of(old_handle).is_none());
    }

    #[test]
    fn resource_count_matches_scene_contents() {
        let scene = rebuilt(BoxParams::default(), &EditorConfig::isometric());
        let resources = scene.resources();
        // Box and panel geometry, plus the handle geometry.
        assert_eq!(resources.live_count_of(ResourceKind::Geometry), 3);
        // Six per box, six per panel, one shared by the handles.
        assert_eq!(resources.live_count_of(ResourceKind::Material), 13);
        assert_eq!(resources.live_count_of(ResourceKind::Handle), 3);
        assert_eq!(resources.live_count_of(ResourceKind::Label), 3);

        let mut scene = scene;
        scene.clear();
        assert_eq!(scene.resources().live_count(), 0);
    }

    #[test]
    fn inner_panel_is_padded() {
        let scene = rebuilt(BoxParams::new(300.0, 200.0, 100.0), &EditorConfig::isometric());
        let panel = scene.inner_panel().unwrap();
        assert_eq!(panel.size, DVec3::new(260.0, 160.0, 20.0));
        assert!(panel.material(Face::Front).texture.is_some());
        assert!(panel.material(Face::Top).texture.is_none());
    }

    #[test]
    fn inner_panel_never_inverts() {
        let scene = rebuilt(BoxParams::new(MIN_DIMENSION, 30.0, 100.0), &EditorConfig::isometric());
        let panel = scene.inner_panel().unwrap();
        assert_eq!(panel.size.x, 0.0);
    }

    #[test]
    fn face_lookup_by_identity() {
        let scene = rebuilt(BoxParams::default(), &EditorConfig::perspective());
        for handle in scene.handles() {
            assert_eq!(scene.face_of(handle.id), Some(handle.face));
        }
    }

    #[test]
    fn quads_face_outwards() {
        let scene = rebuilt(BoxParams::new(100.0, 60.0, 40.0), &EditorConfig::perspective());
        for quad in scene.quads() {
            let [a, b, c, _] = quad.corners;
            let winding = (b - a).cross(c - a).normalize();
            assert!((winding - quad.normal).length() < 1e-9, "{:?}", quad.source);
        }
    }

    #[test]
    fn box_quads_cover_the_faces() {
        let scene = rebuilt(BoxParams::new(100.0, 60.0, 40.0), &EditorConfig::perspective());
        let mesh = scene.box_mesh().unwrap();
        let front = mesh.face_quad(Face::Front, QuadSource::Box(Face::Front));
        assert_eq!(front.center(), DVec3::new(0.0, 0.0, 20.0));
        assert_eq!(front.corners[0], DVec3::new(-50.0, -30.0, 20.0));
        assert_eq!(front.corners[2], DVec3::new(50.0, 30.0, 20.0));
    }

    #[test]
    fn twelve_edges_of_box_length() {
        let scene = rebuilt(BoxParams::new(100.0, 60.0, 40.0), &EditorConfig::isometric());
        let edges = scene.box_mesh().unwrap().edge_segments();
        assert_eq!(edges.len(), 12);
        let total: f64 = edges.iter().map(|[a, b]| (*b - *a).length()).sum();
        assert!((total - 4.0 * (100.0 + 60.0 + 40.0)).abs() < 1e-9);
    }
}
