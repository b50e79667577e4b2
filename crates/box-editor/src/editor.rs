use enumset::EnumSet;

use crate::camera::Camera;
use crate::config::{EditorConfig, EditorMode};
use crate::face::{Axis, Face};
use crate::gizmo::AxisGizmo;
use crate::label::{ApproximateTextMetrics, TextMetrics};
use crate::math::{DVec3, Pos2, Ray, Rect, Vec2};
use crate::params::BoxParams;
use crate::picking::pick_handle;
use crate::resource::ResourceId;
use crate::scene::Scene;

/// Where the editor is in the pick, drag, commit cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum EditorPhase {
    /// Nothing is attached.
    #[default]
    Idle,
    /// The gizmo is attached to a handle.
    Picked,
    /// The gizmo is being dragged.
    Dragging,
    /// A drag changed the box and ended. The gizmo stays attached.
    Committed,
}

/// Something the editor did in response to an input.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EditorEvent {
    Attached { face: Face, handle: ResourceId },
    Detached { face: Face },
    DragStarted { face: Face, axis: Axis },
    DimensionChanged { axis: Axis, value: f64 },
    Rebuilt { revision: u64 },
    /// The gizmo moved over to the handle that replaced the attached one.
    Reattached { face: Face, handle: ResourceId },
    DragEnded { face: Face },
    Resized { viewport: Rect },
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Attachment {
    face: Face,
    handle: ResourceId,
}

/// The box editor.
///
/// Owns the box parameters and everything derived from them. Frontends feed
/// it pointer and viewport events in viewport coordinates and render from
/// [`Editor::scene`], [`Editor::camera`] and [`Editor::gizmo`].
pub struct Editor {
    config: EditorConfig,
    params: BoxParams,
    scene: Scene,
    camera: Camera,
    gizmo: AxisGizmo,
    phase: EditorPhase,
    attached: Option<Attachment>,
    /// Set when the current drag changed the box.
    drag_committed: bool,
    /// Last pointer position of an orbit drag.
    orbit_anchor: Option<Pos2>,
    pixels_per_point: f32,
    metrics: Box<dyn TextMetrics + Send + Sync>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("mode", &self.config.mode)
            .field("params", &self.params)
            .field("phase", &self.phase)
            .field("attached", &self.attached)
            .field("revision", &self.scene.revision())
            .finish_non_exhaustive()
    }
}

impl Editor {
    pub fn new(config: EditorConfig, viewport: Rect) -> Self {
        Self::with_text_metrics(config, viewport, ApproximateTextMetrics::default())
    }

    /// Creates an editor that sizes label planes with `metrics`.
    pub fn with_text_metrics(
        config: EditorConfig,
        viewport: Rect,
        metrics: impl TextMetrics + Send + Sync + 'static,
    ) -> Self {
        let mut editor = Self {
            params: config.params,
            scene: Scene::default(),
            camera: Camera::new(config.camera, viewport),
            gizmo: AxisGizmo::new(config.gizmo),
            phase: EditorPhase::Idle,
            attached: None,
            drag_committed: false,
            orbit_anchor: None,
            pixels_per_point: 1.0,
            metrics: Box::new(metrics),
            config,
        };
        editor.rebuild();

        log::info!(
            "box editor ready in {} mode with {} handles",
            editor.config.mode.name(),
            editor.scene.handles().count()
        );

        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> EditorMode {
        self.config.mode
    }

    pub fn params(&self) -> &BoxParams {
        &self.params
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn gizmo(&self) -> &AxisGizmo {
        &self.gizmo
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn attached_face(&self) -> Option<Face> {
        self.attached.map(|attachment| attachment.face)
    }

    pub fn attached_handle(&self) -> Option<ResourceId> {
        self.attached.map(|attachment| attachment.handle)
    }

    pub fn is_dragging(&self) -> bool {
        self.gizmo.is_dragging()
    }

    /// Sets the scale used for gizmo tessellation.
    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        self.pixels_per_point = pixels_per_point;
    }

    fn ray(&mut self, pos: Pos2) -> Ray {
        self.gizmo.prepare(&self.camera, self.pixels_per_point);
        self.camera.pointer_ray(pos)
    }

    /// Handles a primary button press at `pos`.
    ///
    /// A press on a visible gizmo arrow starts a drag. Otherwise the handles
    /// are picked; a hit attaches the gizmo and a miss detaches it and starts
    /// orbiting.
    pub fn pointer_down(&mut self, pos: Pos2) -> Vec<EditorEvent> {
        let ray = self.ray(pos);
        let mut events = Vec::new();

        if let Some(attachment) = self.attached
            && let Some(axis) = self.gizmo.begin_drag(&ray)
        {
            self.phase = EditorPhase::Dragging;
            self.drag_committed = false;
            self.camera.orbit_mut().enabled = false;
            events.push(EditorEvent::DragStarted {
                face: attachment.face,
                axis,
            });
            return log_events(events);
        }

        match pick_handle(&ray, self.scene.handles()) {
            Some(hit) => {
                // The face comes from the live handle set, not the hit record.
                if let Some(face) = self.scene.face_of(hit.id) {
                    events.extend(self.attach_handle(face));
                }
            }
            None => {
                events.extend(self.detach_handle());
                self.orbit_anchor = Some(pos);
            }
        }

        log_events(events)
    }

    /// Handles pointer movement to `pos`.
    pub fn pointer_move(&mut self, pos: Pos2) -> Vec<EditorEvent> {
        if self.gizmo.is_dragging() {
            let ray = self.ray(pos);
            return match self.gizmo.update(&ray) {
                Some(result) => self.move_attached_handle(result.position),
                None => Vec::new(),
            };
        }

        if let Some(anchor) = self.orbit_anchor {
            self.orbit(pos - anchor);
            self.orbit_anchor = Some(pos);
        } else {
            self.hover(pos);
        }

        Vec::new()
    }

    /// Handles a primary button release.
    pub fn pointer_up(&mut self) -> Vec<EditorEvent> {
        self.orbit_anchor = None;

        if self.gizmo.end_drag().is_none() {
            return Vec::new();
        }

        self.camera.orbit_mut().enabled = true;
        self.phase = if self.drag_committed {
            EditorPhase::Committed
        } else {
            EditorPhase::Picked
        };

        let events = self
            .attached
            .map(|attachment| EditorEvent::DragEnded {
                face: attachment.face,
            })
            .into_iter()
            .collect();
        log_events(events)
    }

    /// Highlights the gizmo arrow under `pos`. Returns whether one is.
    pub fn hover(&mut self, pos: Pos2) -> bool {
        let ray = self.ray(pos);
        self.gizmo.hover(&ray)
    }

    /// Applies a new position of the attached handle.
    ///
    /// The dimension on the handle's axis is recomputed, the scene is rebuilt
    /// and the gizmo moves over to the new handle for the same face.
    pub fn move_attached_handle(&mut self, position: DVec3) -> Vec<EditorEvent> {
        let Some(attachment) = self.attached else {
            return Vec::new();
        };
        let Some(face) = self.scene.face_of(attachment.handle) else {
            log::warn!("attached handle {} is not in the scene", attachment.handle);
            return Vec::new();
        };

        let params = self.params.with_handle_position(face, position);
        if params == self.params {
            return Vec::new();
        }

        let axis = face.axis();
        self.params = params;

        let mut events = vec![EditorEvent::DimensionChanged {
            axis,
            value: params.dimension(axis),
        }];
        events.push(self.rebuild());
        events.extend(self.reattach(face));

        if self.gizmo.is_dragging() {
            self.drag_committed = true;
        } else {
            self.phase = EditorPhase::Committed;
        }

        log_events(events)
    }

    /// Attaches the gizmo to the handle of `face`, if that face has one.
    pub fn attach(&mut self, face: Face) -> Vec<EditorEvent> {
        log_events(self.attach_handle(face).into_iter().collect())
    }

    /// Detaches the gizmo. Applied dimension changes are kept.
    pub fn detach(&mut self) -> Vec<EditorEvent> {
        log_events(self.detach_handle().into_iter().collect())
    }

    /// Sets one dimension directly, as the dimension sliders do.
    pub fn set_dimension(&mut self, axis: Axis, value: f64) -> Vec<EditorEvent> {
        if !self.params.set_dimension(axis, value) {
            return Vec::new();
        }

        let mut events = vec![EditorEvent::DimensionChanged {
            axis,
            value: self.params.dimension(axis),
        }];
        events.push(self.rebuild());
        if let Some(attachment) = self.attached {
            events.extend(self.reattach(attachment.face));
        }

        log_events(events)
    }

    /// Updates the viewport the scene is rendered into.
    pub fn resize(&mut self, viewport: Rect) -> Vec<EditorEvent> {
        if !self.camera.resize(viewport) {
            return Vec::new();
        }

        log_events(vec![EditorEvent::Resized { viewport }])
    }

    /// Orbits the camera by a pointer movement in pixels. Ignored while dragging.
    pub fn orbit(&mut self, delta: Vec2) -> bool {
        let height = self.camera.viewport().height();
        self.camera.orbit_mut().rotate(delta, height)
    }

    /// Zooms the camera by scroll wheel notches. Ignored while dragging.
    pub fn zoom(&mut self, amount: f64) -> bool {
        self.camera.orbit_mut().zoom_by(amount)
    }

    fn attach_handle(&mut self, face: Face) -> Option<EditorEvent> {
        let handle = self.scene.handle(face)?;

        self.gizmo.attach(handle.position, EnumSet::only(face.axis()));
        self.attached = Some(Attachment {
            face,
            handle: handle.id,
        });
        self.phase = EditorPhase::Picked;
        self.camera.orbit_mut().enabled = true;

        Some(EditorEvent::Attached {
            face,
            handle: handle.id,
        })
    }

    fn detach_handle(&mut self) -> Option<EditorEvent> {
        let attachment = self.attached.take()?;

        self.gizmo.detach();
        self.phase = EditorPhase::Idle;
        self.camera.orbit_mut().enabled = true;

        Some(EditorEvent::Detached {
            face: attachment.face,
        })
    }

    fn rebuild(&mut self) -> EditorEvent {
        self.scene.rebuild(&self.params, &self.config, self.metrics.as_ref());
        EditorEvent::Rebuilt {
            revision: self.scene.revision(),
        }
    }

    /// Moves the attachment to the current handle of `face`.
    fn reattach(&mut self, face: Face) -> Option<EditorEvent> {
        let Some(handle) = self.scene.handle(face) else {
            self.attached = None;
            self.gizmo.detach();
            self.phase = EditorPhase::Idle;
            return None;
        };

        self.gizmo.retarget(handle.position);
        self.attached = Some(Attachment {
            face,
            handle: handle.id,
        });

        Some(EditorEvent::Reattached {
            face,
            handle: handle.id,
        })
    }
}

fn log_events(events: Vec<EditorEvent>) -> Vec<EditorEvent> {
    for event in &events {
        log::debug!("{event:?}");
    }
    events
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0))
    }

    fn editor(config: EditorConfig) -> Editor {
        Editor::new(config, viewport())
    }

    thread_local! {
        static RECORDS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    /// Collects editor records on the calling thread.
    struct ThreadLogger;

    impl log::Log for ThreadLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.target() == module_path!().trim_end_matches("::tests")
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                RECORDS.with(|records| records.borrow_mut().push(record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: ThreadLogger = ThreadLogger;

    fn logged<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Debug);
            }
        });

        RECORDS.with(|records| records.borrow_mut().clear());
        let result = f();
        (result, RECORDS.with(|records| records.take()))
    }

    #[test]
    fn starts_idle_with_one_rebuild() {
        let editor = editor(EditorConfig::isometric());
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert_eq!(editor.scene().revision(), 1);
        assert_eq!(*editor.params(), BoxParams::default());
    }

    #[test]
    fn attach_restricts_gizmo_to_face_axis() {
        let mut editor = editor(EditorConfig::perspective());
        for face in Face::ALL {
            let events = editor.attach(face);
            assert!(matches!(events[..], [EditorEvent::Attached { face: f, .. }] if f == face));
            assert_eq!(editor.gizmo().visible_axes(), EnumSet::only(face.axis()));
            assert_eq!(editor.attached_face(), Some(face));
        }
    }

    #[test]
    fn attach_ignores_faces_without_handles() {
        let mut editor = editor(EditorConfig::isometric());
        assert!(editor.attach(Face::Left).is_empty());
        assert_eq!(editor.phase(), EditorPhase::Idle);
    }

    #[test]
    fn moving_handle_rebuilds_and_reattaches() {
        let mut editor = editor(EditorConfig::isometric());
        editor.attach(Face::Right);
        let old_handle = editor.attached_handle().unwrap();

        let events = editor.move_attached_handle(DVec3::new(150.0, 12.0, -3.0));
        assert_eq!(editor.params().width(), 300.0);
        assert_eq!(editor.params().height(), 200.0);
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            EditorEvent::DimensionChanged {
                axis: Axis::X,
                value: 300.0
            }
        );
        assert_eq!(events[1], EditorEvent::Rebuilt { revision: 2 });
        assert!(matches!(
            events[2],
            EditorEvent::Reattached {
                face: Face::Right,
                ..
            }
        ));

        let new_handle = editor.scene().handle(Face::Right).unwrap();
        assert_ne!(new_handle.id, old_handle);
        assert_eq!(editor.attached_handle(), Some(new_handle.id));
        assert_eq!(editor.gizmo().target(), Some(DVec3::new(150.0, 0.0, 0.0)));
        assert_eq!(editor.phase(), EditorPhase::Committed);
    }

    #[test]
    fn unchanged_dimension_skips_rebuild() {
        let mut editor = editor(EditorConfig::isometric());
        editor.attach(Face::Top);
        assert!(editor.move_attached_handle(DVec3::new(0.0, 100.0, 0.0)).is_empty());
        assert_eq!(editor.scene().revision(), 1);
    }

    #[test]
    fn moving_without_attachment_does_nothing() {
        let mut editor = editor(EditorConfig::isometric());
        assert!(editor.move_attached_handle(DVec3::new(400.0, 0.0, 0.0)).is_empty());
        assert_eq!(*editor.params(), BoxParams::default());
    }

    #[test]
    fn slider_keeps_attachment() {
        let mut editor = editor(EditorConfig::isometric());
        editor.attach(Face::Front);
        let events = editor.set_dimension(Axis::Z, 420.0);
        assert_eq!(events.len(), 3);
        assert_eq!(editor.params().length(), 420.0);
        assert_eq!(editor.gizmo().target(), Some(DVec3::new(0.0, 0.0, 210.0)));
        assert_eq!(editor.attached_handle(), editor.scene().handle(Face::Front).map(|h| h.id));

        // Below the minimum.
        editor.set_dimension(Axis::Z, 1.0);
        assert_eq!(editor.params().length(), 10.0);
        assert!(editor.set_dimension(Axis::Z, 3.0).is_empty());
    }

    #[test]
    fn detach_keeps_dimensions() {
        let mut editor = editor(EditorConfig::perspective());
        editor.attach(Face::Bottom);
        editor.move_attached_handle(DVec3::new(0.0, -40.0, 0.0));
        assert_eq!(editor.params().height(), 80.0);

        let events = editor.detach();
        assert_eq!(events, vec![EditorEvent::Detached { face: Face::Bottom }]);
        assert_eq!(editor.params().height(), 80.0);
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert!(!editor.gizmo().is_attached());
        assert!(editor.detach().is_empty());
    }

    #[test]
    fn resize_reports_only_changes() {
        let mut editor = editor(EditorConfig::isometric());
        assert!(editor.resize(viewport()).is_empty());
        let larger = Rect::from_min_size(Pos2::ZERO, Vec2::new(1600.0, 600.0));
        assert_eq!(editor.resize(larger), vec![EditorEvent::Resized { viewport: larger }]);
    }

    #[test]
    fn empty_space_press_orbits() {
        let mut editor = editor(EditorConfig::isometric());
        let yaw = editor.camera().orbit().yaw;
        assert!(editor.pointer_down(Pos2::new(5.0, 5.0)).is_empty());
        editor.pointer_move(Pos2::new(45.0, 5.0));
        assert_ne!(editor.camera().orbit().yaw, yaw);

        editor.pointer_up();
        let yaw = editor.camera().orbit().yaw;
        editor.pointer_move(Pos2::new(90.0, 5.0));
        assert_eq!(editor.camera().orbit().yaw, yaw);
    }

    #[test]
    fn pointer_down_logs_each_event_once() {
        let mut editor = editor(EditorConfig::isometric());
        let handle = editor.scene().handle(Face::Right).unwrap().position;
        let pos = editor.camera().project(handle).unwrap();

        let (events, records) = logged(|| editor.pointer_down(pos));
        assert!(matches!(events[..], [EditorEvent::Attached { face: Face::Right, .. }]));
        assert_eq!(records.len(), events.len());

        editor.pointer_up();
        let (events, records) = logged(|| editor.pointer_down(Pos2::new(5.0, 5.0)));
        assert!(matches!(events[..], [EditorEvent::Detached { face: Face::Right }]));
        assert_eq!(records.len(), events.len());
    }
}
