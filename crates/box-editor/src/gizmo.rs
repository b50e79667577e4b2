//! A translation gizmo constrained to the world axes.
//!
//! The gizmo is attached to one object position and shows an arrow per
//! visible axis. Dragging an arrow moves the position along that axis only.
//! Hidden axes are neither drawn nor pickable.

use std::ops::{Add, AddAssign, RangeInclusive};

use ecolor::{Color32, Rgba};
use enumset::EnumSet;
use epaint::{Mesh, Stroke};

use crate::camera::Camera;
use crate::face::Axis;
use crate::math::{DMat4, DVec3, Ray, Rect, ray_to_ray, segment_to_segment};
use crate::shape::ShapeBuilder;

/// Arrows fade out while they point almost straight at the camera.
const ARROW_FADE: RangeInclusive<f64> = 0.95..=0.99;

/// Controls the visual style of the gizmo
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GizmoVisuals {
    /// Color of the x axis
    pub x_color: Color32,
    /// Color of the y axis
    pub y_color: Color32,
    /// Color of the z axis
    pub z_color: Color32,
    /// Alpha of the gizmo color when inactive
    pub inactive_alpha: f32,
    /// Alpha of the gizmo color when highlighted/active
    pub highlight_alpha: f32,
    /// Color to use for highlighted and active axes.
    /// By default, the axis color is used with `highlight_alpha`
    pub highlight_color: Option<Color32>,
    /// Width (thickness) of the gizmo strokes
    pub stroke_width: f32,
    /// Gizmo size in pixels
    pub gizmo_size: f32,
}

impl Default for GizmoVisuals {
    fn default() -> Self {
        Self {
            x_color: Color32::from_rgb(255, 0, 125),
            y_color: Color32::from_rgb(0, 255, 125),
            z_color: Color32::from_rgb(0, 125, 255),
            inactive_alpha: 0.7,
            highlight_alpha: 1.0,
            highlight_color: None,
            stroke_width: 4.0,
            gizmo_size: 75.0,
        }
    }
}

impl GizmoVisuals {
    pub fn axis_color(&self, axis: Axis) -> Color32 {
        match axis {
            Axis::X => self.x_color,
            Axis::Y => self.y_color,
            Axis::Z => self.z_color,
        }
    }
}

/// Result of a gizmo drag update.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GizmoResult {
    pub axis: Axis,
    /// Translation since the previous update.
    pub delta: DVec3,
    /// Translation since the drag started.
    pub total: DVec3,
    /// Where the dragged object should be now: its position when the drag
    /// started plus `total`.
    pub position: DVec3,
}

/// Data used to draw the gizmo.
#[derive(Default, Clone, Debug)]
pub struct GizmoDrawData {
    /// Vertices in viewport space.
    pub vertices: Vec<[f32; 2]>,
    /// RGBA colors.
    pub colors: Vec<[f32; 4]>,
    /// Indices to the vertex data.
    pub indices: Vec<u32>,
}

impl GizmoDrawData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<Mesh> for GizmoDrawData {
    fn from(mesh: Mesh) -> Self {
        let (vertices, colors): (Vec<_>, Vec<_>) = mesh
            .vertices
            .iter()
            .map(|vertex| {
                (
                    [vertex.pos.x, vertex.pos.y],
                    Rgba::from(vertex.color).to_array(),
                )
            })
            .unzip();

        Self {
            vertices,
            colors,
            indices: mesh.indices,
        }
    }
}

impl AddAssign for GizmoDrawData {
    fn add_assign(&mut self, rhs: Self) {
        let index_offset = self.vertices.len() as u32;
        self.vertices.extend(rhs.vertices);
        self.colors.extend(rhs.colors);
        self.indices.extend(rhs.indices.into_iter().map(|idx| index_offset + idx));
    }
}

impl Add for GizmoDrawData {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

/// World space geometry of one arrow, for engines that draw their own lines.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GizmoArrow {
    pub axis: Axis,
    pub start: DVec3,
    /// End of the shaft and base of the arrowhead.
    pub end: DVec3,
    pub tip: DVec3,
    pub color: Color32,
}

/// View dependent values, refreshed by [`AxisGizmo::prepare`].
#[derive(Debug, Copy, Clone)]
struct PreparedView {
    view_projection: DMat4,
    viewport: Rect,
    pixels_per_point: f32,
    view_forward: DVec3,
    /// World units per viewport pixel at the gizmo position.
    scale_factor: f64,
    /// How close the pointer needs to be to an arrow before it is focused
    focus_distance: f64,
}

impl Default for PreparedView {
    fn default() -> Self {
        Self {
            view_projection: DMat4::IDENTITY,
            viewport: Rect::NOTHING,
            pixels_per_point: 1.0,
            view_forward: DVec3::NEG_Z,
            scale_factor: 1.0,
            focus_distance: 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct DragState {
    axis: Axis,
    start_position: DVec3,
    start_point: DVec3,
    last_point: DVec3,
}

/// Axis constrained translation gizmo.
#[derive(Debug, Clone, Default)]
pub struct AxisGizmo {
    visuals: GizmoVisuals,
    target: Option<DVec3>,
    visible_axes: EnumSet<Axis>,
    view: PreparedView,
    focused: Option<Axis>,
    drag: Option<DragState>,
}

impl AxisGizmo {
    pub fn new(visuals: GizmoVisuals) -> Self {
        Self {
            visuals,
            ..Default::default()
        }
    }

    pub fn visuals(&self) -> &GizmoVisuals {
        &self.visuals
    }

    /// Attaches the gizmo to an object at `position`, showing only `axes`.
    ///
    /// Any drag in progress is abandoned.
    pub fn attach(&mut self, position: DVec3, axes: EnumSet<Axis>) {
        self.target = Some(position);
        self.visible_axes = axes;
        self.focused = None;
        self.drag = None;
    }

    /// Moves the gizmo to a replacement object without interrupting a drag.
    pub fn retarget(&mut self, position: DVec3) {
        if self.target.is_some() {
            self.target = Some(position);
        }
    }

    pub fn detach(&mut self) {
        self.target = None;
        self.visible_axes = EnumSet::empty();
        self.focused = None;
        self.drag = None;
    }

    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<DVec3> {
        self.target
    }

    pub fn visible_axes(&self) -> EnumSet<Axis> {
        self.visible_axes
    }

    pub fn is_focused(&self) -> bool {
        self.focused.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn active_axis(&self) -> Option<Axis> {
        self.drag.map(|drag| drag.axis)
    }

    /// Updates view dependent sizes from the camera.
    pub fn prepare(&mut self, camera: &Camera, pixels_per_point: f32) {
        let position = self.target.unwrap_or_default();
        let scale_factor = camera.world_per_pixel(position);

        self.view = PreparedView {
            view_projection: camera.view_projection(),
            viewport: camera.viewport(),
            pixels_per_point,
            view_forward: camera.forward(),
            scale_factor,
            focus_distance: scale_factor * f64::from(self.visuals.stroke_width / 2.0 + 5.0),
        };
    }

    /// Start and end of the arrow shaft for `axis`.
    fn arrow_segment(&self, axis: Axis) -> (DVec3, DVec3) {
        let origin = self.target.unwrap_or_default();
        let scale = self.view.scale_factor;
        let width = scale * f64::from(self.visuals.stroke_width);
        let inner_radius = scale * f64::from(self.visuals.gizmo_size) * 0.2;
        let length = scale * f64::from(self.visuals.gizmo_size);

        let start = origin + axis.unit() * width.mul_add(0.5, inner_radius);
        (start, start + axis.unit() * length)
    }

    fn visibility(&self, axis: Axis) -> f64 {
        let dot = self.view.view_forward.dot(axis.unit()).abs();
        let (start, end) = (*ARROW_FADE.start(), *ARROW_FADE.end());
        (1.0 - (dot - start) / (end - start)).clamp(0.0, 1.0)
    }

    fn pick_axis(&self, ray: &Ray, axis: Axis) -> Option<f64> {
        let (start, end) = self.arrow_segment(axis);
        let ray_length = 1e+14;

        let (ray_t, arrow_t) = segment_to_segment(ray.origin, ray.at(ray_length), start, end);

        let ray_point = ray.at(ray_length * ray_t);
        let arrow_point = start + (end - start) * arrow_t;
        let dist = (ray_point - arrow_point).length();

        (self.visibility(axis) > 0.0 && dist <= self.view.focus_distance).then_some(ray_t)
    }

    /// Picks the visible arrow closest to the ray origin. Also returns the
    /// hit's position along the ray, normalized to the picking segment.
    pub fn pick(&self, ray: &Ray) -> Option<(Axis, f64)> {
        if self.target.is_none() {
            return None;
        }

        self.visible_axes
            .iter()
            .filter_map(|axis| self.pick_axis(ray, axis).map(|t| (t, axis)))
            .min_by(|(first, _), (second, _)| {
                first
                    .partial_cmp(second)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(t, axis)| (axis, t))
    }

    /// Highlights the arrow under the pointer. Returns whether any is focused.
    pub fn hover(&mut self, ray: &Ray) -> bool {
        if self.drag.is_none() {
            self.focused = self.pick(ray).map(|(axis, _)| axis);
        }
        self.focused.is_some()
    }

    /// Starts dragging if the ray hits a visible arrow.
    pub fn begin_drag(&mut self, ray: &Ray) -> Option<Axis> {
        let target = self.target?;
        let (axis, _) = self.pick(ray)?;
        let point = self.point_on_axis(axis, ray);

        self.focused = Some(axis);
        self.drag = Some(DragState {
            axis,
            start_position: target,
            start_point: point,
            last_point: point,
        });

        Some(axis)
    }

    /// Updates an ongoing drag with the current pointer ray.
    pub fn update(&mut self, ray: &Ray) -> Option<GizmoResult> {
        let axis = self.drag?.axis;
        let new_point = self.point_on_axis(axis, ray);
        let drag = self.drag.as_mut()?;

        let delta = new_point - drag.last_point;
        let total = new_point - drag.start_point;
        drag.last_point = new_point;

        Some(GizmoResult {
            axis,
            delta,
            total,
            position: drag.start_position + total,
        })
    }

    /// Ends an ongoing drag. Returns the axis that was dragged.
    pub fn end_drag(&mut self) -> Option<Axis> {
        self.focused = None;
        self.drag.take().map(|drag| drag.axis)
    }

    /// Finds the nearest point on the line through the target along `axis`.
    fn point_on_axis(&self, axis: Axis, ray: &Ray) -> DVec3 {
        let origin = self.target.unwrap_or_default();
        let direction = axis.unit();

        let (_ray_t, axis_t) = ray_to_ray(ray.origin, ray.direction, origin, direction);

        origin + direction * axis_t
    }

    fn color(&self, axis: Axis) -> Color32 {
        let highlighted = self.focused == Some(axis);
        let color = self.visuals.axis_color(axis);

        let color = if highlighted {
            self.visuals.highlight_color.unwrap_or(color)
        } else {
            color
        };

        let alpha = if highlighted {
            self.visuals.highlight_alpha
        } else {
            self.visuals.inactive_alpha
        };

        color.linear_multiply(alpha)
    }

    /// Axes that are drawn this frame. While dragging only the dragged axis is.
    fn drawn_axes(&self) -> impl Iterator<Item = Axis> + '_ {
        self.visible_axes.iter().filter(move |axis| {
            self.target.is_some()
                && self.visibility(*axis) > 1e-4
                && self.drag.is_none_or(|drag| drag.axis == *axis)
        })
    }

    /// World space arrows, in the same layout as [`AxisGizmo::draw`].
    pub fn arrows(&self) -> Vec<GizmoArrow> {
        self.drawn_axes()
            .map(|axis| {
                let (start, end) = self.arrow_segment(axis);
                let head = self.view.scale_factor * f64::from(self.visuals.stroke_width) * 2.4;
                GizmoArrow {
                    axis,
                    start,
                    end,
                    tip: end + axis.unit() * head,
                    color: self.color(axis).gamma_multiply(self.visibility(axis) as f32),
                }
            })
            .collect()
    }

    /// Return all the necessary data to draw the gizmo.
    ///
    /// The gizmo draw data consists of vertices in viewport coordinates.
    pub fn draw(&self) -> GizmoDrawData {
        if !self.view.viewport.is_finite() {
            return GizmoDrawData::default();
        }

        let shapes = ShapeBuilder::new(
            self.view.view_projection,
            self.view.viewport,
            self.view.pixels_per_point,
        );

        let mut draw_data = GizmoDrawData::default();
        for arrow in self.arrows() {
            draw_data += shapes
                .line_segment(
                    arrow.start,
                    arrow.end,
                    Stroke::new(self.visuals.stroke_width, arrow.color),
                )
                .into();
            draw_data += shapes
                .arrowhead(
                    arrow.end,
                    arrow.tip,
                    self.visuals.stroke_width * 2.4,
                    arrow.color,
                )
                .into();
        }

        draw_data
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;
    use crate::camera::{CameraConfig, Projection};
    use crate::math::{Pos2, Vec2};

    fn camera(projection: Projection) -> Camera {
        Camera::new(
            CameraConfig {
                projection,
                ..Default::default()
            },
            Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        )
    }

    fn attached(camera: &Camera, position: DVec3, axes: EnumSet<Axis>) -> AxisGizmo {
        let mut gizmo = AxisGizmo::default();
        gizmo.attach(position, axes);
        gizmo.prepare(camera, 1.0);
        gizmo
    }

    /// Ray through the middle of the arrow for `axis`.
    fn ray_at_arrow(gizmo: &AxisGizmo, camera: &Camera, axis: Axis) -> Ray {
        let (start, end) = gizmo.arrow_segment(axis);
        camera.pointer_ray(camera.project((start + end) * 0.5).unwrap())
    }

    #[test]
    fn only_visible_axes_are_pickable() {
        let camera = camera(Projection::Orthographic { size: 400.0 });
        let gizmo = attached(&camera, DVec3::new(100.0, 0.0, 0.0), enum_set!(Axis::X));

        let hit = gizmo.pick(&ray_at_arrow(&gizmo, &camera, Axis::X));
        assert_eq!(hit.map(|(axis, _)| axis), Some(Axis::X));
        assert!(gizmo.pick(&ray_at_arrow(&gizmo, &camera, Axis::Y)).is_none());
        assert!(gizmo.pick(&ray_at_arrow(&gizmo, &camera, Axis::Z)).is_none());
    }

    #[test]
    fn detached_gizmo_picks_nothing() {
        let camera = camera(Projection::Orthographic { size: 400.0 });
        let mut gizmo = attached(&camera, DVec3::ZERO, EnumSet::all());
        let ray = ray_at_arrow(&gizmo, &camera, Axis::Y);
        gizmo.detach();
        assert!(gizmo.pick(&ray).is_none());
        assert!(gizmo.arrows().is_empty());
        assert!(gizmo.draw().is_empty());
    }

    #[test]
    fn drag_moves_along_axis_only() {
        for projection in [
            Projection::Orthographic { size: 400.0 },
            Projection::Perspective {
                fov_y: 45f64.to_radians(),
            },
        ] {
            let camera = camera(projection);
            let start = DVec3::new(0.0, 100.0, 0.0);
            let mut gizmo = attached(&camera, start, enum_set!(Axis::Y));

            let ray = ray_at_arrow(&gizmo, &camera, Axis::Y);
            assert_eq!(gizmo.begin_drag(&ray), Some(Axis::Y));
            assert!(gizmo.is_dragging());

            // Move the pointer to where a point 40 units higher projects.
            let (a, b) = gizmo.arrow_segment(Axis::Y);
            let grabbed = (a + b) * 0.5;
            let target = camera.project(grabbed + DVec3::new(0.0, 40.0, 0.0)).unwrap();
            let result = gizmo.update(&camera.pointer_ray(target)).unwrap();

            assert_eq!(result.axis, Axis::Y);
            assert!((result.total - DVec3::new(0.0, 40.0, 0.0)).length() < 1e-2);
            assert!((result.position - DVec3::new(0.0, 140.0, 0.0)).length() < 1e-2);

            // No movement since the last update.
            let result = gizmo.update(&camera.pointer_ray(target)).unwrap();
            assert!(result.delta.length() < 1e-9);

            assert_eq!(gizmo.end_drag(), Some(Axis::Y));
            assert!(gizmo.update(&camera.pointer_ray(target)).is_none());
        }
    }

    #[test]
    fn retarget_keeps_drag_alive() {
        let camera = camera(Projection::Orthographic { size: 400.0 });
        let mut gizmo = attached(&camera, DVec3::new(100.0, 0.0, 0.0), enum_set!(Axis::X));
        gizmo.begin_drag(&ray_at_arrow(&gizmo, &camera, Axis::X)).unwrap();

        gizmo.retarget(DVec3::new(120.0, 0.0, 0.0));
        assert!(gizmo.is_dragging());
        assert_eq!(gizmo.target(), Some(DVec3::new(120.0, 0.0, 0.0)));

        gizmo.attach(DVec3::ZERO, enum_set!(Axis::X));
        assert!(!gizmo.is_dragging());
    }

    #[test]
    fn draws_one_arrow_per_visible_axis() {
        let camera = camera(Projection::Orthographic { size: 400.0 });
        let gizmo = attached(&camera, DVec3::ZERO, enum_set!(Axis::X | Axis::Z));
        let arrows = gizmo.arrows();
        assert_eq!(arrows.len(), 2);
        assert!(arrows.iter().all(|arrow| arrow.axis != Axis::Y));
        assert!(!gizmo.draw().is_empty());
    }

    #[test]
    fn arrow_length_is_constant_on_screen() {
        let camera = camera(Projection::Orthographic { size: 400.0 });
        let gizmo = attached(&camera, DVec3::ZERO, enum_set!(Axis::X));
        let (start, end) = gizmo.arrow_segment(Axis::X);
        // 800 world units over 600 pixels.
        let expected = 75.0 * 800.0 / 600.0;
        assert!(((end - start).length() - expected).abs() < 1e-9);
    }
}
