use ecolor::Color32;
use epaint::{Mesh, Shape, Stroke, TessellationOptions, Tessellator, TextureId};
use glam::{DMat4, DVec3};

use crate::math::{Rect, world_to_screen};

/// Projects world space primitives to the viewport and tessellates them.
pub(crate) struct ShapeBuilder {
    mvp: DMat4,
    viewport: Rect,
    pixels_per_point: f32,
}

impl ShapeBuilder {
    pub(crate) fn new(mvp: DMat4, viewport: Rect, pixels_per_point: f32) -> Self {
        Self {
            mvp,
            viewport,
            pixels_per_point,
        }
    }

    fn tessellate_shape(&self, shape: Shape) -> Mesh {
        let mut tessellator = Tessellator::new(
            self.pixels_per_point,
            TessellationOptions {
                feathering: true,
                ..Default::default()
            },
            Default::default(),
            Default::default(),
        );

        let mut mesh = Mesh::default();
        tessellator.tessellate_shape(shape, &mut mesh);

        mesh.texture_id = TextureId::default();
        mesh
    }

    pub(crate) fn line_segment(&self, from: DVec3, to: DVec3, stroke: Stroke) -> Mesh {
        let from = world_to_screen(self.viewport, self.mvp, from);
        let to = world_to_screen(self.viewport, self.mvp, to);

        match from.zip(to) {
            Some((from, to)) => self.tessellate_shape(Shape::line_segment([from, to], stroke)),
            None => Mesh::default(),
        }
    }

    /// A flat triangular arrowhead from `from` to `to`, `width` pixels wide at its base.
    pub(crate) fn arrowhead(&self, from: DVec3, to: DVec3, width: f32, color: Color32) -> Mesh {
        let start = world_to_screen(self.viewport, self.mvp, from);
        let end = world_to_screen(self.viewport, self.mvp, to);

        self.tessellate_shape(match start.zip(end) {
            Some((start, end)) if start.distance(end) > 1e-3 => {
                let cross = (end - start).normalized().rot90() * width / 2.0;
                Shape::convex_polygon(vec![start - cross, start + cross, end], color, Stroke::NONE)
            }
            _ => Shape::Noop,
        })
    }
}
