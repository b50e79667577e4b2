use std::f64::consts::{FRAC_PI_2, TAU};

use crate::math::{DMat4, DVec2, DVec3, Pos2, Ray, Rect, Vec2, screen_to_world, world_to_screen};

const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 20.0;
const PITCH_LIMIT: f64 = FRAC_PI_2 - 1e-3;

/// How the scene is projected to the screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Projection {
    /// Orthographic projection. `size` is the visible half-height in world
    /// units; the half-width is `size * aspect`.
    Orthographic { size: f64 },
    /// Perspective projection with a vertical field of view in radians.
    Perspective { fov_y: f64 },
}

/// Initial camera setup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    pub projection: Projection,
    pub near: f64,
    pub far: f64,
    /// Initial eye position.
    pub position: DVec3,
    /// Point the camera orbits around.
    pub target: DVec3,
    /// Orbit rotation speed, 1.0 rotates a full turn over the viewport height.
    pub rotate_speed: f64,
    pub zoom_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            projection: Projection::Orthographic { size: 400.0 },
            near: 1.0,
            far: 2000.0,
            position: DVec3::splat(400.0),
            target: DVec3::ZERO,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

/// Spherical camera controller orbiting a target point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: DVec3,
    pub radius: f64,
    /// Rotation around the world Y axis, `0.0` looking down -Z.
    pub yaw: f64,
    /// Elevation above the XZ plane.
    pub pitch: f64,
    pub zoom: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    /// Input is ignored while disabled, e.g. while a handle is being dragged.
    pub enabled: bool,
}

impl OrbitCamera {
    pub fn from_position(position: DVec3, target: DVec3) -> Self {
        let offset = position - target;
        let radius = offset.length().max(1e-6);

        Self {
            target,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            zoom: 1.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            enabled: true,
        }
    }

    /// Direction from the target towards the eye.
    fn offset_direction(&self) -> DVec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        DVec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Rotates the camera by a pointer movement in pixels.
    ///
    /// Returns `false` if the controller is disabled.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) -> bool {
        if !self.enabled || viewport_height <= 0.0 {
            return false;
        }

        let height = f64::from(viewport_height);
        self.yaw -= TAU * f64::from(delta.x) / height * self.rotate_speed;
        self.pitch = (self.pitch + TAU * f64::from(delta.y) / height * self.rotate_speed)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        true
    }

    /// Zooms in for positive `amount` and out for negative.
    ///
    /// One unit of `amount` corresponds to one scroll wheel notch.
    pub fn zoom_by(&mut self, amount: f64) -> bool {
        if !self.enabled {
            return false;
        }

        self.zoom =
            (self.zoom * 0.95_f64.powf(-amount * self.zoom_speed)).clamp(MIN_ZOOM, MAX_ZOOM);
        true
    }
}

/// Camera used to render the scene and cast picking rays.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    projection: Projection,
    near: f64,
    far: f64,
    orbit: OrbitCamera,
    viewport: Rect,
}

impl Camera {
    pub fn new(config: CameraConfig, viewport: Rect) -> Self {
        let mut orbit = OrbitCamera::from_position(config.position, config.target);
        orbit.rotate_speed = config.rotate_speed;
        orbit.zoom_speed = config.zoom_speed;

        Self {
            projection: config.projection,
            near: config.near,
            far: config.far,
            orbit,
            viewport,
        }
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn near(&self) -> f64 {
        self.near
    }

    pub fn far(&self) -> f64 {
        self.far
    }

    pub fn orbit(&self) -> &OrbitCamera {
        &self.orbit
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitCamera {
        &mut self.orbit
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Updates the viewport. Returns `true` if it changed.
    pub fn resize(&mut self, viewport: Rect) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        true
    }

    /// Width divided by height of the viewport, `1.0` for an empty viewport.
    pub fn aspect(&self) -> f64 {
        let (width, height) = (self.viewport.width(), self.viewport.height());
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            f64::from(width) / f64::from(height)
        } else {
            1.0
        }
    }

    /// Distance from the eye to the orbit target.
    pub fn distance(&self) -> f64 {
        match self.projection {
            Projection::Orthographic { .. } => self.orbit.radius,
            Projection::Perspective { .. } => self.orbit.radius / self.orbit.zoom,
        }
    }

    /// World position of the eye.
    pub fn eye(&self) -> DVec3 {
        self.orbit.target + self.orbit.offset_direction() * self.distance()
    }

    /// Unit vector from the eye towards the target.
    pub fn forward(&self) -> DVec3 {
        -self.orbit.offset_direction()
    }

    /// Half-width and half-height of the visible area at the orbit target.
    pub fn half_extents(&self) -> DVec2 {
        let half_height = match self.projection {
            Projection::Orthographic { size } => size / self.orbit.zoom,
            Projection::Perspective { fov_y } => self.distance() * (fov_y * 0.5).tan(),
        };
        DVec2::new(half_height * self.aspect(), half_height)
    }

    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye(), self.orbit.target, DVec3::Y)
    }

    pub fn projection_matrix(&self) -> DMat4 {
        match self.projection {
            Projection::Orthographic { .. } => {
                let half = self.half_extents();
                DMat4::orthographic_rh_gl(-half.x, half.x, -half.y, half.y, self.near, self.far)
            }
            Projection::Perspective { fov_y } => {
                DMat4::perspective_rh_gl(fov_y, self.aspect(), self.near, self.far)
            }
        }
    }

    pub fn view_projection(&self) -> DMat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Projects a world position to viewport coordinates.
    pub fn project(&self, world: DVec3) -> Option<Pos2> {
        world_to_screen(self.viewport, self.view_projection(), world)
    }

    /// Calculate a world space ray from given screen space position
    pub fn pointer_ray(&self, screen_pos: Pos2) -> Ray {
        let mat = self.view_projection().inverse();
        let origin = screen_to_world(self.viewport, mat, screen_pos, -1.0);
        let target = screen_to_world(self.viewport, mat, screen_pos, 1.0);

        Ray {
            screen_pos,
            origin,
            direction: (target - origin).normalize(),
        }
    }

    /// World units covered by one viewport pixel at `position`.
    pub fn world_per_pixel(&self, position: DVec3) -> f64 {
        let height = f64::from(self.viewport.height()).max(1.0);
        match self.projection {
            Projection::Orthographic { .. } => self.half_extents().y * 2.0 / height,
            Projection::Perspective { fov_y } => {
                let depth = (position - self.eye()).dot(self.forward()).max(self.near);
                depth * (fov_y * 0.5).tan() * 2.0 / height
            }
        }
    }
}
