//! Perspective camera orbiting the primary body

use glam::{DMat4, DVec2, DVec3, DVec4};

use crate::geo::{to_angle, to_cartesian, wrap_longitude, GeoAngle};

/// Distance change per zoom button press (render units)
pub const ZOOM_STEP: f64 = 2.0;

/// Longitude advance per frame while auto-rotating (degrees)
pub const ROTATION_STEP_DEG: f64 = 0.05;

/// Ray in world space with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Camera placed by an absolute position and aimed at a target
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: DVec3,
    /// Point the camera looks at (usually the primary body's centre)
    pub target: DVec3,
    /// Vertical field of view in radians
    pub fov_y: f64,
    pub near: f64,
    pub far: f64,
    /// Closest the zoom controls will bring the camera to the origin
    pub min_distance: f64,
    /// Farthest the zoom controls will move the camera from the origin
    pub max_distance: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 20.0),
            target: DVec3::ZERO,
            fov_y: 75.0_f64.to_radians(),
            near: 0.1,
            far: 1000.0,
            min_distance: 6.0,
            max_distance: 500.0,
        }
    }
}

impl Camera {
    /// Longitude/latitude/radius of the camera about the origin
    pub fn angle(&self) -> GeoAngle {
        to_angle(self.position)
    }

    pub fn look_at(&mut self, target: DVec3) {
        self.target = target;
    }

    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.target, DVec3::Y)
    }

    pub fn projection_matrix(&self, aspect_ratio: f64) -> DMat4 {
        DMat4::perspective_rh(self.fov_y, aspect_ratio, self.near, self.far)
    }

    pub fn view_projection_matrix(&self, aspect_ratio: f64) -> DMat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }

    /// Move along the current bearing by `delta` and re-aim at `target`
    pub fn step_zoom(&mut self, delta: f64, target: DVec3) {
        let angle = self.angle();
        let radius = (angle.radius + delta).clamp(self.min_distance, self.max_distance);
        self.position = to_cartesian(angle.longitude, angle.latitude, radius);
        self.look_at(target);
    }

    /// Advance the camera's longitude by `step_deg` and re-aim at `target`
    pub fn rotate(&mut self, step_deg: f64, target: DVec3) {
        let angle = self.angle();
        let longitude = wrap_longitude(wrap_longitude(angle.longitude) + step_deg);
        self.position = to_cartesian(longitude, angle.latitude, angle.radius);
        self.look_at(target);
    }

    /// Orbit around the target (mouse drag)
    pub fn orbit(&mut self, delta_x: f64, delta_y: f64) {
        let angle = to_angle(self.position - self.target);
        let longitude = wrap_longitude(angle.longitude - delta_x * 0.2);
        let latitude = (angle.latitude + delta_y * 0.2).clamp(-85.0, 85.0);
        self.position = self.target + to_cartesian(longitude, latitude, angle.radius);
    }

    /// Zoom towards the target (mouse wheel)
    pub fn scroll_zoom(&mut self, delta: f64) {
        let offset = self.position - self.target;
        let distance = (offset.length() * (1.0 - delta * 0.1))
            .clamp(self.min_distance, self.max_distance);
        self.position = self.target + offset.normalize_or_zero() * distance;
    }

    /// World-space ray through a point in normalised device coordinates
    pub fn ray_from_ndc(&self, ndc: DVec2, aspect_ratio: f64) -> Ray {
        let inverse = self.view_projection_matrix(aspect_ratio).inverse();
        let near = inverse.project_point3(DVec3::new(ndc.x, ndc.y, 0.0));
        let far = inverse.project_point3(DVec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: self.position,
            direction: (far - near).normalize_or_zero(),
        }
    }

    /// Normalised device coordinates of a world point, None when behind the camera
    pub fn project(&self, point: DVec3, aspect_ratio: f64) -> Option<DVec3> {
        let clip = self.view_projection_matrix(aspect_ratio) * DVec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(DVec3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w))
    }

    /// Camera-space up direction in world coordinates
    pub fn up(&self) -> DVec3 {
        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(DVec3::Y).normalize_or_zero();
        right.cross(forward)
    }
}
