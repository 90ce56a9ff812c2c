//! Ray casting against the spheres in a scene

use glam::DVec3;

use crate::scene::{RenderHandle, Scene};

use super::Ray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub handle: RenderHandle,
    /// World-space point on the sphere surface
    pub point: DVec3,
    pub distance: f64,
}

/// Distance along `ray` to the first surface crossing of a sphere in front
/// of the ray origin
pub fn ray_sphere(ray: &Ray, centre: DVec3, radius: f64) -> Option<f64> {
    let oc = ray.origin - centre;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sqrt_disc;
    (far >= 0.0).then_some(far)
}

/// Nearest hit among all attached renderables
pub fn pick(scene: &Scene, ray: &Ray) -> Option<Hit> {
    scene
        .renderables()
        .filter_map(|renderable| {
            ray_sphere(ray, renderable.position, renderable.radius).map(|distance| Hit {
                handle: renderable.handle,
                point: ray.at(distance),
                distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Whether the segment from the camera to `point` passes through a sphere
pub fn is_occluded(camera_pos: DVec3, point: DVec3, centre: DVec3, radius: f64) -> bool {
    let camera_pos = camera_pos - centre;
    let point = point - centre;
    if camera_pos.length_squared() <= radius * radius {
        return false;
    }
    let dir = point - camera_pos;
    let a = dir.dot(dir);
    if a <= 0.0 {
        return false;
    }

    let b = 2.0 * camera_pos.dot(dir);
    let c = camera_pos.dot(camera_pos) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc <= 0.0 {
        return false;
    }

    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    let (tmin, tmax) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

    (0.0..=1.0).contains(&tmin) || (0.0..=1.0).contains(&tmax)
}
