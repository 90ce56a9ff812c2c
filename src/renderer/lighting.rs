//! Fixed scene lights and per-vertex Lambert shading

use glam::DVec3;

/// Point light in render space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: DVec3,
    /// Linear RGB, 0..1
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Warm key light, a blue fill beside it and a dim brown back light
pub const LIGHTS: [PointLight; 3] = [
    PointLight {
        position: DVec3::new(16.0, 30.0, 18.0),
        color: [1.0, 0.871, 0.635],
        intensity: 0.9,
    },
    PointLight {
        position: DVec3::new(16.0, 30.0, 20.0),
        color: [0.0, 0.51, 1.0],
        intensity: 0.35,
    },
    PointLight {
        position: DVec3::new(-16.0, -26.0, -10.0),
        color: [0.455, 0.31, 0.165],
        intensity: 0.3,
    },
];

pub const AMBIENT: [f32; 3] = [0.25, 0.25, 0.25];

/// Light reaching a surface point with outward unit `normal`, clamped to 1
pub fn shade(point: DVec3, normal: DVec3) -> [f32; 3] {
    let mut light = AMBIENT;
    for lamp in &LIGHTS {
        let to_light = (lamp.position - point).normalize_or_zero();
        let lambert = normal.dot(to_light).max(0.0) as f32 * lamp.intensity;
        for (channel, color) in light.iter_mut().zip(lamp.color) {
            *channel += lambert * color;
        }
    }
    light.map(|c| c.min(1.0))
}

/// Scale an sRGB colour by a light factor
pub fn lit_color(light: [f32; 3], [r, g, b]: [u8; 3]) -> egui::Color32 {
    let scale = |c: u8, l: f32| (c as f32 * l).round() as u8;
    egui::Color32::from_rgb(scale(r, light[0]), scale(g, light[1]), scale(b, light[2]))
}
