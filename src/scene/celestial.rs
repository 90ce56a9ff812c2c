//! Celestial body kinds and per-object data

use crate::geo::to_cartesian;
use glam::DVec3;

use super::RenderHandle;

/// Surface appearance of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    /// Ocean-blue globe with a lat/lon graticule
    Earth,
    /// Flat colour (RGB)
    Solid([u8; 3]),
}

/// Which sort of body an object is; carries its size, material and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// The body the camera orbits and aims at
    Primary,
    Satellite,
}

impl BodyKind {
    /// Sphere radius in render units
    pub fn radius(&self) -> f64 {
        match self {
            Self::Primary => 5.0,
            Self::Satellite => 0.1,
        }
    }

    /// Longitude divisions of the painted sphere mesh; latitude gets half
    pub fn segments(&self) -> u32 {
        match self {
            Self::Primary => 50,
            Self::Satellite => 32,
        }
    }

    /// Height of the body's surface above the primary's surface.
    ///
    /// The primary sits at -radius so that its centre lands on the origin.
    pub fn orbit_height(&self) -> f64 {
        match self {
            Self::Primary => -5.0,
            Self::Satellite => 6.0,
        }
    }

    pub fn material(&self) -> Material {
        match self {
            Self::Primary => Material::Earth,
            Self::Satellite => Material::Solid([255, 255, 255]),
        }
    }

    /// Distance of the body's centre from the origin
    pub fn placement_radius(&self) -> f64 {
        self.orbit_height() + self.radius()
    }

    /// Centre of a body of this kind above `longitude`/`latitude`
    pub fn place(&self, longitude: f64, latitude: f64) -> DVec3 {
        to_cartesian(longitude, latitude, self.placement_radius())
    }
}

/// A named body in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialObject {
    pub name: String,
    pub kind: BodyKind,
    /// Degrees
    pub longitude: f64,
    /// Degrees
    pub latitude: f64,
    pub radius: f64,
    pub handle: RenderHandle,
}

impl CelestialObject {
    pub fn location(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}
