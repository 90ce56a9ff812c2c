//! Longitude/latitude/radius <-> render-space Cartesian conversion
//!
//! Render space is Y-up. Latitude is the elevation above the XZ plane and
//! longitude is measured as an azimuth with a fixed -90° seam offset, so that
//! longitude 0 lands on +Z where the Earth texture's prime meridian faces the
//! default camera.

use glam::DVec3;

/// Seam offset applied to longitude before conversion (degrees)
pub const LONGITUDE_OFFSET_DEG: f64 = -90.0;

/// A point on the globe in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// Spherical coordinates of a render-space point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoAngle {
    /// Degrees in (-180, 180]
    pub longitude: f64,
    /// Degrees in [-90, 90]
    pub latitude: f64,
    /// Distance from the origin in render units
    pub radius: f64,
}

impl GeoAngle {
    pub fn new(longitude: f64, latitude: f64, radius: f64) -> Self {
        Self {
            longitude,
            latitude,
            radius,
        }
    }

    pub fn to_cartesian(&self) -> DVec3 {
        to_cartesian(self.longitude, self.latitude, self.radius)
    }
}

/// Project longitude/latitude (degrees) at `radius` into render space
pub fn to_cartesian(longitude: f64, latitude: f64, radius: f64) -> DVec3 {
    let azimuth = (-(longitude + LONGITUDE_OFFSET_DEG)).to_radians();
    let elevation = latitude.to_radians();

    let x = radius * elevation.cos() * azimuth.cos();
    let y = radius * elevation.sin();
    let z = radius * elevation.cos() * azimuth.sin();
    DVec3::new(x, y, z)
}

/// Inverse of [`to_cartesian`]
///
/// Longitude comes back normalised into (-180, 180]. The origin has no
/// direction and maps to all zeros.
pub fn to_angle(position: DVec3) -> GeoAngle {
    let radius = position.length();
    if radius == 0.0 {
        return GeoAngle::new(0.0, 0.0, 0.0);
    }

    let horizontal = position.x.hypot(position.z);
    let latitude = position.y.atan2(horizontal).to_degrees();
    // azimuth = 90° - longitude, so x/z swap roles relative to a plain atan2(z, x)
    let longitude = wrap_longitude(position.x.atan2(position.z).to_degrees());

    GeoAngle::new(longitude, latitude, radius)
}

/// Normalise a longitude in degrees into (-180, 180]
pub fn wrap_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Hover readout lines for a geographic position
pub fn format_readout(longitude: f64, latitude: f64) -> [String; 2] {
    let east_west = if longitude < 0.0 { "West" } else { "East" };
    let north_south = if latitude < 0.0 { "South" } else { "North" };
    [
        format!("Longitude: {:.3} {}", longitude.abs(), east_west),
        format!("Latitude: {:.3} {}", latitude.abs(), north_south),
    ]
}
