//! Sub-satellite point from a TLE using SGP4 via satkit

use chrono::{DateTime, Datelike, Timelike, Utc};
use glam::DVec3;
use satkit::frametransform::gmst;
use satkit::sgp4::{sgp4, SGP4Error};
use thiserror::Error;

use crate::data::TleRecord;
use crate::geo::{wrap_longitude, GeoPoint};

/// Shortest element line satkit can slice without panicking
const TLE_LINE_LEN: usize = 69;

#[derive(Debug, Error)]
pub enum SubpointError {
    #[error("invalid TLE for {name}: {reason}")]
    InvalidTle { name: String, reason: String },
    #[error("SGP4 propagation failed for {name}: {reason}")]
    Propagation { name: String, reason: String },
}

/// Turns a TLE into the point on the ground directly below the satellite
pub trait SubpointLocator: Send + Sync {
    fn locate(&self, record: &TleRecord) -> Result<GeoPoint, SubpointError>;
}

/// Locates satellites at the wall-clock time of the call
#[derive(Debug, Default, Clone, Copy)]
pub struct Sgp4Locator;

impl SubpointLocator for Sgp4Locator {
    fn locate(&self, record: &TleRecord) -> Result<GeoPoint, SubpointError> {
        subpoint_at(record, Utc::now())
    }
}

pub fn to_instant(at: DateTime<Utc>) -> satkit::Instant {
    satkit::Instant::from_datetime(
        at.year(),
        at.month() as i32,
        at.day() as i32,
        at.hour() as i32,
        at.minute() as i32,
        at.second() as f64 + at.nanosecond() as f64 * 1e-9,
    )
}

fn check_line(record: &TleRecord, line: &str, number: char) -> Result<(), SubpointError> {
    let invalid = |reason: String| SubpointError::InvalidTle {
        name: record.name.clone(),
        reason,
    };
    if !line.is_ascii() {
        return Err(invalid(format!("line {} is not ASCII", number)));
    }
    if line.len() < TLE_LINE_LEN {
        return Err(invalid(format!(
            "line {} has {} characters, expected {}",
            number,
            line.len(),
            TLE_LINE_LEN
        )));
    }
    if !line.starts_with(number) {
        return Err(invalid(format!("line {} does not start with {:?}", number, number)));
    }
    Ok(())
}

/// Sub-satellite longitude/latitude (geocentric, degrees) at `at`
pub fn subpoint_at(record: &TleRecord, at: DateTime<Utc>) -> Result<GeoPoint, SubpointError> {
    check_line(record, &record.line1, '1')?;
    check_line(record, &record.line2, '2')?;

    let mut tle = satkit::TLE::load_2line(&record.line1, &record.line2).map_err(|e| {
        SubpointError::InvalidTle {
            name: record.name.clone(),
            reason: e.to_string(),
        }
    })?;

    let time = to_instant(at);
    let (pos, _vel, errors) = sgp4(&mut tle, &[time]);
    if let Some(error) = errors.iter().find(|e| **e != SGP4Error::SGP4Success) {
        return Err(SubpointError::Propagation {
            name: record.name.clone(),
            reason: error.to_string(),
        });
    }

    // TEME position in meters
    let column = pos.column(0);
    let teme_km = DVec3::new(column[0], column[1], column[2]) / 1000.0;
    let ecef_km = teme_to_ecef(teme_km, gmst(&time));

    let point = ecef_to_geo(ecef_km);
    log::trace!(
        "{} subpoint at {}: ({:.3}, {:.3})",
        record.name,
        at,
        point.longitude,
        point.latitude
    );
    Ok(point)
}

/// Rotate a TEME vector into the Earth-fixed frame about Z by -GMST
pub fn teme_to_ecef(teme: DVec3, gmst: f64) -> DVec3 {
    let (s, c) = gmst.sin_cos();
    DVec3::new(c * teme.x + s * teme.y, -s * teme.x + c * teme.y, teme.z)
}

/// Geocentric longitude/latitude of an Earth-fixed (Z-up) vector
pub fn ecef_to_geo(ecef: DVec3) -> GeoPoint {
    let latitude = ecef.z.atan2(ecef.x.hypot(ecef.y)).to_degrees();
    let longitude = wrap_longitude(ecef.y.atan2(ecef.x).to_degrees());
    GeoPoint {
        longitude,
        latitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn iss() -> TleRecord {
        TleRecord {
            satellite_id: Some(25544),
            name: "ISS (ZARYA)".to_string(),
            date: None,
            line1: "1 25544U 98067A   24061.50000000  .00016717  00000-0  30306-3 0  9991"
                .to_string(),
            line2: "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.49815367442212"
                .to_string(),
        }
    }

    #[test]
    fn test_gmst_at_j2000() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let deg = gmst(&to_instant(t)).to_degrees().rem_euclid(360.0);
        assert!((deg - 280.46).abs() < 0.01, "gmst {}", deg);
    }

    #[test]
    fn test_gmst_advances_one_sidereal_turn_per_day() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let t1 = t0 + chrono::Duration::days(1);
        let g0 = gmst(&to_instant(t0));
        let g1 = gmst(&to_instant(t1));
        let delta = (g1 - g0).to_degrees().rem_euclid(360.0);
        assert!((delta - 0.98565).abs() < 1e-3, "delta {}", delta);
    }

    #[test]
    fn test_teme_to_ecef_rotation() {
        let v = DVec3::new(1000.0, 0.0, 0.0);
        let same = teme_to_ecef(v, 0.0);
        assert!((same - v).length() < 1e-10);

        let quarter = teme_to_ecef(v, std::f64::consts::FRAC_PI_2);
        assert!(quarter.x.abs() < 1e-10);
        assert!((quarter.y + 1000.0).abs() < 1e-10);
    }

    #[test]
    fn test_ecef_to_geo() {
        let p = ecef_to_geo(DVec3::new(0.0, 7000.0, 0.0));
        assert!((p.longitude - 90.0).abs() < 1e-9);
        assert!(p.latitude.abs() < 1e-9);

        let north = ecef_to_geo(DVec3::new(1.0, 0.0, 1.0));
        assert!((north.latitude - 45.0).abs() < 1e-9);
        assert!(north.longitude.abs() < 1e-9);
    }

    #[test]
    fn test_iss_subpoint_respects_inclination() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        let point = subpoint_at(&iss(), at).unwrap();
        assert!(point.latitude.abs() <= 52.0, "lat {}", point.latitude);
        assert!(point.longitude > -180.0 && point.longitude <= 180.0);
    }

    #[test]
    fn test_short_line_is_invalid_tle() {
        let mut record = iss();
        record.line1 = "1 25544U 98067A   24061.5".to_string();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();

        let err = subpoint_at(&record, at).unwrap_err();
        assert!(
            matches!(err, SubpointError::InvalidTle { ref name, .. } if name == "ISS (ZARYA)"),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_garbled_epoch_is_invalid_tle() {
        let mut record = iss();
        record.line1 = record.line1.replacen("24061.50000000", "xx061.5000000x", 1);
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();

        let err = subpoint_at(&record, at).unwrap_err();
        assert!(matches!(err, SubpointError::InvalidTle { .. }), "{:?}", err);
    }

    #[test]
    fn test_swapped_lines_are_invalid_tle() {
        let good = iss();
        let swapped = TleRecord {
            line1: good.line2.clone(),
            line2: good.line1.clone(),
            ..good
        };
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        assert!(matches!(
            subpoint_at(&swapped, at),
            Err(SubpointError::InvalidTle { .. })
        ));
    }
}
