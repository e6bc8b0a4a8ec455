use crate::models::{BoundingBox, GeoPoint};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the Haversine distance between two points in meters
///
/// Symmetric, zero for identical points and non-negative. Inputs are trusted
/// to be valid coordinates; `GeoPoint` enforces that at construction.
#[inline]
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1_rad = a.latitude().to_radians();
    let lat2_rad = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Calculate a bounding box that contains every point within `radius_m` of `center`
///
/// Used as a cheap reject before the Haversine check, so it must never be
/// smaller than the circle. The longitude half-width is the exact extent of a
/// spherical cap, `asin(sin(r/R) / cos(lat))`; near the poles or across the
/// antimeridian the box spans every longitude.
pub fn calculate_bounding_box(center: GeoPoint, radius_m: f64) -> BoundingBox {
    // Padding absorbs rounding at the edge of the circle
    let angular = radius_m / EARTH_RADIUS_M * 1.000_001;
    let lat_delta = angular.to_degrees();

    let min_lat = (center.latitude() - lat_delta).max(-90.0);
    let max_lat = (center.latitude() + lat_delta).min(90.0);

    let cos_lat = center.latitude().to_radians().cos();
    let full_span = max_lat >= 90.0 || min_lat <= -90.0 || angular.sin() >= cos_lat;

    let (min_lon, max_lon) = if full_span {
        (-180.0, 180.0)
    } else {
        let lon_delta = (angular.sin() / cos_lat).asin().to_degrees();
        let min_lon = center.longitude() - lon_delta;
        let max_lon = center.longitude() + lon_delta;
        if min_lon < -180.0 || max_lon > 180.0 {
            (-180.0, 180.0)
        } else {
            (min_lon, max_lon)
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(point: GeoPoint, bbox: &BoundingBox) -> bool {
    point.latitude() >= bbox.min_lat
        && point.latitude() <= bbox.max_lat
        && point.longitude() >= bbox.min_lon
        && point.longitude() <= bbox.max_lon
}
