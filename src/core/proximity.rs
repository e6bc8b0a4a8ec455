use std::borrow::Borrow;

use crate::core::distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box};
use crate::models::{GeoPoint, RestaurantRecord};

/// Check if a record lies within `radius_m` of `center`
///
/// Records without coordinates never match.
#[inline]
pub fn is_within_radius(center: GeoPoint, radius_m: f64, record: &RestaurantRecord) -> bool {
    record
        .coordinates
        .is_some_and(|point| haversine_distance(center, point) <= radius_m)
}

/// Keep the records within `radius_m` of `center`, in input order
///
/// Works over owned records, references or shared pointers alike. The radius
/// must be finite and non-negative; boundary code validates it through
/// `RadiusPreset`.
pub fn within_radius<I, T>(center: GeoPoint, radius_m: f64, records: I) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Borrow<RestaurantRecord>,
{
    debug_assert!(
        radius_m.is_finite() && radius_m >= 0.0,
        "radius must be a finite non-negative number, got {}",
        radius_m
    );

    // Stage 1: bounding box pre-filter, Stage 2: exact Haversine check
    let bbox = calculate_bounding_box(center, radius_m);

    records
        .into_iter()
        .filter(|record| {
            let record = record.borrow();
            match record.coordinates {
                Some(point) => {
                    is_within_bounding_box(point, &bbox)
                        && haversine_distance(center, point) <= radius_m
                }
                None => false,
            }
        })
        .collect()
}

/// Distance from `center` to a record, when it has coordinates
#[inline]
pub fn distance_to(center: GeoPoint, record: &RestaurantRecord) -> Option<f64> {
    record
        .coordinates
        .map(|point| haversine_distance(center, point))
}
