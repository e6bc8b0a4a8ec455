use std::borrow::Borrow;

use crate::models::{FilterCriteria, RestaurantRecord};

/// Case-insensitive text match against name or address
///
/// An empty needle matches everything. The needle is used as typed, so
/// surrounding spaces are significant.
#[inline]
pub fn matches_text(record: &RestaurantRecord, search_text: &str) -> bool {
    if search_text.is_empty() {
        return true;
    }

    let needle = search_text.to_lowercase();
    record.name.to_lowercase().contains(&needle) || record.address.to_lowercase().contains(&needle)
}

/// Check if a record satisfies every active facet
///
/// Facets combine with logical AND; an inactive facet never rejects.
#[inline]
pub fn matches_facets(record: &RestaurantRecord, criteria: &FilterCriteria) -> bool {
    if !criteria.district.admits(record.district) {
        return false;
    }

    if !criteria.cuisine.admits(record.cuisine) {
        return false;
    }

    if !criteria.price_tier.admits(record.price_tier) {
        return false;
    }

    if criteria.delivery_only && !record.delivery_available {
        return false;
    }

    if criteria.open_now_only && !record.open_now {
        return false;
    }

    matches_text(record, &criteria.search_text)
}

/// Keep the records matching the text and every active facet, in input order
pub fn apply_facets<I, T>(criteria: &FilterCriteria, records: I) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Borrow<RestaurantRecord>,
{
    records
        .into_iter()
        .filter(|record| matches_facets(record.borrow(), criteria))
        .collect()
}
