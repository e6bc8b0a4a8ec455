use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Facet, FilterCriteria, GeoPoint, RadiusPreset, ValidationError};

/// Query string of the search page
///
/// GET /api/v1/restaurants/search?q=fatou&district=Plateau&delivery=true
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub q: String,
    pub district: Option<String>,
    pub cuisine: Option<String>,
    pub price: Option<String>,
    #[serde(default)]
    pub delivery: bool,
    #[serde(default)]
    pub open: bool,
}

impl SearchQuery {
    /// Overlay the query onto `base`, rejecting unknown facet labels
    pub fn apply_to(&self, base: FilterCriteria) -> Result<FilterCriteria, ValidationError> {
        Ok(FilterCriteria {
            search_text: self.q.clone(),
            district: parse_optional(self.district.as_deref())?,
            cuisine: parse_optional(self.cuisine.as_deref())?,
            price_tier: parse_optional(self.price.as_deref())?,
            delivery_only: self.delivery,
            open_now_only: self.open,
            ..base
        })
    }
}

fn parse_optional<T: crate::models::FacetLabel>(
    value: Option<&str>,
) -> Result<Facet<T>, ValidationError> {
    value.map_or(Ok(Facet::Any), Facet::parse)
}

/// How the map view orders its results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Snapshot order, as the filters return it
    #[default]
    None,
    /// Closest first
    Distance,
}

/// Query string of the map page
///
/// GET /api/v1/restaurants/nearby?lat=14.69&lon=-17.44&radius=2000&sort=distance
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: Option<f64>,
    pub radius: Option<u32>,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub q: String,
    pub district: Option<String>,
    pub cuisine: Option<String>,
    pub price: Option<String>,
    #[serde(default)]
    pub delivery: bool,
    #[serde(default)]
    pub open: bool,
}

impl NearbyQuery {
    /// Client-reported position, if any
    pub fn location(&self) -> Result<Option<GeoPoint>, ValidationError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).map(Some),
            (None, None) => Ok(None),
            _ => Err(ValidationError::IncompleteLocation),
        }
    }

    /// Requested radius, or `default` when absent
    pub fn radius_or(&self, default: RadiusPreset) -> Result<RadiusPreset, ValidationError> {
        self.radius.map_or(Ok(default), RadiusPreset::try_from)
    }

    pub fn facets(&self) -> SearchQuery {
        SearchQuery {
            q: self.q.clone(),
            district: self.district.clone(),
            cuisine: self.cuisine.clone(),
            price: self.price.clone(),
            delivery: self.delivery,
            open: self.open,
        }
    }
}

/// Optional client identity used to flag favorites
///
/// GET /api/v1/restaurants/1?client=abc
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ClientQuery {
    #[validate(length(min = 1, max = 64))]
    pub client: Option<String>,
}
