use serde::{Deserialize, Serialize};

use crate::models::domain::{DailySpecial, FilterCriteria, GeoPoint, RestaurantRecord};

/// Restaurant as rendered by the list and map views
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantView {
    #[serde(flatten)]
    pub record: RestaurantRecord,
    /// Set by the map view only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl From<&RestaurantRecord> for RestaurantView {
    fn from(record: &RestaurantRecord) -> Self {
        Self {
            record: record.clone(),
            distance_m: None,
            is_favorite: None,
        }
    }
}

/// Position used for a map search and how it was obtained
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    pub center: GeoPoint,
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

/// Response for search and nearby endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<RestaurantView>,
    pub total_results: usize,
    pub criteria: FilterCriteria,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationView>,
    /// Zero-state hint when nothing matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A labelled choice in a facet vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetOption {
    pub value: String,
    pub label: String,
}

/// Facet vocabularies and radius presets for building filter controls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetsResponse {
    pub districts: Vec<FacetOption>,
    pub cuisines: Vec<FacetOption>,
    pub price_tiers: Vec<FacetOption>,
    pub radius_presets: Vec<FacetOption>,
}

/// Detail view of a single restaurant
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetailResponse {
    #[serde(flatten)]
    pub restaurant: RestaurantView,
    pub specials_count: usize,
    pub cheapest_special: Option<DailySpecial>,
}

/// Favorites of one client
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub client_id: String,
    pub favorites: Vec<RestaurantView>,
    pub count: usize,
}

/// Result of toggling a favorite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteResponse {
    pub restaurant_id: String,
    pub is_favorite: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub records_source: String,
    pub favorites_backend: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
