// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, Cuisine, DailySpecial, District, Facet, FacetLabel, FilterCriteria, GeoPoint,
    PriceTier, RadiusPreset, RestaurantRecord, ValidationError, ViewMode,
};
pub use requests::{ClientQuery, NearbyQuery, SearchQuery, SortOrder};
pub use responses::{
    ErrorResponse, FacetOption, FacetsResponse, FavoritesResponse, HealthResponse, LocationView,
    RestaurantDetailResponse, RestaurantView, SearchResponse, ToggleFavoriteResponse,
};
