//! Lekk Resto - Restaurant discovery service for Dakar
//!
//! This library provides the search core behind the Lekk Resto list and map
//! views: great-circle distances, radius filtering around the user, faceted
//! filtering and a coordinator that keeps the result set in sync with the
//! active criteria.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{apply_facets, haversine_distance, within_radius, SearchCoordinator};
pub use crate::models::{FilterCriteria, GeoPoint, RadiusPreset, RestaurantRecord, ViewMode};
