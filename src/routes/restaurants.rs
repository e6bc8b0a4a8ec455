use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{distance_to, LocationStatus, SearchCoordinator};
use crate::models::{
    ClientQuery, Cuisine, District, ErrorResponse, FacetLabel, FacetOption, FacetsResponse,
    FilterCriteria, GeoPoint, HealthResponse, LocationView, NearbyQuery, PriceTier, RadiusPreset,
    RestaurantDetailResponse, RestaurantView, SearchQuery, SearchResponse, SortOrder, ViewMode,
};
use crate::services::{
    FavoritesBackend, FavoritesStore, FixedPosition, GeolocationProvider, RecordsError,
    SnapshotCache,
};

/// Zero-state hint of the list view
pub const NO_RESULTS_MESSAGE: &str = "Aucun restaurant trouvé";
/// Zero-state hint of the map view
pub const NO_NEARBY_RESULTS_MESSAGE: &str =
    "Aucun restaurant trouvé dans ce rayon. Essayez d'augmenter le rayon de recherche.";

/// Defaults applied to every search session
#[derive(Debug, Clone, Copy)]
pub struct SearchDefaults {
    pub fallback_location: GeoPoint,
    pub default_radius: RadiusPreset,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            fallback_location: GeoPoint::DAKAR,
            default_radius: RadiusPreset::default(),
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<SnapshotCache>,
    pub favorites: Arc<FavoritesStore<FavoritesBackend>>,
    pub search: SearchDefaults,
}

/// Configure all restaurant routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/facets", web::get().to(list_facets))
        .route("/restaurants/search", web::get().to(search_restaurants))
        .route("/restaurants/nearby", web::get().to(nearby_restaurants))
        .route("/restaurants/{id}", web::get().to(get_restaurant));
}

pub(crate) fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

pub(crate) fn records_unavailable(e: &RecordsError) -> HttpResponse {
    tracing::error!("Failed to load restaurants: {}", e);
    HttpResponse::ServiceUnavailable().json(ErrorResponse {
        error: "Failed to load restaurants".to_string(),
        message: e.to_string(),
        status_code: 503,
    })
}

pub(crate) fn not_found(id: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Restaurant not found".to_string(),
        message: format!("No restaurant with id {}", id),
        status_code: 404,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = match state.records.snapshot().await {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::warn!("Records source unhealthy: {}", e);
            "degraded"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        records_source: state.records.source_name().to_string(),
        favorites_backend: state.favorites.backend().name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn label_options<T: FacetLabel>() -> Vec<FacetOption> {
    T::ALL
        .iter()
        .map(|value| FacetOption {
            value: value.label().to_string(),
            label: value.label().to_string(),
        })
        .collect()
}

/// Facet vocabularies endpoint
///
/// GET /api/v1/facets
async fn list_facets() -> impl Responder {
    let price_tiers = PriceTier::ALL
        .iter()
        .map(|tier| FacetOption {
            value: tier.label().to_string(),
            label: tier.description().to_string(),
        })
        .collect();

    let radius_presets = RadiusPreset::ALL
        .iter()
        .map(|preset| FacetOption {
            value: preset.meters().to_string(),
            label: preset.label().to_string(),
        })
        .collect();

    HttpResponse::Ok().json(FacetsResponse {
        districts: label_options::<District>(),
        cuisines: label_options::<Cuisine>(),
        price_tiers,
        radius_presets,
    })
}

/// List view search endpoint
///
/// GET /api/v1/restaurants/search?q=fatou&district=Plateau&delivery=true
async fn search_restaurants(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let criteria = match query.apply_to(FilterCriteria::with_fallback(state.search.fallback_location)) {
        Ok(criteria) => criteria,
        Err(e) => return bad_request("Invalid filter", e.to_string()),
    };

    let snapshot = match state.records.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return records_unavailable(&e),
    };

    let coordinator = SearchCoordinator::with_criteria(snapshot.to_vec(), ViewMode::List, criteria);

    let results: Vec<RestaurantView> = coordinator
        .results()
        .iter()
        .map(|record| RestaurantView::from(&**record))
        .collect();

    tracing::info!(
        "Search {:?} returned {} of {} restaurants",
        coordinator.criteria().search_text,
        results.len(),
        snapshot.len()
    );

    HttpResponse::Ok().json(SearchResponse {
        total_results: results.len(),
        message: results.is_empty().then(|| NO_RESULTS_MESSAGE.to_string()),
        results,
        criteria: coordinator.criteria().clone(),
        location: None,
    })
}

/// Map view search endpoint
///
/// GET /api/v1/restaurants/nearby?lat=14.69&lon=-17.44&radius=2000&sort=distance
///
/// Without `lat`/`lon` the search runs around the fallback location and the
/// response carries an advisory.
async fn nearby_restaurants(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for nearby request: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let location = match query.location() {
        Ok(location) => location,
        Err(e) => return bad_request("Invalid location", e.to_string()),
    };

    let radius = match query.radius_or(state.search.default_radius) {
        Ok(radius) => radius,
        Err(e) => return bad_request("Invalid radius", e.to_string()),
    };

    let base = FilterCriteria {
        radius,
        ..FilterCriteria::with_fallback(state.search.fallback_location)
    };
    let criteria = match query.facets().apply_to(base) {
        Ok(criteria) => criteria,
        Err(e) => return bad_request("Invalid filter", e.to_string()),
    };

    let snapshot = match state.records.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return records_unavailable(&e),
    };

    let mut coordinator = SearchCoordinator::with_criteria(snapshot.to_vec(), ViewMode::Map, criteria);
    let status = coordinator
        .await_location(FixedPosition(location).request_current_position())
        .await;
    let center = coordinator.user_location();

    let mut results: Vec<RestaurantView> = coordinator
        .results()
        .iter()
        .map(|record| RestaurantView {
            distance_m: distance_to(center, record),
            ..RestaurantView::from(&**record)
        })
        .collect();

    if query.sort == SortOrder::Distance {
        results.sort_by(|a, b| {
            let a = a.distance_m.unwrap_or(f64::INFINITY);
            let b = b.distance_m.unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });
    }

    tracing::info!(
        "Nearby search within {} of ({}, {}) returned {} restaurants",
        radius,
        center.latitude(),
        center.longitude(),
        results.len()
    );

    HttpResponse::Ok().json(SearchResponse {
        total_results: results.len(),
        message: results
            .is_empty()
            .then(|| NO_NEARBY_RESULTS_MESSAGE.to_string()),
        results,
        criteria: coordinator.criteria().clone(),
        location: Some(LocationView {
            center,
            resolved: status == LocationStatus::Resolved,
            advisory: status.advisory().map(str::to_string),
        }),
    })
}

/// Restaurant detail endpoint
///
/// GET /api/v1/restaurants/{id}?client=abc
async fn get_restaurant(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ClientQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let id = path.into_inner();

    let record = match state.records.find(&id).await {
        Ok(Some(record)) => record,
        Ok(None) => return not_found(&id),
        Err(e) => return records_unavailable(&e),
    };

    let is_favorite = match &query.client {
        Some(client) => match state.favorites.contains(client, &id).await {
            Ok(is_favorite) => Some(is_favorite),
            Err(e) => {
                tracing::warn!("Failed to read favorites for {}: {}", client, e);
                None
            }
        },
        None => None,
    };

    HttpResponse::Ok().json(RestaurantDetailResponse {
        specials_count: record.daily_specials.len(),
        cheapest_special: record
            .daily_specials
            .iter()
            .min_by_key(|special| special.price)
            .cloned(),
        restaurant: RestaurantView {
            is_favorite,
            ..RestaurantView::from(&*record)
        },
    })
}
