use std::sync::Arc;

use serde::Serialize;

use crate::core::{facets::apply_facets, proximity::within_radius};
use crate::models::{
    Cuisine, District, Facet, FilterCriteria, GeoPoint, PriceTier, RadiusPreset, RestaurantRecord,
    ViewMode,
};
use crate::services::geolocation::{GeolocationError, PositionRequest};

/// Why the coordinator kept its fallback location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackReason {
    Denied,
    Unavailable,
    Unsupported,
}

impl From<&GeolocationError> for FallbackReason {
    fn from(error: &GeolocationError) -> Self {
        match error {
            GeolocationError::PermissionDenied => FallbackReason::Denied,
            GeolocationError::Unavailable(_) | GeolocationError::Dropped => {
                FallbackReason::Unavailable
            }
            GeolocationError::Unsupported => FallbackReason::Unsupported,
        }
    }
}

/// Outcome of the one-shot location lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum LocationStatus {
    Resolved,
    Fallback(FallbackReason),
}

impl LocationStatus {
    /// Non-fatal message for the caller when the default location is in use
    pub fn advisory(&self) -> Option<&'static str> {
        match self {
            LocationStatus::Resolved => None,
            LocationStatus::Fallback(FallbackReason::Unsupported) => {
                Some("Geolocation is not supported, using default location (Dakar).")
            }
            LocationStatus::Fallback(_) => {
                Some("Geolocation unavailable, using default location (Dakar).")
            }
        }
    }
}

/// Lifecycle of a search session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Fallback location in effect, lookup outstanding
    Initializing,
    /// Location is final for the session
    Ready(LocationStatus),
}

/// Owns the filter criteria and records snapshot and keeps the result set current
///
/// Every mutation recomputes the results synchronously: facets first, then
/// the radius around the user when the map view is active.
#[derive(Debug, Clone)]
pub struct SearchCoordinator {
    criteria: FilterCriteria,
    records: Vec<Arc<RestaurantRecord>>,
    mode: ViewMode,
    state: SessionState,
    results: Vec<Arc<RestaurantRecord>>,
}

impl SearchCoordinator {
    pub fn new(records: Vec<Arc<RestaurantRecord>>, mode: ViewMode) -> Self {
        Self::with_criteria(records, mode, FilterCriteria::default())
    }

    pub fn with_criteria(
        records: Vec<Arc<RestaurantRecord>>,
        mode: ViewMode,
        criteria: FilterCriteria,
    ) -> Self {
        let mut coordinator = Self {
            criteria,
            records,
            mode,
            state: SessionState::Initializing,
            results: Vec::new(),
        };
        coordinator.recompute();
        coordinator
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn records(&self) -> &[Arc<RestaurantRecord>] {
        &self.records
    }

    /// Current result set, in snapshot order
    pub fn results(&self) -> &[Arc<RestaurantRecord>] {
        &self.results
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn user_location(&self) -> GeoPoint {
        self.criteria.user_location
    }

    /// `None` while the lookup is still outstanding
    pub fn location_status(&self) -> Option<LocationStatus> {
        match self.state {
            SessionState::Initializing => None,
            SessionState::Ready(status) => Some(status),
        }
    }

    pub fn advisory(&self) -> Option<&'static str> {
        self.location_status().and_then(|status| status.advisory())
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
        self.recompute();
    }

    pub fn set_district(&mut self, district: Facet<District>) {
        self.criteria.district = district;
        self.recompute();
    }

    pub fn set_cuisine(&mut self, cuisine: Facet<Cuisine>) {
        self.criteria.cuisine = cuisine;
        self.recompute();
    }

    pub fn set_price_tier(&mut self, price_tier: Facet<PriceTier>) {
        self.criteria.price_tier = price_tier;
        self.recompute();
    }

    pub fn set_delivery_only(&mut self, delivery_only: bool) {
        self.criteria.delivery_only = delivery_only;
        self.recompute();
    }

    pub fn set_open_now_only(&mut self, open_now_only: bool) {
        self.criteria.open_now_only = open_now_only;
        self.recompute();
    }

    pub fn set_radius(&mut self, radius: RadiusPreset) {
        self.criteria.radius = radius;
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.recompute();
    }

    /// Replace every criterion at once, keeping the session location
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        let user_location = self.criteria.user_location;
        self.criteria = FilterCriteria {
            user_location,
            ..criteria
        };
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.criteria.reset_facets();
        self.recompute();
    }

    pub fn replace_records(&mut self, records: Vec<Arc<RestaurantRecord>>) {
        self.records = records;
        self.recompute();
    }

    /// Apply the answer of the one-shot location lookup
    ///
    /// Only the first answer counts; later ones are ignored. Failures keep the
    /// fallback location. Returns the session's final status.
    pub fn resolve_location(&mut self, outcome: Result<GeoPoint, GeolocationError>) -> LocationStatus {
        if let SessionState::Ready(status) = self.state {
            tracing::warn!("Ignoring late location answer, session already {:?}", status);
            return status;
        }

        let status = match outcome {
            Ok(point) => {
                self.criteria.user_location = point;
                LocationStatus::Resolved
            }
            Err(e) => {
                tracing::info!("Geolocation failed ({}), keeping fallback location", e);
                LocationStatus::Fallback(FallbackReason::from(&e))
            }
        };

        self.state = SessionState::Ready(status);
        self.recompute();
        status
    }

    /// Wait for the one-shot lookup and apply its answer
    pub async fn await_location(&mut self, request: PositionRequest) -> LocationStatus {
        let outcome = request.await;
        self.resolve_location(outcome)
    }

    fn recompute(&mut self) {
        let faceted = apply_facets(&self.criteria, self.records.iter().cloned());

        self.results = match self.mode {
            ViewMode::List => faceted,
            ViewMode::Map => within_radius(
                self.criteria.user_location,
                f64::from(self.criteria.radius.meters()),
                faceted,
            ),
        };

        tracing::debug!(
            "Recomputed {:?} results: {} of {} records",
            self.mode,
            self.results.len(),
            self.records.len()
        );
    }
}
