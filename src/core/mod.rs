// Core algorithm exports
pub mod coordinator;
pub mod distance;
pub mod facets;
pub mod proximity;

pub use coordinator::{FallbackReason, LocationStatus, SearchCoordinator, SessionState};
pub use distance::{calculate_bounding_box, haversine_distance, is_within_bounding_box, EARTH_RADIUS_M};
pub use facets::{apply_facets, matches_facets, matches_text};
pub use proximity::{distance_to, is_within_radius, within_radius};
