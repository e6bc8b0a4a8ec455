use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Errors raised when untrusted input is turned into domain values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("invalid radius {0}m: must be one of 500, 1000, 2000, 3000, 5000")]
    InvalidRadius(u32),

    #[error("unknown {facet} label: {label}")]
    UnknownLabel { facet: &'static str, label: String },

    #[error("latitude and longitude must be given together")]
    IncompleteLocation,
}

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Dakar reference point, used when no live position is known
    pub const DAKAR: GeoPoint = GeoPoint {
        latitude: 14.6928,
        longitude: -17.4467,
    };

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let lat_ok = (-90.0..=90.0).contains(&latitude);
        let lon_ok = (-180.0..=180.0).contains(&longitude);

        // NaN fails both range checks
        if lat_ok && lon_ok {
            Ok(Self { latitude, longitude })
        } else {
            Err(ValidationError::InvalidCoordinates { latitude, longitude })
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<[f64; 2]> for GeoPoint {
    type Error = ValidationError;

    fn try_from([latitude, longitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(latitude, longitude)
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.latitude, point.longitude]
    }
}

/// A closed facet vocabulary with display labels
pub trait FacetLabel: Sized + Copy + PartialEq + 'static {
    /// Facet name used in error messages
    const FACET: &'static str;
    /// Every concrete value, in display order
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Exact label match, as stored on records
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|value| value.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum District {
    Plateau,
    Almadies,
    Medina,
    #[serde(rename = "Point E")]
    PointE,
    Parcelles,
    #[serde(rename = "Liberté")]
    Liberte,
    #[serde(rename = "HLM")]
    Hlm,
}

impl FacetLabel for District {
    const FACET: &'static str = "district";
    const ALL: &'static [Self] = &[
        District::Plateau,
        District::Almadies,
        District::Medina,
        District::PointE,
        District::Parcelles,
        District::Liberte,
        District::Hlm,
    ];

    fn label(self) -> &'static str {
        match self {
            District::Plateau => "Plateau",
            District::Almadies => "Almadies",
            District::Medina => "Medina",
            District::PointE => "Point E",
            District::Parcelles => "Parcelles",
            District::Liberte => "Liberté",
            District::Hlm => "HLM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cuisine {
    Traditionnelle,
    Moderne,
    Fusion,
    #[serde(rename = "Fast Food")]
    FastFood,
}

impl FacetLabel for Cuisine {
    const FACET: &'static str = "cuisine";
    const ALL: &'static [Self] = &[
        Cuisine::Traditionnelle,
        Cuisine::Moderne,
        Cuisine::Fusion,
        Cuisine::FastFood,
    ];

    fn label(self) -> &'static str {
        match self {
            Cuisine::Traditionnelle => "Traditionnelle",
            Cuisine::Moderne => "Moderne",
            Cuisine::Fusion => "Fusion",
            Cuisine::FastFood => "Fast Food",
        }
    }
}

/// Price range shown as `$`, `$$` or `$$$`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "$")]
    Low,
    #[serde(rename = "$$")]
    Medium,
    #[serde(rename = "$$$")]
    High,
}

impl PriceTier {
    /// Human description with the CFA band
    pub fn description(self) -> &'static str {
        match self {
            PriceTier::Low => "Économique (< 3000 CFA)",
            PriceTier::Medium => "Moyen (3000 - 5000 CFA)",
            PriceTier::High => "Premium (> 5000 CFA)",
        }
    }
}

impl FacetLabel for PriceTier {
    const FACET: &'static str = "price tier";
    const ALL: &'static [Self] = &[PriceTier::Low, PriceTier::Medium, PriceTier::High];

    fn label(self) -> &'static str {
        match self {
            PriceTier::Low => "$",
            PriceTier::Medium => "$$",
            PriceTier::High => "$$$",
        }
    }
}

/// Facet selection: either unconstrained or a single concrete value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet<T> {
    Any,
    Only(T),
}

impl<T> Default for Facet<T> {
    fn default() -> Self {
        Facet::Any
    }
}

impl<T: FacetLabel> Facet<T> {
    /// Parse a user-supplied selection.
    ///
    /// Empty input and the UI sentinels ("any", "Tous", "Toutes", "all") select
    /// every value; anything else must name a vocabulary entry, ignoring case.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        let lowered = input.to_lowercase();

        if matches!(lowered.as_str(), "" | "any" | "all" | "tous" | "toutes") {
            return Ok(Facet::Any);
        }

        T::ALL
            .iter()
            .copied()
            .find(|value| value.label().to_lowercase() == lowered)
            .map(Facet::Only)
            .ok_or_else(|| ValidationError::UnknownLabel {
                facet: T::FACET,
                label: input.to_string(),
            })
    }

    /// Whether a record carrying `value` satisfies this selection
    #[inline]
    pub fn admits(&self, value: Option<T>) -> bool {
        match self {
            Facet::Any => true,
            Facet::Only(wanted) => value == Some(*wanted),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Facet::Any)
    }
}

impl<T: FacetLabel> Serialize for Facet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Facet::Any => serializer.serialize_str("any"),
            Facet::Only(value) => serializer.serialize_str(value.label()),
        }
    }
}

/// Fixed search radius choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RadiusPreset {
    #[default]
    M500,
    Km1,
    Km2,
    Km3,
    Km5,
}

impl RadiusPreset {
    pub const ALL: [RadiusPreset; 5] = [
        RadiusPreset::M500,
        RadiusPreset::Km1,
        RadiusPreset::Km2,
        RadiusPreset::Km3,
        RadiusPreset::Km5,
    ];

    pub fn meters(self) -> u32 {
        match self {
            RadiusPreset::M500 => 500,
            RadiusPreset::Km1 => 1000,
            RadiusPreset::Km2 => 2000,
            RadiusPreset::Km3 => 3000,
            RadiusPreset::Km5 => 5000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RadiusPreset::M500 => "500m",
            RadiusPreset::Km1 => "1 km",
            RadiusPreset::Km2 => "2 km",
            RadiusPreset::Km3 => "3 km",
            RadiusPreset::Km5 => "5 km",
        }
    }
}

impl TryFrom<u32> for RadiusPreset {
    type Error = ValidationError;

    fn try_from(meters: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.meters() == meters)
            .ok_or(ValidationError::InvalidRadius(meters))
    }
}

impl From<RadiusPreset> for u32 {
    fn from(preset: RadiusPreset) -> Self {
        preset.meters()
    }
}

impl fmt::Display for RadiusPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A dish offered today
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySpecial {
    pub name: String,
    /// Price in CFA francs
    pub price: u32,
}

/// Read-only restaurant snapshot consumed by the filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub delivery_available: bool,
    #[serde(default)]
    pub open_now: bool,
    #[serde(default, deserialize_with = "lenient_label")]
    pub district: Option<District>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub cuisine: Option<Cuisine>,
    #[serde(default, rename = "priceRange", deserialize_with = "lenient_label")]
    pub price_tier: Option<PriceTier>,
    #[serde(default, rename = "todaySpecials")]
    pub daily_specials: Vec<DailySpecial>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "image")]
    pub image_url: Option<String>,
}

/// Labels outside the vocabulary become `None` instead of failing the whole record
fn lenient_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FacetLabel,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(T::from_label))
}

/// Current filter selections owned by the search coordinator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_text: String,
    pub district: Facet<District>,
    pub cuisine: Facet<Cuisine>,
    pub price_tier: Facet<PriceTier>,
    pub delivery_only: bool,
    pub open_now_only: bool,
    pub radius: RadiusPreset,
    pub user_location: GeoPoint,
}

impl FilterCriteria {
    /// Default criteria centred on `fallback`
    pub fn with_fallback(fallback: GeoPoint) -> Self {
        Self {
            user_location: fallback,
            ..Self::default()
        }
    }

    /// Clear text and facets, keeping radius and location
    pub fn reset_facets(&mut self) {
        *self = Self {
            radius: self.radius,
            user_location: self.user_location,
            ..Self::default()
        };
    }

    /// True when no text or facet narrows the result
    pub fn is_unfiltered(&self) -> bool {
        self.search_text.is_empty()
            && self.district.is_any()
            && self.cuisine.is_any()
            && self.price_tier.is_any()
            && !self.delivery_only
            && !self.open_now_only
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            district: Facet::Any,
            cuisine: Facet::Any,
            price_tier: Facet::Any,
            delivery_only: false,
            open_now_only: false,
            radius: RadiusPreset::default(),
            user_location: GeoPoint::DAKAR,
        }
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Which result view the coordinator is serving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Search page: facets only
    #[default]
    List,
    /// Map page: facets, then radius around the user
    Map,
}
