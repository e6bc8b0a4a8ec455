use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{DailySpecial, FacetLabel, GeoPoint, RestaurantRecord};

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub restaurants: String,
    pub daily_specials: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            restaurants: "restaurants".to_string(),
            daily_specials: "daily_specials".to_string(),
        }
    }
}

/// Read-only PostgREST client for the restaurants store
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    client: Client,
    tables: SupabaseTables,
}

/// Row of the `restaurants` table with today's specials embedded
#[derive(Debug, Deserialize)]
struct RestaurantRow {
    id: String,
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    coordinates: Option<Value>,
    #[serde(default)]
    cuisine_type: Option<String>,
    #[serde(default)]
    delivery_available: Option<bool>,
    #[serde(default)]
    opening_hours: Option<Value>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    price_range: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    daily_specials: Vec<SpecialRow>,
}

#[derive(Debug, Deserialize)]
struct SpecialRow {
    name: String,
    price: f64,
    #[serde(default)]
    is_available: Option<bool>,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        anon_key: String,
        tables: SupabaseTables,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            anon_key,
            client,
            tables,
        })
    }

    /// Fetch every restaurant with the specials available today or later
    pub async fn fetch_restaurants(&self) -> Result<Vec<RestaurantRecord>, SupabaseError> {
        let now = Utc::now();
        let today = now.date_naive().format("%Y-%m-%d").to_string();

        let select = format!(
            "*,{}(name,price,is_available,available_date)",
            self.tables.daily_specials
        );
        let url = format!(
            "{}/rest/v1/{}?select={}&{}.available_date=gte.{}&order=name.asc",
            self.base_url.trim_end_matches('/'),
            self.tables.restaurants,
            urlencoding::encode(&select),
            self.tables.daily_specials,
            today
        );

        tracing::debug!("Fetching restaurants from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to fetch restaurants: {} - {}", status, body);
            return Err(SupabaseError::ApiError { status, body });
        }

        let json: Value = response.json().await?;
        let rows = json
            .as_array()
            .ok_or_else(|| SupabaseError::InvalidResponse("Expected an array of rows".into()))?;

        let records: Vec<RestaurantRecord> = rows
            .iter()
            .filter_map(|row| match serde_json::from_value::<RestaurantRow>(row.clone()) {
                Ok(row) => Some(row.into_record(now)),
                Err(e) => {
                    tracing::warn!("Skipping malformed restaurant row: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} restaurants ({} rows)", records.len(), rows.len());

        Ok(records)
    }
}

impl RestaurantRow {
    fn into_record(self, now: DateTime<Utc>) -> RestaurantRecord {
        let address = self.address.unwrap_or_default();
        let district = district_from_address(&address);
        let coordinates = self.coordinates.as_ref().and_then(parse_coordinates);
        let open_now = self
            .opening_hours
            .as_ref()
            .is_some_and(|hours| is_open_at(hours, now));

        let daily_specials = self
            .daily_specials
            .into_iter()
            .filter(|special| special.is_available != Some(false))
            .filter_map(|special| {
                let price = special.price.round();
                (price >= 1.0 && price <= f64::from(u32::MAX)).then(|| DailySpecial {
                    name: special.name,
                    price: price as u32,
                })
            })
            .collect();

        RestaurantRecord {
            id: self.id,
            name: self.name,
            address,
            coordinates,
            rating: self.rating.unwrap_or(0.0).clamp(0.0, 5.0),
            delivery_available: self.delivery_available.unwrap_or(false),
            open_now,
            district,
            cuisine: self.cuisine_type.as_deref().and_then(FacetLabel::from_label),
            price_tier: self.price_range.as_deref().and_then(FacetLabel::from_label),
            daily_specials,
            phone: self.phone,
            image_url: self.image_url,
        }
    }
}

/// District named by the first address segment, e.g. "Plateau, Dakar"
fn district_from_address<T: FacetLabel>(address: &str) -> Option<T> {
    address
        .split(',')
        .next()
        .map(str::trim)
        .and_then(T::from_label)
}

/// Read a GeoJSON point (`[lon, lat]` order) as returned by PostGIS
fn parse_coordinates(value: &Value) -> Option<GeoPoint> {
    let pair = value.get("coordinates")?.as_array()?;
    let lon = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;

    match GeoPoint::new(lat, lon) {
        Ok(point) => Some(point),
        Err(e) => {
            tracing::warn!("Dropping restaurant coordinates: {}", e);
            None
        }
    }
}

/// Evaluate `opening_hours` at `now`
///
/// Expected shape: `{"monday": {"open": "08:00", "close": "22:00"}, ...}`.
/// A day that is missing, null or unparseable counts as closed. A closing time
/// before the opening time runs past midnight.
fn is_open_at(hours: &Value, now: DateTime<Utc>) -> bool {
    let day = match now.weekday() {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    };

    let Some(slot) = hours.get(day) else {
        return false;
    };
    let parse = |field: &str| {
        slot.get(field)
            .and_then(Value::as_str)
            .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M").ok())
    };
    let (Some(open), Some(close)) = (parse("open"), parse("close")) else {
        return false;
    };

    let time = now.time();
    if open <= close {
        time >= open && time < close
    } else {
        time >= open || time < close
    }
}
