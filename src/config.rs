use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{GeoPoint, RadiusPreset, ValidationError};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub records: RecordsSettings,
    #[serde(default)]
    pub supabase: Option<SupabaseSettings>,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub favorites: FavoritesSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which records source to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordsSourceKind {
    #[default]
    Static,
    Supabase,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordsSettings {
    #[serde(default)]
    pub source: RecordsSourceKind,
    #[serde(default = "default_fixture_path")]
    pub fixture_path: String,
}

impl Default for RecordsSettings {
    fn default() -> Self {
        Self {
            source: RecordsSourceKind::default(),
            fixture_path: default_fixture_path(),
        }
    }
}

fn default_fixture_path() -> String { "data/restaurants.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_restaurants_table")]
    pub restaurants_table: String,
    #[serde(default = "default_specials_table")]
    pub specials_table: String,
}

fn default_restaurants_table() -> String { "restaurants".to_string() }
fn default_specials_table() -> String { "daily_specials".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: default_cache_ttl() }
    }
}

fn default_cache_ttl() -> u64 { 300 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FavoritesSettings {
    /// In-memory store when absent
    pub redis_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,
    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,
    #[serde(default = "default_radius_m")]
    pub default_radius_m: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            fallback_latitude: default_fallback_latitude(),
            fallback_longitude: default_fallback_longitude(),
            default_radius_m: default_radius_m(),
        }
    }
}

impl SearchSettings {
    pub fn fallback_location(&self) -> Result<GeoPoint, ValidationError> {
        GeoPoint::new(self.fallback_latitude, self.fallback_longitude)
    }

    pub fn default_radius(&self) -> Result<RadiusPreset, ValidationError> {
        RadiusPreset::try_from(self.default_radius_m)
    }
}

fn default_fallback_latitude() -> f64 { GeoPoint::DAKAR.latitude() }
fn default_fallback_longitude() -> f64 { GeoPoint::DAKAR.longitude() }
fn default_radius_m() -> u32 { 500 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LEKK_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LEKK__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LEKK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LEKK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the search core cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search
            .fallback_location()
            .map_err(|e| ConfigError::Message(format!("search.fallback: {}", e)))?;
        self.search
            .default_radius()
            .map_err(|e| ConfigError::Message(format!("search.default_radius_m: {}", e)))?;

        if self.records.source == RecordsSourceKind::Supabase && self.supabase.is_none() {
            return Err(ConfigError::Message(
                "records.source = \"supabase\" requires a [supabase] section".to_string(),
            ));
        }

        Ok(())
    }
}

/// Let the conventional Supabase variables override the file values
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let supabase_url = env::var("SUPABASE_URL").ok();
    let supabase_key = env::var("SUPABASE_ANON_KEY").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = supabase_url {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Some(key) = supabase_key {
        builder = builder.set_override("supabase.anon_key", key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_search_settings() {
        let search = SearchSettings::default();
        assert_eq!(search.fallback_location().unwrap(), GeoPoint::DAKAR);
        assert_eq!(search.default_radius().unwrap(), RadiusPreset::M500);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join("lekk-resto-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[search]
default_radius_m = 2000
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.records.source, RecordsSourceKind::Static);
        assert_eq!(settings.search.default_radius().unwrap(), RadiusPreset::Km2);
        assert_eq!(settings.cache.ttl_secs, 300);
        assert!(settings.supabase.is_none());
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let dir = std::env::temp_dir().join("lekk-resto-config-test-radius");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[search]
default_radius_m = 750
"#,
        )
        .unwrap();

        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_supabase_source_requires_section() {
        let dir = std::env::temp_dir().join("lekk-resto-config-test-supabase");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9090

[records]
source = "supabase"
"#,
        )
        .unwrap();

        assert!(Settings::load_from(&path).is_err());
    }
}
