use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use lekk_resto::config::{RecordsSourceKind, Settings};
use lekk_resto::routes::{
    self, handle_json_payload_error, handle_query_payload_error, AppState, SearchDefaults,
};
use lekk_resto::services::{
    FavoritesBackend, FavoritesStore, MemoryStore, RecordsSource, RedisStore, SnapshotCache,
    SupabaseClient, SupabaseTables,
};

fn config_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("Configuration error: {}", e))
}

fn records_source(settings: &Settings) -> std::io::Result<RecordsSource> {
    match settings.records.source {
        RecordsSourceKind::Static => {
            info!("Using static records from {}", settings.records.fixture_path);
            RecordsSource::from_fixture(&settings.records.fixture_path).map_err(config_error)
        }
        RecordsSourceKind::Supabase => {
            let supabase = settings
                .supabase
                .as_ref()
                .ok_or_else(|| config_error("missing [supabase] section"))?;

            let tables = SupabaseTables {
                restaurants: supabase.restaurants_table.clone(),
                daily_specials: supabase.specials_table.clone(),
            };
            let client =
                SupabaseClient::new(supabase.url.clone(), supabase.anon_key.clone(), tables)
                    .map_err(config_error)?;

            info!("Using Supabase records from {}", supabase.url);
            Ok(RecordsSource::Supabase(client))
        }
    }
}

async fn favorites_backend(settings: &Settings) -> FavoritesBackend {
    let Some(redis_url) = &settings.favorites.redis_url else {
        info!("Favorites stored in memory");
        return FavoritesBackend::Memory(MemoryStore::new());
    };

    match RedisStore::connect(redis_url).await {
        Ok(store) => {
            info!("Favorites stored in Redis");
            FavoritesBackend::Redis(store)
        }
        Err(e) => {
            error!("Failed to connect to Redis ({}), favorites fall back to memory", e);
            FavoritesBackend::Memory(MemoryStore::new())
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Configuration comes first so logging can use it
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        config_error(e)
    })?;

    // Initialize logging, RUST_LOG wins over logging.level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Lekk Resto search service...");

    let search = SearchDefaults {
        fallback_location: settings.search.fallback_location().map_err(config_error)?,
        default_radius: settings.search.default_radius().map_err(config_error)?,
    };

    // Records snapshot behind a TTL cache
    let records = Arc::new(SnapshotCache::new(
        records_source(&settings)?,
        settings.cache.ttl_secs,
    ));

    match records.snapshot().await {
        Ok(snapshot) => info!(
            "Snapshot cache warmed with {} restaurants (TTL: {}s)",
            snapshot.len(),
            settings.cache.ttl_secs
        ),
        Err(e) => warn!("Initial restaurant load failed, will retry on demand: {}", e),
    }

    let favorites = Arc::new(FavoritesStore::new(favorites_backend(&settings).await));

    // Build application state
    let app_state = AppState {
        records,
        favorites,
        search,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
