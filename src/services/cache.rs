use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::RestaurantRecord;
use crate::services::records::{RecordsError, RecordsSource};

/// Shared, immutable records snapshot
pub type Snapshot = Arc<Vec<Arc<RestaurantRecord>>>;

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key of the full restaurants snapshot
    pub const RESTAURANTS: &'static str = "restaurants:all";
}

/// TTL cache in front of the records source
///
/// The whole snapshot is one entry: the data set is small and every view
/// filters it in memory. Concurrent misses share a single load.
pub struct SnapshotCache {
    source: RecordsSource,
    cache: moka::future::Cache<&'static str, Snapshot>,
    ttl_secs: u64,
}

impl SnapshotCache {
    pub fn new(source: RecordsSource, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            source,
            cache,
            ttl_secs,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Current snapshot, loading it on a miss
    pub async fn snapshot(&self) -> Result<Snapshot, Arc<RecordsError>> {
        self.cache
            .try_get_with(CacheKey::RESTAURANTS, async {
                let records = self.source.load().await?;
                tracing::info!(
                    "Loaded {} restaurants from {} source",
                    records.len(),
                    self.source.name()
                );
                Ok::<_, RecordsError>(Arc::new(records.into_iter().map(Arc::new).collect()))
            })
            .await
    }

    /// Find one restaurant by id
    pub async fn find(&self, id: &str) -> Result<Option<Arc<RestaurantRecord>>, Arc<RecordsError>> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.iter().find(|record| record.id == id).cloned())
    }

    /// Drop the cached snapshot so the next read reloads it
    pub async fn invalidate(&self) {
        self.cache.invalidate(CacheKey::RESTAURANTS).await;
        tracing::debug!("Invalidated restaurants snapshot");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.entry_count(),
            ttl_secs: self.ttl_secs,
            source: self.source.name().to_string(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
    pub source: String,
}
