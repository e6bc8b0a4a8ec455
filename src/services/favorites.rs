use std::collections::HashMap;
use std::sync::Arc;

use redis::aio::ConnectionManager;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::models::RestaurantRecord;

/// Errors that can occur with key-value store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Minimal string key-value store injected into the favorites service
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Redis-backed store shared across instances
pub struct RedisStore {
    // ConnectionManager needs &mut for queries
    redis: Arc<Mutex<ConnectionManager>>,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(Mutex::new(redis)),
        })
    }
}

impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut *conn).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async(&mut *conn)
            .await?;
        Ok(())
    }
}

/// Store selected from configuration
pub enum FavoritesBackend {
    Memory(MemoryStore),
    Redis(RedisStore),
}

impl FavoritesBackend {
    pub fn name(&self) -> &'static str {
        match self {
            FavoritesBackend::Memory(_) => "memory",
            FavoritesBackend::Redis(_) => "redis",
        }
    }
}

impl KeyValueStore for FavoritesBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            FavoritesBackend::Memory(store) => store.get(key).await,
            FavoritesBackend::Redis(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            FavoritesBackend::Memory(store) => store.set(key, value).await,
            FavoritesBackend::Redis(store) => store.set(key, value).await,
        }
    }
}

/// Favorites key builder
pub struct FavoriteKey;

impl FavoriteKey {
    /// Key holding a client's favorite ids as a JSON array
    pub fn for_client(client_id: &str) -> String {
        format!("lekk-resto-favorites:{}", client_id)
    }
}

/// Per-client favorite restaurant ids, persisted through a `KeyValueStore`
pub struct FavoritesStore<S> {
    store: S,
    // Serializes read-modify-write toggles within this process
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Favorite ids in the order they were added
    pub async fn ids(&self, client_id: &str) -> Result<Vec<String>, StoreError> {
        let key = FavoriteKey::for_client(client_id);

        match self.store.get(&key).await? {
            None => Ok(Vec::new()),
            Some(json) => match serde_json::from_str(&json) {
                Ok(ids) => Ok(ids),
                Err(e) => {
                    tracing::warn!("Discarding unreadable favorites for {}: {}", client_id, e);
                    Ok(Vec::new())
                }
            },
        }
    }

    pub async fn contains(&self, client_id: &str, restaurant_id: &str) -> Result<bool, StoreError> {
        Ok(self.ids(client_id).await?.iter().any(|id| id == restaurant_id))
    }

    /// Add or remove a restaurant. Returns whether it is a favorite afterwards.
    pub async fn toggle(&self, client_id: &str, restaurant_id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut ids = self.ids(client_id).await?;
        let is_favorite = if let Some(pos) = ids.iter().position(|id| id == restaurant_id) {
            ids.remove(pos);
            false
        } else {
            ids.push(restaurant_id.to_string());
            true
        };

        let json = serde_json::to_string(&ids)?;
        self.store
            .set(&FavoriteKey::for_client(client_id), &json)
            .await?;

        tracing::debug!(
            "Favorite {} for {} is now {}",
            restaurant_id,
            client_id,
            is_favorite
        );

        Ok(is_favorite)
    }

    /// Favorite restaurants present in `records`, in snapshot order
    pub async fn favorite_records(
        &self,
        client_id: &str,
        records: &[Arc<RestaurantRecord>],
    ) -> Result<Vec<Arc<RestaurantRecord>>, StoreError> {
        let ids = self.ids(client_id).await?;

        Ok(records
            .iter()
            .filter(|record| ids.contains(&record.id))
            .cloned()
            .collect())
    }
}
