// Service exports
pub mod cache;
pub mod favorites;
pub mod geolocation;
pub mod records;
pub mod supabase;

pub use cache::{CacheKey, CacheStats, Snapshot, SnapshotCache};
pub use favorites::{
    FavoriteKey, FavoritesBackend, FavoritesStore, KeyValueStore, MemoryStore, RedisStore,
    StoreError,
};
pub use geolocation::{
    FixedPosition, GeolocationError, GeolocationProvider, NoGeolocation, PositionOutcome,
    PositionRequest, PositionSender,
};
pub use records::{RecordsError, RecordsSource};
pub use supabase::{SupabaseClient, SupabaseError, SupabaseTables};
