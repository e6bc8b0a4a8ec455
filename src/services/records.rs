use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::RestaurantRecord;
use crate::services::supabase::{SupabaseClient, SupabaseError};

/// Errors that can occur while loading the records snapshot
#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid records fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),
}

/// Where restaurant records come from
pub enum RecordsSource {
    /// Fixed list, e.g. the bundled fixture file
    Static(Vec<RestaurantRecord>),
    /// Live query against the hosted database
    Supabase(SupabaseClient),
}

impl RecordsSource {
    /// Parse a JSON array of records
    pub fn from_json(json: &str) -> Result<Self, RecordsError> {
        let records: Vec<RestaurantRecord> = serde_json::from_str(json)?;
        warn_on_duplicate_ids(&records);
        Ok(RecordsSource::Static(records))
    }

    /// Read a JSON fixture file
    pub fn from_fixture<P: AsRef<Path>>(path: P) -> Result<Self, RecordsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RecordsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordsSource::Static(_) => "static",
            RecordsSource::Supabase(_) => "supabase",
        }
    }

    /// Load a fresh snapshot
    pub async fn load(&self) -> Result<Vec<RestaurantRecord>, RecordsError> {
        match self {
            RecordsSource::Static(records) => Ok(records.clone()),
            RecordsSource::Supabase(client) => {
                let records = client.fetch_restaurants().await?;
                warn_on_duplicate_ids(&records);
                Ok(records)
            }
        }
    }
}

fn warn_on_duplicate_ids(records: &[RestaurantRecord]) {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.as_str()) {
            tracing::warn!("Duplicate restaurant id in snapshot: {}", record.id);
        }
    }
}
