use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use thiserror::Error;

use crate::core::{compute_data_quality, validate_catalog};
use crate::models::{Neighborhood, DataQualityMetrics, ValidationReport};

/// Errors that can occur while loading the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog has no backing file to reload from")]
    NoSource,
}

/// An immutable catalog snapshot with its quality report
#[derive(Debug)]
pub struct Catalog {
    pub neighborhoods: Vec<Neighborhood>,
    pub quality: DataQualityMetrics,
    pub validation: ValidationReport,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

impl Catalog {
    pub fn new(neighborhoods: Vec<Neighborhood>) -> Self {
        let validation = validate_catalog(&neighborhoods);
        let quality = compute_data_quality(&neighborhoods);

        for error in &validation.errors {
            tracing::warn!("Catalog validation error: {}", error);
        }
        for warning in &validation.warnings {
            tracing::debug!("Catalog validation warning: {}", warning);
        }

        tracing::info!(
            neighborhoods = neighborhoods.len(),
            completeness = quality.completeness,
            accuracy = quality.accuracy,
            valid = validation.valid,
            "catalog snapshot built"
        );

        Self {
            neighborhoods,
            quality,
            validation,
            loaded_at: chrono::Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.neighborhoods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighborhoods.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|n| n.id == id)
    }
}

/// Holder of the current catalog snapshot
///
/// Readers take an `Arc` to the current snapshot and keep using it even if a
/// reload swaps in a new one mid-request.
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
    source: Option<PathBuf>,
}

impl CatalogStore {
    /// Load the catalog from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let neighborhoods = parse_catalog(&json)?;

        tracing::info!("Loaded {} neighborhoods from {}", neighborhoods.len(), path.display());

        Ok(Self {
            current: RwLock::new(Arc::new(Catalog::new(neighborhoods))),
            source: Some(path.to_path_buf()),
        })
    }

    /// Build a store around records already in memory
    pub fn from_neighborhoods(neighborhoods: Vec<Neighborhood>) -> Self {
        Self {
            current: RwLock::new(Arc::new(Catalog::new(neighborhoods))),
            source: None,
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Publish a new snapshot and return it
    pub fn replace(&self, neighborhoods: Vec<Neighborhood>) -> Arc<Catalog> {
        let next = Arc::new(Catalog::new(neighborhoods));
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&next);
        next
    }

    /// Re-read the backing file and publish it
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<usize, CatalogError> {
        let path = self.source.as_ref().ok_or(CatalogError::NoSource)?;
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let neighborhoods = parse_catalog(&json)?;

        Ok(self.replace(neighborhoods).len())
    }
}

/// Parse a JSON array of neighborhood records
pub fn parse_catalog(json: &str) -> Result<Vec<Neighborhood>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

/// Reload the catalog from disk on a fixed interval
pub fn spawn_periodic_refresh(store: Arc<CatalogStore>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick fires immediately and the catalog is already fresh
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.refresh().await {
                Ok(count) => tracing::info!("Catalog refreshed ({} neighborhoods)", count),
                Err(e) => tracing::warn!("Catalog refresh failed, keeping previous snapshot: {}", e),
            }
        }
    })
}
