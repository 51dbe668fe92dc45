use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::core::{
    builder::ForecastBuilder,
    error::Result,
    feed::FeedSource,
    forecast::CarbonForecast,
};

/// Forecast for the most recent available day, along with the time it was fetched.
#[derive(Clone)]
pub struct CachedForecast {
    pub forecast: Arc<CarbonForecast>,
    pub fetched_at: DateTime<Utc>,
}

/// Holds at most one forecast: the one for the most recent available day.
///
/// Entries never expire: only [`ForecastCache::store`] replaces them.
#[derive(Default)]
pub struct ForecastCache {
    entry: RwLock<Option<CachedForecast>>,

    /// Serializes the builds, so that concurrent misses share one upstream fetch.
    build_lock: Mutex<()>,
}

impl ForecastCache {
    pub async fn get(&self) -> Option<CachedForecast> {
        self.entry.read().await.clone()
    }

    pub async fn store(&self, forecast: CarbonForecast) -> CachedForecast {
        let entry = CachedForecast { forecast: Arc::new(forecast), fetched_at: Utc::now() };
        *self.entry.write().await = Some(entry.clone());
        entry
    }

    /// Return the cached forecast, or build and cache a fresh one.
    ///
    /// Callers that miss while a build is in progress wait for it and take its result.
    pub async fn get_or_build<S: FeedSource>(
        &self,
        builder: &ForecastBuilder<S>,
    ) -> Result<CachedForecast> {
        if let Some(entry) = self.get().await {
            return Ok(entry);
        }
        let _build_guard = self.build_lock.lock().await;
        if let Some(entry) = self.get().await {
            return Ok(entry);
        }
        let forecast = builder.build(None).await?;
        Ok(self.store(forecast).await)
    }
}
