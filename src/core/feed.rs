use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::{core::error::Result, quantity::power::Megawatts};

/// Upstream time series consumed by the forecast.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, derive_more::Display)]
pub enum Feed {
    #[display("grid load")]
    Load,

    #[display("wind generation")]
    Wind,

    #[display("solar generation")]
    Solar,

    /// Actual generation per production type, used for the real-time snapshot.
    #[display("actual generation")]
    ActualGeneration,
}

/// Raw sub-daily record, one per region and interval.
pub type Record = (DateTime<Utc>, Megawatts);

#[async_trait]
pub trait FeedSource: Sync {
    /// Fetch all records of the feed for the UTC day, draining any pagination.
    async fn fetch(&self, feed: Feed, on: NaiveDate) -> Result<Vec<Record>>;
}
