//! [Elia Open Data](https://opendata.elia.be) client.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    api::client,
    core::{
        error::{Error, Result as CoreResult},
        feed::{Feed, FeedSource, Record},
    },
    prelude::*,
    quantity::power::Megawatts,
};

pub const DEFAULT_BASE_URL: &str = "https://opendata.elia.be/api/explore/v2.1";

/// Maximum page size allowed by the Explore API.
const PAGE_SIZE: usize = 100;

pub struct Api {
    client: Client,
    base_url: Url,
}

impl Api {
    pub fn try_new(base_url: Url) -> Result<Self> {
        ensure!(!base_url.cannot_be_a_base(), "`{base_url}` cannot be a base URL");
        Ok(Self { client: client::try_new()?, base_url })
    }

    fn dataset_url(&self, dataset_id: &str) -> String {
        format!(
            "{}/catalog/datasets/{dataset_id}/records",
            self.base_url.as_str().trim_end_matches('/'),
        )
    }

    /// Drain the pages of the dataset records on the day.
    async fn get_records(
        &self,
        dataset_id: &str,
        on: NaiveDate,
    ) -> Result<Vec<Record>, reqwest::Error> {
        let url = self.dataset_url(dataset_id);
        let next_day = on.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
        let filter = format!("datetime>='{on}' and datetime<'{next_day}'");

        let mut records = Vec::new();
        let mut offset = 0;
        loop {
            let page: Page = self
                .client
                .get(&url)
                .query(&[("where", filter.as_str())])
                .query(&[("limit", PAGE_SIZE), ("offset", offset)])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            debug!(offset, n_results = page.results.len(), total_count = page.total_count);
            if page.results.is_empty() {
                break;
            }
            offset += page.results.len();
            records.extend(page.results.into_iter().filter_map(|result| {
                Some((result.timestamp, Megawatts(result.day_ahead_forecast?)))
            }));
            if offset >= page.total_count {
                break;
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl FeedSource for Api {
    #[instrument(skip_all, fields(feed = %feed, on = %on))]
    async fn fetch(&self, feed: Feed, on: NaiveDate) -> CoreResult<Vec<Record>> {
        let dataset_id = match feed {
            Feed::Load => "ods001",
            Feed::Wind => "ods032",
            Feed::Solar => "ods087",

            // Only published by ENTSO-E:
            Feed::ActualGeneration => return Ok(Vec::new()),
        };
        info!(dataset_id, "fetching…");
        let records = self
            .get_records(dataset_id, on)
            .await
            .map_err(|error| Error::SourceFetch { feed, cause: error.into() })?;
        info!(n_records = records.len(), "fetched");
        Ok(records)
    }
}

#[derive(Deserialize)]
struct Page {
    total_count: usize,
    results: Vec<PageResult>,
}

#[derive(Deserialize)]
struct PageResult {
    #[serde(rename = "datetime")]
    timestamp: DateTime<Utc>,

    /// Missing for the intervals that are not forecast yet.
    #[serde(rename = "dayaheadforecast")]
    day_ahead_forecast: Option<f64>,
}
