use chrono::{NaiveDate, TimeDelta, Utc};

use crate::{
    core::{
        error::{Error, Result},
        feed::{Feed, FeedSource, Record},
        forecast::{CarbonForecast, HourlySample},
        series::{ResampleHourly, align},
    },
    prelude::{debug, info, instrument},
};

pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Turns the day-ahead Elia feeds into a [`CarbonForecast`].
pub struct ForecastBuilder<S> {
    source: S,
    lookback_days: u32,
}

impl<S: FeedSource> ForecastBuilder<S> {
    pub const fn new(source: S) -> Self {
        Self { source, lookback_days: DEFAULT_LOOKBACK_DAYS }
    }

    #[must_use]
    pub const fn with_lookback_days(mut self, lookback_days: u32) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    /// Build the forecast for the target date, or the latest day with data when [`None`].
    pub async fn build(&self, target: Option<NaiveDate>) -> Result<CarbonForecast> {
        self.build_as_of(Utc::now().date_naive(), target).await
    }

    /// Same as [`Self::build`], but with an explicit «today» for the fallback probing.
    #[instrument(skip_all, fields(today = %today, target = ?target))]
    pub async fn build_as_of(
        &self,
        today: NaiveDate,
        target: Option<NaiveDate>,
    ) -> Result<CarbonForecast> {
        let date = match target {
            Some(date) => date,
            None => self.find_latest_available(today).await?,
        };
        info!(%date, "building the forecast…");

        let load = self.fetch_non_empty(Feed::Load, date).await?;
        let wind = self.fetch_non_empty(Feed::Wind, date).await?;
        let solar = self.fetch_non_empty(Feed::Solar, date).await?;

        let samples: Vec<_> =
            align(&[load.resample_hourly(), wind.resample_hourly(), solar.resample_hourly()])
                .into_iter()
                .map(|(timestamp, [load, wind, solar])| {
                    HourlySample::new(timestamp, load, wind, solar)
                })
                .collect();
        info!(%date, n_hours = samples.len(), "built");
        Ok(CarbonForecast::new(date, samples))
    }

    /// Walk back from yesterday until the wind feed has records.
    async fn find_latest_available(&self, today: NaiveDate) -> Result<NaiveDate> {
        for days_back in 1..=self.lookback_days {
            let date = today - TimeDelta::days(i64::from(days_back));
            let records = self.source.fetch(Feed::Wind, date).await?;
            if !records.is_empty() {
                debug!(%date, n_records = records.len(), "found the latest day with data");
                return Ok(date);
            }
            debug!(%date, "no data yet");
        }
        Err(Error::NoDataAvailable { since: today, n_days: self.lookback_days })
    }

    async fn fetch_non_empty(&self, feed: Feed, date: NaiveDate) -> Result<Vec<Record>> {
        let records = self.source.fetch(feed, date).await?;
        if records.is_empty() {
            return Err(Error::IncompleteData { feed, date });
        }
        debug!(%feed, %date, n_records = records.len(), "fetched");
        Ok(records)
    }
}
