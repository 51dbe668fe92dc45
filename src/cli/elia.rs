use clap::Parser;
use reqwest::Url;

use crate::{
    api::{Elia, elia::DEFAULT_BASE_URL},
    core::{ForecastBuilder, builder::DEFAULT_LOOKBACK_DAYS},
    prelude::*,
};

#[derive(Parser)]
pub struct EliaArgs {
    /// Elia Open Data Explore API base URL.
    #[clap(long = "elia-base-url", default_value = DEFAULT_BASE_URL, env = "ELIA_BASE_URL")]
    pub elia_base_url: Url,

    /// How many days to look back for the latest available forecast.
    #[clap(
        long = "lookback-days",
        default_value_t = DEFAULT_LOOKBACK_DAYS,
        env = "LOOKBACK_DAYS"
    )]
    pub lookback_days: u32,
}

impl EliaArgs {
    pub fn forecast_builder(&self) -> Result<ForecastBuilder<Elia>> {
        Ok(ForecastBuilder::new(Elia::try_new(self.elia_base_url.clone())?)
            .with_lookback_days(self.lookback_days))
    }
}
