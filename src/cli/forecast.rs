use chrono::NaiveDate;
use clap::Parser;

use crate::{
    cli::EliaArgs,
    prelude::*,
    tables::{build_forecast_table, build_summary_table},
};

#[derive(Parser)]
pub struct ForecastArgs {
    /// Forecast date, defaults to the latest available day.
    #[clap(long, env = "FORECAST_DATE")]
    pub date: Option<NaiveDate>,

    #[clap(flatten)]
    pub elia: EliaArgs,
}

#[instrument(skip_all)]
pub async fn forecast(args: &ForecastArgs) -> Result {
    let forecast = args
        .elia
        .forecast_builder()?
        .build(args.date)
        .await
        .context("failed to build the forecast")?;
    ensure!(!forecast.is_empty(), "no hourly samples on {}", forecast.date());
    println!("{}", build_forecast_table(&forecast));
    if let Some(summary) = forecast.summary() {
        println!("{}", build_summary_table(&summary));
    }
    Ok(())
}
