use chrono::NaiveDate;
use clap::Parser;

use crate::{
    cli::EliaArgs,
    core::{ScheduleOptimizer, profile::Comparison},
    prelude::*,
    quantity::{mass::Kilograms, power::Megawatts},
    tables::{build_comparison_table, build_hourly_profile_table},
};

#[derive(Parser)]
pub struct OptimizeArgs {
    /// Habitual start hour (UTC).
    #[clap(
        long = "start-hour",
        default_value = "7",
        env = "START_HOUR",
        value_parser = clap::value_parser!(u32).range(0..=23),
    )]
    pub start_hour: u32,

    #[clap(
        long = "duration-hours",
        default_value = "4",
        env = "DURATION_HOURS",
        value_parser = clap::value_parser!(u32).range(1..=24),
    )]
    pub duration_hours: u32,

    /// Constant load power in megawatts.
    #[clap(long = "load-megawatts", default_value = "0.25", env = "LOAD_MEGAWATTS")]
    pub load: Megawatts,

    /// Forecast date, defaults to the latest available day.
    #[clap(long, env = "FORECAST_DATE")]
    pub date: Option<NaiveDate>,

    #[clap(flatten)]
    pub elia: EliaArgs,
}

#[instrument(skip_all, fields(start_hour = args.start_hour, duration_hours = args.duration_hours))]
pub async fn optimize(args: &OptimizeArgs) -> Result {
    let forecast = args
        .elia
        .forecast_builder()?
        .build(args.date)
        .await
        .context("failed to build the forecast")?;
    let comparison = ScheduleOptimizer::builder()
        .forecast(&forecast)
        .duration_hours(args.duration_hours)
        .load(args.load)
        .build()
        .compare(args.start_hour)
        .context("failed to optimize the schedule")?;
    info!(
        n_candidates = comparison.all_slots.len(),
        emissions_saved = %comparison.emissions_saved,
        "optimized",
    );

    println!("{}", build_comparison_table(&comparison));
    println!("{}", build_hourly_profile_table(comparison.annotate(&forecast)));
    println!("{}", recommend(&comparison));
    Ok(())
}

const TONNE: Kilograms = Kilograms(1000.0);

fn recommend(comparison: &Comparison) -> String {
    if comparison.emissions_saved <= Kilograms::ZERO {
        return "The standard schedule is already near-optimal.".to_owned();
    }
    let equivalent = if comparison.emissions_saved > TONNE {
        format!("{:.2} tonnes of CO₂", comparison.emissions_saved.0 / TONNE.0)
    } else {
        format!("driving {:.0} km in a typical car", comparison.km_equivalent())
    };
    format!(
        "Start at {} ({:+} h) to save {} of CO₂ ({:.1}% less), equivalent to {equivalent}.",
        comparison.optimal.start.format("%H:%M"),
        comparison.time_shift_hours,
        comparison.emissions_saved,
        comparison.saved_percentage,
    )
}
