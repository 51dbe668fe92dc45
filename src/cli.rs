mod elia;
mod entsoe;
mod forecast;
mod optimize;
mod production;
mod serve;

use clap::{Parser, Subcommand};

pub use self::{
    elia::EliaArgs,
    entsoe::EntsoeArgs,
    forecast::{ForecastArgs, forecast},
    optimize::{OptimizeArgs, optimize},
    production::{ProductionArgs, production},
    serve::{ServeArgs, serve},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the hourly carbon-intensity forecast.
    #[clap(name = "forecast")]
    Forecast(Box<ForecastArgs>),

    /// Find the lowest-emission start time for a constant load.
    #[clap(name = "optimize")]
    Optimize(Box<OptimizeArgs>),

    /// Print the real-time generation mix.
    #[clap(name = "production")]
    Production(Box<ProductionArgs>),

    /// Run the HTTP API.
    #[clap(name = "serve")]
    Serve(Box<ServeArgs>),
}
