pub mod builder;
pub mod cache;
pub mod emission;
pub mod error;
pub mod feed;
pub mod forecast;
pub mod optimizer;
pub mod production;
pub mod profile;
pub mod series;

pub use self::{
    builder::ForecastBuilder,
    cache::ForecastCache,
    error::Error,
    feed::FeedSource,
    forecast::CarbonForecast,
    optimizer::ScheduleOptimizer,
};
