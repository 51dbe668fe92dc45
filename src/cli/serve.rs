use std::{net::SocketAddr, sync::Arc};

use clap::Parser;

use crate::{
    cli::{EliaArgs, EntsoeArgs},
    core::ForecastCache,
    prelude::*,
    server::{self, AppState},
};

#[derive(Parser)]
pub struct ServeArgs {
    #[clap(long = "bind-address", default_value = "127.0.0.1:5000", env = "BIND_ADDRESS")]
    pub bind_address: SocketAddr,

    #[clap(flatten)]
    pub elia: EliaArgs,

    #[clap(flatten)]
    pub entsoe: EntsoeArgs,
}

pub async fn serve(args: &ServeArgs) -> Result {
    let state = Arc::new(AppState {
        builder: args.elia.forecast_builder()?,
        cache: ForecastCache::default(),
        entsoe: args.entsoe.try_api()?,
    });
    if state.entsoe.is_none() {
        warn!("`ENTSOE_API_TOKEN` is not set, the real-time production is unavailable");
    }
    server::prefetch(Arc::clone(&state));
    server::run(args.bind_address, state).await
}
