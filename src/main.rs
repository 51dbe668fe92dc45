#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod prelude;
mod quantity;
mod server;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, forecast, optimize, production, serve},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Forecast(args) => forecast(&args).await,
        Command::Optimize(args) => optimize(&args).await,
        Command::Production(args) => production(&args).await,
        Command::Serve(args) => serve(&args).await,
    }
}
