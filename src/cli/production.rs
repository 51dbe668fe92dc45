use chrono::Utc;
use clap::Parser;

use crate::{
    api::entsoe::TOKEN_HELP,
    cli::EntsoeArgs,
    prelude::*,
    tables::build_production_table,
};

#[derive(Parser)]
pub struct ProductionArgs {
    #[clap(flatten)]
    pub entsoe: EntsoeArgs,
}

#[instrument(skip_all)]
pub async fn production(args: &ProductionArgs) -> Result {
    let Some(api) = args.entsoe.try_api()? else {
        bail!("`ENTSOE_API_TOKEN` is not set. {TOKEN_HELP}");
    };
    let snapshot = api
        .fetch_latest_production(Utc::now())
        .await
        .context("failed to fetch the real-time production")?;
    println!("{}", build_production_table(&snapshot));
    Ok(())
}
